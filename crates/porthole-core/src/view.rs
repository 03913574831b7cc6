#![forbid(unsafe_code)]

//! The tagged view union and its JSON wire form.
//!
//! A view is `{ metadata, config }` where `metadata.type` names the config
//! shape. On the Rust side the tag lives in the [`ViewConfig`] enum
//! discriminant; serialization round-trips it through `metadata.type`.

use serde::de::Error as _;
use serde::ser::SerializeStruct;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;

/// Type tag for donut chart views.
pub const TAG_DONUT_CHART: &str = "donutChart";
/// Type tag for graph views.
pub const TAG_GRAPH: &str = "graph";
/// Type tag for list views.
pub const TAG_LIST: &str = "list";
/// Type tag for text views.
pub const TAG_TEXT: &str = "text";
/// Type tag for single-stat views.
pub const TAG_SINGLE_STAT: &str = "singleStat";

/// A server-supplied, tagged display payload.
///
/// Immutable once received: an update replaces the whole value. The
/// `metadata.checksum` field is an opaque equality marker used by consumers
/// to skip redundant re-rendering.
#[derive(Debug, Clone, PartialEq)]
pub struct View {
    /// Title, checksum, and (implicitly) the type tag.
    pub metadata: ViewMetadata,
    /// Per-tag payload.
    pub config: ViewConfig,
}

impl View {
    /// Create a view from a config with empty metadata.
    #[must_use]
    pub fn new(config: ViewConfig) -> Self {
        Self {
            metadata: ViewMetadata::default(),
            config,
        }
    }

    /// Create a plain text view.
    #[must_use]
    pub fn text(value: impl Into<String>) -> Self {
        Self::new(ViewConfig::Text(TextConfig {
            value: value.into(),
            is_markdown: false,
        }))
    }

    /// Set the title breadcrumb.
    #[must_use]
    pub fn with_title(mut self, title: Vec<View>) -> Self {
        self.metadata.title = title;
        self
    }

    /// Set the checksum marker.
    #[must_use]
    pub fn with_checksum(mut self, checksum: impl Into<String>) -> Self {
        self.metadata.checksum = Some(checksum.into());
        self
    }

    /// The wire type tag for this view.
    #[must_use]
    pub fn type_tag(&self) -> &str {
        self.config.type_tag()
    }
}

/// View metadata: title breadcrumb and checksum.
///
/// The type tag is not stored here — it is the [`ViewConfig`] discriminant —
/// but it appears under `metadata.type` on the wire.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ViewMetadata {
    /// Title as a breadcrumb of nested views (text views in practice).
    pub title: Vec<View>,
    /// Opaque value-equality marker, absent when the server did not set one.
    pub checksum: Option<String>,
}

/// Closed enumeration of view payload shapes.
///
/// `Opaque` is the explicit fallback variant: any tag this layer does not
/// recognize is carried through with its raw config so the dispatcher can
/// still hand it to the passthrough renderer.
#[derive(Debug, Clone, PartialEq)]
pub enum ViewConfig {
    /// Donut chart segments and labels.
    DonutChart(DonutChartConfig),
    /// Graph nodes and edges.
    Graph(GraphConfig),
    /// Nested list of views.
    List(ListConfig),
    /// Plain or markdown-flagged text.
    Text(TextConfig),
    /// A single headline statistic.
    SingleStat(SingleStatConfig),
    /// Unrecognized tag; raw config preserved.
    Opaque {
        /// The wire tag as received.
        tag: String,
        /// The raw config payload as received.
        config: Value,
    },
}

impl ViewConfig {
    /// The wire type tag for this config.
    #[must_use]
    pub fn type_tag(&self) -> &str {
        match self {
            Self::DonutChart(_) => TAG_DONUT_CHART,
            Self::Graph(_) => TAG_GRAPH,
            Self::List(_) => TAG_LIST,
            Self::Text(_) => TAG_TEXT,
            Self::SingleStat(_) => TAG_SINGLE_STAT,
            Self::Opaque { tag, .. } => tag,
        }
    }

    fn from_tagged(tag: &str, config: Value) -> Result<Self, serde_json::Error> {
        Ok(match tag {
            TAG_DONUT_CHART => Self::DonutChart(serde_json::from_value(config)?),
            TAG_GRAPH => Self::Graph(serde_json::from_value(config)?),
            TAG_LIST => Self::List(serde_json::from_value(config)?),
            TAG_TEXT => Self::Text(serde_json::from_value(config)?),
            TAG_SINGLE_STAT => Self::SingleStat(serde_json::from_value(config)?),
            _ => Self::Opaque {
                tag: tag.to_owned(),
                config,
            },
        })
    }
}

/// One donut segment: a count bucketed under a status string.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DonutSegment {
    /// Number of items with this status.
    pub count: u64,
    /// Status bucket, e.g. `"ok"` or `"error"`. Also keys the CSS class.
    pub status: String,
}

/// Singular/plural item labels for a donut chart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DonutLabels {
    /// Label when the total count is greater than one.
    pub plural: String,
    /// Label when the total count is zero or one.
    pub singular: String,
}

/// Donut chart payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DonutChartConfig {
    /// Segments, unordered as received; renderers sort by status.
    pub segments: Vec<DonutSegment>,
    /// Item labels for the center caption.
    pub labels: DonutLabels,
}

/// Foreground/background colors for both theme modes.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ColorPalette {
    /// Foreground in light mode.
    pub light_fg: String,
    /// Background in light mode.
    pub light_bg: String,
    /// Foreground in dark mode.
    pub dark_fg: String,
    /// Background in dark mode.
    pub dark_bg: String,
}

/// Presentation data attached to graph nodes and edges.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct GraphData {
    /// Color palette for node rendering.
    #[serde(default)]
    pub palette: ColorPalette,
}

/// A graph node.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphNode {
    /// Stable node identity.
    pub id: String,
    /// Display label; may contain embedded newlines.
    #[serde(default)]
    pub label: String,
    /// Presentation data.
    #[serde(default)]
    pub data: GraphData,
}

/// A directed graph edge.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphEdge {
    /// Optional stable edge identity.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Source node id.
    pub source: String,
    /// Target node id.
    pub target: String,
    /// Display label.
    #[serde(default)]
    pub label: String,
    /// Presentation data.
    #[serde(default)]
    pub data: GraphData,
}

/// Graph payload. The edge list is named `links` on the wire.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphConfig {
    /// Nodes.
    pub nodes: Vec<GraphNode>,
    /// Edges (`links` on the wire).
    #[serde(rename = "links")]
    pub edges: Vec<GraphEdge>,
}

/// List payload: a flat sequence of nested views.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListConfig {
    /// Item views, rendered by their own tags.
    pub items: Vec<View>,
    /// Optional icon name for the list header.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon_name: Option<String>,
}

/// Text payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextConfig {
    /// The text value.
    pub value: String,
    /// Whether the value is markdown source. Rendering markdown is the
    /// host's concern; this layer only carries the flag.
    #[serde(default)]
    pub is_markdown: bool,
}

/// The value portion of a single-stat tile.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SingleStatValue {
    /// Display text of the statistic.
    pub text: String,
    /// Display color name.
    #[serde(default)]
    pub color: String,
}

/// Single-stat payload: one headline number with a title.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SingleStatConfig {
    /// Tile title.
    pub title: String,
    /// The statistic itself.
    pub value: SingleStatValue,
}

#[derive(Serialize)]
struct WireMetadata<'a> {
    #[serde(rename = "type")]
    kind: &'a str,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    title: &'a Vec<View>,
    #[serde(skip_serializing_if = "Option::is_none")]
    checksum: &'a Option<String>,
}

impl Serialize for View {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut st = serializer.serialize_struct("View", 2)?;
        st.serialize_field(
            "metadata",
            &WireMetadata {
                kind: self.type_tag(),
                title: &self.metadata.title,
                checksum: &self.metadata.checksum,
            },
        )?;
        match &self.config {
            ViewConfig::DonutChart(c) => st.serialize_field("config", c)?,
            ViewConfig::Graph(c) => st.serialize_field("config", c)?,
            ViewConfig::List(c) => st.serialize_field("config", c)?,
            ViewConfig::Text(c) => st.serialize_field("config", c)?,
            ViewConfig::SingleStat(c) => st.serialize_field("config", c)?,
            ViewConfig::Opaque { config, .. } => st.serialize_field("config", config)?,
        }
        st.end()
    }
}

impl<'de> Deserialize<'de> for View {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        struct RawMetadata {
            #[serde(rename = "type")]
            kind: String,
            #[serde(default)]
            title: Vec<View>,
            #[serde(default)]
            checksum: Option<String>,
        }

        #[derive(Deserialize)]
        struct RawView {
            metadata: RawMetadata,
            #[serde(default)]
            config: Value,
        }

        let raw = RawView::deserialize(deserializer)?;
        let config =
            ViewConfig::from_tagged(&raw.metadata.kind, raw.config).map_err(D::Error::custom)?;
        Ok(View {
            metadata: ViewMetadata {
                title: raw.metadata.title,
                checksum: raw.metadata.checksum,
            },
            config,
        })
    }
}
