#![forbid(unsafe_code)]

//! Programmatic navigation collaborator.

use std::sync::Mutex;

use porthole_core::Params;

/// Navigation collaborator: programmatic navigation by path segments plus
/// query parameters. Implemented by the host's router.
pub trait Navigator: Send + Sync {
    /// Navigate to the given path segments with the given query parameters.
    fn navigate(&self, segments: &[String], params: &Params);
}

/// Navigator double that records every navigation.
#[derive(Default)]
pub struct MockNavigator {
    recorded: Mutex<Vec<(Vec<String>, Params)>>,
}

impl MockNavigator {
    /// Create an empty mock navigator.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// All recorded navigations, in order.
    #[must_use]
    pub fn recorded(&self) -> Vec<(Vec<String>, Params)> {
        self.recorded.lock().unwrap().clone()
    }
}

impl Navigator for MockNavigator {
    fn navigate(&self, segments: &[String], params: &Params) {
        self.recorded
            .lock()
            .unwrap()
            .push((segments.to_vec(), params.clone()));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn records_navigations() {
        let navigator = MockNavigator::new();
        navigator.navigate(&["overview".into(), "pods".into()], &Params::new());

        let recorded = navigator.recorded();
        assert_eq!(recorded.len(), 1);
        assert_eq!(recorded[0].0, vec!["overview", "pods"]);
    }
}
