//! View mode definitions

/// Current view/input mode with embedded state
#[derive(Debug, Clone, PartialEq)]
pub enum ViewMode {
    /// Normal browsing mode
    Browse,
    /// Search popup with query
    Search { query: String },
    /// Help overlay
    Help,
}

impl Default for ViewMode {
    fn default() -> Self {
        Self::Browse
    }
}

impl ViewMode {
    pub fn is_browse(&self) -> bool {
        matches!(self, ViewMode::Browse)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_browse() {
        assert!(ViewMode::default().is_browse());
        assert!(!ViewMode::Help.is_browse());
    }
}
