use serde::Deserialize;

use crate::HistoryError;

/// Options for a [`History`](crate::History).
///
/// Loadable from TOML:
///
/// ```
/// use patch_history::HistoryConfig;
///
/// let config = HistoryConfig::from_toml_str("max_undo_depth = 200").unwrap();
/// assert_eq!(config.max_undo_depth, Some(200));
/// assert_eq!(HistoryConfig::from_toml_str("").unwrap(), HistoryConfig::default());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct HistoryConfig {
    /// Maximum number of sealed checkpoints kept behind the cursor. Older
    /// checkpoints are evicted on commit. `None` keeps everything.
    pub max_undo_depth: Option<usize>,
}

impl HistoryConfig {
    /// Unbounded history.
    pub fn unlimited() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_max_undo_depth(mut self, depth: usize) -> Self {
        self.max_undo_depth = Some(depth);
        self
    }

    /// Parse a configuration from a TOML document.
    pub fn from_toml_str(source: &str) -> Result<Self, HistoryError> {
        Ok(toml::from_str(source)?)
    }
}
