use serde::Deserialize;

use crate::{crs::WarningMode, reconcile::MergeStrategy};

/// Default cap on nested GeometryCollections.
pub const DEFAULT_MAX_NESTING_DEPTH: usize = 32;

/// Configuration for [`crate::parse_aoi_with`].
///
/// Deserializes from an embedding application's config with any field omitted:
///
/// ```
/// use geojson_aoi::{MergeStrategy, ParseOptions, WarningMode};
///
/// let options: ParseOptions =
///     serde_json::from_str(r#"{"merge": true, "warnings": "collect"}"#).unwrap();
///
/// assert!(options.merge);
/// assert_eq!(options.strategy, MergeStrategy::Union);
/// assert_eq!(options.warnings, WarningMode::Collect);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ParseOptions {
    /// Combine every polygon into a single geometry.
    pub merge: bool,
    pub strategy: MergeStrategy,
    pub warnings: WarningMode,
    pub max_nesting_depth: usize,
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            merge: false,
            strategy: MergeStrategy::default(),
            warnings: WarningMode::default(),
            max_nesting_depth: DEFAULT_MAX_NESTING_DEPTH,
        }
    }
}

impl ParseOptions {
    #[must_use]
    pub fn with_merge(mut self, merge: bool) -> Self {
        self.merge = merge;
        self
    }

    #[must_use]
    pub fn with_strategy(mut self, strategy: MergeStrategy) -> Self {
        self.strategy = strategy;
        self
    }

    #[must_use]
    pub fn with_warnings(mut self, warnings: WarningMode) -> Self {
        self.warnings = warnings;
        self
    }

    #[must_use]
    pub fn with_max_nesting_depth(mut self, max_nesting_depth: usize) -> Self {
        self.max_nesting_depth = max_nesting_depth;
        self
    }
}
