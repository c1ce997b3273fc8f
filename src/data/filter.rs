use regex::{Regex, RegexBuilder};

use super::model::MetricTable;
use crate::error::{OutlierError, Result};

// ---------------------------------------------------------------------------
// Dimension filter: which columns belong to the requested dimension
// ---------------------------------------------------------------------------

/// Case-insensitive search pattern selecting the columns of one dimension
/// (e.g. `"cpu"` keeps `...cpustats{...}`).
#[derive(Debug, Clone)]
pub struct DimensionFilter {
    pattern: Regex,
}

impl DimensionFilter {
    /// Compile `dimension` as a case-insensitive regular expression.
    pub fn new(dimension: &str) -> Result<Self> {
        let pattern = RegexBuilder::new(dimension)
            .case_insensitive(true)
            .build()
            .map_err(|source| OutlierError::InvalidDimensionPattern {
                pattern: dimension.to_string(),
                source,
            })?;
        Ok(DimensionFilter { pattern })
    }

    /// Whether the pattern occurs anywhere in `column`.
    pub fn matches(&self, column: &str) -> bool {
        self.pattern.is_match(column)
    }

    /// New table containing only the matching columns, in source order.
    pub fn apply(&self, table: &MetricTable) -> MetricTable {
        table.select(|c| {
            let keep = self.matches(&c.name);
            if !keep {
                log::debug!("dropping column outside dimension: {}", c.name);
            }
            keep
        })
    }
}
