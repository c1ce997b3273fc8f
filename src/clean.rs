//! Dimension filtering and per-cluster partitioning of a raw metric table.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::data::column_id::{DEFAULT_CLUSTER_TAG, parse_column};
use crate::data::filter::DimensionFilter;
use crate::data::model::MetricTable;
use crate::error::Result;

/// Cluster key string (`"<cluster_id>_<scope>"`) → table of that cluster's columns.
pub type ClusterFrames = BTreeMap<String, MetricTable>;

// ---------------------------------------------------------------------------
// CleanerConfig
// ---------------------------------------------------------------------------

/// Options for [`MetricCleaner`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CleanerConfig {
    /// Case-insensitive pattern a column name must contain to be kept.
    pub dimension_name: String,
    /// Drop, per cluster, every column with at least one missing value.
    #[serde(default)]
    pub drop_incomplete: bool,
    /// Tag key holding the cluster id.
    #[serde(default = "default_separator_tag")]
    pub separator_tag: String,
}

fn default_separator_tag() -> String {
    DEFAULT_CLUSTER_TAG.to_string()
}

impl CleanerConfig {
    pub fn new(dimension_name: impl Into<String>) -> Self {
        CleanerConfig {
            dimension_name: dimension_name.into(),
            drop_incomplete: false,
            separator_tag: default_separator_tag(),
        }
    }

    pub fn drop_incomplete(mut self, drop: bool) -> Self {
        self.drop_incomplete = drop;
        self
    }

    pub fn separator_tag(mut self, tag: impl Into<String>) -> Self {
        self.separator_tag = tag.into();
        self
    }
}

// ---------------------------------------------------------------------------
// MetricCleaner
// ---------------------------------------------------------------------------

/// Eagerly cleaned and partitioned view of a metric table.
///
/// Construction copies what it needs out of the source table; the caller's
/// table is never modified. The partition is fixed once built.
#[derive(Debug, Clone)]
pub struct MetricCleaner {
    filtered: MetricTable,
    cluster_frames: ClusterFrames,
}

impl MetricCleaner {
    /// Filter `table` to the configured dimension and split it by cluster key.
    ///
    /// Fails only when `dimension_name` is not a valid pattern. Columns whose
    /// names cannot be parsed, or carry no cluster tag, are skipped.
    pub fn new(table: &MetricTable, config: CleanerConfig) -> Result<Self> {
        let filter = DimensionFilter::new(&config.dimension_name)?;
        let filtered = filter.apply(table);
        let cluster_frames = split_by_cluster(&filtered, &config);

        log::info!(
            "dimension '{}': kept {}/{} columns in {} clusters",
            config.dimension_name,
            filtered.n_cols(),
            table.n_cols(),
            cluster_frames.len()
        );

        Ok(MetricCleaner {
            filtered,
            cluster_frames,
        })
    }

    /// The dimension-filtered table, before partitioning.
    pub fn filtered(&self) -> &MetricTable {
        &self.filtered
    }

    pub fn cluster_frames(&self) -> &ClusterFrames {
        &self.cluster_frames
    }

    pub fn into_cluster_frames(self) -> ClusterFrames {
        self.cluster_frames
    }
}

fn split_by_cluster(filtered: &MetricTable, config: &CleanerConfig) -> ClusterFrames {
    let mut frames = ClusterFrames::new();

    for series in filtered.columns() {
        let Some(id) = parse_column(&series.name, &config.separator_tag) else {
            log::debug!("skipping unparseable column: {}", series.name);
            continue;
        };
        frames
            .entry(id.cluster_key().to_string())
            .or_insert_with(|| MetricTable::with_index(filtered.index().to_vec()))
            .push_column(series.clone());
    }

    if config.drop_incomplete {
        frames = frames
            .into_iter()
            .map(|(key, table)| {
                let complete = table.drop_incomplete();
                if complete.n_cols() < table.n_cols() {
                    log::debug!(
                        "cluster {key}: dropped {} incomplete columns",
                        table.n_cols() - complete.n_cols()
                    );
                }
                (key, complete)
            })
            .collect();
    }

    frames
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::Series;

    fn index() -> Vec<String> {
        vec!["t0".into(), "t1".into(), "t2".into()]
    }

    #[test]
    fn test_filter_dimension_and_split() {
        let table = MetricTable::new(
            index(),
            vec![
                Series::new("site.scope_aws_us-east1.cpustats{clustertag=c1,podtag=p1}", vec![1.0, 2.0, 3.0]),
                Series::new("site.scope_aws_us-east1.memstats{clustertag=c1,podtag=p1}", vec![3.0, 4.0, 5.0]),
                Series::new("site.scope_aws_us-east1.cpustats{clustertag=c2,podtag=p1}", vec![2.0, 3.0, 4.0]),
            ],
        )
        .unwrap();

        let cleaner = MetricCleaner::new(&table, CleanerConfig::new("cpu")).unwrap();
        let frames = cleaner.cluster_frames();
        assert!(frames.contains_key("c1_aws_us-east1"));
        assert!(frames.contains_key("c2_aws_us-east1"));
        assert_eq!(cleaner.filtered().n_cols(), 2);
        assert_eq!(table.n_cols(), 3);
    }

    #[test]
    fn test_same_cluster_different_pods_share_table() {
        let table = MetricTable::new(
            index(),
            vec![
                Series::new("s.scope_dc.cpu{clustertag=c2,podtag=a}", vec![1.0, 2.0, 3.0]),
                Series::new("s.scope_dc.cpu{clustertag=c2,podtag=b}", vec![1.0, 2.0, 3.0]),
            ],
        )
        .unwrap();

        let frames = MetricCleaner::new(&table, CleanerConfig::new("cpu"))
            .unwrap()
            .into_cluster_frames();
        assert_eq!(frames.len(), 1);
        assert_eq!(
            frames["c2_dc"].column_names(),
            vec!["s.scope_dc.cpu{clustertag=c2,podtag=a}", "s.scope_dc.cpu{clustertag=c2,podtag=b}"]
        );
        assert_eq!(frames["c2_dc"].index(), table.index());
    }

    #[test]
    fn test_drop_incomplete_per_cluster() {
        let table = MetricTable::new(
            index(),
            vec![
                Series::new("s.scope_dc.cpu{clustertag=a,pod=1}", vec![1.0, f64::NAN, 3.0]),
                Series::new("s.scope_dc.cpu{clustertag=a,pod=2}", vec![1.0, 2.0, 3.0]),
                Series::new("s.scope_dc.cpu{clustertag=b,pod=1}", vec![f64::NAN, 2.0, 3.0]),
            ],
        )
        .unwrap();

        let kept = MetricCleaner::new(&table, CleanerConfig::new("cpu")).unwrap();
        assert_eq!(kept.cluster_frames()["a_dc"].n_cols(), 2);
        assert_eq!(kept.cluster_frames()["b_dc"].n_cols(), 1);

        let dropped =
            MetricCleaner::new(&table, CleanerConfig::new("cpu").drop_incomplete(true)).unwrap();
        assert_eq!(
            dropped.cluster_frames()["a_dc"].column_names(),
            vec!["s.scope_dc.cpu{clustertag=a,pod=2}"]
        );
        assert!(dropped.cluster_frames()["b_dc"].is_empty());
    }

    #[test]
    fn test_custom_separator_tag() {
        let table = MetricTable::new(
            index(),
            vec![Series::new("s.scope_dc.cpu{pool=blue}", vec![1.0, 2.0, 3.0])],
        )
        .unwrap();

        let default = MetricCleaner::new(&table, CleanerConfig::new("cpu")).unwrap();
        assert!(default.cluster_frames().is_empty());

        let pooled =
            MetricCleaner::new(&table, CleanerConfig::new("cpu").separator_tag("pool")).unwrap();
        assert!(pooled.cluster_frames().contains_key("blue_dc"));
    }

    #[test]
    fn test_config_defaults_from_json() {
        let config: CleanerConfig = serde_json::from_str(r#"{"dimension_name": "cpu"}"#).unwrap();
        assert_eq!(config, CleanerConfig::new("cpu"));
    }
}
