use std::cmp::Ordering;

use serde::Serialize;

use super::stats::{peak_abs, robust_zscores};
use crate::chart::{CHART_TITLE, ChartPoint, ChartSink, long_form};
use crate::clean::ClusterFrames;
use crate::error::{OutlierError, Result};

/// Number of records returned by [`MadZScoreDetector::top_anomalies`] when
/// the caller has no preference.
pub const DEFAULT_TOP_N: usize = 3;

// ---------------------------------------------------------------------------
// AnomalyRecord
// ---------------------------------------------------------------------------

/// Peak absolute z-score of one column.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnomalyRecord {
    pub cluster: String,
    pub metric: String,
    pub score: f64,
}

// ---------------------------------------------------------------------------
// MadZScoreDetector
// ---------------------------------------------------------------------------

/// Scores every column of every cluster table with a MAD-based z-score.
#[derive(Debug, Clone)]
pub struct MadZScoreDetector {
    cluster_frames: ClusterFrames,
    zscores: Option<ClusterFrames>,
}

impl MadZScoreDetector {
    pub fn new(cluster_frames: ClusterFrames) -> Self {
        MadZScoreDetector {
            cluster_frames,
            zscores: None,
        }
    }

    pub fn cluster_frames(&self) -> &ClusterFrames {
        &self.cluster_frames
    }

    /// Z-score tables keyed like the cluster frames; `None` before [`compute`](Self::compute).
    pub fn zscores(&self) -> Option<&ClusterFrames> {
        self.zscores.as_ref()
    }

    pub fn is_computed(&self) -> bool {
        self.zscores.is_some()
    }

    /// (Re)compute the z-score table of every cluster, column by column.
    pub fn compute(&mut self) {
        let zscores: ClusterFrames = self
            .cluster_frames
            .iter()
            .map(|(key, table)| (key.clone(), table.map_columns(robust_zscores)))
            .collect();

        log::info!(
            "computed z-scores for {} columns across {} clusters",
            zscores.values().map(|t| t.n_cols()).sum::<usize>(),
            zscores.len()
        );
        self.zscores = Some(zscores);
    }

    /// The `n` columns with the largest peak absolute z-score, highest first.
    ///
    /// Equal scores keep cluster-key then column order. Columns with no
    /// present values score `NaN` and rank last.
    pub fn top_anomalies(&self, n: usize) -> Result<Vec<AnomalyRecord>> {
        let zscores = self.zscores.as_ref().ok_or(OutlierError::NotComputed)?;

        let mut records: Vec<AnomalyRecord> = zscores
            .iter()
            .flat_map(|(key, table)| {
                table.columns().iter().map(move |col| AnomalyRecord {
                    cluster: key.clone(),
                    metric: col.name.clone(),
                    score: peak_abs(&col.values),
                })
            })
            .collect();

        records.sort_by(|a, b| by_score_desc(a.score, b.score));
        records.truncate(n);
        Ok(records)
    }

    /// Long-form `(cluster, metric, row_index, zscore)` records of every
    /// present z-score.
    pub fn chart_points(&self) -> Result<Vec<ChartPoint>> {
        let zscores = self.zscores.as_ref().ok_or(OutlierError::NotComputed)?;
        Ok(long_form(zscores))
    }

    /// Hand the long-form z-scores to a chart renderer.
    pub fn plot<S: ChartSink + ?Sized>(&self, sink: &mut S) -> Result<()> {
        let points = self.chart_points()?;
        sink.render(CHART_TITLE, points);
        Ok(())
    }
}

fn by_score_desc(a: f64, b: f64) -> Ordering {
    b.partial_cmp(&a)
        .unwrap_or_else(|| a.is_nan().cmp(&b.is_nan()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::{MetricTable, Series};

    fn frames() -> ClusterFrames {
        let index: Vec<String> = (0..3).map(|i| i.to_string()).collect();
        let table = MetricTable::new(
            index,
            vec![
                Series::new("metric1", vec![1.0, 2.0, 3.0]),
                Series::new("metric2", vec![4.0, 5.0, 6.0]),
            ],
        )
        .unwrap();
        ClusterFrames::from([("cluster1_scope".to_string(), table)])
    }

    #[test]
    fn test_zscore_computation() {
        let mut detector = MadZScoreDetector::new(frames());
        detector.compute();

        let zscores = detector.zscores().unwrap();
        assert!(zscores.contains_key("cluster1_scope"));

        let result = detector.top_anomalies(1).unwrap();
        assert_eq!(result.len(), 1);
        let table_max = zscores["cluster1_scope"]
            .columns()
            .iter()
            .map(|c| peak_abs(&c.values))
            .fold(f64::MIN, f64::max);
        assert_eq!(result[0].score, table_max);
    }

    #[test]
    fn test_requires_compute() {
        let mut detector = MadZScoreDetector::new(frames());
        assert!(!detector.is_computed());
        assert!(matches!(detector.top_anomalies(3), Err(OutlierError::NotComputed)));
        assert!(matches!(detector.chart_points(), Err(OutlierError::NotComputed)));

        detector.compute();
        assert!(detector.is_computed());
        assert!(detector.top_anomalies(3).is_ok());
    }

    #[test]
    fn test_equal_scores_keep_cluster_then_column_order() {
        let index: Vec<String> = (0..3).map(|i| i.to_string()).collect();
        let series = |name: &str| Series::new(name, vec![1.0, 2.0, 3.0]);
        let frames = ClusterFrames::from([
            (
                "b_x".to_string(),
                MetricTable::new(index.clone(), vec![series("b.p=1")]).unwrap(),
            ),
            (
                "a_x".to_string(),
                MetricTable::new(index, vec![series("a.p=2"), series("a.p=1")]).unwrap(),
            ),
        ]);

        let mut detector = MadZScoreDetector::new(frames);
        detector.compute();

        let first = detector.top_anomalies(10).unwrap();
        let order: Vec<(&str, &str)> = first
            .iter()
            .map(|r| (r.cluster.as_str(), r.metric.as_str()))
            .collect();
        assert_eq!(order, vec![("a_x", "a.p=2"), ("a_x", "a.p=1"), ("b_x", "b.p=1")]);
        assert!(first.iter().all(|r| r.score == 0.6745));

        assert_eq!(detector.top_anomalies(10).unwrap(), first);
        detector.compute();
        assert_eq!(detector.top_anomalies(10).unwrap(), first);
    }

    #[test]
    fn test_compute_is_idempotent() {
        let mut detector = MadZScoreDetector::new(frames());
        detector.compute();
        let first = detector.zscores().cloned();
        detector.compute();
        assert_eq!(detector.zscores().cloned(), first);
    }

    #[test]
    fn test_zero_n_is_empty() {
        let mut detector = MadZScoreDetector::new(frames());
        detector.compute();
        assert!(detector.top_anomalies(0).unwrap().is_empty());
        assert_eq!(detector.top_anomalies(10).unwrap().len(), 2);
    }

    #[test]
    fn test_nan_scores_rank_last() {
        let mut scores = [f64::NAN, 1.0, 3.0, f64::NAN, 2.0];
        scores.sort_by(|a, b| by_score_desc(*a, *b));
        assert_eq!(&scores[..3], &[3.0, 2.0, 1.0]);
        assert!(scores[3].is_nan() && scores[4].is_nan());
    }
}
