use std::collections::{BTreeMap, BTreeSet};

use rusty_outlier::chart::{ChartPoint, ChartSink};
use rusty_outlier::{AnomalyRecord, MadZScoreDetector, MetricCleaner, MetricTable, Settings};

use crate::color::ColorMap;

// ---------------------------------------------------------------------------
// Chart data received from the detector
// ---------------------------------------------------------------------------

/// Z-score lines grouped for drawing: (cluster, metric) → `[row, z]` points.
#[derive(Debug, Default)]
pub struct ChartData {
    pub title: String,
    pub lines: BTreeMap<(String, String), Vec<[f64; 2]>>,
}

impl ChartSink for ChartData {
    fn render(&mut self, title: &str, points: Vec<ChartPoint>) {
        self.title = title.to_string();
        self.lines.clear();
        for p in points {
            self.lines
                .entry((p.cluster, p.metric))
                .or_default()
                .push([p.row_index as f64, p.zscore]);
        }
    }
}

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The full UI state, independent of rendering.
pub struct AppState {
    /// Loaded table (None until user loads a file).
    pub table: Option<MetricTable>,

    /// Pipeline settings edited in the side panel.
    pub settings: Settings,

    /// Column count per cluster key from the last run.
    pub cluster_sizes: BTreeMap<String, usize>,

    /// Highest-scoring columns from the last run.
    pub anomalies: Vec<AnomalyRecord>,

    /// Long-form z-scores from the last run.
    pub chart: ChartData,

    /// Clusters the user has hidden from the plot.
    pub hidden_clusters: BTreeSet<String>,

    /// Colour per cluster key.
    pub color_map: ColorMap,

    /// Status / error message shown in the UI.
    pub status_message: Option<String>,
}

impl AppState {
    pub fn with_settings(settings: Settings) -> Self {
        Self {
            table: None,
            settings,
            cluster_sizes: BTreeMap::new(),
            anomalies: Vec::new(),
            chart: ChartData::default(),
            hidden_clusters: BTreeSet::new(),
            color_map: ColorMap::default(),
            status_message: None,
        }
    }

    /// Ingest a newly loaded table and score it with the current settings.
    pub fn set_table(&mut self, table: MetricTable) {
        self.table = Some(table);
        self.hidden_clusters.clear();
        self.run_detection();
    }

    /// Clean, score and rank the loaded table, replacing previous results.
    pub fn run_detection(&mut self) {
        let Some(table) = &self.table else {
            return;
        };

        let cleaner = match MetricCleaner::new(table, self.settings.cleaner.clone()) {
            Ok(c) => c,
            Err(e) => {
                log::error!("Cleaning failed: {e}");
                self.clear_results();
                self.status_message = Some(format!("Error: {e}"));
                return;
            }
        };

        self.cluster_sizes = cleaner
            .cluster_frames()
            .iter()
            .map(|(k, t)| (k.clone(), t.n_cols()))
            .collect();
        self.color_map = ColorMap::new(self.cluster_sizes.keys());

        let mut detector = MadZScoreDetector::new(cleaner.into_cluster_frames());
        detector.compute();

        let result = detector
            .top_anomalies(self.settings.top_n)
            .and_then(|top| {
                detector.plot(&mut self.chart)?;
                Ok(top)
            });

        match result {
            Ok(top) => {
                for rec in &top {
                    log::info!("{:>10.3}  {}  {}", rec.score, rec.cluster, rec.metric);
                }
                self.anomalies = top;
                self.status_message = None;
            }
            Err(e) => {
                log::error!("Scoring failed: {e}");
                self.clear_results();
                self.status_message = Some(format!("Error: {e}"));
            }
        }
    }

    /// Forget the last run so the panels never show results for other settings.
    fn clear_results(&mut self) {
        self.cluster_sizes.clear();
        self.anomalies.clear();
        self.chart = ChartData::default();
        self.color_map = ColorMap::default();
    }

    /// Show or hide one cluster's lines.
    pub fn toggle_cluster(&mut self, cluster: &str) {
        if !self.hidden_clusters.remove(cluster) {
            self.hidden_clusters.insert(cluster.to_string());
        }
    }
}
