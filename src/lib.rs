//! Robust anomaly scoring for tagged, multi-cluster telemetry.
//!
//! ```text
//!  MetricTable ──▶ MetricCleaner ──▶ ClusterFrames ──▶ MadZScoreDetector
//!                  (dimension filter,                   (compute → zscores,
//!                   parse, partition)                    top_anomalies, plot)
//! ```

pub mod chart;
pub mod clean;
pub mod config;
pub mod data;
pub mod detect;
pub mod error;

pub use chart::{ChartPoint, ChartSink};
pub use clean::{CleanerConfig, ClusterFrames, MetricCleaner};
pub use config::Settings;
pub use data::model::{MetricTable, Series};
pub use detect::{AnomalyRecord, MadZScoreDetector};
pub use error::{OutlierError, Result};
