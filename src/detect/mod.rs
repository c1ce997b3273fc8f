//! Robust anomaly scoring.

pub mod mad;
pub mod stats;

pub use mad::{AnomalyRecord, DEFAULT_TOP_N, MadZScoreDetector};
