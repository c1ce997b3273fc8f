//! Data layer: table model, column-name parsing, dimension filter, loading.
//!
//! Architecture:
//! ```text
//!  .parquet / .json / .csv
//!        │
//!        ▼
//!   ┌──────────┐
//!   │  loader   │  parse file → MetricTable   (binaries only)
//!   └──────────┘
//!        │
//!        ▼
//!   ┌─────────────┐
//!   │ MetricTable  │  index + Vec<Series>
//!   └─────────────┘
//!        │
//!        ▼
//!   ┌──────────┐      ┌───────────┐
//!   │  filter   │ ───▶ │ column_id │  dimension match, then parse name
//!   └──────────┘      └───────────┘  → ClusterKey
//! ```

pub mod column_id;
pub mod filter;
pub mod loader;
pub mod model;
