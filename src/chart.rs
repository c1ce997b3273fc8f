//! Long-form z-score records and the interface to an external chart renderer.
//!
//! Scoring code only produces [`ChartPoint`]s; whatever draws them sits behind
//! [`ChartSink`] and never leaks its own types back into the library.

use serde::Serialize;

use crate::clean::ClusterFrames;

/// Title handed to the renderer alongside the points.
pub const CHART_TITLE: &str = "MAD Z-Scores by Cluster";

/// One z-score cell in long form.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartPoint {
    pub cluster: String,
    pub metric: String,
    pub row_index: usize,
    pub zscore: f64,
}

/// A line-chart renderer: x = `row_index`, y = `zscore`, coloured by `cluster`.
pub trait ChartSink {
    fn render(&mut self, title: &str, points: Vec<ChartPoint>);
}

/// Flatten z-score tables to long form, cluster by cluster, column by
/// column, row by row. Missing cells are skipped.
pub fn long_form(zscores: &ClusterFrames) -> Vec<ChartPoint> {
    let mut points = Vec::new();
    for (cluster, table) in zscores {
        for col in table.columns() {
            points.extend(
                col.values
                    .iter()
                    .enumerate()
                    .filter(|(_, z)| !z.is_nan())
                    .map(|(row_index, &zscore)| ChartPoint {
                        cluster: cluster.clone(),
                        metric: col.name.clone(),
                        row_index,
                        zscore,
                    }),
            );
        }
    }
    points
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::{MetricTable, Series};

    #[test]
    fn test_long_form_skips_missing_cells() {
        let table = MetricTable::new(
            vec!["a".into(), "b".into()],
            vec![
                Series::new("m1", vec![0.5, f64::NAN]),
                Series::new("m2", vec![-1.0, 2.0]),
            ],
        )
        .unwrap();
        let frames = ClusterFrames::from([("c1_dc".to_string(), table)]);

        let points = long_form(&frames);
        assert_eq!(points.len(), 3);
        assert_eq!(
            points[0],
            ChartPoint {
                cluster: "c1_dc".into(),
                metric: "m1".into(),
                row_index: 0,
                zscore: 0.5,
            }
        );
        assert_eq!(points[2].metric, "m2");
        assert_eq!(points[2].row_index, 1);
    }

    #[test]
    fn test_point_serializes_with_field_names() {
        let point = ChartPoint {
            cluster: "c".into(),
            metric: "m".into(),
            row_index: 4,
            zscore: 1.5,
        };
        let json = serde_json::to_value(&point).unwrap();
        assert_eq!(json["row_index"], 4);
        assert_eq!(json["zscore"], 1.5);
    }
}
