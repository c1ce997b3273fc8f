use eframe::egui::Ui;
use egui_plot::{Legend, Line, Plot, PlotPoints};

use crate::state::AppState;

// ---------------------------------------------------------------------------
// Z-score plot (central panel)
// ---------------------------------------------------------------------------

/// Render one line per (cluster, metric), coloured and labelled by cluster.
pub fn zscore_plot(ui: &mut Ui, state: &AppState) {
    if state.table.is_none() {
        ui.centered_and_justified(|ui: &mut Ui| {
            ui.heading("Open a metric table to score it  (File → Open…)");
        });
        return;
    }

    ui.heading(&state.chart.title);

    Plot::new("zscore_plot")
        .legend(Legend::default())
        .x_axis_label("Row")
        .y_axis_label("Robust z-score")
        .allow_boxed_zoom(true)
        .allow_drag(true)
        .allow_scroll(true)
        .allow_zoom(true)
        .show(ui, |plot_ui| {
            for ((cluster, _metric), points) in &state.chart.lines {
                if state.hidden_clusters.contains(cluster) {
                    continue;
                }
                // Lines share the cluster name so the legend groups them.
                let line = Line::new(PlotPoints::new(points.clone()))
                    .name(cluster)
                    .color(state.color_map.color_for(cluster))
                    .width(1.5);

                plot_ui.line(line);
            }
        });
}
