use eframe::egui::{self, Color32, RichText, ScrollArea, Ui};

use crate::state::AppState;

// ---------------------------------------------------------------------------
// Left side panel – settings, clusters, top anomalies
// ---------------------------------------------------------------------------

/// Render the left settings / results panel.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Detection");
    ui.separator();

    let mut rerun = false;

    ui.strong("Dimension");
    rerun |= ui
        .text_edit_singleline(&mut state.settings.cleaner.dimension_name)
        .lost_focus();

    ui.strong("Cluster tag");
    rerun |= ui
        .text_edit_singleline(&mut state.settings.cleaner.separator_tag)
        .lost_focus();

    rerun |= ui
        .checkbox(&mut state.settings.cleaner.drop_incomplete, "Drop incomplete columns")
        .changed();

    ui.horizontal(|ui: &mut Ui| {
        ui.label("Top N");
        rerun |= ui
            .add(egui::DragValue::new(&mut state.settings.top_n).range(1..=100))
            .changed();
    });

    if ui.button("Run detection").clicked() {
        rerun = true;
    }
    ui.separator();

    let clusters: Vec<(String, usize)> = state
        .cluster_sizes
        .iter()
        .map(|(k, n)| (k.clone(), *n))
        .collect();

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            // ---- Cluster visibility ----
            egui::CollapsingHeader::new(
                RichText::new(format!("Clusters  ({})", clusters.len())).strong(),
            )
            .default_open(true)
            .show(ui, |ui: &mut Ui| {
                for (cluster, n_cols) in &clusters {
                    let mut visible = !state.hidden_clusters.contains(cluster);
                    let text = RichText::new(format!("{cluster}  ({n_cols})"))
                        .color(state.color_map.color_for(cluster));
                    if ui.checkbox(&mut visible, text).changed() {
                        state.toggle_cluster(cluster);
                    }
                }
            });

            // ---- Ranking ----
            egui::CollapsingHeader::new(RichText::new("Top anomalies").strong())
                .default_open(true)
                .show(ui, |ui: &mut Ui| {
                    egui::Grid::new("top_anomalies")
                        .striped(true)
                        .show(ui, |ui: &mut Ui| {
                            ui.strong("Score");
                            ui.strong("Cluster");
                            ui.strong("Metric");
                            ui.end_row();
                            for rec in &state.anomalies {
                                ui.label(format!("{:.3}", rec.score));
                                ui.label(
                                    RichText::new(&rec.cluster)
                                        .color(state.color_map.color_for(&rec.cluster)),
                                );
                                ui.label(&rec.metric);
                                ui.end_row();
                            }
                        });
                });
        });

    if rerun {
        state.run_detection();
    }
}

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top menu / toolbar.
pub fn top_bar(ui: &mut Ui, state: &mut AppState) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.menu_button("File", |ui: &mut Ui| {
            if ui.button("Open…").clicked() {
                open_file_dialog(state);
                ui.close_menu();
            }
        });

        ui.separator();

        if let Some(table) = &state.table {
            ui.label(format!(
                "{} columns × {} rows loaded, {} clusters",
                table.n_cols(),
                table.n_rows(),
                state.cluster_sizes.len()
            ));
        }

        if let Some(msg) = &state.status_message {
            ui.separator();
            ui.label(RichText::new(msg).color(Color32::RED));
        }
    });
}

// ---------------------------------------------------------------------------
// File dialog
// ---------------------------------------------------------------------------

pub fn open_file_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Open metric table")
        .add_filter("Supported files", &["parquet", "pq", "json", "csv"])
        .add_filter("Parquet", &["parquet", "pq"])
        .add_filter("JSON", &["json"])
        .add_filter("CSV", &["csv"])
        .pick_file();

    if let Some(path) = file {
        match rusty_outlier::data::loader::load_file(&path) {
            Ok(table) => state.set_table(table),
            Err(e) => {
                log::error!("Failed to load file: {e:#}");
                state.status_message = Some(format!("Error: {e:#}"));
            }
        }
    }
}
