use eframe::egui::{self, Color32, RichText, ScrollArea, Ui};

use crate::data::model::AgeGroup;
use crate::state::{AppState, View};

// ---------------------------------------------------------------------------
// Left side panel – filter widgets
// ---------------------------------------------------------------------------

/// Render the left filter panel.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Filters");
    ui.separator();

    let Some(dataset) = &state.dataset else {
        ui.label("No dataset loaded.");
        return;
    };

    // Clone the name list so we can mutate state inside the loop.
    let neighborhoods: Vec<String> = dataset.neighborhoods.iter().cloned().collect();

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            // ---- Age groups (drives the age/gender chart) ----
            let header = format!(
                "Age groups  ({}/{})",
                state.filters.age_groups.len(),
                AgeGroup::ALL.len()
            );
            egui::CollapsingHeader::new(RichText::new(header).strong())
                .id_salt("age_groups")
                .default_open(true)
                .show(ui, |ui: &mut Ui| {
                    ui.horizontal(|ui: &mut Ui| {
                        if ui.small_button("All").clicked() {
                            state.select_all_age_groups();
                        }
                        if ui.small_button("None").clicked() {
                            state.select_no_age_groups();
                        }
                    });

                    for group in AgeGroup::ALL {
                        let mut checked = state.filters.age_groups.contains(&group);
                        if ui.checkbox(&mut checked, group.label()).changed() {
                            state.toggle_age_group(group);
                        }
                    }
                });

            // ---- Neighborhoods (drives the neighborhood chart) ----
            let header = format!(
                "Neighborhoods  ({}/{})",
                state.filters.neighborhoods.len(),
                neighborhoods.len()
            );
            egui::CollapsingHeader::new(RichText::new(header).strong())
                .id_salt("neighborhoods")
                .default_open(false)
                .show(ui, |ui: &mut Ui| {
                    ui.horizontal(|ui: &mut Ui| {
                        if ui.small_button("All").clicked() {
                            state.select_all_neighborhoods();
                        }
                        if ui.small_button("None").clicked() {
                            state.select_no_neighborhoods();
                        }
                    });

                    for name in &neighborhoods {
                        let mut checked = state.filters.neighborhoods.contains(name);
                        if ui.checkbox(&mut checked, name).changed() {
                            state.toggle_neighborhood(name);
                        }
                    }
                });
        });
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

        if ui
            .selectable_label(state.view == View::Dashboard, "Dashboard")
            .clicked()
        {
            state.view = View::Dashboard;
        }
        if ui
            .selectable_label(state.view == View::Table, "Records")
            .clicked()
        {
            state.view = View::Table;
        }

        ui.separator();

        if let Some(ds) = &state.dataset {
            let age_rows: u64 = state.charts.age_summaries.iter().map(|s| s.count).sum();
            let neighborhood_rows: u64 = state.charts.neighborhood_counts.values().sum();
            ui.label(format!(
                "{} appointments · {age_rows} in age selection · {neighborhood_rows} in neighborhood selection",
                ds.len()
            ));
        }

        if let Some(msg) = &state.status_message {
            ui.label(RichText::new(msg).color(Color32::RED));
        }
    });
}

// ---------------------------------------------------------------------------
// File dialog
// ---------------------------------------------------------------------------

/// Load a replacement dataset at runtime. Unlike the startup load, a
/// failure here keeps the current dataset and surfaces as a status message.
pub fn open_file_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Open appointment data")
        .add_filter("Supported files", &["csv", "json", "parquet", "pq"])
        .add_filter("CSV", &["csv"])
        .add_filter("JSON", &["json"])
        .add_filter("Parquet", &["parquet", "pq"])
        .pick_file();

    if let Some(path) = file {
        match crate::data::loader::load_file(&path) {
            Ok(dataset) => {
                log::info!(
                    "Loaded {} appointments across {} neighborhoods",
                    dataset.len(),
                    dataset.neighborhoods.len()
                );
                state.set_dataset(dataset);
            }
            Err(e) => {
                log::error!("Failed to load file: {e:#}");
                state.status_message = Some(format!("Error: {e:#}"));
            }
        }
    }
}
