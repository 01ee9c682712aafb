use eframe::egui::Ui;
use egui_extras::{Column, TableBuilder};

use crate::data::model::day_name;
use crate::state::AppState;

/// Rows shown in the record table before truncating.
const MAX_ROWS: usize = 1_000;

// ---------------------------------------------------------------------------
// Enriched-record table (central panel, "Records" view)
// ---------------------------------------------------------------------------

pub fn records_table(ui: &mut Ui, state: &AppState) {
    let Some(dataset) = &state.dataset else {
        ui.label("No dataset loaded.");
        return;
    };

    let n_rows = dataset.len().min(MAX_ROWS);
    if dataset.len() > MAX_ROWS {
        ui.label(format!(
            "Showing the first {MAX_ROWS} of {} records.",
            dataset.len()
        ));
    }

    TableBuilder::new(ui)
        .striped(true)
        .resizable(true)
        .columns(Column::auto(), 10)
        .header(20.0, |mut header| {
            for title in [
                "Scheduled",
                "Appointment",
                "Age",
                "Gender",
                "Neighborhood",
                "Chronic",
                "Wait (days)",
                "Wait group",
                "Weekday",
                "Attendance",
            ] {
                header.col(|ui| {
                    ui.strong(title);
                });
            }
        })
        .body(|body| {
            body.rows(18.0, n_rows, |mut row| {
                let r = &dataset.records[row.index()];
                row.col(|ui| {
                    ui.label(r.scheduled_at.format("%Y-%m-%d %H:%M").to_string());
                });
                row.col(|ui| {
                    ui.label(r.appointment_at.format("%Y-%m-%d").to_string());
                });
                row.col(|ui| {
                    ui.label(r.age.to_string());
                });
                row.col(|ui| {
                    ui.label(r.gender.label());
                });
                row.col(|ui| {
                    ui.label(&r.neighborhood);
                });
                row.col(|ui| {
                    ui.label(r.chronic_conditions.to_string());
                });
                row.col(|ui| {
                    ui.label(r.waiting_days.to_string());
                });
                row.col(|ui| {
                    ui.label(r.waiting_group.map_or("—", |g| g.label()));
                });
                row.col(|ui| {
                    ui.label(day_name(r.weekday));
                });
                row.col(|ui| {
                    ui.label(r.attendance.label());
                });
            });
        });
}
