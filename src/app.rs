use eframe::egui;

use crate::state::{AppState, View};
use crate::ui::{charts, panels, table};

// ---------------------------------------------------------------------------
// eframe App implementation
// ---------------------------------------------------------------------------

pub struct ShowUpApp {
    pub state: AppState,
}

impl ShowUpApp {
    pub fn new(state: AppState) -> Self {
        Self { state }
    }
}

impl eframe::App for ShowUpApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // ---- Top panel: menu bar ----
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            panels::top_bar(ui, &mut self.state);
        });

        // ---- Left side panel: filters ----
        egui::SidePanel::left("filter_panel")
            .default_width(240.0)
            .resizable(true)
            .show(ctx, |ui| {
                panels::side_panel(ui, &mut self.state);
            });

        // ---- Central panel: charts or record table ----
        egui::CentralPanel::default().show(ctx, |ui| match self.state.view {
            View::Dashboard => charts::dashboard(ui, &self.state),
            View::Table => table::records_table(ui, &self.state),
        });
    }
}
