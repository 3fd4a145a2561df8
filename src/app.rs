use eframe::egui::{self, ScrollArea};
use tokio::runtime::Runtime;

use crate::state::AppState;
use crate::ui::{gallery, panels, plot};

// ---------------------------------------------------------------------------
// eframe App implementation
// ---------------------------------------------------------------------------

pub struct DashboardApp {
    pub state: AppState,
    /// Runs reloads requested from the UI.
    runtime: Runtime,
}

impl DashboardApp {
    pub fn new(state: AppState, runtime: Runtime) -> Self {
        Self { state, runtime }
    }
}

impl eframe::App for DashboardApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // ---- Top panel: menu bar ----
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            panels::top_bar(ui, &mut self.state, &self.runtime);
        });

        // ---- Left side panel: view filters ----
        egui::SidePanel::left("filter_panel")
            .default_width(220.0)
            .resizable(true)
            .show(ctx, |ui| {
                panels::side_panel(ui, &mut self.state);
            });

        // ---- Central panel: charts and galleries ----
        egui::CentralPanel::default().show(ctx, |ui| {
            ScrollArea::vertical()
                .auto_shrink([false, false])
                .show(ui, |ui| {
                    plot::dashboard(ui, &mut self.state);
                });
        });

        gallery::preview_window(ctx, &mut self.state);
    }
}
