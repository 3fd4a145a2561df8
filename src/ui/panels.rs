use eframe::egui::{self, Color32, RichText, ScrollArea, Ui};
use tokio::runtime::Runtime;

use crate::data::filter::ViewFilter;
use crate::data::loader::DataSource;
use crate::data::model::SeriesId;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Left side panel – view filter toggles
// ---------------------------------------------------------------------------

/// Render the left filter panel.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    ui.heading("View");
    ui.separator();

    let entries: Vec<(SeriesId, String)> = state
        .config
        .series
        .iter()
        .map(|s| (s.series_id(), s.display_name().to_string()))
        .collect();

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            for (id, name) in &entries {
                let accent = state.accents.get(id).copied().unwrap_or(Color32::LIGHT_BLUE);
                ui.label(RichText::new(name).strong().color(accent));

                let current = state.filters.get(id);
                let mut selected = None;
                ui.horizontal_wrapped(|ui: &mut Ui| {
                    for filter in ViewFilter::ALL {
                        if ui.selectable_label(current == filter, filter.label()).clicked() {
                            selected = Some(filter);
                        }
                    }
                });
                if let Some(filter) = selected {
                    state.select_filter(id, filter);
                }

                let n_years = state.store.get(id).map_or(0, |s| s.len());
                ui.weak(format!("{n_years} yearly records"));
                ui.add_space(8.0);
            }
        });
}

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top menu / toolbar.
pub fn top_bar(ui: &mut Ui, state: &mut AppState, runtime: &Runtime) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.menu_button("File", |ui: &mut Ui| {
            let entries: Vec<(SeriesId, String)> = state
                .config
                .series
                .iter()
                .map(|s| (s.series_id(), s.display_name().to_string()))
                .collect();

            for (id, name) in entries {
                if ui.button(format!("Load {name} from file…")).clicked() {
                    ui.close_menu();
                    open_file_dialog(state, runtime, &id);
                }
            }
        });

        ui.separator();

        let loaded = state
            .config
            .series
            .iter()
            .filter(|s| state.store.get(&s.series_id()).is_some_and(|ts| !ts.is_empty()))
            .count();
        ui.label(format!("{loaded}/{} water bodies loaded", state.config.series.len()));

        if let Some(msg) = &state.status_message {
            ui.separator();
            ui.label(RichText::new(msg).color(Color32::RED));
        }
    });
}

// ---------------------------------------------------------------------------
// File dialog
// ---------------------------------------------------------------------------

pub fn open_file_dialog(state: &mut AppState, runtime: &Runtime, id: &SeriesId) {
    let file = rfd::FileDialog::new()
        .set_title(format!("Open data for {}", state.display_name(id)))
        .add_filter("Supported files", &["csv", "json", "parquet", "pq"])
        .add_filter("CSV", &["csv"])
        .add_filter("JSON", &["json"])
        .add_filter("Parquet", &["parquet", "pq"])
        .pick_file();

    if let Some(path) = file {
        log::info!("reloading {id} from {}", path.display());
        runtime.block_on(state.reload_series(id, &DataSource::File(path)));
    }
}
