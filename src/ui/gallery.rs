use eframe::egui::{self, Context, ScrollArea, Sense, Ui};

use crate::data::model::SeriesId;
use crate::state::AppState;

const THUMBNAIL_HEIGHT: f32 = 110.0;

/// Horizontal strip of yearly composites; a click opens the preview.
pub fn gallery_strip(ui: &mut Ui, state: &mut AppState, id: &SeriesId) {
    let Some(images) = state.galleries.get(id) else {
        return;
    };
    if images.is_empty() {
        return;
    }

    let mut clicked = None;

    ScrollArea::horizontal()
        .id_salt(format!("gallery_{id}"))
        .show(ui, |ui: &mut Ui| {
            ui.horizontal(|ui: &mut Ui| {
                for image in images {
                    ui.vertical(|ui: &mut Ui| {
                        let response = ui
                            .add(
                                egui::Image::new(image.uri())
                                    .max_height(THUMBNAIL_HEIGHT)
                                    .rounding(4.0)
                                    .sense(Sense::click()),
                            )
                            .on_hover_text("Click to enlarge");
                        ui.label(image.year.to_string());
                        if response.clicked() {
                            clicked = Some(image.clone());
                        }
                    });
                }
            });
        });

    if let Some(image) = clicked {
        state.open_preview(image);
    }
}

/// The single shared full-size preview window.
pub fn preview_window(ctx: &Context, state: &mut AppState) {
    let Some(image) = state.preview.clone() else {
        return;
    };

    let mut open = true;
    egui::Window::new(format!("Composite {}", image.year))
        .id(egui::Id::new("image_preview"))
        .open(&mut open)
        .collapsible(false)
        .resizable(true)
        .default_size([720.0, 540.0])
        .show(ctx, |ui: &mut Ui| {
            ui.add(egui::Image::new(image.uri()).shrink_to_fit());
        });

    if !open {
        state.close_preview();
    }
}
