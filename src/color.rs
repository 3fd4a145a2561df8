use eframe::egui::Color32;
use palette::{Darken, Hsl, IntoColor, Lighten, Srgb};

use crate::data::model::Metric;

// ---------------------------------------------------------------------------
// Metric colours
// ---------------------------------------------------------------------------

/// Fixed line colour per metric, same hues as the classification maps
/// (blue water, red built-up, green vegetation).
pub fn metric_color(metric: Metric) -> Color32 {
    match metric {
        Metric::Water => Color32::from_rgb(31, 119, 220),
        Metric::Builtup => Color32::from_rgb(214, 52, 52),
        Metric::Vegetation => Color32::from_rgb(46, 160, 67),
    }
}

/// Variant of the metric colour for the n-th series of a comparison chart.
/// The first series keeps the base colour, the second is lighter.
pub fn comparison_color(metric: Metric, series_index: usize) -> Color32 {
    let base = metric_color(metric);
    let rgb = Srgb::new(
        base.r() as f32 / 255.0,
        base.g() as f32 / 255.0,
        base.b() as f32 / 255.0,
    );
    let hsl: Hsl = rgb.into_color();
    let shaded = match series_index {
        0 => hsl.darken(0.1),
        _ => hsl.lighten(0.35),
    };
    to_color32(shaded)
}

// ---------------------------------------------------------------------------
// Color palette generator
// ---------------------------------------------------------------------------

/// Generates `n` visually distinct colours using evenly spaced hues.
pub fn generate_palette(n: usize) -> Vec<Color32> {
    if n == 0 {
        return Vec::new();
    }
    (0..n)
        .map(|i| {
            let hue = (i as f32 / n as f32) * 360.0;
            to_color32(Hsl::new(hue, 0.75, 0.55))
        })
        .collect()
}

fn to_color32(hsl: Hsl) -> Color32 {
    let rgb: Srgb = hsl.into_color();
    Color32::from_rgb(
        (rgb.red.clamp(0.0, 1.0) * 255.0) as u8,
        (rgb.green.clamp(0.0, 1.0) * 255.0) as u8,
        (rgb.blue.clamp(0.0, 1.0) * 255.0) as u8,
    )
}
