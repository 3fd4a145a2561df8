use eframe::egui::{Color32, RichText, Ui};
use egui_plot::{Legend, Line, Plot, PlotPoints, Points};

use crate::chart::ChartData;
use crate::state::AppState;
use crate::ui::gallery;

// ---------------------------------------------------------------------------
// Line charts (central panel)
// ---------------------------------------------------------------------------

const SERIES_PLOT_HEIGHT: f32 = 260.0;
const COMPARISON_PLOT_HEIGHT: f32 = 320.0;

/// Render per-series charts with their galleries, then the comparison chart.
pub fn dashboard(ui: &mut Ui, state: &mut AppState) {
    let entries: Vec<_> = state
        .config
        .series
        .iter()
        .map(|s| (s.series_id(), s.display_name().to_string()))
        .collect();

    for (id, name) in &entries {
        let accent = state.accents.get(id).copied().unwrap_or(Color32::LIGHT_BLUE);
        ui.heading(RichText::new(name).color(accent));

        if let Some(notice) = state.notices.get(id) {
            ui.label(RichText::new(notice).color(Color32::RED));
        } else {
            match state.series_chart(id) {
                Some(chart) if !chart.labels.is_empty() => {
                    chart_plot(ui, &format!("series_plot_{id}"), &chart, SERIES_PLOT_HEIGHT);
                }
                _ => {
                    ui.label("No data available for this water body.");
                }
            }
        }

        gallery::gallery_strip(ui, state, id);
        ui.separator();
    }

    let Some(chart) = state.comparison_chart() else {
        return;
    };
    ui.heading("Comparison");
    if chart.labels.is_empty() {
        ui.label("No data to compare.");
    } else {
        chart_plot(ui, "comparison_plot", &chart, COMPARISON_PLOT_HEIGHT);
    }
}

/// Draw one chart. Hidden datasets are skipped; absent values leave gaps.
pub fn chart_plot(ui: &mut Ui, id: &str, chart: &ChartData, height: f32) {
    Plot::new(id)
        .legend(Legend::default())
        .height(height)
        .x_axis_label("Year")
        .y_axis_label("Cover (%)")
        .include_y(0.0)
        .include_y(100.0)
        .allow_boxed_zoom(true)
        .allow_drag(true)
        .allow_scroll(false)
        .allow_zoom(true)
        .show(ui, |plot_ui| {
            for dataset in chart.datasets.iter().filter(|d| !d.hidden) {
                for segment in dataset.segments(&chart.labels) {
                    let line_points: PlotPoints = segment.iter().copied().collect();
                    let markers: PlotPoints = segment.iter().copied().collect();

                    plot_ui.line(
                        Line::new(line_points)
                            .name(&dataset.label)
                            .color(dataset.color)
                            .width(2.0),
                    );
                    plot_ui.points(
                        Points::new(markers)
                            .name(&dataset.label)
                            .color(dataset.color)
                            .radius(3.0),
                    );
                }
            }
        });
}
