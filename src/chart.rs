use eframe::egui::Color32;

use crate::color::{comparison_color, metric_color};
use crate::data::align::AlignedView;
use crate::data::filter::Visibility;
use crate::data::model::{Metric, TimeSeries};

// ---------------------------------------------------------------------------
// Renderer input
// ---------------------------------------------------------------------------

/// One line of a chart. `values[i]` belongs to `ChartData::labels[i]`.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderableDataset {
    pub label: String,
    pub values: Vec<Option<f64>>,
    pub hidden: bool,
    pub color: Color32,
}

impl RenderableDataset {
    /// Runs of consecutive present values as `[year, value]` points.
    /// An absent value ends a run, so the line shows a gap there.
    pub fn segments(&self, labels: &[i32]) -> Vec<Vec<[f64; 2]>> {
        let mut segments = Vec::new();
        let mut current = Vec::new();

        for (year, value) in labels.iter().zip(&self.values) {
            match value {
                Some(v) => current.push([*year as f64, *v]),
                None if !current.is_empty() => segments.push(std::mem::take(&mut current)),
                None => {}
            }
        }
        if !current.is_empty() {
            segments.push(current);
        }
        segments
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct ChartData {
    /// x-axis categories.
    pub labels: Vec<i32>,
    pub datasets: Vec<RenderableDataset>,
}

// ---------------------------------------------------------------------------
// Projections
// ---------------------------------------------------------------------------

/// Per-series chart: one dataset per metric, hidden according to the filter.
pub fn project(series: &TimeSeries, visibility: Visibility) -> ChartData {
    let datasets = Metric::ALL
        .iter()
        .map(|&metric| RenderableDataset {
            label: metric.canonical_label().to_string(),
            values: series.values(metric).iter().copied().map(Some).collect(),
            hidden: !visibility.is_visible(metric),
            color: metric_color(metric),
        })
        .collect();

    ChartData {
        labels: series.years().to_vec(),
        datasets,
    }
}

/// Comparison chart: every metric of both aligned series, nothing hidden.
/// `names` are the display names of the first and second series.
pub fn project_comparison(view: &AlignedView, names: [&str; 2]) -> ChartData {
    let mut datasets = Vec::with_capacity(6);

    for (index, (series, name)) in [&view.first, &view.second].into_iter().zip(names).enumerate() {
        for metric in Metric::ALL {
            datasets.push(RenderableDataset {
                label: format!("{name}: {}", metric.name()),
                values: series.values(metric).to_vec(),
                hidden: false,
                color: comparison_color(metric, index),
            });
        }
    }

    ChartData {
        labels: view.years.clone(),
        datasets,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::align::align;
    use crate::data::filter::ViewFilter;
    use crate::data::model::SeriesId;

    fn sample() -> TimeSeries {
        let mut ts = TimeSeries::empty();
        ts.push(2015, 40.0, 10.0, 50.0);
        ts.push(2018, 35.0, 15.0, 50.0);
        ts
    }

    #[test]
    fn per_series_projection_follows_filter() {
        let chart = project(&sample(), ViewFilter::BuiltupOnly.visibility());

        assert_eq!(chart.labels, vec![2015, 2018]);
        assert_eq!(chart.datasets.len(), 3);
        let hidden: Vec<bool> = chart.datasets.iter().map(|d| d.hidden).collect();
        assert_eq!(hidden, vec![true, false, true]);
        assert_eq!(chart.datasets[1].label, "Built-up (%)");
        assert_eq!(chart.datasets[1].values, vec![Some(10.0), Some(15.0)]);
    }

    #[test]
    fn empty_series_projects_empty_lines() {
        let chart = project(&TimeSeries::empty(), ViewFilter::All.visibility());
        assert!(chart.labels.is_empty());
        assert!(chart.datasets.iter().all(|d| d.values.is_empty() && !d.hidden));
    }

    #[test]
    fn comparison_projection_keeps_gaps() {
        let mut other = TimeSeries::empty();
        other.push(2016, 1.0, 2.0, 3.0);
        let view = align(&SeriesId::from("a"), &sample(), &SeriesId::from("b"), &other);
        let chart = project_comparison(&view, ["Lake", "Canal"]);

        assert_eq!(chart.labels, vec![2015, 2016, 2018]);
        assert_eq!(chart.datasets.len(), 6);
        assert_eq!(chart.datasets[0].label, "Lake: Water");
        assert_eq!(chart.datasets[0].values, vec![Some(40.0), None, Some(35.0)]);
        assert_eq!(chart.datasets[3].label, "Canal: Water");
        assert_eq!(chart.datasets[3].values, vec![None, Some(1.0), None]);
    }

    #[test]
    fn segments_split_on_absent_values() {
        let dataset = RenderableDataset {
            label: "x".into(),
            values: vec![Some(1.0), Some(2.0), None, Some(4.0), None],
            hidden: false,
            color: Color32::WHITE,
        };
        let segments = dataset.segments(&[2000, 2001, 2002, 2003, 2004]);

        assert_eq!(
            segments,
            vec![vec![[2000.0, 1.0], [2001.0, 2.0]], vec![[2003.0, 4.0]]]
        );
    }
}
