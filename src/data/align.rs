use std::collections::BTreeSet;

use super::model::{Metric, SeriesId, TimeSeries};

// ---------------------------------------------------------------------------
// Aligned view of two series on a shared year axis
// ---------------------------------------------------------------------------

/// One series re-indexed onto the shared axis. `None` marks a year the
/// series has no row for.
#[derive(Debug, Clone, PartialEq)]
pub struct AlignedSeries {
    pub id: SeriesId,
    values: [Vec<Option<f64>>; 3],
}

impl AlignedSeries {
    pub fn values(&self, metric: Metric) -> &[Option<f64>] {
        &self.values[metric.index()]
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct AlignedView {
    /// Sorted, deduplicated union of both series' years.
    pub years: Vec<i32>,
    pub first: AlignedSeries,
    pub second: AlignedSeries,
}

/// Merge two series onto the numerically sorted union of their years.
pub fn align(a_id: &SeriesId, a: &TimeSeries, b_id: &SeriesId, b: &TimeSeries) -> AlignedView {
    let years: Vec<i32> = a
        .years()
        .iter()
        .chain(b.years())
        .copied()
        .collect::<BTreeSet<i32>>()
        .into_iter()
        .collect();

    AlignedView {
        first: reindex(a_id, a, &years),
        second: reindex(b_id, b, &years),
        years,
    }
}

fn reindex(id: &SeriesId, series: &TimeSeries, years: &[i32]) -> AlignedSeries {
    let rows: Vec<Option<usize>> = years.iter().map(|&year| series.position_of(year)).collect();

    let values = Metric::ALL.map(|metric| {
        let column = series.values(metric);
        rows.iter()
            .map(|row| row.map(|i| column[i]))
            .collect::<Vec<_>>()
    });

    AlignedSeries {
        id: id.clone(),
        values,
    }
}
