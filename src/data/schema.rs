use super::model::{Metric, RawRow, RawValue, TimeSeries};

// ---------------------------------------------------------------------------
// Column alias table
// ---------------------------------------------------------------------------

/// Accepted header labels for the year column, in priority order.
pub const YEAR_LABELS: &[&str] = &["Year", "year", "YEAR"];

/// Accepted header labels per metric, in priority order.
pub const METRIC_LABELS: [(Metric, &[&str]); 3] = [
    (
        Metric::Water,
        &["Water (%)", "Water", "water (%)", "water", "WATER"],
    ),
    (
        Metric::Builtup,
        &[
            "Built-up (%)",
            "Built-up",
            "built-up (%)",
            "built-up",
            "Builtup (%)",
            "Builtup",
            "builtup (%)",
            "builtup",
            "BUILTUP",
        ],
    ),
    (
        Metric::Vegetation,
        &[
            "Vegetation (%)",
            "Vegetation",
            "vegetation (%)",
            "vegetation",
            "VEGETATION",
        ],
    ),
];

/// First non-blank cell among `labels`.
fn resolve<'a>(row: &'a RawRow, labels: &[&str]) -> Option<&'a RawValue> {
    labels
        .iter()
        .filter_map(|label| row.get(*label))
        .find(|v| !v.is_blank())
}

// ---------------------------------------------------------------------------
// Normalizer
// ---------------------------------------------------------------------------

/// Turn loosely labelled rows into a [`TimeSeries`].
///
/// * rows without a resolvable integer year are dropped
/// * a metric that is missing or not a finite number becomes `0.0`
/// * row order is preserved, repeated years are kept
pub fn normalize(rows: &[RawRow]) -> TimeSeries {
    let mut series = TimeSeries::empty();

    for row in rows {
        let Some(year) = resolve(row, YEAR_LABELS).and_then(RawValue::as_year) else {
            continue;
        };

        let mut values = [0.0; 3];
        for (metric, labels) in METRIC_LABELS {
            values[metric.index()] = resolve(row, labels)
                .and_then(RawValue::as_percentage)
                .unwrap_or(0.0);
        }

        series.push(year, values[0], values[1], values[2]);
    }

    series
}
