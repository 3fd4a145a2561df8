use std::collections::BTreeMap;
use std::fmt;

// ---------------------------------------------------------------------------
// SeriesId – key of one tracked water body
// ---------------------------------------------------------------------------

/// Stable key naming one water body's dataset (e.g. `waterBody1`).
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SeriesId(String);

impl SeriesId {
    pub fn new(id: impl Into<String>) -> Self {
        SeriesId(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SeriesId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for SeriesId {
    fn from(s: &str) -> Self {
        SeriesId(s.to_string())
    }
}

// ---------------------------------------------------------------------------
// RawValue / RawRow – loosely typed input cells
// ---------------------------------------------------------------------------

/// A single scalar cell as delivered by a source format.
/// CSV cells are always `Text`, JSON and Parquet may deliver `Number`.
#[derive(Debug, Clone, PartialEq)]
pub enum RawValue {
    Text(String),
    Number(f64),
}

impl RawValue {
    /// Integer interpretation used for the year column.
    pub fn as_year(&self) -> Option<i32> {
        match self {
            RawValue::Number(v) => {
                if v.is_finite() && v.fract() == 0.0 && *v >= i32::MIN as f64 && *v <= i32::MAX as f64 {
                    Some(*v as i32)
                } else {
                    None
                }
            }
            RawValue::Text(s) => {
                let s = s.trim();
                s.parse::<i32>()
                    .ok()
                    .or_else(|| RawValue::Number(s.parse::<f64>().ok()?).as_year())
            }
        }
    }

    /// Percentage interpretation. Accepts a trailing `%`; non-finite values are rejected.
    pub fn as_percentage(&self) -> Option<f64> {
        let v = match self {
            RawValue::Number(v) => *v,
            RawValue::Text(s) => s.trim().trim_end_matches('%').trim_end().parse::<f64>().ok()?,
        };
        v.is_finite().then_some(v)
    }

    pub fn is_blank(&self) -> bool {
        matches!(self, RawValue::Text(s) if s.trim().is_empty())
    }
}

/// One input record: header label → cell value. Empty cells are not stored.
pub type RawRow = BTreeMap<String, RawValue>;

// ---------------------------------------------------------------------------
// Metric – the three tracked land-cover percentages
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Metric {
    Water,
    Builtup,
    Vegetation,
}

impl Metric {
    pub const ALL: [Metric; 3] = [Metric::Water, Metric::Builtup, Metric::Vegetation];

    pub fn index(self) -> usize {
        match self {
            Metric::Water => 0,
            Metric::Builtup => 1,
            Metric::Vegetation => 2,
        }
    }

    /// Header label written for canonical data, also used as chart legend.
    pub fn canonical_label(self) -> &'static str {
        match self {
            Metric::Water => "Water (%)",
            Metric::Builtup => "Built-up (%)",
            Metric::Vegetation => "Vegetation (%)",
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Metric::Water => "Water",
            Metric::Builtup => "Built-up",
            Metric::Vegetation => "Vegetation",
        }
    }
}

// ---------------------------------------------------------------------------
// TimeSeries – normalized per-year percentages of one water body
// ---------------------------------------------------------------------------

/// Fixed-shape yearly series. All four columns always have the same length,
/// which is why the columns are only reachable through accessors.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TimeSeries {
    years: Vec<i32>,
    metrics: [Vec<f64>; 3],
}

impl TimeSeries {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn push(&mut self, year: i32, water: f64, builtup: f64, vegetation: f64) {
        self.years.push(year);
        self.metrics[0].push(water);
        self.metrics[1].push(builtup);
        self.metrics[2].push(vegetation);
    }

    pub fn years(&self) -> &[i32] {
        &self.years
    }

    pub fn values(&self, metric: Metric) -> &[f64] {
        &self.metrics[metric.index()]
    }

    pub fn len(&self) -> usize {
        self.years.len()
    }

    pub fn is_empty(&self) -> bool {
        self.years.is_empty()
    }

    /// Leftmost row index holding `year`. Duplicate years resolve to the first one.
    pub fn position_of(&self, year: i32) -> Option<usize> {
        self.years.iter().position(|&y| y == year)
    }

    /// Render the series back into rows using the canonical header labels.
    #[cfg(test)]
    pub fn to_rows(&self) -> Vec<RawRow> {
        (0..self.len())
            .map(|i| {
                let mut row = RawRow::new();
                row.insert("Year".to_string(), RawValue::Number(self.years[i] as f64));
                for metric in Metric::ALL {
                    row.insert(
                        metric.canonical_label().to_string(),
                        RawValue::Number(self.metrics[metric.index()][i]),
                    );
                }
                row
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn year_parsing_accepts_integral_numbers_only() {
        assert_eq!(RawValue::Text(" 2020 ".into()).as_year(), Some(2020));
        assert_eq!(RawValue::Text("2020.0".into()).as_year(), Some(2020));
        assert_eq!(RawValue::Number(2018.0).as_year(), Some(2018));
        assert_eq!(RawValue::Number(2018.5).as_year(), None);
        assert_eq!(RawValue::Text("abc".into()).as_year(), None);
    }

    #[test]
    fn out_of_range_year_is_rejected() {
        assert_eq!(RawValue::Number(1e12).as_year(), None);
        assert_eq!(RawValue::Text("99999999999".into()).as_year(), None);
        assert_eq!(RawValue::Number(-1e12).as_year(), None);
    }

    #[test]
    fn percentage_parsing() {
        assert_eq!(RawValue::Text("55.5".into()).as_percentage(), Some(55.5));
        assert_eq!(RawValue::Text("12 %".into()).as_percentage(), Some(12.0));
        assert_eq!(RawValue::Text("NaN".into()).as_percentage(), None);
        assert_eq!(RawValue::Number(f64::INFINITY).as_percentage(), None);
    }

    #[test]
    fn columns_stay_aligned() {
        let mut ts = TimeSeries::empty();
        ts.push(2015, 10.0, 20.0, 30.0);
        ts.push(2016, 11.0, 21.0, 31.0);
        for metric in Metric::ALL {
            assert_eq!(ts.values(metric).len(), ts.years().len());
        }
        assert_eq!(ts.values(Metric::Builtup), &[20.0, 21.0]);
    }

    #[test]
    fn position_of_prefers_first_duplicate() {
        let mut ts = TimeSeries::empty();
        ts.push(2020, 1.0, 0.0, 0.0);
        ts.push(2020, 2.0, 0.0, 0.0);
        assert_eq!(ts.position_of(2020), Some(0));
        assert_eq!(ts.position_of(1999), None);
    }
}
