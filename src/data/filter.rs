use std::collections::BTreeMap;

use super::model::{Metric, SeriesId};

// ---------------------------------------------------------------------------
// View filter: which metric lines of a series are shown
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ViewFilter {
    #[default]
    All,
    WaterOnly,
    BuiltupOnly,
    VegetationOnly,
}

impl ViewFilter {
    pub const ALL: [ViewFilter; 4] = [
        ViewFilter::All,
        ViewFilter::WaterOnly,
        ViewFilter::BuiltupOnly,
        ViewFilter::VegetationOnly,
    ];

    /// Label of the toggle control.
    pub fn label(self) -> &'static str {
        match self {
            ViewFilter::All => "All",
            ViewFilter::WaterOnly => "Water",
            ViewFilter::BuiltupOnly => "Built-up",
            ViewFilter::VegetationOnly => "Vegetation",
        }
    }

    pub fn visibility(self) -> Visibility {
        let only = |m: Metric| Visibility {
            water: m == Metric::Water,
            builtup: m == Metric::Builtup,
            vegetation: m == Metric::Vegetation,
        };
        match self {
            ViewFilter::All => Visibility {
                water: true,
                builtup: true,
                vegetation: true,
            },
            ViewFilter::WaterOnly => only(Metric::Water),
            ViewFilter::BuiltupOnly => only(Metric::Builtup),
            ViewFilter::VegetationOnly => only(Metric::Vegetation),
        }
    }
}

/// Per-metric visibility consumed by the chart projection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Visibility {
    pub water: bool,
    pub builtup: bool,
    pub vegetation: bool,
}

impl Visibility {
    pub fn is_visible(&self, metric: Metric) -> bool {
        match metric {
            Metric::Water => self.water,
            Metric::Builtup => self.builtup,
            Metric::Vegetation => self.vegetation,
        }
    }
}

// ---------------------------------------------------------------------------
// Filter state of all series
// ---------------------------------------------------------------------------

/// Active view filter per series. A series without an entry shows everything.
#[derive(Debug, Clone, Default)]
pub struct FilterState {
    active: BTreeMap<SeriesId, ViewFilter>,
}

impl FilterState {
    /// Start tracking `id` with [`ViewFilter::All`]. An existing selection is kept.
    pub fn init_series(&mut self, id: &SeriesId) {
        self.active.entry(id.clone()).or_default();
    }

    /// Overwrite the current selection.
    pub fn select(&mut self, id: &SeriesId, filter: ViewFilter) {
        self.active.insert(id.clone(), filter);
    }

    pub fn get(&self, id: &SeriesId) -> ViewFilter {
        self.active.get(id).copied().unwrap_or_default()
    }

    pub fn visibility(&self, id: &SeriesId) -> Visibility {
        self.get(id).visibility()
    }
}
