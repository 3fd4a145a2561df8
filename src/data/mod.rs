/// Data layer: core types, loading, normalization, alignment and filtering.
///
/// Architecture:
/// ```text
///  .csv / .json / .parquet  (file or http)
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  fetch with timeout → Vec<RawRow>
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  schema   │  alias table → TimeSeries
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  store    │  SeriesId → TimeSeries (empty on failure)
///   └──────────┘
///      │      │
///      ▼      ▼
///   ┌──────┐ ┌──────────┐
///   │ align │ │  filter   │  shared year axis / per-series visibility
///   └──────┘ └──────────┘
/// ```

pub mod align;
pub mod filter;
pub mod loader;
pub mod model;
pub mod schema;
pub mod store;

#[cfg(test)]
pub mod test_http;
