use std::collections::BTreeMap;

use eframe::egui::Color32;
use reqwest::Client;

use crate::chart::{project, project_comparison, ChartData};
use crate::color::generate_palette;
use crate::config::DashboardConfig;
use crate::data::align::align;
use crate::data::filter::{FilterState, ViewFilter};
use crate::data::loader::{load_series, DataSource, LoadError};
use crate::data::model::{SeriesId, TimeSeries};
use crate::data::store::{load_all, LoadOutcome, SeriesStore};
use crate::gallery::{probe_gallery, GalleryImage};

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The full UI state, independent of rendering.
pub struct AppState {
    pub config: DashboardConfig,

    /// Loaded series; every configured id has a slot after initialization.
    pub store: SeriesStore,

    /// Per-series view filter.
    pub filters: FilterState,

    /// Discovered composites per series.
    pub galleries: BTreeMap<SeriesId, Vec<GalleryImage>>,

    /// Placeholder text for series whose load failed.
    pub notices: BTreeMap<SeriesId, String>,

    /// Accent colour per series for headings.
    pub accents: BTreeMap<SeriesId, Color32>,

    /// Image shown in the shared preview window.
    pub preview: Option<GalleryImage>,

    /// Status / error message shown in the top bar.
    pub status_message: Option<String>,

    client: Client,
}

impl AppState {
    pub fn new(config: DashboardConfig, client: Client) -> Self {
        let accents = config
            .series
            .iter()
            .map(|s| s.series_id())
            .zip(generate_palette(config.series.len()))
            .collect();

        Self {
            config,
            store: SeriesStore::default(),
            filters: FilterState::default(),
            galleries: BTreeMap::new(),
            notices: BTreeMap::new(),
            accents,
            preview: None,
            status_message: None,
            client,
        }
    }

    /// Load all configured series concurrently, then probe their galleries.
    pub async fn initialize(&mut self) {
        let sources: Vec<(SeriesId, DataSource)> = self
            .config
            .series
            .iter()
            .map(|s| (s.series_id(), s.data_source()))
            .collect();

        let outcomes = load_all(&self.client, &sources, self.config.fetch_timeout()).await;
        self.install_outcomes(outcomes);
        self.refresh_galleries().await;
    }

    /// Install finished load tasks. A task that died still gets an empty
    /// slot and a notice; all such ids are summarized in one status line.
    fn install_outcomes(&mut self, outcomes: Vec<LoadOutcome>) {
        let mut aborted = Vec::new();
        for outcome in outcomes {
            match outcome {
                LoadOutcome::Loaded(id, result) => self.apply_load(&id, result),
                LoadOutcome::Aborted(id, msg) => {
                    log::error!("load task for {id} aborted: {msg}");
                    self.apply_load(&id, Ok(TimeSeries::empty()));
                    self.notices.insert(id.clone(), "Data unavailable.".to_string());
                    aborted.push(id.to_string());
                }
            }
        }
        if !aborted.is_empty() {
            self.status_message = Some(format!(
                "Initialization failed for {}; see log for details",
                aborted.join(", ")
            ));
        }
    }

    /// Replace one series from `source`, keeping its filter selection.
    pub async fn reload_series(&mut self, id: &SeriesId, source: &DataSource) {
        let result = load_series(&self.client, source, self.config.fetch_timeout()).await;
        self.apply_load(id, result);
        self.refresh_gallery(id).await;
    }

    fn apply_load(&mut self, id: &SeriesId, result: Result<TimeSeries, LoadError>) {
        match self.store.install(id, result) {
            Some(e) => {
                let msg = if e.is_fetch_failure() {
                    format!("Could not load data: {e}")
                } else {
                    format!("Data file is malformed: {e}")
                };
                self.notices.insert(id.clone(), msg);
            }
            None => {
                self.notices.remove(id);
            }
        }
        self.filters.init_series(id);
    }

    async fn refresh_galleries(&mut self) {
        let ids: Vec<SeriesId> = self.config.series.iter().map(|s| s.series_id()).collect();
        let probes = ids.iter().map(|id| self.probe_for(id));
        let results = futures::future::join_all(probes).await;

        for (id, images) in ids.into_iter().zip(results) {
            self.galleries.insert(id, images);
        }
    }

    async fn refresh_gallery(&mut self, id: &SeriesId) {
        let images = self.probe_for(id).await;
        self.galleries.insert(id.clone(), images);
    }

    async fn probe_for(&self, id: &SeriesId) -> Vec<GalleryImage> {
        let (Some(dir), Some(series)) = (
            self.config.series(id).and_then(|s| s.gallery_dir.as_deref()),
            self.store.get(id),
        ) else {
            return Vec::new();
        };
        probe_gallery(dir, series.years(), self.config.probe_timeout()).await
    }

    /// Handle a toggle control.
    pub fn select_filter(&mut self, id: &SeriesId, filter: ViewFilter) {
        log::debug!("{id}: view filter {filter:?}");
        self.filters.select(id, filter);
    }

    pub fn series_chart(&self, id: &SeriesId) -> Option<ChartData> {
        let series = self.store.get(id)?;
        Some(project(series, self.filters.visibility(id)))
    }

    pub fn comparison_chart(&self) -> Option<ChartData> {
        let (a_id, b_id) = self.config.comparison_pair()?;
        let a = self.store.get(&a_id)?;
        let b = self.store.get(&b_id)?;
        let view = align(&a_id, a, &b_id, b);
        Some(project_comparison(&view, [self.display_name(&a_id), self.display_name(&b_id)]))
    }

    pub fn display_name<'a>(&'a self, id: &'a SeriesId) -> &'a str {
        self.config
            .series(id)
            .map(|s| s.display_name())
            .unwrap_or(id.as_str())
    }

    pub fn open_preview(&mut self, image: GalleryImage) {
        self.preview = Some(image);
    }

    pub fn close_preview(&mut self) {
        self.preview = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SeriesConfig;
    use crate::data::model::Metric;

    fn config_for(dir: &std::path::Path) -> DashboardConfig {
        DashboardConfig {
            fetch_timeout_secs: 5,
            probe_timeout_secs: 2,
            comparison: None,
            series: vec![
                SeriesConfig {
                    id: "waterBody1".into(),
                    label: Some("Lake".into()),
                    source: dir.join("lake.csv").display().to_string(),
                    gallery_dir: Some(dir.join("lake_images")),
                },
                SeriesConfig {
                    id: "waterBody2".into(),
                    label: None,
                    source: dir.join("canal.csv").display().to_string(),
                    gallery_dir: None,
                },
            ],
        }
    }

    #[tokio::test]
    async fn initialize_isolates_failures_and_probes_galleries() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("lake.csv"),
            "Year,Water (%),Built-up (%),Vegetation (%)\n2015,40,10,50\n2018,35,15,50\n",
        )
        .unwrap();
        std::fs::create_dir(dir.path().join("lake_images")).unwrap();
        std::fs::write(dir.path().join("lake_images/2018.png"), b"img").unwrap();

        let mut state = AppState::new(config_for(dir.path()), Client::new());
        state.initialize().await;

        let lake = SeriesId::from("waterBody1");
        let canal = SeriesId::from("waterBody2");

        assert_eq!(state.store.get(&lake).unwrap().years(), &[2015, 2018]);
        assert!(state.store.get(&canal).unwrap().is_empty());
        assert!(state.notices.get(&lake).is_none());
        assert!(state.notices.get(&canal).is_some());
        assert!(state.status_message.is_none());

        assert_eq!(state.galleries[&lake].len(), 1);
        assert_eq!(state.galleries[&lake][0].year, 2018);
        assert!(state.galleries[&canal].is_empty());

        let comparison = state.comparison_chart().unwrap();
        assert_eq!(comparison.labels, vec![2015, 2018]);
        assert_eq!(comparison.datasets[0].label, "Lake: Water");
        assert_eq!(comparison.datasets[3].label, "waterBody2: Water");
        assert!(comparison.datasets[3].values.iter().all(Option::is_none));
    }

    #[test]
    fn aborted_task_gets_empty_slot_and_one_status_line() {
        let dir = tempfile::tempdir().unwrap();
        let mut state = AppState::new(config_for(dir.path()), Client::new());
        let lake = SeriesId::from("waterBody1");
        let canal = SeriesId::from("waterBody2");

        let mut loaded = TimeSeries::empty();
        loaded.push(2019, 30.0, 20.0, 50.0);
        state.install_outcomes(vec![
            LoadOutcome::Loaded(lake.clone(), Ok(loaded.clone())),
            LoadOutcome::Aborted(canal.clone(), "task panicked".into()),
        ]);

        assert!(state.store.get(&canal).unwrap().is_empty());
        assert_eq!(state.notices.get(&canal).map(String::as_str), Some("Data unavailable."));
        assert_eq!(
            state.status_message.as_deref(),
            Some("Initialization failed for waterBody2; see log for details")
        );
        assert_eq!(state.filters.get(&canal), ViewFilter::All);

        assert_eq!(state.store.get(&lake), Some(&loaded));
        assert!(state.notices.get(&lake).is_none());
    }

    #[tokio::test]
    async fn reload_replaces_data_and_keeps_filter() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("lake.csv"), "Year,Water\n2015,40\n").unwrap();

        let mut state = AppState::new(config_for(dir.path()), Client::new());
        state.initialize().await;

        let canal = SeriesId::from("waterBody2");
        state.select_filter(&canal, ViewFilter::VegetationOnly);

        let replacement = dir.path().join("canal_v2.json");
        std::fs::write(&replacement, r#"[{"year": 2020, "vegetation": 61.5}]"#).unwrap();
        state.reload_series(&canal, &DataSource::File(replacement)).await;

        let series = state.store.get(&canal).unwrap();
        assert_eq!(series.values(Metric::Vegetation), &[61.5]);
        assert!(state.notices.get(&canal).is_none());
        assert_eq!(state.filters.get(&canal), ViewFilter::VegetationOnly);

        let chart = state.series_chart(&canal).unwrap();
        assert!(chart.datasets[0].hidden);
        assert!(!chart.datasets[2].hidden);
    }
}
