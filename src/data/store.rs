use std::collections::BTreeMap;
use std::time::Duration;

use futures::future::join_all;
use reqwest::Client;

use super::loader::{load_series, DataSource, LoadError};
use super::model::{SeriesId, TimeSeries};

// ---------------------------------------------------------------------------
// Series store
// ---------------------------------------------------------------------------

/// All loaded series keyed by id. A failed load is stored as an empty series,
/// so consumers never have to tell "absent" and "empty" apart.
#[derive(Debug, Clone, Default)]
pub struct SeriesStore {
    series: BTreeMap<SeriesId, TimeSeries>,
}

impl SeriesStore {
    pub fn get(&self, id: &SeriesId) -> Option<&TimeSeries> {
        self.series.get(id)
    }

    /// Replace the slot of `id` with a fresh result. Returns the error for
    /// callers that show it to the user.
    pub fn install(&mut self, id: &SeriesId, result: Result<TimeSeries, LoadError>) -> Option<LoadError> {
        match result {
            Ok(series) => {
                self.series.insert(id.clone(), series);
                None
            }
            Err(e) => {
                log::error!("failed to load series {id}: {e}");
                self.series.insert(id.clone(), TimeSeries::empty());
                Some(e)
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Concurrent loading
// ---------------------------------------------------------------------------

/// Outcome of one load task.
pub enum LoadOutcome {
    Loaded(SeriesId, Result<TimeSeries, LoadError>),
    /// The task itself died; the series id is still known.
    Aborted(SeriesId, String),
}

/// Load every source as its own task and wait for all of them. Tasks only
/// return their result, the caller installs them afterwards.
pub async fn load_all(client: &Client, sources: &[(SeriesId, DataSource)], timeout: Duration) -> Vec<LoadOutcome> {
    let handles = sources.iter().map(|(id, source)| {
        let client = client.clone();
        let source = source.clone();
        let task_id = id.clone();
        let handle = tokio::spawn(async move { load_series(&client, &source, timeout).await });
        (task_id, handle)
    });

    let (ids, handles): (Vec<SeriesId>, Vec<_>) = handles.unzip();

    join_all(handles)
        .await
        .into_iter()
        .zip(ids)
        .map(|(joined, id)| match joined {
            Ok(result) => LoadOutcome::Loaded(id, result),
            Err(e) => LoadOutcome::Aborted(id, e.to_string()),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::Metric;
    use crate::data::test_http;

    #[test]
    fn failure_installs_empty_series() {
        let id = SeriesId::from("waterBody1");
        let mut store = SeriesStore::default();
        assert!(store.get(&id).is_none());

        let err = store.install(&id, Err(LoadError::Parse("bad".into())));
        assert!(err.is_some());
        assert_eq!(store.get(&id), Some(&TimeSeries::empty()));
    }

    #[test]
    fn reload_replaces_series() {
        let id = SeriesId::from("a");
        let mut store = SeriesStore::default();
        let mut first = TimeSeries::empty();
        first.push(2015, 1.0, 2.0, 3.0);
        store.install(&id, Ok(first));

        let mut second = TimeSeries::empty();
        second.push(2020, 4.0, 5.0, 6.0);
        store.install(&id, Ok(second.clone()));

        assert_eq!(store.get(&id), Some(&second));
    }

    #[test]
    fn failure_on_one_id_leaves_other_untouched() {
        let a = SeriesId::from("a");
        let b = SeriesId::from("b");
        let mut store = SeriesStore::default();
        let mut loaded = TimeSeries::empty();
        loaded.push(2018, 10.0, 20.0, 70.0);
        store.install(&a, Ok(loaded.clone()));

        store.install(&b, Err(LoadError::Timeout(Duration::from_secs(1))));

        assert_eq!(store.get(&a), Some(&loaded));
        assert_eq!(store.get(&b), Some(&TimeSeries::empty()));
    }

    #[tokio::test]
    async fn concurrent_loads_are_isolated() {
        let dir = tempfile::tempdir().unwrap();
        let good = dir.path().join("good.csv");
        std::fs::write(&good, "Year,Water (%)\n2015,40\n2018,45\n").unwrap();

        let sources = vec![
            (SeriesId::from("waterBody1"), DataSource::File(good)),
            (SeriesId::from("waterBody2"), DataSource::File(dir.path().join("missing.csv"))),
        ];
        let outcomes = load_all(&Client::new(), &sources, Duration::from_secs(5)).await;
        assert_eq!(outcomes.len(), 2);

        let mut store = SeriesStore::default();
        let mut errors = Vec::new();
        for outcome in outcomes {
            match outcome {
                LoadOutcome::Loaded(id, result) => {
                    if let Some(e) = store.install(&id, result) {
                        errors.push((id, e));
                    }
                }
                LoadOutcome::Aborted(id, msg) => panic!("{id} aborted: {msg}"),
            }
        }

        let first = store.get(&SeriesId::from("waterBody1")).unwrap();
        assert_eq!(first.years(), &[2015, 2018]);
        assert_eq!(first.values(Metric::Water), &[40.0, 45.0]);

        assert!(store.get(&SeriesId::from("waterBody2")).unwrap().is_empty());
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].0, SeriesId::from("waterBody2"));
        assert!(errors[0].1.is_fetch_failure());
    }

    #[tokio::test]
    async fn timed_out_url_leaves_other_series_untouched() {
        let dir = tempfile::tempdir().unwrap();
        let good = dir.path().join("good.csv");
        std::fs::write(&good, "year,water,builtup,vegetation\n2016,20,30,50\n").unwrap();
        let server = test_http::silent("canal.csv").await;

        let sources = vec![
            (SeriesId::from("waterBody1"), DataSource::File(good)),
            (SeriesId::from("waterBody2"), DataSource::parse(&server.url)),
        ];
        let outcomes = load_all(&test_http::client(), &sources, Duration::from_millis(300)).await;

        let mut store = SeriesStore::default();
        for outcome in outcomes {
            let LoadOutcome::Loaded(id, result) = outcome else {
                panic!("load task aborted");
            };
            if id == SeriesId::from("waterBody2") {
                assert!(matches!(result, Err(LoadError::Timeout(_))));
            }
            store.install(&id, result);
        }

        let first = store.get(&SeriesId::from("waterBody1")).unwrap();
        assert_eq!(first.years(), &[2016]);
        assert_eq!(first.values(Metric::Vegetation), &[50.0]);
        assert!(store.get(&SeriesId::from("waterBody2")).unwrap().is_empty());
    }
}
