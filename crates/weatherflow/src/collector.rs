use std::sync::Arc;
use std::time::{Duration, Instant};

use tokio::task::JoinHandle;
use tokio::time::timeout;
use tracing::{debug, error, info, warn};

use crate::jobs::{CityResult, CreateOutcome, JobStore};
use crate::weather::{FetchError, WeatherSource};

/// Fans a collection job out into one task per configured city.
///
/// Cheap to clone; every spawned task holds its own clone.
#[derive(Clone)]
pub struct Collector {
    store: Arc<dyn JobStore>,
    source: Arc<dyn WeatherSource>,
    cities: Arc<[String]>,
    fetch_timeout: Option<Duration>,
}

#[derive(Debug)]
pub enum StartOutcome {
    Accepted(CollectionHandle),
    /// A document for this uid already exists; nothing was spawned.
    Conflict,
}

/// Handles of the tasks spawned for one job.
///
/// Dropping it detaches the tasks; they keep running.
#[derive(Debug)]
pub struct CollectionHandle {
    uid: i64,
    tasks: Vec<JoinHandle<bool>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CollectionSummary {
    pub recorded: usize,
    pub failed: usize,
}

impl CollectionHandle {
    pub fn uid(&self) -> i64 {
        self.uid
    }

    pub fn task_count(&self) -> usize {
        self.tasks.len()
    }

    /// Wait for every city task. A panicked task counts as failed.
    pub async fn wait(self) -> CollectionSummary {
        let mut summary = CollectionSummary {
            recorded: 0,
            failed: 0,
        };
        for task in self.tasks {
            match task.await {
                Ok(true) => summary.recorded += 1,
                Ok(false) => summary.failed += 1,
                Err(e) => {
                    error!(uid = self.uid, error = %e, "collection task panicked");
                    summary.failed += 1;
                }
            }
        }
        summary
    }
}

impl Collector {
    pub fn new(
        store: Arc<dyn JobStore>,
        source: Arc<dyn WeatherSource>,
        cities: Vec<String>,
    ) -> Self {
        Self {
            store,
            source,
            cities: cities.into(),
            fetch_timeout: None,
        }
    }

    /// Bound each fetch. Expiry is reported as [`FetchError::Timeout`] and
    /// handled like any other fetch failure.
    pub fn with_fetch_timeout(mut self, dur: Option<Duration>) -> Self {
        self.fetch_timeout = dur;
        self
    }

    /// Claim `uid` and spawn one task per city. Returns as soon as the tasks
    /// are spawned.
    ///
    /// The claim is the store's atomic `create`, so two concurrent starts for
    /// the same uid cannot both fan out.
    pub async fn start_collection(&self, uid: i64) -> anyhow::Result<StartOutcome> {
        let expected_count = i32::try_from(self.cities.len())?;

        match self.store.create(uid, expected_count).await? {
            CreateOutcome::Conflict => {
                info!(uid, "collection already exists, not starting");
                return Ok(StartOutcome::Conflict);
            }
            CreateOutcome::Created => {}
        }

        let tasks = self
            .cities
            .iter()
            .cloned()
            .map(|city| {
                let this = self.clone();
                tokio::spawn(async move { this.collect_city(uid, expected_count, &city).await })
            })
            .collect();

        info!(uid, cities = expected_count, "collection started");
        Ok(StartOutcome::Accepted(CollectionHandle { uid, tasks }))
    }

    async fn fetch(&self, city: &str) -> Result<CityResult, FetchError> {
        let Some(dur) = self.fetch_timeout else {
            return self.source.fetch(city).await;
        };

        let start = Instant::now();
        match timeout(dur, self.source.fetch(city)).await {
            Ok(res) => res,
            Err(_) => Err(FetchError::Timeout {
                city: city.to_string(),
                elapsed_ms: start.elapsed().as_millis() as u64,
            }),
        }
    }

    /// One attempt for one city. `true` when a result was recorded.
    async fn collect_city(&self, uid: i64, expected_count: i32, city: &str) -> bool {
        let result = match self.fetch(city).await {
            Ok(result) => result,
            Err(err @ FetchError::Timeout { .. }) => {
                warn!(uid, city, kind = err.kind(), error = %err, "weather fetch timed out");
                return false;
            }
            Err(err) => {
                // the source already logged the failure itself
                debug!(uid, city, kind = err.kind(), "collection task ended without a result");
                return false;
            }
        };

        match self
            .store
            .append_result(uid, expected_count, &result)
            .await
        {
            Ok(outcome) => {
                info!(
                    uid,
                    city,
                    city_id = result.city_id,
                    outcome = outcome.as_str(),
                    "recorded city result"
                );
                true
            }
            Err(e) => {
                error!(uid, city, error = %e, "failed to record city result");
                false
            }
        }
    }
}
