//! Asynchronous boundary in front of the query engine.
//!
//! [`IncidentService`] is what a client talks to instead of calling the engine
//! directly. [`LocalIncidentService`] runs the engine in-process after a simulated
//! network delay.

use async_trait::async_trait;
use rand::Rng;
use std::time::Duration;
use tracing::debug;

use crate::config::settings::LatencySettings;
use crate::engine;
use crate::models::{FilterOptions, IncidentPage, IncidentQuery};
use crate::stats::{self, DashboardStats};
use crate::store::IncidentRepository;
use crate::SafedeskResult;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait IncidentService: Send + Sync {
    async fn get_incidents(&self, query: IncidentQuery) -> SafedeskResult<IncidentPage>;

    async fn get_filter_options(&self) -> SafedeskResult<FilterOptions>;

    async fn get_dashboard_stats(&self) -> SafedeskResult<DashboardStats>;
}

/// Delay profile for the simulated round trip
#[derive(Debug, Clone, PartialEq)]
pub struct LatencyProfile {
    pub query_min: Duration,
    pub query_max: Duration,
    pub options: Duration,
}

impl LatencyProfile {
    pub fn none() -> Self {
        Self::from(&LatencySettings::none())
    }

    /// Uniformly random delay in `[query_min, query_max]`
    pub fn query_delay(&self) -> Duration {
        if self.query_max <= self.query_min {
            return self.query_min;
        }
        rand::thread_rng().gen_range(self.query_min..=self.query_max)
    }
}

impl From<&LatencySettings> for LatencyProfile {
    fn from(settings: &LatencySettings) -> Self {
        let (query_min, query_max) = settings.query_range();
        Self {
            query_min,
            query_max,
            options: settings.options_delay(),
        }
    }
}

async fn simulate_round_trip(delay: Duration) {
    if !delay.is_zero() {
        tokio::time::sleep(delay).await;
    }
}

/// In-process service over a repository snapshot
pub struct LocalIncidentService {
    repository: IncidentRepository,
    latency: LatencyProfile,
}

impl LocalIncidentService {
    pub fn new(repository: IncidentRepository, latency: LatencyProfile) -> Self {
        Self {
            repository,
            latency,
        }
    }

    /// No simulated delay
    pub fn immediate(repository: IncidentRepository) -> Self {
        Self::new(repository, LatencyProfile::none())
    }

    pub fn repository(&self) -> &IncidentRepository {
        &self.repository
    }
}

#[async_trait]
impl IncidentService for LocalIncidentService {
    async fn get_incidents(&self, query: IncidentQuery) -> SafedeskResult<IncidentPage> {
        let delay = self.latency.query_delay();
        debug!(delay_ms = delay.as_millis() as u64, "Simulating incident query round trip");
        simulate_round_trip(delay).await;

        let snapshot = self.repository.snapshot();
        engine::query(&snapshot, &query)
    }

    async fn get_filter_options(&self) -> SafedeskResult<FilterOptions> {
        simulate_round_trip(self.latency.options).await;
        Ok(engine::list_filter_options(&self.repository.snapshot()))
    }

    async fn get_dashboard_stats(&self) -> SafedeskResult<DashboardStats> {
        Ok(stats::dashboard_stats(&self.repository.snapshot()))
    }
}
