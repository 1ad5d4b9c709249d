//! Read-only incident repository.
//!
//! The repository is built once at startup and handed to whoever needs it; clones
//! share the same immutable snapshot.

pub mod seed;

use std::collections::HashSet;
use std::path::Path;
use std::sync::Arc;

use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::info;
use validator::Validate;

use crate::config::settings::DatasetSettings;
use crate::models::Incident;
use crate::{ResultExt, SafedeskError, SafedeskResult};

#[derive(Debug, Clone)]
pub struct IncidentRepository {
    incidents: Arc<[Incident]>,
}

impl IncidentRepository {
    /// Build a repository, rejecting invalid records and duplicate IDs.
    pub fn new(incidents: Vec<Incident>) -> SafedeskResult<Self> {
        let mut seen = HashSet::with_capacity(incidents.len());

        for incident in &incidents {
            incident.validate().map_err(|e| {
                SafedeskError::dataset(
                    format!("invalid incident: {}", e),
                    Some(incident.id.clone()),
                )
            })?;

            if !seen.insert(incident.id.as_str()) {
                return Err(SafedeskError::dataset(
                    "duplicate incident id",
                    Some(incident.id.clone()),
                ));
            }
        }

        Ok(Self {
            incidents: incidents.into(),
        })
    }

    /// Load a JSON array of incidents.
    pub fn from_json_file(path: &Path) -> SafedeskResult<Self> {
        let path_str = path.display().to_string();
        let content = std::fs::read_to_string(path).with_dataset_context(&path_str)?;
        let incidents: Vec<Incident> =
            serde_json::from_str(&content).with_dataset_context(&path_str)?;

        info!("Loaded {} incidents from {}", incidents.len(), path_str);
        Self::new(incidents)
    }

    /// The demo dataset with an optional fixed seed.
    pub fn demo(count: usize, include_samples: bool, seed: Option<u64>) -> SafedeskResult<Self> {
        let mut rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        let today = chrono::Local::now().date_naive();

        Self::new(seed::demo_dataset(&mut rng, count, include_samples, today)?)
    }

    /// A dataset file when configured, otherwise the demo dataset.
    pub fn from_settings(settings: &DatasetSettings) -> SafedeskResult<Self> {
        let repository = match &settings.path {
            Some(path) => Self::from_json_file(path)?,
            None => Self::demo(
                settings.generated_count,
                settings.include_samples,
                settings.seed,
            )?,
        };

        info!("Incident repository ready with {} records", repository.len());
        Ok(repository)
    }

    /// Shared handle to the current snapshot.
    pub fn snapshot(&self) -> Arc<[Incident]> {
        Arc::clone(&self.incidents)
    }

    pub fn incidents(&self) -> &[Incident] {
        &self.incidents
    }

    pub fn get(&self, id: &str) -> Option<&Incident> {
        self.incidents.iter().find(|incident| incident.id == id)
    }

    pub fn len(&self) -> usize {
        self.incidents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.incidents.is_empty()
    }
}
