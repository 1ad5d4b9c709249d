//! CLI utility functions.

use anyhow::Result;
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::info;

use crate::config::Settings;
use crate::service::{IncidentService, LatencyProfile, LocalIncidentService};
use crate::store::IncidentRepository;

/// Load request parameters from file or inline JSON; `None` when neither is given
pub fn load_request_params(
    params_file: Option<PathBuf>,
    params_json: Option<String>,
) -> Result<Option<serde_json::Value>> {
    match (params_file, params_json) {
        (Some(path), None) => {
            if !path.exists() {
                anyhow::bail!("Parameters file not found: {}", path.display());
            }
            let content = std::fs::read_to_string(&path)?;
            let params: serde_json::Value = serde_json::from_str(&content).map_err(|e| {
                anyhow::anyhow!("Failed to parse JSON from {}: {}", path.display(), e)
            })?;
            Ok(Some(params))
        }
        (None, Some(json_str)) => {
            let params: serde_json::Value = serde_json::from_str(&json_str)
                .map_err(|e| anyhow::anyhow!("Failed to parse inline JSON: {}", e))?;
            Ok(Some(params))
        }
        (None, None) => Ok(None),
        (Some(_), Some(_)) => {
            anyhow::bail!("Cannot use both --params-file and --params-json");
        }
    }
}

/// Load settings (env > file > defaults) and check them
pub fn load_settings(config_path: Option<&Path>) -> Result<Settings> {
    let settings = Settings::load(config_path)?;
    settings.validate()?;
    Ok(settings)
}

/// Build the repository and service described by `settings`.
///
/// With `simulate_latency` off, calls return immediately.
pub fn build_service(
    settings: &Settings,
    simulate_latency: bool,
) -> Result<Arc<dyn IncidentService>> {
    let repository = IncidentRepository::from_settings(&settings.dataset)?;
    info!("Loaded {} incidents", repository.len());

    let latency = if simulate_latency {
        LatencyProfile::from(&settings.latency)
    } else {
        LatencyProfile::none()
    };

    Ok(Arc::new(LocalIncidentService::new(repository, latency)))
}

/// Pretty-print a value as JSON on stdout
pub fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_params_from_inline_json() {
        let params = load_request_params(None, Some(r#"{"globalFilter":"dock"}"#.to_string()))
            .unwrap()
            .unwrap();
        assert_eq!(params["globalFilter"], "dock");
    }

    #[test]
    fn test_params_from_file() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, r#"{{"pagination":{{"pageIndex":1,"pageSize":5}}}}"#).unwrap();

        let params = load_request_params(Some(file.path().to_path_buf()), None)
            .unwrap()
            .unwrap();
        assert_eq!(params["pagination"]["pageSize"], 5);
    }

    #[test]
    fn test_params_absent_and_invalid() {
        assert!(load_request_params(None, None).unwrap().is_none());
        assert!(load_request_params(None, Some("{oops".to_string())).is_err());
        assert!(load_request_params(Some(PathBuf::from("/nonexistent/q.json")), None).is_err());
    }
}
