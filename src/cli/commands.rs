//! CLI command implementations.

use anyhow::Result;
use std::path::PathBuf;
use tracing::{error, info};

use crate::config::validation::validate_configuration;
use crate::config::Settings;
use crate::jsonrpc::methods::create_parse_error;
use crate::jsonrpc::create_safedesk_server;
use crate::models::IncidentQuery;
use crate::store::IncidentRepository;

use super::utils::{build_service, load_request_params, load_settings, print_json};

/// Start the Safedesk JSON-RPC server
pub async fn serve(config_path: Option<PathBuf>, transport: Option<String>) -> Result<()> {
    info!("Loading configuration...");
    let mut settings = load_settings(config_path.as_deref())?;
    if let Some(transport) = transport {
        settings.server.transport = transport;
    }
    validate_configuration(&settings, false)?;

    let service = build_service(&settings, true)?;
    let mut server = create_safedesk_server(&settings, service).await?;

    info!(
        "Server starting on {}",
        server.transport_description()
    );
    server.serve().await?;

    info!("Safedesk server stopped");
    Ok(())
}

/// Run one incident query
pub async fn query(
    config_path: Option<PathBuf>,
    params_file: Option<PathBuf>,
    params_json: Option<String>,
) -> Result<()> {
    let settings = load_settings(config_path.as_deref())?;

    let query = match load_request_params(params_file, params_json)? {
        Some(params) => serde_json::from_value::<IncidentQuery>(params.clone())
            .map_err(|e| anyhow::anyhow!(create_parse_error::<IncidentQuery>(&e, &params).message))?,
        None => IncidentQuery::default().with_pagination(0, settings.table.default_page_size),
    };

    let service = build_service(&settings, false)?;
    let page = service.get_incidents(query).await?;
    print_json(&page)
}

pub async fn options(config_path: Option<PathBuf>) -> Result<()> {
    let settings = load_settings(config_path.as_deref())?;
    let service = build_service(&settings, false)?;
    print_json(&service.get_filter_options().await?)
}

pub async fn stats(config_path: Option<PathBuf>) -> Result<()> {
    let settings = load_settings(config_path.as_deref())?;
    let service = build_service(&settings, false)?;
    print_json(&service.get_dashboard_stats().await?)
}

/// Generate a demo dataset
pub async fn generate(
    count: usize,
    output: Option<PathBuf>,
    seed: Option<u64>,
    include_samples: bool,
) -> Result<()> {
    let repository = IncidentRepository::demo(count, include_samples, seed)?;
    let content = serde_json::to_string_pretty(repository.incidents())?;

    match output {
        Some(path) => {
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent)?;
            }
            std::fs::write(&path, content)?;
            println!(
                "✓ Wrote {} incidents to {}",
                repository.len(),
                path.display()
            );
        }
        None => println!("{}", content),
    }

    Ok(())
}

/// Initialize default configuration
pub async fn init(config_path: Option<PathBuf>, force: bool) -> Result<()> {
    let config_path = config_path.unwrap_or_else(Settings::config_path);

    if config_path.exists() && !force {
        anyhow::bail!(
            "Configuration file already exists at {:?}. Use --force to overwrite.",
            config_path
        );
    }

    Settings::default().save(&config_path)?;

    println!("✓ Configuration initialized at {:?}", config_path);
    Ok(())
}

/// Manage configuration (show, validate)
pub async fn config(config_path: Option<PathBuf>, show: bool, validate: bool) -> Result<()> {
    if show {
        let settings = Settings::load(config_path.as_deref())?;
        println!("{}", toml::to_string_pretty(&settings)?);
    }

    if validate {
        let settings = Settings::load(config_path.as_deref()).map_err(|e| {
            error!("Failed to load configuration: {}", e);
            e
        })?;
        if let Err(e) = validate_configuration(&settings, false) {
            error!("Configuration validation failed: {}", e);
            anyhow::bail!("Configuration is invalid: {}", e);
        }
        println!("✓ Configuration is valid");
    }

    if !show && !validate {
        let path = config_path.unwrap_or_else(Settings::config_path);
        println!("{}", path.display());
    }

    Ok(())
}

/// Show version information
pub async fn version() -> Result<()> {
    println!("Safedesk {}", env!("CARGO_PKG_VERSION"));
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[tokio::test]
    async fn test_config_validate_fails_on_invalid_settings() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[table]\ndefault_page_size = 0\n").unwrap();

        assert!(config(Some(path), false, true).await.is_err());
    }

    #[tokio::test]
    async fn test_config_validate_accepts_defaults() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.toml");
        Settings::default().save(&path).unwrap();

        assert!(config(Some(path), false, true).await.is_ok());
    }

    #[tokio::test]
    async fn test_config_validate_fails_on_missing_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("absent.toml");

        assert!(config(Some(path), false, true).await.is_err());
    }
}
