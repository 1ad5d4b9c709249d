//! Configuration validation for Safedesk

use anyhow::Result;
use tracing::{error, info, warn};

use crate::config::settings::{
    DatasetSettings, LatencySettings, ServerSettings, Settings, TableSettings,
};

const SLOW_LATENCY_MS: u64 = 10_000;
const LARGE_DATASET: usize = 100_000;
const LARGE_PAGE_SIZE: usize = 500;

/// Collects configuration errors and warnings before startup
pub struct ConfigurationValidator {
    /// Whether to perform strict validation (fails on warnings)
    strict_mode: bool,
    warnings: Vec<String>,
    errors: Vec<String>,
}

impl ConfigurationValidator {
    pub fn new(strict_mode: bool) -> Self {
        Self {
            strict_mode,
            warnings: Vec::new(),
            errors: Vec::new(),
        }
    }

    /// Validate complete configuration
    pub fn validate_settings(&mut self, settings: &Settings) -> Result<()> {
        info!("Starting configuration validation");

        self.validate_server(&settings.server);
        self.validate_latency(&settings.latency);
        self.validate_dataset(&settings.dataset);
        self.validate_table(&settings.table);

        self.print_validation_summary();

        if !self.errors.is_empty() {
            return Err(anyhow::anyhow!(
                "Configuration validation failed with {} errors",
                self.errors.len()
            ));
        }

        if self.strict_mode && !self.warnings.is_empty() {
            return Err(anyhow::anyhow!(
                "Configuration validation failed in strict mode with {} warnings",
                self.warnings.len()
            ));
        }

        info!("Configuration validation passed");
        Ok(())
    }

    fn validate_server(&mut self, server: &ServerSettings) {
        if server.transport != "stdio" {
            self.errors.push(format!(
                "Invalid transport type: {}. Only 'stdio' is supported",
                server.transport
            ));
        }

        match server.log_level.to_lowercase().as_str() {
            "trace" | "debug" | "info" | "warn" | "error" => {}
            other => {
                self.warnings.push(format!(
                    "Non-standard log level: {}. Recommended: trace, debug, info, warn, error",
                    other
                ));
            }
        }
    }

    fn validate_latency(&mut self, latency: &LatencySettings) {
        if latency.query_min_ms > latency.query_max_ms {
            self.errors.push(format!(
                "latency.query_min_ms ({}) must not exceed latency.query_max_ms ({})",
                latency.query_min_ms, latency.query_max_ms
            ));
        }

        if latency.query_max_ms > SLOW_LATENCY_MS || latency.options_ms > SLOW_LATENCY_MS {
            self.warnings.push(format!(
                "Simulated latency above {}ms will make the table feel unresponsive",
                SLOW_LATENCY_MS
            ));
        }
    }

    fn validate_dataset(&mut self, dataset: &DatasetSettings) {
        match &dataset.path {
            Some(path) if !path.exists() => {
                self.errors
                    .push(format!("Dataset file does not exist: {}", path.display()));
            }
            Some(_) => {}
            None => {
                if dataset.generated_count == 0 && !dataset.include_samples {
                    self.errors.push(
                        "Demo dataset would be empty: set generated_count or include_samples"
                            .to_string(),
                    );
                }
                if dataset.generated_count > LARGE_DATASET {
                    self.warnings.push(format!(
                        "generated_count is very high ({}). Every query scans the full dataset",
                        dataset.generated_count
                    ));
                }
            }
        }
    }

    fn validate_table(&mut self, table: &TableSettings) {
        if table.default_page_size == 0 {
            self.errors
                .push("table.default_page_size must be greater than 0".to_string());
        } else if table.default_page_size > LARGE_PAGE_SIZE {
            self.warnings.push(format!(
                "table.default_page_size is very large ({})",
                table.default_page_size
            ));
        }
    }

    fn print_validation_summary(&self) {
        if !self.warnings.is_empty() {
            warn!("Configuration warnings ({}):", self.warnings.len());
            for (i, warning) in self.warnings.iter().enumerate() {
                warn!("  {}: {}", i + 1, warning);
            }
        }

        if !self.errors.is_empty() {
            error!("Configuration errors ({}):", self.errors.len());
            for (i, error) in self.errors.iter().enumerate() {
                error!("  {}: {}", i + 1, error);
            }
        }

        if self.warnings.is_empty() && self.errors.is_empty() {
            info!("Configuration validation completed successfully with no issues");
        } else {
            info!(
                "Configuration validation completed with {} warnings and {} errors",
                self.warnings.len(),
                self.errors.len()
            );
        }
    }

    pub fn warnings(&self) -> &[String] {
        &self.warnings
    }

    pub fn errors(&self) -> &[String] {
        &self.errors
    }
}

/// Quick validation function for use in main application
pub fn validate_configuration(settings: &Settings, strict: bool) -> Result<()> {
    let mut validator = ConfigurationValidator::new(strict);
    validator.validate_settings(settings)
}
