use anyhow::{Context, Result, bail};
use std::env;
use std::time::Duration;

/// Fallback access code used when `ACCESS_CODE` is not set.
pub const DEFAULT_ACCESS_CODE: &str = "default_code";

/// Which key-value backend holds the list record
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreBackend {
    Memory,
    Spanner,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SpannerConfig {
    pub emulator_host: Option<String>,
    pub project: String,
    pub instance: String,
    pub database: String,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub access_code: String,
    pub store_backend: StoreBackend,
    pub spanner: Option<SpannerConfig>,
    pub store_timeout: Duration,
    pub store_max_retries: u32,
    pub service_port: u16,
    pub service_host: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build the configuration from an arbitrary variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let access_code = lookup("ACCESS_CODE")
            .filter(|code| !code.is_empty())
            .unwrap_or_else(|| DEFAULT_ACCESS_CODE.to_string());

        let store_backend = match lookup("STORE_BACKEND")
            .unwrap_or_else(|| "memory".to_string())
            .to_ascii_lowercase()
            .as_str()
        {
            "memory" => StoreBackend::Memory,
            "spanner" => StoreBackend::Spanner,
            other => bail!("STORE_BACKEND must be one of: memory, spanner, got '{}'", other),
        };

        let spanner = match store_backend {
            StoreBackend::Memory => None,
            StoreBackend::Spanner => Some(SpannerConfig {
                emulator_host: lookup("SPANNER_EMULATOR_HOST"),
                project: lookup("SPANNER_PROJECT")
                    .context("SPANNER_PROJECT environment variable is required")?,
                instance: lookup("SPANNER_INSTANCE")
                    .context("SPANNER_INSTANCE environment variable is required")?,
                database: lookup("SPANNER_DATABASE")
                    .context("SPANNER_DATABASE environment variable is required")?,
            }),
        };

        let store_timeout_ms = lookup("STORE_TIMEOUT_MS")
            .unwrap_or_else(|| "5000".to_string())
            .parse::<u64>()
            .context("STORE_TIMEOUT_MS must be a non-negative integer")?;

        let store_max_retries = lookup("STORE_MAX_RETRIES")
            .unwrap_or_else(|| "2".to_string())
            .parse::<u32>()
            .context("STORE_MAX_RETRIES must be a non-negative integer")?;

        let service_port = lookup("SERVICE_PORT")
            .unwrap_or_else(|| "3000".to_string())
            .parse::<u16>()
            .context("SERVICE_PORT must be a valid port number (0-65535)")?;

        let service_host = lookup("SERVICE_HOST").unwrap_or_else(|| "0.0.0.0".to_string());

        Ok(Config {
            access_code,
            store_backend,
            spanner,
            store_timeout: Duration::from_millis(store_timeout_ms),
            store_max_retries,
            service_port,
            service_host,
        })
    }

    pub fn uses_default_access_code(&self) -> bool {
        self.access_code == DEFAULT_ACCESS_CODE
    }

    pub fn log_startup(&self) {
        tracing::info!("Configuration loaded:");
        tracing::info!("  Store backend: {:?}", self.store_backend);
        if let Some(spanner) = &self.spanner {
            tracing::info!(
                "  Spanner emulator: {}",
                spanner.emulator_host.as_deref().unwrap_or("disabled (using production)")
            );
            tracing::info!("  Spanner project: {}", spanner.project);
            tracing::info!("  Spanner instance: {}", spanner.instance);
            tracing::info!("  Spanner database: {}", spanner.database);
        }
        tracing::info!(
            "  Store timeout: {}ms, max retries: {}",
            self.store_timeout.as_millis(),
            self.store_max_retries
        );
        tracing::info!("  Service listening on: {}:{}", self.service_host, self.service_port);
        if self.uses_default_access_code() {
            tracing::warn!("ACCESS_CODE is not set; using the built-in default. Override it in any real deployment");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(vars: &[(&str, &str)]) -> Result<Config> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_config_with_defaults() {
        let config = config_from(&[]).unwrap();

        assert_eq!(config.access_code, DEFAULT_ACCESS_CODE);
        assert!(config.uses_default_access_code());
        assert_eq!(config.store_backend, StoreBackend::Memory);
        assert_eq!(config.spanner, None);
        assert_eq!(config.store_timeout, Duration::from_secs(5));
        assert_eq!(config.store_max_retries, 2);
        assert_eq!(config.service_port, 3000);
        assert_eq!(config.service_host, "0.0.0.0");
    }

    #[test]
    fn test_config_with_all_vars() {
        let config = config_from(&[
            ("ACCESS_CODE", "s3cret"),
            ("STORE_BACKEND", "spanner"),
            ("SPANNER_EMULATOR_HOST", "localhost:9010"),
            ("SPANNER_PROJECT", "test-project"),
            ("SPANNER_INSTANCE", "test-instance"),
            ("SPANNER_DATABASE", "test-database"),
            ("STORE_TIMEOUT_MS", "250"),
            ("STORE_MAX_RETRIES", "0"),
            ("SERVICE_PORT", "8080"),
            ("SERVICE_HOST", "127.0.0.1"),
        ])
        .unwrap();

        assert_eq!(config.access_code, "s3cret");
        assert!(!config.uses_default_access_code());
        assert_eq!(config.store_backend, StoreBackend::Spanner);
        assert_eq!(
            config.spanner,
            Some(SpannerConfig {
                emulator_host: Some("localhost:9010".to_string()),
                project: "test-project".to_string(),
                instance: "test-instance".to_string(),
                database: "test-database".to_string(),
            })
        );
        assert_eq!(config.store_timeout, Duration::from_millis(250));
        assert_eq!(config.store_max_retries, 0);
        assert_eq!(config.service_port, 8080);
        assert_eq!(config.service_host, "127.0.0.1");
    }

    #[test]
    fn test_empty_access_code_falls_back_to_default() {
        let config = config_from(&[("ACCESS_CODE", "")]).unwrap();
        assert_eq!(config.access_code, DEFAULT_ACCESS_CODE);
    }

    #[test]
    fn test_spanner_backend_requires_database() {
        let result = config_from(&[
            ("STORE_BACKEND", "spanner"),
            ("SPANNER_PROJECT", "test-project"),
            ("SPANNER_INSTANCE", "test-instance"),
        ]);

        let error = result.unwrap_err();
        assert!(error.to_string().contains("SPANNER_DATABASE"));
    }

    #[test]
    fn test_memory_backend_ignores_spanner_vars() {
        let config = config_from(&[("SPANNER_PROJECT", "test-project")]).unwrap();
        assert_eq!(config.spanner, None);
    }

    #[test]
    fn test_unknown_backend() {
        let error = config_from(&[("STORE_BACKEND", "redis")]).unwrap_err();
        assert!(error.to_string().contains("STORE_BACKEND"));
    }

    #[test]
    fn test_invalid_port() {
        let error = config_from(&[("SERVICE_PORT", "not-a-number")]).unwrap_err();
        assert!(error.to_string().contains("SERVICE_PORT"));
    }

    #[test]
    fn test_port_out_of_range() {
        assert!(config_from(&[("SERVICE_PORT", "99999")]).is_err());
    }

    #[test]
    fn test_invalid_timeout() {
        let error = config_from(&[("STORE_TIMEOUT_MS", "soon")]).unwrap_err();
        assert!(error.to_string().contains("STORE_TIMEOUT_MS"));
    }
}
