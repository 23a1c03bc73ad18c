//! Layered application configuration.
//!
//! Sources, later ones winning: built-in defaults, an optional YAML file,
//! then `SOA_`-prefixed environment variables with `__` as the nesting
//! separator (`SOA_REST__HOST`, `SOA_PAGINATION__SPREAD`).

use std::path::Path;

use anyhow::{Context, Result};
use figment::Figment;
use figment::providers::{Env, Format, Serialized, Yaml};
use serde::{Deserialize, Serialize};
use soa_pagination::PaginationConfig;
use soa_rest::RestConfig;

const ENV_PREFIX: &str = "SOA_";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default = "default_rest")]
    pub rest: RestConfig,

    #[serde(default = "default_pagination")]
    pub pagination: PaginationConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            rest: default_rest(),
            pagination: default_pagination(),
        }
    }
}

fn default_rest() -> RestConfig {
    RestConfig::default()
}

fn default_pagination() -> PaginationConfig {
    PaginationConfig::default()
}

impl AppConfig {
    /// Load the effective configuration.
    ///
    /// # Errors
    /// Fails when `path` is given but is not a file, or when a source holds
    /// values of the wrong type.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut figment = Figment::new().merge(Serialized::defaults(AppConfig::default()));

        if let Some(path) = path {
            if !path.is_file() {
                anyhow::bail!("config file does not exist: {}", path.display());
            }
            figment = figment.merge(Yaml::file(path));
        }

        let config: AppConfig = figment
            .merge(Env::prefixed(ENV_PREFIX).split("__"))
            .extract()
            .context("invalid configuration")?;

        tracing::debug!(
            host = %config.rest.host,
            port = config.rest.port,
            "configuration loaded"
        );
        Ok(config)
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    #![allow(clippy::expect_used)]

    use super::*;
    use figment::Jail;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_defaults_without_sources() {
        Jail::expect_with(|_jail| {
            let config = AppConfig::load(None).map_err(|e| e.to_string())?;
            assert_eq!(config, AppConfig::default());
            assert_eq!(config.rest.path, "/api");
            assert_eq!(config.pagination.spread, 10);
            Ok(())
        });
    }

    #[test]
    fn test_yaml_then_env_override() {
        Jail::expect_with(|jail| {
            jail.create_file(
                "soa.yaml",
                r"
rest:
  host: api.example.com
  port: 8080
pagination:
  spread: 5
  page_query_string: true
",
            )?;
            jail.set_env("SOA_REST__PORT", "9090");
            jail.set_env("SOA_PAGINATION__DATA_FIELD", "items");

            let config = AppConfig::load(Some(Path::new("soa.yaml"))).map_err(|e| e.to_string())?;
            assert_eq!(config.rest.host, "api.example.com");
            assert_eq!(config.rest.port, 9090);
            assert_eq!(config.rest.protocol, "http");
            assert_eq!(config.pagination.spread, 5);
            assert!(config.pagination.page_query_string);
            assert_eq!(config.pagination.data_field, "items");
            assert_eq!(config.pagination.count_field, "count");
            Ok(())
        });
    }

    #[test]
    fn test_missing_file_is_an_error() {
        Jail::expect_with(|_jail| {
            let err = AppConfig::load(Some(Path::new("absent.yaml")))
                .expect_err("missing file must be rejected");
            assert!(err.to_string().contains("absent.yaml"));
            Ok(())
        });
    }

    #[test]
    fn test_wrong_type_is_an_error() {
        Jail::expect_with(|jail| {
            jail.set_env("SOA_REST__PORT", "not-a-port");
            assert!(AppConfig::load(None).is_err());
            Ok(())
        });
    }
}
