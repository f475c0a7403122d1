//! # Settings Module
//!
//! ## Purpose
//! Keeps the location of the route input tables and the run options in one JSON file,
//! so the CLI can be pointed at another route without code changes.
//!
//! ## Configuration Format
//! ```json
//! {
//!   "materials": "materials.csv",
//!   "alt_materials": null,
//!   "reactions": "reactions.csv",
//!   "final_product": "Product",
//!   "log_level": "info",
//!   "export_path": "route_results.csv"
//! }
//! ```
//!
//! ## Usage
//! ```rust, ignore
//! use CostCalc::settings::RouteSettings;
//!
//! let settings = RouteSettings::with_config_file("my_route.json");
//! let mut route = settings.load_route()?;
//! route.calc_cost()?;
//! ```

use crate::Costing::cost_errors::CostError;
use crate::Costing::route_cost::RouteCost;
use crate::Utils::load_from_file::{TableLoader, create_loader_by_extension};
use log::{LevelFilter, warn};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

pub const DEFAULT_CONFIG_FILE: &str = "costcalc_config.json";

/// Serializable description of one route and of the run options.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RouteConfig {
    pub materials: String,
    #[serde(default)]
    pub alt_materials: Option<String>,
    pub reactions: String,
    pub final_product: String,
    #[serde(default = "default_log_level")]
    pub log_level: String,
    #[serde(default)]
    pub export_path: Option<String>,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for RouteConfig {
    fn default() -> Self {
        Self {
            materials: "materials.csv".to_string(),
            alt_materials: None,
            reactions: "reactions.csv".to_string(),
            final_product: "Product".to_string(),
            log_level: default_log_level(),
            export_path: None,
        }
    }
}

/// Route configuration together with the file it is persisted in.
#[derive(Debug, Clone)]
pub struct RouteSettings {
    config: RouteConfig,
    config_file: String,
}

impl RouteSettings {
    /// Loads `costcalc_config.json` from the current directory, or defaults.
    pub fn new() -> Self {
        Self::with_config_file(DEFAULT_CONFIG_FILE)
    }

    /// Loads the given configuration file. A missing or unreadable file gives the
    /// default configuration; the problem is logged.
    pub fn with_config_file(config_file: &str) -> Self {
        let config = match Self::load_config(config_file) {
            Ok(config) => config,
            Err(e) => {
                warn!(
                    "configuration '{}' not used ({}), falling back to defaults",
                    config_file, e
                );
                RouteConfig::default()
            }
        };
        Self {
            config,
            config_file: config_file.to_string(),
        }
    }

    pub fn from_config(config: RouteConfig, config_file: &str) -> Self {
        Self {
            config,
            config_file: config_file.to_string(),
        }
    }

    fn load_config(config_file: &str) -> Result<RouteConfig, CostError> {
        if Path::new(config_file).exists() {
            let content = fs::read_to_string(config_file)?;
            let config: RouteConfig = serde_json::from_str(&content)?;
            Ok(config)
        } else {
            Ok(RouteConfig::default())
        }
    }

    /// writes the current configuration back to its file
    pub fn save_config(&self) -> Result<(), CostError> {
        let content = serde_json::to_string_pretty(&self.config)?;
        fs::write(&self.config_file, content)?;
        Ok(())
    }

    pub fn config(&self) -> &RouteConfig {
        &self.config
    }

    pub fn config_file(&self) -> &str {
        &self.config_file
    }

    pub fn set_final_product(&mut self, final_product: &str) {
        self.config.final_product = final_product.trim().to_string();
    }

    /// Points the route at other input files. Files must exist.
    pub fn set_tables(
        &mut self,
        materials: &str,
        alt_materials: Option<&str>,
        reactions: &str,
    ) -> Result<(), CostError> {
        for path in [Some(materials), alt_materials, Some(reactions)]
            .into_iter()
            .flatten()
        {
            if !Path::new(path).exists() {
                return Err(CostError::Io(std::io::Error::new(
                    std::io::ErrorKind::NotFound,
                    format!("File '{}' does not exist", path),
                )));
            }
        }
        self.config.materials = materials.to_string();
        self.config.alt_materials = alt_materials.map(|s| s.to_string());
        self.config.reactions = reactions.to_string();
        Ok(())
    }

    /// Log level named in the configuration; unknown names give `Info`.
    pub fn log_level(&self) -> LevelFilter {
        self.config.log_level.parse().unwrap_or(LevelFilter::Info)
    }

    pub fn loader(&self) -> Result<TableLoader, CostError> {
        create_loader_by_extension(
            Path::new(&self.config.materials),
            self.config.alt_materials.as_deref().map(Path::new),
            Path::new(&self.config.reactions),
        )
    }

    /// loads the tables and builds the route described by the configuration
    pub fn load_route(&self) -> Result<RouteCost, CostError> {
        let loader = self.loader()?;
        RouteCost::from_source(&self.config.final_product, &loader)
    }
}

impl Default for RouteSettings {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_missing_config_gives_defaults() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("absent.json");
        let settings = RouteSettings::with_config_file(path.to_str().unwrap());
        assert_eq!(settings.config(), &RouteConfig::default());
        assert_eq!(settings.log_level(), LevelFilter::Info);
    }

    #[test]
    fn test_config_round_trip() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("route.json");
        let path = path.to_str().unwrap();
        let config = RouteConfig {
            materials: "mats.json".to_string(),
            alt_materials: Some("alt.json".to_string()),
            reactions: "rxns.json".to_string(),
            final_product: "API".to_string(),
            log_level: "debug".to_string(),
            export_path: Some("out.csv".to_string()),
        };
        RouteSettings::from_config(config.clone(), path)
            .save_config()
            .unwrap();
        let loaded = RouteSettings::with_config_file(path);
        assert_eq!(loaded.config(), &config);
        assert_eq!(loaded.log_level(), LevelFilter::Debug);
        assert!(matches!(loaded.loader().unwrap(), TableLoader::Json(_)));
    }

    #[test]
    fn test_partial_config_uses_field_defaults() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("route.json");
        fs::write(
            &path,
            r#"{"materials": "m.csv", "reactions": "r.csv", "final_product": "X"}"#,
        )
        .unwrap();
        let settings = RouteSettings::with_config_file(path.to_str().unwrap());
        assert_eq!(settings.config().final_product, "X");
        assert_eq!(settings.config().log_level, "info");
        assert!(settings.config().alt_materials.is_none());
    }

    #[test]
    fn test_set_tables_requires_files() {
        let mut settings = RouteSettings::from_config(RouteConfig::default(), "unused.json");
        assert!(
            settings
                .set_tables("no_such_materials.csv", None, "no_such_reactions.csv")
                .is_err()
        );
        assert_eq!(settings.config().materials, "materials.csv");
    }
}
