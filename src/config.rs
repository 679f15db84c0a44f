//! Pipeline configuration.
//!
//! Defaults reproduce the Hungarian setup: the KSH place-name workbook, the
//! GeoNames `HU.txt` postal dump and Budapest as the capital. Library users
//! can load overrides from YAML; the binary only lets the three paths be
//! replaced (positional argument, then environment, then default).

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::normalize::{CapitalDistricts, NormalizeError};
use crate::source::{AdminLayout, PostalLayout};

pub const ADMIN_PATH_ENV: &str = "PLACEMERGE_ADMIN";
pub const POSTAL_PATH_ENV: &str = "PLACEMERGE_POSTAL";
pub const OUTPUT_PATH_ENV: &str = "PLACEMERGE_OUTPUT";

/// Error type for configuration loading
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Input and output file locations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SourcePaths {
    pub admin: PathBuf,
    pub postal: PathBuf,
    pub output: PathBuf,
}

impl Default for SourcePaths {
    fn default() -> Self {
        Self {
            admin: PathBuf::from("Helysegnevkonyv_adattar_2010.xls"),
            postal: PathBuf::from("HU.txt"),
            output: PathBuf::from("place_kshcode_postcode_points.csv"),
        }
    }
}

/// The capital-city collapsing rule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CapitalRule {
    /// Canonical capital name
    pub name: String,
    /// Regex marking a district variant; defaults to the literal name
    pub marker: Option<String>,
}

impl Default for CapitalRule {
    fn default() -> Self {
        Self {
            name: CapitalDistricts::BUDAPEST.to_string(),
            marker: None,
        }
    }
}

impl CapitalRule {
    /// Build the normalization policy for this rule.
    pub fn policy(&self) -> Result<CapitalDistricts, NormalizeError> {
        match &self.marker {
            Some(pattern) => CapitalDistricts::new(self.name.clone(), pattern),
            None => CapitalDistricts::literal(self.name.clone()),
        }
    }
}

/// Complete configuration for one run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    pub paths: SourcePaths,
    pub admin: AdminLayout,
    pub postal: PostalLayout,
    pub capital: CapitalRule,
    /// Also apply the capital rule to postal place names
    pub normalize_postal: bool,
}

impl PipelineConfig {
    /// Load configuration from a YAML file.
    ///
    /// Missing keys fall back to their defaults.
    ///
    /// # Example
    /// ```ignore
    /// use placemerge::PipelineConfig;
    ///
    /// let config = PipelineConfig::load_from_file("placemerge.yaml")?;
    /// println!("Reading {}", config.paths.admin.display());
    /// ```
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();

        let contents = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;

        Self::from_yaml(&contents)
    }

    /// Parse configuration from a YAML string.
    pub fn from_yaml(contents: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_yaml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Replace paths with any set in the environment.
    pub fn with_env_overrides(mut self) -> Self {
        if let Ok(admin) = std::env::var(ADMIN_PATH_ENV) {
            self.paths.admin = PathBuf::from(admin);
        }
        if let Ok(postal) = std::env::var(POSTAL_PATH_ENV) {
            self.paths.postal = PathBuf::from(postal);
        }
        if let Ok(output) = std::env::var(OUTPUT_PATH_ENV) {
            self.paths.output = PathBuf::from(output);
        }
        self
    }

    /// Replace paths with explicitly given ones.
    pub fn with_paths(
        mut self,
        admin: Option<PathBuf>,
        postal: Option<PathBuf>,
        output: Option<PathBuf>,
    ) -> Self {
        if let Some(admin) = admin {
            self.paths.admin = admin;
        }
        if let Some(postal) = postal {
            self.paths.postal = postal;
        }
        if let Some(output) = output {
            self.paths.output = output;
        }
        self
    }

    /// Check internal consistency.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.admin.sheet.is_empty() {
            return Err(ConfigError::Invalid("admin.sheet cannot be empty".to_string()));
        }
        if self.admin.place_column == self.admin.code_column {
            return Err(ConfigError::Invalid(
                "admin.place_column and admin.code_column must differ".to_string(),
            ));
        }
        if self.capital.name.is_empty() {
            return Err(ConfigError::Invalid("capital.name cannot be empty".to_string()));
        }
        self.capital
            .policy()
            .map_err(|e| ConfigError::Invalid(e.to_string()))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = PipelineConfig::default();

        assert_eq!(config.paths.admin, PathBuf::from("Helysegnevkonyv_adattar_2010.xls"));
        assert_eq!(config.paths.postal, PathBuf::from("HU.txt"));
        assert_eq!(config.paths.output, PathBuf::from("place_kshcode_postcode_points.csv"));
        assert_eq!(config.admin.sheet, "Minden helység adata");
        assert_eq!(config.admin.header_rows, 3);
        assert_eq!(config.postal.latitude_column, 9);
        assert_eq!(config.capital.name, "Budapest");
        assert!(!config.normalize_postal);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_yaml_keeps_defaults() {
        let yaml = r#"
paths:
  output: out/points.csv
admin:
  header_rows: 1
capital:
  name: Wien
  marker: "^Wien,"
normalize_postal: true
"#;
        let config = PipelineConfig::from_yaml(yaml).unwrap();

        assert_eq!(config.paths.output, PathBuf::from("out/points.csv"));
        assert_eq!(config.paths.postal, PathBuf::from("HU.txt"));
        assert_eq!(config.admin.header_rows, 1);
        assert_eq!(config.admin.sheet, "Minden helység adata");
        assert_eq!(config.capital.marker.as_deref(), Some("^Wien,"));
        assert!(config.normalize_postal);
    }

    #[test]
    fn test_invalid_marker_rejected() {
        let yaml = "capital:\n  marker: \"Budapest(\"\n";
        let result = PipelineConfig::from_yaml(yaml);

        assert!(matches!(result, Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn test_same_admin_columns_rejected() {
        let yaml = "admin:\n  place_column: 1\n  code_column: 1\n";
        let result = PipelineConfig::from_yaml(yaml);

        assert!(matches!(result, Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn test_malformed_yaml() {
        let result = PipelineConfig::from_yaml("paths: [unclosed");
        assert!(matches!(result, Err(ConfigError::Yaml(_))));
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("placemerge.yaml");
        fs::write(&path, "paths:\n  admin: data/ksh.xlsx\n").unwrap();

        let config = PipelineConfig::load_from_file(&path).unwrap();
        assert_eq!(config.paths.admin, PathBuf::from("data/ksh.xlsx"));

        let missing = PipelineConfig::load_from_file(dir.path().join("missing.yaml"));
        assert!(matches!(missing, Err(ConfigError::Io { .. })));
    }

    #[test]
    fn test_explicit_paths_win() {
        let config = PipelineConfig::default().with_paths(
            Some(PathBuf::from("a.xlsx")),
            None,
            Some(PathBuf::from("c.csv")),
        );

        assert_eq!(config.paths.admin, PathBuf::from("a.xlsx"));
        assert_eq!(config.paths.postal, PathBuf::from("HU.txt"));
        assert_eq!(config.paths.output, PathBuf::from("c.csv"));
    }

    #[test]
    fn test_empty_capital_name_rejected() {
        let mut config = PipelineConfig::default();
        config.capital.name = String::new();

        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));
        assert!(matches!(
            config.capital.policy(),
            Err(NormalizeError::EmptyCanonical)
        ));
    }

    #[test]
    fn test_capital_rule_policy() {
        use crate::normalize::PlaceNormalizer;

        let policy = CapitalRule::default().policy().unwrap();
        assert_eq!(policy.normalize("Budapest 13. kerület"), "Budapest");
    }
}
