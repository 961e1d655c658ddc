//! Explicit configuration for training and model selection.
//!
//! The core never reads the process environment. Binaries may build a
//! [`TrainingDataConfig`] from `SALES_DATA_PATH` / `SALES_DATA_FILE` through
//! [`TrainingDataConfig::from_env`], or load a whole [`PricingConfig`] from TOML:
//!
//! ```toml
//! [training]
//! data_path = "~/data"
//! data_file = "kc_house_data.csv"
//!
//! [model]
//! alphas = [0.1, 1.0, 10.0]
//! cross_validation = "leave_one_out"
//! price_precision = 2
//! ```

use crate::error::{PricingError, Result};
pub use crate::model::CrossValidation;
use crate::model::DEFAULT_ALPHAS;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Environment variable naming the directory of the sales export.
pub const DATA_PATH_VAR: &str = "SALES_DATA_PATH";
/// Environment variable naming the sales export file.
pub const DATA_FILE_VAR: &str = "SALES_DATA_FILE";

/// Largest accepted `price_precision`.
pub const MAX_PRICE_PRECISION: u32 = 10;

/// Where the training data lives.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrainingDataConfig {
    pub data_path: PathBuf,
    pub data_file: String,
}

impl TrainingDataConfig {
    pub fn new(data_path: impl Into<PathBuf>, data_file: impl Into<String>) -> Self {
        Self {
            data_path: data_path.into(),
            data_file: data_file.into(),
        }
    }

    /// Reads both settings from the environment.
    ///
    /// # Errors
    /// [`PricingError::Configuration`] if either variable is unset.
    pub fn from_env() -> Result<Self> {
        let read = |name: &str| {
            std::env::var(name).map_err(|_| {
                PricingError::Configuration(format!("environment variable {} is not set", name))
            })
        };
        Ok(Self::new(read(DATA_PATH_VAR)?, read(DATA_FILE_VAR)?))
    }

    /// Full path of the training file, with a leading `~/` expanded against `HOME`.
    ///
    /// # Errors
    /// [`PricingError::Configuration`] if a setting is empty or the file does not exist.
    pub fn resolve(&self) -> Result<PathBuf> {
        if self.data_path.as_os_str().is_empty() {
            return Err(PricingError::Configuration(
                "training data path is empty".to_string(),
            ));
        }
        if self.data_file.trim().is_empty() {
            return Err(PricingError::Configuration(
                "training data file name is empty".to_string(),
            ));
        }

        let path = expand_home(&self.data_path).join(self.data_file.trim());
        if !path.is_file() {
            return Err(PricingError::Configuration(format!(
                "training data file {} does not exist",
                path.display()
            )));
        }
        Ok(path)
    }
}

fn expand_home(path: &Path) -> PathBuf {
    match path.strip_prefix("~") {
        Ok(rest) => match std::env::var_os("HOME") {
            Some(home) => PathBuf::from(home).join(rest),
            None => path.to_path_buf(),
        },
        Err(_) => path.to_path_buf(),
    }
}

/// Model-selection and output settings.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelConfig {
    /// Candidate ridge strengths, tried in order.
    pub alphas: Vec<f64>,
    pub cross_validation: CrossValidation,
    /// Decimal places of returned prices.
    pub price_precision: u32,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            alphas: DEFAULT_ALPHAS.to_vec(),
            cross_validation: CrossValidation::LeaveOneOut,
            price_precision: 2,
        }
    }
}

impl ModelConfig {
    /// # Errors
    /// [`PricingError::Configuration`] for an empty grid, a non-positive or non-finite
    /// alpha, fewer than two folds, or a precision above 10 decimals.
    pub fn validate(&self) -> Result<()> {
        if self.alphas.is_empty() {
            return Err(PricingError::Configuration(
                "alphas must not be empty".to_string(),
            ));
        }
        if let Some(bad) = self.alphas.iter().find(|a| !(a.is_finite() && **a > 0.0)) {
            return Err(PricingError::Configuration(format!(
                "alpha {} must be finite and positive",
                bad
            )));
        }
        if let CrossValidation::KFold(k) = self.cross_validation {
            if k < 2 {
                return Err(PricingError::Configuration(format!(
                    "k-fold cross-validation needs k >= 2, got {}",
                    k
                )));
            }
        }
        if self.price_precision > MAX_PRICE_PRECISION {
            return Err(PricingError::Configuration(format!(
                "price precision {} exceeds {} decimals",
                self.price_precision, MAX_PRICE_PRECISION
            )));
        }
        Ok(())
    }
}

/// Complete configuration of a pricing deployment.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct PricingConfig {
    #[serde(default)]
    pub training: TrainingDataConfig,
    #[serde(default)]
    pub model: ModelConfig,
}

impl PricingConfig {
    /// Parses TOML text and validates the model section.
    pub fn from_toml_str(text: &str) -> Result<Self> {
        let config: Self = toml::from_str(text)
            .map_err(|e| PricingError::Configuration(format!("invalid configuration: {}", e)))?;
        config.model.validate()?;
        Ok(config)
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|e| {
            PricingError::Configuration(format!("cannot read {}: {}", path.display(), e))
        })?;
        Self::from_toml_str(&text)
    }

    pub fn to_toml_string(&self) -> Result<String> {
        toml::to_string(self).map_err(|e| PricingError::Configuration(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    #[test]
    fn test_model_config_defaults() {
        let config = ModelConfig::default();
        assert_eq!(config.alphas, vec![0.1, 1.0, 10.0]);
        assert_eq!(config.cross_validation, CrossValidation::LeaveOneOut);
        assert_eq!(config.price_precision, 2);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_model_config_validation() {
        let bad = |config: ModelConfig| config.validate().unwrap_err().kind();
        assert_eq!(
            bad(ModelConfig {
                alphas: vec![],
                ..Default::default()
            }),
            ErrorKind::Configuration
        );
        assert_eq!(
            bad(ModelConfig {
                alphas: vec![1.0, 0.0],
                ..Default::default()
            }),
            ErrorKind::Configuration
        );
        assert_eq!(
            bad(ModelConfig {
                cross_validation: CrossValidation::KFold(1),
                ..Default::default()
            }),
            ErrorKind::Configuration
        );
        assert_eq!(
            bad(ModelConfig {
                price_precision: 400,
                ..Default::default()
            }),
            ErrorKind::Configuration
        );
    }

    #[test]
    fn test_resolve_existing_file() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("sales.csv"), "id\n").unwrap();
        let config = TrainingDataConfig::new(dir.path(), "sales.csv");
        assert_eq!(config.resolve().unwrap(), dir.path().join("sales.csv"));
    }

    #[test]
    fn test_resolve_failures() {
        let dir = tempfile::tempdir().unwrap();
        let missing = TrainingDataConfig::new(dir.path(), "nope.csv");
        assert_eq!(
            missing.resolve().unwrap_err().kind(),
            ErrorKind::Configuration
        );
        let empty_path = TrainingDataConfig::new("", "sales.csv");
        assert_eq!(
            empty_path.resolve().unwrap_err().kind(),
            ErrorKind::Configuration
        );
        let empty_file = TrainingDataConfig::new(dir.path(), " ");
        assert_eq!(
            empty_file.resolve().unwrap_err().kind(),
            ErrorKind::Configuration
        );
    }

    #[test]
    fn test_expand_home() {
        let plain = Path::new("/data");
        assert_eq!(expand_home(plain), PathBuf::from("/data"));
        if let Some(home) = std::env::var_os("HOME") {
            assert_eq!(
                expand_home(Path::new("~/data")),
                PathBuf::from(home).join("data")
            );
        }
    }

    #[test]
    fn test_toml_roundtrip() {
        let text = r#"
            [training]
            data_path = "/srv/data"
            data_file = "kc_house_data.csv"

            [model]
            alphas = [0.5, 5.0]
            cross_validation = { k_fold = 5 }
            price_precision = 0
        "#;
        let config = PricingConfig::from_toml_str(text).unwrap();
        assert_eq!(config.training.data_file, "kc_house_data.csv");
        assert_eq!(config.model.alphas, vec![0.5, 5.0]);
        assert_eq!(config.model.cross_validation, CrossValidation::KFold(5));
        assert_eq!(config.model.price_precision, 0);

        let again = PricingConfig::from_toml_str(&config.to_toml_string().unwrap()).unwrap();
        assert_eq!(again, config);
    }

    #[test]
    fn test_toml_defaults_and_errors() {
        let config = PricingConfig::from_toml_str("").unwrap();
        assert_eq!(config.model, ModelConfig::default());

        let err = PricingConfig::from_toml_str("[model]\nalphas = []").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Configuration);
        let err = PricingConfig::from_toml_str("[model\n").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Configuration);
    }
}
