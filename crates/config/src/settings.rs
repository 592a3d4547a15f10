//! Engine settings
//!
//! Layered the usual way: built-in defaults, then an optional config file,
//! then `SHOPBOT__SECTION__KEY` environment overrides.

use std::path::{Path, PathBuf};
use std::time::Duration;

use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};

use crate::constants;
use crate::ConfigError;

/// Top-level settings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineSettings {
    pub matching: MatchingSettings,
    pub session: SessionSettings,
    pub replies: ReplySettings,
    pub server: ServerSettings,
    pub log: LogSettings,
}

/// Relevance thresholds and fuzzy-search tuning
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MatchingSettings {
    pub faq_similarity_threshold: f64,
    pub fuzzy_enabled: bool,
    pub fuzzy_max_score: f64,
    pub fuzzy_min_query_chars: usize,
    pub fuzzy_weights: FuzzyWeights,
    pub overlap_min_score: f64,
}

impl Default for MatchingSettings {
    fn default() -> Self {
        Self {
            faq_similarity_threshold: constants::matching::FAQ_SIMILARITY_THRESHOLD,
            fuzzy_enabled: true,
            fuzzy_max_score: constants::matching::FUZZY_MAX_SCORE,
            fuzzy_min_query_chars: constants::matching::FUZZY_MIN_QUERY_CHARS,
            fuzzy_weights: FuzzyWeights::default(),
            overlap_min_score: constants::matching::OVERLAP_MIN_SCORE,
        }
    }
}

/// Per-field weights for the fuzzy product index
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(default)]
pub struct FuzzyWeights {
    pub name: f64,
    pub brand: f64,
    pub category: f64,
}

impl Default for FuzzyWeights {
    fn default() -> Self {
        Self {
            name: constants::matching::FUZZY_NAME_WEIGHT,
            brand: constants::matching::FUZZY_BRAND_WEIGHT,
            category: constants::matching::FUZZY_CATEGORY_WEIGHT,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionSettings {
    pub context_ttl_secs: u64,
    pub product_ttl_secs: u64,
}

impl SessionSettings {
    pub fn context_ttl(&self) -> Duration {
        Duration::from_secs(self.context_ttl_secs)
    }

    pub fn product_ttl(&self) -> Duration {
        Duration::from_secs(self.product_ttl_secs)
    }
}

impl Default for SessionSettings {
    fn default() -> Self {
        Self {
            context_ttl_secs: constants::session::CONTEXT_TTL_SECS,
            product_ttl_secs: constants::session::PRODUCT_TTL_SECS,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ReplySettings {
    pub quote_form_url: String,
    pub default_cheap_budget: u64,
    pub top_n: usize,
}

impl Default for ReplySettings {
    fn default() -> Self {
        Self {
            quote_form_url: constants::replies::QUOTE_FORM_URL.to_string(),
            default_cheap_budget: constants::replies::DEFAULT_CHEAP_BUDGET,
            top_n: constants::replies::TOP_N,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
    pub catalog_path: PathBuf,
    /// Seconds between catalog reloads; 0 disables reloading
    pub catalog_refresh_secs: u64,
    /// Directory whose YAML files override the embedded domain data
    pub data_dir: Option<PathBuf>,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: constants::server::HOST.to_string(),
            port: constants::server::PORT,
            catalog_path: PathBuf::from(constants::server::CATALOG_PATH),
            catalog_refresh_secs: 0,
            data_dir: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LogSettings {
    pub level: String,
    pub format: LogFormat,
}

impl Default for LogSettings {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::Pretty,
        }
    }
}

impl EngineSettings {
    /// Load settings from an optional file plus environment overrides
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut builder = Config::builder();
        match path {
            Some(path) => {
                builder = builder.add_source(File::from(path.to_path_buf()).required(true));
            }
            None => {
                builder = builder.add_source(File::with_name("config/shopbot").required(false));
            }
        }
        builder = builder.add_source(
            Environment::with_prefix("SHOPBOT")
                .separator("__")
                .try_parsing(true),
        );

        let settings: EngineSettings = builder
            .build()
            .and_then(|c| c.try_deserialize())
            .map_err(|e| ConfigError::Load(e.to_string()))?;
        settings.validate()?;

        tracing::debug!(
            context_ttl_secs = settings.session.context_ttl_secs,
            fuzzy_enabled = settings.matching.fuzzy_enabled,
            "Engine settings loaded"
        );
        Ok(settings)
    }

    /// Reject values the engine cannot work with
    pub fn validate(&self) -> Result<(), ConfigError> {
        let unit = |name: &str, v: f64| {
            if (0.0..=1.0).contains(&v) {
                Ok(())
            } else {
                Err(ConfigError::Invalid(format!("{} must be within [0, 1], got {}", name, v)))
            }
        };
        unit("matching.faq_similarity_threshold", self.matching.faq_similarity_threshold)?;
        unit("matching.fuzzy_max_score", self.matching.fuzzy_max_score)?;
        unit("matching.overlap_min_score", self.matching.overlap_min_score)?;

        if self.session.context_ttl_secs == 0 {
            return Err(ConfigError::Invalid("session.context_ttl_secs must be positive".into()));
        }
        if self.session.product_ttl_secs == 0 {
            return Err(ConfigError::Invalid("session.product_ttl_secs must be positive".into()));
        }
        if self.replies.top_n == 0 {
            return Err(ConfigError::Invalid("replies.top_n must be positive".into()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults_are_valid() {
        let settings = EngineSettings::default();
        assert!(settings.validate().is_ok());
        assert_eq!(settings.session.context_ttl(), Duration::from_secs(600));
        assert_eq!(settings.replies.quote_form_url, "/quote.html");
    }

    #[test]
    fn test_yaml_partial_override() {
        let yaml = r#"
matching:
  fuzzy_enabled: false
session:
  context_ttl_secs: 120
"#;
        let settings: EngineSettings = serde_yaml::from_str(yaml).unwrap();
        assert!(!settings.matching.fuzzy_enabled);
        assert_eq!(settings.matching.overlap_min_score, 0.3);
        assert_eq!(settings.session.context_ttl_secs, 120);
        assert_eq!(settings.session.product_ttl_secs, 600);
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::Builder::new().suffix(".yaml").tempfile().unwrap();
        writeln!(file, "server:\n  port: 8088\nlog:\n  format: json").unwrap();

        let settings = EngineSettings::load(Some(file.path())).unwrap();
        assert_eq!(settings.server.port, 8088);
        assert_eq!(settings.log.format, LogFormat::Json);
    }

    #[test]
    fn test_validation_rejects_out_of_range() {
        let mut settings = EngineSettings::default();
        settings.matching.fuzzy_max_score = 1.5;
        assert!(matches!(settings.validate(), Err(ConfigError::Invalid(_))));

        let mut settings = EngineSettings::default();
        settings.session.context_ttl_secs = 0;
        assert!(settings.validate().is_err());
    }
}
