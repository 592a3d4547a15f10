//! Configuration for the shop dialog engine
//!
//! Two layers:
//! - `EngineSettings`: numeric tuning, TTLs, server and logging options
//! - `DomainData`: the rule tables (intents, FAQ, chitchat, sensitive
//!   words, categories, size guides, lexicon) shipped as YAML

pub mod constants;
pub mod domain;
pub mod settings;

pub use domain::{
    AmbiguousForms, CategoryEntry, ChitchatRule, DomainData, FaqEntry, IntentRule, IntentRules,
    Lexicon, SensitiveWords, SizeGuide, SizeGuides,
};
pub use settings::{
    EngineSettings, FuzzyWeights, LogFormat, LogSettings, MatchingSettings, ReplySettings,
    ServerSettings, SessionSettings,
};

use thiserror::Error;

/// Configuration errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read {path}: {message}")]
    Read { path: String, message: String },

    #[error("Failed to parse {file}: {message}")]
    Parse { file: String, message: String },

    #[error("Failed to load settings: {0}")]
    Load(String),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}
