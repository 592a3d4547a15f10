//! Domain data
//!
//! The rule tables driving classification and replies. Defaults are
//! compiled in from `crates/config/data/*.yaml`; a data directory holding
//! files with the same names replaces them one file at a time.

mod catalog;
mod faq;
mod intents;
mod lexicon;
mod sensitive;

pub use catalog::{CategoryEntry, SizeGuide, SizeGuides};
pub use faq::FaqEntry;
pub use intents::{ChitchatRule, IntentRule, IntentRules};
pub use lexicon::Lexicon;
pub use sensitive::{AmbiguousForms, SensitiveWords};

use std::collections::HashSet;
use std::path::Path;

use serde::de::DeserializeOwned;

use crate::ConfigError;

const INTENTS_FILE: &str = "intents.yaml";
const FAQ_FILE: &str = "faq.yaml";
const CHITCHAT_FILE: &str = "chitchat.yaml";
const SENSITIVE_FILE: &str = "sensitive.yaml";
const CATEGORIES_FILE: &str = "categories.yaml";
const SIZE_GUIDES_FILE: &str = "size_guides.yaml";
const LEXICON_FILE: &str = "lexicon.yaml";

const EMBEDDED: &[(&str, &str)] = &[
    (INTENTS_FILE, include_str!("../../data/intents.yaml")),
    (FAQ_FILE, include_str!("../../data/faq.yaml")),
    (CHITCHAT_FILE, include_str!("../../data/chitchat.yaml")),
    (SENSITIVE_FILE, include_str!("../../data/sensitive.yaml")),
    (CATEGORIES_FILE, include_str!("../../data/categories.yaml")),
    (SIZE_GUIDES_FILE, include_str!("../../data/size_guides.yaml")),
    (LEXICON_FILE, include_str!("../../data/lexicon.yaml")),
];

/// All rule tables used by the engine
#[derive(Debug, Clone)]
pub struct DomainData {
    pub intents: IntentRules,
    pub faq: Vec<FaqEntry>,
    pub chitchat: Vec<ChitchatRule>,
    pub sensitive: SensitiveWords,
    /// Ordered; earlier entries win when several aliases match
    pub categories: Vec<CategoryEntry>,
    pub size_guides: SizeGuides,
    pub lexicon: Lexicon,
}

impl DomainData {
    /// Compiled-in defaults
    pub fn embedded() -> Result<Self, ConfigError> {
        Self::load(None::<&Path>)
    }

    /// Load domain data, preferring files found in `data_dir`
    pub fn load<P: AsRef<Path>>(data_dir: Option<P>) -> Result<Self, ConfigError> {
        let dir = data_dir.as_ref().map(|d| d.as_ref());
        let data = Self {
            intents: read_table(dir, INTENTS_FILE)?,
            faq: read_table(dir, FAQ_FILE)?,
            chitchat: read_table(dir, CHITCHAT_FILE)?,
            sensitive: read_table(dir, SENSITIVE_FILE)?,
            categories: read_table(dir, CATEGORIES_FILE)?,
            size_guides: read_table(dir, SIZE_GUIDES_FILE)?,
            lexicon: read_table(dir, LEXICON_FILE)?,
        };
        data.validate()?;

        tracing::debug!(
            intent_rules = data.intents.rules.len(),
            faq_entries = data.faq.len(),
            categories = data.categories.len(),
            "Domain data loaded"
        );
        Ok(data)
    }

    /// Check cross-table consistency
    pub fn validate(&self) -> Result<(), ConfigError> {
        let mut ids = HashSet::new();
        for category in &self.categories {
            if category.id.trim().is_empty() {
                return Err(ConfigError::Invalid("category with empty id".into()));
            }
            if !ids.insert(category.id.as_str()) {
                return Err(ConfigError::Invalid(format!(
                    "duplicate category id: {}",
                    category.id
                )));
            }
        }

        let mut faq_ids = HashSet::new();
        for entry in &self.faq {
            if entry.questions.is_empty() {
                return Err(ConfigError::Invalid(format!("FAQ {} has no questions", entry.id)));
            }
            if !faq_ids.insert(entry.id.as_str()) {
                return Err(ConfigError::Invalid(format!("duplicate FAQ id: {}", entry.id)));
            }
        }

        for rule in &self.intents.rules {
            if rule.keywords.is_empty() {
                return Err(ConfigError::Invalid(format!(
                    "intent rule {} has no keywords",
                    rule.intent
                )));
            }
        }
        Ok(())
    }
}

fn read_table<T: DeserializeOwned>(dir: Option<&Path>, file: &str) -> Result<T, ConfigError> {
    if let Some(dir) = dir {
        let path = dir.join(file);
        if path.is_file() {
            let content = std::fs::read_to_string(&path).map_err(|e| ConfigError::Read {
                path: path.display().to_string(),
                message: e.to_string(),
            })?;
            tracing::info!(path = %path.display(), "Using domain data override");
            return parse(file, &content);
        }
    }

    let content = EMBEDDED
        .iter()
        .find(|(name, _)| *name == file)
        .map(|(_, content)| *content)
        .ok_or_else(|| ConfigError::Read {
            path: file.to_string(),
            message: "no embedded default".to_string(),
        })?;
    parse(file, content)
}

fn parse<T: DeserializeOwned>(file: &str, content: &str) -> Result<T, ConfigError> {
    serde_yaml::from_str(content).map_err(|e| ConfigError::Parse {
        file: file.to_string(),
        message: e.to_string(),
    })
}
