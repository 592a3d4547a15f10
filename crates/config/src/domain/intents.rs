//! Intent and chitchat keyword tables

use serde::{Deserialize, Serialize};
use shopbot_core::{ChitchatType, Intent};

/// Intent classification tables
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct IntentRules {
    /// Phrases that classify as `list_categories` before any rule is tried
    #[serde(default)]
    pub category_listing: Vec<String>,
    /// Ordered rule table; the first rule with a matching keyword wins
    #[serde(default)]
    pub rules: Vec<IntentRule>,
    /// Tried after the rule table
    #[serde(default)]
    pub recommend: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IntentRule {
    pub intent: Intent,
    pub keywords: Vec<String>,
}

/// Keywords for one small-talk type
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChitchatRule {
    pub kind: ChitchatType,
    pub keywords: Vec<String>,
}
