//! Classification tags produced per message

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Business intent of a single message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Intent {
    QuoteSingle,
    QuoteBulk,
    Consulting,
    Greeting,
    ProductInfo,
    SizeInfo,
    StockInfo,
    ListCategories,
    Recommend,
    None,
}

impl Intent {
    pub const ALL: [Intent; 10] = [
        Intent::QuoteSingle,
        Intent::QuoteBulk,
        Intent::Consulting,
        Intent::Greeting,
        Intent::ProductInfo,
        Intent::SizeInfo,
        Intent::StockInfo,
        Intent::ListCategories,
        Intent::Recommend,
        Intent::None,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Intent::QuoteSingle => "quote_single",
            Intent::QuoteBulk => "quote_bulk",
            Intent::Consulting => "consulting",
            Intent::Greeting => "greeting",
            Intent::ProductInfo => "product_info",
            Intent::SizeInfo => "size_info",
            Intent::StockInfo => "stock_info",
            Intent::ListCategories => "list_categories",
            Intent::Recommend => "recommend",
            Intent::None => "none",
        }
    }

    /// Intents that continue the same topic as `self`
    ///
    /// A context opened by `self` survives a new message classified as one
    /// of these.
    pub fn related(&self) -> &'static [Intent] {
        match self {
            Intent::QuoteSingle => &[Intent::QuoteBulk, Intent::Consulting],
            Intent::Consulting => &[Intent::QuoteSingle, Intent::QuoteBulk],
            Intent::QuoteBulk => &[Intent::QuoteSingle, Intent::Consulting],
            Intent::ListCategories => &[Intent::ProductInfo, Intent::SizeInfo, Intent::StockInfo],
            _ => &[],
        }
    }

    pub fn is_related_to(&self, context_intent: Intent) -> bool {
        context_intent.related().contains(self)
    }
}

impl fmt::Display for Intent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Intent {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Intent::ALL
            .iter()
            .copied()
            .find(|i| i.as_str() == s)
            .ok_or_else(|| format!("unknown intent: {}", s))
    }
}

/// Small-talk classification, independent of `Intent`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChitchatType {
    Greeting,
    Thanks,
    Goodbye,
    None,
}

impl ChitchatType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ChitchatType::Greeting => "greeting",
            ChitchatType::Thanks => "thanks",
            ChitchatType::Goodbye => "goodbye",
            ChitchatType::None => "none",
        }
    }
}

impl fmt::Display for ChitchatType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Slot the bot asked the user to fill
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MissingEntity {
    ProductName,
    ProductCategory,
}
