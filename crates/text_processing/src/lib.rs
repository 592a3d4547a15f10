//! Text processing for the shop dialog engine
//!
//! Features:
//! - Diacritic-insensitive normalization with stop-word removal
//! - Profanity filter with homonym disambiguation
//! - FAQ lookup
//! - Small-talk detection
//! - Budget, category and order-code extraction

pub mod chitchat;
pub mod entities;
pub mod faq;
pub mod normalize;
pub mod sensitive;

pub use chitchat::ChitchatDetector;
pub use entities::{extract_order_id, PricePreference, ShopEntityExtractor};
pub use faq::{word_overlap, FaqMatcher};
pub use normalize::{contains_words, normalize, significant_words, Normalizer};
pub use sensitive::SensitiveFilter;
