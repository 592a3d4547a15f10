//! Shop dialog engine
//!
//! Provides:
//! - Intent classification over the keyword rule tables
//! - Product resolution (fuzzy index with word-overlap fallback)
//! - TTL-bound per-user context and current-product stores
//! - Reply composition
//! - The per-turn decision ladder (`DialogEngine`)

pub mod dialog;
pub mod entity;
pub mod intent;
pub mod responder;
pub mod session;

pub use dialog::{Branch, DialogEngine, TurnOutcome};
pub use entity::{
    EntityResolver, FuzzyIndexError, FuzzyResolver, OverlapResolver, ProductKeywordGate,
    ResolverChain,
};
pub use intent::IntentMatcher;
pub use responder::{ListingKind, Responder, SIMILAR_PAYLOAD};
pub use session::{InMemoryContextStore, InMemoryProductCache};
