//! Core types and collaborator traits for the shop dialog engine
//!
//! Everything the dialog pipeline exchanges lives here:
//! - `Product` and the read-only `CatalogProvider` collaborator
//! - `Intent` / `ChitchatType` classification tags
//! - `UserContext` and the `ContextStore` / `ProductCache` seams
//! - `BotResponse`, the structured reply handed back to the caller
//! - `Clock`, so TTL behaviour can be driven from tests

pub mod catalog;
pub mod clock;
pub mod context;
pub mod intent;
pub mod money;
pub mod response;

pub use catalog::{CatalogError, CatalogProvider, CatalogSnapshot, Product, StaticCatalog};
pub use clock::{Clock, ManualClock, SystemClock};
pub use context::{ContextPatch, ContextStore, ProductCache, UserContext};
pub use intent::{ChitchatType, Intent, MissingEntity};
pub use money::{format_price, format_vnd};
pub use response::{BotResponse, QuickReply};
