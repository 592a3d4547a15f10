//! Short-lived per-user conversational state

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{Intent, MissingEntity, Product};

/// Conversation state carried between turns for one user
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserContext {
    pub user_id: String,
    pub current_intent: Option<Intent>,
    pub missing_entity: Option<MissingEntity>,
    pub last_message: Option<String>,
    pub last_category: Option<String>,
    /// Time of the last write
    pub timestamp: DateTime<Utc>,
}

impl UserContext {
    pub fn new(user_id: impl Into<String>, timestamp: DateTime<Utc>) -> Self {
        Self {
            user_id: user_id.into(),
            current_intent: None,
            missing_entity: None,
            last_message: None,
            last_category: None,
            timestamp,
        }
    }

    /// True when the bot is waiting for the user to fill a slot
    pub fn awaiting_slot(&self) -> bool {
        self.current_intent.is_some() && self.missing_entity.is_some()
    }
}

/// Partial update merged over an existing context
///
/// `None` fields leave the stored value untouched.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ContextPatch {
    pub current_intent: Option<Intent>,
    pub missing_entity: Option<MissingEntity>,
    pub last_message: Option<String>,
    pub last_category: Option<String>,
}

impl ContextPatch {
    pub fn intent(mut self, intent: Intent) -> Self {
        self.current_intent = Some(intent);
        self
    }

    pub fn missing(mut self, entity: MissingEntity) -> Self {
        self.missing_entity = Some(entity);
        self
    }

    pub fn message(mut self, message: impl Into<String>) -> Self {
        self.last_message = Some(message.into());
        self
    }

    pub fn category(mut self, category_id: impl Into<String>) -> Self {
        self.last_category = Some(category_id.into());
        self
    }

    /// Shallow merge: present fields overwrite, absent fields persist
    pub fn apply_to(self, context: &mut UserContext) {
        if let Some(intent) = self.current_intent {
            context.current_intent = Some(intent);
        }
        if let Some(entity) = self.missing_entity {
            context.missing_entity = Some(entity);
        }
        if let Some(message) = self.last_message {
            context.last_message = Some(message);
        }
        if let Some(category) = self.last_category {
            context.last_category = Some(category);
        }
    }
}

/// Per-user context storage
///
/// Implementations must never return a context older than their TTL.
pub trait ContextStore: Send + Sync {
    /// Stored context, or `None` if absent or expired
    fn get(&self, user_id: &str) -> Option<UserContext>;

    /// Merge `patch` over the live context (or a fresh one) and stamp it now
    fn save(&self, user_id: &str, patch: ContextPatch) -> UserContext;

    /// Drop the context unconditionally
    fn clear(&self, user_id: &str);
}

/// Per-user pointer to the most recently discussed product
pub trait ProductCache: Send + Sync {
    fn get(&self, user_id: &str) -> Option<Product>;

    fn set(&self, user_id: &str, product: Product);

    fn clear(&self, user_id: &str);
}
