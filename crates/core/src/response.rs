//! Structured bot replies

use serde::{Deserialize, Serialize};

use crate::Product;

/// Suggested follow-up button
///
/// A `url` means "navigate". Otherwise clicking resubmits `payload`, or
/// `text` when there is no payload, as the next user message.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuickReply {
    pub text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payload: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

impl QuickReply {
    pub fn payload(text: impl Into<String>, payload: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            payload: Some(payload.into()),
            url: None,
        }
    }

    pub fn link(text: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            payload: None,
            url: Some(url.into()),
        }
    }

    /// Message that clicking this button sends, if it sends one
    pub fn submission(&self) -> Option<&str> {
        if self.url.is_some() {
            return None;
        }
        Some(self.payload.as_deref().unwrap_or(&self.text))
    }
}

/// Reply produced for one user turn
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum BotResponse {
    Text {
        text: String,
        /// Products rendered inline as cards
        #[serde(default, skip_serializing_if = "Vec::is_empty")]
        items: Vec<Product>,
        #[serde(rename = "quickReplies", default, skip_serializing_if = "Vec::is_empty")]
        quick_replies: Vec<QuickReply>,
    },
    Product {
        product: Product,
        #[serde(rename = "quickReplies", default, skip_serializing_if = "Vec::is_empty")]
        quick_replies: Vec<QuickReply>,
    },
    Link {
        text: String,
        url: String,
        #[serde(rename = "quickReplies", default, skip_serializing_if = "Vec::is_empty")]
        quick_replies: Vec<QuickReply>,
    },
}

impl BotResponse {
    pub fn text(text: impl Into<String>) -> Self {
        BotResponse::Text {
            text: text.into(),
            items: Vec::new(),
            quick_replies: Vec::new(),
        }
    }

    pub fn product(product: Product) -> Self {
        BotResponse::Product {
            product,
            quick_replies: Vec::new(),
        }
    }

    pub fn link(text: impl Into<String>, url: impl Into<String>) -> Self {
        BotResponse::Link {
            text: text.into(),
            url: url.into(),
            quick_replies: Vec::new(),
        }
    }

    pub fn with_quick_replies(mut self, replies: Vec<QuickReply>) -> Self {
        match &mut self {
            BotResponse::Text { quick_replies, .. }
            | BotResponse::Product { quick_replies, .. }
            | BotResponse::Link { quick_replies, .. } => *quick_replies = replies,
        }
        self
    }

    /// Attach inline product cards; only text replies carry items
    pub fn with_items(mut self, products: Vec<Product>) -> Self {
        if let BotResponse::Text { items, .. } = &mut self {
            *items = products;
        }
        self
    }

    /// Wire tag of the variant
    pub fn kind(&self) -> &'static str {
        match self {
            BotResponse::Text { .. } => "text",
            BotResponse::Product { .. } => "product",
            BotResponse::Link { .. } => "link",
        }
    }

    /// Text body, if the variant has one
    pub fn text_body(&self) -> Option<&str> {
        match self {
            BotResponse::Text { text, .. } | BotResponse::Link { text, .. } => Some(text),
            BotResponse::Product { .. } => None,
        }
    }

    pub fn quick_replies(&self) -> &[QuickReply] {
        match self {
            BotResponse::Text { quick_replies, .. }
            | BotResponse::Product { quick_replies, .. }
            | BotResponse::Link { quick_replies, .. } => quick_replies,
        }
    }

    pub fn items(&self) -> &[Product] {
        match self {
            BotResponse::Text { items, .. } => items,
            _ => &[],
        }
    }

    pub fn as_product(&self) -> Option<&Product> {
        match self {
            BotResponse::Product { product, .. } => Some(product),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_reply_wire_shape() {
        let reply = BotResponse::text("Xin chào")
            .with_quick_replies(vec![QuickReply::payload("Gợi ý", "gợi ý rẻ")]);
        let json = serde_json::to_value(&reply).unwrap();
        assert_eq!(json["type"], "text");
        assert_eq!(json["quickReplies"][0]["payload"], "gợi ý rẻ");
        assert!(json.get("items").is_none());
    }

    #[test]
    fn test_link_reply_wire_shape() {
        let reply = BotResponse::link("Điền form", "/quote.html");
        let json = serde_json::to_value(&reply).unwrap();
        assert_eq!(json["type"], "link");
        assert_eq!(json["url"], "/quote.html");
        assert!(json.get("quickReplies").is_none());
    }

    #[test]
    fn test_items_only_on_text() {
        let p = Product::new("p1", "Áo");
        let reply = BotResponse::product(p.clone()).with_items(vec![p]);
        assert!(reply.items().is_empty());
        assert_eq!(reply.kind(), "product");
    }

    #[test]
    fn test_quick_reply_submission() {
        assert_eq!(QuickReply::payload("Xem", "similar").submission(), Some("similar"));
        assert_eq!(QuickReply::link("Form", "/quote.html").submission(), None);
        let bare = QuickReply {
            text: "size".to_string(),
            payload: None,
            url: None,
        };
        assert_eq!(bare.submission(), Some("size"));
    }
}
