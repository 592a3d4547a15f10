//! Dialog orchestration
//!
//! One turn runs a fixed decision ladder; the first rung that produces a
//! reply ends the turn:
//! 1. sensitive words (context cleared, polite refusal)
//! 2. the "similar" payload while a product is remembered
//! 3. FAQ (context cleared)
//! 4. topic-change check against the stored context
//! 5. open slot-filling question from the previous turn, after which a
//!    category named in the message is remembered
//! 6. budget, best-seller and stock cue shortcuts
//! 7. per-intent handling
//! 8. greeting, thanks, goodbye
//! 9. fallback
//!
//! # Example
//!
//! ```ignore
//! let engine = DialogEngine::new(&domain, &settings, catalog);
//! let reply = engine.handle_message("báo giá áo thun basic trắng", Some("u1")).await;
//! assert_eq!(reply.kind(), "product");
//! ```

use std::sync::Arc;

use once_cell::sync::Lazy;
use regex::Regex;
use shopbot_config::{DomainData, EngineSettings};
use shopbot_core::{
    BotResponse, CatalogProvider, CatalogSnapshot, ChitchatType, Clock, ContextPatch, ContextStore,
    Intent, MissingEntity, Product, ProductCache, SystemClock,
};
use shopbot_text_processing::{ChitchatDetector, FaqMatcher, Normalizer, SensitiveFilter};
use unicode_normalization::UnicodeNormalization;
use uuid::Uuid;

use crate::entity::{ProductKeywordGate, ResolverChain};
use crate::intent::IntentMatcher;
use crate::responder::{ListingKind, Responder, SIMILAR_PAYLOAD};
use crate::session::{InMemoryContextStore, InMemoryProductCache};

static BUDGET_CUE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)(\d+(?:[.,]\d+)?)(\s*)(k|nghìn|ngan|ngàn|tr\d*|triệu|m|đ|vnd)\b|ngân\s*sách|khoảng\s*\d+")
        .unwrap()
});

static BESTSELLER_CUE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)(bán\s*chạy\s*nhất|top\s*bán\s*chạy|sản\s*phẩm\s*bán\s*chạy)").unwrap()
});

static TOP_ONE_CUE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)(nhất|top\s*1|#1)").unwrap());

static STOCK_CUE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)(còn\s*hàng|tồn\s*kho|còn\s*không|hết\s*hàng|số\s*lượng\s*còn|còn\s*bao\s*nhiêu|\bstock\b)")
        .unwrap()
});

/// Which rung of the ladder answered a turn
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Branch {
    Sensitive,
    Similar,
    Faq,
    SlotQuote,
    SlotConsulting,
    BudgetCue,
    BestSellers,
    Stock,
    QuoteSingle,
    QuoteMissing,
    QuoteBulk,
    BudgetPrompt,
    Recommend,
    CategoryList,
    ProductInfo,
    StockInfo,
    SizeInfo,
    Consulting,
    ConsultingMissing,
    Greeting,
    Thanks,
    Goodbye,
    Fallback,
}

impl Branch {
    pub fn as_str(&self) -> &'static str {
        match self {
            Branch::Sensitive => "sensitive",
            Branch::Similar => "similar",
            Branch::Faq => "faq",
            Branch::SlotQuote => "slot_quote",
            Branch::SlotConsulting => "slot_consulting",
            Branch::BudgetCue => "budget_cue",
            Branch::BestSellers => "best_sellers",
            Branch::Stock => "stock",
            Branch::QuoteSingle => "quote_single",
            Branch::QuoteMissing => "quote_missing",
            Branch::QuoteBulk => "quote_bulk",
            Branch::BudgetPrompt => "budget_prompt",
            Branch::Recommend => "recommend",
            Branch::CategoryList => "category_list",
            Branch::ProductInfo => "product_info",
            Branch::StockInfo => "stock_info",
            Branch::SizeInfo => "size_info",
            Branch::Consulting => "consulting",
            Branch::ConsultingMissing => "consulting_missing",
            Branch::Greeting => "greeting",
            Branch::Thanks => "thanks",
            Branch::Goodbye => "goodbye",
            Branch::Fallback => "fallback",
        }
    }
}

/// Result of one turn
#[derive(Debug, Clone)]
pub struct TurnOutcome {
    /// Caller's id, or the one generated for an anonymous caller
    pub user_id: String,
    pub branch: Branch,
    pub reply: BotResponse,
}

/// Per-turn inputs shared by the ladder rungs
struct Turn<'a> {
    user_id: &'a str,
    /// As received
    message: &'a str,
    /// NFC form, for the cue patterns
    composed: String,
    /// Advanced-normalized form, for product resolution
    folded: String,
    catalog: &'a CatalogSnapshot,
}

/// Rule-based shop assistant
pub struct DialogEngine {
    catalog: Arc<dyn CatalogProvider>,
    sensitive: SensitiveFilter,
    faq: FaqMatcher,
    chitchat: ChitchatDetector,
    intents: IntentMatcher,
    resolvers: ResolverChain,
    gate: ProductKeywordGate,
    normalizer: Normalizer,
    responder: Responder,
    contexts: Arc<dyn ContextStore>,
    products: Arc<dyn ProductCache>,
}

impl DialogEngine {
    /// Engine with in-memory sessions on the wall clock
    pub fn new(domain: &DomainData, settings: &EngineSettings, catalog: Arc<dyn CatalogProvider>) -> Self {
        Self::with_clock(domain, settings, catalog, Arc::new(SystemClock))
    }

    /// Engine with in-memory sessions on the given clock
    pub fn with_clock(
        domain: &DomainData,
        settings: &EngineSettings,
        catalog: Arc<dyn CatalogProvider>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        let contexts = Arc::new(InMemoryContextStore::new(settings.session.context_ttl(), clock.clone()));
        let products = Arc::new(InMemoryProductCache::new(settings.session.product_ttl(), clock));
        Self::with_stores(domain, settings, catalog, contexts, products)
    }

    pub fn with_stores(
        domain: &DomainData,
        settings: &EngineSettings,
        catalog: Arc<dyn CatalogProvider>,
        contexts: Arc<dyn ContextStore>,
        products: Arc<dyn ProductCache>,
    ) -> Self {
        let normalizer = Normalizer::new(&domain.lexicon.stop_words);
        let resolvers = ResolverChain::from_settings(&settings.matching, &normalizer);

        tracing::info!(
            resolvers = ?resolvers.resolver_names(),
            faq_entries = domain.faq.len(),
            categories = domain.categories.len(),
            "Dialog engine ready"
        );

        Self {
            catalog,
            sensitive: SensitiveFilter::new(&domain.sensitive, normalizer.clone()),
            faq: FaqMatcher::new(&domain.faq, normalizer.clone(), settings.matching.faq_similarity_threshold),
            chitchat: ChitchatDetector::new(&domain.chitchat, normalizer.clone()),
            intents: IntentMatcher::new(&domain.intents),
            resolvers,
            gate: ProductKeywordGate::new(&domain.lexicon, normalizer.clone()),
            normalizer,
            responder: Responder::new(domain, &settings.replies),
            contexts,
            products,
        }
    }

    pub fn contexts(&self) -> &Arc<dyn ContextStore> {
        &self.contexts
    }

    pub fn products(&self) -> &Arc<dyn ProductCache> {
        &self.products
    }

    /// Answer one message; never fails
    pub async fn handle_message(&self, message: &str, user_id: Option<&str>) -> BotResponse {
        self.handle_turn(message, user_id).await.reply
    }

    /// Answer one message and report which branch answered it
    pub async fn handle_turn(&self, message: &str, user_id: Option<&str>) -> TurnOutcome {
        let user_id = match user_id {
            Some(id) if !id.trim().is_empty() => id.to_string(),
            _ => generate_user_id(),
        };

        let catalog = match self.catalog.snapshot().await {
            Ok(snapshot) => snapshot,
            Err(e) => {
                tracing::warn!(error = %e, "Catalog unavailable, answering without products");
                metrics::counter!("shopbot_catalog_errors_total").increment(1);
                Arc::new(CatalogSnapshot::default())
            }
        };

        let turn = Turn {
            user_id: &user_id,
            message,
            composed: message.nfc().collect(),
            folded: self.normalizer.advanced(message),
            catalog: &catalog,
        };
        let (branch, reply) = self.decide(&turn);

        metrics::counter!("shopbot_turns_total", "branch" => branch.as_str()).increment(1);
        tracing::debug!(user_id = %user_id, branch = branch.as_str(), reply = reply.kind(), "Turn answered");

        TurnOutcome {
            user_id,
            branch,
            reply,
        }
    }

    fn decide(&self, turn: &Turn<'_>) -> (Branch, BotResponse) {
        let user_id = turn.user_id;

        if self.sensitive.detect(turn.message).is_some() {
            self.contexts.clear(user_id);
            metrics::counter!("shopbot_sensitive_hits_total").increment(1);
            tracing::info!(user_id, "Sensitive message refused");
            return (Branch::Sensitive, self.responder.sensitive_refusal());
        }

        if turn.message == SIMILAR_PAYLOAD {
            if let Some(current) = self.products.get(user_id) {
                return (Branch::Similar, self.responder.similar(&current, turn.catalog));
            }
        }

        if let Some((faq_id, answer)) = self.faq.find_entry(turn.message) {
            self.contexts.clear(user_id);
            metrics::counter!("shopbot_faq_hits_total").increment(1);
            tracing::info!(user_id, faq_id, "FAQ answered");
            return (Branch::Faq, self.responder.faq_answer(answer));
        }

        let intent = self.intents.classify(turn.message);
        let chitchat = self.chitchat.detect(turn.message);
        tracing::debug!(user_id, intent = intent.as_str(), chitchat = chitchat.as_str(), "Message classified");

        // Small talk alone never ends a topic
        if let Some(previous) = self.contexts.get(user_id).and_then(|c| c.current_intent) {
            if intent != Intent::None && !intent.is_related_to(previous) {
                tracing::debug!(user_id, from = previous.as_str(), to = intent.as_str(), "Topic changed");
                self.contexts.clear(user_id);
            }
        }

        let entity = self.resolvers.resolve(&turn.folded, turn.catalog);

        if let Some(context) = self.contexts.get(user_id).filter(|c| c.awaiting_slot()) {
            match (context.current_intent, &entity) {
                (Some(Intent::QuoteSingle), Some(product)) => {
                    self.contexts.clear(user_id);
                    self.products.set(user_id, product.clone());
                    return (Branch::SlotQuote, self.responder.product(product.clone()));
                }
                (Some(Intent::Consulting), _) => {
                    self.contexts.clear(user_id);
                    return (Branch::SlotConsulting, self.responder.consulting());
                }
                _ => {}
            }
        }

        // Remembered whichever rung answers below
        let text_category = self
            .responder
            .extractor()
            .category(turn.message)
            .map(|c| c.id.clone());

        if let Some(category_id) = &text_category {
            self.contexts.save(
                user_id,
                ContextPatch::default()
                    .category(category_id.as_str())
                    .message(turn.message),
            );
        }

        if BUDGET_CUE.is_match(&turn.composed) {
            return (Branch::BudgetCue, self.responder.recommend(turn.message, turn.catalog));
        }

        if BESTSELLER_CUE.is_match(&turn.composed) {
            let count = if TOP_ONE_CUE.is_match(&turn.composed) {
                1
            } else {
                self.responder.top_n()
            };
            return (Branch::BestSellers, self.responder.best_sellers(count, turn.catalog));
        }

        if STOCK_CUE.is_match(&turn.composed) {
            let product = entity.or_else(|| self.products.get(user_id));
            if let Some(product) = product {
                let reply = self.responder.stock_info(&product);
                self.products.set(user_id, product);
                return (Branch::Stock, reply);
            }
            let category = self.known_category(user_id, text_category.as_deref());
            let listing = category.and_then(|id| {
                self.responder
                    .category_listing(ListingKind::StockPrompt, &id, turn.catalog)
            });
            return (
                Branch::Stock,
                listing.unwrap_or_else(|| self.responder.ask_for_stock_product()),
            );
        }

        match intent {
            Intent::QuoteSingle => {
                let specific = self.gate.has_specific_product_name(&turn.folded, turn.catalog);
                return match entity {
                    Some(product) if specific => {
                        self.products.set(user_id, product.clone());
                        (Branch::QuoteSingle, self.responder.product(product))
                    }
                    _ => {
                        self.contexts.save(
                            user_id,
                            ContextPatch::default()
                                .intent(Intent::QuoteSingle)
                                .missing(MissingEntity::ProductName)
                                .message(turn.message),
                        );
                        (
                            Branch::QuoteMissing,
                            self.responder.missing_entity(Intent::QuoteSingle, turn.catalog),
                        )
                    }
                };
            }
            Intent::QuoteBulk => return (Branch::QuoteBulk, self.responder.bulk_quote()),
            Intent::Recommend => {
                if !turn.message.chars().any(|c| c.is_ascii_digit()) {
                    return (Branch::BudgetPrompt, self.responder.budget_prompt());
                }
                return (Branch::Recommend, self.responder.recommend(turn.message, turn.catalog));
            }
            Intent::ListCategories => {
                let mut patch = ContextPatch::default().intent(Intent::ListCategories);
                if let Some(category_id) = &text_category {
                    patch = patch.category(category_id.as_str());
                }
                self.contexts.save(user_id, patch);
                return (Branch::CategoryList, self.responder.category_list(turn.catalog));
            }
            Intent::ProductInfo | Intent::StockInfo | Intent::SizeInfo => {
                if let Some(answer) = self.product_topic(intent, turn, entity, text_category.as_deref()) {
                    return answer;
                }
            }
            Intent::Consulting => {
                if let Some(product) = entity {
                    self.products.set(user_id, product.clone());
                    return (Branch::Consulting, self.responder.product(product));
                }
                self.contexts.save(
                    user_id,
                    ContextPatch::default()
                        .intent(Intent::Consulting)
                        .missing(MissingEntity::ProductCategory)
                        .message(turn.message),
                );
                return (
                    Branch::ConsultingMissing,
                    self.responder.missing_entity(Intent::Consulting, turn.catalog),
                );
            }
            Intent::Greeting | Intent::None => {}
        }

        if intent == Intent::Greeting || chitchat == ChitchatType::Greeting {
            return (Branch::Greeting, self.responder.greeting(turn.catalog));
        }
        match chitchat {
            ChitchatType::Thanks => (Branch::Thanks, self.responder.thanks()),
            ChitchatType::Goodbye => (Branch::Goodbye, self.responder.goodbye()),
            _ => (Branch::Fallback, self.responder.fallback(turn.catalog)),
        }
    }

    /// Product, stock or size question: named product, then the remembered
    /// one, then a listing of the known category
    fn product_topic(
        &self,
        intent: Intent,
        turn: &Turn<'_>,
        entity: Option<Product>,
        text_category: Option<&str>,
    ) -> Option<(Branch, BotResponse)> {
        let (branch, listing) = match intent {
            Intent::ProductInfo => (Branch::ProductInfo, ListingKind::ProductInfo),
            Intent::StockInfo => (Branch::StockInfo, ListingKind::StockInfo),
            _ => (Branch::SizeInfo, ListingKind::SizeInfo),
        };

        let product = match entity {
            Some(product) => {
                self.products.set(turn.user_id, product.clone());
                Some(product)
            }
            None => self.products.get(turn.user_id),
        };

        if let Some(product) = product {
            let reply = match listing {
                ListingKind::StockInfo => self.responder.stock_info(&product),
                ListingKind::SizeInfo => self.responder.size_info(&product),
                _ => self.responder.product(product),
            };
            return Some((branch, reply));
        }

        let category = self.known_category(turn.user_id, text_category)?;
        self.responder
            .category_listing(listing, &category, turn.catalog)
            .map(|reply| (branch, reply))
    }

    /// Category remembered in the context, else the one named in the message
    fn known_category(&self, user_id: &str, text_category: Option<&str>) -> Option<String> {
        self.contexts
            .get(user_id)
            .and_then(|c| c.last_category)
            .or_else(|| text_category.map(str::to_string))
    }
}

fn generate_user_id() -> String {
    format!("user_{}", Uuid::new_v4().simple())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_budget_cue() {
        for text in ["khoảng 200k", "1tr2", "300.000đ", "ngân sách 2 triệu", "tầm 500 nghìn"] {
            assert!(BUDGET_CUE.is_match(text), "{}", text);
        }
        assert!(!BUDGET_CUE.is_match("áo thun size 42"));
    }

    #[test]
    fn test_stock_cue() {
        assert!(STOCK_CUE.is_match("còn hàng áo thun basic trắng không"));
        assert!(STOCK_CUE.is_match("Hoodie này CÒN KHÔNG"));
        assert!(STOCK_CUE.is_match("check stock"));
        assert!(!STOCK_CUE.is_match("stocking"));
    }

    #[test]
    fn test_bestseller_cues() {
        assert!(BESTSELLER_CUE.is_match("sản phẩm bán chạy nhất"));
        assert!(TOP_ONE_CUE.is_match("sản phẩm bán chạy nhất"));
        assert!(BESTSELLER_CUE.is_match("top bán chạy"));
        assert!(!TOP_ONE_CUE.is_match("top bán chạy"));
    }

    #[test]
    fn test_generated_user_id() {
        let id = generate_user_id();
        assert!(id.starts_with("user_"));
        assert_eq!(id.len(), "user_".len() + 32);
        assert_ne!(id, generate_user_id());
    }
}
