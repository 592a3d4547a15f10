//! Multi-turn conversations through the full decision ladder

use std::sync::Arc;

use chrono::Duration;
use shopbot_agent::{Branch, DialogEngine, SIMILAR_PAYLOAD};
use shopbot_config::{DomainData, EngineSettings};
use shopbot_core::{Intent, ManualClock, Product, StaticCatalog};

fn product(id: &str, name: &str, brand: &str, category: &str, price: u64, stock: i64, sold: u64) -> Product {
    Product {
        brand: Some(brand.to_string()),
        category_id: Some(category.to_string()),
        price: Some(price),
        stock: Some(stock),
        sold: Some(sold),
        ..Product::new(id, name)
    }
}

fn catalog() -> Vec<Product> {
    vec![
        product("p001", "Áo thun basic trắng", "Coolmate", "c:tee", 149_000, 42, 120),
        product("p002", "Áo thun basic đen", "Coolmate", "c:tee", 149_000, 35, 95),
        product("p004", "Quần jean slim fit xanh", "Levi's", "c:jean", 890_000, 12, 75),
        product("p006", "Hoodie nỉ trơn xám", "Routine", "c:hoodie", 399_000, 27, 88),
        product("p010", "Giày sneakers trắng classic", "Biti's", "c:sneakers", 690_000, 30, 110),
    ]
}

fn engine() -> (DialogEngine, Arc<ManualClock>) {
    let clock = Arc::new(ManualClock::starting_now());
    let domain = DomainData::embedded().unwrap();
    let engine = DialogEngine::with_clock(
        &domain,
        &EngineSettings::default(),
        Arc::new(StaticCatalog::new(catalog())),
        clock.clone(),
    );
    (engine, clock)
}

#[tokio::test]
async fn test_quote_for_named_product() {
    let (engine, _) = engine();
    let outcome = engine.handle_turn("báo giá áo thun basic trắng", Some("u1")).await;

    assert_eq!(outcome.branch, Branch::QuoteSingle);
    assert_eq!(outcome.reply.as_product().unwrap().id, "p001");
    let replies = outcome.reply.quick_replies();
    assert_eq!(replies[0].payload.as_deref(), Some(SIMILAR_PAYLOAD));
    assert_eq!(replies[1].url.as_deref(), Some("/quote.html"));

    assert_eq!(engine.products().get("u1").unwrap().id, "p001");
}

#[tokio::test]
async fn test_similar_follows_remembered_product() {
    let (engine, _) = engine();
    engine.handle_turn("báo giá áo thun basic trắng", Some("u1")).await;

    let outcome = engine.handle_turn(SIMILAR_PAYLOAD, Some("u1")).await;
    assert_eq!(outcome.branch, Branch::Similar);
    assert!(outcome.reply.text_body().unwrap().starts_with("Các sản phẩm tương tự"));
    let ids: Vec<&str> = outcome.reply.items().iter().map(|p| p.id.as_str()).collect();
    assert_eq!(ids, vec!["p002"]);
}

#[tokio::test]
async fn test_greeting_shows_best_sellers() {
    let (engine, _) = engine();
    let outcome = engine.handle_turn("xin chào", Some("u2")).await;

    assert_eq!(outcome.branch, Branch::Greeting);
    let ids: Vec<&str> = outcome.reply.items().iter().map(|p| p.id.as_str()).collect();
    assert_eq!(ids, vec!["p001", "p010", "p002"]);
    assert_eq!(outcome.reply.quick_replies()[0].text, "Áo thun basic trắng");
}

#[tokio::test]
async fn test_stock_question_for_named_product() {
    let (engine, _) = engine();
    let outcome = engine
        .handle_turn("còn hàng áo thun basic trắng không", Some("u3"))
        .await;

    assert_eq!(outcome.branch, Branch::Stock);
    let text = outcome.reply.text_body().unwrap();
    assert!(text.contains("Áo thun basic trắng"));
    assert!(text.contains("Tồn kho: 42 sản phẩm"));
}

#[tokio::test]
async fn test_stock_question_uses_remembered_product() {
    let (engine, _) = engine();
    engine.handle_turn("báo giá áo thun basic trắng", Some("u3")).await;

    let outcome = engine.handle_turn("còn hàng không", Some("u3")).await;
    assert_eq!(outcome.branch, Branch::Stock);
    assert!(outcome.reply.text_body().unwrap().contains("Tồn kho: 42 sản phẩm"));
}

#[tokio::test]
async fn test_consulting_slot_is_filled_next_turn() {
    let (engine, _) = engine();

    let first = engine.handle_turn("tư vấn", Some("u4")).await;
    assert_eq!(first.branch, Branch::ConsultingMissing);
    let context = engine.contexts().get("u4").unwrap();
    assert_eq!(context.current_intent, Some(Intent::Consulting));
    assert!(context.awaiting_slot());

    let second = engine.handle_turn("áo thun", Some("u4")).await;
    assert_eq!(second.branch, Branch::SlotConsulting);
    assert_eq!(
        second.reply.text_body(),
        Some("Bạn cần tư vấn về sản phẩm nào?")
    );
    assert!(engine.contexts().get("u4").is_none());
}

#[tokio::test]
async fn test_expired_context_is_forgotten() {
    let (engine, clock) = engine();
    engine.handle_turn("tư vấn", Some("u5")).await;

    clock.advance(Duration::minutes(11));
    assert!(engine.contexts().get("u5").is_none());

    let outcome = engine.handle_turn("áo thun", Some("u5")).await;
    assert_eq!(outcome.branch, Branch::Fallback);
}

#[tokio::test]
async fn test_context_survives_within_ttl() {
    let (engine, clock) = engine();
    engine.handle_turn("tư vấn", Some("u5")).await;

    clock.advance(Duration::minutes(9));
    let outcome = engine.handle_turn("áo thun", Some("u5")).await;
    assert_eq!(outcome.branch, Branch::SlotConsulting);
}

#[tokio::test]
async fn test_faq_answer_clears_context() {
    let (engine, _) = engine();
    engine.handle_turn("tư vấn", Some("u6")).await;

    let outcome = engine.handle_turn("phí ship bao nhiêu", Some("u6")).await;
    assert_eq!(outcome.branch, Branch::Faq);
    assert!(outcome.reply.text_body().unwrap().starts_with("Phí giao hàng nội thành"));
    assert!(engine.contexts().get("u6").is_none());
}

#[tokio::test]
async fn test_sensitive_message_refused_and_context_cleared() {
    let (engine, _) = engine();
    engine.handle_turn("tư vấn", Some("u7")).await;
    assert!(engine.contexts().get("u7").is_some());

    let outcome = engine.handle_turn("đm shop", Some("u7")).await;
    assert_eq!(outcome.branch, Branch::Sensitive);
    assert!(outcome.reply.text_body().unwrap().contains("lịch sự"));
    assert!(engine.contexts().get("u7").is_none());
}

#[tokio::test]
async fn test_recommend_without_budget_asks_for_one() {
    let (engine, _) = engine();
    let outcome = engine.handle_turn("gợi ý rẻ", Some("u8")).await;

    assert_eq!(outcome.branch, Branch::BudgetPrompt);
    assert_eq!(outcome.reply.quick_replies().len(), 3);
}

#[tokio::test]
async fn test_budget_cue_recommends_within_budget() {
    let (engine, _) = engine();
    let outcome = engine.handle_turn("gợi ý dưới 200k", Some("u8")).await;

    assert_eq!(outcome.branch, Branch::BudgetCue);
    let ids: Vec<&str> = outcome.reply.items().iter().map(|p| p.id.as_str()).collect();
    assert_eq!(ids, vec!["p001", "p002"]);
}

#[tokio::test]
async fn test_top_seller_collapses_to_card() {
    let (engine, _) = engine();
    let outcome = engine.handle_turn("sản phẩm bán chạy nhất", Some("u9")).await;

    assert_eq!(outcome.branch, Branch::BestSellers);
    assert_eq!(outcome.reply.as_product().unwrap().id, "p001");
}

#[tokio::test]
async fn test_category_list_counts_products() {
    let (engine, _) = engine();
    let outcome = engine.handle_turn("xem danh mục", Some("u10")).await;

    assert_eq!(outcome.branch, Branch::CategoryList);
    assert!(outcome.reply.text_body().unwrap().starts_with("Các danh mục hiện có"));
    assert_eq!(
        engine.contexts().get("u10").unwrap().current_intent,
        Some(Intent::ListCategories)
    );
}

#[tokio::test]
async fn test_unknown_text_falls_back() {
    let (engine, _) = engine();
    let outcome = engine.handle_turn("hôm nay trời đẹp", Some("u11")).await;

    assert_eq!(outcome.branch, Branch::Fallback);
    assert_eq!(outcome.reply.items().len(), 3);
}

#[tokio::test]
async fn test_anonymous_user_gets_generated_id() {
    let (engine, _) = engine();
    let outcome = engine.handle_turn("xin chào", None).await;
    assert!(outcome.user_id.starts_with("user_"));

    let blank = engine.handle_turn("xin chào", Some("  ")).await;
    assert_ne!(blank.user_id, outcome.user_id);
}

#[tokio::test]
async fn test_budget_cue_turn_remembers_category_for_stock() {
    let (engine, _) = engine();
    let first = engine.handle_turn("áo thun dưới 200k", Some("u12")).await;
    assert_eq!(first.branch, Branch::BudgetCue);
    assert_eq!(
        engine.contexts().get("u12").unwrap().last_category.as_deref(),
        Some("c:tee")
    );

    let second = engine.handle_turn("còn hàng không", Some("u12")).await;
    assert_eq!(second.branch, Branch::Stock);
    let text = second.reply.text_body().unwrap();
    assert!(text.starts_with("Bạn muốn xem tồn kho"));
    assert!(text.contains("danh mục Áo thun"));
    assert_eq!(second.reply.quick_replies().len(), 2);
}

#[tokio::test]
async fn test_unrelated_intent_clears_open_quote() {
    let (engine, _) = engine();
    let first = engine.handle_turn("báo giá", Some("u13")).await;
    assert_eq!(first.branch, Branch::QuoteMissing);
    let context = engine.contexts().get("u13").unwrap();
    assert_eq!(context.current_intent, Some(Intent::QuoteSingle));
    assert!(context.awaiting_slot());

    let second = engine.handle_turn("xin chào", Some("u13")).await;
    assert_eq!(second.branch, Branch::Greeting);
    assert!(engine.contexts().get("u13").is_none());
}

#[tokio::test]
async fn test_related_intent_keeps_open_quote() {
    let (engine, _) = engine();
    engine.handle_turn("báo giá", Some("u14")).await;

    let outcome = engine.handle_turn("nhiều sản phẩm", Some("u14")).await;
    assert_eq!(outcome.branch, Branch::QuoteBulk);
    let context = engine.contexts().get("u14").unwrap();
    assert_eq!(context.current_intent, Some(Intent::QuoteSingle));
    assert!(context.awaiting_slot());
}

#[tokio::test]
async fn test_quote_slot_is_filled_by_product_name() {
    let (engine, _) = engine();
    engine.handle_turn("báo giá", Some("u15")).await;

    let outcome = engine.handle_turn("áo thun basic trắng", Some("u15")).await;
    assert_eq!(outcome.branch, Branch::SlotQuote);
    assert_eq!(outcome.reply.as_product().unwrap().id, "p001");
    assert!(engine.contexts().get("u15").is_none());
    assert_eq!(engine.products().get("u15").unwrap().id, "p001");
}
