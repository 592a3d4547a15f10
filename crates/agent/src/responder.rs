//! Reply composition
//!
//! Turns a dialog decision into a `BotResponse`. Nothing here touches
//! session state; every reply is a function of its arguments, the catalog
//! snapshot and the static reply settings.

use shopbot_config::{DomainData, ReplySettings, SizeGuides};
use shopbot_core::{format_price, format_vnd, BotResponse, CatalogSnapshot, Intent, Product, QuickReply};
use shopbot_text_processing::{PricePreference, ShopEntityExtractor};

/// Payload sent by the "see similar" button
pub const SIMILAR_PAYLOAD: &str = "similar";

const SENSITIVE_REFUSAL: &str =
    "Mình muốn giữ cuộc trò chuyện lịch sự. Bạn vui lòng diễn đạt lại giúp mình nhé.";

/// Which follow-up a category listing asks for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListingKind {
    /// Stock question without a product
    StockPrompt,
    ProductInfo,
    StockInfo,
    SizeInfo,
}

pub struct Responder {
    extractor: ShopEntityExtractor,
    size_guides: SizeGuides,
    quote_form_url: String,
    top_n: usize,
}

fn info_payload(product: &Product) -> String {
    format!("thông tin {}", product.name.to_lowercase())
}

impl Responder {
    pub fn new(domain: &DomainData, settings: &ReplySettings) -> Self {
        Self {
            extractor: ShopEntityExtractor::new(domain, settings.default_cheap_budget),
            size_guides: domain.size_guides.clone(),
            quote_form_url: settings.quote_form_url.clone(),
            top_n: settings.top_n,
        }
    }

    /// Budget, category and preference extraction shared with the dialog
    pub fn extractor(&self) -> &ShopEntityExtractor {
        &self.extractor
    }

    pub fn top_n(&self) -> usize {
        self.top_n
    }

    fn base_quick_replies(&self) -> Vec<QuickReply> {
        vec![
            QuickReply::payload("Gợi ý theo ngân sách", "gợi ý rẻ"),
            QuickReply::payload("Gợi ý theo danh mục", "gợi ý áo thun"),
            QuickReply::payload("Tư vấn chọn size", "size"),
        ]
    }

    fn view_quick_replies(&self, products: &[Product]) -> Vec<QuickReply> {
        products
            .iter()
            .map(|p| QuickReply::payload(format!("Xem {}", p.name), info_payload(p)))
            .collect()
    }

    pub fn sensitive_refusal(&self) -> BotResponse {
        BotResponse::text(SENSITIVE_REFUSAL)
    }

    pub fn faq_answer(&self, answer: &str) -> BotResponse {
        BotResponse::text(answer)
    }

    /// Product card with "similar" and bulk-quote follow-ups
    pub fn product(&self, product: Product) -> BotResponse {
        BotResponse::product(product).with_quick_replies(vec![
            QuickReply::payload("Xem thêm sản phẩm tương tự", SIMILAR_PAYLOAD),
            QuickReply::link("Báo giá bộ sản phẩm", self.quote_form_url.as_str()),
        ])
    }

    /// Products sharing the brand (or, without a brand, the category)
    pub fn similar(&self, current: &Product, catalog: &CatalogSnapshot) -> BotResponse {
        let key = current
            .brand
            .as_deref()
            .or(current.category_id.as_deref())
            .unwrap_or("")
            .to_lowercase();

        let similar: Vec<Product> = catalog
            .products
            .iter()
            .filter(|p| p.id != current.id)
            .filter(|p| {
                p.brand_or_empty().to_lowercase().contains(&key)
                    || p.category_or_empty().to_lowercase().contains(&key)
            })
            .take(self.top_n)
            .cloned()
            .collect();

        if similar.is_empty() {
            return BotResponse::text(
                "Hiện tại chưa có sản phẩm tương tự. Bạn có thể xem các sản phẩm khác:",
            )
            .with_quick_replies(vec![
                QuickReply::link("Báo giá bộ sản phẩm", self.quote_form_url.as_str()),
                QuickReply::payload("Tư vấn kỹ thuật", "tư vấn"),
            ]);
        }

        let lines: Vec<String> = similar
            .iter()
            .map(|p| match &p.brand {
                Some(brand) => format!("• {} ({}) - {}", p.name, brand, format_price(p.price)),
                None => format!("• {} - {}", p.name, format_price(p.price)),
            })
            .collect();

        let quick_replies = self.view_quick_replies(&similar);
        BotResponse::text(format!(
            "Các sản phẩm tương tự:\n\n{}\n\nBạn muốn xem sản phẩm nào?",
            lines.join("\n")
        ))
        .with_items(similar)
        .with_quick_replies(quick_replies)
    }

    pub fn bulk_quote(&self) -> BotResponse {
        BotResponse::link(
            "Bạn vui lòng điền thông tin vào form dưới đây để nhận báo giá tổng hợp.",
            self.quote_form_url.as_str(),
        )
        .with_quick_replies(self.base_quick_replies())
    }

    pub fn consulting(&self) -> BotResponse {
        BotResponse::text("Bạn cần tư vấn về sản phẩm nào?").with_quick_replies(vec![
            QuickReply::payload("Tư vấn Áo thun", "tư vấn áo thun"),
            QuickReply::payload("Tư vấn Quần jean", "tư vấn quần jean"),
            QuickReply::payload("Tư vấn Hoodie", "tư vấn hoodie"),
            QuickReply::payload("Tư vấn Áo khoác", "tư vấn áo khoác"),
            QuickReply::payload("Tư vấn Giày sneakers", "tư vấn giày"),
        ])
    }

    /// Greeting with the current best sellers
    pub fn greeting(&self, catalog: &CatalogSnapshot) -> BotResponse {
        let popular = catalog.best_sellers(self.top_n);
        let mut quick_replies: Vec<QuickReply> = popular
            .iter()
            .map(|p| QuickReply::payload(p.name.as_str(), info_payload(p)))
            .collect();
        quick_replies.extend(self.base_quick_replies());

        BotResponse::text("Xin chào! Mình có vài gợi ý dành cho bạn.")
            .with_items(popular)
            .with_quick_replies(quick_replies)
    }

    pub fn thanks(&self) -> BotResponse {
        BotResponse::text("Không có gì! Bạn cần hỗ trợ gì thêm không?")
            .with_quick_replies(self.base_quick_replies())
    }

    pub fn goodbye(&self) -> BotResponse {
        BotResponse::text("Tạm biệt! Hẹn gặp lại bạn lần sau. Chúc bạn một ngày tốt lành!")
    }

    /// Reply when nothing else applied
    pub fn fallback(&self, catalog: &CatalogSnapshot) -> BotResponse {
        BotResponse::text("Mình chưa hiểu ý bạn. Bạn có thể xem một số sản phẩm gợi ý bên dưới.")
            .with_items(catalog.best_sellers(self.top_n))
            .with_quick_replies(vec![
                QuickReply::payload("Gợi ý theo ngân sách", "gợi ý rẻ"),
                QuickReply::payload("Gợi ý Áo thun", "gợi ý áo thun"),
                QuickReply::payload("Tư vấn chọn size", "size"),
            ])
    }

    /// Top sellers; a single product collapses into a product card
    pub fn best_sellers(&self, count: usize, catalog: &CatalogSnapshot) -> BotResponse {
        let mut top = catalog.best_sellers(count.max(1));
        if top.is_empty() {
            return self.fallback(catalog);
        }
        if count <= 1 {
            return self.product(top.remove(0));
        }

        let lines: Vec<String> = top
            .iter()
            .map(|p| format!("• {} - Đã bán {}", p.name, p.sold_or_zero()))
            .collect();
        let quick_replies = self.view_quick_replies(&top);
        BotResponse::text(format!("Top bán chạy:\n\n{}", lines.join("\n")))
            .with_items(top)
            .with_quick_replies(quick_replies)
    }

    /// Asks for a budget before recommending
    pub fn budget_prompt(&self) -> BotResponse {
        BotResponse::text("Bạn đang dự kiến ngân sách khoảng bao nhiêu?").with_quick_replies(vec![
            QuickReply::payload("≤ 200k", "gợi ý 200k"),
            QuickReply::payload("≤ 300k", "gợi ý 300k"),
            QuickReply::payload("≤ 500k", "gợi ý 500k"),
        ])
    }

    /// Recommendations from the budget, category and preference in `message`
    pub fn recommend(&self, message: &str, catalog: &CatalogSnapshot) -> BotResponse {
        let budget = self.extractor.parse_budget(message);
        let category = self.extractor.category(message);
        let category_id = category.map(|c| c.id.as_str());
        let preference = self.extractor.price_preference(message);

        let in_category = |p: &&Product| category_id.map_or(true, |id| p.category_id.as_deref() == Some(id));

        let mut pool: Vec<&Product> = catalog
            .products
            .iter()
            .filter(in_category)
            .filter(|p| budget.map_or(true, |b| p.price.is_some_and(|price| price <= b)))
            .collect();

        rank(&mut pool, preference, budget.is_some());

        if pool.is_empty() {
            pool = catalog.products.iter().filter(in_category).collect();
            pool.sort_by(|a, b| b.sold_or_zero().cmp(&a.sold_or_zero()));
        }

        let picks: Vec<Product> = pool.into_iter().take(self.top_n).cloned().collect();

        let budget_text = budget
            .map(|b| format!(" (≤ {})", format_vnd(b)))
            .unwrap_or_default();
        let head = match category {
            Some(c) => format!("Mình đề xuất {}{}:", c.label, budget_text),
            None => format!("Mình đề xuất cho bạn{}:", budget_text),
        };

        tracing::debug!(?budget, category = ?category_id, ?preference, picks = picks.len(), "Recommendation");

        BotResponse::text(head)
            .with_items(picks)
            .with_quick_replies(self.refined_quick_replies(category_id.is_some(), budget.is_some()))
    }

    fn refined_quick_replies(&self, has_category: bool, has_budget: bool) -> Vec<QuickReply> {
        let mut replies = Vec::new();
        if !has_category {
            replies.push(QuickReply::payload("Gợi ý Áo thun", "gợi ý áo thun"));
            replies.push(QuickReply::payload("Gợi ý Quần jean", "gợi ý quần jean"));
        }
        if !has_budget {
            replies.push(QuickReply::payload("≤ 200k", "gợi ý 200k"));
            replies.push(QuickReply::payload("≤ 300k", "gợi ý 300k"));
            replies.push(QuickReply::payload("≤ 500k", "gợi ý 500k"));
        }
        replies.push(QuickReply::payload("Ưu tiên rẻ", "gợi ý rẻ"));
        replies.push(QuickReply::payload("Ưu tiên cao cấp", "gợi ý cao cấp"));
        replies.push(QuickReply::payload("Tư vấn size", "size"));
        replies
    }

    /// Clarifying question for an intent that lacks its entity
    pub fn missing_entity(&self, intent: Intent, catalog: &CatalogSnapshot) -> BotResponse {
        match intent {
            Intent::QuoteSingle => BotResponse::text(
                "Bạn đang tìm sản phẩm cụ thể nào ạ? Ví dụ: Áo thun basic trắng, Quần jean slim fit...",
            )
            .with_quick_replies(vec![
                QuickReply::payload("Xem Áo thun basic trắng", "thông tin áo thun basic trắng"),
                QuickReply::payload("Xem Hoodie nỉ trơn xám", "thông tin hoodie nỉ trơn xám"),
                QuickReply::payload("Gợi ý theo ngân sách", "gợi ý rẻ"),
            ]),
            Intent::Consulting => BotResponse::text("Bạn cần tư vấn về loại sản phẩm nào ạ?")
                .with_quick_replies(vec![
                    QuickReply::payload("Tư vấn Áo thun", "tư vấn áo thun"),
                    QuickReply::payload("Tư vấn Quần jean", "tư vấn quần jean"),
                    QuickReply::payload("Tư vấn Hoodie", "tư vấn hoodie"),
                ]),
            _ => self.fallback(catalog),
        }
    }

    /// Product counts per category, in order of first appearance
    pub fn category_list(&self, catalog: &CatalogSnapshot) -> BotResponse {
        let mut tally: Vec<(&str, usize)> = Vec::new();
        for product in &catalog.products {
            let id = product.category_id.as_deref().unwrap_or("khác");
            match tally.iter_mut().find(|(seen, _)| *seen == id) {
                Some((_, count)) => *count += 1,
                None => tally.push((id, 1)),
            }
        }

        let lines: Vec<String> = tally
            .iter()
            .map(|(id, count)| format!("• {} ({} sp)", self.extractor.category_label(id), count))
            .collect();

        BotResponse::text(format!(
            "Các danh mục hiện có:\n\n{}\n\nBạn muốn xem danh mục nào?",
            lines.join("\n")
        ))
        .with_quick_replies(vec![
            QuickReply::payload("Xem Áo thun", "thông tin áo thun"),
            QuickReply::payload("Xem Quần jean", "thông tin quần jean"),
            QuickReply::payload("Xem Hoodie", "thông tin hoodie"),
        ])
    }

    pub fn stock_info(&self, product: &Product) -> BotResponse {
        let stock = match product.stock {
            Some(n) => format!("Tồn kho: {} sản phẩm", n),
            None => "Chưa rõ tồn kho".to_string(),
        };
        BotResponse::text(format!("{}\n{}", product.name, stock))
            .with_quick_replies(self.base_quick_replies())
    }

    pub fn size_info(&self, product: &Product) -> BotResponse {
        let guide = self.size_guides.for_category(product.category_or_empty());
        let mut text = format!("{}\nSize gợi ý: {}", product.name, guide.sizes);
        if let Some(tip) = self.size_guides.tip_for(guide) {
            text.push('\n');
            text.push_str(tip);
        }
        BotResponse::text(text).with_quick_replies(self.base_quick_replies())
    }

    /// Stock question with no product and no known category
    pub fn ask_for_stock_product(&self) -> BotResponse {
        BotResponse::text(
            "Bạn muốn kiểm tra tồn kho của sản phẩm nào? Hãy nói tên sản phẩm giúp mình nhé.",
        )
    }

    /// First products of a category, prompting for one of them
    ///
    /// `None` when the category has no products.
    pub fn category_listing(
        &self,
        kind: ListingKind,
        category_id: &str,
        catalog: &CatalogSnapshot,
    ) -> Option<BotResponse> {
        let products: Vec<&Product> = catalog.in_category(category_id).take(self.top_n).collect();
        if products.is_empty() {
            return None;
        }
        let label = self.extractor.category_label(category_id);

        let bullets = |line: &dyn Fn(&Product) -> String| -> String {
            products.iter().map(|p| line(p)).collect::<Vec<_>>().join("\n")
        };
        let buttons = |text: &str, payload: &str| -> Vec<QuickReply> {
            products
                .iter()
                .map(|p| {
                    QuickReply::payload(
                        format!("{} {}", text, p.name),
                        format!("{} {}", payload, p.name.to_lowercase()),
                    )
                })
                .collect()
        };

        let reply = match kind {
            ListingKind::StockPrompt => BotResponse::text(format!(
                "Bạn muốn xem tồn kho của sản phẩm nào trong danh mục {}?\n\n{}",
                label,
                bullets(&|p: &Product| format!("• {}", p.name))
            ))
            .with_quick_replies(buttons("Tồn kho", "còn hàng")),
            ListingKind::ProductInfo => BotResponse::text(format!(
                "Bạn muốn xem sản phẩm nào trong danh mục {}?\n\n{}",
                label,
                bullets(&|p: &Product| format!("• {} - {}", p.name, format_price(p.price)))
            ))
            .with_quick_replies(buttons("Xem", "thông tin")),
            ListingKind::StockInfo => BotResponse::text(format!(
                "Bạn đang xem danh mục {}. Bạn muốn xem tồn kho sản phẩm nào?\n\n{}",
                label,
                bullets(&|p: &Product| match p.stock {
                    Some(n) => format!("• {} - tồn {}", p.name, n),
                    None => format!("• {} - tồn ?", p.name),
                })
            ))
            .with_quick_replies(buttons("Tồn kho", "còn hàng")),
            ListingKind::SizeInfo => BotResponse::text(format!(
                "Bạn đang xem danh mục {}. Bạn muốn xem size gợi ý cho sản phẩm nào?\n\n{}",
                label,
                bullets(&|p: &Product| format!("• {}", p.name))
            ))
            .with_quick_replies(buttons("Size", "size")),
        };
        Some(reply)
    }
}

/// Order a recommendation pool; a missing price or rating counts as zero
fn rank(pool: &mut [&Product], preference: PricePreference, has_budget: bool) {
    match preference {
        PricePreference::Premium => pool.sort_by(|a, b| {
            b.rating_or_zero()
                .total_cmp(&a.rating_or_zero())
                .then(b.sold_or_zero().cmp(&a.sold_or_zero()))
        }),
        PricePreference::Cheap if !has_budget => pool.sort_by_key(|p| p.price.unwrap_or(0)),
        _ => pool.sort_by(|a, b| b.sold_or_zero().cmp(&a.sold_or_zero())),
    }
}
