//! Shopping entity extraction
//!
//! Extracts the free-text entities the dialog needs besides products:
//! - Budgets ("200k", "1tr2", "1.2m", "300.000đ", "ngân sách khoảng 500 nghìn")
//! - Catalog categories via the alias table
//! - Price preference cues ("rẻ", "cao cấp")
//! - Order codes ("OD123", "#A-19", "ab12345", "123456")
//!
//! # Example
//!
//! ```ignore
//! let extractor = ShopEntityExtractor::new(&domain, 250_000);
//! assert_eq!(extractor.parse_budget("khoảng 200k"), Some(200_000));
//! assert_eq!(extractor.category("quần jean nam").map(|c| c.id.as_str()), Some("c:jean"));
//! ```

use once_cell::sync::Lazy;
use regex::Regex;
use shopbot_config::{CategoryEntry, DomainData};

use crate::normalize::normalize;

// Magnitude + unit. "tr" may carry trailing digits as the fraction ("1tr2").
static UNIT_AMOUNT_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)(\d+(?:[.,]\d+)?)\s*(?:(triệu|nghìn|ngàn|ngan|k|m)\b|tr(\d*)\b)").unwrap()
});

// Grouped literal, "300.000đ" / "1,200,000", or a bare number
static LITERAL_AMOUNT_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)(\d{1,3}(?:[.,]\d{3})+|\d+)(?:\s*đ|\s*vnd)?").unwrap());

static ORDER_ID_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)(od\s*\d+|#[a-z0-9-]+|[a-z]{2}\d{3,}|\b\d{5,}\b)").unwrap());

/// How the user wants results ranked
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PricePreference {
    /// Best rated first
    Premium,
    /// Cheapest first
    Cheap,
    /// No cue
    Neutral,
}

/// Category, budget and preference extractor
pub struct ShopEntityExtractor {
    /// (entry, folded aliases) in table order
    categories: Vec<(CategoryEntry, Vec<String>)>,
    premium_cues: Vec<String>,
    cheap_cues: Vec<String>,
    default_cheap_budget: u64,
}

impl ShopEntityExtractor {
    pub fn new(domain: &DomainData, default_cheap_budget: u64) -> Self {
        let categories = domain
            .categories
            .iter()
            .map(|c| {
                let aliases = c
                    .aliases
                    .iter()
                    .map(|a| normalize(a))
                    .filter(|a| !a.is_empty())
                    .collect();
                (c.clone(), aliases)
            })
            .collect();

        let lower = |cues: &[String]| cues.iter().map(|c| c.to_lowercase()).collect::<Vec<_>>();

        Self {
            categories,
            premium_cues: lower(&domain.lexicon.premium_cues),
            cheap_cues: lower(&domain.lexicon.cheap_cues),
            default_cheap_budget,
        }
    }

    /// Budget in VND
    ///
    /// Unit amounts win over plain literals. Without any number, a cheap
    /// cue implies the default budget.
    pub fn parse_budget(&self, text: &str) -> Option<u64> {
        let lower = text.to_lowercase();

        if let Some(caps) = UNIT_AMOUNT_PATTERN.captures(&lower) {
            let base: f64 = caps.get(1)?.as_str().replace(',', ".").parse().ok()?;
            let amount = match (caps.get(2), caps.get(3)) {
                (Some(unit), _) => match unit.as_str() {
                    "k" | "nghìn" | "ngàn" | "ngan" => base * 1_000.0,
                    _ => base * 1_000_000.0,
                },
                (None, Some(fraction)) => {
                    let digits = fraction.as_str();
                    let fraction = if digits.is_empty() {
                        0.0
                    } else {
                        format!("0.{}", digits).parse::<f64>().ok()?
                    };
                    (base + fraction) * 1_000_000.0
                }
                (None, None) => return None,
            };
            if amount.is_finite() {
                return Some(amount.round() as u64);
            }
            return None;
        }

        if let Some(caps) = LITERAL_AMOUNT_PATTERN.captures(&lower) {
            let digits: String = caps.get(1)?.as_str().chars().filter(|c| c.is_ascii_digit()).collect();
            return digits.parse().ok();
        }

        if self.has_cue(&lower, &self.cheap_cues) {
            return Some(self.default_cheap_budget);
        }
        None
    }

    /// Ranking preference implied by the message
    pub fn price_preference(&self, text: &str) -> PricePreference {
        let lower = text.to_lowercase();
        if self.has_cue(&lower, &self.premium_cues) {
            PricePreference::Premium
        } else if self.has_cue(&lower, &self.cheap_cues) {
            PricePreference::Cheap
        } else {
            PricePreference::Neutral
        }
    }

    /// First category whose alias occurs in the message
    pub fn category(&self, text: &str) -> Option<&CategoryEntry> {
        let folded = normalize(text);
        if folded.is_empty() {
            return None;
        }
        self.categories
            .iter()
            .find(|(_, aliases)| aliases.iter().any(|a| folded.contains(a.as_str())))
            .map(|(entry, _)| entry)
    }

    /// Category table entry by id
    pub fn category_by_id(&self, id: &str) -> Option<&CategoryEntry> {
        self.categories.iter().map(|(c, _)| c).find(|c| c.id == id)
    }

    /// Display label for a category id
    pub fn category_label<'a>(&'a self, id: &'a str) -> &'a str {
        self.category_by_id(id)
            .map(|c| c.label.as_str())
            .unwrap_or_else(|| id.strip_prefix("c:").unwrap_or(id))
    }

    fn has_cue(&self, lower: &str, cues: &[String]) -> bool {
        cues.iter().any(|c| lower.contains(c.as_str()))
    }
}

/// Order code in the message, with spaces and `#` removed
pub fn extract_order_id(text: &str) -> Option<String> {
    let found = ORDER_ID_PATTERN.find(text)?;
    Some(
        found
            .as_str()
            .chars()
            .filter(|c| !c.is_whitespace() && *c != '#')
            .collect(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn extractor() -> ShopEntityExtractor {
        let domain = DomainData::embedded().unwrap();
        ShopEntityExtractor::new(&domain, 250_000)
    }

    #[test]
    fn test_budget_units() {
        let e = extractor();
        assert_eq!(e.parse_budget("khoảng 200k"), Some(200_000));
        assert_eq!(e.parse_budget("tầm 500 nghìn"), Some(500_000));
        assert_eq!(e.parse_budget("1.2m"), Some(1_200_000));
        assert_eq!(e.parse_budget("2 triệu"), Some(2_000_000));
        assert_eq!(e.parse_budget("gợi ý 300K"), Some(300_000));
    }

    #[test]
    fn test_budget_tr_with_fraction() {
        let e = extractor();
        assert_eq!(e.parse_budget("1tr2"), Some(1_200_000));
        assert_eq!(e.parse_budget("ngân sách 1tr"), Some(1_000_000));
        assert_eq!(e.parse_budget("2tr5 đổ lại"), Some(2_500_000));
    }

    #[test]
    fn test_budget_grouped_literal() {
        let e = extractor();
        assert_eq!(e.parse_budget("300.000đ"), Some(300_000));
        assert_eq!(e.parse_budget("dưới 1,200,000 vnd"), Some(1_200_000));
    }

    #[test]
    fn test_budget_cheap_default() {
        let e = extractor();
        assert_eq!(e.parse_budget("rẻ"), Some(250_000));
        assert_eq!(e.parse_budget("gợi ý áo thun"), None);
    }

    #[test]
    fn test_price_preference() {
        let e = extractor();
        assert_eq!(e.price_preference("gợi ý cao cấp"), PricePreference::Premium);
        assert_eq!(e.price_preference("đồ rẻ thôi"), PricePreference::Cheap);
        assert_eq!(e.price_preference("gợi ý"), PricePreference::Neutral);
    }

    #[test]
    fn test_category_lookup() {
        let e = extractor();
        assert_eq!(e.category("Áo thun nam").map(|c| c.id.as_str()), Some("c:tee"));
        assert_eq!(e.category("quan jean").map(|c| c.id.as_str()), Some("c:jean"));
        assert_eq!(e.category("áo t-shirt").map(|c| c.id.as_str()), Some("c:tee"));
        assert_eq!(e.category("quần kaki").map(|c| c.id.as_str()), Some("c:trousers"));
        assert!(e.category("xin chào").is_none());
    }

    #[test]
    fn test_category_label() {
        let e = extractor();
        assert_eq!(e.category_label("c:sneakers"), "Giày");
        assert_eq!(e.category_label("c:hat"), "hat");
    }

    #[test]
    fn test_order_id_extraction() {
        assert_eq!(extract_order_id("kiểm tra đơn OD 12345"), Some("OD12345".to_string()));
        assert_eq!(extract_order_id("mã #A1-B2 nhé"), Some("A1-B2".to_string()));
        assert_eq!(extract_order_id("đơn ab1234"), Some("ab1234".to_string()));
        assert_eq!(extract_order_id("số 987654"), Some("987654".to_string()));
        assert_eq!(extract_order_id("size 42"), None);
    }
}
