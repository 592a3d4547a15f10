//! Money rendering helpers
//!
//! Prices are whole VND amounts. This is the single place that decides how
//! they are shown to users.

/// Format an amount with `vi-VN` thousands grouping, e.g. `199.000đ`
pub fn format_vnd(amount: u64) -> String {
    let digits = amount.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3 + 2);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push('.');
        }
        grouped.push(ch);
    }
    grouped.push('đ');
    grouped
}

/// Format an optional price; unknown prices ask the user to get in touch
pub fn format_price(price: Option<u64>) -> String {
    match price {
        Some(amount) => format_vnd(amount),
        None => "Liên hệ".to_string(),
    }
}
