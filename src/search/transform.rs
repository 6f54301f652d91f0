//! Upstream product → caller-facing summary.

use serde::{Deserialize, Serialize};

use crate::catalog::UpstreamProduct;

/// Digits after the decimal point in `final_price`.
const PRICE_DIGITS: usize = 2;

/// Minimized, price-adjusted product returned to callers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductSummary {
    /// `null` when the catalog record has no title.
    pub title: Option<String>,
    pub description: Option<String>,
    /// Discounted price as fixed-point text, e.g. `"80.00"`.
    pub final_price: String,
}

impl From<&UpstreamProduct> for ProductSummary {
    fn from(product: &UpstreamProduct) -> Self {
        Self {
            title: product.title.clone(),
            description: product.description.clone(),
            final_price: to_fixed(final_price(product), PRICE_DIGITS),
        }
    }
}

/// `price * (1 - discountPercentage / 100)`.
pub fn final_price(product: &UpstreamProduct) -> f64 {
    product.price * (1.0 - product.discount_percentage / 100.0)
}

/// Summarize every product, preserving order.
pub fn summarize(products: &[UpstreamProduct]) -> Vec<ProductSummary> {
    products.iter().map(ProductSummary::from).collect()
}

/// Format `value` with exactly `digits` fractional digits.
///
/// Rounds half away from zero on the exact binary value, so `0.125` gives
/// `"0.13"` while `1.005` (stored as 1.00499…) gives `"1.00"`.
pub fn to_fixed(value: f64, digits: usize) -> String {
    if value.is_nan() {
        return "NaN".to_string();
    }
    if value.is_infinite() {
        return if value > 0.0 { "Infinity" } else { "-Infinity" }.to_string();
    }

    // 1074 fractional digits hold any f64 exactly.
    let exact = format!("{:.1074}", value.abs());
    let (int_part, frac_part) = exact.split_once('.').unwrap_or((exact.as_str(), ""));

    let mut kept: Vec<u8> = int_part
        .bytes()
        .chain(frac_part.bytes().chain(std::iter::repeat(b'0')).take(digits))
        .collect();
    let round_up = frac_part.as_bytes().get(digits).is_some_and(|d| *d >= b'5');

    if round_up {
        let mut carry = true;
        for digit in kept.iter_mut().rev() {
            if *digit == b'9' {
                *digit = b'0';
            } else {
                *digit += 1;
                carry = false;
                break;
            }
        }
        if carry {
            kept.insert(0, b'1');
        }
    }

    let split = kept.len() - digits;
    let mut out = String::with_capacity(kept.len() + 2);
    if value < 0.0 {
        out.push('-');
    }
    out.extend(kept[..split].iter().map(|b| char::from(*b)));
    if digits > 0 {
        out.push('.');
        out.extend(kept[split..].iter().map(|b| char::from(*b)));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn product(price: f64, discount_percentage: f64) -> UpstreamProduct {
        UpstreamProduct {
            title: Some("Phone".to_string()),
            description: Some("A phone".to_string()),
            price,
            discount_percentage,
        }
    }

    #[test]
    fn applies_discount() {
        let summary = ProductSummary::from(&product(100.0, 20.0));
        assert_eq!(summary.final_price, "80.00");
        assert_eq!(summary.title.as_deref(), Some("Phone"));
        assert_eq!(summary.description.as_deref(), Some("A phone"));
    }

    #[test]
    fn zero_discount_keeps_price() {
        assert_eq!(ProductSummary::from(&product(19.99, 0.0)).final_price, "19.99");
    }

    #[test]
    fn fractional_discount_rounds_to_cents() {
        // 549 * (1 - 0.1296) = 477.8496
        assert_eq!(ProductSummary::from(&product(549.0, 12.96)).final_price, "477.85");
        assert_eq!(ProductSummary::from(&product(9.0, 100.0)).final_price, "0.00");
    }

    #[test]
    fn input_is_untouched() {
        let input = product(100.0, 20.0);
        let before = input.clone();
        let _ = summarize(std::slice::from_ref(&input));
        assert_eq!(input, before);
    }

    #[test]
    fn summarize_preserves_order_and_handles_empty() {
        assert!(summarize(&[]).is_empty());

        let mut second = product(10.0, 0.0);
        second.title = Some("Tablet".to_string());
        let summaries = summarize(&[product(100.0, 20.0), second]);
        let titles: Vec<_> = summaries.iter().map(|s| s.title.as_deref()).collect();
        assert_eq!(titles, vec![Some("Phone"), Some("Tablet")]);
    }

    #[test]
    fn serializes_only_summary_fields() {
        let value = serde_json::to_value(ProductSummary::from(&product(100.0, 20.0))).unwrap();
        assert_eq!(
            value,
            serde_json::json!({ "title": "Phone", "description": "A phone", "final_price": "80.00" })
        );
    }

    #[test]
    fn incomplete_record_is_summarized() {
        let record = UpstreamProduct {
            title: Some("x".to_string()),
            description: None,
            price: 10.0,
            discount_percentage: f64::NAN,
        };

        let value = serde_json::to_value(ProductSummary::from(&record)).unwrap();
        assert_eq!(
            value,
            serde_json::json!({ "title": "x", "description": null, "final_price": "NaN" })
        );
    }

    #[test]
    fn to_fixed_rounding() {
        assert_eq!(to_fixed(0.125, 2), "0.13");
        assert_eq!(to_fixed(1.005, 2), "1.00");
        assert_eq!(to_fixed(9.999, 2), "10.00");
        assert_eq!(to_fixed(99.999, 2), "100.00");
        assert_eq!(to_fixed(2.5, 0), "3");
        assert_eq!(to_fixed(42.0, 2), "42.00");
    }

    #[test]
    fn to_fixed_signs_and_specials() {
        assert_eq!(to_fixed(-1.005, 2), "-1.00");
        assert_eq!(to_fixed(-0.001, 2), "-0.00");
        assert_eq!(to_fixed(-0.0, 2), "0.00");
        assert_eq!(to_fixed(f64::NAN, 2), "NaN");
        assert_eq!(to_fixed(f64::INFINITY, 2), "Infinity");
        assert_eq!(to_fixed(f64::NEG_INFINITY, 2), "-Infinity");
    }
}
