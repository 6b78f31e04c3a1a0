//! Reconciliation of supplier rows against marketplace offer identifiers.
//!
//! Produces marketplace-neutral stock and price levels; each marketplace
//! client maps these onto its own wire shapes.

use std::collections::HashSet;

use crate::feed::SupplierRow;

/// Feed token meaning "more than ten units in stock"
pub const OVERSTOCK_TOKEN: &str = ">10";

/// Stock count reported for the overstock token
pub const OVERSTOCK_COUNT: u32 = 100;

/// Resolved stock count for one offer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StockLevel {
    pub offer_id: String,
    pub count: u32,
}

/// Converted price (integer minor units, digits only) for one offer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PriceLevel {
    pub offer_id: String,
    pub price: String,
}

/// Convert a free-form feed price into a digits-only minor-unit string.
///
/// Takes the part before the first decimal point and strips every non-digit
/// character: `"5'990.00 руб."` becomes `"5990"`.
pub fn convert_price(raw: &str) -> String {
    let integer_part = raw.split_once('.').map_or(raw, |(head, _)| head);
    integer_part.chars().filter(|c| c.is_ascii_digit()).collect()
}

/// Resolve a feed quantity string into a stock count.
///
/// The supplier reports ">10" for well-stocked items; "1" means the last unit
/// is reserved and the item is effectively sold out. Anything that does not
/// parse as an integer counts as zero.
pub fn classify_quantity(raw: &str) -> u32 {
    let raw = raw.trim();
    if raw == OVERSTOCK_TOKEN {
        OVERSTOCK_COUNT
    } else if raw == "1" {
        0
    } else {
        raw.parse().unwrap_or(0)
    }
}

/// Match supplier rows against a marketplace's offer identifier set.
///
/// Each row whose code is registered emits one stock level and one price
/// level and consumes the identifier, so duplicate feed rows match at most
/// once. Identifiers left unmatched afterwards emit a zero-count stock level
/// and no price level. The emitted stock-level identifiers equal the input
/// set exactly.
pub fn reconcile(
    rows: &[SupplierRow],
    mut offer_ids: HashSet<String>,
) -> (Vec<StockLevel>, Vec<PriceLevel>) {
    let mut stocks = Vec::with_capacity(offer_ids.len());
    let mut prices = Vec::new();

    for row in rows {
        if offer_ids.remove(&row.code) {
            stocks.push(StockLevel {
                offer_id: row.code.clone(),
                count: classify_quantity(&row.quantity),
            });
            prices.push(PriceLevel {
                offer_id: row.code.clone(),
                price: convert_price(&row.price),
            });
        }
    }

    // Offers the feed no longer carries are reported as out of stock
    for offer_id in offer_ids {
        stocks.push(StockLevel { offer_id, count: 0 });
    }

    (stocks, prices)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(code: &str, quantity: &str, price: &str) -> SupplierRow {
        SupplierRow {
            code: code.to_string(),
            quantity: quantity.to_string(),
            price: price.to_string(),
        }
    }

    fn offers(ids: &[&str]) -> HashSet<String> {
        ids.iter().map(|id| id.to_string()).collect()
    }

    // ── convert_price ────────────────────────────────────────────────

    #[test]
    fn convert_price_strips_separators_and_currency() {
        assert_eq!(convert_price("5'990.00 руб."), "5990");
    }

    #[test]
    fn convert_price_drops_fraction_after_first_point() {
        assert_eq!(convert_price("12.50"), "12");
        assert_eq!(convert_price("1.2.3"), "1");
    }

    #[test]
    fn convert_price_without_point_uses_whole_string() {
        assert_eq!(convert_price("999 руб"), "999");
    }

    #[test]
    fn convert_price_with_no_digits_is_empty() {
        assert_eq!(convert_price("н/д"), "");
    }

    // ── classify_quantity ────────────────────────────────────────────

    #[test]
    fn classify_quantity_table() {
        assert_eq!(classify_quantity(">10"), 100);
        assert_eq!(classify_quantity("1"), 0);
        assert_eq!(classify_quantity("7"), 7);
        assert_eq!(classify_quantity("0"), 0);
    }

    #[test]
    fn classify_quantity_free_form_counts_as_zero() {
        assert_eq!(classify_quantity(""), 0);
        assert_eq!(classify_quantity("нет"), 0);
        assert_eq!(classify_quantity("  3 "), 3);
    }

    // ── reconcile ────────────────────────────────────────────────────

    #[test]
    fn reconcile_emits_exactly_the_offer_set() {
        let rows = vec![
            row("A", "5", "100.00"),
            row("X", "2", "10.00"), // not registered, ignored
            row("B", ">10", "200.00"),
        ];
        let (stocks, prices) = reconcile(&rows, offers(&["A", "B", "C", "D"]));

        let emitted: HashSet<String> = stocks.iter().map(|s| s.offer_id.clone()).collect();
        assert_eq!(emitted, offers(&["A", "B", "C", "D"]));
        assert_eq!(stocks.len(), 4); // no duplicates

        let priced: Vec<&str> = prices.iter().map(|p| p.offer_id.as_str()).collect();
        assert_eq!(priced, vec!["A", "B"]);
    }

    #[test]
    fn reconcile_duplicate_rows_match_at_most_once() {
        let rows = vec![row("A", "5", "100.00"), row("A", "3", "90.00")];
        let (stocks, prices) = reconcile(&rows, offers(&["A"]));

        assert_eq!(stocks.len(), 1);
        assert_eq!(stocks[0].count, 5);
        assert_eq!(prices.len(), 1);
        assert_eq!(prices[0].price, "100");
    }

    #[test]
    fn reconcile_unmatched_offer_gets_zero_stock_and_no_price() {
        let (stocks, prices) = reconcile(&[], offers(&["C"]));

        assert_eq!(stocks.len(), 1);
        assert_eq!(stocks[0].offer_id, "C");
        assert_eq!(stocks[0].count, 0);
        assert!(prices.is_empty());
    }

    #[test]
    fn reconcile_unregistered_row_produces_nothing() {
        let rows = vec![row("Z", "5", "100.00")];
        let (stocks, prices) = reconcile(&rows, HashSet::new());
        assert!(stocks.is_empty());
        assert!(prices.is_empty());
    }

    #[test]
    fn reconcile_end_to_end_scenario() {
        let rows = vec![row("A", ">10", "100.00 x"), row("B", "1", "50.00 x")];
        let (stocks, prices) = reconcile(&rows, offers(&["A", "B", "C"]));

        // Matched rows first in feed order, leftover offers after
        assert_eq!(stocks.len(), 3);
        assert_eq!(
            stocks[0],
            StockLevel {
                offer_id: "A".to_string(),
                count: 100
            }
        );
        assert_eq!(
            stocks[1],
            StockLevel {
                offer_id: "B".to_string(),
                count: 0
            }
        );
        assert_eq!(
            stocks[2],
            StockLevel {
                offer_id: "C".to_string(),
                count: 0
            }
        );

        assert_eq!(
            prices,
            vec![
                PriceLevel {
                    offer_id: "A".to_string(),
                    price: "100".to_string()
                },
                PriceLevel {
                    offer_id: "B".to_string(),
                    price: "50".to_string()
                },
            ]
        );
    }
}
