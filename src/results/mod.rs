pub mod render;

use crate::models::{ResultItem, SearchResults, BASELINE_DISCOUNT_TYPE};

/// Shown wherever a price is missing
pub const PRICE_PLACEHOLDER: &str = "N/A";

/// Results for one hotel, in the order the backend returned them
#[derive(Debug, Clone, PartialEq)]
pub struct HotelGroup<'a> {
    pub hotel_name: &'a str,
    pub rows: Vec<ResultRow<'a>>,
}

/// A result item with everything the table needs already derived
#[derive(Debug, Clone, PartialEq)]
pub struct ResultRow<'a> {
    pub item: &'a ResultItem,
    pub best_deal: bool,
    pub savings_percent: f64,
}

impl ResultRow<'_> {
    pub fn taxes_and_fees(&self) -> f64 {
        self.item.taxes + self.item.fees
    }

    /// Whether the room rate should show the struck-through original price
    pub fn shows_original_price(&self) -> bool {
        self.item.discount_type != BASELINE_DISCOUNT_TYPE
            && self.item.original_price != self.item.discounted_price
    }
}

/// Derived presentation of a results snapshot.
///
/// Built fresh from the snapshot every time; nothing is cached between calls.
#[derive(Debug, Clone, PartialEq)]
pub struct ResultsView<'a> {
    pub results: &'a SearchResults,
    pub best_price: Option<f64>,
    pub groups: Vec<HotelGroup<'a>>,
}

impl<'a> ResultsView<'a> {
    pub fn from_results(results: &'a SearchResults) -> Self {
        let best_price = best_price(&results.results);

        let groups = group_by_hotel(&results.results)
            .into_iter()
            .map(|(hotel_name, items)| HotelGroup {
                hotel_name,
                rows: items
                    .into_iter()
                    .map(|item| ResultRow {
                        item,
                        best_deal: is_best_deal(item, best_price),
                        savings_percent: savings_percent(item.original_price, item.discounted_price),
                    })
                    .collect(),
            })
            .collect();

        Self {
            results,
            best_price,
            groups,
        }
    }

    pub fn best_deals(&self) -> impl Iterator<Item = &ResultRow<'a>> {
        self.groups
            .iter()
            .flat_map(|group| group.rows.iter())
            .filter(|row| row.best_deal)
    }
}

/// Group items by hotel name, keeping first-seen order of hotels and items
pub fn group_by_hotel(items: &[ResultItem]) -> Vec<(&str, Vec<&ResultItem>)> {
    let mut groups: Vec<(&str, Vec<&ResultItem>)> = Vec::new();

    for item in items {
        match groups.iter_mut().find(|(name, _)| *name == item.hotel_name) {
            Some((_, group)) => group.push(item),
            None => groups.push((item.hotel_name.as_str(), vec![item])),
        }
    }

    groups
}

/// Lowest total price among available offers, if any offer has one
pub fn best_price(items: &[ResultItem]) -> Option<f64> {
    items
        .iter()
        .filter(|item| item.available)
        .filter_map(|item| item.total_price)
        .reduce(f64::min)
}

/// Exact match against the best price; every tied row qualifies
pub fn is_best_deal(item: &ResultItem, best_price: Option<f64>) -> bool {
    match (item.total_price, best_price) {
        (Some(total), Some(best)) => total == best,
        _ => false,
    }
}

/// Percentage saved against the original rate, rounded to one decimal.
///
/// Missing or zero prices yield `0.0`.
pub fn savings_percent(original_price: Option<f64>, discounted_price: Option<f64>) -> f64 {
    match (original_price, discounted_price) {
        (Some(original), Some(discounted)) if original != 0.0 && discounted != 0.0 => {
            ((original - discounted) / original * 1000.0).round() / 10.0
        }
        _ => 0.0,
    }
}

/// One-decimal savings text, only when there is something saved
pub fn format_savings(savings_percent: f64) -> Option<String> {
    if savings_percent > 0.0 {
        Some(format!("{:.1}", savings_percent))
    } else {
        None
    }
}

pub fn format_price(price: Option<f64>) -> String {
    match price {
        Some(price) => format!("${:.2}", price),
        None => PRICE_PLACEHOLDER.to_string(),
    }
}
