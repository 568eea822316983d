use crate::results::{format_price, format_savings, ResultRow, ResultsView};
use std::fmt::Write;

const BEST_DEAL_BADGE: &str = "★ BEST DEAL";
const NO_SAVINGS: &str = "—";

const HEADERS: [&str; 5] = ["DISCOUNT TYPE", "ROOM RATE", "TAXES & FEES", "TOTAL", "SAVINGS"];

impl ResultsView<'_> {
    /// Summary line shown above the tables
    pub fn header(&self) -> String {
        let results = self.results;
        format!(
            "{} • {} to {} • {} guests • {} results",
            results.location,
            results.check_in,
            results.check_out,
            results.guests,
            results.result_count
        )
    }

    /// Render every hotel as a plain-text table
    pub fn render(&self) -> String {
        let mut out = String::new();

        let _ = writeln!(out, "Search Results");
        let _ = writeln!(out, "{}", self.header());

        if self.groups.is_empty() {
            let _ = writeln!(out, "\nNo results for this search yet.");
            return out;
        }

        for group in &self.groups {
            let cells: Vec<[String; 5]> = group.rows.iter().map(row_cells).collect();

            let mut widths = HEADERS.map(|h| h.chars().count());
            for row in &cells {
                for (width, cell) in widths.iter_mut().zip(row.iter()) {
                    *width = (*width).max(cell.chars().count());
                }
            }

            let _ = writeln!(out, "\n{}", group.hotel_name);
            push_line(&mut out, &HEADERS.map(String::from), &widths);
            let rule: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
            let _ = writeln!(out, "{}", rule.join("  "));
            for row in &cells {
                push_line(&mut out, row, &widths);
            }
        }

        out
    }
}

fn row_cells(row: &ResultRow<'_>) -> [String; 5] {
    let item = row.item;

    let mut discount = item.discount_type.to_uppercase();
    if row.best_deal {
        discount.push_str("  ");
        discount.push_str(BEST_DEAL_BADGE);
    }

    let rate = if row.shows_original_price() {
        format!(
            "~~{}~~ {}",
            format_price(item.original_price),
            format_price(item.discounted_price)
        )
    } else {
        format_price(item.discounted_price)
    };

    let savings = format_savings(row.savings_percent)
        .map(|s| format!("{}% off", s))
        .unwrap_or_else(|| NO_SAVINGS.to_string());

    [
        discount,
        rate,
        format_price(Some(row.taxes_and_fees())),
        format_price(item.total_price),
        savings,
    ]
}

// Pads by character count so the badge glyphs line up
fn push_line(out: &mut String, cells: &[String; 5], widths: &[usize; 5]) {
    let padded: Vec<String> = cells
        .iter()
        .zip(widths.iter())
        .map(|(cell, width)| {
            let pad = width.saturating_sub(cell.chars().count());
            format!("{}{}", cell, " ".repeat(pad))
        })
        .collect();
    let _ = writeln!(out, "{}", padded.join("  ").trim_end());
}
