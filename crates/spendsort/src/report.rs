//! Aggregates over a user's transactions. Amounts are summed as absolute
//! values so money in and money out both count toward a category.

use crate::categorize::category::Category;
use crate::db::Transaction;
use serde::Serialize;
use std::collections::{BTreeMap, HashMap};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryTotal {
    pub category: Category,
    pub count: usize,
    pub total: f64,
    /// Fraction of the grand total, 0.0 to 1.0
    pub share: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonthlyTotal {
    /// `YYYY-MM`
    pub month: String,
    pub count: usize,
    pub total: f64,
}

/// Per-category count and absolute total, largest total first.
pub fn category_totals(transactions: &[Transaction]) -> Vec<CategoryTotal> {
    let mut by_category: HashMap<Category, (usize, f64)> = HashMap::new();
    for transaction in transactions {
        let entry = by_category.entry(transaction.category).or_insert((0, 0.0));
        entry.0 += 1;
        entry.1 += transaction.amount.abs();
    }

    let grand_total: f64 = by_category.values().map(|(_, total)| total).sum();
    let mut totals: Vec<CategoryTotal> = by_category
        .into_iter()
        .map(|(category, (count, total))| CategoryTotal {
            category,
            count,
            total,
            share: if grand_total > 0.0 { total / grand_total } else { 0.0 },
        })
        .collect();

    totals.sort_by(|a, b| {
        b.total
            .total_cmp(&a.total)
            .then_with(|| a.category.cmp(&b.category))
    });
    totals
}

/// Absolute totals per calendar month for one category, oldest month first.
pub fn monthly_totals(transactions: &[Transaction], category: Category) -> Vec<MonthlyTotal> {
    let mut by_month: BTreeMap<String, (usize, f64)> = BTreeMap::new();
    for transaction in transactions.iter().filter(|t| t.category == category) {
        let entry = by_month
            .entry(transaction.date.format("%Y-%m").to_string())
            .or_insert((0, 0.0));
        entry.0 += 1;
        entry.1 += transaction.amount.abs();
    }

    by_month
        .into_iter()
        .map(|(month, (count, total))| MonthlyTotal { month, count, total })
        .collect()
}

/// Percent of `goal` covered by `assets`, clamped to 0..=100. A goal that is
/// not positive yields 0.
pub fn goal_progress(assets: f64, goal: f64) -> f64 {
    if goal.is_nan() || goal <= 0.0 || assets.is_nan() {
        return 0.0;
    }
    (assets / goal * 100.0).clamp(0.0, 100.0)
}

/// Fixed-width text table of category totals with a closing sum row.
pub fn render_category_totals(totals: &[CategoryTotal]) -> String {
    let mut lines = vec![format!(
        "{:<22}{:>6}{:>12}{:>8}",
        "Category", "Count", "Total", "Share"
    )];

    for total in totals {
        lines.push(format!(
            "{:<22}{:>6}{:>12.2}{:>8}",
            total.category.label(),
            total.count,
            total.total,
            format!("{:.1}%", total.share * 100.0)
        ));
    }

    let count: usize = totals.iter().map(|t| t.count).sum();
    let sum: f64 = totals.iter().map(|t| t.total).sum();
    let share = if totals.is_empty() { "0.0%" } else { "100.0%" };
    lines.push(format!("{:<22}{:>6}{:>12.2}{:>8}", "Total", count, sum, share));

    lines.join("\n")
}
