//! Terminal review surface: one transaction card at a time, answered with a
//! dialoguer menu.

use crate::categorize::category::Category;
use crate::categorize::review::{Decision, DecisionSource, ReviewSummary};
use crate::db::Transaction;
use crate::error::Result;
use console::{style, Term};
use dialoguer::{theme::ColorfulTheme, Confirm, Select};

/// Menu entries in display order. The first two are the swipe shortcuts.
const CHOICES: &[(&str, Decision)] = &[
    ("Needed (essentials)", Decision::Assign(Category::Essentials)),
    ("Not needed (unnecessary spending)", Decision::Assign(Category::UnnecessarySpending)),
    ("Investment", Decision::Assign(Category::Investments)),
    ("Skip for now", Decision::Skip),
    ("Quit review", Decision::Quit),
];

/// Map a selected menu index to a decision. Out-of-range indices skip.
pub fn decision_for_index(index: usize) -> Decision {
    CHOICES
        .get(index)
        .map(|(_, decision)| *decision)
        .unwrap_or(Decision::Skip)
}

/// Signed amount with two decimals and a leading sign for money out.
pub fn format_amount(amount: f64) -> String {
    if amount < 0.0 {
        format!("-${:.2}", amount.abs())
    } else {
        format!("${:.2}", amount)
    }
}

/// Plain-text body of a review card.
pub fn card_lines(transaction: &Transaction) -> Vec<String> {
    vec![
        format!("  Date:        {}", transaction.date.format("%Y-%m-%d")),
        format!("  Description: {}", transaction.description),
        format!("  Amount:      {}", format_amount(transaction.amount)),
    ]
}

pub struct TerminalReviewer {
    term: Term,
    theme: ColorfulTheme,
    confirm_quit: bool,
}

impl TerminalReviewer {
    pub fn new() -> Self {
        Self {
            term: Term::stdout(),
            theme: ColorfulTheme::default(),
            confirm_quit: true,
        }
    }

    /// Use a specific terminal, e.g. stderr when stdout is piped.
    pub fn with_term(term: Term) -> Self {
        Self {
            term,
            theme: ColorfulTheme::default(),
            confirm_quit: true,
        }
    }

    pub fn confirm_quit(mut self, confirm: bool) -> Self {
        self.confirm_quit = confirm;
        self
    }

    fn show_card(&self, transaction: &Transaction, position: usize, total: usize) -> Result<()> {
        self.term.write_line("")?;
        self.term.write_line(&format!(
            "{} Transaction {}/{}",
            style("→").cyan(),
            position,
            total
        ))?;
        for line in card_lines(transaction) {
            self.term.write_line(&line)?;
        }
        Ok(())
    }

    /// Print the end-of-session tally.
    pub fn show_summary(&self, summary: &ReviewSummary) -> Result<()> {
        self.term.write_line("")?;
        if summary.remaining == 0 && summary.skipped == 0 {
            self.term.write_line(&format!(
                "{} All caught up: {} transactions categorized",
                style("✓").green(),
                style(summary.decided).bold()
            ))?;
        } else {
            self.term.write_line(&format!(
                "{} {} categorized, {} skipped, {} still waiting",
                style("→").cyan(),
                style(summary.decided).bold(),
                summary.skipped,
                summary.remaining
            ))?;
        }
        if summary.keywords_learned > 0 {
            self.term.write_line(&format!(
                "  Learned {} new keywords",
                style(summary.keywords_learned).bold()
            ))?;
        }
        Ok(())
    }
}

impl Default for TerminalReviewer {
    fn default() -> Self {
        Self::new()
    }
}

impl DecisionSource for TerminalReviewer {
    fn decide(&mut self, transaction: &Transaction, position: usize, total: usize) -> Result<Decision> {
        self.show_card(transaction, position, total)?;

        let labels: Vec<&str> = CHOICES.iter().map(|(label, _)| *label).collect();
        let index = Select::with_theme(&self.theme)
            .with_prompt("Needed?")
            .items(&labels)
            .default(0)
            .interact_on(&self.term)?;

        let decision = decision_for_index(index);
        if decision == Decision::Quit && self.confirm_quit {
            let confirm = Confirm::with_theme(&self.theme)
                .with_prompt("Stop reviewing? Remaining transactions stay uncategorized")
                .default(true)
                .interact_on(&self.term)?;
            if !confirm {
                return self.decide(transaction, position, total);
            }
        }

        if let Decision::Assign(category) = decision {
            self.term.write_line(&format!(
                "  {} {}",
                style("✓").green(),
                style(category.label()).bold()
            ))?;
        }
        Ok(decision)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::categorize::review::Swipe;
    use chrono::NaiveDate;

    #[test]
    fn test_swipe_shortcuts_lead_the_menu() {
        assert_eq!(decision_for_index(0), Decision::from(Swipe::Right));
        assert_eq!(decision_for_index(1), Decision::from(Swipe::Left));
        assert_eq!(decision_for_index(3), Decision::Skip);
        assert_eq!(decision_for_index(4), Decision::Quit);
        assert_eq!(decision_for_index(99), Decision::Skip);
    }

    #[test]
    fn test_every_assignable_category_offered() {
        for category in Category::assignable() {
            assert!(CHOICES
                .iter()
                .any(|(_, d)| *d == Decision::Assign(category)));
        }
    }

    #[test]
    fn test_format_amount() {
        assert_eq!(format_amount(-4.5), "-$4.50");
        assert_eq!(format_amount(1200.0), "$1200.00");
        assert_eq!(format_amount(0.0), "$0.00");
    }

    #[test]
    fn test_card_lines() {
        let transaction = Transaction::new(
            "t1",
            NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
            "STARBUCKS #123",
            -5.75,
        );
        insta::assert_debug_snapshot!(card_lines(&transaction), @r###"
        [
            "  Date:        2024-03-01",
            "  Description: STARBUCKS #123",
            "  Amount:      -$5.75",
        ]
        "###);
    }
}
