//! Review loop: walk the uncategorized transactions one at a time, learn a
//! rule from each decision and persist both the rules and the transaction.
//!
//! Decisions only ever apply to the transaction being shown. Rules learned
//! mid-session are not re-applied to the rest of the queue.

use crate::categorize::category::Category;
use crate::categorize::rules::{LearnOutcome, RuleSet};
use crate::db::{Database, Transaction};
use crate::error::{Result, SpendsortError};
use std::collections::VecDeque;

/// The two-way swipe of the review surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Swipe {
    /// Not needed: unnecessary spending
    Left,
    /// Needed: essentials
    Right,
}

impl Swipe {
    pub fn category(&self) -> Category {
        match self {
            Swipe::Left => Category::UnnecessarySpending,
            Swipe::Right => Category::Essentials,
        }
    }
}

/// What the user chose for the transaction in front of them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Assign(Category),
    Skip,
    Quit,
}

impl From<Swipe> for Decision {
    fn from(swipe: Swipe) -> Self {
        Decision::Assign(swipe.category())
    }
}

/// Anything that can produce a decision for one queued transaction.
pub trait DecisionSource {
    /// `position` is 1-based within a session of `total` transactions.
    fn decide(&mut self, transaction: &Transaction, position: usize, total: usize) -> Result<Decision>;
}

/// Tally of one review session.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReviewSummary {
    pub decided: usize,
    pub skipped: usize,
    pub remaining: usize,
    pub keywords_learned: usize,
    pub rules_created: usize,
}

/// One user's pass over their uncategorized transactions.
pub struct ReviewSession<'a, D: Database> {
    db: &'a mut D,
    user: String,
    rule_set: RuleSet,
    queue: VecDeque<Transaction>,
    total: usize,
    summary: ReviewSummary,
}

impl<'a, D: Database> ReviewSession<'a, D> {
    /// Load the user's rules and queue up their uncategorized transactions.
    pub fn start(db: &'a mut D, user: &str, limit: Option<u32>) -> Result<Self> {
        let rule_set = db.get_or_create_rule_set(user)?;
        let queue = db.list_uncategorized(user, limit)?;
        log::info!("Starting review for {}: {} transactions queued", user, queue.len());
        Ok(Self::new(db, user, rule_set, queue))
    }

    pub fn new(db: &'a mut D, user: &str, rule_set: RuleSet, queue: Vec<Transaction>) -> Self {
        let queue: VecDeque<Transaction> = queue.into_iter().collect();
        Self {
            db,
            user: user.to_string(),
            rule_set,
            total: queue.len(),
            queue,
            summary: ReviewSummary::default(),
        }
    }

    pub fn current(&self) -> Option<&Transaction> {
        self.queue.front()
    }

    pub fn remaining(&self) -> usize {
        self.queue.len()
    }

    pub fn is_complete(&self) -> bool {
        self.queue.is_empty()
    }

    pub fn rule_set(&self) -> &RuleSet {
        &self.rule_set
    }

    pub fn summary(&self) -> ReviewSummary {
        ReviewSummary {
            remaining: self.queue.len(),
            ..self.summary.clone()
        }
    }

    /// Assign `category` to the current transaction.
    ///
    /// Learns from its description, persists the rule set, then records the
    /// category on the transaction. The session only adopts the new rule set
    /// once it has been saved, so a failed write leaves it as it was.
    /// Returns true while transactions remain.
    pub fn decide(&mut self, category: Category) -> Result<bool> {
        if category.is_uncategorized() {
            return Err(SpendsortError::InvalidCategory(format!(
                "cannot assign '{}' during review",
                category
            )));
        }
        let transaction = self
            .queue
            .front()
            .cloned()
            .ok_or_else(|| SpendsortError::UserInput("review queue is empty".to_string()))?;

        let mut updated = self.rule_set.clone();
        let outcome = updated.learn(&transaction.description, category);
        self.db.save_rule_set(&self.user, &updated)?;
        self.rule_set = updated;

        self.db
            .update_transaction_category(&self.user, &transaction.id, category)?;
        self.queue.pop_front();

        self.summary.decided += 1;
        if outcome.changed_keywords() {
            self.summary.keywords_learned += 1;
        }
        if outcome == LearnOutcome::NewRule {
            self.summary.rules_created += 1;
        }
        log::debug!(
            "{} -> {} ({:?}), {} left",
            transaction.description,
            category,
            outcome,
            self.queue.len()
        );

        Ok(!self.queue.is_empty())
    }

    /// Leave the current transaction uncategorized and move on.
    pub fn skip(&mut self) -> bool {
        if self.queue.pop_front().is_some() {
            self.summary.skipped += 1;
        }
        !self.queue.is_empty()
    }

    /// Drive the session from `source` until the queue empties or it quits.
    pub fn run<S: DecisionSource>(mut self, source: &mut S) -> Result<ReviewSummary> {
        while let Some(transaction) = self.queue.front().cloned() {
            let position = self.total - self.queue.len() + 1;
            match source.decide(&transaction, position, self.total)? {
                Decision::Assign(category) => {
                    self.decide(category)?;
                }
                Decision::Skip => {
                    self.skip();
                }
                Decision::Quit => break,
            }
        }

        let summary = self.summary();
        log::info!(
            "Review for {} finished: {} decided, {} skipped, {} remaining",
            self.user,
            summary.decided,
            summary.skipped,
            summary.remaining
        );
        Ok(summary)
    }
}
