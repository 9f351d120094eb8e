pub mod category;
pub mod interactive;
pub mod review;
pub mod rules;

pub use category::Category;
pub use interactive::TerminalReviewer;
pub use review::{Decision, DecisionSource, ReviewSession, ReviewSummary, Swipe};
pub use rules::{classify, classify_all, learn, normalize_keyword, LearnOutcome, Rule, RuleSet};
