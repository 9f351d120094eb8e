//! Keyword rules and the two operations over them: classifying a transaction
//! and learning from a user decision.
//!
//! A [`RuleSet`] is an ordered list of [`Rule`]s, one per category at most.
//! Classification is first-match-wins over that order. Learning merges a
//! normalized keyword into the rule for the decided category, appending a new
//! rule at the end when the category has none yet.

use crate::categorize::category::Category;
use crate::db::Transaction;
use crate::error::{Result, SpendsortError};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::Path;

const ESSENTIALS_SEED: &[&str] = &[
    "grocery", "supermarket", "food", "gas", "fuel", "pharmacy", "medical", "doctor",
    "insurance", "rent", "mortgage", "utilities", "electric", "water", "internet", "phone",
];

const INVESTMENTS_SEED: &[&str] = &[
    "investment", "stock", "bond", "mutual fund", "etf", "401k", "retirement", "savings",
    "deposit",
];

const UNNECESSARY_SEED: &[&str] = &[
    "starbucks", "coffee", "restaurant", "dining", "entertainment", "movie", "streaming",
    "spotify", "netflix", "amazon", "shopping", "retail", "clothing", "jewelry",
];

/// Normalize free text into a keyword candidate.
///
/// Lower-cases, keeps only ASCII lower-case letters, ASCII digits and
/// whitespace, then trims. Inner runs of whitespace are left as they are.
pub fn normalize_keyword(text: &str) -> String {
    let lowered = text.to_lowercase();
    let kept: String = lowered
        .chars()
        .filter(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c.is_whitespace())
        .collect();
    kept.trim().to_string()
}

/// A category and the keywords that select it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rule {
    category: Category,
    keywords: Vec<String>,
}

impl Rule {
    /// Build a rule, lower-casing keywords and dropping empty or repeated ones.
    pub fn new<I, S>(category: Category, keywords: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut rule = Rule {
            category,
            keywords: Vec::new(),
        };
        for keyword in keywords {
            let keyword = keyword.as_ref().trim().to_lowercase();
            if !keyword.is_empty() {
                rule.insert_keyword(keyword);
            }
        }
        rule
    }

    pub fn category(&self) -> Category {
        self.category
    }

    pub fn keywords(&self) -> &[String] {
        &self.keywords
    }

    pub fn contains_keyword(&self, keyword: &str) -> bool {
        self.keywords.iter().any(|k| k == keyword)
    }

    /// Insert with set semantics. Returns false when already present.
    fn insert_keyword(&mut self, keyword: String) -> bool {
        if self.contains_keyword(&keyword) {
            return false;
        }
        self.keywords.push(keyword);
        true
    }

    /// True when any keyword is a substring of the description.
    ///
    /// `lowered` is the description lower-cased, `normalized` is the same
    /// description passed through [`normalize_keyword`]. Only keywords that are
    /// themselves in normalized form are checked against `normalized`; a
    /// keyword carrying punctuation must appear verbatim.
    pub fn matches(&self, lowered: &str, normalized: &str) -> bool {
        self.keywords.iter().filter(|k| !k.is_empty()).any(|k| {
            lowered.contains(k.as_str())
                || (normalize_keyword(k) == *k && normalized.contains(k.as_str()))
        })
    }
}

/// What a call to [`RuleSet::learn`] did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LearnOutcome {
    /// The description normalized to nothing; the rule set is untouched.
    Ignored,
    /// The keyword was already on the category's rule.
    AlreadyKnown,
    /// The keyword was added to the category's existing rule.
    Added,
    /// The category had no rule; a new one was appended.
    NewRule,
}

impl LearnOutcome {
    pub fn changed_keywords(&self) -> bool {
        matches!(self, LearnOutcome::Added | LearnOutcome::NewRule)
    }
}

/// A user's ordered rules, highest priority first.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RuleSet {
    last_updated: DateTime<Utc>,
    #[serde(default)]
    rules: Vec<Rule>,
}

impl RuleSet {
    /// Rule set with no rules. Everything classifies as uncategorized.
    pub fn empty() -> Self {
        Self {
            last_updated: Utc::now(),
            rules: Vec::new(),
        }
    }

    /// Fresh copy of the starter rules every new user receives.
    pub fn default_seed() -> Self {
        Self {
            last_updated: Utc::now(),
            rules: vec![
                Rule::new(Category::Essentials, ESSENTIALS_SEED),
                Rule::new(Category::Investments, INVESTMENTS_SEED),
                Rule::new(Category::UnnecessarySpending, UNNECESSARY_SEED),
            ],
        }
    }

    /// Build from explicit rules, enforcing one rule per category and
    /// non-empty normalized keywords.
    pub fn new(rules: Vec<Rule>, last_updated: DateTime<Utc>) -> Result<Self> {
        let rule_set = Self {
            last_updated,
            rules,
        };
        rule_set.validate()?;
        Ok(rule_set)
    }

    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    pub fn last_updated(&self) -> DateTime<Utc> {
        self.last_updated
    }

    pub fn rule_for(&self, category: Category) -> Option<&Rule> {
        self.rules.iter().find(|r| r.category == category)
    }

    pub fn keyword_count(&self) -> usize {
        self.rules.iter().map(|r| r.keywords.len()).sum()
    }

    /// Check the invariants a stored rule set must hold.
    pub fn validate(&self) -> Result<()> {
        for (idx, rule) in self.rules.iter().enumerate() {
            if self.rules[..idx].iter().any(|r| r.category == rule.category) {
                return Err(SpendsortError::InvalidRuleSet(format!(
                    "more than one rule for category '{}'",
                    rule.category
                )));
            }
            if let Some(bad) = rule.keywords.iter().find(|k| normalize_keyword(k).is_empty()) {
                return Err(SpendsortError::InvalidRuleSet(format!(
                    "keyword {:?} in '{}' rule is empty after normalization",
                    bad, rule.category
                )));
            }
        }
        Ok(())
    }

    /// Category of the first rule matching `description`, or
    /// `Uncategorized` when none does.
    pub fn classify_description(&self, description: &str) -> Category {
        if description.is_empty() {
            return Category::Uncategorized;
        }

        let lowered = description.to_lowercase();
        let normalized = normalize_keyword(description);

        self.rules
            .iter()
            .find(|rule| rule.matches(&lowered, &normalized))
            .map(|rule| rule.category)
            .unwrap_or(Category::Uncategorized)
    }

    /// Fold one decision into the rules.
    ///
    /// The description becomes a keyword on the rule for `category`. A
    /// category without a rule gets one appended at the end, so it ranks
    /// below every existing rule.
    pub fn learn(&mut self, description: &str, category: Category) -> LearnOutcome {
        let candidate = normalize_keyword(description);
        if candidate.is_empty() {
            log::debug!("Ignoring decision on {:?}: no keyword survives normalization", description);
            return LearnOutcome::Ignored;
        }

        let outcome = match self.rules.iter_mut().find(|r| r.category == category) {
            Some(rule) => {
                if rule.insert_keyword(candidate.clone()) {
                    LearnOutcome::Added
                } else {
                    LearnOutcome::AlreadyKnown
                }
            }
            None => {
                self.rules.push(Rule {
                    category,
                    keywords: vec![candidate.clone()],
                });
                LearnOutcome::NewRule
            }
        };

        self.last_updated = Utc::now();
        log::debug!("Learned {:?} -> {} ({:?})", candidate, category, outcome);
        outcome
    }

    /// Load a rule set from a TOML file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    /// Parse a rule set from TOML and validate it.
    ///
    /// Keywords are lower-cased and de-duplicated on the way in.
    pub fn from_toml(toml_str: &str) -> Result<Self> {
        let parsed: RuleSet = toml::from_str(toml_str)
            .map_err(|e| SpendsortError::Config(format!("Failed to parse rules TOML: {}", e)))?;

        let rules = parsed
            .rules
            .into_iter()
            .map(|rule| Rule::new(rule.category, rule.keywords))
            .collect();

        Self::new(rules, parsed.last_updated)
    }

    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self)
            .map_err(|e| SpendsortError::Config(format!("Failed to serialize rules: {}", e)))
    }

    /// Save the rule set to a TOML file.
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        std::fs::write(path, self.to_toml()?)?;
        Ok(())
    }
}

/// Assign a category to one transaction. Pure; the caller applies the result.
pub fn classify(transaction: &Transaction, rule_set: &RuleSet) -> Category {
    rule_set.classify_description(&transaction.description)
}

/// Classify each transaction independently, preserving order.
pub fn classify_all(transactions: Vec<Transaction>, rule_set: &RuleSet) -> Vec<Transaction> {
    transactions
        .into_iter()
        .map(|mut transaction| {
            transaction.category = classify(&transaction, rule_set);
            transaction
        })
        .collect()
}

/// Learn from one decision, consuming the rule set and returning the update.
pub fn learn(mut rule_set: RuleSet, description: &str, category: Category) -> RuleSet {
    rule_set.learn(description, category);
    rule_set
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn txn(description: &str) -> Transaction {
        Transaction::new(
            "t1",
            NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
            description,
            -12.5,
        )
    }

    fn keywords_of(rule_set: &RuleSet) -> Vec<(Category, Vec<String>)> {
        rule_set
            .rules()
            .iter()
            .map(|r| (r.category(), r.keywords().to_vec()))
            .collect()
    }

    #[test]
    fn test_normalize_keyword() {
        assert_eq!(normalize_keyword("Trader Joe's #55"), "trader joes 55");
        assert_eq!(normalize_keyword("  Amazon.com  "), "amazoncom");
        assert_eq!(normalize_keyword("!!!"), "");
        assert_eq!(normalize_keyword("Café Noir"), "caf noir");
        assert_eq!(normalize_keyword("A - B"), "a  b");
    }

    #[test]
    fn test_default_seed_shape() {
        let seed = RuleSet::default_seed();
        let categories: Vec<_> = seed.rules().iter().map(|r| r.category()).collect();
        assert_eq!(
            categories,
            vec![
                Category::Essentials,
                Category::Investments,
                Category::UnnecessarySpending
            ]
        );
        assert_eq!(seed.rule_for(Category::Essentials).unwrap().keywords().len(), 16);
        assert_eq!(seed.rule_for(Category::Investments).unwrap().keywords().len(), 9);
        assert_eq!(
            seed.rule_for(Category::UnnecessarySpending).unwrap().keywords()[..2],
            ["starbucks".to_string(), "coffee".to_string()]
        );
        seed.validate().unwrap();
    }

    #[test]
    fn test_default_seed_is_independent_per_call() {
        let mut first = RuleSet::default_seed();
        first.learn("Local Bakery", Category::Essentials);
        let second = RuleSet::default_seed();
        assert!(!second
            .rule_for(Category::Essentials)
            .unwrap()
            .contains_keyword("local bakery"));
    }

    #[test]
    fn test_classify_seed_starbucks() {
        let seed = RuleSet::default_seed();
        assert_eq!(classify(&txn("STARBUCKS #1234"), &seed), Category::UnnecessarySpending);
    }

    #[test]
    fn test_classify_no_match_and_empty() {
        let seed = RuleSet::default_seed();
        assert_eq!(classify(&txn("ZELLE TO J SMITH"), &seed), Category::Uncategorized);
        assert_eq!(classify(&txn(""), &seed), Category::Uncategorized);
        assert_eq!(classify(&txn("anything"), &RuleSet::empty()), Category::Uncategorized);
    }

    #[test]
    fn test_classify_priority_order() {
        // "gas" (Essentials) and "dining" (Unnecessary) both match; Essentials comes first.
        let seed = RuleSet::default_seed();
        assert_eq!(classify(&txn("GAS STATION DINING"), &seed), Category::Essentials);
    }

    #[test]
    fn test_classify_matches_multi_word_keyword() {
        let seed = RuleSet::default_seed();
        assert_eq!(classify(&txn("VANGUARD MUTUAL FUND"), &seed), Category::Investments);
    }

    #[test]
    fn test_classify_all_preserves_order() {
        let seed = RuleSet::default_seed();
        let out = classify_all(
            vec![txn("SPOTIFY USA"), txn("UNKNOWN"), txn("CVS PHARMACY")],
            &seed,
        );
        let categories: Vec<_> = out.iter().map(|t| t.category).collect();
        assert_eq!(
            categories,
            vec![
                Category::UnnecessarySpending,
                Category::Uncategorized,
                Category::Essentials
            ]
        );
        assert_eq!(out[0].description, "SPOTIFY USA");
    }

    #[test]
    fn test_seed_keyword_inside_another_word_ranks_by_rule_order() {
        // "netflix" contains the Investments keyword "etf", and Investments is scanned first.
        let seed = RuleSet::default_seed();
        assert_eq!(classify(&txn("NETFLIX.COM"), &seed), Category::Investments);

        let learned = learn(seed, "NETFLIX.COM", Category::UnnecessarySpending);
        assert_eq!(classify(&txn("NETFLIX.COM"), &learned), Category::Investments);
    }

    #[test]
    fn test_learn_trader_joes_then_classify() {
        let updated = learn(RuleSet::default_seed(), "Trader Joe's #55", Category::Essentials);
        let essentials = updated.rule_for(Category::Essentials).unwrap();
        assert!(essentials.contains_keyword("trader joes 55"));
        assert_eq!(updated.rules().len(), 3);
        assert_eq!(classify(&txn("TRADER JOE'S #55"), &updated), Category::Essentials);
    }

    #[test]
    fn test_learn_appends_new_rule_last() {
        let rules = RuleSet::new(
            vec![Rule::new(Category::UnnecessarySpending, ["coffee"])],
            Utc::now(),
        )
        .unwrap();

        let updated = learn(rules, "Trader Joe's #55", Category::Essentials);
        assert_eq!(
            keywords_of(&updated),
            vec![
                (Category::UnnecessarySpending, vec!["coffee".to_string()]),
                (Category::Essentials, vec!["trader joes 55".to_string()]),
            ]
        );
    }

    #[test]
    fn test_learn_merges_same_category() {
        let mut rules = RuleSet::empty();
        assert_eq!(rules.learn("Amazon.com", Category::UnnecessarySpending), LearnOutcome::NewRule);
        assert_eq!(rules.learn("amazon prime", Category::UnnecessarySpending), LearnOutcome::Added);
        assert_eq!(
            keywords_of(&rules),
            vec![(
                Category::UnnecessarySpending,
                vec!["amazoncom".to_string(), "amazon prime".to_string()]
            )]
        );
    }

    #[test]
    fn test_learn_is_idempotent() {
        let once = learn(RuleSet::default_seed(), "Corner Shop", Category::Essentials);
        let mut twice = once.clone();
        assert_eq!(twice.learn("Corner Shop", Category::Essentials), LearnOutcome::AlreadyKnown);
        assert_eq!(keywords_of(&once), keywords_of(&twice));
    }

    #[test]
    fn test_learn_empty_candidate_is_noop() {
        let before = RuleSet::default_seed();
        let mut after = before.clone();
        assert_eq!(after.learn("!!!", Category::Essentials), LearnOutcome::Ignored);
        assert_eq!(after, before);
        assert_eq!(learn(before.clone(), "", Category::Investments), before);
    }

    #[test]
    fn test_learn_stamps_timestamp() {
        let old = Utc::now() - chrono::Duration::days(3);
        let rules = RuleSet::new(vec![], old).unwrap();
        let updated = learn(rules, "Dentist", Category::Essentials);
        assert!(updated.last_updated() > old);
    }

    #[test]
    fn test_learn_accepts_uncategorized() {
        let updated = learn(RuleSet::empty(), "Transfer", Category::Uncategorized);
        assert_eq!(updated.rules().len(), 1);
        assert_eq!(updated.rules()[0].category(), Category::Uncategorized);
    }

    #[test]
    fn test_new_rejects_duplicate_category() {
        let result = RuleSet::new(
            vec![
                Rule::new(Category::Essentials, ["rent"]),
                Rule::new(Category::Essentials, ["water"]),
            ],
            Utc::now(),
        );
        assert!(matches!(result, Err(SpendsortError::InvalidRuleSet(_))));
    }

    #[test]
    fn test_new_rejects_punctuation_keyword() {
        let result = RuleSet::new(vec![Rule::new(Category::Essentials, ["#!"])], Utc::now());
        assert!(matches!(result, Err(SpendsortError::InvalidRuleSet(_))));
    }

    #[test]
    fn test_rule_new_dedupes_and_lowercases() {
        let rule = Rule::new(Category::Investments, ["ETF", "etf", " ", "Bond"]);
        assert_eq!(rule.keywords(), ["etf".to_string(), "bond".to_string()]);
    }

    #[test]
    fn test_punctuated_keyword_only_matches_verbatim() {
        let rule = Rule::new(Category::UnnecessarySpending, ["amazon.com"]);
        let hit = "amazon.com order";
        let miss = "amazoncom order";
        assert!(rule.matches(hit, &normalize_keyword(hit)));
        assert!(!rule.matches(miss, &normalize_keyword(miss)));
    }

    #[test]
    fn test_normalized_keyword_matches_across_punctuation() {
        // A keyword learned from "A-B" is "ab" and must match that description again.
        let rules = learn(RuleSet::empty(), "A-B", Category::Essentials);
        assert!(rules.rule_for(Category::Essentials).unwrap().contains_keyword("ab"));
        assert_eq!(rules.classify_description("A-B"), Category::Essentials);
        assert_eq!(rules.classify_description("A.B."), Category::Essentials);
    }

    #[test]
    fn test_parse_rules_from_toml() {
        let toml = r#"
            last_updated = "2024-05-01T12:00:00Z"

            [[rules]]
            category = "unnecessary_spending"
            keywords = ["Starbucks", "coffee", "coffee"]

            [[rules]]
            category = "essentials"
            keywords = ["rent"]
        "#;

        let rules = RuleSet::from_toml(toml).unwrap();
        assert_eq!(rules.rules().len(), 2);
        assert_eq!(rules.rules()[0].category(), Category::UnnecessarySpending);
        assert_eq!(
            rules.rules()[0].keywords(),
            ["starbucks".to_string(), "coffee".to_string()]
        );
        assert_eq!(classify(&txn("MONTHLY RENT"), &rules), Category::Essentials);
    }

    #[test]
    fn test_parse_rules_rejects_unknown_category() {
        let toml = r#"
            last_updated = "2024-05-01T12:00:00Z"

            [[rules]]
            category = "groceries"
            keywords = ["aldi"]
        "#;

        assert!(matches!(RuleSet::from_toml(toml), Err(SpendsortError::Config(_))));
    }

    #[test]
    fn test_toml_round_trip_keeps_order() {
        let rules = learn(RuleSet::default_seed(), "Blue Bottle", Category::UnnecessarySpending);
        let parsed = RuleSet::from_toml(&rules.to_toml().unwrap()).unwrap();
        assert_eq!(keywords_of(&parsed), keywords_of(&rules));
        assert_eq!(parsed.last_updated(), rules.last_updated());
    }
}
