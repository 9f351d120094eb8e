use chrono::NaiveDate;
use proptest::prelude::*;
use spendsort_lib::{classify, classify_all, learn, normalize_keyword, Category, RuleSet, Transaction};

fn any_category() -> impl Strategy<Value = Category> {
    prop::sample::select(Category::ALL.to_vec())
}

fn description() -> impl Strategy<Value = String> {
    "[A-Za-z0-9 '#.&-]{0,30}"
}

fn keyword_content(rule_set: &RuleSet) -> Vec<(Category, Vec<String>)> {
    rule_set
        .rules()
        .iter()
        .map(|r| {
            let mut keywords = r.keywords().to_vec();
            keywords.sort();
            (r.category(), keywords)
        })
        .collect()
}

fn txn(id: usize, description: &str) -> Transaction {
    Transaction::new(
        format!("t{}", id),
        NaiveDate::from_ymd_opt(2024, 6, 1).unwrap(),
        description,
        -1.0,
    )
}

proptest! {
    #[test]
    fn classify_is_deterministic(desc in description()) {
        let seed = RuleSet::default_seed();
        let t = txn(0, &desc);
        prop_assert_eq!(classify(&t, &seed), classify(&t, &seed));
    }

    #[test]
    fn learning_twice_equals_learning_once(desc in description(), category in any_category()) {
        let once = learn(RuleSet::default_seed(), &desc, category);
        let twice = learn(once.clone(), &desc, category);
        prop_assert_eq!(keyword_content(&once), keyword_content(&twice));
    }

    #[test]
    fn punctuation_only_is_a_no_op(desc in "[!#$%&'.,*()-]{0,12}", category in any_category()) {
        let before = RuleSet::default_seed();
        let after = learn(before.clone(), &desc, category);
        prop_assert_eq!(before, after);
    }

    #[test]
    fn at_most_one_rule_per_category(
        decisions in prop::collection::vec((description(), any_category()), 0..25)
    ) {
        let mut rules = RuleSet::empty();
        for (desc, category) in &decisions {
            rules = learn(rules, desc, *category);
        }
        prop_assert!(rules.validate().is_ok());
        for category in Category::ALL {
            let count = rules.rules().iter().filter(|r| r.category() == category).count();
            prop_assert!(count <= 1);
        }
    }

    #[test]
    fn learned_description_is_recognized(desc in description(), category in any_category()) {
        prop_assume!(!normalize_keyword(&desc).is_empty());
        let rules = learn(RuleSet::empty(), &desc, category);
        prop_assert_eq!(rules.classify_description(&desc), category);
    }

    #[test]
    fn classify_all_preserves_order(descs in prop::collection::vec(description(), 0..20)) {
        let seed = RuleSet::default_seed();
        let batch: Vec<_> = descs.iter().enumerate().map(|(i, d)| txn(i, d)).collect();
        let classified = classify_all(batch.clone(), &seed);

        prop_assert_eq!(classified.len(), batch.len());
        for (before, after) in batch.iter().zip(&classified) {
            prop_assert_eq!(&before.id, &after.id);
            prop_assert_eq!(after.category, classify(before, &seed));
        }
    }
}
