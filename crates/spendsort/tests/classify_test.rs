use chrono::NaiveDate;
use spendsort_lib::{classify, classify_all, learn, Category, Rule, RuleSet, Transaction};

fn txn(description: &str) -> Transaction {
    Transaction::new(
        "t",
        NaiveDate::from_ymd_opt(2024, 5, 1).unwrap(),
        description,
        -10.0,
    )
}

#[test]
fn test_seed_scenarios() {
    let seed = RuleSet::default_seed();
    assert_eq!(classify(&txn("STARBUCKS #1234"), &seed), Category::UnnecessarySpending);
    assert_eq!(classify(&txn("Shell Gas Station"), &seed), Category::Essentials);
    assert_eq!(classify(&txn("Fidelity 401K contribution"), &seed), Category::Investments);
    assert_eq!(classify(&txn("Zelle to roommate"), &seed), Category::Uncategorized);
    assert_eq!(classify(&txn(""), &seed), Category::Uncategorized);
}

#[test]
fn test_earlier_rule_wins() {
    // "grocery" and "shopping" both match; Essentials comes first in the seed.
    let seed = RuleSet::default_seed();
    assert_eq!(
        classify(&txn("Grocery shopping"), &seed),
        Category::Essentials
    );

    let reordered = RuleSet::new(
        vec![
            Rule::new(Category::UnnecessarySpending, ["shopping"]),
            Rule::new(Category::Essentials, ["grocery"]),
        ],
        chrono::Utc::now(),
    )
    .unwrap();
    assert_eq!(
        classify(&txn("Grocery shopping"), &reordered),
        Category::UnnecessarySpending
    );
}

#[test]
fn test_learning_flow_over_a_batch() {
    let batch = vec![
        txn("Trader Joe's #55"),
        txn("Amazon.com"),
        txn("Corner Deli"),
    ];

    let rules = RuleSet::default_seed();
    let first = classify_all(batch.clone(), &rules);
    let categories: Vec<_> = first.iter().map(|t| t.category).collect();
    assert_eq!(
        categories,
        vec![
            Category::Uncategorized,
            Category::UnnecessarySpending,
            Category::Uncategorized
        ]
    );

    let rules = learn(rules, "Trader Joe's #55", Category::Essentials);
    let rules = learn(rules, "Corner Deli", Category::Essentials);
    let second = classify_all(batch, &rules);
    assert!(second.iter().all(|t| !t.is_uncategorized()));
    assert_eq!(second[0].category, Category::Essentials);
    assert_eq!(second[2].category, Category::Essentials);
}

#[test]
fn test_new_rule_appended_last() {
    let rules = RuleSet::new(
        vec![Rule::new(Category::UnnecessarySpending, ["joe"])],
        chrono::Utc::now(),
    )
    .unwrap();

    let rules = learn(rules, "Trader Joe's #55", Category::Essentials);
    let order: Vec<_> = rules.rules().iter().map(|r| r.category()).collect();
    assert_eq!(order, vec![Category::UnnecessarySpending, Category::Essentials]);
    // The older rule still wins for the description it was learned from.
    assert_eq!(
        rules.classify_description("Trader Joe's #55"),
        Category::UnnecessarySpending
    );
}
