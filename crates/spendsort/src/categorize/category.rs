use crate::error::{Result, SpendsortError};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Spending category assigned to a transaction.
///
/// `Uncategorized` is the sentinel for "no rule matched yet"; the other three
/// are the labels a user can decide on.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Essentials,
    Investments,
    UnnecessarySpending,
    Uncategorized,
}

impl Category {
    /// Every category, in seed priority order with the sentinel last.
    pub const ALL: [Category; 4] = [
        Category::Essentials,
        Category::Investments,
        Category::UnnecessarySpending,
        Category::Uncategorized,
    ];

    /// Storage label, as written to the database and rule files.
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Essentials => "essentials",
            Category::Investments => "investments",
            Category::UnnecessarySpending => "unnecessary_spending",
            Category::Uncategorized => "uncategorized",
        }
    }

    /// Human-readable label.
    pub fn label(&self) -> &'static str {
        match self {
            Category::Essentials => "Essentials",
            Category::Investments => "Investments",
            Category::UnnecessarySpending => "Unnecessary Spending",
            Category::Uncategorized => "Uncategorized",
        }
    }

    pub fn is_uncategorized(&self) -> bool {
        matches!(self, Category::Uncategorized)
    }

    /// Categories a user may assign during review.
    pub fn assignable() -> impl Iterator<Item = Category> {
        Self::ALL.into_iter().filter(|c| !c.is_uncategorized())
    }
}

impl FromStr for Category {
    type Err = SpendsortError;

    /// Accepts storage labels (`unnecessary_spending`) and display labels
    /// (`Unnecessary Spending`), ignoring case. Anything else is rejected.
    fn from_str(s: &str) -> Result<Self> {
        let key: String = s
            .trim()
            .chars()
            .map(|c| if c == ' ' || c == '-' { '_' } else { c.to_ascii_lowercase() })
            .collect();

        match key.as_str() {
            "essentials" => Ok(Category::Essentials),
            "investments" => Ok(Category::Investments),
            "unnecessary_spending" | "unnecessaryspending" => Ok(Category::UnnecessarySpending),
            "uncategorized" => Ok(Category::Uncategorized),
            _ => Err(SpendsortError::InvalidCategory(s.to_string())),
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl Default for Category {
    fn default() -> Self {
        Category::Uncategorized
    }
}
