//! Promotion Criteria

use serde::{Deserialize, Serialize};

/// Rule deciding which orders qualify for a promo event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PromoCriteria {
    /// The order must contain at least one item from every listed category.
    CategorySet { categories: Vec<String> },
}

impl PromoCriteria {
    #[must_use]
    pub const fn to_str(&self) -> &'static str {
        match self {
            Self::CategorySet { .. } => "category_set",
        }
    }

    /// Trimmed, lower-cased and de-duplicated copy.
    #[must_use]
    pub fn normalized(self) -> Self {
        match self {
            Self::CategorySet { categories } => {
                let mut categories: Vec<String> = categories
                    .iter()
                    .map(|c| c.trim().to_lowercase())
                    .filter(|c| !c.is_empty())
                    .collect();

                categories.sort_unstable();
                categories.dedup();

                Self::CategorySet { categories }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use super::*;

    #[test]
    fn serializes_with_kind_tag() -> TestResult {
        let criteria = PromoCriteria::CategorySet {
            categories: vec!["fruits".to_string()],
        };

        assert_eq!(
            serde_json::to_value(&criteria)?,
            serde_json::json!({ "kind": "category_set", "categories": ["fruits"] })
        );

        Ok(())
    }

    #[test]
    fn normalized_lowercases_and_dedups() {
        let criteria = PromoCriteria::CategorySet {
            categories: vec![
                " Seafood".to_string(),
                "FRUITS".to_string(),
                "seafood".to_string(),
                "  ".to_string(),
            ],
        }
        .normalized();

        assert_eq!(
            criteria,
            PromoCriteria::CategorySet {
                categories: vec!["fruits".to_string(), "seafood".to_string()]
            }
        );
    }
}
