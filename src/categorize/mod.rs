use serde::{Deserialize, Serialize};

use crate::models::{Transaction, OTHER_CATEGORY};

/// A user-facing budget grouping and the category keywords that feed it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BudgetBucket {
    pub label: String,
    pub keywords: Vec<String>,
}

impl BudgetBucket {
    pub fn new<I, S>(label: &str, keywords: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            label: label.to_string(),
            keywords: keywords.into_iter().map(Into::into).collect(),
        }
    }
}

/// Ordered keyword table mapping raw category labels to budget buckets.
///
/// A transaction goes to the first bucket (in table order) with a keyword
/// contained, case-insensitively, in any of its category entries. Anything
/// unmatched goes to the default bucket.
#[derive(Debug, Clone)]
pub struct BucketTable {
    buckets: Vec<CompiledBucket>,
    default_label: String,
}

#[derive(Debug, Clone)]
struct CompiledBucket {
    label: String,
    keywords: Vec<String>,
}

impl Default for BucketTable {
    fn default() -> Self {
        Self::new(&default_buckets(), OTHER_CATEGORY)
    }
}

/// The buckets behind the default budget limits.
pub fn default_buckets() -> Vec<BudgetBucket> {
    vec![
        BudgetBucket::new("Payment", ["payment", "credit card"]),
        BudgetBucket::new("Transfer", ["transfer", "deposit", "withdrawal"]),
        BudgetBucket::new(
            "Food and Drink",
            ["food", "drink", "restaurant", "coffee", "groceries"],
        ),
        BudgetBucket::new("Travel", ["travel", "airline", "taxi", "lodging", "car service"]),
    ]
}

impl BucketTable {
    pub fn new(buckets: &[BudgetBucket], default_label: &str) -> Self {
        let compiled = buckets
            .iter()
            .map(|b| CompiledBucket {
                label: b.label.clone(),
                keywords: b
                    .keywords
                    .iter()
                    .map(|k| k.trim().to_lowercase())
                    .filter(|k| !k.is_empty())
                    .collect(),
            })
            .collect();

        let default_label = if default_label.trim().is_empty() {
            OTHER_CATEGORY
        } else {
            default_label
        };

        Self {
            buckets: compiled,
            default_label: default_label.to_string(),
        }
    }

    pub fn default_label(&self) -> &str {
        &self.default_label
    }

    /// Bucket labels in table order, followed by the default bucket
    /// unless a configured bucket already uses that label.
    pub fn labels(&self) -> Vec<&str> {
        let mut labels: Vec<&str> = self.buckets.iter().map(|b| b.label.as_str()).collect();
        if !labels.contains(&self.default_label.as_str()) {
            labels.push(&self.default_label);
        }
        labels
    }

    /// Resolve one transaction to its bucket label.
    pub fn resolve(&self, txn: &Transaction) -> &str {
        self.resolve_labels(&txn.category)
    }

    /// Resolve a raw category list. An empty list goes to the default bucket.
    pub fn resolve_labels(&self, category: &[String]) -> &str {
        let lowered: Vec<String> = category.iter().map(|c| c.to_lowercase()).collect();

        for bucket in &self.buckets {
            let matched = bucket
                .keywords
                .iter()
                .any(|kw| lowered.iter().any(|c| c.contains(kw.as_str())));
            if matched {
                return &bucket.label;
            }
        }

        &self.default_label
    }

    /// Pair every transaction with its bucket, keeping input order.
    pub fn resolve_batch<'a>(&'a self, transactions: &'a [Transaction]) -> Vec<(&'a str, &'a Transaction)> {
        transactions.iter().map(|t| (self.resolve(t), t)).collect()
    }
}

#[cfg(test)]
mod tests;
