use std::collections::BTreeMap;
use std::str::FromStr;

use rust_decimal::Decimal;

use super::MAX_AMOUNT;
use crate::error::FinError;

/// Limit applied to any category without an explicit entry.
pub const DEFAULT_LIMIT: Decimal = Decimal::ONE_THOUSAND;

/// Per-category spending limits for one session.
///
/// Limits are always positive. The only way to change one is
/// [`BudgetLimits::update_limit`], which rejects anything else.
#[derive(Debug, Clone, PartialEq)]
pub struct BudgetLimits {
    limits: BTreeMap<String, Decimal>,
    default_limit: Decimal,
}

impl Default for BudgetLimits {
    fn default() -> Self {
        let limits = [
            ("Payment", Decimal::new(2500, 0)),
            ("Other", Decimal::new(1500, 0)),
            ("Transfer", Decimal::new(1200, 0)),
            ("Food and Drink", Decimal::new(500, 0)),
            ("Travel", Decimal::new(600, 0)),
        ]
        .into_iter()
        .map(|(name, limit)| (name.to_string(), limit))
        .collect();

        Self {
            limits,
            default_limit: DEFAULT_LIMIT,
        }
    }
}

impl BudgetLimits {
    pub fn default_limit(&self) -> Decimal {
        self.default_limit
    }

    pub fn set_default_limit(&mut self, limit: Decimal) -> Result<(), FinError> {
        if !is_valid_limit(limit) {
            return Err(FinError::InvalidLimit {
                category: "default".into(),
                limit,
            });
        }
        self.default_limit = limit;
        Ok(())
    }

    /// Limit for `category`, matched case-insensitively, or the default.
    pub fn limit_for(&self, category: &str) -> Decimal {
        self.explicit_limit(category).unwrap_or(self.default_limit)
    }

    pub fn explicit_limit(&self, category: &str) -> Option<Decimal> {
        if let Some(limit) = self.limits.get(category) {
            return Some(*limit);
        }
        self.existing_key(category).and_then(|key| self.limits.get(key).copied())
    }

    /// The stored spelling of `category`, compared case-insensitively.
    fn existing_key(&self, category: &str) -> Option<&str> {
        let lower = category.to_lowercase();
        self.limits
            .keys()
            .find(|name| name.to_lowercase() == lower)
            .map(String::as_str)
    }

    /// Replace the limit for one category. Non-positive or out-of-range
    /// limits are rejected and the previous limit stays in place.
    pub fn update_limit(&mut self, category: &str, new_limit: Decimal) -> Result<(), FinError> {
        if !is_valid_limit(new_limit) {
            tracing::warn!(category, %new_limit, "rejected budget limit");
            return Err(FinError::InvalidLimit {
                category: category.to_string(),
                limit: new_limit,
            });
        }

        let key = self
            .existing_key(category)
            .unwrap_or(category)
            .to_string();
        tracing::debug!(category = %key, %new_limit, "budget limit updated");
        self.limits.insert(key, new_limit);
        Ok(())
    }

    /// Like [`update_limit`](Self::update_limit) but for raw user input.
    pub fn update_limit_str(&mut self, category: &str, input: &str) -> Result<(), FinError> {
        let cleaned = input.trim().replace(['$', ','], "");
        let limit = Decimal::from_str(&cleaned).map_err(|_| {
            tracing::warn!(category, input, "rejected non-numeric budget limit");
            FinError::NonNumericLimit {
                category: category.to_string(),
                input: input.to_string(),
            }
        })?;
        self.update_limit(category, limit)
    }

    /// Configured categories in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, Decimal)> {
        self.limits.iter().map(|(name, limit)| (name.as_str(), *limit))
    }

    pub fn len(&self) -> usize {
        self.limits.len()
    }

    pub fn is_empty(&self) -> bool {
        self.limits.is_empty()
    }
}

/// Positive and no larger than [`MAX_AMOUNT`].
fn is_valid_limit(limit: Decimal) -> bool {
    limit > Decimal::ZERO && limit <= MAX_AMOUNT
}
