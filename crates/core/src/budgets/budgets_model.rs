//! Budget domain models.

use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::categories::Category;
use crate::errors::Result;
use crate::utils::{ensure_positive_amount, Period};

/// A user's spending ceiling for one category in one calendar month.
///
/// (user_id, category, month, year) is the natural key: at most one budget
/// exists per tuple.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Budget {
    pub id: String,
    pub user_id: String,
    pub category: Category,
    pub amount: Decimal,
    pub month: i32,
    pub year: i32,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

/// Input model for setting a budget, as received from the boundary.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewBudget {
    pub category: String,
    pub amount: Decimal,
    pub month: i32,
    pub year: i32,
}

impl NewBudget {
    /// Validates the input and binds it to its owner.
    pub fn into_upsert(self, user_id: &str) -> Result<BudgetUpsert> {
        let category = Category::parse(&self.category)?;
        let amount = ensure_positive_amount(self.amount)?;
        let period = Period::new(self.month, self.year)?;
        Ok(BudgetUpsert {
            user_id: user_id.to_string(),
            category,
            period,
            amount,
        })
    }
}

/// A validated create-or-replace request keyed by (user, category, period).
#[derive(Debug, Clone, PartialEq)]
pub struct BudgetUpsert {
    pub user_id: String,
    pub category: Category,
    pub period: Period,
    pub amount: Decimal,
}
