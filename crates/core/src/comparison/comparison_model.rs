use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::categories::Category;

/// Budget against actual spend for one budgeted category.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CategoryComparison {
    pub category: Category,
    pub budget_amount: Decimal,
    pub spent_amount: Decimal,
    pub remaining_amount: Decimal,
    pub percentage_used: Decimal,
    pub is_over_budget: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ComparisonSummary {
    pub total_budget: Decimal,
    /// Spend across every category of the period, budgeted or not.
    pub total_spent: Decimal,
    pub total_remaining: Decimal,
    pub overall_percentage_used: Decimal,
}

/// Derived report for one period. Never persisted.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct BudgetComparison {
    pub month: i32,
    pub year: i32,
    pub categories: Vec<CategoryComparison>,
    pub summary: ComparisonSummary,
}
