//! Wire types for the Budgetwise REST API.

use serde::{Deserialize, Serialize};

use budgetwise_core::budgets::Budget;
use budgetwise_core::comparison::BudgetComparison;
use budgetwise_core::expenses::{Expense, Pagination};

/// Error body returned by the API.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiErrorResponse {
    #[serde(default)]
    pub success: bool,
    pub message: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BudgetResponse {
    pub success: bool,
    pub message: String,
    pub budget: Budget,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BudgetListResponse {
    pub success: bool,
    pub message: String,
    pub budgets: Vec<Budget>,
    pub month: i32,
    pub year: i32,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeletedBudgetResponse {
    pub success: bool,
    pub message: String,
    pub deleted_budget: Budget,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComparisonResponse {
    pub success: bool,
    pub message: String,
    pub data: BudgetComparison,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExpenseResponse {
    pub success: bool,
    pub message: String,
    pub expense: Expense,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExpenseListResponse {
    pub success: bool,
    pub message: String,
    pub expenses: Vec<Expense>,
    pub pagination: Pagination,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeletedExpenseResponse {
    pub success: bool,
    pub message: String,
    pub deleted_expense: Expense,
}

/// Optional month/year selector sent as query parameters.
#[derive(Debug, Clone, Copy, Default, Serialize)]
pub struct PeriodParams {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub month: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub year: Option<i32>,
}

/// Query parameters of the expense listing.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExpenseListParams {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    /// `YYYY-MM-DD` or RFC 3339.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<i64>,
}
