//! Request and response bodies of the REST surface.
//!
//! Request fields arrive loosely typed: numbers may be JSON numbers or numeric
//! strings, and every field is optional so a missing one produces our own
//! message instead of a deserializer error.

use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use budgetwise_core::budgets::{Budget, NewBudget};
use budgetwise_core::comparison::BudgetComparison;
use budgetwise_core::errors::{Error as CoreError, ValidationError};
use budgetwise_core::expenses::{
    Expense, ExpenseFilters, ExpensePage, ExpenseUpdate, NewExpense, Pagination,
};
use budgetwise_core::utils::parse_timestamp;

type CoreResult<T> = std::result::Result<T, CoreError>;

/// A JSON number or a string holding one.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum NumericInput {
    Number(serde_json::Number),
    Text(String),
}

impl NumericInput {
    fn raw(&self) -> String {
        match self {
            NumericInput::Number(n) => n.to_string(),
            NumericInput::Text(s) => s.trim().to_string(),
        }
    }

    fn is_blank(&self) -> bool {
        matches!(self, NumericInput::Text(s) if s.trim().is_empty())
    }

    pub fn to_decimal(&self) -> CoreResult<Decimal> {
        let raw = self.raw();
        Decimal::from_str(&raw)
            .or_else(|_| Decimal::from_scientific(&raw))
            .map_err(|_| CoreError::Validation(ValidationError::NonPositiveAmount))
    }

    pub fn to_i32(&self, message: &str) -> CoreResult<i32> {
        self.raw()
            .parse::<i32>()
            .map_err(|_| CoreError::invalid_input(message))
    }
}

fn present(value: Option<NumericInput>) -> Option<NumericInput> {
    value.filter(|v| !v.is_blank())
}

fn present_text(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

const MONTH_MESSAGE: &str = "Month must be in between 1 and 12";
const YEAR_MESSAGE: &str = "Year must be in between 1 and 9999";

/// Parses an optional integer query parameter; blank means absent.
pub fn parse_int_param(value: Option<&str>, message: &str) -> CoreResult<Option<i64>> {
    match value.map(str::trim).filter(|v| !v.is_empty()) {
        None => Ok(None),
        Some(v) => v
            .parse::<i64>()
            .map(Some)
            .map_err(|_| CoreError::invalid_input(message)),
    }
}

/// Parses the optional month and year query parameters. Range checks are
/// left to [`budgetwise_core::Period`].
pub fn parse_period_params(
    month: Option<&str>,
    year: Option<&str>,
) -> CoreResult<(Option<i32>, Option<i32>)> {
    let month = parse_int_param(month, MONTH_MESSAGE)?
        .map(|m| i32::try_from(m).map_err(|_| CoreError::invalid_input(MONTH_MESSAGE)))
        .transpose()?;
    let year = parse_int_param(year, YEAR_MESSAGE)?
        .map(|y| i32::try_from(y).map_err(|_| CoreError::invalid_input(YEAR_MESSAGE)))
        .transpose()?;
    Ok((month, year))
}

// ---------------------------------------------------------------------------
// Requests
// ---------------------------------------------------------------------------

#[derive(Debug, Default, Deserialize)]
pub struct SetBudgetRequest {
    pub category: Option<String>,
    pub amount: Option<NumericInput>,
    pub month: Option<NumericInput>,
    pub year: Option<NumericInput>,
}

impl SetBudgetRequest {
    pub fn into_new_budget(self) -> CoreResult<NewBudget> {
        let (Some(category), Some(amount), Some(month), Some(year)) = (
            present_text(self.category),
            present(self.amount),
            present(self.month),
            present(self.year),
        ) else {
            return Err(CoreError::Validation(ValidationError::MissingField(
                "Category, amount, month, and year are required".to_string(),
            )));
        };
        Ok(NewBudget {
            category,
            amount: amount.to_decimal()?,
            month: month.to_i32(MONTH_MESSAGE)?,
            year: year.to_i32(YEAR_MESSAGE)?,
        })
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct AddExpenseRequest {
    pub amount: Option<NumericInput>,
    pub category: Option<String>,
    pub description: Option<String>,
    pub date: Option<String>,
}

impl AddExpenseRequest {
    pub fn into_new_expense(self) -> CoreResult<NewExpense> {
        let (Some(amount), Some(category)) = (present(self.amount), present_text(self.category))
        else {
            return Err(CoreError::Validation(ValidationError::MissingField(
                "Amount and category are required".to_string(),
            )));
        };
        let date = present_text(self.date)
            .map(|d| parse_timestamp(&d))
            .transpose()?;
        Ok(NewExpense {
            amount: amount.to_decimal()?,
            category,
            description: self.description,
            date,
        })
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct UpdateExpenseRequest {
    pub amount: Option<NumericInput>,
    pub description: Option<String>,
    pub category: Option<String>,
}

impl UpdateExpenseRequest {
    pub fn into_update(self) -> CoreResult<ExpenseUpdate> {
        Ok(ExpenseUpdate {
            amount: present(self.amount)
                .map(|a| a.to_decimal())
                .transpose()?,
            description: self.description,
            category: present_text(self.category),
        })
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct PeriodQuery {
    pub month: Option<String>,
    pub year: Option<String>,
}

impl PeriodQuery {
    pub fn resolve(&self) -> CoreResult<(Option<i32>, Option<i32>)> {
        parse_period_params(self.month.as_deref(), self.year.as_deref())
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExpenseListQuery {
    pub category: Option<String>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub page: Option<String>,
    pub limit: Option<String>,
}

impl ExpenseListQuery {
    /// Filters plus the raw page and page size.
    pub fn into_parts(self) -> CoreResult<(ExpenseFilters, Option<i64>, Option<i64>)> {
        let filters = ExpenseFilters {
            category: present_text(self.category),
            start_date: present_text(self.start_date)
                .map(|d| parse_timestamp(&d))
                .transpose()?,
            end_date: present_text(self.end_date)
                .map(|d| parse_timestamp(&d))
                .transpose()?,
        };
        let page = parse_int_param(self.page.as_deref(), "Page must be a positive integer")?;
        let limit =
            parse_int_param(self.limit.as_deref(), "Limit must be in between 1 and 100")?;
        Ok((filters, page, limit))
    }
}

// ---------------------------------------------------------------------------
// Responses
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BudgetResponse {
    pub success: bool,
    pub message: &'static str,
    pub budget: Budget,
}

impl BudgetResponse {
    pub fn new(message: &'static str, budget: Budget) -> Self {
        Self {
            success: true,
            message,
            budget,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BudgetListResponse {
    pub success: bool,
    pub message: &'static str,
    pub budgets: Vec<Budget>,
    pub month: i32,
    pub year: i32,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeletedBudgetResponse {
    pub success: bool,
    pub message: &'static str,
    pub deleted_budget: Budget,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ComparisonResponse {
    pub success: bool,
    pub message: &'static str,
    pub data: BudgetComparison,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExpenseResponse {
    pub success: bool,
    pub message: &'static str,
    pub expense: Expense,
}

impl ExpenseResponse {
    pub fn new(message: &'static str, expense: Expense) -> Self {
        Self {
            success: true,
            message,
            expense,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExpenseListResponse {
    pub success: bool,
    pub message: &'static str,
    pub expenses: Vec<Expense>,
    pub pagination: Pagination,
}

impl From<ExpensePage> for ExpenseListResponse {
    fn from(page: ExpensePage) -> Self {
        let message = if page.pagination.total_expenses == 0 {
            "No expenses found"
        } else {
            "Expenses fetched successfully"
        };
        Self {
            success: true,
            message,
            expenses: page.expenses,
            pagination: page.pagination,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeletedExpenseResponse {
    pub success: bool,
    pub message: &'static str,
    pub deleted_expense: Expense,
}
