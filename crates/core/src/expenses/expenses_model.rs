//! Expense domain models.

use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::categories::Category;
use crate::constants::{DEFAULT_PAGE, DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE};
use crate::errors::{Error, Result};
use crate::utils::ensure_positive_amount;

/// A single recorded spending event.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Expense {
    pub id: String,
    pub user_id: String,
    pub category: Category,
    pub amount: Decimal,
    pub description: Option<String>,
    /// When the spending happened (UTC).
    pub date: NaiveDateTime,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

/// Input model for recording an expense.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewExpense {
    pub amount: Decimal,
    pub category: String,
    pub description: Option<String>,
    pub date: Option<NaiveDateTime>,
}

impl NewExpense {
    /// Validates the input; a missing date becomes `now`.
    pub fn into_insert(self, user_id: &str, now: NaiveDateTime) -> Result<ExpenseInsert> {
        let category = Category::parse(&self.category)?;
        let amount = ensure_positive_amount(self.amount)?;
        Ok(ExpenseInsert {
            user_id: user_id.to_string(),
            category,
            amount,
            description: self.description,
            date: self.date.unwrap_or(now),
        })
    }
}

/// A validated expense ready to be stored.
#[derive(Debug, Clone, PartialEq)]
pub struct ExpenseInsert {
    pub user_id: String,
    pub category: Category,
    pub amount: Decimal,
    pub description: Option<String>,
    pub date: NaiveDateTime,
}

/// Partial update of an expense. `None` leaves the field unchanged.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExpenseUpdate {
    pub amount: Option<Decimal>,
    pub description: Option<String>,
    pub category: Option<String>,
}

impl ExpenseUpdate {
    pub fn validate(self) -> Result<ExpenseChanges> {
        let category = self.category.as_deref().map(Category::parse).transpose()?;
        let amount = self.amount.map(ensure_positive_amount).transpose()?;
        Ok(ExpenseChanges {
            amount,
            description: self.description,
            category,
        })
    }
}

/// Validated partial update.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExpenseChanges {
    pub amount: Option<Decimal>,
    pub description: Option<String>,
    pub category: Option<Category>,
}

impl ExpenseChanges {
    pub fn is_empty(&self) -> bool {
        self.amount.is_none() && self.description.is_none() && self.category.is_none()
    }
}

/// Listing filters as received from the boundary.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExpenseFilters {
    pub category: Option<String>,
    pub start_date: Option<NaiveDateTime>,
    pub end_date: Option<NaiveDateTime>,
}

impl ExpenseFilters {
    pub fn validate(self) -> Result<ExpenseQuery> {
        Ok(ExpenseQuery {
            category: self.category.as_deref().map(Category::parse).transpose()?,
            start_date: self.start_date,
            end_date: self.end_date,
        })
    }
}

/// Validated listing filters. Both date bounds are inclusive.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExpenseQuery {
    pub category: Option<Category>,
    pub start_date: Option<NaiveDateTime>,
    pub end_date: Option<NaiveDateTime>,
}

impl ExpenseQuery {
    /// True when the range is inverted and nothing can match.
    pub fn is_empty_range(&self) -> bool {
        matches!((self.start_date, self.end_date), (Some(start), Some(end)) if start > end)
    }

    /// Whether an expense passes every filter.
    pub fn matches(&self, expense: &Expense) -> bool {
        self.category.map_or(true, |category| category == expense.category)
            && self.start_date.map_or(true, |start| expense.date >= start)
            && self.end_date.map_or(true, |end| expense.date <= end)
    }
}

/// A 1-indexed page request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub page: i64,
    pub page_size: i64,
}

impl PageRequest {
    pub fn new(page: Option<i64>, page_size: Option<i64>) -> Result<Self> {
        let page = page.unwrap_or(DEFAULT_PAGE);
        let page_size = page_size.unwrap_or(DEFAULT_PAGE_SIZE);
        if page < 1 {
            return Err(Error::invalid_input("Page must be a positive integer"));
        }
        if !(1..=MAX_PAGE_SIZE).contains(&page_size) {
            return Err(Error::invalid_input(format!(
                "Limit must be in between 1 and {}",
                MAX_PAGE_SIZE
            )));
        }
        Ok(PageRequest { page, page_size })
    }

    pub fn offset(&self) -> i64 {
        (self.page - 1).saturating_mul(self.page_size)
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        PageRequest {
            page: DEFAULT_PAGE,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    pub current_page: i64,
    pub total_pages: i64,
    pub total_expenses: i64,
    pub has_next_page: bool,
    pub has_prev_page: bool,
}

impl Pagination {
    pub fn new(request: PageRequest, total: i64) -> Self {
        let total_pages = if total <= 0 {
            0
        } else {
            (total + request.page_size - 1) / request.page_size
        };
        Pagination {
            current_page: request.page,
            total_pages,
            total_expenses: total.max(0),
            has_next_page: request.page < total_pages,
            has_prev_page: request.page > 1,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ExpensePage {
    pub expenses: Vec<Expense>,
    pub pagination: Pagination,
}
