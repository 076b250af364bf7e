//! Expense repository and service traits.

use async_trait::async_trait;
use chrono::NaiveDateTime;

use super::expenses_model::{
    Expense, ExpenseChanges, ExpenseFilters, ExpenseInsert, ExpenseQuery, ExpensePage,
    ExpenseUpdate, NewExpense, PageRequest,
};
use crate::errors::Result;

/// Trait defining the contract for Expense repository operations.
///
/// Lookups are scoped to the owning user.
#[async_trait]
pub trait ExpenseRepositoryTrait: Send + Sync {
    async fn insert(&self, new_expense: ExpenseInsert) -> Result<Expense>;

    /// One page of matching expenses, newest first (ties by creation time,
    /// newest first), together with the total match count before paging.
    fn search(
        &self,
        user_id: &str,
        query: &ExpenseQuery,
        page: PageRequest,
    ) -> Result<(Vec<Expense>, i64)>;

    /// Every expense of the user with `start <= date <= end`.
    fn list_in_range(
        &self,
        user_id: &str,
        start: NaiveDateTime,
        end: NaiveDateTime,
    ) -> Result<Vec<Expense>>;

    fn get_by_id(&self, user_id: &str, expense_id: &str) -> Result<Option<Expense>>;

    /// Applies the changes and returns the updated record, or `None` when
    /// nothing matched.
    async fn update(
        &self,
        user_id: &str,
        expense_id: &str,
        changes: ExpenseChanges,
    ) -> Result<Option<Expense>>;

    async fn delete(&self, user_id: &str, expense_id: &str) -> Result<Option<Expense>>;
}

/// Trait defining the contract for Expense service operations.
#[async_trait]
pub trait ExpenseServiceTrait: Send + Sync {
    async fn add_expense(&self, user_id: &str, new_expense: NewExpense) -> Result<Expense>;

    fn get_expenses(
        &self,
        user_id: &str,
        filters: ExpenseFilters,
        page: Option<i64>,
        page_size: Option<i64>,
    ) -> Result<ExpensePage>;

    fn get_expenses_in_range(
        &self,
        user_id: &str,
        start: NaiveDateTime,
        end: NaiveDateTime,
    ) -> Result<Vec<Expense>>;

    fn get_expense(&self, user_id: &str, expense_id: &str) -> Result<Expense>;

    async fn update_expense(
        &self,
        user_id: &str,
        expense_id: &str,
        update: ExpenseUpdate,
    ) -> Result<Expense>;

    async fn delete_expense(&self, user_id: &str, expense_id: &str) -> Result<Expense>;
}
