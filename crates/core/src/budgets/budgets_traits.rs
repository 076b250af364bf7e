//! Budget repository and service traits.
//!
//! These traits define the contract for budget operations without any
//! database-specific types, allowing for different storage implementations.

use async_trait::async_trait;

use super::budgets_model::{Budget, BudgetUpsert, NewBudget};
use crate::categories::Category;
use crate::errors::Result;
use crate::utils::Period;

/// Trait defining the contract for Budget repository operations.
///
/// Every lookup is scoped to the owning user; a record owned by someone else
/// is reported exactly like a missing one.
#[async_trait]
pub trait BudgetRepositoryTrait: Send + Sync {
    /// Creates the budget for the upsert's key, or replaces the amount of the
    /// existing one. The read and the write happen in one transaction.
    async fn upsert(&self, upsert: BudgetUpsert) -> Result<Budget>;

    /// All budgets of a user for a period, ordered by category name ascending.
    fn list_for_period(&self, user_id: &str, period: Period) -> Result<Vec<Budget>>;

    fn get_by_id(&self, user_id: &str, budget_id: &str) -> Result<Option<Budget>>;

    fn get_by_category(
        &self,
        user_id: &str,
        category: Category,
        period: Period,
    ) -> Result<Option<Budget>>;

    /// Deletes the budget and returns it, or `None` when nothing matched.
    async fn delete(&self, user_id: &str, budget_id: &str) -> Result<Option<Budget>>;
}

/// Trait defining the contract for Budget service operations.
#[async_trait]
pub trait BudgetServiceTrait: Send + Sync {
    /// Validates and upserts a budget.
    async fn set_budget(&self, user_id: &str, new_budget: NewBudget) -> Result<Budget>;

    fn get_budgets(&self, user_id: &str, period: Period) -> Result<Vec<Budget>>;

    fn get_budget(&self, user_id: &str, budget_id: &str) -> Result<Budget>;

    /// Exact-key lookup; month and year default to the current period.
    fn get_budget_by_category(
        &self,
        user_id: &str,
        category: &str,
        month: Option<i32>,
        year: Option<i32>,
    ) -> Result<Budget>;

    async fn delete_budget(&self, user_id: &str, budget_id: &str) -> Result<Budget>;
}
