use async_trait::async_trait;
use log::debug;
use std::sync::Arc;

use super::budgets_model::{Budget, NewBudget};
use super::budgets_traits::{BudgetRepositoryTrait, BudgetServiceTrait};
use crate::categories::Category;
use crate::errors::{Error, Result};
use crate::utils::Period;

const BUDGET_NOT_FOUND: &str = "Budget not found or you don't have permission to access it";
const CATEGORY_BUDGET_NOT_FOUND: &str = "Budget not found for this category";

/// Service for managing budgets
pub struct BudgetService {
    repository: Arc<dyn BudgetRepositoryTrait>,
}

impl BudgetService {
    pub fn new(repository: Arc<dyn BudgetRepositoryTrait>) -> Self {
        BudgetService { repository }
    }
}

#[async_trait]
impl BudgetServiceTrait for BudgetService {
    async fn set_budget(&self, user_id: &str, new_budget: NewBudget) -> Result<Budget> {
        let upsert = new_budget.into_upsert(user_id)?;
        debug!(
            "Setting {} budget for {}-{:02} to {}",
            upsert.category,
            upsert.period.year(),
            upsert.period.month(),
            upsert.amount
        );
        self.repository.upsert(upsert).await
    }

    fn get_budgets(&self, user_id: &str, period: Period) -> Result<Vec<Budget>> {
        self.repository.list_for_period(user_id, period)
    }

    fn get_budget(&self, user_id: &str, budget_id: &str) -> Result<Budget> {
        self.repository
            .get_by_id(user_id, budget_id)?
            .ok_or_else(|| Error::not_found(BUDGET_NOT_FOUND))
    }

    fn get_budget_by_category(
        &self,
        user_id: &str,
        category: &str,
        month: Option<i32>,
        year: Option<i32>,
    ) -> Result<Budget> {
        let category = Category::parse(category)?;
        let period = Period::resolve(month, year)?;
        self.repository
            .get_by_category(user_id, category, period)?
            .ok_or_else(|| Error::not_found(CATEGORY_BUDGET_NOT_FOUND))
    }

    async fn delete_budget(&self, user_id: &str, budget_id: &str) -> Result<Budget> {
        self.repository
            .delete(user_id, budget_id)
            .await?
            .ok_or_else(|| Error::not_found(BUDGET_NOT_FOUND))
    }
}
