use log::debug;
use std::sync::Arc;

use super::comparison_calculator::build_comparison;
use super::comparison_model::BudgetComparison;
use crate::budgets::BudgetServiceTrait;
use crate::errors::Result;
use crate::expenses::ExpenseServiceTrait;
use crate::utils::Period;

pub trait ComparisonServiceTrait: Send + Sync {
    /// Budget-vs-actual for an explicit period.
    fn compare_budget_to_actual(&self, user_id: &str, period: Period) -> Result<BudgetComparison>;

    /// Same as `compare_budget_to_actual`, with missing month or year taken
    /// from the current period.
    fn get_comparison(
        &self,
        user_id: &str,
        month: Option<i32>,
        year: Option<i32>,
    ) -> Result<BudgetComparison>;
}

/// Stateless engine reading from the budget and expense services.
pub struct ComparisonService {
    budget_service: Arc<dyn BudgetServiceTrait>,
    expense_service: Arc<dyn ExpenseServiceTrait>,
}

impl ComparisonService {
    pub fn new(
        budget_service: Arc<dyn BudgetServiceTrait>,
        expense_service: Arc<dyn ExpenseServiceTrait>,
    ) -> Self {
        ComparisonService {
            budget_service,
            expense_service,
        }
    }
}

impl ComparisonServiceTrait for ComparisonService {
    fn compare_budget_to_actual(&self, user_id: &str, period: Period) -> Result<BudgetComparison> {
        debug!(
            "Comparing budgets to actual spend for {}-{:02}",
            period.year(),
            period.month()
        );
        let budgets = self.budget_service.get_budgets(user_id, period)?;
        let expenses =
            self.expense_service
                .get_expenses_in_range(user_id, period.start(), period.end())?;
        Ok(build_comparison(period, &budgets, &expenses))
    }

    fn get_comparison(
        &self,
        user_id: &str,
        month: Option<i32>,
        year: Option<i32>,
    ) -> Result<BudgetComparison> {
        let period = Period::resolve(month, year)?;
        self.compare_budget_to_actual(user_id, period)
    }
}
