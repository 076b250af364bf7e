//! API client paired with a [`ClientCache`], with optimistic writes.
//!
//! Each write remembers the entry it replaces, applies the change locally,
//! then sends the request. On failure only that entry is put back, so a
//! concurrent write that succeeded keeps its place in the cache. Comparisons
//! dropped by a failed write stay dropped until they are loaded again.

use chrono::Utc;
use log::warn;
use std::sync::{Mutex, MutexGuard, PoisonError};
use uuid::Uuid;

use budgetwise_core::budgets::{Budget, NewBudget};
use budgetwise_core::comparison::BudgetComparison;
use budgetwise_core::expenses::{Expense, ExpensePage, ExpenseUpdate, NewExpense};
use budgetwise_core::utils::Period;

use crate::cache::{ClientCache, ExpenseView};
use crate::client::BudgetwiseClient;
use crate::error::Result;
use crate::types::{ExpenseListParams, PeriodParams};

/// Prefix of the ids locally created records carry until the server answers.
pub const PROVISIONAL_PREFIX: &str = "provisional-";

fn provisional_id() -> String {
    format!("{PROVISIONAL_PREFIX}{}", Uuid::new_v4())
}

pub struct BudgetStore {
    client: BudgetwiseClient,
    cache: Mutex<ClientCache>,
}

fn period_params(period: Period) -> PeriodParams {
    PeriodParams {
        month: Some(period.month()),
        year: Some(period.year()),
    }
}

impl BudgetStore {
    pub fn new(client: BudgetwiseClient) -> Self {
        Self {
            client,
            cache: Mutex::new(ClientCache::new()),
        }
    }

    pub fn client(&self) -> &BudgetwiseClient {
        &self.client
    }

    fn cache(&self) -> MutexGuard<'_, ClientCache> {
        self.cache.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Runs a read against the cache.
    pub fn read<R>(&self, f: impl FnOnce(&ClientCache) -> R) -> R {
        f(&self.cache())
    }

    /// Runs a mutation against the cache.
    pub fn update<R>(&self, f: impl FnOnce(&mut ClientCache) -> R) -> R {
        f(&mut self.cache())
    }

    /// Forgets all cached data, e.g. on logout.
    pub fn clear(&self) {
        self.cache().clear();
    }

    // Loads

    pub async fn load_budgets(&self, period: Period) -> Result<Vec<Budget>> {
        let response = self.client.get_budgets(period_params(period)).await?;
        self.cache().store_budgets(period, response.budgets.clone());
        Ok(response.budgets)
    }

    pub async fn load_comparison(&self, period: Period) -> Result<BudgetComparison> {
        let comparison = self.client.get_comparison(period_params(period)).await?;
        self.cache().store_comparison(comparison.clone());
        Ok(comparison)
    }

    pub async fn load_expenses(&self, params: &ExpenseListParams) -> Result<ExpensePage> {
        let view = ExpenseView::from_params(params)?;
        let page = self.client.get_expenses(params).await?;
        self.cache().store_expense_page(page.clone(), view);
        Ok(page)
    }

    // Optimistic writes

    pub async fn set_budget(&self, new_budget: NewBudget) -> Result<Budget> {
        let upsert = new_budget.clone().into_upsert("")?;
        let period = upsert.period;

        let (written, previous) = {
            let mut cache = self.cache();
            let now = Utc::now().naive_utc();
            let previous = cache
                .budgets(period)
                .and_then(|list| list.iter().find(|b| b.category == upsert.category))
                .cloned();
            let written = match previous.clone() {
                Some(existing) => Budget {
                    amount: upsert.amount,
                    updated_at: now,
                    ..existing
                },
                None => Budget {
                    id: provisional_id(),
                    user_id: String::new(),
                    category: upsert.category,
                    amount: upsert.amount,
                    month: period.month(),
                    year: period.year(),
                    created_at: now,
                    updated_at: now,
                },
            };
            cache.budget_saved(written.clone());
            (written, previous)
        };

        match self.client.set_budget(&new_budget).await {
            Ok(budget) => {
                self.cache().budget_saved(budget.clone());
                Ok(budget)
            }
            Err(e) => {
                warn!("set_budget failed, undoing local change: {e}");
                self.cache().budget_reverted(&written, previous);
                Err(e)
            }
        }
    }

    pub async fn delete_budget(&self, budget_id: &str) -> Result<Budget> {
        let removed = {
            let mut cache = self.cache();
            let removed = cache.find_budget_period(budget_id).and_then(|period| {
                cache
                    .budgets(period)
                    .and_then(|list| list.iter().find(|b| b.id == budget_id))
                    .cloned()
            });
            cache.budget_removed(budget_id);
            removed
        };

        match self.client.delete_budget(budget_id).await {
            Ok(budget) => Ok(budget),
            Err(e) => {
                warn!("delete_budget failed, undoing local change: {e}");
                if let Some(removed) = removed {
                    self.cache().budget_restored(removed);
                }
                Err(e)
            }
        }
    }

    pub async fn add_expense(&self, new_expense: NewExpense) -> Result<Expense> {
        let now = Utc::now().naive_utc();
        let insert = new_expense.clone().into_insert("", now)?;
        let provisional = Expense {
            id: provisional_id(),
            user_id: String::new(),
            category: insert.category,
            amount: insert.amount,
            description: insert.description,
            date: insert.date,
            created_at: now,
            updated_at: now,
        };
        self.cache().expense_added(provisional.clone());

        match self.client.add_expense(&new_expense).await {
            Ok(expense) => {
                self.cache().expense_replaced(&provisional.id, expense.clone());
                Ok(expense)
            }
            Err(e) => {
                warn!("add_expense failed, undoing local change: {e}");
                self.cache().expense_add_reverted(&provisional);
                Err(e)
            }
        }
    }

    pub async fn update_expense(&self, expense_id: &str, update: ExpenseUpdate) -> Result<Expense> {
        let changes = update.clone().validate()?;

        let local = {
            let mut cache = self.cache();
            let local = cache.cached_expense(expense_id).cloned().map(|previous| {
                let mut written = previous.clone();
                if let Some(amount) = changes.amount {
                    written.amount = amount;
                }
                if let Some(category) = changes.category {
                    written.category = category;
                }
                if let Some(description) = changes.description {
                    written.description = Some(description);
                }
                written.updated_at = Utc::now().naive_utc();
                (written, previous)
            });
            if let Some((written, _)) = &local {
                cache.expense_saved(written.clone());
            }
            local
        };

        match self.client.update_expense(expense_id, &update).await {
            Ok(expense) => {
                self.cache().expense_saved(expense.clone());
                Ok(expense)
            }
            Err(e) => {
                warn!("update_expense failed, undoing local change: {e}");
                if let Some((written, previous)) = local {
                    self.cache().expense_reverted(Some(&written), previous);
                }
                Err(e)
            }
        }
    }

    pub async fn delete_expense(&self, expense_id: &str) -> Result<Expense> {
        let removed = {
            let mut cache = self.cache();
            let removed = cache.cached_expense(expense_id).cloned();
            cache.expense_removed(expense_id);
            removed
        };

        match self.client.delete_expense(expense_id).await {
            Ok(expense) => Ok(expense),
            Err(e) => {
                warn!("delete_expense failed, undoing local change: {e}");
                if let Some(removed) = removed {
                    self.cache().expense_reverted(None, removed);
                }
                Err(e)
            }
        }
    }
}
