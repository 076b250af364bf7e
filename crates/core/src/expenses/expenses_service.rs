use async_trait::async_trait;
use chrono::{NaiveDateTime, Utc};
use log::debug;
use std::sync::Arc;

use super::expenses_model::{
    Expense, ExpenseFilters, ExpensePage, ExpenseUpdate, NewExpense, PageRequest, Pagination,
};
use super::expenses_traits::{ExpenseRepositoryTrait, ExpenseServiceTrait};
use crate::errors::{Error, Result};

const EXPENSE_NOT_FOUND: &str = "Expense not found or you don't have permission to access it";

/// Service for recording and querying expenses
pub struct ExpenseService {
    repository: Arc<dyn ExpenseRepositoryTrait>,
}

impl ExpenseService {
    pub fn new(repository: Arc<dyn ExpenseRepositoryTrait>) -> Self {
        ExpenseService { repository }
    }
}

#[async_trait]
impl ExpenseServiceTrait for ExpenseService {
    async fn add_expense(&self, user_id: &str, new_expense: NewExpense) -> Result<Expense> {
        let insert = new_expense.into_insert(user_id, Utc::now().naive_utc())?;
        debug!("Adding {} expense of {}", insert.category, insert.amount);
        self.repository.insert(insert).await
    }

    fn get_expenses(
        &self,
        user_id: &str,
        filters: ExpenseFilters,
        page: Option<i64>,
        page_size: Option<i64>,
    ) -> Result<ExpensePage> {
        let request = PageRequest::new(page, page_size)?;
        let query = filters.validate()?;

        if query.is_empty_range() {
            return Ok(ExpensePage {
                expenses: Vec::new(),
                pagination: Pagination::new(request, 0),
            });
        }

        let (expenses, total) = self.repository.search(user_id, &query, request)?;
        Ok(ExpensePage {
            expenses,
            pagination: Pagination::new(request, total),
        })
    }

    fn get_expenses_in_range(
        &self,
        user_id: &str,
        start: NaiveDateTime,
        end: NaiveDateTime,
    ) -> Result<Vec<Expense>> {
        self.repository.list_in_range(user_id, start, end)
    }

    fn get_expense(&self, user_id: &str, expense_id: &str) -> Result<Expense> {
        self.repository
            .get_by_id(user_id, expense_id)?
            .ok_or_else(|| Error::not_found(EXPENSE_NOT_FOUND))
    }

    async fn update_expense(
        &self,
        user_id: &str,
        expense_id: &str,
        update: ExpenseUpdate,
    ) -> Result<Expense> {
        let changes = update.validate()?;
        debug!("Updating expense {}", expense_id);
        self.repository
            .update(user_id, expense_id, changes)
            .await?
            .ok_or_else(|| Error::not_found(EXPENSE_NOT_FOUND))
    }

    async fn delete_expense(&self, user_id: &str, expense_id: &str) -> Result<Expense> {
        self.repository
            .delete(user_id, expense_id)
            .await?
            .ok_or_else(|| Error::not_found(EXPENSE_NOT_FOUND))
    }
}
