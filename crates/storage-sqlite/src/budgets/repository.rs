use async_trait::async_trait;
use chrono::Utc;
use diesel::prelude::*;
use diesel::r2d2::{self, Pool};
use diesel::SqliteConnection;
use std::sync::Arc;
use uuid::Uuid;

use budgetwise_core::budgets::{Budget, BudgetRepositoryTrait, BudgetUpsert};
use budgetwise_core::categories::Category;
use budgetwise_core::utils::Period;
use budgetwise_core::Result;

use super::model::{BudgetDB, NewBudgetDB};
use crate::db::{get_connection, WriteHandle};
use crate::errors::StorageError;
use crate::schema::budgets;

pub struct BudgetRepository {
    pool: Arc<Pool<r2d2::ConnectionManager<SqliteConnection>>>,
    writer: WriteHandle,
}

impl BudgetRepository {
    pub fn new(
        pool: Arc<Pool<r2d2::ConnectionManager<SqliteConnection>>>,
        writer: WriteHandle,
    ) -> Self {
        BudgetRepository { pool, writer }
    }

    fn find_by_key(
        conn: &mut SqliteConnection,
        user_id: &str,
        category: Category,
        period: Period,
    ) -> std::result::Result<Option<BudgetDB>, StorageError> {
        Ok(budgets::table
            .filter(budgets::user_id.eq(user_id))
            .filter(budgets::category.eq(category.as_str()))
            .filter(budgets::month.eq(period.month()))
            .filter(budgets::year.eq(period.year()))
            .select(BudgetDB::as_select())
            .first::<BudgetDB>(conn)
            .optional()?)
    }

    fn find_owned(
        conn: &mut SqliteConnection,
        user_id: &str,
        budget_id: &str,
    ) -> std::result::Result<Option<BudgetDB>, StorageError> {
        Ok(budgets::table
            .filter(budgets::id.eq(budget_id))
            .filter(budgets::user_id.eq(user_id))
            .select(BudgetDB::as_select())
            .first::<BudgetDB>(conn)
            .optional()?)
    }
}

#[async_trait]
impl BudgetRepositoryTrait for BudgetRepository {
    async fn upsert(&self, upsert: BudgetUpsert) -> Result<Budget> {
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<Budget> {
                let now = Utc::now().naive_utc();
                let existing =
                    Self::find_by_key(conn, &upsert.user_id, upsert.category, upsert.period)?;

                let saved = match existing {
                    Some(existing) => diesel::update(budgets::table.find(existing.id))
                        .set((
                            budgets::amount.eq(upsert.amount.to_string()),
                            budgets::updated_at.eq(now),
                        ))
                        .returning(BudgetDB::as_returning())
                        .get_result(conn)
                        .map_err(StorageError::from)?,
                    None => {
                        let new_budget =
                            NewBudgetDB::from_upsert(Uuid::new_v4().to_string(), &upsert, now);
                        diesel::insert_into(budgets::table)
                            .values(&new_budget)
                            .returning(BudgetDB::as_returning())
                            .get_result(conn)
                            .map_err(StorageError::from)?
                    }
                };
                Ok(Budget::try_from(saved)?)
            })
            .await
    }

    fn list_for_period(&self, user_id: &str, period: Period) -> Result<Vec<Budget>> {
        let mut conn = get_connection(&self.pool)?;
        let budgets_db = budgets::table
            .filter(budgets::user_id.eq(user_id))
            .filter(budgets::month.eq(period.month()))
            .filter(budgets::year.eq(period.year()))
            .order(budgets::category.asc())
            .select(BudgetDB::as_select())
            .load::<BudgetDB>(&mut conn)
            .map_err(StorageError::from)?;

        Ok(budgets_db
            .into_iter()
            .map(Budget::try_from)
            .collect::<std::result::Result<Vec<_>, StorageError>>()?)
    }

    fn get_by_id(&self, user_id: &str, budget_id: &str) -> Result<Option<Budget>> {
        let mut conn = get_connection(&self.pool)?;
        Ok(Self::find_owned(&mut conn, user_id, budget_id)?
            .map(Budget::try_from)
            .transpose()?)
    }

    fn get_by_category(
        &self,
        user_id: &str,
        category: Category,
        period: Period,
    ) -> Result<Option<Budget>> {
        let mut conn = get_connection(&self.pool)?;
        Ok(Self::find_by_key(&mut conn, user_id, category, period)?
            .map(Budget::try_from)
            .transpose()?)
    }

    async fn delete(&self, user_id: &str, budget_id: &str) -> Result<Option<Budget>> {
        let user_id = user_id.to_string();
        let budget_id = budget_id.to_string();
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<Option<Budget>> {
                let Some(existing) = Self::find_owned(conn, &user_id, &budget_id)? else {
                    return Ok(None);
                };
                diesel::delete(budgets::table.find(&existing.id))
                    .execute(conn)
                    .map_err(StorageError::from)?;
                Ok(Some(Budget::try_from(existing)?))
            })
            .await
    }
}
