use async_trait::async_trait;
use chrono::{NaiveDateTime, Utc};
use diesel::prelude::*;
use diesel::r2d2::{self, Pool};
use diesel::sqlite::Sqlite;
use diesel::SqliteConnection;
use std::sync::Arc;
use uuid::Uuid;

use budgetwise_core::expenses::{
    Expense, ExpenseChanges, ExpenseInsert, ExpenseQuery, ExpenseRepositoryTrait, PageRequest,
};
use budgetwise_core::Result;

use super::model::{ExpenseChangesDB, ExpenseDB, NewExpenseDB};
use crate::db::{get_connection, WriteHandle};
use crate::errors::StorageError;
use crate::schema::expenses;

pub struct ExpenseRepository {
    pool: Arc<Pool<r2d2::ConnectionManager<SqliteConnection>>>,
    writer: WriteHandle,
}

fn into_domain(rows: Vec<ExpenseDB>) -> Result<Vec<Expense>> {
    Ok(rows
        .into_iter()
        .map(Expense::try_from)
        .collect::<std::result::Result<Vec<_>, StorageError>>()?)
}

/// Owner and filter predicates shared by the count and the page query.
fn filtered_query<'a>(user_id: &'a str, query: &ExpenseQuery) -> expenses::BoxedQuery<'a, Sqlite> {
    let mut boxed = expenses::table
        .filter(expenses::user_id.eq(user_id))
        .into_boxed();

    if let Some(category) = query.category {
        boxed = boxed.filter(expenses::category.eq(category.as_str()));
    }
    if let Some(start) = query.start_date {
        boxed = boxed.filter(expenses::date.ge(start));
    }
    if let Some(end) = query.end_date {
        boxed = boxed.filter(expenses::date.le(end));
    }
    boxed
}

impl ExpenseRepository {
    pub fn new(
        pool: Arc<Pool<r2d2::ConnectionManager<SqliteConnection>>>,
        writer: WriteHandle,
    ) -> Self {
        ExpenseRepository { pool, writer }
    }

    fn find_owned(
        conn: &mut SqliteConnection,
        user_id: &str,
        expense_id: &str,
    ) -> std::result::Result<Option<ExpenseDB>, StorageError> {
        Ok(expenses::table
            .filter(expenses::id.eq(expense_id))
            .filter(expenses::user_id.eq(user_id))
            .select(ExpenseDB::as_select())
            .first::<ExpenseDB>(conn)
            .optional()?)
    }
}

#[async_trait]
impl ExpenseRepositoryTrait for ExpenseRepository {
    async fn insert(&self, new_expense: ExpenseInsert) -> Result<Expense> {
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<Expense> {
                let row = NewExpenseDB::from_insert(
                    Uuid::new_v4().to_string(),
                    new_expense,
                    Utc::now().naive_utc(),
                );
                let inserted = diesel::insert_into(expenses::table)
                    .values(&row)
                    .returning(ExpenseDB::as_returning())
                    .get_result(conn)
                    .map_err(StorageError::from)?;
                Ok(Expense::try_from(inserted)?)
            })
            .await
    }

    fn search(
        &self,
        user_id: &str,
        query: &ExpenseQuery,
        page: PageRequest,
    ) -> Result<(Vec<Expense>, i64)> {
        let mut conn = get_connection(&self.pool)?;

        let total = filtered_query(user_id, query)
            .count()
            .get_result::<i64>(&mut conn)
            .map_err(StorageError::from)?;

        let rows = filtered_query(user_id, query)
            .order((expenses::date.desc(), expenses::created_at.desc()))
            .limit(page.page_size)
            .offset(page.offset())
            .load::<ExpenseDB>(&mut conn)
            .map_err(StorageError::from)?;

        Ok((into_domain(rows)?, total))
    }

    fn list_in_range(
        &self,
        user_id: &str,
        start: NaiveDateTime,
        end: NaiveDateTime,
    ) -> Result<Vec<Expense>> {
        let mut conn = get_connection(&self.pool)?;
        let rows = expenses::table
            .filter(expenses::user_id.eq(user_id))
            .filter(expenses::date.ge(start))
            .filter(expenses::date.le(end))
            .select(ExpenseDB::as_select())
            .load::<ExpenseDB>(&mut conn)
            .map_err(StorageError::from)?;
        into_domain(rows)
    }

    fn get_by_id(&self, user_id: &str, expense_id: &str) -> Result<Option<Expense>> {
        let mut conn = get_connection(&self.pool)?;
        Ok(Self::find_owned(&mut conn, user_id, expense_id)?
            .map(Expense::try_from)
            .transpose()?)
    }

    async fn update(
        &self,
        user_id: &str,
        expense_id: &str,
        changes: ExpenseChanges,
    ) -> Result<Option<Expense>> {
        let user_id = user_id.to_string();
        let expense_id = expense_id.to_string();
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<Option<Expense>> {
                if Self::find_owned(conn, &user_id, &expense_id)?.is_none() {
                    return Ok(None);
                }
                let changeset = ExpenseChangesDB::from_changes(changes, Utc::now().naive_utc());
                let updated = diesel::update(expenses::table.find(&expense_id))
                    .set(&changeset)
                    .returning(ExpenseDB::as_returning())
                    .get_result(conn)
                    .map_err(StorageError::from)?;
                Ok(Some(Expense::try_from(updated)?))
            })
            .await
    }

    async fn delete(&self, user_id: &str, expense_id: &str) -> Result<Option<Expense>> {
        let user_id = user_id.to_string();
        let expense_id = expense_id.to_string();
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<Option<Expense>> {
                let Some(existing) = Self::find_owned(conn, &user_id, &expense_id)? else {
                    return Ok(None);
                };
                diesel::delete(expenses::table.find(&existing.id))
                    .execute(conn)
                    .map_err(StorageError::from)?;
                Ok(Some(Expense::try_from(existing)?))
            })
            .await
    }
}
