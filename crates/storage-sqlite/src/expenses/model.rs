//! Database models for expenses.

use chrono::NaiveDateTime;
use diesel::prelude::*;

use budgetwise_core::expenses::{Expense, ExpenseChanges, ExpenseInsert};

use crate::errors::StorageError;
use crate::utils::{parse_stored_category, parse_stored_decimal};

/// Database model for expenses
#[derive(Queryable, Identifiable, Selectable, PartialEq, Debug, Clone)]
#[diesel(table_name = crate::schema::expenses)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct ExpenseDB {
    pub id: String,
    pub user_id: String,
    pub category: String,
    pub amount: String,
    pub description: Option<String>,
    pub date: NaiveDateTime,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

/// Database model for creating a new expense
#[derive(Insertable, Debug, Clone)]
#[diesel(table_name = crate::schema::expenses)]
pub struct NewExpenseDB {
    pub id: String,
    pub user_id: String,
    pub category: String,
    pub amount: String,
    pub description: Option<String>,
    pub date: NaiveDateTime,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl NewExpenseDB {
    pub fn from_insert(id: String, insert: ExpenseInsert, now: NaiveDateTime) -> Self {
        NewExpenseDB {
            id,
            user_id: insert.user_id,
            category: insert.category.as_str().to_string(),
            amount: insert.amount.to_string(),
            description: insert.description,
            date: insert.date,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Changeset for partial updates; `None` columns are left untouched.
#[derive(AsChangeset, Debug, Clone)]
#[diesel(table_name = crate::schema::expenses)]
pub struct ExpenseChangesDB {
    pub category: Option<String>,
    pub amount: Option<String>,
    pub description: Option<String>,
    pub updated_at: NaiveDateTime,
}

impl ExpenseChangesDB {
    pub fn from_changes(changes: ExpenseChanges, now: NaiveDateTime) -> Self {
        ExpenseChangesDB {
            category: changes.category.map(|c| c.as_str().to_string()),
            amount: changes.amount.map(|a| a.to_string()),
            description: changes.description,
            updated_at: now,
        }
    }
}

impl TryFrom<ExpenseDB> for Expense {
    type Error = StorageError;

    fn try_from(db: ExpenseDB) -> Result<Self, Self::Error> {
        Ok(Expense {
            category: parse_stored_category(&db.category)?,
            amount: parse_stored_decimal(&db.amount, "amount")?,
            id: db.id,
            user_id: db.user_id,
            description: db.description,
            date: db.date,
            created_at: db.created_at,
            updated_at: db.updated_at,
        })
    }
}
