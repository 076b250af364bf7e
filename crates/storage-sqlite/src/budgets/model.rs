//! Database models for budgets.

use chrono::NaiveDateTime;
use diesel::prelude::*;

use budgetwise_core::budgets::{Budget, BudgetUpsert};

use crate::errors::StorageError;
use crate::utils::{parse_stored_category, parse_stored_decimal};

/// Database model for budgets
#[derive(Queryable, Identifiable, Selectable, PartialEq, Debug, Clone)]
#[diesel(table_name = crate::schema::budgets)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct BudgetDB {
    pub id: String,
    pub user_id: String,
    pub category: String,
    pub amount: String,
    pub month: i32,
    pub year: i32,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

/// Database model for creating a new budget
#[derive(Insertable, Debug, Clone)]
#[diesel(table_name = crate::schema::budgets)]
pub struct NewBudgetDB {
    pub id: String,
    pub user_id: String,
    pub category: String,
    pub amount: String,
    pub month: i32,
    pub year: i32,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl NewBudgetDB {
    pub fn from_upsert(id: String, upsert: &BudgetUpsert, now: NaiveDateTime) -> Self {
        NewBudgetDB {
            id,
            user_id: upsert.user_id.clone(),
            category: upsert.category.as_str().to_string(),
            amount: upsert.amount.to_string(),
            month: upsert.period.month(),
            year: upsert.period.year(),
            created_at: now,
            updated_at: now,
        }
    }
}

impl TryFrom<BudgetDB> for Budget {
    type Error = StorageError;

    fn try_from(db: BudgetDB) -> Result<Self, Self::Error> {
        Ok(Budget {
            category: parse_stored_category(&db.category)?,
            amount: parse_stored_decimal(&db.amount, "amount")?,
            id: db.id,
            user_id: db.user_id,
            month: db.month,
            year: db.year,
            created_at: db.created_at,
            updated_at: db.updated_at,
        })
    }
}
