//! Budgetwise Client - REST client and explicit local cache for the Budgetwise API.
//!
//! # Usage
//!
//! ```rust,ignore
//! use budgetwise_client::{BudgetStore, BudgetwiseClient};
//! use budgetwise_core::Period;
//!
//! let client = BudgetwiseClient::new("http://localhost:8080", "access_token")?;
//! let store = BudgetStore::new(client);
//! let march = Period::new(3, 2024)?;
//! store.load_comparison(march).await?;
//! let over = store.read(|cache| cache.over_budget_categories(march).len());
//! ```

mod cache;
mod client;
mod error;
mod store;
mod types;

pub use cache::{ClientCache, ExpenseView};
pub use client::BudgetwiseClient;
pub use error::{ClientError, Result};
pub use store::{BudgetStore, PROVISIONAL_PREFIX};
pub use types::*;
