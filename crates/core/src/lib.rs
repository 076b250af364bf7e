//! Budgetwise Core - Domain entities, services, and traits.
//!
//! This crate contains the budgeting and expense tracking logic.
//! It is database-agnostic and defines traits that are implemented
//! by the `storage-sqlite` crate.

pub mod budgets;
pub mod categories;
pub mod comparison;
pub mod constants;
pub mod errors;
pub mod expenses;
pub mod utils;

pub use categories::Category;
pub use utils::Period;

// Re-export error types
pub use errors::Error;
pub use errors::Result;
