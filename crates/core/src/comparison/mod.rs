//! Budget vs. actual comparison.

mod comparison_calculator;
mod comparison_model;
mod comparison_service;


pub use comparison_calculator::{build_comparison, spend_by_category};
pub use comparison_model::{BudgetComparison, CategoryComparison, ComparisonSummary};
pub use comparison_service::{ComparisonService, ComparisonServiceTrait};
