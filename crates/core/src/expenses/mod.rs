//! Expenses module - domain models, services, and traits.

mod expenses_model;
mod expenses_service;
mod expenses_traits;


pub use expenses_model::{
    Expense, ExpenseChanges, ExpenseFilters, ExpenseInsert, ExpensePage, ExpenseQuery,
    ExpenseUpdate, NewExpense, PageRequest, Pagination,
};
pub use expenses_service::ExpenseService;
pub use expenses_traits::{ExpenseRepositoryTrait, ExpenseServiceTrait};
