//! Category catalog - the single place categories are validated.

mod categories_model;

pub use categories_model::{is_valid, Category};
