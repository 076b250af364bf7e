//! Helpers for decoding values stored as SQLite text.

use std::str::FromStr;

use budgetwise_core::categories::Category;
use rust_decimal::Decimal;

use crate::errors::StorageError;

/// Parses a decimal persisted as TEXT.
pub fn parse_stored_decimal(value: &str, field_name: &str) -> Result<Decimal, StorageError> {
    Decimal::from_str(value).map_err(|e| {
        log::error!("Failed to parse stored {} '{}': {}", field_name, value, e);
        StorageError::CorruptValue(format!("{} '{}' is not a decimal", field_name, value))
    })
}

/// Parses a category persisted as TEXT.
pub fn parse_stored_category(value: &str) -> Result<Category, StorageError> {
    Category::from_str(value).map_err(|_| {
        log::error!("Unknown stored category '{}'", value);
        StorageError::CorruptValue(format!("unknown category '{}'", value))
    })
}
