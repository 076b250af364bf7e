//! The fixed catalog of expense and budget categories.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::errors::{Error, Result, ValidationError};

/// Classification shared by budgets and expenses.
///
/// The set is closed: anything outside it is rejected at the input boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Category {
    Food,
    Travel,
    Entertainment,
    Shopping,
    Bills,
    Healthcare,
    Others,
}

impl Category {
    pub const ALL: [Category; 7] = [
        Category::Food,
        Category::Travel,
        Category::Entertainment,
        Category::Shopping,
        Category::Bills,
        Category::Healthcare,
        Category::Others,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Food => "Food",
            Category::Travel => "Travel",
            Category::Entertainment => "Entertainment",
            Category::Shopping => "Shopping",
            Category::Bills => "Bills",
            Category::Healthcare => "Healthcare",
            Category::Others => "Others",
        }
    }

    /// Parses a category name, producing the validation error every write path
    /// reports for an unknown category.
    pub fn parse(value: &str) -> Result<Self> {
        value
            .parse()
            .map_err(|_| Error::Validation(ValidationError::InvalidCategory(value.to_string())))
    }
}

/// Membership test against the catalog. Matching is exact (case-sensitive).
pub fn is_valid(category: &str) -> bool {
    Category::ALL.iter().any(|c| c.as_str() == category)
}

impl FromStr for Category {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Category::ALL
            .iter()
            .copied()
            .find(|c| c.as_str() == s)
            .ok_or_else(|| format!("Unknown category: {}", s))
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
