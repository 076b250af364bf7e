pub mod decimal_utils;
pub mod time_utils;

pub use decimal_utils::{ensure_positive_amount, percentage_of};
pub use time_utils::{end_of_day, parse_timestamp, Period};
