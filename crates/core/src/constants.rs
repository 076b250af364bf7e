/// Decimal precision for percentages shown to users
pub const DISPLAY_DECIMAL_PRECISION: u32 = 2;

/// Default page when a listing does not ask for one
pub const DEFAULT_PAGE: i64 = 1;

/// Default number of expenses per page
pub const DEFAULT_PAGE_SIZE: i64 = 10;

/// Largest page a caller may request
pub const MAX_PAGE_SIZE: i64 = 100;

/// Bounds for a period's year
pub const MIN_YEAR: i32 = 1;
pub const MAX_YEAR: i32 = 9999;
