use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime, NaiveTime, Utc};

use crate::constants::{MAX_YEAR, MIN_YEAR};
use crate::errors::{Error, Result, ValidationError};

/// A calendar month of a given year: the aggregation window for budgets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Period {
    month: u32,
    year: i32,
}

impl Period {
    /// Validates and builds a period. Month must be in 1..=12 and year in
    /// `MIN_YEAR..=MAX_YEAR`.
    pub fn new(month: i32, year: i32) -> Result<Self> {
        if !(1..=12).contains(&month) {
            return Err(Error::Validation(ValidationError::MonthOutOfRange(month)));
        }
        if !(MIN_YEAR..=MAX_YEAR).contains(&year) {
            return Err(Error::Validation(ValidationError::YearOutOfRange(year)));
        }
        Ok(Period {
            month: month as u32,
            year,
        })
    }

    /// The UTC calendar month at call time.
    pub fn current() -> Self {
        Self::containing(Utc::now().date_naive())
    }

    pub fn containing(date: NaiveDate) -> Self {
        Period {
            month: date.month(),
            year: date.year(),
        }
    }

    /// Fills whichever of month/year is missing from the current period.
    pub fn resolve(month: Option<i32>, year: Option<i32>) -> Result<Self> {
        let current = Self::current();
        Self::new(
            month.unwrap_or(current.month as i32),
            year.unwrap_or(current.year),
        )
    }

    pub fn month(&self) -> i32 {
        self.month as i32
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn first_day(&self) -> NaiveDate {
        // Period::new guarantees a representable date.
        NaiveDate::from_ymd_opt(self.year, self.month, 1).unwrap_or(NaiveDate::MIN)
    }

    pub fn last_day(&self) -> NaiveDate {
        let (next_year, next_month) = if self.month == 12 {
            (self.year + 1, 1)
        } else {
            (self.year, self.month + 1)
        };
        NaiveDate::from_ymd_opt(next_year, next_month, 1)
            .and_then(|d| d.pred_opt())
            .unwrap_or(NaiveDate::MAX)
    }

    pub fn days_in_month(&self) -> u32 {
        self.last_day().day()
    }

    /// First instant of the month.
    pub fn start(&self) -> NaiveDateTime {
        self.first_day().and_time(NaiveTime::MIN)
    }

    /// Last representable instant of the month's last day.
    pub fn end(&self) -> NaiveDateTime {
        end_of_day(self.last_day())
    }

    pub fn contains(&self, instant: NaiveDateTime) -> bool {
        instant >= self.start() && instant <= self.end()
    }
}

/// Last representable instant of a day (23:59:59.999999999).
pub fn end_of_day(date: NaiveDate) -> NaiveDateTime {
    date.and_hms_nano_opt(23, 59, 59, 999_999_999)
        .unwrap_or_else(|| date.and_time(NaiveTime::MIN))
}

/// Parses a timestamp given as RFC 3339, a naive `YYYY-MM-DDTHH:MM:SS[.f]`
/// (taken as UTC) or a bare `YYYY-MM-DD`, which means midnight of that day.
pub fn parse_timestamp(value: &str) -> Result<NaiveDateTime> {
    let value = value.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Ok(dt.naive_utc());
    }
    if let Ok(dt) = NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S%.f") {
        return Ok(dt);
    }
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .map(|date| date.and_time(NaiveTime::MIN))
        .map_err(|_| Error::invalid_input(format!("Invalid date: {value}")))
}
