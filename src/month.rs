//! A calendar month in the format "YYYY-MM", e.g. "2024-01".

use std::{fmt::Display, str::FromStr, sync::OnceLock};

use regex::Regex;
use rusqlite::{
    ToSql,
    types::{FromSql, FromSqlError, FromSqlResult, ToSqlOutput, ValueRef},
};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use time::{Date, Month};

use crate::Error;

const MONTH_FORMAT_MESSAGE: &str = "Month must be in YYYY-MM format";

/// A month of a specific year.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct YearMonth {
    year: i32,
    month: Month,
}

impl YearMonth {
    /// Create a new `YearMonth`.
    pub const fn new(year: i32, month: Month) -> Self {
        Self { year, month }
    }

    /// The month that `date` falls in.
    pub fn from_date(date: Date) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }

    /// The calendar year.
    pub fn year(&self) -> i32 {
        self.year
    }

    /// The month before this one, wrapping January back to December of the
    /// previous year.
    pub fn previous(&self) -> Self {
        match self.month {
            Month::January => Self::new(self.year - 1, Month::December),
            month => Self::new(self.year, month.previous()),
        }
    }

    /// The month after this one, wrapping December to January of the next
    /// year.
    pub fn next(&self) -> Self {
        match self.month {
            Month::December => Self::new(self.year + 1, Month::January),
            month => Self::new(self.year, month.next()),
        }
    }

    /// Whether `date` lies in this month.
    pub fn contains(&self, date: Date) -> bool {
        date.year() == self.year && date.month() == self.month
    }
}

impl Display for YearMonth {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month as u8)
    }
}

fn month_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();

    PATTERN.get_or_init(|| Regex::new(r"^\d{4}-\d{2}$").expect("month pattern is a valid regex"))
}

impl FromStr for YearMonth {
    type Err = Error;

    /// Parse a string of four digits, a hyphen and two digits in the range
    /// 01 to 12.
    ///
    /// # Errors
    /// Returns a [Error::Validation] on the `month` field if the string does
    /// not match the format.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if !month_pattern().is_match(s) {
            return Err(Error::invalid_field("month", MONTH_FORMAT_MESSAGE));
        }

        let (raw_year, raw_month) = s
            .split_once('-')
            .ok_or_else(|| Error::invalid_field("month", MONTH_FORMAT_MESSAGE))?;
        let year = raw_year
            .parse::<i32>()
            .map_err(|_| Error::invalid_field("month", MONTH_FORMAT_MESSAGE))?;
        let month = raw_month
            .parse::<u8>()
            .ok()
            .and_then(|number| Month::try_from(number).ok())
            .ok_or_else(|| Error::invalid_field("month", "Month must be between 01 and 12"))?;

        Ok(Self { year, month })
    }
}

impl Serialize for YearMonth {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for YearMonth {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;

        raw.parse().map_err(serde::de::Error::custom)
    }
}

impl ToSql for YearMonth {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::from(self.to_string()))
    }
}

impl FromSql for YearMonth {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        value
            .as_str()?
            .parse()
            .map_err(|_| FromSqlError::InvalidType)
    }
}
