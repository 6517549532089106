//! Month and year ranges, and the 365-day day-of-year used for seasonal grouping.

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::error::SeriesError;

/// Day-of-year on which each month starts in a 365-day year
/// (index 0 unused, index 1 = January starts at DOY 1, ...).
const MONTH_START_DOY: [u16; 13] = [0, 1, 32, 60, 91, 121, 152, 182, 213, 244, 274, 305, 335];

/// Day-of-year on a 365-day calendar (1..=365).
///
/// February 29 shares day 59 with February 28, and later days of a leap year
/// keep the same number they have in a common year, so a given calendar day
/// always falls in the same seasonal group.
pub fn noleap_doy(date: NaiveDate) -> u16 {
    let month = date.month() as usize;
    let day = date.day().min(if month == 2 { 28 } else { 31 }) as u16;
    MONTH_START_DOY[month] + day - 1
}

/// An inclusive range of calendar months.
///
/// `start > end` describes a season that wraps the new year, e.g. `11..=3`
/// covers November through March.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonthRange {
    start: u8,
    end: u8,
}

impl MonthRange {
    /// Creates a month range.
    ///
    /// # Errors
    ///
    /// Returns [`SeriesError::InvalidMonth`] if either bound is outside 1..=12.
    pub fn new(start: u8, end: u8) -> Result<Self, SeriesError> {
        for month in [start, end] {
            if !(1..=12).contains(&month) {
                return Err(SeriesError::InvalidMonth { month });
            }
        }
        Ok(Self { start, end })
    }

    /// The full calendar year.
    pub fn all() -> Self {
        Self { start: 1, end: 12 }
    }

    /// Creates a month range, clamping each bound into 1..=12.
    ///
    /// For fixed defaults; use [`MonthRange::new`] for user input.
    pub const fn clamped(start: u8, end: u8) -> Self {
        const fn clamp(m: u8) -> u8 {
            if m < 1 {
                1
            } else if m > 12 {
                12
            } else {
                m
            }
        }
        Self {
            start: clamp(start),
            end: clamp(end),
        }
    }

    /// Returns the first month of the range.
    pub fn start(&self) -> u8 {
        self.start
    }

    /// Returns the last month of the range.
    pub fn end(&self) -> u8 {
        self.end
    }

    /// Returns `true` if `month` lies within the range.
    pub fn contains(&self, month: u8) -> bool {
        if self.start <= self.end {
            (self.start..=self.end).contains(&month)
        } else {
            month >= self.start || month <= self.end
        }
    }

    /// Returns the months of the range, ascending.
    pub fn months(&self) -> Vec<u8> {
        (1..=12u8).filter(|&m| self.contains(m)).collect()
    }
}

/// An inclusive range of calendar years.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct YearRange {
    start: i32,
    end: i32,
}

impl YearRange {
    /// Creates a year range.
    ///
    /// # Errors
    ///
    /// Returns [`SeriesError::InvalidYearRange`] if `start > end`.
    pub fn new(start: i32, end: i32) -> Result<Self, SeriesError> {
        if start > end {
            return Err(SeriesError::InvalidYearRange { start, end });
        }
        Ok(Self { start, end })
    }

    /// A range that accepts every year.
    pub fn unbounded() -> Self {
        Self {
            start: i32::MIN,
            end: i32::MAX,
        }
    }

    /// Returns the first year.
    pub fn start(&self) -> i32 {
        self.start
    }

    /// Returns the last year.
    pub fn end(&self) -> i32 {
        self.end
    }

    /// Returns `true` if `year` lies within the range.
    pub fn contains(&self, year: i32) -> bool {
        (self.start..=self.end).contains(&year)
    }
}
