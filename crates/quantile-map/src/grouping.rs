//! Seasonal group membership.

use chrono::{Datelike, NaiveDate};
use hydrobias_series::noleap_doy;

use crate::config::Grouping;

const DAYS: u16 = 365;

/// Circular distance between two days on a 365-day year.
fn doy_distance(a: u16, b: u16) -> u16 {
    let d = a.abs_diff(b);
    d.min(DAYS - d)
}

impl Grouping {
    /// The group a date belongs to: its no-leap day-of-year or its month.
    pub fn group_of(&self, date: NaiveDate) -> u16 {
        match self {
            Grouping::DayOfYear { .. } => noleap_doy(date),
            Grouping::Month => date.month() as u16,
        }
    }

    /// Every group key this grouping can produce, ascending.
    pub(crate) fn all_groups(&self) -> std::ops::RangeInclusive<u16> {
        match self {
            Grouping::DayOfYear { .. } => 1..=DAYS,
            Grouping::Month => 1..=12,
        }
    }

    /// Whether a date whose own group is `key` contributes to `group`.
    ///
    /// For day-of-year grouping this is every day within `window / 2` days of
    /// the group's day, so neighbouring groups overlap.
    fn key_in_window(&self, group: u16, key: u16) -> bool {
        match self {
            Grouping::DayOfYear { window } => doy_distance(group, key) <= window / 2,
            Grouping::Month => key == group,
        }
    }

    /// Indices of `keys` (precomputed with [`Grouping::group_of`]) that are
    /// members of `group`.
    pub(crate) fn members_by_key(&self, group: u16, keys: &[u16]) -> Vec<usize> {
        keys.iter()
            .enumerate()
            .filter(|(_, k)| self.key_in_window(group, **k))
            .map(|(i, _)| i)
            .collect()
    }
}
