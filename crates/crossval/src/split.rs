//! Year-based train/test partitions.

use std::collections::BTreeSet;
use std::fmt;

use hydrobias_series::AlignedSeries;
use serde::{Deserialize, Serialize};

use crate::config::SplitScheme;

/// Identity of a fold: its test year or test period.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum FoldLabel {
    Year(i32),
    Period { first: i32, last: i32 },
}

impl fmt::Display for FoldLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            FoldLabel::Year(y) => write!(f, "{y}"),
            FoldLabel::Period { first, last } if first == last => write!(f, "{first}"),
            FoldLabel::Period { first, last } => write!(f, "{first}-{last}"),
        }
    }
}

/// A train/test partition by whole years. The two year sets are disjoint
/// and non-empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fold {
    pub label: FoldLabel,
    pub train_years: BTreeSet<i32>,
    pub test_years: BTreeSet<i32>,
}

impl Fold {
    /// Splits `series` into its training and test subsets.
    pub fn split(&self, series: &AlignedSeries) -> (AlignedSeries, AlignedSeries) {
        (
            series.select_years(&self.train_years),
            series.select_years(&self.test_years),
        )
    }
}

/// Years with more than `min_valid_days` records, ascending.
pub fn valid_years(series: &AlignedSeries, min_valid_days: usize) -> Vec<i32> {
    series
        .year_counts()
        .into_iter()
        .filter(|&(_, n)| n > min_valid_days)
        .map(|(y, _)| y)
        .collect()
}

/// One fold per valid year, holding that year out.
///
/// Empty when fewer than two valid years exist.
pub fn loocv_folds(valid: &[i32]) -> Vec<Fold> {
    if valid.len() < 2 {
        return Vec::new();
    }
    valid
        .iter()
        .map(|&test| Fold {
            label: FoldLabel::Year(test),
            train_years: valid.iter().copied().filter(|&y| y != test).collect(),
            test_years: BTreeSet::from([test]),
        })
        .collect()
}

/// Consecutive train/test blocks over the ordered valid years, advancing by
/// one year.
pub fn sliding_window_folds(valid: &[i32], train_len: usize, test_len: usize) -> Vec<Fold> {
    if train_len == 0 || test_len == 0 {
        return Vec::new();
    }
    valid
        .windows(train_len + test_len)
        .map(|w| {
            let (train, test) = w.split_at(train_len);
            Fold {
                label: FoldLabel::Period {
                    first: test[0],
                    last: test[test.len() - 1],
                },
                train_years: train.iter().copied().collect(),
                test_years: test.iter().copied().collect(),
            }
        })
        .collect()
}

/// Builds the folds of `series` for a split scheme.
pub fn make_folds(series: &AlignedSeries, scheme: SplitScheme, min_valid_days: usize) -> Vec<Fold> {
    let valid = valid_years(series, min_valid_days);
    match scheme {
        SplitScheme::Loocv => loocv_folds(&valid),
        SplitScheme::SlidingWindow {
            train_years,
            test_years,
        } => sliding_window_folds(&valid, train_years, test_years),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use hydrobias_series::AlignedRecord;

    fn series_with_counts(counts: &[(i32, u32)]) -> AlignedSeries {
        let mut records = Vec::new();
        for &(year, n) in counts {
            let start = NaiveDate::from_ymd_opt(year, 5, 1).unwrap();
            for d in start.iter_days().take(n as usize) {
                records.push(AlignedRecord::new(d, 1.0, 1.0));
            }
        }
        AlignedSeries::from_records(records).unwrap()
    }

    #[test]
    fn coverage_threshold_is_strict() {
        let s = series_with_counts(&[(2000, 90), (2001, 91), (2002, 150)]);
        assert_eq!(valid_years(&s, 90), vec![2001, 2002]);
    }

    #[test]
    fn loocv_needs_two_years() {
        assert!(loocv_folds(&[]).is_empty());
        assert!(loocv_folds(&[2001]).is_empty());
        assert_eq!(loocv_folds(&[2001, 2005]).len(), 2);
    }

    #[test]
    fn loocv_holds_out_each_year_once() {
        let folds = loocv_folds(&[2001, 2002, 2004]);
        assert_eq!(folds.len(), 3);
        let tests: Vec<i32> = folds
            .iter()
            .flat_map(|f| f.test_years.iter().copied())
            .collect();
        assert_eq!(tests, vec![2001, 2002, 2004]);
        for f in &folds {
            assert!(f.train_years.is_disjoint(&f.test_years));
            assert_eq!(f.train_years.len(), 2);
        }
        assert_eq!(folds[2].label.to_string(), "2004");
    }

    #[test]
    fn sliding_window_over_valid_years() {
        // 2003 is missing: blocks are taken over the valid years only.
        let folds = sliding_window_folds(&[2000, 2001, 2002, 2004, 2005], 2, 2);
        assert_eq!(folds.len(), 2);
        assert_eq!(folds[0].train_years, BTreeSet::from([2000, 2001]));
        assert_eq!(folds[0].test_years, BTreeSet::from([2002, 2004]));
        assert_eq!(folds[0].label.to_string(), "2002-2004");
        assert_eq!(folds[1].label.to_string(), "2004-2005");
    }

    #[test]
    fn sliding_window_single_test_year_label() {
        let folds = sliding_window_folds(&[2000, 2001, 2002], 2, 1);
        assert_eq!(folds.len(), 1);
        assert_eq!(folds[0].label.to_string(), "2002");
    }

    #[test]
    fn sliding_window_too_short() {
        assert!(sliding_window_folds(&[2000, 2001], 2, 1).is_empty());
        assert!(sliding_window_folds(&[2000, 2001], 0, 1).is_empty());
    }

    #[test]
    fn fold_split_partitions_records() {
        let s = series_with_counts(&[(2000, 100), (2001, 100), (2002, 100)]);
        let folds = make_folds(&s, SplitScheme::Loocv, 90);
        let (train, test) = folds[1].split(&s);
        assert_eq!(train.len(), 200);
        assert_eq!(test.len(), 100);
        assert_eq!(test.years(), vec![2001]);
    }
}
