use approx::assert_relative_eq;
use chrono::{Datelike, NaiveDate, NaiveDateTime};
use hydrobias_series::{AlignConfig, MonthRange, Observation, SimulatedValue, YearRange, align};

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

/// Daily observations from `start` for `n` days with a smooth seasonal shape.
fn observations(start: NaiveDate, n: usize) -> Vec<Observation> {
    start
        .iter_days()
        .take(n)
        .enumerate()
        .map(|(i, d)| Observation::new(d, Some(10.0 + (i % 50) as f64)))
        .collect()
}

/// Six-hourly simulated samples covering the same period, shifted one day
/// later and scaled by 1.5.
fn simulations(start: NaiveDate, n: usize) -> Vec<SimulatedValue> {
    let mut out = Vec::new();
    for (i, d) in start.iter_days().skip(1).take(n).enumerate() {
        for h in [0, 6, 12, 18] {
            let ts: NaiveDateTime = d.and_hms_opt(h, 0, 0).unwrap();
            out.push(SimulatedValue::new(ts, 1.5 * (10.0 + (i % 50) as f64)));
        }
    }
    out
}

// ---------------------------------------------------------------------------
// 1. subdaily_samples_collapse_to_daily_pairs
// ---------------------------------------------------------------------------
#[test]
fn subdaily_samples_collapse_to_daily_pairs() {
    let start = date(1985, 5, 1);
    let obs = observations(start, 30);
    let sim = simulations(start, 30);

    let series = align(&obs, &sim, &AlignConfig::new()).unwrap();
    assert_eq!(series.len(), 30);
    for r in series.records() {
        assert_relative_eq!(r.sim - 0.01, 1.5 * (r.obs - 0.01), epsilon = 1e-9);
    }
}

// ---------------------------------------------------------------------------
// 2. alignment_is_deterministic
// ---------------------------------------------------------------------------
#[test]
fn alignment_is_deterministic() {
    let start = date(1980, 1, 1);
    let obs = observations(start, 800);
    let sim = simulations(start, 800);
    let config = AlignConfig::new().with_season(MonthRange::new(5, 10).unwrap());

    let a = align(&obs, &sim, &config).unwrap();
    let b = align(&obs, &sim, &config).unwrap();
    assert_eq!(a, b);
}

// ---------------------------------------------------------------------------
// 3. filters_restrict_years_and_months
// ---------------------------------------------------------------------------
#[test]
fn filters_restrict_years_and_months() {
    let start = date(1978, 1, 1);
    let obs = observations(start, 365 * 4);
    let sim = simulations(start, 365 * 4);
    let config = AlignConfig::new()
        .with_years(YearRange::new(1979, 1980).unwrap())
        .with_season(MonthRange::new(5, 10).unwrap());

    let series = align(&obs, &sim, &config).unwrap();
    assert!(!series.is_empty());
    for d in series.dates() {
        assert!((1979..=1980).contains(&d.year()));
        assert!((5..=10).contains(&d.month()));
    }
    assert_eq!(series.years(), vec![1979, 1980]);
    // May through October holds 184 days.
    assert_eq!(series.year_counts()[&1979], 184);
}

// ---------------------------------------------------------------------------
// 4. epsilon_keeps_zero_flows_positive
// ---------------------------------------------------------------------------
#[test]
fn epsilon_keeps_zero_flows_positive() {
    let d = date(1990, 7, 1);
    let obs = vec![Observation::new(d, Some(0.0))];
    let sim = vec![SimulatedValue::new(
        d.succ_opt().unwrap().and_hms_opt(0, 0, 0).unwrap(),
        0.0,
    )];
    let series = align(&obs, &sim, &AlignConfig::new().with_epsilon(0.5)).unwrap();
    let r = series.records()[0];
    assert_relative_eq!(r.obs, 0.5);
    assert_relative_eq!(r.sim, 0.5);
}

// ---------------------------------------------------------------------------
// 5. zero_offset_joins_same_day
// ---------------------------------------------------------------------------
#[test]
fn zero_offset_joins_same_day() {
    let d = date(1990, 7, 1);
    let obs = vec![Observation::new(d, Some(3.0))];
    let sim = vec![SimulatedValue::new(d.and_hms_opt(12, 0, 0).unwrap(), 4.0)];
    let series = align(&obs, &sim, &AlignConfig::new().with_sim_day_offset(0)).unwrap();
    assert_eq!(series.len(), 1);
}
