//! Pure conversion functions: TOML config structs -> crate API config types.

use anyhow::{Context, Result, bail};

use crate::config::*;

use hydrobias_crossval::{CorrectionConfig, CvConfig, SplitScheme};
use hydrobias_io::{Compression, ReaderConfig, WriterConfig};
use hydrobias_metrics::MetricsConfig;
use hydrobias_quantile_map::{Grouping, Kind, QmConfig};
use hydrobias_series::{AlignConfig, MonthRange, YearRange};

/// Parses a compression algorithm name string into the corresponding enum variant.
pub fn parse_compression(s: &str) -> Result<Compression> {
    match s.to_lowercase().as_str() {
        "none" => Ok(Compression::None),
        "snappy" => Ok(Compression::Snappy),
        "zstd" => Ok(Compression::Zstd),
        other => bail!("unknown compression: {other:?}"),
    }
}

/// Parses a correction kind name.
pub fn parse_kind(s: &str) -> Result<Kind> {
    match s.to_lowercase().as_str() {
        "multiplicative" | "mult" => Ok(Kind::Multiplicative),
        "additive" | "add" => Ok(Kind::Additive),
        other => bail!("unknown correction kind: {other:?}"),
    }
}

/// Parses a seasonal grouping mode; `window` applies to day-of-year grouping.
pub fn parse_grouping(s: &str, window: u16) -> Result<Grouping> {
    match s.to_lowercase().as_str() {
        "day_of_year" | "doy" => Ok(Grouping::DayOfYear { window }),
        "month" => Ok(Grouping::Month),
        other => bail!("unknown grouping: {other:?}"),
    }
}

/// Parses the split scheme.
///
/// `sliding_window` requires both `train_years` and `test_years`.
pub fn parse_scheme(cv: &CrossvalToml) -> Result<SplitScheme> {
    match cv.scheme.to_lowercase().as_str() {
        "loocv" => Ok(SplitScheme::Loocv),
        "sliding_window" => match (cv.train_years, cv.test_years) {
            (Some(train_years), Some(test_years)) => Ok(SplitScheme::SlidingWindow {
                train_years,
                test_years,
            }),
            _ => bail!("sliding_window scheme needs both train_years and test_years"),
        },
        other => bail!("unknown split scheme: {other:?}"),
    }
}

/// Builds a [`ReaderConfig`] from the TOML I/O configuration.
pub fn build_reader_config(io: &IoToml) -> Result<ReaderConfig> {
    let cfg = ReaderConfig::default()
        .with_obs_value_columns(io.obs_value_columns.clone())
        .with_sim_value_columns(io.sim_value_columns.clone());
    cfg.validate().context("invalid [io] column names")?;
    Ok(cfg)
}

/// Builds a [`WriterConfig`] from the TOML I/O configuration.
pub fn build_writer_config(io: &IoToml) -> Result<WriterConfig> {
    let compression = parse_compression(&io.compression)?;
    Ok(WriterConfig::default()
        .with_compression(compression)
        .with_row_group_size(io.row_group_size))
}

/// Builds an [`AlignConfig`] from the TOML alignment configuration.
pub fn build_align_config(align: &AlignToml) -> Result<AlignConfig> {
    let years =
        YearRange::new(align.start_year, align.end_year).context("invalid [align] years")?;
    let season =
        MonthRange::new(align.start_month, align.end_month).context("invalid [align] months")?;
    let cfg = AlignConfig::new()
        .with_years(years)
        .with_season(season)
        .with_epsilon(align.epsilon)
        .with_sim_day_offset(align.sim_day_offset);
    cfg.validate().context("invalid [align] section")?;
    Ok(cfg)
}

/// Builds the base [`QmConfig`]; the quantile count is set per run.
pub fn build_qm_config(dqm: &DqmToml) -> Result<QmConfig> {
    let cfg = QmConfig::new()
        .with_kind(parse_kind(&dqm.kind)?)
        .with_grouping(parse_grouping(&dqm.grouping, dqm.window)?);
    cfg.validate().context("invalid [dqm] section")?;
    Ok(cfg)
}

/// Builds a [`CvConfig`] from the TOML cross-validation configuration.
pub fn build_cv_config(cv: &CrossvalToml, qm: QmConfig) -> Result<CvConfig> {
    let cfg = CvConfig::new()
        .with_quantiles(cv.quantiles.clone())
        .with_min_valid_days(cv.min_valid_days)
        .with_scheme(parse_scheme(cv)?)
        .with_qm(qm)
        .with_metrics(MetricsConfig::new().with_min_samples(cv.min_samples));
    cfg.validate().context("invalid [crossval] section")?;
    Ok(cfg)
}

/// Builds a [`CorrectionConfig`] from the TOML correction configuration.
pub fn build_correction_config(correction: &CorrectionToml) -> Result<CorrectionConfig> {
    let season = MonthRange::new(correction.start_month, correction.end_month)
        .context("invalid [correction] months")?;
    let cfg = CorrectionConfig::new()
        .with_season(season)
        .with_epsilon(correction.epsilon);
    cfg.validate().context("invalid [correction] section")?;
    Ok(cfg)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_convert() {
        let config: HydrobiasConfig = toml::from_str("").unwrap();
        let align = build_align_config(&config.align).unwrap();
        assert_eq!(align.years(), YearRange::new(1979, 1996).unwrap());
        assert_eq!(align.season(), MonthRange::new(5, 10).unwrap());

        let qm = build_qm_config(&config.dqm).unwrap();
        assert_eq!(qm.kind(), Kind::Multiplicative);
        assert_eq!(qm.grouping(), Grouping::DayOfYear { window: 31 });

        let cv = build_cv_config(&config.crossval, qm).unwrap();
        assert_eq!(cv.scheme(), SplitScheme::Loocv);
        assert_eq!(cv.metrics().min_samples(), 10);

        let correction = build_correction_config(&config.correction).unwrap();
        assert_eq!(correction.season(), MonthRange::new(5, 9).unwrap());
    }

    #[test]
    fn sliding_window_needs_lengths() {
        let cv: CrossvalToml =
            toml::from_str("scheme = \"sliding_window\"\ntrain_years = 5").unwrap();
        assert!(parse_scheme(&cv).is_err());
        let cv: CrossvalToml = toml::from_str(
            "scheme = \"sliding_window\"\ntrain_years = 5\ntest_years = 1",
        )
        .unwrap();
        assert_eq!(
            parse_scheme(&cv).unwrap(),
            SplitScheme::SlidingWindow {
                train_years: 5,
                test_years: 1
            }
        );
    }

    #[test]
    fn unknown_names_rejected() {
        assert!(parse_kind("ratio").is_err());
        assert!(parse_grouping("week", 7).is_err());
        assert!(parse_compression("lz4").is_err());
        assert_eq!(parse_grouping("Month", 0).unwrap(), Grouping::Month);
    }

    #[test]
    fn invalid_ranges_rejected() {
        let align: AlignToml = toml::from_str("start_month = 13\n").unwrap();
        assert!(build_align_config(&align).is_err());
        let align: AlignToml = toml::from_str("start_year = 2000\nend_year = 1990\n").unwrap();
        assert!(build_align_config(&align).is_err());
        let align: AlignToml = toml::from_str("sim_day_offset = 100000000000000\n").unwrap();
        assert!(build_align_config(&align).is_err());
        let dqm: DqmToml = toml::from_str("window = 30\n").unwrap();
        assert!(build_qm_config(&dqm).is_err());
        let cv: CrossvalToml = toml::from_str("quantiles = []\n").unwrap();
        assert!(build_cv_config(&cv, QmConfig::new()).is_err());
    }
}
