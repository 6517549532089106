use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;

/// Top-level hydrobias configuration.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct HydrobiasConfig {
    /// I/O settings.
    #[serde(default)]
    pub io: IoToml,

    /// Analysis period and alignment settings.
    #[serde(default)]
    pub align: AlignToml,

    /// Quantile-mapping settings.
    #[serde(default)]
    pub dqm: DqmToml,

    /// Cross-validation settings.
    #[serde(default)]
    pub crossval: CrossvalToml,

    /// Operational correction settings.
    #[serde(default)]
    pub correction: CorrectionToml,

    /// Gauges to process.
    #[serde(default)]
    pub gauges: Vec<GaugeToml>,
}

impl HydrobiasConfig {
    /// Reads and parses a TOML configuration file.
    pub fn load(path: &Path) -> Result<Self> {
        let toml_str = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file: {}", path.display()))?;
        toml::from_str(&toml_str).context("failed to parse TOML config")
    }

    /// Configured gauges, restricted to `only` when it is non-empty.
    pub fn selected_gauges(&self, only: &[u32]) -> Vec<&GaugeToml> {
        self.gauges
            .iter()
            .filter(|g| only.is_empty() || only.contains(&g.id))
            .collect()
    }
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct IoToml {
    #[serde(default = "default_obs_dir")]
    pub obs_dir: PathBuf,
    #[serde(default = "default_sim_dir")]
    pub sim_dir: PathBuf,
    #[serde(default = "default_models_dir")]
    pub models_dir: PathBuf,
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,
    #[serde(default = "default_corrected_dir")]
    pub corrected_dir: PathBuf,
    #[serde(default = "default_obs_value_columns")]
    pub obs_value_columns: Vec<String>,
    #[serde(default = "default_sim_value_columns")]
    pub sim_value_columns: Vec<String>,
    #[serde(default = "default_compression")]
    pub compression: String,
    #[serde(default = "default_row_group_size")]
    pub row_group_size: usize,
}

impl Default for IoToml {
    fn default() -> Self {
        Self {
            obs_dir: default_obs_dir(),
            sim_dir: default_sim_dir(),
            models_dir: default_models_dir(),
            output_dir: default_output_dir(),
            corrected_dir: default_corrected_dir(),
            obs_value_columns: default_obs_value_columns(),
            sim_value_columns: default_sim_value_columns(),
            compression: default_compression(),
            row_group_size: default_row_group_size(),
        }
    }
}

fn default_obs_dir() -> PathBuf {
    PathBuf::from("data/observed")
}
fn default_sim_dir() -> PathBuf {
    PathBuf::from("data/simulated")
}
fn default_models_dir() -> PathBuf {
    PathBuf::from("models")
}
fn default_output_dir() -> PathBuf {
    PathBuf::from("output")
}
fn default_corrected_dir() -> PathBuf {
    PathBuf::from("output/corrected")
}
fn default_obs_value_columns() -> Vec<String> {
    vec!["q_cms".to_string(), "value".to_string()]
}
fn default_sim_value_columns() -> Vec<String> {
    vec!["q_raw".to_string(), "value".to_string()]
}
fn default_compression() -> String {
    "snappy".to_string()
}
fn default_row_group_size() -> usize {
    1_000_000
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AlignToml {
    #[serde(default = "default_start_year")]
    pub start_year: i32,
    #[serde(default = "default_end_year")]
    pub end_year: i32,
    #[serde(default = "default_start_month")]
    pub start_month: u8,
    #[serde(default = "default_end_month")]
    pub end_month: u8,
    #[serde(default = "default_epsilon")]
    pub epsilon: f64,
    #[serde(default = "default_sim_day_offset")]
    pub sim_day_offset: i64,
}

impl Default for AlignToml {
    fn default() -> Self {
        Self {
            start_year: default_start_year(),
            end_year: default_end_year(),
            start_month: default_start_month(),
            end_month: default_end_month(),
            epsilon: default_epsilon(),
            sim_day_offset: default_sim_day_offset(),
        }
    }
}

fn default_start_year() -> i32 {
    1979
}
fn default_end_year() -> i32 {
    1996
}
fn default_start_month() -> u8 {
    5
}
fn default_end_month() -> u8 {
    10
}
fn default_epsilon() -> f64 {
    0.01
}
fn default_sim_day_offset() -> i64 {
    1
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DqmToml {
    #[serde(default = "default_kind")]
    pub kind: String,
    #[serde(default = "default_grouping")]
    pub grouping: String,
    #[serde(default = "default_window")]
    pub window: u16,
}

impl Default for DqmToml {
    fn default() -> Self {
        Self {
            kind: default_kind(),
            grouping: default_grouping(),
            window: default_window(),
        }
    }
}

fn default_kind() -> String {
    "multiplicative".to_string()
}
fn default_grouping() -> String {
    "day_of_year".to_string()
}
fn default_window() -> u16 {
    31
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CrossvalToml {
    #[serde(default = "default_quantiles")]
    pub quantiles: Vec<usize>,
    #[serde(default = "default_min_valid_days")]
    pub min_valid_days: usize,
    #[serde(default = "default_min_samples")]
    pub min_samples: usize,
    #[serde(default = "default_scheme")]
    pub scheme: String,
    #[serde(default)]
    pub train_years: Option<usize>,
    #[serde(default)]
    pub test_years: Option<usize>,
}

impl Default for CrossvalToml {
    fn default() -> Self {
        Self {
            quantiles: default_quantiles(),
            min_valid_days: default_min_valid_days(),
            min_samples: default_min_samples(),
            scheme: default_scheme(),
            train_years: None,
            test_years: None,
        }
    }
}

fn default_quantiles() -> Vec<usize> {
    vec![1, 5, 10, 15, 20]
}
fn default_min_valid_days() -> usize {
    90
}
fn default_min_samples() -> usize {
    10
}
fn default_scheme() -> String {
    "loocv".to_string()
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CorrectionToml {
    #[serde(default = "default_correction_start_month")]
    pub start_month: u8,
    #[serde(default = "default_correction_end_month")]
    pub end_month: u8,
    #[serde(default = "default_epsilon")]
    pub epsilon: f64,
}

impl Default for CorrectionToml {
    fn default() -> Self {
        Self {
            start_month: default_correction_start_month(),
            end_month: default_correction_end_month(),
            epsilon: default_epsilon(),
        }
    }
}

fn default_correction_start_month() -> u8 {
    5
}
fn default_correction_end_month() -> u8 {
    9
}

/// One gauge entry. `quantiles` is the production quantile count; gauges
/// without one are cross-validated but never trained or corrected.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GaugeToml {
    pub id: u32,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub river: Option<String>,
    #[serde(default)]
    pub quantiles: Option<usize>,
}

impl GaugeToml {
    /// `"<id> (<name>, <river>)"`, or just the id.
    pub fn label(&self) -> String {
        match (&self.name, &self.river) {
            (Some(n), Some(r)) => format!("{} ({n}, {r})", self.id),
            (Some(n), None) => format!("{} ({n})", self.id),
            _ => self.id.to_string(),
        }
    }
}
