//! Correct command: apply stored models to the full simulated record.

use std::path::Path;

use anyhow::{Context, Result, bail};
use tracing::{info, info_span, warn};

use hydrobias_crossval::{CorrectionConfig, correct_series};
use hydrobias_io::{ModelStore, ReaderConfig, gauge_path, read_simulations, write_corrected_csv};
use hydrobias_series::{AlignConfig, prepare_simulation};

use crate::cli::CorrectArgs;
use crate::config::HydrobiasConfig;
use crate::convert;

/// Corrects one gauge and writes `<output_dir>/<gauge_id>.csv`.
///
/// Returns the number of days written and how many in-season days were left
/// uncorrected.
fn correct_gauge(
    gauge_id: u32,
    config: &HydrobiasConfig,
    store: &ModelStore,
    reader_cfg: &ReaderConfig,
    align_cfg: &AlignConfig,
    correction_cfg: &CorrectionConfig,
    output_dir: &Path,
) -> Result<(usize, usize)> {
    let model = store.load(gauge_id).context("failed to load model")?;

    let sim_path = gauge_path(&config.io.sim_dir, gauge_id);
    let samples = read_simulations(&sim_path, reader_cfg)
        .with_context(|| format!("failed to read {}", sim_path.display()))?;
    let daily = prepare_simulation(&samples, align_cfg.sim_day_offset());

    let corrected = correct_series(&model, &daily, correction_cfg).context("correction failed")?;

    let out = gauge_path(output_dir, gauge_id);
    write_corrected_csv(&out, &corrected.values)
        .with_context(|| format!("failed to write {}", out.display()))?;
    Ok((corrected.values.len(), corrected.n_fallback))
}

/// Correct every configured gauge with its stored model.
pub fn run(args: CorrectArgs) -> Result<()> {
    let _cmd = info_span!("correct").entered();
    let config = HydrobiasConfig::load(&args.config)?;

    let reader_cfg = convert::build_reader_config(&config.io)?;
    let align_cfg = convert::build_align_config(&config.align)?;
    let correction_cfg = convert::build_correction_config(&config.correction)?;
    let store = ModelStore::new(config.io.models_dir.clone());
    let output_dir = args
        .output
        .unwrap_or_else(|| config.io.corrected_dir.clone());
    std::fs::create_dir_all(&output_dir)
        .with_context(|| format!("failed to create output dir: {}", output_dir.display()))?;

    let mut n_corrected = 0usize;
    let mut n_failed = 0usize;
    for gauge in config.selected_gauges(&args.gauges) {
        let _gauge = info_span!("gauge", gauge_id = gauge.id).entered();
        if gauge.quantiles.is_none() {
            warn!(gauge_id = gauge.id, "no quantile count configured, skipping");
            continue;
        }

        match correct_gauge(
            gauge.id,
            &config,
            &store,
            &reader_cfg,
            &align_cfg,
            &correction_cfg,
            &output_dir,
        ) {
            Ok((n_days, n_fallback)) => {
                info!(gauge_id = gauge.id, n_days, n_fallback, "corrected series written");
                if n_fallback > 0 {
                    println!(
                        "{}: {n_days} days written ({n_fallback} in-season days uncorrected)",
                        gauge.label()
                    );
                } else {
                    println!("{}: {n_days} days corrected", gauge.label());
                }
                n_corrected += 1;
            }
            Err(e) => {
                let reason = format!("{e:#}");
                warn!(gauge_id = gauge.id, error = %reason, "gauge not corrected");
                println!("{}: failed: {reason}", gauge.label());
                n_failed += 1;
            }
        }
    }

    if n_corrected == 0 && n_failed > 0 {
        bail!("no gauge could be corrected");
    }
    info!(n_corrected, n_failed, dir = %output_dir.display(), "correction finished");
    Ok(())
}
