//! Cv command: cross-validate DQM for every configured gauge.

use std::collections::BTreeMap;
use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use tracing::{info, info_span, warn};

use hydrobias_crossval::{GaugeInput, GaugeReport, GaugeStatus, ResultRow, run_batch, summarize};
use hydrobias_io::{
    IoError, ReaderConfig, read_gauge, write_results_csv, write_results_parquet,
    write_status_json, write_summary_csv,
};

use crate::cli::CvArgs;
use crate::config::{GaugeToml, HydrobiasConfig, IoToml};
use crate::convert;

/// Reads one gauge; a missing file is reported as no data, other read
/// errors as a failure.
fn load_gauge(
    gauge: &GaugeToml,
    io: &IoToml,
    reader_cfg: &ReaderConfig,
) -> Result<GaugeInput, GaugeReport> {
    read_gauge(&io.obs_dir, &io.sim_dir, gauge.id, reader_cfg).map_err(|e| {
        let status = match e {
            IoError::FileNotFound { ref path } => {
                warn!(gauge_id = gauge.id, path = %path.display(), "gauge file missing");
                GaugeStatus::NoData
            }
            ref other => {
                warn!(gauge_id = gauge.id, error = %other, "gauge files unreadable");
                GaugeStatus::Failed {
                    reason: other.to_string(),
                }
            }
        };
        GaugeReport {
            gauge_id: gauge.id,
            status,
            rows: Vec::new(),
        }
    })
}

/// Run the cross-validation grid and write its tables.
pub fn run(args: CvArgs) -> Result<()> {
    let _cmd = info_span!("cv").entered();
    let config = HydrobiasConfig::load(&args.config)?;

    let reader_cfg = convert::build_reader_config(&config.io)?;
    let writer_cfg = convert::build_writer_config(&config.io)?;
    let align_cfg = convert::build_align_config(&config.align)?;
    let qm_cfg = convert::build_qm_config(&config.dqm)?;
    let cv_cfg = convert::build_cv_config(&config.crossval, qm_cfg)?;

    let gauges = config.selected_gauges(&args.gauges);
    if gauges.is_empty() {
        bail!("no gauges selected: add [[gauges]] entries to the config");
    }

    // 1. Read inputs
    let mut reports: Vec<GaugeReport> = Vec::new();
    let mut inputs: Vec<GaugeInput> = Vec::new();
    for gauge in &gauges {
        match load_gauge(gauge, &config.io, &reader_cfg) {
            Ok(input) => inputs.push(input),
            Err(report) => reports.push(report),
        }
    }
    info!(
        n_gauges = gauges.len(),
        n_readable = inputs.len(),
        quantiles = ?cv_cfg.quantiles(),
        "running cross-validation"
    );

    // 2. Cross-validate in parallel
    reports.extend(run_batch(inputs, &align_cfg, &cv_cfg));
    reports.sort_by_key(|r| r.gauge_id);

    // 3. Write tables
    let output_dir: PathBuf = args.output.unwrap_or_else(|| config.io.output_dir.clone());
    std::fs::create_dir_all(&output_dir)
        .with_context(|| format!("failed to create output dir: {}", output_dir.display()))?;

    let rows: Vec<ResultRow> = reports.iter().flat_map(|r| r.rows.iter().cloned()).collect();
    let statuses: BTreeMap<u32, GaugeStatus> = reports
        .iter()
        .map(|r| (r.gauge_id, r.status.clone()))
        .collect();

    let results_csv = output_dir.join("cv_results.csv");
    write_results_csv(&results_csv, &rows)
        .with_context(|| format!("failed to write {}", results_csv.display()))?;
    let results_parquet = output_dir.join("cv_results.parquet");
    write_results_parquet(&results_parquet, &rows, &writer_cfg)
        .with_context(|| format!("failed to write {}", results_parquet.display()))?;
    let summary_csv = output_dir.join("cv_summary.csv");
    write_summary_csv(&summary_csv, &summarize(&rows))
        .with_context(|| format!("failed to write {}", summary_csv.display()))?;
    let status_json = output_dir.join("cv_status.json");
    write_status_json(&status_json, &statuses)
        .with_context(|| format!("failed to write {}", status_json.display()))?;
    info!(path = %output_dir.display(), n_rows = rows.len(), "results written");

    // 4. Per-gauge status
    let labels: BTreeMap<u32, String> = gauges.iter().map(|g| (g.id, g.label())).collect();
    for r in &reports {
        let label = labels.get(&r.gauge_id).cloned().unwrap_or_else(|| r.gauge_id.to_string());
        println!("{label}: {}", r.status);
    }

    Ok(())
}
