//! Train command: fit and store one production model per gauge.

use anyhow::{Context, Result, bail};
use tracing::{info, info_span, warn};

use hydrobias_crossval::train_gauge;
use hydrobias_io::{ModelStore, read_gauge};

use crate::cli::TrainArgs;
use crate::config::HydrobiasConfig;
use crate::convert;

/// Train production models for every gauge with a configured quantile count.
pub fn run(args: TrainArgs) -> Result<()> {
    let _cmd = info_span!("train").entered();
    let config = HydrobiasConfig::load(&args.config)?;

    let reader_cfg = convert::build_reader_config(&config.io)?;
    let align_cfg = convert::build_align_config(&config.align)?;
    let qm_base = convert::build_qm_config(&config.dqm)?;
    let store = ModelStore::new(args.models.unwrap_or_else(|| config.io.models_dir.clone()));

    let mut n_trained = 0usize;
    let mut failed: Vec<u32> = Vec::new();
    for gauge in config.selected_gauges(&args.gauges) {
        let _gauge = info_span!("gauge", gauge_id = gauge.id).entered();
        let Some(q) = gauge.quantiles else {
            warn!(gauge_id = gauge.id, "no quantile count configured, skipping");
            continue;
        };

        let qm = qm_base.clone().with_n_quantiles(q);
        let result = read_gauge(&config.io.obs_dir, &config.io.sim_dir, gauge.id, &reader_cfg)
            .context("failed to read gauge data")
            .and_then(|input| {
                train_gauge(
                    gauge.id,
                    &input.observations,
                    &input.simulations,
                    &align_cfg,
                    &qm,
                )
                .context("training failed")
            })
            .and_then(|model| {
                if store.contains(gauge.id) {
                    info!(gauge_id = gauge.id, "replacing existing model");
                }
                store.save(gauge.id, &model).context("failed to save model")
            });

        match result {
            Ok(path) => {
                info!(
                    gauge_id = gauge.id,
                    n_quantiles = q,
                    path = %path.display(),
                    "model stored"
                );
                println!("{}: trained (q={q})", gauge.label());
                n_trained += 1;
            }
            Err(e) => {
                let reason = format!("{e:#}");
                warn!(gauge_id = gauge.id, error = %reason, "gauge not trained");
                println!("{}: failed: {reason}", gauge.label());
                failed.push(gauge.id);
            }
        }
    }

    if n_trained == 0 && !failed.is_empty() {
        bail!("no model could be trained (failed gauges: {failed:?})");
    }
    info!(
        n_trained,
        n_failed = failed.len(),
        dir = %store.dir().display(),
        "training finished"
    );
    Ok(())
}
