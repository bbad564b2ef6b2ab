// One run-to-completion tracking pass: collect, aggregate, publish both tiers

use tokio::time::Duration;

use crate::config::AppConfig;
use crate::datasite::{Datasite, OUTPUT_FILE_NAME};
use crate::models::AggregateRecord;
use crate::privacy::{self, PrivacyParams};
use crate::sampler::{self, CpuSampler};
use crate::sink;

/// Execute one tracking run. Errors terminate the run; the next scheduled
/// invocation retries naturally. The two sink writes are the only stage with
/// isolated failures: both are attempted before the run is declared failed.
pub async fn run<S: CpuSampler>(config: &AppConfig, sampler: &S) -> anyhow::Result<()> {
    let datasite = Datasite::new(&config.datasite.root, &config.datasite.email);
    let public_dir = datasite.create_restricted_public_folder(&config.datasite.aggregator_readers)?;
    let private_dir = datasite.create_private_folder()?;
    tracing::debug!(
        public_dir = %public_dir.display(),
        private_dir = %private_dir.display(),
        "datasite folders ready"
    );

    let series = sampler::collect_series(
        sampler,
        config.sampling.sample_count,
        Duration::from_millis(config.sampling.sample_interval_ms),
        Duration::from_secs(config.sampling.timeout_secs),
    )
    .await?;
    tracing::debug!(samples = series.len(), "sample series collected");

    let params = PrivacyParams {
        epsilon: config.privacy.epsilon,
        bounds: (config.privacy.lower_bound, config.privacy.upper_bound),
    };
    let release = privacy::compute(&series, &params)?;
    tracing::info!(
        exact = release.exact,
        noised = release.noised,
        epsilon = params.epsilon,
        "aggregates computed"
    );

    let noised_record = AggregateRecord::new(release.noised);
    let exact_record = AggregateRecord::new(release.exact);
    let (public_result, private_result) = sink::write_both(
        &noised_record,
        &public_dir.join(OUTPUT_FILE_NAME),
        &exact_record,
        &private_dir.join(OUTPUT_FILE_NAME),
    );

    let mut failed = 0;
    for (tier, result) in [("public", &public_result), ("private", &private_result)] {
        match result {
            Ok(()) => tracing::info!(tier, "aggregate written"),
            Err(e) => {
                tracing::warn!(error = %e, tier, "sink write failed");
                failed += 1;
            }
        }
    }
    anyhow::ensure!(failed == 0, "{} of 2 sink writes failed", failed);
    Ok(())
}
