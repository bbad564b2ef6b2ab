// CPU utilization sampling via sysinfo

use std::sync::Arc;
use std::time::Instant;
use sysinfo::System;
use thiserror::Error;
use tokio::time::{Duration, MissedTickBehavior, interval, timeout};

use crate::models::SampleSeries;

#[derive(Debug, Error)]
pub enum SamplingError {
    #[error("cpu sampler unavailable: {0}")]
    Unavailable(String),
    #[error("sample collection timed out after {timeout_secs}s ({expected} samples requested)")]
    Timeout { timeout_secs: u64, expected: usize },
}

/// One blocking utilization reading per call. Seam for tests to script
/// readings instead of touching the host.
pub trait CpuSampler {
    async fn sample_cpu_percent(&self) -> Result<f64, SamplingError>;
}

/// Host CPU sampler. Refreshes are rate-limited by sysinfo's minimum update
/// interval; calls closer together return the cached reading.
pub struct SysinfoSampler {
    sys: Arc<std::sync::Mutex<System>>,
    last_refresh: Arc<std::sync::Mutex<(Instant, f64)>>,
}

impl Default for SysinfoSampler {
    fn default() -> Self {
        Self::new()
    }
}

impl SysinfoSampler {
    pub fn new() -> Self {
        let mut sys = System::new_all();
        // Establish the usage baseline so the first real sample is meaningful
        sys.refresh_cpu_all();
        Self {
            sys: Arc::new(std::sync::Mutex::new(sys)),
            last_refresh: Arc::new(std::sync::Mutex::new((Instant::now(), 0.0))),
        }
    }
}

impl CpuSampler for SysinfoSampler {
    async fn sample_cpu_percent(&self) -> Result<f64, SamplingError> {
        let sys = self.sys.clone();
        let last_refresh = self.last_refresh.clone();
        tokio::task::spawn_blocking(move || {
            let mut sys = sys
                .lock()
                .map_err(|e| SamplingError::Unavailable(format!("sysinfo lock poisoned: {}", e)))?;
            let mut guard = last_refresh
                .lock()
                .map_err(|e| SamplingError::Unavailable(format!("sysinfo lock poisoned: {}", e)))?;

            let now = Instant::now();
            let (prev_ts, prev_usage) = *guard;
            let usage = if now.duration_since(prev_ts) >= sysinfo::MINIMUM_CPU_UPDATE_INTERVAL {
                sys.refresh_cpu_all();
                let new_usage = sys.global_cpu_usage() as f64;
                *guard = (now, new_usage);
                new_usage
            } else {
                // Not enough time has passed, return cached usage without blocking
                prev_usage
            };

            Ok(usage.clamp(0.0, 100.0))
        })
        .await
        .map_err(|e| SamplingError::Unavailable(format!("sysinfo task join: {}", e)))?
    }
}

/// Take `count` readings on a fixed cadence, bounding the whole collection by
/// `max_duration`. A sampler failure propagates immediately; there is no
/// retry.
pub async fn collect_series<S: CpuSampler>(
    sampler: &S,
    count: usize,
    sample_interval: Duration,
    max_duration: Duration,
) -> Result<SampleSeries, SamplingError> {
    let collection = async {
        let mut samples = Vec::with_capacity(count);
        let mut tick = interval(sample_interval);
        tick.set_missed_tick_behavior(MissedTickBehavior::Skip);
        while samples.len() < count {
            tick.tick().await;
            samples.push(sampler.sample_cpu_percent().await?);
        }
        Ok(SampleSeries::new(samples))
    };

    match timeout(max_duration, collection).await {
        Ok(result) => result,
        Err(_) => Err(SamplingError::Timeout {
            timeout_secs: max_duration.as_secs(),
            expected: count,
        }),
    }
}
