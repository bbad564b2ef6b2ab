use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub datasite: DatasiteConfig,
    pub sampling: SamplingConfig,
    pub privacy: PrivacyConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DatasiteConfig {
    pub root: String,
    pub email: String,
    /// Extra identities granted read on the restricted-public folder.
    #[serde(default = "default_aggregator_readers")]
    pub aggregator_readers: Vec<String>,
}

fn default_aggregator_readers() -> Vec<String> {
    vec!["aggregator@openmined.org".into()]
}

#[derive(Debug, Clone, Deserialize)]
pub struct SamplingConfig {
    pub sample_count: usize,
    pub sample_interval_ms: u64,
    /// Upper bound on the whole collection phase (real seconds).
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_timeout_secs() -> u64 {
    30
}

#[derive(Debug, Clone, Deserialize)]
pub struct PrivacyConfig {
    pub epsilon: f64,
    pub lower_bound: f64,
    pub upper_bound: f64,
}

impl AppConfig {
    pub fn load() -> anyhow::Result<Self> {
        let path = std::env::var("CONFIG_FILE").unwrap_or_else(|_| "config.toml".into());
        let s = std::fs::read_to_string(&path)?;
        Self::load_from_str(&s)
    }

    /// Parse and validate config from a string (e.g. for tests).
    pub fn load_from_str(s: &str) -> anyhow::Result<Self> {
        let config: AppConfig = toml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> anyhow::Result<()> {
        anyhow::ensure!(
            !self.datasite.root.is_empty(),
            "datasite.root must be non-empty"
        );
        anyhow::ensure!(
            self.datasite.email.contains('@'),
            "datasite.email must be an identity email, got {:?}",
            self.datasite.email
        );
        anyhow::ensure!(
            self.sampling.sample_count > 0,
            "sampling.sample_count must be > 0, got {}",
            self.sampling.sample_count
        );
        anyhow::ensure!(
            self.sampling.sample_interval_ms > 0,
            "sampling.sample_interval_ms must be > 0, got {}",
            self.sampling.sample_interval_ms
        );
        anyhow::ensure!(
            self.sampling.timeout_secs > 0,
            "sampling.timeout_secs must be > 0, got {}",
            self.sampling.timeout_secs
        );
        anyhow::ensure!(
            self.sampling.timeout_secs * 1000
                >= self.sampling.sample_count as u64 * self.sampling.sample_interval_ms,
            "sampling.timeout_secs ({}) must cover sample_count * sample_interval_ms",
            self.sampling.timeout_secs
        );
        anyhow::ensure!(
            self.privacy.epsilon.is_finite() && self.privacy.epsilon > 0.0,
            "privacy.epsilon must be > 0, got {}",
            self.privacy.epsilon
        );
        anyhow::ensure!(
            self.privacy.lower_bound.is_finite() && self.privacy.upper_bound.is_finite(),
            "privacy bounds must be finite, got ({}, {})",
            self.privacy.lower_bound,
            self.privacy.upper_bound
        );
        anyhow::ensure!(
            self.privacy.lower_bound < self.privacy.upper_bound,
            "privacy.lower_bound ({}) must be below privacy.upper_bound ({})",
            self.privacy.lower_bound,
            self.privacy.upper_bound
        );
        Ok(())
    }
}
