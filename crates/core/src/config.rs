use serde::Deserialize;

/// Dashboard tuning knobs. Loaded from environment variables with the
/// prefix `ROI_DASHBOARD__`; every field has a default so an empty
/// environment yields a working configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct DashboardConfig {
    /// Influencers with ROAS below this percentage land in the poor-ROI
    /// report.
    #[serde(default = "default_poor_roi_threshold")]
    pub poor_roi_threshold: f64,
    /// Row count for the top-N ranking views.
    #[serde(default = "default_ranking_size")]
    pub ranking_size: usize,
}

fn default_poor_roi_threshold() -> f64 {
    100.0
}
fn default_ranking_size() -> usize {
    10
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            poor_roi_threshold: default_poor_roi_threshold(),
            ranking_size: default_ranking_size(),
        }
    }
}

impl DashboardConfig {
    /// Load configuration from environment variables.
    pub fn load() -> Result<Self, config::ConfigError> {
        let builder = config::Config::builder().add_source(
            config::Environment::with_prefix("ROI_DASHBOARD")
                .separator("__")
                .try_parsing(true),
        );

        let config = builder.build()?;
        config.try_deserialize()
    }
}
