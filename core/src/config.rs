use crate::scorer::RiskLevel;
use serde::{Deserialize, Serialize};

/// Simulated response delays, in milliseconds.
///
/// The core never sleeps. These values are read by callers that want
/// to mimic a remote backend; they are ignored unless `enabled` is set.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct LatencyConfig {
    pub enabled:   bool,
    pub customers: u64,
    pub metrics:   u64,
    pub search:    u64,
    pub predict:   u64,
    pub report:    u64,
}

impl Default for LatencyConfig {
    fn default() -> Self {
        Self {
            enabled:   false,
            customers: 500,
            metrics:   800,
            search:    300,
            predict:   1500,
            report:    3000,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChurnConfig {
    /// SQLite path. `:memory:` keeps everything in-process.
    #[serde(default = "default_database")]
    pub database: String,
    /// Optional customer file. The embedded table is used when absent.
    #[serde(default)]
    pub customers_file: Option<String>,
    #[serde(default)]
    pub latency: LatencyConfig,
    /// Levels whose monthly bill counts toward revenue at risk.
    #[serde(default = "default_high_risk_levels")]
    pub high_risk_levels: Vec<RiskLevel>,
}

fn default_database() -> String {
    "churnlens.db".into()
}

fn default_high_risk_levels() -> Vec<RiskLevel> {
    vec![RiskLevel::High, RiskLevel::Critical]
}

impl Default for ChurnConfig {
    fn default() -> Self {
        Self {
            database:         default_database(),
            customers_file:   None,
            latency:          LatencyConfig::default(),
            high_risk_levels: default_high_risk_levels(),
        }
    }
}

impl ChurnConfig {
    /// Load from a JSON config file. Missing keys take their defaults.
    pub fn load(path: &str) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| anyhow::anyhow!("Cannot read {path}: {e}"))?;
        let config: ChurnConfig = serde_json::from_str(&content)
            .map_err(|e| anyhow::anyhow!("Cannot parse {path}: {e}"))?;
        Ok(config)
    }

    /// In-memory database, embedded customers, no latency.
    pub fn default_test() -> Self {
        Self {
            database: ":memory:".into(),
            latency: LatencyConfig {
                enabled:   false,
                customers: 0,
                metrics:   0,
                search:    0,
                predict:   0,
                report:    0,
            },
            ..Self::default()
        }
    }
}
