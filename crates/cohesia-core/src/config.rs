use std::collections::BTreeMap;
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// Top-level configuration from `.cohesia.toml`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub metrics: MetricsConfig,
    #[serde(default)]
    pub thresholds: Thresholds,
    #[serde(default)]
    pub render: RenderConfig,
}

/// Which named metrics to compute, one concurrent job per entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MetricsConfig {
    #[serde(default = "default_enabled")]
    pub enabled: Vec<String>,
}

fn default_enabled() -> Vec<String> {
    vec!["LCOM".to_string()]
}

impl Default for MetricsConfig {
    fn default() -> Self {
        Self {
            enabled: default_enabled(),
        }
    }
}

/// Defect thresholds over the normalized deviation ("diff") of a class.
/// A class is a defect when its diff rises above `high` or falls below
/// `low`; diff is expressed as a percentage of the population mean.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Thresholds {
    #[serde(default = "default_high")]
    pub high: f64,
    #[serde(default = "default_low")]
    pub low: f64,
}

fn default_high() -> f64 {
    10.0
}

fn default_low() -> f64 {
    -5.0
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            high: default_high(),
            low: default_low(),
        }
    }
}

/// Arbitrary named parameters handed to the rendering stage unmodified.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RenderConfig {
    #[serde(default)]
    pub params: BTreeMap<String, String>,
}

impl Config {
    /// Load configuration from a `.cohesia.toml` file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file '{}'", path.display()))?;
        let config: Config = toml::from_str(&content).with_context(|| {
            format!(
                "failed to parse '{}'. Run `cohesia init` to create a valid config file",
                path.display()
            )
        })?;
        Ok(config)
    }

    /// Load from `.cohesia.toml` in the given directory or any ancestor, or return defaults.
    pub fn load_or_default(dir: &Path) -> Self {
        let start = dir.canonicalize().unwrap_or_else(|_| dir.to_path_buf());
        let mut current = start.as_path();
        loop {
            let config_path = current.join(".cohesia.toml");
            if config_path.exists() {
                return match Self::load(&config_path) {
                    Ok(config) => config,
                    Err(e) => {
                        log::warn!(
                            "failed to load config from '{}': {e:#}. Using defaults.",
                            config_path.display()
                        );
                        Self::default()
                    }
                };
            }
            match current.parent() {
                Some(parent) => current = parent,
                None => break,
            }
        }
        Self::default()
    }

    /// Generate default TOML content for `cohesia init`.
    pub fn default_toml() -> String {
        r#"# Cohesia - Cohesion Analysis Configuration
# See https://github.com/cohesia/cohesia for documentation

[metrics]
# Named metrics to compute, one concurrent job per entry.
# Available: LCOM, LCOM2, LCOM3
enabled = ["LCOM"]

[thresholds]
# A class whose diff (percentage deviation from the population mean)
# rises above `high` or falls below `low` is flagged as a defect.
high = 10.0
low = -5.0

# Parameters passed through to the rendering stage unmodified.
# [render.params]
# title = "My Project"
"#
        .to_string()
    }
}
