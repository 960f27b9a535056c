//! Tunables for hierarchy construction.

use std::path::Path;

use anyhow::{
    bail,
    ensure,
    Context,
    Result,
};
use serde::{
    Deserialize,
    Serialize,
};

/// Default weight of the edge quotient in the node priority.
pub const DEFAULT_EDGE_QUOTIENT_FACTOR: f64 = 3.0;

/// Construction parameters, loadable from YAML.
///
/// ```yaml
/// edge_quotient_factor: 3.0
/// num_threads: 8
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ContractionConfig {
    /// Weight of the edge quotient term in `factor * edge_quotient + depth`.
    pub edge_quotient_factor: f64,
    /// Worker threads for the parallel phase of each round; `None` uses one per core.
    pub num_threads: Option<usize>,
}

impl Default for ContractionConfig {
    fn default() -> Self {
        Self {
            edge_quotient_factor: DEFAULT_EDGE_QUOTIENT_FACTOR,
            num_threads: None,
        }
    }
}

impl ContractionConfig {
    /// Read a config from a YAML file; missing fields take their defaults.
    pub fn from_yaml_file(path: &Path) -> Result<Self> {
        let contents =
            std::fs::read_to_string(path).with_context(|| format!("could not read config file {}", path.display()))?;
        let config: Self =
            serde_yaml::from_str(&contents).with_context(|| format!("invalid config file {}", path.display()))?;
        config.validate()?;
        Ok(config)
    }

    /// Check that the parameters are usable.
    pub fn validate(&self) -> Result<()> {
        ensure!(
            self.edge_quotient_factor.is_finite() && self.edge_quotient_factor >= 0.0,
            "edge_quotient_factor must be a finite, non-negative number, got {}",
            self.edge_quotient_factor
        );
        if self.num_threads == Some(0) {
            bail!("num_threads must be at least 1");
        }
        Ok(())
    }
}
