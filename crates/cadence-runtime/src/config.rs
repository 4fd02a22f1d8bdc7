//! Runtime configuration

use cadence_core::{CadenceError, CadenceResult};
use cadence_production::ProductionConfig;
use serde::{Deserialize, Serialize};

/// Log output settings
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    /// Default filter directive, overridden by `CADENCE_LOG`
    pub level: String,
    /// Emit JSON lines instead of human readable output
    pub json: bool,
}

impl Default for LogConfig {
    fn default() -> Self {
        LogConfig {
            level: "info".into(),
            json: false,
        }
    }
}

/// Registry configuration
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RuntimeConfig {
    pub production: ProductionConfig,
    pub log: LogConfig,
    /// Upper bound on frames consumed by `poll_until_idle`
    pub max_poll_iterations: usize,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        RuntimeConfig {
            production: ProductionConfig::default(),
            log: LogConfig::default(),
            max_poll_iterations: 1000,
        }
    }
}

impl RuntimeConfig {
    /// Configuration for very small targets
    pub fn tiny() -> Self {
        RuntimeConfig {
            production: ProductionConfig::tiny(),
            max_poll_iterations: 100,
            ..Default::default()
        }
    }

    pub fn validate(&self) -> CadenceResult<()> {
        self.production.validate()?;
        if self.max_poll_iterations == 0 {
            return Err(CadenceError::InvalidConfig(
                "max_poll_iterations must be at least 1".into(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_validate() {
        assert!(RuntimeConfig::default().validate().is_ok());
        assert!(RuntimeConfig::tiny().validate().is_ok());
    }

    #[test]
    fn test_invalid_nested_production() {
        let mut config = RuntimeConfig::default();
        config.production.tier_capacity = 0;
        assert!(matches!(config.validate(), Err(CadenceError::InvalidConfig(_))));
    }

    #[test]
    fn test_parse_json() {
        let config: RuntimeConfig = serde_json::from_str(
            r#"{"production": {"tier_capacity": 6}, "log": {"json": true}}"#,
        )
        .unwrap();
        assert_eq!(config.production.tier_capacity, 6);
        assert_eq!(config.production.name_limit, 40);
        assert!(config.log.json);
        assert_eq!(config.log.level, "info");
        assert_eq!(config.max_poll_iterations, 1000);
    }
}
