//! Production configuration

use cadence_core::{CadenceError, CadenceResult};
use serde::{Deserialize, Serialize};

/// Rule store and diagnostics limits
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProductionConfig {
    /// Rules per tier
    pub tier_capacity: usize,
    /// Maximum length of action and protocol names kept for diagnostics
    pub name_limit: usize,
}

impl Default for ProductionConfig {
    fn default() -> Self {
        ProductionConfig {
            tier_capacity: 20,
            name_limit: 40,
        }
    }
}

impl ProductionConfig {
    /// Configuration for very small targets
    pub fn tiny() -> Self {
        ProductionConfig {
            tier_capacity: 4,
            ..Default::default()
        }
    }

    /// Same limits with a different tier capacity
    pub fn with_capacity(tier_capacity: usize) -> Self {
        ProductionConfig {
            tier_capacity,
            ..Default::default()
        }
    }

    pub fn validate(&self) -> CadenceResult<()> {
        if self.tier_capacity == 0 {
            return Err(CadenceError::InvalidConfig(
                "tier_capacity must be at least 1".into(),
            ));
        }
        Ok(())
    }
}

/// Truncate a diagnostic name to at most `limit` bytes on a char boundary
pub fn truncate_name(name: &str, limit: usize) -> String {
    if name.len() <= limit {
        return name.to_string();
    }
    let mut end = limit;
    while !name.is_char_boundary(end) {
        end -= 1;
    }
    name[..end].to_string()
}
