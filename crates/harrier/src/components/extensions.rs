//! Extension factories.

use harrier_component::{Factory, InvalidConfig, SignalType};
use serde::{Deserialize, Serialize};
use serde_yaml::Value;

use super::yaml_value;

/// Health check extension: liveness endpoint for orchestrators.
pub struct HealthCheckExtensionFactory;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct HealthCheckConfig {
    endpoint: String,
    path: String,
}

impl Default for HealthCheckConfig {
    fn default() -> Self {
        Self {
            endpoint: "0.0.0.0:13133".to_string(),
            path: "/".to_string(),
        }
    }
}

impl Factory for HealthCheckExtensionFactory {
    fn type_name(&self) -> &str {
        "health_check"
    }

    fn default_config(&self) -> Value {
        yaml_value(&HealthCheckConfig::default())
    }

    fn validate_config(&self, config: &Value) -> Result<(), InvalidConfig> {
        let config: HealthCheckConfig = serde_yaml::from_value(config.clone())
            .map_err(|e| InvalidConfig::new(e.to_string()))?;

        if config.endpoint.is_empty() {
            return Err(InvalidConfig::new("endpoint is required"));
        }
        if !config.path.starts_with('/') {
            return Err(InvalidConfig::new("path must start with '/'"));
        }
        Ok(())
    }

    fn supported_signals(&self) -> &[SignalType] {
        // Extensions sit outside the pipelines.
        &[]
    }
}
