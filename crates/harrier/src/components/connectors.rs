//! Connector factories.

use harrier_component::{Factory, InvalidConfig, SignalType};
use serde::{Deserialize, Serialize};
use serde_yaml::Value;

use super::yaml_value;

/// Span metrics connector: derives request metrics from trace spans,
/// exporting on trace pipelines and receiving on metric pipelines.
pub struct SpanMetricsConnectorFactory;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct SpanMetricsConfig {
    /// Latency histogram bucket upper bounds, strictly increasing.
    buckets_ms: Vec<u64>,
    /// Span attributes recorded as metric dimensions.
    dimensions: Vec<String>,
    /// Prefix for generated metric names.
    namespace: String,
}

impl Default for SpanMetricsConfig {
    fn default() -> Self {
        Self {
            buckets_ms: vec![2, 4, 6, 8, 10, 50, 100, 200, 400, 800, 1000, 1400, 2000, 5000],
            dimensions: Vec::new(),
            namespace: String::new(),
        }
    }
}

impl Factory for SpanMetricsConnectorFactory {
    fn type_name(&self) -> &str {
        "spanmetrics"
    }

    fn default_config(&self) -> Value {
        yaml_value(&SpanMetricsConfig::default())
    }

    fn validate_config(&self, config: &Value) -> Result<(), InvalidConfig> {
        let config: SpanMetricsConfig = serde_yaml::from_value(config.clone())
            .map_err(|e| InvalidConfig::new(e.to_string()))?;

        if config.buckets_ms.is_empty() {
            return Err(InvalidConfig::new("buckets_ms must not be empty"));
        }
        if !config.buckets_ms.is_sorted_by(|a, b| a < b) {
            return Err(InvalidConfig::new(
                "buckets_ms must be strictly increasing",
            ));
        }
        Ok(())
    }

    fn supported_signals(&self) -> &[SignalType] {
        &[SignalType::Traces, SignalType::Metrics]
    }
}
