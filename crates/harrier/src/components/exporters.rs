//! Exporter factories.

use harrier_component::{Factory, InvalidConfig, SignalType};
use harrier_service::DatadogOverride;
use serde::{Deserialize, Serialize};
use serde_yaml::Value;

use super::yaml_value;

/// Debug exporter: prints telemetry to the agent's own output.
pub struct DebugExporterFactory;

const DEBUG_VERBOSITY_LEVELS: [&str; 3] = ["basic", "normal", "detailed"];

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct DebugConfig {
    verbosity: String,
}

impl Default for DebugConfig {
    fn default() -> Self {
        Self {
            verbosity: "basic".to_string(),
        }
    }
}

impl Factory for DebugExporterFactory {
    fn type_name(&self) -> &str {
        "debug"
    }

    fn default_config(&self) -> Value {
        yaml_value(&DebugConfig::default())
    }

    fn validate_config(&self, config: &Value) -> Result<(), InvalidConfig> {
        let config: DebugConfig = serde_yaml::from_value(config.clone())
            .map_err(|e| InvalidConfig::new(e.to_string()))?;

        if !DEBUG_VERBOSITY_LEVELS.contains(&config.verbosity.as_str()) {
            return Err(InvalidConfig::new(format!(
                "verbosity must be one of {DEBUG_VERBOSITY_LEVELS:?}"
            )));
        }
        Ok(())
    }

    fn supported_signals(&self) -> &[SignalType] {
        &SignalType::ALL
    }
}

/// OTLP exporter: forwards telemetry to another OTLP endpoint.
pub struct OtlpExporterFactory;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct OtlpExporterConfig {
    endpoint: String,
    /// Skip TLS verification; only for test targets.
    insecure: bool,
    timeout_ms: u64,
}

impl Default for OtlpExporterConfig {
    fn default() -> Self {
        Self {
            endpoint: String::new(),
            insecure: false,
            timeout_ms: 5000,
        }
    }
}

impl Factory for OtlpExporterFactory {
    fn type_name(&self) -> &str {
        "otlp"
    }

    fn default_config(&self) -> Value {
        yaml_value(&OtlpExporterConfig::default())
    }

    fn validate_config(&self, config: &Value) -> Result<(), InvalidConfig> {
        let config: OtlpExporterConfig = serde_yaml::from_value(config.clone())
            .map_err(|e| InvalidConfig::new(e.to_string()))?;

        if config.endpoint.is_empty() {
            return Err(InvalidConfig::new("endpoint is required"));
        }
        if config.timeout_ms == 0 {
            return Err(InvalidConfig::new("timeout_ms must be positive"));
        }
        Ok(())
    }

    fn supported_signals(&self) -> &[SignalType] {
        &SignalType::ALL
    }
}

/// Datadog exporter: ships all three signals to the Datadog intake.
///
/// Its schema is the same shape the override injector renders, so an
/// injected config and a user-declared one validate identically.
pub struct DatadogExporterFactory;

const HISTOGRAM_MODES: [&str; 3] = ["distributions", "counters", "nobuckets"];
const SUMMARY_MODES: [&str; 3] = ["gauges", "quantiles", "noquantiles"];
const HOSTNAME_SOURCES: [&str; 2] = ["first_resource", "config_or_system"];

impl Factory for DatadogExporterFactory {
    fn type_name(&self) -> &str {
        "datadog"
    }

    fn default_config(&self) -> Value {
        yaml_value(&DatadogOverride::default())
    }

    fn validate_config(&self, config: &Value) -> Result<(), InvalidConfig> {
        let config: DatadogOverride = serde_yaml::from_value(config.clone())
            .map_err(|e| InvalidConfig::new(e.to_string()))?;

        if config.api.site.is_empty() {
            return Err(InvalidConfig::new("api.site is required"));
        }
        if !HISTOGRAM_MODES.contains(&config.metrics.histogram.mode.as_str()) {
            return Err(InvalidConfig::new(format!(
                "metrics.histogram.mode must be one of {HISTOGRAM_MODES:?}"
            )));
        }
        if !SUMMARY_MODES.contains(&config.metrics.summaries.mode.as_str()) {
            return Err(InvalidConfig::new(format!(
                "metrics.summaries.mode must be one of {SUMMARY_MODES:?}"
            )));
        }
        if !HOSTNAME_SOURCES.contains(&config.host_metadata.hostname_source.as_str()) {
            return Err(InvalidConfig::new(format!(
                "host_metadata.hostname_source must be one of {HOSTNAME_SOURCES:?}"
            )));
        }
        for endpoint in [
            &config.metrics.endpoint,
            &config.traces.endpoint,
            &config.logs.endpoint,
        ] {
            if endpoint.is_empty() {
                return Err(InvalidConfig::new("intake endpoints must not be empty"));
            }
        }
        Ok(())
    }

    fn supported_signals(&self) -> &[SignalType] {
        &SignalType::ALL
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_debug_defaults_validate() {
        let factory = DebugExporterFactory;
        assert!(factory.validate_config(&factory.default_config()).is_ok());
    }

    #[test]
    fn test_debug_rejects_unknown_verbosity() {
        let factory = DebugExporterFactory;
        let config: Value = serde_yaml::from_str("verbosity: loud").unwrap();
        assert!(factory.validate_config(&config).is_err());
    }

    #[test]
    fn test_otlp_requires_endpoint() {
        let factory = OtlpExporterFactory;
        assert!(factory.validate_config(&factory.default_config()).is_err());

        let config: Value = serde_yaml::from_str("endpoint: collector:4317").unwrap();
        assert!(factory.validate_config(&config).is_ok());
    }

    #[test]
    fn test_datadog_accepts_injected_policy() {
        let factory = DatadogExporterFactory;
        let injected = DatadogOverride::default().to_config().unwrap();
        assert!(factory.validate_config(&injected).is_ok());
    }

    #[test]
    fn test_datadog_rejects_bad_histogram_mode() {
        let factory = DatadogExporterFactory;
        let config: Value =
            serde_yaml::from_str("metrics: {histogram: {mode: exact}}").unwrap();
        assert!(factory.validate_config(&config).is_err());
    }
}
