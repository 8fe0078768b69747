//! Programmatic configuration overrides.
//!
//! An override is an explicit, named transformation stage that runs
//! strictly after materialization and strictly before validation, so the
//! injected component is covered by the same referential-integrity checks
//! as user-declared components.

use harrier_component::{ComponentId, ComponentKind, SignalType};
use serde::{Deserialize, Serialize};
use serde_yaml::Value;
use tracing::debug;

use crate::config::{AgentConfig, pipeline_signal};

/// Environment variable holding the Datadog API key.
pub const DD_API_KEY_ENV: &str = "DD_API_KEY";

/// Insert or replace an exporter config and wire it into every matching
/// pipeline.
///
/// The config entry is last-writer-wins: an existing entry for `id` is
/// replaced outright, not merged; the override is intentional. The
/// exporter is then appended to the exporter set of every pipeline whose
/// signal type is in `signals`, skipping pipelines that already reference
/// it, so repeated injection of the same ID is idempotent.
pub fn inject_exporter(
    cfg: &mut AgentConfig,
    id: &ComponentId,
    config: Value,
    signals: &[SignalType],
) {
    cfg.components_mut(ComponentKind::Exporter)
        .insert(id.clone(), config);

    for (name, pipeline) in &mut cfg.service.pipelines {
        let Some(signal) = pipeline_signal(name) else {
            // Unparseable names are the validator's to report.
            continue;
        };
        if signals.contains(&signal) && !pipeline.exporters.contains(id) {
            debug!(pipeline = %name, exporter = %id, "wiring injected exporter");
            pipeline.exporters.push(id.clone());
        }
    }
}

/// Policy for the built-in Datadog exporter override.
///
/// Field defaults mirror the stock Datadog wiring; everything here is
/// plain configuration and callers may construct any other policy. The
/// rendered value feeds [`inject_exporter`] and is validated like any
/// user-declared exporter config afterwards.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DatadogOverride {
    pub api: DatadogApi,
    pub metrics: DatadogMetrics,
    pub traces: DatadogTraces,
    pub logs: DatadogLogs,
    pub host_metadata: DatadogHostMetadata,
    pub hostname: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DatadogApi {
    pub key: String,
    pub site: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DatadogMetrics {
    pub endpoint: String,
    pub delta_ttl: u64,
    pub resource_attributes_as_tags: bool,
    pub instrumentation_scope_metadata_as_tags: bool,
    pub histogram: DatadogHistogram,
    pub sums: DatadogSums,
    pub summaries: DatadogSummaries,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DatadogHistogram {
    pub mode: String,
    pub send_aggregations: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DatadogSums {
    pub cumulative_monotonic_mode: String,
    pub initial_cumulative_monotonic_mode: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DatadogSummaries {
    pub mode: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DatadogTraces {
    pub endpoint: String,
    pub ignore_resources: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DatadogLogs {
    pub endpoint: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DatadogHostMetadata {
    pub enabled: bool,
    pub hostname_source: String,
}

impl Default for DatadogApi {
    fn default() -> Self {
        Self {
            key: String::new(),
            site: "datadoghq.com".to_string(),
        }
    }
}

impl Default for DatadogMetrics {
    fn default() -> Self {
        Self {
            endpoint: "https://api.datadoghq.com".to_string(),
            delta_ttl: 3600,
            resource_attributes_as_tags: false,
            instrumentation_scope_metadata_as_tags: false,
            histogram: DatadogHistogram::default(),
            sums: DatadogSums::default(),
            summaries: DatadogSummaries::default(),
        }
    }
}

impl Default for DatadogHistogram {
    fn default() -> Self {
        Self {
            mode: "distributions".to_string(),
            send_aggregations: false,
        }
    }
}

impl Default for DatadogSums {
    fn default() -> Self {
        Self {
            cumulative_monotonic_mode: "to_delta".to_string(),
            initial_cumulative_monotonic_mode: "auto".to_string(),
        }
    }
}

impl Default for DatadogSummaries {
    fn default() -> Self {
        Self {
            mode: "gauges".to_string(),
        }
    }
}

impl Default for DatadogTraces {
    fn default() -> Self {
        Self {
            endpoint: "https://trace.agent.datadoghq.com".to_string(),
            ignore_resources: Vec::new(),
        }
    }
}

impl Default for DatadogLogs {
    fn default() -> Self {
        Self {
            endpoint: "https://http-intake.logs.datadoghq.com".to_string(),
        }
    }
}

impl Default for DatadogHostMetadata {
    fn default() -> Self {
        Self {
            enabled: true,
            hostname_source: "config_or_system".to_string(),
        }
    }
}

impl DatadogOverride {
    /// The default policy with the API key read from [`DD_API_KEY_ENV`].
    pub fn from_env() -> Self {
        let mut policy = Self::default();
        policy.api.key = std::env::var(DD_API_KEY_ENV).unwrap_or_default();
        policy
    }

    /// The component ID this override registers under.
    pub fn id() -> ComponentId {
        ComponentId::new("datadog")
    }

    /// Render the policy as an exporter config value.
    pub fn to_config(&self) -> Result<Value, serde_yaml::Error> {
        serde_yaml::to_value(self)
    }
}
