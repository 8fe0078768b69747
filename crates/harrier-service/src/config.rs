//! The materialized configuration graph.
//!
//! [`AgentConfig`] is built once per resolution pass, mutated exactly once
//! by the override injector, then treated as immutable and handed to the
//! lifecycle controller.

use std::collections::BTreeMap;

use harrier_component::{ComponentId, ComponentKind, SignalType};
use serde::Deserialize;
use serde_yaml::Value;

/// Identifying information about the running binary.
#[derive(Debug, Clone)]
pub struct BuildInfo {
    /// Executable name reported in logs and host metadata.
    pub command: String,
    /// Release version.
    pub version: String,
}

impl BuildInfo {
    pub fn new(command: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            command: command.into(),
            version: version.into(),
        }
    }
}

/// The root materialized configuration.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AgentConfig {
    pub extensions: BTreeMap<ComponentId, Value>,
    pub receivers: BTreeMap<ComponentId, Value>,
    pub processors: BTreeMap<ComponentId, Value>,
    pub exporters: BTreeMap<ComponentId, Value>,
    pub connectors: BTreeMap<ComponentId, Value>,
    pub service: ServiceSettings,
}

impl AgentConfig {
    /// The component config mapping for one kind.
    pub fn components(&self, kind: ComponentKind) -> &BTreeMap<ComponentId, Value> {
        match kind {
            ComponentKind::Extension => &self.extensions,
            ComponentKind::Receiver => &self.receivers,
            ComponentKind::Processor => &self.processors,
            ComponentKind::Exporter => &self.exporters,
            ComponentKind::Connector => &self.connectors,
        }
    }

    pub(crate) fn components_mut(
        &mut self,
        kind: ComponentKind,
    ) -> &mut BTreeMap<ComponentId, Value> {
        match kind {
            ComponentKind::Extension => &mut self.extensions,
            ComponentKind::Receiver => &mut self.receivers,
            ComponentKind::Processor => &mut self.processors,
            ComponentKind::Exporter => &mut self.exporters,
            ComponentKind::Connector => &mut self.connectors,
        }
    }
}

/// The `service` configuration section.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ServiceSettings {
    /// Extensions started alongside the pipelines.
    pub extensions: Vec<ComponentId>,
    /// Pipelines keyed by name (`traces`, `metrics/internal`, ...).
    pub pipelines: BTreeMap<String, PipelineSpec>,
    /// Agent self-observability settings.
    pub telemetry: TelemetrySettings,
}

/// One pipeline for one signal type.
///
/// Receiver and processor order is execution order; exporter order only
/// fixes the fan-out set, every exporter receives the data.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PipelineSpec {
    pub receivers: Vec<ComponentId>,
    pub processors: Vec<ComponentId>,
    pub exporters: Vec<ComponentId>,
}

/// Agent self-observability settings.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TelemetrySettings {
    pub logs: TelemetryLogs,
}

/// Log settings for the agent's own telemetry.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TelemetryLogs {
    pub level: String,
}

impl Default for TelemetryLogs {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

/// The signal type a pipeline carries, fixed by its name's prefix before
/// any `/` (`traces/backend` carries traces).
pub fn pipeline_signal(name: &str) -> Option<SignalType> {
    let prefix = name.split('/').next()?;
    prefix.parse().ok()
}
