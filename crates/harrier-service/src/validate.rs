//! Structural and referential validation of the configuration graph.
//!
//! Every independent check runs regardless of earlier failures and all
//! defects are combined into one [`ValidationErrors`] value, so a single
//! pass reports everything an operator has to fix.

use std::fmt;

use harrier_component::{ComponentId, ComponentKind, FactoryRegistry, InvalidConfig};

use crate::config::{AgentConfig, pipeline_signal};

/// One validation defect.
#[derive(Debug, thiserror::Error)]
pub enum ValidationError {
    /// A pipeline references a component with no config entry.
    #[error("pipeline '{pipeline}' references undeclared {kind} '{id}'")]
    DanglingReference {
        pipeline: String,
        kind: ComponentKind,
        id: ComponentId,
    },

    /// `service.extensions` references an extension with no config entry.
    #[error("service extensions reference undeclared extension '{id}'")]
    DanglingExtension { id: ComponentId },

    /// A declared component's type has no registered factory.
    #[error("unknown {kind} type for component '{id}'")]
    UnknownComponentType { kind: ComponentKind, id: ComponentId },

    /// A pipeline name does not start with a signal type.
    #[error("pipeline '{0}' must be named after a signal type (traces, metrics, logs)")]
    InvalidPipelineName(String),

    /// A pipeline has no receivers.
    #[error("pipeline '{0}' declares no receivers")]
    NoReceivers(String),

    /// A pipeline has no exporters.
    #[error("pipeline '{0}' declares no exporters")]
    NoExporters(String),

    /// The service declares no pipelines at all.
    #[error("service declares no pipelines")]
    NoPipelines,

    /// A component config was rejected by its factory.
    #[error("invalid config for {kind} '{id}': {source}")]
    InvalidComponent {
        kind: ComponentKind,
        id: ComponentId,
        source: InvalidConfig,
    },

    /// `service.telemetry.logs.level` is not a known log level.
    #[error("unknown telemetry log level '{0}'")]
    InvalidTelemetryLevel(String),
}

const TELEMETRY_LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

/// Every defect found in one validation pass.
#[derive(Debug)]
pub struct ValidationErrors(pub Vec<ValidationError>);

impl std::error::Error for ValidationErrors {}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "configuration invalid ({} problems):", self.0.len())?;
        for error in &self.0 {
            write!(f, "\n  - {error}")?;
        }
        Ok(())
    }
}

/// Check structural and referential integrity of a materialized config.
pub fn validate(cfg: &AgentConfig, registry: &FactoryRegistry) -> Result<(), ValidationErrors> {
    let mut errors = Vec::new();

    check_pipelines(cfg, &mut errors);
    check_component_types(cfg, registry, &mut errors);
    check_component_configs(cfg, registry, &mut errors);

    let level = &cfg.service.telemetry.logs.level;
    if !TELEMETRY_LOG_LEVELS.contains(&level.as_str()) {
        errors.push(ValidationError::InvalidTelemetryLevel(level.clone()));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(ValidationErrors(errors))
    }
}

fn check_pipelines(cfg: &AgentConfig, errors: &mut Vec<ValidationError>) {
    if cfg.service.pipelines.is_empty() {
        errors.push(ValidationError::NoPipelines);
    }

    for (name, pipeline) in &cfg.service.pipelines {
        if pipeline_signal(name).is_none() {
            errors.push(ValidationError::InvalidPipelineName(name.clone()));
        }
        if pipeline.receivers.is_empty() {
            errors.push(ValidationError::NoReceivers(name.clone()));
        }
        if pipeline.exporters.is_empty() {
            errors.push(ValidationError::NoExporters(name.clone()));
        }

        // Connectors may stand in on either end of a pipeline.
        for id in &pipeline.receivers {
            if !cfg.receivers.contains_key(id) && !cfg.connectors.contains_key(id) {
                errors.push(dangling(name, ComponentKind::Receiver, id));
            }
        }
        for id in &pipeline.processors {
            if !cfg.processors.contains_key(id) {
                errors.push(dangling(name, ComponentKind::Processor, id));
            }
        }
        for id in &pipeline.exporters {
            if !cfg.exporters.contains_key(id) && !cfg.connectors.contains_key(id) {
                errors.push(dangling(name, ComponentKind::Exporter, id));
            }
        }
    }

    for id in &cfg.service.extensions {
        if !cfg.extensions.contains_key(id) {
            errors.push(ValidationError::DanglingExtension { id: id.clone() });
        }
    }
}

fn dangling(pipeline: &str, kind: ComponentKind, id: &ComponentId) -> ValidationError {
    ValidationError::DanglingReference {
        pipeline: pipeline.to_string(),
        kind,
        id: id.clone(),
    }
}

fn check_component_types(
    cfg: &AgentConfig,
    registry: &FactoryRegistry,
    errors: &mut Vec<ValidationError>,
) {
    for kind in ComponentKind::ALL {
        for id in cfg.components(kind).keys() {
            if registry.factory(kind, id.type_name()).is_none() {
                errors.push(ValidationError::UnknownComponentType {
                    kind,
                    id: id.clone(),
                });
            }
        }
    }
}

fn check_component_configs(
    cfg: &AgentConfig,
    registry: &FactoryRegistry,
    errors: &mut Vec<ValidationError>,
) {
    for kind in ComponentKind::ALL {
        for (id, config) in cfg.components(kind) {
            let Some(factory) = registry.factory(kind, id.type_name()) else {
                // Already reported as an unknown type.
                continue;
            };
            if let Err(source) = factory.validate_config(config) {
                errors.push(ValidationError::InvalidComponent {
                    kind,
                    id: id.clone(),
                    source,
                });
            }
        }
    }
}
