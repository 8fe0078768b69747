//! Decodes a merged value tree into the typed configuration graph.
//!
//! Structural problems (unknown sections, malformed IDs) fail fast here;
//! referential problems (unknown types, dangling references) are left for
//! the validator so they can be reported aggregated.

use std::collections::BTreeMap;

use harrier_component::{ComponentError, ComponentId, ComponentKind, FactoryRegistry};
use harrier_confmap::Confmap;
use serde_yaml::{Mapping, Value};
use tracing::debug;

use crate::config::{AgentConfig, ServiceSettings};

/// Errors that can occur while materializing a resolved tree.
#[derive(Debug, thiserror::Error)]
pub enum MaterializeError {
    /// The tree has a top-level section this agent does not know.
    #[error("unknown top-level section '{0}'")]
    UnknownSection(String),

    /// A component section is not a mapping of id to config.
    #[error("section '{0}' must be a mapping of component ids to configs")]
    SectionNotAMapping(String),

    /// A component key failed to parse as `type[/instance]`.
    #[error("in section '{section}': {source}")]
    InvalidComponentId {
        section: String,
        source: ComponentError,
    },

    /// A component's config is neither a mapping nor empty.
    #[error("config for '{id}' in section '{section}' must be a mapping or empty")]
    ComponentConfigNotAMapping { section: String, id: ComponentId },

    /// The `service` section failed to decode.
    #[error("invalid service section: {0}")]
    InvalidService(String),
}

/// Decode a merged tree into an [`AgentConfig`].
///
/// Each declared component's config is completed by merging it on top of
/// its factory's defaults, so downstream consumers never see missing
/// fields. Components whose type has no registered factory are kept as-is
/// for the validator to report.
pub fn materialize(
    confmap: Confmap,
    registry: &FactoryRegistry,
) -> Result<AgentConfig, MaterializeError> {
    let mut config = AgentConfig::default();

    for (key, value) in confmap.iter() {
        let section = key.as_str().unwrap_or_default();
        match section {
            "extensions" | "receivers" | "processors" | "exporters" | "connectors" => {
                let kind = section_kind(section);
                *config.components_mut(kind) =
                    materialize_section(section, kind, value.clone(), registry)?;
            }
            "service" => {
                config.service = materialize_service(value.clone())?;
            }
            other => return Err(MaterializeError::UnknownSection(other.to_string())),
        }
    }

    debug!(
        receivers = config.receivers.len(),
        processors = config.processors.len(),
        exporters = config.exporters.len(),
        pipelines = config.service.pipelines.len(),
        "configuration materialized"
    );

    Ok(config)
}

fn section_kind(section: &str) -> ComponentKind {
    match section {
        "extensions" => ComponentKind::Extension,
        "receivers" => ComponentKind::Receiver,
        "processors" => ComponentKind::Processor,
        "exporters" => ComponentKind::Exporter,
        "connectors" => ComponentKind::Connector,
        other => unreachable!("not a component section: {other}"),
    }
}

fn materialize_section(
    section: &str,
    kind: ComponentKind,
    value: Value,
    registry: &FactoryRegistry,
) -> Result<BTreeMap<ComponentId, Value>, MaterializeError> {
    let entries = match value {
        Value::Null => Mapping::new(),
        Value::Mapping(entries) => entries,
        _ => return Err(MaterializeError::SectionNotAMapping(section.to_string())),
    };

    let mut components = BTreeMap::new();
    for (key, config) in entries {
        let raw = key.as_str().unwrap_or_default();
        let id = ComponentId::parse(raw).map_err(|source| MaterializeError::InvalidComponentId {
            section: section.to_string(),
            source,
        })?;

        if !matches!(config, Value::Null | Value::Mapping(_)) {
            return Err(MaterializeError::ComponentConfigNotAMapping {
                section: section.to_string(),
                id,
            });
        }

        let complete = match registry.factory(kind, id.type_name()) {
            Some(factory) => merge_values(factory.default_config(), config),
            // Unknown type: keep the user's config so validation can name it.
            None => config,
        };
        components.insert(id, complete);
    }

    Ok(components)
}

fn materialize_service(value: Value) -> Result<ServiceSettings, MaterializeError> {
    serde_yaml::from_value(value).map_err(|e| MaterializeError::InvalidService(e.to_string()))
}

/// Right-biased merge of two config values: `over` wins, nested mappings
/// merge recursively, key order is preserved.
fn merge_values(base: Value, over: Value) -> Value {
    match (base, over) {
        (base, Value::Null) => base,
        (Value::Mapping(mut base), Value::Mapping(over)) => {
            for (key, incoming) in over {
                let merged = match base.get_mut(&key) {
                    Some(existing) => merge_values(existing.clone(), incoming),
                    None => incoming,
                };
                base.insert(key, merged);
            }
            Value::Mapping(base)
        }
        (_, over) => over,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use harrier_component::{Factory, FactoryLists, InvalidConfig, SignalType};
    use std::sync::Arc;

    struct TestFactory {
        name: &'static str,
        defaults: &'static str,
    }

    impl Factory for TestFactory {
        fn type_name(&self) -> &str {
            self.name
        }

        fn default_config(&self) -> Value {
            serde_yaml::from_str(self.defaults).unwrap()
        }

        fn validate_config(&self, _config: &Value) -> Result<(), InvalidConfig> {
            Ok(())
        }

        fn supported_signals(&self) -> &[SignalType] {
            &SignalType::ALL
        }
    }

    fn registry() -> FactoryRegistry {
        FactoryRegistry::build_checked(FactoryLists {
            receivers: vec![Arc::new(TestFactory {
                name: "otlp",
                defaults: "endpoint: 0.0.0.0:4317\ntimeout: 10\n",
            })],
            exporters: vec![Arc::new(TestFactory {
                name: "debug",
                defaults: "verbosity: basic\n",
            })],
            ..Default::default()
        })
        .unwrap()
    }

    fn tree(yaml: &str) -> Confmap {
        Confmap::parse_yaml(yaml).unwrap()
    }

    #[test]
    fn test_materialize_merges_factory_defaults() {
        let cfg = materialize(
            tree("receivers:\n  otlp:\n    timeout: 30\nservice:\n  pipelines: {}\n"),
            &registry(),
        )
        .unwrap();

        let otlp = &cfg.receivers[&ComponentId::new("otlp")];
        // User value wins, untouched defaults survive.
        assert_eq!(otlp.get("timeout"), Some(&Value::from(30)));
        assert_eq!(
            otlp.get("endpoint").and_then(Value::as_str),
            Some("0.0.0.0:4317")
        );
    }

    #[test]
    fn test_materialize_empty_component_gets_defaults() {
        let cfg = materialize(tree("exporters:\n  debug:\n"), &registry()).unwrap();
        let debug = &cfg.exporters[&ComponentId::new("debug")];
        assert_eq!(debug.get("verbosity").and_then(Value::as_str), Some("basic"));
    }

    #[test]
    fn test_materialize_unknown_type_kept_for_validation() {
        let cfg = materialize(tree("exporters:\n  kafka:\n    brokers: [k1]\n"), &registry())
            .unwrap();
        assert!(cfg.exporters.contains_key(&ComponentId::new("kafka")));
    }

    #[test]
    fn test_materialize_unknown_section_fails() {
        let err = materialize(tree("recievers: {}\n"), &registry()).unwrap_err();
        assert!(matches!(err, MaterializeError::UnknownSection(s) if s == "recievers"));
    }

    #[test]
    fn test_materialize_invalid_component_id_fails() {
        let err = materialize(tree("receivers:\n  'otlp/': {}\n"), &registry()).unwrap_err();
        assert!(matches!(err, MaterializeError::InvalidComponentId { .. }));
    }

    #[test]
    fn test_materialize_scalar_component_config_fails() {
        let err = materialize(tree("receivers:\n  otlp: 42\n"), &registry()).unwrap_err();
        assert!(matches!(
            err,
            MaterializeError::ComponentConfigNotAMapping { .. }
        ));
    }

    #[test]
    fn test_materialize_service_section() {
        let cfg = materialize(
            tree(
                "service:\n  pipelines:\n    traces:\n      receivers: [otlp]\n      exporters: [debug]\n",
            ),
            &registry(),
        )
        .unwrap();
        assert!(cfg.service.pipelines.contains_key("traces"));
    }

    #[test]
    fn test_materialize_instance_named_components() {
        let cfg = materialize(
            tree("exporters:\n  debug/verbose:\n    verbosity: detailed\n"),
            &registry(),
        )
        .unwrap();
        let id = ComponentId::with_instance("debug", "verbose");
        assert_eq!(
            cfg.exporters[&id].get("verbosity").and_then(Value::as_str),
            Some("detailed")
        );
    }
}
