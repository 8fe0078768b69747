//! The compiled-in component set for this distribution.
//!
//! Every factory here owns a configuration schema only: defaults plus
//! validation. The data planes behind these names are external
//! collaborators wired in through the pipeline runtime, never implemented
//! in this repository.

pub mod connectors;
pub mod exporters;
pub mod extensions;
pub mod processors;
pub mod receivers;

use std::sync::Arc;

use harrier_component::FactoryLists;
use serde::Serialize;
use serde_yaml::Value;

/// The distribution's factory lists, built fresh per process start.
pub fn default_factories() -> FactoryLists {
    FactoryLists {
        extensions: vec![Arc::new(extensions::HealthCheckExtensionFactory)],
        receivers: vec![Arc::new(receivers::OtlpReceiverFactory)],
        processors: vec![
            Arc::new(processors::BatchProcessorFactory),
            Arc::new(processors::MemoryLimiterProcessorFactory),
        ],
        exporters: vec![
            Arc::new(exporters::DebugExporterFactory),
            Arc::new(exporters::OtlpExporterFactory),
            Arc::new(exporters::DatadogExporterFactory),
        ],
        connectors: vec![Arc::new(connectors::SpanMetricsConnectorFactory)],
    }
}

/// Render a default-config struct as a YAML value.
///
/// Serializing these plain structs cannot fail; an empty mapping is the
/// harmless fallback if it ever did.
pub(crate) fn yaml_value<T: Serialize>(value: &T) -> Value {
    serde_yaml::to_value(value).unwrap_or(Value::Mapping(Default::default()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use harrier_component::{ComponentKind, FactoryRegistry};

    #[test]
    fn test_default_factories_build_cleanly() {
        let registry = FactoryRegistry::build_checked(default_factories()).unwrap();
        assert_eq!(registry.type_names(ComponentKind::Receiver), vec!["otlp"]);
        assert_eq!(
            registry.type_names(ComponentKind::Exporter),
            vec!["datadog", "debug", "otlp"]
        );
        assert_eq!(
            registry.type_names(ComponentKind::Processor),
            vec!["batch", "memory_limiter"]
        );
        assert_eq!(
            registry.type_names(ComponentKind::Extension),
            vec!["health_check"]
        );
        assert_eq!(
            registry.type_names(ComponentKind::Connector),
            vec!["spanmetrics"]
        );
    }

    #[test]
    fn test_every_default_config_validates() {
        let registry = FactoryRegistry::build_checked(default_factories()).unwrap();
        for kind in ComponentKind::ALL {
            for type_name in registry.type_names(kind) {
                // The otlp exporter has no sensible default endpoint; its
                // required-field check is exercised in its own module.
                if kind == ComponentKind::Exporter && type_name == "otlp" {
                    continue;
                }
                let factory = registry.factory(kind, type_name).unwrap();
                factory
                    .validate_config(&factory.default_config())
                    .unwrap_or_else(|e| panic!("{kind} '{type_name}' default invalid: {e}"));
            }
        }
    }
}
