//! The factory contract: a named constructor for one component type.
//!
//! Factories own the configuration schema for their type: a default
//! config plus a validation pass. They also declare which telemetry
//! signals the component can participate in. The data plane behind a
//! factory is an external collaborator; nothing here touches telemetry
//! itself.

use serde_yaml::Value;

use crate::id::SignalType;

/// A component config rejected by its factory's validation.
#[derive(Debug, Clone, thiserror::Error)]
#[error("{0}")]
pub struct InvalidConfig(String);

impl InvalidConfig {
    pub fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }
}

/// Named constructor + config validator for one component type within one
/// kind's registry.
pub trait Factory: Send + Sync {
    /// The type name this factory registers under (`otlp`, `batch`, ...).
    fn type_name(&self) -> &str;

    /// The complete default configuration for this type.
    ///
    /// Materialization merges user-supplied values on top of this, so every
    /// stored component config is fully populated.
    fn default_config(&self) -> Value;

    /// Validate a fully merged config for this type.
    fn validate_config(&self, config: &Value) -> Result<(), InvalidConfig>;

    /// Signal types the component can participate in.
    fn supported_signals(&self) -> &[SignalType];
}

#[cfg(test)]
pub(crate) mod testing {
    use super::*;

    /// Minimal factory for registry tests.
    pub struct StubFactory {
        pub name: &'static str,
    }

    impl Factory for StubFactory {
        fn type_name(&self) -> &str {
            self.name
        }

        fn default_config(&self) -> Value {
            Value::Null
        }

        fn validate_config(&self, _config: &Value) -> Result<(), InvalidConfig> {
            Ok(())
        }

        fn supported_signals(&self) -> &[SignalType] {
            &SignalType::ALL
        }
    }
}
