//! Receiver factories.

use harrier_component::{Factory, InvalidConfig, SignalType};
use serde::{Deserialize, Serialize};
use serde_yaml::Value;

use super::yaml_value;

/// OTLP receiver: gRPC and/or HTTP intake for all three signals.
pub struct OtlpReceiverFactory;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct OtlpReceiverConfig {
    protocols: OtlpProtocols,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct OtlpProtocols {
    grpc: Option<OtlpEndpoint>,
    http: Option<OtlpEndpoint>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct OtlpEndpoint {
    endpoint: String,
}

impl Default for OtlpProtocols {
    fn default() -> Self {
        Self {
            grpc: Some(OtlpEndpoint {
                endpoint: "0.0.0.0:4317".to_string(),
            }),
            http: Some(OtlpEndpoint {
                endpoint: "0.0.0.0:4318".to_string(),
            }),
        }
    }
}

impl Factory for OtlpReceiverFactory {
    fn type_name(&self) -> &str {
        "otlp"
    }

    fn default_config(&self) -> Value {
        yaml_value(&OtlpReceiverConfig::default())
    }

    fn validate_config(&self, config: &Value) -> Result<(), InvalidConfig> {
        let config: OtlpReceiverConfig = serde_yaml::from_value(config.clone())
            .map_err(|e| InvalidConfig::new(e.to_string()))?;

        let protocols = [&config.protocols.grpc, &config.protocols.http];
        if protocols.iter().all(|p| p.is_none()) {
            return Err(InvalidConfig::new(
                "at least one protocol (grpc or http) must be enabled",
            ));
        }
        for protocol in protocols.into_iter().flatten() {
            if protocol.endpoint.is_empty() {
                return Err(InvalidConfig::new("protocol endpoint must not be empty"));
            }
        }
        Ok(())
    }

    fn supported_signals(&self) -> &[SignalType] {
        &SignalType::ALL
    }
}
