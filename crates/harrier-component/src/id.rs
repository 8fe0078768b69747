//! Component identity: kinds, signal types, and instance IDs.

use std::fmt;
use std::str::FromStr;

use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::ComponentError;

/// The closed set of component kinds an agent is assembled from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ComponentKind {
    Extension,
    Receiver,
    Processor,
    Exporter,
    Connector,
}

impl ComponentKind {
    /// All kinds, in registry iteration order.
    pub const ALL: [ComponentKind; 5] = [
        ComponentKind::Extension,
        ComponentKind::Receiver,
        ComponentKind::Processor,
        ComponentKind::Exporter,
        ComponentKind::Connector,
    ];

    /// The plural configuration section name for this kind.
    pub fn section(&self) -> &'static str {
        match self {
            ComponentKind::Extension => "extensions",
            ComponentKind::Receiver => "receivers",
            ComponentKind::Processor => "processors",
            ComponentKind::Exporter => "exporters",
            ComponentKind::Connector => "connectors",
        }
    }
}

impl fmt::Display for ComponentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ComponentKind::Extension => "extension",
            ComponentKind::Receiver => "receiver",
            ComponentKind::Processor => "processor",
            ComponentKind::Exporter => "exporter",
            ComponentKind::Connector => "connector",
        };
        write!(f, "{name}")
    }
}

impl FromStr for ComponentKind {
    type Err = ComponentError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "extension" => Ok(ComponentKind::Extension),
            "receiver" => Ok(ComponentKind::Receiver),
            "processor" => Ok(ComponentKind::Processor),
            "exporter" => Ok(ComponentKind::Exporter),
            "connector" => Ok(ComponentKind::Connector),
            other => Err(ComponentError::InvalidKind(other.to_string())),
        }
    }
}

/// Telemetry signal types a pipeline can carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum SignalType {
    Traces,
    Metrics,
    Logs,
}

impl SignalType {
    /// All signal types.
    pub const ALL: [SignalType; 3] = [SignalType::Traces, SignalType::Metrics, SignalType::Logs];
}

impl fmt::Display for SignalType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SignalType::Traces => "traces",
            SignalType::Metrics => "metrics",
            SignalType::Logs => "logs",
        };
        write!(f, "{name}")
    }
}

impl FromStr for SignalType {
    type Err = ComponentError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "traces" => Ok(SignalType::Traces),
            "metrics" => Ok(SignalType::Metrics),
            "logs" => Ok(SignalType::Logs),
            other => Err(ComponentError::InvalidSignal(other.to_string())),
        }
    }
}

/// Identifies one configured component instance: `type` or `type/name`.
///
/// The kind is carried by context (the configuration section or registry
/// the ID is used against), matching the shape of the config file.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ComponentId {
    type_name: String,
    instance: Option<String>,
}

impl ComponentId {
    /// An ID with no instance name (`otlp`).
    pub fn new(type_name: impl Into<String>) -> Self {
        Self {
            type_name: type_name.into(),
            instance: None,
        }
    }

    /// An ID with an instance name (`otlp/blue`).
    pub fn with_instance(type_name: impl Into<String>, instance: impl Into<String>) -> Self {
        Self {
            type_name: type_name.into(),
            instance: Some(instance.into()),
        }
    }

    /// Parse `type` or `type/name`.
    pub fn parse(raw: &str) -> Result<Self, ComponentError> {
        let invalid = |reason: &str| ComponentError::InvalidId {
            raw: raw.to_string(),
            reason: reason.to_string(),
        };

        let (type_name, instance) = match raw.split_once('/') {
            Some((type_name, instance)) => (type_name, Some(instance)),
            None => (raw, None),
        };

        if type_name.is_empty() {
            return Err(invalid("type name is empty"));
        }
        if !type_name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_')
        {
            return Err(invalid("type name must be alphanumeric or '_'"));
        }
        if let Some(instance) = instance
            && instance.is_empty()
        {
            return Err(invalid("instance name after '/' is empty"));
        }

        Ok(Self {
            type_name: type_name.to_string(),
            instance: instance.map(str::to_string),
        })
    }

    /// The component type, matched against factory registrations.
    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    /// The optional instance name distinguishing multiple configurations
    /// of the same type.
    pub fn instance(&self) -> Option<&str> {
        self.instance.as_deref()
    }
}

impl fmt::Display for ComponentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.instance {
            Some(instance) => write!(f, "{}/{instance}", self.type_name),
            None => write!(f, "{}", self.type_name),
        }
    }
}

impl FromStr for ComponentId {
    type Err = ComponentError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl Serialize for ComponentId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for ComponentId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Self::parse(&raw).map_err(D::Error::custom)
    }
}
