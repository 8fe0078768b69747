//! Typed configuration and agent lifecycle for Harrier.
//!
//! Takes a merged value tree the rest of the way to a running agent:
//!
//! ```text
//! Confmap ─▶ materialize ─▶ AgentConfig ─▶ inject_exporter ─▶ validate ─▶ Agent::run
//!                 (uses FactoryRegistry)        (override)     (aggregated)
//! ```
//!
//! The pipeline execution engine itself sits behind the
//! [`PipelineRuntime`] trait; this crate drives its lifecycle and never
//! touches telemetry data.

pub mod agent;
pub mod config;
pub mod inject;
pub mod materializer;
pub mod runtime;
pub mod validate;

pub use agent::{Agent, AgentError, AgentState, ShutdownHandle};
pub use config::{
    AgentConfig, BuildInfo, PipelineSpec, ServiceSettings, TelemetryLogs, TelemetrySettings,
    pipeline_signal,
};
pub use inject::{DD_API_KEY_ENV, DatadogOverride, inject_exporter};
pub use materializer::{MaterializeError, materialize};
pub use runtime::{DEFAULT_DRAIN_TIMEOUT, PipelineHost, PipelineRuntime, RuntimeError};
pub use validate::{ValidationError, ValidationErrors, validate};
