//! The agent lifecycle controller.
//!
//! Drives the state machine `Created → Running → ShuttingDown → Stopped`
//! with no re-entry and no skipped states. Shutdown is triggered either by
//! a [`ShutdownHandle`] (typically fired from an interrupt-signal task) or
//! by a fatal error reported from the pipeline runtime; either way the
//! controller drains the runtime and returns control to the caller.

use std::fmt;

use harrier_component::FactoryRegistry;
use tokio::sync::mpsc;
use tracing::{error, info};

use crate::config::{AgentConfig, BuildInfo};
use crate::runtime::{PipelineHost, PipelineRuntime, RuntimeError};

/// Lifecycle states.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AgentState {
    Created,
    Running,
    ShuttingDown,
    Stopped,
}

impl fmt::Display for AgentState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            AgentState::Created => "created",
            AgentState::Running => "running",
            AgentState::ShuttingDown => "shutting-down",
            AgentState::Stopped => "stopped",
        };
        write!(f, "{name}")
    }
}

/// Errors from driving the agent lifecycle.
#[derive(Debug, thiserror::Error)]
pub enum AgentError {
    /// An illegal state transition was attempted.
    #[error("invalid lifecycle transition from {from} to {to}")]
    LifecycleTransition { from: AgentState, to: AgentState },

    /// The runtime failed to start, run, or shut down.
    #[error(transparent)]
    Runtime(#[from] RuntimeError),
}

/// Cloneable trigger that requests agent shutdown.
///
/// Firing it after shutdown has already been requested, or after the
/// agent has stopped, is a no-op, so a second interrupt signal never
/// repeats shutdown work.
#[derive(Clone)]
pub struct ShutdownHandle {
    tx: mpsc::Sender<()>,
}

impl ShutdownHandle {
    /// Request shutdown.
    pub fn trigger(&self) {
        let _ = self.tx.try_send(());
    }
}

/// The telemetry agent: a runtime plus its lifecycle state machine.
pub struct Agent {
    state: AgentState,
    runtime: Box<dyn PipelineRuntime>,
    build_info: BuildInfo,
    shutdown_tx: mpsc::Sender<()>,
    shutdown_rx: mpsc::Receiver<()>,
}

impl Agent {
    /// Construct an agent from a validated configuration and registry.
    pub fn new(
        cfg: &AgentConfig,
        registry: &FactoryRegistry,
        build_info: BuildInfo,
    ) -> Result<Self, AgentError> {
        let runtime = PipelineHost::new(cfg, registry)?;
        Ok(Self::with_runtime(Box::new(runtime), build_info))
    }

    /// Construct an agent over any runtime implementation.
    pub fn with_runtime(runtime: Box<dyn PipelineRuntime>, build_info: BuildInfo) -> Self {
        let (shutdown_tx, shutdown_rx) = mpsc::channel(1);
        Self {
            state: AgentState::Created,
            runtime,
            build_info,
            shutdown_tx,
            shutdown_rx,
        }
    }

    /// Current lifecycle state.
    pub fn state(&self) -> AgentState {
        self.state
    }

    /// A trigger for requesting shutdown from another task.
    pub fn shutdown_handle(&self) -> ShutdownHandle {
        ShutdownHandle {
            tx: self.shutdown_tx.clone(),
        }
    }

    /// Run the agent until shutdown is requested or the runtime fails.
    ///
    /// Blocks through the whole lifecycle: starts the runtime, waits for a
    /// shutdown trigger or a fatal runtime error, drains, and returns once
    /// the agent is stopped. A fresh agent is required for another run.
    pub async fn run(&mut self) -> Result<(), AgentError> {
        self.transition(AgentState::Running)?;
        info!(
            command = %self.build_info.command,
            version = %self.build_info.version,
            "agent starting"
        );

        let (fatal_tx, mut fatal_rx) = mpsc::channel(1);
        if let Err(err) = self.runtime.start(fatal_tx).await {
            self.drain()?;
            return Err(err.into());
        }

        let failure = tokio::select! {
            _ = self.shutdown_rx.recv() => {
                info!("shutdown requested");
                None
            }
            Some(err) = fatal_rx.recv() => {
                error!(error = %err, "fatal runtime error, shutting down");
                Some(err)
            }
        };

        self.transition(AgentState::ShuttingDown)?;
        let shutdown_result = self.runtime.shutdown().await;
        self.transition(AgentState::Stopped)?;
        info!("agent stopped");

        match failure {
            Some(err) => Err(err.into()),
            None => shutdown_result.map_err(Into::into),
        }
    }

    /// Drive the remaining transitions after a failed start, so the agent
    /// still ends in `Stopped`.
    fn drain(&mut self) -> Result<(), AgentError> {
        self.transition(AgentState::ShuttingDown)?;
        self.transition(AgentState::Stopped)
    }

    fn transition(&mut self, to: AgentState) -> Result<(), AgentError> {
        let legal = matches!(
            (self.state, to),
            (AgentState::Created, AgentState::Running)
                | (AgentState::Running, AgentState::ShuttingDown)
                | (AgentState::ShuttingDown, AgentState::Stopped)
        );
        if !legal {
            return Err(AgentError::LifecycleTransition {
                from: self.state,
                to,
            });
        }
        info!(from = %self.state, to = %to, "lifecycle transition");
        self.state = to;
        Ok(())
    }
}
