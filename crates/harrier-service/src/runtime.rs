//! The pipeline execution seam.
//!
//! Everything that actually moves telemetry lives behind
//! [`PipelineRuntime`]; the lifecycle controller only ever starts it,
//! hears about fatal errors, and shuts it down. [`PipelineHost`] is the
//! in-process stand-in: it assembles the pipeline plans from the validated
//! configuration, runs one tracked task per pipeline, and drains them on
//! shutdown bounded by a timeout.

use std::time::Duration;

use async_trait::async_trait;
use harrier_component::{ComponentId, ComponentKind, FactoryRegistry, SignalType};
use tokio::sync::{mpsc, watch};
use tokio::task::JoinSet;
use tracing::{info, warn};

use crate::config::{AgentConfig, pipeline_signal};

/// Default bound on waiting for in-flight data to drain.
pub const DEFAULT_DRAIN_TIMEOUT: Duration = Duration::from_secs(10);

/// Errors surfaced by a pipeline runtime.
#[derive(Debug, thiserror::Error)]
pub enum RuntimeError {
    /// A pipeline could not be assembled from the configuration.
    #[error("failed to assemble pipeline '{pipeline}': {message}")]
    Assembly { pipeline: String, message: String },

    /// A running pipeline failed unrecoverably.
    #[error("pipeline '{pipeline}' failed: {message}")]
    PipelineFailed { pipeline: String, message: String },
}

/// The opaque execution engine contract.
///
/// `start` returns once all pipelines are executing; unrecoverable
/// failures after that are reported on the `fatal` channel. `shutdown`
/// must return even if draining is incomplete.
#[async_trait]
pub trait PipelineRuntime: Send {
    async fn start(&mut self, fatal: mpsc::Sender<RuntimeError>) -> Result<(), RuntimeError>;
    async fn shutdown(&mut self) -> Result<(), RuntimeError>;
}

/// Execution plan for one pipeline.
#[derive(Debug, Clone)]
struct PipelinePlan {
    name: String,
    signal: SignalType,
    receivers: Vec<ComponentId>,
    processors: Vec<ComponentId>,
    exporters: Vec<ComponentId>,
}

/// In-process pipeline runtime.
#[derive(Debug)]
pub struct PipelineHost {
    plans: Vec<PipelinePlan>,
    drain_timeout: Duration,
    stop_tx: watch::Sender<bool>,
    tasks: JoinSet<()>,
}

impl PipelineHost {
    /// Assemble a host from a validated configuration.
    ///
    /// Resolves every pipeline's components against the registry and
    /// rejects exporters that cannot carry the pipeline's signal type.
    pub fn new(cfg: &AgentConfig, registry: &FactoryRegistry) -> Result<Self, RuntimeError> {
        Self::with_drain_timeout(cfg, registry, DEFAULT_DRAIN_TIMEOUT)
    }

    /// Assemble a host with a custom drain bound.
    pub fn with_drain_timeout(
        cfg: &AgentConfig,
        registry: &FactoryRegistry,
        drain_timeout: Duration,
    ) -> Result<Self, RuntimeError> {
        let mut plans = Vec::with_capacity(cfg.service.pipelines.len());

        for (name, pipeline) in &cfg.service.pipelines {
            let assembly = |message: String| RuntimeError::Assembly {
                pipeline: name.clone(),
                message,
            };

            let signal = pipeline_signal(name)
                .ok_or_else(|| assembly("name does not select a signal type".to_string()))?;

            for id in &pipeline.exporters {
                let factory = registry
                    .factory(ComponentKind::Exporter, id.type_name())
                    .or_else(|| registry.factory(ComponentKind::Connector, id.type_name()))
                    .ok_or_else(|| assembly(format!("no factory for exporter '{id}'")))?;
                if !factory.supported_signals().contains(&signal) {
                    return Err(assembly(format!(
                        "exporter '{id}' does not support {signal}"
                    )));
                }
            }

            plans.push(PipelinePlan {
                name: name.clone(),
                signal,
                receivers: pipeline.receivers.clone(),
                processors: pipeline.processors.clone(),
                exporters: pipeline.exporters.clone(),
            });
        }

        let (stop_tx, _) = watch::channel(false);
        Ok(Self {
            plans,
            drain_timeout,
            stop_tx,
            tasks: JoinSet::new(),
        })
    }

    /// Number of assembled pipelines.
    pub fn pipeline_count(&self) -> usize {
        self.plans.len()
    }
}

/// One pipeline's run loop: report startup, then hold until stopped.
async fn run_pipeline(
    plan: PipelinePlan,
    mut stop_rx: watch::Receiver<bool>,
) -> Result<(), RuntimeError> {
    info!(
        pipeline = %plan.name,
        signal = %plan.signal,
        receivers = plan.receivers.len(),
        processors = plan.processors.len(),
        exporters = plan.exporters.len(),
        "pipeline running"
    );

    while !*stop_rx.borrow_and_update() {
        if stop_rx.changed().await.is_err() {
            // Host dropped without shutdown; stop quietly.
            break;
        }
    }

    info!(pipeline = %plan.name, "pipeline drained");
    Ok(())
}

#[async_trait]
impl PipelineRuntime for PipelineHost {
    async fn start(&mut self, fatal: mpsc::Sender<RuntimeError>) -> Result<(), RuntimeError> {
        for plan in &self.plans {
            let plan = plan.clone();
            let stop_rx = self.stop_tx.subscribe();
            let fatal = fatal.clone();
            self.tasks.spawn(async move {
                if let Err(err) = run_pipeline(plan, stop_rx).await {
                    let _ = fatal.send(err).await;
                }
            });
        }
        Ok(())
    }

    async fn shutdown(&mut self) -> Result<(), RuntimeError> {
        let _ = self.stop_tx.send(true);

        let drain = async {
            while self.tasks.join_next().await.is_some() {}
        };
        if tokio::time::timeout(self.drain_timeout, drain).await.is_err() {
            warn!(
                timeout_secs = self.drain_timeout.as_secs(),
                "drain timeout elapsed, aborting remaining pipelines"
            );
            self.tasks.abort_all();
            while self.tasks.join_next().await.is_some() {}
        }

        Ok(())
    }
}
