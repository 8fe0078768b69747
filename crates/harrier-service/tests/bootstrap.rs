//! End-to-end bootstrap: resolve → materialize → inject → validate → run.

use std::sync::Arc;
use std::time::Duration;

use harrier_component::{
    ComponentId, Factory, FactoryLists, FactoryRegistry, InvalidConfig, SignalType,
};
use harrier_confmap::{ConfigUri, ExpandConverter, FileProvider, Resolver, SchemeRegistry};
use harrier_service::{
    Agent, AgentState, BuildInfo, DatadogOverride, inject_exporter, materialize, validate,
};
use serde_yaml::Value;

struct PlainFactory {
    name: &'static str,
}

impl Factory for PlainFactory {
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

fn factory(name: &'static str) -> Arc<dyn Factory> {
    Arc::new(PlainFactory { name })
}

fn registry() -> FactoryRegistry {
    FactoryRegistry::build_checked(FactoryLists {
        receivers: vec![factory("otlp")],
        processors: vec![factory("batch")],
        exporters: vec![factory("debug"), factory("datadog")],
        ..Default::default()
    })
    .unwrap()
}

const CONFIG: &str = r"
receivers:
  otlp:
exporters:
  debug:
service:
  pipelines:
    traces:
      receivers: [otlp]
      exporters: [debug]
";

async fn bootstrap(path: &str) -> harrier_service::AgentConfig {
    let mut schemes = SchemeRegistry::new();
    schemes.register(Arc::new(FileProvider::new())).unwrap();

    let mut resolver = Resolver::new(
        schemes,
        vec![ConfigUri::parse(path)],
        vec![Box::new(ExpandConverter::with_lookup(|_| None))],
    );
    let confmap = resolver.resolve().await.unwrap();

    let registry = registry();
    let mut cfg = materialize(confmap, &registry).unwrap();

    let policy = DatadogOverride::default();
    inject_exporter(
        &mut cfg,
        &DatadogOverride::id(),
        policy.to_config().unwrap(),
        &SignalType::ALL,
    );

    validate(&cfg, &registry).unwrap();
    cfg
}

#[tokio::test]
async fn test_bootstrap_wires_injected_exporter() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.yaml");
    std::fs::write(&path, CONFIG).unwrap();

    let cfg = bootstrap(path.to_str().unwrap()).await;

    // The traces pipeline fans out to both the declared and the injected
    // exporter, and the injected config passed the same validation pass.
    assert_eq!(
        cfg.service.pipelines["traces"].exporters,
        vec![ComponentId::new("debug"), ComponentId::new("datadog")]
    );
    assert!(cfg.exporters.contains_key(&ComponentId::new("datadog")));
}

#[tokio::test]
async fn test_bootstrap_is_reproducible() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.yaml");
    std::fs::write(&path, CONFIG).unwrap();

    let first = bootstrap(path.to_str().unwrap()).await;
    let second = bootstrap(path.to_str().unwrap()).await;
    assert_eq!(first, second);
}

#[tokio::test]
async fn test_bootstrapped_agent_runs_and_stops() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.yaml");
    std::fs::write(&path, CONFIG).unwrap();

    let cfg = bootstrap(path.to_str().unwrap()).await;
    let registry = registry();

    let mut agent = Agent::new(&cfg, &registry, BuildInfo::new("harrier", "0.1.0")).unwrap();
    let handle = agent.shutdown_handle();

    let run = tokio::spawn(async move {
        let result = agent.run().await;
        (agent, result)
    });

    // Let the pipelines spin up, then request shutdown like the signal
    // task would.
    tokio::time::sleep(Duration::from_millis(50)).await;
    handle.trigger();

    let (agent, result) = tokio::time::timeout(Duration::from_secs(10), run)
        .await
        .expect("shutdown must complete within the drain bound")
        .unwrap();
    assert!(result.is_ok());
    assert_eq!(agent.state(), AgentState::Stopped);

    // A later trigger is a no-op.
    handle.trigger();
}
