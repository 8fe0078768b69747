//! Integration tests for multi-source resolution.

use std::sync::Arc;

use harrier_confmap::{
    ConfigUri, Converter, ExpandConverter, FileProvider, Resolver, SchemeRegistry, YamlProvider,
};
use serde_yaml::Value;

fn registry() -> SchemeRegistry {
    let mut registry = SchemeRegistry::new();
    registry.register(Arc::new(FileProvider::new())).unwrap();
    registry.register(Arc::new(YamlProvider)).unwrap();
    registry
}

#[tokio::test]
async fn test_file_source_with_inline_override() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.yaml");
    std::fs::write(
        &path,
        "receivers:\n  otlp: {}\nexporters:\n  debug:\n    verbosity: basic\n",
    )
    .unwrap();

    let uris = vec![
        ConfigUri::parse(path.to_str().unwrap()),
        ConfigUri::parse("yaml:{exporters: {debug: {verbosity: detailed}}}"),
    ];
    let mut resolver = Resolver::new(registry(), uris, Vec::new());
    let map = resolver.resolve().await.unwrap();

    // Later URI wins on the overlapping key, file-only keys survive.
    assert_eq!(
        map.get("exporters.debug.verbosity").and_then(Value::as_str),
        Some("detailed")
    );
    assert!(map.contains("receivers.otlp"));
}

#[tokio::test]
async fn test_repeated_resolution_is_identical() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.yaml");
    std::fs::write(&path, "service:\n  pipelines:\n    traces:\n      receivers: [otlp]\n")
        .unwrap();

    let uris = vec![ConfigUri::parse(path.to_str().unwrap())];
    let converters = || -> Vec<Box<dyn Converter>> {
        vec![Box::new(ExpandConverter::with_lookup(|_| None))]
    };

    let mut resolver = Resolver::new(registry(), uris.clone(), converters());
    let first = resolver.resolve().await.unwrap();
    let second = resolver.resolve().await.unwrap();
    assert_eq!(first, second);

    let mut fresh = Resolver::new(registry(), uris, converters());
    assert_eq!(first, fresh.resolve().await.unwrap());
}

#[tokio::test]
async fn test_file_change_signals_re_resolve() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.yaml");
    std::fs::write(&path, "a: 1\n").unwrap();

    let mut registry = SchemeRegistry::new();
    registry
        .register(Arc::new(FileProvider::with_debounce(
            std::time::Duration::from_millis(50),
        )))
        .unwrap();

    let uris = vec![ConfigUri::parse(path.to_str().unwrap())];
    let mut resolver = Resolver::new(registry, uris, Vec::new());

    let before = resolver.resolve().await.unwrap();
    assert_eq!(before.get("a"), Some(&Value::from(1)));

    std::fs::write(&path, "a: 2\n").unwrap();

    let signal = tokio::time::timeout(std::time::Duration::from_secs(5), resolver.watch())
        .await
        .expect("expected a change signal");
    assert!(signal.is_ok());

    let after = resolver.resolve().await.unwrap();
    assert_eq!(after.get("a"), Some(&Value::from(2)));
}
