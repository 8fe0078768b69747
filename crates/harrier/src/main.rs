//! Harrier - telemetry agent distribution.
//!
//! Process entry: resolve the configuration source, build the component
//! registry, inject the Datadog exporter override, validate, and run the
//! agent until an interrupt signal or a fatal error stops it. Any failure
//! before the agent is running exits non-zero; a graceful shutdown exits
//! zero.

use anyhow::Context;
use clap::Parser;

use harrier_component::{FactoryRegistry, SignalType};
use harrier_confmap::{ConfigUri, ExpandConverter, Resolver, SchemeRegistry};
use harrier_service::{
    Agent, BuildInfo, DatadogOverride, inject_exporter, materialize, validate,
};

mod components;

/// Harrier - telemetry agent distribution
#[derive(Parser)]
#[command(name = "harrier")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Configuration source URI (bare paths resolve as file:)
    #[arg(short, long, env = "HARRIER_CONFIG", default_value = "file:config.yaml")]
    config: String,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize tracing — console, env-filter driven
    let filter = if cli.verbose {
        "harrier=debug,harrier_confmap=debug,harrier_component=debug,harrier_service=debug,info"
    } else {
        "harrier=info,harrier_confmap=info,harrier_component=info,harrier_service=info,warn"
    };

    use tracing_subscriber::prelude::*;
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(true)
                .with_filter(tracing_subscriber::EnvFilter::new(filter)),
        )
        .init();

    // ── Resolve configuration ───────────────────────────────────────────

    let uri = ConfigUri::parse(&cli.config);
    tracing::info!(uri = %uri, "resolving configuration");

    let mut resolver = Resolver::new(
        SchemeRegistry::standard(),
        vec![uri],
        vec![Box::new(ExpandConverter::new())],
    );
    let confmap = resolver
        .resolve()
        .await
        .context("configuration resolution failed")?;

    // ── Build the factory registry ──────────────────────────────────────

    let registry = FactoryRegistry::build_checked(components::default_factories())
        .context("component registry build failed")?;

    // ── Materialize, inject, validate ───────────────────────────────────

    let mut config =
        materialize(confmap, &registry).context("configuration materialization failed")?;

    let policy = DatadogOverride::from_env();
    inject_exporter(
        &mut config,
        &DatadogOverride::id(),
        policy.to_config()?,
        &SignalType::ALL,
    );

    validate(&config, &registry).context("configuration validation failed")?;

    // ── Run until interrupted ───────────────────────────────────────────

    let build_info = BuildInfo::new("harrier", env!("CARGO_PKG_VERSION"));
    let mut agent = Agent::new(&config, &registry, build_info)?;

    let shutdown = agent.shutdown_handle();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::info!("interrupt received, shutting down");
            shutdown.trigger();
        }
    });

    agent.run().await?;
    Ok(())
}
