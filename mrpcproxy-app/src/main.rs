//! CLI entry point: loads a YAML config, wires a bus client, serves HTTP
//! until a shutdown signal arrives.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::Context;
use bytes::Bytes;
use clap::Parser;
use mrpcproxy::{Bus, BusError};

#[derive(Debug, Parser)]
#[command(name = "mrpcproxy", about = "HTTP-to-message-bus proxy")]
struct Args {
	/// Path to the YAML config file (listen address, default headers, endpoints).
	#[arg(long)]
	config: PathBuf,

	/// Overrides the config file's listen address.
	#[arg(long)]
	addr: Option<SocketAddr>,

	/// How long to wait for in-flight requests during shutdown.
	#[arg(long, default_value = "5")]
	shutdown_seconds: u64,
}

/// Placeholder bus client used when no real RPC fabric is wired in.
///
/// The proxy core treats the message bus as an external collaborator whose
/// transport is out of scope; this always returns a 501 so the proxy is
/// runnable standalone, but production deployments are expected to supply
/// their own [`Bus`] over the library API instead of this binary.
struct UnimplementedBus;

#[async_trait::async_trait]
impl Bus for UnimplementedBus {
	async fn publish(&self, topic: &str, _payload: Bytes) -> Result<Bytes, BusError> {
		Err(BusError::Publish(anyhow::anyhow!(
			"no bus client configured for topic {topic}"
		)))
	}
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
	mrpc_core::telemetry::init_logging();
	let args = Args::parse();

	let raw = mrpcproxy::config::RawConfig::from_file(&args.config)
		.with_context(|| format!("loading config from {}", args.config.display()))?;
	let addr = args.addr.unwrap_or(raw.listen);
	let mut options = raw
		.into_options()
		.context("translating config into functional options")?;
	options.push(Box::new(|builder: &mut mrpcproxy::ProxyBuilder| {
		builder.with_bus(std::sync::Arc::new(UnimplementedBus));
		Ok(())
	}));

	let proxy = mrpcproxy::build(addr, options).map_err(anyhow::Error::from)?;
	let bound = proxy.serve().await.context("binding listener")?;
	tracing::info!(addr = %bound.local_addr(), "mrpcproxy listening");

	let shutdown = mrpc_core::signal::Shutdown::new();
	shutdown.wait().await;
	tracing::info!("shutdown signal received, draining in-flight requests");
	bound.stop(Duration::from_secs(args.shutdown_seconds)).await?;
	Ok(())
}
