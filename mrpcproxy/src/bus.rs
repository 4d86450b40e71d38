//! Outbound interface to the RPC fabric.

use async_trait::async_trait;
use bytes::Bytes;

/// A publish-on-topic, correlated-reply message bus.
///
/// The bridge handler applies the per-endpoint deadline externally with
/// `tokio::time::timeout`, so an implementation's `publish` future need only
/// resolve with the first reply; if the caller's timeout fires first, the
/// future is dropped and any later reply that would have resolved it is
/// simply never observed.
#[async_trait]
pub trait Bus: Send + Sync {
	/// Publishes `payload` on `topic` and awaits exactly one reply.
	async fn publish(&self, topic: &str, payload: Bytes) -> Result<Bytes, BusError>;
}

/// Failure talking to the bus itself (not a timeout, which is handled by
/// the caller's deadline, and not a malformed reply, which is a decode
/// failure once bytes are in hand).
#[derive(Debug, thiserror::Error)]
pub enum BusError {
	#[error("bus publish failed: {0}")]
	Publish(#[source] anyhow::Error),
}
