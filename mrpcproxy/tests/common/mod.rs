//! Shared test fixtures: a controllable in-process bus and an in-memory
//! sink.

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use bytes::Bytes;
use mrpcproxy::{Bus, BusError, ProxyBuilder};

/// Per-topic scripted reply used by [`FakeBus`].
#[derive(Clone)]
pub enum Scripted {
	/// Replies immediately with the given raw bytes.
	Reply(Bytes),
	/// Replies with the given raw bytes after a delay.
	Delayed(Duration, Bytes),
	/// Never replies (the caller's timeout is expected to fire).
	Never,
	/// The bus transport itself fails.
	TransportError,
}

/// A `Bus` whose per-topic behavior is fixed ahead of time by the test.
#[derive(Default, Clone)]
pub struct FakeBus {
	scripts: Arc<Mutex<HashMap<String, Scripted>>>,
	published: Arc<Mutex<HashMap<String, Bytes>>>,
}

impl FakeBus {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn on(self, topic: impl Into<String>, script: Scripted) -> Self {
		self.scripts.lock().unwrap().insert(topic.into(), script);
		self
	}

	/// The raw bytes most recently published on `topic`, if any.
	pub fn last_published(&self, topic: &str) -> Option<Bytes> {
		self.published.lock().unwrap().get(topic).cloned()
	}
}

#[async_trait::async_trait]
impl Bus for FakeBus {
	async fn publish(&self, topic: &str, payload: Bytes) -> Result<Bytes, BusError> {
		self.published.lock().unwrap().insert(topic.to_string(), payload);
		let script = self.scripts.lock().unwrap().get(topic).cloned();
		match script {
			Some(Scripted::Reply(bytes)) => Ok(bytes),
			Some(Scripted::Delayed(delay, bytes)) => {
				tokio::time::sleep(delay).await;
				Ok(bytes)
			},
			Some(Scripted::Never) => std::future::pending().await,
			Some(Scripted::TransportError) => {
				Err(BusError::Publish(anyhow::anyhow!("transport failure")))
			},
			None => Err(BusError::Publish(anyhow::anyhow!("no script for {topic}"))),
		}
	}
}

/// An in-memory [`mrpcproxy::Sink`] that records each line for assertions.
#[derive(Default, Clone)]
pub struct RecordingSink {
	lines: Arc<Mutex<Vec<String>>>,
}

impl RecordingSink {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn lines(&self) -> Vec<String> {
		self.lines.lock().unwrap().clone()
	}
}

impl mrpcproxy::Sink for RecordingSink {
	fn println(&self, line: &str) {
		self.lines.lock().unwrap().push(line.to_string());
	}
}

/// Builds a [`ProxyBuilder`] with recording sinks already installed, and
/// returns it alongside handles to the three sinks for assertions.
pub fn builder_with_sinks() -> (ProxyBuilder, RecordingSink, RecordingSink, RecordingSink) {
	let mut builder = ProxyBuilder::new();
	let access = RecordingSink::new();
	let debug = RecordingSink::new();
	let request = RecordingSink::new();
	builder.access_sink = Arc::new(access.clone());
	builder.debug_sink = Arc::new(debug.clone());
	builder.request_sink = Arc::new(request.clone());
	(builder, access, debug, request)
}

pub fn local_addr() -> SocketAddr {
	"127.0.0.1:0".parse().unwrap()
}

/// An [`mrpcproxy::IdGenerator`] returning a single fixed id, for
/// deterministic access-sink assertions.
pub struct FixedId(pub &'static str);

impl mrpcproxy::IdGenerator for FixedId {
	fn generate_id(&self) -> String {
		self.0.to_string()
	}
}
