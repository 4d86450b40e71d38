//! Endpoint records and the routing table mapping `(method, path)` to them.

use std::collections::HashMap;
use std::time::Duration;

use http::Method;

/// The proxy-wide default timeout applied when an endpoint declares `0`.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(1);

/// An immutable `(topic, method, path, timeout)` binding.
#[derive(Debug, Clone)]
pub struct Endpoint {
	pub topic: String,
	pub method: Method,
	pub path: String,
	/// `0` means "use the proxy default".
	pub timeout_secs: u64,
}

impl Endpoint {
	pub fn new(
		topic: impl Into<String>,
		method: Method,
		path: impl Into<String>,
		timeout_secs: u64,
	) -> Self {
		Endpoint {
			topic: topic.into(),
			method,
			path: path.into(),
			timeout_secs,
		}
	}

	/// The wall-clock deadline for a single bus round-trip on this endpoint.
	pub fn effective_timeout(&self) -> Duration {
		if self.timeout_secs == 0 {
			DEFAULT_TIMEOUT
		} else {
			Duration::from_secs(self.timeout_secs)
		}
	}

	/// The path pattern rewritten into axum's `{name}` capture syntax.
	pub fn axum_path(&self) -> String {
		self
			.path
			.split('/')
			.map(|segment| {
				if let Some(name) = segment.strip_prefix(':') {
					format!("{{{name}}}")
				} else {
					segment.to_string()
				}
			})
			.collect::<Vec<_>>()
			.join("/")
	}
}

/// Error raised when a `(method, path)` pair is registered twice.
#[derive(Debug, thiserror::Error)]
#[error("duplicate endpoint for {method} {path}")]
pub struct DuplicateEndpoint {
	pub method: Method,
	pub path: String,
}

/// Maps `(method, path) -> Endpoint`, enforcing the uniqueness invariant.
#[derive(Debug, Default, Clone)]
pub struct RoutingTable {
	endpoints: HashMap<(Method, String), Endpoint>,
}

impl RoutingTable {
	pub fn new() -> Self {
		Self::default()
	}

	/// Registers `endpoint`. Fails if `(method, path)` is already taken.
	pub fn register(&mut self, endpoint: Endpoint) -> Result<(), DuplicateEndpoint> {
		let key = (endpoint.method.clone(), endpoint.path.clone());
		if self.endpoints.contains_key(&key) {
			return Err(DuplicateEndpoint {
				method: endpoint.method,
				path: endpoint.path,
			});
		}
		self.endpoints.insert(key, endpoint);
		Ok(())
	}

	pub fn iter(&self) -> impl Iterator<Item = &Endpoint> {
		self.endpoints.values()
	}
}
