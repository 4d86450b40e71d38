//! An optional user callback run after the bridge has rendered a response,
//! able to add further headers.
//!
//! The hook only ever sees a `&mut HeaderMap`, never the status or body, so
//! the "purely additive" invariant is structural rather than a convention
//! the implementor must honor.

use http::{HeaderMap, HeaderValue, Method, Uri};

use crate::wire::BusResponse;

/// Everything the hook is allowed to see about the terminal outcome.
pub struct HookContext<'a> {
	pub method: &'a Method,
	pub uri: &'a Uri,
	pub request_headers: &'a HeaderMap,
	/// `None` on timeout, decode failure, or read failure.
	pub bus_response: Option<&'a BusResponse>,
}

/// Invoked after the bridge has written status and bus-originated headers,
/// before the handler returns, for every rendered outcome including OPTIONS.
pub trait PostHook: Send + Sync {
	fn call(&self, ctx: &HookContext<'_>, response_headers: &mut HeaderMap);
}

impl<F> PostHook for F
where
	F: Fn(&HookContext<'_>, &mut HeaderMap) + Send + Sync,
{
	fn call(&self, ctx: &HookContext<'_>, response_headers: &mut HeaderMap) {
		self(ctx, response_headers)
	}
}

/// The default hook: a no-op.
pub struct NoopHook;

impl PostHook for NoopHook {
	fn call(&self, _ctx: &HookContext<'_>, _response_headers: &mut HeaderMap) {}
}

/// Convenience used by tests: sets a single fixed header on every outcome.
pub struct SetHeaderHook {
	pub name: http::HeaderName,
	pub value: HeaderValue,
}

impl PostHook for SetHeaderHook {
	fn call(&self, _ctx: &HookContext<'_>, response_headers: &mut HeaderMap) {
		response_headers.insert(self.name.clone(), self.value.clone());
	}
}
