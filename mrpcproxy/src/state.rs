//! The façade's mutable configuration surface, shared by every bridge
//! handler.

use std::sync::Arc;

use http::HeaderMap;

use crate::bus::Bus;
use crate::hook::PostHook;
use crate::idgen::IdGenerator;
use crate::log::Sink;

pub struct ProxyState {
	pub bus: Arc<dyn Bus>,
	pub default_headers: HeaderMap,
	pub hook: Arc<dyn PostHook>,
	pub id_gen: Arc<dyn IdGenerator>,
	pub access_sink: Arc<dyn Sink>,
	pub debug_sink: Arc<dyn Sink>,
	pub request_sink: Arc<dyn Sink>,
}
