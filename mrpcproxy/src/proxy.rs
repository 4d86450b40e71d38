//! The router/proxy façade and the lifecycle controller that binds and
//! later stops its HTTP listener.

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use axum::extract::Request;
use axum::http::{HeaderMap, Method, StatusCode};
use axum::response::Response;
use axum::routing::MethodRouter;

use crate::bridge;
use crate::bus::Bus;
use crate::endpoint::{Endpoint, RoutingTable};
use crate::error::BuildError;
use crate::hook::{HookContext, NoopHook, PostHook};
use crate::idgen::{IdGenerator, RandomIdGenerator};
use crate::log::{Sink, stderr_sink};
use crate::state::ProxyState;

/// A construction-time mutator, applied in registration order.
pub type ConfigOption = Box<dyn FnOnce(&mut ProxyBuilder) -> anyhow::Result<()>>;

/// Mutable façade state before `Serve` freezes it.
pub struct ProxyBuilder {
	pub table: RoutingTable,
	pub default_headers: HeaderMap,
	pub hook: Arc<dyn PostHook>,
	pub id_gen: Arc<dyn IdGenerator>,
	pub access_sink: Arc<dyn Sink>,
	pub debug_sink: Arc<dyn Sink>,
	pub request_sink: Arc<dyn Sink>,
	bus: Option<Arc<dyn Bus>>,
}

impl ProxyBuilder {
	pub fn new() -> Self {
		ProxyBuilder {
			table: RoutingTable::new(),
			default_headers: HeaderMap::new(),
			hook: Arc::new(NoopHook),
			id_gen: Arc::new(RandomIdGenerator),
			access_sink: Arc::new(stderr_sink()),
			debug_sink: Arc::new(stderr_sink()),
			request_sink: Arc::new(stderr_sink()),
			bus: None,
		}
	}

	pub fn register(&mut self, endpoint: Endpoint) -> anyhow::Result<()> {
		self.table.register(endpoint).map_err(anyhow::Error::from)
	}

	pub fn with_bus(&mut self, bus: Arc<dyn Bus>) {
		self.bus = Some(bus);
	}
}

impl Default for ProxyBuilder {
	fn default() -> Self {
		Self::new()
	}
}

/// A frozen, servable proxy.
pub struct Proxy {
	addr: SocketAddr,
	router: Router,
}

/// Builds a [`Proxy`], applying `options` in order and then requiring a bus
/// client.
pub fn build(addr: SocketAddr, options: Vec<ConfigOption>) -> Result<Proxy, BuildError> {
	let mut builder = ProxyBuilder::new();
	for option in options {
		option(&mut builder).map_err(BuildError::Config)?;
	}
	let bus = builder.bus.take().ok_or(BuildError::NoService)?;

	let state = Arc::new(ProxyState {
		bus,
		default_headers: builder.default_headers,
		hook: builder.hook,
		id_gen: builder.id_gen,
		access_sink: builder.access_sink,
		debug_sink: builder.debug_sink,
		request_sink: builder.request_sink,
	});

	let router = build_router(&builder.table, state)?;
	Ok(Proxy { addr, router })
}

fn build_router(table: &RoutingTable, state: Arc<ProxyState>) -> Result<Router, BuildError> {
	let mut by_path: HashMap<String, Vec<Endpoint>> = HashMap::new();
	for e in table.iter() {
		by_path.entry(e.path.clone()).or_default().push(e.clone());
	}

	let mut router = Router::new();
	for (path, endpoints) in by_path {
		let axum_path = endpoints[0].axum_path();

		let default_headers = state.default_headers.clone();
		let hook = state.hook.clone();
		let mut method_router: MethodRouter = axum::routing::options(move |req: Request| {
			let default_headers = default_headers.clone();
			let hook = hook.clone();
			async move { options_preflight(default_headers, hook, req) }
		});

		for endpoint in endpoints.into_iter().filter(|e| e.method != Method::OPTIONS) {
			let method = endpoint.method.clone();
			let state = state.clone();
			let endpoint = Arc::new(endpoint);
			let handler = move |path: axum::extract::Path<Vec<(String, String)>>,
			                    connect_info: axum::extract::ConnectInfo<SocketAddr>,
			                    req: Request| {
				let state = state.clone();
				let endpoint = endpoint.clone();
				async move { bridge::bridge_handler(state, endpoint, path, connect_info, req).await }
			};
			method_router = match method {
				Method::GET => method_router.get(handler),
				Method::POST => method_router.post(handler),
				Method::PUT => method_router.put(handler),
				Method::DELETE => method_router.delete(handler),
				Method::PATCH => method_router.patch(handler),
				Method::HEAD => method_router.head(handler),
				Method::TRACE => method_router.trace(handler),
				other => {
					return Err(BuildError::Config(anyhow::anyhow!(
						"unsupported HTTP method: {other}"
					)));
				},
			};
		}

		router = router.route(&axum_path, method_router);
	}

	let fallback_state = state.clone();
	Ok(router.fallback(move |req: Request| {
		let state = fallback_state.clone();
		async move { not_found(state, req) }
	}))
}

fn options_preflight(
	default_headers: HeaderMap,
	hook: Arc<dyn PostHook>,
	req: Request,
) -> Response {
	let method = req.method().clone();
	let uri = req.uri().clone();
	let headers = req.headers().clone();

	let mut response = Response::builder()
		.status(StatusCode::OK)
		.body(axum::body::Body::empty())
		.expect("building a bodiless response cannot fail");
	response.headers_mut().extend(default_headers);

	let ctx = HookContext {
		method: &method,
		uri: &uri,
		request_headers: &headers,
		bus_response: None,
	};
	hook.call(&ctx, response.headers_mut());
	response
}

fn not_found(state: Arc<ProxyState>, req: Request) -> Response {
	let method = req.method().clone();
	let path = req.uri().path().to_string();
	state
		.request_sink
		.printf(format_args!("404 - {method}:{path}"));
	Response::builder()
		.status(StatusCode::NOT_FOUND)
		.body(axum::body::Body::empty())
		.expect("building a bodiless response cannot fail")
}

impl Proxy {
	/// Binds the listener and starts serving. Returns a [`Bound`] handle used
	/// to query the address and later [`Bound::stop`].
	pub async fn serve(self) -> anyhow::Result<Bound> {
		let listener = tokio::net::TcpListener::bind(self.addr).await?;
		let local_addr = listener.local_addr()?;
		let (shutdown_tx, shutdown_rx) = tokio::sync::oneshot::channel::<()>();

		let make_service = self.router.into_make_service_with_connect_info::<SocketAddr>();
		let serve_task = tokio::spawn(async move {
			axum::serve(listener, make_service)
				.with_graceful_shutdown(async move {
					let _ = shutdown_rx.await;
				})
				.await
		});

		Ok(Bound {
			local_addr,
			shutdown_tx: Some(shutdown_tx),
			serve_task,
		})
	}
}

/// A running listener. Dropping this without calling [`Bound::stop`] or
/// [`Bound::wait`] leaves the server running detached.
pub struct Bound {
	local_addr: SocketAddr,
	shutdown_tx: Option<tokio::sync::oneshot::Sender<()>>,
	serve_task: tokio::task::JoinHandle<std::io::Result<()>>,
}

impl Bound {
	pub fn local_addr(&self) -> SocketAddr {
		self.local_addr
	}

	/// Blocks until the listener stops on its own (only happens via [`Bound::stop`]
	/// from another handle, or process termination).
	pub async fn wait(self) -> anyhow::Result<()> {
		self.serve_task.await??;
		Ok(())
	}

	/// Graceful shutdown: stop accepting connections, give in-flight
	/// handlers up to `deadline`, then forcibly close.
	pub async fn stop(mut self, deadline: Duration) -> anyhow::Result<()> {
		if let Some(tx) = self.shutdown_tx.take() {
			let _ = tx.send(());
		}
		match tokio::time::timeout(deadline, &mut self.serve_task).await {
			Ok(joined) => {
				joined??;
				Ok(())
			},
			Err(_elapsed) => {
				self.serve_task.abort();
				Ok(())
			},
		}
	}
}
