//! The per-endpoint HTTP handler: reads the request body, publishes it to
//! the bus, and renders the reply (or timeout, or failure) as an HTTP
//! response.
//!
//! `READ -> PUBLISHED -> (REPLIED | TIMED_OUT | DECODE_FAILED | READ_FAILED)`

use std::net::SocketAddr;

use axum::extract::{ConnectInfo, Path, Request};
use axum::http::StatusCode;
use axum::response::Response;
use bytes::Bytes;
use http_body_util::BodyExt;

use crate::decode;
use crate::encode;
use crate::endpoint::Endpoint;
use crate::hook::HookContext;
use crate::state::ProxyState;

/// Installed as the axum handler for one registered `(method, path)`.
pub async fn bridge_handler(
	state: std::sync::Arc<ProxyState>,
	endpoint: std::sync::Arc<Endpoint>,
	Path(path_params): Path<Vec<(String, String)>>,
	ConnectInfo(remote): ConnectInfo<SocketAddr>,
	req: Request,
) -> Response {
	let method = req.method().clone();
	let uri = req.uri().clone();
	let headers = req.headers().clone();

	// --- READ ---
	let body = match req.into_body().collect().await {
		Ok(collected) => collected.to_bytes(),
		Err(e) => {
			state.debug_sink.println(&e.to_string());
			let resp = decode::render_empty(StatusCode::INTERNAL_SERVER_ERROR);
			log_terminal(&state, &endpoint, &method, resp.status());
			return resp;
		},
	};

	// --- access log, strictly before publish ---
	let request_id = state.id_gen.generate_id();
	state.access_sink.printf(format_args!(
		"{}, remote Addr: {}, Id: {}",
		endpoint.path,
		encode::derive_ip(&headers, remote),
		request_id
	));

	let bus_request =
		encode::encode_request(&uri, &headers, remote, &path_params, body.to_vec(), request_id);
	let payload = match bus_request.to_bytes() {
		Ok(b) => Bytes::from(b),
		Err(e) => {
			// Our own encoder failed to serialize; treated the same as a
			// read failure since nothing was published.
			state.debug_sink.println(&e.to_string());
			let resp = decode::render_empty(StatusCode::INTERNAL_SERVER_ERROR);
			log_terminal(&state, &endpoint, &method, resp.status());
			return resp;
		},
	};

	// --- PUBLISHED, bounded by the endpoint's effective timeout ---
	let outcome = tokio::time::timeout(
		endpoint.effective_timeout(),
		state.bus.publish(&endpoint.topic, payload),
	)
	.await;

	let (mut response, bus_response) = match outcome {
		Err(_elapsed) => (decode::render_empty(StatusCode::REQUEST_TIMEOUT), None),
		Ok(Err(bus_err)) => {
			state.debug_sink.println(&bus_err.to_string());
			(decode::render_empty(StatusCode::INTERNAL_SERVER_ERROR), None)
		},
		Ok(Ok(reply_bytes)) => match crate::wire::BusResponse::from_bytes(&reply_bytes) {
			Ok(reply) => (decode::render_success(&reply), Some(reply)),
			Err(parse_err) => {
				state
					.debug_sink
					.println(&format!("Malformed mrpcproxy Response: {parse_err}"));
				(decode::render_empty(StatusCode::INTERNAL_SERVER_ERROR), None)
			},
		},
	};

	let ctx = HookContext {
		method: &method,
		uri: &uri,
		request_headers: &headers,
		bus_response: bus_response.as_ref(),
	};
	state.hook.call(&ctx, response.headers_mut());

	log_terminal(&state, &endpoint, &method, response.status());
	response
}

fn log_terminal(
	state: &ProxyState,
	endpoint: &Endpoint,
	method: &axum::http::Method,
	status: StatusCode,
) {
	state.request_sink.printf(format_args!(
		"{} - {}:{} ({})",
		status.as_u16(),
		method,
		endpoint.path,
		endpoint.topic
	));
}
