//! Renders a decoded bus reply (or a fixed failure outcome) as an HTTP
//! response.

use axum::body::Body;
use axum::http::{HeaderName, HeaderValue, StatusCode};
use axum::response::Response;

use crate::wire::BusResponse;

/// Renders a successfully decoded `BusResponse` into an HTTP response.
pub fn render_success(reply: &BusResponse) -> Response {
	let status =
		StatusCode::from_u16(reply.code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
	let mut builder = Response::builder().status(status);
	{
		let headers = builder.headers_mut().expect("builder has no error yet");
		for (name, values) in &reply.headers {
			let Ok(header_name) = HeaderName::try_from(name.as_str()) else {
				continue;
			};
			for value in values {
				if let Ok(header_value) = HeaderValue::from_str(value) {
					headers.append(header_name.clone(), header_value);
				}
			}
		}
	}
	builder
		.body(Body::from(reply.msg.clone()))
		.unwrap_or_else(|_| Response::new(Body::empty()))
}

/// Renders the fixed 500 used for read failures and malformed replies: an
/// empty header map and an empty body.
pub fn render_empty(status: StatusCode) -> Response {
	Response::builder()
		.status(status)
		.body(Body::empty())
		.expect("building a bodiless response cannot fail")
}
