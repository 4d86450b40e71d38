//! Builds the bus-facing request payload from an incoming HTTP request.

use std::collections::HashMap;
use std::net::SocketAddr;

use http::{HeaderMap, Uri};

use crate::wire::BusRequest;

/// Derives the caller's apparent IP: the first `X-Forwarded-For` value if
/// present, otherwise the raw remote address.
pub fn derive_ip(headers: &HeaderMap, remote: SocketAddr) -> String {
	match headers
		.get_all(http::header::HeaderName::from_static("x-forwarded-for"))
		.iter()
		.next()
	{
		Some(v) => v.to_str().unwrap_or_default().to_string(),
		None => remote.ip().to_string(),
	}
}

/// Copies headers as-is, preserving all values and their relative order.
pub fn headers_to_map(headers: &HeaderMap) -> HashMap<String, Vec<String>> {
	let mut map: HashMap<String, Vec<String>> = HashMap::new();
	for (name, value) in headers.iter() {
		map
			.entry(name.as_str().to_string())
			.or_default()
			.push(value.to_str().unwrap_or_default().to_string());
	}
	map
}

/// Merges URL query values (in URL order) with matched path-parameter
/// values (appended after, in parameter order). A path parameter sharing a
/// query parameter's name never replaces its values, only extends the list.
pub fn merge_query_params(
	uri: &Uri,
	path_params: &[(String, String)],
) -> HashMap<String, Vec<String>> {
	let mut map: HashMap<String, Vec<String>> = HashMap::new();
	if let Some(query) = uri.query() {
		for (k, v) in url::form_urlencoded::parse(query.as_bytes()) {
			map.entry(k.into_owned()).or_default().push(v.into_owned());
		}
	}
	for (k, v) in path_params {
		map.entry(k.clone()).or_default().push(v.clone());
	}
	map
}

/// Builds the `BusRequest` for an inbound HTTP request whose body has
/// already been read into `body`.
pub fn encode_request(
	uri: &Uri,
	headers: &HeaderMap,
	remote: SocketAddr,
	path_params: &[(String, String)],
	body: Vec<u8>,
	request_id: String,
) -> BusRequest {
	BusRequest {
		ip_address: derive_ip(headers, remote),
		headers: headers_to_map(headers),
		query_params: merge_query_params(uri, path_params),
		body,
		request_id,
	}
}
