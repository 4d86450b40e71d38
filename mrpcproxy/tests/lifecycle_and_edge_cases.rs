//! Query-merge, graceful stop, and body-read-failure scenarios.

mod common;

use std::sync::Arc;
use std::time::Duration;

use bytes::Bytes;
use common::{Scripted, builder_with_sinks, local_addr};
use mrpcproxy::{Endpoint, build};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;

fn into_options(builder: mrpcproxy::ProxyBuilder) -> Vec<mrpcproxy::ConfigOption> {
	vec![Box::new(move |target: &mut mrpcproxy::ProxyBuilder| {
		*target = builder;
		Ok(())
	})]
}

#[tokio::test]
async fn query_params_merge_url_then_path_params() {
	let (mut builder, _access, _debug, _request) = builder_with_sinks();
	builder
		.register(Endpoint::new("service.test", http::Method::GET, "/test/:a", 0))
		.unwrap();

	let bus = Arc::new(common::FakeBus::new().on(
		"service.test",
		Scripted::Reply(Bytes::from(r#"{"Code":200,"Msg":"OK","Headers":{}}"#)),
	));
	builder.with_bus(bus.clone());

	let proxy = build(local_addr(), into_options(builder)).unwrap();
	let bound = proxy.serve().await.unwrap();
	let resp = reqwest::get(format!("http://{}/test/1/?b=2&a=3", bound.local_addr()))
		.await
		.unwrap();
	assert_eq!(resp.status(), 200);

	let published = bus.last_published("service.test").unwrap();
	let parsed: serde_json::Value = serde_json::from_slice(&published).unwrap();
	let query = &parsed["QueryParams"];
	assert_eq!(query["a"], serde_json::json!(["3", "1"]));
	assert_eq!(query["b"], serde_json::json!(["2"]));

	bound.stop(Duration::from_secs(1)).await.unwrap();
}

#[tokio::test]
async fn graceful_stop_closes_listener_to_new_connections() {
	let (builder, _access, _debug, _request) = builder_with_sinks();
	let mut builder = builder;
	builder.with_bus(Arc::new(common::FakeBus::new()));

	let proxy = build(local_addr(), into_options(builder)).unwrap();
	let bound = proxy.serve().await.unwrap();
	let addr = bound.local_addr();

	bound.stop(Duration::from_secs(1)).await.unwrap();

	let connect = TcpStream::connect(addr).await;
	assert!(connect.is_err() || {
		// Some platforms accept the TCP handshake before resetting; either
		// way the HTTP client never sees a rendered response.
		let mut stream = connect.unwrap();
		stream.write_all(b"GET / HTTP/1.1\r\nHost: x\r\n\r\n").await.is_err()
			|| {
				let mut buf = [0u8; 16];
				stream.read(&mut buf).await.map(|n| n == 0).unwrap_or(true)
			}
	});
}

#[tokio::test]
async fn truncated_body_is_reported_as_read_failure() {
	let (mut builder, access, debug, request) = builder_with_sinks();
	builder.register(Endpoint::new("service.a", http::Method::POST, "/a", 0)).unwrap();
	builder.with_bus(Arc::new(common::FakeBus::new().on(
		"service.a",
		Scripted::Reply(Bytes::from(r#"{"Code":200,"Msg":"OK","Headers":{}}"#)),
	)));

	let proxy = build(local_addr(), into_options(builder)).unwrap();
	let bound = proxy.serve().await.unwrap();
	let addr = bound.local_addr();

	// Some platforms tear down the half-closed socket before the server
	// finishes writing its response; retry the connection until the 500
	// is actually observed instead of treating a dropped connection as
	// an equally acceptable outcome.
	let response = loop {
		let mut stream = TcpStream::connect(addr).await.unwrap();
		// Declares 100 bytes but the connection closes after 3, breaking the
		// body reader before the bridge can hand it to the encoder.
		stream
			.write_all(b"POST /a HTTP/1.1\r\nHost: x\r\nContent-Length: 100\r\n\r\nabc")
			.await
			.unwrap();
		stream.shutdown().await.unwrap();

		let mut response = Vec::new();
		let _ = stream.read_to_end(&mut response).await;
		let response = String::from_utf8_lossy(&response).into_owned();
		if response.starts_with("HTTP/1.1 500") {
			break response;
		}
	};

	// Every retry truncates the body the same way server-side, so a failed
	// attempt still logs its own debug/request line even when the client
	// never saw the bytes; assert on content rather than an exact count.
	assert!(response.starts_with("HTTP/1.1 500"));
	assert!(!debug.lines().is_empty());
	assert!(access.lines().is_empty());
	assert!(request.lines().iter().all(|line| line == "500 - POST:/a (service.a)"));

	bound.stop(Duration::from_secs(1)).await.unwrap();
}
