//! Wire types exchanged with the bus, serialized as self-describing JSON
//! objects.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// The request published on an endpoint's topic.
#[derive(Debug, Clone, Serialize)]
pub struct BusRequest {
	#[serde(rename = "IPAddress")]
	pub ip_address: String,
	#[serde(rename = "Headers")]
	pub headers: HashMap<String, Vec<String>>,
	#[serde(rename = "QueryParams")]
	pub query_params: HashMap<String, Vec<String>>,
	#[serde(rename = "Body")]
	pub body: Vec<u8>,
	#[serde(rename = "RequestID")]
	pub request_id: String,
}

impl BusRequest {
	/// Serializes to the textual wire format published on the bus.
	pub fn to_bytes(&self) -> Result<Vec<u8>, serde_json::Error> {
		serde_json::to_vec(self)
	}
}

/// The reply read back from the bus.
#[derive(Debug, Clone, Deserialize)]
pub struct BusResponse {
	#[serde(rename = "Code")]
	pub code: u16,
	#[serde(rename = "Msg")]
	pub msg: Vec<u8>,
	#[serde(rename = "Headers", default)]
	pub headers: HashMap<String, Vec<String>>,
}

impl BusResponse {
	/// Parses a raw reply payload. Failure is reported verbatim to the
	/// caller, who formats it into a debug-sink line.
	pub fn from_bytes(raw: &[u8]) -> Result<Self, serde_json::Error> {
		serde_json::from_slice(raw)
	}
}
