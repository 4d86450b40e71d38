//! YAML configuration loading: listen address, default OPTIONS header set,
//! and the endpoint table.

use std::collections::HashMap;
use std::net::SocketAddr;
use std::str::FromStr;

use http::{HeaderMap, HeaderName, HeaderValue, Method};
use serde::Deserialize;

use crate::endpoint::Endpoint;
use crate::proxy::{ConfigOption, ProxyBuilder};

/// The on-disk shape of a config file: where to listen, the header set
/// applied to every OPTIONS preflight reply, and the endpoint table.
#[derive(Debug, Deserialize)]
pub struct RawConfig {
	pub listen: SocketAddr,
	#[serde(default)]
	pub default_headers: HashMap<String, String>,
	#[serde(default)]
	pub endpoints: Vec<RawEndpoint>,
}

#[derive(Debug, Deserialize)]
pub struct RawEndpoint {
	pub topic: String,
	#[serde(deserialize_with = "deserialize_method")]
	pub method: Method,
	pub path: String,
	#[serde(default)]
	pub timeout_secs: u64,
}

fn deserialize_method<'de, D>(de: D) -> Result<Method, D::Error>
where
	D: serde::Deserializer<'de>,
{
	let raw = String::deserialize(de)?;
	Method::from_str(&raw.to_uppercase()).map_err(serde::de::Error::custom)
}

/// Failure parsing or applying a config file. Distinct from [`crate::error::BuildError`],
/// which only covers failures inside [`crate::proxy::build`] itself.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
	#[error("reading config file: {0}")]
	Read(#[source] std::io::Error),
	#[error("parsing config YAML: {0}")]
	Parse(#[source] serde_yaml::Error),
	#[error("invalid header name {0:?}")]
	InvalidHeaderName(String),
	#[error("invalid value for header {name:?}: {source}")]
	InvalidHeaderValue {
		name: String,
		#[source]
		source: http::header::InvalidHeaderValue,
	},
}

impl RawConfig {
	pub fn from_yaml_str(raw: &str) -> Result<Self, ConfigError> {
		serde_yaml::from_str(raw).map_err(ConfigError::Parse)
	}

	pub fn from_file(path: &std::path::Path) -> Result<Self, ConfigError> {
		let raw = std::fs::read_to_string(path).map_err(ConfigError::Read)?;
		Self::from_yaml_str(&raw)
	}

	/// Builds the default header map declared in the config file.
	pub fn header_map(&self) -> Result<HeaderMap, ConfigError> {
		let mut headers = HeaderMap::new();
		for (name, value) in &self.default_headers {
			let header_name = HeaderName::try_from(name.as_str())
				.map_err(|_| ConfigError::InvalidHeaderName(name.clone()))?;
			let header_value =
				HeaderValue::from_str(value).map_err(|source| ConfigError::InvalidHeaderValue {
					name: name.clone(),
					source,
				})?;
			headers.insert(header_name, header_value);
		}
		Ok(headers)
	}

	/// Translates the parsed file into the [`ConfigOption`] sequence consumed
	/// by [`crate::proxy::build`]: one option registering the header set,
	/// then one option per endpoint. Endpoint uniqueness is enforced by
	/// [`crate::endpoint::RoutingTable::register`] when the options run.
	pub fn into_options(self) -> Result<Vec<ConfigOption>, ConfigError> {
		let headers = self.header_map()?;
		let mut options: Vec<ConfigOption> = Vec::with_capacity(self.endpoints.len() + 1);

		options.push(Box::new(move |builder: &mut ProxyBuilder| {
			builder.default_headers = headers;
			Ok(())
		}));

		for e in self.endpoints {
			options.push(Box::new(move |builder: &mut ProxyBuilder| {
				builder.register(Endpoint::new(e.topic, e.method, e.path, e.timeout_secs))
			}));
		}

		Ok(options)
	}
}
