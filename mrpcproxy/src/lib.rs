//! `mrpcproxy`: a stateless HTTP-to-message-bus proxy.
//!
//! An inbound HTTP request matching a registered endpoint is translated into
//! a `BusRequest`, published on the endpoint's topic, and the first reply
//! within the endpoint's deadline is rendered back as the HTTP response.

pub mod bridge;
pub mod bus;
pub mod config;
pub mod decode;
pub mod encode;
pub mod endpoint;
pub mod error;
pub mod hook;
pub mod idgen;
pub mod log;
pub mod proxy;
pub mod state;
pub mod wire;

pub use bus::{Bus, BusError};
pub use endpoint::Endpoint;
pub use error::BuildError;
pub use hook::{HookContext, PostHook};
pub use idgen::IdGenerator;
pub use log::Sink;
pub use proxy::{Bound, ConfigOption, Proxy, ProxyBuilder, build};
pub use wire::{BusRequest, BusResponse};
