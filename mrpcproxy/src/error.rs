//! Construction-time error kinds.

/// Failure building a [`crate::proxy::Proxy`].
#[derive(Debug, thiserror::Error)]
pub enum BuildError {
	/// No bus client was supplied.
	#[error("no service: a bus client is required")]
	NoService,

	/// A configuration callback reported failure.
	#[error("error executing functional option: {0}")]
	Config(#[source] anyhow::Error),
}

impl From<crate::endpoint::DuplicateEndpoint> for BuildError {
	fn from(e: crate::endpoint::DuplicateEndpoint) -> Self {
		BuildError::Config(anyhow::anyhow!(e))
	}
}
