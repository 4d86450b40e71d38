//! Pluggable request-ID generation.

use rand::Rng;

/// A side-effect-free function returning a fresh request identifier.
pub trait IdGenerator: Send + Sync {
	fn generate_id(&self) -> String;
}

impl<F> IdGenerator for F
where
	F: Fn() -> String + Send + Sync,
{
	fn generate_id(&self) -> String {
		self()
	}
}

/// Generates a random 128-bit id rendered as lowercase hex.
pub struct RandomIdGenerator;

impl IdGenerator for RandomIdGenerator {
	fn generate_id(&self) -> String {
		let mut rng = rand::rng();
		format!("{:016x}{:016x}", rng.random::<u64>(), rng.random::<u64>())
	}
}
