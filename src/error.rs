//! Broker-level error types shared across credential flows and stores.

// self
use crate::_prelude::*;

/// Broker-wide result type alias returning [`Error`] by default.
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Canonical broker error exposed by public APIs.
#[derive(Debug, ThisError)]
pub enum Error {
	/// Federated authentication failure.
	#[error(transparent)]
	Auth(#[from] AuthError),
	/// Storage-layer failure.
	#[error("{0}")]
	Storage(
		#[from]
		#[source]
		crate::store::StoreError,
	),
}

/// Authentication failure raised when the federated token exchange is rejected.
///
/// This is the only place a [`federation::ExchangeError`](crate::federation::ExchangeError)
/// becomes a broker error; collaborators outside the federation boundary surface their own
/// failure types untranslated.
#[derive(Debug, ThisError)]
#[error("Failed to authenticate against the federated identity service.")]
pub struct AuthError {
	#[from]
	source: crate::federation::ExchangeError,
}
impl AuthError {
	/// Returns the underlying exchange failure reported by the federation client.
	pub fn exchange_error(&self) -> &crate::federation::ExchangeError {
		&self.source
	}
}
