//! Federated-identity exchange boundary.
//!
//! [`FederationClient`] is the broker's only dependency on the identity service's network
//! protocol. Implementations submit a [`FederationRequest`] (pool id plus an optional
//! logins map) and resolve a [`FederatedGrant`] carrying the identity and credential
//! material. Retry and backoff policy belongs to the implementation; the broker never
//! retries an exchange, it wraps the failure and surfaces it to the caller.

// std
use std::sync::atomic::{AtomicU64, Ordering};
// self
use crate::{
	_prelude::*,
	auth::{Credentials, IdentityId, PoolId, ProviderName, SecretString},
	provider::IdentityProvider,
};

type BoxError = Box<dyn StdError + Send + Sync>;

/// Boxed future type returned by [`FederationClient`] implementations.
pub type ExchangeFuture<'a, T> =
	Pin<Box<dyn Future<Output = Result<T, ExchangeError>> + 'a + Send>>;

/// Network boundary contract for the federated identity service.
pub trait FederationClient
where
	Self: Send + Sync,
{
	/// Exchanges the request's login material for a federated grant.
	fn exchange(&self, request: FederationRequest) -> ExchangeFuture<'_, FederatedGrant>;
}

/// Parameters submitted to the federated identity service.
#[derive(Clone, Debug)]
pub struct FederationRequest {
	/// Identity pool the exchange targets.
	pub pool: PoolId,
	/// Login assertions keyed by provider name; empty for anonymous exchanges.
	pub logins: BTreeMap<ProviderName, SecretString>,
}
impl FederationRequest {
	/// Creates an anonymous exchange request carrying no login assertions.
	pub fn anonymous(pool: PoolId) -> Self {
		Self { pool, logins: BTreeMap::new() }
	}

	/// Creates an exchange request carrying the provider's login assertion.
	pub fn with_login(pool: PoolId, provider: &IdentityProvider) -> Self {
		let logins = BTreeMap::from_iter([(provider.name.clone(), provider.user_token.clone())]);

		Self { pool, logins }
	}

	/// Returns `true` when the request carries no login assertions.
	pub fn is_anonymous(&self) -> bool {
		self.logins.is_empty()
	}
}

/// Identity and credential material resolved by a successful exchange.
#[derive(Clone, Debug)]
pub struct FederatedGrant {
	/// Identity the service resolved for the login material.
	pub identity_id: IdentityId,
	/// Public access key identifier.
	pub access_key_id: String,
	/// Secret access key; callers must avoid logging it.
	pub secret_access_key: SecretString,
	/// Session token bound to the credential triple.
	pub session_token: SecretString,
	/// Expiry instant reported by the service, when known.
	pub expiration: Option<OffsetDateTime>,
}
impl FederatedGrant {
	/// Creates a grant without an expiry instant.
	pub fn new(
		identity_id: IdentityId,
		access_key_id: impl Into<String>,
		secret_access_key: impl Into<String>,
		session_token: impl Into<String>,
	) -> Self {
		Self {
			identity_id,
			access_key_id: access_key_id.into(),
			secret_access_key: SecretString::new(secret_access_key),
			session_token: SecretString::new(session_token),
			expiration: None,
		}
	}

	/// Sets the expiry instant reported by the service.
	pub fn with_expiration(mut self, instant: OffsetDateTime) -> Self {
		self.expiration = Some(instant);

		self
	}
}
impl From<FederatedGrant> for Credentials {
	fn from(grant: FederatedGrant) -> Self {
		Self {
			access_key_id: grant.access_key_id,
			secret_access_key: grant.secret_access_key,
			session_token: grant.session_token,
			identity_id: Some(grant.identity_id),
			expiration: grant.expiration,
		}
	}
}

/// Failure taxonomy owned by [`FederationClient`] implementations.
#[derive(Debug, ThisError)]
pub enum ExchangeError {
	/// The identity service rejected the exchange.
	#[error("Federation service rejected the exchange: {message}.")]
	Service {
		/// Service- or client-supplied message summarizing the rejection.
		message: String,
		/// Protocol status code, when available.
		status: Option<u16>,
	},
	/// Underlying client reported a network failure.
	#[error("Network error occurred while calling the federation service.")]
	Network {
		/// Transport-specific network error.
		#[source]
		source: BoxError,
	},
	/// Underlying IO failure surfaced during the exchange.
	#[error("I/O error occurred while calling the federation service.")]
	Io(#[from] std::io::Error),
}
impl ExchangeError {
	/// Builds a service rejection from a message and optional status code.
	pub fn service(message: impl Into<String>, status: Option<u16>) -> Self {
		Self::Service { message: message.into(), status }
	}

	/// Wraps a client-specific network error.
	pub fn network(src: impl 'static + Send + Sync + StdError) -> Self {
		Self::Network { source: Box::new(src) }
	}
}

/// Fixed-response [`FederationClient`] for demos and tests.
///
/// Serves pre-registered grants per pool, optionally fails the next exchange, and records
/// call counts plus the most recent request so callers can assert deduplication and the
/// exact login material that went over the boundary.
#[derive(Debug, Default)]
pub struct StaticFederation {
	grants: RwLock<HashMap<PoolId, FederatedGrant>>,
	next_failure: RwLock<Option<(String, Option<u16>)>>,
	calls: AtomicU64,
	last_request: RwLock<Option<FederationRequest>>,
}
impl StaticFederation {
	/// Registers the grant served for exchanges targeting `pool`.
	pub fn respond_with(&self, pool: PoolId, grant: FederatedGrant) {
		self.grants.write().insert(pool, grant);
	}

	/// Makes the next exchange fail with a service rejection; later exchanges recover.
	pub fn fail_next_with(&self, message: impl Into<String>, status: Option<u16>) {
		*self.next_failure.write() = Some((message.into(), status));
	}

	/// Returns the number of exchanges performed.
	pub fn calls(&self) -> u64 {
		self.calls.load(Ordering::Relaxed)
	}

	/// Returns the most recent request submitted to the client.
	pub fn last_request(&self) -> Option<FederationRequest> {
		self.last_request.read().clone()
	}
}
impl FederationClient for StaticFederation {
	fn exchange(&self, request: FederationRequest) -> ExchangeFuture<'_, FederatedGrant> {
		Box::pin(async move {
			self.calls.fetch_add(1, Ordering::Relaxed);

			*self.last_request.write() = Some(request.clone());

			if let Some((message, status)) = self.next_failure.write().take() {
				return Err(ExchangeError::Service { message, status });
			}

			self.grants.read().get(&request.pool).cloned().ok_or_else(|| {
				ExchangeError::Service {
					message: format!("No grant is registered for pool `{}`", request.pool),
					status: Some(404),
				}
			})
		})
	}
}
