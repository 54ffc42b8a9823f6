//! Login material attached to a broker at construction time.
//!
//! A broker authenticates in exactly one of three ways, captured by [`AuthMode`]: as an
//! anonymous principal, with a federated login assertion from a third-party provider, or
//! inside a host execution context that already carries session credentials and a resolved
//! identity. The mode is fixed when the broker is built and matched exhaustively by the
//! credential-loading flow, so no path can observe a half-configured login.

// self
use crate::{
	_prelude::*,
	auth::{Credentials, IdentityId, ProviderName, SecretString},
};

/// Federated login assertion issued by a third-party identity provider.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct IdentityProvider {
	/// Registered provider name, e.g. `graph.facebook.com`.
	pub name: ProviderName,
	/// Provider-issued user token presented during the exchange.
	pub user_token: SecretString,
}
impl IdentityProvider {
	/// Creates a login assertion for the provided provider name and user token.
	pub fn new(name: ProviderName, user_token: impl Into<String>) -> Self {
		Self { name, user_token: SecretString::new(user_token) }
	}
}

/// Ambient credential triple supplied by a hosting runtime.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SessionCredentials {
	/// Public access key identifier.
	pub access_key_id: String,
	/// Secret access key; callers must avoid logging it.
	pub secret_access_key: SecretString,
	/// Session token bound to the credential triple.
	pub session_token: SecretString,
}
impl SessionCredentials {
	/// Creates a session triple from its raw components.
	pub fn new(
		access_key_id: impl Into<String>,
		secret_access_key: impl Into<String>,
		session_token: impl Into<String>,
	) -> Self {
		Self {
			access_key_id: access_key_id.into(),
			secret_access_key: SecretString::new(secret_access_key),
			session_token: SecretString::new(session_token),
		}
	}
}

/// Host invocation metadata carrying a resolved identity and ambient session credentials.
///
/// Hosts that launch application code with pre-resolved identity material (for example a
/// function runtime invoked on behalf of an already-authenticated caller) hand the broker
/// this context instead of a login assertion. The federated exchange is skipped entirely
/// for such brokers.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ExecutionContext {
	/// Identity the host resolved before invoking application code.
	pub identity_id: IdentityId,
	/// Ambient session credentials supplied by the host.
	pub session: SessionCredentials,
}
impl ExecutionContext {
	/// Creates a context from the host-resolved identity and its session credentials.
	pub fn new(identity_id: IdentityId, session: SessionCredentials) -> Self {
		Self { identity_id, session }
	}

	/// Merges the ambient session triple with the context identity into [`Credentials`].
	///
	/// The result carries no expiry instant; the host owns the session lifetime.
	pub fn ambient_credentials(&self) -> Credentials {
		Credentials {
			access_key_id: self.session.access_key_id.clone(),
			secret_access_key: self.session.secret_access_key.clone(),
			session_token: self.session.session_token.clone(),
			identity_id: Some(self.identity_id.clone()),
			expiration: None,
		}
	}
}

/// Authentication mode fixed at broker construction.
#[derive(Clone, Debug)]
pub enum AuthMode {
	/// Anonymous principal; the federated exchange runs without a login assertion.
	Anonymous,
	/// Federated principal backed by a third-party login assertion.
	Federated(IdentityProvider),
	/// Principal running inside a host execution context with ambient credentials.
	HostContext(ExecutionContext),
}
impl AuthMode {
	/// Returns `true` when no login material is attached.
	pub fn is_anonymous(&self) -> bool {
		matches!(self, AuthMode::Anonymous)
	}

	/// Returns a stable label suitable for span or metric fields.
	pub const fn as_str(&self) -> &'static str {
		match self {
			AuthMode::Anonymous => "anonymous",
			AuthMode::Federated(_) => "federated",
			AuthMode::HostContext(_) => "host_context",
		}
	}
}
impl Display for AuthMode {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}
