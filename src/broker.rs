//! Broker construction, cached state, and identity accessors.

mod load;
mod metrics;
mod user;

pub use metrics::LoadMetrics;

// self
use crate::{
	_prelude::*,
	auth::{Credentials, IdentityId, PoolId, UserRecord},
	directory::UserDirectory,
	federation::FederationClient,
	provider::{AuthMode, ExecutionContext, IdentityProvider},
	store::CredentialsStore,
};

/// Brokers temporary credentials and user records for a single identity pool.
///
/// The broker owns the federation client, the credentials store, and an optional user
/// directory so the loading flows can focus on path selection and caching. Cached state
/// and the singleflight guards live behind shared handles; clones observe the same cache,
/// so one logical broker serves a pool no matter how many handles callers hold.
#[derive(Clone)]
pub struct TokenBroker {
	pool: PoolId,
	mode: AuthMode,
	federation: Arc<dyn FederationClient>,
	store: Arc<dyn CredentialsStore>,
	directory: Option<Arc<dyn UserDirectory>>,
	state: Arc<Mutex<BrokerState>>,
	load_guard: Arc<AsyncMutex<()>>,
	user_guard: Arc<AsyncMutex<()>>,
	load_metrics: Arc<LoadMetrics>,
}
impl TokenBroker {
	/// Creates an anonymous broker for the pool.
	pub fn new(
		pool: PoolId,
		federation: Arc<dyn FederationClient>,
		store: Arc<dyn CredentialsStore>,
	) -> Self {
		Self::with_mode(pool, federation, store, AuthMode::Anonymous)
	}

	/// Creates a broker that authenticates with the provider's login assertion.
	pub fn from_identity_provider(
		pool: PoolId,
		federation: Arc<dyn FederationClient>,
		store: Arc<dyn CredentialsStore>,
		provider: IdentityProvider,
	) -> Self {
		Self::with_mode(pool, federation, store, AuthMode::Federated(provider))
	}

	/// Creates a broker bound to a host execution context.
	pub fn from_execution_context(
		pool: PoolId,
		federation: Arc<dyn FederationClient>,
		store: Arc<dyn CredentialsStore>,
		context: ExecutionContext,
	) -> Self {
		Self::with_mode(pool, federation, store, AuthMode::HostContext(context))
	}

	fn with_mode(
		pool: PoolId,
		federation: Arc<dyn FederationClient>,
		store: Arc<dyn CredentialsStore>,
		mode: AuthMode,
	) -> Self {
		Self {
			pool,
			mode,
			federation,
			store,
			directory: None,
			state: Default::default(),
			load_guard: Default::default(),
			user_guard: Default::default(),
			load_metrics: Default::default(),
		}
	}

	/// Attaches the user directory consulted by [`TokenBroker::resolve_user`].
	pub fn with_user_directory(mut self, directory: Arc<dyn UserDirectory>) -> Self {
		self.directory = Some(directory);

		self
	}

	/// Returns the identity pool this broker serves.
	pub fn pool(&self) -> &PoolId {
		&self.pool
	}

	/// Returns the authentication mode fixed at construction.
	pub fn auth_mode(&self) -> &AuthMode {
		&self.mode
	}

	/// Returns the service region encoded in the pool identifier.
	pub fn region(&self) -> &str {
		self.pool.region()
	}

	/// Returns `true` when the broker was built without login material.
	///
	/// Reflects construction-time configuration only; cache state never changes it.
	pub fn is_anonymous(&self) -> bool {
		self.mode.is_anonymous()
	}

	/// Returns the identity currently associated with this broker, if any.
	///
	/// Identity-bearing cached credentials win; a host execution context supplies the
	/// identity before the first load; otherwise there is none until a load completes.
	pub fn identity_id(&self) -> Option<IdentityId> {
		let cached = self
			.state
			.lock()
			.credentials
			.as_ref()
			.and_then(|credentials| credentials.identity_id.clone());

		if let Some(identity) = cached {
			return Some(identity);
		}

		match &self.mode {
			AuthMode::HostContext(context) => Some(context.identity_id.clone()),
			_ => None,
		}
	}

	/// Returns a snapshot of the cached credentials, if any.
	pub fn credentials(&self) -> Option<Credentials> {
		self.state.lock().credentials.clone()
	}

	/// Returns the always-on load counters shared by every clone of this broker.
	pub fn load_metrics(&self) -> &LoadMetrics {
		&self.load_metrics
	}
}
impl Debug for TokenBroker {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("TokenBroker")
			.field("pool", &self.pool)
			.field("mode", &self.mode.as_str())
			.field("directory_attached", &self.directory.is_some())
			.field("credentials_cached", &self.state.lock().credentials.is_some())
			.finish()
	}
}

#[derive(Default)]
struct BrokerState {
	credentials: Option<Credentials>,
	user: Option<UserRecord>,
}
