//! Credential acquisition: cache short-circuit, path selection, persistence.
//!
//! [`TokenBroker::load_credentials`] honors the cached value while it still carries an
//! identity, then dispatches on the broker's [`AuthMode`]. Host contexts merge ambient
//! session credentials with the context identity and consult the store for a persisted
//! refinement; federated and anonymous brokers exchange their login material through the
//! federation client and persist the freshly issued credentials. A per-broker singleflight
//! guard ensures concurrent callers piggy-back on the same in-flight acquisition instead
//! of stampeding the identity service.

// self
use crate::{
	_prelude::*,
	auth::Credentials,
	broker::TokenBroker,
	error::AuthError,
	federation::{FederationClient, FederationRequest},
	obs::{self, FlowKind, FlowOutcome, FlowSpan},
	provider::{AuthMode, ExecutionContext},
	store::{CredentialsStore, StoreKey},
};

impl TokenBroker {
	/// Returns usable credentials for this broker, acquiring and persisting them on demand.
	///
	/// Cached credentials that still carry an identity are returned without any
	/// collaborator interaction; expiry is not consulted. An exchange rejection surfaces as
	/// [`Error::Auth`] with nothing persisted, store failures propagate unchanged, and
	/// every failed call leaves the broker ready for an independent retry.
	pub async fn load_credentials(&self) -> Result<Credentials> {
		const KIND: FlowKind = FlowKind::CredentialLoad;

		let span = FlowSpan::new(KIND, "load_credentials");

		obs::record_flow_outcome(KIND, FlowOutcome::Attempt);
		self.load_metrics.record_attempt();

		let result = span
			.instrument(async move {
				if let Some(current) = self.valid_cached() {
					obs::record_flow_outcome(KIND, FlowOutcome::CacheHit);
					self.load_metrics.record_cache_hit();

					return Ok(current);
				}

				let _singleflight = self.load_guard.lock().await;

				if let Some(current) = self.valid_cached() {
					obs::record_flow_outcome(KIND, FlowOutcome::CacheHit);
					self.load_metrics.record_cache_hit();

					return Ok(current);
				}

				match &self.mode {
					AuthMode::Anonymous =>
						self.federate(FederationRequest::anonymous(self.pool.clone())).await,
					AuthMode::Federated(provider) =>
						self.federate(FederationRequest::with_login(self.pool.clone(), provider))
							.await,
					AuthMode::HostContext(context) => self.load_from_host_context(context).await,
				}
			})
			.await;

		match &result {
			Ok(_) => {
				obs::record_flow_outcome(KIND, FlowOutcome::Success);
				self.load_metrics.record_success();
			},
			Err(_) => {
				obs::record_flow_outcome(KIND, FlowOutcome::Failure);
				self.load_metrics.record_failure();
			},
		}

		result
	}

	fn valid_cached(&self) -> Option<Credentials> {
		self.state.lock().credentials.clone().filter(Credentials::has_identity)
	}

	async fn federate(&self, request: FederationRequest) -> Result<Credentials> {
		let grant = <dyn FederationClient>::exchange(self.federation.as_ref(), request)
			.await
			.map_err(AuthError::from)?;
		let identity = grant.identity_id.clone();
		let credentials = Credentials::from(grant);

		self.state.lock().credentials = Some(credentials.clone());

		let key = StoreKey::new(self.pool.clone(), identity);

		<dyn CredentialsStore>::save(self.store.as_ref(), key, credentials.clone()).await?;

		Ok(credentials)
	}

	async fn load_from_host_context(&self, context: &ExecutionContext) -> Result<Credentials> {
		let key = StoreKey::new(self.pool.clone(), context.identity_id.clone());
		let credentials = <dyn CredentialsStore>::load(self.store.as_ref(), &key)
			.await?
			.unwrap_or_else(|| context.ambient_credentials());

		self.state.lock().credentials = Some(credentials.clone());

		Ok(credentials)
	}
}
