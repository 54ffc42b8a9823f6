// std
use std::sync::Arc;
// crates.io
use time::macros;
use tokio::time::{Duration, sleep};
// self
use identity_broker::{
	auth::{Credentials, IdentityId, PoolId, ProviderName, SecretString},
	broker::TokenBroker,
	error::Error,
	federation::{
		ExchangeFuture, FederatedGrant, FederationClient, FederationRequest, StaticFederation,
	},
	provider::{ExecutionContext, IdentityProvider, SessionCredentials},
	store::{CredentialsStore, MemoryStore, StoreError, StoreFuture, StoreKey},
};

fn pool() -> PoolId {
	PoolId::new("us-east-1:abcd-1234").expect("Pool identifier should be valid for load tests.")
}

fn identity(value: &str) -> IdentityId {
	IdentityId::new(value).expect("Identity fixture should be valid for load tests.")
}

fn provider() -> IdentityProvider {
	IdentityProvider::new(
		ProviderName::new("login.example.com").expect("Provider name should be valid."),
		"user-token-1",
	)
}

fn grant(identity_id: &str) -> FederatedGrant {
	FederatedGrant::new(identity(identity_id), "A", "S", "T")
}

fn context(identity_id: &str) -> ExecutionContext {
	ExecutionContext::new(
		identity(identity_id),
		SessionCredentials::new("AKID-host", "host-secret", "host-session"),
	)
}

fn refined_credentials(identity_id: &str) -> Credentials {
	Credentials::builder("AKID-refined")
		.secret_access_key("refined-secret")
		.session_token("refined-session")
		.identity_id(identity(identity_id))
		.build()
		.expect("Refined credentials fixture should build successfully.")
}

struct FailingStore;
impl CredentialsStore for FailingStore {
	fn save(&self, _key: StoreKey, _credentials: Credentials) -> StoreFuture<'_, ()> {
		Box::pin(async { Err(StoreError::Backend { message: "save rejected".into() }) })
	}

	fn load<'a>(&'a self, _key: &'a StoreKey) -> StoreFuture<'a, Option<Credentials>> {
		Box::pin(async { Err(StoreError::Backend { message: "load rejected".into() }) })
	}
}

struct SaveFailingStore;
impl CredentialsStore for SaveFailingStore {
	fn save(&self, _key: StoreKey, _credentials: Credentials) -> StoreFuture<'_, ()> {
		Box::pin(async { Err(StoreError::Backend { message: "save rejected".into() }) })
	}

	fn load<'a>(&'a self, _key: &'a StoreKey) -> StoreFuture<'a, Option<Credentials>> {
		Box::pin(async { Ok(None) })
	}
}

struct SlowFederation(StaticFederation);
impl FederationClient for SlowFederation {
	fn exchange(&self, request: FederationRequest) -> ExchangeFuture<'_, FederatedGrant> {
		Box::pin(async move {
			sleep(Duration::from_millis(50)).await;

			self.0.exchange(request).await
		})
	}
}

#[tokio::test]
async fn federated_login_exchanges_assertion_for_credentials() {
	let federation = Arc::new(StaticFederation::default());
	let store = Arc::new(MemoryStore::default());

	federation.respond_with(pool(), grant("id-1"));

	let broker =
		TokenBroker::from_identity_provider(pool(), federation.clone(), store.clone(), provider());
	let credentials =
		broker.load_credentials().await.expect("Federated exchange should succeed.");

	assert_eq!(credentials.access_key_id, "A");
	assert_eq!(credentials.secret_access_key.expose(), "S");
	assert_eq!(credentials.session_token.expose(), "T");
	assert_eq!(broker.identity_id().map(String::from), Some("id-1".into()));

	let request = federation.last_request().expect("Exchange request should be recorded.");

	assert_eq!(
		request.logins.get(&provider().name).map(SecretString::expose),
		Some("user-token-1")
	);

	let stored = store
		.load(&StoreKey::new(pool(), identity("id-1")))
		.await
		.expect("Store load should succeed.")
		.expect("Freshly federated credentials should be persisted.");

	assert_eq!(stored.access_key_id, "A");
}

#[tokio::test]
async fn federated_login_caches_after_success() {
	let federation = Arc::new(StaticFederation::default());
	let store = Arc::new(MemoryStore::default());

	federation.respond_with(pool(), grant("id-1"));

	let broker =
		TokenBroker::from_identity_provider(pool(), federation.clone(), store.clone(), provider());
	let first = broker.load_credentials().await.expect("Initial load should succeed.");
	let second = broker.load_credentials().await.expect("Cached load should succeed.");

	assert_eq!(first.access_key_id, second.access_key_id);
	assert_eq!(federation.calls(), 1);
	assert_eq!(broker.load_metrics().attempts(), 2);
	assert_eq!(broker.load_metrics().successes(), 2);
	assert_eq!(broker.load_metrics().cache_hits(), 1);
}

#[tokio::test]
async fn anonymous_login_sends_an_empty_logins_map() {
	let federation = Arc::new(StaticFederation::default());
	let store = Arc::new(MemoryStore::default());

	federation.respond_with(pool(), grant("anon-id"));

	let broker = TokenBroker::new(pool(), federation.clone(), store);

	assert!(broker.is_anonymous());
	assert!(broker.identity_id().is_none());

	broker.load_credentials().await.expect("Anonymous exchange should succeed.");

	let request = federation.last_request().expect("Exchange request should be recorded.");

	assert!(request.is_anonymous());
	assert_eq!(broker.identity_id().map(String::from), Some("anon-id".into()));
}

#[tokio::test]
async fn exchange_failure_surfaces_auth_error_without_persisting() {
	let federation = Arc::new(StaticFederation::default());
	let store = Arc::new(MemoryStore::default());

	federation.respond_with(pool(), grant("id-1"));
	federation.fail_next_with("assertion expired", Some(400));

	let broker =
		TokenBroker::from_identity_provider(pool(), federation.clone(), store.clone(), provider());
	let error = broker.load_credentials().await.expect_err("Rejected exchange should surface.");

	assert!(matches!(error, Error::Auth(_)));
	assert!(error.to_string().contains("authenticate"));
	assert!(store.is_empty());
	assert!(broker.credentials().is_none());
	assert_eq!(federation.calls(), 1);
	assert_eq!(broker.load_metrics().failures(), 1);

	let retried = broker.load_credentials().await.expect("Retry after a failure should succeed.");

	assert!(retried.has_identity());
	assert_eq!(federation.calls(), 2);
	assert_eq!(store.len(), 1);
}

#[tokio::test]
async fn host_context_merges_ambient_session_credentials() {
	let federation = Arc::new(StaticFederation::default());
	let store = Arc::new(MemoryStore::default());
	let broker = TokenBroker::from_execution_context(
		pool(),
		federation.clone(),
		store.clone(),
		context("ctx-id"),
	);
	let credentials = broker.load_credentials().await.expect("Host load should succeed.");

	assert_eq!(credentials.access_key_id, "AKID-host");
	assert_eq!(credentials.secret_access_key.expose(), "host-secret");
	assert_eq!(credentials.identity_id.map(String::from), Some("ctx-id".into()));
	assert_eq!(federation.calls(), 0, "host path must not contact the federation service");
	assert!(store.is_empty(), "host path must not persist merged ambient credentials");
}

#[tokio::test]
async fn host_context_prefers_a_persisted_refinement() {
	let federation = Arc::new(StaticFederation::default());
	let store = Arc::new(MemoryStore::default());

	store
		.save(StoreKey::new(pool(), identity("ctx-id")), refined_credentials("ctx-id"))
		.await
		.expect("Seeding the store should succeed.");

	let broker = TokenBroker::from_execution_context(
		pool(),
		federation.clone(),
		store,
		context("ctx-id"),
	);
	let credentials = broker.load_credentials().await.expect("Host load should succeed.");

	assert_eq!(credentials.access_key_id, "AKID-refined");
	assert_eq!(federation.calls(), 0);
}

#[tokio::test]
async fn host_context_identity_is_available_before_any_load() {
	let broker = TokenBroker::from_execution_context(
		pool(),
		Arc::new(StaticFederation::default()),
		Arc::new(MemoryStore::default()),
		context("ctx-id"),
	);

	assert_eq!(broker.identity_id().map(String::from), Some("ctx-id".into()));
	assert!(broker.credentials().is_none());
}

#[tokio::test]
async fn host_context_store_failures_propagate_unchanged() {
	let broker = TokenBroker::from_execution_context(
		pool(),
		Arc::new(StaticFederation::default()),
		Arc::new(FailingStore),
		context("ctx-id"),
	);
	let error = broker.load_credentials().await.expect_err("Store failure should surface.");

	assert!(matches!(error, Error::Storage(StoreError::Backend { .. })));
	assert!(broker.credentials().is_none());
}

#[tokio::test]
async fn save_failure_surfaces_but_keeps_fresh_credentials() {
	let federation = Arc::new(StaticFederation::default());

	federation.respond_with(pool(), grant("id-1"));

	let broker = TokenBroker::from_identity_provider(
		pool(),
		federation.clone(),
		Arc::new(SaveFailingStore),
		provider(),
	);
	let error = broker.load_credentials().await.expect_err("Save failure should surface.");

	assert!(matches!(error, Error::Storage(_)));
	assert!(broker.credentials().is_some_and(|credentials| credentials.has_identity()));

	broker.load_credentials().await.expect("Cached credentials should short-circuit.");

	assert_eq!(federation.calls(), 1);
}

#[tokio::test]
async fn concurrent_loads_share_one_exchange() {
	let inner = StaticFederation::default();

	inner.respond_with(pool(), grant("id-1"));

	let federation = Arc::new(SlowFederation(inner));
	let broker = TokenBroker::from_identity_provider(
		pool(),
		federation.clone(),
		Arc::new(MemoryStore::default()),
		provider(),
	);
	let (first, second) = tokio::join!(broker.load_credentials(), broker.load_credentials());
	let first = first.expect("First concurrent load should succeed.");
	let second = second.expect("Second concurrent load should succeed.");

	assert_eq!(first.access_key_id, "A");
	assert_eq!(second.access_key_id, "A");
	assert_eq!(federation.0.calls(), 1);
}

#[tokio::test]
async fn expired_credentials_still_short_circuit() {
	let federation = Arc::new(StaticFederation::default());
	let store = Arc::new(MemoryStore::default());

	federation.respond_with(
		pool(),
		grant("id-1").with_expiration(macros::datetime!(2020-01-01 00:00 UTC)),
	);

	let broker =
		TokenBroker::from_identity_provider(pool(), federation.clone(), store, provider());
	let credentials = broker.load_credentials().await.expect("Initial load should succeed.");

	assert!(credentials.is_expired());

	broker.load_credentials().await.expect("Expired cached credentials should still serve.");

	assert_eq!(federation.calls(), 1, "validity is identity presence, not expiry");
}
