//! Demonstrates the federated login path with in-memory backends: a provider token is
//! exchanged for pool-scoped credentials, cached for reuse, and the matching user
//! record resolved from a directory.

// std
use std::sync::Arc;
// crates.io
use color_eyre::Result;
// self
use identity_broker::{
	auth::{IdentityId, PoolId, ProviderName, UserRecord},
	broker::TokenBroker,
	directory::MemoryDirectory,
	federation::{FederatedGrant, StaticFederation},
	provider::IdentityProvider,
	serde_json::json,
	store::MemoryStore,
};

#[tokio::main]
async fn main() -> Result<()> {
	color_eyre::install()?;

	let pool = PoolId::new("us-east-1:demo-pool")?;
	let identity = IdentityId::new("us-east-1:demo-principal")?;
	let federation = Arc::new(StaticFederation::default());

	federation.respond_with(
		pool.clone(),
		FederatedGrant::new(identity.clone(), "AKIDDEMO", "demo-secret", "demo-session"),
	);

	let directory = Arc::new(MemoryDirectory::default());

	directory.insert(UserRecord::new(identity, json!({ "email": "demo@example.com" })));

	let store = Arc::new(MemoryStore::default());
	let broker = TokenBroker::from_identity_provider(
		pool,
		federation.clone(),
		store.clone(),
		IdentityProvider::new(ProviderName::new("login.example.com")?, "demo-provider-token"),
	)
	.with_user_directory(directory);
	let credentials = broker.load_credentials().await?;

	println!("Pool region: {}.", broker.region());
	println!("Access key: {}.", credentials.access_key_id);

	broker.load_credentials().await?;

	println!(
		"Exchanges performed: {} (cache hits: {}).",
		federation.calls(),
		broker.load_metrics().cache_hits()
	);

	if let Some(user) = broker.resolve_user().await {
		println!("Resolved user profile: {}.", user.profile);
	}

	println!("Persisted entries: {}.", store.len());

	Ok(())
}
