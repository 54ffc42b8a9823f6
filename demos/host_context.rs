//! Demonstrates running the broker inside a hosting platform: ambient session
//! credentials and a pre-resolved identity replace the federated exchange, and a
//! persisted refinement takes precedence over the merged ambient value.

// std
use std::{env, fs, sync::Arc};
// crates.io
use color_eyre::Result;
// self
use identity_broker::{
	auth::{Credentials, IdentityId, PoolId},
	broker::TokenBroker,
	federation::StaticFederation,
	provider::{ExecutionContext, SessionCredentials},
	store::{CredentialsStore, FileStore, StoreKey},
};

#[tokio::main]
async fn main() -> Result<()> {
	color_eyre::install()?;

	let pool = PoolId::new("eu-west-2:demo-pool")?;
	let identity = IdentityId::new("eu-west-2:demo-principal")?;
	let path = env::temp_dir().join("identity_broker_host_context_demo.json");
	let store = Arc::new(FileStore::open(&path)?);
	let refined = Credentials::builder("AKIDREFINED")
		.secret_access_key("refined-secret")
		.session_token("refined-session")
		.identity_id(identity.clone())
		.build()?;

	store.save(StoreKey::new(pool.clone(), identity.clone()), refined).await?;

	let federation = Arc::new(StaticFederation::default());
	let context = ExecutionContext::new(
		identity,
		SessionCredentials::new("AKIDHOST", "host-secret", "host-session"),
	);
	let broker = TokenBroker::from_execution_context(pool, federation.clone(), store, context);

	println!(
		"Identity before any load: {}.",
		broker.identity_id().map(String::from).unwrap_or_default()
	);

	let credentials = broker.load_credentials().await?;

	println!("Access key: {}.", credentials.access_key_id);
	println!("Exchanges performed: {}.", federation.calls());

	fs::remove_file(path)?;

	Ok(())
}
