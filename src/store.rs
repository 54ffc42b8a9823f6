//! Storage contracts and built-in store implementations for broker credentials.

pub mod file;
pub mod memory;

pub use file::FileStore;
pub use memory::MemoryStore;

// self
use crate::{
	_prelude::*,
	auth::{Credentials, IdentityId, PoolId},
};

/// Persistence contract future for broker credential stores.
pub type StoreFuture<'a, T> = Pin<Box<dyn Future<Output = Result<T, StoreError>> + 'a + Send>>;

/// Storage backend contract implemented by broker credential stores.
///
/// The persisted layout is entirely owned by the implementation; the broker only ever
/// writes whole [`Credentials`] values under a [`StoreKey`] and reads them back. Store
/// failures are opaque to the broker and propagate to callers untranslated.
pub trait CredentialsStore
where
	Self: Send + Sync,
{
	/// Persists or replaces the credentials stored under the provided key.
	fn save(&self, key: StoreKey, credentials: Credentials) -> StoreFuture<'_, ()>;

	/// Fetches the credentials associated with the key, if present.
	fn load<'a>(&'a self, key: &'a StoreKey) -> StoreFuture<'a, Option<Credentials>>;
}

/// Error type produced by [`CredentialsStore`] implementations.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ThisError)]
pub enum StoreError {
	/// Serialization failures surfaced by the backend.
	#[error("Serialization error: {message}.")]
	Serialization {
		/// Human-readable error payload.
		message: String,
	},
	/// Backend-level failure for the storage engine.
	#[error("Backend failure: {message}.")]
	Backend {
		/// Human-readable error payload.
		message: String,
	},
}

/// Unique key identifying stored credentials.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct StoreKey {
	/// Identity pool the credentials were issued for.
	pub pool: PoolId,
	/// Identity the credentials belong to.
	pub identity: IdentityId,
}
impl StoreKey {
	/// Builds a key for the provided pool and identity.
	pub fn new(pool: PoolId, identity: IdentityId) -> Self {
		Self { pool, identity }
	}
}
