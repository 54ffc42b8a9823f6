//! Thread-safe in-memory [`CredentialsStore`] implementation for local development and tests.

// self
use crate::{
	_prelude::*,
	auth::Credentials,
	store::{CredentialsStore, StoreFuture, StoreKey},
};

type StoreMap = Arc<RwLock<HashMap<StoreKey, Credentials>>>;

/// Thread-safe storage backend that keeps credentials in-process for tests and demos.
#[derive(Clone, Debug, Default)]
pub struct MemoryStore(StoreMap);
impl MemoryStore {
	/// Returns the number of stored credential entries.
	pub fn len(&self) -> usize {
		self.0.read().len()
	}

	/// Returns `true` when no credentials are stored.
	pub fn is_empty(&self) -> bool {
		self.0.read().is_empty()
	}
}
impl CredentialsStore for MemoryStore {
	fn save(&self, key: StoreKey, credentials: Credentials) -> StoreFuture<'_, ()> {
		let map = self.0.clone();

		Box::pin(async move {
			map.write().insert(key, credentials);

			Ok(())
		})
	}

	fn load<'a>(&'a self, key: &'a StoreKey) -> StoreFuture<'a, Option<Credentials>> {
		let map = self.0.clone();
		let key = key.clone();

		Box::pin(async move { Ok(map.read().get(&key).cloned()) })
	}
}
