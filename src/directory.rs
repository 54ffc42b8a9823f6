//! User-directory contract and the built-in in-memory backend.
//!
//! The directory resolves the application-level [`UserRecord`] for a federated identity.
//! The contract deliberately has no error channel: an identity without a record resolves
//! to `None`, and backends fold their own transient failures into absence so the broker
//! can retry on a later call.

// std
use std::sync::atomic::{AtomicU64, Ordering};
// self
use crate::{
	_prelude::*,
	auth::{IdentityId, UserRecord},
};

/// Boxed future type returned by [`UserDirectory`] implementations.
pub type DirectoryFuture<'a, T> = Pin<Box<dyn Future<Output = T> + 'a + Send>>;

/// Lookup contract implemented by user-directory backends.
pub trait UserDirectory
where
	Self: Send + Sync,
{
	/// Resolves the user record for the identity, or `None` when absent.
	fn find_user<'a>(&'a self, identity: &'a IdentityId) -> DirectoryFuture<'a, Option<UserRecord>>;
}

/// Thread-safe in-memory [`UserDirectory`] for local development and tests.
///
/// Counts lookups so callers can assert that the broker memoizes resolved users and skips
/// the directory entirely for anonymous principals.
#[derive(Debug, Default)]
pub struct MemoryDirectory {
	users: RwLock<HashMap<IdentityId, UserRecord>>,
	lookups: AtomicU64,
}
impl MemoryDirectory {
	/// Inserts or replaces the record stored for its identity.
	pub fn insert(&self, record: UserRecord) {
		self.users.write().insert(record.identity_id.clone(), record);
	}

	/// Removes the record stored for the identity, if any.
	pub fn remove(&self, identity: &IdentityId) -> Option<UserRecord> {
		self.users.write().remove(identity)
	}

	/// Returns the number of lookups performed against this directory.
	pub fn lookups(&self) -> u64 {
		self.lookups.load(Ordering::Relaxed)
	}
}
impl UserDirectory for MemoryDirectory {
	fn find_user<'a>(
		&'a self,
		identity: &'a IdentityId,
	) -> DirectoryFuture<'a, Option<UserRecord>> {
		Box::pin(async move {
			self.lookups.fetch_add(1, Ordering::Relaxed);

			self.users.read().get(identity).cloned()
		})
	}
}
