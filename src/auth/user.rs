//! Application-level user records resolved from a directory backend.

// self
use crate::{_prelude::*, auth::id::IdentityId};

/// Opaque application user record tied to a federated identity.
///
/// The broker never inspects the profile payload; it memoizes whatever the directory
/// returned and hands it back to callers untouched.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct UserRecord {
	/// Identity the record belongs to.
	pub identity_id: IdentityId,
	/// Directory-owned payload carried through the broker unmodified.
	pub profile: serde_json::Value,
}
impl UserRecord {
	/// Creates a record for the provided identity and directory payload.
	pub fn new(identity_id: IdentityId, profile: serde_json::Value) -> Self {
		Self { identity_id, profile }
	}
}
