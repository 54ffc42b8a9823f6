//! Lazy user-record resolution with truthy-only memoization.

// self
use crate::{
	_prelude::*,
	auth::UserRecord,
	broker::TokenBroker,
	directory::UserDirectory,
	obs::{FlowKind, FlowSpan},
};

impl TokenBroker {
	/// Resolves the application user record for this broker's identity.
	///
	/// Anonymous brokers resolve to `None` without a directory call. A resolved record is
	/// memoized and later calls return it without another lookup; absence is never
	/// memoized, so a record that appears later is picked up by a subsequent call. Brokers
	/// without a resolved identity or without an attached directory also resolve to `None`
	/// silently.
	pub async fn resolve_user(&self) -> Option<UserRecord> {
		let span = FlowSpan::new(FlowKind::UserResolution, "resolve_user");

		span.instrument(async move {
			if self.is_anonymous() {
				return None;
			}
			if let Some(user) = self.memoized_user() {
				return Some(user);
			}

			let _singleflight = self.user_guard.lock().await;

			if let Some(user) = self.memoized_user() {
				return Some(user);
			}

			let directory = self.directory.clone()?;
			let identity = self.identity_id()?;
			let resolved = <dyn UserDirectory>::find_user(directory.as_ref(), &identity).await;

			if let Some(user) = &resolved {
				self.state.lock().user = Some(user.clone());
			}

			resolved
		})
		.await
	}

	fn memoized_user(&self) -> Option<UserRecord> {
		self.state.lock().user.clone()
	}
}
