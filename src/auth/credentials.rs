//! Immutable credential value objects and their builder.

// self
use crate::{
	_prelude::*,
	auth::{id::IdentityId, secret::SecretString},
};

/// Errors produced by [`CredentialsBuilder`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ThisError)]
pub enum CredentialsBuilderError {
	/// Issued when no secret access key was provided.
	#[error("Secret access key is required.")]
	MissingSecretAccessKey,
	/// Issued when no session token was provided.
	#[error("Session token is required.")]
	MissingSessionToken,
}

/// Immutable temporary credentials issued for an identity pool.
///
/// A credential refresh always replaces the whole value; no field is ever mutated in
/// place. The broker treats a value as usable only while [`Credentials::has_identity`]
/// holds, so an absent identity forces the next load to re-acquire.
#[derive(Serialize, Deserialize, Clone)]
pub struct Credentials {
	/// Public access key identifier.
	pub access_key_id: String,
	/// Secret access key; callers must avoid logging it.
	pub secret_access_key: SecretString,
	/// Session token bound to the credential triple.
	pub session_token: SecretString,
	/// Identity the federation service resolved for this session, when known.
	pub identity_id: Option<IdentityId>,
	/// Expiry instant reported by the issuing service, when known.
	pub expiration: Option<OffsetDateTime>,
}
impl Credentials {
	/// Returns a builder seeded with the public access key identifier.
	pub fn builder(access_key_id: impl Into<String>) -> CredentialsBuilder {
		CredentialsBuilder::new(access_key_id)
	}

	/// Returns `true` when the federation service resolved an identity for this value.
	pub fn has_identity(&self) -> bool {
		self.identity_id.is_some()
	}

	/// Returns `true` if the credentials have expired at the provided instant.
	///
	/// Values without an expiry instant never report as expired.
	pub fn is_expired_at(&self, instant: OffsetDateTime) -> bool {
		self.expiration.is_some_and(|expires| instant >= expires)
	}

	/// Convenience helper that checks expiry against the current UTC instant.
	pub fn is_expired(&self) -> bool {
		self.is_expired_at(OffsetDateTime::now_utc())
	}
}
impl Debug for Credentials {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("Credentials")
			.field("access_key_id", &self.access_key_id)
			.field("secret_access_key", &"<redacted>")
			.field("session_token", &"<redacted>")
			.field("identity_id", &self.identity_id)
			.field("expiration", &self.expiration)
			.finish()
	}
}

/// Builder for [`Credentials`].
#[derive(Clone, Debug)]
pub struct CredentialsBuilder {
	access_key_id: String,
	secret_access_key: Option<SecretString>,
	session_token: Option<SecretString>,
	identity_id: Option<IdentityId>,
	expiration: Option<OffsetDateTime>,
}
impl CredentialsBuilder {
	fn new(access_key_id: impl Into<String>) -> Self {
		Self {
			access_key_id: access_key_id.into(),
			secret_access_key: None,
			session_token: None,
			identity_id: None,
			expiration: None,
		}
	}

	/// Provides the secret access key value.
	pub fn secret_access_key(mut self, secret: impl Into<String>) -> Self {
		self.secret_access_key = Some(SecretString::new(secret));

		self
	}

	/// Provides the session token value.
	pub fn session_token(mut self, token: impl Into<String>) -> Self {
		self.session_token = Some(SecretString::new(token));

		self
	}

	/// Attaches the identity resolved for this session.
	pub fn identity_id(mut self, identity: IdentityId) -> Self {
		self.identity_id = Some(identity);

		self
	}

	/// Sets the absolute expiry instant reported by the issuing service.
	pub fn expires_at(mut self, instant: OffsetDateTime) -> Self {
		self.expiration = Some(instant);

		self
	}

	/// Consumes the builder and produces [`Credentials`].
	pub fn build(self) -> Result<Credentials, CredentialsBuilderError> {
		let secret_access_key =
			self.secret_access_key.ok_or(CredentialsBuilderError::MissingSecretAccessKey)?;
		let session_token =
			self.session_token.ok_or(CredentialsBuilderError::MissingSessionToken)?;

		Ok(Credentials {
			access_key_id: self.access_key_id,
			secret_access_key,
			session_token,
			identity_id: self.identity_id,
			expiration: self.expiration,
		})
	}
}
