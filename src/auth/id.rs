//! Strongly typed identifiers enforced across the broker domain.

// std
use std::{borrow::Borrow, ops::Deref};
// self
use crate::_prelude::*;

macro_rules! def_id {
	($name:ident, $doc:literal, $kind:literal) => {
		#[doc = $doc]
		#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
		#[serde(try_from = "String", into = "String")]
		pub struct $name(String);
		impl $name {
			/// Creates a new identifier after validation.
			pub fn new(value: impl AsRef<str>) -> Result<Self, IdentifierError> {
				let view = value.as_ref();

				validate_view($kind, view)?;

				Ok(Self(view.to_owned()))
			}
		}
		impl Deref for $name {
			type Target = str;

			fn deref(&self) -> &Self::Target {
				&self.0
			}
		}
		impl AsRef<str> for $name {
			fn as_ref(&self) -> &str {
				&self.0
			}
		}
		impl From<$name> for String {
			fn from(value: $name) -> Self {
				value.0
			}
		}
		impl TryFrom<String> for $name {
			type Error = IdentifierError;

			fn try_from(value: String) -> Result<Self, Self::Error> {
				validate_view($kind, &value)?;

				Ok(Self(value))
			}
		}
		impl Borrow<str> for $name {
			fn borrow(&self) -> &str {
				&self.0
			}
		}
		impl Debug for $name {
			fn fmt(&self, f: &mut Formatter) -> FmtResult {
				write!(f, concat!($kind, "({})"), self.0)
			}
		}
		impl Display for $name {
			fn fmt(&self, f: &mut Formatter) -> FmtResult {
				f.write_str(&self.0)
			}
		}
		impl FromStr for $name {
			type Err = IdentifierError;

			fn from_str(s: &str) -> Result<Self, Self::Err> {
				Self::new(s)
			}
		}
	};
}

const IDENTIFIER_MAX_LEN: usize = 128;

/// Error returned when identifier validation fails.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, ThisError)]
pub enum IdentifierError {
	/// The identifier was empty.
	#[error("{kind} identifier cannot be empty.")]
	Empty {
		/// Kind of identifier (pool, identity, provider).
		kind: &'static str,
	},
	/// The identifier contains whitespace characters.
	#[error("{kind} identifier contains whitespace.")]
	ContainsWhitespace {
		/// Kind of identifier (pool, identity, provider).
		kind: &'static str,
	},
	/// The identifier exceeded the allowed character count.
	#[error("{kind} identifier exceeds {max} characters.")]
	TooLong {
		/// Kind of identifier (pool, identity, provider).
		kind: &'static str,
		/// Maximum permitted character count.
		max: usize,
	},
}

def_id! { PoolId, "Opaque identifier for a federated identity pool.", "Pool" }
def_id! { IdentityId, "Stable identifier for a principal within an identity pool.", "Identity" }
def_id! { ProviderName, "Registered name of a federated login provider.", "Provider" }

impl PoolId {
	/// Returns the service region encoded as the identifier's prefix.
	///
	/// Pool identifiers follow the `<region>:<pool-uuid>` convention; everything before the
	/// first `:` is the region. An identifier with no separator yields the whole string, so
	/// callers always receive a usable value for region-scoped configuration.
	pub fn region(&self) -> &str {
		match self.0.split_once(':') {
			Some((region, _)) => region,
			None => &self.0,
		}
	}
}

fn validate_view(kind: &'static str, view: &str) -> Result<(), IdentifierError> {
	if view.is_empty() {
		return Err(IdentifierError::Empty { kind });
	}
	if view.chars().any(char::is_whitespace) {
		return Err(IdentifierError::ContainsWhitespace { kind });
	}
	if view.len() > IDENTIFIER_MAX_LEN {
		return Err(IdentifierError::TooLong { kind, max: IDENTIFIER_MAX_LEN });
	}

	Ok(())
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn identifiers_reject_whitespace_and_empty_input() {
		assert!(PoolId::new(" us-east-1:pool").is_err(), "Leading whitespace must be rejected.");
		assert!(PoolId::new("us-east-1:pool ").is_err(), "Trailing whitespace must be rejected.");

		let pool =
			PoolId::new("us-east-1:pool-1").expect("Pool fixture should be considered valid.");

		assert_eq!(pool.as_ref(), "us-east-1:pool-1");
		assert!(IdentityId::new("").is_err());
		assert!(ProviderName::new("with space").is_err());
	}

	#[test]
	fn region_is_the_prefix_before_the_first_separator() {
		let pool = PoolId::new("us-east-1:abcd-1234").expect("Pool fixture should be valid.");

		assert_eq!(pool.region(), "us-east-1");

		let nested = PoolId::new("eu-west-2:outer:inner").expect("Pool fixture should be valid.");

		assert_eq!(nested.region(), "eu-west-2");
	}

	#[test]
	fn region_falls_back_to_the_whole_identifier() {
		let malformed = PoolId::new("unscoped-pool").expect("Pool fixture should be valid.");

		assert_eq!(malformed.region(), "unscoped-pool");
	}

	#[test]
	fn serde_round_trip_enforces_validation() {
		let payload = "\"us-east-1:pool-42\"";
		let pool: PoolId =
			serde_json::from_str(payload).expect("Pool should deserialize successfully.");

		assert_eq!(pool.as_ref(), "us-east-1:pool-42");
		assert!(serde_json::from_str::<PoolId>("\"with space\"").is_err());
		assert!(serde_json::from_str::<IdentityId>("\"\"").is_err());
	}

	#[test]
	fn unicode_whitespace_and_length_limits() {
		let nbsp = format!("identity{}id", '\u{00A0}');

		assert!(IdentityId::new(&nbsp).is_err());

		let exact = "a".repeat(IDENTIFIER_MAX_LEN);

		IdentityId::new(&exact).expect("Exact length should succeed.");

		let too_long = "a".repeat(IDENTIFIER_MAX_LEN + 1);

		assert!(IdentityId::new(&too_long).is_err());
	}

	#[test]
	fn borrow_supports_fast_lookup() {
		let map: HashMap<IdentityId, u8> = HashMap::from_iter([(
			IdentityId::new("us-east-1:principal").expect("Identity for lookup should be valid."),
			7_u8,
		)]);

		assert_eq!(map.get("us-east-1:principal"), Some(&7));
	}
}
