//! Auth-domain identifiers, secrets, credentials, and user records.

pub mod credentials;
pub mod id;
pub mod secret;
pub mod user;

pub use credentials::*;
pub use id::*;
pub use secret::*;
pub use user::*;
