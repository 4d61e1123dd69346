//! # mnemo-auth
//!
//! Identity and session layer for mnemo: password hashing, signed
//! session tokens, and the identity manager that ties them to the user
//! collection.
//!
//! Expected negative outcomes (bad password, expired token) are typed
//! failure values, never panics; the API layer translates them into
//! user-facing responses.

pub mod identity;
pub mod token;
pub mod vault;

pub use identity::IdentityManager;
pub use token::{Claims, TokenService, TOKEN_LIFETIME_SECS};
pub use vault::CredentialVault;
