//! Authentication state for the Auto Deploy client.
//!
//! This module provides:
//! - `SessionStore`: the persisted token/user pair and the only reader and
//!   writer of it
//! - `CredentialStore`: optional OS keychain storage for login passwords
//!
//! Sessions survive restarts through the configured key-value store and are
//! cleared on logout or when the backend rejects the token.

pub mod credentials;
pub mod session;

pub use credentials::CredentialStore;
pub use session::{SessionData, SessionError, SessionStore, TOKEN_KEY, USER_KEY};
