//! Persisted client state.

mod credential;

pub use credential::{CredentialStore, TOKEN_KEY};
