// src/auth/mod.rs
// Session and credential handling

pub mod claims;
pub mod session;
pub mod token_store;

pub use claims::{Claims, Identity, Role, decode_claims, identity_from_token};
pub use session::{SessionManager, SessionState};
pub use token_store::{FileTokenStore, MemoryTokenStore, TokenStore};
