//! Session handling for API consumers.

pub mod api;
pub mod auth_context;
pub mod token_store;

pub use api::{AuthApi, ClientError, HttpAuthApi, Session};
pub use auth_context::{AuthContext, AuthState, Navigator, SignInResult};
pub use token_store::{MemoryTokenStore, TokenStore};
