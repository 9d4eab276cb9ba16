//! # Quill Client
//!
//! Typed access to the Quill REST API: a thin `ApiClient` over reqwest, a
//! `Session` state machine for persisted credentials, and a `PostStore`
//! mirroring the server-side post list with post-confirmation
//! reconciliation.

mod api;
mod error;
mod session;
mod store;

pub use api::{ApiClient, PostList, PostListParams};
pub use error::ClientError;
pub use session::{CredentialStore, Credentials, FileCredentialStore, Session, SessionState};
pub use store::PostStore;
