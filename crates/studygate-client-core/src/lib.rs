//! Client side session handling and permission gating
//!
//! Everything the modules touch outside of themselves (storage, dialogs,
//! navigation, the page and the network) is injected through the traits in
//! [`traits`] so the same logic runs in the browser, in the CLI and in tests.
//! NB: The assumption is made that the async runtime has already been started
//! before any functions from this library are called

#![warn(unused_crate_dependencies)]


mod errors;
mod permissions;
mod session;
mod store;
pub mod traits;
mod transport;

#[cfg(target_arch = "wasm32")]
pub mod web;

pub use errors::{SessionError, StoreError, TransportError};
pub use permissions::PermissionGate;
pub use session::{AuthFailure, AuthStatus, CredentialStore, LoginOutcome, SessionHelper};
pub use store::MemoryStore;
#[cfg(not(target_arch = "wasm32"))]
pub use store::FileStore;
pub use transport::{ApiRequest, ApiResponse, FetchOptions, ReqwestTransport};
