//! Capabilities the session helper and permission gate depend on
//!
//! All of them are used from a single thread so none require `Send` and
//! implementations use interior mutability where they need to record state

use crate::{ApiRequest, ApiResponse, StoreError, TransportError};

/// String key/value storage with a single scope (persistent or per session)
pub trait KeyValueStore {
    /// Returns [`None`] if the key is not set
    fn get(&self, key: &str) -> Option<String>;
    fn set(&self, key: &str, value: &str) -> Result<(), StoreError>;
    fn remove(&self, key: &str) -> Result<(), StoreError>;
}

/// Blocking dialogs shown to the user
pub trait UserPrompt {
    /// Returns `true` if the user accepted
    fn confirm(&self, message: &str) -> bool;
    fn alert(&self, message: &str);
}

pub trait Navigator {
    fn navigate(&self, path: &str);
    fn reload(&self);
}

/// The parts of the current page that get updated
///
/// Every method reports if the target was found so callers can treat missing
/// elements as a no-op
pub trait PageView {
    /// Hides every element matching `selector` and also disables them if
    /// `disable` is set. Returns the number of elements hidden
    fn hide_all(&self, selector: &str, disable: bool) -> usize;
    fn set_text(&self, element_id: &str, text: &str) -> bool;
    fn set_html(&self, element_id: &str, html: &str) -> bool;
    /// Runs `handler` every time the element is activated
    fn on_click(&self, element_id: &str, handler: Box<dyn FnMut()>) -> bool;
}

/// Sends requests to the server. Paths in [`ApiRequest`] are relative to the
/// server the implementation is bound to
#[allow(async_fn_in_trait)] // Futures are never sent between threads
pub trait HttpTransport {
    async fn send(&self, request: ApiRequest) -> Result<ApiResponse, TransportError>;
}
