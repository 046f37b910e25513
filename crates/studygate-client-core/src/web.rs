//! Implementations of the capabilities backed by the browser
//!
//! Only available when compiling to wasm

use std::rc::Rc;

use studygate_shared::const_config::dom::DOM_USER_INFO_ID;
use tracing::warn;
use wasm_bindgen::{closure::Closure, JsCast as _};

use crate::{
    session::CredentialStore,
    traits::{KeyValueStore, Navigator, PageView, UserPrompt},
    PermissionGate, ReqwestTransport, SessionHelper, StoreError, TransportError,
};

/// `localStorage` or `sessionStorage`
#[derive(Debug, Clone)]
pub struct WebStorage {
    storage: web_sys::Storage,
}

/// Uses `window.confirm` and `window.alert`
#[derive(Debug, Clone)]
pub struct BrowserPrompt {
    window: web_sys::Window,
}

#[derive(Debug, Clone)]
pub struct BrowserNavigator {
    window: web_sys::Window,
}

#[derive(Debug, Clone)]
pub struct DocumentView {
    document: web_sys::Document,
}

#[derive(thiserror::Error, Debug)]
pub enum WebSetupError {
    #[error("No window found")]
    NoWindow,
    #[error("No document found (No DOM)")]
    NoDocument,
    #[error("Unable to determine page origin")]
    NoOrigin,
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error(transparent)]
    Transport(#[from] TransportError),
}

fn window() -> Result<web_sys::Window, WebSetupError> {
    web_sys::window().ok_or(WebSetupError::NoWindow)
}

fn js_error_text(value: wasm_bindgen::JsValue) -> String {
    value
        .as_string()
        .unwrap_or_else(|| format!("{value:?}"))
}

impl WebStorage {
    pub fn local() -> Result<Self, WebSetupError> {
        let storage = window()?
            .local_storage()
            .map_err(|e| StoreError::Unavailable(js_error_text(e)))?
            .ok_or_else(|| StoreError::Unavailable("localStorage".to_string()))?;
        Ok(Self { storage })
    }

    pub fn session() -> Result<Self, WebSetupError> {
        let storage = window()?
            .session_storage()
            .map_err(|e| StoreError::Unavailable(js_error_text(e)))?
            .ok_or_else(|| StoreError::Unavailable("sessionStorage".to_string()))?;
        Ok(Self { storage })
    }
}

impl KeyValueStore for WebStorage {
    fn get(&self, key: &str) -> Option<String> {
        match self.storage.get_item(key) {
            Ok(value) => value,
            Err(e) => {
                warn!(key, error = %js_error_text(e), "failed to read from storage");
                None
            }
        }
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        self.storage
            .set_item(key, value)
            .map_err(|e| StoreError::Write(js_error_text(e)))
    }

    fn remove(&self, key: &str) -> Result<(), StoreError> {
        self.storage
            .remove_item(key)
            .map_err(|e| StoreError::Write(js_error_text(e)))
    }
}

impl BrowserPrompt {
    pub fn new() -> Result<Self, WebSetupError> {
        Ok(Self { window: window()? })
    }
}

impl UserPrompt for BrowserPrompt {
    fn confirm(&self, message: &str) -> bool {
        self.window.confirm_with_message(message).unwrap_or(false)
    }

    fn alert(&self, message: &str) {
        if let Err(e) = self.window.alert_with_message(message) {
            warn!(error = %js_error_text(e), "failed to show alert");
        }
    }
}

impl BrowserNavigator {
    pub fn new() -> Result<Self, WebSetupError> {
        Ok(Self { window: window()? })
    }
}

impl Navigator for BrowserNavigator {
    fn navigate(&self, path: &str) {
        if let Err(e) = self.window.location().set_href(path) {
            warn!(path, error = %js_error_text(e), "failed to navigate");
        }
    }

    fn reload(&self) {
        if let Err(e) = self.window.location().reload() {
            warn!(error = %js_error_text(e), "failed to reload");
        }
    }
}

impl DocumentView {
    pub fn new() -> Result<Self, WebSetupError> {
        let document = window()?.document().ok_or(WebSetupError::NoDocument)?;
        Ok(Self { document })
    }
}

impl PageView for DocumentView {
    fn hide_all(&self, selector: &str, disable: bool) -> usize {
        let nodes = match self.document.query_selector_all(selector) {
            Ok(nodes) => nodes,
            Err(e) => {
                warn!(selector, error = %js_error_text(e), "invalid selector");
                return 0;
            }
        };
        let mut count = 0;
        for i in 0..nodes.length() {
            let Some(element) = nodes
                .item(i)
                .and_then(|node| node.dyn_into::<web_sys::HtmlElement>().ok())
            else {
                continue;
            };
            if let Err(e) = element.style().set_property("display", "none") {
                warn!(error = %js_error_text(e), "failed to hide element");
                continue;
            }
            if disable {
                if let Err(e) = element.set_attribute("disabled", "") {
                    warn!(error = %js_error_text(e), "failed to disable element");
                }
            }
            count += 1;
        }
        count
    }

    fn set_text(&self, element_id: &str, text: &str) -> bool {
        match self.document.get_element_by_id(element_id) {
            Some(element) => {
                element.set_text_content(Some(text));
                true
            }
            None => false,
        }
    }

    fn set_html(&self, element_id: &str, html: &str) -> bool {
        match self.document.get_element_by_id(element_id) {
            Some(element) => {
                element.set_inner_html(html);
                true
            }
            None => false,
        }
    }

    fn on_click(&self, element_id: &str, handler: Box<dyn FnMut()>) -> bool {
        let Some(element) = self.document.get_element_by_id(element_id) else {
            return false;
        };
        let closure = Closure::<dyn FnMut()>::wrap(handler);
        let result =
            element.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
        // The listener lives as long as the page so the closure must not be dropped
        closure.forget();
        match result {
            Ok(()) => true,
            Err(e) => {
                warn!(element_id, error = %js_error_text(e), "failed to bind click");
                false
            }
        }
    }
}

fn page_transport() -> Result<Rc<ReqwestTransport>, WebSetupError> {
    let origin = window()?
        .location()
        .origin()
        .map_err(|_| WebSetupError::NoOrigin)?;
    Ok(Rc::new(ReqwestTransport::try_new(origin)?))
}

/// Session helper bound to the current page's storage and dialogs
pub fn page_session_helper() -> Result<SessionHelper<ReqwestTransport>, WebSetupError> {
    let credentials = CredentialStore::new(
        Rc::new(WebStorage::local()?),
        Rc::new(WebStorage::session()?),
    );
    Ok(SessionHelper::new(
        page_transport()?,
        credentials,
        Rc::new(BrowserPrompt::new()?),
        Rc::new(BrowserNavigator::new()?),
    ))
}

/// Builds the gate for the current page and starts loading permissions in
/// the background. The page is updated once loading settles, other scripts
/// on the page are not waited for
pub fn start_permission_gate() -> Result<Rc<PermissionGate<ReqwestTransport>>, WebSetupError> {
    let gate = Rc::new(PermissionGate::new(
        page_transport()?,
        Rc::new(DocumentView::new()?),
        Rc::new(BrowserPrompt::new()?),
    ));
    let background = Rc::clone(&gate);
    wasm_bindgen_futures::spawn_local(async move {
        background.init().await;
    });
    Ok(gate)
}

/// Renders the welcome widget into the default container
pub fn display_page_user_info() -> Result<(), WebSetupError> {
    let session = page_session_helper()?;
    session.display_user_info(&DocumentView::new()?, DOM_USER_INFO_ID);
    Ok(())
}
