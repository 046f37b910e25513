//! Runs only in a browser. From the folder "crates/studygate-client-core" run
//! one of the following to execute the tests
//! - `wasm-pack test --headless --firefox`
//! - `wasm-pack test --headless --chrome`
#![cfg(target_arch = "wasm32")]

use studygate_client_core::{
    traits::{KeyValueStore, PageView},
    web::{DocumentView, WebStorage},
    CredentialStore,
};
use studygate_shared::const_config::storage::{STORAGE_KEY_AUTH_TOKEN, STORAGE_KEY_USERNAME};
use wasm_bindgen_test::wasm_bindgen_test;
use wasm_bindgen_test::wasm_bindgen_test_configure;

wasm_bindgen_test_configure!(run_in_browser);

#[wasm_bindgen_test]
fn web_storage_set_get_remove() {
    // Arrange
    let store = WebStorage::session().unwrap();
    let key = "studygate-test-key";

    // Act
    store.set(key, "value").unwrap();

    // Assert
    assert_eq!(store.get(key).as_deref(), Some("value"));
    store.remove(key).unwrap();
    assert_eq!(store.get(key), None);
}

#[wasm_bindgen_test]
fn credentials_in_browser_storage() {
    // Arrange
    let credentials = CredentialStore::new(
        std::rc::Rc::new(WebStorage::local().unwrap()),
        std::rc::Rc::new(WebStorage::session().unwrap()),
    );
    credentials.clear();
    assert!(!credentials.is_logged_in());
    let local = WebStorage::local().unwrap();
    local.set(STORAGE_KEY_AUTH_TOKEN, "tok123").unwrap();
    local.set(STORAGE_KEY_USERNAME, "alice").unwrap();

    // Act + Assert
    assert!(credentials.is_logged_in());
    assert_eq!(credentials.auth_token().unwrap().expose(), "tok123");
    assert_eq!(credentials.username().unwrap().to_string(), "alice");

    credentials.clear();
    assert!(!credentials.is_logged_in());
    assert_eq!(local.get(STORAGE_KEY_AUTH_TOKEN), None);
}

#[wasm_bindgen_test]
fn document_view_hides_and_writes_text() {
    // Arrange
    let document = web_sys::window().unwrap().document().unwrap();
    let body = document.body().unwrap();
    body.set_inner_html(
        r#"<button class="delete-btn">Delete</button>
        <a data-action="delete">Remove</a>
        <span id="user-role"></span>"#,
    );
    let view = DocumentView::new().unwrap();

    // Act
    let hidden = view.hide_all(r#".delete-btn, [data-action="delete"]"#, true);
    let is_written = view.set_text("user-role", "viewer");

    // Assert
    assert_eq!(hidden, 2);
    assert!(is_written);
    assert!(!view.set_text("missing", "x"));
    let role = document.get_element_by_id("user-role").unwrap();
    assert_eq!(role.text_content().as_deref(), Some("viewer"));
    let button = document.query_selector(".delete-btn").unwrap().unwrap();
    assert!(button.has_attribute("disabled"));
}
