use reqwest::Method;
use rstest::rstest;
use serde_json::json;
use studygate_shared::uac::PermissionSet;
use studygate_test_helper::{FakeElement, FakePage, TestEnv};

const DELETE_SELECTOR: &str = r#".delete-btn, [data-action="delete"]"#;

fn viewer() -> serde_json::Value {
    json!({
        "role": "viewer",
        "isAdmin": false,
        "permissions": {
            "read": true,
            "create": false,
            "update": false,
            "delete": false,
            "import": false,
            "export": false
        }
    })
}

fn admin() -> serde_json::Value {
    json!({
        "username": "admin",
        "role": "ROLE_ADMIN",
        "isAdmin": true,
        "permissions": {
            "read": true,
            "create": true,
            "update": true,
            "delete": true,
            "import": true,
            "export": true
        }
    })
}

fn assert_nothing_granted(env: &TestEnv) {
    let gate = env.permission_gate();
    assert!(!gate.can_read());
    assert!(!gate.can_create());
    assert!(!gate.can_update());
    assert!(!gate.can_delete());
    assert!(!gate.is_admin());
}

#[test]
fn nothing_granted_before_loading() {
    // Arrange
    let env = TestEnv::new();

    // Act + Assert
    assert_nothing_granted(&env);
    let gate = env.permission_gate();
    assert!(!gate.can_import());
    assert!(!gate.can_export());
    assert_eq!(gate.user_permissions(), None);
}

#[tokio::test]
async fn viewer_permissions() {
    // Arrange
    let env = TestEnv::new().with_page(FakePage::full());
    env.transport.push_json(200, viewer());
    let gate = env.permission_gate();

    // Act
    gate.init().await;

    // Assert
    assert!(gate.can_read());
    assert!(!gate.can_create());
    assert!(!gate.can_update());
    assert!(!gate.can_delete());
    assert!(!gate.is_admin());
    assert_eq!(env.page.text_of("user-role").as_deref(), Some("viewer"));
    assert_eq!(env.page.text_of("user-permissions").as_deref(), Some("READ"));
    let request = env.transport.last_request().unwrap();
    assert_eq!(request.method, Method::GET);
    assert_eq!(request.path, "/api/studies/permissions");
}

#[tokio::test]
async fn admin_sees_everything() {
    // Arrange
    let env = TestEnv::new().with_page(FakePage::full());
    env.transport.push_json(200, admin());
    let gate = env.permission_gate();

    // Act
    gate.init().await;

    // Assert
    assert!(gate.is_admin());
    assert!(gate.can_import());
    assert!(gate.can_export());
    assert!(env.page.elements().iter().all(|x| !x.is_hidden && !x.is_disabled));
    assert_eq!(env.page.text_of("user-role").as_deref(), Some("ROLE_ADMIN"));
    assert_eq!(
        env.page.text_of("user-permissions").as_deref(),
        Some("READ, CREATE, UPDATE, DELETE, IMPORT, EXPORT")
    );
}

#[tokio::test]
async fn failed_response_uses_fallback() {
    // Arrange
    let env = TestEnv::new().with_page(FakePage::full());
    env.transport.push_json(500, json!({"error": "boom"}));
    let gate = env.permission_gate();

    // Act
    gate.init().await;

    // Assert
    assert_eq!(gate.user_permissions(), Some(PermissionSet::fallback()));
    assert!(!gate.can_read());
    assert!(!gate.can_create());
    assert!(!gate.can_update());
    assert!(!gate.can_delete());
    assert!(!gate.is_admin());
    assert!(env.page.matching(".admin-only").iter().all(|x| x.is_hidden));
    assert_eq!(env.page.text_of("user-role").as_deref(), Some("Unknown"));
    assert_eq!(env.page.text_of("user-permissions").as_deref(), Some(""));
}

#[tokio::test]
async fn network_failure_on_first_load_leaves_nothing_loaded() {
    // Arrange
    let env = TestEnv::new().with_page(FakePage::full());
    env.transport.push_network_error("connection refused");
    let gate = env.permission_gate();

    // Act
    gate.init().await;

    // Assert
    assert_eq!(gate.user_permissions(), None);
    assert!(!gate.can_read());
    assert!(!gate.can_delete());
    assert!(!gate.is_admin());
    // Page is still updated
    assert!(env.page.matching(DELETE_SELECTOR).iter().all(|x| x.is_hidden));
    assert_eq!(env.page.text_of("user-role").as_deref(), Some("Unknown"));
    assert_eq!(env.page.text_of("user-permissions"), None);
}

#[tokio::test]
async fn network_failure_keeps_previous_permissions() {
    // Arrange
    let env = TestEnv::new();
    env.transport.push_json(200, admin());
    env.transport.push_network_error("connection reset");
    let gate = env.permission_gate();
    gate.load_user_permissions().await;
    assert!(gate.can_delete());

    // Act
    gate.load_user_permissions().await;

    // Assert
    assert!(gate.can_delete());
    assert!(gate.is_admin());
    assert_eq!(env.transport.request_count(), 2);
}

#[tokio::test]
async fn unreadable_body_keeps_previous_permissions() {
    let env = TestEnv::new();
    env.transport.push_json(200, viewer());
    env.transport.push_response(200, "<html>login</html>");
    let gate = env.permission_gate();
    gate.load_user_permissions().await;

    gate.load_user_permissions().await;

    assert!(gate.can_read());
    assert_eq!(gate.user_permissions().unwrap().role.as_deref(), Some("viewer"));
}

#[tokio::test]
async fn failed_response_replaces_previous_permissions() {
    let env = TestEnv::new();
    env.transport.push_json(200, admin());
    env.transport.push_response(403, "");
    let gate = env.permission_gate();
    gate.load_user_permissions().await;

    gate.load_user_permissions().await;

    assert!(!gate.can_delete());
    assert!(!gate.is_admin());
}

#[rstest]
#[case::allowed(true)]
#[case::denied(false)]
#[tokio::test]
async fn delete_actions_hidden_exactly_when_not_allowed(#[case] can_delete: bool) {
    // Arrange
    let page = FakePage::new()
        .with_element(FakeElement::new().class("delete-btn"))
        .with_element(FakeElement::new().class("delete-btn").class("small"))
        .with_element(FakeElement::new().attr("data-action", "delete"))
        .with_element(FakeElement::new().attr("data-action", "edit"))
        .with_element(FakeElement::new().class("edit-btn"));
    let env = TestEnv::new().with_page(page);
    let mut body = viewer();
    body["permissions"]["delete"] = json!(can_delete);
    env.transport.push_json(200, body);
    let gate = env.permission_gate();

    // Act
    gate.init().await;

    // Assert
    assert_eq!(gate.can_delete(), can_delete);
    let delete_actions = env.page.matching(DELETE_SELECTOR);
    assert_eq!(delete_actions.len(), 3);
    for element in delete_actions {
        assert_eq!(element.is_hidden, !can_delete, "{element:?}");
        assert_eq!(element.is_disabled, !can_delete, "{element:?}");
    }
    for element in env
        .page
        .elements()
        .into_iter()
        .filter(|x| !x.matches(DELETE_SELECTOR))
    {
        assert!(!element.is_hidden, "{element:?}");
    }
}

#[tokio::test]
async fn admin_only_hidden_but_not_disabled() {
    let env = TestEnv::new().with_page(FakePage::full());
    env.transport.push_json(200, viewer());
    let gate = env.permission_gate();

    gate.init().await;

    let admin_only = env.page.matching(".admin-only");
    assert_eq!(admin_only.len(), 1);
    assert!(admin_only[0].is_hidden);
    assert!(!admin_only[0].is_disabled);
}

#[tokio::test]
async fn page_without_display_elements() {
    let env = TestEnv::new().with_page(FakePage::new());
    env.transport.push_json(200, viewer());
    let gate = env.permission_gate();

    gate.init().await;

    assert!(env.page.elements().is_empty());
}

#[tokio::test]
async fn delete_without_permission_sends_nothing() {
    // Arrange
    let env = TestEnv::new();
    env.transport.push_json(200, viewer());
    let gate = env.permission_gate();
    gate.load_user_permissions().await;

    // Act
    let is_deleted = gate.perform_delete("studies", "42", None).await;

    // Assert
    assert!(!is_deleted);
    assert_eq!(
        env.prompt.alerts(),
        vec!["You do not have permission to delete items. Contact an administrator."]
    );
    assert!(env.prompt.confirms().is_empty());
    assert_eq!(env.transport.request_count(), 1, "only the permissions request");
}

#[tokio::test]
async fn delete_before_loading_sends_nothing() {
    let env = TestEnv::new();
    let gate = env.permission_gate();

    let is_deleted = gate.perform_delete("studies", "42", None).await;

    assert!(!is_deleted);
    assert_eq!(env.transport.request_count(), 0);
}

#[tokio::test]
async fn delete_declined() {
    // Arrange
    let env = TestEnv::new();
    env.transport.push_json(200, admin());
    env.prompt.push_answer(false);
    let gate = env.permission_gate();
    gate.load_user_permissions().await;

    // Act
    let is_deleted = gate
        .perform_delete("studies", "42", Some("Delete study ST-042?"))
        .await;

    // Assert
    assert!(!is_deleted);
    assert_eq!(env.prompt.confirms(), vec!["Delete study ST-042?"]);
    assert!(env.prompt.alerts().is_empty());
    assert_eq!(env.transport.request_count(), 1);
}

#[tokio::test]
async fn delete_success() {
    // Arrange
    let env = TestEnv::new();
    env.transport.push_json(200, admin());
    env.transport
        .push_json(200, json!({"message": "Study deleted"}));
    let gate = env.permission_gate();
    gate.load_user_permissions().await;

    // Act
    let is_deleted = gate.perform_delete("studies", "42", None).await;

    // Assert
    assert!(is_deleted);
    assert_eq!(
        env.prompt.confirms(),
        vec!["Are you sure you want to delete this item?"]
    );
    assert_eq!(env.prompt.alerts(), vec!["Study deleted"]);
    let request = env.transport.last_request().unwrap();
    assert_eq!(request.method, Method::DELETE);
    assert_eq!(request.path, "/api/studies/42");
    assert_eq!(request.header_value("Content-Type"), Some("application/json"));
}

#[rstest]
#[case::forbidden(403, r#"{"error":"Access denied"}"#, "You do not have permission to delete this item.")]
#[case::not_found(404, r#"{"error":"Study not found"}"#, "Error: Study not found")]
#[case::no_error_field(500, "{}", "Error: Failed to delete item")]
#[tokio::test]
async fn delete_rejected(#[case] status: u16, #[case] body: &str, #[case] expected_alert: &str) {
    // Arrange
    let env = TestEnv::new();
    env.transport.push_json(200, admin());
    env.transport.push_response(status, body);
    let gate = env.permission_gate();
    gate.load_user_permissions().await;

    // Act
    let is_deleted = gate.perform_delete("chemicals", "7", None).await;

    // Assert
    assert!(!is_deleted);
    assert_eq!(env.prompt.alerts(), vec![expected_alert]);
}

#[tokio::test]
async fn delete_network_failure() {
    let env = TestEnv::new();
    env.transport.push_json(200, admin());
    env.transport.push_network_error("connection refused");
    let gate = env.permission_gate();
    gate.load_user_permissions().await;

    let is_deleted = gate.perform_delete("studies", "42", None).await;

    assert!(!is_deleted);
    assert_eq!(
        env.prompt.alerts(),
        vec!["Error deleting item: connection refused"]
    );
}
