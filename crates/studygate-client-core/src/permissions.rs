use std::{cell::RefCell, fmt::Debug, rc::Rc};

use reqwest::StatusCode;
use studygate_shared::{
    const_config::{
        dom::{
            DOM_ADMIN_ONLY_SELECTOR, DOM_DELETE_ACTION_SELECTOR, DOM_UNKNOWN_ROLE,
            DOM_USER_PERMISSIONS_ID, DOM_USER_ROLE_ID,
        },
        messages::{
            MSG_DELETE_CONFIRM, MSG_DELETE_FAILED, MSG_DELETE_FORBIDDEN,
            MSG_DELETE_NOT_PERMITTED, MSG_DELETE_SUCCESS,
        },
        path::{path_api_entity_delete, PATH_API_STUDIES_PERMISSIONS},
    },
    uac::{ErrorBody, MessageBody, PermissionKind, PermissionSet},
};
use tracing::{debug, error, info};

use crate::{
    traits::{HttpTransport, PageView, UserPrompt},
    transport::{CONTENT_TYPE_JSON, HEADER_CONTENT_TYPE},
    ApiRequest, ApiResponse,
};

/// Loads the permissions of the current user once and hides what they are not
/// allowed to use
pub struct PermissionGate<T> {
    transport: Rc<T>,
    page: Rc<dyn PageView>,
    prompt: Rc<dyn UserPrompt>,
    user_permissions: RefCell<Option<PermissionSet>>,
}

impl<T> Debug for PermissionGate<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PermissionGate")
            .field("user_permissions", &self.user_permissions)
            .finish_non_exhaustive()
    }
}

impl<T: HttpTransport> PermissionGate<T> {
    /// Does not load anything, see [`Self::init`]
    pub fn new(transport: Rc<T>, page: Rc<dyn PageView>, prompt: Rc<dyn UserPrompt>) -> Self {
        Self {
            transport,
            page,
            prompt,
            user_permissions: RefCell::new(None),
        }
    }

    /// Loads the permissions then updates the page. The page is updated even
    /// if loading failed
    #[tracing::instrument(skip(self))]
    pub async fn init(&self) {
        self.load_user_permissions().await;
        self.update_ui();
    }

    /// Current permission set, [`None`] until a load produced one
    pub fn user_permissions(&self) -> Option<PermissionSet> {
        self.user_permissions.borrow().clone()
    }

    /// A response that is not ok replaces the permissions with
    /// [`PermissionSet::fallback`]. If no usable response arrives the previous
    /// value is left in place.
    ///
    /// NB: These two failure modes are intentionally not unified, the intent
    /// of the server side behaviour is not known
    #[tracing::instrument(skip(self))]
    pub async fn load_user_permissions(&self) {
        let request = ApiRequest::from_spec(&PATH_API_STUDIES_PERMISSIONS);
        let response = match self.transport.send(request).await {
            Ok(response) => response,
            Err(e) => {
                error!(error = %e, "Error loading user permissions");
                return;
            }
        };

        if !response.is_success() {
            error!(status = %response.status, "Failed to load user permissions");
            *self.user_permissions.borrow_mut() = Some(PermissionSet::fallback());
            return;
        }

        match response.json::<PermissionSet>() {
            Ok(permissions) => {
                info!(?permissions, "User permissions loaded");
                *self.user_permissions.borrow_mut() = Some(permissions);
            }
            Err(e) => error!(error = %e, "Error loading user permissions"),
        }
    }

    fn has(&self, kind: PermissionKind) -> bool {
        self.user_permissions
            .borrow()
            .as_ref()
            .is_some_and(|set| set.has(kind))
    }

    pub fn can_read(&self) -> bool {
        self.has(PermissionKind::Read)
    }

    pub fn can_create(&self) -> bool {
        self.has(PermissionKind::Create)
    }

    pub fn can_update(&self) -> bool {
        self.has(PermissionKind::Update)
    }

    pub fn can_delete(&self) -> bool {
        self.has(PermissionKind::Delete)
    }

    pub fn can_import(&self) -> bool {
        self.has(PermissionKind::Import)
    }

    pub fn can_export(&self) -> bool {
        self.has(PermissionKind::Export)
    }

    pub fn is_admin(&self) -> bool {
        self.user_permissions
            .borrow()
            .as_ref()
            .is_some_and(PermissionSet::is_admin)
    }

    /// Applies the current permissions to the page. Only hides, never shows
    #[tracing::instrument(skip(self))]
    pub fn update_ui(&self) {
        if !self.can_delete() {
            let count = self.page.hide_all(DOM_DELETE_ACTION_SELECTOR, true);
            debug!(count, "delete actions hidden");
        }

        if !self.is_admin() {
            let count = self.page.hide_all(DOM_ADMIN_ONLY_SELECTOR, false);
            debug!(count, "admin only elements hidden");
        }

        let user_permissions = self.user_permissions.borrow();
        let role = user_permissions
            .as_ref()
            .and_then(PermissionSet::role_display)
            .unwrap_or(DOM_UNKNOWN_ROLE);
        self.page.set_text(DOM_USER_ROLE_ID, role);

        if let Some(set) = user_permissions.as_ref() {
            self.page
                .set_text(DOM_USER_PERMISSIONS_ID, &set.permissions_display());
        }
    }

    /// Asks for confirmation then deletes the entity. Returns `true` only if
    /// the server reports the entity as deleted. The user is told the outcome
    /// in every case except when they decline
    #[tracing::instrument(skip(self))]
    pub async fn perform_delete(
        &self,
        entity_type: &str,
        entity_id: &str,
        confirm_message: Option<&str>,
    ) -> bool {
        if !self.can_delete() {
            self.prompt.alert(MSG_DELETE_NOT_PERMITTED);
            return false;
        }

        if !self
            .prompt
            .confirm(confirm_message.unwrap_or(MSG_DELETE_CONFIRM))
        {
            return false;
        }

        let request = ApiRequest::from_spec(&path_api_entity_delete(entity_type, entity_id))
            .header(HEADER_CONTENT_TYPE, CONTENT_TYPE_JSON);
        let response = match self.transport.send(request).await {
            Ok(response) => response,
            Err(e) => {
                error!(error = %e, "Delete error");
                self.prompt.alert(&format!("Error deleting item: {e}"));
                return false;
            }
        };

        let (message, is_deleted) = delete_outcome(&response);
        self.prompt.alert(&message);
        is_deleted
    }
}

/// Message for the user and if the delete succeeded
fn delete_outcome(response: &ApiResponse) -> (String, bool) {
    if response.is_success() {
        // Some endpoints answer with plain text instead of a JSON object
        let message = match MessageBody::parse(&response.body) {
            Some(body) => body.message,
            None => Some(response.body.trim().to_string()).filter(|x| !x.is_empty()),
        };
        (message.unwrap_or_else(|| MSG_DELETE_SUCCESS.to_string()), true)
    } else if response.status == StatusCode::FORBIDDEN {
        (MSG_DELETE_FORBIDDEN.to_string(), false)
    } else {
        let reason = ErrorBody::parse(&response.body)
            .and_then(|body| body.error)
            .unwrap_or_else(|| MSG_DELETE_FAILED.to_string());
        (format!("Error: {reason}"), false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case::json_message(StatusCode::OK, r#"{"message":"Study removed"}"#, "Study removed", true)]
    #[case::json_without_message(StatusCode::OK, "{}", MSG_DELETE_SUCCESS, true)]
    #[case::plain_text(StatusCode::OK, "Study deleted successfully", "Study deleted successfully", true)]
    #[case::empty_body(StatusCode::NO_CONTENT, "", MSG_DELETE_SUCCESS, true)]
    #[case::forbidden_ignores_body(StatusCode::FORBIDDEN, r#"{"error":"nope"}"#, MSG_DELETE_FORBIDDEN, false)]
    #[case::error_field(StatusCode::NOT_FOUND, r#"{"error":"Study not found"}"#, "Error: Study not found", false)]
    #[case::error_without_field(StatusCode::INTERNAL_SERVER_ERROR, "{}", "Error: Failed to delete item", false)]
    #[case::error_plain_text(StatusCode::INTERNAL_SERVER_ERROR, "boom", "Error: Failed to delete item", false)]
    fn delete_outcomes(
        #[case] status: StatusCode,
        #[case] body: &str,
        #[case] expected_message: &str,
        #[case] expected_deleted: bool,
    ) {
        let (message, is_deleted) = delete_outcome(&ApiResponse::new(status, body));
        assert_eq!(message, expected_message);
        assert_eq!(is_deleted, expected_deleted);
    }
}
