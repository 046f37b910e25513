//! Stores settings that are not expected to need to change but grouped together
//! for discoverability and reuse. Each constant should be prefixed by the module
//! name to allow importing the constant only and still be readable

pub mod path {
    mod path_spec;
    pub use path_spec::PathSpec;
    pub const PATH_API_LOGIN: PathSpec = PathSpec::post("/api/login");
    pub const PATH_API_LOGOUT: PathSpec = PathSpec::post("/api/logout");
    pub const PATH_API_PROFILE: PathSpec = PathSpec::get("/api/profile");
    pub const PATH_API_STUDIES_PERMISSIONS: PathSpec = PathSpec::get("/api/studies/permissions");
    /// Entity deletes are built as `/api/<entity_type>/<entity_id>`
    pub const PATH_API_PREFIX: &str = "/api";

    /// Pages the browser is sent to (not API endpoints)
    pub const PATH_PAGE_HOME: &str = "/";
    pub const PATH_PAGE_LOGIN: &str = "/login";

    pub fn path_api_entity_delete(entity_type: &str, entity_id: &str) -> PathSpec {
        PathSpec::delete(format!("{PATH_API_PREFIX}/{entity_type}/{entity_id}"))
    }
}

/// Keys used in client side key/value storage
pub mod storage {
    /// Stored in both the persistent and the session scope
    pub const STORAGE_KEY_AUTH_TOKEN: &str = "jwt-token";
    /// Only ever stored in the persistent scope
    pub const STORAGE_KEY_USERNAME: &str = "username";
}

/// Selectors and element ids the host page is expected to provide
pub mod dom {
    pub const DOM_DELETE_ACTION_SELECTOR: &str = r#".delete-btn, [data-action="delete"]"#;
    pub const DOM_ADMIN_ONLY_SELECTOR: &str = ".admin-only";
    pub const DOM_USER_ROLE_ID: &str = "user-role";
    pub const DOM_USER_PERMISSIONS_ID: &str = "user-permissions";
    pub const DOM_USER_INFO_ID: &str = "user-info";
    pub const DOM_UNKNOWN_ROLE: &str = "Unknown";
}

/// Text shown to the user in prompts and alerts
pub mod messages {
    pub const MSG_LOGIN_REQUIRED: &str = "Please log in to access this page.";
    pub const MSG_LOGIN_QUESTION: &str = "Would you like to log in now?";
    pub const MSG_SESSION_EXPIRED: &str = "Your session has expired.";
    pub const MSG_DELETE_CONFIRM: &str = "Are you sure you want to delete this item?";
    pub const MSG_DELETE_NOT_PERMITTED: &str =
        "You do not have permission to delete items. Contact an administrator.";
    pub const MSG_DELETE_FORBIDDEN: &str = "You do not have permission to delete this item.";
    pub const MSG_DELETE_SUCCESS: &str = "Item deleted successfully";
    pub const MSG_DELETE_FAILED: &str = "Failed to delete item";
}
