use strum::IntoEnumIterator as _;

/// Actions the server may grant on studies
///
/// Declaration order is the order used when the granted permissions are
/// listed for display
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    strum::Display,
    strum::EnumIter,
    strum::EnumCount,
)]
#[strum(serialize_all = "UPPERCASE")]
pub enum PermissionKind {
    Read,
    Create,
    Update,
    Delete,
    Import,
    Export,
}

/// Nested `permissions` object of the permission set. Missing fields read as
/// not granted
#[derive(Debug, Default, serde::Serialize, serde::Deserialize, Clone, Copy, PartialEq, Eq)]
pub struct PermissionFlags {
    #[serde(default)]
    pub read: bool,
    #[serde(default)]
    pub create: bool,
    #[serde(default)]
    pub update: bool,
    #[serde(default)]
    pub delete: bool,
    #[serde(default)]
    pub import: bool,
    #[serde(default)]
    pub export: bool,
}

impl PermissionFlags {
    pub fn get(&self, kind: PermissionKind) -> bool {
        match kind {
            PermissionKind::Read => self.read,
            PermissionKind::Create => self.create,
            PermissionKind::Update => self.update,
            PermissionKind::Delete => self.delete,
            PermissionKind::Import => self.import,
            PermissionKind::Export => self.export,
        }
    }

    pub fn granted(&self) -> impl Iterator<Item = PermissionKind> + '_ {
        PermissionKind::iter().filter(|kind| self.get(*kind))
    }

    /// Comma separated, upper case names of the granted permissions
    pub fn display_text(&self) -> String {
        self.granted()
            .map(|kind| kind.to_string())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

/// Body of `/api/studies/permissions`
///
/// Every field is optional because the client also builds partial records
/// (see [`PermissionSet::fallback`]) and must tolerate partial responses
#[derive(Debug, Default, serde::Serialize, serde::Deserialize, Clone, PartialEq, Eq)]
pub struct PermissionSet {
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub role: Option<String>,
    #[serde(default, rename = "isAdmin")]
    pub is_admin: Option<bool>,
    #[serde(default)]
    pub permissions: Option<PermissionFlags>,
}

impl PermissionSet {
    /// Used when the server answered but did not grant a permission set.
    /// `role` and `is_admin` are left unset so admin only elements stay hidden
    pub fn fallback() -> Self {
        Self {
            username: None,
            role: None,
            is_admin: None,
            permissions: Some(PermissionFlags::default()),
        }
    }

    pub fn has(&self, kind: PermissionKind) -> bool {
        self.permissions.is_some_and(|flags| flags.get(kind))
    }

    pub fn is_admin(&self) -> bool {
        self.is_admin.unwrap_or(false)
    }

    /// Role to show the user, empty roles are treated as missing
    pub fn role_display(&self) -> Option<&str> {
        self.role.as_deref().filter(|role| !role.is_empty())
    }

    /// Returns an empty string if the nested permissions are missing
    pub fn permissions_display(&self) -> String {
        self.permissions
            .map(|flags| flags.display_text())
            .unwrap_or_default()
    }
}
