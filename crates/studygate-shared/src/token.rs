use secrecy::{ExposeSecret as _, SecretString};

/// Bearer token handed out by the server on login
#[derive(Clone)]
pub struct AuthToken(SecretString);

impl AuthToken {
    /// Value for the `Authorization` header
    pub fn bearer_header_value(&self) -> String {
        format!("Bearer {}", self.0.expose_secret())
    }

    /// Only intended for writing the token back into storage
    pub fn expose(&self) -> &str {
        self.0.expose_secret()
    }
}

impl From<String> for AuthToken {
    fn from(value: String) -> Self {
        Self(value.into())
    }
}

impl std::fmt::Debug for AuthToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("AuthToken").field(&"[REDACTED]").finish()
    }
}
