#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum TransportError {
    /// The request never completed (DNS, refused connection, CORS, ...)
    #[error("{0}")]
    Request(String),
    /// The request completed but the body was not what was expected
    #[error("failed to parse response body: {0}")]
    Decode(String),
    #[error("request was dropped before a response arrived")]
    Cancelled,
}

impl From<reqwest::Error> for TransportError {
    fn from(value: reqwest::Error) -> Self {
        Self::Request(value.to_string())
    }
}

impl From<serde_json::Error> for TransportError {
    fn from(value: serde_json::Error) -> Self {
        Self::Decode(value.to_string())
    }
}

#[derive(thiserror::Error, Debug)]
pub enum StoreError {
    #[error("storage is not available: {0}")]
    Unavailable(String),
    #[error("failed to write to storage: {0}")]
    Write(String),
    #[cfg(not(target_arch = "wasm32"))]
    #[error("failed to access storage file: {0}")]
    Io(#[from] std::io::Error),
    #[cfg(not(target_arch = "wasm32"))]
    #[error("failed to encode storage contents: {0}")]
    Encode(#[from] ron::Error),
    #[cfg(not(target_arch = "wasm32"))]
    #[error("failed to decode storage contents: {0}")]
    Decode(#[from] ron::error::SpannedError),
}

#[derive(thiserror::Error, Debug)]
pub enum SessionError {
    #[error("No authentication token found")]
    NoToken,
    /// The server rejected the token, local credentials have been cleared
    #[error("Authentication expired")]
    AuthenticationExpired,
    #[error(transparent)]
    Transport(#[from] TransportError),
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl SessionError {
    /// Returns `true` if the session error is [`AuthenticationExpired`].
    ///
    /// [`AuthenticationExpired`]: SessionError::AuthenticationExpired
    #[must_use]
    pub fn is_authentication_expired(&self) -> bool {
        matches!(self, Self::AuthenticationExpired)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn session_error_messages() {
        assert_eq!(
            SessionError::NoToken.to_string(),
            "No authentication token found"
        );
        assert_eq!(
            SessionError::AuthenticationExpired.to_string(),
            "Authentication expired"
        );
    }

    #[test]
    fn transport_error_is_transparent() {
        let err: SessionError = TransportError::Request("connection refused".to_string()).into();
        assert_eq!(err.to_string(), "connection refused");
    }
}
