/// Body of a successful `/api/login` request
#[derive(Debug, serde::Serialize, serde::Deserialize, Clone, PartialEq, Eq)]
pub struct LoginResponse {
    pub token: String,
    pub username: String,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub authorities: Option<String>,
}

/// Optional `message` field sent back on success
#[derive(Debug, Default, serde::Serialize, serde::Deserialize, Clone, PartialEq, Eq)]
pub struct MessageBody {
    #[serde(default)]
    pub message: Option<String>,
}

/// Optional `error` field sent back on failure
#[derive(Debug, Default, serde::Serialize, serde::Deserialize, Clone, PartialEq, Eq)]
pub struct ErrorBody {
    #[serde(default)]
    pub error: Option<String>,
}

impl MessageBody {
    /// Returns [`None`] if the body is not a JSON object
    pub fn parse(body: &str) -> Option<Self> {
        serde_json::from_str(body).ok()
    }
}

impl ErrorBody {
    /// Returns [`None`] if the body is not a JSON object
    pub fn parse(body: &str) -> Option<Self> {
        serde_json::from_str(body).ok()
    }
}
