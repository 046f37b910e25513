use reqwest::header::AUTHORIZATION;
use studygate_client_core::{
    traits::HttpTransport, ApiRequest, ApiResponse, CredentialStore, ReqwestTransport,
    TransportError,
};

/// Adds the stored token to requests that do not carry one
///
/// The browser sends the session along with every request, a terminal has to
/// do that itself
#[derive(Debug)]
pub struct BearerTransport {
    inner: ReqwestTransport,
    credentials: CredentialStore,
}

impl BearerTransport {
    pub fn new(inner: ReqwestTransport, credentials: CredentialStore) -> Self {
        Self { inner, credentials }
    }
}

impl HttpTransport for BearerTransport {
    async fn send(&self, request: ApiRequest) -> Result<ApiResponse, TransportError> {
        self.inner
            .send(with_bearer(request, &self.credentials))
            .await
    }
}

fn with_bearer(request: ApiRequest, credentials: &CredentialStore) -> ApiRequest {
    if request.header_value(AUTHORIZATION.as_str()).is_some() {
        return request;
    }
    match credentials.auth_token() {
        Some(token) => request.header(AUTHORIZATION.as_str(), token.bearer_header_value()),
        None => request,
    }
}
