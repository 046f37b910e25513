use std::fmt::Debug;

use futures::channel::oneshot;
use reqwest::{Method, StatusCode};
use studygate_shared::const_config::path::PathSpec;
use tracing::info;

use crate::{traits::HttpTransport, TransportError};

pub const HEADER_AUTHORIZATION: &str = "Authorization";
pub const HEADER_CONTENT_TYPE: &str = "Content-Type";
pub const CONTENT_TYPE_JSON: &str = "application/json";

#[derive(Clone, PartialEq, Eq)]
pub struct ApiRequest {
    pub method: Method,
    pub path: String,
    /// Header names are unique ignoring case, later values replace earlier ones
    pub headers: Vec<(String, String)>,
    pub body: Option<String>,
}

/// What a caller of an authenticated request may customize
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchOptions {
    pub method: Method,
    pub headers: Vec<(String, String)>,
    pub body: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiResponse {
    pub status: StatusCode,
    pub body: String,
}

/// Sends requests using [`reqwest_cross`] so it works both natively and in
/// the browser
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    api_client: reqwest::Client,
    server_address: String,
}

impl ApiRequest {
    pub fn new<P: Into<String>>(method: Method, path: P) -> Self {
        Self {
            method,
            path: path.into(),
            headers: Vec::new(),
            body: None,
        }
    }

    pub fn from_spec(path_spec: &PathSpec) -> Self {
        Self::new(path_spec.method.clone(), path_spec.path.to_string())
    }

    /// Sets the header replacing any existing value for the same name
    pub fn header<N: Into<String>, V: Into<String>>(mut self, name: N, value: V) -> Self {
        let name = name.into();
        self.headers
            .retain(|(existing, _)| !existing.eq_ignore_ascii_case(&name));
        self.headers.push((name, value.into()));
        self
    }

    pub fn json_body(self, body: &serde_json::Value) -> Self {
        let mut result = self.header(HEADER_CONTENT_TYPE, CONTENT_TYPE_JSON);
        result.body = Some(body.to_string());
        result
    }

    pub fn header_value(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(existing, _)| existing.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }
}

impl Debug for ApiRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let headers: Vec<(&str, &str)> = self
            .headers
            .iter()
            .map(|(name, value)| {
                if name.eq_ignore_ascii_case(HEADER_AUTHORIZATION) {
                    (name.as_str(), "[REDACTED]")
                } else {
                    (name.as_str(), value.as_str())
                }
            })
            .collect();
        f.debug_struct("ApiRequest")
            .field("method", &self.method)
            .field("path", &self.path)
            .field("headers", &headers)
            .field("has_body", &self.body.is_some())
            .finish()
    }
}

impl Default for FetchOptions {
    fn default() -> Self {
        Self {
            method: Method::GET,
            headers: Vec::new(),
            body: None,
        }
    }
}

impl FetchOptions {
    pub fn method(mut self, method: Method) -> Self {
        self.method = method;
        self
    }

    pub fn header<N: Into<String>, V: Into<String>>(mut self, name: N, value: V) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    pub fn body<B: Into<String>>(mut self, body: B) -> Self {
        self.body = Some(body.into());
        self
    }
}

impl ApiResponse {
    pub fn new<B: Into<String>>(status: StatusCode, body: B) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        self.status.is_success()
    }

    pub fn json<T: serde::de::DeserializeOwned>(&self) -> Result<T, TransportError> {
        Ok(serde_json::from_str(&self.body)?)
    }
}

impl ReqwestTransport {
    #[tracing::instrument(name = "NEW TRANSPORT")]
    pub fn try_new(server_address: String) -> Result<Self, TransportError> {
        let api_client = reqwest::Client::builder().build()?;
        Ok(Self {
            api_client,
            server_address,
        })
    }

    #[tracing::instrument(ret)]
    fn path_to_url(&self, path: &str) -> String {
        format!("{}{path}", self.server_address.trim_end_matches('/'))
    }
}

impl HttpTransport for ReqwestTransport {
    #[tracing::instrument(skip(self))]
    async fn send(&self, request: ApiRequest) -> Result<ApiResponse, TransportError> {
        let ApiRequest {
            method,
            path,
            headers,
            body,
        } = request;
        let mut builder = self.api_client.request(method, self.path_to_url(&path));
        for (name, value) in headers {
            builder = builder.header(name, value);
        }
        if let Some(body) = body {
            builder = builder.body(body);
        }

        let (tx, rx) = oneshot::channel();
        let on_done = move |resp: reqwest::Result<reqwest::Response>| async {
            let msg = process_response(resp).await;
            // Receiver is only gone if the caller stopped waiting
            let _ = tx.send(msg);
        };
        reqwest_cross::fetch(builder, on_done);
        rx.await.map_err(|_| TransportError::Cancelled)?
    }
}

#[tracing::instrument(ret, err(Debug))]
async fn process_response(
    response: reqwest::Result<reqwest::Response>,
) -> Result<ApiResponse, TransportError> {
    if response.is_err() {
        info!("Response is err: {:#?}", response);
    }
    let response = response?;
    let status = response.status();
    let body = response.text().await?;
    Ok(ApiResponse { status, body })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn header_replaces_ignoring_case() {
        let request = ApiRequest::new(Method::GET, "/api/profile")
            .header("Content-Type", "application/json")
            .header("content-type", "text/plain");
        assert_eq!(request.headers.len(), 1);
        assert_eq!(request.header_value("CONTENT-TYPE"), Some("text/plain"));
    }

    #[test]
    fn debug_redacts_authorization() {
        let request =
            ApiRequest::new(Method::GET, "/api/profile").header(HEADER_AUTHORIZATION, "Bearer abc");
        let debug_text = format!("{request:?}");
        assert!(!debug_text.contains("abc"), "{debug_text}");
        assert!(debug_text.contains("REDACTED"), "{debug_text}");
    }

    #[test]
    fn json_body_sets_content_type() {
        let request = ApiRequest::new(Method::POST, "/api/login")
            .json_body(&serde_json::json!({"username": "alice"}));
        assert_eq!(request.header_value(HEADER_CONTENT_TYPE), Some(CONTENT_TYPE_JSON));
        assert_eq!(request.body.as_deref(), Some(r#"{"username":"alice"}"#));
    }

    #[rstest]
    #[case::no_slash("http://localhost:8080", "http://localhost:8080/api/profile")]
    #[case::trailing_slash("http://localhost:8080/", "http://localhost:8080/api/profile")]
    fn url_joining(#[case] server_address: &str, #[case] expected: &str) {
        let transport = ReqwestTransport::try_new(server_address.to_string()).unwrap();
        assert_eq!(transport.path_to_url("/api/profile"), expected);
    }

    #[rstest]
    #[case(StatusCode::OK, true)]
    #[case(StatusCode::NO_CONTENT, true)]
    #[case(StatusCode::UNAUTHORIZED, false)]
    #[case(StatusCode::INTERNAL_SERVER_ERROR, false)]
    fn response_success(#[case] status: StatusCode, #[case] expected: bool) {
        assert_eq!(ApiResponse::new(status, "").is_success(), expected);
    }
}
