use std::{
    cell::{Cell, RefCell},
    collections::VecDeque,
};

use reqwest::StatusCode;
use studygate_client_core::{
    traits::{HttpTransport, Navigator, UserPrompt},
    ApiRequest, ApiResponse, TransportError,
};

/// Answers requests from a queue in the order they were pushed and records
/// every request it receives
#[derive(Debug, Default)]
pub struct ScriptedTransport {
    responses: RefCell<VecDeque<Result<ApiResponse, TransportError>>>,
    requests: RefCell<Vec<ApiRequest>>,
}

impl ScriptedTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_response(&self, status: u16, body: &str) {
        let status = StatusCode::from_u16(status).expect("test used an invalid status code");
        self.responses
            .borrow_mut()
            .push_back(Ok(ApiResponse::new(status, body)));
    }

    pub fn push_json(&self, status: u16, body: serde_json::Value) {
        self.push_response(status, &body.to_string());
    }

    /// Simulates a request that never completed
    pub fn push_network_error(&self, message: &str) {
        self.responses
            .borrow_mut()
            .push_back(Err(TransportError::Request(message.to_string())));
    }

    pub fn requests(&self) -> Vec<ApiRequest> {
        self.requests.borrow().clone()
    }

    pub fn request_count(&self) -> usize {
        self.requests.borrow().len()
    }

    pub fn last_request(&self) -> Option<ApiRequest> {
        self.requests.borrow().last().cloned()
    }

    /// Number of scripted responses not used yet
    pub fn pending_responses(&self) -> usize {
        self.responses.borrow().len()
    }
}

impl HttpTransport for ScriptedTransport {
    async fn send(&self, request: ApiRequest) -> Result<ApiResponse, TransportError> {
        tracing::debug!(?request, "scripted transport received request");
        self.requests.borrow_mut().push(request);
        self.responses.borrow_mut().pop_front().unwrap_or_else(|| {
            Err(TransportError::Request(
                "no scripted response left".to_string(),
            ))
        })
    }
}

/// Answers confirmations from a queue (falling back to a default) and records
/// everything shown to the user
#[derive(Debug)]
pub struct RecordingPrompt {
    answers: RefCell<VecDeque<bool>>,
    default_answer: Cell<bool>,
    confirms: RefCell<Vec<String>>,
    alerts: RefCell<Vec<String>>,
}

impl Default for RecordingPrompt {
    fn default() -> Self {
        Self::new()
    }
}

impl RecordingPrompt {
    /// Accepts every confirmation unless told otherwise
    pub fn new() -> Self {
        Self {
            answers: Default::default(),
            default_answer: Cell::new(true),
            confirms: Default::default(),
            alerts: Default::default(),
        }
    }

    pub fn push_answer(&self, answer: bool) {
        self.answers.borrow_mut().push_back(answer);
    }

    pub fn set_default_answer(&self, answer: bool) {
        self.default_answer.set(answer);
    }

    pub fn confirms(&self) -> Vec<String> {
        self.confirms.borrow().clone()
    }

    pub fn alerts(&self) -> Vec<String> {
        self.alerts.borrow().clone()
    }
}

impl UserPrompt for RecordingPrompt {
    fn confirm(&self, message: &str) -> bool {
        self.confirms.borrow_mut().push(message.to_string());
        self.answers
            .borrow_mut()
            .pop_front()
            .unwrap_or(self.default_answer.get())
    }

    fn alert(&self, message: &str) {
        self.alerts.borrow_mut().push(message.to_string());
    }
}

#[derive(Debug, Default)]
pub struct RecordingNavigator {
    navigations: RefCell<Vec<String>>,
    reloads: Cell<usize>,
}

impl RecordingNavigator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn navigations(&self) -> Vec<String> {
        self.navigations.borrow().clone()
    }

    pub fn reload_count(&self) -> usize {
        self.reloads.get()
    }
}

impl Navigator for RecordingNavigator {
    fn navigate(&self, path: &str) {
        self.navigations.borrow_mut().push(path.to_string());
    }

    fn reload(&self) {
        self.reloads.set(self.reloads.get() + 1);
    }
}
