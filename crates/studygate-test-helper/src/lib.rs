//! In memory stand-ins for everything the client modules are given so tests
//! can script the server and inspect what the user would have seen

#![warn(unused_crate_dependencies)]

mod fakes;
mod page;

use std::rc::Rc;
#[cfg(not(target_arch = "wasm32"))]
use std::sync::LazyLock;

use studygate_client_core::{
    traits::KeyValueStore as _, CredentialStore, MemoryStore, PermissionGate, SessionHelper,
};
use studygate_shared::const_config::storage::{STORAGE_KEY_AUTH_TOKEN, STORAGE_KEY_USERNAME};
#[cfg(not(target_arch = "wasm32"))]
use studygate_shared::telemetry::{self, get_subscriber, init_subscriber};

pub use fakes::{RecordingNavigator, RecordingPrompt, ScriptedTransport};
pub use page::{FakeElement, FakePage};

// Ensure that the `tracing` stack is only initialised once
#[cfg(not(target_arch = "wasm32"))]
pub static TRACING: LazyLock<String> = LazyLock::new(|| {
    let default_filter_level = "info".to_string();
    let subscriber_name = "test".to_string();
    if std::env::var("TEST_LOG").is_ok() {
        let log_file_name = format!("client_tests{}", uuid::Uuid::new_v4());
        let (file, path) =
            telemetry::create_trace_file(telemetry::DEFAULT_TRACE_FOLDER.as_ref(), &log_file_name)
                .unwrap();
        let subscriber = get_subscriber(subscriber_name, default_filter_level, file);
        init_subscriber(subscriber).unwrap();
        format!("Traces for tests being written to: {path:?}")
    } else {
        let subscriber = get_subscriber(subscriber_name, default_filter_level, std::io::sink);
        init_subscriber(subscriber).unwrap();
        "Traces set to std::io::sink".to_string()
    }
});

pub fn start_tracing() {
    #[cfg(not(target_arch = "wasm32"))]
    tracing::debug!("{}", *TRACING);
}

/// Everything a test needs to build and observe the client modules
pub struct TestEnv {
    pub transport: Rc<ScriptedTransport>,
    pub persistent: Rc<MemoryStore>,
    pub session: Rc<MemoryStore>,
    pub prompt: Rc<RecordingPrompt>,
    pub navigator: Rc<RecordingNavigator>,
    pub page: Rc<FakePage>,
}

impl Default for TestEnv {
    fn default() -> Self {
        Self::new()
    }
}

impl TestEnv {
    pub fn new() -> Self {
        start_tracing();
        Self {
            transport: Rc::new(ScriptedTransport::new()),
            persistent: Rc::new(MemoryStore::new()),
            session: Rc::new(MemoryStore::new()),
            prompt: Rc::new(RecordingPrompt::new()),
            navigator: Rc::new(RecordingNavigator::new()),
            page: Rc::new(FakePage::new()),
        }
    }

    /// Stores the token in the persistent scope (like "remember me")
    pub fn with_persistent_login(self, token: &str, username: &str) -> Self {
        self.persistent
            .set(STORAGE_KEY_AUTH_TOKEN, token)
            .expect("memory store never fails");
        self.persistent
            .set(STORAGE_KEY_USERNAME, username)
            .expect("memory store never fails");
        self
    }

    /// Stores the token in the session scope and the username persistently
    pub fn with_session_login(self, token: &str, username: &str) -> Self {
        self.session
            .set(STORAGE_KEY_AUTH_TOKEN, token)
            .expect("memory store never fails");
        self.persistent
            .set(STORAGE_KEY_USERNAME, username)
            .expect("memory store never fails");
        self
    }

    pub fn with_page(mut self, page: FakePage) -> Self {
        self.page = Rc::new(page);
        self
    }

    pub fn credentials(&self) -> CredentialStore {
        CredentialStore::new(self.persistent.clone(), self.session.clone())
    }

    pub fn session_helper(&self) -> SessionHelper<ScriptedTransport> {
        SessionHelper::new(
            self.transport.clone(),
            self.credentials(),
            self.prompt.clone(),
            self.navigator.clone(),
        )
    }

    pub fn permission_gate(&self) -> PermissionGate<ScriptedTransport> {
        PermissionGate::new(
            self.transport.clone(),
            self.page.clone(),
            self.prompt.clone(),
        )
    }

    /// True if neither scope holds anything
    pub fn storage_is_empty(&self) -> bool {
        self.persistent.is_empty() && self.session.is_empty()
    }
}
