use std::{fmt::Debug, rc::Rc};

use reqwest::StatusCode;
use studygate_shared::{
    const_config::{
        messages::{MSG_LOGIN_QUESTION, MSG_LOGIN_REQUIRED, MSG_SESSION_EXPIRED},
        path::{PATH_API_LOGIN, PATH_API_LOGOUT, PATH_API_PROFILE, PATH_PAGE_HOME, PATH_PAGE_LOGIN},
        storage::{STORAGE_KEY_AUTH_TOKEN, STORAGE_KEY_USERNAME},
    },
    req_args::LoginReqArgs,
    token::AuthToken,
    uac::{ErrorBody, LoginResponse, UserProfile, Username},
};
use tracing::{debug, error, info, warn};

use crate::{
    traits::{HttpTransport, KeyValueStore, Navigator, PageView, UserPrompt},
    transport::{CONTENT_TYPE_JSON, HEADER_AUTHORIZATION, HEADER_CONTENT_TYPE},
    ApiRequest, ApiResponse, FetchOptions, SessionError, StoreError, TransportError,
};

/// Where the token and username are kept. The token may be in either scope,
/// the username is only ever in the persistent scope
#[derive(Clone)]
pub struct CredentialStore {
    persistent: Rc<dyn KeyValueStore>,
    session: Rc<dyn KeyValueStore>,
}

/// Result of asking the server if the stored token is still valid
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthStatus {
    Authenticated(UserProfile),
    Unauthenticated(AuthFailure),
}

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum AuthFailure {
    /// No request was sent
    #[error("No token or username found")]
    MissingCredentials,
    /// Stored credentials have been cleared
    #[error("Token expired or invalid")]
    TokenRejected,
    /// Stored credentials are kept
    #[error("Server error: {0}")]
    Server(u16),
    #[error("Network error: {0}")]
    Network(String),
}

#[must_use]
#[derive(Debug, PartialEq, Eq)]
pub enum LoginOutcome {
    Success(Username),
    /// Holds the reason given by the server
    Rejected(String),
}

pub struct SessionHelper<T> {
    transport: Rc<T>,
    credentials: CredentialStore,
    prompt: Rc<dyn UserPrompt>,
    navigator: Rc<dyn Navigator>,
}

impl CredentialStore {
    pub fn new(persistent: Rc<dyn KeyValueStore>, session: Rc<dyn KeyValueStore>) -> Self {
        Self {
            persistent,
            session,
        }
    }

    /// Prefers the persistent scope. Empty values are treated as missing
    pub fn auth_token(&self) -> Option<AuthToken> {
        non_empty(self.persistent.get(STORAGE_KEY_AUTH_TOKEN))
            .or_else(|| non_empty(self.session.get(STORAGE_KEY_AUTH_TOKEN)))
            .map(AuthToken::from)
    }

    pub fn username(&self) -> Option<Username> {
        self.persistent
            .get(STORAGE_KEY_USERNAME)
            .and_then(|value| Username::try_from(value).ok())
    }

    pub fn is_logged_in(&self) -> bool {
        self.auth_token().is_some() && self.username().is_some()
    }

    /// Keeps the token in exactly one scope so a stale token in the other
    /// scope can not shadow it. The other scope is only cleared once the new
    /// token has been written
    pub fn store(
        &self,
        token: &AuthToken,
        username: &Username,
        remember_me: bool,
    ) -> Result<(), StoreError> {
        let (keep, discard) = if remember_me {
            (&self.persistent, &self.session)
        } else {
            (&self.session, &self.persistent)
        };
        keep.set(STORAGE_KEY_AUTH_TOKEN, token.expose())?;
        self.persistent.set(STORAGE_KEY_USERNAME, username.as_ref())?;
        discard.remove(STORAGE_KEY_AUTH_TOKEN)?;
        Ok(())
    }

    /// Removes the token from both scopes and the username. A failed removal
    /// is logged and does not stop the others
    pub fn clear(&self) {
        let removals = [
            (&self.persistent, STORAGE_KEY_AUTH_TOKEN),
            (&self.session, STORAGE_KEY_AUTH_TOKEN),
            (&self.persistent, STORAGE_KEY_USERNAME),
        ];
        for (scope, key) in removals {
            if let Err(e) = scope.remove(key) {
                error!(?e, key, "failed to remove credential");
            }
        }
    }
}

impl Debug for CredentialStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CredentialStore")
            .field("has_token", &self.auth_token().is_some())
            .field("username", &self.username())
            .finish()
    }
}

impl AuthStatus {
    pub fn is_authenticated(&self) -> bool {
        matches!(self, Self::Authenticated(_))
    }

    pub fn user(&self) -> Option<&UserProfile> {
        match self {
            Self::Authenticated(profile) => Some(profile),
            Self::Unauthenticated(_) => None,
        }
    }

    pub fn error(&self) -> Option<&AuthFailure> {
        match self {
            Self::Authenticated(_) => None,
            Self::Unauthenticated(failure) => Some(failure),
        }
    }
}

impl LoginOutcome {
    #[must_use]
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success(_))
    }
}

impl<T> Clone for SessionHelper<T> {
    fn clone(&self) -> Self {
        Self {
            transport: Rc::clone(&self.transport),
            credentials: self.credentials.clone(),
            prompt: Rc::clone(&self.prompt),
            navigator: Rc::clone(&self.navigator),
        }
    }
}

impl<T> Debug for SessionHelper<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionHelper")
            .field("credentials", &self.credentials)
            .finish_non_exhaustive()
    }
}

impl<T: HttpTransport> SessionHelper<T> {
    pub fn new(
        transport: Rc<T>,
        credentials: CredentialStore,
        prompt: Rc<dyn UserPrompt>,
        navigator: Rc<dyn Navigator>,
    ) -> Self {
        Self {
            transport,
            credentials,
            prompt,
            navigator,
        }
    }

    pub fn credentials(&self) -> &CredentialStore {
        &self.credentials
    }

    pub fn get_auth_token(&self) -> Option<AuthToken> {
        self.credentials.auth_token()
    }

    pub fn get_current_username(&self) -> Option<Username> {
        self.credentials.username()
    }

    pub fn is_logged_in(&self) -> bool {
        self.credentials.is_logged_in()
    }

    #[tracing::instrument(skip(self))]
    pub fn logout(&self) {
        self.credentials.clear();
    }

    /// Asks the user if they want to log in and sends them to the login page
    /// if they do or to the home page if they don't
    #[tracing::instrument(skip(self))]
    pub fn redirect_to_login(&self, message: &str) {
        let question = format!("{message} {MSG_LOGIN_QUESTION}");
        if self.prompt.confirm(&question) {
            self.navigator.navigate(PATH_PAGE_LOGIN);
        } else {
            self.navigator.navigate(PATH_PAGE_HOME);
        }
    }

    #[tracing::instrument(skip(self), ret)]
    pub async fn check_authentication_status(&self) -> AuthStatus {
        let (Some(token), Some(_)) = (self.get_auth_token(), self.get_current_username()) else {
            return AuthStatus::Unauthenticated(AuthFailure::MissingCredentials);
        };

        let request = ApiRequest::from_spec(&PATH_API_PROFILE)
            .header(HEADER_AUTHORIZATION, token.bearer_header_value())
            .header(HEADER_CONTENT_TYPE, CONTENT_TYPE_JSON);
        let response = match self.transport.send(request).await {
            Ok(response) => response,
            Err(e) => return AuthStatus::Unauthenticated(AuthFailure::Network(e.to_string())),
        };

        if response.is_success() {
            match response.json::<UserProfile>() {
                Ok(profile) => AuthStatus::Authenticated(profile),
                Err(e) => AuthStatus::Unauthenticated(AuthFailure::Network(e.to_string())),
            }
        } else if response.status == StatusCode::UNAUTHORIZED {
            self.logout();
            AuthStatus::Unauthenticated(AuthFailure::TokenRejected)
        } else {
            AuthStatus::Unauthenticated(AuthFailure::Server(response.status.as_u16()))
        }
    }

    /// Sends the request with the stored bearer token
    ///
    /// Headers in `options` are applied last and override the defaults. A 401
    /// response logs the user out, offers to go to the login page and is
    /// reported as [`SessionError::AuthenticationExpired`] instead of being
    /// returned. Every other response is returned unchanged
    #[tracing::instrument(skip(self, options), fields(method = %options.method))]
    pub async fn authenticated_fetch(
        &self,
        path: &str,
        options: FetchOptions,
    ) -> Result<ApiResponse, SessionError> {
        let token = self.get_auth_token().ok_or(SessionError::NoToken)?;

        let FetchOptions {
            method,
            headers,
            body,
        } = options;
        let mut request = ApiRequest::new(method, path)
            .header(HEADER_AUTHORIZATION, token.bearer_header_value())
            .header(HEADER_CONTENT_TYPE, CONTENT_TYPE_JSON);
        for (name, value) in headers {
            request = request.header(name, value);
        }
        request.body = body;

        let response = self.transport.send(request).await?;
        if response.status == StatusCode::UNAUTHORIZED {
            self.logout();
            self.redirect_to_login(MSG_SESSION_EXPIRED);
            return Err(SessionError::AuthenticationExpired);
        }
        Ok(response)
    }

    /// Returns the profile of the authenticated user or [`None`] after
    /// (optionally) redirecting to the login page
    #[tracing::instrument(skip(self))]
    pub async fn require_authentication(&self, redirect_on_fail: bool) -> Option<UserProfile> {
        match self.check_authentication_status().await {
            AuthStatus::Authenticated(profile) => {
                info!(username = %profile.username, "User authenticated");
                Some(profile)
            }
            AuthStatus::Unauthenticated(failure) => {
                warn!(error = %failure, "Authentication required");
                if redirect_on_fail {
                    self.redirect_to_login(MSG_LOGIN_REQUIRED);
                }
                None
            }
        }
    }

    /// Shows a welcome message with a logout button or a login link in the
    /// container. Does nothing if the container is not on the page
    #[tracing::instrument(skip(self, page))]
    pub fn display_user_info(&self, page: &dyn PageView, container_id: &str) {
        let username = self.get_current_username();
        let logout_button_id = format!("{container_id}-logout");
        let html = user_info_html(username.as_ref(), &logout_button_id);
        if !page.set_html(container_id, &html) {
            debug!("user info container not found");
            return;
        }
        if username.is_some() {
            let credentials = self.credentials.clone();
            let navigator = Rc::clone(&self.navigator);
            let is_bound = page.on_click(
                &logout_button_id,
                Box::new(move || {
                    credentials.clear();
                    navigator.reload();
                }),
            );
            if !is_bound {
                debug!("page has no clickable logout button");
            }
        }
    }

    /// Stores the returned credentials if the server accepts them
    #[tracing::instrument(skip(self))]
    pub async fn login(&self, args: &LoginReqArgs) -> Result<LoginOutcome, SessionError> {
        let request = ApiRequest::from_spec(&PATH_API_LOGIN).json_body(&args.to_request_body());
        let response = self.transport.send(request).await?;

        if !response.is_success() {
            let reason = ErrorBody::parse(&response.body)
                .and_then(|body| body.error)
                .unwrap_or_else(|| format!("Login failed with status: {}", response.status));
            warn!(?reason, "login rejected");
            return Ok(LoginOutcome::Rejected(reason));
        }

        let login_response: LoginResponse = response.json()?;
        let username = Username::try_from(login_response.username)
            .map_err(|e| TransportError::Decode(format!("invalid username: {e}")))?;
        let token = AuthToken::from(login_response.token);
        self.credentials.store(&token, &username, args.remember_me)?;
        info!(%username, "login successful");
        Ok(LoginOutcome::Success(username))
    }

    /// Clears the local credentials then lets the server know. The local
    /// credentials are cleared even if the server can not be reached
    #[tracing::instrument(skip(self))]
    pub async fn server_logout(&self) -> Result<(), SessionError> {
        let token = self.get_auth_token();
        self.logout();
        let mut request = ApiRequest::from_spec(&PATH_API_LOGOUT);
        if let Some(token) = token {
            request = request.header(HEADER_AUTHORIZATION, token.bearer_header_value());
        }
        let response = self.transport.send(request).await?;
        if !response.is_success() {
            warn!(status = %response.status, "server did not accept logout");
        }
        Ok(())
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|x| !x.is_empty())
}

fn user_info_html(username: Option<&Username>, logout_button_id: &str) -> String {
    match username {
        Some(username) => format!(
            r#"<span>Welcome, {}!</span><button id="{}" type="button" style="margin-left: 10px;">Logout</button>"#,
            html_escape::encode_text(username.as_ref()),
            html_escape::encode_double_quoted_attribute(logout_button_id),
        ),
        None => format!(r#"<a href="{PATH_PAGE_LOGIN}">Login</a>"#),
    }
}
