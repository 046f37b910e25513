use std::rc::Rc;

use anyhow::{bail, Context};
use reqwest::Method;
use secrecy::SecretString;
use studygate_client_core::{
    AuthStatus, CredentialStore, FetchOptions, FileStore, LoginOutcome, MemoryStore,
    PermissionGate, ReqwestTransport, SessionHelper,
};
use studygate_shared::{
    const_config::dom::{DOM_USER_PERMISSIONS_ID, DOM_USER_ROLE_ID},
    req_args::LoginReqArgs,
    uac::UserProfile,
};
use tracing::info;

use crate::{
    bearer::BearerTransport,
    cli::Command,
    configuration::Configuration,
    terminal::{TerminalNavigator, TerminalPage, TerminalPrompt},
};

/// Both client modules wired to the configured server and the terminal
#[derive(Debug)]
pub struct App {
    session: SessionHelper<BearerTransport>,
    gate: PermissionGate<BearerTransport>,
    page: Rc<TerminalPage>,
    user_info_container: String,
}

impl App {
    #[tracing::instrument(err(Debug))]
    pub fn try_new(configuration: &Configuration) -> anyhow::Result<Self> {
        let server_address = configuration.server.address();
        let persistent_path = configuration.storage.persistent_store_path();
        let persistent = FileStore::open(persistent_path.clone())
            .with_context(|| format!("failed to open credentials file {persistent_path:?}"))?;
        // Session scope ends with the process
        let credentials = CredentialStore::new(Rc::new(persistent), Rc::new(MemoryStore::new()));

        let reqwest_transport = ReqwestTransport::try_new(server_address.clone())
            .context("failed to create http client")?;
        let transport = Rc::new(BearerTransport::new(reqwest_transport, credentials.clone()));
        let prompt = Rc::new(TerminalPrompt);
        let user_info_container = configuration.page.user_info_container.clone();
        let page = Rc::new(TerminalPage::new([
            DOM_USER_ROLE_ID,
            DOM_USER_PERMISSIONS_ID,
            user_info_container.as_str(),
        ]));

        let session = SessionHelper::new(
            Rc::clone(&transport),
            credentials,
            prompt.clone(),
            Rc::new(TerminalNavigator::new(server_address)),
        );
        let gate = PermissionGate::new(transport, page.clone(), prompt);
        Ok(Self {
            session,
            gate,
            page,
            user_info_container,
        })
    }

    #[tracing::instrument(skip_all)]
    pub async fn run(&self, command: Command) -> anyhow::Result<()> {
        match command {
            Command::Login {
                username,
                password,
                remember_me,
            } => {
                let args = LoginReqArgs::new(username, SecretString::from(password))
                    .remember_me(remember_me);
                self.login(&args).await
            }
            Command::Logout => {
                self.session
                    .server_logout()
                    .await
                    .context("local credentials cleared but the server was not notified")?;
                println!("Logged out");
                Ok(())
            }
            Command::Status => {
                match self.session.check_authentication_status().await {
                    AuthStatus::Authenticated(profile) => print_profile(&profile),
                    AuthStatus::Unauthenticated(failure) => {
                        println!("Not authenticated: {failure}")
                    }
                }
                Ok(())
            }
            Command::Require { no_redirect } => {
                match self.session.require_authentication(!no_redirect).await {
                    Some(profile) => {
                        print_profile(&profile);
                        Ok(())
                    }
                    None => bail!("authentication required"),
                }
            }
            Command::Permissions => {
                self.gate.init().await;
                if self.gate.user_permissions().is_none() {
                    bail!("permissions could not be loaded");
                }
                Ok(())
            }
            Command::Delete {
                entity_type,
                entity_id,
                message,
            } => {
                self.gate.load_user_permissions().await;
                let is_deleted = self
                    .gate
                    .perform_delete(&entity_type, &entity_id, message.as_deref())
                    .await;
                if !is_deleted {
                    bail!("{entity_type}/{entity_id} was not deleted");
                }
                Ok(())
            }
            Command::Fetch { path, method, data } => self.fetch(&path, &method, data).await,
            Command::Whoami => {
                self.session
                    .display_user_info(&*self.page, &self.user_info_container);
                if self.session.get_current_username().is_some() {
                    println!("Use the logout command to log out");
                }
                Ok(())
            }
        }
    }

    async fn login(&self, args: &LoginReqArgs) -> anyhow::Result<()> {
        match self.session.login(args).await.context("login failed")? {
            LoginOutcome::Success(username) => {
                info!(%username, "logged in");
                println!("Logged in as {username}");
                if !args.remember_me {
                    println!(
                        "Token is only kept until this process exits, use --remember-me to keep it"
                    );
                }
                Ok(())
            }
            LoginOutcome::Rejected(reason) => bail!("login rejected: {reason}"),
        }
    }

    async fn fetch(&self, path: &str, method: &str, data: Option<String>) -> anyhow::Result<()> {
        let method = Method::from_bytes(method.to_uppercase().as_bytes())
            .with_context(|| format!("invalid http method: {method:?}"))?;
        let mut options = FetchOptions::default().method(method);
        if let Some(data) = data {
            options = options.body(data);
        }
        let response = self.session.authenticated_fetch(path, options).await?;
        println!("{}", response.status);
        println!("{}", response.body);
        Ok(())
    }
}

fn print_profile(profile: &UserProfile) {
    println!("Authenticated as {}", profile.username);
    let details = [
        ("Role", profile.role.as_deref()),
        ("Email", profile.email.as_deref()),
        ("Position", profile.position.as_deref()),
    ];
    for (label, value) in details {
        if let Some(value) = value {
            println!("{label}: {value}");
        }
    }
}
