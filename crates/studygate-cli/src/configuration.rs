use std::path::{Path, PathBuf};

use anyhow::Context;
use serde_aux::field_attributes::deserialize_number_from_string;

#[derive(serde::Deserialize, Clone, Debug)]
pub struct Configuration {
    pub server: ServerSettings,
    pub storage: StorageSettings,
    pub page: PageSettings,
}

#[derive(serde::Deserialize, Clone, Debug)]
pub struct ServerSettings {
    pub host: String,
    #[serde(deserialize_with = "deserialize_number_from_string")]
    pub port: u16,
    pub require_tls: bool,
}

#[derive(serde::Deserialize, Clone, Debug)]
pub struct StorageSettings {
    /// Folder for the credentials that outlive the process
    pub dir: PathBuf,
}

#[derive(serde::Deserialize, Clone, Debug)]
pub struct PageSettings {
    pub user_info_container: String,
}

impl ServerSettings {
    pub fn address(&self) -> String {
        let scheme = if self.require_tls { "https" } else { "http" };
        format!("{scheme}://{}:{}", self.host, self.port)
    }
}

impl StorageSettings {
    pub fn persistent_store_path(&self) -> PathBuf {
        self.dir.join("persistent.ron")
    }
}

/// Loads `base.toml` then the file for the current environment from
/// `configuration_directory` and applies overrides from `APP_` prefixed
/// environment variables
pub fn get_configuration(configuration_directory: Option<&Path>) -> anyhow::Result<Configuration> {
    let configuration_directory = match configuration_directory {
        Some(dir) => dir.to_path_buf(),
        None => std::env::current_dir()
            .context("failed to determine the current directory")?
            .join("configuration"),
    };

    // Default to `local` if unspecified.
    let environment: Environment = std::env::var("APP_ENVIRONMENT")
        .unwrap_or_else(|_| "local".into())
        .try_into()
        .map_err(anyhow::Error::msg)
        .context("failed to parse APP_ENVIRONMENT")?;
    let environment_filename = format!("{}.toml", environment.as_str());
    let settings = config::Config::builder()
        .add_source(config::File::from(
            configuration_directory.join("base.toml"),
        ))
        .add_source(config::File::from(
            configuration_directory.join(environment_filename),
        ))
        // E.g. `APP_SERVER__PORT=5001` would set `Configuration.server.port`
        .add_source(
            config::Environment::with_prefix("APP")
                .prefix_separator("_")
                .separator("__"),
        )
        .build()
        .with_context(|| format!("failed to read configuration from {configuration_directory:?}"))?;

    settings
        .try_deserialize::<Configuration>()
        .context("invalid configuration")
}

/// The possible runtime environment for the client
#[derive(Debug, PartialEq, Eq)]
pub enum Environment {
    Local,
    Production,
}

impl Environment {
    pub fn as_str(&self) -> &'static str {
        match self {
            Environment::Local => "local",
            Environment::Production => "production",
        }
    }
}

impl TryFrom<String> for Environment {
    type Error = String;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        match s.to_lowercase().as_str() {
            "local" => Ok(Self::Local),
            "production" => Ok(Self::Production),
            other => Err(format!(
                "{other} is not a supported environment. Use either `local` or `production`."
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn from_toml(toml: &str) -> Configuration {
        config::Config::builder()
            .add_source(config::File::from_str(toml, config::FileFormat::Toml))
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap()
    }

    #[test]
    fn shipped_base_configuration_is_complete() {
        let config = from_toml(include_str!("../configuration/base.toml"));
        assert_eq!(config.server.address(), "http://localhost:8080");
        assert_eq!(config.page.user_info_container, "user-info");
        assert_eq!(
            config.storage.persistent_store_path(),
            PathBuf::from(".studygate").join("persistent.ron")
        );
    }

    #[test]
    fn port_accepts_string() {
        let config = from_toml(
            r#"
            [server]
            host = "example.com"
            port = "8443"
            require_tls = true
            [storage]
            dir = "/tmp/sg"
            [page]
            user_info_container = "nav-user"
            "#,
        );
        assert_eq!(config.server.port, 8443);
        assert_eq!(config.server.address(), "https://example.com:8443");
    }

    #[rstest]
    #[case("local", Environment::Local)]
    #[case("Production", Environment::Production)]
    #[case("LOCAL", Environment::Local)]
    fn parse_environment(#[case] input: &str, #[case] expected: Environment) {
        assert_eq!(Environment::try_from(input.to_string()).unwrap(), expected);
    }

    #[test]
    fn unknown_environment() {
        let err = Environment::try_from("staging".to_string()).unwrap_err();
        assert!(err.starts_with("staging is not a supported environment"), "{err}");
    }
}
