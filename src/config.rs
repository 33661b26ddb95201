use crate::error::{BadEnvVarSnafu, ParseBackendUrlSnafu, RosterResult};
use dotenvy::var;
use snafu::ResultExt;
use std::sync::Arc;
use url::Url;

const DEFAULT_SERVER_IP: &str = "127.0.0.1:8080";
const DEFAULT_LOGIN_URL: &str = "/oauth2/authorization/google";

#[derive(Clone, Debug)]
pub struct RuntimeConfiguration {
    backend_config: Arc<BackendConfig>,
    server_ip: Arc<str>,
    login_url: Arc<str>,
}

impl RuntimeConfiguration {
    pub fn new() -> RosterResult<Self> {
        Ok(Self {
            backend_config: Arc::new(BackendConfig::new()?),
            server_ip: var("ROSTER_SERVER_IP")
                .unwrap_or_else(|_| DEFAULT_SERVER_IP.to_string())
                .into(),
            login_url: var("LOGIN_URL")
                .unwrap_or_else(|_| DEFAULT_LOGIN_URL.to_string())
                .into(),
        })
    }

    #[cfg(test)]
    pub fn for_tests() -> Self {
        Self {
            backend_config: Arc::new(BackendConfig {
                base_url: Url::parse("http://backend.invalid/").expect("static url parses"),
            }),
            server_ip: DEFAULT_SERVER_IP.into(),
            login_url: DEFAULT_LOGIN_URL.into(),
        }
    }

    pub fn backend_config(&self) -> Arc<BackendConfig> {
        self.backend_config.clone()
    }

    pub fn server_ip(&self) -> &str {
        &self.server_ip
    }

    /// Where anonymous visitors get sent; the backend owns the login flow.
    pub fn login_url(&self) -> &str {
        &self.login_url
    }
}

#[derive(Debug)]
pub struct BackendConfig {
    base_url: Url,
}

impl BackendConfig {
    pub fn new() -> RosterResult<Self> {
        let name = "BACKEND_URL";
        let original = var(name).context(BadEnvVarSnafu { name })?;
        let base_url = Url::parse(&original).context(ParseBackendUrlSnafu { original })?;

        Ok(Self { base_url })
    }

    /// Joins an absolute API path (eg. `/api/currentUser`) onto the backend's base URL.
    pub fn endpoint(&self, path: &str) -> String {
        format!(
            "{}{}",
            self.base_url.as_str().trim_end_matches('/'),
            path
        )
    }
}
