//! HTTP Basic credentials.

use std::env;
use std::fmt;

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;

use crate::error::ConfigError;

pub const USERNAME_VAR: &str = "CALLFIRE_USERNAME";
pub const PASSWORD_VAR: &str = "CALLFIRE_PASSWORD";

/// API login held by the `Transport`. The header value is derived on every
/// call rather than cached.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    username: String,
    password: String,
}

impl Credentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }

    /// Read `CALLFIRE_USERNAME` and `CALLFIRE_PASSWORD`.
    pub fn from_env() -> Result<Self, ConfigError> {
        Ok(Self::new(read_var(USERNAME_VAR)?, read_var(PASSWORD_VAR)?))
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    /// `Basic <base64(username:password)>`, single line.
    pub fn basic_auth_header(&self) -> String {
        let token = STANDARD.encode(format!("{}:{}", self.username, self.password));
        format!("Basic {}", token.trim_end())
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

fn read_var(name: &'static str) -> Result<String, ConfigError> {
    env::var(name).map_err(|e| match e {
        env::VarError::NotPresent => ConfigError::MissingVar(name),
        env::VarError::NotUnicode(_) => ConfigError::InvalidVar(name),
    })
}
