use std::path::Path;

use anyhow::{Context, Result};
use log::{debug, info};

use crate::ui::prompts;

pub const USERNAME_VAR: &str = "SALESFORCE_USERNAME";
pub const PASSWORD_VAR: &str = "SALESFORCE_PASSWORD";
pub const TOKEN_VAR: &str = "SALESFORCE_TOKEN";

/// Username, password and security token for a SOAP login
#[derive(Clone, PartialEq)]
pub struct Credentials {
    pub username: String,
    pub password: String,
    pub token: String,
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"***")
            .field("token", &"***")
            .finish()
    }
}

/// Credentials gathered from one source, possibly incomplete
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PartialCredentials {
    pub username: Option<String>,
    pub password: Option<String>,
    pub token: Option<String>,
}

impl PartialCredentials {
    /// Fill fields this source lacks from a lower-priority source
    pub fn or(self, fallback: PartialCredentials) -> PartialCredentials {
        PartialCredentials {
            username: self.username.or(fallback.username),
            password: self.password.or(fallback.password),
            token: self.token.or(fallback.token),
        }
    }

    pub fn missing(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if self.username.is_none() {
            missing.push(USERNAME_VAR);
        }
        if self.password.is_none() {
            missing.push(PASSWORD_VAR);
        }
        if self.token.is_none() {
            missing.push(TOKEN_VAR);
        }
        missing
    }

    pub fn complete(self) -> Option<Credentials> {
        Some(Credentials {
            username: self.username?,
            password: self.password?,
            token: self.token?,
        })
    }

    fn from_pairs<I: IntoIterator<Item = (String, String)>>(pairs: I) -> Self {
        let mut partial = Self::default();
        for (key, value) in pairs {
            match key.as_str() {
                USERNAME_VAR => partial.username = Some(value),
                PASSWORD_VAR => partial.password = Some(value),
                TOKEN_VAR => partial.token = Some(value),
                _ => {}
            }
        }
        partial
    }
}

impl Credentials {
    /// Read the values present in the process environment
    pub fn partial_from_env() -> PartialCredentials {
        PartialCredentials {
            username: std::env::var(USERNAME_VAR).ok(),
            password: std::env::var(PASSWORD_VAR).ok(),
            token: std::env::var(TOKEN_VAR).ok(),
        }
    }

    /// Read the values present in a `.env` file without touching the process
    /// environment
    pub fn partial_from_env_file(path: &Path) -> Result<PartialCredentials> {
        info!("Reading credentials from .env file: {}", path.display());

        if !path.exists() {
            anyhow::bail!("Environment file not found: {}", path.display());
        }

        let pairs = dotenvy::from_path_iter(path)
            .with_context(|| format!("Failed to load .env file '{}'", path.display()))?
            .collect::<Result<Vec<_>, _>>()
            .with_context(|| format!("Failed to parse .env file '{}'", path.display()))?;

        Ok(PartialCredentials::from_pairs(pairs))
    }

    pub fn from_env() -> Result<Credentials> {
        let partial = Self::partial_from_env();
        let missing = partial.missing();
        partial
            .complete()
            .ok_or_else(|| anyhow::anyhow!("Environment variables not set: {}", missing.join(", ")))
    }

    pub fn from_env_file(path: &Path) -> Result<Credentials> {
        let partial = Self::partial_from_env_file(path)?;
        let missing = partial.missing();
        partial
            .complete()
            .ok_or_else(|| anyhow::anyhow!("Not found in {}: {}", path.display(), missing.join(", ")))
    }

    /// Combine sources in priority order: command line, `.env` file,
    /// environment, then an interactive prompt for whatever is still missing.
    ///
    /// Without an explicit `env_file`, `./.env` is used when it exists.
    pub fn resolve(
        command_line: PartialCredentials,
        env_file: Option<&Path>,
        interactive: bool,
    ) -> Result<Credentials> {
        let file = match env_file {
            Some(path) => Self::partial_from_env_file(path)?,
            None if Path::new(".env").exists() => Self::partial_from_env_file(Path::new(".env"))?,
            None => PartialCredentials::default(),
        };

        let merged = command_line.or(file).or(Self::partial_from_env());
        debug!("Credential fields still missing: {:?}", merged.missing());

        if let Some(credentials) = merged.clone().complete() {
            return Ok(credentials);
        }

        if interactive {
            return prompts::prompt_credentials(merged);
        }

        anyhow::bail!(
            "Missing credentials: {} (pass them as options, in a .env file, or as environment variables)",
            merged.missing().join(", ")
        )
    }
}
