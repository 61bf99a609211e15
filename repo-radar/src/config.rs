//! Startup configuration.
//!
//! The token and tracked-account list are validated once, before any network
//! or file activity. Missing configuration is the only fatal error class.

use thiserror::Error;

/// Errors raised while validating startup configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// No API token was provided.
    #[error("No GitHub token provided (set GITHUB_TOKEN or pass --token)")]
    MissingToken,

    /// The tracked-account list was absent or empty after trimming.
    #[error("No tracked accounts configured (set TRACKED_ACCOUNTS or pass --accounts)")]
    NoAccounts,
}

/// Validated startup configuration.
#[derive(Debug, Clone)]
pub struct Settings {
    /// Bearer credential sent with every API request.
    pub token: String,

    /// Accounts whose public repositories are polled, in configured order.
    pub accounts: Vec<String>,
}

impl Settings {
    /// Validates raw configuration values.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the token is absent or the account list is
    /// empty once whitespace-only entries are dropped.
    pub fn from_values(
        token: Option<String>,
        accounts: Option<String>,
    ) -> Result<Self, ConfigError> {
        let token = token
            .filter(|t| !t.trim().is_empty())
            .ok_or(ConfigError::MissingToken)?;

        let accounts = parse_account_list(accounts.as_deref().unwrap_or(""));
        if accounts.is_empty() {
            return Err(ConfigError::NoAccounts);
        }

        Ok(Self { token, accounts })
    }
}

/// Splits a comma-separated account list, trimming entries and dropping
/// empty ones.
#[must_use]
pub fn parse_account_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|entry| !entry.is_empty())
        .map(str::to_string)
        .collect()
}
