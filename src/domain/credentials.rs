//! API credentials with masked display.
//!
//! Credentials are validated at construction and immutable afterwards, so
//! every operation in the process observes the same key material. The
//! secret never appears in `Debug` output or log lines; only a short key
//! prefix is shown.

use std::fmt;

use crate::error::ConfigError;

/// An API key/secret pair bound to a target environment.
#[derive(Clone)]
pub struct Credentials {
    api_key: String,
    api_secret: String,
    testnet: bool,
}

impl Credentials {
    /// Create validated credentials.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingField`] if either key field is empty
    /// after trimming whitespace.
    pub fn new(
        api_key: impl Into<String>,
        api_secret: impl Into<String>,
        testnet: bool,
    ) -> Result<Self, ConfigError> {
        let api_key = api_key.into();
        let api_secret = api_secret.into();

        if api_key.trim().is_empty() {
            return Err(ConfigError::MissingField { field: "api_key" });
        }
        if api_secret.trim().is_empty() {
            return Err(ConfigError::MissingField { field: "api_secret" });
        }

        Ok(Self {
            api_key,
            api_secret,
            testnet,
        })
    }

    #[must_use]
    pub fn api_key(&self) -> &str {
        &self.api_key
    }

    #[must_use]
    pub fn api_secret(&self) -> &str {
        &self.api_secret
    }

    /// Whether the exchange's sandbox environment is targeted.
    #[must_use]
    pub const fn testnet(&self) -> bool {
        self.testnet
    }

    /// Masked key prefix, safe for logs and status output.
    #[must_use]
    pub fn masked_key(&self) -> String {
        mask(&self.api_key)
    }
}

/// Show at most the first four characters followed by an ellipsis.
fn mask(value: &str) -> String {
    let prefix: String = value.chars().take(4).collect();
    format!("{prefix}...")
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("api_key", &self.masked_key())
            .field("api_secret", &"[redacted]")
            .field("testnet", &self.testnet)
            .finish()
    }
}
