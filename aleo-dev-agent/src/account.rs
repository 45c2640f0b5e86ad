//! Account key material.
//!
//! Keys are carried as opaque bech32-style strings. Deriving a view key or an
//! address from a private key requires the external toolchain
//! (`leo account`), so an [`Account`] only validates prefixes and otherwise
//! passes the strings through to the commands and endpoints that consume them.

use std::fmt::{Debug, Formatter};

use anyhow::{ensure, Context, Result};

pub const PRIVATE_KEY_PREFIX: &str = "APrivateKey1";
pub const VIEW_KEY_PREFIX: &str = "AViewKey1";
pub const ADDRESS_PREFIX: &str = "aleo1";

#[derive(Clone, Default)]
pub struct Account {
    private_key: String,
    view_key: Option<String>,
    address: Option<String>,
}

impl Debug for Account {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Account")
            .field("private_key", &"<redacted>")
            .field("view_key", &self.view_key)
            .field("address", &self.address)
            .finish()
    }
}

impl Account {
    /// Builds an `Account` from a private key string.
    ///
    /// # Example
    /// ```
    /// use aleo_dev_agent::account::Account;
    ///
    /// let account = Account::from_private_key("APrivateKey1zkp8CZNn3yeCseEtxuVPbDCwSyhGW6yZKUYKfgXmcpoGPWH").unwrap();
    /// assert!(account.view_key().is_none());
    /// ```
    pub fn from_private_key(key: &str) -> Result<Self> {
        ensure!(
            key.starts_with(PRIVATE_KEY_PREFIX),
            "invalid private key: expected the `{PRIVATE_KEY_PREFIX}` prefix"
        );
        Ok(Account {
            private_key: key.to_string(),
            view_key: None,
            address: None,
        })
    }

    /// Attaches a view key to the account.
    pub fn with_view_key(mut self, view_key: &str) -> Result<Self> {
        ensure!(
            view_key.starts_with(VIEW_KEY_PREFIX),
            "invalid view key: expected the `{VIEW_KEY_PREFIX}` prefix"
        );
        self.view_key = Some(view_key.to_string());
        Ok(self)
    }

    /// Attaches an address to the account.
    pub fn with_address(mut self, address: &str) -> Result<Self> {
        ensure!(
            address.starts_with(ADDRESS_PREFIX),
            "invalid address: expected the `{ADDRESS_PREFIX}` prefix"
        );
        self.address = Some(address.to_string());
        Ok(self)
    }

    /// Recovers an account from the labelled key block that
    /// `leo account new` and `snarkos account new` print to stdout:
    ///
    /// ```text
    ///   Private Key  APrivateKey1zkp...
    ///      View Key  AViewKey1...
    ///       Address  aleo1...
    /// ```
    pub fn from_cli_output(stdout: &str) -> Result<Self> {
        let private_key = labelled_value(stdout, "Private Key")
            .context("no `Private Key` line in account output")?;
        let mut account = Self::from_private_key(&private_key)?;
        if let Some(view_key) = labelled_value(stdout, "View Key") {
            account = account.with_view_key(&view_key)?;
        }
        if let Some(address) = labelled_value(stdout, "Address") {
            account = account.with_address(&address)?;
        }
        Ok(account)
    }

    /// Returns the private key of the account.
    pub fn private_key(&self) -> &str {
        &self.private_key
    }

    /// Returns the view key of the account, if one was attached.
    pub fn view_key(&self) -> Option<&str> {
        self.view_key.as_deref()
    }

    /// Returns the address of the account, if one was attached.
    pub fn address(&self) -> Option<&str> {
        self.address.as_deref()
    }
}

// Scrape the value following a `<label>` prefix on any stdout line.
fn labelled_value(stdout: &str, label: &str) -> Option<String> {
    stdout.lines().find_map(|line| {
        let rest = line.trim().strip_prefix(label)?;
        let rest = rest.trim_start_matches(|c: char| c.is_whitespace() || c == ':');
        rest.split_whitespace().next().map(str::to_string)
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE_KEY: &str = "APrivateKey1zkp8CZNn3yeCseEtxuVPbDCwSyhGW6yZKUYKfgXmcpoGPWH";

    #[test]
    fn test_from_private_key_rejects_bad_prefix() {
        assert!(Account::from_private_key("AViewKey1abc").is_err());
        assert!(Account::from_private_key("").is_err());
    }

    #[test]
    fn test_from_cli_output() {
        let stdout = format!(
            "\n  Private Key  {SAMPLE_KEY}\n     View Key  AViewKey1mSnpFFC8Mj4fXbK5YiWgZ3mjiV8CxA79bYNa8ymUpTrw\n      Address  aleo1rhgdu77hgyqd3xjj8ucu3jj9r2krwz6mnzyd80gncr5fxcwlh5rsvzp9px\n"
        );
        let account = Account::from_cli_output(&stdout).unwrap();
        assert_eq!(account.private_key(), SAMPLE_KEY);
        assert!(account.view_key().unwrap().starts_with(VIEW_KEY_PREFIX));
        assert!(account.address().unwrap().starts_with(ADDRESS_PREFIX));
    }

    #[test]
    fn test_from_cli_output_requires_private_key() {
        let stdout = "      Address  aleo1rhgdu77hgyqd3xjj8ucu3jj9r2krwz6mnzyd80gncr5fxcwlh5rsvzp9px";
        assert!(Account::from_cli_output(stdout).is_err());
    }

    #[test]
    fn test_debug_redacts_private_key() {
        let account = Account::from_private_key(SAMPLE_KEY).unwrap();
        let rendered = format!("{account:?}");
        assert!(!rendered.contains(SAMPLE_KEY));
    }
}
