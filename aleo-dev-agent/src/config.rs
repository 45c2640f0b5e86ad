//! Project configuration and discovery.
//!
//! A project is any directory tree holding an `aleo-config.json` at its root.
//! The file names the network profiles the agent can target and the accounts
//! that sign deployments; `ALEO_PRIVATE_KEY` in the environment takes
//! precedence over anything configured on disk.

use std::collections::HashMap;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::account::Account;
use crate::agent::Agent;
use crate::program::ExecutionMode;

pub const PROJECT_CONFIG_FILE: &str = "aleo-config.json";
pub const PRIVATE_KEY_ENV: &str = "ALEO_PRIVATE_KEY";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectConfig {
    /// Network profile used when none is named explicitly.
    #[serde(default)]
    pub default_network: Option<String>,
    pub networks: HashMap<String, NetworkProfile>,
    /// Private keys of the signing accounts; the first one is used.
    #[serde(default)]
    pub accounts: Vec<String>,
    /// Default invocation mode for program calls.
    #[serde(default)]
    pub mode: Option<ExecutionMode>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NetworkProfile {
    pub endpoint: String,
    /// Override for the numeric `--network` flag of `snarkos developer`.
    #[serde(default)]
    pub network_mode: Option<u8>,
}

impl ProjectConfig {
    /// Loads the configuration from an `aleo-config.json` file.
    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        serde_json::from_str(&text)
            .with_context(|| format!("{} is not a valid project config", path.display()))
    }

    /// Resolves a named network profile.
    pub fn network(&self, name: &str) -> Result<&NetworkProfile> {
        self.networks
            .get(name)
            .with_context(|| format!("network `{name}` is not configured"))
    }

    /// The signing key: `ALEO_PRIVATE_KEY` from the environment when set,
    /// else the first configured account.
    pub fn private_key(&self) -> Result<String> {
        resolve_private_key(env::var(PRIVATE_KEY_ENV).ok(), &self.accounts)
    }
}

fn resolve_private_key(env_key: Option<String>, accounts: &[String]) -> Result<String> {
    env_key
        .or_else(|| accounts.first().cloned())
        .with_context(|| {
            format!("no private key: set {PRIVATE_KEY_ENV} or add one to `accounts`")
        })
}

/// Walks up from `start` until a directory containing the project config
/// file is found.
pub fn find_project_root(start: &Path) -> Option<PathBuf> {
    let mut dir = start;
    loop {
        if dir.join(PROJECT_CONFIG_FILE).is_file() {
            return Some(dir.to_path_buf());
        }
        dir = dir.parent()?;
    }
}

impl Agent {
    /// Builds an agent targeting one of the project's network profiles.
    pub fn from_project(config: &ProjectConfig, network_name: &str) -> Result<Agent> {
        let profile = config.network(network_name)?;
        let account = Account::from_private_key(&config.private_key()?)?;
        let mut builder = Agent::builder()
            .with_url(profile.endpoint.clone())
            .with_network(network_name)
            .with_account(account);
        if let Some(mode) = profile.network_mode {
            builder = builder.with_network_mode(mode);
        }
        Ok(builder.build())
    }
}
