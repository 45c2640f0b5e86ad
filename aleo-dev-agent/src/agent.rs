//! The main Agent module. Contains the [Agent] type and its accessors.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{ensure, Result};

use crate::account::Account;
use crate::builder::AgentBuilder;
use crate::decrypt::{OutputDecryptor, PassthroughDecryptor};
use crate::program::ProgramManager;
use crate::{DEFAULT_BASE_URL, DEFAULT_TESTNET, MAINNET};

#[derive(Clone)]
pub struct Agent {
    client: ureq::Agent,
    base_url: String,
    network: String,
    network_mode: Option<u8>,
    account: Account,
    decryptor: Arc<dyn OutputDecryptor>,
}

impl Default for Agent {
    fn default() -> Agent {
        Self {
            client: ureq::Agent::new(),
            base_url: DEFAULT_BASE_URL.to_string(),
            network: DEFAULT_TESTNET.to_string(),
            network_mode: None,
            account: Account::default(),
            decryptor: Arc::new(PassthroughDecryptor),
        }
    }
}

impl Agent {
    pub fn builder() -> AgentBuilder {
        AgentBuilder::default()
    }

    pub fn new(base_url: String, network: String, account: Account) -> Agent {
        Agent {
            client: ureq::Agent::new(),
            base_url,
            network,
            network_mode: None,
            account,
            decryptor: Arc::new(PassthroughDecryptor),
        }
    }

    pub(crate) fn with_parts(
        base_url: String,
        network: String,
        network_mode: Option<u8>,
        account: Account,
        decryptor: Arc<dyn OutputDecryptor>,
    ) -> Agent {
        Agent {
            client: ureq::Agent::new(),
            base_url,
            network,
            network_mode,
            account,
            decryptor,
        }
    }

    /// Binds a [ProgramManager] to a program and the project directory that
    /// holds its Leo sources.
    ///
    /// `program_name` may be given with or without the `.aleo` suffix.
    pub fn program<P: Into<PathBuf>>(
        &self,
        program_name: &str,
        program_dir: P,
    ) -> Result<ProgramManager> {
        let name = program_name.trim_end_matches(".aleo");
        ensure!(!name.is_empty(), "program name must not be empty");
        ensure!(
            name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_'),
            "invalid program name: {program_name}"
        );
        Ok(ProgramManager::new(
            self,
            format!("{name}.aleo"),
            program_dir.into(),
        ))
    }

    pub fn account(&self) -> &Account {
        &self.account
    }

    pub fn base_url(&self) -> &String {
        &self.base_url
    }

    pub fn client(&self) -> &ureq::Agent {
        &self.client
    }

    pub fn network(&self) -> &String {
        &self.network
    }

    /// The numeric network flag `snarkos developer` commands expect: an
    /// explicit override when configured, else 0 for mainnet and 1 otherwise.
    pub fn network_mode(&self) -> u8 {
        match self.network_mode {
            Some(mode) => mode,
            None if self.network == MAINNET => 0,
            None => 1,
        }
    }

    pub fn decryptor(&self) -> &dyn OutputDecryptor {
        self.decryptor.as_ref()
    }

    pub fn set_url(&mut self, url: &str) {
        self.base_url = url.to_string();
    }

    pub fn set_network(&mut self, network: &str) {
        self.network = network.to_string();
    }

    pub fn set_account(&mut self, account: Account) {
        self.account = account;
    }

    /// Points the agent at a local development node.
    pub fn local_devnet(&mut self, port: &str) {
        self.network = DEFAULT_TESTNET.to_string();
        self.base_url = format!("http://0.0.0.0:{}", port);
    }
}
