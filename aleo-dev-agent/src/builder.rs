//! A builder for an [Agent]

use std::sync::Arc;

use crate::account::Account;
use crate::agent::Agent;
use crate::decrypt::{OutputDecryptor, PassthroughDecryptor};
use crate::{DEFAULT_BASE_URL, DEFAULT_TESTNET};

#[derive(Clone)]
pub struct AgentBuilder {
    url: String,
    network: String,
    network_mode: Option<u8>,
    account: Account,
    decryptor: Arc<dyn OutputDecryptor>,
}

impl Default for AgentBuilder {
    fn default() -> Self {
        AgentBuilder {
            url: DEFAULT_BASE_URL.to_string(),
            network: DEFAULT_TESTNET.to_string(),
            network_mode: None,
            account: Account::default(),
            decryptor: Arc::new(PassthroughDecryptor),
        }
    }
}

impl AgentBuilder {
    pub fn build(self) -> Agent {
        Agent::with_parts(
            self.url,
            self.network,
            self.network_mode,
            self.account,
            self.decryptor,
        )
    }

    pub fn with_url<S: Into<String>>(mut self, url: S) -> Self {
        self.url = url.into();
        self
    }

    pub fn with_network<S: Into<String>>(mut self, network: S) -> Self {
        self.network = network.into();
        self
    }

    /// Overrides the numeric network flag passed to `snarkos developer`.
    pub fn with_network_mode(mut self, mode: u8) -> Self {
        self.network_mode = Some(mode);
        self
    }

    pub fn with_account(mut self, account: Account) -> Self {
        self.account = account;
        self
    }

    /// Wires in an external decryption routine for private outputs.
    pub fn with_decryptor<D: OutputDecryptor + 'static>(mut self, decryptor: D) -> Self {
        self.decryptor = Arc::new(decryptor);
        self
    }
}
