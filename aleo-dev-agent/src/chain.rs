//! Node APIs
use std::thread;
use std::time::Instant;

use anyhow::{bail, Result};
use tracing::{debug, error, info};

use crate::agent::Agent;
use crate::output::parse_json_like;
use crate::transaction::Transaction;
use crate::{CONFIRMATION_TIMEOUT, POLL_INTERVAL};

// body the node returns for a program lookup that has no deployment
const MISSING_PROGRAM_MARKER: &str = "Missing program for ID";

// chain
impl Agent {
    /// Retrieves the latest block height from the network.
    ///
    /// # Returns
    /// The `Ok` variant wraps the latest block height as `u32`.
    pub fn get_latest_block_height(&self) -> Result<u32> {
        let url = format!("{}/{}/block/height/latest", self.base_url(), self.network());
        match self.client().get(&url).call()?.into_json() {
            Ok(height) => Ok(height),
            Err(error) => bail!("Failed to parse the latest block height: {error}"),
        }
    }

    /// Retrieves the source text of a deployed program from the network.
    ///
    /// # Returns
    /// The `Ok` variant wraps the program text as a `String`.
    pub fn get_program(&self, program_id: &str) -> Result<String> {
        let url = self.program_url(program_id);
        match self.client().get(&url).call()?.into_json() {
            Ok(program) => Ok(program),
            Err(error) => bail!("Failed to parse program {program_id}: {error}"),
        }
    }

    /// Checks whether a program is deployed on chain.
    ///
    /// A node response whose body names a missing program is `Ok(false)`;
    /// transport failures and other error statuses propagate as errors.
    pub fn program_exists(&self, program_id: &str) -> Result<bool> {
        let url = self.program_url(program_id);
        debug!(%url, "checking deployment");
        match self.client().get(&url).call() {
            Ok(_) => Ok(true),
            Err(ureq::Error::Status(code, response)) => {
                let body = response.into_string().unwrap_or_default();
                if body.contains(MISSING_PROGRAM_MARKER) {
                    info!(program_id, "deployment not found");
                    Ok(false)
                } else {
                    bail!("Failed to look up program {program_id} (status code {code}: {body:?})")
                }
            }
            Err(ureq::Error::Transport(error)) => {
                bail!("Failed to look up program {program_id}: {error}")
            }
        }
    }

    /// Retrieves the mapping names of a deployed program from the network.
    pub fn get_mapping_names(&self, program_id: &str) -> Result<Vec<String>> {
        let url = format!("{}/mappings", self.program_url(program_id));
        match self.client().get(&url).call()?.into_json() {
            Ok(mappings) => Ok(mappings),
            Err(error) => bail!("Failed to parse mappings of program {program_id}: {error}"),
        }
    }

    /// Queries the value of a program mapping at a given key.
    ///
    /// The node returns the value as an Aleo plaintext string; it is
    /// normalized into JSON before being returned. An absent key is `None`.
    pub fn get_mapping_value(
        &self,
        program_id: &str,
        mapping_name: &str,
        key: &str,
    ) -> Result<Option<serde_json::Value>> {
        let url = self.mapping_url(program_id, mapping_name, key);
        debug!(%url, "mapping query");
        let body: Option<String> = match self.client().get(&url).call()?.into_json() {
            Ok(body) => body,
            Err(error) => bail!("Failed to parse mapping {mapping_name}[{key}]: {error}"),
        };
        match body {
            Some(text) => Ok(Some(parse_json_like(&text)?)),
            None => Ok(None),
        }
    }

    /// Retrieves a transaction by its transaction id from the network.
    ///
    /// # Returns
    /// The `Ok` variant wraps the transaction as `Transaction`.
    pub fn get_transaction(&self, transaction_id: &str) -> Result<Transaction> {
        let url = self.transaction_url(transaction_id);
        match self.client().get(&url).call()?.into_json() {
            Ok(transaction) => Ok(transaction),
            Err(error) => bail!("Failed to parse transaction '{transaction_id}': {error}"),
        }
    }

    /// Broadcasts a transaction to the Aleo network.
    ///
    /// # Arguments
    /// * `transaction` - The transaction to broadcast.
    ///
    /// # Returns
    /// The `Ok` variant wraps the Transaction ID from the network as a `String`.
    pub fn broadcast_transaction(&self, transaction: &Transaction) -> Result<String> {
        let url = format!(
            "{}/{}/transaction/broadcast",
            self.base_url(),
            self.network()
        );
        match self.client().post(&url).send_json(transaction) {
            Ok(response) => match response.into_string() {
                Ok(success_response) => Ok(success_response),
                Err(error) => bail!("❌ Transaction response was malformed {}", error),
            },
            Err(error) => {
                let error_message = match error {
                    ureq::Error::Status(code, response) => {
                        format!("(status code {code}: {:?})", response.into_string()?)
                    }
                    ureq::Error::Transport(err) => format!("({err})"),
                };

                if transaction.is_deploy() {
                    bail!("❌ Failed to deploy program to {}: {}", &url, error_message)
                } else {
                    bail!(
                        "❌ Failed to broadcast execution to {}: {}",
                        &url,
                        error_message
                    )
                }
            }
        }
    }

    /// Polls the network until a broadcast transaction shows up, at
    /// [`POLL_INTERVAL`](crate::POLL_INTERVAL), giving up after
    /// [`CONFIRMATION_TIMEOUT`](crate::CONFIRMATION_TIMEOUT).
    ///
    /// A payload that arrives without an `execution` or `deployment` section
    /// was rejected by the node; it is logged and still returned so callers
    /// can inspect it.
    pub fn wait_for_transaction(&self, transaction_id: &str) -> Result<Transaction> {
        let url = self.transaction_url(transaction_id);
        info!(%url, "waiting for transaction confirmation");
        let deadline = Instant::now() + CONFIRMATION_TIMEOUT;
        loop {
            match self.get_transaction(transaction_id) {
                Ok(transaction) => {
                    if !transaction.is_accepted() {
                        error!(transaction_id, "transaction was rejected by the node");
                    }
                    return Ok(transaction);
                }
                Err(error) => {
                    if Instant::now() >= deadline {
                        bail!(
                            "Timed out after {:?} waiting for transaction '{transaction_id}'",
                            CONFIRMATION_TIMEOUT
                        );
                    }
                    debug!(transaction_id, %error, "transaction not yet available, retrying");
                    thread::sleep(POLL_INTERVAL);
                }
            }
        }
    }
}

// URL layout of the snarkOS REST API: {base}/{network}/...
impl Agent {
    fn program_url(&self, program_id: &str) -> String {
        format!(
            "{}/{}/program/{}",
            self.base_url(),
            self.network(),
            program_id
        )
    }

    fn mapping_url(&self, program_id: &str, mapping_name: &str, key: &str) -> String {
        format!(
            "{}/mapping/{}/{}",
            self.program_url(program_id),
            mapping_name,
            key
        )
    }

    fn transaction_url(&self, transaction_id: &str) -> String {
        format!(
            "{}/{}/transaction/{}",
            self.base_url(),
            self.network(),
            transaction_id
        )
        .replace('"', "")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{Read, Write};
    use std::net::TcpListener;

    // Serves one canned HTTP response on a loopback port and returns the
    // base URL to point the agent at.
    fn serve_once(status_line: &'static str, body: &'static str) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        thread::spawn(move || {
            if let Ok((mut stream, _)) = listener.accept() {
                let mut request = [0u8; 1024];
                let _ = stream.read(&mut request);
                let response = format!(
                    "HTTP/1.1 {status_line}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
                    body.len()
                );
                let _ = stream.write_all(response.as_bytes());
            }
        });
        format!("http://{addr}")
    }

    fn agent_for(url: &str) -> Agent {
        let mut agent = Agent::default();
        agent.set_url(url);
        agent
    }

    #[test]
    fn test_program_exists_when_lookup_succeeds() {
        let url = serve_once("200 OK", "\"program sample_program.aleo;\"");
        let agent = agent_for(&url);
        assert!(agent.program_exists("sample_program.aleo").unwrap());
    }

    #[test]
    fn test_program_exists_missing_program_body_is_false() {
        let url = serve_once(
            "404 Not Found",
            "Missing program for ID sample_program.aleo",
        );
        let agent = agent_for(&url);
        assert!(!agent.program_exists("sample_program.aleo").unwrap());
    }

    #[test]
    fn test_program_exists_other_error_body_propagates() {
        let url = serve_once("400 Bad Request", "malformed request");
        let agent = agent_for(&url);
        let error = agent.program_exists("sample_program.aleo").unwrap_err();
        assert!(error.to_string().contains("sample_program.aleo"));
    }

    #[test]
    fn test_wait_for_transaction_returns_rejected_payload() {
        // a payload without execution/deployment was rejected by the node;
        // it is still handed back to the caller
        let url = serve_once("200 OK", r#"{"id": "at1rejected"}"#);
        let agent = agent_for(&url);
        let transaction = agent.wait_for_transaction("at1rejected").unwrap();
        assert_eq!(transaction.id.as_deref(), Some("at1rejected"));
        assert!(!transaction.is_accepted());
    }

    #[test]
    fn test_url_layout() {
        let agent = Agent::default();
        assert_eq!(
            agent.program_url("credits.aleo"),
            format!(
                "{}/{}/program/credits.aleo",
                crate::DEFAULT_BASE_URL,
                crate::DEFAULT_TESTNET
            )
        );
        assert_eq!(
            agent.mapping_url("credits.aleo", "account", "aleo1abc"),
            format!(
                "{}/{}/program/credits.aleo/mapping/account/aleo1abc",
                crate::DEFAULT_BASE_URL,
                crate::DEFAULT_TESTNET
            )
        );
    }

    #[test]
    fn test_transaction_url_strips_quotes() {
        let agent = Agent::default();
        let url = agent.transaction_url("\"at1abc\"");
        assert!(url.ends_with("/transaction/at1abc"));
    }
}
