//! The `aleo-dev-agent` is a simple-to-use library for deploying and invoking
//! programs on the [Aleo Network](https://aleo.org) from Rust tooling.
//!
//! ## Overview
//! The agent drives the external `snarkos` and `leo` command-line tools for
//! everything that involves circuit execution or proof generation, and talks
//! to an Aleo node's REST API directly for everything else: program lookups,
//! mapping queries, transaction broadcast, and confirmation polling.
//!
//! Transaction and deployment payloads returned by the node are treated as
//! pass-through JSON. The textual stdout of `snarkos developer ...` and
//! `leo run`/`leo execute` is scraped into structured values by the parsers
//! in the [`output`] module.
//!
//! ## Example
//!
//! Query a program mapping and execute a transition on a deployed program:
//!
//! ```no_run
//! use aleo_dev_agent::account::Account;
//! use aleo_dev_agent::agent::Agent;
//! use anyhow::Result;
//!
//! fn invoke_program() -> Result<()> {
//!     // private key format: APrivateKey1zkp...
//!     let account = Account::from_private_key("APrivateKey1zkp...")?;
//!     let agent = Agent::builder().with_account(account).build();
//!
//!     // the program project directory holds the Leo sources and build/
//!     let program = agent.program("sample_program", "path/to/sample_program")?;
//!
//!     let balance = program.mapping_value("account", "aleo1...")?;
//!     println!("mapping value: {balance:?}");
//!
//!     // broadcasts through the node and waits for confirmation
//!     let result = program.execute_on_chain("main", &["1u32", "2u32"])?;
//!     if let Some(id) = result.transaction.as_ref().and_then(|tx| tx.id.as_deref()) {
//!         let confirmed = agent.wait_for_transaction(id)?;
//!         println!("confirmed: {:?}", confirmed.id);
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## References
//! - [snarkOS](https://github.com/AleoNet/snarkOS)
//! - [Leo](https://github.com/ProvableHQ/leo)
//! - [Aleo Developer Guide](https://developer.aleo.org/getting_started/)

use std::time::Duration;

pub mod account;
pub mod agent;
pub mod builder;
pub mod chain;
pub mod config;
pub mod decrypt;
pub mod deploy;
pub mod output;
pub mod program;
pub mod runner;
pub mod transaction;

pub use output::ExecutionOutput;
pub use transaction::{Execution, Transaction, Transition, TransitionOutput};

// GLOBAL DECLARATIONS
pub const DEFAULT_BASE_URL: &str = "https://api.explorer.aleo.org/v1";
pub const DEFAULT_TESTNET: &str = "testnet3";
pub const MAINNET: &str = "mainnet";
pub const MICROCREDITS: u64 = 1_000_000; // 1 credit = 1_000_000 microcredits

/// Binaries resolved through `PATH`; both stay external to this crate.
pub const SNARKOS_BINARY: &str = "snarkos";
pub const LEO_BINARY: &str = "leo";

/// Interval between confirmation polls against the node.
pub const POLL_INTERVAL: Duration = Duration::from_secs(1);
/// How long [`agent::Agent::wait_for_transaction`] keeps polling before giving up.
pub const CONFIRMATION_TIMEOUT: Duration = Duration::from_secs(60);
