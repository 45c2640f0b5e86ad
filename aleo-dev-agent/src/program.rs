//! Tools for executing and managing programs on the Aleo network.
//!
//! A [ProgramManager] binds an [Agent] to one program and the project
//! directory holding its Leo sources. Local runs and on-chain executions go
//! through the external `leo` and `snarkos` binaries; everything the
//! commands print is scraped by the parsers in [`crate::output`].

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::account::ADDRESS_PREFIX;
use crate::agent::Agent;
use crate::decrypt::decrypt_transition_outputs;
use crate::output::{parse_execute_stdout, parse_transaction_json, ExecutionOutput};
use crate::runner::CommandRunner;
use crate::{LEO_BINARY, SNARKOS_BINARY};

/// How a program invocation is carried out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ExecutionMode {
    /// `leo run`: local evaluation, nothing leaves the machine.
    #[default]
    #[serde(rename = "leo_run", alias = "run")]
    LeoRun,
    /// `leo execute`: proof generation through leo.
    #[serde(rename = "leo_execute")]
    LeoExecute,
    /// `snarkos developer execute --dry-run` plus a broadcast through the node.
    #[serde(rename = "execute")]
    SnarkExecute,
}

#[derive(Clone)]
pub struct ProgramManager<'agent> {
    agent: &'agent Agent,
    program_id: String,
    program_dir: PathBuf,
}

impl<'agent> ProgramManager<'agent> {
    /// Creates a new Program Manager for a program id (`name.aleo`) rooted at
    /// a project directory.
    pub(crate) fn new(agent: &'agent Agent, program_id: String, program_dir: PathBuf) -> Self {
        Self {
            agent,
            program_id,
            program_dir,
        }
    }

    pub fn program_id(&self) -> &str {
        &self.program_id
    }

    pub fn program_dir(&self) -> &Path {
        &self.program_dir
    }

    pub fn agent(&self) -> &Agent {
        self.agent
    }

    /// Checks whether this program is deployed on chain.
    pub fn exists(&self) -> Result<bool> {
        self.agent.program_exists(&self.program_id)
    }
}

// invocation functions
impl<'agent> ProgramManager<'agent> {
    /// Evaluates a transition locally with `leo run`.
    ///
    /// Nothing is proven or broadcast; the outputs are scraped from stdout.
    pub fn run(&self, function: &str, inputs: &[&str]) -> Result<ExecutionOutput> {
        let mut args = vec!["run", function];
        args.extend_from_slice(inputs);
        let output = CommandRunner::run(LEO_BINARY, &args, &self.program_dir)?;
        parse_execute_stdout(&output.stdout)
    }

    /// Executes a transition with `leo execute` and decrypts any private
    /// outputs through the agent's decryptor.
    pub fn execute(&self, function: &str, inputs: &[&str]) -> Result<ExecutionOutput> {
        let mut args = vec!["execute", function];
        args.extend_from_slice(inputs);
        let output = CommandRunner::run(LEO_BINARY, &args, &self.program_dir)?;
        let mut parsed = parse_execute_stdout(&output.stdout)?;
        if let Some(transaction) = parsed.transaction.as_ref() {
            parsed.data = decrypt_transition_outputs(
                transaction,
                &self.program_id,
                function,
                self.agent.account().private_key(),
                self.agent.decryptor(),
            )?;
        }
        Ok(parsed)
    }

    /// Executes a transition of a deployed program on the Aleo network.
    ///
    /// Runs `snarkos developer execute ... --dry-run`, extracts the
    /// transaction from stdout, broadcasts it through the agent, and decrypts
    /// the transition's private outputs.
    ///
    /// # Example
    /// ```no_run
    /// use aleo_dev_agent::agent::Agent;
    /// # fn main() -> anyhow::Result<()> {
    /// let agent = Agent::default();
    /// let program = agent.program("sample_program", "path/to/sample_program")?;
    /// let result = program.execute_on_chain("main", &["1u32", "2u32"])?;
    /// println!("outputs: {:?}", result.data);
    /// # Ok(())
    /// # }
    /// ```
    pub fn execute_on_chain(&self, function: &str, inputs: &[&str]) -> Result<ExecutionOutput> {
        let private_key = self.agent.account().private_key();
        let query = self.agent.base_url().clone();

        let mut args: Vec<&str> =
            vec!["developer", "execute", self.program_id.as_str(), function];
        args.extend_from_slice(inputs);
        args.extend_from_slice(&[
            "--private-key",
            private_key,
            "--query",
            query.as_str(),
            "--dry-run",
        ]);

        let output = CommandRunner::run(SNARKOS_BINARY, &args, &self.program_dir)?;
        let transaction = parse_transaction_json(&output.stdout)?;
        self.agent.broadcast_transaction(&transaction)?;
        info!(program = %self.program_id, function, "execution broadcast");

        let data = decrypt_transition_outputs(
            &transaction,
            &self.program_id,
            function,
            private_key,
            self.agent.decryptor(),
        )?;
        Ok(ExecutionOutput {
            data,
            transaction: Some(transaction),
        })
    }

    /// Dispatches to [`run`](Self::run), [`execute`](Self::execute) or
    /// [`execute_on_chain`](Self::execute_on_chain) by mode.
    pub fn invoke(
        &self,
        mode: ExecutionMode,
        function: &str,
        inputs: &[&str],
    ) -> Result<ExecutionOutput> {
        match mode {
            ExecutionMode::LeoRun => self.run(function, inputs),
            ExecutionMode::LeoExecute => self.execute(function, inputs),
            ExecutionMode::SnarkExecute => self.execute_on_chain(function, inputs),
        }
    }
}

// chain queries scoped to this program
impl<'agent> ProgramManager<'agent> {
    /// Get the current value of a program mapping at a given key.
    pub fn mapping_value(&self, mapping_name: &str, key: &str) -> Result<Option<serde_json::Value>> {
        self.agent
            .get_mapping_value(&self.program_id, mapping_name, key)
    }

    /// Get all mapping names of this program.
    pub fn mapping_names(&self) -> Result<Vec<String>> {
        self.agent.get_mapping_names(&self.program_id)
    }

    /// Derives the program's on-chain address via `leo account program`.
    pub fn program_address(&self) -> Result<String> {
        let name = self.program_id.trim_end_matches(".aleo");
        let output = CommandRunner::run(
            LEO_BINARY,
            &["account", "program", name],
            &self.program_dir,
        )?;
        output
            .stdout
            .split_whitespace()
            .find(|token| token.starts_with(ADDRESS_PREFIX))
            .map(str::to_string)
            .with_context(|| format!("no address in `leo account program {name}` output"))
    }
}
