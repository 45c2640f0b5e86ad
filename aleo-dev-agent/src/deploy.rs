//! Program deployment through `snarkos developer deploy`.
//!
//! Deployment is a dry-run of the external command followed by a broadcast of
//! the transaction scraped from its stdout. Raw `.aleo` sources that have no
//! Leo build directory are staged into an ephemeral temp project first; the
//! directory only has to outlive the command that reads it.

use std::fs;
use std::path::Path;

use anyhow::{ensure, Context, Result};
use tempfile::TempDir;
use tracing::info;

use crate::output::parse_transaction_json;
use crate::program::ProgramManager;
use crate::runner::CommandRunner;
use crate::transaction::Transaction;
use crate::SNARKOS_BINARY;

impl<'agent> ProgramManager<'agent> {
    /// Deploys the program from its Leo build directory (`{dir}/build`).
    ///
    /// # Arguments
    /// * `priority_fee` - The priority fee in microcredits to pay for the deployment
    ///
    /// # Returns
    /// The deployment transaction accepted for broadcast by the node.
    pub fn deploy(&self, priority_fee: u64) -> Result<Transaction> {
        ensure!(
            !self.exists()?,
            "❌ Program {} already deployed on chain, cancelling deployment",
            self.program_id()
        );
        info!(program = %self.program_id(), "deploying program");
        let build_dir = self.program_dir().join("build");
        self.deploy_from_dir(&build_dir, priority_fee)
    }

    /// Deploys a raw `.aleo` source file, staging it into a temp project.
    ///
    /// Imports are taken from the directory the source file sits in.
    pub fn deploy_aleo(&self, source: &Path, priority_fee: u64) -> Result<Transaction> {
        ensure!(
            !self.exists()?,
            "❌ Program {} already deployed on chain, cancelling deployment",
            self.program_id()
        );
        info!(program = %self.program_id(), source = %source.display(), "deploying program from source");
        let aleo_code = fs::read_to_string(source)
            .with_context(|| format!("failed to read program source {}", source.display()))?;
        let staged = stage_deploy_package(self.program_id(), &aleo_code, source.parent())?;
        self.deploy_from_dir(staged.path(), priority_fee)
    }

    fn deploy_from_dir(&self, dir: &Path, priority_fee: u64) -> Result<Transaction> {
        let agent = self.agent();
        let fee = priority_fee.to_string();
        let network_mode = agent.network_mode().to_string();
        let args: Vec<&str> = vec![
            "developer",
            "deploy",
            self.program_id(),
            "--path",
            ".",
            "--priority-fee",
            fee.as_str(),
            "--private-key",
            agent.account().private_key(),
            "--query",
            agent.base_url().as_str(),
            "--network",
            network_mode.as_str(),
            "--dry-run",
        ];
        let output = CommandRunner::run(SNARKOS_BINARY, &args, dir)?;
        let transaction = parse_transaction_json(&output.stdout)?;
        agent.broadcast_transaction(&transaction)?;
        Ok(transaction)
    }
}

/// Stages a deployment bundle in a temp directory: the program manifest, the
/// source as `main.aleo`, and a copy of the imports directory when present.
///
/// The returned [`TempDir`] removes the bundle on drop, so it must be kept
/// alive until the deploy command has read it.
pub fn stage_deploy_package(
    program_id: &str,
    aleo_code: &str,
    imports_dir: Option<&Path>,
) -> Result<TempDir> {
    let staged = tempfile::Builder::new()
        .prefix("aleo-deploy-")
        .tempdir()
        .context("failed to create staging directory")?;

    let manifest = serde_json::json!({
        "program": program_id,
        "version": "0.0.0",
        "description": "",
        "license": "MIT"
    });
    fs::write(
        staged.path().join("program.json"),
        serde_json::to_string(&manifest)?,
    )?;
    fs::write(staged.path().join("main.aleo"), aleo_code)?;

    if let Some(imports) = imports_dir {
        if imports.is_dir() {
            copy_dir_recursive(imports, &staged.path().join("imports"))?;
        }
    }
    Ok(staged)
}

fn copy_dir_recursive(src: &Path, dst: &Path) -> Result<()> {
    fs::create_dir_all(dst)
        .with_context(|| format!("failed to create directory {}", dst.display()))?;
    for entry in fs::read_dir(src)? {
        let entry = entry?;
        let target = dst.join(entry.file_name());
        if entry.file_type()?.is_dir() {
            copy_dir_recursive(&entry.path(), &target)?;
        } else {
            fs::copy(entry.path(), &target)
                .with_context(|| format!("failed to copy {}", entry.path().display()))?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stage_deploy_package_layout() {
        let imports = tempfile::tempdir().unwrap();
        fs::write(imports.path().join("token.aleo"), "program token.aleo;").unwrap();
        fs::create_dir(imports.path().join("nested")).unwrap();
        fs::write(imports.path().join("nested/util.aleo"), "program util.aleo;").unwrap();

        let staged = stage_deploy_package(
            "sample_program.aleo",
            "program sample_program.aleo;",
            Some(imports.path()),
        )
        .unwrap();

        let manifest: serde_json::Value = serde_json::from_str(
            &fs::read_to_string(staged.path().join("program.json")).unwrap(),
        )
        .unwrap();
        assert_eq!(manifest["program"], "sample_program.aleo");
        assert_eq!(manifest["version"], "0.0.0");

        assert_eq!(
            fs::read_to_string(staged.path().join("main.aleo")).unwrap(),
            "program sample_program.aleo;"
        );
        assert!(staged.path().join("imports/token.aleo").is_file());
        assert!(staged.path().join("imports/nested/util.aleo").is_file());
    }

    #[test]
    fn test_stage_deploy_package_without_imports() {
        let staged =
            stage_deploy_package("sample_program.aleo", "program sample_program.aleo;", None)
                .unwrap();
        assert!(staged.path().join("main.aleo").is_file());
        assert!(!staged.path().join("imports").exists());
    }

    #[test]
    fn test_staged_bundle_is_removed_on_drop() {
        let staged =
            stage_deploy_package("sample_program.aleo", "program sample_program.aleo;", None)
                .unwrap();
        let path = staged.path().to_path_buf();
        drop(staged);
        assert!(!path.exists());
    }
}
