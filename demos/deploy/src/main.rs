use aleo_dev_agent::agent::Agent;
use aleo_dev_agent::config::{find_project_root, ProjectConfig, PROJECT_CONFIG_FILE};
use aleo_dev_agent::MICROCREDITS;
use anyhow::{Context, Result};

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    // discover the project and its configuration
    let cwd = std::env::current_dir()?;
    let root = find_project_root(&cwd).context("no aleo project found above the current directory")?;
    let config = ProjectConfig::load(&root.join(PROJECT_CONFIG_FILE))?;
    let network = config.default_network.clone().unwrap_or_else(|| "testnet3".to_string());

    let agent = Agent::from_project(&config, &network)?;

    // the program project lives under programs/<name>, with build/ from `leo build`
    let program = agent.program("sample_program", root.join("programs/sample_program"))?;

    // 1 credit priority fee
    let transaction = program.deploy(MICROCREDITS)?;
    println!("deployment broadcast: {:?}", transaction.id);

    // poll the node until the deployment is confirmed
    if let Some(id) = transaction.id.as_deref() {
        let confirmed = agent.wait_for_transaction(id)?;
        if confirmed.is_accepted() {
            println!("deployment confirmed: {id}");
        } else {
            println!("deployment rejected: {id}");
        }
    }
    Ok(())
}
