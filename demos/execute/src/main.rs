use aleo_dev_agent::account::Account;
use aleo_dev_agent::agent::Agent;
use aleo_dev_agent::program::ExecutionMode;
use anyhow::Result;

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    // private key format: APrivateKey1zkp...
    let account = Account::from_private_key("APrivateKey1zkp...")?;
    let mut agent = Agent::builder().with_account(account).build();

    // target a local development node instead of the public endpoint
    agent.local_devnet("3030");

    let program = agent.program("sample_program", "path/to/sample_program")?;

    // evaluate locally first: nothing is proven or broadcast
    let local = program.invoke(ExecutionMode::LeoRun, "main", &["1u32", "2u32"])?;
    println!("local outputs: {:?}", local.data);

    // then execute on chain and wait for confirmation
    let result = program.invoke(ExecutionMode::SnarkExecute, "main", &["1u32", "2u32"])?;
    println!("outputs: {:?}", result.data);

    if let Some(id) = result.transaction.as_ref().and_then(|tx| tx.id.as_deref()) {
        let confirmed = agent.wait_for_transaction(id)?;
        println!("confirmed: {:?}", confirmed.id);
    }

    // read program state back through a mapping query
    let value = program.mapping_value("account", "aleo1...")?;
    println!("mapping value: {value:?}");

    Ok(())
}
