use std::env;

use log::info;

use crate::config::Config;
use crate::yescoin::{
    display, load_accounts, CycleRunner, SessionStore, YesCoinClient, YesCoinResult,
};

mod config;
mod yescoin;

#[tokio::main]
async fn main() -> YesCoinResult<()> {
    let config = Config::from_env()?;

    pretty_env_logger::formatted_timed_builder()
        .parse_filters(&env::var("RUST_LOG").unwrap_or_else(|_| "yescoin_afk=info".to_string()))
        .init();

    display::print_banner();

    let accounts = load_accounts(&config.accounts_path).await?;
    info!(
        "Loaded {} accounts from {}",
        accounts.len(),
        config.accounts_path.display()
    );

    let sessions = SessionStore::load(&config.tokens_path).await;
    info!("{} accounts have a cached session", sessions.len());

    let client = YesCoinClient::with_base_url(&config.api_url)?;
    let runner = CycleRunner::new(
        client,
        sessions,
        config.workflow.clone(),
        config.pacer(),
        config.cycle_interval,
    );

    runner.run_forever(accounts).await;

    Ok(())
}
