//! dvmn-bot binary. Config from env (and `.env`), overridable by CLI flags.

use anyhow::Result;
use clap::Parser;
use dvmn_bot::{load_config, run_bot, Cli, Commands};

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    match cli.command {
        Commands::Run { token, chat_id } => {
            let config = load_config(token, chat_id)?;
            run_bot(config).await
        }
    }
}
