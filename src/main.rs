use clap::Parser;

use arma_api::lifecycle::startup::{self, Cli};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    startup::run(Cli::parse()).await?;
    Ok(())
}
