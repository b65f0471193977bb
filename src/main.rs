use anyhow::Result;
use clap::Parser;
use partsledger::cli::Cli;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    partsledger::logging::init(cli.verbose);
    cli.run().await
}
