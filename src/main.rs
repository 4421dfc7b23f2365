use air_quality_report::cli::{run, Cli};
use air_quality_report::error::Result;
use clap::Parser;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    run(cli).await
}
