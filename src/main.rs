mod startup;

use tracing::info;

#[tokio::main]
async fn main() -> miette::Result<()> {
    // Initialize logging
    startup::init_logging()?;

    // Both exit with the usage text before any config or network access
    let cli = startup::parse_cli();
    let (config, args) = startup::prepare(cli)?;

    info!("Starting suncal");
    startup::run(config, args).await?;

    Ok(())
}
