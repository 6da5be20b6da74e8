use suncal::cli::{Cli, RunArgs, USAGE};
use suncal::components::{GoogleCalendarClient, NominatimGeocoder, TimezoneResolver};
use suncal::config::Config;
use suncal::error::Error;
use suncal::publisher::{Publisher, RunSummary};
use chrono::Local;
use tracing::{error, info};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

/// Initialize logging with environment-based configuration
pub fn init_logging() -> miette::Result<()> {
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,reqwest=warn,hyper=warn")),
        )
        .with_writer(std::io::stderr)
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .map_err(|e| Error::Other(format!("Failed to set up logging: {}", e)))?;

    Ok(())
}

fn exit_with_usage() -> ! {
    for line in USAGE {
        eprintln!("{}", line);
    }
    std::process::exit(1);
}

/// Parse the process arguments, exiting with the usage text on any rejection
pub fn parse_cli() -> Cli {
    match Cli::from_argv(std::env::args_os()) {
        Ok(cli) => cli,
        Err(_) => exit_with_usage(),
    }
}

/// Validate the location, then load the config and build the run parameters.
/// A malformed location exits with the usage text before the config is read.
pub fn prepare(cli: Cli) -> miette::Result<(Config, RunArgs)> {
    let today = Local::now().date_naive();
    match cli.into_request(today, Config::load) {
        Ok(prepared) => Ok(prepared),
        Err(Error::Usage(_)) => exit_with_usage(),
        Err(e) => {
            error!("Failed to load configuration: {:?}", e);
            Err(e.into())
        }
    }
}

/// Build the live clients and publish
pub async fn run(config: Config, args: RunArgs) -> miette::Result<RunSummary> {
    info!(
        "Publishing {} day(s) for '{}' starting {}",
        args.num_days, args.location, args.start_date
    );

    let publisher = Publisher::new(
        GoogleCalendarClient::new(&config),
        NominatimGeocoder::new(&config),
        TimezoneResolver::new(),
    );

    publisher.run(&args).await.map_err(|e| {
        error!("Run aborted: {:?}", e);
        miette::Report::from(e)
    })
}
