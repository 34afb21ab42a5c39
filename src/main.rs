//! Sports betting arbitrage finder entry point.

use std::io::IsTerminal;
use std::time::Duration;

use clap::{Parser, Subcommand};
use indicatif::{ProgressBar, ProgressStyle};
use rust_decimal::Decimal;
use tracing::{error, info};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use sports_arb::arbitrage::{scan, select_sports};
use sports_arb::config::Config;
use sports_arb::odds::{OddsApiClient, OddsSource, Region};
use sports_arb::report::{render_json, ReportHeader, TextReport};

/// Find sports betting arbitrage opportunities.
///
/// Fetches odds from The Odds API (https://the-odds-api.com/) and compares
/// bookmakers to find risk-free bets.
#[derive(Parser, Debug)]
#[command(name = "sports-arb")]
#[command(version, about)]
struct Args {
    /// Enable verbose logging.
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Command>,

    #[command(flatten)]
    scan: ScanArgs,
}

/// Scan options. Each one overrides its environment variable and may be
/// given before or after the subcommand.
#[derive(clap::Args, Debug, Clone, Default)]
struct ScanArgs {
    /// The Odds API key [env: API_KEY].
    #[arg(short, long, global = true)]
    key: Option<String>,

    /// Region to look for opportunities in: eu, us, au or uk [env: REGION].
    #[arg(short, long, global = true)]
    region: Option<Region>,

    /// Print the opportunities as JSON.
    #[arg(short, long, global = true)]
    json: bool,

    /// Minimum profit margin in percent [env: CUTOFF].
    #[arg(short, long, global = true)]
    cutoff: Option<Decimal>,

    /// Only check sports whose key contains one of these, space separated,
    /// e.g. "mma_mixed_martial_arts americanfootball_nfl" [env: SPORTS].
    #[arg(short, long, global = true)]
    sports: Option<String>,

    /// Include matches that already started: true or false [env: LIVE].
    #[arg(short, long, global = true)]
    live: Option<bool>,

    /// Betting unit to split across outcomes [env: UNIT].
    #[arg(short, long, global = true)]
    unit: Option<Decimal>,
}

impl ScanArgs {
    /// Flags given on the command line, as the variables they replace.
    fn env_overrides(&self) -> Vec<(String, String)> {
        [
            ("API_KEY", self.key.clone()),
            ("REGION", self.region.map(|r| r.to_string())),
            ("CUTOFF", self.cutoff.map(|c| c.to_string())),
            ("SPORTS", self.sports.clone()),
            ("LIVE", self.live.map(|l| l.to_string())),
            ("UNIT", self.unit.map(|u| u.to_string())),
        ]
        .into_iter()
        .filter_map(|(name, value)| Some((name.to_string(), value?)))
        .collect()
    }
}

#[derive(Subcommand, Debug, Clone, Copy, PartialEq, Eq)]
enum Command {
    /// Scan for arbitrage opportunities (default).
    Scan,

    /// List the available sports, narrowed by --sports.
    Sports,

    /// Check configuration validity.
    CheckConfig,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    // Parse CLI arguments
    let args = Args::parse();
    let command = args.command.unwrap_or(Command::Scan);

    // Load configuration, flags replacing their variables
    let loaded = Config::load(args.scan.env_overrides());
    if command == Command::CheckConfig {
        return cmd_check_config(loaded);
    }

    let config = loaded.map_err(|e| {
        eprintln!("Failed to load configuration: {}", e);
        e
    })?;

    init_logging(&config, args.verbose);

    match command {
        Command::Sports => cmd_sports(config).await,
        _ => cmd_scan(config, args.scan.json).await,
    }
}

/// Logs go to stderr so JSON output on stdout stays clean.
fn init_logging(config: &Config, verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("sports_arb=debug,info")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.rust_log))
    };

    if config.log_json() {
        tracing_subscriber::registry()
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .with(filter)
            .init();
    } else {
        tracing_subscriber::registry()
            .with(fmt::layer().with_writer(std::io::stderr))
            .with(filter)
            .init();
    }
}

fn validated(config: Config) -> anyhow::Result<Config> {
    if let Err(e) = config.validate() {
        error!("Invalid configuration: {}", e);
        return Err(anyhow::anyhow!("Configuration validation failed: {}", e));
    }
    Ok(config)
}

/// Spinner on stderr while the scan runs.
fn spinner(message: &'static str, hidden: bool) -> ProgressBar {
    if hidden {
        return ProgressBar::hidden();
    }

    let pb = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::default_spinner().template("  {spinner:.cyan} {msg}") {
        pb.set_style(style);
    }
    pb.set_message(message);
    pb.enable_steady_tick(Duration::from_millis(80));
    pb
}

/// Scan all selected sports and print the opportunities.
async fn cmd_scan(config: Config, json: bool) -> anyhow::Result<()> {
    let config = validated(config)?;
    let params = config.scan_params();

    info!(
        region = %params.region,
        cutoff = %params.cutoff,
        live = params.live,
        unit = %params.unit,
        "Starting scan"
    );

    let client = OddsApiClient::new(&config)?;
    let progress = spinner("Checking all matches", json || !std::io::stderr().is_terminal());
    let result = scan(&client, &params).await;
    progress.finish_and_clear();

    let opportunities = result.map_err(|e| {
        error!("Scan failed: {}", e);
        e
    })?;

    if json {
        println!("{}", render_json(&opportunities)?);
    } else {
        let header = ReportHeader {
            region: config.region,
            cutoff_percent: config.cutoff,
        };
        let report =
            TextReport::new(header, &opportunities).styled(std::io::stdout().is_terminal());
        print!("{}", report);
    }

    Ok(())
}

/// List the sports catalog.
async fn cmd_sports(config: Config) -> anyhow::Result<()> {
    let config = validated(config)?;

    let client = OddsApiClient::new(&config)?;
    let catalog = select_sports(client.list_sports().await?, &config.sport_filters());

    for sport in &catalog {
        println!("{}", sport);
    }
    info!(count = catalog.len(), "Listed sports");

    Ok(())
}

/// Check configuration validity.
fn cmd_check_config(loaded: sports_arb::Result<Config>) -> anyhow::Result<()> {
    println!("======================================================================");
    println!("SPORTS ARB - CONFIGURATION CHECK");
    println!("======================================================================");

    print!("Loading configuration... ");
    let config = match loaded {
        Ok(config) => {
            println!("OK");
            config
        }
        Err(e) => {
            println!("FAILED");
            println!("  Error: {}", e);
            return Err(anyhow::anyhow!("Configuration loading failed"));
        }
    };

    print!("Validating configuration... ");
    match config.validate() {
        Ok(()) => println!("OK"),
        Err(e) => {
            println!("FAILED");
            println!("  Error: {}", e);
            return Err(anyhow::anyhow!("Configuration validation failed"));
        }
    }

    println!("----------------------------------------------------------------------");
    println!("Configuration Summary:");
    println!(
        "  API Key: {}",
        if config.api_key.is_some() {
            "present"
        } else {
            "missing"
        }
    );
    println!("  Region: {}", config.region);
    println!("  Cutoff: {}%", config.cutoff);
    println!("  Unit: {}", config.unit);
    println!("  Live: {}", config.live);
    println!(
        "  Sports: {}",
        config
            .sports
            .as_deref()
            .filter(|s| !s.trim().is_empty())
            .unwrap_or("all")
    );
    println!("  API URL: {}", config.odds_api_url);
    println!("======================================================================");
    println!("CONFIGURATION CHECK PASSED");
    println!("======================================================================");

    Ok(())
}
