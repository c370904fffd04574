use anyhow::{Context, Result};
use benjis_deli::hours::{Clock, FixedClock, SystemClock};
use benjis_deli::ui::{self, PreviewOptions};
use benjis_deli::utils::logger::{init_tracing, LogTarget};
use benjis_deli::utils::time::{parse_local_datetime, weekday_name};
use benjis_deli::SiteConfig;
use chrono::Local;
use clap::{Parser, Subcommand};
use std::io::{stdout, IsTerminal};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

const HEADLESS_DEFAULT_SECS: u64 = 15;

#[derive(Parser)]
#[command(name = "benjis")]
#[command(about = "Benji's Deli storefront, live in the terminal", long_about = None)]
struct Cli {
    /// Site config file (default: ~/.benjis/config.yaml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    debug: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Browse the storefront page in the terminal
    Preview {
        /// Seed for the ticket counter
        #[arg(long)]
        seed: Option<u64>,

        /// Stop after this many seconds
        #[arg(long)]
        duration: Option<u64>,

        /// Scroll the whole page without drawing and print the end state as JSON
        #[arg(long)]
        headless: bool,
    },
    /// Print whether the deli is open
    Status {
        /// Local time to check instead of now, "YYYY-MM-DD HH:MM" or "HH:MM"
        #[arg(long)]
        at: Option<String>,
    },
    /// Print the weekly opening hours
    Hours,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // The live preview owns the terminal, so its logs go to a file.
    let interactive = matches!(cli.command, Command::Preview { headless: false, .. }) && stdout().is_terminal();
    let log_target = if interactive {
        LogTarget::latest_log_in(&dirs::home_dir().unwrap_or_else(|| PathBuf::from(".")))
    } else {
        LogTarget::Stderr
    };
    if let Err(e) = init_tracing(&log_target, cli.debug) {
        eprintln!("⚠️ Failed to initialize logger: {}", e);
    }

    let config_path = cli.config.clone().unwrap_or_else(SiteConfig::default_path);
    let config = SiteConfig::load_or_default(&config_path)
        .with_context(|| format!("failed to load config from {}", config_path.display()))?;

    match cli.command {
        Command::Preview {
            seed,
            duration,
            headless,
        } => {
            let options = PreviewOptions {
                seed: seed.unwrap_or_else(|| fastrand::u64(..)),
                duration: duration.map(Duration::from_secs),
                ..PreviewOptions::default()
            };
            preview(&config, options, headless || !interactive)
        }
        Command::Status { at } => status(&config, at.as_deref()),
        Command::Hours => {
            for (day, hours) in config.hours.days() {
                println!("{:<10} {}", weekday_name(day), hours);
            }
            Ok(())
        }
    }
}

fn preview(config: &SiteConfig, options: PreviewOptions, headless: bool) -> Result<()> {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("failed to start the page runtime")?;
    let clock: Arc<dyn Clock> = Arc::new(SystemClock);

    if headless {
        let duration = options
            .duration
            .unwrap_or(Duration::from_secs(HEADLESS_DEFAULT_SECS));
        let snapshot = runtime.block_on(ui::run_headless(config, clock, &options, duration));
        println!("{}", snapshot.to_json()?);
        return Ok(());
    }

    runtime
        .block_on(ui::run_interactive(config, clock, &options))
        .context("terminal preview failed")?;
    Ok(())
}

fn status(config: &SiteConfig, at: Option<&str>) -> Result<()> {
    let clock: Box<dyn Clock> = match at {
        Some(input) => Box::new(FixedClock(parse_local_datetime(input, Local::now().date_naive())?)),
        None => Box::new(SystemClock),
    };
    println!("{}", config.hours.status_at(clock.now()));
    Ok(())
}
