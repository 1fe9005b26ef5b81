// Sun Oct 18 2026 - Alex

use anyhow::Context;
use clap::Parser;
use colored::Colorize;
use segmented_primes::{
    config::Config,
    orchestration::Coordinator,
    ui::ConsoleObserver,
    utils::{interrupt, logging},
    CancellationToken,
};
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;

const EXIT_FAILURE: u8 = 1;
const EXIT_CANCELLED: u8 = 130;

#[derive(Parser, Debug)]
#[command(name = "segmented-primes")]
#[command(author = "Alex")]
#[command(version = "1.0.0")]
#[command(
    about = "Counts primes up to a limit on a fixed worker pool, one segment at a time",
    long_about = None
)]
struct Args {
    /// Number of worker threads
    #[arg(short, long)]
    pool_size: Option<usize>,

    /// Use one worker per logical CPU
    #[arg(long, conflicts_with = "pool_size")]
    auto_pool: bool,

    /// Count primes in [1, upper_limit]
    #[arg(short, long)]
    upper_limit: Option<u64>,

    /// Values per segment
    #[arg(short, long)]
    segment_size: Option<u64>,

    /// JSON config file; flags override its values
    #[arg(short, long)]
    config: Option<PathBuf>,

    #[arg(long)]
    shutdown_grace_secs: Option<u64>,

    #[arg(long)]
    progress_steps: Option<u64>,

    #[arg(short, long, default_value = "warn")]
    log_level: String,

    /// Only report submissions, collected segments and the summary
    #[arg(short, long)]
    quiet: bool,

    #[arg(long)]
    progress_bar: bool,

    #[arg(long)]
    no_color: bool,
}

impl Args {
    fn build_config(&self) -> anyhow::Result<Config> {
        let mut config = match &self.config {
            Some(path) => Config::load(path)
                .with_context(|| format!("Failed to load config from {}", path.display()))?,
            None => Config::default(),
        };

        if self.auto_pool {
            config.pool_size = num_cpus::get();
        }
        if let Some(pool_size) = self.pool_size {
            config.pool_size = pool_size;
        }
        if let Some(upper_limit) = self.upper_limit {
            config.upper_limit = upper_limit;
        }
        if let Some(segment_size) = self.segment_size {
            config.segment_size = segment_size;
        }
        if let Some(secs) = self.shutdown_grace_secs {
            config = config.with_shutdown_grace(Duration::from_secs(secs));
        }
        if let Some(steps) = self.progress_steps {
            config.progress_steps = steps;
        }

        config.validate().context("Invalid configuration")?;
        Ok(config)
    }
}

fn main() -> ExitCode {
    let args = Args::parse();

    if args.no_color {
        colored::control::set_override(false);
    }
    logging::init_logger(logging::level_from_str(&args.log_level));

    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            let cancelled = err
                .downcast_ref::<segmented_primes::CoordinatorError>()
                .map(|e| e.is_cancelled())
                .unwrap_or(false);

            eprintln!("{} {:#}", "[!]".red(), err);
            if cancelled && interrupt::was_interrupted() {
                eprintln!("{} Interrupted by signal", "[!]".yellow());
            }
            if cancelled {
                ExitCode::from(EXIT_CANCELLED)
            } else {
                ExitCode::from(EXIT_FAILURE)
            }
        }
    }
}

fn run(args: &Args) -> anyhow::Result<()> {
    let config = args.build_config()?;

    let cpus = num_cpus::get();
    if config.pool_size > cpus {
        log::info!(
            "Pool size {} exceeds the {} logical CPUs available",
            config.pool_size,
            cpus
        );
    }

    let token = CancellationToken::new();
    interrupt::install(&token).context("Failed to install interrupt handler")?;

    let observer = ConsoleObserver::new()
        .with_quiet(args.quiet)
        .with_progress_bar(args.progress_bar);

    let coordinator = Coordinator::new(config).with_observer(Arc::new(observer));
    let run = coordinator.run(&token)?;

    log::debug!("{}", run.shutdown);
    token.cancel();
    Ok(())
}
