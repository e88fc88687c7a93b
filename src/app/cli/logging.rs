//! Global tracing subscriber for the CLI.

use std::io::IsTerminal;
use std::str::FromStr;

use clap::Args;
use tracing_subscriber::filter::{EnvFilter, LevelFilter};
use tracing_subscriber::fmt;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

#[derive(Args, Debug, Clone, Copy, Default)]
pub struct LogArgs {
    /// More log output (repeat for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,
    /// Less log output (repeat for errors only)
    #[arg(short, long, action = clap::ArgAction::Count, global = true, conflicts_with = "verbose")]
    pub quiet: u8,
}

/// Install the stderr subscriber. Later calls are no-ops.
pub fn init_global_subscriber(args: LogArgs) {
    let level = log_level(args);
    let env_filter = EnvFilter::builder().with_default_directive(level.into()).from_env_lossy();

    let stderr_is_terminal = std::io::stderr().is_terminal();
    let layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_ansi(stderr_is_terminal)
        .with_target(false)
        .without_time()
        .compact();

    let _ = tracing_subscriber::registry().with(env_filter).with(layer).try_init();
}

fn log_level(args: LogArgs) -> LevelFilter {
    match args.quiet {
        0 => (),
        1 => return LevelFilter::WARN,
        _ => return LevelFilter::ERROR,
    }

    if let Ok(rust_log) = std::env::var(EnvFilter::DEFAULT_ENV)
        && let Ok(level) = LevelFilter::from_str(&rust_log)
    {
        return level;
    }

    match args.verbose {
        0 => LevelFilter::INFO,
        1 => LevelFilter::DEBUG,
        _ => LevelFilter::TRACE,
    }
}
