//! Murmur entry point.
//!
//! # Usage
//!
//! ```bash
//! # Read murmur.toml from the working directory
//! murmur
//!
//! # Another config file, different nick, bell on
//! murmur --config ~/.murmur.toml --nick bob --bell
//! ```
//!
//! Exit status: 0 on `/quit`, end of input or Ctrl-C; 1 if the room cannot
//! be joined; 2 for configuration errors.

#![allow(
    clippy::print_stderr,
    reason = "fatal diagnostics go to stderr outside the terminal session"
)]

use std::{fs::File, path::PathBuf, process::ExitCode, sync::Mutex};

use clap::Parser;
use murmur_app::ControllerError;
use murmur_tui::{Overrides, RuntimeError, config, runtime};
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Configuration errors exit with this status.
const CONFIG_EXIT: u8 = 2;

/// Covert-capable room chat client
#[derive(Parser, Debug)]
#[command(name = "murmur")]
#[command(about = "Line-oriented room chat with plain, gold and stealth modes")]
#[command(version)]
struct Args {
    /// Config file
    #[arg(short, long, default_value = "murmur.toml")]
    config: PathBuf,

    /// Nickname (overrides the config file)
    #[arg(short, long)]
    nick: Option<String>,

    /// Room address (overrides the config file)
    #[arg(short, long)]
    room: Option<String>,

    /// Activity log file (overrides the config file)
    #[arg(long)]
    logfile: Option<PathBuf>,

    /// Ring the terminal bell on incoming messages
    #[arg(long)]
    bell: bool,

    /// Diagnostic log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "error")]
    log_level: String,

    /// Write diagnostics to this file instead of stderr
    #[arg(long)]
    trace_file: Option<PathBuf>,
}

impl Args {
    fn overrides(&self) -> Overrides {
        Overrides {
            nick: self.nick.clone(),
            room: self.room.clone(),
            logfile: self.logfile.clone(),
            bell: self.bell,
        }
    }
}

fn init_tracing(args: &Args) -> std::io::Result<()> {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&args.log_level));

    let (to_file, to_stderr) = match &args.trace_file {
        Some(path) => {
            let file = File::create(path)?;
            (Some(fmt::layer().with_ansi(false).with_writer(Mutex::new(file))), None)
        },
        None => (None, Some(fmt::layer().with_writer(std::io::stderr))),
    };

    tracing_subscriber::registry().with(filter).with(to_file).with(to_stderr).init();
    Ok(())
}

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();

    if let Err(e) = init_tracing(&args) {
        eprintln!("murmur: cannot open trace file: {e}");
        return ExitCode::from(CONFIG_EXIT);
    }

    let params = match config::load(&args.config, args.overrides()) {
        Ok(params) => params,
        Err(e) => {
            eprintln!("murmur: {}: {e}", args.config.display());
            return ExitCode::from(CONFIG_EXIT);
        },
    };

    match runtime::run(params).await {
        Ok(reason) => {
            tracing::info!(?reason, "session ended");
            ExitCode::SUCCESS
        },
        Err(RuntimeError::Controller(ControllerError::Connect(e))) => {
            eprintln!("Unable to connect: {e}");
            ExitCode::FAILURE
        },
        Err(e) => {
            eprintln!("murmur: {e}");
            ExitCode::FAILURE
        },
    }
}
