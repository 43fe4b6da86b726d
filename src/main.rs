//! sigstub CLI
//!
//! Usage:
//!   sigstub                              # board profile, list-of-records responses
//!   sigstub --profile counter            # three-signal counter, flat responses
//!   sigstub --unknown-commands silent    # drop unknown commands instead of reporting
//!   sigstub -vv                          # debug logging on stderr
//!
//! Requests arrive one JSON object per line on stdin; responses leave one
//! JSON value per line on stdout.

use anyhow::{Context, Result};
use clap::Parser;
use std::io;

use sigstub::core::CommandLoop;
use sigstub::types::{LoopConfig, Profile, UnknownCommandPolicy};
use sigstub::VERSION;

#[derive(Parser, Debug)]
#[command(
    name = "sigstub",
    version = VERSION,
    about = "Hardware signal stub speaking newline-delimited JSON on stdio",
    long_about = "sigstub stands in for a compiled hardware model.\n\n\
                  It reads one JSON request per line on stdin and writes the\n\
                  signal registry back as one JSON line on stdout.\n\n\
                  Commands:\n  \
                  inputs     - set input signals from the request's keys\n  \
                  outputs    - report all signals\n  \
                  getinputs  - report all signals\n  \
                  runcycle   - apply one clock edge, then report\n  \
                  exit       - stop"
)]
struct Args {
    /// Protocol variant
    #[arg(long, value_enum, default_value_t = Profile::Board)]
    profile: Profile,

    /// Override how unrecognized commands are answered
    #[arg(long, value_enum)]
    unknown_commands: Option<UnknownCommandPolicy>,

    /// Verbosity on stderr (can be repeated: -v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress all diagnostics except errors
    #[arg(short, long)]
    quiet: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    init_logging(args.verbose, args.quiet);

    let mut config = LoopConfig::from_profile(args.profile);
    if let Some(policy) = args.unknown_commands {
        config = config.with_unknown_commands(policy);
    }
    log::info!("sigstub v{} ({:?})", VERSION, config);

    let stdin = io::stdin();
    let stdout = io::stdout();
    CommandLoop::new(config)
        .run(stdin.lock(), stdout.lock())
        .context("failed to write response")?;

    Ok(())
}

/// Log to stderr; stdout belongs to the protocol
fn init_logging(verbose: u8, quiet: bool) {
    use env_logger::{Builder, Target};
    use log::LevelFilter;
    use std::io::Write;

    let level = if quiet {
        LevelFilter::Error
    } else {
        match verbose {
            0 => LevelFilter::Error,
            1 => LevelFilter::Info,
            2 => LevelFilter::Debug,
            _ => LevelFilter::Trace,
        }
    };

    Builder::new()
        .filter_level(level)
        .target(Target::Stderr)
        .format(|buf, record| {
            writeln!(
                buf,
                "[{} {}] {}",
                record.level(),
                record.target(),
                record.args()
            )
        })
        .init();
}
