use std::process::ExitCode;

use clap::Parser;

mod commands;
mod printer;

use commands::Command;
use shadowtrace_runtime::logging;

#[derive(Debug, Parser)]
#[command(
    name = "shadowtrace",
    version,
    about = "Directory snapshots and file change monitoring",
    propagate_version = true
)]
pub struct Cli {
    /// Log level (error, warn, info, debug, trace); overrides SHADOWTRACE_LOG_LEVEL
    #[arg(long, global = true, value_name = "LEVEL", value_parser = parse_log_level)]
    pub log_level: Option<log::Level>,

    #[command(subcommand)]
    pub command: Command,
}

fn parse_log_level(value: &str) -> Result<log::Level, String> {
    logging::parse_level(value).ok_or_else(|| format!("invalid log level {value:?}"))
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    logging::init_with(cli.log_level).ok();

    match cli.command {
        Command::Scan(args) => commands::scan::run(args),
        Command::Monitor(args) => commands::monitor::run(args),
    }
}
