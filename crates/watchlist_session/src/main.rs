//! `watchlist` binary: evaluate a watch list once and print the table.

use clap::Parser;
use std::path::PathBuf;
use std::time::Duration;
use watchlist_session::RunOptions;

#[derive(Parser, Debug)]
#[command(name = "watchlist", about = "Evaluate watch expressions", version)]
struct Cli {
    /// Bind a name in the namespace (repeatable)
    #[arg(short, long = "bind", value_name = "NAME=VALUE", value_parser = parse_binding)]
    bindings: Vec<(String, String)>,

    /// Expression to watch (repeatable); defaults to the saved list
    #[arg(short, long = "watch", value_name = "EXPR")]
    watch: Vec<String>,

    /// Settings file (can also be set via WATCHLIST_SETTINGS_PATH)
    #[arg(long, env = "WATCHLIST_SETTINGS_PATH")]
    settings: Option<PathBuf>,

    /// Evaluate even when the namespace is not paused in a debugger
    #[arg(long)]
    always: bool,

    /// Treat the namespace as running instead of paused
    #[arg(long)]
    running: bool,

    /// Save the watched expressions to the settings file
    #[arg(long)]
    save: bool,

    /// Seconds to wait for the evaluator
    #[arg(short = 't', long, default_value = "2")]
    timeout: u64,
}

impl Cli {
    fn into_options(self) -> RunOptions {
        RunOptions {
            bindings: self.bindings,
            watch: self.watch,
            settings_path: self.settings,
            debugger_only: self.always.then_some(false),
            running: self.running,
            save: self.save,
            timeout: Duration::from_secs(self.timeout),
        }
    }
}

fn parse_binding(raw: &str) -> Result<(String, String), String> {
    match raw.split_once('=') {
        Some((name, value)) if !name.trim().is_empty() => {
            Ok((name.trim().to_string(), value.to_string()))
        }
        _ => Err(format!("expected NAME=VALUE, got '{}'", raw)),
    }
}

fn main() {
    let options = Cli::parse().into_options();
    let exit_code = run_and_report(|| watchlist_session::run(options));
    if exit_code != 0 {
        std::process::exit(exit_code);
    }
}

fn run_and_report<F, E>(runner: F) -> i32
where
    F: FnOnce() -> Result<(), E>,
    E: std::fmt::Display,
{
    match runner() {
        Ok(()) => 0,
        Err(err) => {
            eprintln!("watchlist error: {}", err);
            1
        }
    }
}
