//! Watch-expression sessions: the table model bound to evaluator connections.
//!
//! Exposes a `run` helper so the `watchlist` binary stays a thin argument
//! parser around the library.

/// Evaluator protocol, namespace seam, and worker spawn helper.
pub mod backend;
pub mod clipboard;
/// Multi-session host.
pub mod panel;
/// Request/response cycle with one evaluator.
pub mod session;
/// Watch table actions and presentation state.
pub mod table;

use backend::{spawn_evaluator, MapNamespace};
use panel::{ConnectionId, WatchlistPanel};
use std::path::PathBuf;
use std::thread;
use std::time::{Duration, Instant};
use table::WatchTable;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;
use watchlist_core::{Config, WatchlistError};

const RESULT_POLL_INTERVAL: Duration = Duration::from_millis(5);

/// Options for a one-shot evaluation run.
#[derive(Debug, Clone, Default)]
pub struct RunOptions {
    /// `(name, value)` pairs bound in the namespace before evaluating.
    pub bindings: Vec<(String, String)>,
    /// Expressions to watch; empty means "use the persisted list".
    pub watch: Vec<String>,
    /// Overrides the configured settings file.
    pub settings_path: Option<PathBuf>,
    /// Overrides the configured restricted-mode flag.
    pub debugger_only: Option<bool>,
    /// Evaluate as if the namespace were running rather than paused.
    pub running: bool,
    /// Persist the watched expressions on exit.
    pub save: bool,
    pub timeout: Duration,
}

/// Install the global tracing subscriber.
///
/// Honors `RUST_LOG`; falls back to `watchlist_session=info,watchlist_core=warn`.
pub fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new("watchlist_session=info,watchlist_core=warn"))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .compact()
        .init();
}

/// Poll `table` until every evaluate request was answered or `timeout` passes.
///
/// # Returns
/// `true` when all requests were answered in time.
///
/// # Errors
/// Propagates protocol violations from [`WatchTable::poll_events`].
pub fn wait_for_results(
    table: &mut WatchTable,
    timeout: Duration,
) -> Result<bool, WatchlistError> {
    let deadline = Instant::now() + timeout;
    loop {
        table.poll_events()?;
        if table.session().pending_requests() == 0 {
            return Ok(true);
        }
        if !table.session().is_connected() || Instant::now() >= deadline {
            return Ok(false);
        }
        thread::sleep(RESULT_POLL_INTERVAL);
    }
}

/// Render a table as aligned `expression  value  tooltip` lines.
pub fn render_table(table: &WatchTable) -> String {
    let rows = table.store().rows();
    let width = rows
        .iter()
        .map(|row| row.expression.chars().count())
        .max()
        .unwrap_or(0);
    let mut out = String::new();
    for row in rows {
        let line = match row.tooltip() {
            "" => format!("{:<width$}  {}", row.expression, row.display_text()),
            tooltip => format!(
                "{:<width$}  {}  ({})",
                row.expression,
                row.display_text(),
                tooltip
            ),
        };
        out.push_str(line.trim_end());
        out.push('\n');
    }
    out
}

/// Evaluate a watch list once against a map namespace and print the table.
///
/// # Errors
/// Returns an error when the evaluator violates the batch protocol or the
/// settings file cannot be written.
pub fn run(options: RunOptions) -> Result<(), WatchlistError> {
    init_tracing();

    let mut config = Config::from_env();
    if let Some(path) = options.settings_path {
        config.settings_path = path;
    }
    if let Some(debugger_only) = options.debugger_only {
        config.debugger_only = debugger_only;
    }

    let namespace = MapNamespace::new();
    for (name, value) in &options.bindings {
        namespace.set(name.as_str(), value.as_str());
    }
    namespace.set_debugging(!options.running);

    let mut panel = WatchlistPanel::new(&config);
    let id = ConnectionId(0);
    let table = panel.open_session(id, spawn_evaluator(namespace));
    if !options.watch.is_empty() {
        table.set_expressions(&options.watch);
    }
    if !wait_for_results(table, options.timeout)? {
        warn!("evaluator did not answer within {:?}", options.timeout);
    }
    print!("{}", render_table(table));

    if options.save {
        panel.shutdown()?;
        info!(path = %config.settings_path.display(), "saved watch expressions");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use watchlist_core::{SelectionPolicy, WatchEntry};

    #[test]
    fn render_table_aligns_values_and_shows_failure_messages() {
        let mut table =
            WatchTable::with_expressions(SelectionPolicy::MultiRow, false, ["a", "long"]);
        table
            .on_result(Some(vec![
                WatchEntry::ok("a", "1"),
                WatchEntry::failed("long", "name 'long' is not defined", "NameError"),
            ]))
            .expect("reconcile");

        assert_eq!(
            render_table(&table),
            "a     1\nlong  <NameError>  (name 'long' is not defined)\n"
        );
    }

    #[test]
    fn wait_for_results_returns_once_evaluator_answers() {
        let namespace = MapNamespace::new();
        namespace.set("x", "42");
        let mut table = WatchTable::with_expressions(SelectionPolicy::MultiRow, false, ["x"]);
        table.attach(spawn_evaluator(namespace));

        assert!(wait_for_results(&mut table, Duration::from_secs(2)).expect("poll"));
        assert_eq!(table.store().rows()[0].display_text(), "42");
    }

    #[test]
    fn wait_for_results_without_connection_returns_immediately() {
        let mut table = WatchTable::new(SelectionPolicy::MultiRow, false);
        assert!(wait_for_results(&mut table, Duration::from_secs(2)).expect("poll"));
    }
}
