//! Multi-session host: one watch table per evaluator connection.

use crate::backend::EvaluatorHandle;
use crate::table::{TableFont, WatchTable};
use std::collections::btree_map::Entry;
use std::collections::BTreeMap;
use std::fmt;
use tracing::{error, info};
use watchlist_core::settings::SettingsFile;
use watchlist_core::{
    all_expressions_across_sessions, Config, RowId, SelectionPolicy, WatchlistError,
};

/// Identifies one evaluator connection (one interpreter console).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ConnectionId(pub u32);

impl fmt::Display for ConnectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "connection-{}", self.0)
    }
}

/// Hosts the watch tables of all open connections.
///
/// Table actions are routed to the current session. New sessions start from
/// the persisted expression list; shutdown persists the union of every open
/// session's expressions.
#[derive(Debug)]
pub struct WatchlistPanel {
    sessions: BTreeMap<ConnectionId, WatchTable>,
    current: Option<ConnectionId>,
    font: TableFont,
    settings: SettingsFile,
    debugger_only: bool,
    policy: SelectionPolicy,
}

impl WatchlistPanel {
    pub fn new(config: &Config) -> Self {
        Self {
            sessions: BTreeMap::new(),
            current: None,
            font: TableFont::default(),
            settings: SettingsFile::new(config.settings_path.clone()),
            debugger_only: config.debugger_only,
            policy: config.selection_policy,
        }
    }

    pub fn session_count(&self) -> usize {
        self.sessions.len()
    }

    pub fn current(&self) -> Option<ConnectionId> {
        self.current
    }

    pub fn table(&self, id: ConnectionId) -> Option<&WatchTable> {
        self.sessions.get(&id)
    }

    pub fn table_mut(&mut self, id: ConnectionId) -> Option<&mut WatchTable> {
        self.sessions.get_mut(&id)
    }

    pub fn current_table(&self) -> Option<&WatchTable> {
        self.current.and_then(|id| self.sessions.get(&id))
    }

    pub fn current_table_mut(&mut self) -> Option<&mut WatchTable> {
        self.current.and_then(|id| self.sessions.get_mut(&id))
    }

    /// Open a table for a new connection, or reattach an existing one.
    ///
    /// A new table is filled from the persisted expressions and evaluated
    /// right away. The first open session becomes current.
    pub fn open_session(&mut self, id: ConnectionId, handle: EvaluatorHandle) -> &mut WatchTable {
        if self.current.is_none() {
            self.current = Some(id);
        }
        let table = match self.sessions.entry(id) {
            Entry::Occupied(entry) => {
                info!(connection = %id, "reattaching watch table");
                entry.into_mut()
            }
            Entry::Vacant(entry) => {
                let mut table = WatchTable::with_expressions(
                    self.policy,
                    self.debugger_only,
                    self.settings.load_expressions(),
                );
                table.set_display_font(self.font.clone());
                info!(connection = %id, rows = table.store().len(), "opened watch table");
                entry.insert(table)
            }
        };
        table.attach(handle);
        table
    }

    /// Close a connection's table.
    ///
    /// # Returns
    /// The closed table's expressions, or `None` for an unknown id.
    pub fn close_session(&mut self, id: ConnectionId) -> Option<Vec<String>> {
        let mut table = self.sessions.remove(&id)?;
        table.detach();
        if self.current == Some(id) {
            self.current = self.sessions.keys().next().copied();
        }
        info!(connection = %id, "closed watch table");
        Some(table.expressions())
    }

    /// Make `id` the current session; unknown ids are ignored.
    pub fn switch_to(&mut self, id: ConnectionId) -> bool {
        if !self.sessions.contains_key(&id) {
            return false;
        }
        self.current = Some(id);
        true
    }

    pub fn add_expression(&mut self) -> Option<RowId> {
        self.current_table_mut().map(WatchTable::add)
    }

    pub fn remove_expression(&mut self) -> usize {
        self.current_table_mut()
            .map(WatchTable::remove_selected)
            .unwrap_or(0)
    }

    pub fn remove_all_expressions(&mut self) {
        if let Some(table) = self.current_table_mut() {
            table.remove_all();
        }
    }

    pub fn font(&self) -> &TableFont {
        &self.font
    }

    /// Apply `font` to every open table and to tables opened later.
    pub fn set_display_font(&mut self, font: TableFont) {
        for table in self.sessions.values_mut() {
            table.set_display_font(font.clone());
        }
        self.font = font;
    }

    /// Sorted, de-duplicated expressions across every open session.
    pub fn all_expressions(&self) -> Vec<String> {
        all_expressions_across_sessions(self.sessions.values().map(WatchTable::store))
    }

    /// Notify the session for `id` that its interpreter finished executing.
    pub fn on_executed(&mut self, id: ConnectionId) {
        if let Some(table) = self.sessions.get_mut(&id) {
            table.on_execution_finished();
        }
    }

    /// Poll every session for evaluator responses.
    ///
    /// # Returns
    /// Protocol violations reported by individual sessions. Other sessions
    /// are still polled when one fails.
    pub fn poll_all(&mut self) -> Vec<(ConnectionId, WatchlistError)> {
        let mut failures = Vec::new();
        for (id, table) in &mut self.sessions {
            if let Err(err) = table.poll_events() {
                error!(connection = %id, "failed to apply evaluation: {}", err);
                failures.push((*id, err));
            }
        }
        failures
    }

    /// Persist the expression union and disconnect every session.
    ///
    /// # Errors
    /// Returns an error when the settings file cannot be written. Sessions
    /// are disconnected either way.
    pub fn shutdown(&mut self) -> Result<(), WatchlistError> {
        let expressions = self.all_expressions();
        for table in self.sessions.values_mut() {
            table.detach();
        }
        self.settings.save_expressions(expressions)
    }
}
