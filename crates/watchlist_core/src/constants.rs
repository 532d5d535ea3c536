//! Shared constants used across watchlist crates.

/// Maximum number of characters of an evaluation result shown in a value cell.
pub const VALUE_DISPLAY_LIMIT: usize = 512;

/// Marker appended to evaluation results cut at [`VALUE_DISPLAY_LIMIT`].
pub const VALUE_TRUNCATION_MARKER: &str = "\u{2026}";

/// Settings section that owns the persisted watch expressions.
pub const SETTINGS_SECTION: &str = "watchlist";

/// Name of the setting holding the persisted expression list.
pub const EXPRESSIONS_SETTING: &str = "expressions";

/// Version tag written into the settings file.
pub const SETTINGS_VERSION: &str = "0.1.0";

/// Evaluators only evaluate while paused in a debugger unless told otherwise.
pub const DEFAULT_DEBUGGER_ONLY: bool = true;

/// Error kinds rendered as "name not found" (inert but still selectable).
pub const NAME_ERROR_KINDS: &[&str] = &["NameError", "UnboundLocalError"];

/// Error kinds rendered as definitively invalid input.
pub const SYNTAX_ERROR_KINDS: &[&str] = &["SyntaxError", "IndentationError", "TabError"];
