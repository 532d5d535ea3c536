//! Clipboard seam for the "copy value" action.

/// Destination for copied cell text.
pub trait Clipboard {
    fn set_text(&mut self, text: &str);
}

/// In-process clipboard that keeps the last copied text.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MemoryClipboard {
    text: Option<String>,
}

impl MemoryClipboard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn text(&self) -> Option<&str> {
        self.text.as_deref()
    }
}

impl Clipboard for MemoryClipboard {
    fn set_text(&mut self, text: &str) {
        self.text = Some(text.to_string());
    }
}
