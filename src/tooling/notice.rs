//! Terminal notifier.

use crate::session::Notifier;
use owo_colors::OwoColorize;
use parking_lot::Mutex;
use std::io::Write;
use std::time::Duration;

/// Prefix on every notice.
pub const NOTICE_PREFIX: &str = "Vault Publish: ";

/// Prints notices to stderr, prefixed, coloured when stderr is a terminal.
#[derive(Debug, Default)]
pub struct ConsoleNotifier {
    current: Mutex<Option<String>>,
    color: bool,
}

impl ConsoleNotifier {
    pub fn new(color: bool) -> Self {
        Self {
            current: Mutex::new(None),
            color,
        }
    }

    /// The message currently displayed, if any.
    pub fn current(&self) -> Option<String> {
        self.current.lock().clone()
    }

    fn render(&self, message: &str) -> String {
        let text = format!("{}{}", NOTICE_PREFIX, message);
        if !self.color {
            return text;
        }
        if message.ends_with("failed!") || message.ends_with("not set.") || message.ends_with("not found.") {
            text.red().bold().to_string()
        } else if message.ends_with('!') {
            text.green().bold().to_string()
        } else {
            text.dimmed().to_string()
        }
    }

    fn emit(&self, message: &str) {
        let line = self.render(message);
        let mut stderr = std::io::stderr().lock();
        let _ = writeln!(stderr, "{}", line);
        *self.current.lock() = Some(format!("{}{}", NOTICE_PREFIX, message));
    }
}

impl Notifier for ConsoleNotifier {
    fn show(&self, message: &str, _duration: Option<Duration>) {
        self.emit(message);
    }

    fn update(&self, message: &str) {
        self.emit(message);
    }

    fn hide(&self) {
        *self.current.lock() = None;
    }
}
