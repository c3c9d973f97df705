//! Console API
//!
//! console.log and friends. Every line goes to `tracing` and is kept so
//! callers can inspect what the page printed.

/// Console level
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConsoleLevel {
    Log,
    Info,
    Warn,
    Error,
    Debug,
}

/// One console line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConsoleLine {
    pub level: ConsoleLevel,
    pub message: String,
}

#[derive(Debug, Default)]
pub struct Console {
    lines: Vec<ConsoleLine>,
}

impl Console {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn log(&mut self, message: impl Into<String>) {
        self.log_with_level(ConsoleLevel::Log, message.into());
    }

    pub fn warn(&mut self, message: impl Into<String>) {
        self.log_with_level(ConsoleLevel::Warn, message.into());
    }

    pub fn error(&mut self, message: impl Into<String>) {
        self.log_with_level(ConsoleLevel::Error, message.into());
    }

    /// Log a message at a specific level
    pub fn log_with_level(&mut self, level: ConsoleLevel, message: String) {
        match level {
            ConsoleLevel::Error => tracing::error!("[console] {}", message),
            ConsoleLevel::Warn => tracing::warn!("[console] {}", message),
            ConsoleLevel::Debug => tracing::debug!("[console] {}", message),
            ConsoleLevel::Log | ConsoleLevel::Info => tracing::info!("[console] {}", message),
        }
        self.lines.push(ConsoleLine { level, message });
    }

    pub fn lines(&self) -> &[ConsoleLine] {
        &self.lines
    }

    /// Messages only, in order
    pub fn messages(&self) -> impl Iterator<Item = &str> {
        self.lines.iter().map(|l| l.message.as_str())
    }

    pub fn clear(&mut self) {
        self.lines.clear();
    }
}
