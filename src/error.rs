//! Error types and reporting for the parser.
//!
//! Every failed parse returns exactly one `DockerfileError` and no commands.
//! The error carries:
//! - Error kind (I/O or parse; config for bad parser settings)
//! - Human-readable message
//! - Optional context hinting at the expected syntax
//! - Optional 1-based physical line number of the offending construct

use std::fmt;

/// Categorized error types for callers that branch on the failure
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// The source could not be opened or read
    Io,
    /// Syntax error in the Dockerfile text
    Parse,
    /// Invalid parser configuration
    Config,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            ErrorKind::Io => write!(f, "IO error"),
            ErrorKind::Parse => write!(f, "Parse error"),
            ErrorKind::Config => write!(f, "Config error"),
        }
    }
}

/// Rich error type with context information
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DockerfileError {
    pub kind: ErrorKind,
    pub message: String,
    /// Additional context explaining what was expected
    pub context: Option<String>,
    /// 1-based physical line where the error occurred
    pub line: Option<usize>,
}

impl DockerfileError {
    /// Create a new error with just the kind and message
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        DockerfileError {
            kind,
            message: message.into(),
            context: None,
            line: None,
        }
    }

    pub fn io(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Io, message)
    }

    pub fn parse(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Parse, message)
    }

    pub fn config(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Config, message)
    }

    /// Add context string (e.g., "Expected: name=value")
    pub fn with_context(mut self, context: impl Into<String>) -> Self {
        self.context = Some(context.into());
        self
    }

    /// Attach the physical line number, keeping one already set by a deeper stage
    pub fn with_line(mut self, line: usize) -> Self {
        if self.line.is_none() {
            self.line = Some(line);
        }
        self
    }

    pub fn is_io(&self) -> bool {
        self.kind == ErrorKind::Io
    }

    pub fn is_parse(&self) -> bool {
        self.kind == ErrorKind::Parse
    }

    /// Format error with the offending source line and a gutter
    pub fn display_with_input(&self, input: &str) -> String {
        let mut msg = self.display_simple();

        if let Some(number) = self.line {
            if let Some(text) = input.lines().nth(number.saturating_sub(1)) {
                let gutter = number.to_string();
                msg.push_str(&format!("\n  {} | {}", gutter, text.trim_end_matches('\r')));
                msg.push_str(&format!("\n  {} | {}", " ".repeat(gutter.len()), "^"));
            } else {
                msg.push_str(&format!("\n  at line {} (end of input)", number));
            }
        }

        msg
    }

    /// Simplified display without input context
    pub fn display_simple(&self) -> String {
        let mut msg = match self.line {
            Some(line) => format!("{} on line {}: {}", self.kind, line, self.message),
            None => format!("{}: {}", self.kind, self.message),
        };
        if let Some(context) = &self.context {
            msg.push_str(&format!("\n  hint: {}", context));
        }
        msg
    }
}

impl fmt::Display for DockerfileError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.display_simple())
    }
}

impl std::error::Error for DockerfileError {}

/// Convenience type alias for Results with DockerfileError
pub type DockerfileResult<T> = Result<T, DockerfileError>;
