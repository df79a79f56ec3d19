use std::env;

use crate::error::{DockerfileError, DockerfileResult, ErrorKind};

pub const DEFAULT_ESCAPE: char = '\\';

/// Settings for one parser. Leading directives in a source override `escape`
/// for that parse only.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParserConfig {
    pub escape: char,
    /// Recognize `<<NAME` bodies on RUN, COPY and ADD.
    pub heredocs: bool,
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self {
            escape: DEFAULT_ESCAPE,
            heredocs: true,
        }
    }
}

impl ParserConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_escape(mut self, escape: &str) -> DockerfileResult<Self> {
        self.escape = validate_escape(escape).map_err(|mut err| {
            err.kind = ErrorKind::Config;
            err
        })?;
        Ok(self)
    }

    pub fn with_heredocs(mut self, enabled: bool) -> Self {
        self.heredocs = enabled;
        self
    }

    /// Defaults overridden by `DOCKERFILE_ESCAPE` and `DOCKERFILE_HEREDOCS`.
    pub fn from_env() -> DockerfileResult<Self> {
        let mut config = Self::default();
        if let Ok(value) = env::var("DOCKERFILE_ESCAPE") {
            config = config.with_escape(&value)?;
        }
        if let Ok(value) = env::var("DOCKERFILE_HEREDOCS") {
            config.heredocs = parse_bool_value(&value)?;
        }
        Ok(config)
    }
}

pub fn parse_bool_value(value: &str) -> DockerfileResult<bool> {
    let value = value.trim();
    match value.to_ascii_lowercase().as_str() {
        "1" | "yes" | "true" | "on" => Ok(true),
        "0" | "no" | "false" | "off" => Ok(false),
        _ => Err(
            DockerfileError::config(format!("Invalid boolean value: {}", value))
                .with_context("Valid values: 1/yes/true/on, 0/no/false/off"),
        ),
    }
}

/// The escape must be a single `\` or backtick.
pub(crate) fn validate_escape(value: &str) -> DockerfileResult<char> {
    match value.trim() {
        "\\" => Ok('\\'),
        "`" => Ok('`'),
        other => Err(DockerfileError::parse(format!(
            "invalid escape token '{}' does not match ` or \\",
            other
        ))),
    }
}
