//! Dockerfile parser.
//!
//! Turns Dockerfile source into an ordered list of `Command` records with
//! exact provenance (line span and original text). Handles parser
//! directives, escape-char continuations, exec (JSON) and shell forms,
//! `ONBUILD` wrapping and heredoc bodies. It does not interpret arguments.
//!
//! ```
//! let commands = dockerfile_parse::parse_string("FROM alpine\nCMD [\"echo\", \"hi\"]\n").unwrap();
//! assert_eq!(commands[1].value, vec!["echo", "hi"]);
//! assert!(commands[1].json);
//! ```

mod config;
mod error;
mod heredoc;
mod io_helpers;
mod parse;

use std::io::Read;
use std::path::Path;

pub use config::{parse_bool_value, ParserConfig, DEFAULT_ESCAPE};
pub use error::{DockerfileError, DockerfileResult, ErrorKind};
pub use io_helpers::{read_reader, read_source, read_stdin};
pub use parse::{Command, Directives, Dockerfile, Heredoc, Instruction};

/// A reusable parser; each call starts from the configured defaults.
#[derive(Debug, Clone, Default)]
pub struct Parser {
    config: ParserConfig,
}

impl Parser {
    pub fn new(config: ParserConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ParserConfig {
        &self.config
    }

    /// Parse in-memory text. Only parse failures are possible.
    pub fn parse(&self, source: &str) -> DockerfileResult<Dockerfile> {
        parse::parse_source(source, &self.config)
    }

    /// Read and parse a file. I/O failures name the path.
    pub fn parse_file(&self, path: impl AsRef<Path>) -> DockerfileResult<Dockerfile> {
        let source = read_source(path.as_ref())?;
        self.parse(&source)
    }

    pub fn parse_reader<R: Read>(&self, reader: R) -> DockerfileResult<Dockerfile> {
        let source = read_reader(reader)?;
        self.parse(&source)
    }
}

/// Parse Dockerfile text with the default configuration.
pub fn parse_string(source: &str) -> DockerfileResult<Vec<Command>> {
    Parser::default().parse(source).map(|dockerfile| dockerfile.commands)
}

/// Parse a Dockerfile on disk with the default configuration.
pub fn parse_file(path: impl AsRef<Path>) -> DockerfileResult<Vec<Command>> {
    Parser::default()
        .parse_file(path)
        .map(|dockerfile| dockerfile.commands)
}

pub fn parse_reader<R: Read>(reader: R) -> DockerfileResult<Vec<Command>> {
    Parser::default()
        .parse_reader(reader)
        .map(|dockerfile| dockerfile.commands)
}

/// Every legal instruction keyword, lowercase and sorted.
pub fn all_cmds() -> Vec<&'static str> {
    Instruction::ALL.iter().map(|instruction| instruction.as_str()).collect()
}

/// Fuzz helper for parser-only targets.
pub fn fuzz_parse_bytes(data: &[u8]) {
    let input = String::from_utf8_lossy(data);
    if let Ok(dockerfile) = Parser::default().parse(&input) {
        for command in dockerfile.commands {
            debug_assert!(command.start_line <= command.end_line);
            debug_assert!(input.contains(command.original.as_str()));
        }
    }
}
