//! Dockerfile front end: source text in, ordered `Command` records out.
//!
//! - `line_reader` splits physical lines and assembles logical ones.
//! - `directives` reads the leading `# key=value` block.
//! - `tokenizer` splits a logical line into keyword, flags and remainder.
//! - `argument_parser` picks exec or shell form per instruction.
//! - `heredoc_parser` finds `<<NAME` markers in the remainder.
//! - `command_parser` drives the stages and assembles each record.
use std::fmt;

use serde::Serialize;

mod argument_parser;
mod command_parser;
mod directives;
mod heredoc_parser;
pub(crate) mod line_reader;
mod tokenizer;

pub use command_parser::parse_source;
pub use directives::Directives;
pub(crate) use heredoc_parser::HeredocMarker;

/// Every instruction keyword the parser accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Instruction {
    Add,
    Arg,
    Cmd,
    Copy,
    Entrypoint,
    Env,
    Expose,
    From,
    Healthcheck,
    Label,
    Maintainer,
    Onbuild,
    Run,
    Shell,
    StopSignal,
    User,
    Volume,
    Workdir,
}

impl Instruction {
    /// Sorted by keyword.
    pub const ALL: [Instruction; 18] = [
        Instruction::Add,
        Instruction::Arg,
        Instruction::Cmd,
        Instruction::Copy,
        Instruction::Entrypoint,
        Instruction::Env,
        Instruction::Expose,
        Instruction::From,
        Instruction::Healthcheck,
        Instruction::Label,
        Instruction::Maintainer,
        Instruction::Onbuild,
        Instruction::Run,
        Instruction::Shell,
        Instruction::StopSignal,
        Instruction::User,
        Instruction::Volume,
        Instruction::Workdir,
    ];

    /// Canonical lowercase keyword.
    pub fn as_str(self) -> &'static str {
        match self {
            Instruction::Add => "add",
            Instruction::Arg => "arg",
            Instruction::Cmd => "cmd",
            Instruction::Copy => "copy",
            Instruction::Entrypoint => "entrypoint",
            Instruction::Env => "env",
            Instruction::Expose => "expose",
            Instruction::From => "from",
            Instruction::Healthcheck => "healthcheck",
            Instruction::Label => "label",
            Instruction::Maintainer => "maintainer",
            Instruction::Onbuild => "onbuild",
            Instruction::Run => "run",
            Instruction::Shell => "shell",
            Instruction::StopSignal => "stopsignal",
            Instruction::User => "user",
            Instruction::Volume => "volume",
            Instruction::Workdir => "workdir",
        }
    }

    /// Case-insensitive keyword lookup.
    pub fn from_keyword(word: &str) -> Option<Instruction> {
        Instruction::ALL
            .into_iter()
            .find(|instruction| instruction.as_str().eq_ignore_ascii_case(word))
    }

    /// Instructions whose shell form may carry heredoc bodies.
    pub fn supports_heredocs(self) -> bool {
        matches!(self, Instruction::Run | Instruction::Copy | Instruction::Add)
    }
}

impl fmt::Display for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One here-document body attached to an instruction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Heredoc {
    /// Terminator as written after `<<`, quotes removed.
    pub name: String,
    /// Raw body between the marker line and the terminator line.
    pub content: String,
    pub file_descriptor: u32,
    /// False when the name was quoted, i.e. the body is taken literally.
    pub expand: bool,
    /// Set for the `<<-` form (leading tabs are meant to be stripped downstream).
    pub chomp: bool,
}

/// One recognized instruction with its exact source provenance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Command {
    pub cmd: Instruction,
    /// The wrapped instruction when `cmd` is ONBUILD.
    pub sub_cmd: Option<Instruction>,
    /// The arguments were written as a JSON array (exec form).
    pub json: bool,
    pub flags: Vec<String>,
    pub value: Vec<String>,
    pub start_line: usize,
    pub end_line: usize,
    pub original: String,
    pub heredocs: Vec<Heredoc>,
}

/// A parsed source: leading directives plus the command stream.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Dockerfile {
    pub directives: Directives,
    pub commands: Vec<Command>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keywords_are_sorted_and_lowercase() {
        let names: Vec<&str> = Instruction::ALL.iter().map(|i| i.as_str()).collect();
        let mut sorted = names.clone();
        sorted.sort_unstable();
        assert_eq!(names, sorted);
        assert!(names.iter().all(|n| n.chars().all(|c| c.is_ascii_lowercase())));
    }

    #[test]
    fn keyword_lookup_ignores_case() {
        assert_eq!(Instruction::from_keyword("FROM"), Some(Instruction::From));
        assert_eq!(Instruction::from_keyword("StopSignal"), Some(Instruction::StopSignal));
        assert_eq!(Instruction::from_keyword("onbuild"), Some(Instruction::Onbuild));
        assert_eq!(Instruction::from_keyword("FORM"), None);
        assert_eq!(Instruction::from_keyword(""), None);
    }

    #[test]
    fn serializes_as_lowercase_keyword() {
        let json = serde_json::to_string(&Instruction::StopSignal).unwrap();
        assert_eq!(json, "\"stopsignal\"");
        assert_eq!(Instruction::Healthcheck.to_string(), "healthcheck");
    }

    #[test]
    fn heredoc_capable_instructions() {
        let capable: Vec<Instruction> = Instruction::ALL
            .into_iter()
            .filter(|i| i.supports_heredocs())
            .collect();
        assert_eq!(capable, vec![Instruction::Add, Instruction::Copy, Instruction::Run]);
    }
}
