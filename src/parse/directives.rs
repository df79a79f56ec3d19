//! Leading `# key=value` parser directives.
//!
//! Only comment lines before the first instruction are candidates; blank
//! lines and plain comments in that region are skipped.
use log::debug;
use serde::Serialize;

use crate::config::validate_escape;
use crate::error::{DockerfileError, DockerfileResult};
use crate::parse::line_reader::{is_blank, is_comment, PhysicalLine};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Directives {
    /// Escape character in effect for the rest of the source.
    pub escape: char,
    pub syntax: Option<String>,
    pub check: Option<String>,
}

impl Directives {
    pub fn new(escape: char) -> Self {
        Self {
            escape,
            syntax: None,
            check: None,
        }
    }
}

pub(crate) fn parse_directives(
    lines: &[PhysicalLine<'_>],
    default_escape: char,
) -> DockerfileResult<Directives> {
    let mut directives = Directives::new(default_escape);
    let mut seen_escape = false;

    for line in lines {
        if is_blank(line.text) {
            continue;
        }
        if !is_comment(line.text) {
            break;
        }
        let Some((key, value)) = split_directive(line.text) else {
            continue;
        };
        let slot = match key.as_str() {
            "escape" => {
                if seen_escape {
                    return Err(duplicate(&key, line.number));
                }
                seen_escape = true;
                directives.escape =
                    validate_escape(value).map_err(|err| err.with_line(line.number))?;
                debug!("parse event=directive key=escape value={}", value);
                continue;
            }
            "syntax" => &mut directives.syntax,
            "check" => &mut directives.check,
            _ => {
                debug!("parse event=directive-ignored key={} line={}", key, line.number);
                continue;
            }
        };
        if slot.is_some() {
            return Err(duplicate(&key, line.number));
        }
        debug!("parse event=directive key={} value={}", key, value);
        *slot = Some(value.to_string());
    }

    Ok(directives)
}

fn duplicate(key: &str, line: usize) -> DockerfileError {
    DockerfileError::parse(format!("only one {} parser directive can be used", key)).with_line(line)
}

/// `# key = value` with a word-like key; key is lowercased.
fn split_directive(text: &str) -> Option<(String, &str)> {
    let body = text.trim_start().strip_prefix('#')?;
    let (key, value) = body.split_once('=')?;
    let key = key.trim();
    let mut chars = key.chars();
    let first = chars.next()?;
    if !first.is_ascii_alphabetic() || !chars.all(|ch| ch.is_ascii_alphanumeric()) {
        return None;
    }
    let value = value.trim();
    if value.is_empty() {
        return None;
    }
    Some((key.to_ascii_lowercase(), value))
}
