//! Tokenizer for instruction lines.
//!
//! Uses Normal/Single/Double modes so whitespace inside quotes never splits a
//! word. Words are returned as raw slices of the input: quotes and escape
//! characters stay exactly as written.
use crate::error::{DockerfileError, DockerfileResult};
use crate::parse::Instruction;

#[derive(Copy, Clone, Eq, PartialEq)]
enum ParseMode {
    Normal,
    Single,
    Double,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Word<'a> {
    pub raw: &'a str,
    /// Byte offset just past the word.
    pub end: usize,
    /// Set when input ended inside a quote.
    pub unterminated: Option<char>,
}

/// Iterator over the quote-aware words of one line.
pub(crate) struct WordScanner<'a> {
    input: &'a str,
    pos: usize,
    escape: char,
}

impl<'a> WordScanner<'a> {
    pub fn new(input: &'a str, escape: char) -> Self {
        Self {
            input,
            pos: 0,
            escape,
        }
    }
}

impl<'a> Iterator for WordScanner<'a> {
    type Item = Word<'a>;

    fn next(&mut self) -> Option<Word<'a>> {
        let rest = &self.input[self.pos..];
        let skipped = rest.len() - rest.trim_start().len();
        let start = self.pos + skipped;
        if start >= self.input.len() {
            self.pos = self.input.len();
            return None;
        }

        let mut mode = ParseMode::Normal;
        let mut end = self.input.len();
        let mut chars = self.input[start..].char_indices();
        while let Some((offset, ch)) = chars.next() {
            match mode {
                ParseMode::Normal => {
                    if ch.is_whitespace() {
                        end = start + offset;
                        break;
                    }
                    if ch == self.escape {
                        chars.next();
                    } else if ch == '\'' {
                        mode = ParseMode::Single;
                    } else if ch == '"' {
                        mode = ParseMode::Double;
                    }
                }
                ParseMode::Single => {
                    if ch == '\'' {
                        mode = ParseMode::Normal;
                    }
                }
                ParseMode::Double => {
                    if ch == self.escape {
                        chars.next();
                    } else if ch == '"' {
                        mode = ParseMode::Normal;
                    }
                }
            }
        }

        self.pos = end;
        let unterminated = match mode {
            ParseMode::Normal => None,
            ParseMode::Single => Some('\''),
            ParseMode::Double => Some('"'),
        };
        Some(Word {
            raw: &self.input[start..end],
            end,
            unterminated,
        })
    }
}

/// Split into words, failing on an unterminated quote.
pub(crate) fn split_words(input: &str, escape: char) -> DockerfileResult<Vec<String>> {
    let mut words = Vec::new();
    for word in WordScanner::new(input, escape) {
        if let Some(quote) = word.unterminated {
            return Err(DockerfileError::parse(format!("Unterminated {} quote", quote))
                .with_context(format!("in argument {}", word.raw)));
        }
        words.push(word.raw.to_string());
    }
    Ok(words)
}

/// Split into words, taking an unterminated quote to the end of input.
pub(crate) fn split_words_lenient(input: &str, escape: char) -> Vec<&str> {
    WordScanner::new(input, escape).map(|word| word.raw).collect()
}

/// Split a string into the first whitespace-delimited word and the rest.
pub(crate) fn split_first_word(s: &str) -> (&str, &str) {
    let s = s.trim_start();
    match s.find(char::is_whitespace) {
        Some(pos) => (&s[..pos], s[pos..].trim_start()),
        None => (s, ""),
    }
}

/// Collect leading `--name[=value]` words; a bare `--` ends the list.
pub(crate) fn extract_flags(input: &str, escape: char) -> DockerfileResult<(Vec<String>, &str)> {
    let mut flags = Vec::new();
    let mut consumed = 0;
    for word in WordScanner::new(input, escape) {
        if !word.raw.starts_with("--") {
            break;
        }
        consumed = word.end;
        if word.raw == "--" {
            break;
        }
        if word.unterminated.is_some() {
            return Err(DockerfileError::parse(format!("Unterminated quote in flag {}", word.raw)));
        }
        validate_flag(word.raw)?;
        flags.push(word.raw.to_string());
    }
    Ok((flags, input[consumed..].trim_start()))
}

fn validate_flag(raw: &str) -> DockerfileResult<()> {
    let body = &raw[2..];
    let name = body.split_once('=').map_or(body, |(name, _)| name);
    let valid = !name.is_empty()
        && name
            .chars()
            .all(|ch| ch.is_ascii_alphanumeric() || ch == '-' || ch == '_');
    if valid {
        Ok(())
    } else {
        Err(DockerfileError::parse(format!("malformed flag: {}", raw))
            .with_context("Expected: --name or --name=value"))
    }
}

/// Keyword, optional wrapped keyword, flags and argument remainder of one line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct InstructionHeader<'a> {
    pub cmd: Instruction,
    pub sub_cmd: Option<Instruction>,
    pub flags: Vec<String>,
    pub rest: &'a str,
}

impl InstructionHeader<'_> {
    /// The instruction whose arguments `rest` holds.
    pub fn effective(&self) -> Instruction {
        self.sub_cmd.unwrap_or(self.cmd)
    }
}

fn lookup(word: &str) -> DockerfileResult<Instruction> {
    Instruction::from_keyword(word)
        .ok_or_else(|| DockerfileError::parse(format!("unknown instruction: {}", word)))
}

pub(crate) fn parse_header(text: &str, escape: char) -> DockerfileResult<InstructionHeader<'_>> {
    let (keyword, rest) = split_first_word(text);
    let cmd = lookup(keyword)?;
    let (mut flags, rest) = extract_flags(rest, escape)?;
    if cmd != Instruction::Onbuild {
        return Ok(InstructionHeader {
            cmd,
            sub_cmd: None,
            flags,
            rest: rest.trim_end(),
        });
    }

    let (sub_keyword, sub_rest) = split_first_word(rest);
    if sub_keyword.is_empty() {
        return Err(DockerfileError::parse("ONBUILD requires an instruction to wrap")
            .with_context("Expected: ONBUILD <INSTRUCTION> ..."));
    }
    let sub_cmd = lookup(sub_keyword)?;
    if sub_cmd == Instruction::Onbuild {
        return Err(DockerfileError::parse(
            "Chaining ONBUILD via `ONBUILD ONBUILD` isn't allowed",
        ));
    }
    let (sub_flags, sub_rest) = extract_flags(sub_rest, escape)?;
    flags.extend(sub_flags);
    Ok(InstructionHeader {
        cmd,
        sub_cmd: Some(sub_cmd),
        flags,
        rest: sub_rest.trim_end(),
    })
}
