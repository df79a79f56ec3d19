//! Physical and logical line handling.
//!
//! Physical lines keep byte offsets into the source so `original` and heredoc
//! bodies can be sliced back out verbatim. Logical lines join escape-char
//! continuations and drop blank and comment lines found inside them.
use log::warn;

#[derive(Debug, Clone, Copy)]
pub(crate) struct PhysicalLine<'a> {
    /// 1-based line number.
    pub number: usize,
    /// Line text without its terminator (`\n` or `\r\n`).
    pub text: &'a str,
    /// Byte offset of the first character.
    pub start: usize,
    /// Byte offset just past `text`.
    pub end: usize,
    /// Byte offset of the following line (past the terminator).
    pub next: usize,
}

pub(crate) fn split_physical_lines(source: &str) -> Vec<PhysicalLine<'_>> {
    let mut lines = Vec::new();
    let mut start = 0;
    for (idx, raw) in source.split_inclusive('\n').enumerate() {
        let without_lf = raw.strip_suffix('\n').unwrap_or(raw);
        let text = without_lf.strip_suffix('\r').unwrap_or(without_lf);
        lines.push(PhysicalLine {
            number: idx + 1,
            text,
            start,
            end: start + text.len(),
            next: start + raw.len(),
        });
        start += raw.len();
    }
    lines
}

pub(crate) fn is_blank(text: &str) -> bool {
    text.trim().is_empty()
}

pub(crate) fn is_comment(text: &str) -> bool {
    text.trim_start().starts_with('#')
}

/// Returns the line without its continuation escape when it ends with an
/// unescaped one (trailing spaces and tabs allowed after it).
pub(crate) fn strip_continuation(text: &str, escape: char) -> Option<&str> {
    let trimmed = text.trim_end_matches([' ', '\t']);
    let trailing = trimmed.chars().rev().take_while(|ch| *ch == escape).count();
    if trailing % 2 == 1 {
        Some(&trimmed[..trimmed.len() - escape.len_utf8()])
    } else {
        None
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct LogicalLine {
    /// Joined instruction text, continuations resolved.
    pub text: String,
    pub start_line: usize,
    pub end_line: usize,
    /// Index of the first physical line.
    pub first: usize,
    /// Index of the last physical line that contributed text.
    pub last: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct HeredocBody {
    pub content: String,
    /// Index of the physical terminator line.
    pub terminator: usize,
}

pub(crate) struct LineReader<'a> {
    source: &'a str,
    lines: Vec<PhysicalLine<'a>>,
    pos: usize,
    escape: char,
}

impl<'a> LineReader<'a> {
    pub fn new(source: &'a str, lines: Vec<PhysicalLine<'a>>, escape: char) -> Self {
        Self {
            source,
            lines,
            pos: 0,
            escape,
        }
    }

    /// Assemble the next logical line, skipping leading blanks and comments.
    ///
    /// `opens_heredoc` sees the text joined so far after each continued piece;
    /// returning true ends the logical line on that physical line.
    pub fn next_logical_line<F>(&mut self, opens_heredoc: F) -> Option<LogicalLine>
    where
        F: Fn(&str) -> bool,
    {
        while let Some(line) = self.lines.get(self.pos) {
            if !is_blank(line.text) && !is_comment(line.text) {
                break;
            }
            self.pos += 1;
        }
        let first = self.pos;
        if first >= self.lines.len() {
            return None;
        }

        let mut text = String::new();
        let mut last = first;
        while let Some(line) = self.lines.get(self.pos) {
            let index = self.pos;
            self.pos += 1;
            if index != first {
                if is_comment(line.text) {
                    continue;
                }
                if is_blank(line.text) {
                    warn!("parse event=empty-continuation line={}", line.number);
                    continue;
                }
            }
            last = index;
            match strip_continuation(line.text, self.escape) {
                Some(head) => {
                    // Start one char early so a `<<` split across pieces is seen.
                    let scan_from = text.char_indices().next_back().map_or(0, |(idx, _)| idx);
                    text.push_str(head);
                    if text[scan_from..].contains("<<") && opens_heredoc(&text) {
                        break;
                    }
                }
                None => {
                    text.push_str(line.text);
                    break;
                }
            }
        }

        Some(LogicalLine {
            text,
            start_line: self.lines[first].number,
            end_line: self.lines[last].number,
            first,
            last,
        })
    }

    /// Consume raw lines up to and including the terminator for `name`.
    pub fn read_heredoc_body(&mut self, name: &str) -> Option<HeredocBody> {
        let body_start = self.lines.get(self.pos)?.start;
        while let Some(line) = self.lines.get(self.pos) {
            let index = self.pos;
            self.pos += 1;
            if line.text.trim() == name {
                return Some(HeredocBody {
                    content: self.source[body_start..line.start].to_string(),
                    terminator: index,
                });
            }
        }
        None
    }

    /// Exact source text for physical lines `first..=last`.
    pub fn original(&self, first: usize, last: usize, through_newline: bool) -> &'a str {
        let start = self.lines[first].start;
        let end = if through_newline {
            self.lines[last].next
        } else {
            self.lines[last].end
        };
        &self.source[start..end]
    }

    pub fn line_number(&self, index: usize) -> usize {
        self.lines[index].number
    }

    pub fn escape(&self) -> char {
        self.escape
    }
}
