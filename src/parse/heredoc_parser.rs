//! Heredoc marker detection.
//!
//! A marker is a whole word of the form `[fd]<<[-]NAME`, where NAME is a bare
//! identifier or a single/double quoted one. `<<<word` is a here-string and
//! is left alone. Bodies are consumed later by `crate::heredoc`.
use crate::error::{DockerfileError, DockerfileResult};
use crate::parse::argument_parser::is_json_form;
use crate::parse::tokenizer::{parse_header, split_words_lenient};

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct HeredocMarker {
    pub name: String,
    pub file_descriptor: u32,
    /// `<<-` form.
    pub chomp: bool,
    /// Unquoted name: the body is subject to expansion downstream.
    pub expand: bool,
}

/// Markers in declaration order, left to right.
pub(crate) fn find_markers(rest: &str, escape: char) -> DockerfileResult<Vec<HeredocMarker>> {
    let mut markers = Vec::new();
    for word in split_words_lenient(rest, escape) {
        if let Some(marker) = parse_marker(word)? {
            markers.push(marker);
        }
    }
    Ok(markers)
}

/// True when `text` is a heredoc-capable shell-form instruction with at least one marker.
pub(crate) fn opens_heredoc(text: &str, escape: char) -> bool {
    let Ok(header) = parse_header(text, escape) else {
        return false;
    };
    if !header.effective().supports_heredocs() || is_json_form(header.rest) {
        return false;
    }
    find_markers(header.rest, escape)
        .map(|markers| !markers.is_empty())
        .unwrap_or(false)
}

fn parse_marker(word: &str) -> DockerfileResult<Option<HeredocMarker>> {
    let Some(pos) = word.find("<<") else {
        return Ok(None);
    };
    let prefix = &word[..pos];
    if !prefix.chars().all(|ch| ch.is_ascii_digit()) {
        return Ok(None);
    }
    let after = &word[pos + 2..];
    if after.starts_with('<') {
        return Ok(None);
    }
    let (chomp, spec) = match after.strip_prefix('-') {
        Some(spec) => (true, spec),
        None => (false, after),
    };
    let Some((name, expand)) = parse_name(spec) else {
        return Ok(None);
    };
    let file_descriptor = if prefix.is_empty() {
        0
    } else {
        prefix.parse::<u32>().map_err(|_| {
            DockerfileError::parse(format!("invalid file descriptor in heredoc {}", word))
        })?
    };
    Ok(Some(HeredocMarker {
        name: name.to_string(),
        file_descriptor,
        chomp,
        expand,
    }))
}

fn parse_name(spec: &str) -> Option<(&str, bool)> {
    for quote in ['\'', '"'] {
        if let Some(inner) = spec.strip_prefix(quote) {
            let name = inner.strip_suffix(quote)?;
            if name.is_empty() || name.contains(quote) || name.contains(char::is_whitespace) {
                return None;
            }
            return Some((name, false));
        }
    }
    let bare = !spec.is_empty()
        && spec
            .chars()
            .all(|ch| ch.is_ascii_alphanumeric() || ch == '_');
    bare.then_some((spec, true))
}
