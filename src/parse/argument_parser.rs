//! Exec-form vs shell-form resolution.
//!
//! A remainder starting with `[` must be a JSON array of strings. Everything
//! else is split according to the instruction's argument shape.
use serde_json::Value;

use crate::error::{DockerfileError, DockerfileResult};
use crate::parse::tokenizer::{split_first_word, split_words};
use crate::parse::Instruction;

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub(crate) enum ArgumentForm {
    /// JSON array, else the whole remainder as one shell string.
    MaybeJson,
    /// JSON array, else quote-aware words.
    MaybeJsonList,
    /// Quote-aware words.
    Words,
    /// `name=value` pairs, or the legacy `name rest-of-line` pair.
    NameValue,
    /// The whole remainder as one string.
    Single,
    /// Probe type word followed by a `MaybeJson` command.
    Healthcheck,
}

pub(crate) fn form_of(instruction: Instruction) -> ArgumentForm {
    match instruction {
        Instruction::Run | Instruction::Cmd | Instruction::Entrypoint | Instruction::Shell => {
            ArgumentForm::MaybeJson
        }
        Instruction::Add | Instruction::Copy | Instruction::Volume => ArgumentForm::MaybeJsonList,
        Instruction::Expose | Instruction::Arg => ArgumentForm::Words,
        Instruction::Env | Instruction::Label => ArgumentForm::NameValue,
        Instruction::Healthcheck => ArgumentForm::Healthcheck,
        // ONBUILD resolves through its wrapped instruction before reaching here.
        Instruction::From
        | Instruction::Maintainer
        | Instruction::StopSignal
        | Instruction::User
        | Instruction::Workdir
        | Instruction::Onbuild => ArgumentForm::Single,
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Arguments {
    pub json: bool,
    pub value: Vec<String>,
}

impl Arguments {
    fn shell(value: Vec<String>) -> Self {
        Self { json: false, value }
    }
}

pub(crate) fn resolve(
    instruction: Instruction,
    rest: &str,
    escape: char,
) -> DockerfileResult<Arguments> {
    match form_of(instruction) {
        ArgumentForm::MaybeJson => maybe_json(rest),
        ArgumentForm::MaybeJsonList => {
            if is_json_form(rest) {
                parse_json_array(rest).map(|value| Arguments { json: true, value })
            } else {
                split_words(rest, escape).map(Arguments::shell)
            }
        }
        ArgumentForm::Words => split_words(rest, escape).map(Arguments::shell),
        ArgumentForm::NameValue => {
            parse_name_values(instruction, rest, escape).map(Arguments::shell)
        }
        ArgumentForm::Single => Ok(Arguments::shell(single(rest))),
        ArgumentForm::Healthcheck => {
            let (probe, command) = split_first_word(rest);
            if probe.is_empty() {
                return Ok(Arguments::shell(Vec::new()));
            }
            let mut args = maybe_json(command)?;
            args.value.insert(0, probe.to_string());
            Ok(args)
        }
    }
}

pub(crate) fn is_json_form(rest: &str) -> bool {
    rest.trim_start().starts_with('[')
}

fn maybe_json(rest: &str) -> DockerfileResult<Arguments> {
    if is_json_form(rest) {
        let value = parse_json_array(rest)?;
        Ok(Arguments { json: true, value })
    } else {
        Ok(Arguments::shell(single(rest)))
    }
}

fn single(rest: &str) -> Vec<String> {
    let rest = rest.trim();
    if rest.is_empty() {
        Vec::new()
    } else {
        vec![rest.to_string()]
    }
}

/// Parse a JSON array string like `["a", "b"]`; every element must be a string.
fn parse_json_array(s: &str) -> DockerfileResult<Vec<String>> {
    let parsed: Value = serde_json::from_str(s.trim()).map_err(|e| {
        DockerfileError::parse(format!("Invalid JSON array '{}': {}", s.trim(), e))
    })?;
    let Value::Array(items) = parsed else {
        return Err(DockerfileError::parse(format!(
            "Invalid JSON array '{}': not an array",
            s.trim()
        )));
    };
    items
        .into_iter()
        .enumerate()
        .map(|(idx, item)| match item {
            Value::String(text) => Ok(text),
            other => Err(DockerfileError::parse(format!(
                "Invalid JSON array '{}': element {} is {}, expected a string",
                s.trim(),
                idx,
                json_kind(&other)
            ))
            .with_context("Exec form must be a JSON array of strings")),
        })
        .collect()
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

fn parse_name_values(
    instruction: Instruction,
    rest: &str,
    escape: char,
) -> DockerfileResult<Vec<String>> {
    let words = split_words(rest, escape)?;
    let Some(first) = words.first() else {
        return Ok(Vec::new());
    };

    // Legacy form: ENV KEY VALUE
    if !first.contains('=') {
        let (key, value) = split_first_word(rest);
        return Ok(vec![key.to_string(), value.trim_end().to_string()]);
    }

    let mut pairs = Vec::with_capacity(words.len() * 2);
    for word in &words {
        let Some((key, value)) = word.split_once('=') else {
            return Err(DockerfileError::parse(format!(
                "Syntax error - can't find = in \"{}\". Must be of the form: name=value",
                word
            ))
            .with_context(format!(
                "{} takes either one legacy pair or name=value pairs",
                instruction.as_str().to_uppercase()
            )));
        };
        if key.is_empty() {
            return Err(DockerfileError::parse(format!(
                "{} names can not be blank",
                instruction.as_str().to_uppercase()
            )));
        }
        pairs.push(key.to_string());
        pairs.push(value.to_string());
    }
    Ok(pairs)
}
