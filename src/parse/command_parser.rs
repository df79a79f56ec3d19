use log::debug;

use crate::config::ParserConfig;
use crate::error::DockerfileResult;
use crate::heredoc::fill_heredocs;
use crate::parse::argument_parser::resolve;
use crate::parse::directives::parse_directives;
use crate::parse::heredoc_parser::{find_markers, opens_heredoc};
use crate::parse::line_reader::{split_physical_lines, LineReader, LogicalLine};
use crate::parse::tokenizer::parse_header;
use crate::parse::{Command, Dockerfile};

/// Parse a whole source. Fails on the first error; no partial result.
pub fn parse_source(source: &str, config: &ParserConfig) -> DockerfileResult<Dockerfile> {
    let source = source.strip_prefix('\u{feff}').unwrap_or(source);
    let lines = split_physical_lines(source);
    let directives = parse_directives(&lines, config.escape)?;
    let escape = directives.escape;
    let heredocs = config.heredocs;
    let mut reader = LineReader::new(source, lines, escape);
    let mut commands = Vec::new();

    while let Some(line) =
        reader.next_logical_line(|text| heredocs && opens_heredoc(text, escape))
    {
        let command = build_command(&mut reader, line, heredocs)?;
        debug!(
            "parse event=command cmd={} sub={} start={} end={} heredocs={}",
            command.cmd,
            command.sub_cmd.map_or("-", |sub| sub.as_str()),
            command.start_line,
            command.end_line,
            command.heredocs.len()
        );
        commands.push(command);
    }

    Ok(Dockerfile {
        directives,
        commands,
    })
}

fn build_command(
    reader: &mut LineReader<'_>,
    line: LogicalLine,
    heredocs_enabled: bool,
) -> DockerfileResult<Command> {
    let escape = reader.escape();
    let header =
        parse_header(&line.text, escape).map_err(|err| err.with_line(line.start_line))?;
    let effective = header.effective();
    let args =
        resolve(effective, header.rest, escape).map_err(|err| err.with_line(line.start_line))?;

    let markers = if heredocs_enabled && effective.supports_heredocs() && !args.json {
        find_markers(header.rest, escape).map_err(|err| err.with_line(line.end_line))?
    } else {
        Vec::new()
    };
    let filled = fill_heredocs(reader, markers, line.end_line)?;
    let last = filled.last_line.unwrap_or(line.last);
    let has_heredocs = !filled.heredocs.is_empty();

    Ok(Command {
        cmd: header.cmd,
        sub_cmd: header.sub_cmd,
        json: args.json,
        flags: header.flags,
        value: args.value,
        start_line: line.start_line,
        end_line: reader.line_number(last),
        original: reader.original(line.first, last, has_heredocs).to_string(),
        heredocs: filled.heredocs,
    })
}
