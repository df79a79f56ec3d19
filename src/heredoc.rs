use log::debug;

use crate::error::{DockerfileError, DockerfileResult};
use crate::parse::line_reader::LineReader;
use crate::parse::{Heredoc, HeredocMarker};

pub(crate) struct FilledHeredocs {
    pub heredocs: Vec<Heredoc>,
    /// Index of the last terminator line consumed, if any.
    pub last_line: Option<usize>,
}

/// Read one body per marker, in declaration order, each starting where the
/// previous terminator ended. `opened_on` is the marker line for errors.
pub(crate) fn fill_heredocs(
    reader: &mut LineReader<'_>,
    markers: Vec<HeredocMarker>,
    opened_on: usize,
) -> DockerfileResult<FilledHeredocs> {
    let mut heredocs = Vec::with_capacity(markers.len());
    let mut last_line = None;
    for marker in markers {
        let body = reader.read_heredoc_body(&marker.name).ok_or_else(|| {
            DockerfileError::parse(format!("unterminated heredoc <<{}", marker.name))
                .with_context(format!("Expected a line containing only {}", marker.name))
                .with_line(opened_on)
        })?;
        debug!(
            "heredoc event=body name={} fd={} bytes={} terminator={}",
            marker.name,
            marker.file_descriptor,
            body.content.len(),
            reader.line_number(body.terminator)
        );
        last_line = Some(body.terminator);
        heredocs.push(Heredoc {
            name: marker.name,
            content: body.content,
            file_descriptor: marker.file_descriptor,
            expand: marker.expand,
            chomp: marker.chomp,
        });
    }
    Ok(FilledHeredocs {
        heredocs,
        last_line,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parse::line_reader::split_physical_lines;

    fn marker(name: &str) -> HeredocMarker {
        HeredocMarker {
            name: name.to_string(),
            file_descriptor: 0,
            chomp: false,
            expand: true,
        }
    }

    #[test]
    fn fills_bodies_in_order() {
        let source = "COPY <<A <<B /dst\none\nA\ntwo\nthree\nB\nRUN x\n";
        let mut reader = LineReader::new(source, split_physical_lines(source), '\\');
        reader.next_logical_line(|_| false).unwrap();
        let filled = fill_heredocs(&mut reader, vec![marker("A"), marker("B")], 1).unwrap();
        assert_eq!(filled.heredocs.len(), 2);
        assert_eq!(filled.heredocs[0].content, "one\n");
        assert_eq!(filled.heredocs[1].content, "two\nthree\n");
        assert_eq!(filled.last_line, Some(5));
        let next = reader.next_logical_line(|_| false).unwrap();
        assert_eq!(next.text, "RUN x");
    }

    #[test]
    fn missing_terminator_cites_marker_line() {
        let source = "FROM a\nRUN <<EOF\nbody\n";
        let mut reader = LineReader::new(source, split_physical_lines(source), '\\');
        reader.next_logical_line(|_| false).unwrap();
        reader.next_logical_line(|_| false).unwrap();
        let err = match fill_heredocs(&mut reader, vec![marker("EOF")], 2) {
            Ok(_) => panic!("expected unterminated heredoc"),
            Err(err) => err,
        };
        assert!(err.is_parse());
        assert_eq!(err.line, Some(2));
        assert_eq!(err.message, "unterminated heredoc <<EOF");
    }

    #[test]
    fn no_markers_consumes_nothing() {
        let source = "RUN x\nRUN y\n";
        let mut reader = LineReader::new(source, split_physical_lines(source), '\\');
        reader.next_logical_line(|_| false).unwrap();
        let filled = fill_heredocs(&mut reader, Vec::new(), 1).unwrap();
        assert!(filled.heredocs.is_empty());
        assert_eq!(filled.last_line, None);
        assert_eq!(reader.next_logical_line(|_| false).unwrap().text, "RUN y");
    }
}
