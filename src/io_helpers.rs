use std::fs;
use std::io::{self, Read};
use std::path::Path;

use crate::error::{DockerfileError, DockerfileResult};

/// Read a whole Dockerfile into memory; failures name the path.
pub fn read_source(path: &Path) -> DockerfileResult<String> {
    let bytes = fs::read(path).map_err(|err| {
        DockerfileError::io(format!("could not read {}: {}", path.display(), err))
    })?;
    String::from_utf8(bytes).map_err(|err| {
        DockerfileError::io(format!(
            "could not read {}: not valid UTF-8 ({})",
            path.display(),
            err.utf8_error()
        ))
    })
}

pub fn read_reader<R: Read>(mut reader: R) -> DockerfileResult<String> {
    let mut bytes = Vec::new();
    reader
        .read_to_end(&mut bytes)
        .map_err(|err| DockerfileError::io(format!("could not read Dockerfile: {}", err)))?;
    String::from_utf8(bytes).map_err(|err| {
        DockerfileError::io(format!(
            "could not read Dockerfile: not valid UTF-8 ({})",
            err.utf8_error()
        ))
    })
}

pub fn read_stdin() -> DockerfileResult<String> {
    read_reader(io::stdin().lock())
}
