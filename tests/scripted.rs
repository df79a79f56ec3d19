use std::io::Write;
use std::path::Path;
use std::process::{Command, Stdio};
use tempfile::TempDir;

fn run_cli(args: &[&str], stdin: &str) -> (String, String, i32) {
    let mut child = Command::new(env!("CARGO_BIN_EXE_dockerfile_parse"))
        .args(args)
        .env_remove("DOCKERFILE_ESCAPE")
        .env_remove("DOCKERFILE_HEREDOCS")
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .expect("spawn parser");
    {
        let input = child.stdin.as_mut().expect("stdin");
        input.write_all(stdin.as_bytes()).expect("write");
    }
    let output = child.wait_with_output().expect("wait");
    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();
    let code = output.status.code().unwrap_or(1);
    (stdout, stderr, code)
}

fn write_dockerfile(dir: &Path, name: &str, text: &str) -> String {
    let path = dir.join(name);
    std::fs::write(&path, text).expect("write dockerfile");
    path.display().to_string()
}

#[test]
fn list_prints_keywords() {
    let (out, err, code) = run_cli(&["--list"], "");
    assert!(err.is_empty(), "stderr: {err}");
    assert_eq!(code, 0);
    let lines: Vec<_> = out.lines().collect();
    assert_eq!(lines.len(), 18);
    assert_eq!(&lines[..3], &["add", "arg", "cmd"]);
}

#[test]
fn text_output_for_file() {
    let dir = TempDir::new().expect("tempdir");
    let path = write_dockerfile(
        dir.path(),
        "Dockerfile",
        "FROM alpine\nCOPY --chown=app a b\n",
    );
    let (out, err, code) = run_cli(&[&path], "");
    assert!(err.is_empty(), "stderr: {err}");
    assert_eq!(code, 0);
    let lines: Vec<_> = out.lines().collect();
    assert_eq!(lines[0], "1-1 from [\"alpine\"]");
    assert_eq!(lines[1], "2-2 copy flags=[\"--chown=app\"] [\"a\", \"b\"]");
}

#[test]
fn json_output_from_stdin() {
    let (out, err, code) = run_cli(&["--json", "-"], "CMD [\"echo\", \"hi\"]\n");
    assert!(err.is_empty(), "stderr: {err}");
    assert_eq!(code, 0);
    let value: serde_json::Value = serde_json::from_str(out.trim()).expect("json line");
    assert_eq!(value["cmd"], "cmd");
    assert_eq!(value["json"], true);
    assert_eq!(value["value"][1], "hi");
    assert_eq!(value["start_line"], 1);
}

#[test]
fn parse_error_exits_non_zero() {
    let (out, err, code) = run_cli(&[], "FROM x\nCMD [\"echo\", 1]\n");
    assert!(out.is_empty());
    assert_ne!(code, 0);
    assert!(err.contains("Parse error"), "stderr: {err}");
    assert!(err.contains("2 | CMD"), "stderr: {err}");
}

#[test]
fn missing_file_reports_path() {
    let dir = TempDir::new().expect("tempdir");
    let missing = dir.path().join("Dockerfile.dne");
    let (_, err, code) = run_cli(&[&missing.display().to_string()], "");
    assert_ne!(code, 0);
    assert!(err.contains("Dockerfile.dne"), "stderr: {err}");
}

#[test]
fn escape_option_changes_continuation() {
    let (out, err, code) = run_cli(&["--escape=`"], "RUN echo a `\n  b\n");
    assert!(err.is_empty(), "stderr: {err}");
    assert_eq!(code, 0);
    assert!(out.starts_with("1-2 run"), "stdout: {out}");
}

#[test]
fn no_heredocs_option() {
    let (out, _, code) = run_cli(&["--no-heredocs"], "RUN cat <<EOF\n");
    assert_eq!(code, 0);
    assert_eq!(out.trim(), "1-1 run [\"cat <<EOF\"]");
}

#[test]
fn unknown_option_is_rejected() {
    let (_, err, code) = run_cli(&["--bogus"], "");
    assert_eq!(code, 2);
    assert!(err.contains("unknown option"));
}
