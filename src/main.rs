use std::env;
use std::io::{self, Write};
use std::path::Path;
use std::process::ExitCode;

use log::debug;

use dockerfile_parse::{
    all_cmds, parse_bool_value, read_source, read_stdin, Command, DockerfileResult, Parser,
    ParserConfig,
};

struct Options {
    json: bool,
    list: bool,
    config: ParserConfig,
    inputs: Vec<String>,
}

fn main() -> ExitCode {
    init_logging();
    let options = match parse_args(env::args().skip(1)) {
        Ok(options) => options,
        Err(err) => {
            eprintln!("error: {err}");
            return ExitCode::from(2);
        }
    };

    let stdout = io::stdout();
    let mut out = stdout.lock();
    if options.list {
        for name in all_cmds() {
            let _ = writeln!(out, "{name}");
        }
        return ExitCode::SUCCESS;
    }

    let parser = Parser::new(options.config.clone());
    let inputs = if options.inputs.is_empty() {
        vec!["-".to_string()]
    } else {
        options.inputs.clone()
    };
    let show_name = inputs.len() > 1;
    let mut failed = false;

    for input in &inputs {
        let source = match load(input) {
            Ok(source) => source,
            Err(err) => {
                eprintln!("error: {}", err.display_simple());
                failed = true;
                continue;
            }
        };
        match parser.parse(&source) {
            Ok(dockerfile) => {
                debug!(
                    "cli event=parsed input={} commands={}",
                    input,
                    dockerfile.commands.len()
                );
                for command in &dockerfile.commands {
                    let line = if options.json {
                        match serde_json::to_string(command) {
                            Ok(line) => line,
                            Err(err) => {
                                eprintln!("error: {err}");
                                failed = true;
                                continue;
                            }
                        }
                    } else {
                        render_text(command)
                    };
                    let _ = if show_name {
                        writeln!(out, "{input}: {line}")
                    } else {
                        writeln!(out, "{line}")
                    };
                }
            }
            Err(err) => {
                eprintln!("{input}: {}", err.display_with_input(&source));
                failed = true;
            }
        }
    }

    if failed {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}

fn init_logging() {
    let env = env_logger::Env::default().filter_or("DOCKERFILE_PARSE_LOG", "info");
    let _ = env_logger::Builder::from_env(env)
        .format_timestamp_millis()
        .try_init();
}

fn parse_args(args: impl Iterator<Item = String>) -> Result<Options, String> {
    let config = ParserConfig::from_env().map_err(|err| err.display_simple())?;
    let mut options = Options {
        json: false,
        list: false,
        config,
        inputs: Vec::new(),
    };
    for arg in args {
        if arg == "--json" {
            options.json = true;
        } else if arg == "--list" {
            options.list = true;
        } else if arg == "--no-heredocs" {
            options.config.heredocs = false;
        } else if let Some(value) = arg.strip_prefix("--heredocs=") {
            options.config.heredocs = parse_bool_value(value).map_err(|err| err.display_simple())?;
        } else if let Some(value) = arg.strip_prefix("--escape=") {
            options.config = options
                .config
                .with_escape(value)
                .map_err(|err| err.display_simple())?;
        } else if arg.starts_with("--") {
            return Err(format!("unknown option: {arg}"));
        } else {
            options.inputs.push(arg);
        }
    }
    Ok(options)
}

fn load(input: &str) -> DockerfileResult<String> {
    if input == "-" {
        read_stdin()
    } else {
        read_source(Path::new(input))
    }
}

fn render_text(command: &Command) -> String {
    let mut text = format!("{}-{} {}", command.start_line, command.end_line, command.cmd);
    if let Some(sub_cmd) = command.sub_cmd {
        text.push(' ');
        text.push_str(sub_cmd.as_str());
    }
    if !command.flags.is_empty() {
        text.push_str(&format!(" flags={:?}", command.flags));
    }
    if command.json {
        text.push_str(" json");
    }
    text.push_str(&format!(" {:?}", command.value));
    for heredoc in &command.heredocs {
        text.push_str(&format!(
            " <<{} ({} bytes)",
            heredoc.name,
            heredoc.content.len()
        ));
    }
    text
}
