use minicomp::config::{Options, USAGE};
use minicomp::driver;

use anyhow::Context;
use tracing::{debug, info};
use yansi::Paint;

use std::fs;
use std::io;
use std::process::ExitCode;

fn main() -> ExitCode {
    let options = match Options::from_env() {
        Ok(options) => options,
        Err(err) => {
            eprintln!("{} {:#}", "error:".red().bold(), err);
            eprintln!("{}", USAGE);
            return ExitCode::from(1);
        }
    };

    if !options.color {
        yansi::disable();
    }

    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_target(false)
        .with_ansi(options.color)
        .with_max_level(options.log_level)
        .init();

    let file = options.file_name();
    info!(input = %options.input.display(), emit = ?options.emit, "compiling");

    let source = match fs::read_to_string(&options.input)
        .with_context(|| format!("cannot open {}", options.input.display()))
    {
        Ok(source) => source,
        Err(err) => {
            eprintln!("{} {:#}", "error:".red().bold(), err);
            return ExitCode::from(1);
        }
    };

    match driver::run(&source, &file, options.emit) {
        Ok(output) => {
            print!("{}", output);
            ExitCode::SUCCESS
        }
        Err(err) => {
            debug!(code = err.code(), "compilation failed");
            if err.eprint(&file, &source, options.color).is_err() {
                eprintln!("{} {}", "error:".red().bold(), err);
            }
            ExitCode::from(1)
        }
    }
}
