//! Command-line and environment configuration for the `minicomp` binary.

use anyhow::{Context, Result, anyhow, bail};
use tracing::Level;

use std::env;
use std::path::PathBuf;
use std::str::FromStr;

pub const USAGE: &str = "usage: minicomp [--emit=ir|ast|tokens] <source_file>";

/// Environment variable holding the log level (`error` .. `trace`).
pub const LOG_ENV: &str = "MINICOMP_LOG";

/// What the driver prints on success.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Emit {
    Tokens,
    Ast,
    #[default]
    Ir,
}

impl FromStr for Emit {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "tokens" => Ok(Emit::Tokens),
            "ast" => Ok(Emit::Ast),
            "ir" => Ok(Emit::Ir),
            other => Err(anyhow!(
                "unknown emit kind '{}', expected one of: ir, ast, tokens",
                other
            )),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Options {
    pub input: PathBuf,
    pub emit: Emit,
    pub log_level: Level,
    pub color: bool,
}

impl Options {
    /// Reads the process arguments, `MINICOMP_LOG` and `NO_COLOR`.
    pub fn from_env() -> Result<Self> {
        let mut options = Self::from_args(env::args().skip(1))?;
        if let Ok(level) = env::var(LOG_ENV) {
            options.log_level = parse_level(&level)?;
        }
        options.color = env::var_os("NO_COLOR").is_none_or(|v| v.is_empty());
        Ok(options)
    }

    pub fn from_args<I>(args: I) -> Result<Self>
    where
        I: IntoIterator<Item = String>,
    {
        let mut input = None;
        let mut emit = Emit::default();

        for arg in args {
            if let Some(kind) = arg.strip_prefix("--emit=") {
                emit = kind.parse()?;
            } else if arg.starts_with('-') && arg.len() > 1 {
                bail!("unknown option '{}'", arg);
            } else if input.is_some() {
                bail!("expected exactly one source file, got another: '{}'", arg);
            } else {
                input = Some(PathBuf::from(arg));
            }
        }

        let input = input.context("missing source file argument")?;
        Ok(Options {
            input,
            emit,
            log_level: Level::WARN,
            color: true,
        })
    }

    /// The name diagnostics and the IR module identifier refer to the input by.
    pub fn file_name(&self) -> String {
        self.input
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.input.display().to_string())
    }
}

fn parse_level(level: &str) -> Result<Level> {
    Level::from_str(level.trim())
        .map_err(|_| anyhow!("invalid {} value '{}'", LOG_ENV, level))
}

#[cfg(test)]
mod test {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_single_source_file() {
        let options = Options::from_args(args(&["prog.mc"])).unwrap();

        assert_eq!(options.input, PathBuf::from("prog.mc"));
        assert_eq!(options.emit, Emit::Ir);
        assert_eq!(options.log_level, Level::WARN);
    }

    #[test]
    fn test_emit_flag() {
        let options = Options::from_args(args(&["--emit=tokens", "a.mc"])).unwrap();
        assert_eq!(options.emit, Emit::Tokens);

        let options = Options::from_args(args(&["a.mc", "--emit=ast"])).unwrap();
        assert_eq!(options.emit, Emit::Ast);

        assert!(Options::from_args(args(&["--emit=asm", "a.mc"])).is_err());
    }

    #[test]
    fn test_bad_arguments() {
        assert!(Options::from_args(args(&[])).is_err());
        assert!(Options::from_args(args(&["a.mc", "b.mc"])).is_err());
        assert!(Options::from_args(args(&["--verbose", "a.mc"])).is_err());
    }

    #[test]
    fn test_file_name_strips_directories() {
        let options = Options::from_args(args(&["some/dir/prog.mc"])).unwrap();
        assert_eq!(options.file_name(), "prog.mc");
    }

    #[test]
    fn test_parse_level() {
        assert_eq!(parse_level("debug").unwrap(), Level::DEBUG);
        assert_eq!(parse_level(" TRACE ").unwrap(), Level::TRACE);
        assert!(parse_level("loud").is_err());
    }
}
