use ariadne::{Color, ColorGenerator, Config, Fmt, IndexType, Label, Report, ReportKind, Source};
use thiserror::Error;

use std::io;
use std::ops::Range;

pub type CompileResult<T> = Result<T, CompileError>;

type SourceReport = Report<'static, (String, Range<usize>)>;

/// Every way a compilation can stop. The first one raised wins; there is no
/// recovery or batching.
#[derive(Debug, Error, PartialEq)]
pub enum CompileError {
    #[error("{message}")]
    Syntax {
        message: String,
        label: String,
        span: Range<usize>,
    },

    #[error("invalid integer literal '{text}'")]
    InvalidLiteral { text: String, span: Range<usize> },

    #[error("unknown variable '{name}'")]
    UnknownVariable { name: String, span: Range<usize> },

    #[error("emitted IR failed validation: {}", .0.join("; "))]
    InvalidIr(Vec<String>),
}

impl CompileError {
    pub fn syntax(message: impl Into<String>, label: impl Into<String>, span: Range<usize>) -> Self {
        CompileError::Syntax {
            message: message.into(),
            label: label.into(),
            span,
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            CompileError::Syntax { .. } => "Syntax Error",
            CompileError::InvalidLiteral { .. } => "Literal Error",
            CompileError::UnknownVariable { .. } => "Semantic Error",
            CompileError::InvalidIr(_) => "Internal Error",
        }
    }

    pub fn span(&self) -> Range<usize> {
        match self {
            CompileError::Syntax { span, .. }
            | CompileError::InvalidLiteral { span, .. }
            | CompileError::UnknownVariable { span, .. } => span.clone(),
            CompileError::InvalidIr(_) => 0..0,
        }
    }

    pub fn report(&self, file: &str, color: bool) -> SourceReport {
        let span = self.span();
        let mut colors = ColorGenerator::new();

        let builder = Report::build(ReportKind::Error, (file.to_string(), span.clone()))
            // token spans are byte offsets into the source
            .with_config(
                Config::default()
                    .with_color(color)
                    .with_index_type(IndexType::Byte),
            )
            .with_code(self.code())
            .with_message(self.to_string());

        match self {
            CompileError::Syntax { label, .. } => builder
                .with_label(
                    Label::new((file.to_string(), span))
                        .with_message(label)
                        .with_color(colors.next()),
                )
                .finish(),
            CompileError::InvalidLiteral { .. } => builder
                .with_label(
                    Label::new((file.to_string(), span))
                        .with_message("does not fit in a 32-bit signed integer")
                        .with_color(colors.next()),
                )
                .finish(),
            CompileError::UnknownVariable { name, .. } => builder
                .with_label(
                    Label::new((file.to_string(), span))
                        .with_message("used here before any 'let' declares it")
                        .with_color(colors.next()),
                )
                .with_note(format!(
                    "declare it first with '{} {} = your_expression;'",
                    keyword("let", color),
                    name
                ))
                .finish(),
            CompileError::InvalidIr(problems) => problems
                .iter()
                .fold(builder, |builder, problem| builder.with_note(problem))
                .finish(),
        }
    }

    /// Render the diagnostic against `source` into a string.
    pub fn render(&self, file: &str, source: &str, color: bool) -> String {
        let mut out = Vec::new();
        // writing into a Vec cannot fail
        let _ = self
            .report(file, color)
            .write((file.to_string(), Source::from(source.to_string())), &mut out);
        String::from_utf8_lossy(&out).into_owned()
    }

    pub fn eprint(&self, file: &str, source: &str, color: bool) -> io::Result<()> {
        self.report(file, color)
            .eprint((file.to_string(), Source::from(source.to_string())))
    }
}

fn keyword(word: &str, color: bool) -> String {
    if color {
        word.fg(Color::Yellow).to_string()
    } else {
        word.to_string()
    }
}
