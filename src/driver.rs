//! Runs the stages in order: lex, parse, emit, validate, render.

use crate::config::Emit;
use crate::error::{CompileError, CompileResult};
use crate::ir::validator::IRValidator;
use crate::ir::{IRBuilder, Module};
use crate::lexer::tokenize;
use crate::parser::Parser;

use tracing::debug;

/// Compile `source` into a validated IR module named `module_name`.
pub fn compile(source: &str, module_name: &str) -> CompileResult<Module> {
    let tokens = tokenize(source);
    debug!(tokens = tokens.len(), "lexed source");

    let program = Parser::new(tokens).parse_program()?;
    let module = IRBuilder::new(module_name.to_string()).generate_module(&program)?;
    IRValidator::validate_module(&module).map_err(CompileError::InvalidIr)?;

    Ok(module)
}

/// Produce the text the binary prints for `emit`.
pub fn run(source: &str, module_name: &str, emit: Emit) -> CompileResult<String> {
    match emit {
        Emit::Tokens => Ok(tokenize(source)
            .iter()
            .map(|token| {
                format!(
                    "{:?} {:?} {}..{}\n",
                    token.kind, token.text, token.span.start, token.span.end
                )
            })
            .collect()),
        Emit::Ast => {
            let program = Parser::from_source(source).parse_program()?;
            Ok(format!("{:#?}\n", program))
        }
        Emit::Ir => Ok(compile(source, module_name)?.to_string()),
    }
}
