pub mod expression;
pub mod statement;

#[cfg(test)]
pub mod test;

use crate::ast::Program;
use crate::error::{CompileError, CompileResult};
use crate::lexer::{Token, TokenKind, tokenize};

use tracing::debug;

use std::ops::Range;

/// Recursive-descent parser over a fully lexed token buffer. Stops at the
/// first malformed construct.
#[derive(Debug)]
pub struct Parser {
    tokens: Vec<Token>,
    pos: usize,
}

impl Parser {
    /// Takes the token stream as produced by the lexer. An `Eof` token is
    /// appended if the stream lacks one.
    pub fn new(mut tokens: Vec<Token>) -> Self {
        if tokens.last().map(|t| t.kind) != Some(TokenKind::Eof) {
            let end = tokens.last().map_or(0, |t| t.span.end);
            tokens.push(Token {
                kind: TokenKind::Eof,
                text: String::new(),
                span: end..end,
            });
        }
        Parser { tokens, pos: 0 }
    }

    pub fn from_source(source: &str) -> Self {
        Parser::new(tokenize(source))
    }

    pub fn parse_program(&mut self) -> CompileResult<Program> {
        let mut tree = vec![];
        loop {
            match self.peek().kind {
                TokenKind::Eof => break,
                TokenKind::KeywordLet => tree.push(self.parse_let()?),
                TokenKind::KeywordPrint => tree.push(self.parse_print()?),
                // stray semicolons are empty statements
                TokenKind::Semicolon => {
                    self.advance();
                }
                _ => {
                    let token = self.peek();
                    return Err(CompileError::syntax(
                        format!("unexpected token {}", token.describe()),
                        "expected 'let', 'print' or ';' at the start of a statement",
                        token.span.clone(),
                    ));
                }
            }
        }
        debug!(statements = tree.len(), "parsed program");
        Ok(tree)
    }

    fn peek(&self) -> &Token {
        // the trailing Eof is never consumed, so this stays in bounds
        &self.tokens[self.pos.min(self.tokens.len() - 1)]
    }

    fn advance(&mut self) -> Token {
        let token = self.peek().clone();
        if token.kind != TokenKind::Eof {
            self.pos += 1;
        }
        token
    }

    /// Consume the next token if it is of `kind`.
    fn accept(&mut self, kind: TokenKind) -> Option<Token> {
        if self.peek().kind == kind {
            Some(self.advance())
        } else {
            None
        }
    }

    fn expect(&mut self, kind: TokenKind, context: &str) -> CompileResult<Token> {
        if let Some(token) = self.accept(kind) {
            return Ok(token);
        }
        let token = self.peek();
        Err(CompileError::syntax(
            format!("expected {} {}, found {}", kind, context, token.describe()),
            format!("expected {} here", kind),
            token.span.clone(),
        ))
    }
}

fn join(start: &Range<usize>, end: &Range<usize>) -> Range<usize> {
    start.start..end.end
}
