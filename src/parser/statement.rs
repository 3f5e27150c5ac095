use crate::ast::{Spanned, Stmt};
use crate::error::{CompileError, CompileResult};
use crate::lexer::TokenKind;
use crate::parser::{Parser, join};

impl Parser {
    /// `let IDENT = expr ;`
    pub fn parse_let(&mut self) -> CompileResult<Spanned<Stmt>> {
        let keyword = self.expect(TokenKind::KeywordLet, "to start a declaration")?;

        let Some(ident) = self.accept(TokenKind::Ident) else {
            let token = self.peek();
            return Err(CompileError::syntax(
                format!("expected identifier after 'let', found {}", token.describe()),
                "expected a variable name here",
                token.span.clone(),
            ));
        };

        self.expect(TokenKind::Assign, "after the variable name")?;
        let value = self.parse_expression()?;
        let semi = self.expect(TokenKind::Semicolon, "to end the 'let' statement")?;

        Ok((
            Stmt::Let {
                var: ident.text,
                value,
            },
            join(&keyword.span, &semi.span),
        ))
    }

    /// `print expr ;`
    pub fn parse_print(&mut self) -> CompileResult<Spanned<Stmt>> {
        let keyword = self.expect(TokenKind::KeywordPrint, "to start a print")?;
        let value = self.parse_expression()?;
        let semi = self.expect(TokenKind::Semicolon, "to end the 'print' statement")?;

        Ok((Stmt::Print { value }, join(&keyword.span, &semi.span)))
    }
}
