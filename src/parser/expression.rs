use crate::ast::{BinOp, Expr, Spanned};
use crate::error::{CompileError, CompileResult};
use crate::lexer::TokenKind;
use crate::parser::{Parser, join};

impl Parser {
    /// `expr := term { ("+" | "-") term }`
    pub fn parse_expression(&mut self) -> CompileResult<Spanned<Expr>> {
        let mut l_expr = self.parse_term()?;

        loop {
            let operator = match self.peek().kind {
                TokenKind::Plus => BinOp::Add,
                TokenKind::Minus => BinOp::Sub,
                _ => break,
            };
            self.advance();
            let r_expr = self.parse_term()?;
            l_expr = fold(operator, l_expr, r_expr);
        }

        Ok(l_expr)
    }

    /// `term := factor { ("*" | "/") factor }`
    pub fn parse_term(&mut self) -> CompileResult<Spanned<Expr>> {
        let mut l_expr = self.parse_factor()?;

        loop {
            let operator = match self.peek().kind {
                TokenKind::Mul => BinOp::Mul,
                TokenKind::Div => BinOp::Div,
                _ => break,
            };
            self.advance();
            let r_expr = self.parse_factor()?;
            l_expr = fold(operator, l_expr, r_expr);
        }

        Ok(l_expr)
    }

    /// `factor := NUMBER | IDENT | "(" expr ")"`
    pub fn parse_factor(&mut self) -> CompileResult<Spanned<Expr>> {
        let token = self.advance();

        match token.kind {
            TokenKind::Number => {
                let value = token
                    .text
                    .parse::<i32>()
                    .map_err(|_| CompileError::InvalidLiteral {
                        text: token.text.clone(),
                        span: token.span.clone(),
                    })?;
                Ok((Expr::Number(value), token.span))
            }

            TokenKind::Ident => Ok((Expr::Variable(token.text), token.span)),

            TokenKind::LParen => {
                let (expr, _) = self.parse_expression()?;
                let close = self.expect(TokenKind::RParen, "to close the parenthesis")?;
                Ok((expr, join(&token.span, &close.span)))
            }

            _ => Err(CompileError::syntax(
                format!("unexpected token in expression: {}", token.describe()),
                "expected a number, a variable or '('",
                token.span,
            )),
        }
    }
}

fn fold(operator: BinOp, l_expr: Spanned<Expr>, r_expr: Spanned<Expr>) -> Spanned<Expr> {
    let span = join(&l_expr.1, &r_expr.1);
    (
        Expr::BinOp {
            operator,
            l_value: Box::new(l_expr),
            r_value: Box::new(r_expr),
        },
        span,
    )
}
