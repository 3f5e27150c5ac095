use logos::Logos;

use std::fmt::{self, Display, Formatter};
use std::ops::Range;


#[derive(Logos, Debug, Clone, Copy, PartialEq, Eq)]
#[logos(skip r"[ \t\n\x0B\x0C\r]+")] // the C `isspace` set
pub enum TokenKind {
    // never produced by logos, appended once by `Lexer`
    Eof,

    #[regex(r"[0-9]+")]
    Number,

    #[regex(r"[a-zA-Z_][a-zA-Z0-9_]*")]
    Ident,

    #[token("+")]
    Plus,

    #[token("-")]
    Minus,

    #[token("*")]
    Mul,

    #[token("/")]
    Div,

    #[token("(")]
    LParen,

    #[token(")")]
    RParen,

    #[token(";")]
    Semicolon,

    #[token("=")]
    Assign,

    #[token("let")]
    KeywordLet,

    #[token("print")]
    KeywordPrint,

    // anything logos could not match; only fatal once the parser sees it
    Unknown,
}

impl Display for TokenKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let s = match self {
            TokenKind::Eof => "end of input",
            TokenKind::Number => "number",
            TokenKind::Ident => "identifier",
            TokenKind::Plus => "'+'",
            TokenKind::Minus => "'-'",
            TokenKind::Mul => "'*'",
            TokenKind::Div => "'/'",
            TokenKind::LParen => "'('",
            TokenKind::RParen => "')'",
            TokenKind::Semicolon => "';'",
            TokenKind::Assign => "'='",
            TokenKind::KeywordLet => "'let'",
            TokenKind::KeywordPrint => "'print'",
            TokenKind::Unknown => "unknown character",
        };
        write!(f, "{}", s)
    }
}

/// A classified lexeme together with the text it matched and where it came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub text: String,
    pub span: Range<usize>,
}

impl Token {
    /// How the token reads in a diagnostic: its text, or `end of input`.
    pub fn describe(&self) -> String {
        match self.kind {
            TokenKind::Eof => "end of input".to_string(),
            _ => format!("'{}'", self.text),
        }
    }
}

/// Produces tokens one at a time. The stream always ends with exactly one
/// `Eof` token, after which the iterator is exhausted.
pub struct Lexer<'a> {
    inner: logos::Lexer<'a, TokenKind>,
    len: usize,
    finished: bool,
}

impl<'a> Lexer<'a> {
    pub fn new(source: &'a str) -> Self {
        Lexer {
            inner: TokenKind::lexer(source),
            len: source.len(),
            finished: false,
        }
    }

    pub fn next_token(&mut self) -> Option<Token> {
        if self.finished {
            return None;
        }

        let Some(result) = self.inner.next() else {
            self.finished = true;
            return Some(Token {
                kind: TokenKind::Eof,
                text: String::new(),
                span: self.len..self.len,
            });
        };

        let span = self.inner.span();
        let text = self.inner.slice();

        let token = match result {
            Ok(kind) => Token {
                kind,
                text: text.to_string(),
                span,
            },
            // every pattern is either one character or greedy, so a failed
            // match covers exactly the one offending character
            Err(()) => Token {
                kind: TokenKind::Unknown,
                text: text.to_string(),
                span,
            },
        };
        Some(token)
    }
}

impl Iterator for Lexer<'_> {
    type Item = Token;

    fn next(&mut self) -> Option<Token> {
        self.next_token()
    }
}

/// Lex the whole source up front.
pub fn tokenize(source: &str) -> Vec<Token> {
    Lexer::new(source).collect()
}
