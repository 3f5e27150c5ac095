pub mod ast;
pub mod config;
pub mod driver;
pub mod error;
pub mod ir;
pub mod lexer;
pub mod parser;
