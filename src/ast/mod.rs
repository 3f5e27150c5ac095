use std::ops::Range;

/// A node paired with the byte range of source it was parsed from.
pub type Spanned<T> = (T, Range<usize>);

#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    Number(i32),

    // resolved against the symbol table during emission, not while parsing
    Variable(String),

    BinOp {
        operator: BinOp,
        l_value: Box<Spanned<Expr>>,
        r_value: Box<Spanned<Expr>>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinOp {
    Add,
    Sub,
    Mul,
    Div,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Stmt {
    /// `let var = value;` declares `var`, or re-declares it with a fresh slot.
    Let {
        var: String,
        value: Spanned<Expr>,
    },
    /// `print value;`
    Print { value: Spanned<Expr> },
}

/// Statements in source order.
pub type Program = Vec<Spanned<Stmt>>;
