//! Abstract syntax tree.

use crate::token::Token;
use std::rc::Rc;

/// The root of a parsed source file.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Program {
    pub statements: Vec<Stmt>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Stmt {
    /// `{ ... }`. Introduces a new scope.
    Block(Vec<Stmt>),
    /// An expression evaluated for its side effects (e.g. `foo();`).
    Expression(Expr),
    /// `print value;`
    Print { keyword: Token, value: Expr },
    If {
        condition: Expr,
        then_branch: Box<Stmt>,
        else_branch: Option<Box<Stmt>>,
    },
    While {
        keyword: Token,
        condition: Expr,
        body: Box<Stmt>,
    },
    /// C-style `for (initializer; condition; increment) body`.
    /// A missing condition loops forever.
    For {
        keyword: Token,
        initializer: Option<Box<Stmt>>,
        condition: Option<Expr>,
        increment: Option<Expr>,
        body: Box<Stmt>,
    },
    /// `let`, `var` or `const` declaration.
    Let {
        name: Token,
        initializer: Option<Expr>,
        is_const: bool,
    },
    Return {
        keyword: Token,
        value: Option<Expr>,
    },
    /// Function declaration. The declaration is reference counted so that function values can point back to it.
    Function(Rc<FunctionDecl>),
}

#[derive(Debug, Clone, PartialEq)]
pub struct FunctionDecl {
    pub name: Token,
    pub params: Vec<Token>,
    pub body: Vec<Stmt>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    /// A binary expression (e.g. `1+1`).
    Binary {
        left: Box<Expr>,
        operator: Token,
        right: Box<Expr>,
    },
    /// Short-circuiting `and` / `or`.
    Logical {
        left: Box<Expr>,
        operator: Token,
        right: Box<Expr>,
    },
    /// `!operand` or `-operand`.
    Unary {
        operator: Token,
        operand: Box<Expr>,
    },
    /// A call expression (e.g. `foo(1, bar)`).
    /// `paren` is the closing parenthesis and is used to report errors.
    Call {
        callee: Box<Expr>,
        paren: Token,
        arguments: Vec<Expr>,
    },
    /// `name = value`
    Assignment { name: Token, value: Box<Expr> },
    Literal(LiteralValue),
    /// An identifier (e.g. `foo`).
    Identifier(Token),
    /// A parenthesized expression (e.g. `(1 + 2)`).
    Grouping(Box<Expr>),
}

#[derive(Debug, Clone, PartialEq)]
pub enum LiteralValue {
    Number(f64),
    Str(String),
    Bool(bool),
    Nil,
}
