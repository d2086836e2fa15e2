//! Renders an AST back into source code.
//!
//! The default output is canonical source: parsing it again yields a tree that prints identically.
//! [`Printer::parenthesized`] wraps every operator application in parentheses to make the tree shape visible.

use crate::ast::{Expr, LiteralValue, Program, Stmt};
use crate::visitor::{walk_expr, walk_program, walk_stmt, Visitor};

/// Number of spaces per indentation level.
const INDENT: usize = 2;

#[derive(Default)]
pub struct Printer {
    out: String,
    level: usize,
    parenthesized: bool,
}

/// Prints `program` as canonical source code.
pub fn print_program(program: &Program) -> String {
    Printer::new().program(program)
}

impl Printer {
    pub fn new() -> Self {
        Self::default()
    }

    /// A printer that makes precedence and associativity explicit (e.g. `(1 + (2 * 3))`).
    /// The output is meant for humans and is not guaranteed to round-trip.
    pub fn parenthesized() -> Self {
        Self {
            parenthesized: true,
            ..Self::default()
        }
    }

    /// Consumes `self` and returns the printed program, one statement per line.
    pub fn program(mut self, program: &Program) -> String {
        walk_program(&mut self, program);
        self.out
    }

    /// Consumes `self` and returns the printed expression.
    pub fn expr(mut self, expr: &Expr) -> String {
        self.visit_expr(expr);
        self.out
    }

    fn write(&mut self, text: &str) {
        self.out.push_str(text);
    }

    fn indent(&mut self) {
        let width = self.level * INDENT;
        self.out.extend(std::iter::repeat(' ').take(width));
    }

    /// Writes `{`, the statements one level deeper, then `}` without a trailing newline.
    fn braced<'ast>(&mut self, stmt: &'ast Stmt) {
        self.write("{\n");
        self.level += 1;
        walk_stmt(self, stmt);
        self.level -= 1;
        self.indent();
        self.write("}");
    }

    /// Writes a statement without leading indentation or trailing newline.
    /// Nested statements (branches, loop bodies) stay on the same line unless they are blocks.
    fn stmt_inline<'ast>(&mut self, stmt: &'ast Stmt) {
        match stmt {
            Stmt::Block(_) => self.braced(stmt),
            Stmt::Expression(_) => {
                walk_stmt(self, stmt);
                self.write(";");
            }
            Stmt::Print { .. } => {
                self.write("print ");
                walk_stmt(self, stmt);
                self.write(";");
            }
            Stmt::If {
                condition,
                then_branch,
                else_branch,
            } => {
                self.write("if (");
                self.visit_expr(condition);
                self.write(") ");
                self.stmt_inline(then_branch);
                if let Some(else_branch) = else_branch {
                    self.write(" else ");
                    self.stmt_inline(else_branch);
                }
            }
            Stmt::While {
                condition, body, ..
            } => {
                self.write("while (");
                self.visit_expr(condition);
                self.write(") ");
                self.stmt_inline(body);
            }
            Stmt::For {
                initializer,
                condition,
                increment,
                body,
                ..
            } => {
                self.write("for (");
                match initializer {
                    Some(initializer) => self.stmt_inline(initializer),
                    None => self.write(";"),
                }
                if let Some(condition) = condition {
                    self.write(" ");
                    self.visit_expr(condition);
                }
                self.write(";");
                if let Some(increment) = increment {
                    self.write(" ");
                    self.visit_expr(increment);
                }
                self.write(") ");
                self.stmt_inline(body);
            }
            Stmt::Let {
                name,
                initializer,
                is_const,
            } => {
                self.write(if *is_const { "const " } else { "let " });
                self.write(&name.lexeme);
                if let Some(initializer) = initializer {
                    self.write(" = ");
                    self.visit_expr(initializer);
                }
                self.write(";");
            }
            Stmt::Return { value, .. } => {
                self.write("return");
                if let Some(value) = value {
                    self.write(" ");
                    self.visit_expr(value);
                }
                self.write(";");
            }
            Stmt::Function(decl) => {
                self.write("function ");
                self.write(&decl.name.lexeme);
                self.write("(");
                let params: Vec<&str> = decl.params.iter().map(|param| param.lexeme.as_str()).collect();
                self.write(&params.join(", "));
                self.write(") ");
                self.braced(stmt);
            }
        }
    }

    /// Writes `(` and `)` around `f` in parenthesized mode.
    fn group(&mut self, f: impl FnOnce(&mut Self)) {
        if self.parenthesized {
            self.write("(");
        }
        f(self);
        if self.parenthesized {
            self.write(")");
        }
    }

    fn literal(&mut self, value: &LiteralValue) {
        match value {
            LiteralValue::Number(value) => {
                let text = value.to_string();
                self.write(&text);
            }
            LiteralValue::Str(value) => {
                self.write("\"");
                self.write(value);
                self.write("\"");
            }
            LiteralValue::Bool(value) => self.write(if *value { "true" } else { "false" }),
            LiteralValue::Nil => self.write("nil"),
        }
    }
}

impl<'ast> Visitor<'ast> for Printer {
    fn visit_stmt(&mut self, stmt: &'ast Stmt) {
        self.indent();
        self.stmt_inline(stmt);
        self.write("\n");
    }

    fn visit_expr(&mut self, expr: &'ast Expr) {
        match expr {
            Expr::Literal(value) => self.literal(value),
            Expr::Identifier(name) => self.write(&name.lexeme),
            Expr::Grouping(_) => {
                self.write("(");
                walk_expr(self, expr);
                self.write(")");
            }
            Expr::Unary { operator, .. } => self.group(|this| {
                this.write(&operator.lexeme);
                walk_expr(this, expr);
            }),
            Expr::Binary {
                left,
                operator,
                right,
            }
            | Expr::Logical {
                left,
                operator,
                right,
            } => self.group(|this| {
                this.visit_expr(left);
                this.write(" ");
                this.write(&operator.lexeme);
                this.write(" ");
                this.visit_expr(right);
            }),
            Expr::Assignment { name, value } => self.group(|this| {
                this.write(&name.lexeme);
                this.write(" = ");
                this.visit_expr(value);
            }),
            Expr::Call {
                callee, arguments, ..
            } => {
                self.visit_expr(callee);
                self.write("(");
                for (i, argument) in arguments.iter().enumerate() {
                    if i > 0 {
                        self.write(", ");
                    }
                    self.visit_expr(argument);
                }
                self.write(")");
            }
        }
    }
}
