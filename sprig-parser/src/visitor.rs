//! Visitor pattern for AST nodes.
//!
//! Children are enumerated explicitly by [`walk_expr`] and [`walk_stmt`], in source order.

use crate::ast::{Expr, Program, Stmt};

pub trait Visitor<'ast>: Sized {
    fn visit_expr(&mut self, expr: &'ast Expr) {
        walk_expr(self, expr);
    }
    fn visit_stmt(&mut self, stmt: &'ast Stmt) {
        walk_stmt(self, stmt);
    }
}

pub fn walk_program<'ast>(visitor: &mut impl Visitor<'ast>, program: &'ast Program) {
    for stmt in &program.statements {
        visitor.visit_stmt(stmt);
    }
}

pub fn walk_expr<'ast>(visitor: &mut impl Visitor<'ast>, expr: &'ast Expr) {
    match expr {
        Expr::Literal(_) => {}
        Expr::Identifier(_) => {}
        Expr::Call {
            callee,
            paren: _,
            arguments,
        } => {
            visitor.visit_expr(callee);
            for arg in arguments {
                visitor.visit_expr(arg);
            }
        }
        Expr::Binary {
            left,
            operator: _,
            right,
        }
        | Expr::Logical {
            left,
            operator: _,
            right,
        } => {
            visitor.visit_expr(left);
            visitor.visit_expr(right);
        }
        Expr::Unary {
            operator: _,
            operand,
        } => visitor.visit_expr(operand),
        Expr::Assignment { name: _, value } => visitor.visit_expr(value),
        Expr::Grouping(inner) => visitor.visit_expr(inner),
    }
}

pub fn walk_stmt<'ast>(visitor: &mut impl Visitor<'ast>, stmt: &'ast Stmt) {
    /// Iteratively visit all statements in a `Vec<Stmt>`.
    macro_rules! visit_stmt_list {
        ($visitor: expr, $body: expr) => {
            for stmt in $body {
                Visitor::visit_stmt($visitor, stmt);
            }
        };
    }

    match stmt {
        Stmt::Let {
            name: _,
            initializer,
            is_const: _,
        } => {
            if let Some(initializer) = initializer {
                visitor.visit_expr(initializer);
            }
        }
        Stmt::Function(decl) => visit_stmt_list!(visitor, &decl.body),
        Stmt::Block(body) => visit_stmt_list!(visitor, body),
        Stmt::Expression(expr) => visitor.visit_expr(expr),
        Stmt::Print { keyword: _, value } => visitor.visit_expr(value),
        Stmt::Return { keyword: _, value } => {
            if let Some(value) = value {
                visitor.visit_expr(value);
            }
        }
        Stmt::If {
            condition,
            then_branch,
            else_branch,
        } => {
            visitor.visit_expr(condition);
            visitor.visit_stmt(then_branch);
            if let Some(else_branch) = else_branch {
                visitor.visit_stmt(else_branch);
            }
        }
        Stmt::While {
            keyword: _,
            condition,
            body,
        } => {
            visitor.visit_expr(condition);
            visitor.visit_stmt(body);
        }
        Stmt::For {
            keyword: _,
            initializer,
            condition,
            increment,
            body,
        } => {
            if let Some(initializer) = initializer {
                visitor.visit_stmt(initializer);
            }
            if let Some(condition) = condition {
                visitor.visit_expr(condition);
            }
            if let Some(increment) = increment {
                visitor.visit_expr(increment);
            }
            visitor.visit_stmt(body);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexer::scan;
    use crate::parser::Parser;

    /// Records identifier names in visiting order.
    #[derive(Default)]
    struct Identifiers(Vec<String>);

    impl<'ast> Visitor<'ast> for Identifiers {
        fn visit_expr(&mut self, expr: &'ast Expr) {
            if let Expr::Identifier(name) = expr {
                self.0.push(name.lexeme.clone());
            }
            walk_expr(self, expr);
        }
    }

    /// Counts statements at any depth.
    #[derive(Default)]
    struct StmtCount(usize);

    impl<'ast> Visitor<'ast> for StmtCount {
        fn visit_stmt(&mut self, stmt: &'ast Stmt) {
            self.0 += 1;
            walk_stmt(self, stmt);
        }
    }

    fn program(source: &str) -> Program {
        let (tokens, errors) = scan(source);
        assert!(errors.is_empty());
        Parser::new(tokens).parse_program().expect("valid program")
    }

    #[test]
    fn test_walk_in_source_order() {
        let program = program(
            "for (let i = a; i < b; i = i + c) { print f(d, e); }
            if (g) h = j and k; else return_value(l or m);",
        );
        let mut identifiers = Identifiers::default();
        walk_program(&mut identifiers, &program);
        assert_eq!(
            identifiers.0,
            vec!["a", "i", "b", "i", "c", "f", "d", "e", "g", "j", "k", "return_value", "l", "m"]
        );
    }

    #[test]
    fn test_walk_nested_statements() {
        let program = program(
            "function outer() { let x = 1; function inner() { return x; } return inner; }
            while (true) { { print 1; } }",
        );
        let mut count = StmtCount::default();
        walk_program(&mut count, &program);
        // outer, let, inner, return, return, while, block, block, print
        assert_eq!(count.0, 9);
    }
}
