use super::*;

/// Builds a binary-like node out of two operands and an operator.
type Combine = fn(Box<Expr>, Token, Box<Expr>) -> Expr;

fn binary(left: Box<Expr>, operator: Token, right: Box<Expr>) -> Expr {
    Expr::Binary {
        left,
        operator,
        right,
    }
}

fn logical(left: Box<Expr>, operator: Token, right: Box<Expr>) -> Expr {
    Expr::Logical {
        left,
        operator,
        right,
    }
}

impl Parser {
    /* Expressions */
    /// Parses any expression.
    /// Lowest to highest binding: assignment, `or`, `and`, equality, comparison, term, factor, unary, call, primary.
    pub(crate) fn parse_expr(&mut self) -> ParseResult<Expr> {
        self.nested(Self::parse_assignment_expr)
    }

    /// Parses an assignment. Assignment is right associative and only valid on an identifier.
    fn parse_assignment_expr(&mut self) -> ParseResult<Expr> {
        let expr = self.parse_or_expr()?;

        if self.matches(&[TokenType::Equal]) {
            let equals = self.previous().clone();
            let value = self.parse_expr()?;

            return match expr {
                Expr::Identifier(name) => Ok(Expr::Assignment {
                    name,
                    value: Box::new(value),
                }),
                _ => {
                    // the surrounding statement is still well formed, keep parsing
                    self.report(ParseError::new("Invalid assignment target.", equals));
                    Ok(expr)
                }
            };
        }

        Ok(expr)
    }

    fn parse_or_expr(&mut self) -> ParseResult<Expr> {
        self.parse_left_assoc(&[TokenType::Or], Self::parse_and_expr, logical)
    }

    fn parse_and_expr(&mut self) -> ParseResult<Expr> {
        self.parse_left_assoc(&[TokenType::And], Self::parse_equality_expr, logical)
    }

    fn parse_equality_expr(&mut self) -> ParseResult<Expr> {
        self.parse_left_assoc(
            &[TokenType::BangEqual, TokenType::EqualEqual],
            Self::parse_comparison_expr,
            binary,
        )
    }

    fn parse_comparison_expr(&mut self) -> ParseResult<Expr> {
        self.parse_left_assoc(
            &[
                TokenType::Greater,
                TokenType::GreaterEqual,
                TokenType::Less,
                TokenType::LessEqual,
            ],
            Self::parse_term_expr,
            binary,
        )
    }

    fn parse_term_expr(&mut self) -> ParseResult<Expr> {
        self.parse_left_assoc(
            &[TokenType::Minus, TokenType::Plus],
            Self::parse_factor_expr,
            binary,
        )
    }

    fn parse_factor_expr(&mut self) -> ParseResult<Expr> {
        self.parse_left_assoc(
            &[TokenType::Slash, TokenType::Star, TokenType::Percent],
            Self::parse_unary_expr,
            binary,
        )
    }

    /// Parses a left associative chain of `operand (operator operand)*`.
    fn parse_left_assoc(
        &mut self,
        operators: &[TokenType],
        operand: fn(&mut Self) -> ParseResult<Expr>,
        combine: Combine,
    ) -> ParseResult<Expr> {
        let mut left = operand(self)?;

        while self.matches(operators) {
            let operator = self.previous().clone();
            let right = operand(self)?;
            left = combine(Box::new(left), operator, Box::new(right));
        }

        Ok(left)
    }

    fn parse_unary_expr(&mut self) -> ParseResult<Expr> {
        if self.matches(&[TokenType::Bang, TokenType::Minus]) {
            let operator = self.previous().clone();
            let operand = self.nested(Self::parse_unary_expr)?;
            return Ok(Expr::Unary {
                operator,
                operand: Box::new(operand),
            });
        }

        self.parse_call_expr()
    }

    /// Parses a primary expression followed by any number of call suffixes (e.g. `f(1)(2)`).
    fn parse_call_expr(&mut self) -> ParseResult<Expr> {
        let mut expr = self.parse_primary_expr()?;

        while self.matches(&[TokenType::LeftParen]) {
            expr = self.finish_call(expr)?;
        }

        Ok(expr)
    }

    /// Parses the arguments of a call expression. The `(` must already be consumed.
    fn finish_call(&mut self, callee: Expr) -> ParseResult<Expr> {
        let mut arguments = Vec::new();

        if !self.check(TokenType::RightParen) {
            loop {
                if arguments.len() >= MAX_ARGUMENTS {
                    self.report(self.error_at_peek("Can't have more than 255 arguments."));
                }
                arguments.push(self.parse_expr()?);

                if !self.matches(&[TokenType::Comma]) {
                    break;
                }
            }
        }

        let paren = self.consume(TokenType::RightParen, "Expect ')' after arguments.")?;

        Ok(Expr::Call {
            callee: Box::new(callee),
            paren,
            arguments,
        })
    }

    /// Parses a primary (atom) expression: a literal, an identifier or a grouping.
    fn parse_primary_expr(&mut self) -> ParseResult<Expr> {
        let token = self.peek().clone();

        if let Some(value) = LiteralValue::from_token(&token) {
            self.advance();
            return Ok(Expr::Literal(value));
        }

        match token.ty {
            TokenType::Identifier => {
                self.advance();
                Ok(Expr::Identifier(token))
            }
            TokenType::LeftParen => {
                self.advance();
                let expr = self.parse_expr()?;
                self.consume(TokenType::RightParen, "Expect ')' after expression.")?;
                Ok(Expr::Grouping(Box::new(expr)))
            }
            _ => Err(self.error_at_peek("Expect expression.")),
        }
    }
}
