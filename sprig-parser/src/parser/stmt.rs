use super::*;

impl Parser {
    /// Parses a declaration (or statement).
    pub fn parse_declaration(&mut self) -> ParseResult<Stmt> {
        match self.peek().ty {
            TokenType::Let | TokenType::Const => self.parse_let_declaration(),
            TokenType::Fun => self.parse_fn_declaration(),
            _ => self.parse_stmt(),
        }
    }

    /// Parses a statement.
    pub fn parse_stmt(&mut self) -> ParseResult<Stmt> {
        self.nested(|parser| match parser.peek().ty {
            TokenType::If => parser.parse_if_stmt(),
            TokenType::While => parser.parse_while_stmt(),
            TokenType::For => parser.parse_for_stmt(),
            TokenType::Return => parser.parse_return_stmt(),
            TokenType::Print => parser.parse_print_stmt(),
            TokenType::LeftBrace => {
                parser.advance();
                Ok(Stmt::Block(parser.parse_block()?))
            }
            _ => parser.parse_expr_stmt(),
        })
    }

    /// Parses declarations up to and including the closing `}`. The opening `{` must already be consumed.
    /// Errors inside the block are recorded and the block keeps going from the next statement boundary.
    fn parse_block(&mut self) -> ParseResult<Vec<Stmt>> {
        let mut body = Vec::new();

        while !self.check(TokenType::RightBrace) && !self.is_at_end() {
            match self.parse_declaration() {
                Ok(stmt) => body.push(stmt),
                Err(err) => {
                    self.report(err);
                    self.synchronize_in_block();
                }
            }
        }

        self.consume(TokenType::RightBrace, "Expect '}' after block.")?;
        Ok(body)
    }

    fn parse_let_declaration(&mut self) -> ParseResult<Stmt> {
        let is_const = self.advance().ty == TokenType::Const;
        let name = self.consume(TokenType::Identifier, "Expect variable name.")?;

        let initializer = if self.matches(&[TokenType::Equal]) {
            Some(self.parse_expr()?)
        } else {
            None
        };
        if is_const && initializer.is_none() {
            self.report(self.error_at_peek("Expect '=' after constant name."));
        }

        self.consume(
            TokenType::Semicolon,
            "Expect ';' after variable declaration.",
        )?;
        Ok(Stmt::Let {
            name,
            initializer,
            is_const,
        })
    }

    fn parse_fn_declaration(&mut self) -> ParseResult<Stmt> {
        self.advance(); // `function` or `fun`
        let name = self.consume(TokenType::Identifier, "Expect function name.")?;

        self.consume(TokenType::LeftParen, "Expect '(' after function name.")?;
        let mut params = Vec::new();
        if !self.check(TokenType::RightParen) {
            loop {
                if params.len() >= MAX_ARGUMENTS {
                    self.report(self.error_at_peek("Can't have more than 255 parameters."));
                }
                params.push(self.consume(TokenType::Identifier, "Expect parameter name.")?);

                if !self.matches(&[TokenType::Comma]) {
                    break;
                }
            }
        }
        self.consume(TokenType::RightParen, "Expect ')' after parameters.")?;

        self.consume(TokenType::LeftBrace, "Expect '{' before function body.")?;
        self.function_depth += 1;
        let body = self.nested(Self::parse_block);
        self.function_depth -= 1;

        Ok(FunctionDecl {
            name,
            params,
            body: body?,
        }
        .into_stmt())
    }

    fn parse_if_stmt(&mut self) -> ParseResult<Stmt> {
        self.advance(); // `if`
        self.consume(TokenType::LeftParen, "Expect '(' after 'if'.")?;
        let condition = self.parse_expr()?;
        self.consume(TokenType::RightParen, "Expect ')' after if condition.")?;

        let then_branch = Box::new(self.parse_stmt()?);
        // binds to the nearest `if`
        let else_branch = if self.matches(&[TokenType::Else]) {
            Some(Box::new(self.parse_stmt()?))
        } else {
            None
        };

        Ok(Stmt::If {
            condition,
            then_branch,
            else_branch,
        })
    }

    fn parse_while_stmt(&mut self) -> ParseResult<Stmt> {
        let keyword = self.advance();
        self.consume(TokenType::LeftParen, "Expect '(' after 'while'.")?;
        let condition = self.parse_expr()?;
        self.consume(TokenType::RightParen, "Expect ')' after condition.")?;
        let body = Box::new(self.parse_stmt()?);

        Ok(Stmt::While {
            keyword,
            condition,
            body,
        })
    }

    fn parse_for_stmt(&mut self) -> ParseResult<Stmt> {
        let keyword = self.advance();
        self.consume(TokenType::LeftParen, "Expect '(' after 'for'.")?;

        let initializer = if self.matches(&[TokenType::Semicolon]) {
            None
        } else if self.check(TokenType::Let) || self.check(TokenType::Const) {
            Some(Box::new(self.parse_let_declaration()?))
        } else {
            Some(Box::new(self.parse_expr_stmt()?))
        };

        let condition = if self.check(TokenType::Semicolon) {
            None
        } else {
            Some(self.parse_expr()?)
        };
        self.consume(TokenType::Semicolon, "Expect ';' after loop condition.")?;

        let increment = if self.check(TokenType::RightParen) {
            None
        } else {
            Some(self.parse_expr()?)
        };
        self.consume(TokenType::RightParen, "Expect ')' after for clauses.")?;

        let body = Box::new(self.parse_stmt()?);

        Ok(Stmt::For {
            keyword,
            initializer,
            condition,
            increment,
            body,
        })
    }

    fn parse_return_stmt(&mut self) -> ParseResult<Stmt> {
        let keyword = self.advance();
        if self.function_depth == 0 {
            self.report(ParseError::new(
                "Can't return from top-level code.",
                keyword.clone(),
            ));
        }

        let value = if self.check(TokenType::Semicolon) {
            None
        } else {
            Some(self.parse_expr()?)
        };
        self.consume(TokenType::Semicolon, "Expect ';' after return value.")?;

        Ok(Stmt::Return { keyword, value })
    }

    fn parse_print_stmt(&mut self) -> ParseResult<Stmt> {
        let keyword = self.advance();
        let value = self.parse_expr()?;
        self.consume(TokenType::Semicolon, "Expect ';' after value.")?;
        Ok(Stmt::Print { keyword, value })
    }

    fn parse_expr_stmt(&mut self) -> ParseResult<Stmt> {
        let expr = self.parse_expr()?;
        self.consume(TokenType::Semicolon, "Expect ';' after expression.")?;
        Ok(Stmt::Expression(expr))
    }
}
