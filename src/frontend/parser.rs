use super::errors::{Item, ParserError, ParserErrorType, ParserResult, MAX_FUNC_ARGS};
use super::grammar::Tree;
use super::grammar::{Expr, ExprType, FuncInfo, Literal, Stmt, StmtType};
use super::grammar::{Identifier, PrefixOperator};
use super::lexer::Lexer;
use super::operator::{ParserOperator, Precedence};
use super::span::Span;
use super::token::{SpannedToken, Token};

pub struct Parser<'s> {
    lexer: Lexer<'s>,
    current: SpannedToken,
    previous: SpannedToken,
    errors: Vec<ParserError>,
}

impl<'s> Parser<'s> {
    pub fn new(source: &'s str) -> Self {
        let dummy_token = SpannedToken {
            token: Token::LexerError("<parser token>".to_owned()),
            span: Span::default(),
        };

        Parser {
            lexer: Lexer::new(source),
            current: dummy_token.clone(),
            previous: dummy_token,
            errors: vec![],
        }
    }

    /// Advances the stream.
    fn bump(&mut self) -> ParserResult<()> {
        std::mem::swap(&mut self.previous, &mut self.current);
        self.current = self.lexer.next_token();

        if let Token::LexerError(e) = &self.current.token {
            Err(ParserError {
                span: self.current.span,
                error: ParserErrorType::IllegalToken(e.clone()),
            })
        } else {
            Ok(())
        }
    }

    /// Checks whether or not the current token matches the given token.
    fn check(&self, t: Token) -> bool {
        self.current.token == t
    }

    /// Checks whether or not the current token matches the given token.
    /// If true consume it and return true, else return false. Consuming can
    /// surface a malformed token sitting right after the match.
    fn check_consume(&mut self, t: Token) -> ParserResult<bool> {
        if self.check(t) {
            self.bump()?;
            return Ok(true);
        }
        Ok(false)
    }

    fn expect(&mut self, expected: Token) {
        assert_eq!(self.current.token, expected);
        std::mem::drop(self.bump());
    }

    fn consume(&mut self, t: Token, error: ParserErrorType) -> ParserResult<()> {
        self.bump()?;

        if self.previous.token == t {
            Ok(())
        } else {
            Err(ParserError {
                span: self.previous.span,
                error,
            })
        }
    }

    /// Parses program from the top of treating it as a set of statements.
    pub fn parse(mut self) -> Result<Tree, Vec<ParserError>> {
        if let Err(e) = self.bump() {
            self.emit_error(e);
            self.synchronize();
        };

        let mut stmts = vec![];

        while !self.check(Token::EndOfFile) {
            if let Some(stmt) = self.parse_declaration_with_recovery() {
                stmts.push(stmt);
            }
        }

        if self.errors.is_empty() {
            Ok(Tree { stmts })
        } else {
            Err(self.errors)
        }
    }

    /// Skips tokens up to the next statement boundary: a semicolon just
    /// consumed, end of input, or the start of a statement keyword.
    fn synchronize(&mut self) {
        loop {
            if self.previous.token == Token::Semicolon {
                return;
            }

            match self.current.token {
                Token::EndOfFile
                | Token::Create
                | Token::Func
                | Token::If
                | Token::While
                | Token::For
                | Token::Output
                | Token::Return => return,
                _ => {}
            }

            std::mem::drop(self.bump());
        }
    }

    fn emit_error(&mut self, error: ParserError) {
        self.errors.push(error);
    }

    /// Handle declarations separately from non-declaring statements since
    /// they may not be allowed everywhere non-declaring statements are allowed.
    fn parse_declaration_with_recovery(&mut self) -> Option<Stmt> {
        match self.parse_declaration() {
            Ok(stmt) => Some(stmt),
            Err(err) => {
                self.emit_error(err);
                self.synchronize();
                None
            }
        }
    }

    fn parse_declaration(&mut self) -> ParserResult<Stmt> {
        let curr_span = self.current.span;

        let stmt_type = match self.current.token {
            Token::Create => self.parse_variable_decl()?,
            Token::Func => {
                self.bump()?;
                let func_info = self.parse_func_info()?;

                StmtType::FuncDecl(func_info)
            }
            _ => return self.parse_statement(),
        };

        Ok(Stmt {
            stmt: stmt_type,
            span: curr_span.extend(self.previous.span),
        })
    }

    /// Parse func info into func info struct.
    fn parse_func_info(&mut self) -> ParserResult<FuncInfo> {
        let curr_span = self.current.span;

        let name = self.parse_identifier(ParserErrorType::ExpectedIdentifier)?;
        let params = self.parse_func_params()?;

        self.consume(
            Token::LeftBrace,
            ParserErrorType::ExpectedBefore("{", Item::FunctionBody),
        )?;
        let stmts = self.parse_block_stmts()?;
        let span = curr_span.extend(self.previous.span);

        let func_info = FuncInfo::new(name, params, stmts, span);

        Ok(func_info)
    }

    fn parse_variable_decl(&mut self) -> ParserResult<StmtType> {
        self.expect(Token::Create);
        let name = self.parse_identifier(ParserErrorType::ExpectedIdentifier)?;
        let initializer = if self.check_consume(Token::Equals)? {
            Some(self.parse_expression()?)
        } else {
            None
        };
        self.consume(
            Token::Semicolon,
            ParserErrorType::ExpectedAfter(";", Item::VariableDecl),
        )?;

        Ok(StmtType::VariableDecl(name, initializer))
    }

    fn parse_statement(&mut self) -> ParserResult<Stmt> {
        let curr_span = self.current.span;
        let stmt_type = match self.current.token {
            Token::Output => self.parse_output()?,
            Token::If => self.parse_if_else()?,
            Token::While => self.parse_while()?,
            Token::For => self.parse_for()?,
            Token::Return => self.parse_return()?,
            Token::LeftBrace => {
                self.bump()?;
                let stmts = self.parse_block_stmts()?;
                StmtType::Block(stmts)
            }
            _ => self.parse_expression_statement()?,
        };

        Ok(Stmt {
            stmt: stmt_type,
            span: curr_span.extend(self.previous.span),
        })
    }

    fn parse_expression_statement(&mut self) -> ParserResult<StmtType> {
        let expr = self.parse_expression()?;
        self.consume(
            Token::Semicolon,
            ParserErrorType::ExpectedAfter(";", Item::Expression),
        )?;
        Ok(StmtType::Expression(expr))
    }

    fn parse_output(&mut self) -> ParserResult<StmtType> {
        self.expect(Token::Output);
        self.consume(
            Token::LeftParen,
            ParserErrorType::ExpectedAfter("(", Item::OutputKeyword),
        )?;
        let expr = self.parse_expression()?;
        self.consume(
            Token::RightParen,
            ParserErrorType::ExpectedAfter(")", Item::OutputValue),
        )?;
        self.consume(
            Token::Semicolon,
            ParserErrorType::ExpectedAfter(";", Item::OutputValue),
        )?;
        Ok(StmtType::Output(expr))
    }

    fn parse_if_else(&mut self) -> ParserResult<StmtType> {
        self.expect(Token::If);
        self.consume(
            Token::LeftParen,
            ParserErrorType::ExpectedAfter("(", Item::If),
        )?;
        let condition = self.parse_expression()?;
        self.consume(
            Token::RightParen,
            ParserErrorType::ExpectedAfter(")", Item::Condition),
        )?;

        let if_body = Box::new(self.parse_statement()?);
        let else_body = if self.check_consume(Token::Else)? {
            Some(Box::new(self.parse_statement()?))
        } else {
            None
        };

        Ok(StmtType::IfElse(condition, if_body, else_body))
    }

    fn parse_while(&mut self) -> ParserResult<StmtType> {
        self.expect(Token::While);
        self.consume(
            Token::LeftParen,
            ParserErrorType::ExpectedAfter("(", Item::While),
        )?;
        let condition = self.parse_expression()?;
        self.consume(
            Token::RightParen,
            ParserErrorType::ExpectedAfter(")", Item::Condition),
        )?;
        let body = self.parse_statement()?;

        Ok(StmtType::While(condition, Box::new(body)))
    }

    /// Parse for loop. There is no loop node for it: the clauses desugar to
    /// `{ init; while (cond) { body; incr; } }` right here.
    fn parse_for(&mut self) -> ParserResult<StmtType> {
        self.expect(Token::For);

        self.consume(
            Token::LeftParen,
            ParserErrorType::ExpectedAfter("(", Item::For),
        )?;

        // Get initializer. It can be empty.
        let init_stmt = if self.check_consume(Token::Semicolon)? {
            None
        } else if self.check(Token::Create) {
            let curr_span = self.current.span;
            let stmt = to_stmt(
                self.parse_variable_decl()?,
                curr_span.extend(self.previous.span),
            );
            Some(stmt)
        } else {
            let curr_span = self.current.span;
            let stmt = to_stmt(
                self.parse_expression_statement()?,
                curr_span.extend(self.previous.span),
            );
            Some(stmt)
        };

        // Get condition expression. It can be empty.
        let condition = if self.check(Token::Semicolon) {
            None
        } else {
            Some(self.parse_expression()?)
        };

        self.consume(
            Token::Semicolon,
            ParserErrorType::ExpectedAfter(";", Item::Condition),
        )?;

        // Get increment expression. It can be empty.
        let increment = if self.check(Token::RightParen) {
            None
        } else {
            Some(self.parse_expression()?)
        };

        self.consume(
            Token::RightParen,
            ParserErrorType::ExpectedAfter(")", Item::ForClause),
        )?;

        let mut body = self.parse_statement()?;

        // Append the increment to the end of the body.
        if let Some(increment) = increment {
            let incr_span = increment.span;
            let body_span = body.span;
            body = to_stmt(
                StmtType::Block(vec![body, to_stmt(StmtType::Expression(increment), incr_span)]),
                body_span.extend(incr_span),
            );
        }

        // A missing condition loops forever.
        let condition = condition.unwrap_or_else(|| {
            Expr::new(ExprType::Literal(Literal::Boolean(true)), Span::default())
        });

        let loop_span = condition.span.extend(body.span);
        let while_stmt = to_stmt(StmtType::While(condition, Box::new(body)), loop_span);

        // Prepend the initializer.
        let stmt_type = match init_stmt {
            Some(init) => StmtType::Block(vec![init, while_stmt]),
            None => while_stmt.stmt,
        };

        Ok(stmt_type)
    }

    /// Parse return statement.
    fn parse_return(&mut self) -> ParserResult<StmtType> {
        self.expect(Token::Return);
        let expr = if !self.check(Token::Semicolon) {
            Some(self.parse_expression()?)
        } else {
            None
        };
        self.consume(
            Token::Semicolon,
            ParserErrorType::ExpectedAfter(";", Item::ReturnValue),
        )?;
        Ok(StmtType::Return(expr))
    }

    fn parse_block_stmts(&mut self) -> ParserResult<Vec<Stmt>> {
        let mut stmts = vec![];

        while !self.check(Token::RightBrace) && !self.check(Token::EndOfFile) {
            if let Some(stmt) = self.parse_declaration_with_recovery() {
                stmts.push(stmt);
            }
        }

        if self.current.token != Token::EndOfFile {
            self.expect(Token::RightBrace);
            Ok(stmts)
        } else {
            Err(ParserError {
                span: self.current.span,
                error: ParserErrorType::UnclosedBrace,
            })
        }
    }

    /// Parse expression with precedence.
    pub fn parse_expression(&mut self) -> ParserResult<Expr> {
        self.run_pratt_parse_algo(Precedence::Lowest)
    }

    /// Pratt parsing algo.
    fn run_pratt_parse_algo(&mut self, min_precedence: Precedence) -> ParserResult<Expr> {
        let prefix_op = match &self.current.token {
            Token::Bang | Token::Not => Some(PrefixOperator::LogicalNot),
            Token::Minus => Some(PrefixOperator::Negate),
            _ => None,
        };

        let mut lhs = match prefix_op {
            Some(op) => {
                let curr_span = self.current.span;
                self.bump()?;
                let expr = self.run_pratt_parse_algo(Precedence::Unary)?;
                to_expr(
                    ExprType::Prefix(op, Box::new(expr)),
                    curr_span.extend(self.previous.span),
                )
            }
            None => self.parse_primary()?,
        };

        while let Some(op) = ParserOperator::from_token(&self.current.token) {
            if !op.is_higher_precedence(min_precedence) {
                break;
            }

            let op_span = self.current.span;

            if op != ParserOperator::Call {
                self.bump()?;
            }

            let precedence = op.precedence();
            let lhs_span = lhs.span;

            let new_lhs = match op {
                ParserOperator::Arithequal(op) => {
                    let rhs = self.run_pratt_parse_algo(precedence)?;
                    ExprType::Infix(op, Box::new(lhs), Box::new(rhs))
                }
                ParserOperator::Logical(op) => {
                    let rhs = self.run_pratt_parse_algo(precedence)?;
                    ExprType::Logical(op, Box::new(lhs), Box::new(rhs))
                }
                ParserOperator::Assignment => {
                    let rhs_box = Box::new(self.run_pratt_parse_algo(precedence)?);
                    match lhs.expr {
                        ExprType::Variable(var) => ExprType::Assignment(var, rhs_box),
                        other => {
                            // Record the error and keep the left-hand side, so
                            // the rest of the program still gets diagnosed.
                            self.emit_error(ParserError {
                                span: op_span,
                                error: ParserErrorType::ExpectedLValue,
                            });
                            other
                        }
                    }
                }
                ParserOperator::Call => {
                    let arguments = self.parse_func_args()?;
                    ExprType::Call(Box::new(lhs), arguments)
                }
            };

            lhs = to_expr(new_lhs, lhs_span.extend(self.previous.span));
        }

        Ok(lhs)
    }

    /// Parse primary token.
    fn parse_primary(&mut self) -> ParserResult<Expr> {
        self.bump()?;
        let curr_span = self.previous.span;

        let expr = match &self.previous.token {
            Token::Number(n) => from_literal(Literal::Number(*n)),
            Token::True => from_literal(Literal::Boolean(true)),
            Token::False => from_literal(Literal::Boolean(false)),
            Token::String(s) => from_literal(Literal::Str(s.to_owned())),
            Token::Null => from_literal(Literal::Null),
            Token::Identifier(name) => {
                ExprType::Variable(Identifier::new(name.to_owned(), curr_span))
            }
            Token::LeftParen => {
                let sub_expr = self.parse_expression()?;
                self.consume(
                    Token::RightParen,
                    ParserErrorType::ExpectedAfter(")", Item::Expression),
                )?;
                ExprType::Grouping(Box::new(sub_expr))
            }
            t => {
                return Err(ParserError {
                    span: curr_span,
                    error: ParserErrorType::ExpectedExpr(t.clone()),
                })
            }
        };

        Ok(to_expr(expr, curr_span.extend(self.previous.span)))
    }

    fn parse_identifier(&mut self, error: ParserErrorType) -> ParserResult<Identifier> {
        self.bump()?;
        match &self.previous.token {
            Token::Identifier(name) => Ok(Identifier::new(name.to_owned(), self.previous.span)),
            _ => Err(ParserError {
                span: self.previous.span,
                error,
            }),
        }
    }

    fn parse_comma_sep<T, F>(&mut self, parser: F) -> ParserResult<Vec<T>>
    where
        F: Fn(&mut Parser<'s>) -> ParserResult<T>,
    {
        let mut args = vec![];
        if self.check_consume(Token::RightParen)? {
            return Ok(args);
        }

        args.push(parser(self)?);

        while !self.check_consume(Token::RightParen)? {
            self.consume(Token::Comma, ParserErrorType::ExpectedCommaBetween)?;
            args.push(parser(self)?);
        }

        Ok(args)
    }

    /// Parse function args.
    fn parse_func_args(&mut self) -> ParserResult<Vec<Expr>> {
        self.expect(Token::LeftParen);
        let args = self.parse_comma_sep(Self::parse_expression)?;

        if let Some(extra_args) = args.get(MAX_FUNC_ARGS..) {
            for arg in extra_args.iter() {
                self.emit_error(ParserError {
                    span: arg.span,
                    error: ParserErrorType::TooManyArgs,
                });
            }
        }

        Ok(args)
    }

    fn parse_func_params(&mut self) -> ParserResult<Vec<Identifier>> {
        self.consume(
            Token::LeftParen,
            ParserErrorType::ExpectedAfter("(", Item::FunctionName),
        )?;

        let params = self
            .parse_comma_sep(|this| this.parse_identifier(ParserErrorType::ExpectedIdentifier))?;
        if let Some(extra_params) = params.get(MAX_FUNC_ARGS..) {
            for ident in extra_params.iter() {
                self.emit_error(ParserError {
                    span: ident.span,
                    error: ParserErrorType::TooManyParams,
                });
            }
        }

        Ok(params)
    }
}

fn from_literal(l: Literal) -> ExprType {
    ExprType::Literal(l)
}

fn to_stmt(stmt: StmtType, span: Span) -> Stmt {
    Stmt::new(stmt, span)
}

fn to_expr(expr: ExprType, span: Span) -> Expr {
    Expr::new(expr, span)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse_ok(source: &str) -> Tree {
        Parser::new(source).parse().expect("expected clean parse")
    }

    fn parse_err(source: &str) -> Vec<ParserError> {
        match Parser::new(source).parse() {
            Ok(_) => panic!("expected parse errors"),
            Err(errors) => errors,
        }
    }

    fn first_expr(tree: &Tree) -> &Expr {
        match &tree.stmts[0].stmt {
            StmtType::Expression(expr) => expr,
            other => panic!("expected expression statement, got {:?}", other),
        }
    }

    #[test]
    fn test_operator_precedence() {
        let tree = parse_ok("1 + 2 * 3;");
        assert_eq!(first_expr(&tree).ast_string(), "(+ 1 (* 2 3))");

        let tree = parse_ok("(1 + 2) * 3;");
        assert_eq!(first_expr(&tree).ast_string(), "(* (group (+ 1 2)) 3)");

        let tree = parse_ok("1 < 2 == true and false or 3 >= 4;");
        assert_eq!(
            first_expr(&tree).ast_string(),
            "(or (and (== (< 1 2) true) false) (>= 3 4))"
        );

        let tree = parse_ok("10 % 4 - 1;");
        assert_eq!(first_expr(&tree).ast_string(), "(- (% 10 4) 1)");
    }

    #[test]
    fn test_assignment_is_right_associative() {
        let tree = parse_ok("a = b = 1;");
        assert_eq!(first_expr(&tree).ast_string(), "(set a (set b 1))");
    }

    #[test]
    fn test_unary_operators() {
        let tree = parse_ok("not true;");
        assert_eq!(first_expr(&tree).ast_string(), "(! true)");

        let tree = parse_ok("-1 + 2;");
        assert_eq!(first_expr(&tree).ast_string(), "(+ (- 1) 2)");
    }

    #[test]
    fn test_call_chains() {
        let tree = parse_ok("f(1)(2, 3);");
        assert_eq!(first_expr(&tree).ast_string(), "(call (call f 1) 2 3)");
    }

    #[test]
    fn test_statement_count_matches_declarations() {
        let tree = parse_ok("create a = 1; create b; output(a); func f() { return; }");
        assert_eq!(tree.stmts.len(), 4);
    }

    #[test]
    fn test_variable_decl_without_initializer() {
        let tree = parse_ok("create x;");
        match &tree.stmts[0].stmt {
            StmtType::VariableDecl(name, init) => {
                assert_eq!(name.name, "x");
                assert!(init.is_none());
            }
            other => panic!("expected variable declaration, got {:?}", other),
        }
    }

    #[test]
    fn test_for_desugars_to_while() {
        let tree = parse_ok("for (create i = 0; i < 3; i = i + 1) output(i);");
        let stmts = match &tree.stmts[0].stmt {
            StmtType::Block(stmts) => stmts,
            other => panic!("expected block, got {:?}", other),
        };
        assert_eq!(stmts.len(), 2);
        assert!(matches!(stmts[0].stmt, StmtType::VariableDecl(_, _)));
        let (condition, body) = match &stmts[1].stmt {
            StmtType::While(condition, body) => (condition, body),
            other => panic!("expected while, got {:?}", other),
        };
        assert_eq!(condition.ast_string(), "(< i 3)");
        // Body is the original statement plus the increment.
        match &body.stmt {
            StmtType::Block(inner) => {
                assert_eq!(inner.len(), 2);
                assert!(matches!(inner[1].stmt, StmtType::Expression(_)));
            }
            other => panic!("expected desugared body block, got {:?}", other),
        }
    }

    #[test]
    fn test_for_without_condition_loops_on_true() {
        let tree = parse_ok("for (;;) output(1);");
        match &tree.stmts[0].stmt {
            StmtType::While(condition, _) => {
                assert_eq!(condition.ast_string(), "true");
            }
            other => panic!("expected while, got {:?}", other),
        }
    }

    #[test]
    fn test_invalid_assignment_target() {
        let errors = parse_err("1 = 2;");
        assert!(errors
            .iter()
            .any(|e| e.error == ParserErrorType::ExpectedLValue));
        assert!(errors[0].to_string().contains("Invalid assignment target."));
    }

    #[test]
    fn test_recovery_reports_multiple_errors() {
        let errors = parse_err("1 = 2;\ncreate ; \noutput(3);");
        assert_eq!(errors.len(), 2);
        assert_eq!(errors[1].span.line(), 2);
    }

    #[test]
    fn test_unterminated_string_fails_parse() {
        let errors = parse_err("output(\"oops);");
        assert!(errors
            .iter()
            .any(|e| matches!(e.error, ParserErrorType::IllegalToken(_))));
    }

    #[test]
    fn test_illegal_character_after_matched_token() {
        // The bad character sits right after a token the parser consumes
        // unconditionally; it must come back as an error, not a crash.
        for source in ["create x = @;", "f()@;", "for (;@; 1) output(1);"] {
            let errors = parse_err(source);
            assert!(
                errors
                    .iter()
                    .any(|e| matches!(e.error, ParserErrorType::IllegalToken(_))),
                "no illegal-token error for {:?}: {:?}",
                source,
                errors
            );
        }
    }

    #[test]
    fn test_unclosed_brace() {
        let errors = parse_err("{ output(1);");
        assert!(errors
            .iter()
            .any(|e| e.error == ParserErrorType::UnclosedBrace));
    }
}
