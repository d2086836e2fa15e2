//! Tree-walking evaluator.

use crate::callable::Callable;
use crate::config::Config;
use sprig_parser::ast::{Expr, FunctionDecl, LiteralValue, Program, Stmt};
use sprig_parser::token::{Token, TokenType};
use sprig_value::{BuiltinVars, EnvRef, Environment, RuntimeError, ScriptFunction, Value};
use std::collections::HashSet;
use std::io::{self, Write};
use std::rc::Rc;

/// Native stack a single [`Interpreter::interpret`] may use before calls and operators fail with
/// `Stack overflow.`. Leaves headroom on a default 2 MiB thread.
pub const STACK_BUDGET: usize = 1536 * 1024;

/// How a statement completed.
#[derive(Debug, Clone, PartialEq)]
pub enum Flow {
    /// Execution continues with the next statement.
    Normal,
    /// A `return` statement is unwinding to the nearest enclosing call.
    Return(Value),
}

pub type ExecResult = Result<Flow, RuntimeError>;
pub type EvalResult = Result<Value, RuntimeError>;

pub struct Interpreter<W: Write = io::Stdout> {
    config: Config,
    globals: EnvRef,
    /// The innermost scope. Always a descendant of (or equal to) `globals`.
    environment: EnvRef,
    /// Names installed by [`Interpreter::install_builtins`].
    builtins: HashSet<String>,
    call_depth: usize,
    /// Stack address at the start of the outermost [`Interpreter::interpret`].
    stack_base: Option<usize>,
    output: W,
}

impl<W: Write> Interpreter<W> {
    pub fn new(config: Config, output: W) -> Self {
        let globals = Environment::new().into_ref();
        Self {
            config,
            environment: Rc::clone(&globals),
            globals,
            builtins: HashSet::new(),
            call_depth: 0,
            stack_base: None,
            output,
        }
    }

    /// Defines every builtin in the global scope and marks their names as reserved.
    pub fn install_builtins(&mut self, builtins: &BuiltinVars) {
        builtins.install(&mut self.globals.borrow_mut());
        self.builtins
            .extend(builtins.values.iter().map(|(ident, _)| ident.clone()));
    }

    /// The global scope. Persists across calls to [`Interpreter::interpret`].
    pub fn globals(&self) -> &EnvRef {
        &self.globals
    }

    pub fn output(&self) -> &W {
        &self.output
    }

    pub fn into_output(self) -> W {
        self.output
    }

    /// Executes every statement of `program` in order. Stops at the first runtime error.
    pub fn interpret(&mut self, program: &Program) -> Result<(), RuntimeError> {
        log::debug!("interpreting {} statements", program.statements.len());

        let outermost = self.stack_base.is_none();
        if outermost {
            self.stack_base = Some(stack_address());
        }
        let result = self.execute_program(program);
        if outermost {
            self.stack_base = None;
        }

        if let Err(err) = &result {
            log::debug!("runtime error: {}", err);
            self.environment = Rc::clone(&self.globals);
            self.call_depth = 0;
        }
        result
    }

    fn execute_program(&mut self, program: &Program) -> Result<(), RuntimeError> {
        for stmt in &program.statements {
            // top-level returns are rejected by the parser
            if let Flow::Return(_) = self.execute(stmt)? {
                break;
            }
        }
        Ok(())
    }

    /// Executes `statements` with `environment` as the innermost scope.
    /// The previous scope is restored afterwards, whether or not execution succeeded.
    pub fn execute_block(&mut self, statements: &[Stmt], environment: EnvRef) -> ExecResult {
        self.with_environment(environment, |interpreter| {
            for stmt in statements {
                if let Flow::Return(value) = interpreter.execute(stmt)? {
                    return Ok(Flow::Return(value));
                }
            }
            Ok(Flow::Normal)
        })
    }

    fn with_environment<T>(
        &mut self,
        environment: EnvRef,
        f: impl FnOnce(&mut Self) -> Result<T, RuntimeError>,
    ) -> Result<T, RuntimeError> {
        let previous = std::mem::replace(&mut self.environment, environment);
        let result = f(self);
        self.environment = previous;
        result
    }

    /// A fresh scope nested in the current one.
    fn child_environment(&self) -> EnvRef {
        Environment::new_enclosed(Rc::clone(&self.environment)).into_ref()
    }

    /// Fails once the native stack used since [`Interpreter::interpret`] started exceeds [`STACK_BUDGET`].
    fn check_stack(&self, token: &Token) -> Result<(), RuntimeError> {
        match self.stack_base {
            Some(base) if base.abs_diff(stack_address()) > STACK_BUDGET => {
                Err(RuntimeError::new(token, "Stack overflow."))
            }
            _ => Ok(()),
        }
    }

    pub fn execute(&mut self, stmt: &Stmt) -> ExecResult {
        match stmt {
            Stmt::Block(statements) => {
                let environment = self.child_environment();
                self.execute_block(statements, environment)
            }
            Stmt::Expression(expr) => {
                self.evaluate(expr)?;
                Ok(Flow::Normal)
            }
            Stmt::Print { keyword, value } => {
                let value = self.evaluate(value)?;
                writeln!(self.output, "{}", value).map_err(|err| {
                    RuntimeError::new(keyword, format!("Could not write output: {}.", err))
                })?;
                Ok(Flow::Normal)
            }
            Stmt::If {
                condition,
                then_branch,
                else_branch,
            } => {
                if self.evaluate(condition)?.is_truthy() {
                    self.execute(then_branch)
                } else if let Some(else_branch) = else_branch {
                    self.execute(else_branch)
                } else {
                    Ok(Flow::Normal)
                }
            }
            Stmt::While {
                keyword,
                condition,
                body,
            } => self.execute_while(keyword, condition, body),
            Stmt::For {
                keyword,
                initializer,
                condition,
                increment,
                body,
            } => self.execute_for(
                keyword,
                initializer.as_deref(),
                condition.as_ref(),
                increment.as_ref(),
                body,
            ),
            Stmt::Let {
                name,
                initializer,
                is_const,
            } => {
                self.define_variable(name, initializer.as_ref(), *is_const)?;
                Ok(Flow::Normal)
            }
            Stmt::Return { value, .. } => {
                let value = match value {
                    Some(value) => self.evaluate(value)?,
                    None => Value::Nil,
                };
                Ok(Flow::Return(value))
            }
            Stmt::Function(declaration) => {
                self.define_function(declaration)?;
                Ok(Flow::Normal)
            }
        }
    }

    fn execute_while(&mut self, keyword: &Token, condition: &Expr, body: &Stmt) -> ExecResult {
        self.check_stack(keyword)?;
        let mut iterations = 0;
        while self.evaluate(condition)?.is_truthy() {
            self.count_iteration(keyword, &mut iterations)?;
            if let Flow::Return(value) = self.execute(body)? {
                return Ok(Flow::Return(value));
            }
        }
        Ok(Flow::Normal)
    }

    fn execute_for(
        &mut self,
        keyword: &Token,
        initializer: Option<&Stmt>,
        condition: Option<&Expr>,
        increment: Option<&Expr>,
        body: &Stmt,
    ) -> ExecResult {
        self.check_stack(keyword)?;
        let environment = self.child_environment();
        self.with_environment(environment, |interpreter| {
            if let Some(initializer) = initializer {
                interpreter.execute(initializer)?;
            }

            let mut iterations = 0;
            loop {
                if let Some(condition) = condition {
                    if !interpreter.evaluate(condition)?.is_truthy() {
                        break;
                    }
                }
                interpreter.count_iteration(keyword, &mut iterations)?;
                if let Flow::Return(value) = interpreter.execute(body)? {
                    return Ok(Flow::Return(value));
                }
                if let Some(increment) = increment {
                    interpreter.evaluate(increment)?;
                }
            }
            Ok(Flow::Normal)
        })
    }

    fn define_variable(
        &mut self,
        name: &Token,
        initializer: Option<&Expr>,
        is_const: bool,
    ) -> Result<(), RuntimeError> {
        self.check_builtin_shadowing(name)?;
        let value = match initializer {
            Some(initializer) => self.evaluate(initializer)?,
            None => Value::Nil,
        };

        let mut environment = self.environment.borrow_mut();
        if is_const {
            environment.define_const(name.lexeme.clone(), value);
        } else {
            environment.define(name.lexeme.clone(), value);
        }
        Ok(())
    }

    fn define_function(&mut self, declaration: &Rc<FunctionDecl>) -> Result<(), RuntimeError> {
        self.check_builtin_shadowing(&declaration.name)?;
        log::trace!("defining function {}", declaration.name.lexeme);

        let function = ScriptFunction::new(Rc::clone(declaration), Rc::clone(&self.environment));
        self.environment.borrow_mut().define(
            declaration.name.lexeme.clone(),
            Value::Function(Rc::new(function)),
        );
        Ok(())
    }

    /// Fails if `name` would replace a builtin in the global scope and shadowing is not allowed.
    fn check_builtin_shadowing(&self, name: &Token) -> Result<(), RuntimeError> {
        if !self.config.allow_builtin_shadowing
            && Rc::ptr_eq(&self.environment, &self.globals)
            && self.builtins.contains(&name.lexeme)
        {
            return Err(RuntimeError::new(
                name,
                format!("Cannot redefine builtin '{}'.", name.lexeme),
            ));
        }
        Ok(())
    }

    /// Records one more pass through a loop body. `iterations` is the number of passes already made.
    fn count_iteration(&self, keyword: &Token, iterations: &mut usize) -> Result<(), RuntimeError> {
        let max = self.config.max_loop_iterations;
        if max != 0 && *iterations >= max {
            return Err(RuntimeError::new(
                keyword,
                format!("Loop exceeded maximum of {} iterations.", max),
            ));
        }
        *iterations += 1;
        Ok(())
    }

    pub fn evaluate(&mut self, expr: &Expr) -> EvalResult {
        match expr {
            Expr::Literal(literal) => Ok(match literal {
                LiteralValue::Number(val) => Value::Number(*val),
                LiteralValue::Str(val) => Value::from(val.as_str()),
                LiteralValue::Bool(val) => Value::Bool(*val),
                LiteralValue::Nil => Value::Nil,
            }),
            Expr::Grouping(inner) => self.evaluate(inner),
            Expr::Identifier(name) => self.environment.borrow().get(name),
            Expr::Assignment { name, value } => self.eval_assignment(name, value),
            Expr::Unary { operator, operand } => self.eval_unary(operator, operand),
            Expr::Binary {
                left,
                operator,
                right,
            } => self.eval_binary(left, operator, right),
            Expr::Logical {
                left,
                operator,
                right,
            } => self.eval_logical(left, operator, right),
            Expr::Call {
                callee,
                paren,
                arguments,
            } => self.eval_call(callee, paren, arguments),
        }
    }

    fn eval_assignment(&mut self, name: &Token, value: &Expr) -> EvalResult {
        self.check_stack(name)?;
        let value = self.evaluate(value)?;
        self.environment.borrow_mut().assign(name, value.clone())?;
        Ok(value)
    }

    fn eval_unary(&mut self, operator: &Token, operand: &Expr) -> EvalResult {
        self.check_stack(operator)?;
        let operand = self.evaluate(operand)?;
        match operator.ty {
            TokenType::Minus => match operand {
                Value::Number(val) => Ok(Value::Number(-val)),
                _ => Err(RuntimeError::new(operator, "Operand must be a number.")),
            },
            TokenType::Bang => Ok(Value::Bool(!operand.is_truthy())),
            _ => Err(unknown_operator("unary", operator)),
        }
    }

    fn eval_binary(&mut self, left: &Expr, operator: &Token, right: &Expr) -> EvalResult {
        self.check_stack(operator)?;
        let left = self.evaluate(left)?;
        let right = self.evaluate(right)?;
        binary_op(operator, left, right)
    }

    fn eval_logical(&mut self, left: &Expr, operator: &Token, right: &Expr) -> EvalResult {
        self.check_stack(operator)?;
        let left = self.evaluate(left)?;
        let decided = match operator.ty {
            TokenType::Or => left.is_truthy(),
            TokenType::And => !left.is_truthy(),
            _ => return Err(unknown_operator("logical", operator)),
        };
        if decided {
            Ok(left)
        } else {
            self.evaluate(right)
        }
    }

    fn eval_call(&mut self, callee: &Expr, paren: &Token, arguments: &[Expr]) -> EvalResult {
        self.check_stack(paren)?;
        let callee = self.evaluate(callee)?;
        let arguments = arguments
            .iter()
            .map(|argument| self.evaluate(argument))
            .collect::<Result<Vec<_>, _>>()?;
        self.call_value(callee, paren, arguments)
    }

    /// Calls `callee` with already evaluated `arguments`.
    pub fn call_value(&mut self, callee: Value, paren: &Token, arguments: Vec<Value>) -> EvalResult {
        match callee {
            Value::Function(function) => {
                log::trace!("calling <fn {}>", function.name());
                self.call_checked(function.as_ref(), paren, arguments)
            }
            Value::Native(native) => {
                log::trace!("calling <native fn {}>", native.ident);
                self.call_checked(native.as_ref(), paren, arguments)
            }
            _ => Err(RuntimeError::new(paren, "Can only call functions.")),
        }
    }

    fn call_checked(
        &mut self,
        callable: &impl Callable,
        paren: &Token,
        arguments: Vec<Value>,
    ) -> EvalResult {
        if arguments.len() != callable.arity() {
            return Err(RuntimeError::new(
                paren,
                format!(
                    "Expected {} arguments but got {}.",
                    callable.arity(),
                    arguments.len()
                ),
            ));
        }
        if self.call_depth >= self.config.max_call_depth {
            return Err(RuntimeError::new(paren, "Stack overflow."));
        }
        self.check_stack(paren)?;

        self.call_depth += 1;
        let result = callable.call(self, paren, arguments);
        self.call_depth -= 1;
        result
    }
}

/// Address of a local in a fresh frame. Only meaningful relative to another call.
#[inline(never)]
fn stack_address() -> usize {
    let marker = 0u8;
    std::hint::black_box(&marker) as *const u8 as usize
}

fn unknown_operator(kind: &str, operator: &Token) -> RuntimeError {
    RuntimeError::new(
        operator,
        format!("Unknown {} operator '{}'.", kind, operator.lexeme),
    )
}

fn binary_op(operator: &Token, left: Value, right: Value) -> EvalResult {
    use TokenType::*;

    match operator.ty {
        EqualEqual => return Ok(Value::Bool(left == right)),
        BangEqual => return Ok(Value::Bool(left != right)),
        Plus => {
            return match (left, right) {
                (Value::Number(l), Value::Number(r)) => Ok(Value::Number(l + r)),
                (Value::Str(l), Value::Str(r)) => {
                    let mut concat = String::with_capacity(l.len() + r.len());
                    concat.push_str(&l);
                    concat.push_str(&r);
                    Ok(Value::from(concat))
                }
                _ => Err(RuntimeError::new(
                    operator,
                    "Operands must be two numbers or two strings.",
                )),
            }
        }
        Minus | Star | Slash | Percent | Greater | GreaterEqual | Less | LessEqual => {}
        _ => return Err(unknown_operator("binary", operator)),
    }

    let (l, r) = match (left, right) {
        (Value::Number(l), Value::Number(r)) => (l, r),
        _ => return Err(RuntimeError::new(operator, "Operands must be numbers.")),
    };
    Ok(match operator.ty {
        Minus => Value::Number(l - r),
        Star => Value::Number(l * r),
        Slash => Value::Number(l / r),
        Percent => Value::Number(l % r),
        Greater => Value::Bool(l > r),
        GreaterEqual => Value::Bool(l >= r),
        Less => Value::Bool(l < r),
        _ => Value::Bool(l <= r),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use sprig_parser::lexer::scan;
    use sprig_parser::parser::Parser;

    fn parse(source: &str) -> Program {
        let (tokens, errors) = scan(source);
        assert!(errors.is_empty(), "{:?}", errors);
        Parser::new(tokens).parse_program().unwrap()
    }

    fn run_with(config: Config, source: &str) -> (Result<(), RuntimeError>, String) {
        let mut interpreter = Interpreter::new(config, Vec::new());
        let result = interpreter.interpret(&parse(source));
        let output = String::from_utf8(interpreter.into_output()).unwrap();
        (result, output)
    }

    fn run(source: &str) -> String {
        let (result, output) = run_with(Config::default(), source);
        result.unwrap();
        output
    }

    fn run_err(source: &str) -> RuntimeError {
        run_with(Config::default(), source).0.unwrap_err()
    }

    #[test]
    fn test_arithmetic() {
        assert_eq!(run("print 1 + 2 * 3;"), "7\n");
        assert_eq!(run("print (1 + 2) * 3;"), "9\n");
        assert_eq!(run("print 7 % 4;"), "3\n");
        assert_eq!(run("print -(3 - 5);"), "2\n");
        assert_eq!(run("print 1 / 0;"), "inf\n");
        assert_eq!(run("print 1 / 4;"), "0.25\n");
    }

    #[test]
    fn test_comparison_and_equality() {
        assert_eq!(run("print 1 < 2;"), "true\n");
        assert_eq!(run("print 2 <= 1;"), "false\n");
        assert_eq!(run("print 1 == 1;"), "true\n");
        assert_eq!(run("print \"1\" == 1;"), "false\n");
        assert_eq!(run("print nil != false;"), "true\n");
        assert_eq!(run("print \"a\" == \"a\";"), "true\n");
    }

    #[test]
    fn test_string_concat() {
        assert_eq!(run("print \"foo\" + \"bar\";"), "foobar\n");
        let err = run_err("print \"foo\" + 1;");
        assert_eq!(err.message, "Operands must be two numbers or two strings.");
    }

    #[test]
    fn test_type_errors() {
        assert_eq!(run_err("print 1 - \"a\";").message, "Operands must be numbers.");
        assert_eq!(run_err("print true < 1;").message, "Operands must be numbers.");
        assert_eq!(run_err("print -\"a\";").message, "Operand must be a number.");
    }

    #[test]
    fn test_truthiness() {
        assert_eq!(run("print !0;"), "false\n");
        assert_eq!(run("print !\"\";"), "false\n");
        assert_eq!(run("print !nil;"), "true\n");
        assert_eq!(run("if (0) print \"yes\"; else print \"no\";"), "yes\n");
    }

    #[test]
    fn test_logical_yields_deciding_operand() {
        assert_eq!(run("print nil or \"default\";"), "default\n");
        assert_eq!(run("print 1 or 2;"), "1\n");
        assert_eq!(run("print nil and 2;"), "nil\n");
        assert_eq!(run("print 1 and 2;"), "2\n");
    }

    #[test]
    fn test_short_circuit() {
        let output = run(
            r#"
            let calls = 0;
            fun bump() { calls = calls + 1; return true; }
            false and bump();
            true or bump();
            print calls;"#,
        );
        assert_eq!(output, "0\n");
    }

    #[test]
    fn test_block_scoping() {
        let output = run(
            r#"
            let a = "global";
            {
                let a = "inner";
                print a;
            }
            print a;"#,
        );
        assert_eq!(output, "inner\nglobal\n");
    }

    #[test]
    fn test_scope_restored_after_error() {
        let mut interpreter = Interpreter::new(Config::default(), Vec::new());
        let err = interpreter
            .interpret(&parse("{ let inner = 1; undefined; }"))
            .unwrap_err();
        assert_eq!(err.message, "Undefined variable 'undefined'.");
        assert!(Rc::ptr_eq(&interpreter.environment, interpreter.globals()));
        assert_eq!(interpreter.globals().borrow().get_by_name("inner"), None);
    }

    #[test]
    fn test_assignment() {
        assert_eq!(run("let x = 1; x = 2; print x;"), "2\n");
        assert_eq!(run("let x; let y; x = y = 3; print x + y;"), "6\n");
        let err = run_err("y = 1;");
        assert_eq!(err.message, "Undefined variable 'y'.");
        assert_eq!(err.line(), 1);
    }

    #[test]
    fn test_const() {
        let err = run_err("const x = 1;\nx = 2;");
        assert_eq!(err.message, "Cannot assign to constant 'x'.");
        assert_eq!(err.line(), 2);
    }

    #[test]
    fn test_while_and_for() {
        assert_eq!(run("let i = 0; while (i < 3) { print i; i = i + 1; }"), "0\n1\n2\n");
        assert_eq!(run("for (let i = 0; i < 3; i = i + 1) print i;"), "0\n1\n2\n");
        // loop variable is scoped to the loop
        let err = run_err("for (let i = 0; i < 1; i = i + 1) {} print i;");
        assert_eq!(err.message, "Undefined variable 'i'.");
    }

    #[test]
    fn test_loop_iteration_cap() {
        let (result, output) = run_with(
            Config::default().with_max_loop_iterations(3),
            "let n = 0; while (true) { n = n + 1; print n; }",
        );
        assert_eq!(output, "1\n2\n3\n");
        assert_eq!(
            result.unwrap_err().message,
            "Loop exceeded maximum of 3 iterations."
        );

        // exactly at the cap is fine
        let (result, output) = run_with(
            Config::default().with_max_loop_iterations(3),
            "for (let i = 0; i < 3; i = i + 1) print i;",
        );
        result.unwrap();
        assert_eq!(output, "0\n1\n2\n");
    }

    #[test]
    fn test_loop_counter_is_per_execution() {
        let (result, output) = run_with(
            Config::default().with_max_loop_iterations(2),
            r#"
            fun twice() { let i = 0; while (i < 2) i = i + 1; return i; }
            print twice();
            print twice();"#,
        );
        result.unwrap();
        assert_eq!(output, "2\n2\n");
    }

    #[test]
    fn test_unlimited_loops() {
        let (result, output) = run_with(
            Config::default().with_max_loop_iterations(0),
            "let i = 0; while (i < 20000) i = i + 1; print i;",
        );
        result.unwrap();
        assert_eq!(output, "20000\n");
    }

    #[test]
    fn test_functions() {
        assert_eq!(run("fun add(a, b) { return a + b; } print add(2, 3);"), "5\n");
        assert_eq!(run("fun noop() {} print noop();"), "nil\n");
        assert_eq!(run("fun f() { return; } print f();"), "nil\n");
        assert_eq!(run("fun f() {} print f;"), "<fn f>\n");
    }

    #[test]
    fn test_return_unwinds_loops() {
        let output = run(
            r#"
            fun first_over(limit) {
                for (let i = 0; ; i = i + 1) {
                    while (true) {
                        if (i * i > limit) return i;
                        i = i + 1;
                    }
                }
            }
            print first_over(50);"#,
        );
        assert_eq!(output, "8\n");
    }

    #[test]
    fn test_recursion() {
        let output = run(
            r#"
            fun fib(n) {
                if (n < 2) return n;
                return fib(n - 1) + fib(n - 2);
            }
            print fib(15);"#,
        );
        assert_eq!(output, "610\n");
    }

    #[test]
    fn test_closures() {
        let output = run(
            r#"
            fun make_counter() {
                let count = 0;
                fun counter() {
                    count = count + 1;
                    return count;
                }
                return counter;
            }
            let counter = make_counter();
            counter();
            counter();
            print counter();"#,
        );
        assert_eq!(output, "3\n");
    }

    #[test]
    fn test_closure_sees_later_updates() {
        let output = run(
            r#"
            let x = 1;
            fun get() { return x; }
            x = 2;
            print get();"#,
        );
        assert_eq!(output, "2\n");
    }

    #[test]
    fn test_call_errors() {
        let err = run_err("fun f(a) {}\nf(1, 2);");
        assert_eq!(err.message, "Expected 1 arguments but got 2.");
        assert_eq!(err.line(), 2);
        assert_eq!(run_err("\"not a fn\"();").message, "Can only call functions.");
    }

    #[test]
    fn test_stack_overflow() {
        let (result, _) = run_with(
            Config::default().with_max_call_depth(32),
            "fun recurse(n) { return recurse(n + 1); } recurse(0);",
        );
        assert_eq!(result.unwrap_err().message, "Stack overflow.");

        let (result, output) = run_with(
            Config::default().with_max_call_depth(32),
            "fun depth(n) { if (n == 0) return 0; return depth(n - 1); } print depth(31);",
        );
        result.unwrap();
        assert_eq!(output, "0\n");
    }

    #[test]
    fn test_runaway_recursion_stays_within_stack_budget() {
        let handle = std::thread::Builder::new()
            .stack_size(2 * 1024 * 1024)
            .spawn(|| {
                let (result, _) = run_with(
                    Config::default().with_max_call_depth(usize::MAX),
                    "fun recurse(n) { return 1 + recurse(n + 1); }\nrecurse(0);",
                );
                result.unwrap_err()
            })
            .unwrap();
        let err = handle.join().unwrap();
        assert_eq!(err.message, "Stack overflow.");
        assert_eq!(err.line(), 1);
    }

    fn token(ty: TokenType, lexeme: &str) -> Token {
        Token::new(ty, lexeme, None, 1, 1)
    }

    fn number(val: f64) -> Box<Expr> {
        Box::new(Expr::Literal(LiteralValue::Number(val)))
    }

    #[test]
    fn test_unknown_operators() {
        let mut interpreter = Interpreter::new(Config::default(), Vec::new());

        let unary = Expr::Unary {
            operator: token(TokenType::Plus, "+"),
            operand: number(1.0),
        };
        assert_eq!(
            interpreter.evaluate(&unary).unwrap_err().message,
            "Unknown unary operator '+'."
        );

        let binary = Expr::Binary {
            left: number(1.0),
            operator: token(TokenType::Comma, ","),
            right: number(2.0),
        };
        assert_eq!(
            interpreter.evaluate(&binary).unwrap_err().message,
            "Unknown binary operator ','."
        );

        let logical = Expr::Logical {
            left: number(1.0),
            operator: token(TokenType::Plus, "+"),
            right: number(2.0),
        };
        assert_eq!(
            interpreter.evaluate(&logical).unwrap_err().message,
            "Unknown logical operator '+'."
        );
    }

    fn answer(_args: &[Value]) -> Result<Value, String> {
        Ok(Value::Number(42.0))
    }

    fn fail(_args: &[Value]) -> Result<Value, String> {
        Err("native failure".to_string())
    }

    fn with_builtins(config: Config) -> Interpreter<Vec<u8>> {
        let mut builtins = BuiltinVars::new();
        builtins.add_native_fn("answer", answer, 0);
        builtins.add_native_fn("fail", fail, 0);
        let mut interpreter = Interpreter::new(config, Vec::new());
        interpreter.install_builtins(&builtins);
        interpreter
    }

    #[test]
    fn test_native_functions() {
        let mut interpreter = with_builtins(Config::default());
        interpreter
            .interpret(&parse("print answer(); print answer;"))
            .unwrap();
        assert_eq!(interpreter.output(), b"42\n<native fn answer>\n");

        let err = interpreter.interpret(&parse("\n\nfail();")).unwrap_err();
        assert_eq!(err.message, "native failure");
        assert_eq!(err.line(), 3);
    }

    #[test]
    fn test_builtin_shadowing() {
        let mut interpreter = with_builtins(Config::default());
        let err = interpreter.interpret(&parse("let answer = 1;")).unwrap_err();
        assert_eq!(err.message, "Cannot redefine builtin 'answer'.");
        let err = interpreter.interpret(&parse("fun answer() {}")).unwrap_err();
        assert_eq!(err.message, "Cannot redefine builtin 'answer'.");

        // local scopes may shadow
        interpreter
            .interpret(&parse("{ let answer = 1; print answer; }"))
            .unwrap();
        assert_eq!(interpreter.output(), b"1\n");

        let mut interpreter = with_builtins(Config::default().with_builtin_shadowing(true));
        interpreter
            .interpret(&parse("let answer = 1; print answer;"))
            .unwrap();
        assert_eq!(interpreter.output(), b"1\n");
    }

    #[test]
    fn test_globals_persist_between_runs() {
        let mut interpreter = Interpreter::new(Config::default(), Vec::new());
        interpreter.interpret(&parse("let x = 40;")).unwrap();
        interpreter.interpret(&parse("x = x + 2;")).unwrap();
        assert_eq!(
            interpreter.globals().borrow().get_by_name("x"),
            Some(Value::Number(42.0))
        );
    }
}
