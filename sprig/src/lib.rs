pub mod builtin_functions;

use sprig_interp::{Config, Interpreter};
use sprig_parser::ast::Program;
use sprig_parser::lexer::scan;
use sprig_parser::parser::Parser;
use sprig_source::{Report, Source, ToReport};
use std::io::Write;

/// Lexes and parses `source`. Every lexer and parser error is added to `source.errors`.
/// Returns `None` if there was any error.
pub fn compile(source: &Source) -> Option<Program> {
    let (tokens, lexer_errors) = scan(source.content);
    log::debug!("scanned {} tokens", tokens.len());
    for err in &lexer_errors {
        source.errors.add_error(err);
    }

    // parse even after lexer errors so that syntax errors are reported in the same pass
    match Parser::new(tokens).parse_program() {
        Ok(program) if lexer_errors.is_empty() => Some(program),
        Ok(_) => None,
        Err(parse_errors) => {
            for err in &parse_errors {
                source.errors.add_error(err);
            }
            None
        }
    }
}

/// Runs `source` through the whole pipeline on `interpreter`.
///
/// Returns every lexer and parser report if the source does not compile, in which case nothing is evaluated.
/// Otherwise returns the report of the runtime error that aborted evaluation, if any.
pub fn run<W: Write>(interpreter: &mut Interpreter<W>, source: &str) -> Result<(), Vec<Report>> {
    let source = Source::new(source);
    let program = match compile(&source) {
        Some(program) => program,
        None => return Err(source.errors.reports()),
    };

    interpreter
        .interpret(&program)
        .map_err(|err| vec![err.to_report()])
}

/// Create an interpreter writing to `output`, with [`builtin_functions::default_builtin_vars`] installed.
pub fn new_interpreter<W: Write>(config: Config, output: W) -> Interpreter<W> {
    let mut interpreter = Interpreter::new(config, output);
    interpreter.install_builtins(&builtin_functions::default_builtin_vars());
    interpreter
}
