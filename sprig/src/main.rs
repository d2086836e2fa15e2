use anyhow::{Context, Result};
use clap::Parser;
use console::style;
use sprig_interp::{Config, Interpreter};
use sprig_parser::lexer::scan;
use sprig_parser::printer::print_program;
use sprig_source::{Report, ReportKind, Source, ToReport};
use std::fs;
use std::io::{self, BufRead, Stdout, Write};
use std::path::PathBuf;
use std::process;

/// Exit code for sources that do not compile.
const EXIT_COMPILE_ERROR: i32 = 65;
/// Exit code for sources that fail at runtime.
const EXIT_RUNTIME_ERROR: i32 = 70;

/// sprig is a small dynamically typed scripting language.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Script to run. Starts an interactive prompt when omitted.
    file: Option<PathBuf>,

    /// Print the tokens of the source instead of running it.
    #[arg(long)]
    tokens: bool,

    /// Print the syntax tree of the source, in canonical form, instead of running it.
    #[arg(long)]
    ast: bool,

    /// JSON file with interpreter settings. Flags override its values.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Maximum number of iterations of a single loop. 0 disables the limit.
    #[arg(long)]
    max_loop_iterations: Option<usize>,

    /// Maximum depth of nested function calls.
    #[arg(long)]
    max_call_depth: Option<usize>,

    /// Allow top-level declarations to replace builtin functions.
    #[arg(long)]
    allow_builtin_shadowing: bool,
}

impl Args {
    fn interpreter_config(&self) -> Result<Config> {
        let mut config = match &self.config {
            Some(path) => {
                let content = fs::read_to_string(path)
                    .with_context(|| format!("Failed to read config file '{}'", path.display()))?;
                serde_json::from_str(&content)
                    .with_context(|| format!("Invalid config file '{}'", path.display()))?
            }
            None => Config::default(),
        };

        if let Some(max) = self.max_loop_iterations {
            config = config.with_max_loop_iterations(max);
        }
        if let Some(max) = self.max_call_depth {
            config = config.with_max_call_depth(max);
        }
        if self.allow_builtin_shadowing {
            config = config.with_builtin_shadowing(true);
        }
        Ok(config)
    }
}

fn main() -> Result<()> {
    env_logger::init();

    let args = Args::parse();
    let config = args.interpreter_config()?;
    log::debug!("using {:?}", config);

    let mut interpreter = sprig::new_interpreter(config, io::stdout());
    match &args.file {
        Some(path) => {
            let source = fs::read_to_string(path)
                .with_context(|| format!("Failed to read the input file '{}'", path.display()))?;
            if let Err(code) = exec(&args, &mut interpreter, &source) {
                process::exit(code);
            }
        }
        None => repl(&args, &mut interpreter)?,
    }

    Ok(())
}

/// Reads one line at a time and runs it. Globals persist between lines.
fn repl(args: &Args, interpreter: &mut Interpreter<Stdout>) -> Result<()> {
    let mut stdout = io::stdout();
    let mut lines = io::stdin().lock();
    loop {
        print!("> ");
        stdout.flush()?;

        let mut input = String::new();
        if lines.read_line(&mut input)? == 0 {
            println!();
            return Ok(());
        }
        if input.trim().is_empty() {
            continue;
        }

        // errors have already been printed
        let _ = exec(args, interpreter, &input);
    }
}

/// Processes `source` as requested by `args`. Returns the process exit code on failure.
fn exec(args: &Args, interpreter: &mut Interpreter<Stdout>, source: &str) -> Result<(), i32> {
    if args.tokens {
        let (tokens, errors) = scan(source);
        for token in &tokens {
            println!(
                "{:>4}:{:<4} {:<14} {}",
                token.line, token.column, token.ty, token.lexeme
            );
        }
        let reports: Vec<Report> = errors.iter().map(ToReport::to_report).collect();
        return check(&reports, EXIT_COMPILE_ERROR);
    }

    if args.ast {
        let source = Source::new(source);
        return match sprig::compile(&source) {
            Some(program) => {
                print!("{}", print_program(&program));
                Ok(())
            }
            None => check(&source.errors.reports(), EXIT_COMPILE_ERROR),
        };
    }

    match sprig::run(interpreter, source) {
        Ok(()) => Ok(()),
        Err(reports) => {
            let code = match reports.first().map(|report| report.kind) {
                Some(ReportKind::Runtime) => EXIT_RUNTIME_ERROR,
                _ => EXIT_COMPILE_ERROR,
            };
            check(&reports, code)
        }
    }
}

/// Prints `reports` to stderr. Fails with `code` if there are any.
fn check(reports: &[Report], code: i32) -> Result<(), i32> {
    for report in reports {
        eprintln!("{}", style(report).red());
    }
    if reports.is_empty() {
        Ok(())
    } else {
        Err(code)
    }
}
