//! `rpal [-ast] [-st] <file>` — §6 External Interfaces.

use std::path::PathBuf;
use std::process::ExitCode;
use std::rc::Rc;

use clap::Parser as ClapParser;

use rpal::common::source::Source;
use rpal::compiler::{lex::Lexer, parse::Parser, standardize::Standardizer};
use rpal::utils::pretty;

/// An interpreter for RPAL, evaluated by a Control/Stack/Environment machine.
#[derive(ClapParser, Debug)]
#[command(name = "rpal")]
struct Cli {
    /// Print the parse tree in dotted pre-order form instead of running it.
    #[arg(long = "ast")]
    ast: bool,

    /// Print the standardized tree in dotted pre-order form instead of running it.
    #[arg(long = "st")]
    st: bool,

    /// The RPAL source file to read.
    file: PathBuf,
}

/// The spec's CLI grammar uses single-dash long flags (`-ast`, `-st`),
/// the older getopt convention rather than clap's GNU-style `--ast`.
/// Normalize them before handing argv to clap, rather than bending
/// clap's parser to a one-off prefix.
fn normalize_args(args: impl Iterator<Item = String>) -> Vec<String> {
    args.map(|arg| match arg.as_str() {
        "-ast" => "--ast".to_string(),
        "-st" => "--st".to_string(),
        other => other.to_string(),
    })
    .collect()
}

fn main() -> ExitCode {
    env_logger::init();
    let cli = Cli::parse_from(normalize_args(std::env::args()));

    let source = match Source::path(&cli.file) {
        Ok(source) => Rc::new(source),
        Err(e) => {
            eprintln!("Error: could not read '{}': {}", cli.file.display(), e);
            return ExitCode::FAILURE;
        }
    };

    log::debug!("loaded {} ({} bytes)", source.name(), source.contents.len());

    let tokens = match Lexer::lex(Rc::clone(&source)) {
        Ok(tokens) => tokens,
        Err(e) => {
            eprintln!("{}", e);
            return ExitCode::FAILURE;
        }
    };

    let ast = match Parser::parse(tokens) {
        Ok(ast) => ast,
        Err(e) => {
            eprintln!("{}", e);
            return ExitCode::FAILURE;
        }
    };

    if cli.ast {
        println!("{}", pretty::render(&ast));
        return ExitCode::SUCCESS;
    }

    let standard = match Standardizer::standardize(ast) {
        Ok(standard) => standard,
        Err(e) => {
            eprintln!("{}", e);
            return ExitCode::FAILURE;
        }
    };

    if cli.st {
        println!("{}", pretty::render(&standard));
        return ExitCode::SUCCESS;
    }

    let program = rpal::compiler::flatten::Flattener::flatten(&standard);
    match rpal::vm::machine::Machine::run(source, program) {
        Ok(_) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{}", e);
            ExitCode::FAILURE
        }
    }
}
