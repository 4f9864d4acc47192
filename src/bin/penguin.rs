//! penguin - run Penguin programs.
//!
//! The launcher reads one source file, feeds it through the lexer,
//! parser and interpreter, and maps failures onto the exit-code
//! contract:
//!
//! - success: exit 0
//! - no arguments / unreadable file / lex or parse error: `error: ...`
//!   on stderr, exit 1
//! - runtime error: `Runtime error: ...` on stderr, exit 1
//! - `--info`, `--help`/`-h`, `--version`/`-v`: informational output,
//!   exit 0
//!
//! # Usage
//!
//! ```bash
//! penguin program.pg
//! penguin --info
//! penguin --version
//! ```

use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::Context;
use clap::Parser;
use colored::Colorize;

use penguin::eval::Interpreter;
use penguin::RuntimeError;

/// Penguin - a small general-purpose scripting language
#[derive(Parser, Debug)]
#[command(name = "penguin")]
#[command(version, about, disable_help_flag = true, disable_version_flag = true)]
struct Args {
    /// Source file to run
    file: Option<PathBuf>,

    /// Print information about the language
    #[arg(long)]
    info: bool,

    /// Print information about the language
    #[arg(short = 'h', long)]
    help: bool,

    /// Print version information
    #[arg(short = 'v', long)]
    version: bool,
}

fn main() -> ExitCode {
    let args = match Args::try_parse() {
        Ok(args) => args,
        Err(err) => {
            // usage errors report with exit 1 rather than clap's default 2
            let _ = err.print();
            return ExitCode::FAILURE;
        }
    };

    if args.version {
        println!("Penguin programming language {}", env!("CARGO_PKG_VERSION"));
        return ExitCode::SUCCESS;
    }

    // --help and -h print the same banner as --info
    if args.info || args.help {
        print_info();
        return ExitCode::SUCCESS;
    }

    let Some(file) = args.file else {
        eprintln!("{}: no input file", "error".red());
        eprintln!("Usage: penguin <file.pg> or penguin --info");
        return ExitCode::FAILURE;
    };

    match run_file(&file) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            if let Some(runtime) = err.downcast_ref::<RuntimeError>() {
                eprintln!("Runtime error: {}", runtime);
            } else {
                eprintln!("{}: {:#}", "error".red(), err);
            }
            ExitCode::FAILURE
        }
    }
}

/// Reads, parses and runs one source file.
fn run_file(path: &Path) -> anyhow::Result<()> {
    let source = fs::read_to_string(path)
        .with_context(|| format!("could not open file {}", path.display()))?;

    let program = penguin::parse_source(&source)?;

    let mut interpreter = Interpreter::new();
    interpreter.run(&program).map_err(anyhow::Error::new)?;

    Ok(())
}

/// The banner shared by `--info`, `--help` and `-h`.
fn print_info() {
    println!("Penguin programming language");
    println!("Version: {}", env!("CARGO_PKG_VERSION"));
    println!("Usage: penguin <file.pg>");
}
