//! Thin CLI wrapper around the `cmarkrs` library (spec.md §6.2): reads
//! standard input to EOF, parses it as CommonMark, and writes the rendered
//! HTML to standard output.

use clap::Parser;
use cmarkrs::{format_document, parse_document, Options};
use std::io::{self, Read, Write};
use std::process::ExitCode;
use typed_arena::Arena;

/// A CommonMark 0.31.2 parser and HTML renderer.
#[derive(Parser, Debug)]
#[command(name = "cmarkrs", version, about)]
struct Cli {
    /// Accepted for compatibility; raw HTML and link destinations are
    /// always passed through unchanged regardless of this flag.
    #[arg(long = "unsafe")]
    unsafe_: bool,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let mut options = Options::default();
    options.render.unsafe_ = cli.unsafe_;

    if let Err(e) = run(&options) {
        eprintln!("cmarkrs: {}", e);
        return ExitCode::FAILURE;
    }

    ExitCode::SUCCESS
}

fn run(options: &Options) -> io::Result<()> {
    let mut input = Vec::new();
    io::stdin().read_to_end(&mut input)?;

    let arena = Arena::new();
    let root = parse_document(&arena, &input, options);

    let stdout = io::stdout();
    let mut handle = stdout.lock();
    format_document(root, options, &mut handle)?;
    handle.flush()
}
