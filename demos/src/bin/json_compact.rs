// SPDX-License-Identifier: Apache-2.0

//! Parses a JSON document and prints it back as compact JSON.

use std::fs::File;
use std::io::{self, BufReader, BufWriter, Read, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser as ClapParser;
use runejson::{write, IoReader, IoWriter, Parser};

#[derive(ClapParser, Debug)]
#[command(about = "Parse a JSON document and print it as compact JSON")]
struct Args {
    /// Input file; reads stdin when omitted
    path: Option<PathBuf>,

    /// Maximum nesting depth of objects and arrays
    #[arg(long, default_value_t = runejson::DEFAULT_MAX_DEPTH)]
    max_depth: usize,
}

fn run(args: &Args) -> Result<(), Box<dyn std::error::Error>> {
    let input: Box<dyn Read> = match &args.path {
        Some(path) => Box::new(File::open(path)?),
        None => Box::new(io::stdin().lock()),
    };

    let parser = Parser::with_max_depth(IoReader::new(BufReader::new(input)), args.max_depth);
    let value = parser.parse()?;
    log::info!("parsed a top-level {}", value.type_name());

    let mut out = IoWriter::new(BufWriter::new(io::stdout().lock()));
    write(&mut out, &value)?;
    let mut stdout = out.into_inner();
    writeln!(stdout)?;
    stdout.flush()?;
    Ok(())
}

fn main() -> ExitCode {
    env_logger::init();
    let args = Args::parse();

    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}
