// SPDX-License-Identifier: Apache-2.0

//! Walks a top-level JSON array one element at a time.
//!
//! With `--limit N` the input after the N-th element is never parsed, so
//! this works on arrays far larger than memory.

use std::fs::File;
use std::io::{self, BufReader, Read};
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser as ClapParser;
use runejson::{iterate, IoReader};

#[derive(ClapParser, Debug)]
#[command(about = "Stream the elements of a top-level JSON array")]
struct Args {
    /// Input file; reads stdin when omitted
    path: Option<PathBuf>,

    /// Stop after this many elements
    #[arg(short, long)]
    limit: Option<usize>,
}

fn run(args: &Args) -> Result<(), Box<dyn std::error::Error>> {
    let input: Box<dyn Read> = match &args.path {
        Some(path) => Box::new(File::open(path)?),
        None => Box::new(io::stdin().lock()),
    };

    let stream = iterate(IoReader::new(BufReader::new(input)))?;
    if !stream.is_array() {
        log::warn!("document is an object, printing it as a single element");
    }

    let limit = args.limit.unwrap_or(usize::MAX);
    let mut count = 0;
    for element in stream.take(limit) {
        let element = element?;
        count += 1;
        println!("{count:>6}  {element}");
    }
    log::info!("printed {count} elements");
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
