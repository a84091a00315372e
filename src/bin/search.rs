// Copyright 2013 Vinhthuy Phan (original Go package `fmi`)
// Copyright 2014-2016 Johannes Köster, Taylor Cramer (bio crate conventions)
// Licensed under the MIT license (http://opensource.org/licenses/MIT)
// This file may not be copied, modified, or distributed
// except according to those terms.

//! Load a saved index and answer one query per non-empty line of a
//! queries file, printing `na` or the space-separated hit positions.

use std::fs::File;
use std::io::{self, BufRead, BufReader, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;

use dna_fm_index::io::persistence;

/// Query a saved FM-index.
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Args {
    /// Directory holding a saved index (full or compressed; auto-detected).
    #[arg(short = 'i', long = "index")]
    index: PathBuf,

    /// File with one pattern per line.
    #[arg(short = 'q', long = "queries")]
    queries: PathBuf,
}

fn run(args: Args) -> dna_fm_index::Result<()> {
    let index = persistence::load(&args.index)?;
    let file = File::open(&args.queries).map_err(|e| dna_fm_index::Error::io(&args.queries, e))?;
    let stdout = io::stdout();
    let mut out = stdout.lock();

    for line in BufReader::new(file).lines() {
        let line = line.map_err(|e| dna_fm_index::Error::io(&args.queries, e))?;
        let pattern = line.trim_end_matches(['\r', '\n']);
        if pattern.is_empty() {
            continue;
        }
        let hits = index.search(pattern.as_bytes());
        if hits.is_empty() {
            writeln!(out, "na").ok();
        } else {
            let mut hits = hits;
            hits.sort_unstable();
            let positions: Vec<String> = hits.iter().map(u64::to_string).collect();
            writeln!(out, "{}", positions.join(" ")).ok();
        }
    }
    Ok(())
}

fn main() -> ExitCode {
    env_logger::init();
    let args = Args::parse();
    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {}", e);
            ExitCode::FAILURE
        }
    }
}
