// Copyright 2013 Vinhthuy Phan (original Go package `fmi`)
// Copyright 2014-2016 Johannes Köster, Taylor Cramer (bio crate conventions)
// Licensed under the MIT license (http://opensource.org/licenses/MIT)
// This file may not be copied, modified, or distributed
// except according to those terms.

//! Ingest a FASTA/raw sequence file and save the built index next to it.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;

use dna_fm_index::data_structures::fmindex::{CompressedIndex, Index};
use dna_fm_index::io::persistence;
use dna_fm_index::Text;

/// Build an FM-index from a reference sequence.
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Args {
    /// FASTA (`.fasta`) or raw sequence file to index.
    path: PathBuf,

    /// Build the sampled/compressed index instead of the full one.
    #[arg(long)]
    compressed: bool,

    /// Bucket size for the compressed index.
    #[arg(short = 'm', long, default_value_t = 16)]
    bucket: u64,
}

fn run(args: Args) -> dna_fm_index::Result<()> {
    let text = Text::load(&args.path)?;

    if args.compressed {
        let dir = format!("{}.fmi", args.path.display());
        let index = CompressedIndex::build(text, args.bucket);
        persistence::save(&index, &dir)?;
        log::info!("wrote compressed index to {}", dir);
    } else {
        let dir = format!("{}.index", args.path.display());
        let index = Index::build(text);
        persistence::save(&index, &dir)?;
        log::info!("wrote index to {}", dir);
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
