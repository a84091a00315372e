// Copyright 2013 Vinhthuy Phan (original Go package `fmi`)
// Copyright 2014-2016 Johannes Köster, Taylor Cramer (bio crate conventions)
// Licensed under the MIT license (http://opensource.org/licenses/MIT)
// This file may not be copied, modified, or distributed
// except according to those terms.

//! Simulate sequencing reads from a reference, with substitution
//! errors, by repeatedly calling `Index::repeat` over random windows.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use rand::Rng;

use dna_fm_index::data_structures::fmindex::Index;
use dna_fm_index::Text;

/// Generate simulated reads from a reference sequence.
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Args {
    /// FASTA (`.fasta`) or raw sequence file to sample reads from.
    #[arg(short = 's', long = "sequence")]
    sequence: PathBuf,

    /// Read length.
    #[arg(short = 'l', long, default_value_t = 100)]
    length: usize,

    /// Coverage (expected reads = ceil(coverage * n / length)).
    #[arg(short = 'c', long, default_value_t = 2.0)]
    coverage: f64,

    /// Per-base substitution error rate.
    #[arg(short = 'e', long = "error-rate", default_value_t = 0.01)]
    error_rate: f64,
}

/// One of the three bases other than `base`, matching the fixed
/// substitution table used by the original read simulator: a real
/// sequencing error never calls the base that was actually there.
fn random_error(base: u8, rng: &mut impl Rng) -> u8 {
    let alternatives: &[u8] = match base {
        b'A' => b"CGT",
        b'C' => b"AGT",
        b'G' => b"ACT",
        b'T' => b"ACG",
        other => return other,
    };
    alternatives[rng.gen_range(0..3)]
}

/// True if `text[pos..pos+len]` is entirely the `N`/placeholder run,
/// which would otherwise generate a degenerate, uninformative read.
fn is_all_placeholder(text: &[u8], pos: usize, len: usize) -> bool {
    text[pos..pos + len]
        .iter()
        .all(|&b| b == dna_fm_index::alphabets::dna::PLACEHOLDER)
}

fn run(args: Args) -> dna_fm_index::Result<()> {
    let text = Text::load(&args.sequence)?;
    let n = text.len();
    let read_len = args.length;
    let num_reads = (args.coverage * n as f64 / read_len as f64).ceil() as usize;

    let index = Index::build(text);
    let bytes = index.text().as_bytes();
    let mut rng = rand::thread_rng();

    let mut emitted = 0;
    while emitted < num_reads {
        if n <= read_len {
            break;
        }
        let pos = rng.gen_range(0..n - read_len);
        if is_all_placeholder(bytes, pos, read_len) {
            continue;
        }

        let mut occurrences = index.repeat(pos, read_len);
        occurrences.sort_unstable();

        let mut read: Vec<u8> = bytes[pos..pos + read_len].to_vec();
        let mut error_positions = Vec::new();
        for (k, base) in read.iter_mut().enumerate() {
            if rng.gen::<f64>() < args.error_rate {
                *base = random_error(*base, &mut rng);
                error_positions.push(k);
            }
        }

        print!("{} {}", String::from_utf8_lossy(&read), occurrences.len());
        for p in &occurrences {
            print!(" {}", p);
        }
        print!(" {}", error_positions.len());
        for e in &error_positions {
            print!(" {}", e);
        }
        println!();

        emitted += 1;
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
