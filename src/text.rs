// Copyright 2013 Vinhthuy Phan (original Go package `fmi`)
// Copyright 2014-2016 Johannes Köster, Taylor Cramer (bio crate conventions)
// Licensed under the MIT license (http://opensource.org/licenses/MIT)
// This file may not be copied, modified, or distributed
// except according to those terms.

//! The text ingester: reads a FASTA or raw file into a single immutable
//! byte sequence terminated by the sentinel `$`, validating the input
//! alphabet and rewriting ambiguous bases.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use log::{debug, info};

use crate::alphabets::dna;
use crate::error::{Error, Result};

/// An ingested reference text: `T[n-1] == $`, no `N`, alphabet
/// restricted to `{A,C,G,T,Z,|,$}`. Immutable once built.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Text {
    bytes: Vec<u8>,
}

impl Text {
    /// Load a text from `path`. Files with a `.fasta` extension are
    /// parsed as multi-record FASTA (§4.1); any other extension is read
    /// as a single raw sequence.
    pub fn load(path: impl AsRef<Path>) -> Result<Text> {
        let path = path.as_ref();
        if path.extension().and_then(|e| e.to_str()) == Some("fasta") {
            Text::from_fasta_file(path)
        } else {
            Text::from_raw_file(path)
        }
    }

    /// Parse a FASTA file: concatenate record bodies, joining distinct
    /// records with `|`, and append the sentinel.
    pub fn from_fasta_file(path: impl AsRef<Path>) -> Result<Text> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|e| Error::io(path, e))?;
        let reader = BufReader::new(file);

        let mut bytes = Vec::new();
        let mut have_body = false;
        for line in reader.lines() {
            let line = line.map_err(|e| Error::io(path, e))?;
            let line = line.trim_end_matches(['\r', '\n']);
            if line.is_empty() {
                continue;
            }
            if line.as_bytes()[0] == b'>' {
                if have_body {
                    bytes.push(dna::SEPARATOR);
                }
                continue;
            }
            bytes.extend(line.trim().as_bytes());
            have_body = true;
        }

        let text = Text::finish(bytes)?;
        info!("loaded FASTA {:?}: {} bytes", path, text.len());
        Ok(text)
    }

    /// Read a whole file as a single raw sequence.
    pub fn from_raw_file(path: impl AsRef<Path>) -> Result<Text> {
        let path = path.as_ref();
        let raw = std::fs::read(path).map_err(|e| Error::io(path, e))?;
        let trimmed = raw
            .into_iter()
            .rev()
            .skip_while(|b| b.is_ascii_whitespace())
            .collect::<Vec<u8>>()
            .into_iter()
            .rev()
            .collect();

        let text = Text::finish(trimmed)?;
        debug!("loaded raw file {:?}: {} bytes", path, text.len());
        Ok(text)
    }

    /// Ingest an in-memory sequence the same way `from_raw_file` would:
    /// validate the alphabet, rewrite `N` to the placeholder, append the
    /// sentinel. Useful for embedding a sequence without a file on disk.
    pub fn from_raw_bytes(bytes: Vec<u8>) -> Result<Text> {
        Text::finish(bytes)
    }

    /// Validate the alphabet, rewrite `N` to the placeholder, and
    /// append the sentinel.
    fn finish(mut bytes: Vec<u8>) -> Result<Text> {
        let alphabet = dna::raw_alphabet();
        for (i, b) in bytes.iter_mut().enumerate() {
            if !alphabet.is_word([*b]) {
                return Err(Error::InvalidAlphabet {
                    byte: *b,
                    position: i,
                });
            }
            *b = dna::normalize(*b);
        }
        bytes.push(dna::SENTINEL);
        Ok(Text { bytes })
    }

    /// Build directly from already-normalized bytes, for tests and
    /// callers that already own a valid sequence without its sentinel.
    pub fn from_bytes(mut bytes: Vec<u8>) -> Text {
        if bytes.last() != Some(&dna::SENTINEL) {
            bytes.push(dna::SENTINEL);
        }
        Text { bytes }
    }

    /// Wrap bytes already known to be a valid, sentinel-terminated
    /// ingested sequence (e.g. one recovered from a loaded `BWT`/`SA`
    /// pair) without re-running validation. Used by the loader.
    pub(crate) fn from_reconstructed_bytes(bytes: Vec<u8>) -> Text {
        Text { bytes }
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_from_bytes_appends_sentinel() {
        let text = Text::from_bytes(b"ACGT".to_vec());
        assert_eq!(text.as_bytes(), b"ACGT$");
    }

    #[test]
    fn test_from_bytes_idempotent_sentinel() {
        let text = Text::from_bytes(b"ACGT$".to_vec());
        assert_eq!(text.as_bytes(), b"ACGT$");
    }

    #[test]
    fn test_fasta_single_record() {
        let mut f = tempfile::Builder::new().suffix(".fasta").tempfile().unwrap();
        writeln!(f, ">r1").unwrap();
        writeln!(f, "ACGT").unwrap();
        let text = Text::from_fasta_file(f.path()).unwrap();
        assert_eq!(text.as_bytes(), b"ACGT$");
    }

    #[test]
    fn test_fasta_multi_record_joined_with_pipe() {
        let mut f = tempfile::Builder::new().suffix(".fasta").tempfile().unwrap();
        writeln!(f, ">r1").unwrap();
        writeln!(f, "ACGT").unwrap();
        writeln!(f, ">r2").unwrap();
        writeln!(f, "ACGT").unwrap();
        let text = Text::from_fasta_file(f.path()).unwrap();
        assert_eq!(text.as_bytes(), b"ACGT|ACGT$");
    }

    #[test]
    fn test_n_is_rewritten_to_placeholder() {
        let mut f = tempfile::Builder::new().suffix(".fasta").tempfile().unwrap();
        writeln!(f, ">r1").unwrap();
        writeln!(f, "ACGNACGT").unwrap();
        let text = Text::from_fasta_file(f.path()).unwrap();
        assert_eq!(text.as_bytes(), b"ACGZACGT$");
    }

    #[test]
    fn test_invalid_byte_is_fatal() {
        let mut f = tempfile::Builder::new().suffix(".fasta").tempfile().unwrap();
        writeln!(f, ">r1").unwrap();
        writeln!(f, "ACGX").unwrap();
        let err = Text::from_fasta_file(f.path()).unwrap_err();
        match err {
            Error::InvalidAlphabet { byte, .. } => assert_eq!(byte, b'X'),
            other => panic!("expected InvalidAlphabet, got {:?}", other),
        }
    }

    #[test]
    fn test_raw_file_strips_trailing_whitespace() {
        let mut f = tempfile::NamedTempFile::new().unwrap();
        write!(f, "ACGT\n\n").unwrap();
        let text = Text::from_raw_file(f.path()).unwrap();
        assert_eq!(text.as_bytes(), b"ACGT$");
    }
}
