// Copyright 2013 Vinhthuy Phan (original Go package `fmi`)
// Copyright 2014-2016 Johannes Köster, Taylor Cramer (bio crate conventions)
// Licensed under the MIT license (http://opensource.org/licenses/MIT)
// This file may not be copied, modified, or distributed
// except according to those terms.

//! Save and load an index as a directory of fixed-width little-endian
//! integer arrays plus a text manifest, fanning the per-symbol work out
//! across threads with `rayon::scope` the way the original ported this
//! with one goroutine per file and a `sync.WaitGroup`.

use std::collections::HashMap;
use std::convert::TryInto;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::Path;
use std::sync::Mutex;

use log::info;

use crate::data_structures::bwt::{reconstruct_text, Bwt, Rank, RankTables, SampledRankTables};
use crate::data_structures::fmindex::{CompressedIndex, Index, IndexBackend};
use crate::error::{Error, Result};
use crate::text::Text;

const MANIFEST_FILE: &str = "others";
const SA_FILE: &str = "sa";
const BWT_FILE: &str = "bwt";

fn occ_file_name(symbol: u8) -> String {
    format!("occ.{}", symbol as char)
}

fn write_u64_slice(path: &Path, data: &[u64]) -> Result<()> {
    let file = File::create(path).map_err(|e| Error::io(path, e))?;
    let mut writer = BufWriter::new(file);
    for &v in data {
        writer
            .write_all(&v.to_le_bytes())
            .map_err(|e| Error::io(path, e))?;
    }
    writer.flush().map_err(|e| Error::io(path, e))?;
    Ok(())
}

fn read_u64_slice(path: &Path, expected_len: usize) -> Result<Vec<u64>> {
    let bytes = fs::read(path).map_err(|e| Error::io(path, e))?;
    let expected_bytes = expected_len as u64 * 8;
    if bytes.len() as u64 != expected_bytes {
        return Err(Error::TruncatedIndex {
            path: path.to_path_buf(),
            expected: expected_bytes,
            found: bytes.len() as u64,
        });
    }
    Ok(bytes
        .chunks_exact(8)
        .map(|c| u64::from_le_bytes(c.try_into().unwrap()))
        .collect())
}

fn read_bytes_checked(path: &Path, expected_len: usize) -> Result<Vec<u8>> {
    let bytes = fs::read(path).map_err(|e| Error::io(path, e))?;
    if bytes.len() != expected_len {
        return Err(Error::TruncatedIndex {
            path: path.to_path_buf(),
            expected: expected_len as u64,
            found: bytes.len() as u64,
        });
    }
    Ok(bytes)
}

/// Save any rank-table flavor to `dir`, creating it if necessary.
/// `sa`, `bwt` and one `occ.<c>` file per symbol are written
/// concurrently; the manifest is written last, on the calling thread,
/// once every other file has landed.
pub fn save<R: Rank + Sync>(index: &IndexBackend<R>, dir: impl AsRef<Path>) -> Result<()> {
    let dir = dir.as_ref();
    fs::create_dir_all(dir).map_err(|e| Error::io(dir, e))?;

    let tables = index.tables();
    let sa = index.sa();
    let symbols = tables.symbols().to_vec();
    let errors: Mutex<Vec<Error>> = Mutex::new(Vec::new());
    let errors = &errors;

    rayon::scope(|scope| {
        scope.spawn(|_| {
            if let Err(e) = write_u64_slice(&dir.join(SA_FILE), sa) {
                errors.lock().unwrap().push(e);
            }
        });
        scope.spawn(|_| {
            if let Err(e) = fs::write(dir.join(BWT_FILE), tables.bwt()) {
                errors
                    .lock()
                    .unwrap()
                    .push(Error::io(dir.join(BWT_FILE), e));
            }
        });
        for &symbol in &symbols {
            scope.spawn(move |_| {
                let path = dir.join(occ_file_name(symbol));
                if let Err(e) = write_u64_slice(&path, tables.persisted_occ(symbol)) {
                    errors.lock().unwrap().push(e);
                }
            });
        }
    });

    if let Some(e) = errors.into_inner().unwrap().into_iter().next() {
        return Err(e);
    }

    let mut manifest = String::new();
    match tables.m() {
        Some(m) => manifest.push_str(&format!(
            "{} {} {} {}\n",
            tables.len(),
            tables.occ_size(),
            tables.end_pos(),
            m
        )),
        None => manifest.push_str(&format!("{} {}\n", tables.len(), tables.end_pos())),
    }
    for &symbol in &symbols {
        let c = tables.c(symbol).unwrap();
        let ep = tables.ep(symbol).unwrap();
        manifest.push_str(&format!("{} {} {} {}\n", symbol as char, ep - c + 1, c, ep));
    }
    let manifest_path = dir.join(MANIFEST_FILE);
    fs::write(&manifest_path, manifest).map_err(|e| Error::io(&manifest_path, e))?;

    info!("saved index to {:?} ({} symbols)", dir, symbols.len());
    Ok(())
}

struct SymbolEntry {
    symbol: u8,
    c: u64,
    ep: u64,
}

struct Manifest {
    len: u64,
    occ_size: u64,
    end_pos: u64,
    m: Option<u64>,
    symbols: Vec<SymbolEntry>,
}

fn parse_u64(path: &Path, field: &str) -> Result<u64> {
    field.parse().map_err(|_| Error::MalformedManifest {
        line: format!("{:?}: {}", path, field),
    })
}

fn read_manifest(dir: &Path) -> Result<Manifest> {
    let path = dir.join(MANIFEST_FILE);
    let contents = fs::read_to_string(&path).map_err(|e| Error::io(&path, e))?;
    let mut lines = contents.lines();

    let header = lines.next().ok_or_else(|| Error::MalformedManifest {
        line: format!("{:?}: empty manifest", path),
    })?;
    let fields: Vec<&str> = header.split_whitespace().collect();
    let (len, occ_size, end_pos, m) = match fields.as_slice() {
        [len, end_pos] => (
            parse_u64(&path, len)?,
            parse_u64(&path, len)?,
            parse_u64(&path, end_pos)?,
            None,
        ),
        [len, occ_size, end_pos, m] => (
            parse_u64(&path, len)?,
            parse_u64(&path, occ_size)?,
            parse_u64(&path, end_pos)?,
            Some(parse_u64(&path, m)?),
        ),
        _ => {
            return Err(Error::MalformedManifest {
                line: header.to_string(),
            })
        }
    };

    let mut symbols = Vec::new();
    for line in lines {
        if line.trim().is_empty() {
            continue;
        }
        let mut parts = line.split_whitespace();
        let symbol = parts
            .next()
            .and_then(|s| s.bytes().next())
            .ok_or_else(|| Error::MalformedManifest {
                line: line.to_string(),
            })?;
        let _freq: u64 = parts
            .next()
            .ok_or_else(|| Error::MalformedManifest {
                line: line.to_string(),
            })
            .and_then(|s| parse_u64(&path, s))?;
        let c = parts
            .next()
            .ok_or_else(|| Error::MalformedManifest {
                line: line.to_string(),
            })
            .and_then(|s| parse_u64(&path, s))?;
        let ep = parts
            .next()
            .ok_or_else(|| Error::MalformedManifest {
                line: line.to_string(),
            })
            .and_then(|s| parse_u64(&path, s))?;
        symbols.push(SymbolEntry { symbol, c, ep });
    }

    Ok(Manifest {
        len,
        occ_size,
        end_pos,
        m,
        symbols,
    })
}

/// Per-symbol `occ.<c>` column, `sa` and `bwt`, all loaded concurrently.
fn load_arrays(dir: &Path, manifest: &Manifest) -> Result<(Vec<u64>, Vec<u8>, HashMap<u8, Vec<u64>>)> {
    let sa_slot: Mutex<Option<Result<Vec<u64>>>> = Mutex::new(None);
    let bwt_slot: Mutex<Option<Result<Vec<u8>>>> = Mutex::new(None);
    let occ_slot: Mutex<HashMap<u8, Result<Vec<u64>>>> = Mutex::new(HashMap::new());
    let occ_slot = &occ_slot;

    rayon::scope(|scope| {
        scope.spawn(|_| {
            let result = read_u64_slice(&dir.join(SA_FILE), manifest.len as usize);
            *sa_slot.lock().unwrap() = Some(result);
        });
        scope.spawn(|_| {
            let result = read_bytes_checked(&dir.join(BWT_FILE), manifest.len as usize);
            *bwt_slot.lock().unwrap() = Some(result);
        });
        for entry in &manifest.symbols {
            let symbol = entry.symbol;
            scope.spawn(move |_| {
                let path = dir.join(occ_file_name(symbol));
                let result = read_u64_slice(&path, manifest.occ_size as usize);
                occ_slot.lock().unwrap().insert(symbol, result);
            });
        }
    });

    let sa = sa_slot.into_inner().unwrap().unwrap()?;
    let bwt_bytes = bwt_slot.into_inner().unwrap().unwrap()?;
    let mut occ = HashMap::new();
    for (symbol, result) in occ_slot.into_inner().unwrap() {
        occ.insert(symbol, result?);
    }
    Ok((sa, bwt_bytes, occ))
}

fn assemble<R>(
    dir: &Path,
    manifest: Manifest,
    from_parts: impl FnOnce(Bwt, Vec<u8>, HashMap<u8, u64>, HashMap<u8, u64>, HashMap<u8, Vec<u64>>) -> R,
) -> Result<IndexBackend<R>> {
    let (sa, bwt_bytes, occ) = load_arrays(dir, &manifest)?;
    let text_bytes = reconstruct_text(&bwt_bytes, &sa);
    let text = Text::from_reconstructed_bytes(text_bytes);
    let bwt = Bwt {
        bytes: bwt_bytes,
        end_pos: manifest.end_pos,
    };
    let symbols: Vec<u8> = manifest.symbols.iter().map(|e| e.symbol).collect();
    let c: HashMap<u8, u64> = manifest.symbols.iter().map(|e| (e.symbol, e.c)).collect();
    let ep: HashMap<u8, u64> = manifest.symbols.iter().map(|e| (e.symbol, e.ep)).collect();
    let tables = from_parts(bwt, symbols, c, ep, occ);
    Ok(IndexBackend::from_parts(text, sa, tables))
}

/// Load a full (uncompressed) index. Fails with `MalformedManifest` if
/// `dir`'s manifest is a compressed one (4 header fields).
pub fn load_full(dir: impl AsRef<Path>) -> Result<Index> {
    let dir = dir.as_ref();
    let manifest = read_manifest(dir)?;
    if manifest.m.is_some() {
        return Err(Error::MalformedManifest {
            line: format!("{:?}: expected an uncompressed manifest", dir.join(MANIFEST_FILE)),
        });
    }
    assemble(dir, manifest, |bwt, symbols, c, ep, occ| {
        RankTables::from_parts(bwt, symbols, c, ep, occ)
    })
}

/// Load a sampled (compressed) index. Fails with `MalformedManifest` if
/// `dir`'s manifest is an uncompressed one (2 header fields).
pub fn load_compressed(dir: impl AsRef<Path>) -> Result<CompressedIndex> {
    let dir = dir.as_ref();
    let manifest = read_manifest(dir)?;
    let m = manifest.m.ok_or_else(|| Error::MalformedManifest {
        line: format!("{:?}: expected a compressed manifest", dir.join(MANIFEST_FILE)),
    })?;
    assemble(dir, manifest, move |bwt, symbols, c, ep, occ| {
        SampledRankTables::from_parts(bwt, symbols, c, ep, occ, m)
    })
}

/// Either flavor of loaded index, for callers (the `search` binary)
/// that don't know ahead of time whether a directory holds a full or
/// compressed index. `load` auto-detects from the manifest's header
/// field count, as the original `fmi` package does from `OCC_SIZE`
/// alone (their header is always 3 fields; ours disambiguates on
/// whether a trailing `M` is present).
pub enum LoadedIndex {
    Full(Index),
    Compressed(CompressedIndex),
}

impl LoadedIndex {
    pub fn search(&self, pattern: &[u8]) -> Vec<u64> {
        match self {
            LoadedIndex::Full(index) => index.search(pattern),
            LoadedIndex::Compressed(index) => index.search(pattern),
        }
    }

    pub fn count(&self, pattern: &[u8]) -> u64 {
        match self {
            LoadedIndex::Full(index) => index.count(pattern),
            LoadedIndex::Compressed(index) => index.count(pattern),
        }
    }
}

pub fn load(dir: impl AsRef<Path>) -> Result<LoadedIndex> {
    let dir = dir.as_ref();
    let manifest = read_manifest(dir)?;
    if manifest.m.is_some() {
        Ok(LoadedIndex::Compressed(load_compressed(dir)?))
    } else {
        Ok(LoadedIndex::Full(load_full(dir)?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data_structures::fmindex::SuffixArrayAlgorithm;

    #[test]
    fn test_roundtrip_full() {
        let dir = tempfile::tempdir().unwrap();
        let text = Text::from_bytes(b"abracadabra".to_vec());
        let index = Index::build_with(text, SuffixArrayAlgorithm::Naive);
        save(&index, dir.path()).unwrap();
        let loaded = load_full(dir.path()).unwrap();
        let mut hits = loaded.search(b"abra");
        hits.sort_unstable();
        assert_eq!(hits, vec![0, 7]);
        assert_eq!(loaded.text().as_bytes(), index.text().as_bytes());
    }

    #[test]
    fn test_roundtrip_compressed() {
        let dir = tempfile::tempdir().unwrap();
        let text = Text::from_bytes(b"AAAACCCCGGGGTTTT".to_vec());
        let index = CompressedIndex::build(text, 4);
        save(&index, dir.path()).unwrap();
        let loaded = load_compressed(dir.path()).unwrap();
        assert_eq!(loaded.count(b"CCC"), index.count(b"CCC"));
        assert_eq!(loaded.m(), 4);
    }

    #[test]
    fn test_auto_detect_dispatches_by_manifest_field_count() {
        let full_dir = tempfile::tempdir().unwrap();
        let compressed_dir = tempfile::tempdir().unwrap();
        let text = Text::from_bytes(b"ACGTACGTACGT".to_vec());
        save(&Index::build(text.clone()), full_dir.path()).unwrap();
        save(&CompressedIndex::build(text, 4), compressed_dir.path()).unwrap();

        assert!(matches!(load(full_dir.path()).unwrap(), LoadedIndex::Full(_)));
        assert!(matches!(
            load(compressed_dir.path()).unwrap(),
            LoadedIndex::Compressed(_)
        ));
    }

    #[test]
    fn test_truncated_sa_file_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let text = Text::from_bytes(b"ACGTACGT".to_vec());
        save(&Index::build(text), dir.path()).unwrap();
        fs::write(dir.path().join(SA_FILE), b"short").unwrap();
        assert!(matches!(load_full(dir.path()), Err(Error::TruncatedIndex { .. })));
    }
}
