// Copyright 2013 Vinhthuy Phan (original Go package `fmi`)
// Copyright 2014-2016 Johannes Köster, Taylor Cramer (bio crate conventions)
// Licensed under the MIT license (http://opensource.org/licenses/MIT)
// This file may not be copied, modified, or distributed
// except according to those terms.

//! The Burrows-Wheeler transform and the rank (`OCC`) / cumulative-count
//! (`C`, `EP`) tables that realize the LF-mapping. Two rank table
//! flavors are provided behind the `Rank` trait: `RankTables` keeps a
//! full `OCC[c][i]` array per symbol, `SampledRankTables` keeps only
//! every `M`-th entry and reconstructs the rest by scanning the
//! resident BWT.

use std::collections::HashMap;

use crate::alphabets::dna;

/// The Burrows-Wheeler transform of a text, plus the row at which the
/// sentinel appears.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Bwt {
    pub bytes: Vec<u8>,
    pub end_pos: u64,
}

/// `BWT[i] = T[(SA[i]-1) mod n]`; `end_pos` is the unique row where
/// `BWT[i] == $`.
pub fn build_bwt(text: &[u8], sa: &[u64]) -> Bwt {
    let n = text.len();
    let mut bytes = vec![0u8; n];
    let mut end_pos = 0u64;
    for (i, &s) in sa.iter().enumerate() {
        let b = if s == 0 {
            text[n - 1]
        } else {
            text[s as usize - 1]
        };
        bytes[i] = b;
        if b == dna::SENTINEL {
            end_pos = i as u64;
        }
    }
    Bwt { bytes, end_pos }
}

/// Reconstruct `T` from its `BWT` and `SA` alone, using the same
/// `BWT[i] = T[(SA[i]-1) mod n]` identity `build_bwt` populates forward:
/// since `SA` is a permutation of `0..n`, scattering each `BWT[i]` to row
/// `(SA[i]+n-1) mod n` fills every position of `T` exactly once. Used by
/// the loader, which persists `SA` and `BWT` but not `T` itself.
pub fn reconstruct_text(bwt: &[u8], sa: &[u64]) -> Vec<u8> {
    let n = bwt.len();
    let mut text = vec![0u8; n];
    for (i, &s) in sa.iter().enumerate() {
        let j = if s == 0 { n - 1 } else { s as usize - 1 };
        text[j] = bwt[i];
    }
    text
}

/// Cumulative-count bookkeeping shared by both rank table flavors:
/// `C[c]`, `EP[c]` and the frequency each symbol occurs with, computed
/// over the *full* alphabet of `T` (including `$` and the `Z`
/// placeholder, whose counts still shift the buckets of every symbol
/// sorted after them) and then restricted to the symbols a pattern can
/// actually contain (everything except `$` and `Z`).
struct Counts {
    symbols: Vec<u8>,
    c: HashMap<u8, u64>,
    ep: HashMap<u8, u64>,
}

fn compute_counts(text: &[u8]) -> Counts {
    let mut freq = [0u64; 256];
    for &b in text {
        freq[b as usize] += 1;
    }
    let all_symbols: Vec<u8> = (0..=255u8).filter(|&c| freq[c as usize] > 0).collect();

    let mut c_all = HashMap::new();
    let mut ep_all = HashMap::new();
    let mut running = 0u64;
    for &sym in &all_symbols {
        c_all.insert(sym, running);
        running += freq[sym as usize];
        ep_all.insert(sym, running - 1);
    }

    let symbols: Vec<u8> = all_symbols
        .into_iter()
        .filter(|&c| c != dna::SENTINEL && c != dna::PLACEHOLDER)
        .collect();
    let c: HashMap<u8, u64> = symbols.iter().map(|&s| (s, c_all[&s])).collect();
    let ep: HashMap<u8, u64> = symbols.iter().map(|&s| (s, ep_all[&s])).collect();

    Counts { symbols, c, ep }
}

/// Lookup surface both rank-table flavors provide: cumulative counts
/// and the rank of a symbol up to (and including) a BWT row.
pub trait Rank {
    /// `C[c]`, the first row of `c`'s bucket. `None` if `c` never
    /// occurs in the text (so it can never match a pattern).
    fn c(&self, symbol: u8) -> Option<u64>;

    /// `EP[c]`, the last row of `c`'s bucket.
    fn ep(&self, symbol: u8) -> Option<u64>;

    /// Number of occurrences of `symbol` in `BWT[0..=k]`. By convention
    /// `k < 0` (the "before row zero" case used by backward search at
    /// the left boundary) returns 0.
    fn rank(&self, symbol: u8, k: i64) -> u64;

    fn bwt(&self) -> &[u8];

    fn len(&self) -> usize {
        self.bwt().len()
    }

    fn end_pos(&self) -> u64;

    /// Sorted symbols a pattern may contain.
    fn symbols(&self) -> &[u8];

    /// The array this table flavor actually persists for `symbol`:
    /// the full `OCC[c]` column, or the sampled `OCC_s[c]`. Panics if
    /// `symbol` is not in `symbols()`; callers are expected to iterate
    /// `symbols()` rather than guess.
    fn persisted_occ(&self, symbol: u8) -> &[u64];

    /// Length of each `occ.<c>` column as persisted: `len()` for the
    /// full table, `⌈len()/M⌉+1` for the sampled one.
    fn occ_size(&self) -> usize {
        self.len()
    }

    /// Bucket size, for the sampled table. `None` for the full table.
    fn m(&self) -> Option<u64> {
        None
    }
}

/// Full occurrence tables: one `Vec<u64>` of length `n` per symbol.
pub struct RankTables {
    bwt: Bwt,
    c: HashMap<u8, u64>,
    ep: HashMap<u8, u64>,
    occ: HashMap<u8, Vec<u64>>,
    symbols: Vec<u8>,
}

impl RankTables {
    pub fn new(text: &[u8], bwt: Bwt) -> RankTables {
        let counts = compute_counts(text);
        let n = bwt.bytes.len();

        let mut occ: HashMap<u8, Vec<u64>> =
            counts.symbols.iter().map(|&s| (s, vec![0u64; n])).collect();

        // Per-symbol running counter: better cache behaviour than
        // updating every symbol's column at every row.
        for &sym in &counts.symbols {
            let column = occ.get_mut(&sym).unwrap();
            let mut running = 0u64;
            for (i, &b) in bwt.bytes.iter().enumerate() {
                if b == sym {
                    running += 1;
                }
                column[i] = running;
            }
        }

        RankTables {
            bwt,
            c: counts.c,
            ep: counts.ep,
            occ,
            symbols: counts.symbols,
        }
    }

    /// Reassemble a full rank table from its persisted parts, bypassing
    /// reconstruction from `T`. Used by the loader.
    pub(crate) fn from_parts(
        bwt: Bwt,
        symbols: Vec<u8>,
        c: HashMap<u8, u64>,
        ep: HashMap<u8, u64>,
        occ: HashMap<u8, Vec<u64>>,
    ) -> RankTables {
        RankTables {
            bwt,
            c,
            ep,
            occ,
            symbols,
        }
    }
}

impl Rank for RankTables {
    fn c(&self, symbol: u8) -> Option<u64> {
        self.c.get(&symbol).copied()
    }

    fn ep(&self, symbol: u8) -> Option<u64> {
        self.ep.get(&symbol).copied()
    }

    fn rank(&self, symbol: u8, k: i64) -> u64 {
        if k < 0 {
            return 0;
        }
        match self.occ.get(&symbol) {
            Some(column) => column[k as usize],
            None => 0,
        }
    }

    fn bwt(&self) -> &[u8] {
        &self.bwt.bytes
    }

    fn end_pos(&self) -> u64 {
        self.bwt.end_pos
    }

    fn symbols(&self) -> &[u8] {
        &self.symbols
    }

    fn persisted_occ(&self, symbol: u8) -> &[u64] {
        &self.occ[&symbol]
    }
}

/// Bucket-sampled occurrence tables: `OCC_s[c]` is snapshotted every
/// `m`-th row; ranks between snapshots are reconstructed by scanning
/// the resident BWT, trading an O(m) slowdown per rank query for
/// `O(n/m)` table memory instead of `O(n)`.
pub struct SampledRankTables {
    bwt: Bwt,
    c: HashMap<u8, u64>,
    ep: HashMap<u8, u64>,
    occ_sampled: HashMap<u8, Vec<u64>>,
    symbols: Vec<u8>,
    m: u64,
}

impl SampledRankTables {
    pub fn new(text: &[u8], bwt: Bwt, m: u64) -> SampledRankTables {
        assert!(m > 0, "bucket size must be positive");
        let counts = compute_counts(text);
        let n = bwt.bytes.len();
        let occ_size = ((n as u64 + m - 1) / m) as usize + 1;

        let mut occ_sampled: HashMap<u8, Vec<u64>> = counts
            .symbols
            .iter()
            .map(|&s| (s, vec![0u64; occ_size]))
            .collect();
        let mut running: HashMap<u8, u64> = counts.symbols.iter().map(|&s| (s, 0)).collect();

        for (j, &b) in bwt.bytes.iter().enumerate() {
            if let Some(r) = running.get_mut(&b) {
                *r += 1;
            }
            if j as u64 % m == 0 {
                let bucket = j / m as usize;
                for &sym in &counts.symbols {
                    occ_sampled.get_mut(&sym).unwrap()[bucket] = running[&sym];
                }
            }
        }

        SampledRankTables {
            bwt,
            c: counts.c,
            ep: counts.ep,
            occ_sampled,
            symbols: counts.symbols,
            m,
        }
    }

    pub fn m(&self) -> u64 {
        self.m
    }

    pub fn occ_size(&self) -> usize {
        self.occ_sampled.values().next().map_or(0, |v| v.len())
    }

    /// Reassemble a sampled rank table from its persisted parts. Used by
    /// the loader.
    pub(crate) fn from_parts(
        bwt: Bwt,
        symbols: Vec<u8>,
        c: HashMap<u8, u64>,
        ep: HashMap<u8, u64>,
        occ_sampled: HashMap<u8, Vec<u64>>,
        m: u64,
    ) -> SampledRankTables {
        SampledRankTables {
            bwt,
            c,
            ep,
            occ_sampled,
            symbols,
            m,
        }
    }
}

impl Rank for SampledRankTables {
    fn c(&self, symbol: u8) -> Option<u64> {
        self.c.get(&symbol).copied()
    }

    fn ep(&self, symbol: u8) -> Option<u64> {
        self.ep.get(&symbol).copied()
    }

    fn rank(&self, symbol: u8, k: i64) -> u64 {
        if k < 0 {
            return 0;
        }
        let k = k as u64;
        let column = match self.occ_sampled.get(&symbol) {
            Some(c) => c,
            None => return 0,
        };
        let bucket = (k / self.m) as usize;
        let mut count = column[bucket];
        let gap_start = bucket as u64 * self.m + 1;
        for j in gap_start..=k {
            if self.bwt.bytes[j as usize] == symbol {
                count += 1;
            }
        }
        count
    }

    fn bwt(&self) -> &[u8] {
        &self.bwt.bytes
    }

    fn end_pos(&self) -> u64 {
        self.bwt.end_pos
    }

    fn symbols(&self) -> &[u8] {
        &self.symbols
    }

    fn persisted_occ(&self, symbol: u8) -> &[u64] {
        &self.occ_sampled[&symbol]
    }

    fn occ_size(&self) -> usize {
        SampledRankTables::occ_size(self)
    }

    fn m(&self) -> Option<u64> {
        Some(self.m)
    }
}
