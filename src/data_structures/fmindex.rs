// Copyright 2014-2016 Johannes Köster, Taylor Cramer.
// Copyright 2013 Vinhthuy Phan (original Go package `fmi`)
// Licensed under the MIT license (http://opensource.org/licenses/MIT)
// This file may not be copied, modified, or distributed
// except according to those terms.

//! The FM-Index: a suffix-array-backed index supporting backward
//! search in time linear in the pattern length and independent of the
//! text length. `Index` keeps full occurrence tables; `CompressedIndex`
//! samples them every `M` rows, trading an O(M) slowdown per rank
//! query for much less resident memory.

use log::debug;

use crate::data_structures::bwt::{build_bwt, RankTables, SampledRankTables};
use crate::data_structures::suffix_array::{suffix_array_naive, suffix_array_qsufsort};
use crate::search::{backward_search_from, SearchState};
use crate::text::Text;

/// Suffix array construction strategy. `QSufSort` is the default for
/// `Index::build`; `Naive` exists for tests and small inputs where the
/// O(n^2 log n) reference implementation is cheap enough to double-check
/// `QSufSort` against (Testable Property 7).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SuffixArrayAlgorithm {
    Naive,
    QSufSort,
}

fn build_suffix_array(text: &[u8], algorithm: SuffixArrayAlgorithm) -> Vec<u64> {
    match algorithm {
        SuffixArrayAlgorithm::Naive => suffix_array_naive(text),
        SuffixArrayAlgorithm::QSufSort => suffix_array_qsufsort(text),
    }
}

/// An FM-index over a single ingested `Text`. Generic over the rank
/// table flavor (`RankTables` for the full index, `SampledRankTables`
/// for the compressed one); see the `Index` / `CompressedIndex` type
/// aliases below.
pub struct IndexBackend<R> {
    text: Text,
    sa: Vec<u64>,
    tables: R,
}

/// The uncompressed FM-index: full `OCC` tables, O(1) rank queries.
pub type Index = IndexBackend<RankTables>;

/// The sampled/compressed FM-index: `OCC` kept only every `M` rows.
pub type CompressedIndex = IndexBackend<SampledRankTables>;

impl Index {
    /// Build a full-table index using `qsufsort`.
    pub fn build(text: Text) -> Index {
        Index::build_with(text, SuffixArrayAlgorithm::QSufSort)
    }

    /// Build a full-table index with an explicit suffix array
    /// algorithm. Exposed mainly so tests can cross-check `Naive`
    /// against `QSufSort` on the same text.
    pub fn build_with(text: Text, algorithm: SuffixArrayAlgorithm) -> Index {
        let sa = build_suffix_array(text.as_bytes(), algorithm);
        let bwt = build_bwt(text.as_bytes(), &sa);
        debug!("built BWT and suffix array for {} byte text", text.len());
        let tables = RankTables::new(text.as_bytes(), bwt);
        IndexBackend { text, sa, tables }
    }
}

impl CompressedIndex {
    /// Build a sampled index with bucket size `m`.
    pub fn build(text: Text, m: u64) -> CompressedIndex {
        let sa = build_suffix_array(text.as_bytes(), SuffixArrayAlgorithm::QSufSort);
        let bwt = build_bwt(text.as_bytes(), &sa);
        debug!(
            "built sampled BWT and suffix array for {} byte text (m={})",
            text.len(),
            m
        );
        let tables = SampledRankTables::new(text.as_bytes(), bwt, m);
        IndexBackend { text, sa, tables }
    }

    pub fn m(&self) -> u64 {
        self.tables.m()
    }
}

impl<R> IndexBackend<R> {
    /// Assemble an index from its already-built parts. Used by the
    /// loader, which reconstructs `text`, `sa` and `tables` from disk
    /// rather than building them from a freshly ingested `Text`.
    pub(crate) fn from_parts(text: Text, sa: Vec<u64>, tables: R) -> IndexBackend<R> {
        IndexBackend { text, sa, tables }
    }
}

impl<R: crate::data_structures::bwt::Rank> IndexBackend<R> {
    /// Text positions where `pattern` occurs.
    pub fn search(&self, pattern: &[u8]) -> Vec<u64> {
        if pattern.is_empty() {
            return Vec::new();
        }
        self.search_from(pattern, pattern.len() - 1).locate(&self.sa)
    }

    /// Number of occurrences of `pattern`, without materializing
    /// locations.
    pub fn count(&self, pattern: &[u8]) -> u64 {
        if pattern.is_empty() {
            return 0;
        }
        self.search_from(pattern, pattern.len() - 1).count()
    }

    /// Backward-search `pattern`, starting from `pattern[start]` rather
    /// than the last byte, returning the raw `(sp, ep,
    /// last_matched_index)` state so callers can extend a partial match
    /// further to the left.
    pub fn search_from(&self, pattern: &[u8], start: usize) -> SearchState {
        backward_search_from(&self.tables, pattern, start)
    }

    /// Equivalent to `search(&text[j..j+l])`, without allocating the
    /// slice as a standalone pattern.
    pub fn repeat(&self, j: usize, l: usize) -> Vec<u64> {
        self.search(&self.text.as_bytes()[j..j + l])
    }

    pub fn len(&self) -> usize {
        self.text.len()
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    pub fn text(&self) -> &Text {
        &self.text
    }

    pub fn sa(&self) -> &[u64] {
        &self.sa
    }

    pub fn tables(&self) -> &R {
        &self.tables
    }
}
