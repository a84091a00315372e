// Copyright 2013 Vinhthuy Phan (original Go package `fmi`)
// Copyright 2014-2016 Johannes Köster, Taylor Cramer (bio crate conventions)
// Licensed under the MIT license (http://opensource.org/licenses/MIT)
// This file may not be copied, modified, or distributed
// except according to those terms.

//! Suffix array construction. Two algorithms are provided and must
//! agree on every input: a reference comparison sort (`suffix_array_naive`,
//! used for tests and tiny inputs) and `qsufsort`
//! (`suffix_array_qsufsort`, Larsson-Sadakane doubling), used by
//! `Index::build`.
//!
//! Both rely on the sentinel `$` (`0x24`) having the smallest byte value
//! of any symbol in the alphabet this crate accepts (`A`, `C`, `G`, `T`,
//! `Z`, `|`), so ordinary byte-wise comparison already treats it as
//! strictly smallest: no custom comparator is needed.

/// Sort suffixes of `text` by direct lexicographic comparison of the
/// remaining byte slice. O(n^2 log n) worst case; intended for tests and
/// inputs of at most a few thousand bytes.
pub fn suffix_array_naive(text: &[u8]) -> Vec<u64> {
    let n = text.len();
    let mut sa: Vec<u64> = (0..n as u64).collect();
    sa.sort_unstable_by(|&a, &b| text[a as usize..].cmp(&text[b as usize..]));
    sa
}

/// Construct the suffix array of `text` via Larsson-Sadakane doubling
/// (`qsufsort`). Runs in O(n log n): `h` (the matched-prefix length)
/// doubles each round, and already-sorted singleton groups are skipped
/// without being re-examined, so only suffixes still tied at the current
/// prefix length pay for further sorting.
pub fn suffix_array_qsufsort(text: &[u8]) -> Vec<u64> {
    let n = text.len();
    if n == 0 {
        return Vec::new();
    }

    // Initial grouping: bucket sort by first byte. `group[i]` is set to
    // the start index, within `sa`, of the bucket that suffix `i`
    // belongs to -- this "group leader is the run's start offset"
    // invariant is what lets later rounds detect already-sorted runs
    // with a single linear scan.
    let mut counts = [0usize; 256];
    for &b in text {
        counts[b as usize] += 1;
    }
    let mut starts = [0usize; 256];
    let mut sum = 0usize;
    for c in 0..256 {
        starts[c] = sum;
        sum += counts[c];
    }

    let mut sa = vec![0u64; n];
    {
        let mut cursor = starts;
        for (i, &b) in text.iter().enumerate() {
            let slot = &mut cursor[b as usize];
            sa[*slot] = i as u64;
            *slot += 1;
        }
    }

    let mut group = vec![0i64; n];
    for (i, &b) in text.iter().enumerate() {
        group[i] = starts[b as usize] as i64;
    }

    let key2 = |group: &[i64], pos: u64, h: u64| -> i64 {
        let target = pos + h;
        if target as usize >= n {
            -1
        } else {
            group[target as usize]
        }
    };

    let mut h: u64 = 1;
    while h < n as u64 {
        let mut i = 0usize;
        let mut any_multi = false;
        while i < n {
            let leader = group[sa[i] as usize] as usize;
            debug_assert_eq!(leader, i, "group leader must equal run start");
            let mut j = i + 1;
            while j < n && group[sa[j] as usize] as usize == i {
                j += 1;
            }
            if j - i > 1 {
                any_multi = true;
                let run = &mut sa[i..j];
                run.sort_unstable_by_key(|&pos| key2(&group, pos, h));
                // Re-split the now key2-sorted run into new groups.
                let mut k = i;
                while k < j {
                    let mut m = k + 1;
                    let key_k = key2(&group, sa[k], h);
                    while m < j && key2(&group, sa[m], h) == key_k {
                        m += 1;
                    }
                    for idx in k..m {
                        group[sa[idx] as usize] = k as i64;
                    }
                    k = m;
                }
            }
            i = j;
        }
        if !any_multi {
            break;
        }
        h *= 2;
    }

    sa
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_abracadabra() {
        let text = b"abracadabra$";
        let expected = vec![11, 10, 7, 0, 3, 5, 8, 1, 4, 6, 9, 2];
        assert_eq!(suffix_array_naive(text), expected);
        assert_eq!(suffix_array_qsufsort(text), expected);
    }

    #[test]
    fn test_mississippi() {
        let text = b"mississippi$";
        let naive = suffix_array_naive(text);
        let qsuf = suffix_array_qsufsort(text);
        assert_eq!(naive, qsuf);
    }

    #[test]
    fn test_single_symbol_run() {
        let text = b"AAAA$";
        let naive = suffix_array_naive(text);
        let qsuf = suffix_array_qsufsort(text);
        assert_eq!(naive, qsuf);
        assert_eq!(naive, vec![4, 3, 2, 1, 0]);
    }

    #[test]
    fn test_empty() {
        assert_eq!(suffix_array_naive(b""), Vec::<u64>::new());
        assert_eq!(suffix_array_qsufsort(b""), Vec::<u64>::new());
    }

    proptest::proptest! {
        #[test]
        fn test_naive_qsufsort_agree(
            bases in proptest::collection::vec(0..4usize, 0..2000)
        ) {
            const ALPHABET: [u8; 4] = [b'A', b'C', b'G', b'T'];
            let mut text: Vec<u8> = bases.iter().map(|&i| ALPHABET[i]).collect();
            text.push(b'$');
            let naive = suffix_array_naive(&text);
            let qsuf = suffix_array_qsufsort(&text);
            proptest::prop_assert_eq!(naive, qsuf);
        }
    }
}
