// Integration tests for the scenarios literally enumerated in the
// specification: build, save, reload, and search against a freshly
// ingested text.

use dna_fm_index::data_structures::fmindex::{CompressedIndex, Index};
use dna_fm_index::io::persistence;
use dna_fm_index::Text;

fn sorted(mut hits: Vec<u64>) -> Vec<u64> {
    hits.sort_unstable();
    hits
}

#[test]
fn scenario_s1_abracadabra() {
    let index = Index::build(Text::from_bytes(b"abracadabra".to_vec()));
    assert_eq!(sorted(index.search(b"abra")), vec![0, 7]);
    assert!(index.search(b"q").is_empty());
    assert_eq!(index.count(b"a"), 5);
}

#[test]
fn scenario_s2_mississippi() {
    let index = Index::build(Text::from_bytes(b"mississippi".to_vec()));
    assert_eq!(sorted(index.search(b"issi")), vec![1, 4]);
    assert_eq!(sorted(index.search(b"ss")), vec![2, 5]);
    assert!(index.search(b"x").is_empty());
}

#[test]
fn scenario_s3_dna_small() {
    let index = Index::build(Text::from_raw_bytes(b"ACGTACGT".to_vec()).unwrap());
    assert_eq!(sorted(index.search(b"ACGT")), vec![0, 4]);
    assert!(index.search(b"N").is_empty());

    let normalized = Index::build(Text::from_raw_bytes(b"ACGNACGT".to_vec()).unwrap());
    assert!(normalized.search(b"N").is_empty());
}

#[test]
fn scenario_s4_multi_record_fasta() {
    let mut f = tempfile::Builder::new().suffix(".fasta").tempfile().unwrap();
    use std::io::Write;
    writeln!(f, ">r1").unwrap();
    writeln!(f, "ACGT").unwrap();
    writeln!(f, ">r2").unwrap();
    writeln!(f, "ACGT").unwrap();

    let text = Text::from_fasta_file(f.path()).unwrap();
    assert_eq!(text.as_bytes(), b"ACGT|ACGT$");
    let index = Index::build(text);
    assert_eq!(index.search(b"GT|AC"), vec![2]);
}

#[test]
fn scenario_s5_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let text = Text::from_bytes(b"ACGTACGTACGT".to_vec());
    let index = Index::build(text);
    persistence::save(&index, dir.path()).unwrap();

    let loaded = persistence::load_full(dir.path()).unwrap();
    assert_eq!(sorted(loaded.search(b"ACG")), vec![0, 4, 8]);
    assert_eq!(loaded.search(b"ACG"), index.search(b"ACG"));
}

#[test]
fn scenario_s6_sampled_equivalence() {
    let text = Text::from_bytes(b"AAAACCCCGGGGTTTT".to_vec());
    let full = Index::build(text.clone());
    let compressed = CompressedIndex::build(text, 4);
    assert_eq!(full.count(b"CCC"), 2);
    assert_eq!(full.count(b"CCC"), compressed.count(b"CCC"));
}

#[test]
fn compressed_round_trips_through_disk_too() {
    let dir = tempfile::tempdir().unwrap();
    let text = Text::from_bytes(b"ACGTACGTACGTGGGGCCCCAAAATTTT".to_vec());
    let index = CompressedIndex::build(text, 8);
    persistence::save(&index, dir.path()).unwrap();

    let loaded = persistence::load_compressed(dir.path()).unwrap();
    assert_eq!(loaded.m(), 8);
    assert_eq!(sorted(loaded.search(b"ACGT")), sorted(index.search(b"ACGT")));
}

#[test]
fn auto_detecting_loader_dispatches_correctly() {
    let dir_full = tempfile::tempdir().unwrap();
    let dir_compressed = tempfile::tempdir().unwrap();
    let text = Text::from_bytes(b"ACGTACGTACGT".to_vec());

    persistence::save(&Index::build(text.clone()), dir_full.path()).unwrap();
    persistence::save(&CompressedIndex::build(text, 4), dir_compressed.path()).unwrap();

    let full = persistence::load(dir_full.path()).unwrap();
    let compressed = persistence::load(dir_compressed.path()).unwrap();
    assert_eq!(full.count(b"ACG"), compressed.count(b"ACG"));
}
