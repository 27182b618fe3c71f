// Integration tests for measure/zero_page.rs: zero-page accounting.
//
//   - Only complete all-zero pages are subtracted from the effective size
//   - A short final page is scanned but never counted, even when all zero
//   - `analyze` leaves the stream at offset 0 for the chunking pass

use std::io::{Cursor, Read, Seek, SeekFrom};

use ztester::config::PAGE_SIZE;
use ztester::measure::{analyze, scan_zero_pages};

fn pages(pattern: &[bool]) -> Vec<u8> {
    let mut v = Vec::with_capacity(pattern.len() * PAGE_SIZE);
    for &zero in pattern {
        v.extend(std::iter::repeat(if zero { 0u8 } else { 0x5Au8 }).take(PAGE_SIZE));
    }
    v
}

#[test]
fn mixed_pages_count_only_zero_ones() {
    let data = pages(&[true, false, true, true, false]);
    let stats = scan_zero_pages(&data[..], PAGE_SIZE).unwrap();
    assert_eq!(stats.total_size, 5 * PAGE_SIZE as u64);
    assert_eq!(stats.zero_pages, 3);
    assert_eq!(stats.effective_size(), 2 * PAGE_SIZE as u64);
    assert_eq!(stats.pages_scanned(), 5);
}

#[test]
fn single_nonzero_byte_spoils_a_page() {
    let mut data = pages(&[true, true]);
    data[PAGE_SIZE + PAGE_SIZE / 2] = 1;
    let stats = scan_zero_pages(&data[..], PAGE_SIZE).unwrap();
    assert_eq!(stats.zero_pages, 1);
}

#[test]
fn ten_thousand_zero_bytes() {
    let data = vec![0u8; 10_000];
    let stats = scan_zero_pages(&data[..], PAGE_SIZE).unwrap();
    assert_eq!(stats.zero_pages, 2);
    assert!(stats.trailing_partial_zero);
    assert_eq!(stats.effective_size(), 1808);
}

#[test]
fn fully_zero_file_has_no_effective_size() {
    let data = pages(&[true, true, true]);
    let stats = scan_zero_pages(&data[..], PAGE_SIZE).unwrap();
    assert_eq!(stats.effective_size(), 0);
    assert!(!stats.is_empty());
}

#[test]
fn empty_input() {
    let stats = scan_zero_pages(&[][..], PAGE_SIZE).unwrap();
    assert!(stats.is_empty());
    assert_eq!(stats.pages_scanned(), 0);
    assert_eq!(stats.effective_size(), 0);
}

#[test]
fn analyze_rewinds_to_start() {
    let mut cur = Cursor::new(pages(&[false, true]));
    cur.seek(SeekFrom::Start(123)).unwrap();
    let stats = analyze(&mut cur).unwrap();
    assert_eq!(stats.zero_pages, 1);
    assert_eq!(cur.position(), 0);
    let mut first = [0u8; 1];
    cur.read_exact(&mut first).unwrap();
    assert_eq!(first[0], 0x5A);
}
