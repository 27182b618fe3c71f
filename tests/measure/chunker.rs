// Integration tests for measure/chunker.rs: fixed-size chunking.

use ztester::config::{ChunkSize, CHUNK_SIZES};
use ztester::measure::{chunk_count, ChunkReader};

#[test]
fn last_chunk_is_the_remainder() {
    let data: Vec<u8> = (0..40_000u32).map(|i| i as u8).collect();
    let mut r = ChunkReader::new(&data[..], 16_384).unwrap();
    let mut lens = Vec::new();
    let mut offsets = Vec::new();
    while let Some(c) = r.next_chunk().unwrap() {
        lens.push(c.len());
        offsets.push(c.offset);
        assert_eq!(c.data, &data[c.offset as usize..c.offset as usize + c.len()]);
    }
    assert_eq!(lens, vec![16_384, 16_384, 7_232]);
    assert_eq!(offsets, vec![0, 16_384, 32_768]);
    assert_eq!(r.bytes_read(), 40_000);
    assert_eq!(r.chunks_read(), 3);
}

#[test]
fn exact_multiple_has_no_empty_tail() {
    let data = vec![7u8; 65_536 * 2];
    let mut r = ChunkReader::new(&data[..], 65_536).unwrap();
    assert!(r.next_chunk().unwrap().is_some());
    assert!(r.next_chunk().unwrap().is_some());
    assert!(r.next_chunk().unwrap().is_none());
    assert!(r.next_chunk().unwrap().is_none());
}

#[test]
fn chunk_count_matches_reader_for_every_table_size() {
    let len = 3 * 1_048_576 + 17;
    let data = vec![1u8; len];
    for size in ChunkSize::all() {
        let mut r = ChunkReader::new(&data[..], size.bytes()).unwrap();
        let mut n = 0u64;
        while r.next_chunk().unwrap().is_some() {
            n += 1;
        }
        assert_eq!(n, chunk_count(len as u64, size.bytes()), "chunk size {}", size);
    }
}

#[test]
fn table_is_ascending() {
    assert!(CHUNK_SIZES.windows(2).all(|w| w[0] < w[1]));
    assert_eq!(ChunkSize::all().count(), CHUNK_SIZES.len());
    assert!(ChunkSize::from_index(CHUNK_SIZES.len()).is_none());
}
