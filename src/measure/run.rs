//! One compression run: every chunk of one input at one chunk size.
//!
//! [`run_chunks`] feeds each chunk from a [`ChunkReader`] to a
//! [`ChunkCompressor`] and sums the sizes it reports. A chunk that fails is
//! displayed, counted, and contributes exactly zero; the run keeps going. Only
//! a read error on the input itself ends the run early, as an `Err`.

use std::io::{self, Read};

use crate::displaylevel;

use super::chunker::ChunkReader;
use super::compressor::{ChunkCompressor, ChunkJob};

/// Totals for one (input, chunk size) run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunSummary {
    /// Chunks read from the input.
    pub chunks: u64,
    /// Chunks the compressor reported a size for.
    pub compressed_chunks: u64,
    /// Chunks that contributed nothing.
    pub failed_chunks: u64,
    /// Input bytes covered by all chunks.
    pub bytes_read: u64,
    /// Sum of the compressed sizes of the successful chunks.
    pub total_compressed_size: u64,
}

impl RunSummary {
    /// `true` when there is a non-zero compressed total to divide by.
    pub fn has_ratio(&self) -> bool {
        self.total_compressed_size > 0
    }

    fn record(&mut self, len: usize, outcome: Option<u64>) {
        self.chunks += 1;
        self.bytes_read += len as u64;
        match outcome {
            Some(size) => {
                self.compressed_chunks += 1;
                self.total_compressed_size += size;
            }
            None => self.failed_chunks += 1,
        }
    }
}

/// Split `reader` into `chunk_size` chunks and compress each one in turn.
///
/// `source_name` is passed through to the compressor to name its artifacts.
///
/// # Errors
/// Only input read errors (and a zero `chunk_size`) are returned; compressor
/// failures are absorbed into [`RunSummary::failed_chunks`].
pub fn run_chunks<R, C>(
    reader: R,
    source_name: &str,
    chunk_size: usize,
    compressor: &mut C,
) -> io::Result<RunSummary>
where
    R: Read,
    C: ChunkCompressor + ?Sized,
{
    let mut chunks = ChunkReader::new(reader, chunk_size)?;
    let mut summary = RunSummary::default();

    while let Some(chunk) = chunks.next_chunk()? {
        let job = ChunkJob { source_name, chunk_size, chunk };
        let outcome = match compressor.compress(&job) {
            Ok(size) => {
                displaylevel!(4, "chunk {} : {} -> {} bytes\n", chunk.index, chunk.len(), size);
                Some(size)
            }
            Err(e) => {
                displaylevel!(2, "{}\n", e);
                None
            }
        };
        summary.record(chunk.len(), outcome);
    }

    Ok(summary)
}
