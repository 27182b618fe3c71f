//! Fixed-size chunk iteration over an input stream.
//!
//! [`ChunkReader`] owns one heap buffer of exactly `chunk_size` bytes and
//! refills it for every chunk, so the allocation happens once per
//! (file, chunk size) pair no matter how large the chunk size is. Chunks are
//! handed out as borrowed [`Chunk`] views; the next call to
//! [`ChunkReader::next_chunk`] overwrites the previous one.

use std::io::{self, Read};

use crate::util::read_full;

/// A contiguous slice of the input, valid until the next [`ChunkReader::next_chunk`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Chunk<'a> {
    /// Zero-based position of this chunk within the run.
    pub index: u64,
    /// Byte offset of the chunk within the input.
    pub offset: u64,
    pub data: &'a [u8],
}

impl Chunk<'_> {
    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

/// Splits a reader into chunks of at most `chunk_size` bytes.
#[derive(Debug)]
pub struct ChunkReader<R> {
    reader: R,
    buf: Vec<u8>,
    next_index: u64,
    offset: u64,
    exhausted: bool,
}

impl<R: Read> ChunkReader<R> {
    /// Wrap `reader`, which should be positioned at the first byte to chunk.
    ///
    /// # Errors
    /// `InvalidInput` if `chunk_size` is zero.
    pub fn new(reader: R, chunk_size: usize) -> io::Result<Self> {
        if chunk_size == 0 {
            return Err(io::Error::new(io::ErrorKind::InvalidInput, "chunk size must be non-zero"));
        }
        Ok(ChunkReader {
            reader,
            buf: vec![0u8; chunk_size],
            next_index: 0,
            offset: 0,
            exhausted: false,
        })
    }

    /// Read the next chunk. Every chunk but the last is exactly `chunk_size`
    /// bytes; `Ok(None)` signals end of input.
    ///
    /// A read error is returned as-is and does not end the iteration
    /// silently; the reader should be considered unusable afterwards.
    pub fn next_chunk(&mut self) -> io::Result<Option<Chunk<'_>>> {
        if self.exhausted {
            return Ok(None);
        }
        let n = read_full(&mut self.reader, &mut self.buf)?;
        if n < self.buf.len() {
            self.exhausted = true;
        }
        if n == 0 {
            return Ok(None);
        }

        let (index, offset) = (self.next_index, self.offset);
        self.next_index += 1;
        self.offset += n as u64;
        Ok(Some(Chunk {
            index,
            offset,
            data: &self.buf[..n],
        }))
    }

    pub fn chunk_size(&self) -> usize {
        self.buf.len()
    }

    /// Chunks handed out so far.
    pub fn chunks_read(&self) -> u64 {
        self.next_index
    }

    /// Bytes handed out so far.
    pub fn bytes_read(&self) -> u64 {
        self.offset
    }

    pub fn into_inner(self) -> R {
        self.reader
    }
}

/// Number of chunks a `len`-byte input splits into: `ceil(len / chunk_size)`.
pub fn chunk_count(len: u64, chunk_size: usize) -> u64 {
    if chunk_size == 0 {
        return 0;
    }
    len.div_ceil(chunk_size as u64)
}
