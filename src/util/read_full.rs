//! `fread`-style buffer filling.
//!
//! `Read::read` may return fewer bytes than requested long before end of
//! stream (pipes, network filesystems). [`read_full`] keeps reading until the
//! buffer is full or the stream is exhausted, which is what both the page
//! scan and the chunk iterator need. Unlike `read_exact`, reaching end of
//! stream early is not an error.

use std::io::{self, ErrorKind, Read};

/// Fill `buf` from `reader`, returning the number of bytes read.
///
/// Returns less than `buf.len()` only at end of stream; `Ok(0)` means the
/// stream was already exhausted. `Interrupted` is retried; every other error
/// is returned to the caller, so a failing device is never mistaken for EOF.
pub fn read_full<R: Read + ?Sized>(reader: &mut R, buf: &mut [u8]) -> io::Result<usize> {
    let mut filled = 0;
    while filled < buf.len() {
        match reader.read(&mut buf[filled..]) {
            Ok(0) => break,
            Ok(n) => filled += n,
            Err(e) if e.kind() == ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        }
    }
    Ok(filled)
}
