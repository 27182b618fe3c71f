//! Zero-page analysis.
//!
//! Memory dumps are dominated by pages that were never touched. Those pages
//! compress to almost nothing and inflate the raw ratio, so the harness also
//! reports an *effective* ratio computed against the file size minus the
//! bytes held in all-zero pages.
//!
//! The file is read page by page. A trailing read shorter than a page is
//! zero-padded before the test, so [`ZeroPageStats::trailing_partial_zero`]
//! reports whether the tail is all zero, but only full pages are subtracted
//! from the effective size: a partial page never removes more bytes than the
//! file holds.

use std::io::{self, Read, Seek, SeekFrom};

use crate::config::PAGE_SIZE;
use crate::util::read_full;

/// Result of one zero-page scan.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ZeroPageStats {
    /// Bytes read from the input.
    pub total_size: u64,
    /// Full pages consisting entirely of zero bytes.
    pub zero_pages: u64,
    /// `true` when the input ends with a partial page that is all zero.
    pub trailing_partial_zero: bool,
    /// Page size the scan ran with.
    pub page_size: usize,
}

impl ZeroPageStats {
    /// Bytes held in all-zero full pages.
    pub fn zero_bytes(&self) -> u64 {
        self.zero_pages * self.page_size as u64
    }

    /// `total_size - zero_pages * page_size`.
    pub fn effective_size(&self) -> u64 {
        self.total_size.saturating_sub(self.zero_bytes())
    }

    /// Number of page-sized reads the scan performed, including a partial tail.
    pub fn pages_scanned(&self) -> u64 {
        self.total_size.div_ceil(self.page_size as u64)
    }

    pub fn is_empty(&self) -> bool {
        self.total_size == 0
    }
}

#[inline]
fn is_zero_page(page: &[u8]) -> bool {
    page.iter().all(|&b| b == 0)
}

/// Scan `reader` to end of stream in `page_size` reads and count all-zero pages.
///
/// # Errors
/// Returns `InvalidInput` if `page_size` is zero, and any read error other
/// than `Interrupted` unchanged.
pub fn scan_zero_pages<R: Read>(mut reader: R, page_size: usize) -> io::Result<ZeroPageStats> {
    if page_size == 0 {
        return Err(io::Error::new(io::ErrorKind::InvalidInput, "page size must be non-zero"));
    }

    let mut page = vec![0u8; page_size];
    let mut stats = ZeroPageStats {
        total_size: 0,
        zero_pages: 0,
        trailing_partial_zero: false,
        page_size,
    };

    loop {
        let n = read_full(&mut reader, &mut page)?;
        if n == 0 {
            break;
        }
        stats.total_size += n as u64;

        if n < page_size {
            // Last read: pad with zeros, then test the padded page.
            page[n..].fill(0);
            stats.trailing_partial_zero = is_zero_page(&page);
            break;
        }
        if is_zero_page(&page) {
            stats.zero_pages += 1;
        }
    }

    Ok(stats)
}

/// Scan a seekable input with [`PAGE_SIZE`] pages and rewind it to the start.
///
/// The scan always starts from offset 0 regardless of the current position,
/// and the input is left at offset 0 so chunking can begin immediately.
pub fn analyze<R: Read + Seek>(input: &mut R) -> io::Result<ZeroPageStats> {
    input.seek(SeekFrom::Start(0))?;
    let stats = scan_zero_pages(&mut *input, PAGE_SIZE)?;
    input.seek(SeekFrom::Start(0))?;
    Ok(stats)
}
