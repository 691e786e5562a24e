// SPDX-License-Identifier: (Apache-2.0 OR MIT)

//! Positioned reads over a seekable input.
//!
//! Every read names the offset it starts from, so walking the section header
//! table and loading a section payload never have to agree on where a shared
//! cursor was left.

use std::io::{self, ErrorKind, Read, Seek, SeekFrom};

pub trait ByteSource {
    /// Fills `buf` with the bytes starting at `offset` and returns how many were
    /// read. Fewer than `buf.len()` means the source ended; 0 means `offset` is
    /// at or past the end.
    fn read_at(&mut self, offset: u64, buf: &mut [u8]) -> io::Result<usize>;

    /// Total length of the source in bytes.
    fn size(&mut self) -> io::Result<u64>;
}

impl<T: Read + Seek> ByteSource for T {
    fn read_at(&mut self, offset: u64, buf: &mut [u8]) -> io::Result<usize> {
        self.seek(SeekFrom::Start(offset))?;
        let mut filled = 0;
        while filled < buf.len() {
            match self.read(&mut buf[filled..]) {
                Ok(0) => break,
                Ok(n) => filled += n,
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(e) => return Err(e),
            }
        }
        Ok(filled)
    }

    fn size(&mut self) -> io::Result<u64> {
        self.seek(SeekFrom::End(0))
    }
}
