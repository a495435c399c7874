//! Bounded view over a shared `.dat` blob.

use std::io::{self, Read, Seek, SeekFrom, Write};

/// A reader restricted to the byte window `[offset, offset + size)` of an
/// underlying `.dat` stream. Used to hand out one logical game file embedded
/// in a shared data blob.
///
/// Reads and seeks are clamped to the window: reading past the end returns
/// short counts and then `0`, seeking outside the window stops at its edges.
/// Reading the whole region therefore works with plain [`Read::read_to_end`],
/// which also accumulates the short reads an underlying stream is allowed to
/// produce. Writing is not supported.
///
/// Two regions over the *same* underlying handle would fight over the seek
/// position; every region must own its handle.
pub struct ArchiveRegion<R> {
    inner: R,
    /// Absolute position of the first byte of the region.
    start: u64,
    /// Absolute position one past the last byte of the region.
    end: u64,
    /// Current absolute position in the underlying stream.
    pos: u64,
}

impl<R: Read + Seek> ArchiveRegion<R> {
    /// Create a region over `[offset, offset + size)` and position the
    /// underlying stream at its start.
    ///
    /// # Errors
    /// Returns an error if the initial seek fails.
    pub fn new(mut inner: R, offset: u64, size: u64) -> io::Result<Self> {
        inner.seek(SeekFrom::Start(offset))?;
        Ok(Self {
            inner,
            start: offset,
            end: offset.saturating_add(size),
            pos: offset,
        })
    }

    /// Total size of the region in bytes.
    #[must_use]
    pub fn len(&self) -> u64 {
        self.end - self.start
    }

    /// Whether the region is zero-sized.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.end == self.start
    }

    /// Bytes left between the current position and the end of the region.
    fn remaining(&self) -> u64 {
        self.end.saturating_sub(self.pos)
    }

    /// Read the rest of the region into a fresh buffer.
    ///
    /// Loops until the region is exhausted or the underlying stream has no
    /// more data, so a truncated `.dat` file yields a short buffer rather
    /// than an error.
    ///
    /// # Errors
    /// Returns an error if the underlying stream fails.
    pub fn read_all(&mut self) -> io::Result<Vec<u8>> {
        let mut buf = Vec::with_capacity(self.remaining() as usize);
        self.read_to_end(&mut buf)?;
        Ok(buf)
    }
}

impl<R: Read + Seek> Read for ArchiveRegion<R> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let max = self.remaining().min(buf.len() as u64) as usize;
        if max == 0 {
            return Ok(0);
        }
        let n = self.inner.read(&mut buf[..max])?;
        self.pos += n as u64;
        Ok(n)
    }
}

impl<R: Read + Seek> Seek for ArchiveRegion<R> {
    fn seek(&mut self, pos: SeekFrom) -> io::Result<u64> {
        let target = match pos {
            SeekFrom::Start(offset) => self.start.saturating_add(offset),
            SeekFrom::Current(delta) => offset_by(self.pos, delta),
            SeekFrom::End(delta) => offset_by(self.end, delta),
        };
        let clamped = target.clamp(self.start, self.end);
        self.inner.seek(SeekFrom::Start(clamped))?;
        self.pos = clamped;
        Ok(clamped - self.start)
    }
}

impl<R: Read + Seek> Write for ArchiveRegion<R> {
    fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
        Err(io::Error::new(
            io::ErrorKind::Unsupported,
            "archive regions are read-only",
        ))
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

fn offset_by(base: u64, delta: i64) -> u64 {
    if delta < 0 {
        base.saturating_sub(delta.unsigned_abs())
    } else {
        base.saturating_add(delta.unsigned_abs())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn blob() -> Cursor<Vec<u8>> {
        Cursor::new(b"aaaaHELLOWORLDzzzz".to_vec())
    }

    #[test]
    fn read_is_clamped_to_region() {
        let mut region = ArchiveRegion::new(blob(), 4, 10).unwrap();
        let mut buf = [0u8; 64];
        let n = region.read(&mut buf).unwrap();
        assert_eq!(&buf[..n], b"HELLOWORLD");
        assert_eq!(region.read(&mut buf).unwrap(), 0);
    }

    #[test]
    fn read_all_yields_exactly_region_size() {
        let mut region = ArchiveRegion::new(blob(), 4, 10).unwrap();
        let data = region.read_all().unwrap();
        assert_eq!(data, b"HELLOWORLD");
    }

    #[test]
    fn read_all_never_exceeds_region_for_long_streams() {
        let mut region = ArchiveRegion::new(Cursor::new(vec![7u8; 4096]), 0, 8).unwrap();
        assert_eq!(region.read_all().unwrap().len(), 8);
    }

    #[test]
    fn read_accumulates_partial_reads() {
        /// Yields at most one byte per read call.
        struct Trickle(Cursor<Vec<u8>>);

        impl Read for Trickle {
            fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
                let end = buf.len().min(1);
                self.0.read(&mut buf[..end])
            }
        }

        impl Seek for Trickle {
            fn seek(&mut self, pos: SeekFrom) -> io::Result<u64> {
                self.0.seek(pos)
            }
        }

        let mut region = ArchiveRegion::new(Trickle(blob()), 4, 10).unwrap();
        assert_eq!(region.read_all().unwrap(), b"HELLOWORLD");
    }

    #[test]
    fn truncated_underlying_stream_yields_short_region() {
        let mut region = ArchiveRegion::new(Cursor::new(b"abcdef".to_vec()), 4, 10).unwrap();
        assert_eq!(region.read_all().unwrap(), b"ef");
    }

    #[test]
    fn seek_clamps_to_region_edges() {
        let mut region = ArchiveRegion::new(blob(), 4, 10).unwrap();

        assert_eq!(region.seek(SeekFrom::Start(5)).unwrap(), 5);
        let mut buf = [0u8; 5];
        region.read_exact(&mut buf).unwrap();
        assert_eq!(&buf, b"WORLD");

        // before the start clamps to the start
        assert_eq!(region.seek(SeekFrom::Current(-100)).unwrap(), 0);
        // past the end clamps to the end
        assert_eq!(region.seek(SeekFrom::Start(100)).unwrap(), 10);
        assert_eq!(region.seek(SeekFrom::End(5)).unwrap(), 10);
        assert_eq!(region.seek(SeekFrom::End(-2)).unwrap(), 8);
        let mut tail = Vec::new();
        region.read_to_end(&mut tail).unwrap();
        assert_eq!(tail, b"LD");
    }

    #[test]
    fn write_is_unsupported() {
        let mut region = ArchiveRegion::new(blob(), 4, 10).unwrap();
        let err = region.write(b"nope").unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::Unsupported);
    }
}
