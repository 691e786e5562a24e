// SPDX-License-Identifier: (Apache-2.0 OR MIT)

//! Finding NUL-terminated runs of printable bytes in a section buffer.

/// Byte classes the scanner distinguishes. ASCII only.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ByteClass {
    Nul,
    /// Space, `\t`, `\n`, `\v`, `\f` and `\r`.
    Whitespace,
    /// Graphic ASCII, `0x21..=0x7e`.
    Printable,
    Other,
}

impl ByteClass {
    pub fn of(byte: u8) -> ByteClass {
        match byte {
            0 => ByteClass::Nul,
            b' ' | b'\t' | b'\n' | 0x0b | 0x0c | b'\r' => ByteClass::Whitespace,
            0x21..=0x7e => ByteClass::Printable,
            _ => ByteClass::Other,
        }
    }
}

pub fn is_whitespace(byte: u8) -> bool {
    ByteClass::of(byte) == ByteClass::Whitespace
}

/// Half-open range `[start, end)` of a string inside a section buffer. The byte
/// at `end` is the terminating NUL.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StringSpan {
    pub start: usize,
    pub end: usize,
}

impl StringSpan {
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    pub fn bytes<'a>(&self, buf: &'a [u8]) -> &'a [u8] {
        &buf[self.start..self.end]
    }
}

/// Scans `buf` for strings of at least `min_length` bytes.
pub fn scan(buf: &[u8], min_length: usize) -> Spans<'_> {
    Spans {
        buf,
        min_length,
        pos: 0,
        start: None,
    }
}

/// Iterator returned by [`scan`]. A clone resumes from the same position; call
/// [`scan`] again to start over.
#[derive(Debug, Clone)]
pub struct Spans<'a> {
    buf: &'a [u8],
    min_length: usize,
    pos: usize,
    /// Start of the run in progress, if any.
    start: Option<usize>,
}

impl Iterator for Spans<'_> {
    type Item = StringSpan;

    fn next(&mut self) -> Option<StringSpan> {
        while self.pos < self.buf.len() {
            let i = self.pos;
            self.pos += 1;
            match (ByteClass::of(self.buf[i]), self.start) {
                (ByteClass::Nul, Some(start)) => {
                    self.start = None;
                    if i - start >= self.min_length {
                        return Some(StringSpan { start, end: i });
                    }
                }
                (ByteClass::Nul, None) => {}
                (ByteClass::Other, _) => self.start = None,
                // Whitespace is tolerated inside a run but never starts one.
                (ByteClass::Printable, None) => self.start = Some(i),
                (ByteClass::Printable, Some(_)) | (ByteClass::Whitespace, _) => {}
            }
        }
        // A run still open here has no terminating NUL and is dropped.
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(buf: &[u8], min_length: usize) -> Vec<&[u8]> {
        scan(buf, min_length).map(|s| s.bytes(buf)).collect()
    }

    #[test]
    fn test_byte_classes() {
        assert_eq!(ByteClass::of(0), ByteClass::Nul);
        assert_eq!(ByteClass::of(b' '), ByteClass::Whitespace);
        assert_eq!(ByteClass::of(b'\t'), ByteClass::Whitespace);
        assert_eq!(ByteClass::of(b'a'), ByteClass::Printable);
        assert_eq!(ByteClass::of(b'~'), ByteClass::Printable);
        assert_eq!(ByteClass::of(0x7f), ByteClass::Other);
        assert_eq!(ByteClass::of(0x01), ByteClass::Other);
        assert_eq!(ByteClass::of(0xc3), ByteClass::Other);
    }

    #[test]
    fn test_threshold_is_inclusive() {
        let buf = b"hello\0tiny\0toolongtoexcludewithcustomthreshold\0";
        assert_eq!(
            strings(buf, 4),
            vec![
                &b"hello"[..],
                &b"tiny"[..],
                &b"toolongtoexcludewithcustomthreshold"[..]
            ]
        );
        assert_eq!(
            strings(buf, 5),
            vec![&b"hello"[..], &b"toolongtoexcludewithcustomthreshold"[..]]
        );
        assert_eq!(
            strings(buf, 6),
            vec![&b"toolongtoexcludewithcustomthreshold"[..]]
        );
    }

    #[test]
    fn test_leading_whitespace_is_skipped_inner_is_kept() {
        let buf = b"   two  words\tand tab \0";
        let spans: Vec<_> = scan(buf, 3).collect();
        assert_eq!(spans, vec![StringSpan { start: 3, end: 22 }]);
        assert_eq!(spans[0].bytes(buf), b"two  words\tand tab ");
    }

    #[test]
    fn test_whitespace_only_run_is_not_a_string() {
        assert!(strings(b"      \0", 1).is_empty());
    }

    #[test]
    fn test_control_byte_breaks_run() {
        let buf = b"abc\x01def\0";
        assert_eq!(strings(buf, 3), vec![&b"def"[..]]);
        assert_eq!(strings(b"abc\x80\0", 1), Vec::<&[u8]>::new());
    }

    #[test]
    fn test_unterminated_run_is_dropped() {
        assert_eq!(strings(b"first\0second", 3), vec![&b"first"[..]]);
        assert!(strings(b"", 0).is_empty());
        assert!(strings(b"\0\0\0", 0).is_empty());
    }

    #[test]
    fn test_scan_is_repeatable() {
        let buf = b"\x7fELF\0\0rodata string\0\x02\x03 x\0another one\0";
        let first: Vec<_> = scan(buf, 3).collect();
        let second: Vec<_> = scan(buf, 3).collect();
        assert_eq!(first, second);
        assert_eq!(first.len(), 3);
    }

    #[test]
    fn test_spans_respect_invariants() {
        // A mix of every byte value, NULs sprinkled in.
        let buf: Vec<u8> = (0u16..2048)
            .map(|i| match i % 37 {
                0 => 0,
                n => ((i * 7 + n) % 256) as u8,
            })
            .collect();
        for min_length in 0..6 {
            for span in scan(&buf, min_length) {
                assert!(span.len() >= min_length);
                assert_eq!(buf[span.end], 0);
                assert_eq!(ByteClass::of(buf[span.start]), ByteClass::Printable);
                assert!(span.bytes(&buf).iter().all(|&b| matches!(
                    ByteClass::of(b),
                    ByteClass::Printable | ByteClass::Whitespace
                )));
            }
        }
    }
}
