//! Symbol sources for capture sessions
//!
//! A symbol is one Unicode scalar value. Whitespace between symbols is
//! skipped, so a user may type one symbol per line and press enter.

use crate::error::CaptureError;
use std::io::{BufRead, ErrorKind};

/// Blocking source of symbols
pub trait SymbolSource {
    /// Next non-whitespace symbol, or `None` once the stream is exhausted
    fn next_symbol(&mut self) -> Result<Option<char>, CaptureError>;
}

/// UTF-8 symbol decoder over any buffered reader
#[derive(Debug)]
pub struct SymbolReader<R> {
    inner: R,
    offset: u64,
}

impl<R: BufRead> SymbolReader<R> {
    pub fn new(inner: R) -> Self {
        Self { inner, offset: 0 }
    }

    /// Bytes consumed from the underlying reader so far
    pub fn offset(&self) -> u64 {
        self.offset
    }

    fn read_byte(&mut self) -> Result<Option<u8>, CaptureError> {
        loop {
            let byte = match self.inner.fill_buf() {
                Ok(buf) => buf.first().copied(),
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(e) => return Err(e.into()),
            };
            if byte.is_some() {
                self.inner.consume(1);
                self.offset += 1;
            }
            return Ok(byte);
        }
    }

    fn read_char(&mut self) -> Result<Option<char>, CaptureError> {
        let start = self.offset;
        let Some(lead) = self.read_byte()? else {
            return Ok(None);
        };

        let width = match lead {
            0x00..=0x7F => 1,
            0xC0..=0xDF => 2,
            0xE0..=0xEF => 3,
            0xF0..=0xF7 => 4,
            _ => return Err(CaptureError::InvalidUtf8 { offset: start }),
        };

        let mut bytes = [lead, 0, 0, 0];
        for slot in bytes.iter_mut().take(width).skip(1) {
            match self.read_byte()? {
                Some(b) => *slot = b,
                None => return Err(CaptureError::InvalidUtf8 { offset: start }),
            }
        }

        std::str::from_utf8(&bytes[..width])
            .ok()
            .and_then(|s| s.chars().next())
            .map(Some)
            .ok_or(CaptureError::InvalidUtf8 { offset: start })
    }
}

impl<R: BufRead> SymbolSource for SymbolReader<R> {
    fn next_symbol(&mut self) -> Result<Option<char>, CaptureError> {
        while let Some(c) = self.read_char()? {
            if !c.is_whitespace() {
                return Ok(Some(c));
            }
        }
        Ok(None)
    }
}

impl<S: SymbolSource + ?Sized> SymbolSource for &mut S {
    fn next_symbol(&mut self) -> Result<Option<char>, CaptureError> {
        (**self).next_symbol()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn collect(input: &[u8]) -> Vec<char> {
        let mut reader = SymbolReader::new(Cursor::new(input.to_vec()));
        let mut out = Vec::new();
        while let Some(c) = reader.next_symbol().unwrap() {
            out.push(c);
        }
        out
    }

    #[test]
    fn test_reads_one_symbol_per_call() {
        assert_eq!(collect(b"abc"), vec!['a', 'b', 'c']);
    }

    #[test]
    fn test_skips_whitespace_and_newlines() {
        assert_eq!(collect(b"a\nb\r\n  c\t."), vec!['a', 'b', 'c', '.']);
    }

    #[test]
    fn test_keeps_case() {
        assert_eq!(collect(b"aA"), vec!['a', 'A']);
    }

    #[test]
    fn test_decodes_multibyte_symbols() {
        assert_eq!(collect("ж\né€".as_bytes()), vec!['ж', 'é', '€']);
    }

    #[test]
    fn test_end_of_stream_is_none() {
        let mut reader = SymbolReader::new(Cursor::new(b"  \n".to_vec()));
        assert!(reader.next_symbol().unwrap().is_none());
        assert!(reader.next_symbol().unwrap().is_none());
    }

    #[test]
    fn test_invalid_lead_byte_fails_fast() {
        let mut reader = SymbolReader::new(Cursor::new(vec![b'a', 0xFF, b'b']));
        assert_eq!(reader.next_symbol().unwrap(), Some('a'));
        let err = reader.next_symbol().unwrap_err();
        assert!(matches!(err, CaptureError::InvalidUtf8 { offset: 1 }));
    }

    #[test]
    fn test_truncated_sequence_fails_fast() {
        let mut reader = SymbolReader::new(Cursor::new(vec![0xE2, 0x82]));
        let err = reader.next_symbol().unwrap_err();
        assert!(matches!(err, CaptureError::InvalidUtf8 { offset: 0 }));
    }

    #[test]
    fn test_bad_continuation_byte_fails_fast() {
        let mut reader = SymbolReader::new(Cursor::new(vec![0xC3, b'a']));
        assert!(matches!(
            reader.next_symbol(),
            Err(CaptureError::InvalidUtf8 { offset: 0 })
        ));
    }

    #[test]
    fn test_offset_tracks_consumed_bytes() {
        let mut reader = SymbolReader::new(Cursor::new("a é".as_bytes().to_vec()));
        reader.next_symbol().unwrap();
        assert_eq!(reader.offset(), 1);
        reader.next_symbol().unwrap();
        assert_eq!(reader.offset(), 4);
    }
}
