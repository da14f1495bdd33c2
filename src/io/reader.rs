use log::trace;
use crate::error::{Error, Result};

/// A forward-only cursor over an in-memory byte buffer.
///
/// Every read is bounds checked: reading past the end fails with
/// [`Error::UnexpectedEof`] and leaves the cursor where it was.
#[derive(Clone, Debug)]
pub struct ByteReader<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> ByteReader<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        ByteReader { data, pos: 0 }
    }

    /// Offset of the next byte to be read.
    pub fn position(&self) -> usize { self.pos }

    /// Number of bytes left.
    pub fn remaining(&self) -> usize { self.data.len() - self.pos }

    pub fn is_at_end(&self) -> bool { self.pos >= self.data.len() }

    /// The whole underlying buffer.
    pub fn data(&self) -> &'a [u8] { self.data }

    /// Consume `n` bytes.
    pub fn read_bytes(&mut self, n: usize) -> Result<&'a [u8]> {
        if n > self.remaining() {
            return Err(Error::UnexpectedEof { offset: self.pos,
                                              needed: n - self.remaining() })
        }
        let bytes = &self.data[self.pos .. self.pos + n];
        self.pos += n;
        Ok(bytes)
    }

    pub fn read_array<const N: usize>(&mut self) -> Result<[u8; N]> {
        let mut a = [0; N];
        a.copy_from_slice(self.read_bytes(N)?);
        Ok(a)
    }

    pub fn skip(&mut self, n: usize) -> Result<()> {
        self.read_bytes(n).map(|_| ())
    }

    /// Return the next `n` bytes without consuming them, or `None` if
    /// fewer are left.
    pub fn peek(&self, n: usize) -> Option<&'a [u8]> {
        self.data.get(self.pos .. self.pos + n)
    }

    pub fn read_u8(&mut self) -> Result<u8> {
        Ok(self.read_array::<1>()?[0])
    }

    pub fn read_u16_be(&mut self) -> Result<u16> {
        Ok(u16::from_be_bytes(self.read_array()?))
    }

    pub fn read_u16_le(&mut self) -> Result<u16> {
        Ok(u16::from_le_bytes(self.read_array()?))
    }

    pub fn read_i16_be(&mut self) -> Result<i16> {
        Ok(i16::from_be_bytes(self.read_array()?))
    }

    pub fn read_u32_be(&mut self) -> Result<u32> {
        Ok(u32::from_be_bytes(self.read_array()?))
    }

    pub fn read_u32_le(&mut self) -> Result<u32> {
        Ok(u32::from_le_bytes(self.read_array()?))
    }

    pub fn read_f32_be(&mut self) -> Result<f32> {
        Ok(f32::from_be_bytes(self.read_array()?))
    }

    /// Read a four byte tag such as `b"RGB "`.
    pub fn read_tag(&mut self) -> Result<[u8; 4]> {
        self.read_array()
    }

    /// Consume `magic`, failing with [`Error::InvalidMagic`] if the data
    /// does not start with it.
    pub fn expect_magic(&mut self, magic: &[u8]) -> Result<()> {
        match self.peek(magic.len()) {
            Some(found) if found == magic => {
                self.pos += magic.len();
                Ok(())
            }
            found => Err(Error::InvalidMagic {
                expected: String::from_utf8_lossy(magic).into_owned(),
                found: String::from_utf8_lossy(
                    found.unwrap_or(&self.data[self.pos ..])).into_owned(),
            }),
        }
    }

    /// Read `units` UTF-16 big-endian code units.  Trailing NUL
    /// characters are dropped.
    pub fn read_utf16_be_string(&mut self, units: usize) -> Result<String> {
        let bytes = self.read_bytes(units.checked_mul(2)
                                    .ok_or(Error::InvalidString)?)?;
        let mut code: Vec<u16> = bytes.chunks_exact(2)
            .map(|b| u16::from_be_bytes([b[0], b[1]])).collect();
        while code.last() == Some(&0) { code.pop(); }
        String::from_utf16(&code).map_err(|_| Error::InvalidString)
    }

    /// Read a UTF-16BE string preceded by its length in code units as a
    /// big-endian `u16`.
    pub fn read_pascal_utf16_be_u16(&mut self) -> Result<String> {
        let units = self.read_u16_be()? as usize;
        self.read_utf16_be_string(units)
    }

    /// Read a UTF-16BE string preceded by its length in code units as a
    /// big-endian `u32`.
    pub fn read_pascal_utf16_be_u32(&mut self) -> Result<String> {
        let units = self.read_u32_be()? as usize;
        self.read_utf16_be_string(units)
    }

    /// Move the cursor just past the next occurrence of `pattern`.
    ///
    /// The scan never goes beyond the end of the buffer; if the pattern
    /// does not occur the cursor is unchanged and
    /// [`Error::PatternNotFound`] is returned.
    pub fn seek_to_pattern(&mut self, pattern: &[u8]) -> Result<usize> {
        if pattern.is_empty() { return Ok(self.pos) }
        let found = self.data[self.pos ..].windows(pattern.len())
            .position(|w| w == pattern)
            .ok_or(Error::PatternNotFound)?;
        let start = self.pos + found;
        trace!("pattern {:?} found at offset {start}",
               String::from_utf8_lossy(pattern));
        self.pos = start + pattern.len();
        Ok(start)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn integers() {
        let data = [0x12, 0x34, 0x56, 0x78, 0xFF, 0xFE];
        let mut r = ByteReader::new(&data);
        assert_eq!(r.read_u16_be().unwrap(), 0x1234);
        assert_eq!(r.read_u16_le().unwrap(), 0x7856);
        assert_eq!(r.read_i16_be().unwrap(), -2);
        assert!(r.is_at_end());
        let mut r = ByteReader::new(&data);
        assert_eq!(r.read_u32_be().unwrap(), 0x12345678);
        let mut r = ByteReader::new(&data);
        assert_eq!(r.read_u32_le().unwrap(), 0x78563412);
        let mut r = ByteReader::new(&[0x3F, 0x80, 0, 0]);
        assert_eq!(r.read_f32_be().unwrap(), 1.0);
    }

    #[test]
    fn eof_does_not_move() {
        let mut r = ByteReader::new(&[1, 2, 3]);
        r.read_u8().unwrap();
        match r.read_u32_be() {
            Err(Error::UnexpectedEof { offset: 1, needed: 2 }) => (),
            other => panic!("{other:?}"),
        }
        assert_eq!(r.position(), 1);
        assert_eq!(r.read_u16_be().unwrap(), 0x0203);
    }

    #[test]
    fn utf16_strings() {
        let data = [0, 3, 0, b'H', 0, b'i', 0, 0];
        let mut r = ByteReader::new(&data);
        assert_eq!(r.read_pascal_utf16_be_u16().unwrap(), "Hi");
        assert!(r.is_at_end());
        let data = [0, 0, 0, 1, 0xD8, 0x00];
        let mut r = ByteReader::new(&data);
        assert!(matches!(r.read_pascal_utf16_be_u32(),
                         Err(Error::InvalidString)));
    }

    #[test]
    fn magic() {
        let mut r = ByteReader::new(b"ASEF\0\x01");
        r.expect_magic(b"ASEF").unwrap();
        assert_eq!(r.position(), 4);
        let mut r = ByteReader::new(b"AS");
        match r.expect_magic(b"ASEF") {
            Err(Error::InvalidMagic { found, .. }) => assert_eq!(found, "AS"),
            other => panic!("{other:?}"),
        }
    }

    #[test]
    fn pattern_seek() {
        let mut r = ByteReader::new(b"RIFFxxxxPAL junk data1234");
        assert_eq!(r.seek_to_pattern(b"data").unwrap(), 17);
        assert_eq!(r.read_bytes(4).unwrap(), b"1234");
        let mut r = ByteReader::new(b"dat");
        assert!(matches!(r.seek_to_pattern(b"data"),
                         Err(Error::PatternNotFound)));
        assert_eq!(r.position(), 0);
    }
}
