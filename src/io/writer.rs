use crate::error::{Error, Result};

/// Accumulates the bytes of an encoded file.
#[derive(Clone, Debug, Default)]
pub struct ByteWriter {
    buf: Vec<u8>,
}

impl ByteWriter {
    pub fn new() -> Self { Self::default() }

    pub fn len(&self) -> usize { self.buf.len() }

    pub fn is_empty(&self) -> bool { self.buf.is_empty() }

    pub fn into_inner(self) -> Vec<u8> { self.buf }

    pub fn write_bytes(&mut self, b: &[u8]) { self.buf.extend_from_slice(b) }

    pub fn write_u8(&mut self, x: u8) { self.buf.push(x) }

    pub fn write_u16_be(&mut self, x: u16) { self.write_bytes(&x.to_be_bytes()) }

    pub fn write_u16_le(&mut self, x: u16) { self.write_bytes(&x.to_le_bytes()) }

    pub fn write_i16_be(&mut self, x: i16) { self.write_bytes(&x.to_be_bytes()) }

    pub fn write_u32_be(&mut self, x: u32) { self.write_bytes(&x.to_be_bytes()) }

    pub fn write_u32_le(&mut self, x: u32) { self.write_bytes(&x.to_le_bytes()) }

    pub fn write_f32_be(&mut self, x: f32) { self.write_bytes(&x.to_be_bytes()) }

    /// Overwrite four bytes at `offset` with `x` (little-endian).  Used
    /// to patch chunk sizes once the chunk is written.
    pub fn patch_u32_le(&mut self, offset: usize, x: u32) {
        self.buf[offset .. offset + 4].copy_from_slice(&x.to_le_bytes());
    }

    /// Write `s` in UTF-16BE followed by a NUL terminator, preceded by
    /// the number of code units (terminator included) as a `u16`.
    ///
    /// Fails with [`Error::InvalidData`], writing nothing, if the length
    /// does not fit in a `u16`.
    pub fn write_pascal_utf16_be_u16(&mut self, s: &str) -> Result<()> {
        let units = utf16_with_nul(s);
        let len = u16::try_from(units.len()).map_err(|_| too_long(units.len()))?;
        self.write_u16_be(len);
        units.iter().for_each(|&u| self.write_u16_be(u));
        Ok(())
    }

    /// Same as [`ByteWriter::write_pascal_utf16_be_u16`] with a `u32`
    /// length.
    pub fn write_pascal_utf16_be_u32(&mut self, s: &str) -> Result<()> {
        let units = utf16_with_nul(s);
        let len = u32::try_from(units.len()).map_err(|_| too_long(units.len()))?;
        self.write_u32_be(len);
        units.iter().for_each(|&u| self.write_u16_be(u));
        Ok(())
    }
}

fn utf16_with_nul(s: &str) -> Vec<u16> {
    s.encode_utf16().chain([0]).collect()
}

fn too_long(units: usize) -> Error {
    Error::invalid(format!("string of {units} UTF-16 code units is too long"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::ByteReader;

    #[test]
    fn utf16_layout() {
        let mut w = ByteWriter::new();
        w.write_pascal_utf16_be_u16("Hé").unwrap();
        assert_eq!(w.into_inner(), [0, 3, 0, b'H', 0, 0xE9, 0, 0]);
    }

    #[test]
    fn overlong_string_is_rejected() {
        let mut w = ByteWriter::new();
        let name = "x".repeat(u16::MAX as usize);
        assert!(matches!(w.write_pascal_utf16_be_u16(&name),
                         Err(Error::InvalidData(_))));
        assert!(w.is_empty());
        // One unit less leaves room for the terminator.
        w.write_pascal_utf16_be_u16(&name[1 ..]).unwrap();
        assert_eq!(&w.into_inner()[.. 2], &[0xFF, 0xFF]);
    }

    #[test]
    fn non_bmp_name() {
        let mut w = ByteWriter::new();
        w.write_pascal_utf16_be_u32("🎨 swatch").unwrap();
        let bytes = w.into_inner();
        let mut r = ByteReader::new(&bytes);
        assert_eq!(r.read_pascal_utf16_be_u32().unwrap(), "🎨 swatch");
    }

    #[test]
    fn patch() {
        let mut w = ByteWriter::new();
        w.write_bytes(b"RIFF");
        w.write_u32_le(0);
        w.patch_u32_le(4, 0x01020304);
        assert_eq!(w.into_inner(), [b'R', b'I', b'F', b'F', 4, 3, 2, 1]);
    }
}
