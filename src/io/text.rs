use crate::error::{Error, Result};

const UTF8_BOM: &[u8] = &[0xEF, 0xBB, 0xBF];

/// Decode the content of a text file.
///
/// A UTF-16 byte order mark selects UTF-16 (little or big endian);
/// otherwise the data must be UTF-8, with an optional BOM.
pub fn decode_text(data: &[u8]) -> Result<String> {
    match data {
        [0xFF, 0xFE, rest @ ..] => utf16(rest, u16::from_le_bytes),
        [0xFE, 0xFF, rest @ ..] => utf16(rest, u16::from_be_bytes),
        _ => {
            let data = data.strip_prefix(UTF8_BOM).unwrap_or(data);
            std::str::from_utf8(data).map(str::to_owned)
                .map_err(|_| Error::InvalidString)
        }
    }
}

fn utf16(data: &[u8], unit: fn([u8; 2]) -> u16) -> Result<String> {
    if data.len() % 2 != 0 { return Err(Error::InvalidString) }
    let code: Vec<u16> = data.chunks_exact(2).map(|b| unit([b[0], b[1]]))
        .collect();
    String::from_utf16(&code).map_err(|_| Error::InvalidString)
}

/// Parse a color component written as an integer in 0..=255.
pub(crate) fn parse_u8_component(s: &str) -> Result<f64> {
    let v: u8 = s.trim().parse()
        .map_err(|_| Error::invalid(format!("invalid color component {s:?}")))?;
    Ok(v as f64 / 255.)
}
