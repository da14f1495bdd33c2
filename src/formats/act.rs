//! Adobe Color Table (`.act`).
//!
//! 256 RGB triplets (768 bytes), optionally followed by the number of
//! colors actually used and the index of the transparent color
//! (`0xFFFF` if none), both big-endian `u16`.

use std::sync::Arc;
use log::warn;
use crate::coder::{expect_palette, Coder, Model, ModelKind};
use crate::color::{unit_to_u8, Color, ColorSpace};
use crate::convert::{ColorConverter, NaiveConverter};
use crate::error::{Error, Result};
use crate::formats::flat_colors_in;
use crate::io::{ByteReader, ByteWriter};
use crate::palette::Palette;

const MAX_COLORS: usize = 256;
const TABLE_LEN: usize = 3 * MAX_COLORS;
const NO_TRANSPARENCY: u16 = 0xFFFF;

/// Coder for `.act` color tables.
#[derive(Clone)]
pub struct ActCoder {
    converter: Arc<dyn ColorConverter>,
}

impl ActCoder {
    pub fn new(converter: Arc<dyn ColorConverter>) -> Self {
        ActCoder { converter }
    }
}

impl Default for ActCoder {
    fn default() -> Self { Self::new(Arc::new(NaiveConverter)) }
}

impl Coder for ActCoder {
    fn name(&self) -> &'static str { "act" }

    fn extensions(&self) -> &'static [&'static str] { &["act"] }

    fn kind(&self) -> ModelKind { ModelKind::Palette }

    fn decode_stream(&self, s: &mut ByteReader<'_>) -> Result<Model> {
        let len = s.remaining();
        if len != TABLE_LEN && len != TABLE_LEN + 4 {
            return Err(Error::invalid(format!(
                "act: expected {TABLE_LEN} or {} bytes, got {len}",
                TABLE_LEN + 4)))
        }
        let table = s.read_bytes(TABLE_LEN)?;
        let (count, transparent) = if s.is_at_end() {
            (MAX_COLORS, NO_TRANSPARENCY)
        } else {
            (s.read_u16_be()? as usize, s.read_u16_be()?)
        };
        if count > MAX_COLORS {
            return Err(Error::IndexOutOfRange { what: "color count",
                                                index: count, len: MAX_COLORS })
        }
        let mut colors: Vec<Color> = table.chunks_exact(3).take(count)
            .map(|c| Color::rgb(c[0] as f64 / 255., c[1] as f64 / 255.,
                                c[2] as f64 / 255.))
            .collect();
        if transparent != NO_TRANSPARENCY {
            let i = transparent as usize;
            let c = colors.get_mut(i).ok_or(Error::IndexOutOfRange {
                what: "transparent color", index: i, len: count })?;
            *c = c.clone().with_alpha(0.);
        }
        Ok(Palette::named("", colors).with_format(self.name()).into())
    }

    fn encode(&self, model: &Model) -> Result<Vec<u8>> {
        let palette = expect_palette(self, model)?;
        let mut colors = flat_colors_in(self.name(), palette, ColorSpace::Rgb,
                                        self.converter.as_ref())?;
        if colors.len() > MAX_COLORS {
            warn!("act: only the first {MAX_COLORS} of {} colors are written",
                  colors.len());
            colors.truncate(MAX_COLORS);
        }
        let transparent = colors.iter().position(|c| c.alpha() == 0.);
        if colors.iter().any(|c| c.alpha() != 0. && c.alpha() != 1.) {
            warn!("act: partial opacity is not supported and was dropped");
        }
        let mut w = ByteWriter::new();
        for c in &colors {
            c.components().iter().for_each(|&x| w.write_u8(unit_to_u8(x)));
        }
        w.write_bytes(&vec![0; TABLE_LEN - w.len()]);
        w.write_u16_be(colors.len() as u16);
        w.write_u16_be(transparent.map_or(NO_TRANSPARENCY, |i| i as u16));
        Ok(w.into_inner())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_table_has_256_colors() {
        let mut data = vec![0; TABLE_LEN];
        data[3 .. 6].copy_from_slice(&[255, 0, 0]);
        let p = ActCoder::default().decode_palette(&data).unwrap();
        assert_eq!(p.colors.len(), 256);
        assert_eq!(p.colors[1], Color::rgb(1., 0., 0.));
    }

    #[test]
    fn count_and_transparency() {
        let mut data = vec![0; TABLE_LEN];
        data[.. 6].copy_from_slice(&[255, 255, 255, 0, 0, 255]);
        data.extend_from_slice(&[0, 2, 0, 1]);
        let p = ActCoder::default().decode_palette(&data).unwrap();
        assert_eq!(p.colors, [Color::rgb(1., 1., 1.),
                              Color::rgba(0., 0., 1., 0.)]);
    }

    #[test]
    fn index_out_of_range() {
        let mut data = vec![0; TABLE_LEN];
        data.extend_from_slice(&[0, 2, 0, 5]);
        assert!(matches!(ActCoder::default().decode(&data),
                         Err(Error::IndexOutOfRange { index: 5, len: 2, .. })));
        let mut data = vec![0; TABLE_LEN];
        data.extend_from_slice(&[1, 1, 0xFF, 0xFF]);
        assert!(matches!(ActCoder::default().decode(&data),
                         Err(Error::IndexOutOfRange { index: 257, .. })));
        // 256 colors is a full table.
        let mut data = vec![0; TABLE_LEN];
        data.extend_from_slice(&[1, 0, 0xFF, 0xFF]);
        assert_eq!(ActCoder::default().decode_palette(&data).unwrap().colors.len(),
                   256);
    }

    #[test]
    fn wrong_length() {
        assert!(ActCoder::default().decode(&[0; 10]).is_err());
        assert!(ActCoder::default().decode(&[0; TABLE_LEN + 2]).is_err());
    }

    #[test]
    fn encode_converts_and_pads() {
        let p = Palette::named("", vec![Color::cmyk(0., 0., 0., 1.),
                                        Color::rgba(1., 0., 0., 0.)]);
        let bytes = ActCoder::default().encode(&p.into()).unwrap();
        assert_eq!(bytes.len(), TABLE_LEN + 4);
        assert_eq!(&bytes[.. 6], &[0, 0, 0, 255, 0, 0]);
        assert_eq!(&bytes[TABLE_LEN ..], &[0, 2, 0, 1]);
        let back = ActCoder::default().decode_palette(&bytes).unwrap();
        assert_eq!(back.colors, [Color::rgb(0., 0., 0.),
                                 Color::rgba(1., 0., 0., 0.)]);
    }

    #[test]
    fn encode_caps_color_count() {
        let colors = (0 .. 300).map(|i| Color::gray((i % 2) as f64)).collect();
        let bytes = ActCoder::default()
            .encode(&Palette::named("", colors).into()).unwrap();
        assert_eq!(&bytes[TABLE_LEN ..], &[1, 0, 0xFF, 0xFF]);
    }
}
