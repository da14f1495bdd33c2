//! Microsoft RIFF palettes (`.pal`).
//!
//! A RIFF container of form type `PAL ` whose `data` chunk holds a
//! version (0x0300), a color count and one `r g b flags` entry per
//! color.  Numbers are little-endian.  Other chunks may precede `data`;
//! they are skipped by scanning for the chunk identifier.

use std::sync::Arc;
use log::warn;
use crate::coder::{expect_palette, Coder, Model, ModelKind};
use crate::color::{unit_to_u8, Color, ColorSpace};
use crate::convert::{ColorConverter, NaiveConverter};
use crate::error::{Error, Result};
use crate::formats::flat_colors_in;
use crate::io::{ByteReader, ByteWriter};
use crate::palette::Palette;

const PAL_VERSION: u16 = 0x0300;

/// Coder for RIFF palettes.
#[derive(Clone)]
pub struct RiffPalCoder {
    converter: Arc<dyn ColorConverter>,
}

impl RiffPalCoder {
    pub fn new(converter: Arc<dyn ColorConverter>) -> Self {
        RiffPalCoder { converter }
    }
}

impl Default for RiffPalCoder {
    fn default() -> Self { Self::new(Arc::new(NaiveConverter)) }
}

impl Coder for RiffPalCoder {
    fn name(&self) -> &'static str { "riff-pal" }

    fn extensions(&self) -> &'static [&'static str] { &["pal"] }

    fn kind(&self) -> ModelKind { ModelKind::Palette }

    fn decode_stream(&self, s: &mut ByteReader<'_>) -> Result<Model> {
        s.expect_magic(b"RIFF")?;
        let size = s.read_u32_le()? as usize;
        if size > s.remaining() {
            return Err(Error::UnexpectedEof { offset: s.position(),
                                              needed: size - s.remaining() })
        }
        s.expect_magic(b"PAL ")?;
        s.seek_to_pattern(b"data")?;
        let chunk_size = s.read_u32_le()? as usize;
        let version = s.read_u16_le()?;
        if version != PAL_VERSION {
            return Err(Error::UnsupportedVersion(format!("{version:#06x}")))
        }
        let count = s.read_u16_le()? as usize;
        let capacity = chunk_size.saturating_sub(4) / 4;
        if count > capacity {
            return Err(Error::IndexOutOfRange { what: "palette entry",
                                                index: count, len: capacity })
        }
        let colors = (0 .. count).map(|_| {
            let [r, g, b, _flags] = s.read_array::<4>()?;
            Ok(Color::rgb(r as f64 / 255., g as f64 / 255., b as f64 / 255.))
        }).collect::<Result<Vec<_>>>()?;
        Ok(Palette::named("", colors).with_format(self.name()).into())
    }

    fn encode(&self, model: &Model) -> Result<Vec<u8>> {
        let palette = expect_palette(self, model)?;
        let colors = flat_colors_in(self.name(), palette, ColorSpace::Rgb,
                                    self.converter.as_ref())?;
        if colors.len() > u16::MAX as usize {
            return Err(Error::invalid(format!(
                "riff-pal: {} colors, at most {} can be stored",
                colors.len(), u16::MAX)))
        }
        if colors.iter().any(|c| c.alpha() != 1.) {
            warn!("riff-pal: color opacity is not supported and was dropped");
        }
        let chunk_size = 4 + 4 * colors.len() as u32;
        let mut w = ByteWriter::new();
        w.write_bytes(b"RIFF");
        w.write_u32_le(0);
        w.write_bytes(b"PAL data");
        w.write_u32_le(chunk_size);
        w.write_u16_le(PAL_VERSION);
        w.write_u16_le(colors.len() as u16);
        for c in &colors {
            c.components().iter().for_each(|&x| w.write_u8(unit_to_u8(x)));
            w.write_u8(0);
        }
        let riff_size = (w.len() - 8) as u32;
        w.patch_u32_le(4, riff_size);
        Ok(w.into_inner())
    }
}
