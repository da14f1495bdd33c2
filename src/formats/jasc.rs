//! Paint Shop Pro palettes (`JASC-PAL`).
//!
//! ```text
//! JASC-PAL
//! 0100
//! 2
//! 255 0 0
//! 0 0 255
//! ```

use std::sync::Arc;
use lazy_static::lazy_static;
use log::warn;
use regex::Regex;
use crate::coder::{expect_palette, Coder, Model, ModelKind};
use crate::color::{unit_to_u8, Color, ColorSpace};
use crate::convert::{ColorConverter, NaiveConverter};
use crate::error::{Error, Result};
use crate::formats::flat_colors_in;
use crate::io::text::{decode_text, parse_u8_component};
use crate::io::ByteReader;
use crate::palette::Palette;

lazy_static! {
    static ref COLOR_LINE: Regex =
        Regex::new(r"^\s*(\d+)\s+(\d+)\s+(\d+)(?:\s+(\d+))?\s*$").unwrap();
}

const HEADER: &str = "JASC-PAL";
const VERSION: &str = "0100";

/// Coder for JASC-PAL text palettes.
#[derive(Clone)]
pub struct JascPalCoder {
    converter: Arc<dyn ColorConverter>,
}

impl JascPalCoder {
    pub fn new(converter: Arc<dyn ColorConverter>) -> Self {
        JascPalCoder { converter }
    }
}

impl Default for JascPalCoder {
    fn default() -> Self { Self::new(Arc::new(NaiveConverter)) }
}

fn parse_color(line: &str) -> Result<Color> {
    let cap = COLOR_LINE.captures(line)
        .ok_or_else(|| Error::invalid(format!("jasc-pal: invalid color {line:?}")))?;
    let (r, g, b) = (parse_u8_component(&cap[1])?, parse_u8_component(&cap[2])?,
                     parse_u8_component(&cap[3])?);
    let a = match cap.get(4) {
        Some(a) => parse_u8_component(a.as_str())?,
        None => 1.,
    };
    Ok(Color::rgba(r, g, b, a))
}

impl Coder for JascPalCoder {
    fn name(&self) -> &'static str { "jasc-pal" }

    fn extensions(&self) -> &'static [&'static str] { &["pal", "psppalette"] }

    fn kind(&self) -> ModelKind { ModelKind::Palette }

    fn decode_stream(&self, s: &mut ByteReader<'_>) -> Result<Model> {
        let text = decode_text(s.read_bytes(s.remaining())?)?;
        let mut lines = text.lines().map(str::trim);
        match lines.next() {
            Some(HEADER) => (),
            found => return Err(Error::InvalidMagic {
                expected: HEADER.into(), found: found.unwrap_or("").into() }),
        }
        match lines.next() {
            Some(VERSION) => (),
            v => return Err(Error::UnsupportedVersion(v.unwrap_or("").into())),
        }
        let count: usize = lines.next().and_then(|l| l.parse().ok())
            .ok_or_else(|| Error::invalid("jasc-pal: missing color count"))?;
        let colors = lines.filter(|l| !l.is_empty()).take(count)
            .map(parse_color).collect::<Result<Vec<_>>>()?;
        if colors.len() != count {
            return Err(Error::invalid(format!(
                "jasc-pal: {count} colors announced, {} found", colors.len())))
        }
        Ok(Palette::named("", colors).with_format(self.name()).into())
    }

    fn encode(&self, model: &Model) -> Result<Vec<u8>> {
        let palette = expect_palette(self, model)?;
        let colors = flat_colors_in(self.name(), palette, ColorSpace::Rgb,
                                    self.converter.as_ref())?;
        if colors.iter().any(|c| c.alpha() != 1.) {
            warn!("jasc-pal: color opacity is not supported and was dropped");
        }
        let mut out = format!("{HEADER}\r\n{VERSION}\r\n{}\r\n", colors.len());
        for c in &colors {
            let x = c.components();
            out.push_str(&format!("{} {} {}\r\n", unit_to_u8(x[0]),
                                  unit_to_u8(x[1]), unit_to_u8(x[2])));
        }
        Ok(out.into_bytes())
    }
}
