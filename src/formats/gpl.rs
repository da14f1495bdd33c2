//! GIMP palettes (`.gpl`).

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
        Regex::new(r"^\s*(\d+)\s+(\d+)\s+(\d+)\s*(.*)$").unwrap();
    static ref HEADER_LINE: Regex =
        Regex::new(r"^(Name|Columns):\s*(.*)$").unwrap();
}

const HEADER: &str = "GIMP Palette";

/// Coder for GIMP palettes.
#[derive(Clone)]
pub struct GplCoder {
    converter: Arc<dyn ColorConverter>,
}

impl GplCoder {
    pub fn new(converter: Arc<dyn ColorConverter>) -> Self {
        GplCoder { converter }
    }
}

impl Default for GplCoder {
    fn default() -> Self { Self::new(Arc::new(NaiveConverter)) }
}

impl Coder for GplCoder {
    fn name(&self) -> &'static str { "gimp-gpl" }

    fn extensions(&self) -> &'static [&'static str] { &["gpl"] }

    fn kind(&self) -> ModelKind { ModelKind::Palette }

    fn decode_stream(&self, s: &mut ByteReader<'_>) -> Result<Model> {
        let text = decode_text(s.read_bytes(s.remaining())?)?;
        let mut lines = text.lines();
        match lines.next().map(str::trim) {
            Some(HEADER) => (),
            found => return Err(Error::InvalidMagic {
                expected: HEADER.into(), found: found.unwrap_or("").into() }),
        }
        let mut palette = Palette::new();
        for line in lines {
            let trimmed = line.trim();
            if trimmed.is_empty() || trimmed.starts_with('#') { continue }
            if let Some(cap) = HEADER_LINE.captures(trimmed) {
                if &cap[1] == "Name" {
                    palette.name = cap[2].trim().to_string();
                }
            } else if let Some(cap) = COLOR_LINE.captures(line) {
                let c = Color::rgb(parse_u8_component(&cap[1])?,
                                   parse_u8_component(&cap[2])?,
                                   parse_u8_component(&cap[3])?);
                palette.colors.push(c.with_name(cap[4].trim()));
            } else {
                return Err(Error::invalid(format!("gimp-gpl: invalid line {line:?}")))
            }
        }
        Ok(palette.with_format(self.name()).into())
    }

    fn encode(&self, model: &Model) -> Result<Vec<u8>> {
        let palette = expect_palette(self, model)?;
        let colors = flat_colors_in(self.name(), palette, ColorSpace::Rgb,
                                    self.converter.as_ref())?;
        if colors.iter().any(|c| c.alpha() != 1.) {
            warn!("gimp-gpl: color opacity is not supported and was dropped");
        }
        let mut out = format!("{HEADER}\nName: {}\n#\n", palette.name);
        for c in &colors {
            let x = c.components();
            out.push_str(&format!("{:3} {:3} {:3}\t{}\n", unit_to_u8(x[0]),
                                  unit_to_u8(x[1]), unit_to_u8(x[2]), c.name()));
        }
        Ok(out.into_bytes())
    }
}
