//! Adobe Photoshop color swatches (`.aco`).
//!
//! A file holds a version 1 section, a list of colors without names,
//! usually followed by a version 2 section listing the same colors again
//! with their names.  Some writers only emit the version 2 section.  Each
//! section is a `u16` version, a `u16` count and the color records: a
//! `u16` colorspace followed by four `u16` values, plus the name (a
//! `u32` length and UTF-16BE text) in version 2.

use log::{debug, warn};
use crate::coder::{expect_palette, Coder, Model, ModelKind};
use crate::color::{Color, ColorSpace};
use crate::error::{Error, Result};
use crate::io::{ByteReader, ByteWriter};
use crate::palette::Palette;

const RGB: u16 = 0;
const HSB: u16 = 1;
const CMYK: u16 = 2;
const LAB: u16 = 7;
const GRAY: u16 = 8;

/// The sections present in a file.
#[derive(Debug)]
enum Layout {
    V1(Vec<Color>),
    V1V2 { v1: Vec<Color>, v2: Vec<Color> },
    V2(Vec<Color>),
}

impl Layout {
    /// The colors to keep.  The version 2 section describes the same
    /// colors as the version 1 section, with names, so it is taken as a
    /// whole whenever present.
    fn into_colors(self) -> Vec<Color> {
        match self {
            Layout::V1(colors) | Layout::V2(colors) => colors,
            Layout::V1V2 { v1, v2 } => {
                if v1.len() != v2.len() {
                    debug!("aco: version 1 section has {} colors, \
                            version 2 has {}", v1.len(), v2.len());
                }
                v2
            }
        }
    }
}

fn unit(v: u16) -> f64 { v as f64 / 65535. }

fn to_unit(x: f64) -> u16 { (x.clamp(0., 1.) * 65535.).round() as u16 }

fn hsb_to_rgb(h: f64, s: f64, v: f64) -> [f64; 3] {
    let h = 6. * h.fract();
    let i = h.trunc();
    let f = h - i;
    let (p, q, t) = (v * (1. - s), v * (1. - s * f), v * (1. - s * (1. - f)));
    match i as u8 {
        0 => [v, t, p],
        1 => [q, v, p],
        2 => [p, v, t],
        3 => [p, q, v],
        4 => [t, p, v],
        _ => [v, p, q],
    }
}

fn read_color(s: &mut ByteReader<'_>, named: bool) -> Result<Color> {
    let space = s.read_u16_be()?;
    let [w, x, y, z] = [s.read_u16_be()?, s.read_u16_be()?,
                        s.read_u16_be()?, s.read_u16_be()?];
    let color = match space {
        RGB => Color::rgb(unit(w), unit(x), unit(y)),
        HSB => {
            let [r, g, b] = hsb_to_rgb(unit(w), unit(x), unit(y));
            Color::rgb(r, g, b)
        }
        CMYK => Color::cmyk(1. - unit(w), 1. - unit(x), 1. - unit(y),
                            1. - unit(z)),
        LAB => Color::lab(w as f64 / 100., x as i16 as f64 / 100.,
                          y as i16 as f64 / 100.),
        GRAY => Color::gray(w as f64 / 10000.),
        _ => return Err(Error::UnknownTag { what: "colorspace",
                                            tag: space as u32 }),
    };
    if named {
        Ok(color.with_name(s.read_pascal_utf16_be_u32()?))
    } else {
        Ok(color)
    }
}

fn read_colors(s: &mut ByteReader<'_>, named: bool) -> Result<Vec<Color>> {
    let count = s.read_u16_be()?;
    (0 .. count).map(|_| read_color(s, named)).collect()
}

/// Read the sections.  After a version 1 section, anything but a
/// version 2 tag means that no version 2 section follows: the rest of
/// the data is ignored.  A version 2 section must end the data.
fn read_layout(s: &mut ByteReader<'_>) -> Result<Layout> {
    let layout = match s.read_u16_be()? {
        1 => {
            let v1 = read_colors(s, false)?;
            if !matches!(s.peek(2), Some([0, 2])) {
                if !s.is_at_end() {
                    debug!("aco: {} bytes after the version 1 section \
                            ignored", s.remaining());
                }
                return Ok(Layout::V1(v1))
            }
            s.skip(2)?;
            Layout::V1V2 { v1, v2: read_colors(s, true)? }
        }
        2 => Layout::V2(read_colors(s, true)?),
        v => return Err(Error::UnsupportedVersion(v.to_string())),
    };
    if !s.is_at_end() {
        return Err(Error::invalid(format!(
            "aco: {} bytes after the version 2 section", s.remaining())))
    }
    Ok(layout)
}

fn write_color(w: &mut ByteWriter, c: &Color, named: bool) -> Result<()> {
    let x = c.components();
    let (space, values) = match c.space() {
        ColorSpace::Rgb => (RGB, [to_unit(x[0]), to_unit(x[1]), to_unit(x[2]), 0]),
        ColorSpace::Cmyk => (CMYK, [65535 - to_unit(x[0]), 65535 - to_unit(x[1]),
                                    65535 - to_unit(x[2]), 65535 - to_unit(x[3])]),
        ColorSpace::Lab => {
            let ab = |v: f64| (v * 100.).round()
                .clamp(i16::MIN as f64, i16::MAX as f64) as i16 as u16;
            (LAB, [(x[0] * 100.).round().clamp(0., 10000.) as u16,
                   ab(x[1]), ab(x[2]), 0])
        }
        ColorSpace::Gray =>
            (GRAY, [(x[0] * 10000.).round().clamp(0., 10000.) as u16, 0, 0, 0]),
    };
    w.write_u16_be(space);
    values.iter().for_each(|&v| w.write_u16_be(v));
    if named {
        w.write_pascal_utf16_be_u32(c.name())?;
    }
    Ok(())
}

/// Coder for Photoshop `.aco` swatch files.
#[derive(Clone, Copy, Debug, Default)]
pub struct AcoCoder;

impl Coder for AcoCoder {
    fn name(&self) -> &'static str { "aco" }

    fn extensions(&self) -> &'static [&'static str] { &["aco"] }

    fn kind(&self) -> ModelKind { ModelKind::Palette }

    fn decode_stream(&self, s: &mut ByteReader<'_>) -> Result<Model> {
        let colors = read_layout(s)?.into_colors();
        Ok(Palette::named("", colors).with_format(self.name()).into())
    }

    fn encode(&self, model: &Model) -> Result<Vec<u8>> {
        let palette = expect_palette(self, model)?;
        if !palette.groups.is_empty() {
            warn!("aco: groups are not supported, {} groups flattened",
                  palette.groups.len());
        }
        if palette.all_colors().any(|c| c.alpha() != 1.) {
            warn!("aco: color opacity is not supported and was dropped");
        }
        let colors: Vec<&Color> = palette.all_colors().collect();
        if colors.len() > u16::MAX as usize {
            return Err(Error::invalid(format!(
                "aco: {} colors, at most {} can be stored", colors.len(),
                u16::MAX)))
        }
        let mut w = ByteWriter::new();
        for (version, named) in [(1, false), (2, true)] {
            w.write_u16_be(version);
            w.write_u16_be(colors.len() as u16);
            for c in &colors {
                write_color(&mut w, c, named)?;
            }
        }
        Ok(w.into_inner())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(w: &mut ByteWriter, space: u16, v: [u16; 4]) {
        w.write_u16_be(space);
        v.iter().for_each(|&x| w.write_u16_be(x));
    }

    #[test]
    fn v1_only() {
        let mut w = ByteWriter::new();
        w.write_u16_be(1);
        w.write_u16_be(2);
        record(&mut w, RGB, [65535, 0, 0, 0]);
        record(&mut w, GRAY, [5000, 0, 0, 0]);
        let p = AcoCoder.decode_palette(&w.into_inner()).unwrap();
        assert_eq!(p.colors, [Color::rgb(1., 0., 0.), Color::gray(0.5)]);
    }

    fn one_red_v1() -> ByteWriter {
        let mut w = ByteWriter::new();
        w.write_u16_be(1);
        w.write_u16_be(1);
        record(&mut w, RGB, [65535, 0, 0, 0]);
        w
    }

    #[test]
    fn v1_with_trailing_bytes() {
        for trailer in [&[0][..], &[0, 0], &[0, 3, 0, 0, 0]] {
            let mut w = one_red_v1();
            w.write_bytes(trailer);
            let p = AcoCoder.decode_palette(&w.into_inner()).unwrap();
            assert_eq!(p.colors, [Color::rgb(1., 0., 0.)], "{trailer:?}");
        }
    }

    #[test]
    fn trailing_bytes_after_v2_are_rejected() {
        let p = Palette::named("", vec![Color::gray(0.)]);
        let mut bytes = AcoCoder.encode(&p.into()).unwrap();
        bytes.extend_from_slice(&[0, 0]);
        assert!(matches!(AcoCoder.decode(&bytes), Err(Error::InvalidData(_))));
    }

    #[test]
    fn v2_section_is_preferred() {
        let mut w = ByteWriter::new();
        w.write_u16_be(1);
        w.write_u16_be(1);
        record(&mut w, RGB, [65535, 0, 0, 0]);
        w.write_u16_be(2);
        w.write_u16_be(1);
        record(&mut w, RGB, [0, 65535, 0, 0]);
        w.write_pascal_utf16_be_u32("green").unwrap();
        let p = AcoCoder.decode_palette(&w.into_inner()).unwrap();
        assert_eq!(p.colors, [Color::rgb(0., 1., 0.).with_name("green")]);
    }

    #[test]
    fn v2_only() {
        let mut w = ByteWriter::new();
        w.write_u16_be(2);
        w.write_u16_be(1);
        record(&mut w, CMYK, [65535, 0, 65535, 65535]);
        w.write_pascal_utf16_be_u32("magenta").unwrap();
        let p = AcoCoder.decode_palette(&w.into_inner()).unwrap();
        assert_eq!(p.colors, [Color::cmyk(0., 1., 0., 0.).with_name("magenta")]);
    }

    #[test]
    fn truncated_v2_fails() {
        let mut w = ByteWriter::new();
        w.write_u16_be(1);
        w.write_u16_be(1);
        record(&mut w, RGB, [0, 0, 0, 0]);
        w.write_u16_be(2);
        w.write_u16_be(1);
        record(&mut w, RGB, [0, 0, 0, 0]);
        assert!(matches!(AcoCoder.decode(&w.into_inner()),
                         Err(Error::UnexpectedEof { .. })));
    }

    #[test]
    fn bad_versions_and_spaces() {
        assert!(matches!(AcoCoder.decode(&[0, 3, 0, 0]),
                         Err(Error::UnsupportedVersion(_))));
        let mut w = ByteWriter::new();
        w.write_u16_be(1);
        w.write_u16_be(1);
        record(&mut w, 9, [0; 4]);
        assert!(matches!(AcoCoder.decode(&w.into_inner()),
                         Err(Error::UnknownTag { tag: 9, .. })));
    }

    #[test]
    fn hsb() {
        let mut w = ByteWriter::new();
        w.write_u16_be(1);
        w.write_u16_be(1);
        // Hue 1/3 (green), full saturation and brightness.
        record(&mut w, HSB, [21845, 65535, 65535, 0]);
        let p = AcoCoder.decode_palette(&w.into_inner()).unwrap();
        let c = p.colors[0].components();
        assert!(c[0].abs() < 1e-4 && (c[1] - 1.).abs() < 1e-4 && c[2].abs() < 1e-4,
                "{c:?}");
    }

    #[test]
    fn round_trip() {
        let mut p = Palette::named("", vec![
            Color::rgb(1., 0., 1.).with_name("fuchsia"),
            Color::cmyk(0., 1., 1., 0.).with_name("red ink"),
            Color::lab(53.24, 80.09, -67.2).with_name("lab"),
            Color::gray(0.25)]);
        let bytes = AcoCoder.encode(&p.clone().into()).unwrap();
        assert_eq!(&bytes[.. 4], &[0, 1, 0, 4]);
        let back = AcoCoder.decode_palette(&bytes).unwrap();
        assert_eq!(back.colors.len(), 4);
        for (a, b) in back.colors.iter().zip(&p.colors) {
            assert_eq!(a.name(), b.name());
            assert_eq!(a.space(), b.space());
            assert!(a.components().iter().zip(b.components())
                    .all(|(x, y)| (x - y).abs() < 1e-6));
        }
        p.colors.truncate(2);
        let bytes = AcoCoder.encode(&p.clone().into()).unwrap();
        assert_eq!(AcoCoder.decode_palette(&bytes).unwrap(), p);
    }
}
