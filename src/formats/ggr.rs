//! GIMP gradients (`.ggr`).
//!
//! ```text
//! GIMP Gradient
//! Name: Red to blue
//! 1
//! 0.000000 0.500000 1.000000 1.000000 0.000000 0.000000 1.000000 0.000000 0.000000 1.000000 1.000000 0 0
//! ```
//!
//! After the segment count, each line describes a segment: left, middle
//! and right positions, left and right RGBA colors, the blending function
//! and the coloring type.  Segments are decoded into stops at their ends;
//! the blending function and coloring type are not represented (the
//! segments are assumed linear in RGB).

use std::sync::Arc;
use log::{debug, warn};
use crate::coder::{expect_gradients, Coder, Model, ModelKind};
use crate::color::{Color, ColorSpace};
use crate::convert::{ColorConverter, NaiveConverter};
use crate::error::{Error, Result};
use crate::gradient::{Gradient, Gradients, Stop};
use crate::io::text::decode_text;
use crate::io::ByteReader;

const HEADER: &str = "GIMP Gradient";
const MAX_BLEND: u32 = 5;
const MAX_COLORING: u32 = 2;

/// Coder for GIMP gradients.  A file holds a single gradient.
#[derive(Clone)]
pub struct GgrCoder {
    converter: Arc<dyn ColorConverter>,
}

impl GgrCoder {
    pub fn new(converter: Arc<dyn ColorConverter>) -> Self {
        GgrCoder { converter }
    }
}

impl Default for GgrCoder {
    fn default() -> Self { Self::new(Arc::new(NaiveConverter)) }
}

struct Segment {
    left: f64,
    right: f64,
    left_color: Color,
    right_color: Color,
}

fn parse_segment(line: &str) -> Result<Segment> {
    let invalid = || Error::invalid(format!("gimp-ggr: invalid segment {line:?}"));
    let fields: Vec<&str> = line.split_whitespace().collect();
    if fields.len() < 13 { return Err(invalid()) }
    let x = fields[.. 11].iter().map(|f| f.parse::<f64>())
        .collect::<std::result::Result<Vec<_>, _>>().map_err(|_| invalid())?;
    let blend: u32 = fields[11].parse().map_err(|_| invalid())?;
    let coloring: u32 = fields[12].parse().map_err(|_| invalid())?;
    if blend > MAX_BLEND {
        return Err(Error::UnknownTag { what: "blend function", tag: blend })
    }
    if coloring > MAX_COLORING {
        return Err(Error::UnknownTag { what: "coloring type", tag: coloring })
    }
    if blend != 0 || coloring != 0 {
        debug!("gimp-ggr: segment blending ({blend}, {coloring}) read as linear RGB");
    }
    let (left, mid, right) = (x[0], x[1], x[2]);
    if !(0. <= left && left <= mid && mid <= right && right <= 1.) {
        return Err(invalid())
    }
    Ok(Segment { left, right,
                 left_color: Color::rgba(x[3], x[4], x[5], x[6]),
                 right_color: Color::rgba(x[7], x[8], x[9], x[10]) })
}

impl Coder for GgrCoder {
    fn name(&self) -> &'static str { "gimp-ggr" }

    fn extensions(&self) -> &'static [&'static str] { &["ggr"] }

    fn kind(&self) -> ModelKind { ModelKind::Gradients }

    fn decode_stream(&self, s: &mut ByteReader<'_>) -> Result<Model> {
        let text = decode_text(s.read_bytes(s.remaining())?)?;
        let mut lines = text.lines().map(str::trim).filter(|l| !l.is_empty());
        match lines.next() {
            Some(HEADER) => (),
            found => return Err(Error::InvalidMagic {
                expected: HEADER.into(), found: found.unwrap_or("").into() }),
        }
        let mut line = lines.next();
        let name = match line.and_then(|l| l.strip_prefix("Name:")) {
            Some(name) => {
                line = lines.next();
                Some(name.trim().to_string())
            }
            None => None,
        };
        let count: usize = line.and_then(|l| l.parse().ok())
            .ok_or_else(|| Error::invalid("gimp-ggr: missing segment count"))?;
        if count == 0 {
            return Err(Error::invalid("gimp-ggr: gradient has no segment"))
        }
        let segments = lines.take(count).map(parse_segment)
            .collect::<Result<Vec<_>>>()?;
        if segments.len() != count {
            return Err(Error::invalid(format!(
                "gimp-ggr: {count} segments announced, {} found", segments.len())))
        }
        let mut stops: Vec<Stop> = Vec::with_capacity(2 * count);
        for seg in segments {
            let left = Stop::new(seg.left, seg.left_color);
            // Adjacent segments usually share their boundary color.
            if stops.last() != Some(&left) {
                stops.push(left);
            }
            stops.push(Stop::new(seg.right, seg.right_color));
        }
        Ok(Model::from(Gradient { name, stops, transparency_stops: None }))
    }

    fn encode(&self, model: &Model) -> Result<Vec<u8>> {
        let gradients = expect_gradients(self, model)?;
        let gradient = gradients.iter().next()
            .ok_or_else(|| Error::invalid("gimp-ggr: no gradient to write"))?;
        if gradients.len() > 1 {
            warn!("gimp-ggr: only the first of {} gradients is written",
                  gradients.len());
        }
        let mut g = gradient.merged_transparency_stops()?.sorted();
        if g.stops.iter().any(|s| !(0. ..= 1.).contains(&s.position)) {
            g = g.normalized()?;
        }
        // Segments must cover [0, 1].
        g = g.expanded_to_edges();
        if let Some(first) = g.stops.first_mut() { first.position = 0. }
        if let Some(last) = g.stops.last_mut() { last.position = 1. }
        let stops = g.stops.iter().map(|s| {
            let c = self.converter.convert(&s.color, ColorSpace::Rgb)?;
            Ok((s.position, c))
        }).collect::<Result<Vec<_>>>()?;
        let segments: Vec<_> = match stops.as_slice() {
            [] => return Err(Error::invalid("gimp-ggr: gradient has no stop")),
            [(_, c)] => vec![((0., c), (1., c))],
            _ => stops.windows(2).map(|w| ((w[0].0, &w[0].1), (w[1].0, &w[1].1)))
                .collect(),
        };
        let mut out = format!("{HEADER}\nName: {}\n{}\n",
                              g.name.as_deref().unwrap_or(""), segments.len());
        for ((left, lc), (right, rc)) in segments {
            let (l, r) = (lc.components(), rc.components());
            out.push_str(&format!(
                "{left:.6} {:.6} {right:.6} {:.6} {:.6} {:.6} {:.6} \
                 {:.6} {:.6} {:.6} {:.6} 0 0\n",
                (left + right) / 2., l[0], l[1], l[2], lc.alpha(),
                r[0], r[1], r[2], rc.alpha()));
        }
        Ok(out.into_bytes())
    }
}

impl GgrCoder {
    /// Decode `data` into a single gradient.
    pub fn decode_gradient(&self, data: &[u8]) -> Result<Gradient> {
        let Gradients { gradients } = self.decode_gradients(data)?;
        gradients.into_iter().next()
            .ok_or_else(|| Error::invalid("gimp-ggr: no gradient"))
    }
}
