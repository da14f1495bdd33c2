//! Gradients: color stops plus optional transparency stops.
//!
//! Files store stop positions in all kinds of ranges (0–1, 0–100,
//! 0–4096...) and not necessarily in order.  The algorithms here bring
//! them into a common shape:
//!
//! - [`Gradient::sorted`] orders the stops,
//! - [`Gradient::normalized`] rescales color stop positions to \[0, 1\],
//! - [`Gradient::merged_transparency_stops`] folds the separate opacity
//!   ramp into the alpha of the color stops,
//! - [`Gradient::expanded_to_edges`] makes the stops cover \[0, 1\].

use serde::{Deserialize, Serialize};
use rgb::RGBA;
use crate::color::Color;
use crate::error::{Error, Result};

/// Distance from the ends of \[0, 1\] under which
/// [`Gradient::expanded_to_edges`] does not add a stop.
pub const EDGE_EPSILON: f64 = 0.05;

/// A color at a position of a gradient.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Stop {
    pub position: f64,
    pub color: Color,
}

impl Stop {
    #[inline]
    pub fn new(position: f64, color: Color) -> Self {
        Self { position, color }
    }
}

/// An opacity at a position of a gradient.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct TransparencyStop {
    pub position: f64,
    /// Opacity in \[0, 1\].
    pub value: f64,
    /// Position of the mid opacity between this stop and the next one,
    /// relative to the segment (0.5 is halfway).
    #[serde(default = "half")]
    pub midpoint: f64,
}

fn half() -> f64 { 0.5 }

impl TransparencyStop {
    #[inline]
    pub fn new(position: f64, value: f64) -> Self {
        Self { position, value, midpoint: 0.5 }
    }
}

trait Positioned: Clone {
    fn position(&self) -> f64;
    fn set_position(&mut self, t: f64);
}

impl Positioned for Stop {
    fn position(&self) -> f64 { self.position }
    fn set_position(&mut self, t: f64) { self.position = t }
}

impl Positioned for TransparencyStop {
    fn position(&self) -> f64 { self.position }
    fn set_position(&mut self, t: f64) { self.position = t }
}

/// Stable sort: stops at the same position keep their order.
fn sort_stops<T: Positioned>(stops: &mut [T]) {
    stops.sort_by(|a, b| a.position().total_cmp(&b.position()));
}

fn normalize_stops<T: Positioned>(stops: &[T]) -> Result<Vec<T>> {
    if stops.is_empty() {
        return Err(Error::CannotNormalize("no stops"))
    }
    let (min, max) = stops.iter().fold(
        (f64::INFINITY, f64::NEG_INFINITY),
        |(min, max), s| (min.min(s.position()), max.max(s.position())));
    if !(max > min) {
        return Err(Error::CannotNormalize("all stops at the same position"))
    }
    let span = max - min;
    let mut stops = stops.to_vec();
    for s in stops.iter_mut() {
        s.set_position((s.position() - min) / span);
    }
    sort_stops(&mut stops);
    Ok(stops)
}

/// Locate the segment `positions[i] <= t <= positions[i + 1]` by a
/// linear scan and return `(i, j, u)` where `u` is the relative
/// location of `t` between `positions[i]` and `positions[j]`.
///
/// Positions outside the covered range are clamped to the nearest end
/// stop.  This happens only through rounding, as the callers query
/// positions taken from normalized stop sets.
fn bracket(positions: &[f64], t: f64) -> (usize, usize, f64) {
    for (i, w) in positions.windows(2).enumerate() {
        let (t1, t2) = (w[0], w[1]);
        if t1 <= t && t <= t2 {
            let u = if t2 > t1 { (t - t1) / (t2 - t1) } else { 0. };
            return (i, i + 1, u)
        }
    }
    match positions.first() {
        Some(&first) if t >= first => {
            let last = positions.len() - 1;
            (last, last, 0.)
        }
        _ => (0, 0, 0.),
    }
}

#[inline]
fn lerp(a: f64, b: f64, u: f64) -> f64 { a + u * (b - a) }

/// A gradient.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Gradient {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default)]
    pub stops: Vec<Stop>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transparency_stops: Option<Vec<TransparencyStop>>,
}

impl Gradient {
    /// A gradient with the given color stops and no transparency stops.
    pub fn new(stops: Vec<Stop>) -> Self {
        Gradient { name: None, stops, transparency_stops: None }
    }

    /// Same as [`Gradient::new`], naming the gradient.
    pub fn named(name: impl Into<String>, stops: Vec<Stop>) -> Self {
        Gradient { name: Some(name.into()), stops, transparency_stops: None }
    }

    /// Create a gradient from evenly spaced colors.
    ///
    /// # Example
    ///
    /// ```
    /// use swatch_codec::{Color, Gradient};
    /// let g = Gradient::evenly_spaced(vec![Color::rgb(1., 0., 0.),
    ///                                      Color::rgb(0., 1., 0.),
    ///                                      Color::rgb(0., 0., 1.)]);
    /// let t: Vec<_> = g.stops.iter().map(|s| s.position).collect();
    /// assert_eq!(t, [0., 0.5, 1.]);
    /// ```
    pub fn evenly_spaced(colors: Vec<Color>) -> Self {
        let n = colors.len();
        let dt = if n > 1 { 1. / (n - 1) as f64 } else { 0. };
        Self::new(colors.into_iter().enumerate()
                  .map(|(i, c)| Stop::new(i as f64 * dt, c)).collect())
    }

    /// Returns `true` if the gradient has at least one transparency stop.
    pub fn has_transparency(&self) -> bool {
        self.transparency_stops.as_ref().is_some_and(|t| !t.is_empty())
    }

    /// Return a copy with color and transparency stops sorted by
    /// position.  Stops at equal positions keep their relative order.
    pub fn sorted(&self) -> Gradient {
        let mut g = self.clone();
        sort_stops(&mut g.stops);
        if let Some(t) = g.transparency_stops.as_mut() {
            sort_stops(t);
        }
        g
    }

    /// Return a copy whose color stop positions are linearly rescaled
    /// to \[0, 1\] and sorted.  Transparency stops are only sorted.
    ///
    /// Fails with [`Error::CannotNormalize`] if the gradient has no stop
    /// or if all stops are at the same position.
    pub fn normalized(&self) -> Result<Gradient> {
        let mut g = self.sorted();
        g.stops = normalize_stops(&self.stops)?;
        Ok(g)
    }

    /// Fold the transparency stops into the alpha of the color stops.
    ///
    /// Both stop sets are first normalized independently.  One color stop
    /// is then produced for each distinct position of either set, its
    /// RGB interpolated linearly from the enclosing color stops and its
    /// alpha from the enclosing transparency stops.  The midpoints of the
    /// transparency stops are not taken into account.
    ///
    /// A gradient without transparency stops is returned unchanged.  Colors
    /// are converted to RGB, so LAB stops make this fail.
    pub fn merged_transparency_stops(&self) -> Result<Gradient> {
        let tstops = match &self.transparency_stops {
            Some(t) if !t.is_empty() => t,
            _ => return Ok(self.clone()),
        };
        let colors = normalize_stops(&self.stops)?;
        let opacity = normalize_stops(tstops)?;

        let color_pos: Vec<f64> = colors.iter().map(|s| s.position).collect();
        let opacity_pos: Vec<f64> = opacity.iter().map(|s| s.position).collect();
        let rgba = colors.iter().map(|s| s.color.to_rgba())
            .collect::<Result<Vec<RGBA<f64>>>>()?;

        let mut positions: Vec<f64> = color_pos.iter()
            .chain(opacity_pos.iter()).copied().collect();
        positions.sort_by(f64::total_cmp);
        positions.dedup();

        let stops = positions.into_iter().map(|t| {
            let (i, j, u) = bracket(&color_pos, t);
            let (c0, c1) = (rgba[i], rgba[j]);
            let (k, l, v) = bracket(&opacity_pos, t);
            let a = lerp(opacity[k].value, opacity[l].value, v);
            Stop::new(t, Color::rgba(lerp(c0.r, c1.r, u), lerp(c0.g, c1.g, u),
                                     lerp(c0.b, c1.b, u), a))
        }).collect();
        Ok(Gradient { name: self.name.clone(), stops, transparency_stops: None })
    }

    /// Return a sorted copy whose first stop is at 0 and last at 1.  When
    /// the first (resp. last) stop is farther than [`EDGE_EPSILON`] from
    /// 0 (resp. 1), a stop with the same color is added at the edge.
    /// Transparency stops are handled in the same way.
    pub fn expanded_to_edges(&self) -> Gradient {
        fn expand<T: Positioned>(stops: &mut Vec<T>) {
            if let Some(first) = stops.first() {
                if first.position() > EDGE_EPSILON {
                    let mut s = first.clone();
                    s.set_position(0.);
                    stops.insert(0, s);
                }
            }
            if let Some(last) = stops.last() {
                if last.position() < 1. - EDGE_EPSILON {
                    let mut s = last.clone();
                    s.set_position(1.);
                    stops.push(s);
                }
            }
        }
        let mut g = self.sorted();
        expand(&mut g.stops);
        if let Some(t) = g.transparency_stops.as_mut() {
            expand(t);
        }
        g
    }
}

/// An ordered collection of gradients, as stored in gradient files.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Gradients {
    #[serde(default)]
    pub gradients: Vec<Gradient>,
}

impl Gradients {
    pub fn new() -> Self { Self::default() }

    pub fn len(&self) -> usize { self.gradients.len() }

    pub fn is_empty(&self) -> bool { self.gradients.is_empty() }

    pub fn push(&mut self, g: Gradient) { self.gradients.push(g) }

    pub fn iter(&self) -> std::slice::Iter<'_, Gradient> {
        self.gradients.iter()
    }
}

impl From<Vec<Gradient>> for Gradients {
    fn from(gradients: Vec<Gradient>) -> Self { Gradients { gradients } }
}

impl From<Gradient> for Gradients {
    fn from(g: Gradient) -> Self { Gradients { gradients: vec![g] } }
}

impl<'a> IntoIterator for &'a Gradients {
    type Item = &'a Gradient;
    type IntoIter = std::slice::Iter<'a, Gradient>;
    fn into_iter(self) -> Self::IntoIter { self.gradients.iter() }
}
