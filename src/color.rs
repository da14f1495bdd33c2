//! Colors as stored in palette and gradient files.

use std::fmt;
use rgb::{RGB8, RGBA, RGBA8};
use serde::{Deserialize, Serialize};
use crate::convert::{ColorConverter, NaiveConverter};
use crate::error::{Error, Result};

/// The colorspace in which the components of a [`Color`] are expressed.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ColorSpace {
    #[serde(rename = "CMYK")]
    Cmyk,
    #[serde(rename = "RGB")]
    Rgb,
    #[serde(rename = "LAB")]
    Lab,
    #[serde(rename = "Gray")]
    Gray,
}

impl ColorSpace {
    /// Number of components a color in this space carries.
    pub const fn component_count(self) -> usize {
        match self {
            ColorSpace::Cmyk => 4,
            ColorSpace::Rgb | ColorSpace::Lab => 3,
            ColorSpace::Gray => 1,
        }
    }
}

impl fmt::Display for ColorSpace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ColorSpace::Cmyk => "CMYK",
            ColorSpace::Rgb => "RGB",
            ColorSpace::Lab => "LAB",
            ColorSpace::Gray => "Gray",
        })
    }
}

/// How a swatch is meant to be used by the design tool.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColorType {
    /// Global (process) color.
    #[default]
    Global,
    /// Spot color.
    Spot,
    Normal,
}

/// A named color.
///
/// The number of components always matches [`ColorSpace::component_count`]
/// for the color's space: constructors enforce it and the fields cannot be
/// mutated afterwards.  Use the `with_*` methods to obtain modified copies.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "ColorRecord", into = "ColorRecord")]
pub struct Color {
    name: String,
    space: ColorSpace,
    components: Vec<f64>,
    color_type: ColorType,
    alpha: f64,
}

impl Color {
    /// Create a color, checking that `components` has the length
    /// required by `space`.
    ///
    /// # Example
    ///
    /// ```
    /// use swatch_codec::{Color, ColorSpace, ColorType};
    /// let c = Color::new("red", ColorSpace::Rgb, vec![1., 0., 0.],
    ///                    ColorType::Global, 1.).unwrap();
    /// assert_eq!(c.components(), &[1., 0., 0.]);
    /// assert!(Color::new("", ColorSpace::Cmyk, vec![0.; 3],
    ///                    ColorType::Global, 1.).is_err());
    /// ```
    pub fn new(name: impl Into<String>, space: ColorSpace,
               components: Vec<f64>, color_type: ColorType,
               alpha: f64) -> Result<Self> {
        let expected = space.component_count();
        if components.len() != expected {
            return Err(Error::InvalidComponentCountForModel {
                space, expected, actual: components.len() });
        }
        Ok(Color { name: name.into(), space, components, color_type, alpha })
    }

    // Only called with arrays whose length matches `space`.
    fn from_parts<const N: usize>(space: ColorSpace, c: [f64; N],
                                  alpha: f64) -> Self {
        debug_assert_eq!(N, space.component_count());
        Color { name: String::new(), space, components: c.to_vec(),
                color_type: ColorType::Global, alpha }
    }

    /// An opaque RGB color with components in \[0, 1\].
    pub fn rgb(r: f64, g: f64, b: f64) -> Self {
        Self::from_parts(ColorSpace::Rgb, [r, g, b], 1.)
    }

    /// An RGB color with alpha, all in \[0, 1\].
    pub fn rgba(r: f64, g: f64, b: f64, a: f64) -> Self {
        Self::from_parts(ColorSpace::Rgb, [r, g, b], a)
    }

    /// An opaque CMYK color with components in \[0, 1\].
    pub fn cmyk(c: f64, m: f64, y: f64, k: f64) -> Self {
        Self::from_parts(ColorSpace::Cmyk, [c, m, y, k], 1.)
    }

    /// An opaque gray level, 0 being black and 1 white.
    pub fn gray(l: f64) -> Self {
        Self::from_parts(ColorSpace::Gray, [l], 1.)
    }

    /// An opaque CIE L*a*b* color (L in \[0, 100\]).
    pub fn lab(l: f64, a: f64, b: f64) -> Self {
        Self::from_parts(ColorSpace::Lab, [l, a, b], 1.)
    }

    pub fn name(&self) -> &str { &self.name }

    pub fn space(&self) -> ColorSpace { self.space }

    pub fn components(&self) -> &[f64] { &self.components }

    pub fn color_type(&self) -> ColorType { self.color_type }

    /// Opacity in \[0, 1\].
    pub fn alpha(&self) -> f64 { self.alpha }

    /// Return a copy of the color with another name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Return a copy of the color with another opacity.
    pub fn with_alpha(mut self, alpha: f64) -> Self {
        self.alpha = alpha;
        self
    }

    /// Return a copy of the color with another [`ColorType`].
    pub fn with_color_type(mut self, color_type: ColorType) -> Self {
        self.color_type = color_type;
        self
    }

    /// Convert the color to `space` with the [`NaiveConverter`].
    #[inline]
    pub fn converted(&self, space: ColorSpace) -> Result<Color> {
        NaiveConverter.convert(self, space)
    }

    /// Convert the color to `space` with the given converter.
    #[inline]
    pub fn converted_with(&self, space: ColorSpace,
                          converter: &dyn ColorConverter) -> Result<Color> {
        converter.convert(self, space)
    }

    /// Return the red, green, blue and alpha components (in \[0, 1\]).
    pub fn to_rgba(&self) -> Result<RGBA<f64>> {
        let rgb = self.converted(ColorSpace::Rgb)?;
        let c = rgb.components();
        Ok(RGBA { r: c[0], g: c[1], b: c[2], a: self.alpha })
    }

    /// Return the color as 8 bit RGBA, clamping out of gamut values.
    pub fn to_rgba8(&self) -> Result<RGBA8> {
        let c = self.to_rgba()?;
        Ok(RGBA8 { r: unit_to_u8(c.r), g: unit_to_u8(c.g),
                   b: unit_to_u8(c.b), a: unit_to_u8(c.a) })
    }

    /// `#rrggbb` representation of the color.
    pub fn hex_rgb(&self) -> Result<String> {
        let c = self.to_rgba8()?;
        Ok(format!("#{:02x}{:02x}{:02x}", c.r, c.g, c.b))
    }
}

/// Map a value in \[0, 1\] to \[0, 255\], rounding to the nearest integer.
pub(crate) fn unit_to_u8(x: f64) -> u8 {
    (x.clamp(0., 1.) * 255.).round() as u8
}

impl From<RGB8> for Color {
    fn from(c: RGB8) -> Self {
        Color::rgb(c.r as f64 / 255., c.g as f64 / 255., c.b as f64 / 255.)
    }
}

impl From<RGBA8> for Color {
    fn from(c: RGBA8) -> Self {
        Color::rgba(c.r as f64 / 255., c.g as f64 / 255., c.b as f64 / 255.,
                    c.a as f64 / 255.)
    }
}

/// Interchange form of a [`Color`]; default-valued fields are omitted.
#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ColorRecord {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    name: String,
    color_space: ColorSpace,
    color_components: Vec<f64>,
    #[serde(default, skip_serializing_if = "is_global")]
    color_type: ColorType,
    #[serde(default = "opaque", skip_serializing_if = "is_opaque")]
    alpha: f64,
}

fn is_global(t: &ColorType) -> bool { *t == ColorType::Global }
fn opaque() -> f64 { 1. }
fn is_opaque(a: &f64) -> bool { *a == 1. }

impl TryFrom<ColorRecord> for Color {
    type Error = Error;

    fn try_from(r: ColorRecord) -> Result<Self> {
        Color::new(r.name, r.color_space, r.color_components, r.color_type,
                   r.alpha)
    }
}

impl From<Color> for ColorRecord {
    fn from(c: Color) -> Self {
        ColorRecord { name: c.name, color_space: c.space,
                      color_components: c.components,
                      color_type: c.color_type, alpha: c.alpha }
    }
}
