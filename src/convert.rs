//! Colorspace conversion.
//!
//! The [`NaiveConverter`] uses the usual device-dependent formulas
//! between RGB, CMYK and gray levels.  It is not colorimetric: callers
//! needing accurate results can supply their own [`ColorConverter`]
//! (to the coders that need to convert, through
//! [`RegistryBuilder::converter`](crate::RegistryBuilder::converter)).

use crate::color::{Color, ColorSpace};
use crate::error::{Error, Result};

/// Converts colors between colorspaces.
pub trait ColorConverter: Send + Sync {
    /// Return `color` expressed in `to`.  The name, color type and alpha
    /// of `color` are preserved.  Converting a color to its own space
    /// must return it unchanged.
    fn convert(&self, color: &Color, to: ColorSpace) -> Result<Color>;
}

/// Approximate conversions among RGB, CMYK and Gray.  Any conversion
/// involving LAB fails with [`Error::UnsupportedConversion`].
#[derive(Clone, Copy, Debug, Default)]
pub struct NaiveConverter;

impl ColorConverter for NaiveConverter {
    fn convert(&self, color: &Color, to: ColorSpace) -> Result<Color> {
        use ColorSpace::*;
        let from = color.space();
        if from == to { return Ok(color.clone()) }
        let c = color.components();
        let components = match (from, to) {
            (Cmyk, Rgb) => cmyk_to_rgb(c).to_vec(),
            (Rgb, Cmyk) => rgb_to_cmyk(c).to_vec(),
            (Gray, Rgb) => vec![c[0]; 3],
            (Rgb, Gray) => vec![luminance(c)],
            (Gray, Cmyk) => rgb_to_cmyk(&[c[0]; 3]).to_vec(),
            (Cmyk, Gray) => vec![luminance(&cmyk_to_rgb(c))],
            _ => return Err(Error::UnsupportedConversion { from, to }),
        };
        Color::new(color.name(), to, components, color.color_type(),
                   color.alpha())
    }
}

fn cmyk_to_rgb(c: &[f64]) -> [f64; 3] {
    let k = 1. - c[3];
    [(1. - c[0]) * k, (1. - c[1]) * k, (1. - c[2]) * k]
}

fn rgb_to_cmyk(c: &[f64]) -> [f64; 4] {
    let (r, g, b) = (c[0], c[1], c[2]);
    let k = 1. - r.max(g).max(b);
    if k >= 1. {
        // Pure black: the chromatic inks are undefined.
        return [0., 0., 0., 1.]
    }
    let d = 1. - k;
    [(1. - r - k) / d, (1. - g - k) / d, (1. - b - k) / d, k]
}

fn luminance(c: &[f64]) -> f64 {
    0.299 * c[0] + 0.587 * c[1] + 0.114 * c[2]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::ColorType;

    fn close(a: &[f64], b: &[f64]) -> bool {
        a.len() == b.len()
            && a.iter().zip(b).all(|(x, y)| (x - y).abs() <= 1e-12)
    }

    #[test]
    fn identity() {
        let colors = [Color::rgb(0.1, 0.2, 0.3), Color::cmyk(0.1, 0.2, 0.3, 0.4),
                      Color::gray(0.7), Color::lab(50., 10., -10.)];
        for c in colors {
            assert_eq!(c.converted(c.space()).unwrap(), c);
        }
    }

    #[test]
    fn rgb_cmyk_round_trip() {
        for rgb in [[1., 0., 0.], [0.2, 0.4, 0.6], [0.9, 0.9, 0.1],
                    [0., 0., 0.], [1., 1., 1.]] {
            let c = Color::rgb(rgb[0], rgb[1], rgb[2]);
            let back = c.converted(ColorSpace::Cmyk).unwrap()
                .converted(ColorSpace::Rgb).unwrap();
            assert!(close(back.components(), &rgb),
                    "{:?} ≉ {:?}", back.components(), rgb);
        }
    }

    #[test]
    fn black_has_no_chromatic_ink() {
        let k = Color::rgb(0., 0., 0.).converted(ColorSpace::Cmyk).unwrap();
        assert_eq!(k.components(), &[0., 0., 0., 1.]);
    }

    #[test]
    fn gray_conversions() {
        let g = Color::gray(0.25);
        assert_eq!(g.converted(ColorSpace::Rgb).unwrap().components(),
                   &[0.25, 0.25, 0.25]);
        let cmyk = g.converted(ColorSpace::Cmyk).unwrap();
        assert!(close(cmyk.components(), &[0., 0., 0., 0.75]));
        let white = Color::rgb(1., 1., 1.).converted(ColorSpace::Gray).unwrap();
        assert!(close(white.components(), &[1.]));
        let back = cmyk.converted(ColorSpace::Gray).unwrap();
        assert!(close(back.components(), &[0.25]));
    }

    #[test]
    fn metadata_is_preserved() {
        let c = Color::new("ink", ColorSpace::Rgb, vec![0., 1., 0.],
                           ColorType::Spot, 0.5).unwrap();
        let k = c.converted(ColorSpace::Cmyk).unwrap();
        assert_eq!(k.name(), "ink");
        assert_eq!(k.color_type(), ColorType::Spot);
        assert_eq!(k.alpha(), 0.5);
    }

    #[test]
    fn lab_is_unsupported() {
        let err = Color::lab(50., 0., 0.).converted(ColorSpace::Rgb).unwrap_err();
        assert!(matches!(err, Error::UnsupportedConversion {
            from: ColorSpace::Lab, to: ColorSpace::Rgb }));
        assert!(Color::gray(0.5).converted(ColorSpace::Lab).is_err());
    }
}
