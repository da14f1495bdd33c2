//! The file formats supported out of the box.

use std::sync::Arc;
use log::warn;
use crate::coder::Coder;
use crate::color::{Color, ColorSpace};
use crate::convert::ColorConverter;
use crate::error::Result;
use crate::palette::Palette;

pub mod aco;
pub mod act;
pub mod ase;
pub mod ggr;
pub mod gpl;
pub mod jasc;
pub mod json;
pub mod riff;

pub use aco::AcoCoder;
pub use act::ActCoder;
pub use ase::AseCoder;
pub use ggr::GgrCoder;
pub use gpl::GplCoder;
pub use jasc::JascPalCoder;
pub use json::{JsonGradientCoder, JsonPaletteCoder};
pub use riff::RiffPalCoder;

/// One instance of each coder, in the order they are tried.
pub(crate) fn standard_coders(converter: &Arc<dyn ColorConverter>)
                              -> Vec<Box<dyn Coder>> {
    vec![Box::new(AseCoder),
         Box::new(AcoCoder),
         Box::new(ActCoder::new(converter.clone())),
         Box::new(RiffPalCoder::new(converter.clone())),
         Box::new(JascPalCoder::new(converter.clone())),
         Box::new(GplCoder::new(converter.clone())),
         Box::new(GgrCoder::new(converter.clone())),
         Box::new(JsonPaletteCoder),
         Box::new(JsonGradientCoder)]
}

/// The colors of `palette` as a flat list expressed in `space`, for
/// formats without groups that only store one colorspace.
pub(crate) fn flat_colors_in(coder: &str, palette: &Palette, space: ColorSpace,
                             converter: &dyn ColorConverter)
                             -> Result<Vec<Color>> {
    if !palette.groups.is_empty() {
        warn!("{coder}: groups are not supported, {} groups flattened",
              palette.groups.len());
    }
    let mut converted = 0;
    let colors = palette.all_colors().map(|c| {
        if c.space() == space { Ok(c.clone()) }
        else {
            converted += 1;
            converter.convert(c, space)
        }
    }).collect::<Result<Vec<_>>>()?;
    if converted > 0 {
        warn!("{coder}: {converted} colors converted to {space}");
    }
    Ok(colors)
}
