//! Read and write color palettes and gradients.
//!
//! - [`Color`], [`Palette`] and [`Gradient`] form the in-memory model.
//! - A [`Coder`] translates one file format to and from a [`Model`].
//! - A [`CoderRegistry`] picks the coders for a file extension and tries
//!   them in order until one decodes the data.
//!
//! The formats provided out of the box are listed in [`formats`].
//!
//! # Example
//!
//! ```
//! use swatch_codec::{Color, Palette};
//! let p = Palette::named("", vec![Color::rgb(1., 0., 0.).with_name("red"),
//!                                 Color::rgb(0., 0., 1.).with_name("blue")]);
//! let bytes = swatch_codec::encode(&p.clone().into(), "ase")?;
//! let back = swatch_codec::decode(&bytes, "ase")?;
//! assert_eq!(back.into_palette(), Some(p));
//! # Ok::<(), swatch_codec::Error>(())
//! ```
//!
//! Decoding and encoding report what they do through the [`log`] crate:
//! rejected candidates at the `debug` level and lossy encodings (dropped
//! groups or opacity, converted colors) at the `warn` level.

use std::path::Path;

mod error;
mod color;
mod convert;
mod palette;
mod gradient;
mod coder;
pub mod io;
pub mod formats;

pub use error::{Error, ErrorKind, Result};
pub use color::{Color, ColorSpace, ColorType};
pub use convert::{ColorConverter, NaiveConverter};
pub use palette::{Group, Palette};
pub use gradient::{Gradient, Gradients, Stop, TransparencyStop, EDGE_EPSILON};
pub use coder::{Coder, CoderRegistry, Model, ModelKind, RegistryBuilder,
                default_registry, first_success};
pub use formats::{AcoCoder, ActCoder, AseCoder, GgrCoder, GplCoder,
                  JascPalCoder, JsonGradientCoder, JsonPaletteCoder,
                  RiffPalCoder};

/// Decode `data` with the coders of the [default registry][default_registry]
/// handling `extension` (e.g. `"pal"` or `".ase"`).
pub fn decode(data: &[u8], extension: &str) -> Result<Model> {
    default_registry().decode(data, extension)
}

/// Decode the file at `path`, choosing the coders from its extension.
pub fn decode_path(path: impl AsRef<Path>) -> Result<Model> {
    default_registry().decode_path(path.as_ref(), None)
}

/// Encode `model` with the coder of the default registry named
/// `coder_name` (see [`Coder::name`]).
pub fn encode(model: &Model, coder_name: &str) -> Result<Vec<u8>> {
    default_registry().encode(model, coder_name)
}
