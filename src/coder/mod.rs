//! The coder abstraction.
//!
//! A [`Coder`] converts between the bytes of one file format and a
//! [`Model`].  Coders are stateless: the same instance may be used for
//! any number of concurrent calls.

use std::fs;
use std::io::Read;
use std::path::Path;
use crate::error::{Error, Result};
use crate::gradient::{Gradient, Gradients};
use crate::io::ByteReader;
use crate::palette::Palette;

mod registry;
pub use registry::{CoderRegistry, RegistryBuilder, default_registry,
                   first_success};

/// What a coder reads and writes.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ModelKind {
    Palette,
    Gradients,
}

impl ModelKind {
    fn describe(self) -> &'static str {
        match self {
            ModelKind::Palette => "palettes",
            ModelKind::Gradients => "gradients",
        }
    }
}

/// The result of decoding a file.
#[derive(Clone, Debug, PartialEq)]
pub enum Model {
    Palette(Palette),
    Gradients(Gradients),
}

impl Model {
    pub fn kind(&self) -> ModelKind {
        match self {
            Model::Palette(_) => ModelKind::Palette,
            Model::Gradients(_) => ModelKind::Gradients,
        }
    }

    pub fn as_palette(&self) -> Option<&Palette> {
        match self { Model::Palette(p) => Some(p), _ => None }
    }

    pub fn as_gradients(&self) -> Option<&Gradients> {
        match self { Model::Gradients(g) => Some(g), _ => None }
    }

    pub fn into_palette(self) -> Option<Palette> {
        match self { Model::Palette(p) => Some(p), _ => None }
    }

    pub fn into_gradients(self) -> Option<Gradients> {
        match self { Model::Gradients(g) => Some(g), _ => None }
    }
}

impl From<Palette> for Model {
    fn from(p: Palette) -> Self { Model::Palette(p) }
}

impl From<Gradients> for Model {
    fn from(g: Gradients) -> Self { Model::Gradients(g) }
}

impl From<Gradient> for Model {
    fn from(g: Gradient) -> Self { Model::Gradients(g.into()) }
}

/// Reads and writes one file format.
///
/// Implementors provide [`Coder::decode_stream`] and, when the format
/// can be written, [`Coder::encode`]; the other decoding methods are
/// built on top of `decode_stream`.
///
/// Decoding fails, and never returns a partial result, when the data is
/// truncated, has a wrong magic number or version, uses an unknown tag
/// or refers to a non-existent index.  Encoding projects the model onto
/// what the format can represent (dropping groups, alpha, converting
/// colorspaces...) and logs a warning when doing so loses information.
pub trait Coder: Send + Sync {
    /// Short identifier of the format, e.g. `"ase"`.
    fn name(&self) -> &'static str;

    /// Lowercase file extensions, without the leading dot.
    fn extensions(&self) -> &'static [&'static str];

    fn kind(&self) -> ModelKind;

    /// Decode the data from the current position of `stream`.
    fn decode_stream(&self, stream: &mut ByteReader<'_>) -> Result<Model>;

    /// Encode `model`.  Coders that cannot write their format keep this
    /// default, which fails with [`Error::NotImplemented`].
    fn encode(&self, model: &Model) -> Result<Vec<u8>> {
        let _ = model;
        Err(Error::NotImplemented { coder: self.name(), operation: "encoding" })
    }

    /// Decode a whole buffer.
    fn decode(&self, data: &[u8]) -> Result<Model> {
        self.decode_stream(&mut ByteReader::new(data))
    }

    /// Decode everything `reader` yields.
    fn decode_reader(&self, reader: &mut dyn Read) -> Result<Model> {
        let mut data = Vec::new();
        reader.read_to_end(&mut data)?;
        self.decode(&data)
    }

    /// Decode the file at `path`.
    fn decode_path(&self, path: &Path) -> Result<Model> {
        self.decode(&fs::read(path)?)
    }

    /// Decode `data`, which must hold a palette.
    fn decode_palette(&self, data: &[u8]) -> Result<Palette> {
        self.decode(data)?.into_palette().ok_or_else(|| self.unsupported_model())
    }

    /// Decode `data`, which must hold gradients.
    fn decode_gradients(&self, data: &[u8]) -> Result<Gradients> {
        self.decode(data)?.into_gradients().ok_or_else(|| self.unsupported_model())
    }

    #[doc(hidden)]
    fn unsupported_model(&self) -> Error {
        Error::UnsupportedModel { coder: self.name(),
                                  expected: self.kind().describe() }
    }
}

/// The palette held by `model`, or an error naming `coder`.
pub(crate) fn expect_palette<'m>(coder: &dyn Coder, model: &'m Model)
                                 -> Result<&'m Palette> {
    model.as_palette().ok_or_else(|| coder.unsupported_model())
}

/// The gradients held by `model`, or an error naming `coder`.
pub(crate) fn expect_gradients<'m>(coder: &dyn Coder, model: &'m Model)
                                   -> Result<&'m Gradients> {
    model.as_gradients().ok_or_else(|| coder.unsupported_model())
}
