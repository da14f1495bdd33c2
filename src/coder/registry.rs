use std::io::Read;
use std::path::Path;
use std::sync::Arc;
use lazy_static::lazy_static;
use log::debug;
use crate::convert::{ColorConverter, NaiveConverter};
use crate::error::{Error, Result};
use crate::formats;
use super::{Coder, Model};

/// Apply `attempt` to each candidate in order and return the first
/// successful result, or `None` if every candidate failed.  Candidates
/// after the first success are not tried.
///
/// # Example
///
/// ```
/// use swatch_codec::first_success;
/// let r = first_success(["x", "12", "7"], |s| s.parse::<u8>());
/// assert_eq!(r, Some(12));
/// ```
pub fn first_success<C, T, E>(candidates: impl IntoIterator<Item = C>,
                              mut attempt: impl FnMut(C) -> std::result::Result<T, E>)
                              -> Option<T> {
    candidates.into_iter().find_map(|c| attempt(c).ok())
}

fn normalize_extension(ext: &str) -> String {
    ext.trim_start_matches('.').to_ascii_lowercase()
}

/// Assembles a [`CoderRegistry`].
pub struct RegistryBuilder {
    coders: Vec<Box<dyn Coder>>,
    converter: Arc<dyn ColorConverter>,
}

impl Default for RegistryBuilder {
    fn default() -> Self {
        RegistryBuilder { coders: vec![], converter: Arc::new(NaiveConverter) }
    }
}

impl RegistryBuilder {
    /// A builder without coders, using the [`NaiveConverter`].
    pub fn new() -> Self { Self::default() }

    /// Set the converter handed to the standard coders, which use it when
    /// a palette must be written in another colorspace.  Only coders
    /// added by later calls to [`RegistryBuilder::standard_coders`] are
    /// affected.
    pub fn converter(mut self, converter: Arc<dyn ColorConverter>) -> Self {
        self.converter = converter;
        self
    }

    /// Append all the coders provided by this crate.
    pub fn standard_coders(mut self) -> Self {
        self.coders.extend(formats::standard_coders(&self.converter));
        self
    }

    /// Append `coder`.  For a given extension, coders are tried in the
    /// order they were registered.
    pub fn register(mut self, coder: impl Coder + 'static) -> Self {
        self.coders.push(Box::new(coder));
        self
    }

    pub fn build(self) -> CoderRegistry {
        CoderRegistry { coders: self.coders }
    }
}

/// An immutable set of coders indexed by file extension.
///
/// Several formats share an extension (".pal" is used by both RIFF and
/// JASC palettes for instance): decoding tries every coder registered
/// for the extension, in registration order, and keeps the first
/// success.
pub struct CoderRegistry {
    coders: Vec<Box<dyn Coder>>,
}

lazy_static! {
    static ref DEFAULT_REGISTRY: CoderRegistry = CoderRegistry::standard();
}

/// The registry of all the coders of this crate, built on first use.
pub fn default_registry() -> &'static CoderRegistry { &DEFAULT_REGISTRY }

impl CoderRegistry {
    pub fn builder() -> RegistryBuilder { RegistryBuilder::new() }

    /// All the coders of this crate with the [`NaiveConverter`].
    pub fn standard() -> Self {
        RegistryBuilder::new().standard_coders().build()
    }

    /// All the coders of this crate using `converter`.
    pub fn standard_with(converter: Arc<dyn ColorConverter>) -> Self {
        RegistryBuilder::new().converter(converter).standard_coders().build()
    }

    /// The registered coders, in registration order.
    pub fn coders(&self) -> impl Iterator<Item = &dyn Coder> {
        self.coders.iter().map(|c| c.as_ref())
    }

    /// The coders handling `extension` (case insensitive, with or
    /// without the leading dot), in registration order.
    pub fn coders_for_extension(&self, extension: &str) -> Vec<&dyn Coder> {
        let ext = normalize_extension(extension);
        self.coders().filter(|c| c.extensions().contains(&ext.as_str()))
            .collect()
    }

    pub fn coder_named(&self, name: &str) -> Option<&dyn Coder> {
        self.coders().find(|c| c.name() == name)
    }

    /// Decode `data` with the coders registered for `extension`.
    ///
    /// When every candidate fails, the individual errors (logged at debug
    /// level) are replaced by a single [`Error::UnsupportedFormat`].
    pub fn decode(&self, data: &[u8], extension: &str) -> Result<Model> {
        let candidates = self.coders_for_extension(extension);
        if candidates.is_empty() {
            return Err(Error::UnsupportedFormat(
                format!("no coder for extension {extension:?}")))
        }
        first_success(candidates, |coder| {
            coder.decode(data).inspect_err(|e| {
                debug!("coder {} rejected the data: {e}", coder.name())
            })
        }).ok_or_else(|| Error::UnsupportedFormat(
            format!("no coder for extension {extension:?} could decode the data")))
    }

    /// Decode everything `reader` yields, see [`CoderRegistry::decode`].
    pub fn decode_reader(&self, reader: &mut dyn Read, extension: &str)
                         -> Result<Model> {
        let mut data = Vec::new();
        reader.read_to_end(&mut data)?;
        self.decode(&data, extension)
    }

    /// Decode the file at `path` with `coder`, or with the coders
    /// registered for the extension of `path` if `coder` is `None`.
    pub fn decode_path(&self, path: &Path, coder: Option<&dyn Coder>)
                       -> Result<Model> {
        if let Some(coder) = coder {
            return coder.decode_path(path)
        }
        let ext = path.extension().and_then(|e| e.to_str())
            .ok_or_else(|| Error::UnsupportedFormat(
                format!("{} has no usable extension", path.display())))?;
        let data = std::fs::read(path)?;
        self.decode(&data, ext)
    }

    /// Encode `model` with the coder called `coder_name`.
    pub fn encode(&self, model: &Model, coder_name: &str) -> Result<Vec<u8>> {
        let coder = self.coder_named(coder_name).ok_or_else(
            || Error::UnsupportedFormat(format!("no coder named {coder_name:?}")))?;
        coder.encode(model)
    }

    /// Encode `model` with the first coder registered for `extension`
    /// that handles this kind of model.
    pub fn encode_for_extension(&self, model: &Model, extension: &str)
                                -> Result<Vec<u8>> {
        let coder = self.coders_for_extension(extension).into_iter()
            .find(|c| c.kind() == model.kind())
            .ok_or_else(|| Error::UnsupportedFormat(
                format!("no coder can write {:?} files", extension)))?;
        coder.encode(model)
    }
}
