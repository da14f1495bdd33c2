//! Palettes: global colors plus named groups of colors.

use serde::{Deserialize, Serialize};
use crate::color::Color;

/// A named, ordered list of colors within a [`Palette`].
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Group {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub name: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub colors: Vec<Color>,
}

impl Group {
    pub fn new(name: impl Into<String>, colors: Vec<Color>) -> Self {
        Group { name: name.into(), colors }
    }
}

/// A palette of colors.
///
/// `colors` holds the colors that belong to no group (the "global"
/// colors); `groups` keeps the order in which the file listed them.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct Palette {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub name: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub colors: Vec<Color>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub groups: Vec<Group>,
    /// Name of the coder that produced this palette, if it was decoded.
    #[serde(skip)]
    pub format: Option<&'static str>,
}

impl Palette {
    /// An empty palette.
    pub fn new() -> Self { Self::default() }

    /// A palette with the given name and global colors.
    pub fn named(name: impl Into<String>, colors: Vec<Color>) -> Self {
        Palette { name: name.into(), colors, ..Self::default() }
    }

    /// Iterate over the global colors followed by the colors of each
    /// group, in order.  The grouping is lost.
    pub fn all_colors(&self) -> impl Iterator<Item = &Color> {
        self.colors.iter()
            .chain(self.groups.iter().flat_map(|g| g.colors.iter()))
    }

    /// Total number of colors, groups included.
    pub fn color_count(&self) -> usize {
        self.colors.len() + self.groups.iter().map(|g| g.colors.len()).sum::<usize>()
    }

    /// Return a copy where the colors of all groups have been appended
    /// to the global colors.
    pub fn flattened(&self) -> Palette {
        Palette { name: self.name.clone(),
                  colors: self.all_colors().cloned().collect(),
                  groups: vec![],
                  format: self.format }
    }

    pub(crate) fn with_format(mut self, format: &'static str) -> Self {
        self.format = Some(format);
        self
    }
}

// Provenance does not take part in equality: a decoded palette equals
// the one it was encoded from.
impl PartialEq for Palette {
    fn eq(&self, other: &Palette) -> bool {
        self.name == other.name && self.colors == other.colors
            && self.groups == other.groups
    }
}
