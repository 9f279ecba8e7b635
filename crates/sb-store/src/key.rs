//! Key listing: name and class of each entry in a directory.

use std::fmt;

/// Class of a stored entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ObjectClass {
    /// Sub-directory.
    Directory,
    /// [`sb_core::Histogram`].
    Histogram,
    /// [`sb_core::UncertaintySeries`].
    Series,
}

impl ObjectClass {
    /// Lower-case class name, as written in the store file.
    pub fn as_str(&self) -> &'static str {
        match self {
            ObjectClass::Directory => "directory",
            ObjectClass::Histogram => "histogram",
            ObjectClass::Series => "series",
        }
    }
}

impl fmt::Display for ObjectClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Public info about a key (for `list_keys()`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyInfo {
    /// Entry name.
    pub name: String,
    /// Entry class.
    pub class: ObjectClass,
}
