//! Directory tree and stored objects.

use std::collections::BTreeMap;

use sb_core::{Histogram, UncertaintySeries};
use serde::{Deserialize, Serialize};

use crate::key::{KeyInfo, ObjectClass};

/// An object stored in a directory.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "class", rename_all = "snake_case")]
pub enum StoredObject {
    /// A histogram.
    Histogram(Histogram),
    /// An uncertainty series.
    Series(UncertaintySeries),
}

impl StoredObject {
    /// Class of the object.
    pub fn class(&self) -> ObjectClass {
        match self {
            StoredObject::Histogram(_) => ObjectClass::Histogram,
            StoredObject::Series(_) => ObjectClass::Series,
        }
    }

    /// Name of the object.
    pub fn name(&self) -> &str {
        match self {
            StoredObject::Histogram(h) => h.name(),
            StoredObject::Series(s) => s.name(),
        }
    }
}

/// A directory: named sub-directories plus named objects, both kept in name order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Directory {
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    dirs: BTreeMap<String, Directory>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    objects: BTreeMap<String, StoredObject>,
}

impl Directory {
    /// Whether the directory holds neither objects nor sub-directories.
    pub fn is_empty(&self) -> bool {
        self.dirs.is_empty() && self.objects.is_empty()
    }

    /// Keys in this directory: sub-directories first, then objects, each in name order.
    pub fn keys(&self) -> Vec<KeyInfo> {
        let dirs = self
            .dirs
            .keys()
            .map(|name| KeyInfo { name: name.clone(), class: ObjectClass::Directory });
        let objects =
            self.objects.iter().map(|(name, o)| KeyInfo { name: name.clone(), class: o.class() });
        dirs.chain(objects).collect()
    }

    /// Find an object by name.
    pub fn find(&self, name: &str) -> Option<&StoredObject> {
        self.objects.get(name)
    }

    /// Immediate sub-directory.
    pub fn subdir(&self, name: &str) -> Option<&Directory> {
        self.dirs.get(name)
    }

    /// Walk a sequence of path components.
    pub fn walk<'a, I>(&self, parts: I) -> Option<&Directory>
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut cur = self;
        for p in parts {
            cur = cur.dirs.get(p)?;
        }
        Some(cur)
    }

    /// Walk a sequence of path components, creating missing directories.
    pub fn walk_or_create<'a, I>(&mut self, parts: I) -> &mut Directory
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut cur = self;
        for p in parts {
            cur = cur.dirs.entry(p.to_string()).or_default();
        }
        cur
    }

    /// Drop every object and sub-directory.
    pub fn clear(&mut self) {
        self.dirs.clear();
        self.objects.clear();
    }

    /// Insert an object, replacing any existing object of the same name.
    pub fn insert(&mut self, object: StoredObject) -> Option<StoredObject> {
        self.objects.insert(object.name().to_string(), object)
    }
}
