//! Store file: open, navigate by path, overwrite objects, write back atomically.

use std::fs;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use sb_core::{Histogram, UncertaintySeries};
use serde::{Deserialize, Serialize};

use crate::directory::{Directory, StoredObject};
use crate::error::{Result, StoreError};
use crate::key::KeyInfo;

/// Schema tag written at the top of every store file.
pub const STORE_SCHEMA_VERSION: &str = "systband_store_v0";

#[derive(Debug, Serialize, Deserialize)]
struct StoreDocument {
    schema_version: String,
    #[serde(default)]
    root: Directory,
}

/// An open store file.
///
/// All reads and writes happen in memory; [`HistFile::write`] persists the whole tree.
#[derive(Debug, Clone)]
pub struct HistFile {
    path: PathBuf,
    root: Directory,
}

fn split_path(path: &str) -> impl Iterator<Item = &str> {
    path.split('/').filter(|s| !s.is_empty())
}

/// Split `"a/b/name"` into (`"a/b"`, `"name"`).
fn split_object_path(path: &str) -> Result<(&str, &str)> {
    let trimmed = path.trim_matches('/');
    match trimmed.rsplit_once('/') {
        Some((dir, name)) if !name.is_empty() => Ok((dir, name)),
        None if !trimmed.is_empty() => Ok(("", trimmed)),
        _ => Err(StoreError::KeyNotFound(path.to_string())),
    }
}

impl HistFile {
    /// Open an existing store file.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        if !path.exists() {
            return Err(StoreError::NotFound(path.display().to_string()));
        }
        let bytes = fs::read(&path)?;
        Self::from_slice(&bytes, path)
    }

    /// Open `path` if it exists, otherwise start an empty store bound to it ("update" mode).
    pub fn open_or_create(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if path.exists() { Self::open(path) } else { Ok(Self::create(path)) }
    }

    /// Empty store bound to `path`. Nothing touches disk until [`HistFile::write`].
    pub fn create(path: impl AsRef<Path>) -> Self {
        Self { path: path.as_ref().to_path_buf(), root: Directory::default() }
    }

    /// Parse a store document from bytes.
    pub fn from_slice(bytes: &[u8], path: PathBuf) -> Result<Self> {
        let doc: StoreDocument = serde_json::from_slice(bytes)?;
        if doc.schema_version != STORE_SCHEMA_VERSION {
            return Err(StoreError::BadSchema(doc.schema_version));
        }
        Ok(Self { path, root: doc.root })
    }

    /// Path the store is bound to.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Directory at `path` (`""` is the root).
    pub fn dir(&self, path: &str) -> Result<&Directory> {
        self.root.walk(split_path(path)).ok_or_else(|| StoreError::DirectoryNotFound(path.into()))
    }

    /// Whether a directory exists at `path`.
    pub fn has_dir(&self, path: &str) -> bool {
        self.root.walk(split_path(path)).is_some()
    }

    /// List the keys of the directory at `path`.
    pub fn list_keys(&self, path: &str) -> Result<Vec<KeyInfo>> {
        Ok(self.dir(path)?.keys())
    }

    fn get_object(&self, path: &str) -> Result<&StoredObject> {
        let (dir, name) = split_object_path(path)?;
        self.root
            .walk(split_path(dir))
            .and_then(|d| d.find(name))
            .ok_or_else(|| StoreError::KeyNotFound(path.to_string()))
    }

    /// Get a histogram by its full path (e.g. `"scope/sample/h_name"`).
    pub fn get_histogram(&self, path: &str) -> Result<Histogram> {
        match self.get_object(path)? {
            StoredObject::Histogram(h) => Ok(h.clone()),
            other => Err(StoreError::TypeMismatch {
                path: path.to_string(),
                expected: "histogram",
                found: other.class().as_str(),
            }),
        }
    }

    /// Get an uncertainty series by its full path.
    pub fn get_series(&self, path: &str) -> Result<UncertaintySeries> {
        match self.get_object(path)? {
            StoredObject::Series(s) => Ok(s.clone()),
            other => Err(StoreError::TypeMismatch {
                path: path.to_string(),
                expected: "series",
                found: other.class().as_str(),
            }),
        }
    }

    /// Create the directory at `path` and any missing parents. Idempotent.
    pub fn mkdir(&mut self, path: &str) {
        self.root.walk_or_create(split_path(path));
    }

    /// Create directory `path` if missing and drop everything it holds.
    pub fn clear_dir(&mut self, path: &str) {
        tracing::debug!(dir = path, "clear directory");
        self.root.walk_or_create(split_path(path)).clear();
    }

    /// Store a histogram under directory `dir`, overwriting any object of the same name.
    pub fn put_histogram(&mut self, dir: &str, hist: Histogram) {
        tracing::debug!(dir, name = hist.name(), "store histogram");
        self.root.walk_or_create(split_path(dir)).insert(StoredObject::Histogram(hist));
    }

    /// Store a series under directory `dir`, overwriting any object of the same name.
    pub fn put_series(&mut self, dir: &str, series: UncertaintySeries) {
        tracing::debug!(dir, name = series.name(), "store series");
        self.root.walk_or_create(split_path(dir)).insert(StoredObject::Series(series));
    }

    /// Persist the store to its path (temp file + rename).
    pub fn write(&self) -> Result<()> {
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent)?;
        }
        let tmp = self.path.with_extension("json.tmp");
        {
            let file = fs::File::create(&tmp)?;
            let mut w = BufWriter::new(file);
            let doc = StoreDocumentRef { schema_version: STORE_SCHEMA_VERSION, root: &self.root };
            serde_json::to_writer(&mut w, &doc)?;
            w.flush()?;
        }
        fs::rename(&tmp, &self.path)?;
        tracing::debug!(path = %self.path.display(), "store written");
        Ok(())
    }
}

#[derive(Serialize)]
struct StoreDocumentRef<'a> {
    schema_version: &'a str,
    root: &'a Directory,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::key::ObjectClass;

    #[test]
    fn split_object_path_variants() {
        assert_eq!(split_object_path("a/b/h").unwrap(), ("a/b", "h"));
        assert_eq!(split_object_path("h").unwrap(), ("", "h"));
        assert_eq!(split_object_path("/a/h/").unwrap(), ("a", "h"));
        assert!(split_object_path("").is_err());
    }

    #[test]
    fn put_get_and_type_mismatch() {
        let mut f = HistFile::create("unused.json");
        f.put_histogram("s/x", Histogram::uniform("h", 2, 0.0, 1.0).unwrap());
        let s = UncertaintySeries::from_points("g", vec![0.5], vec![0.1]).unwrap();
        f.put_series("s/x", s.clone());

        assert_eq!(f.get_histogram("s/x/h").unwrap().n_bins(), 2);
        assert_eq!(f.get_series("s/x/g").unwrap(), s);
        assert!(matches!(f.get_series("s/x/h"), Err(StoreError::TypeMismatch { .. })));
        assert!(matches!(f.get_histogram("s/x/zz"), Err(StoreError::KeyNotFound(_))));
        assert!(matches!(f.list_keys("nope"), Err(StoreError::DirectoryNotFound(_))));

        let keys = f.list_keys("s").unwrap();
        assert_eq!(keys.len(), 1);
        assert_eq!(keys[0].class, ObjectClass::Directory);
    }

    #[test]
    fn clear_dir_keeps_siblings() {
        let mut f = HistFile::create("unused.json");
        f.put_histogram("s/a", Histogram::uniform("h", 1, 0.0, 1.0).unwrap());
        f.put_histogram("s/b", Histogram::uniform("h", 1, 0.0, 1.0).unwrap());

        f.clear_dir("s/a");
        assert!(f.list_keys("s/a").unwrap().is_empty());
        assert!(f.get_histogram("s/b/h").is_ok());

        f.clear_dir("s/new");
        assert!(f.has_dir("s/new"));
    }

    #[test]
    fn bad_schema_rejected() {
        let bytes = br#"{"schema_version":"other","root":{}}"#;
        assert!(matches!(
            HistFile::from_slice(bytes, PathBuf::from("x")),
            Err(StoreError::BadSchema(_))
        ));
    }

    #[test]
    fn missing_file_maps_to_missing_resource() {
        let err = HistFile::open("/definitely/not/here.json").unwrap_err();
        assert!(err.is_missing());
        let core: sb_core::Error = err.into();
        assert!(core.is_recoverable());
    }
}
