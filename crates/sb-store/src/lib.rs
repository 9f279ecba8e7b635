//! # sb-store
//!
//! Persistent histogram store for systband.
//!
//! A store file is a JSON document holding a tree of directories. Each directory holds
//! sub-directories and named objects (histograms or uncertainty series). Objects are addressed
//! by slash-separated paths such as `"emu_OS_J2/FTAG2_ttbar_PhPy8/h_emu_OS_J2_jet1_pt_nominal"`.
//!
//! ## Example
//!
//! ```no_run
//! use sb_store::HistFile;
//!
//! let f = HistFile::open("FTAG2_ttbar_nominal_combination.json").unwrap();
//! for key in f.list_keys("emu_OS_J2").unwrap() {
//!     println!("{} ({})", key.name, key.class);
//! }
//! let h = f.get_histogram("emu_OS_J2/h_emu_OS_J2_jet1_pt_bb").unwrap();
//! println!("bins: {}, integral: {}", h.n_bins(), h.integral());
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod directory;
pub mod error;
pub mod file;
pub mod key;

pub use directory::{Directory, StoredObject};
pub use error::{Result, StoreError};
pub use file::{HistFile, STORE_SCHEMA_VERSION};
pub use key::{KeyInfo, ObjectClass};
