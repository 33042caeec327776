//! Loading of target triple fragments from YAML files.
//!
//! Each `.yml` file under a fragment root is one fragment, named by its path
//! relative to the root without the extension (`triple/x86_64-linux-gnu`).

pub mod discover;
pub mod error;
pub mod parse;

pub use discover::{discover_fragments, load_fragment, load_store, FRAGMENT_EXTENSION};
pub use error::{LoadError, Result};
pub use parse::parse_fragment;
