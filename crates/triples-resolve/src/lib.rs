//! Resolution engine for target triple fragments.
//!
//! Turns a closed set of [`Fragment`](triples_core::Fragment)s into merged,
//! validated descriptors:
//!
//! 1. [`FragmentStore`] holds the raw fragments keyed by name.
//! 2. [`graph::build`] checks imports, rejects cycles and computes one merge
//!    chain per canonical triple.
//! 3. [`merge::merge`] folds each chain into a
//!    [`MergedDescriptor`](triples_core::MergedDescriptor).
//! 4. [`AliasIndex`] maps aliases and variants back to canonical triples.
//! 5. [`validate::validate`] checks every descriptor handed to a consumer.
//!
//! [`Session`] wires these together behind the query API.

pub mod error;
pub mod graph;
pub mod index;
pub mod merge;
pub mod session;
pub mod store;
pub mod validate;

pub use error::{ResolveError, Result};
pub use graph::ResolutionOrder;
pub use index::AliasIndex;
pub use merge::{apply_variant, merge};
pub use session::{ResolveOptions, Session};
pub use store::FragmentStore;
pub use validate::{validate, Violation};
