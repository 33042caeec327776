//! Data model for target triple definitions.
//!
//! A target triple is declared as a set of [`Fragment`]s. Each fragment
//! carries a [`FieldSet`] of schema fields plus an ordered import list.
//! Merging a primary fragment with its imports yields a
//! [`MergedDescriptor`].
//!
//! Every schema field is a variant of the closed [`Field`] enumeration. A
//! field's [`FieldKind`] fixes both the shape of its value and its
//! [`MergeRule`]:
//! - **Override** fields (text, widths, flags): the most-derived value wins.
//! - **Append** fields (string lists, variant declarations): entries from all
//!   contributing fragments are concatenated in merge order.

pub mod descriptor;
pub mod error;
pub mod field;
pub mod fragment;

pub use descriptor::{AppliedVariant, MergedDescriptor};
pub use error::{CoreError, Result};
pub use field::{Field, FieldKind, FieldSet, FieldValue, MergeRule};
pub use fragment::{Fragment, VariantDecl};
