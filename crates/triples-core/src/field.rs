//! Schema fields, their kinds and merge rules, and keyed field storage.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};

use crate::error::{CoreError, Result};
use crate::fragment::VariantDecl;

/// How values of a field combine across a merge chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MergeRule {
    /// A later value replaces the earlier one entirely.
    Override,
    /// Later entries are appended after earlier ones; nothing is deduplicated.
    Append,
}

/// The shape of a field's value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    /// A single string.
    Text,
    /// A C type width in bits.
    Width,
    /// A boolean.
    Flag,
    /// An ordered list of strings.
    List,
    /// An ordered list of variant declarations.
    Variants,
}

impl FieldKind {
    /// The merge rule every field of this kind follows.
    pub fn rule(self) -> MergeRule {
        match self {
            FieldKind::Text | FieldKind::Width | FieldKind::Flag => MergeRule::Override,
            FieldKind::List | FieldKind::Variants => MergeRule::Append,
        }
    }
}

impl fmt::Display for FieldKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            FieldKind::Text => "text",
            FieldKind::Width => "width",
            FieldKind::Flag => "flag",
            FieldKind::List => "list",
            FieldKind::Variants => "variant list",
        };
        f.write_str(name)
    }
}

/// Every field a fragment may declare.
///
/// The order of the variants is the order fields are listed in output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Field {
    Triple,
    Arch,
    Kernel,
    Endian,
    Libc,
    Obj,
    DefaultCharSign,
    Short,
    Int,
    Long,
    LongLong,
    Size,
    Ptr,
    Reg,
    Freestanding,
    Cpp,
    CppRequire,
    Aliases,
    Variants,
    VariantFlags,
}

impl Field {
    /// All schema fields.
    pub const ALL: [Field; 20] = [
        Field::Triple,
        Field::Arch,
        Field::Kernel,
        Field::Endian,
        Field::Libc,
        Field::Obj,
        Field::DefaultCharSign,
        Field::Short,
        Field::Int,
        Field::Long,
        Field::LongLong,
        Field::Size,
        Field::Ptr,
        Field::Reg,
        Field::Freestanding,
        Field::Cpp,
        Field::CppRequire,
        Field::Aliases,
        Field::Variants,
        Field::VariantFlags,
    ];

    /// The C type width fields.
    pub const WIDTHS: [Field; 7] = [
        Field::Short,
        Field::Int,
        Field::Long,
        Field::LongLong,
        Field::Size,
        Field::Ptr,
        Field::Reg,
    ];

    /// The key used for this field in fragment files and output.
    pub fn key(self) -> &'static str {
        match self {
            Field::Triple => "triple",
            Field::Arch => "arch",
            Field::Kernel => "kernel",
            Field::Endian => "endian",
            Field::Libc => "libc",
            Field::Obj => "obj",
            Field::DefaultCharSign => "default_char_sign",
            Field::Short => "short",
            Field::Int => "int",
            Field::Long => "long",
            Field::LongLong => "long_long",
            Field::Size => "size",
            Field::Ptr => "ptr",
            Field::Reg => "reg",
            Field::Freestanding => "freestanding",
            Field::Cpp => "cpp",
            Field::CppRequire => "cpp_require",
            Field::Aliases => "aliases",
            Field::Variants => "variants",
            Field::VariantFlags => "variant_flags",
        }
    }

    /// The kind of value this field holds.
    pub fn kind(self) -> FieldKind {
        match self {
            Field::Triple
            | Field::Arch
            | Field::Kernel
            | Field::Endian
            | Field::Libc
            | Field::Obj
            | Field::DefaultCharSign
            | Field::VariantFlags => FieldKind::Text,
            Field::Short
            | Field::Int
            | Field::Long
            | Field::LongLong
            | Field::Size
            | Field::Ptr
            | Field::Reg => FieldKind::Width,
            Field::Freestanding => FieldKind::Flag,
            Field::Cpp | Field::CppRequire | Field::Aliases => FieldKind::List,
            Field::Variants => FieldKind::Variants,
        }
    }

    /// The merge rule for this field.
    pub fn rule(self) -> MergeRule {
        self.kind().rule()
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for Field {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self> {
        Field::ALL
            .into_iter()
            .find(|field| field.key() == s)
            .ok_or_else(|| CoreError::UnknownField(s.to_string()))
    }
}

/// A field value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum FieldValue {
    Text(String),
    Width(i64),
    Flag(bool),
    List(Vec<String>),
    Variants(Vec<VariantDecl>),
}

impl FieldValue {
    /// The kind of this value.
    pub fn kind(&self) -> FieldKind {
        match self {
            FieldValue::Text(_) => FieldKind::Text,
            FieldValue::Width(_) => FieldKind::Width,
            FieldValue::Flag(_) => FieldKind::Flag,
            FieldValue::List(_) => FieldKind::List,
            FieldValue::Variants(_) => FieldKind::Variants,
        }
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        FieldValue::Text(value.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        FieldValue::Text(value)
    }
}

impl From<i64> for FieldValue {
    fn from(value: i64) -> Self {
        FieldValue::Width(value)
    }
}

impl From<bool> for FieldValue {
    fn from(value: bool) -> Self {
        FieldValue::Flag(value)
    }
}

impl From<Vec<String>> for FieldValue {
    fn from(value: Vec<String>) -> Self {
        FieldValue::List(value)
    }
}

impl From<Vec<&str>> for FieldValue {
    fn from(value: Vec<&str>) -> Self {
        FieldValue::List(value.into_iter().map(String::from).collect())
    }
}

impl From<Vec<VariantDecl>> for FieldValue {
    fn from(value: Vec<VariantDecl>) -> Self {
        FieldValue::Variants(value)
    }
}

/// Field values keyed by [`Field`], each checked against the field's kind.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldSet {
    values: BTreeMap<Field, FieldValue>,
}

impl FieldSet {
    /// Create an empty field set.
    pub fn new() -> Self {
        Self::default()
    }

    fn check_kind(field: Field, value: &FieldValue) -> Result<()> {
        if field.kind() != value.kind() {
            return Err(CoreError::KindMismatch {
                field,
                expected: field.kind(),
                actual: value.kind(),
            });
        }
        Ok(())
    }

    /// Set a field, replacing any previous value. Returns the old value.
    pub fn insert(&mut self, field: Field, value: FieldValue) -> Result<Option<FieldValue>> {
        Self::check_kind(field, &value)?;
        Ok(self.values.insert(field, value))
    }

    /// Append to a list-kinded field, keeping existing entries first.
    ///
    /// Scalar kinds have nothing to append to, so the value replaces.
    pub fn extend(&mut self, field: Field, value: FieldValue) -> Result<()> {
        Self::check_kind(field, &value)?;
        let merged = match (self.values.remove(&field), value) {
            (Some(FieldValue::List(mut existing)), FieldValue::List(more)) => {
                existing.extend(more);
                FieldValue::List(existing)
            }
            (Some(FieldValue::Variants(mut existing)), FieldValue::Variants(more)) => {
                existing.extend(more);
                FieldValue::Variants(existing)
            }
            (_, value) => value,
        };
        self.values.insert(field, merged);
        Ok(())
    }

    /// Remove a field.
    pub fn remove(&mut self, field: Field) -> Option<FieldValue> {
        self.values.remove(&field)
    }

    /// Look up a field's value.
    pub fn get(&self, field: Field) -> Option<&FieldValue> {
        self.values.get(&field)
    }

    /// Whether a field is set.
    pub fn contains(&self, field: Field) -> bool {
        self.values.contains_key(&field)
    }

    /// The value of a text field.
    pub fn text(&self, field: Field) -> Option<&str> {
        match self.values.get(&field) {
            Some(FieldValue::Text(s)) => Some(s),
            _ => None,
        }
    }

    /// The value of a width field.
    pub fn width(&self, field: Field) -> Option<i64> {
        match self.values.get(&field) {
            Some(FieldValue::Width(w)) => Some(*w),
            _ => None,
        }
    }

    /// The value of a flag field.
    pub fn flag(&self, field: Field) -> Option<bool> {
        match self.values.get(&field) {
            Some(FieldValue::Flag(b)) => Some(*b),
            _ => None,
        }
    }

    /// The entries of a list field; empty if unset.
    pub fn list(&self, field: Field) -> &[String] {
        match self.values.get(&field) {
            Some(FieldValue::List(items)) => items,
            _ => &[],
        }
    }

    /// The declared variants; empty if unset.
    pub fn variants(&self) -> &[VariantDecl] {
        match self.values.get(&Field::Variants) {
            Some(FieldValue::Variants(items)) => items,
            _ => &[],
        }
    }

    /// Iterate over set fields in schema order.
    pub fn iter(&self) -> impl Iterator<Item = (Field, &FieldValue)> {
        self.values.iter().map(|(field, value)| (*field, value))
    }

    /// Number of set fields.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether no field is set.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl Serialize for FieldSet {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.values.len()))?;
        for (field, value) in &self.values {
            map.serialize_entry(field.key(), value)?;
        }
        map.end()
    }
}
