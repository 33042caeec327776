//! Fragments and variant declarations.

use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};

use crate::error::{CoreError, Result};
use crate::field::{Field, FieldSet, FieldValue};

/// One declared unit of triple data.
///
/// A fragment that sets [`Field::Triple`] is *primary*: it owns a canonical
/// triple name. Other fragments exist only to be imported.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Fragment {
    imports: Vec<String>,
    fields: FieldSet,
}

impl Fragment {
    /// Create an empty fragment.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder: add an import.
    pub fn with_import(mut self, name: impl Into<String>) -> Self {
        self.imports.push(name.into());
        self
    }

    /// Builder: set a field.
    pub fn with_field(mut self, field: Field, value: impl Into<FieldValue>) -> Result<Self> {
        self.set(field, value.into())?;
        Ok(self)
    }

    /// Add an import at the end of the import list.
    pub fn add_import(&mut self, name: impl Into<String>) {
        self.imports.push(name.into());
    }

    /// Set a field, replacing any value this fragment already declared.
    pub fn set(&mut self, field: Field, value: FieldValue) -> Result<()> {
        self.fields.insert(field, value)?;
        Ok(())
    }

    /// Append to a list field this fragment declares.
    pub fn append(&mut self, field: Field, value: FieldValue) -> Result<()> {
        self.fields.extend(field, value)
    }

    /// The canonical triple name, if this fragment is primary.
    pub fn triple(&self) -> Option<&str> {
        self.fields.text(Field::Triple)
    }

    /// Whether this fragment declares a canonical triple.
    pub fn is_primary(&self) -> bool {
        self.fields.contains(Field::Triple)
    }

    /// Imported fragment names in declaration order.
    pub fn imports(&self) -> &[String] {
        &self.imports
    }

    /// Fields declared directly by this fragment.
    pub fn fields(&self) -> &FieldSet {
        &self.fields
    }
}

/// An alternate configuration of a triple, selected by explicit request.
///
/// Carries the compiler flags that select it and the fields it overrides.
/// Variants are single-level: a variant cannot declare variants of its own.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VariantDecl {
    name: String,
    flags: Option<String>,
    overrides: FieldSet,
}

impl VariantDecl {
    /// Declare a variant with no flags and no overrides.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            flags: None,
            overrides: FieldSet::new(),
        }
    }

    /// Builder: set the compiler flags that select this variant.
    pub fn with_flags(mut self, flags: impl Into<String>) -> Self {
        self.flags = Some(flags.into());
        self
    }

    /// Builder: override a field.
    pub fn with_override(mut self, field: Field, value: impl Into<FieldValue>) -> Result<Self> {
        self.set_override(field, value.into())?;
        Ok(self)
    }

    /// Override a field when this variant is applied.
    ///
    /// Identity and variant bookkeeping fields cannot be overridden.
    pub fn set_override(&mut self, field: Field, value: FieldValue) -> Result<()> {
        if matches!(
            field,
            Field::Triple | Field::Aliases | Field::Variants | Field::VariantFlags
        ) {
            return Err(CoreError::NotVariantField {
                variant: self.name.clone(),
                field,
            });
        }
        self.overrides.insert(field, value)?;
        Ok(())
    }

    /// Set the compiler flags.
    pub fn set_flags(&mut self, flags: impl Into<String>) {
        self.flags = Some(flags.into());
    }

    /// Variant name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Compiler flags declared on this variant.
    pub fn flags(&self) -> Option<&str> {
        self.flags.as_deref()
    }

    /// Fields this variant overrides.
    pub fn overrides(&self) -> &FieldSet {
        &self.overrides
    }
}

impl Serialize for VariantDecl {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(None)?;
        map.serialize_entry("name", &self.name)?;
        if let Some(flags) = &self.flags {
            map.serialize_entry(Field::VariantFlags.key(), flags)?;
        }
        for (field, value) in self.overrides.iter() {
            map.serialize_entry(field.key(), value)?;
        }
        map.end()
    }
}
