//! Fully merged triple descriptors.

use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};

use crate::field::{Field, FieldSet};
use crate::fragment::VariantDecl;

/// The variant a descriptor was derived with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppliedVariant {
    /// Variant name.
    pub name: String,
    /// Compiler flags that select the variant.
    pub flags: String,
}

/// The merged record for one canonical triple.
///
/// Produced by merging a primary fragment with all of its transitive imports,
/// or by applying a variant to such a record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MergedDescriptor {
    fields: FieldSet,
    chain: Vec<String>,
    variant: Option<AppliedVariant>,
}

impl MergedDescriptor {
    /// Wrap merged fields together with the fragment chain that produced them.
    pub fn new(fields: FieldSet, chain: Vec<String>) -> Self {
        Self {
            fields,
            chain,
            variant: None,
        }
    }

    /// Derive a variant descriptor from already-overridden fields.
    pub fn with_variant(mut self, fields: FieldSet, variant: AppliedVariant) -> Self {
        self.fields = fields;
        self.variant = Some(variant);
        self
    }

    /// All merged fields.
    pub fn fields(&self) -> &FieldSet {
        &self.fields
    }

    /// Fragment names in merge order, base first.
    pub fn chain(&self) -> &[String] {
        &self.chain
    }

    /// Canonical triple name.
    pub fn triple(&self) -> Option<&str> {
        self.fields.text(Field::Triple)
    }

    /// Architecture name.
    pub fn arch(&self) -> Option<&str> {
        self.fields.text(Field::Arch)
    }

    /// Kernel or OS name.
    pub fn kernel(&self) -> Option<&str> {
        self.fields.text(Field::Kernel)
    }

    /// Byte order, `little` or `big`.
    pub fn endian(&self) -> Option<&str> {
        self.fields.text(Field::Endian)
    }

    /// C library, if declared.
    pub fn libc(&self) -> Option<&str> {
        self.fields.text(Field::Libc)
    }

    /// Object file format.
    pub fn obj(&self) -> Option<&str> {
        self.fields.text(Field::Obj)
    }

    /// Signedness of plain `char`; `"signed"` unless declared otherwise.
    pub fn default_char_sign(&self) -> &str {
        self.fields
            .text(Field::DefaultCharSign)
            .unwrap_or("signed")
    }

    /// Width in bits of a C type field.
    pub fn width(&self, field: Field) -> Option<i64> {
        self.fields.width(field)
    }

    /// Whether the target has no hosted environment.
    pub fn freestanding(&self) -> bool {
        self.fields.flag(Field::Freestanding).unwrap_or(false)
    }

    /// Predefined preprocessor macros, in chain order.
    pub fn cpp(&self) -> &[String] {
        self.fields.list(Field::Cpp)
    }

    /// Preprocessor conditions the compiler must satisfy.
    pub fn cpp_require(&self) -> &[String] {
        self.fields.list(Field::CppRequire)
    }

    /// Alternate names for the triple.
    pub fn aliases(&self) -> &[String] {
        self.fields.list(Field::Aliases)
    }

    /// Declared variants, in chain order.
    pub fn variants(&self) -> &[VariantDecl] {
        self.fields.variants()
    }

    /// Look up a declared variant by name.
    pub fn variant_decl(&self, name: &str) -> Option<&VariantDecl> {
        self.variants().iter().find(|v| v.name() == name)
    }

    /// Flags of the applied variant. Always `None` for a canonical descriptor.
    pub fn variant_flags(&self) -> Option<&str> {
        self.variant.as_ref().map(|v| v.flags.as_str())
    }

    /// The applied variant, if any.
    pub fn variant(&self) -> Option<&AppliedVariant> {
        self.variant.as_ref()
    }

    /// Fragment-level `variant_flags`, used for variants that declare none.
    pub fn declared_variant_flags(&self) -> Option<&str> {
        self.fields.text(Field::VariantFlags)
    }
}

impl Serialize for MergedDescriptor {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(None)?;
        for (field, value) in self.fields.iter() {
            if field == Field::VariantFlags {
                continue;
            }
            map.serialize_entry(field.key(), value)?;
        }
        if let Some(variant) = &self.variant {
            map.serialize_entry("variant", &variant.name)?;
            map.serialize_entry(Field::VariantFlags.key(), &variant.flags)?;
        }
        map.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::field::FieldValue;

    fn descriptor() -> MergedDescriptor {
        let mut fields = FieldSet::new();
        fields.insert(Field::Triple, "x86_64-linux-gnu".into()).unwrap();
        fields.insert(Field::Arch, "x86_64".into()).unwrap();
        fields.insert(Field::VariantFlags, "-m64".into()).unwrap();
        fields
            .insert(
                Field::Variants,
                FieldValue::Variants(vec![VariantDecl::new("m32").with_flags("-m32")]),
            )
            .unwrap();
        MergedDescriptor::new(fields, vec!["triple/x86_64-linux-gnu".into()])
    }

    #[test]
    fn canonical_descriptor_has_no_variant_flags() {
        let desc = descriptor();
        assert_eq!(desc.variant_flags(), None);
        assert_eq!(desc.declared_variant_flags(), Some("-m64"));
        assert_eq!(desc.default_char_sign(), "signed");
        assert!(!desc.freestanding());
        assert!(desc.variant_decl("m32").is_some());
        assert!(desc.variant_decl("m16").is_none());
    }

    #[test]
    fn canonical_serialization_omits_variant_flags() {
        let json = serde_json::to_value(descriptor()).unwrap();
        assert!(json.get("variant_flags").is_none());
        assert!(json.get("variant").is_none());
        assert_eq!(json["arch"], "x86_64");
        assert_eq!(json["variants"][0]["name"], "m32");
    }

    #[test]
    fn variant_serialization_carries_flags() {
        let base = descriptor();
        let fields = base.fields().clone();
        let derived = base.with_variant(
            fields,
            AppliedVariant {
                name: "m32".into(),
                flags: "-m32".into(),
            },
        );
        let json = serde_json::to_value(&derived).unwrap();
        assert_eq!(json["variant"], "m32");
        assert_eq!(json["variant_flags"], "-m32");
    }
}
