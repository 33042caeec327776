//! Field merging along a resolved chain, and variant application.

use triples_core::{AppliedVariant, FieldSet, Fragment, MergeRule, MergedDescriptor};

use crate::error::{ResolveError, Result};

/// Fold `source` into `target` following each field's merge rule.
pub fn apply_fields(target: &mut FieldSet, source: &FieldSet) -> Result<()> {
    for (field, value) in source.iter() {
        match field.rule() {
            MergeRule::Override => {
                target.insert(field, value.clone())?;
            }
            MergeRule::Append => target.extend(field, value.clone())?,
        }
    }
    Ok(())
}

/// Merge a chain of `(name, fragment)` pairs, most-base first.
///
/// The result depends only on the content and order of the chain.
pub fn merge(chain: &[(&str, &Fragment)]) -> Result<MergedDescriptor> {
    let mut fields = FieldSet::new();
    for (_, fragment) in chain {
        apply_fields(&mut fields, fragment.fields())?;
    }
    let names = chain.iter().map(|(name, _)| name.to_string()).collect();
    Ok(MergedDescriptor::new(fields, names))
}

/// Derive the descriptor for one of `base`'s declared variants.
///
/// The variant's overrides go through the same rules as [`merge`]. Its flags
/// are the variant's own, else `base`'s fragment-level `variant_flags`, else
/// empty. `base` is left untouched.
pub fn apply_variant(base: &MergedDescriptor, variant: &str) -> Result<MergedDescriptor> {
    let triple = base.triple().unwrap_or_default();
    if let Some(applied) = base.variant() {
        return Err(ResolveError::VariantComposition {
            triple: triple.to_string(),
            applied: applied.name.clone(),
            requested: variant.to_string(),
        });
    }
    let decl = base
        .variant_decl(variant)
        .ok_or_else(|| ResolveError::UnknownVariant {
            triple: triple.to_string(),
            variant: variant.to_string(),
        })?;

    let mut fields = base.fields().clone();
    apply_fields(&mut fields, decl.overrides())?;
    let flags = decl
        .flags()
        .or(base.declared_variant_flags())
        .unwrap_or_default()
        .to_string();

    Ok(base.clone().with_variant(
        fields,
        AppliedVariant {
            name: decl.name().to_string(),
            flags,
        },
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use triples_core::{Field, VariantDecl};

    #[test]
    fn single_fragment_merges_to_its_own_fields() {
        let fragment = Fragment::new()
            .with_field(Field::Triple, "avr")
            .unwrap()
            .with_field(Field::Arch, "avr")
            .unwrap()
            .with_field(Field::Int, 16_i64)
            .unwrap()
            .with_field(Field::Cpp, vec!["__AVR__"])
            .unwrap();
        let merged = merge(&[("triple/avr", &fragment)]).unwrap();
        assert_eq!(merged.fields(), fragment.fields());
        assert_eq!(merged.chain(), ["triple/avr"]);
    }

    #[test]
    fn arm_be_example() {
        let base_linux = Fragment::new()
            .with_field(Field::Kernel, "linux")
            .unwrap()
            .with_field(Field::Cpp, vec!["__linux__"])
            .unwrap();
        let arm_be = Fragment::new()
            .with_import("base-linux")
            .with_field(Field::Triple, "arm-be")
            .unwrap()
            .with_field(Field::Arch, "arm")
            .unwrap()
            .with_field(Field::Endian, "big")
            .unwrap()
            .with_field(Field::Cpp, vec!["__ARMEB__"])
            .unwrap();

        let merged = merge(&[("base-linux", &base_linux), ("arm-be", &arm_be)]).unwrap();
        assert_eq!(merged.kernel(), Some("linux"));
        assert_eq!(merged.arch(), Some("arm"));
        assert_eq!(merged.endian(), Some("big"));
        assert_eq!(merged.cpp(), ["__linux__", "__ARMEB__"]);
    }

    #[test]
    fn diamond_chain_keeps_each_contribution_once() {
        let a = Fragment::new()
            .with_field(Field::Long, 32_i64)
            .unwrap()
            .with_field(Field::Obj, "elf")
            .unwrap()
            .with_field(Field::Cpp, vec!["A"])
            .unwrap();
        let b = Fragment::new()
            .with_import("a")
            .with_field(Field::Cpp, vec!["B"])
            .unwrap();
        let c = Fragment::new()
            .with_import("a")
            .with_field(Field::Cpp, vec!["C", "A"])
            .unwrap();
        let d = Fragment::new()
            .with_import("b")
            .with_import("c")
            .with_field(Field::Triple, "d")
            .unwrap()
            .with_field(Field::Long, 64_i64)
            .unwrap();

        let merged = merge(&[("a", &a), ("b", &b), ("c", &c), ("d", &d)]).unwrap();
        assert_eq!(merged.width(Field::Long), Some(64));
        assert_eq!(merged.obj(), Some("elf"));
        // C's own "A" entry is retained: append never deduplicates.
        assert_eq!(merged.cpp(), ["A", "B", "C", "A"]);
    }

    #[test]
    fn unset_fields_stay_absent() {
        let fragment = Fragment::new().with_field(Field::Triple, "t").unwrap();
        let merged = merge(&[("t", &fragment)]).unwrap();
        assert_eq!(merged.libc(), None);
        assert_eq!(merged.width(Field::Ptr), None);
        assert!(merged.cpp_require().is_empty());
    }

    fn multilib() -> MergedDescriptor {
        let fragment = Fragment::new()
            .with_field(Field::Triple, "x86_64-linux-gnu")
            .unwrap()
            .with_field(Field::Ptr, 64_i64)
            .unwrap()
            .with_field(Field::Cpp, vec!["__x86_64__"])
            .unwrap()
            .with_field(
                Field::Variants,
                vec![
                    VariantDecl::new("m32")
                        .with_flags("-m32")
                        .with_override(Field::Ptr, 32_i64)
                        .unwrap()
                        .with_override(Field::Cpp, vec!["__i386__"])
                        .unwrap(),
                    VariantDecl::new("mx32")
                        .with_override(Field::Ptr, 32_i64)
                        .unwrap(),
                ],
            )
            .unwrap()
            .with_field(Field::VariantFlags, "-mx32")
            .unwrap();
        merge(&[("t", &fragment)]).unwrap()
    }

    #[test]
    fn variant_overrides_and_appends() {
        let base = multilib();
        let derived = apply_variant(&base, "m32").unwrap();
        assert_eq!(derived.width(Field::Ptr), Some(32));
        assert_eq!(derived.cpp(), ["__x86_64__", "__i386__"]);
        assert_eq!(derived.variant_flags(), Some("-m32"));
        assert_eq!(derived.variant().unwrap().name, "m32");
    }

    #[test]
    fn variant_without_flags_uses_declared_fallback() {
        let base = multilib();
        let derived = apply_variant(&base, "mx32").unwrap();
        assert_eq!(derived.variant_flags(), Some("-mx32"));
    }

    #[test]
    fn applying_variant_leaves_base_untouched() {
        let base = multilib();
        let snapshot = base.clone();
        let _ = apply_variant(&base, "m32").unwrap();
        assert_eq!(base, snapshot);
        assert_eq!(base.variant_flags(), None);
        assert_eq!(base.width(Field::Ptr), Some(64));
    }

    #[test]
    fn unknown_variant_rejected() {
        let err = apply_variant(&multilib(), "m16").unwrap_err();
        assert!(matches!(
            err,
            ResolveError::UnknownVariant { triple, variant }
                if triple == "x86_64-linux-gnu" && variant == "m16"
        ));
    }

    #[test]
    fn variants_do_not_compose() {
        let derived = apply_variant(&multilib(), "m32").unwrap();
        let err = apply_variant(&derived, "mx32").unwrap_err();
        assert!(matches!(err, ResolveError::VariantComposition { .. }));
    }
}
