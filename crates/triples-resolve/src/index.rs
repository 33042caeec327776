//! Reverse lookup from aliases and variants to canonical triples.

use std::collections::{BTreeMap, HashMap};

use triples_core::MergedDescriptor;

use crate::error::{ResolveError, Result};

/// Name registry for one resolution session.
///
/// Canonical names, aliases and variant names share one namespace. Variant
/// names are scoped to their triple: two triples may both declare `m32`, but
/// `m32` may not also be a canonical or alias name, and one triple may not
/// declare it twice.
#[derive(Debug, Clone, Default)]
pub struct AliasIndex {
    owners: HashMap<String, String>,
    variants: BTreeMap<String, Vec<String>>,
}

impl AliasIndex {
    /// Register every descriptor's canonical name, aliases and variants.
    ///
    /// Descriptors are keyed by canonical name and visited in key order.
    pub fn build(descriptors: &BTreeMap<String, MergedDescriptor>) -> Result<Self> {
        let mut index = Self::default();

        for (canonical, descriptor) in descriptors {
            index.claim(canonical, canonical)?;
            for alias in descriptor.aliases() {
                index.claim(alias, canonical)?;
            }
        }

        for (canonical, descriptor) in descriptors {
            let mut names: Vec<String> = Vec::with_capacity(descriptor.variants().len());
            for variant in descriptor.variants() {
                let name = variant.name();
                if let Some(existing) = index.owners.get(name) {
                    return Err(ResolveError::NameCollision {
                        name: name.to_string(),
                        existing: existing.clone(),
                        new: canonical.clone(),
                    });
                }
                if names.iter().any(|n| n == name) {
                    return Err(ResolveError::NameCollision {
                        name: name.to_string(),
                        existing: canonical.clone(),
                        new: canonical.clone(),
                    });
                }
                names.push(name.to_string());
            }
            index.variants.insert(canonical.clone(), names);
        }

        Ok(index)
    }

    fn claim(&mut self, name: &str, owner: &str) -> Result<()> {
        if let Some(existing) = self.owners.get(name) {
            return Err(ResolveError::NameCollision {
                name: name.to_string(),
                existing: existing.clone(),
                new: owner.to_string(),
            });
        }
        self.owners.insert(name.to_string(), owner.to_string());
        Ok(())
    }

    /// Map a canonical or alias name to its canonical triple.
    pub fn resolve(&self, name: &str) -> Result<&str> {
        self.owners
            .get(name)
            .map(String::as_str)
            .ok_or_else(|| ResolveError::UnknownTriple(name.to_string()))
    }

    /// Variant names of a canonical triple, in declaration order.
    pub fn variants(&self, canonical: &str) -> Result<&[String]> {
        self.variants
            .get(canonical)
            .map(Vec::as_slice)
            .ok_or_else(|| ResolveError::UnknownTriple(canonical.to_string()))
    }

    /// Position of a variant within its triple's declared variants.
    pub fn variant(&self, canonical: &str, variant: &str) -> Result<usize> {
        self.variants(canonical)?
            .iter()
            .position(|v| v == variant)
            .ok_or_else(|| ResolveError::UnknownVariant {
                triple: canonical.to_string(),
                variant: variant.to_string(),
            })
    }

    /// Number of registered canonical and alias names.
    pub fn len(&self) -> usize {
        self.owners.len()
    }

    pub fn is_empty(&self) -> bool {
        self.owners.is_empty()
    }
}
