//! Query boundary over one resolved fragment set.

use std::collections::BTreeMap;

use tracing::{debug, info};
use triples_core::{Fragment, MergedDescriptor};

use crate::error::{ResolveError, Result};
use crate::graph;
use crate::index::AliasIndex;
use crate::merge;
use crate::store::FragmentStore;
use crate::validate::ensure_valid;

/// Knobs for [`Session::build`].
#[derive(Debug, Clone, Default)]
pub struct ResolveOptions {
    /// Fragment merged beneath every triple, if any.
    pub prelude: Option<String>,
}

impl ResolveOptions {
    pub fn with_prelude(mut self, name: impl Into<String>) -> Self {
        self.prelude = Some(name.into());
        self
    }
}

/// Merged descriptors for every canonical triple, plus their name index.
///
/// A session is built once from a [`FragmentStore`] and then only read.
/// Reloading fragments means building a new session.
#[derive(Debug, Clone)]
pub struct Session {
    descriptors: BTreeMap<String, MergedDescriptor>,
    index: AliasIndex,
}

impl Session {
    /// Resolve imports, merge every primary fragment and index the results.
    ///
    /// Structural problems (missing imports, cycles, name collisions) fail the
    /// build. Schema problems do not: they surface when a descriptor is
    /// queried.
    pub fn build(store: &FragmentStore, options: &ResolveOptions) -> Result<Self> {
        let order = graph::build(store, options.prelude.as_deref())?;

        let mut descriptors = BTreeMap::new();
        for (triple, chain) in order.iter() {
            let fragments = chain
                .iter()
                .map(|name| store.get(name).map(|f| (name.as_str(), f)))
                .collect::<Result<Vec<(&str, &Fragment)>>>()?;
            let descriptor = merge::merge(&fragments)?;
            debug!(triple, fields = descriptor.fields().len(), "merged descriptor");
            descriptors.insert(triple.to_string(), descriptor);
        }

        let index = AliasIndex::build(&descriptors)?;
        info!(
            fragments = store.len(),
            triples = descriptors.len(),
            names = index.len(),
            "resolution session ready"
        );

        Ok(Self { descriptors, index })
    }

    /// Map a canonical name or alias to the canonical triple.
    pub fn canonical_name(&self, name: &str) -> Result<&str> {
        self.index.resolve(name)
    }

    /// The merged descriptor for a name or alias, without validation.
    pub fn descriptor(&self, name: &str) -> Result<&MergedDescriptor> {
        let canonical = self.canonical_name(name)?;
        self.descriptors
            .get(canonical)
            .ok_or_else(|| ResolveError::UnknownTriple(name.to_string()))
    }

    /// The validated descriptor for a name or alias.
    pub fn resolve(&self, name: &str) -> Result<&MergedDescriptor> {
        let descriptor = self.descriptor(name)?;
        ensure_valid(descriptor)?;
        Ok(descriptor)
    }

    /// Declared variant names of a triple, in declaration order.
    pub fn list_variants(&self, name: &str) -> Result<&[String]> {
        let canonical = self.canonical_name(name)?;
        self.index.variants(canonical)
    }

    /// Derive and validate the descriptor for one of a triple's variants.
    pub fn apply_variant(&self, name: &str, variant: &str) -> Result<MergedDescriptor> {
        let base = self.resolve(name)?;
        let canonical = self.canonical_name(name)?;
        self.index.variant(canonical, variant)?;

        let derived = merge::apply_variant(base, variant)?;
        ensure_valid(&derived)?;
        debug!(triple = canonical, variant, "applied variant");
        Ok(derived)
    }

    /// Validate a triple and each of its variants, stopping at the first
    /// failure.
    pub fn validate(&self, name: &str) -> Result<()> {
        self.resolve(name)?;
        for variant in self.list_variants(name)? {
            self.apply_variant(name, variant)?;
        }
        Ok(())
    }

    /// [`Session::validate`] for every canonical triple, in name order.
    pub fn validate_all(&self) -> Vec<(String, Result<()>)> {
        self.triples()
            .map(|triple| (triple.to_string(), self.validate(triple)))
            .collect()
    }

    /// Canonical triple names in sorted order.
    pub fn triples(&self) -> impl Iterator<Item = &str> {
        self.descriptors.keys().map(String::as_str)
    }

    /// Fragment names merged into a triple, base first.
    pub fn chain(&self, name: &str) -> Result<&[String]> {
        self.descriptor(name).map(MergedDescriptor::chain)
    }

    pub fn len(&self) -> usize {
        self.descriptors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.descriptors.is_empty()
    }
}
