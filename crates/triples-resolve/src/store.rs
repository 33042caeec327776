//! In-memory fragment storage.

use std::collections::BTreeMap;

use triples_core::Fragment;

use crate::error::{ResolveError, Result};

/// Raw fragments keyed by name, plus the canonical triples they declare.
///
/// A pure keyed container: no merging happens here.
#[derive(Debug, Clone, Default)]
pub struct FragmentStore {
    fragments: BTreeMap<String, Fragment>,
    primaries: BTreeMap<String, String>,
}

impl FragmentStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a fragment.
    ///
    /// Fails if the name is taken, or if the fragment declares a canonical
    /// triple that another stored fragment already declares.
    pub fn put(&mut self, name: impl Into<String>, fragment: Fragment) -> Result<()> {
        let name = name.into();
        if self.fragments.contains_key(&name) {
            return Err(ResolveError::DuplicateFragment {
                existing: name.clone(),
                duplicate: name.clone(),
                name,
            });
        }
        if let Some(triple) = fragment.triple() {
            if let Some(existing) = self.primaries.get(triple) {
                return Err(ResolveError::DuplicateFragment {
                    name: triple.to_string(),
                    existing: existing.clone(),
                    duplicate: name,
                });
            }
            self.primaries.insert(triple.to_string(), name.clone());
        }
        self.fragments.insert(name, fragment);
        Ok(())
    }

    /// Look up a fragment by name.
    pub fn get(&self, name: &str) -> Result<&Fragment> {
        self.fragments
            .get(name)
            .ok_or_else(|| ResolveError::UnknownFragment(name.to_string()))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.fragments.contains_key(name)
    }

    /// Iterate over `(name, fragment)` pairs in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Fragment)> {
        self.fragments.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Iterate over `(canonical triple, fragment name)` pairs in triple order.
    pub fn primaries(&self) -> impl Iterator<Item = (&str, &str)> {
        self.primaries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.fragments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fragments.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use triples_core::Field;

    fn primary(triple: &str) -> Fragment {
        Fragment::new().with_field(Field::Triple, triple).unwrap()
    }

    #[test]
    fn put_then_get() {
        let mut store = FragmentStore::new();
        store.put("triple/mips", primary("mips")).unwrap();
        store.put("arch/mips", Fragment::new()).unwrap();

        assert_eq!(store.len(), 2);
        assert_eq!(store.get("triple/mips").unwrap().triple(), Some("mips"));
        assert_eq!(
            store.primaries().collect::<Vec<_>>(),
            [("mips", "triple/mips")]
        );
    }

    #[test]
    fn duplicate_name_rejected() {
        let mut store = FragmentStore::new();
        store.put("arch/arm", Fragment::new()).unwrap();
        let err = store.put("arch/arm", Fragment::new()).unwrap_err();
        assert!(matches!(err, ResolveError::DuplicateFragment { name, .. } if name == "arch/arm"));
    }

    #[test]
    fn duplicate_triple_rejected_at_put() {
        let mut store = FragmentStore::new();
        store.put("triple/mips", primary("mips")).unwrap();
        let err = store.put("triple/mips-old", primary("mips")).unwrap_err();
        match err {
            ResolveError::DuplicateFragment {
                name,
                existing,
                duplicate,
            } => {
                assert_eq!(name, "mips");
                assert_eq!(existing, "triple/mips");
                assert_eq!(duplicate, "triple/mips-old");
            }
            other => panic!("unexpected error: {other}"),
        }
        assert!(!store.contains("triple/mips-old"));
    }

    #[test]
    fn get_unknown_fails() {
        let store = FragmentStore::new();
        assert!(matches!(
            store.get("nope"),
            Err(ResolveError::UnknownFragment(name)) if name == "nope"
        ));
    }
}
