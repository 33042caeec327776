//! Import graph construction, cycle detection and merge ordering.
//!
//! Fragments are arena nodes addressed by index; each fragment's distinct
//! imports are its outgoing edges. Both traversals below keep an explicit
//! stack of `(node, next edge)` frames, so import depth is bounded only by
//! memory, not by the call stack.

use std::collections::{BTreeMap, HashMap};

use tracing::debug;
use triples_core::Fragment;

use crate::error::{ResolveError, Result};
use crate::store::FragmentStore;

/// Merge chains for every canonical triple, base fragments first.
#[derive(Debug, Clone, Default)]
pub struct ResolutionOrder {
    chains: BTreeMap<String, Vec<String>>,
}

impl ResolutionOrder {
    /// The merge chain of a canonical triple, as fragment names.
    pub fn chain(&self, triple: &str) -> Option<&[String]> {
        self.chains.get(triple).map(Vec::as_slice)
    }

    /// Iterate over `(canonical triple, chain)` pairs in triple order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.chains
            .iter()
            .map(|(triple, chain)| (triple.as_str(), chain.as_slice()))
    }

    pub fn len(&self) -> usize {
        self.chains.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chains.is_empty()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mark {
    Unvisited,
    OnStack,
    Done,
}

struct ImportGraph<'a> {
    names: Vec<&'a str>,
    fragments: Vec<&'a Fragment>,
    index: HashMap<&'a str, usize>,
    edges: Vec<Vec<usize>>,
    /// `(importer, import)` pairs whose target declares a triple.
    primary_imports: Vec<(usize, usize)>,
}

impl<'a> ImportGraph<'a> {
    fn new(store: &'a FragmentStore) -> Result<Self> {
        let (names, fragments): (Vec<&str>, Vec<&Fragment>) = store.iter().unzip();
        let index: HashMap<&str, usize> = names
            .iter()
            .enumerate()
            .map(|(i, name)| (*name, i))
            .collect();

        let mut edges = Vec::with_capacity(names.len());
        let mut primary_imports = Vec::new();
        for (i, (name, fragment)) in names.iter().zip(&fragments).enumerate() {
            let mut targets: Vec<usize> = Vec::with_capacity(fragment.imports().len());
            for import in fragment.imports() {
                let target = *index.get(import.as_str()).ok_or_else(|| {
                    ResolveError::MissingImport {
                        fragment: name.to_string(),
                        missing: import.clone(),
                    }
                })?;
                // Repeated imports collapse onto their first occurrence.
                if !targets.contains(&target) {
                    targets.push(target);
                    if fragments[target].is_primary() {
                        primary_imports.push((i, target));
                    }
                }
            }
            edges.push(targets);
        }

        Ok(Self {
            names,
            fragments,
            index,
            edges,
            primary_imports,
        })
    }

    /// Fail if any fragment imports one that declares a triple.
    ///
    /// Runs after `check_acyclic`, so a cycle through triples is reported
    /// as a cycle.
    fn check_primary_imports(&self) -> Result<()> {
        match self.primary_imports.first() {
            Some(&(fragment, import)) => Err(ResolveError::PrimaryImport {
                fragment: self.names[fragment].to_string(),
                import: self.names[import].to_string(),
            }),
            None => Ok(()),
        }
    }

    /// Fail with the full path of the first cycle found.
    fn check_acyclic(&self) -> Result<()> {
        let mut marks = vec![Mark::Unvisited; self.names.len()];

        for root in 0..self.names.len() {
            if marks[root] != Mark::Unvisited {
                continue;
            }
            marks[root] = Mark::OnStack;
            let mut stack: Vec<(usize, usize)> = vec![(root, 0)];

            while let Some(frame) = stack.last_mut() {
                let node = frame.0;
                let Some(&child) = self.edges[node].get(frame.1) else {
                    marks[node] = Mark::Done;
                    stack.pop();
                    continue;
                };
                frame.1 += 1;

                match marks[child] {
                    Mark::Unvisited => {
                        marks[child] = Mark::OnStack;
                        stack.push((child, 0));
                    }
                    Mark::OnStack => {
                        let start = stack
                            .iter()
                            .position(|(n, _)| *n == child)
                            .unwrap_or(0);
                        let mut path: Vec<String> = stack[start..]
                            .iter()
                            .map(|(n, _)| self.names[*n].to_string())
                            .collect();
                        path.push(self.names[child].to_string());
                        return Err(ResolveError::ImportCycle { path });
                    }
                    Mark::Done => {}
                }
            }
        }
        Ok(())
    }

    /// Append `root` and its unvisited ancestors to `out` in post-order.
    ///
    /// Requires an acyclic graph.
    fn walk(&self, root: usize, visited: &mut [bool], out: &mut Vec<usize>) {
        if visited[root] {
            return;
        }
        visited[root] = true;
        let mut stack: Vec<(usize, usize)> = vec![(root, 0)];

        while let Some(frame) = stack.last_mut() {
            let node = frame.0;
            match self.edges[node].get(frame.1) {
                Some(&child) => {
                    frame.1 += 1;
                    if !visited[child] {
                        visited[child] = true;
                        stack.push((child, 0));
                    }
                }
                None => {
                    out.push(node);
                    stack.pop();
                }
            }
        }
    }
}

/// Validate imports, reject cycles, and compute each triple's merge chain.
///
/// When `prelude` names a fragment, its chain is placed beneath every
/// triple's own chain.
pub fn build(store: &FragmentStore, prelude: Option<&str>) -> Result<ResolutionOrder> {
    let graph = ImportGraph::new(store)?;
    graph.check_acyclic()?;
    graph.check_primary_imports()?;

    let prelude = match prelude {
        Some(name) => {
            let idx = *graph
                .index
                .get(name)
                .ok_or_else(|| ResolveError::UnknownFragment(name.to_string()))?;
            if graph.fragments[idx].is_primary() {
                return Err(ResolveError::PrimaryImport {
                    fragment: "<prelude>".to_string(),
                    import: name.to_string(),
                });
            }
            Some(idx)
        }
        None => None,
    };

    let mut chains = BTreeMap::new();
    for (triple, fragment_name) in store.primaries() {
        let Some(&root) = graph.index.get(fragment_name) else {
            return Err(ResolveError::UnknownFragment(fragment_name.to_string()));
        };
        let mut visited = vec![false; graph.names.len()];
        let mut order = Vec::new();
        if let Some(prelude) = prelude {
            graph.walk(prelude, &mut visited, &mut order);
        }
        graph.walk(root, &mut visited, &mut order);

        let chain: Vec<String> = order
            .into_iter()
            .map(|i| graph.names[i].to_string())
            .collect();
        debug!(triple, chain = ?chain, "computed merge chain");
        chains.insert(triple.to_string(), chain);
    }

    Ok(ResolutionOrder { chains })
}
