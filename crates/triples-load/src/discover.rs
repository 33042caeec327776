//! Fragment discovery and loading from a directory tree.

use std::path::{Component, Path, PathBuf};

use tracing::{info, trace};
use triples_core::Fragment;
use triples_resolve::FragmentStore;
use walkdir::WalkDir;

use crate::error::{invalid, LoadError, Result};
use crate::parse::parse_fragment;

/// File extension of fragment files.
pub const FRAGMENT_EXTENSION: &str = "yml";

/// Discover every `.yml` file under `root`, recursively.
///
/// Returns `(fragment_name, file_path)` pairs sorted by name, where the name
/// is the `/`-separated path relative to `root` without the extension.
pub fn discover_fragments(root: &Path) -> Result<Vec<(String, PathBuf)>> {
    if !root.is_dir() {
        return Err(LoadError::NotFound {
            path: root.to_path_buf(),
        });
    }

    let mut fragments = Vec::new();
    for entry in WalkDir::new(root).follow_links(true) {
        let entry = entry?;
        let path = entry.path();
        if !entry.file_type().is_file()
            || path.extension().and_then(|e| e.to_str()) != Some(FRAGMENT_EXTENSION)
        {
            continue;
        }
        let Ok(relative) = path.strip_prefix(root) else {
            continue;
        };
        fragments.push((fragment_name(relative)?, path.to_path_buf()));
    }
    fragments.sort_by(|a, b| a.0.cmp(&b.0));
    Ok(fragments)
}

fn fragment_name(relative: &Path) -> Result<String> {
    let stem = relative.with_extension("");
    let mut parts = Vec::new();
    for component in stem.components() {
        match component {
            Component::Normal(part) => match part.to_str() {
                Some(part) => parts.push(part),
                None => {
                    return Err(invalid(
                        &relative.display().to_string(),
                        "fragment path is not valid UTF-8",
                    ))
                }
            },
            _ => continue,
        }
    }
    Ok(parts.join("/"))
}

/// Load a single fragment by name from `root`.
pub fn load_fragment(root: &Path, name: &str) -> Result<Fragment> {
    let path = root.join(format!("{name}.{FRAGMENT_EXTENSION}"));
    if !path.is_file() {
        return Err(LoadError::NotFound { path });
    }
    read_fragment(name, &path)
}

fn read_fragment(name: &str, path: &Path) -> Result<Fragment> {
    trace!(fragment = name, path = %path.display(), "loading fragment");
    let text = std::fs::read_to_string(path)?;
    parse_fragment(name, &text)
}

/// Load every fragment under `root` into a new store.
pub fn load_store(root: &Path) -> Result<FragmentStore> {
    let mut store = FragmentStore::new();
    for (name, path) in discover_fragments(root)? {
        let fragment = read_fragment(&name, &path)?;
        store.put(name, fragment)?;
    }
    info!(root = %root.display(), fragments = store.len(), "loaded fragment store");
    Ok(store)
}

#[cfg(test)]
mod tests {
    use super::*;
    use triples_core::Field;
    use triples_resolve::{ResolveError, ResolveOptions, Session};

    fn write(root: &Path, name: &str, text: &str) {
        let path = root.join(format!("{name}.yml"));
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(path, text).unwrap();
    }

    #[test]
    fn discovers_nested_fragments_sorted() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "triple/x86_64-linux-gnu", "triple: x86_64-linux-gnu\n");
        write(dir.path(), "arch/x86", "arch: x86_64\n");
        write(dir.path(), "misc/default", "");
        // Non-fragment files are ignored
        std::fs::write(dir.path().join("README.md"), "notes").unwrap();
        std::fs::write(dir.path().join("arch/x86.yaml"), "arch: x86\n").unwrap();

        let found = discover_fragments(dir.path()).unwrap();
        let names: Vec<&str> = found.iter().map(|(n, _)| n.as_str()).collect();
        assert_eq!(names, ["arch/x86", "misc/default", "triple/x86_64-linux-gnu"]);
        assert!(found[0].1.ends_with("arch/x86.yml"));
    }

    #[test]
    fn discover_empty_dir() {
        let dir = tempfile::tempdir().unwrap();
        assert!(discover_fragments(dir.path()).unwrap().is_empty());
    }

    #[test]
    fn discover_missing_root() {
        let err = discover_fragments(Path::new("/nonexistent/triples")).unwrap_err();
        assert!(matches!(err, LoadError::NotFound { .. }));
    }

    #[test]
    fn load_single_fragment() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "kernel/linux", "kernel: linux\ncpp: [__linux__]\n");
        let fragment = load_fragment(dir.path(), "kernel/linux").unwrap();
        assert_eq!(fragment.fields().text(Field::Kernel), Some("linux"));

        let err = load_fragment(dir.path(), "kernel/hurd").unwrap_err();
        assert!(matches!(err, LoadError::NotFound { .. }));
    }

    #[test]
    fn loaded_store_resolves() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "misc/default", "short: 16\nint: 32\nlong_long: 64\nobj: elf\n");
        write(
            dir.path(),
            "kernel/linux",
            "kernel: linux\nlibc: glibc\ncpp: [__linux__]\n",
        );
        write(
            dir.path(),
            "arch/arm",
            "import: [kernel/linux]\narch: arm\nlong: 32\nptr: 32\nreg: 32\n",
        );
        write(
            dir.path(),
            "triple/armeb-linux-gnueabi",
            "import: [arch/arm]\ntriple: [armeb-linux-gnueabi, arm-be]\nendian: big\ncpp: [__ARMEB__]\n",
        );

        let store = load_store(dir.path()).unwrap();
        assert_eq!(store.len(), 4);

        let options = ResolveOptions::default().with_prelude("misc/default");
        let session = Session::build(&store, &options).unwrap();
        let desc = session.resolve("arm-be").unwrap();
        assert_eq!(desc.triple(), Some("armeb-linux-gnueabi"));
        assert_eq!(desc.kernel(), Some("linux"));
        assert_eq!(desc.endian(), Some("big"));
        assert_eq!(desc.obj(), Some("elf"));
        assert_eq!(desc.cpp(), ["__linux__", "__ARMEB__"]);
        assert_eq!(
            desc.chain(),
            [
                "misc/default",
                "kernel/linux",
                "arch/arm",
                "triple/armeb-linux-gnueabi"
            ]
        );
    }

    #[test]
    fn duplicate_triple_across_files() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "triple/mips", "triple: mips\n");
        write(dir.path(), "legacy/mips", "triple: mips\n");
        let err = load_store(dir.path()).unwrap_err();
        assert!(matches!(
            err,
            LoadError::Resolve(ResolveError::DuplicateFragment { name, .. }) if name == "mips"
        ));
    }

    #[test]
    fn parse_error_names_fragment() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "arch/bad", "arch: [unterminated\n");
        let err = load_store(dir.path()).unwrap_err();
        assert!(err.to_string().contains("arch/bad"));
    }
}
