//! CLI command implementations.

pub mod chain;
pub mod list;
pub mod resolve;
pub mod validate;
pub mod variants;

use anyhow::{Context, Result};
use clap::ValueEnum;
use tracing::debug;
use triples_core::FieldValue;
use triples_resolve::{ResolveOptions, Session};

use crate::config::Settings;

/// Output format for descriptors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Default)]
pub enum OutputFormat {
    /// Human-readable key/value listing
    #[default]
    Text,
    /// JSON object keyed by field name
    Json,
    /// YAML mapping keyed by field name
    Yaml,
}

/// Load every fragment under the configured root and resolve them.
pub fn open_session(settings: &Settings) -> Result<Session> {
    debug!(root = %settings.root.display(), prelude = ?settings.prelude, "opening fragment root");
    let store = triples_load::load_store(&settings.root)
        .with_context(|| format!("loading fragments from {}", settings.root.display()))?;
    let options = ResolveOptions {
        prelude: settings.prelude.clone(),
    };
    Session::build(&store, &options).context("resolving fragments")
}

/// Render a field value on one line.
pub(crate) fn display_value(value: &FieldValue) -> String {
    match value {
        FieldValue::Text(s) => s.clone(),
        FieldValue::Width(bits) => bits.to_string(),
        FieldValue::Flag(b) => b.to_string(),
        FieldValue::List(items) => items.join(" "),
        FieldValue::Variants(decls) => decls
            .iter()
            .map(|d| d.name())
            .collect::<Vec<_>>()
            .join(" "),
    }
}

#[cfg(test)]
pub(crate) mod testutil {
    use std::path::Path;

    use super::*;

    pub fn write(root: &Path, name: &str, text: &str) {
        let path = root.join(format!("{name}.yml"));
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(path, text).unwrap();
    }

    /// A small fragment tree: two Linux triples, one with variants.
    pub fn sample_session() -> Session {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();
        write(root, "misc/default", "short: 16\nint: 32\nlong_long: 64\n");
        write(root, "kernel/linux", "kernel: linux\nobj: elf\ncpp: [__linux__]\n");
        write(
            root,
            "triple/x86_64-linux-gnu",
            r#"import: [kernel/linux]
triple: [x86_64-linux-gnu, amd64-linux-gnu]
arch: x86_64
endian: little
long: 64
ptr: 64
size: 64
reg: 64
cpp: [__x86_64__]
variants:
  - name: m32
    variant_flags: -m32
    long: 32
    ptr: 32
    size: 32
    cpp: [__i386__]
"#,
        );
        write(
            root,
            "triple/armeb-linux-gnueabi",
            "import: [kernel/linux]\ntriple: armeb-linux-gnueabi\narch: arm\nendian: big\nlong: 32\nptr: 32\nreg: 32\n",
        );
        let settings = Settings {
            root: root.to_path_buf(),
            prelude: Some("misc/default".into()),
        };
        open_session(&settings).unwrap()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use triples_core::VariantDecl;

    #[test]
    fn open_session_reports_missing_root() {
        let settings = Settings {
            root: "/nonexistent/triples".into(),
            prelude: None,
        };
        let err = open_session(&settings).unwrap_err();
        assert!(format!("{err:#}").contains("loading fragments"));
    }

    #[test]
    fn open_session_reports_unknown_prelude() {
        let dir = tempfile::tempdir().unwrap();
        testutil::write(dir.path(), "triple/avr", "triple: avr\n");
        let settings = Settings {
            root: dir.path().to_path_buf(),
            prelude: Some("misc/default".into()),
        };
        let err = open_session(&settings).unwrap_err();
        assert!(format!("{err:#}").contains("misc/default"));
    }

    #[test]
    fn values_render_on_one_line() {
        assert_eq!(display_value(&"linux".into()), "linux");
        assert_eq!(display_value(&FieldValue::Width(64)), "64");
        assert_eq!(display_value(&true.into()), "true");
        assert_eq!(display_value(&vec!["a", "b"].into()), "a b");
        assert_eq!(
            display_value(&vec![VariantDecl::new("m32"), VariantDecl::new("x32")].into()),
            "m32 x32"
        );
    }
}
