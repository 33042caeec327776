//! `triples variants`: the variants a triple declares.

use anyhow::Result;
use triples_resolve::Session;

/// One line per variant: its name and the flags that select it.
///
/// Fails when the triple itself does not validate.
pub fn render(session: &Session, name: &str) -> Result<String> {
    let descriptor = session.resolve(name)?;
    let mut out = String::new();
    for variant in session.list_variants(name)? {
        let flags = descriptor
            .variant_decl(variant)
            .and_then(|decl| decl.flags())
            .or(descriptor.declared_variant_flags())
            .unwrap_or_default();
        out.push_str(format!("{variant:<16} {flags}").trim_end());
        out.push('\n');
    }
    Ok(out)
}

pub fn run(session: &Session, name: &str) -> Result<()> {
    let out = render(session, name)?;
    if out.is_empty() {
        println!("{} declares no variants.", session.canonical_name(name)?);
    } else {
        print!("{out}");
    }
    Ok(())
}
