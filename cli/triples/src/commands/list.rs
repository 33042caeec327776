//! `triples list`: canonical triples with their aliases and variants.

use anyhow::Result;
use triples_resolve::Session;

/// Render one line per canonical triple, in name order.
pub fn render(session: &Session) -> Result<String> {
    let mut out = String::new();
    for triple in session.triples() {
        let descriptor = session.descriptor(triple)?;
        let mut line = format!("{triple:<32}");
        if !descriptor.aliases().is_empty() {
            line.push_str(&format!(" aliases: {}", descriptor.aliases().join(", ")));
        }
        let variants = session.list_variants(triple)?;
        if !variants.is_empty() {
            line.push_str(&format!(" variants: {}", variants.join(", ")));
        }
        out.push_str(line.trim_end());
        out.push('\n');
    }
    Ok(out)
}

pub fn run(session: &Session) -> Result<()> {
    if session.is_empty() {
        println!("No triples found.");
        return Ok(());
    }
    print!("{}", render(session)?);
    Ok(())
}
