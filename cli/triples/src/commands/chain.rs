//! `triples chain`: merge order of a triple's fragments.

use anyhow::Result;
use triples_resolve::Session;

pub fn render(session: &Session, name: &str) -> Result<String> {
    let canonical = session.canonical_name(name)?;
    let mut out = format!("{canonical}:\n");
    for (i, fragment) in session.chain(name)?.iter().enumerate() {
        out.push_str(&format!("  {:>2}. {fragment}\n", i + 1));
    }
    Ok(out)
}

pub fn run(session: &Session, name: &str) -> Result<()> {
    print!("{}", render(session, name)?);
    Ok(())
}
