//! `triples validate`: schema checks over triples and their variants.

use anyhow::{bail, Result};
use triples_resolve::Session;

/// Validate `names`, or every triple when empty.
///
/// Returns the report and the number of failures.
pub fn render(session: &Session, names: &[String]) -> (String, usize) {
    let results = if names.is_empty() {
        session.validate_all()
    } else {
        names
            .iter()
            .map(|name| (name.clone(), session.validate(name)))
            .collect()
    };

    let mut out = String::new();
    let mut failed = 0;
    for (name, result) in &results {
        match result {
            Ok(()) => out.push_str(&format!("ok    {name}\n")),
            Err(e) => {
                failed += 1;
                out.push_str(&format!("FAIL  {name}: {e}\n"));
            }
        }
    }
    (out, failed)
}

pub fn run(session: &Session, names: &[String]) -> Result<()> {
    let (report, failed) = render(session, names);
    print!("{report}");
    if failed > 0 {
        bail!("{failed} triple(s) failed validation");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::testutil::{sample_session, write};
    use crate::commands::open_session;
    use crate::config::Settings;

    #[test]
    fn all_sample_triples_pass() {
        let (report, failed) = render(&sample_session(), &[]);
        assert_eq!(failed, 0);
        assert_eq!(
            report,
            "ok    armeb-linux-gnueabi\nok    x86_64-linux-gnu\n"
        );
    }

    #[test]
    fn named_unknown_triple_fails() {
        let (report, failed) = render(&sample_session(), &["sparc".to_string()]);
        assert_eq!(failed, 1);
        assert!(report.starts_with("FAIL  sparc: unknown triple"));
    }

    #[test]
    fn schema_failure_sets_error() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "triple/weird", "triple: weird\narch: weird\nkernel: none\nendian: middle\n");
        let session = open_session(&Settings {
            root: dir.path().to_path_buf(),
            prelude: None,
        })
        .unwrap();

        let (report, failed) = render(&session, &[]);
        assert_eq!(failed, 1);
        assert!(report.contains("endian: 'middle'"));
        assert!(run(&session, &[]).is_err());
    }
}
