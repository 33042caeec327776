//! `triples resolve`: print a merged descriptor.

use anyhow::{Context, Result};
use triples_core::{Field, MergedDescriptor};
use triples_resolve::Session;

use super::{display_value, OutputFormat};

/// Render the validated descriptor of `name`, or of one of its variants.
pub fn render(
    session: &Session,
    name: &str,
    variant: Option<&str>,
    format: OutputFormat,
) -> Result<String> {
    let derived;
    let descriptor = match variant {
        Some(variant) => {
            derived = session.apply_variant(name, variant)?;
            &derived
        }
        None => session.resolve(name)?,
    };

    match format {
        OutputFormat::Text => Ok(text(descriptor)),
        OutputFormat::Json => {
            let mut json =
                serde_json::to_string_pretty(descriptor).context("serializing descriptor")?;
            json.push('\n');
            Ok(json)
        }
        OutputFormat::Yaml => serde_yaml::to_string(descriptor).context("serializing descriptor"),
    }
}

fn text(descriptor: &MergedDescriptor) -> String {
    let mut out = String::new();
    let mut line = |key: &str, value: &str| out.push_str(&format!("{key:<18} {value}\n"));

    for (field, value) in descriptor.fields().iter() {
        if field == Field::VariantFlags {
            continue;
        }
        line(field.key(), &display_value(value));
    }
    if !descriptor.fields().contains(Field::DefaultCharSign) {
        line(Field::DefaultCharSign.key(), descriptor.default_char_sign());
    }
    if let Some(applied) = descriptor.variant() {
        line("variant", &applied.name);
        line(Field::VariantFlags.key(), &applied.flags);
    }
    out
}

pub fn run(
    session: &Session,
    name: &str,
    variant: Option<&str>,
    format: OutputFormat,
) -> Result<()> {
    print!("{}", render(session, name, variant, format)?);
    Ok(())
}
