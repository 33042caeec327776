//! YAML fragment parsing.
//!
//! A fragment file is a single YAML mapping. `import` lists the fragments to
//! merge beneath this one; every other key must be a schema field. Keys keep
//! their document order, and a repeated key is a parse error.

use serde_yaml::Value;
use triples_core::{Field, FieldKind, FieldValue, Fragment, MergeRule, VariantDecl};

use crate::error::{invalid, LoadError, Result};

/// Key holding a fragment's import list.
pub const IMPORT_KEY: &str = "import";

/// Parse one fragment's YAML source.
///
/// `name` is only used for error messages and the dotted-name check.
pub fn parse_fragment(name: &str, text: &str) -> Result<Fragment> {
    if name.contains('.') {
        return Err(invalid(name, "fragment names may not contain '.'"));
    }
    if is_blank_document(text) {
        return Ok(Fragment::new());
    }

    let value: Value = serde_yaml::from_str(text).map_err(|source| LoadError::Yaml {
        fragment: name.to_string(),
        source,
    })?;
    let map = match value {
        Value::Mapping(map) => map,
        Value::Null => return Ok(Fragment::new()),
        other => {
            return Err(invalid(
                name,
                format!("expected a mapping at top level, found {}", describe(&other)),
            ))
        }
    };

    let mut fragment = Fragment::new();
    for (key, value) in &map {
        let key = key_str(name, key)?;
        match key {
            IMPORT_KEY => {
                for import in string_list(name, key, value)? {
                    fragment.add_import(import);
                }
            }
            "triple" => parse_triple(name, value, &mut fragment)?,
            _ => {
                let field = parse_key(name, key)?;
                let value = parse_value(name, field, value)?;
                match field.rule() {
                    MergeRule::Override => fragment.set(field, value)?,
                    MergeRule::Append => fragment.append(field, value)?,
                }
            }
        }
    }
    Ok(fragment)
}

fn is_blank_document(text: &str) -> bool {
    text.lines().all(|line| {
        let line = line.trim();
        line.is_empty() || line.starts_with('#') || line == "---"
    })
}

/// `triple` is either the canonical name or `[canonical, alias...]`.
fn parse_triple(fragment: &str, value: &Value, into: &mut Fragment) -> Result<()> {
    match value {
        Value::String(triple) => into.set(Field::Triple, triple.as_str().into())?,
        Value::Sequence(_) => {
            let mut names = string_list(fragment, "triple", value)?.into_iter();
            let canonical = names
                .next()
                .ok_or_else(|| invalid(fragment, "'triple' list is empty"))?;
            into.set(Field::Triple, canonical.into())?;
            let aliases: Vec<String> = names.collect();
            if !aliases.is_empty() {
                into.append(Field::Aliases, aliases.into())?;
            }
        }
        other => {
            return Err(invalid(
                fragment,
                format!("'triple' must be a string or list, found {}", describe(other)),
            ))
        }
    }
    Ok(())
}

fn parse_key(fragment: &str, key: &str) -> Result<Field> {
    key.parse::<Field>()
        .map_err(|_| invalid(fragment, format!("unknown key '{key}'")))
}

/// Convert a YAML value to the kind `field` expects.
fn parse_value(fragment: &str, field: Field, value: &Value) -> Result<FieldValue> {
    let key = field.key();
    match field.kind() {
        FieldKind::Text => match value {
            Value::String(s) => Ok(s.as_str().into()),
            other => Err(expected(fragment, key, "a string", other)),
        },
        FieldKind::Width => {
            let bits = match value {
                Value::Number(n) => n.as_i64(),
                Value::String(s) => s.trim().parse::<i64>().ok(),
                _ => None,
            };
            bits.map(FieldValue::Width)
                .ok_or_else(|| expected(fragment, key, "an integer", value))
        }
        FieldKind::Flag => match value {
            Value::Bool(b) => Ok((*b).into()),
            Value::String(s) if s == "true" => Ok(true.into()),
            Value::String(s) if s == "false" => Ok(false.into()),
            other => Err(expected(fragment, key, "true or false", other)),
        },
        FieldKind::List => Ok(string_list(fragment, key, value)?.into()),
        FieldKind::Variants => {
            let Value::Sequence(items) = value else {
                return Err(expected(fragment, key, "a list", value));
            };
            let decls = items
                .iter()
                .map(|item| parse_variant(fragment, item))
                .collect::<Result<Vec<_>>>()?;
            Ok(decls.into())
        }
    }
}

/// A variant is a bare name, or a mapping with `name`, optional
/// `variant_flags`, and field overrides.
fn parse_variant(fragment: &str, value: &Value) -> Result<VariantDecl> {
    let map = match value {
        Value::String(name) => return Ok(VariantDecl::new(name.as_str())),
        Value::Mapping(map) => map,
        other => return Err(expected(fragment, "variants", "a name or mapping", other)),
    };

    let name = match map.get("name") {
        Some(Value::String(name)) => name.as_str(),
        Some(other) => return Err(expected(fragment, "name", "a string", other)),
        None => return Err(invalid(fragment, "variant declaration without 'name'")),
    };
    let mut decl = VariantDecl::new(name);

    for (key, value) in map {
        let key = key_str(fragment, key)?;
        match key {
            "name" => {}
            "variant_flags" => match value {
                Value::String(flags) => decl.set_flags(flags.as_str()),
                other => return Err(expected(fragment, key, "a string", other)),
            },
            _ => {
                let field = parse_key(fragment, key)?;
                let value = parse_value(fragment, field, value)?;
                decl.set_override(field, value)
                    .map_err(|e| invalid(fragment, e.to_string()))?;
            }
        }
    }
    Ok(decl)
}

fn string_list(fragment: &str, key: &str, value: &Value) -> Result<Vec<String>> {
    let Value::Sequence(items) = value else {
        return Err(expected(fragment, key, "a list of strings", value));
    };
    items
        .iter()
        .map(|item| match item {
            Value::String(s) => Ok(s.clone()),
            other => Err(expected(fragment, key, "a list of strings", other)),
        })
        .collect()
}

fn key_str<'v>(fragment: &str, key: &'v Value) -> Result<&'v str> {
    key.as_str()
        .ok_or_else(|| invalid(fragment, format!("non-string key {}", describe(key))))
}

fn expected(fragment: &str, key: &str, what: &str, found: &Value) -> LoadError {
    invalid(
        fragment,
        format!("'{key}' must be {what}, found {}", describe(found)),
    )
}

fn describe(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Sequence(_) => "a list",
        Value::Mapping(_) => "a mapping",
        Value::Tagged(_) => "a tagged value",
    }
}
