//! Schema validation for merged descriptors.

use std::fmt;
use std::sync::OnceLock;

use regex::Regex;
use triples_core::{Field, MergedDescriptor};

use crate::error::ResolveError;

/// One schema check a descriptor failed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Violation {
    /// The offending field.
    pub field: Field,
    /// Human-readable description.
    pub reason: String,
}

impl Violation {
    pub fn new(field: Field, reason: impl Into<String>) -> Self {
        Self {
            field,
            reason: reason.into(),
        }
    }
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.reason)
    }
}

/// Preprocessor conditions: `[?]ID` or `[?]ID == ID|INT`, joined by ` || `.
fn cpp_condition() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        let id = r"[A-Za-z_][A-Za-z_0-9]*";
        let int = r"0[Bb][01]+|0[0-7]*|[1-9][0-9]*|0[Xx][0-9A-Fa-f]+";
        let term = format!(r"\??(?:{id}|{id} == (?:{id}|{int}))");
        Regex::new(&format!(r"^{term}(?: \|\| {term})*$"))
            .expect("preprocessor condition pattern is valid")
    })
}

/// Check a descriptor against the schema.
///
/// Returns `Ok(())` if valid, or `Err(violations)` listing every problem.
pub fn validate(descriptor: &MergedDescriptor) -> Result<(), Vec<Violation>> {
    let mut issues = Vec::new();
    let fields = descriptor.fields();

    // 1. Mandatory identity fields
    for field in [Field::Triple, Field::Arch, Field::Kernel] {
        match fields.text(field) {
            None => issues.push(Violation::new(field, "required field is missing")),
            Some(value) if value.trim().is_empty() => {
                issues.push(Violation::new(field, "required field is empty"))
            }
            Some(_) => {}
        }
    }

    // 2. Closed value domains
    if let Some(endian) = descriptor.endian() {
        if !matches!(endian, "little" | "big") {
            issues.push(Violation::new(
                Field::Endian,
                format!("'{endian}' is not 'little' or 'big'"),
            ));
        }
    }
    if let Some(sign) = fields.text(Field::DefaultCharSign) {
        if !matches!(sign, "signed" | "unsigned") {
            issues.push(Violation::new(
                Field::DefaultCharSign,
                format!("'{sign}' is not 'signed' or 'unsigned'"),
            ));
        }
    }

    // 3. Widths are positive bit counts
    for field in Field::WIDTHS {
        if let Some(bits) = fields.width(field) {
            if bits <= 0 {
                issues.push(Violation::new(field, format!("width {bits} is not positive")));
            }
        }
    }

    // 4. short <= int <= long <= long_long, over whichever are declared
    let ranked: Vec<(Field, i64)> = [Field::Short, Field::Int, Field::Long, Field::LongLong]
        .into_iter()
        .filter_map(|field| fields.width(field).map(|bits| (field, bits)))
        .collect();
    for pair in ranked.windows(2) {
        let (narrow, narrow_bits) = pair[0];
        let (wide, wide_bits) = pair[1];
        if narrow_bits > wide_bits {
            issues.push(Violation::new(
                wide,
                format!("{wide_bits} bits is narrower than {narrow} ({narrow_bits} bits)"),
            ));
        }
    }

    // 5. Pointer and size_t widths within [reg / 2, reg * 4]
    if let Some(reg) = fields.width(Field::Reg).filter(|bits| *bits > 0) {
        for field in [Field::Ptr, Field::Size] {
            let Some(bits) = fields.width(field).filter(|bits| *bits > 0) else {
                continue;
            };
            if bits.saturating_mul(2) < reg || bits > reg.saturating_mul(4) {
                issues.push(Violation::new(
                    field,
                    format!("{bits} bits is implausible for a {reg}-bit register"),
                ));
            }
        }
    }

    // 6. Preprocessor conditions
    for field in [Field::Cpp, Field::CppRequire] {
        for entry in fields.list(field) {
            if !cpp_condition().is_match(entry) {
                issues.push(Violation::new(
                    field,
                    format!("'{entry}' is not a valid preprocessor condition"),
                ));
            }
        }
    }

    for alias in descriptor.aliases() {
        if alias.trim().is_empty() {
            issues.push(Violation::new(Field::Aliases, "alias is empty"));
        }
    }

    // 7. Variants must be selectable by flags unless freestanding
    for decl in descriptor.variants() {
        if decl.name().trim().is_empty() {
            issues.push(Violation::new(Field::Variants, "variant name is empty"));
        }
    }
    if !descriptor.freestanding() {
        match descriptor.variant() {
            Some(applied) => {
                if applied.flags.trim().is_empty() {
                    issues.push(Violation::new(
                        Field::VariantFlags,
                        format!("variant '{}' selects no compiler flags", applied.name),
                    ));
                }
            }
            None => {
                for decl in descriptor.variants() {
                    let flags = decl.flags().or(descriptor.declared_variant_flags());
                    if flags.map_or(true, |f| f.trim().is_empty()) {
                        issues.push(Violation::new(
                            Field::Variants,
                            format!("variant '{}' declares no variant_flags", decl.name()),
                        ));
                    }
                }
            }
        }
    }

    if issues.is_empty() {
        Ok(())
    } else {
        Err(issues)
    }
}

/// [`validate`], reporting failure as [`ResolveError::SchemaViolation`].
pub fn ensure_valid(descriptor: &MergedDescriptor) -> crate::Result<()> {
    validate(descriptor).map_err(|violations| ResolveError::SchemaViolation {
        triple: descriptor.triple().unwrap_or_default().to_string(),
        violations,
    })
}
