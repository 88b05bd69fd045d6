use std::path::Path;

use crate::error::{Error, Result};
use crate::types::{ConvertOp, DerivativeSize, Geometry, Gravity};

/// Extension given to every derivative file.
pub const DERIVATIVE_EXT: &str = "jpg";

/// Storage types are used as filename prefixes: ASCII word characters only.
pub fn is_valid_storage_type(storage_type: &str) -> bool {
    !storage_type.is_empty()
        && storage_type
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_')
}

/// Converter operations for a pixel constraint.
///
/// Non-square: thumbnail to twice the constraint, halve, then crop a `C`x`C`
/// region. Square: a single shrink-only fit inside `C`x`C`, no crop. A
/// constraint whose double does not fit in `u32` is rejected.
pub fn resize_ops(constraint: u32, square: bool) -> Result<Vec<ConvertOp>> {
    if square {
        return Ok(vec![ConvertOp::Thumbnail(Geometry::ShrinkWithin(
            constraint, constraint,
        ))]);
    }

    let doubled = constraint.checked_mul(2).ok_or_else(|| {
        Error::invalid_spec(format!(
            "Invalid derivative storage size given: {} is too large",
            constraint
        ))
    })?;
    Ok(vec![
        ConvertOp::Thumbnail(Geometry::Height(doubled)),
        ConvertOp::Resize(Geometry::WidthIfSmaller(doubled)),
        ConvertOp::Resize(Geometry::Percent(50)),
        ConvertOp::Gravity(Gravity::Center),
        ConvertOp::Crop(Geometry::Region {
            width: constraint,
            height: constraint,
            x: 0,
            y: 0,
        }),
        ConvertOp::Repage,
    ])
}

/// Resolve a requested size into converter operations.
pub fn resolve_size(size: &DerivativeSize, square: bool) -> Result<Vec<ConvertOp>> {
    match size {
        DerivativeSize::Constraint(0) => Err(Error::invalid_spec(
            "Invalid derivative storage size given: 0",
        )),
        DerivativeSize::Constraint(c) => resize_ops(*c, square),
        DerivativeSize::Literal(literal) => {
            let trimmed = literal.trim();
            if trimmed.is_empty() {
                return Err(Error::invalid_spec(
                    "Invalid derivative storage size given: empty string",
                ));
            }
            if trimmed.bytes().all(|b| b.is_ascii_digit()) {
                let constraint: u32 = trimmed.parse().map_err(|_| {
                    Error::invalid_spec(format!(
                        "Invalid derivative storage size given: {}",
                        trimmed
                    ))
                })?;
                return resolve_size(&DerivativeSize::Constraint(constraint), square);
            }
            Ok(vec![ConvertOp::Raw(tokenize_literal(trimmed)?)])
        }
    }
}

/// Split a literal argument string into argv tokens with POSIX shell word
/// rules. Nothing is expanded; the tokens go to `convert` as-is.
pub fn tokenize_literal(input: &str) -> Result<Vec<String>> {
    shell_words::split(input).map_err(|e| {
        Error::invalid_spec(format!(
            "Unparseable derivative arguments '{}': {}",
            input, e
        ))
    })
}

/// Derivative filename for an original: same stem, `.jpg` extension.
pub fn derivative_filename(original: &str) -> String {
    let stem = Path::new(original)
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| original.to_string());
    format!("{}.{}", stem, DERIVATIVE_EXT)
}
