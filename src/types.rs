//! Shared types used across derivgen.
//! Includes `DerivativeSize`, the structured converter operations (`Geometry`,
//! `ConvertOp`), registered `DerivativeSpec`s and the `DerivativeOutcome` of a run.
use std::fmt;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Requested size of a derivative: a pixel constraint or raw converter arguments.
#[derive(Clone, PartialEq, Eq, Debug, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DerivativeSize {
    Constraint(u32),
    Literal(String),
}

impl From<u32> for DerivativeSize {
    fn from(value: u32) -> Self {
        DerivativeSize::Constraint(value)
    }
}

impl From<&str> for DerivativeSize {
    fn from(value: &str) -> Self {
        DerivativeSize::Literal(value.to_string())
    }
}

impl From<String> for DerivativeSize {
    fn from(value: String) -> Self {
        DerivativeSize::Literal(value)
    }
}

impl fmt::Display for DerivativeSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DerivativeSize::Constraint(c) => write!(f, "{}", c),
            DerivativeSize::Literal(s) => write!(f, "'{}'", s),
        }
    }
}

/// ImageMagick geometry arguments used by the resize/crop recipes.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum Geometry {
    /// `xH`: fit height, width follows aspect ratio
    Height(u32),
    /// `Wx<`: enlarge only when the width is below `W`
    WidthIfSmaller(u32),
    /// `N%`
    Percent(u32),
    /// `WxH>`: shrink only, never enlarge
    ShrinkWithin(u32, u32),
    /// `WxH+X+Y`
    Region { width: u32, height: u32, x: i32, y: i32 },
}

impl fmt::Display for Geometry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Geometry::Height(h) => write!(f, "x{}", h),
            Geometry::WidthIfSmaller(w) => write!(f, "{}x<", w),
            Geometry::Percent(p) => write!(f, "{}%", p),
            Geometry::ShrinkWithin(w, h) => write!(f, "{}x{}>", w, h),
            Geometry::Region {
                width,
                height,
                x,
                y,
            } => write!(f, "{}x{}{:+}{:+}", width, height, x, y),
        }
    }
}

#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum Gravity {
    Center,
}

impl fmt::Display for Gravity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Gravity::Center => write!(f, "center"),
        }
    }
}

/// A single converter operation. `Raw` carries caller-supplied tokens verbatim.
#[derive(Clone, PartialEq, Eq, Debug)]
pub enum ConvertOp {
    Thumbnail(Geometry),
    Resize(Geometry),
    Gravity(Gravity),
    Crop(Geometry),
    Repage,
    Raw(Vec<String>),
}

impl ConvertOp {
    /// Render to argv tokens, in order.
    pub fn to_args(&self) -> Vec<String> {
        match self {
            ConvertOp::Thumbnail(g) => vec!["-thumbnail".to_string(), g.to_string()],
            ConvertOp::Resize(g) => vec!["-resize".to_string(), g.to_string()],
            ConvertOp::Gravity(g) => vec!["-gravity".to_string(), g.to_string()],
            ConvertOp::Crop(g) => vec!["-crop".to_string(), g.to_string()],
            ConvertOp::Repage => vec!["+repage".to_string()],
            ConvertOp::Raw(tokens) => tokens.clone(),
        }
    }
}

/// A registered derivative class and its resolved converter operations.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct DerivativeSpec {
    pub storage_type: String,
    pub size: DerivativeSize,
    pub square: bool,
    pub ops: Vec<ConvertOp>,
}

impl DerivativeSpec {
    pub fn args(&self) -> Vec<String> {
        self.ops.iter().flat_map(ConvertOp::to_args).collect()
    }

    /// `<storage_type>_<derivative_filename>`
    pub fn output_filename(&self, derivative_filename: &str) -> String {
        format!("{}_{}", self.storage_type, derivative_filename)
    }
}

/// One file written by a successful conversion.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct DerivativeOutput {
    pub storage_type: String,
    pub path: PathBuf,
    /// Error text the converter printed despite exiting with status 0
    pub diagnostics: Option<String>,
}

#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum SkipReason {
    /// Missing, unreadable, no image dimensions, or a denylisted mime type
    Ineligible,
    NoDerivatives,
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::Ineligible => write!(f, "source is not derivable"),
            SkipReason::NoDerivatives => write!(f, "no derivatives registered"),
        }
    }
}

#[derive(Clone, PartialEq, Eq, Debug)]
pub enum DerivativeOutcome {
    Produced(Vec<DerivativeOutput>),
    Skipped(SkipReason),
}

impl DerivativeOutcome {
    pub fn is_produced(&self) -> bool {
        matches!(self, DerivativeOutcome::Produced(_))
    }

    pub fn outputs(&self) -> &[DerivativeOutput] {
        match self {
            DerivativeOutcome::Produced(outputs) => outputs,
            DerivativeOutcome::Skipped(_) => &[],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn geometry_renders_imagemagick_syntax() {
        assert_eq!(Geometry::Height(400).to_string(), "x400");
        assert_eq!(Geometry::WidthIfSmaller(400).to_string(), "400x<");
        assert_eq!(Geometry::Percent(50).to_string(), "50%");
        assert_eq!(Geometry::ShrinkWithin(100, 100).to_string(), "100x100>");
        let region = Geometry::Region {
            width: 200,
            height: 200,
            x: 0,
            y: 0,
        };
        assert_eq!(region.to_string(), "200x200+0+0");
    }

    #[test]
    fn size_deserializes_from_number_or_string() {
        let n: DerivativeSize = serde_json::from_str("200").unwrap();
        assert_eq!(n, DerivativeSize::Constraint(200));
        let s: DerivativeSize = serde_json::from_str("\"-resize 50%\"").unwrap();
        assert_eq!(s, DerivativeSize::Literal("-resize 50%".to_string()));
    }

    #[test]
    fn skipped_outcome_has_no_outputs() {
        let outcome = DerivativeOutcome::Skipped(SkipReason::NoDerivatives);
        assert!(!outcome.is_produced());
        assert!(outcome.outputs().is_empty());
    }
}
