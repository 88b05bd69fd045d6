use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::core::creator::DerivativeImageCreator;
use crate::error::{Error, Result};
use crate::io::default_convert_dir;
use crate::types::DerivativeSize;

/// One derivative class as written in a config file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DerivativeEntry {
    pub storage_type: String,
    pub size: DerivativeSize,
    #[serde(default)]
    pub square: bool,
}

impl DerivativeEntry {
    pub fn new<S: Into<DerivativeSize>>(storage_type: &str, size: S, square: bool) -> Self {
        Self {
            storage_type: storage_type.to_string(),
            size: size.into(),
            square,
        }
    }
}

/// Derivative generation parameters suitable for config files
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DerivativeParams {
    /// Directory containing `convert`; None means look it up on PATH
    pub convert_dir: Option<PathBuf>,
    /// Generated in this order
    pub derivatives: Vec<DerivativeEntry>,
}

impl Default for DerivativeParams {
    fn default() -> Self {
        Self {
            convert_dir: None,
            derivatives: vec![
                DerivativeEntry::new("fullsize", 800u32, true),
                DerivativeEntry::new("thumbnail", 200u32, true),
                DerivativeEntry::new("square_thumbnail", 200u32, false),
            ],
        }
    }
}

impl DerivativeParams {
    /// Read a JSON config file. Missing keys take their defaults.
    pub fn from_path(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)?;
        Self::from_json(&text)
    }

    pub fn from_json(text: &str) -> Result<Self> {
        Ok(serde_json::from_str(text)?)
    }

    /// Add or replace an entry, keeping the position of a replaced one.
    pub fn upsert(&mut self, entry: DerivativeEntry) {
        match self
            .derivatives
            .iter_mut()
            .find(|d| d.storage_type == entry.storage_type)
        {
            Some(existing) => *existing = entry,
            None => self.derivatives.push(entry),
        }
    }

    pub fn resolve_convert_dir(&self) -> Result<PathBuf> {
        match &self.convert_dir {
            Some(dir) => Ok(dir.clone()),
            None => default_convert_dir().ok_or_else(|| {
                Error::Configuration(
                    "no convert directory configured and 'convert' was not found on PATH"
                        .to_string(),
                )
            }),
        }
    }

    /// Build a creator with every entry registered in order.
    pub fn build_creator(&self) -> Result<DerivativeImageCreator> {
        let dir = self.resolve_convert_dir()?;
        let mut creator = DerivativeImageCreator::new(&dir)?;
        for entry in &self.derivatives {
            creator.add_derivative(&entry.storage_type, entry.size.clone(), entry.square)?;
        }
        info!(
            "Configured {} derivative(s) using {:?}",
            creator.derivatives().len(),
            creator.convert_path()
        );
        Ok(creator)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_standard_derivative_classes() {
        let params = DerivativeParams::default();
        let names: Vec<&str> = params
            .derivatives
            .iter()
            .map(|d| d.storage_type.as_str())
            .collect();
        assert_eq!(names, vec!["fullsize", "thumbnail", "square_thumbnail"]);
    }

    #[test]
    fn parses_mixed_sizes_and_default_square() {
        let params = DerivativeParams::from_json(
            r#"{
                "convert_dir": "/usr/bin",
                "derivatives": [
                    {"storage_type": "thumbnail", "size": 200},
                    {"storage_type": "poster", "size": "-resize 640x", "square": false},
                    {"storage_type": "square", "size": 100, "square": true}
                ]
            }"#,
        )
        .unwrap();

        assert_eq!(params.convert_dir, Some(PathBuf::from("/usr/bin")));
        assert_eq!(
            params.derivatives,
            vec![
                DerivativeEntry::new("thumbnail", 200u32, false),
                DerivativeEntry::new("poster", "-resize 640x", false),
                DerivativeEntry::new("square", 100u32, true),
            ]
        );
    }

    #[test]
    fn missing_keys_fall_back_to_defaults() {
        let params = DerivativeParams::from_json("{}").unwrap();
        assert_eq!(params, DerivativeParams::default());
    }

    #[test]
    fn negative_size_is_a_parse_error() {
        let err = DerivativeParams::from_json(
            r#"{"derivatives": [{"storage_type": "t", "size": -5}]}"#,
        );
        assert!(matches!(err, Err(Error::Config(_))));
    }

    #[test]
    fn upsert_replaces_in_place() {
        let mut params = DerivativeParams::default();
        params.upsert(DerivativeEntry::new("thumbnail", 50u32, false));
        params.upsert(DerivativeEntry::new("huge", 2000u32, true));
        assert_eq!(params.derivatives[1], DerivativeEntry::new("thumbnail", 50u32, false));
        assert_eq!(params.derivatives.len(), 4);
    }

    #[test]
    fn build_creator_registers_entries_in_order() {
        let dir = tempfile::tempdir().unwrap();
        let params = DerivativeParams {
            convert_dir: Some(dir.path().to_path_buf()),
            ..DerivativeParams::default()
        };
        let creator = params.build_creator().unwrap();
        let names: Vec<&str> = creator
            .derivatives()
            .iter()
            .map(|d| d.storage_type.as_str())
            .collect();
        assert_eq!(names, vec!["fullsize", "thumbnail", "square_thumbnail"]);
    }

    #[test]
    fn build_creator_surfaces_bad_entries() {
        let dir = tempfile::tempdir().unwrap();
        let params = DerivativeParams {
            convert_dir: Some(dir.path().to_path_buf()),
            derivatives: vec![DerivativeEntry::new("bad-name", 100u32, false)],
        };
        assert!(matches!(
            params.build_creator(),
            Err(Error::InvalidSpecification(_))
        ));
    }
}
