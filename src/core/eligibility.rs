use std::fs::File;
use std::path::Path;

use tracing::debug;

use crate::io::DimensionProbe;

/// Mime types that report image dimensions but which ImageMagick cannot
/// reliably convert.
pub const MIME_TYPE_DENYLIST: &[&str] = &["application/x-shockwave-flash", "image/jp2"];

pub fn is_denylisted(mime_type: &str) -> bool {
    MIME_TYPE_DENYLIST.contains(&mime_type)
}

/// Whether derivatives can be made from `path`: it exists, opens for reading,
/// has probeable image dimensions, and its mime type is not denylisted.
pub fn is_derivable(path: &Path, mime_type: &str, probe: &dyn DimensionProbe) -> bool {
    if !path.exists() {
        debug!("Not derivable, missing: {:?}", path);
        return false;
    }
    if File::open(path).is_err() {
        debug!("Not derivable, unreadable: {:?}", path);
        return false;
    }
    if probe.dimensions(path).is_none() {
        debug!("Not derivable, no image dimensions: {:?}", path);
        return false;
    }
    if is_denylisted(mime_type) {
        debug!("Not derivable, denylisted mime type {}: {:?}", mime_type, path);
        return false;
    }
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    struct FixedProbe(Option<(u32, u32)>);

    impl DimensionProbe for FixedProbe {
        fn dimensions(&self, _path: &Path) -> Option<(u32, u32)> {
            self.0
        }
    }

    fn existing_file() -> (tempfile::TempDir, PathBuf) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("source.bin");
        std::fs::write(&path, b"bytes").unwrap();
        (dir, path)
    }

    #[test]
    fn derivable_when_all_checks_pass() {
        let (_dir, path) = existing_file();
        assert!(is_derivable(&path, "image/jpeg", &FixedProbe(Some((10, 10)))));
    }

    #[test]
    fn denylisted_mime_types_are_not_derivable_even_with_dimensions() {
        let (_dir, path) = existing_file();
        for mime in MIME_TYPE_DENYLIST {
            assert!(!is_derivable(&path, mime, &FixedProbe(Some((10, 10)))));
        }
    }

    #[test]
    fn missing_dimensions_are_not_derivable() {
        let (_dir, path) = existing_file();
        assert!(!is_derivable(&path, "image/jpeg", &FixedProbe(None)));
    }

    #[test]
    fn missing_file_is_not_derivable() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("vanished.jpg");
        assert!(!is_derivable(&path, "image/jpeg", &FixedProbe(Some((1, 1)))));
    }
}
