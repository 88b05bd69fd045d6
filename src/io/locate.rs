use std::path::PathBuf;

use tracing::debug;

/// Name of the ImageMagick executable inside the configured directory.
pub const CONVERT_COMMAND: &str = "convert";

/// Best-effort discovery of the directory holding `convert`, via a `PATH` lookup.
/// Advisory only: `None` means the lookup failed, not that ImageMagick is absent.
pub fn default_convert_dir() -> Option<PathBuf> {
    match which::which(CONVERT_COMMAND) {
        Ok(path) => {
            let dir = path.parent().map(|p| p.to_path_buf());
            debug!("Located {} at {:?}", CONVERT_COMMAND, path);
            dir
        }
        Err(e) => {
            debug!("Could not locate {} on PATH: {}", CONVERT_COMMAND, e);
            None
        }
    }
}
