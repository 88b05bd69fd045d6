//! Image dimension probing. The format is guessed from the file's leading bytes
//! and only the header is read; a source whose dimensions cannot be determined
//! is not derivable.
use std::path::Path;

use image::ImageReader;

pub trait DimensionProbe: Send + Sync {
    /// `(width, height)`, or `None` when the file is not a recognizable image.
    fn dimensions(&self, path: &Path) -> Option<(u32, u32)>;
}

/// Probe backed by the `image` crate's header decoders. The file extension is
/// only a fallback when the content matches no known signature.
#[derive(Debug, Default, Clone, Copy)]
pub struct ImageHeaderProbe;

impl DimensionProbe for ImageHeaderProbe {
    fn dimensions(&self, path: &Path) -> Option<(u32, u32)> {
        ImageReader::open(path)
            .ok()?
            .with_guessed_format()
            .ok()?
            .into_dimensions()
            .ok()
    }
}
