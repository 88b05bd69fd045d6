//! I/O layer: running the external `convert` process, probing image headers,
//! and locating the ImageMagick install directory.
pub mod locate;
pub use locate::{CONVERT_COMMAND, default_convert_dir};

pub mod probe;
pub use probe::{DimensionProbe, ImageHeaderProbe};

pub mod process;
pub use process::{ConversionInvocation, FIRST_FRAME, ProcessOutput, ProcessRunner, SystemRunner};
