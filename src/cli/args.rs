use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "derivgen", version, about = "Derivative image generator")]
pub struct CliArgs {
    /// Original image (single file mode)
    #[arg(short, long)]
    pub input: Option<PathBuf>,

    /// Directory of originals (batch mode)
    #[arg(long)]
    pub input_dir: Option<PathBuf>,

    /// Derivative filename; defaults to the input's stem with a .jpg extension
    #[arg(long)]
    pub filename: Option<String>,

    /// Mime type of the input; guessed from the extension when omitted
    #[arg(long)]
    pub mime_type: Option<String>,

    /// Directory containing the ImageMagick `convert` executable
    #[arg(long)]
    pub convert_dir: Option<PathBuf>,

    /// JSON config file with convert_dir and derivative classes
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Derivative class as NAME=SIZE or NAME=SIZE:square (repeatable).
    /// SIZE is a pixel constraint or literal convert arguments.
    #[arg(short, long = "derivative", value_name = "NAME=SIZE[:square]")]
    pub derivatives: Vec<String>,

    /// Batch mode: continue with other files when one fails
    #[arg(long, default_value_t = false)]
    pub batch: bool,

    /// Print the convert path and ImageMagick version, then exit
    #[arg(long, default_value_t = false)]
    pub info: bool,

    /// Enable debug logging
    #[arg(long, default_value_t = false)]
    pub log: bool,
}
