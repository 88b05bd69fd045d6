//! Derivative image creation.
//!
//! A `DerivativeImageCreator` holds the path to ImageMagick's `convert` and an
//! ordered list of named derivative classes. `create` validates the source,
//! then runs one conversion per class, strictly in registration order, writing
//! `<storage_type>_<filename>` next to the source file.
//!
//! The external process and the dimension probe are injected collaborators
//! (`ProcessRunner`, `DimensionProbe`), defaulting to real implementations.
use std::ffi::OsStr;
use std::fmt;
use std::fs::File;
use std::path::{Component, Path, PathBuf};

use tracing::{debug, info, warn};

use crate::core::args::{is_valid_storage_type, resolve_size};
use crate::core::eligibility::is_derivable;
use crate::error::{Error, Result};
use crate::io::{
    CONVERT_COMMAND, ConversionInvocation, DimensionProbe, ImageHeaderProbe, ProcessRunner,
    SystemRunner,
};
use crate::types::{
    DerivativeOutcome, DerivativeOutput, DerivativeSize, DerivativeSpec, SkipReason,
};

pub struct DerivativeImageCreator {
    convert_path: PathBuf,
    derivatives: Vec<DerivativeSpec>,
    runner: Box<dyn ProcessRunner>,
    probe: Box<dyn DimensionProbe>,
}

impl fmt::Debug for DerivativeImageCreator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DerivativeImageCreator")
            .field("convert_path", &self.convert_path)
            .field("derivatives", &self.derivatives)
            .finish_non_exhaustive()
    }
}

impl DerivativeImageCreator {
    /// Create a creator for the ImageMagick install in `convert_dir`.
    pub fn new<P: AsRef<Path>>(convert_dir: P) -> Result<Self> {
        let mut creator = Self {
            convert_path: PathBuf::new(),
            derivatives: Vec::new(),
            runner: Box::new(SystemRunner),
            probe: Box::new(ImageHeaderProbe),
        };
        creator.set_convert_path(convert_dir)?;
        Ok(creator)
    }

    pub fn with_runner<R: ProcessRunner + 'static>(mut self, runner: R) -> Self {
        self.runner = Box::new(runner);
        self
    }

    pub fn with_probe<P: DimensionProbe + 'static>(mut self, probe: P) -> Self {
        self.probe = Box::new(probe);
        self
    }

    /// Point at the directory containing `convert`. The directory must exist;
    /// the executable itself is only checked when it is first run.
    pub fn set_convert_path<P: AsRef<Path>>(&mut self, dir: P) -> Result<()> {
        let dir = dir.as_ref();
        let clean = dir.canonicalize().map_err(|e| {
            Error::Configuration(format!(
                "invalid directory given for the ImageMagick command: {} ({})",
                dir.display(),
                e
            ))
        })?;
        if !clean.is_dir() {
            return Err(Error::Configuration(format!(
                "invalid directory given for the ImageMagick command: {} is not a directory",
                dir.display()
            )));
        }
        self.convert_path = clean.join(CONVERT_COMMAND);
        debug!("Using ImageMagick command at {:?}", self.convert_path);
        Ok(())
    }

    pub fn convert_path(&self) -> &Path {
        &self.convert_path
    }

    /// Registered derivatives, in generation order.
    pub fn derivatives(&self) -> &[DerivativeSpec] {
        &self.derivatives
    }

    /// Register a derivative class. A numeric size is a pixel constraint; any
    /// other string is passed to `convert` as literal arguments. Re-registering
    /// a storage type replaces it in place.
    pub fn add_derivative<S: Into<DerivativeSize>>(
        &mut self,
        storage_type: &str,
        size: S,
        square: bool,
    ) -> Result<()> {
        if !is_valid_storage_type(storage_type) {
            return Err(Error::invalid_spec(format!(
                "Invalid derivative type given: '{}' must be alphanumeric string.",
                storage_type
            )));
        }
        let size = size.into();
        let ops = resolve_size(&size, square)?;

        let spec = DerivativeSpec {
            storage_type: storage_type.to_string(),
            size,
            square,
            ops,
        };
        match self
            .derivatives
            .iter_mut()
            .find(|d| d.storage_type == storage_type)
        {
            Some(existing) => *existing = spec,
            None => self.derivatives.push(spec),
        }
        Ok(())
    }

    /// Whether `path` can produce derivatives at all. Ineligibility is not an error.
    pub fn is_derivable(&self, path: &Path, mime_type: &str) -> bool {
        is_derivable(path, mime_type, self.probe.as_ref())
    }

    /// Create every registered derivative of `source`.
    ///
    /// Conversions run one at a time in registration order. The first failing
    /// conversion aborts the rest; files already written are left in place.
    pub fn create(
        &self,
        source: &Path,
        derivative_filename: &str,
        mime_type: &str,
    ) -> Result<DerivativeOutcome> {
        if !is_plain_filename(derivative_filename) {
            return Err(Error::InvalidArgument {
                arg: "derivative_filename",
                value: derivative_filename.to_string(),
            });
        }

        File::open(source).map_err(|e| Error::SourceUnreadable {
            path: source.to_path_buf(),
            source: e,
        })?;

        if !self.is_derivable(source, mime_type) {
            return Ok(DerivativeOutcome::Skipped(SkipReason::Ineligible));
        }

        if self.derivatives.is_empty() {
            return Ok(DerivativeOutcome::Skipped(SkipReason::NoDerivatives));
        }

        let working_dir = working_dir_of(source);
        check_writable_dir(working_dir)?;

        let mut outputs = Vec::with_capacity(self.derivatives.len());
        for spec in &self.derivatives {
            let output = working_dir.join(spec.output_filename(derivative_filename));
            let diagnostics = self.create_image(source, &output, &spec.args())?;
            info!("Created {} derivative: {:?}", spec.storage_type, output);
            outputs.push(DerivativeOutput {
                storage_type: spec.storage_type.clone(),
                path: output,
                diagnostics,
            });
        }

        Ok(DerivativeOutcome::Produced(outputs))
    }

    /// First line of `convert -version`.
    pub fn convert_version(&self) -> Result<String> {
        let invocation = ConversionInvocation::with_args(self.convert_path.clone(), ["-version"]);
        let output = self.runner.run(&invocation)?;
        if !output.success() {
            return Err(Error::ConversionFailed {
                status: output.status,
                stderr: output.stderr,
            });
        }
        Ok(output.stdout.lines().next().unwrap_or_default().trim().to_string())
    }

    fn create_image(
        &self,
        source: &Path,
        output: &Path,
        args: &[String],
    ) -> Result<Option<String>> {
        let invocation =
            ConversionInvocation::convert(self.convert_path.clone(), source, args, output);
        debug!("Running: {}", invocation.display());

        let result = self.runner.run(&invocation)?;
        if !result.success() {
            return Err(Error::ConversionFailed {
                status: result.status,
                stderr: result.stderr,
            });
        }

        let errors = result.stderr.trim();
        if errors.is_empty() {
            Ok(None)
        } else {
            warn!("Error output from ImageMagick:\n{}", errors);
            Ok(Some(errors.to_string()))
        }
    }
}

fn is_plain_filename(name: &str) -> bool {
    let mut components = Path::new(name).components();
    match (components.next(), components.next()) {
        (Some(Component::Normal(part)), None) => part == OsStr::new(name),
        _ => false,
    }
}

fn working_dir_of(source: &Path) -> &Path {
    match source.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    }
}

fn check_writable_dir(dir: &Path) -> Result<()> {
    if !dir.is_dir() {
        return Err(Error::WorkingDirectory {
            path: dir.to_path_buf(),
            reason: "not a directory".to_string(),
        });
    }
    // Writability is checked by creating an anonymous temp file
    tempfile::tempfile_in(dir).map_err(|e| Error::WorkingDirectory {
        path: dir.to_path_buf(),
        reason: e.to_string(),
    })?;
    Ok(())
}
