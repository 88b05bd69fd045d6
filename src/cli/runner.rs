use std::path::Path;

use tracing::info;
use tracing_subscriber::EnvFilter;

use derivgen::core::args::derivative_filename;
use derivgen::{
    DerivativeEntry, DerivativeImageCreator, DerivativeOutcome, DerivativeParams, DerivativeSize,
    ExtensionMimeTypes, MimeTypeSource, process_directory,
};

use super::args::CliArgs;
use super::errors::AppError;

fn init_logging(verbose: bool) {
    let default_filter = if verbose {
        "derivgen=debug"
    } else {
        "derivgen=info"
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// Parse `NAME=SIZE` or `NAME=SIZE:square`.
pub fn parse_derivative(value: &str) -> Result<DerivativeEntry, AppError> {
    let invalid = || AppError::InvalidDerivative {
        value: value.to_string(),
    };
    let (name, rest) = value.split_once('=').ok_or_else(invalid)?;
    let (size, square) = match rest.strip_suffix(":square") {
        Some(size) => (size, true),
        None => (rest, false),
    };
    if name.is_empty() || size.trim().is_empty() {
        return Err(invalid());
    }
    let size = match size.trim().parse::<u32>() {
        Ok(n) => DerivativeSize::Constraint(n),
        Err(_) => DerivativeSize::Literal(size.to_string()),
    };
    Ok(DerivativeEntry::new(name, size, square))
}

/// Config file (or defaults), then `--convert-dir`, then `--derivative` entries.
/// Without a config file, `--derivative` entries replace the default classes.
fn build_params(args: &CliArgs) -> Result<DerivativeParams, AppError> {
    let mut params = match &args.config {
        Some(path) => DerivativeParams::from_path(path)?,
        None => DerivativeParams::default(),
    };

    if let Some(dir) = &args.convert_dir {
        params.convert_dir = Some(dir.clone());
    }

    if !args.derivatives.is_empty() {
        if args.config.is_none() {
            params.derivatives.clear();
        }
        for value in &args.derivatives {
            params.upsert(parse_derivative(value)?);
        }
    }

    Ok(params)
}

fn create_single(
    creator: &DerivativeImageCreator,
    input: &Path,
    filename: Option<&str>,
    mime_type: Option<&str>,
) -> Result<(), AppError> {
    let mime_type = match mime_type {
        Some(m) => m.to_string(),
        None => ExtensionMimeTypes
            .mime_type(input)
            .ok_or_else(|| AppError::UnknownMimeType {
                path: input.display().to_string(),
            })?,
    };
    let filename = match filename {
        Some(name) => name.to_string(),
        None => {
            let original = input
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .ok_or_else(|| AppError::MissingArgument {
                    arg: "--filename".to_string(),
                })?;
            derivative_filename(&original)
        }
    };

    match creator.create(input, &filename, &mime_type)? {
        DerivativeOutcome::Produced(outputs) => {
            for out in outputs {
                println!("{}", out.path.display());
            }
        }
        DerivativeOutcome::Skipped(reason) => {
            info!("No derivatives produced for {:?}: {}", input, reason);
        }
    }
    Ok(())
}

pub fn run(args: CliArgs) -> Result<(), Box<dyn std::error::Error>> {
    init_logging(args.log);

    let params = build_params(&args)?;
    let creator = params.build_creator().map_err(AppError::from)?;

    if args.info {
        println!("convert: {}", creator.convert_path().display());
        let version = creator.convert_version().map_err(AppError::from)?;
        println!("{}", version);
        return Ok(());
    }

    if let Some(input_dir) = &args.input_dir {
        info!("Starting batch processing from directory: {:?}", input_dir);
        let report = process_directory(&creator, input_dir, &ExtensionMimeTypes, args.batch)
            .map_err(AppError::from)?;
        info!("Processed: {}", report.processed);
        info!("Skipped: {}", report.skipped);
        info!("Errors: {}", report.errors);
    } else {
        let input = args.input.as_ref().ok_or(AppError::MissingArgument {
            arg: "--input".to_string(),
        })?;
        create_single(
            &creator,
            input,
            args.filename.as_deref(),
            args.mime_type.as_deref(),
        )?;
    }

    Ok(())
}
