#![doc = r#"
derivgen: derivative image generation for digital collections.

This crate turns an original image into its display derivatives (fullsize copy,
thumbnail, square thumbnail, or any named class you register) by running
ImageMagick's `convert` once per derivative. Outputs are written next to the
original as `<storage_type>_<derivative filename>`. It powers the `derivgen`
CLI and can be embedded in a collections backend.

Requirements
------------
- ImageMagick's `convert` executable (6.x, or 7.x with the legacy `convert` shim).
- Rust 2024 edition toolchain.

Quick start
-----------
```rust,no_run
use std::path::Path;
use derivgen::{DerivativeImageCreator, DerivativeOutcome};

fn main() -> derivgen::Result<()> {
    let mut creator = DerivativeImageCreator::new("/usr/bin")?;
    creator.add_derivative("thumbnail", 200u32, false)?;
    creator.add_derivative("square_thumbnail", 100u32, true)?;

    match creator.create(Path::new("/srv/files/photo.png"), "photo.jpg", "image/png")? {
        DerivativeOutcome::Produced(outputs) => {
            for out in outputs {
                println!("{} -> {}", out.storage_type, out.path.display());
            }
        }
        DerivativeOutcome::Skipped(reason) => println!("nothing produced: {reason}"),
    }
    Ok(())
}
```

Configuration files
-------------------
```rust,no_run
use std::path::Path;
use derivgen::DerivativeParams;

fn main() -> derivgen::Result<()> {
    // {"convert_dir": "/usr/bin", "derivatives": [{"storage_type": "thumbnail", "size": 200}]}
    let params = DerivativeParams::from_path(Path::new("derivgen.json"))?;
    let creator = params.build_creator()?;
    println!("{} derivative classes", creator.derivatives().len());
    Ok(())
}
```

Stored files and batches
------------------------
```rust,no_run
use std::path::Path;
use derivgen::{
    create_for_stored_file, process_directory, DerivativeParams, ExtensionMimeTypes,
    LocalStorage, StoredFile,
};

fn main() -> derivgen::Result<()> {
    let creator = DerivativeParams::default().build_creator()?;

    let storage = LocalStorage::new("/srv/files/original");
    let file = StoredFile { filename: "a1b2.png".into(), mime_type: "image/png".into() };
    create_for_stored_file(&creator, &storage, &file)?;

    let report = process_directory(&creator, Path::new("/srv/incoming"), &ExtensionMimeTypes, true)?;
    println!("processed={} skipped={} errors={}", report.processed, report.skipped, report.errors);
    Ok(())
}
```

Error handling
--------------
All fallible functions return `derivgen::Result<T>`. A source that cannot
produce derivatives (no image dimensions, denylisted mime type) is not an
error: `create` returns `DerivativeOutcome::Skipped`.

```rust,no_run
use std::path::Path;
use derivgen::{DerivativeImageCreator, Error};

fn main() {
    let creator = match DerivativeImageCreator::new("/usr/bin") {
        Ok(c) => c,
        Err(e) => return eprintln!("{e}"),
    };
    match creator.create(Path::new("/srv/files/photo.png"), "photo.jpg", "image/png") {
        Ok(outcome) => println!("produced: {}", outcome.is_produced()),
        Err(Error::ConversionFailed { status, stderr }) => eprintln!("convert {status:?}: {stderr}"),
        Err(Error::SourceUnreadable { path, .. }) => eprintln!("cannot read {}", path.display()),
        Err(other) => eprintln!("{other}"),
    }
}
```

Useful modules
--------------
- [`api`]: high-level entry points and collaborator traits.
- [`core`]: argument resolution, eligibility, the creator, config params.
- [`io`]: process runner, dimension probe, `convert` discovery.
- [`types`]: `DerivativeSize`, `ConvertOp`, `DerivativeOutcome` and friends.
- [`error`]: crate-level `Error` and `Result`.
"#]

pub mod api;
pub mod core;
pub mod error;
pub mod io;
pub mod types;

// Curated public API surface
pub use crate::core::creator::DerivativeImageCreator;
pub use crate::core::eligibility::MIME_TYPE_DENYLIST;
pub use crate::core::params::{DerivativeEntry, DerivativeParams};
pub use error::{Error, Result};
pub use types::{
    ConvertOp, DerivativeOutcome, DerivativeOutput, DerivativeSize, DerivativeSpec, Geometry,
    Gravity, SkipReason,
};

pub use io::{
    ConversionInvocation, DimensionProbe, ImageHeaderProbe, ProcessOutput, ProcessRunner,
    SystemRunner, default_convert_dir,
};

pub use api::{
    BatchReport, ExtensionMimeTypes, LocalStorage, MimeTypeSource, StorageResolver, StoredFile,
    create_for_stored_file, process_directory,
};
