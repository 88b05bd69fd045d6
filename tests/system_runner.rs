//! End-to-end runs through `SystemRunner` against a stub `convert` script.
//! Kept to a single test so no other thread forks while the script is being written.
#![cfg(unix)]

use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::Path;

use derivgen::{
    DerivativeImageCreator, DerivativeParams, Error, ExtensionMimeTypes, process_directory,
};
use image::{Rgb, RgbImage};

fn write_stub(dir: &Path, body: &str) {
    let path = dir.join("convert");
    fs::write(&path, format!("#!/bin/sh\n{}\n", body)).unwrap();
    fs::set_permissions(&path, fs::Permissions::from_mode(0o755)).unwrap();
}

fn write_png(path: &Path) {
    RgbImage::from_pixel(4, 4, Rgb([1, 2, 3])).save(path).unwrap();
}

#[test]
fn stub_convert_end_to_end() {
    let bin = tempfile::tempdir().unwrap();
    let work = tempfile::tempdir().unwrap();
    let log = bin.path().join("calls.log");

    // Success: log argv, write the last argument, complain on stderr
    write_stub(
        bin.path(),
        &format!(
            "echo \"$@\" >> '{}'\nfor last; do :; done\n: > \"$last\"\necho 'warning: stub' 1>&2\nexit 0",
            log.display()
        ),
    );

    let mut creator = DerivativeImageCreator::new(bin.path()).unwrap();
    creator.add_derivative("thumb", 200u32, false).unwrap();
    creator.add_derivative("square", 100u32, true).unwrap();

    let source = work.path().join("photo.png");
    write_png(&source);

    let outcome = creator.create(&source, "photo.jpg", "image/png").unwrap();
    assert!(outcome.is_produced());
    assert!(work.path().join("thumb_photo.jpg").exists());
    assert!(work.path().join("square_photo.jpg").exists());
    for out in outcome.outputs() {
        assert_eq!(out.diagnostics.as_deref(), Some("warning: stub"));
    }

    let calls = fs::read_to_string(&log).unwrap();
    let lines: Vec<&str> = calls.lines().collect();
    assert_eq!(lines.len(), 2);
    assert!(lines[0].starts_with(&format!("{}[0] -thumbnail x400", source.display())));
    assert_eq!(
        lines[1],
        format!(
            "{}[0] -thumbnail 100x100> {}",
            source.display(),
            work.path().join("square_photo.jpg").display()
        )
    );

    // Batch over the directory: the original is processed, the two derivatives skipped
    fs::remove_file(&log).unwrap();
    let report = process_directory(&creator, work.path(), &ExtensionMimeTypes, false).unwrap();
    assert_eq!(report.processed, 1);
    assert_eq!(report.skipped, 2);
    assert_eq!(report.errors, 0);

    // Version probe
    write_stub(bin.path(), "echo 'Version: ImageMagick 6.9.12-98 Q16'\necho 'Copyright: stub'");
    assert_eq!(
        creator.convert_version().unwrap(),
        "Version: ImageMagick 6.9.12-98 Q16"
    );

    // Failure: non-zero exit surfaces stderr and leaves no later outputs
    fs::remove_file(work.path().join("thumb_photo.jpg")).unwrap();
    fs::remove_file(work.path().join("square_photo.jpg")).unwrap();
    write_stub(
        bin.path(),
        "echo 'convert: no decode delegate for this image format' 1>&2\nexit 1",
    );
    match creator.create(&source, "photo.jpg", "image/png") {
        Err(Error::ConversionFailed { status, stderr }) => {
            assert_eq!(status, Some(1));
            assert!(stderr.contains("no decode delegate"));
        }
        other => panic!("expected ConversionFailed, got {:?}", other),
    }
    assert!(!work.path().join("square_photo.jpg").exists());

    // Batch with continue_on_error counts the failure instead of returning it
    let report = process_directory(&creator, work.path(), &ExtensionMimeTypes, true).unwrap();
    assert_eq!(report.errors, 1);
    assert!(process_directory(&creator, work.path(), &ExtensionMimeTypes, false).is_err());

    // Params pointing at the stub directory build an equivalent creator
    let params = DerivativeParams {
        convert_dir: Some(bin.path().to_path_buf()),
        ..DerivativeParams::default()
    };
    let from_params = params.build_creator().unwrap();
    assert_eq!(from_params.convert_path(), creator.convert_path());
}
