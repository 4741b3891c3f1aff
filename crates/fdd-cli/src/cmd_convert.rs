/// Implementation of `fdd convert`.
///
/// Turns one raw frame archived by `fdd decode` (`Originals/<name>.data`)
/// back into a tape image. The tape name defaults to the input file stem.
use std::fs;

use anyhow::{Context, Result};
use fdd_tap::TapWriter;
use fdd_types::CompletedFile;

use crate::ConvertArgs;

/// Run the `fdd convert` command.
///
/// # Errors
///
/// Returns an error if the input cannot be read, is not exactly one raw
/// frame, or the output cannot be written.
pub fn run(args: &ConvertArgs) -> Result<()> {
    let raw = fs::read(&args.input)
        .with_context(|| format!("cannot read {}", args.input.display()))?;
    let file = CompletedFile::parse(raw)
        .with_context(|| format!("{} is not a raw frame", args.input.display()))?;

    let name = match &args.name {
        Some(name) => name.clone(),
        None => args
            .input
            .file_stem()
            .map(|stem| stem.to_string_lossy().into_owned())
            .unwrap_or_default(),
    };

    let writer = TapWriter::for_file(&file, &name)?;
    let mut out = fs::File::create(&args.output)
        .with_context(|| format!("cannot create {}", args.output.display()))?;
    let written = writer
        .write_to(&mut out)
        .with_context(|| format!("cannot write {}", args.output.display()))?;

    println!(
        "{} → {} ({} {}, {written} bytes)",
        args.input.display(),
        args.output.display(),
        file.header().file_type(),
        file.payload().len(),
    );
    Ok(())
}
