/// Implementation of `fdd decode`.
///
/// Decodes a capture and archives every received file. Diagnostics are
/// printed as they were reported, followed by one line per written file.
///
/// # Output format
///
/// ```text
/// Initial byte is not 0, skipping.
/// File       Program   277 bytes  → out/Tapes/File.tap
/// File 2     Program    20 bytes  → out/Tapes/File 2.tap
/// ---
/// 2 files archived in out (1 diagnostic)
/// ```
use std::fs;

use anyhow::{Context, Result, bail};

use crate::DecodeArgs;
use crate::archive::{self, NamedFile};
use crate::capture;

/// Run the `fdd decode` command.
///
/// # Errors
///
/// Returns an error if the capture cannot be read, the names given with
/// `--names` do not match the received files, or archiving fails.
pub async fn run(args: &DecodeArgs) -> Result<()> {
    let capture = capture::decode(&args.input, args.decoder.config()).await?;

    for anomaly in capture.diagnostics() {
        println!("{anomaly}");
    }

    let files: Vec<_> = capture.files().cloned().collect();
    let named = match &args.names {
        None => archive::name_files(files),
        Some(names) => {
            if names.len() != files.len() {
                bail!(
                    "{} name{} given for {} received file{}",
                    names.len(),
                    plural(names.len()),
                    files.len(),
                    plural(files.len())
                );
            }
            names
                .iter()
                .cloned()
                .zip(files)
                .map(|(name, file)| NamedFile { name, file })
                .collect()
        }
    };

    if named.is_empty() {
        println!("---");
        println!("no files received ({} bytes read)", capture.bytes_read);
        return Ok(());
    }

    fs::create_dir_all(&args.output)
        .with_context(|| format!("cannot create {}", args.output.display()))?;
    archive::save_files(&args.output, &named)
        .with_context(|| format!("cannot archive into {}", args.output.display()))?;

    for NamedFile { name, file } in &named {
        let tap = args
            .output
            .join(archive::TAPES_DIR)
            .join(format!("{name}.tap"));
        println!(
            "{name:<10} {:<8} {:>5} bytes  → {}",
            file.header().file_type().to_string(),
            file.payload().len(),
            tap.display()
        );
    }

    let diagnostics = capture.diagnostics().count();
    println!("---");
    println!(
        "{} file{} archived in {} ({diagnostics} diagnostic{})",
        named.len(),
        plural(named.len()),
        args.output.display(),
        plural(diagnostics)
    );
    Ok(())
}

pub fn plural(n: usize) -> &'static str {
    if n == 1 { "" } else { "s" }
}
