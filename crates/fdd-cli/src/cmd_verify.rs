/// Implementation of `fdd verify`.
///
/// Splits a tape image into blocks and checks every block checksum.
///
/// # Output format
///
/// ```text
/// ✓ 0000  header  Program "File 2", 20 bytes, param1=0, param2=14
/// ✓ 0015  data    20 bytes
/// ---
/// 2 blocks, all checksums valid
/// ```
///
/// Any bad checksum prints `✗` for that block and the command fails.
use std::fs;

use anyhow::{Context, Result, bail};
use fdd_tap::read_tap_blocks;
use fdd_tap::tap_writer::HEADER_FLAG;

use crate::VerifyArgs;
use crate::cmd_decode::plural;

/// Run the `fdd verify` command.
///
/// # Errors
///
/// Returns an error if the file cannot be read, the block structure is
/// broken, or any checksum does not match.
pub fn run(args: &VerifyArgs) -> Result<()> {
    let image =
        fs::read(&args.file).with_context(|| format!("cannot read {}", args.file.display()))?;
    let blocks = read_tap_blocks(&image)
        .with_context(|| format!("{} is not a tape image", args.file.display()))?;

    let mut bad = 0;
    for block in &blocks {
        let mark = if block.is_valid() { "✓" } else { "✗" };
        if !block.is_valid() {
            bad += 1;
        }

        let detail = match block.as_header() {
            Ok(header) => format!(
                "header  {} {:?}, {} bytes, param1={}, param2={}",
                header.file_type,
                header.name.to_text(),
                header.data_len,
                header.param1,
                header.param2
            ),
            Err(_) if block.flag == HEADER_FLAG => {
                format!("header  unreadable ({} bytes)", block.data.len())
            }
            Err(_) => format!("data    {} bytes", block.data.len()),
        };
        println!("{mark} {:04x}  {detail}", block.offset);
    }

    println!("---");
    if bad > 0 {
        bail!("{bad} of {} block checksums do not match", blocks.len());
    }
    println!(
        "{} block{}, all checksums valid",
        blocks.len(),
        plural(blocks.len())
    );
    Ok(())
}
