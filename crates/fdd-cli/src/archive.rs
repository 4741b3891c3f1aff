/// Naming received files and writing them to disk.
///
/// Each file is stored twice below the archive root:
///
/// ```text
/// <root>/
/// ├── Tapes/<name>.tap          tape image built with TapWriter
/// └── Originals/<name>.data     raw frame, byte for byte
/// ```
use std::collections::HashSet;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use fdd_tap::{TapError, TapWriter};
use fdd_tap::name::NAME_LEN;
use fdd_types::CompletedFile;

pub const TAPES_DIR: &str = "Tapes";
pub const ORIGINALS_DIR: &str = "Originals";

/// A received file together with the name it is archived under.
pub struct NamedFile {
    pub name: String,
    pub file: CompletedFile,
}

/// Errors from [`save_files`].
///
/// ```text
/// ┌────────────────┬──────────────────────────────────────────────┐
/// │ Variant        │ Cause                                        │
/// ├────────────────┼──────────────────────────────────────────────┤
/// │ InvalidName    │ name is not a plain file name (before I/O)   │
/// │ RepeatedName   │ two files share a name (checked before I/O)  │
/// │ NotADirectory  │ Tapes/ or Originals/ exists as a plain file  │
/// │ Tap            │ payload too large for a tape block           │
/// │ Io             │ creating a directory or writing a file       │
/// └────────────────┴──────────────────────────────────────────────┘
/// ```
#[derive(Debug, thiserror::Error)]
pub enum SaveError {
    #[error("file name {name:?} is not a plain file name")]
    InvalidName { name: String },

    #[error("file name {name:?} is used more than once")]
    RepeatedName { name: String },

    #[error("{} exists and is not a directory", path.display())]
    NotADirectory { path: PathBuf },

    #[error("cannot encode {name:?} as a tape image")]
    Tap {
        name: String,
        #[source]
        source: TapError,
    },

    #[error("cannot write {}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// First free name of the sequence "File", "File 2", "File 3", …
///
/// Truncated to the tape name length.
pub fn next_file_name<'a>(taken: impl IntoIterator<Item = &'a str>) -> String {
    let taken: HashSet<&str> = taken.into_iter().collect();
    (1u32..)
        .map(|n| {
            let name = if n == 1 {
                "File".to_string()
            } else {
                format!("File {n}")
            };
            name.chars().take(NAME_LEN).collect::<String>()
        })
        .find(|name| !taken.contains(name.as_str()))
        .unwrap_or_default()
}

/// Give each file the next free default name, in order.
pub fn name_files(files: impl IntoIterator<Item = CompletedFile>) -> Vec<NamedFile> {
    let mut named: Vec<NamedFile> = Vec::new();
    for file in files {
        let name = next_file_name(named.iter().map(|f| f.name.as_str()));
        named.push(NamedFile { name, file });
    }
    named
}

/// Write every file below `root` as `.tap` and `.data`.
///
/// `root` must exist. `Tapes/` and `Originals/` are created when missing.
/// Returns the written paths, tape then original for each file.
///
/// # Errors
///
/// See [`SaveError`]. Invalid names and name collisions are detected
/// before anything is written.
pub fn save_files(root: &Path, files: &[NamedFile]) -> Result<Vec<PathBuf>, SaveError> {
    let mut seen = HashSet::new();
    for file in files {
        if !is_plain_name(&file.name) {
            return Err(SaveError::InvalidName {
                name: file.name.clone(),
            });
        }
        if !seen.insert(file.name.as_str()) {
            return Err(SaveError::RepeatedName {
                name: file.name.clone(),
            });
        }
    }

    let tapes = ensure_dir(&root.join(TAPES_DIR))?;
    let originals = ensure_dir(&root.join(ORIGINALS_DIR))?;

    let mut written = Vec::with_capacity(files.len() * 2);
    for NamedFile { name, file } in files {
        let image = TapWriter::for_file(file, name)
            .map_err(|source| SaveError::Tap {
                name: name.clone(),
                source,
            })?
            .encode();

        let tap_path = tapes.join(format!("{name}.tap"));
        write(&tap_path, &image)?;
        let data_path = originals.join(format!("{name}.data"));
        write(&data_path, file.raw_frame())?;

        tracing::debug!(%name, tap = %tap_path.display(), "file archived");
        written.push(tap_path);
        written.push(data_path);
    }
    Ok(written)
}

/// A name that stays a single component inside `Tapes/` and `Originals/`.
fn is_plain_name(name: &str) -> bool {
    !matches!(name, "" | "." | "..") && !name.contains(['/', '\\', '\0'])
}

fn ensure_dir(path: &Path) -> Result<PathBuf, SaveError> {
    match fs::metadata(path) {
        Ok(meta) if meta.is_dir() => {}
        Ok(_) => {
            return Err(SaveError::NotADirectory {
                path: path.to_path_buf(),
            });
        }
        Err(err) if err.kind() == io::ErrorKind::NotFound => {
            fs::create_dir(path).map_err(|source| SaveError::Io {
                path: path.to_path_buf(),
                source,
            })?;
        }
        Err(source) => {
            return Err(SaveError::Io {
                path: path.to_path_buf(),
                source,
            });
        }
    }
    Ok(path.to_path_buf())
}

fn write(path: &Path, bytes: &[u8]) -> Result<(), SaveError> {
    fs::write(path, bytes).map_err(|source| SaveError::Io {
        path: path.to_path_buf(),
        source,
    })
}
