#![warn(clippy::pedantic)]

pub mod error;
pub mod file;
pub mod file_type;
pub mod header;

pub use error::TypeError;
pub use file::CompletedFile;
pub use file_type::FileType;
pub use header::{FrameHeader, PROGRAM_HEADER_SIZE, ProgramHeader};
