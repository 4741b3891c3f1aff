#![warn(clippy::pedantic)]

pub mod error;
pub mod name;
pub mod tap_reader;
pub mod tap_writer;

pub use error::TapError;
pub use name::TapeName;
pub use tap_reader::{TapBlock, TapHeaderBlock, read_tap_blocks};
pub use tap_writer::{TapWriter, encode_tap};
