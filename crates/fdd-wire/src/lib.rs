#![warn(clippy::pedantic)]

pub mod checksum;
pub mod error;
pub mod le;
pub mod marker;

pub use checksum::checksum;
pub use error::WireError;
pub use le::LittleEndian;
