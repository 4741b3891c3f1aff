//! Shared fixtures for the FDD integration tests and benchmarks.
//!
//! Frames are built from [`ProgramHeader::write_to`] so the fixtures stay
//! in step with the header layout. Payload bytes are deterministic
//! filler; the decoder never looks inside them.

pub mod fixtures;

pub use fixtures::*;
