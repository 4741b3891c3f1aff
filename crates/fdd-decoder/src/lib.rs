#![warn(clippy::pedantic)]

pub mod config;
pub mod event;
pub mod progress;
pub mod receiver;
pub mod source;

pub use config::DecoderConfig;
pub use event::{Anomaly, DecoderEvent, EventSink, FnSink};
pub use progress::{Progress, ProgressValue, derive_progress};
pub use receiver::{DecoderState, StreamDecoder};
pub use source::drain;
