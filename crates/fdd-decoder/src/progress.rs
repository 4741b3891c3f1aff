use fdd_types::FileType;

use crate::receiver::DecoderState;

/// How far along the current file is.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ProgressValue {
    /// No header recognized yet.
    Indeterminate,
    /// `current` payload bytes of `total` have arrived.
    Value { current: usize, total: usize },
}

/// A progress snapshot with its user-facing description.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Progress {
    pub value: ProgressValue,
    /// Type of the file being received, `None` while indeterminate.
    pub file_type: Option<FileType>,
    pub description: String,
}

impl Progress {
    #[must_use]
    pub fn indeterminate() -> Self {
        Self {
            value: ProgressValue::Indeterminate,
            file_type: None,
            description: "Waiting for file header…".to_string(),
        }
    }

    #[must_use]
    pub fn receiving(file_type: FileType, current: usize, total: usize) -> Self {
        Self {
            value: ProgressValue::Value { current, total },
            file_type: Some(file_type),
            description: format!("Receiving {file_type}"),
        }
    }

    /// Completed fraction in `0.0..=1.0`, `None` while indeterminate.
    ///
    /// An empty payload counts as complete.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn fraction(&self) -> Option<f64> {
        match self.value {
            ProgressValue::Indeterminate => None,
            ProgressValue::Value { total: 0, .. } => Some(1.0),
            ProgressValue::Value { current, total } => Some(current as f64 / total as f64),
        }
    }
}

impl Default for Progress {
    fn default() -> Self {
        Self::indeterminate()
    }
}

/// Progress implied by the decoder state and the number of buffered bytes.
///
/// Pure: the decoder calls it on every state change and on every payload
/// pass, but it can be evaluated for any state. Only payload bytes are
/// counted, never header bytes, and the count is capped at the declared
/// payload length even when the next frame is already buffered.
#[must_use]
pub fn derive_progress(state: &DecoderState, buffered: usize) -> Progress {
    match state {
        DecoderState::Idle => Progress::indeterminate(),
        DecoderState::AwaitingPayload(header) => {
            let total = usize::from(header.payload_len());
            let current = buffered.saturating_sub(header.header_size()).min(total);
            Progress::receiving(header.file_type(), current, total)
        }
    }
}
