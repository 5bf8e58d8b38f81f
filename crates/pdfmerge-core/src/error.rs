use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum MergeError {
    #[error("Failed to load {name}: {reason}")]
    LoadFailed { name: String, reason: String },

    #[error("Invalid page range: {0}")]
    InvalidRange(String),

    #[error("Invalid split: {0}")]
    InvalidSplit(String),

    /// Nothing to act on. Callers surface this as a status line, not a failure.
    #[error("Nothing to do: {0}")]
    EmptyOperation(&'static str),

    #[error("Item index {index} out of bounds (list has {len} items)")]
    IndexOutOfBounds { index: usize, len: usize },

    #[error("PDF operation failed: {0}")]
    OperationError(String),

    #[error("Another merge is already running")]
    Busy,
}

impl MergeError {
    pub(crate) fn load_failed(name: &str, reason: impl ToString) -> Self {
        MergeError::LoadFailed {
            name: name.to_string(),
            reason: reason.to_string(),
        }
    }

    /// True for outcomes that leave state unchanged and need no error styling.
    pub fn is_no_op(&self) -> bool {
        matches!(self, MergeError::EmptyOperation(_))
    }
}
