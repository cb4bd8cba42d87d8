use thiserror::Error;

/// Failures surfaced by the injection flow.
///
/// Host plumbing (store files, settings, event dispatch) reports
/// [`anyhow::Error`]; these are the variants callers are expected to match on.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InjectError {
    /// The focused element is neither a text field nor a contenteditable region.
    #[error("element <{tag}> is not an editable text target")]
    NotEditable { tag: String },
    /// A page listener canceled the `beforeinput` notification.
    #[error("the page rejected the pending write")]
    WriteRejected,
    /// Reading prompts or categories from the store failed.
    #[error("failed to read prompts: {0}")]
    StoreRead(String),
    /// Writing to the system clipboard failed.
    #[error("clipboard write denied: {0}")]
    ClipboardDenied(String),
}

impl InjectError {
    pub fn not_editable(tag: impl Into<String>) -> Self {
        Self::NotEditable { tag: tag.into() }
    }
}

pub type InjectResult<T> = std::result::Result<T, InjectError>;
