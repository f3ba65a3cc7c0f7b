pub type InkframeResult<T> = Result<T, InkframeError>;

#[derive(thiserror::Error, Debug)]
pub enum InkframeError {
    #[error("validation error: {0}")]
    Validation(String),

    /// A data source was unreachable, timed out, or answered with a
    /// non-success status.
    #[error("source error: {0}")]
    Source(String),

    /// Input that exists but cannot be interpreted (bad timer target, invalid
    /// style template, undecodable image).
    #[error("content error: {0}")]
    Content(String),

    #[error("render error: {0}")]
    Render(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl InkframeError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn source(msg: impl Into<String>) -> Self {
        Self::Source(msg.into())
    }

    pub fn content(msg: impl Into<String>) -> Self {
        Self::Content(msg.into())
    }

    pub fn render(msg: impl Into<String>) -> Self {
        Self::Render(msg.into())
    }
}
