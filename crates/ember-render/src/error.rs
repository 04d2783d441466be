/// Errors that can occur in the sprite batching system.
#[derive(Debug, Clone)]
pub enum RenderError {
    /// A batch-protocol call was made in the wrong state, e.g. `draw` outside
    /// of `begin`/`end` or a re-entrant `begin`.
    InvalidOperation(&'static str),

    /// The graphics backend rejected an upload or draw call. The message is
    /// backend-defined; the batcher performs no retry and aborts the
    /// remainder of the flush.
    Backend(String),

    /// A character had no glyph in the font and the font declares no
    /// default-character fallback.
    MissingGlyph(char),
}

impl std::fmt::Display for RenderError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RenderError::InvalidOperation(msg) => write!(f, "Invalid operation: {}", msg),
            RenderError::Backend(msg) => write!(f, "Graphics backend error: {}", msg),
            RenderError::MissingGlyph(c) => {
                write!(f, "Character {:?} is not present in the sprite font", c)
            }
        }
    }
}

impl std::error::Error for RenderError {}

/// Result type for render operations.
pub type RenderResult<T> = Result<T, RenderError>;
