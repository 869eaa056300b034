pub type Result<T> = std::result::Result<T, SignatureError>;

/// Errors produced while lexing or parsing a generic signature.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SignatureError {
    /// The input does not match the signature grammar at `offset` (a byte offset into the raw
    /// signature string).
    #[error("malformed signature at offset {offset}: {message}")]
    Malformed { offset: usize, message: String },
}

impl SignatureError {
    pub(crate) fn malformed(offset: usize, message: impl Into<String>) -> Self {
        SignatureError::Malformed {
            offset,
            message: message.into(),
        }
    }

    pub fn offset(&self) -> usize {
        match self {
            SignatureError::Malformed { offset, .. } => *offset,
        }
    }

    pub fn message(&self) -> &str {
        match self {
            SignatureError::Malformed { message, .. } => message,
        }
    }
}
