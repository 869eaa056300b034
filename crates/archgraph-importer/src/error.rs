use archgraph_signature::SignatureError;
use archgraph_types::{Diagnostic, Span};
use thiserror::Error;

/// Diagnostic code for signatures that do not match the grammar.
pub const MALFORMED_SIGNATURE: &str = "malformed-signature";
/// Diagnostic code for type variables declared neither by the class nor an enclosing class.
pub const UNRESOLVED_TYPE_VARIABLE: &str = "unresolved-type-variable";

pub type Result<T> = std::result::Result<T, BuildError>;

/// Failure to turn one class's signature into a type graph.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BuildError {
    #[error(transparent)]
    Malformed(#[from] SignatureError),
    #[error("type variable `{name}` at offset {offset} is not in scope")]
    UnresolvedTypeVariable { name: String, offset: usize },
}

impl BuildError {
    pub fn code(&self) -> &'static str {
        match self {
            BuildError::Malformed(_) => MALFORMED_SIGNATURE,
            BuildError::UnresolvedTypeVariable { .. } => UNRESOLVED_TYPE_VARIABLE,
        }
    }

    /// Byte offset into the raw signature.
    pub fn offset(&self) -> usize {
        match self {
            BuildError::Malformed(err) => err.offset(),
            BuildError::UnresolvedTypeVariable { offset, .. } => *offset,
        }
    }

    pub fn to_diagnostic(&self) -> Diagnostic {
        let span = match self {
            BuildError::Malformed(err) => Span::at(err.offset()),
            BuildError::UnresolvedTypeVariable { name, offset } => {
                // `T` + name + `;`
                Span::new(*offset, *offset + name.len() + 2)
            }
        };
        Diagnostic::error(self.code(), self.to_string(), Some(span))
    }
}
