use thiserror::Error;

#[derive(Debug, Error)]
#[error(transparent)]
pub struct Error(Box<ErrorKind>);

impl Error {
    pub fn kind(&self) -> &ErrorKind {
        self.0.as_ref()
    }

    pub fn into_kind(self) -> ErrorKind {
        *self.0
    }

    /// Returns `true` for errors raised when `deserialize` received no bytes.
    pub fn is_missing_input(&self) -> bool {
        matches!(self.kind(), ErrorKind::MissingInput { .. })
    }

    /// Returns `true` for configuration, value or byte-length violations.
    pub fn is_out_of_range(&self) -> bool {
        matches!(self.kind(), ErrorKind::OutOfRange { .. })
    }

    pub fn is_type_mismatch(&self) -> bool {
        matches!(self.kind(), ErrorKind::TypeMismatch { .. })
    }

    pub fn missing_input(element: impl Into<String>) -> Error {
        Error(
            ErrorKind::MissingInput {
                element: element.into(),
            }
            .into(),
        )
    }

    pub fn out_of_range(name: impl Into<String>, message: impl Into<String>) -> Error {
        Error(
            ErrorKind::OutOfRange {
                name: name.into(),
                message: message.into(),
            }
            .into(),
        )
    }

    /// Builds the out-of-range error for a byte sequence of the wrong length.
    pub fn byte_length(element: &str, expected: usize, actual: usize) -> Error {
        Error::out_of_range(
            "bytes",
            format!("{element} expects {expected} bytes, got {actual}"),
        )
    }

    pub fn type_mismatch(expected: impl Into<String>, actual: impl Into<String>) -> Error {
        Error(
            ErrorKind::TypeMismatch {
                expected: expected.into(),
                actual: actual.into(),
            }
            .into(),
        )
    }
}

#[derive(Debug, Error)]
pub enum ErrorKind {
    #[error("missing input for '{element}': no bytes to deserialize")]
    MissingInput { element: String },

    #[error("value out of range for {name}: {message}")]
    OutOfRange { name: String, message: String },

    #[error("type mismatch: expected {expected}, got {actual}")]
    TypeMismatch { expected: String, actual: String },
}

impl From<ErrorKind> for Error {
    fn from(kind: ErrorKind) -> Self {
        Error(kind.into())
    }
}
