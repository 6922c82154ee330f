//! `pgrecv` error types.
use std::{borrow::Cow, fmt, str::Utf8Error, string::FromUtf8Error};

use crate::postgres::Oid;

/// A specialized [`Result`] type for `pgrecv` operation.
pub type Result<T, E = DecodeError> = std::result::Result<T, E>;

/// An error when decoding a wire value, row or result.
///
/// Every variant aborts the current decode call. Targets that were
/// partially written before the error keep what was written.
pub enum DecodeError {
    /// Fixed size type received a value with different length.
    SizeMismatch {
        /// Length reported by the wire.
        declared: usize,
        /// Encoded size of the target type.
        expected: usize,
    },
    /// Value oid is not accepted by the target type.
    OidTypeMismatch {
        oid: Oid,
        type_name: Cow<'static, str>,
    },
    /// Array element oid is not accepted by the target element type.
    OidMismatch {
        oid: Oid,
        type_name: Cow<'static, str>,
    },
    /// Array have dimension other than zero or one.
    UnsupportedDimensionality(i32),
    /// Value is `NULL` but target cannot represent it.
    UnexpectedNull,
    /// Array element type is nullable, which is not yet supported.
    NullArrayElementUnsupported,
    /// Row length differ from the target field count.
    RowArityMismatch {
        row: usize,
        expected: usize,
        type_name: Cow<'static, str>,
    },
    /// Column requested by the target is not found in the row.
    ColumnNotFound {
        name: Cow<'static, str>,
        type_name: Cow<'static, str>,
    },
    /// Index requested is out of bounds.
    IndexOutOfBounds(usize),
    /// Input ended before the requested bytes.
    TruncatedInput {
        needed: usize,
        remaining: usize,
    },
    /// Output slots ran out before the result rows.
    CapacityExceeded {
        rows: usize,
        slots: usize,
    },
    /// Protocol message is malformed.
    Malformed(&'static str),
    /// Postgres return non utf8 string.
    Utf8(Utf8Error),
    /// Failed to deserialize using `serde_json`.
    #[cfg(feature = "json")]
    Json(serde_json::Error),
}

impl fmt::Display for DecodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("failed to decode value, ")?;
        match self {
            Self::SizeMismatch { declared, expected } => {
                write!(f, "data size {declared} does not match type size {expected}")
            }
            Self::OidTypeMismatch { oid, type_name } => {
                write!(f, "unexpected oid {oid} for type {type_name}")
            }
            Self::OidMismatch { oid, type_name } => {
                write!(f, "unexpected oid {oid} for element type of {type_name}")
            }
            Self::UnsupportedDimensionality(n) => {
                write!(f, "array dimension count is not supported: {n}")
            }
            Self::UnexpectedNull => f.write_str("unexpected NULL value"),
            Self::NullArrayElementUnsupported => {
                f.write_str("arrays with nullable elements are not supported yet")
            }
            Self::RowArityMismatch { row, expected, type_name } => {
                write!(f, "row size {row} does not match {type_name} size {expected}")
            }
            Self::ColumnNotFound { name, type_name } => {
                write!(f, "row does not contain {name:?} column for {type_name}")
            }
            Self::IndexOutOfBounds(u) => write!(f, "index out of bounds: {u:?}"),
            Self::TruncatedInput { needed, remaining } => {
                write!(f, "need {needed} bytes, {remaining} remaining")
            }
            Self::CapacityExceeded { rows, slots } => {
                write!(f, "{rows} rows does not fit in {slots} output slots")
            }
            Self::Malformed(msg) => write!(f, "malformed message: {msg}"),
            Self::Utf8(e) => write!(f, "{e}"),
            #[cfg(feature = "json")]
            Self::Json(e) => write!(f, "{e}"),
        }
    }
}

macro_rules! from {
    (<$ty:ty>$pat:pat => $body:expr) => {
        impl From<$ty> for DecodeError {
            fn from($pat: $ty) -> Self {
                $body
            }
        }
    };
}

from!(<Utf8Error>e => Self::Utf8(e));
from!(<FromUtf8Error>e => Self::Utf8(e.utf8_error()));
#[cfg(feature = "json")]
from!(<serde_json::Error>e => Self::Json(e));

impl std::error::Error for DecodeError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Utf8(e) => Some(e),
            #[cfg(feature = "json")]
            Self::Json(e) => Some(e),
            _ => None,
        }
    }
}

impl fmt::Debug for DecodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "\"{self}\"")
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn display_context() {
        let err = DecodeError::SizeMismatch { declared: 8, expected: 4 };
        assert_eq!(
            err.to_string(),
            "failed to decode value, data size 8 does not match type size 4"
        );

        let err = DecodeError::ColumnNotFound { name: "Id".into(), type_name: "User".into() };
        assert_eq!(
            format!("{err:?}"),
            "\"failed to decode value, row does not contain \"Id\" column for User\""
        );
    }

    #[test]
    fn utf8_source() {
        use std::error::Error;
        let err = DecodeError::from(String::from_utf8(vec![0xff]).unwrap_err());
        assert!(matches!(err, DecodeError::Utf8(_)));
        assert!(err.source().is_some());
    }
}
