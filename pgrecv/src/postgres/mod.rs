//! Postgres type identification.
//!
//! Every value in a result is tagged with the [`Oid`] of its server side type.
//! Before any byte is trusted, the target type is asked whether it accepts
//! that oid through [`PgType`]. Builtin types have fixed oids listed in
//! [`oid`], while user defined types are resolved at runtime via [`OidMap`].
//!
//! <https://www.postgresql.org/docs/current/protocol-overview.html#PROTOCOL-FORMAT-CODES>
use crate::error::DecodeError;

pub mod oid;
mod oid_map;
mod pg_type;

pub use oid_map::OidMap;
pub use pg_type::PgType;

/// Postgres object identifier.
///
/// The oid type is implemented as an unsigned four-byte integer.
///
/// <https://www.postgresql.org/docs/current/datatype-oid.html>
pub type Oid = u32;

/// Postgres data transmission format.
///
/// Only [`Binary`][PgFormat::Binary] values can be decoded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PgFormat {
    /// Text has format code zero.
    Text,
    /// Binary has format code one.
    ///
    /// Integers use network byte order (most significant byte first).
    Binary,
}

impl PgFormat {
    /// Returns format from its format code.
    pub fn from_code(code: i16) -> Result<Self, DecodeError> {
        match code {
            0 => Ok(Self::Text),
            1 => Ok(Self::Binary),
            _ => Err(DecodeError::Malformed("unknown format code")),
        }
    }

    /// Return format code for current format.
    pub const fn format_code(&self) -> i16 {
        match self {
            Self::Text => 0,
            Self::Binary => 1,
        }
    }
}
