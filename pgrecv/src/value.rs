//! Wire value and the cursor used to read it.
use bytes::Buf;

use crate::{
    error::DecodeError,
    ext::FmtExt,
    postgres::{Oid, PgFormat},
};

/// Bounded, forward only reader over a byte span.
///
/// Every read either consume exactly the requested bytes, or fails with
/// [`DecodeError::TruncatedInput`] without advancing.
#[derive(Clone)]
pub struct Cursor<'a> {
    buf: &'a [u8],
}

macro_rules! read {
    ($($(#[$doc:meta])* $name:ident => $ty:ty, $get:ident;)*) => {$(
        $(#[$doc])*
        pub fn $name(&mut self) -> Result<$ty, DecodeError> {
            self.ensure(size_of::<$ty>())?;
            Ok(self.buf.$get())
        }
    )*};
}

impl<'a> Cursor<'a> {
    /// Create cursor over `buf`.
    pub const fn new(buf: &'a [u8]) -> Self {
        Self { buf }
    }

    /// Returns the number of bytes left.
    pub const fn remaining(&self) -> usize {
        self.buf.len()
    }

    /// Returns `true` if all bytes have been read.
    pub const fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    fn ensure(&self, needed: usize) -> Result<(), DecodeError> {
        match self.buf.len() < needed {
            true => Err(DecodeError::TruncatedInput { needed, remaining: self.buf.len() }),
            false => Ok(()),
        }
    }

    /// Read exactly `len` bytes.
    pub fn read_bytes(&mut self, len: usize) -> Result<&'a [u8], DecodeError> {
        self.ensure(len)?;
        let (read, rest) = self.buf.split_at(len);
        self.buf = rest;
        Ok(read)
    }

    /// Split off a cursor over the next `len` bytes.
    ///
    /// Self is advanced by `len` regardless of how much the returned cursor
    /// is read.
    pub fn split_to(&mut self, len: usize) -> Result<Cursor<'a>, DecodeError> {
        self.read_bytes(len).map(Cursor::new)
    }

    read! {
        read_u8 => u8, get_u8;
        read_i8 => i8, get_i8;
        /// Read big endian `i16`.
        read_i16 => i16, get_i16;
        /// Read big endian `i32`.
        read_i32 => i32, get_i32;
        /// Read big endian `i64`.
        read_i64 => i64, get_i64;
        /// Read big endian `u32`.
        read_u32 => u32, get_u32;
        /// Read big endian IEEE-754 single precision float.
        read_f32 => f32, get_f32;
        /// Read big endian IEEE-754 double precision float.
        read_f64 => f64, get_f64;
    }
}

impl std::fmt::Debug for Cursor<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.buf.lossy().fmt(f)
    }
}

/// A single value in a row, tagged with its type oid.
///
/// Borrowed from the [`WireResult`][crate::WireResult] that own the bytes.
#[derive(Clone, Copy)]
pub struct WireValue<'a> {
    oid: Oid,
    format: PgFormat,
    value: Option<&'a [u8]>,
}

impl<'a> WireValue<'a> {
    /// Create binary format value, [`None`] means `NULL`.
    pub const fn new(oid: Oid, value: Option<&'a [u8]>) -> Self {
        Self { oid, format: PgFormat::Binary, value }
    }

    pub(crate) const fn with_format(oid: Oid, format: PgFormat, value: Option<&'a [u8]>) -> Self {
        Self { oid, format, value }
    }

    /// Returns value type [`Oid`].
    pub const fn oid(&self) -> Oid {
        self.oid
    }

    /// Returns value transmission format.
    pub const fn format(&self) -> PgFormat {
        self.format
    }

    /// Return `true` if value is NULL.
    pub const fn is_null(&self) -> bool {
        self.value.is_none()
    }

    /// Returns the value bytes, [`None`] if value is `NULL`.
    pub const fn as_slice(&self) -> Option<&'a [u8]> {
        self.value
    }

    /// Returns the declared length, `-1` for `NULL` as in the wire.
    ///
    /// Saturates at [`i32::MAX`], which a value received from the wire
    /// never exceeds.
    pub fn len(&self) -> i32 {
        self.value.map_or(-1, |e| wire_len(e.len()))
    }
}

fn wire_len(len: usize) -> i32 {
    i32::try_from(len).unwrap_or(i32::MAX)
}

impl std::fmt::Debug for WireValue<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut dbg = f.debug_struct("WireValue");
        dbg.field("oid", &self.oid);
        match self.value {
            Some(value) => dbg.field("value", &value.lossy()),
            None => dbg.field("value", &format_args!("NULL")),
        };
        dbg.finish()
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn read_big_endian() {
        let bytes = [0, 0, 0, 5, 0xff, 0xff, 0xff, 0xfd, 0x3f, 0x80, 0, 0];
        let mut buf = Cursor::new(&bytes);
        assert_eq!(buf.read_i32().unwrap(), 5);
        assert_eq!(buf.read_i32().unwrap(), -3);
        assert_eq!(buf.read_f32().unwrap(), 1.0);
        assert!(buf.is_empty());
    }

    #[test]
    fn truncated_does_not_advance() {
        let mut buf = Cursor::new(&[0, 1, 2]);
        assert!(matches!(
            buf.read_i32(),
            Err(DecodeError::TruncatedInput { needed: 4, remaining: 3 })
        ));
        assert_eq!(buf.remaining(), 3);
        assert_eq!(buf.read_i16().unwrap(), 1);
        assert!(buf.read_bytes(2).is_err());
        assert_eq!(buf.read_bytes(1).unwrap(), &[2]);
    }

    #[test]
    fn split_advances_parent() {
        let mut buf = Cursor::new(b"abcdef");
        let mut head = buf.split_to(4).unwrap();
        assert_eq!(head.read_bytes(1).unwrap(), b"a");
        assert_eq!(buf.read_bytes(2).unwrap(), b"ef");
    }

    #[test]
    fn null_len() {
        assert_eq!(WireValue::new(23, None).len(), -1);
        assert_eq!(WireValue::new(23, Some(&[0; 4])).len(), 4);
        assert_eq!(WireValue::new(23, Some(&[])).len(), 0);
    }

    #[test]
    fn len_saturates() {
        assert_eq!(wire_len(i32::MAX as usize), i32::MAX);
        assert_eq!(wire_len(i32::MAX as usize + 1), i32::MAX);
        assert_eq!(wire_len(usize::MAX), i32::MAX);
    }
}
