//! Value decoding.
//!
//! - [`DecodeInto`]
//! - [`recv`]
//! - [`recv_value`]
//!
//! Decoding writes into a caller owned target instead of constructing a new
//! value, containers are grown only as much as the wire demands.
//!
//! # Array
//!
//! Binary array layout:
//!
//! ```text
//! ┏━━━━━━┳━━━━━━━━━━┳━━━━━━━━━━┳━━━━━━━┳━━━━━━━━━━━━━┳━━━━━┳━━━━━━━━━┓
//! ┃ ndim ┃ has_null ┃ elemtype ┃ count ┃ lower_bound ┃ len ┃  bytes  ┃ ..
//! ┣━━━━━━╋━━━━━━━━━━╋━━━━━━━━━━╋━━━━━━━╋━━━━━━━━━━━━━╋━━━━━╋━━━━━━━━━┫
//! ┃ i32  ┃   i32    ┃   u32    ┃  i32  ┃     i32     ┃ i32 ┃ [u8;len]┃ ..
//! ┗━━━━━━┻━━━━━━━━━━┻━━━━━━━━━━┻━━━━━━━┻━━━━━━━━━━━━━┻━━━━━┻━━━━━━━━━┛
//! ```
//!
//! Only a single dimension is supported, and the lower bound is ignored.
use bytes::Bytes;

use crate::{
    common::verbose,
    error::DecodeError,
    postgres::{OidMap, PgFormat, PgType},
    value::{Cursor, WireValue},
};

/// A type that can be decoded from postgres binary format in place.
///
/// Implementing this trait is how user types are supported. `buf` holds
/// exactly the `len` bytes of the value, an implementation must read all of
/// them, leftover bytes are rejected by [`recv`].
///
/// ```
/// use pgrecv::{Cursor, DecodeError, DecodeInto, Oid, OidMap, PgType};
///
/// /// `point`, two `float8`
/// #[derive(Default)]
/// struct Point {
///     x: f64,
///     y: f64,
/// }
///
/// impl PgType for Point {
///     const NAME: &'static str = "point";
///
///     fn accepts(_: &OidMap, oid: Oid) -> bool {
///         oid == 600
///     }
///
///     fn accepts_array(_: &OidMap, oid: Oid) -> bool {
///         oid == 1017
///     }
/// }
///
/// impl DecodeInto for Point {
///     const SIZE: Option<usize> = Some(16);
///
///     fn recv_into(&mut self, buf: &mut Cursor, _: usize, _: &OidMap) -> Result<(), DecodeError> {
///         self.x = buf.read_f64()?;
///         self.y = buf.read_f64()?;
///         Ok(())
///     }
/// }
/// ```
pub trait DecodeInto: PgType {
    /// Statically known encoded size, [`None`] for variable length type.
    const SIZE: Option<usize> = None;

    /// Decode `len` bytes from `buf` into self.
    ///
    /// When [`SIZE`][DecodeInto::SIZE] is [`Some`], `len` is already
    /// checked to be equal.
    fn recv_into(&mut self, buf: &mut Cursor<'_>, len: usize, oids: &OidMap) -> Result<(), DecodeError>;

    /// Decode `NULL` into self.
    ///
    /// The default implementation returns [`DecodeError::UnexpectedNull`].
    fn recv_null(&mut self) -> Result<(), DecodeError> {
        Err(DecodeError::UnexpectedNull)
    }
}

/// Decode `len` bytes from `buf` into `out`.
///
/// `buf` is advanced by exactly `len` bytes once the size check pass, and
/// `out` only sees those bytes. Fails with [`DecodeError::SizeMismatch`] if
/// `T` has fixed size other than `len`, and with [`DecodeError::Malformed`]
/// if `out` does not read the whole span.
pub fn recv<T: DecodeInto>(
    buf: &mut Cursor<'_>,
    len: usize,
    oids: &OidMap,
    out: &mut T,
) -> Result<(), DecodeError> {
    if let Some(expected) = T::SIZE {
        if len != expected {
            return Err(DecodeError::SizeMismatch { declared: len, expected });
        }
    }
    let mut span = buf.split_to(len)?;
    out.recv_into(&mut span, len, oids)?;
    if !span.is_empty() {
        verbose!(trailing = span.remaining(), ty = %T::type_name(), "value not fully read");
        return Err(DecodeError::Malformed("value has trailing bytes"));
    }
    Ok(())
}

/// Decode a [`WireValue`] into `out`.
///
/// The value oid is checked before any byte is read, fails with
/// [`DecodeError::OidTypeMismatch`] if `T` does not accept it.
pub fn recv_value<T: DecodeInto>(
    value: &WireValue<'_>,
    oids: &OidMap,
    out: &mut T,
) -> Result<(), DecodeError> {
    if !T::accepts(oids, value.oid()) {
        verbose!(oid = value.oid(), ty = %T::type_name(), "oid rejected");
        return Err(DecodeError::OidTypeMismatch { oid: value.oid(), type_name: T::type_name() });
    }
    if value.format() != PgFormat::Binary {
        return Err(DecodeError::Malformed("text format value is not supported"));
    }
    match value.as_slice() {
        Some(bytes) => recv(&mut Cursor::new(bytes), bytes.len(), oids, out),
        None => out.recv_null(),
    }
}

macro_rules! primitive {
    ($($ty:ty => $read:ident),* $(,)?) => {$(
        impl DecodeInto for $ty {
            const SIZE: Option<usize> = Some(size_of::<$ty>());

            fn recv_into(&mut self, buf: &mut Cursor<'_>, _: usize, _: &OidMap) -> Result<(), DecodeError> {
                *self = buf.$read()?;
                Ok(())
            }
        }
    )*};
}

primitive! {
    i8 => read_i8,
    i16 => read_i16,
    i32 => read_i32,
    i64 => read_i64,
    u32 => read_u32,
    f32 => read_f32,
    f64 => read_f64,
}

impl DecodeInto for bool {
    const SIZE: Option<usize> = Some(1);

    fn recv_into(&mut self, buf: &mut Cursor<'_>, _: usize, _: &OidMap) -> Result<(), DecodeError> {
        *self = buf.read_u8()? != 0;
        Ok(())
    }
}

impl DecodeInto for String {
    fn recv_into(&mut self, buf: &mut Cursor<'_>, len: usize, _: &OidMap) -> Result<(), DecodeError> {
        let string = std::str::from_utf8(buf.read_bytes(len)?)?;
        self.clear();
        self.push_str(string);
        Ok(())
    }
}

impl DecodeInto for Bytes {
    fn recv_into(&mut self, buf: &mut Cursor<'_>, len: usize, _: &OidMap) -> Result<(), DecodeError> {
        *self = Bytes::copy_from_slice(buf.read_bytes(len)?);
        Ok(())
    }
}

impl<T: DecodeInto + Default> DecodeInto for Option<T> {
    fn recv_into(&mut self, buf: &mut Cursor<'_>, len: usize, oids: &OidMap) -> Result<(), DecodeError> {
        recv(buf, len, oids, self.get_or_insert_with(T::default))
    }

    fn recv_null(&mut self) -> Result<(), DecodeError> {
        *self = None;
        Ok(())
    }
}

/// Array element header and length prefix.
const ARRAY_HEADER: usize = size_of::<i32>() * 3;
const ELEMENT_PREFIX: usize = size_of::<i32>();

impl<T: DecodeInto + Default> DecodeInto for Vec<T> {
    fn recv_into(&mut self, buf: &mut Cursor<'_>, _: usize, oids: &OidMap) -> Result<(), DecodeError> {
        if buf.remaining() < ARRAY_HEADER {
            return Err(DecodeError::TruncatedInput { needed: ARRAY_HEADER, remaining: buf.remaining() });
        }
        let ndim = buf.read_i32()?;
        let _has_null = buf.read_i32()?;
        let elemtype = buf.read_u32()?;

        verbose!(ndim, elemtype, "array header");

        if !(0..=1).contains(&ndim) {
            return Err(DecodeError::UnsupportedDimensionality(ndim));
        }

        if !T::accepts(oids, elemtype) {
            return Err(DecodeError::OidMismatch { oid: elemtype, type_name: Self::type_name() });
        }

        self.clear();

        if ndim == 0 {
            return Ok(());
        }

        let count = buf.read_i32()?;
        let _lower_bound = buf.read_i32()?;

        let Ok(count) = usize::try_from(count) else {
            return Err(DecodeError::Malformed("negative array length"));
        };

        // every element carry at least its length prefix
        if buf.remaining() / ELEMENT_PREFIX < count {
            return Err(DecodeError::TruncatedInput {
                needed: count.saturating_mul(ELEMENT_PREFIX),
                remaining: buf.remaining(),
            });
        }

        self.resize_with(count, T::default);

        for item in self.iter_mut() {
            let len = buf.read_i32()?;
            if len == -1 {
                return Err(match T::NULLABLE {
                    true => DecodeError::NullArrayElementUnsupported,
                    false => DecodeError::UnexpectedNull,
                });
            }
            if T::NULLABLE {
                return Err(DecodeError::NullArrayElementUnsupported);
            }
            let Ok(len) = usize::try_from(len) else {
                return Err(DecodeError::Malformed("negative array element length"));
            };
            recv(buf, len, oids, item)?;
        }

        Ok(())
    }
}
