use std::borrow::Cow;

use bytes::Bytes;

use super::{Oid, OidMap, oid};

/// A type that have corresponding postgres oid.
///
/// This is the compatibility check between a static type and the oid a
/// server reported for a value. A type may accept a set of oids, for
/// example [`String`] accepts `text`, `varchar`, `bpchar` and `name`.
///
/// User defined server types should consult the [`OidMap`]:
///
/// ```
/// use pgrecv::{Oid, OidMap, PgType};
///
/// struct Mood;
///
/// impl PgType for Mood {
///     const NAME: &'static str = "mood";
///
///     fn accepts(oids: &OidMap, oid: Oid) -> bool {
///         oids.accepts(Self::NAME, oid)
///     }
///
///     fn accepts_array(oids: &OidMap, oid: Oid) -> bool {
///         oids.accepts_array(Self::NAME, oid)
///     }
/// }
/// ```
pub trait PgType {
    /// Human readable type name, used in error messages.
    const NAME: &'static str;

    /// Whether the type can represent `NULL`.
    const NULLABLE: bool = false;

    /// Returns `true` if value with given `oid` can be decoded as `Self`.
    fn accepts(oids: &OidMap, oid: Oid) -> bool;

    /// Returns `true` if an array with given `oid` have `Self` as element.
    fn accepts_array(oids: &OidMap, oid: Oid) -> bool;

    /// Type name used in error messages.
    ///
    /// Defaults to [`PgType::NAME`], container types override it to
    /// include their element name.
    fn type_name() -> Cow<'static, str> {
        Cow::Borrowed(Self::NAME)
    }
}

macro_rules! pg_type {
    ($ty:ty, $name:literal, [$($oid:path),*], [$($array:path),*] $(, $doc:literal)? ) => {
        $(#[doc = $doc])?
        impl PgType for $ty {
            const NAME: &'static str = $name;

            fn accepts(_: &OidMap, id: Oid) -> bool {
                matches!(id, $($oid)|*)
            }

            fn accepts_array(_: &OidMap, id: Oid) -> bool {
                matches!(id, $($array)|*)
            }
        }
    };
}

pg_type!(bool, "bool", [oid::BOOL], [oid::BOOL_ARRAY]);
pg_type!(i8, "char", [oid::CHAR], [oid::CHAR_ARRAY], "`\"char\"` single-byte internal type");
pg_type!(i16, "int2", [oid::INT2], [oid::INT2_ARRAY], "`int2` -32 thousand to 32 thousand, 2-byte storage");
pg_type!(i32, "int4", [oid::INT4], [oid::INT4_ARRAY], "`int4` -2 billion to 2 billion integer, 4-byte storage");
pg_type!(i64, "int8", [oid::INT8], [oid::INT8_ARRAY], "`int8` ~18 digit integer, 8-byte storage");
pg_type!(u32, "oid", [oid::OID], [oid::OID_ARRAY], "`oid` object identifier");
pg_type!(f32, "float4", [oid::FLOAT4], [oid::FLOAT4_ARRAY], "`float4` single-precision floating point number, 4-byte storage");
pg_type!(f64, "float8", [oid::FLOAT8], [oid::FLOAT8_ARRAY], "`float8` double-precision floating point number, 8-byte storage");
pg_type!(
    String, "text",
    [oid::TEXT, oid::VARCHAR, oid::BPCHAR, oid::NAME],
    [oid::TEXT_ARRAY, oid::VARCHAR_ARRAY, oid::BPCHAR_ARRAY, oid::NAME_ARRAY],
    "`text` family, the binary representation is the raw string"
);
pg_type!(Bytes, "bytea", [oid::BYTEA], [oid::BYTEA_ARRAY], "`bytea` variable-length binary string");

impl<T: PgType> PgType for Option<T> {
    const NAME: &'static str = T::NAME;

    const NULLABLE: bool = true;

    fn accepts(oids: &OidMap, oid: Oid) -> bool {
        T::accepts(oids, oid)
    }

    fn accepts_array(oids: &OidMap, oid: Oid) -> bool {
        T::accepts_array(oids, oid)
    }

    fn type_name() -> Cow<'static, str> {
        T::type_name()
    }
}

/// Single dimension array of `T`.
impl<T: PgType> PgType for Vec<T> {
    const NAME: &'static str = "anyarray";

    fn accepts(oids: &OidMap, oid: Oid) -> bool {
        T::accepts_array(oids, oid)
    }

    /// Multi dimension arrays are not supported.
    fn accepts_array(_: &OidMap, _: Oid) -> bool {
        false
    }

    fn type_name() -> Cow<'static, str> {
        Cow::Owned(format!("{}[]", T::type_name()))
    }
}
