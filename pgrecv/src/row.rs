//! Postgres row operation.
//!
//! - [`WireRow`]
//! - [`FromRow`]
//! - [`RecvValue`]
//! - [`recv_positional`]
//! - [`recv_named`]
//!
//! - [`Index`]
//!
//! Structured targets describe their fields with a static table of
//! accessors, either by position or by name:
//!
//! ```
//! use pgrecv::{DecodeError, FromRow, OidMap, row::{RecvValue, WireRow, recv_named}};
//!
//! #[derive(Default)]
//! struct User {
//!     name: String,
//!     age: i32,
//! }
//!
//! impl FromRow for User {
//!     const NAME: &'static str = "User";
//!
//!     fn recv_row(&mut self, row: &WireRow, oids: &OidMap) -> Result<(), DecodeError> {
//!         recv_named(row, oids, Self::type_name, &mut [
//!             ("name", &mut self.name as &mut dyn RecvValue),
//!             ("age", &mut self.age),
//!         ])
//!     }
//! }
//! ```
//!
//! The same implementation is generated by `#[derive(FromRow)]`.
use std::{borrow::Cow, fmt};

use bytes::Bytes;

use crate::{
    common::{span, verbose},
    error::DecodeError,
    ext::FmtExt,
    postgres::{OidMap, PgType},
    recv::{DecodeInto, recv_value},
    result::Column,
    value::WireValue,
};

/// Postgres row, borrowed from a [`WireResult`][crate::WireResult].
#[derive(Clone, Copy)]
pub struct WireRow<'a> {
    columns: &'a [Column],
    values: &'a [Option<Bytes>],
}

impl<'a> WireRow<'a> {
    /// `columns` and `values` must have the same length.
    pub(crate) fn new(columns: &'a [Column], values: &'a [Option<Bytes>]) -> Self {
        debug_assert_eq!(columns.len(), values.len());
        Self { columns, values }
    }

    /// Returns `true` if row contains no columns.
    pub const fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Returns the number of fields/column.
    pub const fn len(&self) -> usize {
        self.values.len()
    }

    /// Returns the column metadata.
    pub const fn columns(&self) -> &'a [Column] {
        self.columns
    }

    /// Returns value at position `idx`.
    pub fn get(&self, idx: usize) -> Option<WireValue<'a>> {
        let column = self.columns.get(idx)?;
        let value = self.values.get(idx)?;
        Some(WireValue::with_format(column.oid(), column.format(), value.as_deref()))
    }

    /// Returns position of the first column named `name`.
    ///
    /// The name must match exactly, no case folding is performed.
    pub fn position(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|e| e.name() == name)
    }

    /// Returns value of the first column named `name`.
    pub fn find(&self, name: &str) -> Option<WireValue<'a>> {
        self.get(self.position(name)?)
    }

    /// Returns an iterator over the values.
    pub fn iter(&self) -> impl ExactSizeIterator<Item = WireValue<'a>> + 'a {
        self.columns
            .iter()
            .zip(self.values)
            .map(|(c, v)| WireValue::with_format(c.oid(), c.format(), v.as_deref()))
    }

    /// Try get and decode column of a builtin type.
    pub fn try_get<T, I>(&self, idx: I) -> Result<T, DecodeError>
    where
        T: DecodeInto + Default,
        I: Index,
    {
        self.try_get_with(idx, &OidMap::new())
    }

    /// Try get and decode column, resolving user defined types with `oids`.
    pub fn try_get_with<T, I>(&self, idx: I, oids: &OidMap) -> Result<T, DecodeError>
    where
        T: DecodeInto + Default,
        I: Index,
    {
        let nth = idx.position::<T>(self)?;
        let value = self.get(nth).ok_or(DecodeError::IndexOutOfBounds(nth))?;
        let mut out = T::default();
        recv_value(&value, oids, &mut out)?;
        Ok(out)
    }

    /// Try decode type using [`FromRow`] implementation.
    pub fn decode<R: FromRow + Default>(&self, oids: &OidMap) -> Result<R, DecodeError> {
        let mut out = R::default();
        out.recv_row(self, oids)?;
        Ok(out)
    }
}

impl fmt::Debug for WireRow<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut dbg = f.debug_map();
        for (column, value) in self.columns.iter().zip(self.values) {
            dbg.key(&column.name());
            match value {
                Some(value) => dbg.value(&value.lossy()),
                None => dbg.value(&format_args!("NULL")),
            };
        }
        dbg.finish()
    }
}

// ===== Traits =====

/// Type that can be decoded from a row.
///
/// A failure on one field leaves the fields decoded before it written.
pub trait FromRow {
    /// Type name, used in error messages.
    const NAME: &'static str;

    /// Type name for error messages, [`NAME`][FromRow::NAME] by default.
    fn type_name() -> Cow<'static, str> {
        Cow::Borrowed(Self::NAME)
    }

    /// Decode row into self.
    fn recv_row(&mut self, row: &WireRow<'_>, oids: &OidMap) -> Result<(), DecodeError>;
}

/// Object safe accessor to a field, used in the field table of [`FromRow`].
///
/// Implemented for every [`DecodeInto`] type.
pub trait RecvValue {
    /// Decode value into self.
    fn recv_value(&mut self, value: &WireValue<'_>, oids: &OidMap) -> Result<(), DecodeError>;
}

impl<T: DecodeInto> RecvValue for T {
    fn recv_value(&mut self, value: &WireValue<'_>, oids: &OidMap) -> Result<(), DecodeError> {
        recv_value(value, oids, self)
    }
}

/// Decode `row` into `fields` by position.
///
/// `type_name` is only called to build an error. Fails with [`DecodeError::RowArityMismatch`] before decoding any field if
/// the row length differ from `fields` length.
pub fn recv_positional(
    row: &WireRow<'_>,
    oids: &OidMap,
    type_name: fn() -> Cow<'static, str>,
    fields: &mut [&mut dyn RecvValue],
) -> Result<(), DecodeError> {
    span!("recv_positional", ty = %type_name());

    if fields.len() != row.len() {
        return Err(DecodeError::RowArityMismatch {
            row: row.len(),
            expected: fields.len(),
            type_name: type_name(),
        });
    }

    for (field, value) in fields.iter_mut().zip(row.iter()) {
        field.recv_value(&value, oids)?;
    }

    Ok(())
}

/// Decode `row` into `fields` by column name.
///
/// Fields are decoded in the given order, each looks up its column by exact
/// name. Fails with [`DecodeError::RowArityMismatch`] before decoding any
/// field if the row length differ from `fields` length, and with
/// [`DecodeError::ColumnNotFound`] if a name is missing from the row.
pub fn recv_named(
    row: &WireRow<'_>,
    oids: &OidMap,
    type_name: fn() -> Cow<'static, str>,
    fields: &mut [(&str, &mut dyn RecvValue)],
) -> Result<(), DecodeError> {
    span!("recv_named", ty = %type_name());

    if fields.len() != row.len() {
        return Err(DecodeError::RowArityMismatch {
            row: row.len(),
            expected: fields.len(),
            type_name: type_name(),
        });
    }

    for (name, field) in fields.iter_mut() {
        let Some(value) = row.find(name) else {
            verbose!(column = %name, "column not found");
            return Err(DecodeError::ColumnNotFound {
                name: Cow::Owned(String::from(*name)),
                type_name: type_name(),
            });
        };
        field.recv_value(&value, oids)?;
    }

    Ok(())
}

/// Zero column row.
impl FromRow for () {
    const NAME: &'static str = "()";

    fn recv_row(&mut self, row: &WireRow<'_>, oids: &OidMap) -> Result<(), DecodeError> {
        recv_positional(row, oids, Self::type_name, &mut [])
    }
}

macro_rules! from_row_tuple {
    ($($t:ident $i:tt),*) => {
        impl<$($t),*> FromRow for ($($t),*,)
        where
            $($t: DecodeInto),*
        {
            const NAME: &'static str = "tuple";

            /// Element type names, e.g. `(int4, text)`.
            fn type_name() -> Cow<'static, str> {
                let names = [$($t::type_name()),*];
                Cow::Owned(format!("({})", names.join(", ")))
            }

            fn recv_row(&mut self, row: &WireRow<'_>, oids: &OidMap) -> Result<(), DecodeError> {
                recv_positional(row, oids, Self::type_name, &mut [$(&mut self.$i),*])
            }
        }
    };
}

from_row_tuple!(T0 0);
from_row_tuple!(T0 0, T1 1);
from_row_tuple!(T0 0, T1 1, T2 2);
from_row_tuple!(T0 0, T1 1, T2 2, T3 3);
from_row_tuple!(T0 0, T1 1, T2 2, T3 3, T4 4);
from_row_tuple!(T0 0, T1 1, T2 2, T3 3, T4 4, T5 5);
from_row_tuple!(T0 0, T1 1, T2 2, T3 3, T4 4, T5 5, T6 6);
from_row_tuple!(T0 0, T1 1, T2 2, T3 3, T4 4, T5 5, T6 6, T7 7);

/// Type that can be used for indexing column.
pub trait Index: Sized + sealed::Sealed {
    /// Returns the column position.
    ///
    /// `T` is the target type, used in error messages.
    fn position<T: PgType>(&self, row: &WireRow<'_>) -> Result<usize, DecodeError>;
}

impl Index for usize {
    fn position<T: PgType>(&self, row: &WireRow<'_>) -> Result<usize, DecodeError> {
        match *self < row.len() {
            true => Ok(*self),
            false => Err(DecodeError::IndexOutOfBounds(*self)),
        }
    }
}

impl Index for &str {
    fn position<T: PgType>(&self, row: &WireRow<'_>) -> Result<usize, DecodeError> {
        row.position(self).ok_or_else(|| DecodeError::ColumnNotFound {
            name: Cow::Owned(String::from(*self)),
            type_name: T::type_name(),
        })
    }
}

mod sealed {
    pub trait Sealed { }
    impl Sealed for usize { }
    impl Sealed for &str { }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::postgres::oid;

    fn columns() -> Vec<Column> {
        vec![Column::new("name", oid::TEXT), Column::new("age", oid::INT4)]
    }

    fn values() -> Vec<Option<Bytes>> {
        vec![
            Some(Bytes::from_static(b"hello")),
            Some(Bytes::copy_from_slice(&42i32.to_be_bytes())),
        ]
    }

    #[derive(Default)]
    struct Person {
        name: String,
        age: i32,
    }

    impl FromRow for Person {
        const NAME: &'static str = "Person";

        fn recv_row(&mut self, row: &WireRow<'_>, oids: &OidMap) -> Result<(), DecodeError> {
            recv_named(row, oids, Self::type_name, &mut [
                ("name", &mut self.name as &mut dyn RecvValue),
                ("age", &mut self.age),
            ])
        }
    }

    /// Same as [`Person`], fields declared in reverse.
    #[derive(Default)]
    struct Reversed {
        age: i32,
        name: String,
    }

    impl FromRow for Reversed {
        const NAME: &'static str = "Reversed";

        fn recv_row(&mut self, row: &WireRow<'_>, oids: &OidMap) -> Result<(), DecodeError> {
            recv_named(row, oids, Self::type_name, &mut [
                ("age", &mut self.age as &mut dyn RecvValue),
                ("name", &mut self.name),
            ])
        }
    }

    #[test]
    fn positional() {
        let (columns, values) = (columns(), values());
        let row = WireRow::new(&columns, &values);
        let out: (String, i32) = row.decode(&OidMap::new()).unwrap();
        assert_eq!(out, (String::from("hello"), 42));
    }

    #[test]
    fn named_ignores_declaration_order() {
        let (columns, values) = (columns(), values());
        let row = WireRow::new(&columns, &values);

        let person: Person = row.decode(&OidMap::new()).unwrap();
        assert_eq!((person.name.as_str(), person.age), ("hello", 42));

        let rev: Reversed = row.decode(&OidMap::new()).unwrap();
        assert_eq!((rev.name.as_str(), rev.age), ("hello", 42));
    }

    #[test]
    fn named_is_exact_match() {
        let columns = vec![Column::new("Name", oid::TEXT), Column::new("age", oid::INT4)];
        let values = values();
        let row = WireRow::new(&columns, &values);

        let mut person = Person::default();
        let err = person.recv_row(&row, &OidMap::new()).unwrap_err();
        assert!(matches!(
            err,
            DecodeError::ColumnNotFound { ref name, ref type_name } if name == "name" && type_name == "Person"
        ));
    }

    #[test]
    fn arity_checked_before_any_field() {
        let columns = vec![
            Column::new("name", oid::TEXT),
            Column::new("age", oid::INT4),
            Column::new("extra", oid::INT4),
        ];
        let mut values = values();
        values.push(Some(Bytes::copy_from_slice(&1i32.to_be_bytes())));
        let row = WireRow::new(&columns, &values);

        let mut out = (String::from("untouched"), 0i32);
        assert!(matches!(
            out.recv_row(&row, &OidMap::new()),
            Err(DecodeError::RowArityMismatch { row: 3, expected: 2, ref type_name }) if type_name == "(text, int4)"
        ));
        assert_eq!(out.0, "untouched");

        let mut person = Person::default();
        assert!(matches!(
            person.recv_row(&row, &OidMap::new()),
            Err(DecodeError::RowArityMismatch { row: 3, expected: 2, .. })
        ));

        // (bool, bool) have nothing to do with text and int4, arity comes first
        let mut out = (false, false);
        assert!(matches!(
            out.recv_row(&row, &OidMap::new()),
            Err(DecodeError::RowArityMismatch { .. })
        ));
    }

    #[test]
    fn partial_mutation_on_error() {
        let (columns, values) = (columns(), values());
        let row = WireRow::new(&columns, &values);

        let mut out = (String::new(), 0i64);
        assert!(matches!(
            out.recv_row(&row, &OidMap::new()),
            Err(DecodeError::OidTypeMismatch { oid: oid::INT4, .. })
        ));
        assert_eq!(out.0, "hello");
        assert_eq!(out.1, 0);
    }

    #[test]
    fn unit_row() {
        let row = WireRow::new(&[], &[]);
        assert!(row.decode::<()>(&OidMap::new()).is_ok());

        let (columns, values) = (columns(), values());
        let row = WireRow::new(&columns, &values);
        assert!(row.decode::<()>(&OidMap::new()).is_err());
    }

    #[test]
    fn try_get() {
        let (columns, values) = (columns(), values());
        let row = WireRow::new(&columns, &values);

        assert_eq!(row.try_get::<i32, _>(1usize).unwrap(), 42);
        assert_eq!(row.try_get::<String, _>("name").unwrap(), "hello");
        assert!(matches!(row.try_get::<i32, _>(2usize), Err(DecodeError::IndexOutOfBounds(2))));
        assert!(matches!(
            row.try_get::<i32, _>("AGE"),
            Err(DecodeError::ColumnNotFound { ref type_name, .. }) if type_name == "int4"
        ));
        assert!(matches!(
            row.try_get::<String, _>(1usize),
            Err(DecodeError::OidTypeMismatch { .. })
        ));
    }

    #[test]
    fn null_column() {
        let columns = columns();
        let values = vec![None, Some(Bytes::copy_from_slice(&1i32.to_be_bytes()))];
        let row = WireRow::new(&columns, &values);

        let out: (Option<String>, i32) = row.decode(&OidMap::new()).unwrap();
        assert_eq!(out, (None, 1));
        assert!(matches!(
            row.decode::<(String, i32)>(&OidMap::new()),
            Err(DecodeError::UnexpectedNull)
        ));
    }

    #[test]
    fn debug_row() {
        let (columns, values) = (columns(), values());
        let row = WireRow::new(&columns, &values);
        assert_eq!(format!("{row:?}"), r#"{"name": b"hello", "age": b"\x00\x00\x00*"}"#);
    }
}
