//! Query result and its decoding.
//!
//! A [`WireResult`] is decoded into one of three destinations:
//!
//! - [`recv_result`], output slots supplied by the caller
//! - [`recv_result_append`], rows appended to a growable container
//! - [`recv_result_owned`], the result itself, without decoding any row
//!
//! Rows are decoded in order, the first error aborts the remaining rows.
//! Rows decoded before the error stay in the destination.
use bytes::{Buf, Bytes};
use std::fmt;

use crate::{
    common::{ByteStr, failure, span, verbose},
    error::DecodeError,
    ext::BytesExt,
    postgres::{Oid, OidMap, PgFormat},
    row::{FromRow, WireRow},
};

// <https://www.postgresql.org/docs/current/protocol-message-formats.html#PROTOCOL-MESSAGE-FORMATS-ROWDESCRIPTION>
// table_oid
// attribute_len
// oid
// data_type_size
// type_modifier
// format_code
const SUFFIX: usize = size_of::<u32>()
    + size_of::<u16>()
    + size_of::<u32>()
    + size_of::<i16>()
    + size_of::<i32>()
    + size_of::<u16>();

const OID_OFFSET: usize = size_of::<u32>() + size_of::<u16>();

const FORMAT_OFFSET: usize = SUFFIX - size_of::<u16>();

/// Column metadata, shared by all rows of a result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Column {
    name: ByteStr,
    oid: Oid,
    format: PgFormat,
}

impl Column {
    /// Create binary format column.
    pub fn new(name: impl Into<ByteStr>, oid: Oid) -> Self {
        Self { name: name.into(), oid, format: PgFormat::Binary }
    }

    /// Create column with given format.
    pub fn with_format(name: impl Into<ByteStr>, oid: Oid, format: PgFormat) -> Self {
        Self { name: name.into(), oid, format }
    }

    /// Returns column name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns column [`Oid`].
    pub const fn oid(&self) -> Oid {
        self.oid
    }

    /// Returns column transmission format.
    pub const fn format(&self) -> PgFormat {
        self.format
    }
}

/// Query result, rows with their column metadata.
///
/// Values are slices of the received `DataRow` buffers, no value is copied
/// until it is decoded.
#[derive(Default, Clone)]
pub struct WireResult {
    columns: Vec<Column>,
    rows: Vec<Vec<Option<Bytes>>>,
}

impl WireResult {
    /// Create empty result from `RowDescription` message body.
    pub fn from_description(mut body: Bytes) -> Result<Self, DecodeError> {
        let Ok(len) = u16::try_from(body.try_split_to(2)?.get_i16()) else {
            return Err(DecodeError::Malformed("negative RowDescription field count"));
        };

        let mut columns = Vec::with_capacity(len.into());

        for _ in 0..len {
            let name = body.get_nul_bytestr()?;
            let suffix = body.try_split_to(SUFFIX)?;
            let oid = (&mut &suffix[OID_OFFSET..]).get_u32();
            let format = PgFormat::from_code((&mut &suffix[FORMAT_OFFSET..]).get_i16())?;
            columns.push(Column { name, oid, format });
        }

        if !body.is_empty() {
            return Err(DecodeError::Malformed("RowDescription has trailing bytes"));
        }

        verbose!(columns = columns.len(), "RowDescription");

        Ok(Self { columns, rows: vec![] })
    }

    /// Create result from columns and rows of values, [`None`] means `NULL`.
    ///
    /// Every row must have as many values as columns.
    pub fn from_parts(columns: Vec<Column>, rows: Vec<Vec<Option<Bytes>>>) -> Result<Self, DecodeError> {
        if rows.iter().any(|e| e.len() != columns.len()) {
            return Err(DecodeError::Malformed("row length mismatch with column count"));
        }
        Ok(Self { columns, rows })
    }

    /// Append a row from `DataRow` message body.
    pub fn push_data_row(&mut self, mut body: Bytes) -> Result<(), DecodeError> {
        let len = body.try_split_to(2)?.get_i16();
        if usize::try_from(len).ok() != Some(self.columns.len()) {
            return Err(DecodeError::Malformed("DataRow length mismatch with RowDescription"));
        }

        let mut values = Vec::with_capacity(self.columns.len());

        for _ in 0..self.columns.len() {
            let value = match body.try_split_to(4)?.get_i32() {
                -1 => None,
                len => {
                    let Ok(len) = usize::try_from(len) else {
                        return Err(DecodeError::Malformed("negative DataRow value length"));
                    };
                    Some(body.try_split_to(len)?)
                }
            };
            values.push(value);
        }

        if !body.is_empty() {
            return Err(DecodeError::Malformed("DataRow has trailing bytes"));
        }

        self.rows.push(values);
        Ok(())
    }

    /// Returns the column metadata.
    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    /// Returns the number of rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Returns `true` if result contains no rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Returns row at position `idx`.
    pub fn row(&self, idx: usize) -> Option<WireRow<'_>> {
        self.rows.get(idx).map(|e| WireRow::new(&self.columns, e))
    }

    /// Returns an iterator over the rows.
    pub fn rows(&self) -> impl ExactSizeIterator<Item = WireRow<'_>> {
        self.rows.iter().map(|e| WireRow::new(&self.columns, e))
    }

    /// Decode all rows using [`FromRow`] implementation.
    pub fn decode_all<R: FromRow + Default>(&self, oids: &OidMap) -> Result<Vec<R>, DecodeError> {
        let mut output = Vec::with_capacity(self.len());
        recv_result_append(self, oids, &mut output)?;
        Ok(output)
    }
}

impl fmt::Debug for WireResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.rows()).finish()
    }
}

/// Decode each row of `result` into the next slot of `out`.
///
/// `out` must yield at least as many slots as there are rows, otherwise
/// fails with [`DecodeError::CapacityExceeded`] once the slots run out.
/// Use [`recv_result_append`] when the row count is not known upfront.
pub fn recv_result<'o, T, I>(result: &WireResult, oids: &OidMap, out: I) -> Result<(), DecodeError>
where
    T: FromRow + 'o,
    I: IntoIterator<Item = &'o mut T>,
{
    span!("recv_result", rows = result.len(), ty = %T::type_name());

    let mut out = out.into_iter();

    for (nth, row) in result.rows().enumerate() {
        let Some(slot) = out.next() else {
            return Err(DecodeError::CapacityExceeded { rows: result.len(), slots: nth });
        };
        recv_row_logged(nth, &row, oids, slot)?;
    }

    Ok(())
}

/// Decode each row of `result` into a default constructed `T`, then append
/// it into `out`.
pub fn recv_result_append<T, C>(result: &WireResult, oids: &OidMap, out: &mut C) -> Result<(), DecodeError>
where
    T: FromRow + Default,
    C: Extend<T>,
{
    span!("recv_result_append", rows = result.len(), ty = %T::type_name());

    for (nth, row) in result.rows().enumerate() {
        let mut item = T::default();
        recv_row_logged(nth, &row, oids, &mut item)?;
        out.extend(Some(item));
    }

    Ok(())
}

/// Move `result` into `out` as is.
///
/// No row is decoded, for caller that want the raw result itself.
pub fn recv_result_owned(result: WireResult, out: &mut WireResult) {
    verbose!(rows = result.len(), "result moved");
    *out = result;
}

fn recv_row_logged<T: FromRow>(
    _nth: usize,
    row: &WireRow<'_>,
    oids: &OidMap,
    out: &mut T,
) -> Result<(), DecodeError> {
    let result = out.recv_row(row, oids);
    if let Err(_err) = &result {
        failure!("failed to decode row {_nth} into {}: {_err}", T::type_name());
    }
    result
}
