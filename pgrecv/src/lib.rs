//! Typed Postgres binary result decoder
//!
//! Decode `RowDescription` and `DataRow` messages received in binary format
//! into statically typed values. Every value oid is checked against the
//! target type before its bytes are read.
//!
//! # Examples
//!
//! ```
//! use bytes::{BufMut, BytesMut};
//! use pgrecv::{OidMap, WireResult, postgres::oid};
//!
//! # fn app() -> pgrecv::Result<()> {
//! let mut description = BytesMut::new();
//! description.put_i16(1);
//! description.put_slice(b"ids\0");
//! description.put_u32(0);
//! description.put_i16(0);
//! description.put_u32(oid::INT4_ARRAY);
//! description.put_i16(-1);
//! description.put_i32(-1);
//! description.put_i16(1);
//!
//! let mut row = BytesMut::new();
//! row.put_i16(1);
//! row.put_i32(28);
//! row.put_i32(1); // dimension
//! row.put_i32(0); // has null
//! row.put_u32(oid::INT4);
//! row.put_i32(1); // length
//! row.put_i32(1); // lower bound
//! row.put_i32(4);
//! row.put_i32(5);
//!
//! let mut result = WireResult::from_description(description.freeze())?;
//! result.push_data_row(row.freeze())?;
//!
//! let rows = result.decode_all::<(Vec<i32>,)>(&OidMap::new())?;
//!
//! assert_eq!(rows, [(vec![5],)]);
//! # Ok(())
//! # }
//! # app().unwrap();
//! ```
//!
//! Named rows with the derive macro:
//!
//! ```
//! # #[cfg(feature = "macros")] {
//! use pgrecv::{FromRow, OidMap, WireResult, result::Column, postgres::oid};
//! use bytes::Bytes;
//!
//! #[derive(Default, FromRow)]
//! struct User {
//!     name: String,
//!     age: i32,
//! }
//!
//! let result = WireResult::from_parts(
//!     vec![Column::new("age", oid::INT4), Column::new("name", oid::TEXT)],
//!     vec![vec![Some(Bytes::from_static(&[0, 0, 0, 42])), Some(Bytes::from_static(b"hello"))]],
//! ).unwrap();
//!
//! let users = result.decode_all::<User>(&OidMap::new()).unwrap();
//!
//! assert_eq!(users[0].name, "hello");
//! assert_eq!(users[0].age, 42);
//! # }
//! ```

pub mod common;
mod ext;

// Protocol
pub mod postgres;

// Decoding
pub mod value;
pub mod recv;
pub mod row;
pub mod result;
pub mod types;

mod error;

pub use value::{Cursor, WireValue};
pub use recv::DecodeInto;
pub use row::{FromRow, WireRow};
pub use result::{Column, WireResult};
pub use postgres::{Oid, OidMap, PgType};
pub use error::{DecodeError, Result};

#[cfg(feature = "macros")]
pub use pgrecv_macros::{Decode, FromRow};
