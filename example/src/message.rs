//! Hand built backend messages, what a connection would have received.
use bytes::{BufMut, Bytes, BytesMut};
use pgrecv::{Oid, Result, WireResult};

/// `RowDescription` body, all columns in binary format.
pub fn description(columns: &[(&str, Oid)]) -> Bytes {
    let mut buf = BytesMut::new();
    buf.put_i16(columns.len() as i16);
    for (name, oid) in columns {
        buf.put_slice(name.as_bytes());
        buf.put_u8(b'\0');
        buf.put_u32(0); // table oid
        buf.put_i16(0); // attribute number
        buf.put_u32(*oid);
        buf.put_i16(-1); // type size
        buf.put_i32(-1); // type modifier
        buf.put_i16(1); // binary
    }
    buf.freeze()
}

/// `DataRow` body.
pub fn data_row(values: &[Option<&[u8]>]) -> Bytes {
    let mut buf = BytesMut::new();
    buf.put_i16(values.len() as i16);
    for value in values {
        match value {
            Some(value) => {
                buf.put_i32(value.len() as i32);
                buf.put_slice(value);
            }
            None => buf.put_i32(-1),
        }
    }
    buf.freeze()
}

/// One dimensional array of `elem` oid.
pub fn array(elem: Oid, values: &[Option<&[u8]>]) -> Vec<u8> {
    let mut buf = BytesMut::new();
    buf.put_i32(1);
    buf.put_i32(values.iter().any(Option::is_none) as i32);
    buf.put_u32(elem);
    buf.put_i32(values.len() as i32);
    buf.put_i32(1);
    for value in values {
        match value {
            Some(value) => {
                buf.put_i32(value.len() as i32);
                buf.put_slice(value);
            }
            None => buf.put_i32(-1),
        }
    }
    buf.to_vec()
}

pub fn result(columns: &[(&str, Oid)], rows: &[&[Option<&[u8]>]]) -> Result<WireResult> {
    let mut result = WireResult::from_description(description(columns))?;
    for row in rows {
        result.push_data_row(data_row(row))?;
    }
    Ok(result)
}
