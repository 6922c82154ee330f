use pgrecv::{
    Decode, DecodeError, OidMap, Result, postgres::oid,
    types::{Json, Timestamp, TimestampTz},
};
use serde::Deserialize;

use crate::message::{array, result};

#[derive(Debug, Default, PartialEq, Decode)]
struct MyId(i32);

#[derive(Debug, Default, Decode)]
struct SomeId<T>(T);

#[derive(Debug, Default, Deserialize, PartialEq, Eq)]
struct Foo {
    id: i32,
}

pub fn main() -> Result<()> {
    let oids = OidMap::new();

    let res = result(&[("null", oid::TEXT)], &[&[None]])?;
    let rows = res.decode_all::<(Option<String>,)>(&oids)?;
    assert!(rows[0].0.is_none());

    let int = 420i32.to_be_bytes();
    let res = result(&[("id", oid::INT4)], &[&[Some(&int[..])]])?;

    let (my_id,) = res.row(0).unwrap().decode::<(MyId,)>(&oids)?;
    assert_eq!(my_id, MyId(420));

    let some_id: SomeId<i32> = res.row(0).unwrap().try_get(0usize)?;
    assert_eq!(some_id.0, 420);

    // wrong type is rejected before reading any byte
    let err = res.row(0).unwrap().try_get::<i64, _>("id").unwrap_err();
    assert!(matches!(err, DecodeError::OidTypeMismatch { .. }));
    tracing::info!("{err}");

    // arrays

    let ids = array(oid::INT4, &[Some(&1i32.to_be_bytes()[..]), Some(&2i32.to_be_bytes()[..])]);
    let res = result(&[("ids", oid::INT4_ARRAY)], &[&[Some(&ids[..])]])?;
    let (ids,): (Vec<MyId>,) = res.row(0).unwrap().decode(&oids)?;
    assert_eq!(ids, [MyId(1), MyId(2)]);

    let with_null = array(oid::INT4, &[Some(&1i32.to_be_bytes()[..]), None]);
    let res = result(&[("ids", oid::INT4_ARRAY)], &[&[Some(&with_null[..])]])?;
    let err = res.decode_all::<(Vec<i32>,)>(&oids).unwrap_err();
    assert!(matches!(err, DecodeError::UnexpectedNull));

    // `time`

    let micros = 86_400_000_000i64.to_be_bytes();
    let res = result(
        &[("local", oid::TIMESTAMP), ("utc", oid::TIMESTAMPTZ)],
        &[&[Some(&micros[..]), Some(&micros[..])]],
    )?;
    let (local, utc): (Timestamp, TimestampTz) = res.row(0).unwrap().decode(&oids)?;
    assert_eq!((local.year(), local.day()), (2000, 2));
    assert_eq!((utc.year(), utc.day()), (2000, 2));

    // `json`

    let json = b"\x01{\"id\":420}";
    let res = result(&[("json", oid::JSONB)], &[&[Some(&json[..])]])?;
    let (Json(json),): (Json<Foo>,) = res.row(0).unwrap().decode(&oids)?;
    assert_eq!(json, Foo { id: 420 });

    Ok(())
}
