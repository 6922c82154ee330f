use pgrecv::{
    FromRow, OidMap, Result, WireResult,
    postgres::oid,
    result::{recv_result, recv_result_append, recv_result_owned},
};

use crate::message::result;

#[derive(Debug, Default, FromRow)]
struct Pgrecv {
    id: i32,
    name: String,
}

#[derive(Debug, Default, FromRow)]
struct PgrecvTuple(i32, String);

pub fn main() -> Result<()> {
    let oids = OidMap::new();

    let res = result(
        &[("name", oid::TEXT), ("id", oid::INT4)],
        &[
            &[Some(&b"Deez"[..]), Some(&1i32.to_be_bytes()[..])],
            &[Some(&b"Foo"[..]), Some(&2i32.to_be_bytes()[..])],
        ],
    )?;

    // Named, in any column order

    let mut datas = Vec::new();
    recv_result_append::<Pgrecv, _>(&res, &oids, &mut datas)?;
    assert_eq!(datas[1].name, "Foo");
    tracing::info!(?datas);

    // Positional, into preallocated slots

    let res = result(
        &[("id", oid::INT4), ("name", oid::TEXT)],
        &[
            &[Some(&1i32.to_be_bytes()[..]), Some(&b"Deez"[..])],
            &[Some(&2i32.to_be_bytes()[..]), Some(&b"Foo"[..])],
        ],
    )?;

    let mut slots = [PgrecvTuple::default(), PgrecvTuple::default()];
    recv_result(&res, &oids, &mut slots)?;
    assert_eq!(slots[0].0, 1);

    // Raw result

    let mut raw = WireResult::default();
    recv_result_owned(res, &mut raw);
    tracing::info!(?raw);

    Ok(())
}
