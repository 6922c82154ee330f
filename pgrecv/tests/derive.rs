#![cfg(feature = "macros")]
use bytes::Bytes;
use pgrecv::{
    Decode, DecodeError, FromRow, OidMap, PgType, WireResult,
    postgres::oid,
    result::{Column, recv_result_append},
};

#[derive(Debug, Default, PartialEq, FromRow)]
struct User {
    id: i32,
    name: String,
}

#[derive(Debug, Default, PartialEq, FromRow)]
struct Renamed {
    #[row(rename = "user_id")]
    id: i32,
    r#type: String,
}

#[derive(Debug, Default, PartialEq, FromRow)]
struct Pair(i64, Option<String>);

#[derive(Debug, Default, PartialEq, Decode)]
struct UserId(i32);

#[derive(Debug, Default, PartialEq, Decode)]
struct Wrapper<T> {
    inner: T,
}

#[derive(Debug, Default, FromRow)]
struct Typed {
    id: UserId,
    ids: Vec<UserId>,
    score: Wrapper<f64>,
}

fn int4(v: i32) -> Option<Bytes> {
    Some(Bytes::copy_from_slice(&v.to_be_bytes()))
}

fn text(v: &'static str) -> Option<Bytes> {
    Some(Bytes::from_static(v.as_bytes()))
}

fn single_row(columns: Vec<Column>, values: Vec<Option<Bytes>>) -> WireResult {
    WireResult::from_parts(columns, vec![values]).unwrap()
}

#[test]
fn named_any_order() {
    let result = single_row(
        vec![Column::new("name", oid::TEXT), Column::new("id", oid::INT4)],
        vec![text("foo"), int4(7)],
    );
    let users = result.decode_all::<User>(&OidMap::new()).unwrap();
    assert_eq!(users, [User { id: 7, name: "foo".into() }]);
}

#[test]
fn named_rename_and_raw_ident() {
    let result = single_row(
        vec![Column::new("type", oid::VARCHAR), Column::new("user_id", oid::INT4)],
        vec![text("admin"), int4(1)],
    );
    let rows = result.decode_all::<Renamed>(&OidMap::new()).unwrap();
    assert_eq!(rows, [Renamed { id: 1, r#type: "admin".into() }]);
}

#[test]
fn named_column_not_found() {
    let result = single_row(
        vec![Column::new("Id", oid::INT4), Column::new("name", oid::TEXT)],
        vec![int4(7), text("foo")],
    );
    let err = result.decode_all::<User>(&OidMap::new()).unwrap_err();
    match err {
        DecodeError::ColumnNotFound { name, type_name } => {
            assert_eq!(name, "id");
            assert_eq!(type_name, "User");
        }
        err => panic!("unexpected error: {err}"),
    }
}

#[test]
fn named_arity_checked_first() {
    let result = single_row(
        vec![Column::new("id", oid::INT4)],
        vec![int4(7)],
    );
    let mut user = User { id: 0, name: "untouched".into() };
    let row = result.row(0).unwrap();
    let err = pgrecv::row::FromRow::recv_row(&mut user, &row, &OidMap::new()).unwrap_err();
    assert!(matches!(err, DecodeError::RowArityMismatch { row: 1, expected: 2, ref type_name } if type_name == "User"));
    assert_eq!(user, User { id: 0, name: "untouched".into() });
}

#[test]
fn tuple_struct_positional() {
    let result = WireResult::from_parts(
        vec![Column::new("a", oid::INT8), Column::new("b", oid::TEXT)],
        vec![
            vec![Some(Bytes::copy_from_slice(&9i64.to_be_bytes())), None],
            vec![Some(Bytes::copy_from_slice(&1i64.to_be_bytes())), text("x")],
        ],
    )
    .unwrap();

    let mut out = Vec::new();
    recv_result_append::<Pair, _>(&result, &OidMap::new(), &mut out).unwrap();
    assert_eq!(out, [Pair(9, None), Pair(1, Some("x".into()))]);
}

#[test]
fn tuple_struct_oid_mismatch() {
    let result = single_row(
        vec![Column::new("a", oid::INT4), Column::new("b", oid::TEXT)],
        vec![int4(9), text("x")],
    );
    let err = result.decode_all::<Pair>(&OidMap::new()).unwrap_err();
    assert!(matches!(err, DecodeError::OidTypeMismatch { oid: oid::INT4, .. }));
}

#[test]
fn newtype_delegates() {
    assert_eq!(UserId::NAME, "UserId");
    assert!(UserId::accepts(&OidMap::new(), oid::INT4));
    assert!(UserId::accepts_array(&OidMap::new(), oid::INT4_ARRAY));
    assert!(!UserId::accepts(&OidMap::new(), oid::INT8));
    assert!(!<Wrapper<Option<i32>> as PgType>::accepts(&OidMap::new(), oid::TEXT));
    assert!(<Wrapper<Option<i32>> as PgType>::NULLABLE);
}

#[test]
fn newtype_in_row() {
    let mut array = Vec::new();
    array.extend_from_slice(&1i32.to_be_bytes()); // dimension
    array.extend_from_slice(&0i32.to_be_bytes()); // has null
    array.extend_from_slice(&oid::INT4.to_be_bytes());
    array.extend_from_slice(&2i32.to_be_bytes()); // length
    array.extend_from_slice(&1i32.to_be_bytes()); // lower bound
    for v in [3i32, 4] {
        array.extend_from_slice(&4i32.to_be_bytes());
        array.extend_from_slice(&v.to_be_bytes());
    }

    let result = single_row(
        vec![
            Column::new("score", oid::FLOAT8),
            Column::new("ids", oid::INT4_ARRAY),
            Column::new("id", oid::INT4),
        ],
        vec![
            Some(Bytes::copy_from_slice(&1.5f64.to_be_bytes())),
            Some(array.into()),
            int4(42),
        ],
    );

    let rows = result.decode_all::<Typed>(&OidMap::new()).unwrap();
    assert_eq!(rows[0].id, UserId(42));
    assert_eq!(rows[0].ids, [UserId(3), UserId(4)]);
    assert_eq!(rows[0].score, Wrapper { inner: 1.5 });
}

#[derive(Debug, Default, PartialEq)]
enum Mood {
    #[default]
    Ok,
    Happy,
}

impl PgType for Mood {
    const NAME: &'static str = "mood";

    fn accepts(oids: &OidMap, oid: pgrecv::Oid) -> bool {
        oids.accepts(Self::NAME, oid)
    }

    fn accepts_array(oids: &OidMap, oid: pgrecv::Oid) -> bool {
        oids.accepts_array(Self::NAME, oid)
    }
}

// enum labels are sent as text
impl pgrecv::DecodeInto for Mood {
    fn recv_into(
        &mut self,
        buf: &mut pgrecv::Cursor<'_>,
        len: usize,
        _: &OidMap,
    ) -> Result<(), DecodeError> {
        *self = match buf.read_bytes(len)? {
            b"ok" => Mood::Ok,
            b"happy" => Mood::Happy,
            _ => return Err(DecodeError::Malformed("unknown mood label")),
        };
        Ok(())
    }
}

#[derive(Debug, Default, FromRow)]
struct Person {
    mood: Wrapper<Mood>,
}

#[test]
fn custom_type_through_registry() {
    let mut oids = OidMap::new();
    oids.register("mood", 70_001, 70_002);

    let result = single_row(vec![Column::new("mood", 70_001)], vec![text("happy")]);
    let rows = result.decode_all::<Person>(&oids).unwrap();
    assert_eq!(rows[0].mood.inner, Mood::Happy);

    let err = result.decode_all::<Person>(&OidMap::new()).unwrap_err();
    assert!(matches!(err, DecodeError::OidTypeMismatch { oid: 70_001, .. }));
}
