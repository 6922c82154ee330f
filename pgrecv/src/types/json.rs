use serde::de::DeserializeOwned;

use crate::{
    DecodeError, DecodeInto,
    postgres::{Oid, OidMap, PgType, oid},
    value::Cursor,
};

const JSONB_VERSION: u8 = 1;

/// Decode postgres `jsonb` value using [`serde_json`].
#[derive(Debug, Default, Clone, PartialEq)]
pub struct Json<T>(pub T);

impl<T> PgType for Json<T> {
    /// jsonb, Binary JSON
    const NAME: &'static str = "jsonb";

    fn accepts(_: &OidMap, id: Oid) -> bool {
        id == oid::JSONB
    }

    fn accepts_array(_: &OidMap, id: Oid) -> bool {
        id == oid::JSONB_ARRAY
    }
}

impl<T: DeserializeOwned> DecodeInto for Json<T> {
    fn recv_into(&mut self, buf: &mut Cursor<'_>, len: usize, _: &OidMap) -> Result<(), DecodeError> {
        let value = buf.read_bytes(len)?;
        let Some((&JSONB_VERSION, json)) = value.split_first() else {
            return Err(DecodeError::Malformed("unsupported jsonb version"));
        };
        self.0 = serde_json::from_slice(json)?;
        Ok(())
    }
}

impl<T> std::ops::Deref for Json<T> {
    type Target = T;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl<T> std::ops::DerefMut for Json<T> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.0
    }
}
