use time::{Duration, PrimitiveDateTime, UtcDateTime};

use crate::{
    DecodeError, DecodeInto,
    postgres::{Oid, OidMap, PgType, oid},
    value::Cursor,
};

// 2000-01-01, source: `from_julian_day` docs
const PG_EPOCH_DATE: time::Date = match time::Date::from_julian_day(2_451_545) {
    Ok(ok) => ok,
    Err(_) => panic!("postgres epoch is a valid date"),
};

const PRIMITIVE_PG_EPOCH: PrimitiveDateTime = PrimitiveDateTime::new(PG_EPOCH_DATE, time::Time::MIDNIGHT);

const UTC_PG_EPOCH: UtcDateTime = UtcDateTime::new(PG_EPOCH_DATE, time::Time::MIDNIGHT);

/// Postgres `timestamp`, date and time without time zone.
///
/// Defaults to postgres epoch, `2000-01-01 00:00:00`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Timestamp(pub PrimitiveDateTime);

/// Postgres `timestamptz`, date and time in UTC.
///
/// Defaults to postgres epoch, `2000-01-01 00:00:00 UTC`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct TimestampTz(pub UtcDateTime);

impl Default for Timestamp {
    fn default() -> Self {
        Self(PRIMITIVE_PG_EPOCH)
    }
}

impl Default for TimestampTz {
    fn default() -> Self {
        Self(UTC_PG_EPOCH)
    }
}

impl PgType for Timestamp {
    /// date and time
    const NAME: &'static str = "timestamp";

    fn accepts(_: &OidMap, id: Oid) -> bool {
        id == oid::TIMESTAMP
    }

    fn accepts_array(_: &OidMap, id: Oid) -> bool {
        id == oid::TIMESTAMP_ARRAY
    }
}

impl PgType for TimestampTz {
    /// date and time with timezone
    const NAME: &'static str = "timestamptz";

    fn accepts(_: &OidMap, id: Oid) -> bool {
        id == oid::TIMESTAMPTZ
    }

    fn accepts_array(_: &OidMap, id: Oid) -> bool {
        id == oid::TIMESTAMPTZ_ARRAY
    }
}

/// Microseconds since postgres epoch, `infinity` saturates.
impl DecodeInto for Timestamp {
    const SIZE: Option<usize> = Some(size_of::<i64>());

    fn recv_into(&mut self, buf: &mut Cursor<'_>, _: usize, _: &OidMap) -> Result<(), DecodeError> {
        self.0 = PRIMITIVE_PG_EPOCH.saturating_add(Duration::microseconds(buf.read_i64()?));
        Ok(())
    }
}

impl DecodeInto for TimestampTz {
    const SIZE: Option<usize> = Some(size_of::<i64>());

    fn recv_into(&mut self, buf: &mut Cursor<'_>, _: usize, _: &OidMap) -> Result<(), DecodeError> {
        self.0 = UTC_PG_EPOCH.saturating_add(Duration::microseconds(buf.read_i64()?));
        Ok(())
    }
}

impl std::ops::Deref for Timestamp {
    type Target = PrimitiveDateTime;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl std::ops::Deref for TimestampTz {
    type Target = UtcDateTime;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl From<Timestamp> for PrimitiveDateTime {
    fn from(value: Timestamp) -> Self {
        value.0
    }
}

impl From<TimestampTz> for UtcDateTime {
    fn from(value: TimestampTz) -> Self {
        value.0
    }
}

#[cfg(test)]
mod test {
    use time::Month;

    use super::*;
    use crate::{WireValue, recv::recv_value};

    #[test]
    fn decode_timestamp() {
        // one day and one second after epoch
        let micros = (86_400i64 + 1) * 1_000_000;
        let bytes = micros.to_be_bytes();
        let value = WireValue::new(oid::TIMESTAMP, Some(&bytes));
        let mut out = Timestamp::default();
        recv_value(&value, &OidMap::new(), &mut out).unwrap();
        assert_eq!((out.year(), out.month(), out.day()), (2000, Month::January, 2));
        assert_eq!(out.second(), 1);
    }

    #[test]
    fn decode_timestamptz_before_epoch() {
        let bytes = (-1_000_000i64).to_be_bytes();
        let value = WireValue::new(oid::TIMESTAMPTZ, Some(&bytes));
        let mut out = TimestampTz::default();
        recv_value(&value, &OidMap::new(), &mut out).unwrap();
        assert_eq!((out.year(), out.hour(), out.second()), (1999, 23, 59));
    }

    #[test]
    fn timestamp_size() {
        let value = WireValue::new(oid::TIMESTAMP, Some(&[0u8; 4]));
        assert!(matches!(
            recv_value(&value, &OidMap::new(), &mut Timestamp::default()),
            Err(DecodeError::SizeMismatch { declared: 4, expected: 8 })
        ));

        let value = WireValue::new(oid::TIMESTAMPTZ, Some(&[0u8; 12]));
        assert!(matches!(
            recv_value(&value, &OidMap::new(), &mut TimestampTz::default()),
            Err(DecodeError::SizeMismatch { declared: 12, expected: 8 })
        ));
    }
}
