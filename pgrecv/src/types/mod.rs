//! Type integration with external types
//!
//! Implementation [`PgType`][p] and [`DecodeInto`][d] for external types.
//!
//! Available for:
//!
//! - [`serde`]'s [`Deserialize`][sd] via [`Json`], requires `json` feature
//! - [`time`][::time]'s [`PrimitiveDateTime`][tp], [`UtcDateTime`][tu] via [`Timestamp`] and
//!   [`TimestampTz`], requires `time` feature
//!
//! [p]: crate::PgType
//! [d]: crate::DecodeInto
//! [sd]: serde::Deserialize
//! [tp]: ::time::PrimitiveDateTime
//! [tu]: ::time::UtcDateTime

#[cfg(feature = "json")]
mod json;
#[cfg(feature = "json")]
pub use json::Json;

#[cfg(feature = "time")]
mod time;
#[cfg(feature = "time")]
pub use time::{Timestamp, TimestampTz};
