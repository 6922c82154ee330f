//! Column name storage and diagnostic macros.
mod bytestr;
pub use bytestr::ByteStr;

/// Decode trace, compiled only with the `verbose` feature.
macro_rules! verbose {
    ($($tt:tt)*) => {
        #[cfg(feature = "verbose")]
        tracing::trace!($($tt)*)
    };
}

/// Enter a decode span for the rest of the scope, `verbose` feature only.
macro_rules! span {
    ($($tt:tt)*) => {
        #[cfg(feature = "verbose")]
        let span = tracing::trace_span!($($tt)*);
        #[cfg(feature = "verbose")]
        let _entered = span.enter();
    };
}

/// Report a decode failure that is returned to the caller, `log` feature
/// only.
macro_rules! failure {
    ($($tt:tt)*) => {
        #[cfg(feature = "log")]
        log::debug!($($tt)*)
    };
}

pub(crate) use failure;
pub(crate) use span;
pub(crate) use verbose;
