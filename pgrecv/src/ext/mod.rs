use bytes::{Buf, Bytes};

use crate::{common::ByteStr, error::DecodeError};

/// Checked reads on protocol message bodies.
pub trait BytesExt {
    /// Try to split off `len` bytes from the front.
    ///
    /// Returns [`DecodeError::TruncatedInput`] if fewer bytes remain.
    fn try_split_to(&mut self, len: usize) -> Result<Bytes, DecodeError>;

    /// Try to read nul terminated string.
    ///
    /// Using [`ByteStr`] avoid allocating [`Vec`] as it required for [`String::from_utf8`]
    fn get_nul_bytestr(&mut self) -> Result<ByteStr, DecodeError>;
}

/// Helper trait to [`Display`][std::fmt::Display] bytes.
pub trait FmtExt {
    /// Lossy [`Display`][std::fmt::Display] bytes.
    fn lossy(&self) -> LossyFmt<'_>;
}

/// Lossy [`Display`][std::fmt::Display] implementation for bytes.
pub struct LossyFmt<'a>(pub &'a [u8]);

impl BytesExt for Bytes {
    fn try_split_to(&mut self, len: usize) -> Result<Bytes, DecodeError> {
        if self.remaining() < len {
            return Err(DecodeError::TruncatedInput { needed: len, remaining: self.remaining() });
        }
        Ok(self.split_to(len))
    }

    fn get_nul_bytestr(&mut self) -> Result<ByteStr, DecodeError> {
        let end = self
            .iter()
            .position(|e| matches!(e, b'\0'))
            .ok_or(DecodeError::Malformed("string is not nul terminated"))?;
        let me = self.split_to(end);
        Buf::advance(self, 1); // nul
        Ok(ByteStr::from_utf8(me)?)
    }
}

impl FmtExt for [u8] {
    fn lossy(&self) -> LossyFmt<'_> {
        LossyFmt(self)
    }
}

impl std::fmt::Display for LossyFmt<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for &b in self.0 {
            if b.is_ascii_graphic() || b == b' ' {
                write!(f, "{}", b as char)?;
            } else {
                write!(f, "\\x{b:02x}")?;
            }
        }
        Ok(())
    }
}

impl std::fmt::Debug for LossyFmt<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "b\"{self}\"")
    }
}
