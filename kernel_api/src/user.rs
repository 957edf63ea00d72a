//! Caller-side buffers
//!
//! A driver never writes into caller memory directly. It hands bytes to a
//! [`UserBuffer`], which may refuse them; that refusal is the only way a
//! read can fail after the session has been admitted.

use crate::CopyFault;

/// Destination for bytes delivered by a read
pub trait UserBuffer {
    /// Copies `bytes` to the caller
    ///
    /// Either all of `bytes` is accepted or none of it is.
    fn copy_to_user(&mut self, bytes: &[u8]) -> Result<(), CopyFault>;
}

impl UserBuffer for Vec<u8> {
    fn copy_to_user(&mut self, bytes: &[u8]) -> Result<(), CopyFault> {
        self.extend_from_slice(bytes);
        Ok(())
    }
}

/// Fixed-capacity caller buffer
///
/// Faults once the underlying slice is full, like a copy into a short
/// user-space mapping.
pub struct SliceBuffer<'a> {
    dest: &'a mut [u8],
    filled: usize,
}

impl<'a> SliceBuffer<'a> {
    pub fn new(dest: &'a mut [u8]) -> Self {
        Self { dest, filled: 0 }
    }

    /// Bytes written so far
    pub fn filled(&self) -> &[u8] {
        &self.dest[..self.filled]
    }

    pub fn remaining(&self) -> usize {
        self.dest.len() - self.filled
    }
}

impl UserBuffer for SliceBuffer<'_> {
    fn copy_to_user(&mut self, bytes: &[u8]) -> Result<(), CopyFault> {
        if bytes.len() > self.remaining() {
            return Err(CopyFault { len: bytes.len() });
        }
        let end = self.filled + bytes.len();
        self.dest[self.filled..end].copy_from_slice(bytes);
        self.filled = end;
        Ok(())
    }
}
