//! # Stream Cursor
//!
//! Byte-at-a-time sequential read over a session's buffer.
//!
//! Every successful call delivers exactly one byte, however much the
//! caller asked for. Draining an N-byte message therefore takes N calls
//! plus one that reports end-of-stream. Drivers that compute their content
//! lazily rely on this: they regenerate the buffer at the top of every
//! read call, so the cursor must never hand out more than one byte per
//! generation.

use crate::{DeviceError, UserBuffer};

/// Read offset into a session's buffer
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StreamCursor {
    offset: usize,
}

impl StreamCursor {
    pub fn new() -> Self {
        Self { offset: 0 }
    }

    /// Rewinds to the start of the buffer; called once per open
    pub fn reset(&mut self) {
        self.offset = 0;
    }

    pub fn offset(&self) -> usize {
        self.offset
    }

    /// Returns whether the cursor has consumed all of `content`
    pub fn at_end(&self, content: &[u8]) -> bool {
        self.offset >= content.len()
    }

    /// Delivers the byte under the cursor to `dest`
    ///
    /// Returns `Ok(0)` without side effects when `max_len` is zero or the
    /// cursor is at or past the end of `content`. On a copy fault the
    /// offset stays where it was.
    pub fn read_byte(
        &mut self,
        content: &[u8],
        dest: &mut dyn UserBuffer,
        max_len: usize,
    ) -> Result<usize, DeviceError> {
        if max_len == 0 || self.at_end(content) {
            return Ok(0);
        }

        dest.copy_to_user(&content[self.offset..self.offset + 1])?;
        self.offset += 1;
        Ok(1)
    }
}
