// Copyright 2026 The Pigweed Authors
//
// Licensed under the Apache License, Version 2.0 (the "License"); you may not
// use this file except in compliance with the License. You may obtain a copy of
// the License at
//
//     https://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS, WITHOUT
// WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied. See the
// License for the specific language governing permissions and limitations under
// the License.

//! Output sinks: the four destinations a rendered template can land in.
//!
//! A sink is a single-character write operation plus a running
//! `characters_written` counter. The counter advances on every character
//! the engine would emit, even when a [`Sink::FixedBuffer`] suppresses the
//! actual write because it has hit its limit — this is the `snprintf`
//! return-value convention: the return value is the length a sufficient
//! buffer would have needed.

use std::io::Write;
use std::os::fd::RawFd;

use crate::error::{FormatError, FormatResult};

/// The four sink variants the engine can write into.
pub enum Sink<'a> {
    /// A `std::io::Write` stream (`printf`/`fprintf`).
    Stream(&'a mut dyn Write),
    /// A raw file descriptor (`dprintf`), written via `libc::write`.
    Descriptor {
        /// The descriptor to write to.
        fd: RawFd,
        /// Whether a short (partial, non-error) write should be retried
        /// rather than treated as failure. See [`crate::DprintfOptions`].
        retry_on_short_write: bool,
    },
    /// A caller-provided fixed buffer with an explicit character limit
    /// (`snprintf`/`sprintf`).
    FixedBuffer {
        /// Destination buffer.
        buf: &'a mut [u8],
        /// Next write position within `buf`.
        cursor: usize,
        /// Maximum number of characters (including the reserved NUL
        /// terminator slot) this sink may ever occupy.
        character_limit: usize,
    },
    /// An owned, growable buffer (`asprintf`).
    GrowableBuffer(Vec<u8>),
}

impl<'a> Sink<'a> {
    /// Wraps a stream sink.
    pub fn stream(w: &'a mut dyn Write) -> Self {
        Sink::Stream(w)
    }

    /// Wraps a raw descriptor sink.
    pub fn descriptor(fd: RawFd, retry_on_short_write: bool) -> Self {
        Sink::Descriptor {
            fd,
            retry_on_short_write,
        }
    }

    /// Wraps a fixed-size buffer sink with an explicit character limit.
    pub fn fixed_buffer(buf: &'a mut [u8], character_limit: usize) -> Self {
        Sink::FixedBuffer {
            buf,
            cursor: 0,
            character_limit,
        }
    }

    /// Wraps a fresh growable buffer sink, starting at capacity 16.
    pub fn growable_buffer() -> Self {
        Sink::GrowableBuffer(Vec::with_capacity(16))
    }

    /// Writes one character, updating `characters_written` regardless of
    /// whether the byte was actually stored.
    pub fn push(&mut self, written: &mut usize, c: u8) -> FormatResult<()> {
        match self {
            Sink::Stream(w) => {
                w.write_all(&[c]).map_err(|_| FormatError::SinkWriteFailed)?;
                *written += 1;
                Ok(())
            }
            Sink::Descriptor {
                fd,
                retry_on_short_write,
            } => {
                write_descriptor_byte(*fd, c, *retry_on_short_write)?;
                *written += 1;
                Ok(())
            }
            Sink::FixedBuffer {
                buf,
                cursor,
                character_limit,
            } => {
                if *character_limit == 0 {
                    *written += 1;
                    return Ok(());
                }
                if *written >= *character_limit - 1 {
                    // Past the limit: count it, but leave room for the
                    // terminator by never writing here again.
                    *written += 1;
                    return Ok(());
                }
                buf[*cursor] = c;
                *cursor += 1;
                *written += 1;
                Ok(())
            }
            Sink::GrowableBuffer(vec) => {
                vec.try_reserve(1).map_err(|_| FormatError::AllocationFailed)?;
                vec.push(c);
                *written += 1;
                Ok(())
            }
        }
    }

    /// Finalizes the sink after a successful run: places a NUL terminator
    /// for the buffer variants (fixed buffers only if the limit allows it;
    /// growable buffers always).
    pub fn finish(self, written: usize) -> FormatResult<Option<Vec<u8>>> {
        match self {
            Sink::Stream(_) | Sink::Descriptor { .. } => Ok(None),
            Sink::FixedBuffer {
                buf,
                cursor,
                character_limit,
            } => {
                if character_limit > 0 {
                    buf[cursor.min(character_limit - 1)] = 0;
                }
                Ok(None)
            }
            Sink::GrowableBuffer(mut vec) => {
                debug_assert_eq!(vec.len(), written);
                vec.try_reserve(1)
                    .map_err(|_| FormatError::AllocationFailed)?;
                vec.push(0);
                Ok(Some(vec))
            }
        }
    }
}

fn write_descriptor_byte(fd: RawFd, c: u8, retry_on_short_write: bool) -> FormatResult<()> {
    loop {
        let n = unsafe { libc::write(fd, &c as *const u8 as *const libc::c_void, 1) };
        if n == 1 {
            return Ok(());
        }
        if n < 0 {
            let err = std::io::Error::last_os_error();
            if retry_on_short_write && err.kind() == std::io::ErrorKind::Interrupted {
                continue;
            }
            return Err(FormatError::SinkWriteFailed);
        }
        // n == 0: a short write with no error.
        if retry_on_short_write {
            continue;
        }
        return Err(FormatError::SinkWriteFailed);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fixed_buffer_truncates_and_counts_past_limit() {
        let mut buf = [0u8; 4];
        let mut sink = Sink::fixed_buffer(&mut buf, 4);
        let mut written = 0;
        for c in b"hello" {
            sink.push(&mut written, *c).unwrap();
        }
        sink.finish(written).unwrap();
        assert_eq!(&buf, b"hel\0");
        assert_eq!(written, 5);
    }

    #[test]
    fn fixed_buffer_zero_limit_writes_nothing() {
        let mut buf: [u8; 0] = [];
        let mut sink = Sink::fixed_buffer(&mut buf, 0);
        let mut written = 0;
        sink.push(&mut written, b'x').unwrap();
        assert_eq!(written, 1);
    }

    #[test]
    fn growable_buffer_accumulates_and_terminates() {
        let mut sink = Sink::growable_buffer();
        let mut written = 0;
        for c in b"hi" {
            sink.push(&mut written, *c).unwrap();
        }
        let out = sink.finish(written).unwrap().unwrap();
        assert_eq!(out, b"hi\0");
    }
}
