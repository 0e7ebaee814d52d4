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

//! A from-scratch reimplementation of the POSIX `printf` format-directive
//! engine: the `%...X` grammar, sequential and positional argument
//! delivery, and the four classic sink flavors (`printf`, `fprintf`,
//! `sprintf`/`snprintf`, `asprintf`, `dprintf`).
//!
//! C's variadic `...`/`va_list` has no stable equivalent in Rust, so every
//! entry point here takes an explicit [`Arg`] slice in place of a variadic
//! argument pack. Because of that, the `v`-prefixed entry points
//! (`vprintf`, `vfprintf`, ...) carry no distinct behavior from their plain
//! counterparts — in C they differ only in accepting a `va_list` instead of
//! `...`, and both already collapse onto the same `&[Arg]` here. They are
//! kept as aliases so the familiar C surface is still present.
//!
//! Floating-point (`f F e E g G a A`) and wide-character (`lc`/`ls`)
//! conversions are recognized by the grammar but always rejected with
//! [`FormatError::FloatingPointUnsupported`] / [`FormatError::WideCharUnsupported`].
//!
//! Two layers are exposed for every entry point. The `try_`-prefixed
//! functions are the engine layer: they return `FormatResult<T>` so a
//! caller can inspect exactly why a template was rejected. The plain names
//! (`printf`, `fprintf`, `sprintf`, `snprintf`, `dprintf` and their `v`
//! aliases) are a thin outermost wrapper collapsing that `Result` onto the
//! familiar C return convention — `-1` (as `isize`) on failure. `asprintf`
//! collapses onto `Option<Vec<u8>>`, returning `None` on failure instead of
//! a sentinel integer, since there is no count to report.

mod arg;
mod argv;
mod descriptor;
mod emit;
mod engine;
mod error;
mod parser;
mod sink;
mod validate;

pub use arg::{Arg, CountTarget, Length, Type};
pub use error::{FormatError, FormatResult};

use std::io::{self, Write};
use std::os::fd::RawFd;

use sink::Sink;

/// Options for the `dprintf` family, governing how a short or interrupted
/// raw-descriptor write is handled.
#[derive(Clone, Copy, Debug, Default)]
pub struct DprintfOptions {
    /// If true, a short write (or a write interrupted by a signal) is
    /// retried rather than treated as [`FormatError::SinkWriteFailed`].
    pub retry_on_short_write: bool,
}

/// Writes `template` formatted with `args` to standard output, returning
/// `FormatResult` rather than collapsing failure to a sentinel.
pub fn try_printf(template: &str, args: &[Arg]) -> FormatResult<usize> {
    try_fprintf(&mut io::stdout().lock(), template, args)
}

/// Alias of [`try_printf`]; see the module documentation for why the `v`
/// variants have no distinct behavior here.
pub fn try_vprintf(template: &str, args: &[Arg]) -> FormatResult<usize> {
    try_printf(template, args)
}

/// Writes `template` formatted with `args` to `w`, returning `FormatResult`
/// rather than collapsing failure to a sentinel.
pub fn try_fprintf(w: &mut dyn Write, template: &str, args: &[Arg]) -> FormatResult<usize> {
    let sink = Sink::stream(w);
    let (written, _) = engine::render(template, args, sink)?;
    Ok(written)
}

/// Alias of [`try_fprintf`].
pub fn try_vfprintf(w: &mut dyn Write, template: &str, args: &[Arg]) -> FormatResult<usize> {
    try_fprintf(w, template, args)
}

/// Writes `template` formatted with `args` into `buf`, using the whole
/// buffer as the character limit (the safe-Rust equivalent of `sprintf`,
/// which in C trusts the caller to have sized `buf` correctly). Always
/// NUL-terminates within `buf`. Returns `FormatResult` rather than
/// collapsing failure to a sentinel.
pub fn try_sprintf(buf: &mut [u8], template: &str, args: &[Arg]) -> FormatResult<usize> {
    let limit = buf.len();
    try_snprintf(buf, limit, template, args)
}

/// Alias of [`try_sprintf`].
pub fn try_vsprintf(buf: &mut [u8], template: &str, args: &[Arg]) -> FormatResult<usize> {
    try_sprintf(buf, template, args)
}

/// Writes `template` formatted with `args` into `buf`, writing at most
/// `limit` characters including the NUL terminator (`limit` is clamped to
/// `buf.len()` regardless of what the caller passes, since this API can't
/// honor a limit larger than the buffer it's given). Returns the number of
/// characters a sufficiently large buffer would have required, per the
/// `snprintf` return-value convention, wrapped in `FormatResult` rather
/// than collapsed to a sentinel.
pub fn try_snprintf(
    buf: &mut [u8],
    limit: usize,
    template: &str,
    args: &[Arg],
) -> FormatResult<usize> {
    let limit = limit.min(buf.len());
    let sink = Sink::fixed_buffer(buf, limit);
    let (written, _) = engine::render(template, args, sink)?;
    Ok(written)
}

/// Alias of [`try_snprintf`].
pub fn try_vsnprintf(
    buf: &mut [u8],
    limit: usize,
    template: &str,
    args: &[Arg],
) -> FormatResult<usize> {
    try_snprintf(buf, limit, template, args)
}

/// Renders `template` formatted with `args` into a freshly allocated,
/// NUL-terminated buffer. Returns `FormatResult` rather than collapsing
/// failure to `None`.
pub fn try_asprintf(template: &str, args: &[Arg]) -> FormatResult<Vec<u8>> {
    let sink = Sink::growable_buffer();
    let (_, buffer) = engine::render(template, args, sink)?;
    Ok(buffer.expect("growable buffer sink always returns Some"))
}

/// Alias of [`try_asprintf`].
pub fn try_vasprintf(template: &str, args: &[Arg]) -> FormatResult<Vec<u8>> {
    try_asprintf(template, args)
}

/// Writes `template` formatted with `args` directly to the raw file
/// descriptor `fd`, bypassing any buffered `std::io` wrapper. Returns
/// `FormatResult` rather than collapsing failure to a sentinel.
pub fn try_dprintf(
    fd: RawFd,
    options: DprintfOptions,
    template: &str,
    args: &[Arg],
) -> FormatResult<usize> {
    let sink = Sink::descriptor(fd, options.retry_on_short_write);
    let (written, _) = engine::render(template, args, sink)?;
    Ok(written)
}

/// Alias of [`try_dprintf`].
pub fn try_vdprintf(
    fd: RawFd,
    options: DprintfOptions,
    template: &str,
    args: &[Arg],
) -> FormatResult<usize> {
    try_dprintf(fd, options, template, args)
}

/// `c_int`-flavored outermost wrapper: collapses [`try_printf`]'s
/// `FormatResult` onto the C return convention, `-1` on failure.
pub fn printf(template: &str, args: &[Arg]) -> isize {
    sentinel(try_printf(template, args))
}

/// Alias of [`printf`].
pub fn vprintf(template: &str, args: &[Arg]) -> isize {
    printf(template, args)
}

/// `c_int`-flavored outermost wrapper: collapses [`try_fprintf`]'s
/// `FormatResult` onto the C return convention, `-1` on failure.
pub fn fprintf(w: &mut dyn Write, template: &str, args: &[Arg]) -> isize {
    sentinel(try_fprintf(w, template, args))
}

/// Alias of [`fprintf`].
pub fn vfprintf(w: &mut dyn Write, template: &str, args: &[Arg]) -> isize {
    fprintf(w, template, args)
}

/// `c_int`-flavored outermost wrapper: collapses [`try_sprintf`]'s
/// `FormatResult` onto the C return convention, `-1` on failure.
pub fn sprintf(buf: &mut [u8], template: &str, args: &[Arg]) -> isize {
    sentinel(try_sprintf(buf, template, args))
}

/// Alias of [`sprintf`].
pub fn vsprintf(buf: &mut [u8], template: &str, args: &[Arg]) -> isize {
    sprintf(buf, template, args)
}

/// `c_int`-flavored outermost wrapper: collapses [`try_snprintf`]'s
/// `FormatResult` onto the C return convention, `-1` on failure.
pub fn snprintf(buf: &mut [u8], limit: usize, template: &str, args: &[Arg]) -> isize {
    sentinel(try_snprintf(buf, limit, template, args))
}

/// Alias of [`snprintf`].
pub fn vsnprintf(buf: &mut [u8], limit: usize, template: &str, args: &[Arg]) -> isize {
    snprintf(buf, limit, template, args)
}

/// Outermost wrapper: collapses [`try_asprintf`]'s `FormatResult` onto
/// `None` on failure, since there is no C-style count to report here.
pub fn asprintf(template: &str, args: &[Arg]) -> Option<Vec<u8>> {
    try_asprintf(template, args).ok()
}

/// Alias of [`asprintf`].
pub fn vasprintf(template: &str, args: &[Arg]) -> Option<Vec<u8>> {
    asprintf(template, args)
}

/// `c_int`-flavored outermost wrapper: collapses [`try_dprintf`]'s
/// `FormatResult` onto the C return convention, `-1` on failure.
pub fn dprintf(fd: RawFd, options: DprintfOptions, template: &str, args: &[Arg]) -> isize {
    sentinel(try_dprintf(fd, options, template, args))
}

/// Alias of [`dprintf`].
pub fn vdprintf(fd: RawFd, options: DprintfOptions, template: &str, args: &[Arg]) -> isize {
    dprintf(fd, options, template, args)
}

fn sentinel(result: FormatResult<usize>) -> isize {
    match result {
        Ok(written) => written as isize,
        Err(e) => {
            log::warn!("collapsing to C-ABI sentinel: {e}");
            -1
        }
    }
}
