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

//! The left-to-right render loop.
//!
//! Scans the template once into fragments, decides the argument-delivery
//! discipline once, then walks the fragments left to right: literals and
//! `%%` go straight to the sink, conversions resolve their width/precision
//! indirection, normalize, fetch their value, and emit.

use crate::arg::{Arg, Type};
use crate::argv::{self, Args};
use crate::descriptor::{Descriptor, PrecisionSource, WidthSource};
use crate::error::{FormatError, FormatResult};
use crate::parser::{scan_template, Fragment};
use crate::sink::Sink;
use crate::emit;
use crate::validate;

fn resolve_width(desc: &mut Descriptor, args: &mut Args) -> FormatResult<()> {
    match desc.width_source {
        WidthSource::None => desc.width = 0,
        WidthSource::Literal(v) => desc.width = v,
        WidthSource::FromArg(idx) => {
            let v = args.fetch_index_value(idx)?;
            validate::resolve_signed_width(desc, v);
        }
    }
    Ok(())
}

fn resolve_precision(desc: &mut Descriptor, args: &mut Args) -> FormatResult<()> {
    match desc.precision_source {
        PrecisionSource::Absent => desc.precision = None,
        PrecisionSource::Literal(v) => desc.precision = Some(v),
        PrecisionSource::FromArg(idx) => {
            let v = args.fetch_index_value(idx)?;
            // A negative precision from `*` behaves as if no precision was given.
            desc.precision = if v < 0 { None } else { Some(v as u32) };
        }
    }
    Ok(())
}

fn dispatch(
    sink: &mut Sink,
    written: &mut usize,
    desc: &Descriptor,
    args: &mut Args,
) -> FormatResult<()> {
    match desc.ty {
        Type::D | Type::I => {
            let v = args.fetch_signed(desc.position, desc.length)?;
            emit::integer(sink, written, desc, v.unsigned_abs(), v < 0)
        }
        Type::U | Type::O | Type::X | Type::UpperX => {
            let v = args.fetch_unsigned(desc.position, desc.length)?;
            emit::integer(sink, written, desc, v, false)
        }
        Type::C => {
            let b = args.fetch_char(desc.position)?;
            emit::char_value(sink, written, desc, b)
        }
        Type::S => {
            let s = args.fetch_str(desc.position)?;
            emit::string_value(sink, written, desc, s)
        }
        Type::P => {
            let p = args.fetch_ptr(desc.position)?;
            emit::pointer_value(sink, written, desc, p)
        }
        Type::N => {
            let target = args
                .fetch_count_target(desc.position)?
                .ok_or(FormatError::NullCountTarget)?;
            emit::count(target, *written);
            Ok(())
        }
        other => unreachable!("{other:?} must have been rejected by validate::normalize"),
    }
}

/// Renders `template` against `args` into `sink`, consuming it, and returns
/// the number of characters that *would* have been written (the `printf`
/// return-value convention) along with any owned buffer the sink produced.
pub fn render<'a>(
    template: &str,
    args: &'a [Arg<'a>],
    mut sink: Sink<'a>,
) -> FormatResult<(usize, Option<Vec<u8>>)> {
    log::debug!("rendering template of {} bytes against {} args", template.len(), args.len());

    let fragments = scan_template(template)?;
    let mode = argv::plan(&fragments).inspect_err(|e| {
        log::warn!("positional plan rejected template {template:?}: {e}");
    })?;
    let mut cursor = Args::new(args, mode);
    let mut written = 0usize;

    for fragment in &fragments {
        match fragment {
            Fragment::Literal(text) => {
                for &b in text.as_bytes() {
                    sink.push(&mut written, b)?;
                }
            }
            Fragment::Percent => {
                sink.push(&mut written, b'%')?;
            }
            Fragment::Conversion(parsed) => {
                let mut desc = *parsed;
                resolve_width(&mut desc, &mut cursor)?;
                resolve_precision(&mut desc, &mut cursor)?;
                validate::normalize(&mut desc)?;
                dispatch(&mut sink, &mut written, &desc, &mut cursor).inspect_err(|e| {
                    log::warn!("dispatch failed for {:?} directive: {e}", desc.ty);
                })?;
            }
        }
    }

    let buffer = sink.finish(written)?;
    log::debug!("render produced {written} characters");
    Ok((written, buffer))
}
