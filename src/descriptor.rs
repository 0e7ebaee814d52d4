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

//! The parsed, fully-resolved record of one `%...X` directive.

use crate::arg::{Length, Type};

/// The five printf flag characters, each independently togglable.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Flags {
    /// `-`: left-justify within the field.
    pub left_justify: bool,
    /// `+`: always show a sign for numeric conversions.
    pub always_sign: bool,
    /// ` `: show a space in place of a sign for non-negative numbers.
    pub space_sign: bool,
    /// `#`: alternate form (`0x`/`0X`/leading `0`).
    pub alternate_form: bool,
    /// `0`: zero-pad instead of space-pad.
    pub zero_pad: bool,
}

/// Where a directive's minimum field width comes from.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum WidthSource {
    /// No width given; field is exactly as wide as its content.
    None,
    /// A literal width written in the template (`%12d`).
    Literal(u32),
    /// `%*d` (sequential) or `%*2$d` spelled `%2$*1$d`-style (positional);
    /// the `Option<usize>` is the 1-based argument slot supplying the
    /// width, present only in positional mode.
    FromArg(Option<usize>),
}

/// Where a directive's precision comes from. Absent and `Literal(0)` are
/// observably different: absent behaves as 1 for integers and "until NUL"
/// for strings, `Literal(0)` means exactly zero digits/bytes.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PrecisionSource {
    /// No `.` clause present.
    Absent,
    /// A literal precision written in the template (`%.5d`).
    Literal(u32),
    /// `%.*d`; the `Option<usize>` is the positional slot in positional
    /// mode.
    FromArg(Option<usize>),
}

/// The parsed record of one `%...X` conversion directive.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Descriptor {
    /// Bytes of the template consumed by this directive, including the
    /// leading `%` but not counting it twice if this engine advances past
    /// it before parsing (see [`crate::parser`]).
    pub consumed: usize,
    /// The five independent flag bits.
    pub flags: Flags,
    /// The resolved minimum field width, in bytes, once indirections
    /// have been fetched. `None` until [`crate::validate::normalize`] runs.
    pub width: u32,
    /// The resolved precision. `None` means "absent" (see
    /// [`PrecisionSource`]); `Some(0)` is a literal zero.
    pub precision: Option<u32>,
    /// Raw width source, prior to indirection fetch/normalization.
    pub width_source: WidthSource,
    /// Raw precision source, prior to indirection fetch/normalization.
    pub precision_source: PrecisionSource,
    /// The length modifier, if any.
    pub length: Option<Length>,
    /// The conversion type.
    pub ty: Type,
    /// 1-based argument index if this directive used `N$`, else `None`
    /// (sequential mode).
    pub position: Option<usize>,
}

impl Descriptor {
    /// A descriptor with all fields at their C `printf` defaults, for the
    /// conversion `ty`. Built incrementally by the parser.
    pub(crate) fn new(ty: Type) -> Self {
        Descriptor {
            consumed: 0,
            flags: Flags::default(),
            width: 0,
            precision: None,
            width_source: WidthSource::None,
            precision_source: PrecisionSource::Absent,
            length: None,
            ty,
            position: None,
        }
    }
}
