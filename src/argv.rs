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

//! The argument vector: sequential and positional argument delivery.
//!
//! C's `va_list` is a forward-only cursor: a positional template can only
//! be served out of order by pre-scanning the whole thing and materializing
//! a heap-backed table up front, then tearing it down on every exit path.
//! Rust's `&[Arg]` is already randomly addressable, so a position reference
//! is simply an index into the caller's slice — no separate owned table,
//! no manual cleanup. What remains genuinely necessary is the *validation*
//! a pre-scan would otherwise perform: every slot in `[1..max_index]` must
//! be referenced, and two references to the same slot must agree on
//! `(length, type)`. That validation is [`plan`].

use std::collections::HashMap;

use crate::arg::{Arg, CountTarget, Length, Type};
use crate::error::{FormatError, FormatResult};
use crate::parser::Fragment;

/// What a positional slot was recorded as: the `(length, type)` tag of
/// whatever last referenced it. A width/precision `*M$` indirection is
/// tagged `Value(None, Type::D)` — a plain `int` — the same tag a genuine
/// `%d`/`%i` reference to that slot gets, so the two are interchangeable
/// rather than spuriously conflicting.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum SlotKind {
    Value(Option<Length>, Type),
}

/// The tag recorded for a `*M$` width/precision indirection slot: always a
/// plain `int`, same as an ordinary `%d`/`%i` value reference.
const INDIRECTION_SLOT: SlotKind = SlotKind::Value(None, Type::D);

/// The argument-delivery discipline a template uses, decided by whether
/// its first directive carries a position.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Mode {
    /// No directive carries `N$`; arguments are consumed in order.
    Sequential,
    /// Every directive carries `N$`; arguments are addressed by index.
    Positional,
}

/// Validates positional usage across an already-scanned template and
/// reports which discipline it uses. Mixing positional and sequential
/// directives, referencing a slot with conflicting types, or leaving a
/// gap in `[1..max_index]` are all hard errors here rather than at first
/// use.
pub fn plan(fragments: &[Fragment]) -> FormatResult<Mode> {
    let mut mode = None;
    let mut slots: HashMap<usize, SlotKind> = HashMap::new();

    for fragment in fragments {
        let Fragment::Conversion(desc) = fragment else {
            continue;
        };
        let is_positional = desc.position.is_some();
        match mode {
            None => mode = Some(is_positional),
            Some(m) if m != is_positional => return Err(FormatError::MixedPositional),
            Some(_) => {}
        }
        if !is_positional {
            continue;
        }

        let mut record = |index: usize, kind: SlotKind| -> FormatResult<()> {
            match slots.get(&index) {
                Some(existing) if *existing != kind => {
                    Err(FormatError::PositionalTypeConflict(index))
                }
                _ => {
                    slots.insert(index, kind);
                    Ok(())
                }
            }
        };

        record(
            desc.position.expect("checked positional above"),
            SlotKind::Value(desc.length, desc.ty),
        )?;
        if let crate::descriptor::WidthSource::FromArg(Some(idx)) = desc.width_source {
            record(idx, INDIRECTION_SLOT)?;
        } else if let crate::descriptor::WidthSource::FromArg(None) = desc.width_source {
            return Err(FormatError::MissingPositionalIndirection);
        }
        if let crate::descriptor::PrecisionSource::FromArg(Some(idx)) = desc.precision_source {
            record(idx, INDIRECTION_SLOT)?;
        } else if let crate::descriptor::PrecisionSource::FromArg(None) = desc.precision_source {
            return Err(FormatError::MissingPositionalIndirection);
        }
    }

    let max_index = slots.keys().copied().max().unwrap_or(0);
    for i in 1..=max_index {
        if !slots.contains_key(&i) {
            return Err(FormatError::PositionalGap(i));
        }
    }

    Ok(match mode {
        Some(true) => Mode::Positional,
        _ => Mode::Sequential,
    })
}

/// A cursor over the caller's argument list, dispatching by [`Mode`].
///
/// In [`Mode::Sequential`], values are popped in order. In
/// [`Mode::Positional`], every fetch is an index into `args`; nothing here
/// advances, since the directive itself names the slot.
pub struct Args<'a> {
    args: &'a [Arg<'a>],
    mode: Mode,
    cursor: usize,
}

impl<'a> Args<'a> {
    /// Builds a cursor over `args` for the given discipline.
    pub fn new(args: &'a [Arg<'a>], mode: Mode) -> Self {
        Args {
            args,
            mode,
            cursor: 0,
        }
    }

    fn resolve(&mut self, position: Option<usize>) -> FormatResult<(&'a Arg<'a>, usize)> {
        match self.mode {
            Mode::Positional => {
                let idx = position.expect("positional mode guarantees a position");
                let arg = self
                    .args
                    .get(idx - 1)
                    .ok_or(FormatError::ArgumentMismatch(idx))?;
                Ok((arg, idx))
            }
            Mode::Sequential => {
                let idx = self.cursor;
                let arg = self
                    .args
                    .get(idx)
                    .ok_or(FormatError::ArgumentMismatch(idx))?;
                self.cursor += 1;
                Ok((arg, idx))
            }
        }
    }

    /// Fetches a plain `int` used for `*`/`.*` width or precision
    /// indirection.
    pub fn fetch_index_value(&mut self, position: Option<usize>) -> FormatResult<i64> {
        let (arg, idx) = self.resolve(position)?;
        match arg {
            Arg::Int(v) => Ok(i64::from(*v)),
            _ => Err(FormatError::ArgumentMismatch(idx)),
        }
    }

    /// Fetches and re-narrows a signed integer value per `length`.
    pub fn fetch_signed(
        &mut self,
        position: Option<usize>,
        length: Option<Length>,
    ) -> FormatResult<i128> {
        let (arg, idx) = self.resolve(position)?;
        narrow_signed(arg, length).ok_or(FormatError::ArgumentMismatch(idx))
    }

    /// Fetches and re-narrows an unsigned integer value per `length`.
    pub fn fetch_unsigned(
        &mut self,
        position: Option<usize>,
        length: Option<Length>,
    ) -> FormatResult<u128> {
        let (arg, idx) = self.resolve(position)?;
        narrow_unsigned(arg, length).ok_or(FormatError::ArgumentMismatch(idx))
    }

    /// Fetches a `%c` byte.
    pub fn fetch_char(&mut self, position: Option<usize>) -> FormatResult<u8> {
        let (arg, idx) = self.resolve(position)?;
        match arg {
            Arg::Char(b) => Ok(*b),
            _ => Err(FormatError::ArgumentMismatch(idx)),
        }
    }

    /// Fetches a `%s` string (`None` is a null pointer argument).
    pub fn fetch_str(&mut self, position: Option<usize>) -> FormatResult<Option<&'a str>> {
        let (arg, idx) = self.resolve(position)?;
        match arg {
            Arg::Str(s) => Ok(*s),
            _ => Err(FormatError::ArgumentMismatch(idx)),
        }
    }

    /// Fetches a `%p` address (`None` is a null pointer argument).
    pub fn fetch_ptr(&mut self, position: Option<usize>) -> FormatResult<Option<usize>> {
        let (arg, idx) = self.resolve(position)?;
        match arg {
            Arg::Ptr(p) => Ok(*p),
            _ => Err(FormatError::ArgumentMismatch(idx)),
        }
    }

    /// Fetches a `%n` write target.
    pub fn fetch_count_target(
        &mut self,
        position: Option<usize>,
    ) -> FormatResult<Option<CountTarget<'a>>> {
        let (arg, idx) = self.resolve(position)?;
        match arg {
            Arg::CountOut(target) => Ok(*target),
            _ => Err(FormatError::ArgumentMismatch(idx)),
        }
    }
}

fn narrow_signed(arg: &Arg, length: Option<Length>) -> Option<i128> {
    use Length::*;
    match (length.unwrap_or(Plain), arg) {
        (Plain, Arg::Int(v)) => Some(i128::from(*v)),
        (Hh, Arg::Int(v)) => Some(i128::from(*v as i8)),
        (H, Arg::Int(v)) => Some(i128::from(*v as i16)),
        (L, Arg::Long(v)) => Some(i128::from(*v)),
        (Ll, Arg::LongLong(v)) => Some(i128::from(*v)),
        (J, Arg::IntMax(v)) => Some(*v),
        (Z, Arg::SSize(v)) => Some(*v as i128),
        (T, Arg::PtrDiff(v)) => Some(*v as i128),
        _ => None,
    }
}

fn narrow_unsigned(arg: &Arg, length: Option<Length>) -> Option<u128> {
    use Length::*;
    match (length.unwrap_or(Plain), arg) {
        (Plain, Arg::UInt(v)) => Some(u128::from(*v)),
        (Hh, Arg::UInt(v)) => Some(u128::from(*v as u8)),
        (H, Arg::UInt(v)) => Some(u128::from(*v as u16)),
        (L, Arg::ULong(v)) => Some(u128::from(*v)),
        (Ll, Arg::ULongLong(v)) => Some(u128::from(*v)),
        (J, Arg::UIntMax(v)) => Some(*v),
        (Z, Arg::Size(v)) => Some(*v as u128),
        (T, Arg::PtrDiff(v)) => Some(*v as usize as u128),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::scan_template;

    #[test]
    fn sequential_template_plans_sequential() {
        let frags = scan_template("%d %s").unwrap();
        assert_eq!(plan(&frags).unwrap(), Mode::Sequential);
    }

    #[test]
    fn positional_template_plans_positional() {
        let frags = scan_template("%2$s %1$d").unwrap();
        assert_eq!(plan(&frags).unwrap(), Mode::Positional);
    }

    #[test]
    fn mixed_positional_is_error() {
        let frags = scan_template("%1$d %s").unwrap();
        assert_eq!(plan(&frags), Err(FormatError::MixedPositional));
    }

    #[test]
    fn positional_gap_is_error() {
        let frags = scan_template("%3$d").unwrap();
        assert_eq!(plan(&frags), Err(FormatError::PositionalGap(1)));
    }

    #[test]
    fn positional_type_conflict_is_error() {
        let frags = scan_template("%1$d %1$s").unwrap();
        assert_eq!(plan(&frags), Err(FormatError::PositionalTypeConflict(1)));
    }

    #[test]
    fn positional_repeat_same_type_is_fine() {
        let frags = scan_template("%1$d %1$d").unwrap();
        assert_eq!(plan(&frags).unwrap(), Mode::Positional);
    }

    #[test]
    fn width_indirection_slot_unifies_with_plain_int_value_reference() {
        let frags = scan_template("%1$*2$d %2$d").unwrap();
        assert_eq!(plan(&frags).unwrap(), Mode::Positional);
    }

    #[test]
    fn star_without_m_dollar_in_positional_mode_errors() {
        let frags = scan_template("%1$*d").unwrap();
        assert_eq!(plan(&frags), Err(FormatError::MissingPositionalIndirection));
    }

    #[test]
    fn sequential_fetch_narrows_hhd() {
        let args = [Arg::Int(-1)];
        let mut cursor = Args::new(&args, Mode::Sequential);
        assert_eq!(cursor.fetch_signed(None, Some(Length::Hh)).unwrap(), -1);
    }

    #[test]
    fn sequential_fetch_narrows_hhu_wraps() {
        let args = [Arg::UInt(255)];
        let mut cursor = Args::new(&args, Mode::Sequential);
        assert_eq!(cursor.fetch_unsigned(None, Some(Length::Hh)).unwrap(), 255);
    }

    #[test]
    fn positional_same_slot_twice_reads_same_value() {
        let args = [Arg::Int(7)];
        let mut cursor = Args::new(&args, Mode::Positional);
        assert_eq!(cursor.fetch_signed(Some(1), None).unwrap(), 7);
        assert_eq!(cursor.fetch_signed(Some(1), None).unwrap(), 7);
    }
}
