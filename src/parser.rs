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

//! The directive grammar.
//!
//! Grammar (after the leading `%` has been consumed by the caller):
//!
//! ```text
//! [ digits '$' ]     — positional index
//! flags*             — -  +  ' '  #  0
//! width              — digits | '*' ['M' '$']
//! [ '.' precision ]  — digits | '*' ['M' '$']
//! length             — hh h l ll j z t L
//! type               — d i u o x X f F e E g G a A c s p n
//! ```
//!
//! Field tokenizers are written as `nom` combinators in the style of the
//! `pw_format` crate's printf grammar; the stage-by-stage sequencing (and
//! the position-vs-width disambiguation) mirrors the original C
//! implementation's `read_format_string_*` chain.

use nom::{
    branch::alt,
    bytes::complete::tag,
    character::complete::{anychar, digit1},
    combinator::{map, opt, verify},
    sequence::terminated,
    IResult,
};

use crate::arg::{Length, Type};
use crate::descriptor::{Descriptor, PrecisionSource, WidthSource};
use crate::error::{FormatError, FormatResult};

/// A non-fatal parse observation: the normalizer resolves these silently,
/// they never reach the caller. Logged at `trace` level only.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Warning {
    /// The same flag character appeared twice.
    RepeatedFlag(char),
}

/// One literal run or conversion directive inside a template.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Fragment<'a> {
    /// Raw bytes to forward to the sink verbatim.
    Literal(&'a str),
    /// A `%%` escape; contributes one literal `%`.
    Percent,
    /// A parsed `%...X` conversion directive.
    Conversion(Descriptor),
}

fn positive_digits(input: &str) -> IResult<&str, &str> {
    verify(digit1, |s: &str| !s.starts_with('0'))(input)
}

/// Parses `[ digits '$' ]`, backtracking cleanly if no `$` follows.
fn position(input: &str) -> IResult<&str, Option<usize>> {
    opt(map(terminated(positive_digits, tag("$")), |s: &str| {
        s.parse().expect("verified non-empty decimal digits")
    }))(input)
}

fn flag_char(input: &str) -> IResult<&str, char> {
    alt((tag("-"), tag("+"), tag(" "), tag("#"), tag("0")))(input).map(|(rest, s)| {
        (
            rest,
            s.chars().next().expect("tag guarantees one-char match"),
        )
    })
}

/// Consumes a run of flag characters, applying each to `desc.flags` and
/// reporting repeats as [`Warning::RepeatedFlag`].
fn flags<'a>(mut input: &'a str, desc: &mut Descriptor, warnings: &mut Vec<Warning>) -> &'a str {
    loop {
        let Ok((rest, c)) = flag_char(input) else {
            return input;
        };
        let already_set = match c {
            '-' => std::mem::replace(&mut desc.flags.left_justify, true),
            '+' => std::mem::replace(&mut desc.flags.always_sign, true),
            ' ' => std::mem::replace(&mut desc.flags.space_sign, true),
            '#' => std::mem::replace(&mut desc.flags.alternate_form, true),
            '0' => std::mem::replace(&mut desc.flags.zero_pad, true),
            _ => unreachable!("flag_char only matches the five flag characters"),
        };
        if already_set {
            warnings.push(Warning::RepeatedFlag(c));
        }
        input = rest;
    }
}

/// Parses the optional `M$` suffix of an indirect (`*`) width/precision,
/// mandatory only once the caller knows the template is positional — this
/// parser just reports what it saw.
fn indirection_index(input: &str) -> IResult<&str, Option<usize>> {
    position(input)
}

fn width(input: &str) -> IResult<&str, WidthSource> {
    if let Ok((rest, _)) = tag::<_, _, nom::error::Error<&str>>("*")(input) {
        let (rest, idx) = indirection_index(rest)?;
        return Ok((rest, WidthSource::FromArg(idx)));
    }
    if let Ok((rest, digits)) = digit1::<_, nom::error::Error<&str>>(input) {
        let value: u32 = digits.parse().unwrap_or(u32::MAX);
        return Ok((rest, WidthSource::Literal(value)));
    }
    Ok((input, WidthSource::None))
}

fn precision(input: &str) -> IResult<&str, PrecisionSource> {
    let Ok((input, _)) = tag::<_, _, nom::error::Error<&str>>(".")(input) else {
        return Ok((input, PrecisionSource::Absent));
    };
    if let Ok((rest, _)) = tag::<_, _, nom::error::Error<&str>>("*")(input) {
        let (rest, idx) = indirection_index(rest)?;
        return Ok((rest, PrecisionSource::FromArg(idx)));
    }
    if let Ok((rest, digits)) = digit1::<_, nom::error::Error<&str>>(input) {
        let value: u32 = digits.parse().unwrap_or(u32::MAX);
        return Ok((rest, PrecisionSource::Literal(value)));
    }
    // '.' with no digits means an explicit precision of zero.
    Ok((input, PrecisionSource::Literal(0)))
}

fn length(input: &str) -> IResult<&str, Option<Length>> {
    alt((
        map(tag("hh"), |_| Some(Length::Hh)),
        map(tag("h"), |_| Some(Length::H)),
        map(tag("ll"), |_| Some(Length::Ll)), // must precede single-'l'
        map(tag("l"), |_| Some(Length::L)),
        map(tag("j"), |_| Some(Length::J)),
        map(tag("z"), |_| Some(Length::Z)),
        map(tag("t"), |_| Some(Length::T)),
        map(tag("L"), |_| Some(Length::BigL)),
        map(tag(""), |_| None),
    ))(input)
}

fn map_type(c: char) -> Result<Type, FormatError> {
    match c {
        'd' => Ok(Type::D),
        'i' => Ok(Type::I),
        'u' => Ok(Type::U),
        'o' => Ok(Type::O),
        'x' => Ok(Type::X),
        'X' => Ok(Type::UpperX),
        'f' => Ok(Type::F),
        'F' => Ok(Type::UpperF),
        'e' => Ok(Type::E),
        'E' => Ok(Type::UpperE),
        'g' => Ok(Type::G),
        'G' => Ok(Type::UpperG),
        'a' => Ok(Type::A),
        'A' => Ok(Type::UpperA),
        'c' => Ok(Type::C),
        's' => Ok(Type::S),
        'p' => Ok(Type::P),
        'n' => Ok(Type::N),
        other => Err(FormatError::UnknownType(other)),
    }
}

/// Parses one conversion directive starting just past its leading `%`.
///
/// Returns the descriptor, the number of bytes consumed (not counting the
/// `%`), and any silent warnings observed along the way.
pub fn directive(input: &str) -> FormatResult<(Descriptor, usize, Vec<Warning>)> {
    let original_len = input.len();
    let mut warnings = Vec::new();

    // A leading '0' belongs to the flags, never to a position or width; a
    // leading '1'..'9' is a position only if a '$' follows, otherwise it is
    // the width. Flags are not re-attempted in that case: a directive with
    // both flags and a leading-digit width always has the flags appear
    // first, so reaching here with digits first means there are none.
    let (rest, position_digits) = position(input).expect("position never fails");
    let (rest, position, width_source, skip_flags) = match position_digits {
        Some(pos) => (rest, Some(pos), None, false),
        None => {
            if let Ok((after_digits, digits)) = positive_digits(input) {
                let value: u32 = digits.parse().unwrap_or(u32::MAX);
                (after_digits, None, Some(WidthSource::Literal(value)), true)
            } else {
                (rest, None, None, false)
            }
        }
    };

    let mut desc = Descriptor::new(Type::D); // placeholder type, replaced below
    desc.position = position;

    let rest = if skip_flags {
        rest
    } else {
        flags(rest, &mut desc, &mut warnings)
    };

    let (rest, width_source) = match width_source {
        Some(w) => (rest, w),
        None => width(rest).expect("width never fails"),
    };
    desc.width_source = width_source;

    let (rest, precision_source) = precision(rest).expect("precision never fails");
    desc.precision_source = precision_source;

    let (rest, len) = length(rest).expect("length always has an empty-match fallback");
    desc.length = len;

    let (rest, c) = anychar::<_, nom::error::Error<&str>>(rest)
        .map_err(|_| FormatError::UnknownType('\0'))?;
    desc.ty = map_type(c)?;

    desc.consumed = original_len - rest.len();
    Ok((desc, desc.consumed, warnings))
}

/// Scans an entire template into literal/percent/conversion fragments in a
/// single left-to-right pass. This vector is consulted, never reparsed, by
/// the positional pre-scan once the template's mode is known.
pub fn scan_template(template: &str) -> FormatResult<Vec<Fragment<'_>>> {
    let mut fragments = Vec::new();
    let mut rest = template;
    while !rest.is_empty() {
        if let Some(after) = rest.strip_prefix("%%") {
            fragments.push(Fragment::Percent);
            rest = after;
            continue;
        }
        if let Some(after_percent) = rest.strip_prefix('%') {
            let (desc, consumed, warnings) = directive(after_percent)?;
            for w in warnings {
                log::trace!("format directive warning: {w:?}");
            }
            fragments.push(Fragment::Conversion(desc));
            rest = &after_percent[consumed..];
            continue;
        }
        let next_percent = rest.find('%').unwrap_or(rest.len());
        fragments.push(Fragment::Literal(&rest[..next_percent]));
        rest = &rest[next_percent..];
    }
    Ok(fragments)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::arg::{Length, Type};

    #[test]
    fn plain_decimal() {
        let (desc, consumed, warnings) = directive("d").unwrap();
        assert_eq!(consumed, 1);
        assert!(warnings.is_empty());
        assert_eq!(desc.ty, Type::D);
        assert_eq!(desc.width_source, WidthSource::None);
        assert_eq!(desc.precision_source, PrecisionSource::Absent);
        assert_eq!(desc.length, None);
    }

    #[test]
    fn width_then_type() {
        let (desc, consumed, _) = directive("25d").unwrap();
        assert_eq!(consumed, 3);
        assert_eq!(desc.width_source, WidthSource::Literal(25));
        assert!(!desc.flags.zero_pad);
    }

    #[test]
    fn zero_flag_not_width() {
        let (desc, _, _) = directive("05.3d").unwrap();
        assert!(desc.flags.zero_pad);
        assert_eq!(desc.width_source, WidthSource::Literal(5));
        assert_eq!(desc.precision_source, PrecisionSource::Literal(3));
    }

    #[test]
    fn positional() {
        let (desc, consumed, _) = directive("2$s").unwrap();
        assert_eq!(consumed, 3);
        assert_eq!(desc.position, Some(2));
        assert_eq!(desc.ty, Type::S);
    }

    #[test]
    fn positional_indirect_width_precision() {
        let (desc, _, _) = directive("1$*2$.*3$d").unwrap();
        assert_eq!(desc.position, Some(1));
        assert_eq!(desc.width_source, WidthSource::FromArg(Some(2)));
        assert_eq!(desc.precision_source, PrecisionSource::FromArg(Some(3)));
    }

    #[test]
    fn repeated_flag_warns() {
        let (_, _, warnings) = directive("--5d").unwrap();
        assert_eq!(warnings, vec![Warning::RepeatedFlag('-')]);
    }

    #[test]
    fn dot_with_no_digits_is_zero_precision() {
        let (desc, _, _) = directive(".d").unwrap();
        assert_eq!(desc.precision_source, PrecisionSource::Literal(0));
    }

    #[test]
    fn longest_length_match() {
        assert_eq!(directive("hhd").unwrap().0.length, Some(Length::Hh));
        assert_eq!(directive("lld").unwrap().0.length, Some(Length::Ll));
        assert_eq!(directive("ld").unwrap().0.length, Some(Length::L));
    }

    #[test]
    fn unknown_type_errors() {
        assert_eq!(directive("k"), Err(FormatError::UnknownType('k')));
    }

    #[test]
    fn scan_handles_percent_escape() {
        let frags = scan_template("100%% done %d").unwrap();
        assert_eq!(
            frags,
            vec![
                Fragment::Literal("100"),
                Fragment::Percent,
                Fragment::Literal(" done "),
                Fragment::Conversion(directive("d").unwrap().0),
            ]
        );
    }
}
