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

//! Renders a resolved, normalized directive to a [`Sink`].
//!
//! Builds digits forwards (`to_digits`) into a `Vec<u8>` rather than
//! backwards into a fixed-size scratch buffer, since a growable buffer has
//! no size bound to worry about.

use crate::arg::CountTarget;
use crate::arg::Type;
use crate::descriptor::Descriptor;
use crate::error::FormatResult;
use crate::sink::Sink;

fn pad(sink: &mut Sink, written: &mut usize, count: usize, byte: u8) -> FormatResult<()> {
    for _ in 0..count {
        sink.push(written, byte)?;
    }
    Ok(())
}

fn push_slice(sink: &mut Sink, written: &mut usize, bytes: &[u8]) -> FormatResult<()> {
    for &b in bytes {
        sink.push(written, b)?;
    }
    Ok(())
}

fn to_digits(mut magnitude: u128, base: u32, upper: bool) -> Vec<u8> {
    let alphabet: &[u8] = if upper {
        b"0123456789ABCDEF"
    } else {
        b"0123456789abcdef"
    };
    if magnitude == 0 {
        return vec![b'0'];
    }
    let mut out = Vec::new();
    while magnitude != 0 {
        out.push(alphabet[(magnitude % u128::from(base)) as usize]);
        magnitude /= u128::from(base);
    }
    out.reverse();
    out
}

/// Writes `sign` (if any), `alt_prefix`, `precision_pad` zeros, then
/// `digits`, justified and padded to `desc.width` per the left-justify/
/// zero-pad flags. This is the forwards-buffer equivalent of
/// `write_backwards_buffer_with_padding`.
fn write_padded(
    sink: &mut Sink,
    written: &mut usize,
    desc: &Descriptor,
    sign: Option<u8>,
    alt_prefix: &[u8],
    digits: &[u8],
    precision_pad: usize,
) -> FormatResult<()> {
    let prefix_len = usize::from(sign.is_some()) + alt_prefix.len();
    let content_len = precision_pad + digits.len();
    let total_len = prefix_len + content_len;
    let width_pad = (desc.width as usize).saturating_sub(total_len);

    let write_prefix = |sink: &mut Sink, written: &mut usize| -> FormatResult<()> {
        if let Some(s) = sign {
            sink.push(written, s)?;
        }
        push_slice(sink, written, alt_prefix)
    };
    let write_content = |sink: &mut Sink, written: &mut usize| -> FormatResult<()> {
        pad(sink, written, precision_pad, b'0')?;
        push_slice(sink, written, digits)
    };

    if desc.flags.left_justify {
        write_prefix(sink, written)?;
        write_content(sink, written)?;
        pad(sink, written, width_pad, b' ')
    } else if desc.flags.zero_pad {
        write_prefix(sink, written)?;
        pad(sink, written, width_pad, b'0')?;
        write_content(sink, written)
    } else {
        pad(sink, written, width_pad, b' ')?;
        write_prefix(sink, written)?;
        write_content(sink, written)
    }
}

/// Renders `d i u o x X`. `negative` is only meaningful for `d`/`i`.
pub fn integer(
    sink: &mut Sink,
    written: &mut usize,
    desc: &Descriptor,
    magnitude: u128,
    negative: bool,
) -> FormatResult<()> {
    let base = match desc.ty {
        Type::D | Type::I | Type::U => 10,
        Type::O => 8,
        Type::X | Type::UpperX => 16,
        other => unreachable!("{other:?} is not an integer type"),
    };
    let upper = desc.ty == Type::UpperX;

    // Precision 0 with value 0 prints no digits at all, not "0".
    let suppress = desc.precision == Some(0) && magnitude == 0;
    let digits = if suppress {
        Vec::new()
    } else {
        to_digits(magnitude, base, upper)
    };
    let precision_pad = (desc.precision.unwrap_or(0) as usize).saturating_sub(digits.len());

    let mut alt_prefix: Vec<u8> = Vec::new();
    match desc.ty {
        // '#' only forces a leading zero if precision/digits didn't already
        // produce one.
        Type::O if desc.flags.alternate_form && precision_pad == 0 && digits.first() != Some(&b'0') => {
            alt_prefix.push(b'0');
        }
        Type::X | Type::UpperX if desc.flags.alternate_form && magnitude != 0 => {
            alt_prefix.push(b'0');
            alt_prefix.push(if upper { b'X' } else { b'x' });
        }
        _ => {}
    }

    let sign = if matches!(desc.ty, Type::D | Type::I) {
        if negative {
            Some(b'-')
        } else if desc.flags.always_sign {
            Some(b'+')
        } else if desc.flags.space_sign {
            Some(b' ')
        } else {
            None
        }
    } else {
        None
    };

    write_padded(sink, written, desc, sign, &alt_prefix, &digits, precision_pad)
}

fn pad_text(
    sink: &mut Sink,
    written: &mut usize,
    width: u32,
    left_justify: bool,
    text: &[u8],
) -> FormatResult<()> {
    let width_pad = (width as usize).saturating_sub(text.len());
    if left_justify {
        push_slice(sink, written, text)?;
        pad(sink, written, width_pad, b' ')
    } else {
        pad(sink, written, width_pad, b' ')?;
        push_slice(sink, written, text)
    }
}

/// Renders `%c`.
pub fn char_value(sink: &mut Sink, written: &mut usize, desc: &Descriptor, byte: u8) -> FormatResult<()> {
    pad_text(sink, written, desc.width, desc.flags.left_justify, &[byte])
}

/// Renders `%s`. A `None` argument prints `(null)` unless an explicit
/// precision of `0` suppresses it to nothing (a null pointer argument with
/// zero precision reads zero characters from it, same as any other).
pub fn string_value(
    sink: &mut Sink,
    written: &mut usize,
    desc: &Descriptor,
    value: Option<&str>,
) -> FormatResult<()> {
    let bytes: &[u8] = match value {
        Some(s) => s.as_bytes(),
        None if desc.precision == Some(0) => b"",
        None => b"(null)",
    };
    let len = match desc.precision {
        Some(p) => bytes.len().min(p as usize),
        None => bytes.len(),
    };
    pad_text(sink, written, desc.width, desc.flags.left_justify, &bytes[..len])
}

/// Renders `%p`. Writes as `%#x` with the pointer's address; `None` prints
/// `(nil)`.
pub fn pointer_value(
    sink: &mut Sink,
    written: &mut usize,
    desc: &Descriptor,
    addr: Option<usize>,
) -> FormatResult<()> {
    match addr {
        None => pad_text(sink, written, desc.width, desc.flags.left_justify, b"(nil)"),
        Some(addr) => {
            let mut synthetic = *desc;
            synthetic.ty = Type::X;
            synthetic.flags.alternate_form = true;
            synthetic.flags.always_sign = false;
            synthetic.flags.space_sign = false;
            synthetic.precision = None;
            integer(sink, written, &synthetic, addr as u128, false)
        }
    }
}

/// Deposits `written` (the running character count at the point `%n`
/// appears) into `target`, narrowed to its declared width.
pub fn count(target: CountTarget, written: usize) {
    match target {
        CountTarget::Int(c) => c.set(written as i32),
        CountTarget::Char(c) => c.set(written as i8),
        CountTarget::Short(c) => c.set(written as i16),
        CountTarget::Long(c) | CountTarget::LongLong(c) | CountTarget::IntMax(c) => {
            c.set(written as i64)
        }
        CountTarget::Size(c) | CountTarget::PtrDiff(c) => c.set(written as isize),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::descriptor::Descriptor;
    use std::cell::Cell;

    fn render(desc: &Descriptor, magnitude: u128, negative: bool) -> String {
        let mut buf = Vec::new();
        let mut written = 0;
        {
            let mut sink = Sink::stream(&mut buf);
            integer(&mut sink, &mut written, desc, magnitude, negative).unwrap();
        }
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn width_padded_decimal() {
        let mut d = Descriptor::new(Type::D);
        d.width = 5;
        assert_eq!(render(&d, 42, false), "   42");
    }

    #[test]
    fn left_justified_decimal() {
        let mut d = Descriptor::new(Type::D);
        d.width = 5;
        d.flags.left_justify = true;
        assert_eq!(render(&d, 42, false), "42   ");
    }

    #[test]
    fn zero_padded_with_precision() {
        let mut d = Descriptor::new(Type::D);
        d.width = 5;
        d.precision = Some(3);
        assert_eq!(render(&d, 7, false), "  007");
    }

    #[test]
    fn alternate_hex() {
        let mut d = Descriptor::new(Type::X);
        d.flags.alternate_form = true;
        assert_eq!(render(&d, 0xff, false), "0xff");
    }

    #[test]
    fn alternate_hex_of_zero_has_no_prefix() {
        let mut d = Descriptor::new(Type::X);
        d.flags.alternate_form = true;
        assert_eq!(render(&d, 0, false), "0");
    }

    #[test]
    fn negative_decimal_has_sign_before_padding() {
        let mut d = Descriptor::new(Type::D);
        d.width = 5;
        d.flags.zero_pad = true;
        assert_eq!(render(&d, 7, true), "-0007");
    }

    #[test]
    fn precision_zero_and_zero_value_prints_nothing() {
        let mut d = Descriptor::new(Type::D);
        d.precision = Some(0);
        assert_eq!(render(&d, 0, false), "");
    }

    #[test]
    fn string_null_prints_literal() {
        let mut buf = Vec::new();
        let mut written = 0;
        let d = Descriptor::new(Type::S);
        {
            let mut sink = Sink::stream(&mut buf);
            string_value(&mut sink, &mut written, &d, None).unwrap();
        }
        assert_eq!(buf, b"(null)");
    }

    #[test]
    fn string_null_with_zero_precision_prints_nothing() {
        let mut buf = Vec::new();
        let mut written = 0;
        let mut d = Descriptor::new(Type::S);
        d.precision = Some(0);
        {
            let mut sink = Sink::stream(&mut buf);
            string_value(&mut sink, &mut written, &d, None).unwrap();
        }
        assert_eq!(buf, b"");
    }

    #[test]
    fn count_writes_back_through_cell() {
        let cell = Cell::new(0i32);
        count(CountTarget::Int(&cell), 5);
        assert_eq!(cell.get(), 5);
    }
}
