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

//! Directive validation and flag normalization.
//!
//! Runs once a directive's width/precision indirections have already been
//! fetched from the argument vector, so `width`/`precision` on the
//! descriptor are resolved plain values by the time [`normalize`] sees
//! them.

use crate::arg::{Length, Type};
use crate::descriptor::Descriptor;
use crate::error::{FormatError, FormatResult};

/// Rejects illegal `(length, type)` combinations.
fn check_length_type(length: Option<Length>, ty: Type) -> FormatResult<()> {
    if ty.is_float() {
        return Err(FormatError::FloatingPointUnsupported);
    }

    match (length, ty) {
        (Some(Length::BigL), t)
            if t.is_integer() || matches!(t, Type::N | Type::C | Type::S | Type::P) =>
        {
            Err(FormatError::IncompatibleLengthType)
        }
        (Some(Length::L), Type::C | Type::S) => Err(FormatError::WideCharUnsupported),
        (Some(_), Type::C | Type::S) => Err(FormatError::IncompatibleLengthType),
        (Some(_), Type::P) => Err(FormatError::IncompatibleLengthType),
        _ => Ok(()),
    }
}

/// Applies a negative `*`-supplied width: re-expressed as left-justify plus
/// the absolute value, with `i32::MIN` clamped to `i32::MAX` (its negation
/// would otherwise overflow).
pub fn resolve_signed_width(desc: &mut Descriptor, signed_width: i64) {
    if signed_width < 0 {
        desc.flags.left_justify = true;
        let magnitude = if signed_width == i64::from(i32::MIN) {
            i32::MAX as i64
        } else {
            -signed_width
        };
        desc.width = magnitude as u32;
    } else {
        desc.width = signed_width as u32;
    }
}

/// Validates `desc` and silently clears any flags/precision rendered
/// meaningless by its type. Must run after width/precision
/// indirections have been resolved into `desc.width`/`desc.precision`.
pub fn normalize(desc: &mut Descriptor) -> FormatResult<()> {
    check_length_type(desc.length, desc.ty)?;

    if desc.flags.always_sign && desc.flags.space_sign {
        desc.flags.space_sign = false;
    }

    match desc.ty {
        Type::D | Type::I | Type::U => {
            desc.flags.alternate_form = false;
        }
        Type::X | Type::UpperX => {
            desc.flags.always_sign = false;
            desc.flags.space_sign = false;
        }
        Type::C | Type::S | Type::P => {
            desc.flags.always_sign = false;
            desc.flags.space_sign = false;
            desc.flags.alternate_form = false;
            desc.flags.zero_pad = false;
            if desc.ty != Type::S {
                desc.precision = None;
            }
        }
        Type::N => {
            desc.flags = Default::default();
            desc.width = 0;
            desc.precision = None;
        }
        _ => {}
    }

    if desc.ty.is_integer() && (desc.flags.left_justify || desc.precision.is_some()) {
        desc.flags.zero_pad = false;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::descriptor::Descriptor;

    fn desc(ty: Type) -> Descriptor {
        Descriptor::new(ty)
    }

    #[test]
    fn space_cancelled_by_plus() {
        let mut d = desc(Type::D);
        d.flags.always_sign = true;
        d.flags.space_sign = true;
        normalize(&mut d).unwrap();
        assert!(d.flags.always_sign);
        assert!(!d.flags.space_sign);
    }

    #[test]
    fn alternate_form_cleared_on_decimal() {
        let mut d = desc(Type::D);
        d.flags.alternate_form = true;
        normalize(&mut d).unwrap();
        assert!(!d.flags.alternate_form);
    }

    #[test]
    fn sign_flags_cleared_on_hex() {
        let mut d = desc(Type::X);
        d.flags.always_sign = true;
        d.flags.space_sign = true;
        normalize(&mut d).unwrap();
        assert!(!d.flags.always_sign);
        assert!(!d.flags.space_sign);
    }

    #[test]
    fn everything_cleared_on_n() {
        let mut d = desc(Type::N);
        d.flags.zero_pad = true;
        d.width = 10;
        d.precision = Some(2);
        normalize(&mut d).unwrap();
        assert_eq!(d.width, 0);
        assert_eq!(d.precision, None);
        assert!(!d.flags.zero_pad);
    }

    #[test]
    fn precision_cleared_on_c_and_p_but_not_s() {
        let mut c = desc(Type::C);
        c.precision = Some(3);
        normalize(&mut c).unwrap();
        assert_eq!(c.precision, None);

        let mut s = desc(Type::S);
        s.precision = Some(3);
        normalize(&mut s).unwrap();
        assert_eq!(s.precision, Some(3));

        let mut p = desc(Type::P);
        p.precision = Some(3);
        normalize(&mut p).unwrap();
        assert_eq!(p.precision, None);
    }

    #[test]
    fn zero_pad_cancelled_by_left_justify_or_precision() {
        let mut d = desc(Type::D);
        d.flags.zero_pad = true;
        d.flags.left_justify = true;
        normalize(&mut d).unwrap();
        assert!(!d.flags.zero_pad);

        let mut d2 = desc(Type::D);
        d2.flags.zero_pad = true;
        d2.precision = Some(3);
        normalize(&mut d2).unwrap();
        assert!(!d2.flags.zero_pad);
    }

    #[test]
    fn big_l_with_integer_is_error() {
        let mut d = desc(Type::D);
        d.length = Some(Length::BigL);
        assert_eq!(normalize(&mut d), Err(FormatError::IncompatibleLengthType));
    }

    #[test]
    fn length_with_pointer_is_error() {
        let mut d = desc(Type::P);
        d.length = Some(Length::L);
        assert_eq!(normalize(&mut d), Err(FormatError::IncompatibleLengthType));
    }

    #[test]
    fn wide_length_with_string_is_wide_char_error() {
        let mut d = desc(Type::S);
        d.length = Some(Length::L);
        assert_eq!(normalize(&mut d), Err(FormatError::WideCharUnsupported));
    }

    #[test]
    fn other_length_with_char_is_incompatible() {
        let mut d = desc(Type::C);
        d.length = Some(Length::Hh);
        assert_eq!(normalize(&mut d), Err(FormatError::IncompatibleLengthType));
    }

    #[test]
    fn float_type_always_rejected() {
        let mut d = desc(Type::F);
        assert_eq!(normalize(&mut d), Err(FormatError::FloatingPointUnsupported));
    }

    #[test]
    fn negative_width_becomes_left_justify_abs() {
        let mut d = desc(Type::D);
        resolve_signed_width(&mut d, -5);
        assert!(d.flags.left_justify);
        assert_eq!(d.width, 5);
    }

    #[test]
    fn i32_min_width_clamps_to_i32_max() {
        let mut d = desc(Type::D);
        resolve_signed_width(&mut d, i32::MIN as i64);
        assert!(d.flags.left_justify);
        assert_eq!(d.width, i32::MAX as u32);
    }
}
