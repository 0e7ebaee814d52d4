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

//! Hard-error surface of the format engine.
//!
//! Every failure the engine can produce is a [`FormatError`]. Warnings
//! (repeated flags, flags neutralized by context, etc.) never reach this
//! type; they are resolved silently by the normalizer and only logged at
//! `trace` level.

use thiserror::Error;

/// A hard error encountered while parsing or rendering a format string.
#[derive(Debug, Error, PartialEq, Eq, Clone)]
pub enum FormatError {
    /// An unrecognized conversion type letter.
    #[error("unknown conversion type '{0}'")]
    UnknownType(char),

    /// A length modifier that cannot apply to the chosen conversion type.
    #[error("length modifier incompatible with conversion type")]
    IncompatibleLengthType,

    /// `f F e E g G a A` are recognized but not implemented.
    #[error("floating-point conversions are not supported")]
    FloatingPointUnsupported,

    /// `%lc` / `%ls` wide-character conversions are not implemented.
    #[error("wide-character conversions are not supported")]
    WideCharUnsupported,

    /// Some directives in the template used `N$` and some did not.
    #[error("cannot mix positional and sequential directives in one template")]
    MixedPositional,

    /// A positional template used `*`/`.*` without the mandatory `M$`.
    #[error("'*' width/precision requires 'M$' in positional mode")]
    MissingPositionalIndirection,

    /// A slot in `[1..max_index]` was never referenced by any directive.
    #[error("positional argument {0} was never referenced")]
    PositionalGap(usize),

    /// Two directives referenced the same slot with different (length, type).
    #[error("positional argument {0} referenced with conflicting types")]
    PositionalTypeConflict(usize),

    /// The argument vector ran out, or held the wrong variant for the width
    /// a directive's length modifier demanded.
    #[error("argument vector exhausted or mismatched at index {0}")]
    ArgumentMismatch(usize),

    /// The growable sink could not grow its buffer.
    #[error("allocation failed while growing output buffer")]
    AllocationFailed,

    /// The underlying sink refused a write, or a descriptor write was short.
    #[error("sink write failed")]
    SinkWriteFailed,

    /// `%n` was given a `None` output cell.
    #[error("'%n' requires a non-null argument")]
    NullCountTarget,
}

/// Result alias used throughout the engine.
pub type FormatResult<T> = Result<T, FormatError>;
