// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Configuration errors.

use alloc::string::String;

/// A rejected [`HintConfig`](crate::HintConfig) value.
///
/// Overlay behavior itself never fails: unmatched input, zero-size targets, and
/// stale elements are ordinary session outcomes. Only configuration can be invalid.
#[derive(Clone, Debug, PartialEq, thiserror::Error)]
pub enum ConfigError {
    /// The label alphabet has no letters.
    #[error("label alphabet must not be empty")]
    EmptyAlphabet,
    /// The label alphabet contains something other than an ASCII letter.
    #[error("label alphabet may only contain ASCII letters, found {0:?}")]
    InvalidAlphabetChar(char),
    /// The label alphabet repeats a letter (compared case-insensitively).
    #[error("label alphabet contains {0:?} more than once")]
    DuplicateAlphabetChar(char),
    /// A color is not of the form `#rgb` or `#rrggbb`.
    #[error("invalid color {0:?}, expected #rgb or #rrggbb")]
    InvalidColor(String),
    /// Marker opacity must lie in `0.0..=1.0`.
    #[error("marker opacity {0} is outside 0.0..=1.0")]
    OpacityOutOfRange(f64),
    /// Marker font size must be positive.
    #[error("marker size must be positive")]
    InvalidMarkerSize,
    /// Scroll repeat interval must be positive.
    #[error("scroll repeat interval must be positive")]
    InvalidScrollInterval,
}
