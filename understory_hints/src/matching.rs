// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Match engine: exact-prefix matching of typed input against marker labels.
//!
//! All comparisons ignore ASCII case, whatever case the input was stored in.
//! There is no fuzzy or out-of-order matching.
//!
//! ```
//! use understory_hints::{MatchResult, evaluate, is_visible};
//!
//! let labels = ["aa", "ab", "ba"];
//! assert_eq!(evaluate("A", &labels), MatchResult::Ambiguous);
//! assert_eq!(evaluate("ab", &labels), MatchResult::Exact(&"ab"));
//! assert_eq!(evaluate("c", &labels), MatchResult::NoMatch);
//! assert!(is_visible("ba", "B"));
//! ```

use alloc::string::String;

use crate::marker::Marker;

/// Anything carrying a marker label.
pub trait Labelled {
    /// The label.
    fn label(&self) -> &str;
}

impl<E, H> Labelled for Marker<E, H> {
    fn label(&self) -> &str {
        Self::label(self)
    }
}

impl Labelled for &str {
    fn label(&self) -> &str {
        self
    }
}

impl Labelled for String {
    fn label(&self) -> &str {
        self
    }
}

/// Outcome of evaluating typed input against a marker set.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MatchResult<'a, M> {
    /// Exactly one label equals the input.
    Exact(&'a M),
    /// No label equals the input, but some label starts with it.
    Ambiguous,
    /// No label starts with the input.
    NoMatch,
}

/// Evaluate `input` against `markers` with a linear scan.
///
/// Two labels equal to the input (impossible for generated label sets) count as ambiguous.
pub fn evaluate<'a, M: Labelled>(input: &str, markers: &'a [M]) -> MatchResult<'a, M> {
    let mut exact = None;
    let mut prefixed = false;
    for marker in markers {
        let label = marker.label();
        if label.eq_ignore_ascii_case(input) {
            if exact.is_some() {
                return MatchResult::Ambiguous;
            }
            exact = Some(marker);
        } else if starts_with_ignore_case(label, input) {
            prefixed = true;
        }
    }
    match exact {
        Some(marker) => MatchResult::Exact(marker),
        None if prefixed => MatchResult::Ambiguous,
        None => MatchResult::NoMatch,
    }
}

/// Whether some label has the input's character at `position` in the same position.
///
/// Returns `false` when `input` is shorter than `position + 1`.
pub fn has_prefix_at<M: Labelled>(input: &str, markers: &[M], position: usize) -> bool {
    let Some(typed) = input.chars().nth(position) else {
        return false;
    };
    markers.iter().any(|marker| {
        marker
            .label()
            .chars()
            .nth(position)
            .is_some_and(|ch| ch.eq_ignore_ascii_case(&typed))
    })
}

/// Whether a marker labelled `label` is shown for `input`: the label starts with it.
pub fn is_visible(label: &str, input: &str) -> bool {
    starts_with_ignore_case(label, input)
}

/// Whether any marker is visible for `input`.
pub fn any_prefix<M: Labelled>(input: &str, markers: &[M]) -> bool {
    markers
        .iter()
        .any(|marker| starts_with_ignore_case(marker.label(), input))
}

fn starts_with_ignore_case(label: &str, prefix: &str) -> bool {
    label
        .as_bytes()
        .get(..prefix.len())
        .is_some_and(|head| head.eq_ignore_ascii_case(prefix.as_bytes()))
}
