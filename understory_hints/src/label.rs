// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Label generation: short, distinct, prefix-free marker labels.

use alloc::string::String;
use alloc::vec::Vec;

use hashbrown::HashSet;
use smallvec::{SmallVec, smallvec};

use crate::error::ConfigError;

/// Letters used for labels unless configured otherwise.
pub const DEFAULT_ALPHABET: &str = "abcdefghijklmnopqrstuvwxyz";

/// Deterministic generator of marker labels over a fixed alphabet.
///
/// For `count <= k` (where `k` is the alphabet size) labels are single letters
/// in alphabet order. Above that, every label has the same width: the smallest
/// `w` with `k^w >= count`. Each label is the base-`k` encoding of its index,
/// most significant letter first. Keeping all labels the same width makes the
/// set prefix-free, so typing any complete label never passes through another.
///
/// ```rust
/// use understory_hints::LabelGenerator;
///
/// let labels = LabelGenerator::default();
/// assert_eq!(labels.generate(3), ["a", "b", "c"]);
///
/// let wide = labels.generate(28);
/// assert_eq!(&wide[..3], ["aa", "ab", "ac"]);
/// assert_eq!(wide[27], "bb");
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LabelGenerator {
    alphabet: Vec<char>,
}

impl Default for LabelGenerator {
    fn default() -> Self {
        Self {
            alphabet: DEFAULT_ALPHABET.chars().collect(),
        }
    }
}

impl LabelGenerator {
    /// Create a generator over `alphabet`.
    ///
    /// Letters are normalized to lowercase. The alphabet must be non-empty,
    /// contain only ASCII letters, and not repeat a letter.
    pub fn new(alphabet: &str) -> Result<Self, ConfigError> {
        let mut seen = HashSet::with_capacity(alphabet.len());
        let mut letters = Vec::with_capacity(alphabet.len());
        for ch in alphabet.chars() {
            if !ch.is_ascii_alphabetic() {
                return Err(ConfigError::InvalidAlphabetChar(ch));
            }
            let lower = ch.to_ascii_lowercase();
            if !seen.insert(lower) {
                return Err(ConfigError::DuplicateAlphabetChar(lower));
            }
            letters.push(lower);
        }
        if letters.is_empty() {
            return Err(ConfigError::EmptyAlphabet);
        }
        Ok(Self { alphabet: letters })
    }

    /// The normalized alphabet.
    pub fn alphabet(&self) -> &[char] {
        &self.alphabet
    }

    /// Number of labels [`generate`](Self::generate) yields for `count` targets.
    ///
    /// Equal to `count`, except that a one-letter alphabet can only label a
    /// single target.
    pub fn label_count(&self, count: usize) -> usize {
        if self.alphabet.len() == 1 {
            count.min(1)
        } else {
            count
        }
    }

    /// Width of every label in a set of `count` labels.
    pub fn width_for(&self, count: usize) -> usize {
        let k = self.alphabet.len();
        if k == 1 {
            return 1;
        }
        let mut width = 1;
        let mut capacity = k;
        while capacity < count {
            capacity = capacity.saturating_mul(k);
            width += 1;
        }
        width
    }

    /// Generate labels for `count` targets, in assignment order.
    pub fn generate(&self, count: usize) -> Vec<String> {
        let count = self.label_count(count);
        let width = self.width_for(count);
        (0..count).map(|index| self.encode(index, width)).collect()
    }

    /// The label at `index` in a set of `count` labels.
    ///
    /// Agrees with `generate(count)[index]`; returns `None` when `index` is out of range.
    pub fn label_for(&self, index: usize, count: usize) -> Option<String> {
        (index < self.label_count(count)).then(|| self.encode(index, self.width_for(count)))
    }

    fn encode(&self, mut index: usize, width: usize) -> String {
        let k = self.alphabet.len();
        let mut letters: SmallVec<[char; 8]> = smallvec![self.alphabet[0]; width];
        for slot in letters.iter_mut().rev() {
            *slot = self.alphabet[index % k];
            index /= k;
        }
        letters.into_iter().collect()
    }
}
