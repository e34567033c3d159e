// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Held-key repetition for continuous scrolling.
//!
//! [`KeyRepeat`] is a cancellable repeating task driven entirely by host
//! timestamps: it owns no timer and spawns nothing. The host arms it on
//! key-down, disarms it on the matching key-up (and on teardown), and calls
//! [`KeyRepeat::poll`] from whatever timer or frame callback it already has.
//!
//! ```
//! use understory_hints::KeyRepeat;
//!
//! let mut repeat = KeyRepeat::new(50);
//! assert!(repeat.start('j', 1000)); // first press: host scrolls once now
//! assert_eq!(repeat.poll(1040), 0);
//! assert_eq!(repeat.poll(1100), 2); // steps due at 1050 and 1100
//! assert!(repeat.stop(&'j'));
//! assert!(!repeat.stop(&'j')); // releasing twice is harmless
//! assert_eq!(repeat.poll(2000), 0);
//! ```

/// Vertical scroll direction.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum ScrollDirection {
    /// Towards the start of the document.
    Up,
    /// Towards the end of the document.
    Down,
}

/// A repeating task armed while a key is held.
///
/// Timestamps are milliseconds on any monotonic clock the host chooses; they
/// only need to be consistent across calls.
#[derive(Clone, Debug)]
pub struct KeyRepeat<K> {
    interval: u64,
    held: Option<Held<K>>,
}

#[derive(Clone, Debug)]
struct Held<K> {
    key: K,
    next_due: u64,
}

impl<K: PartialEq> KeyRepeat<K> {
    /// Create a stopped repeater firing every `interval_ms` milliseconds.
    ///
    /// An interval of zero is treated as one millisecond.
    pub fn new(interval_ms: u64) -> Self {
        Self {
            interval: interval_ms.max(1),
            held: None,
        }
    }

    /// Interval between steps, in milliseconds.
    pub fn interval(&self) -> u64 {
        self.interval
    }

    /// Change the interval. Takes effect from the next due step onwards.
    pub fn set_interval(&mut self, interval_ms: u64) {
        self.interval = interval_ms.max(1);
    }

    /// Arm the repeat for `key` at time `now`.
    ///
    /// Returns `true` when this press started (or switched to) `key`; the host
    /// should perform one step immediately. A repeated key-down for the key
    /// already held (for example OS auto-repeat) returns `false` and changes nothing.
    pub fn start(&mut self, key: K, now: u64) -> bool {
        if let Some(held) = &self.held
            && held.key == key
        {
            return false;
        }
        self.held = Some(Held {
            key,
            next_due: now.saturating_add(self.interval),
        });
        true
    }

    /// Disarm if `key` is the held key. Returns whether anything was stopped.
    pub fn stop(&mut self, key: &K) -> bool {
        if self.held.as_ref().is_some_and(|held| held.key == *key) {
            self.held = None;
            true
        } else {
            false
        }
    }

    /// Disarm regardless of which key is held. Returns whether anything was stopped.
    pub fn stop_all(&mut self) -> bool {
        self.held.take().is_some()
    }

    /// Whether a key is currently held.
    pub fn is_running(&self) -> bool {
        self.held.is_some()
    }

    /// The held key, if any.
    pub fn held_key(&self) -> Option<&K> {
        self.held.as_ref().map(|held| &held.key)
    }

    /// Timestamp at which the next step becomes due.
    pub fn next_deadline(&self) -> Option<u64> {
        self.held.as_ref().map(|held| held.next_due)
    }

    /// Number of steps that became due up to and including `now`.
    ///
    /// Always zero while stopped. Missed intervals (for example after the host
    /// was busy) are reported together rather than dropped.
    pub fn poll(&mut self, now: u64) -> u32 {
        let interval = self.interval;
        let Some(held) = &mut self.held else {
            return 0;
        };
        if now < held.next_due {
            return 0;
        }
        let steps = (now - held.next_due) / interval + 1;
        held.next_due = held
            .next_due
            .saturating_add(steps.saturating_mul(interval));
        u32::try_from(steps).unwrap_or(u32::MAX)
    }
}
