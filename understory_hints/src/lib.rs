// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

// After you edit the crate's doc comment, run this command, then check README.md for any missing links
// cargo rdme --workspace-project=understory_hints --heading-base-level=0

//! Understory Hints: keyboard hint markers for clicking anything without a pointer.
//!
//! A host asks for hints, every clickable element on screen gets a short
//! letter label, and typing a label clicks (or focuses) its element. This crate
//! is the toolkit-independent core of that interaction.
//!
//! - [`LabelGenerator`] assigns prefix-free labels over a configurable alphabet:
//!   single letters while they suffice, fixed-width multi-letter labels beyond.
//! - [`create_marker`] turns a label and an element into a [`Marker`] drawn on
//!   the host's surface at the element's top-left corner.
//! - [`evaluate`] matches typed input against the labels, case-insensitively,
//!   by exact prefix only.
//! - [`HintSession`] is the overlay state machine: show, narrow, activate,
//!   dismiss, and re-render on layout changes.
//! - [`KeyRepeat`] drives continuous scrolling while a scroll key is held.
//!
//! ## Host seams
//!
//! The core never touches a UI toolkit. Hosts implement two traits:
//!
//! - [`Document`]: element discovery by selector, bounding boxes, and activation.
//! - [`OverlaySurface`]: creation, update and destruction of marker nodes.
//!
//! The session owns every node it creates and gives each one back through
//! [`OverlaySurface::destroy`] on every teardown path, including showing hints
//! again while they are already up.
//!
//! ## Configuration
//!
//! [`HintConfig`] holds the selector, marker style, alphabet and policies. It
//! implements `serde` traits using the persisted setting names
//! (`clickableCssSelector`, `markerSize`, ...), and partial data merges over
//! the defaults.
//!
//! ```
//! use understory_hints::{HintConfig, LabelGenerator};
//!
//! let config = HintConfig::default();
//! assert_eq!(config.style.size, 12);
//!
//! let labels = LabelGenerator::new("asdf").unwrap().generate(5);
//! assert_eq!(labels, ["aa", "as", "ad", "af", "sa"]);
//! ```
//!
//! ## Timing
//!
//! Nothing here owns a clock or a thread. Timestamps are host-supplied
//! milliseconds, and every handler runs to completion before returning.
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

mod config;
mod error;
mod host;
mod label;
mod marker;
mod matching;
mod repeat;
mod session;

#[cfg(test)]
mod testing;

pub use config::{
    Color, DEFAULT_CLICKABLE_SELECTORS, EmptyBackspace, HintConfig, MarkerStyle, MismatchPolicy,
    ScrollConfig, default_clickable_selector,
};
pub use error::ConfigError;
pub use host::{Document, OverlaySurface};
pub use label::{DEFAULT_ALPHABET, LabelGenerator};
pub use marker::{Changes, Glyph, Marker, MarkerView, create_marker};
pub use matching::{Labelled, MatchResult, any_prefix, evaluate, has_prefix_at, is_visible};
pub use repeat::{KeyRepeat, ScrollDirection};
pub use session::{Activation, DismissReason, EventResult, HintEvent, HintSession, Key};
