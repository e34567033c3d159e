// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Overlay configuration: clickable selector, marker style, labels, and policies.
//!
//! [`HintConfig`] is plain data read by the session when markers are shown; edits
//! take effect on the next show. It (de)serializes with `serde` using the key
//! names of the plugin's persisted settings (`clickableCssSelector`, `markerSize`,
//! `markerColor`, `markerBackgroundColor`, `markerOpacity`), and every field has a
//! default, so partially stored data is merged over [`HintConfig::default`].

use alloc::string::{String, ToString};
use core::fmt;
use core::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::label::{DEFAULT_ALPHABET, LabelGenerator};
use crate::repeat::ScrollDirection;

/// Selectors matched by the default clickable query, in priority order.
pub const DEFAULT_CLICKABLE_SELECTORS: &[&str] = &[
    ".clickable",
    ".clickable-icon",
    ".is-clickable",
    ".mod-clickable",
    ".workspace-tab-header",
    ".empty-state-action",
    ".workspace-tab-header-inner-close-button",
    ".menu-item",
    ".workspace-drawer-vault-switcher",
    // Canvas
    ".canvas-control-item",
    ".canvas-card-menu-button",
    ".canvas-color-picker-item",
    // Elements
    "a",
    "button",
    "input[type='button']",
    "input[type='submit']",
    "input[type='reset']",
    "[role='button']",
    "[tabindex]",
];

/// The default clickable selector: [`DEFAULT_CLICKABLE_SELECTORS`] joined into one selector list.
pub fn default_clickable_selector() -> String {
    DEFAULT_CLICKABLE_SELECTORS.join(", ")
}

/// An opaque RGB color, written as `#rrggbb`.
///
/// ```rust
/// use understory_hints::Color;
///
/// let yellow: Color = "#FFFF00".parse().unwrap();
/// assert_eq!(yellow, Color::rgb(255, 255, 0));
/// assert_eq!(yellow.to_string(), "#ffff00");
/// ```
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Color {
    /// Red channel.
    pub r: u8,
    /// Green channel.
    pub g: u8,
    /// Blue channel.
    pub b: u8,
}

impl Color {
    /// Black.
    pub const BLACK: Self = Self::rgb(0, 0, 0);
    /// Pure yellow.
    pub const YELLOW: Self = Self::rgb(255, 255, 0);

    /// Create a color from its channels.
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }
}

impl FromStr for Color {
    type Err = ConfigError;

    /// Parse `#rgb` or `#rrggbb` (hex digits in either case).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || ConfigError::InvalidColor(s.to_string());
        let digits = s.strip_prefix('#').ok_or_else(invalid)?;
        if !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(invalid());
        }
        let channel = |hex: &str| u8::from_str_radix(hex, 16).map_err(|_| invalid());
        match digits.len() {
            6 => Ok(Self::rgb(
                channel(&digits[0..2])?,
                channel(&digits[2..4])?,
                channel(&digits[4..6])?,
            )),
            // #rgb is shorthand for #rrggbb.
            3 => Ok(Self::rgb(
                channel(&digits[0..1])? * 0x11,
                channel(&digits[1..2])? * 0x11,
                channel(&digits[2..3])? * 0x11,
            )),
            _ => Err(invalid()),
        }
    }
}

impl TryFrom<String> for Color {
    type Error = ConfigError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Color> for String {
    fn from(color: Color) -> Self {
        color.to_string()
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

/// Visual style applied to the marker container.
///
/// The session hands this to [`OverlaySurface::create_container`](crate::OverlaySurface::create_container)
/// when markers are shown; the surface decides how to apply it.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MarkerStyle {
    /// Font size of marker text, in logical pixels.
    #[serde(rename = "markerSize")]
    pub size: u32,
    /// Text color.
    #[serde(rename = "markerColor")]
    pub color: Color,
    /// Background color.
    #[serde(rename = "markerBackgroundColor")]
    pub background: Color,
    /// Opacity in `0.0..=1.0`.
    #[serde(rename = "markerOpacity")]
    pub opacity: f64,
}

impl Default for MarkerStyle {
    fn default() -> Self {
        Self {
            size: 12,
            color: Color::BLACK,
            background: Color::YELLOW,
            opacity: 1.0,
        }
    }
}

impl MarkerStyle {
    /// Check size and opacity ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.size == 0 {
            return Err(ConfigError::InvalidMarkerSize);
        }
        if !(0.0..=1.0).contains(&self.opacity) {
            return Err(ConfigError::OpacityOutOfRange(self.opacity));
        }
        Ok(())
    }
}

/// What a typed letter does when no marker label starts with the input any more.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MismatchPolicy {
    /// Keep the overlay open with every marker hidden; Backspace can recover.
    Keep,
    /// Dismiss the overlay as soon as the input is not a prefix of any label.
    #[default]
    Dismiss,
}

/// What Backspace does when the input is already empty.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum EmptyBackspace {
    /// Let the key through to the host untouched.
    #[default]
    Ignore,
    /// Treat it like Escape.
    Dismiss,
}

/// Continuous scrolling while a scroll key is held.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ScrollConfig {
    /// Milliseconds between repeated scroll steps.
    pub interval_ms: u64,
    /// Distance of one scroll step, in logical pixels.
    pub step: f64,
    /// Key that scrolls down.
    pub down_key: char,
    /// Key that scrolls up.
    pub up_key: char,
}

impl Default for ScrollConfig {
    fn default() -> Self {
        Self {
            interval_ms: 50,
            step: 40.0,
            down_key: 'j',
            up_key: 'k',
        }
    }
}

impl ScrollConfig {
    /// Direction bound to `key`, if any. Comparison ignores ASCII case.
    pub fn direction_for(&self, key: char) -> Option<ScrollDirection> {
        if key.eq_ignore_ascii_case(&self.down_key) {
            Some(ScrollDirection::Down)
        } else if key.eq_ignore_ascii_case(&self.up_key) {
            Some(ScrollDirection::Up)
        } else {
            None
        }
    }

    /// Signed vertical delta of one step in `direction` (down is positive).
    pub fn delta(&self, direction: ScrollDirection) -> f64 {
        match direction {
            ScrollDirection::Down => self.step,
            ScrollDirection::Up => -self.step,
        }
    }
}

/// Configuration read by [`HintSession`](crate::HintSession) each time markers are shown.
///
/// ```rust
/// use understory_hints::{HintConfig, MismatchPolicy};
///
/// let mut config = HintConfig::default();
/// config.on_mismatch = MismatchPolicy::Keep;
/// config.set_marker_size_text("16px");
/// assert_eq!(config.style.size, 16);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct HintConfig {
    /// Selector passed to [`Document::clickable_elements`](crate::Document::clickable_elements).
    ///
    /// The core does not interpret it.
    #[serde(rename = "clickableCssSelector")]
    pub selector: String,
    /// Marker appearance.
    #[serde(flatten)]
    pub style: MarkerStyle,
    /// Letters used to build labels.
    pub alphabet: String,
    /// Upper bound on labelled elements per show; `None` labels every element.
    pub max_labels: Option<usize>,
    /// Behavior when the input stops matching every label.
    pub on_mismatch: MismatchPolicy,
    /// Behavior of Backspace on empty input.
    pub empty_backspace: EmptyBackspace,
    /// Whether a pointer press outside the markers dismisses the overlay.
    pub dismiss_on_pointer_outside: bool,
    /// Held-key scrolling.
    pub scroll: ScrollConfig,
}

impl Default for HintConfig {
    fn default() -> Self {
        Self {
            selector: default_clickable_selector(),
            style: MarkerStyle::default(),
            alphabet: DEFAULT_ALPHABET.to_string(),
            max_labels: None,
            on_mismatch: MismatchPolicy::default(),
            empty_backspace: EmptyBackspace::default(),
            dismiss_on_pointer_outside: true,
            scroll: ScrollConfig::default(),
        }
    }
}

impl HintConfig {
    /// Check every field, returning the first problem found.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.label_generator()?;
        self.style.validate()?;
        if self.scroll.interval_ms == 0 {
            return Err(ConfigError::InvalidScrollInterval);
        }
        Ok(())
    }

    /// Build the label generator for [`HintConfig::alphabet`].
    pub fn label_generator(&self) -> Result<LabelGenerator, ConfigError> {
        LabelGenerator::new(&self.alphabet)
    }

    /// Number of elements to label when `discovered` elements were found.
    pub fn label_budget(&self, discovered: usize) -> usize {
        self.max_labels.map_or(discovered, |max| discovered.min(max))
    }

    /// Set the marker size from free-form text such as `"14"` or `"14px"`.
    ///
    /// Leading digits are used; anything unparseable (or zero) restores the default size.
    pub fn set_marker_size_text(&mut self, text: &str) {
        let text = text.trim();
        let digits = text
            .find(|c: char| !c.is_ascii_digit())
            .map_or(text, |end| &text[..end]);
        self.style.size = match digits.parse::<u32>() {
            Ok(size) if size > 0 => size,
            _ => MarkerStyle::default().size,
        };
    }

    /// Set opacity from a percentage slider value, clamped to `10..=100`.
    pub fn set_opacity_percent(&mut self, percent: u8) {
        self.style.opacity = f64::from(percent.clamp(10, 100)) / 100.0;
    }

    /// Restore the default marker style, leaving selector and policies alone.
    pub fn reset_style(&mut self) {
        self.style = MarkerStyle::default();
    }

    /// Scroll direction bound to `key`, if any.
    pub fn scroll_binding(&self, key: char) -> Option<ScrollDirection> {
        self.scroll.direction_for(key)
    }
}

impl fmt::Display for MismatchPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Keep => "keep",
            Self::Dismiss => "dismiss",
        })
    }
}

impl fmt::Display for MarkerStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}px {} on {} @ {:.2}",
            self.size, self.color, self.background, self.opacity
        )
    }
}
