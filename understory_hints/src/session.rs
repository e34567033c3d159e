// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The overlay session: a state machine driven by host events.
//!
//! A [`HintSession`] is either inactive or showing an overlay. Each call to
//! [`HintSession::handle`] runs to completion: markers are created, re-rendered
//! or destroyed through the host's [`OverlaySurface`] before it returns, and the
//! returned [`EventResult`] tells the host what happened and whether to swallow
//! the native event.
//!
//! ## Lifecycle
//!
//! - [`HintEvent::Show`] discovers clickable elements, labels them, and mounts
//!   one marker per element that has on-screen area. Showing while already
//!   active tears the old overlay down first.
//! - Letters narrow the visible markers. Typing a full label activates its
//!   target: editable targets are focused, everything else is clicked.
//! - Escape, a pointer press outside the overlay, and (depending on
//!   [`HintConfig`]) a dead-end input or Backspace on empty input dismiss it.
//!
//! Every exit path destroys every node the session created.
//!
//! ## Example
//!
//! ```
//! use kurbo::Rect;
//! use understory_hints::{
//!     Activation, Document, EventResult, HintConfig, HintEvent, HintSession, Key, MarkerStyle,
//!     MarkerView, Changes, OverlaySurface,
//! };
//!
//! struct Page {
//!     links: Vec<Rect>,
//!     clicked: Option<usize>,
//! }
//!
//! impl Document for Page {
//!     type Element = usize;
//!     fn clickable_elements(&self, _selector: &str) -> Vec<usize> {
//!         (0..self.links.len()).collect()
//!     }
//!     fn bounding_box(&self, element: &usize) -> Option<Rect> {
//!         self.links.get(*element).copied()
//!     }
//!     fn is_content_editable(&self, _element: &usize) -> bool {
//!         false
//!     }
//!     fn click(&mut self, element: &usize) {
//!         self.clicked = Some(*element);
//!     }
//!     fn focus(&mut self, _element: &usize) {}
//! }
//!
//! /// Counts live nodes.
//! #[derive(Default)]
//! struct Nodes(usize);
//!
//! impl OverlaySurface for Nodes {
//!     type Handle = ();
//!     fn create_container(&mut self, _style: &MarkerStyle) {
//!         self.0 += 1;
//!     }
//!     fn create_marker(&mut self, _container: &(), _view: &MarkerView) {
//!         self.0 += 1;
//!     }
//!     fn update_marker(&mut self, _handle: &mut (), _view: &MarkerView, _changes: Changes) {}
//!     fn destroy(&mut self, _handle: ()) {
//!         self.0 -= 1;
//!     }
//! }
//!
//! let mut page = Page {
//!     links: vec![Rect::new(0.0, 0.0, 40.0, 12.0), Rect::new(0.0, 20.0, 40.0, 32.0)],
//!     clicked: None,
//! };
//! let mut nodes = Nodes::default();
//! let mut session = HintSession::new(HintConfig::default()).unwrap();
//!
//! let shown = session.handle(HintEvent::Show, &mut page, &mut nodes);
//! assert!(matches!(shown, EventResult::Shown { markers: 2, .. }));
//! assert_eq!(nodes.0, 3);
//!
//! let result = session.handle(HintEvent::Key(Key::Character('B')), &mut page, &mut nodes);
//! assert_eq!(result, EventResult::Activated(Activation::Click));
//! assert_eq!(page.clicked, Some(1));
//! assert_eq!(nodes.0, 0);
//! assert!(!session.is_active());
//! ```

use alloc::string::String;
use alloc::vec::Vec;
use core::fmt;

use tracing::{debug, trace};

use crate::config::{EmptyBackspace, HintConfig, MismatchPolicy};
use crate::error::ConfigError;
use crate::host::{Document, OverlaySurface};
use crate::label::LabelGenerator;
use crate::marker::{Marker, create_marker};
use crate::matching::{MatchResult, any_prefix, evaluate};
use crate::repeat::KeyRepeat;

/// A key press, already decoded by the host.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Key {
    /// A printable character.
    Character(char),
    /// Backspace.
    Backspace,
    /// Escape.
    Escape,
    /// Any other key (arrows, function keys, modifiers on their own).
    Other,
}

/// Events a host delivers to a [`HintSession`].
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum HintEvent {
    /// The "show hints" command.
    Show,
    /// A key-down.
    Key(Key),
    /// A pointer press that did not land on a marker.
    PointerDownOutside,
    /// The viewport was resized or the layout changed.
    ViewportChanged,
}

/// How a target was activated.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Activation {
    /// The target was clicked.
    Click,
    /// The target takes text input and was focused instead.
    Focus,
}

/// Why an overlay was dismissed without activating anything.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum DismissReason {
    /// Escape was pressed.
    Escape,
    /// Backspace on empty input, with [`EmptyBackspace::Dismiss`].
    Backspace,
    /// A pointer press outside the overlay.
    PointerOutside,
    /// The input stopped matching every label, with [`MismatchPolicy::Dismiss`].
    NoMatch,
    /// [`HintSession::unload`].
    Unload,
}

impl fmt::Display for DismissReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Escape => "escape",
            Self::Backspace => "backspace",
            Self::PointerOutside => "pointer outside",
            Self::NoMatch => "no match",
            Self::Unload => "unload",
        })
    }
}

/// Outcome of [`HintSession::handle`].
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum EventResult {
    /// Nothing happened; let the event through.
    Ignored,
    /// An overlay was mounted.
    Shown {
        /// Markers created.
        markers: usize,
        /// Labelled elements that got no marker because they had no on-screen area.
        skipped: usize,
        /// Whether a previous overlay was torn down first.
        replaced: bool,
    },
    /// The input or the layout changed; the overlay is still up.
    Updated,
    /// The key was swallowed without changing anything.
    Consumed,
    /// A target was activated and the overlay removed.
    Activated(Activation),
    /// The overlay was removed without activating anything.
    Dismissed(DismissReason),
}

impl EventResult {
    /// Whether the host should stop the native event from reaching the page.
    ///
    /// Key events handled by an active overlay are swallowed. Ignored events,
    /// and the pointer press that dismisses the overlay, pass through.
    pub fn prevents_default(&self) -> bool {
        !matches!(
            self,
            Self::Ignored | Self::Dismissed(DismissReason::PointerOutside)
        )
    }
}

struct Overlay<E, H> {
    input: String,
    markers: Vec<Marker<E, H>>,
    container: H,
}

enum State<E, H> {
    Inactive,
    Active(Overlay<E, H>),
}

/// Keyboard hint overlay state.
///
/// `E` is the host's element reference ([`Document::Element`]) and `H` the
/// surface's node handle ([`OverlaySurface::Handle`]). The session owns every
/// handle it creates and destroys all of them on each teardown.
///
/// Dropping an active session does not destroy its nodes, since no surface is
/// at hand; call [`HintSession::unload`] when the host shuts down.
pub struct HintSession<E, H> {
    config: HintConfig,
    labels: LabelGenerator,
    state: State<E, H>,
    scroll: KeyRepeat<char>,
}

impl<E: fmt::Debug, H> fmt::Debug for HintSession<E, H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut s = f.debug_struct("HintSession");
        s.field("active", &self.is_active())
            .field("input", &self.input())
            .field("markers", &self.markers())
            .field("scroll", &self.scroll);
        s.finish_non_exhaustive()
    }
}

impl<E, H> Default for HintSession<E, H> {
    fn default() -> Self {
        let config = HintConfig::default();
        Self {
            scroll: KeyRepeat::new(config.scroll.interval_ms),
            config,
            labels: LabelGenerator::default(),
            state: State::Inactive,
        }
    }
}

impl<E, H> HintSession<E, H> {
    /// Create an inactive session.
    ///
    /// Fails if `config` does not pass [`HintConfig::validate`].
    pub fn new(config: HintConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            labels: config.label_generator()?,
            scroll: KeyRepeat::new(config.scroll.interval_ms),
            config,
            state: State::Inactive,
        })
    }

    /// The active configuration.
    pub fn config(&self) -> &HintConfig {
        &self.config
    }

    /// Replace the configuration.
    ///
    /// An overlay already showing keeps its labels and style; the new values
    /// apply from the next show. On error the previous configuration stays.
    pub fn set_config(&mut self, config: HintConfig) -> Result<(), ConfigError> {
        config.validate()?;
        self.labels = config.label_generator()?;
        self.scroll.set_interval(config.scroll.interval_ms);
        self.config = config;
        Ok(())
    }

    /// Whether an overlay is showing.
    pub fn is_active(&self) -> bool {
        matches!(self.state, State::Active(_))
    }

    /// The letters typed so far, lowercased. Empty while inactive.
    pub fn input(&self) -> &str {
        match &self.state {
            State::Active(overlay) => &overlay.input,
            State::Inactive => "",
        }
    }

    /// Markers of the current overlay, in label order. Empty while inactive.
    pub fn markers(&self) -> &[Marker<E, H>] {
        match &self.state {
            State::Active(overlay) => &overlay.markers,
            State::Inactive => &[],
        }
    }

    /// Handle one host event.
    pub fn handle<D, S>(&mut self, event: HintEvent, document: &mut D, surface: &mut S) -> EventResult
    where
        D: Document<Element = E>,
        S: OverlaySurface<Handle = H>,
    {
        match event {
            HintEvent::Show => self.show(document, surface),
            HintEvent::Key(key) => self.key(key, document, surface),
            HintEvent::PointerDownOutside => {
                if self.is_active() && self.config.dismiss_on_pointer_outside {
                    self.dismiss(DismissReason::PointerOutside, surface)
                } else {
                    EventResult::Ignored
                }
            }
            HintEvent::ViewportChanged => {
                let State::Active(overlay) = &mut self.state else {
                    return EventResult::Ignored;
                };
                overlay.render(document, surface);
                EventResult::Updated
            }
        }
    }

    /// Tear down any overlay and stop scrolling. Safe to call repeatedly.
    ///
    /// Returns [`DismissReason::Unload`] if an overlay was removed.
    pub fn unload<S: OverlaySurface<Handle = H>>(&mut self, surface: &mut S) -> EventResult {
        self.scroll.stop_all();
        if self.is_active() {
            self.dismiss(DismissReason::Unload, surface)
        } else {
            EventResult::Ignored
        }
    }

    /// Key-down for continuous scrolling, at host time `now` in milliseconds.
    ///
    /// Returns `None` when `key` is not a scroll binding or an overlay is
    /// showing (letters belong to the overlay then). Otherwise the host should
    /// swallow the key and scroll by the returned delta now; the delta is zero
    /// for an auto-repeated key-down of the key already held.
    pub fn scroll_key_down(&mut self, key: char, now: u64) -> Option<f64> {
        if self.is_active() {
            return None;
        }
        let key = key.to_ascii_lowercase();
        let direction = self.config.scroll_binding(key)?;
        if self.scroll.start(key, now) {
            trace!(%key, ?direction, "scroll started");
            Some(self.config.scroll.delta(direction))
        } else {
            Some(0.0)
        }
    }

    /// Key-up for continuous scrolling. Returns whether a repeat was stopped.
    pub fn scroll_key_up(&mut self, key: char) -> bool {
        self.scroll.stop(&key.to_ascii_lowercase())
    }

    /// Total scroll delta that became due up to `now`; zero when no scroll key is held.
    pub fn poll_scroll(&mut self, now: u64) -> f64 {
        let Some(direction) = self
            .scroll
            .held_key()
            .and_then(|key| self.config.scroll_binding(*key))
        else {
            return 0.0;
        };
        let steps = self.scroll.poll(now);
        f64::from(steps) * self.config.scroll.delta(direction)
    }

    /// When the host should next call [`HintSession::poll_scroll`].
    pub fn next_scroll_deadline(&self) -> Option<u64> {
        self.scroll.next_deadline()
    }

    fn show<D, S>(&mut self, document: &mut D, surface: &mut S) -> EventResult
    where
        D: Document<Element = E>,
        S: OverlaySurface<Handle = H>,
    {
        self.scroll.stop_all();
        let replaced = self.teardown(surface);

        let elements = document.clickable_elements(&self.config.selector);
        let budget = self.config.label_budget(elements.len());
        let labels = self.labels.generate(budget);

        let container = surface.create_container(&self.config.style);
        let mut markers = Vec::with_capacity(labels.len());
        let mut skipped = 0;
        // Labels are consumed in document order even when an element is skipped.
        for (label, element) in labels.into_iter().zip(elements) {
            match create_marker(label, element, "", &*document, surface, &container) {
                Some(marker) => markers.push(marker),
                None => skipped += 1,
            }
        }
        let created = markers.len();
        debug!(markers = created, skipped, replaced, "hints shown");
        self.state = State::Active(Overlay {
            input: String::new(),
            markers,
            container,
        });
        EventResult::Shown {
            markers: created,
            skipped,
            replaced,
        }
    }

    fn key<D, S>(&mut self, key: Key, document: &mut D, surface: &mut S) -> EventResult
    where
        D: Document<Element = E>,
        S: OverlaySurface<Handle = H>,
    {
        let State::Active(overlay) = &mut self.state else {
            return EventResult::Ignored;
        };
        match key {
            Key::Escape => self.dismiss(DismissReason::Escape, surface),
            Key::Backspace => {
                if overlay.input.pop().is_some() {
                    overlay.render(document, surface);
                    return EventResult::Updated;
                }
                match self.config.empty_backspace {
                    EmptyBackspace::Ignore => EventResult::Ignored,
                    EmptyBackspace::Dismiss => self.dismiss(DismissReason::Backspace, surface),
                }
            }
            Key::Character(ch) if ch.is_ascii_alphabetic() => {
                overlay.input.push(ch.to_ascii_lowercase());
                if let MatchResult::Exact(marker) = evaluate(&overlay.input, &overlay.markers) {
                    let activation = activate(document, marker.target());
                    debug!(input = %overlay.input, ?activation, "hint activated");
                    self.teardown(surface);
                    return EventResult::Activated(activation);
                }
                if self.config.on_mismatch == MismatchPolicy::Dismiss
                    && !any_prefix(&overlay.input, &overlay.markers)
                {
                    return self.dismiss(DismissReason::NoMatch, surface);
                }
                overlay.render(document, surface);
                EventResult::Updated
            }
            Key::Character(_) | Key::Other => EventResult::Consumed,
        }
    }

    fn dismiss<S: OverlaySurface<Handle = H>>(
        &mut self,
        reason: DismissReason,
        surface: &mut S,
    ) -> EventResult {
        debug!(%reason, input = self.input(), "hints dismissed");
        self.teardown(surface);
        EventResult::Dismissed(reason)
    }

    /// Destroy every node of the current overlay. Returns whether one existed.
    fn teardown<S: OverlaySurface<Handle = H>>(&mut self, surface: &mut S) -> bool {
        let State::Active(overlay) = core::mem::replace(&mut self.state, State::Inactive) else {
            return false;
        };
        for marker in overlay.markers {
            surface.destroy(marker.into_handle());
        }
        surface.destroy(overlay.container);
        true
    }
}

/// Focus editable targets, click everything else.
fn activate<D: Document>(document: &mut D, target: &D::Element) -> Activation {
    if document.is_content_editable(target) {
        document.focus(target);
        Activation::Focus
    } else {
        document.click(target);
        Activation::Click
    }
}

impl<E, H> Overlay<E, H> {
    fn render<D, S>(&mut self, document: &D, surface: &mut S)
    where
        D: Document<Element = E>,
        S: OverlaySurface<Handle = H>,
    {
        let mut changed = 0_usize;
        for marker in &mut self.markers {
            if !marker.refresh(&self.input, document, surface).is_empty() {
                changed += 1;
            }
        }
        trace!(input = %self.input, changed, "markers re-rendered");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{Color, MarkerStyle};
    use crate::testing::{TestDocument, TestHandle, TestSurface};
    use alloc::string::ToString;
    use kurbo::{Point, Rect};

    type Session = HintSession<u32, TestHandle>;

    fn boxes(n: usize) -> Vec<Rect> {
        (0..n)
            .map(|i| {
                let y = i as f64 * 20.0;
                Rect::new(0.0, y, 50.0, y + 10.0)
            })
            .collect()
    }

    fn press(
        session: &mut Session,
        key: Key,
        doc: &mut TestDocument,
        surface: &mut TestSurface,
    ) -> EventResult {
        session.handle(HintEvent::Key(key), doc, surface)
    }

    fn type_str(
        session: &mut Session,
        text: &str,
        doc: &mut TestDocument,
        surface: &mut TestSurface,
    ) -> EventResult {
        let mut last = EventResult::Ignored;
        for ch in text.chars() {
            last = press(session, Key::Character(ch), doc, surface);
        }
        last
    }

    fn visible_labels(session: &Session) -> Vec<&str> {
        session
            .markers()
            .iter()
            .filter(|m| m.view().visible)
            .map(|m| m.label())
            .collect()
    }

    #[test]
    fn three_elements_single_letter_activation() {
        let mut doc = TestDocument::with_rects(&boxes(3));
        let mut surface = TestSurface::default();
        let mut session = Session::default();

        let shown = session.handle(HintEvent::Show, &mut doc, &mut surface);
        assert_eq!(
            shown,
            EventResult::Shown {
                markers: 3,
                skipped: 0,
                replaced: false
            }
        );
        let labels: Vec<_> = session.markers().iter().map(|m| m.label()).collect();
        assert_eq!(labels, ["a", "b", "c"]);
        assert_eq!(surface.live_nodes(), 4);

        let result = press(&mut session, Key::Character('b'), &mut doc, &mut surface);
        assert_eq!(result, EventResult::Activated(Activation::Click));
        assert!(result.prevents_default());
        assert_eq!(doc.clicked, [1]);
        assert!(!session.is_active());
        assert_eq!(session.input(), "");
        assert_eq!(surface.live_nodes(), 0);
    }

    #[test]
    fn two_letter_labels_narrow_then_activate() {
        let mut doc = TestDocument::with_rects(&boxes(30));
        let mut surface = TestSurface::default();
        let mut session = Session::default();
        session.handle(HintEvent::Show, &mut doc, &mut surface);

        let result = press(&mut session, Key::Character('A'), &mut doc, &mut surface);
        assert_eq!(result, EventResult::Updated);
        assert_eq!(session.input(), "a");
        let visible = visible_labels(&session);
        assert_eq!(visible.len(), 26);
        assert!(visible.iter().all(|l| l.starts_with('a')));
        let first = &session.markers()[0];
        assert!(first.view().glyphs[0].matched);
        assert_eq!(surface.view(first.handle()), Some(first.view()));

        // "ab" is the second element.
        let result = press(&mut session, Key::Character('b'), &mut doc, &mut surface);
        assert_eq!(result, EventResult::Activated(Activation::Click));
        assert_eq!(doc.clicked, [1]);
        assert_eq!(surface.live_nodes(), 0);
    }

    #[test]
    fn backspace_restores_visibility_then_escape_dismisses() {
        let mut doc = TestDocument::with_rects(&boxes(30));
        let mut surface = TestSurface::default();
        let mut session = Session::default();
        session.handle(HintEvent::Show, &mut doc, &mut surface);

        type_str(&mut session, "b", &mut doc, &mut surface);
        assert_eq!(visible_labels(&session), ["ba", "bb", "bc", "bd"]);

        let result = press(&mut session, Key::Backspace, &mut doc, &mut surface);
        assert_eq!(result, EventResult::Updated);
        assert_eq!(session.input(), "");
        assert_eq!(visible_labels(&session).len(), 30);

        let result = press(&mut session, Key::Escape, &mut doc, &mut surface);
        assert_eq!(result, EventResult::Dismissed(DismissReason::Escape));
        assert!(result.prevents_default());
        assert_eq!(surface.live_nodes(), 0);
        assert!(doc.clicked.is_empty());
    }

    #[test]
    fn show_while_active_replaces_the_overlay() {
        let mut doc = TestDocument::with_rects(&boxes(3));
        let mut surface = TestSurface::default();
        let mut session = Session::default();
        session.handle(HintEvent::Show, &mut doc, &mut surface);

        let again = session.handle(HintEvent::Show, &mut doc, &mut surface);
        assert_eq!(
            again,
            EventResult::Shown {
                markers: 3,
                skipped: 0,
                replaced: true
            }
        );
        assert_eq!(surface.live_nodes(), 4);
        assert_eq!(surface.created(), 8);
    }

    #[test]
    fn reshow_resets_input() {
        let mut doc = TestDocument::with_rects(&boxes(30));
        let mut surface = TestSurface::default();
        let mut session = Session::default();
        session.handle(HintEvent::Show, &mut doc, &mut surface);
        type_str(&mut session, "a", &mut doc, &mut surface);
        assert_eq!(session.input(), "a");

        session.handle(HintEvent::Show, &mut doc, &mut surface);
        assert_eq!(session.input(), "");
        assert_eq!(visible_labels(&session).len(), 30);
        assert_eq!(surface.live_nodes(), 31);
    }

    #[test]
    fn dead_end_input_dismisses_by_default() {
        let mut doc = TestDocument::with_rects(&boxes(30));
        let mut surface = TestSurface::default();
        let mut session = Session::default();
        session.handle(HintEvent::Show, &mut doc, &mut surface);

        let result = type_str(&mut session, "bz", &mut doc, &mut surface);
        assert_eq!(result, EventResult::Dismissed(DismissReason::NoMatch));
        assert_eq!(surface.live_nodes(), 0);
        assert!(doc.clicked.is_empty());
    }

    #[test]
    fn keep_policy_hides_everything_until_backspace() {
        let mut doc = TestDocument::with_rects(&boxes(30));
        let mut surface = TestSurface::default();
        let config = HintConfig {
            on_mismatch: MismatchPolicy::Keep,
            ..HintConfig::default()
        };
        let mut session = Session::new(config).unwrap();
        session.handle(HintEvent::Show, &mut doc, &mut surface);

        let result = type_str(&mut session, "z", &mut doc, &mut surface);
        assert_eq!(result, EventResult::Updated);
        assert!(session.is_active());
        assert!(visible_labels(&session).is_empty());
        let (_, changes) = surface.last_update().unwrap();
        assert!(changes.contains(crate::Changes::VISIBILITY));

        press(&mut session, Key::Backspace, &mut doc, &mut surface);
        assert_eq!(visible_labels(&session).len(), 30);
    }

    #[test]
    fn empty_backspace_policies() {
        let mut doc = TestDocument::with_rects(&boxes(3));
        let mut surface = TestSurface::default();
        let mut session = Session::default();
        session.handle(HintEvent::Show, &mut doc, &mut surface);

        let result = press(&mut session, Key::Backspace, &mut doc, &mut surface);
        assert_eq!(result, EventResult::Ignored);
        assert!(!result.prevents_default());
        assert!(session.is_active());

        let config = HintConfig {
            empty_backspace: EmptyBackspace::Dismiss,
            ..HintConfig::default()
        };
        session.set_config(config).unwrap();
        let result = press(&mut session, Key::Backspace, &mut doc, &mut surface);
        assert_eq!(result, EventResult::Dismissed(DismissReason::Backspace));
        assert_eq!(surface.live_nodes(), 0);
    }

    #[test]
    fn non_letters_are_swallowed_without_effect() {
        let mut doc = TestDocument::with_rects(&boxes(30));
        let mut surface = TestSurface::default();
        let mut session = Session::default();
        session.handle(HintEvent::Show, &mut doc, &mut surface);
        type_str(&mut session, "a", &mut doc, &mut surface);

        for key in [Key::Character('1'), Key::Character(' '), Key::Character('é'), Key::Other] {
            let result = press(&mut session, key, &mut doc, &mut surface);
            assert_eq!(result, EventResult::Consumed);
            assert!(result.prevents_default());
        }
        assert_eq!(session.input(), "a");
        // 26 highlighted and 4 hidden by the 'a', nothing since.
        assert_eq!(surface.updates(), 30);
    }

    #[test]
    fn inactive_session_ignores_everything_but_show() {
        let mut doc = TestDocument::with_rects(&boxes(3));
        let mut surface = TestSurface::default();
        let mut session = Session::default();

        for event in [
            HintEvent::Key(Key::Character('a')),
            HintEvent::Key(Key::Backspace),
            HintEvent::Key(Key::Escape),
            HintEvent::Key(Key::Other),
            HintEvent::PointerDownOutside,
            HintEvent::ViewportChanged,
        ] {
            let result = session.handle(event, &mut doc, &mut surface);
            assert_eq!(result, EventResult::Ignored);
            assert!(!result.prevents_default());
        }
        assert!(doc.clicked.is_empty());
        assert_eq!(surface.created(), 0);
    }

    #[test]
    fn pointer_outside_dismisses_when_enabled() {
        let mut doc = TestDocument::with_rects(&boxes(3));
        let mut surface = TestSurface::default();
        let mut session = Session::default();
        session.handle(HintEvent::Show, &mut doc, &mut surface);

        let result = session.handle(HintEvent::PointerDownOutside, &mut doc, &mut surface);
        assert_eq!(result, EventResult::Dismissed(DismissReason::PointerOutside));
        assert!(!result.prevents_default());
        assert_eq!(surface.live_nodes(), 0);

        let config = HintConfig {
            dismiss_on_pointer_outside: false,
            ..HintConfig::default()
        };
        session.set_config(config).unwrap();
        session.handle(HintEvent::Show, &mut doc, &mut surface);
        let result = session.handle(HintEvent::PointerDownOutside, &mut doc, &mut surface);
        assert_eq!(result, EventResult::Ignored);
        assert!(session.is_active());
    }

    #[test]
    fn viewport_change_moves_markers_only() {
        let mut doc = TestDocument::with_rects(&boxes(30));
        let mut surface = TestSurface::default();
        let mut session = Session::default();
        session.handle(HintEvent::Show, &mut doc, &mut surface);
        type_str(&mut session, "a", &mut doc, &mut surface);
        let updates = surface.updates();

        doc.move_to(0, Rect::new(100.0, 200.0, 150.0, 210.0));
        let result = session.handle(HintEvent::ViewportChanged, &mut doc, &mut surface);
        assert_eq!(result, EventResult::Updated);
        assert_eq!(session.input(), "a");
        assert_eq!(session.markers().len(), 30);
        assert_eq!(session.markers()[0].view().position, Point::new(100.0, 200.0));
        assert_eq!(surface.updates(), updates + 1);
        assert_eq!(surface.last_update(), Some((1, crate::Changes::POSITION)));
    }

    #[test]
    fn zero_elements_still_mount_a_container() {
        let mut doc = TestDocument::new();
        let mut surface = TestSurface::default();
        let mut session = Session::default();

        let shown = session.handle(HintEvent::Show, &mut doc, &mut surface);
        assert_eq!(
            shown,
            EventResult::Shown {
                markers: 0,
                skipped: 0,
                replaced: false
            }
        );
        assert!(session.is_active());
        assert_eq!(surface.live_nodes(), 1);

        let result = press(&mut session, Key::Character('a'), &mut doc, &mut surface);
        assert_eq!(result, EventResult::Dismissed(DismissReason::NoMatch));
        assert_eq!(surface.live_nodes(), 0);
    }

    #[test]
    fn zero_elements_under_keep_wait_for_escape() {
        let mut doc = TestDocument::new();
        let mut surface = TestSurface::default();
        let config = HintConfig {
            on_mismatch: MismatchPolicy::Keep,
            ..HintConfig::default()
        };
        let mut session = Session::new(config).unwrap();
        session.handle(HintEvent::Show, &mut doc, &mut surface);

        assert_eq!(
            type_str(&mut session, "abc", &mut doc, &mut surface),
            EventResult::Updated
        );
        assert_eq!(
            press(&mut session, Key::Escape, &mut doc, &mut surface),
            EventResult::Dismissed(DismissReason::Escape)
        );
        assert_eq!(surface.live_nodes(), 0);
    }

    #[test]
    fn elements_without_area_consume_labels() {
        let mut rects = boxes(3);
        rects[1] = Rect::new(0.0, 0.0, 0.0, 10.0);
        let mut doc = TestDocument::with_rects(&rects);
        let mut surface = TestSurface::default();
        let mut session = Session::default();

        let shown = session.handle(HintEvent::Show, &mut doc, &mut surface);
        assert_eq!(
            shown,
            EventResult::Shown {
                markers: 2,
                skipped: 1,
                replaced: false
            }
        );
        let labels: Vec<_> = session.markers().iter().map(|m| m.label()).collect();
        assert_eq!(labels, ["a", "c"]);

        // "b" matches nothing now.
        let result = press(&mut session, Key::Character('b'), &mut doc, &mut surface);
        assert_eq!(result, EventResult::Dismissed(DismissReason::NoMatch));
    }

    #[test]
    fn label_budget_leaves_excess_elements_unlabelled() {
        let mut doc = TestDocument::with_rects(&boxes(40));
        let mut surface = TestSurface::default();
        let config = HintConfig {
            max_labels: Some(5),
            ..HintConfig::default()
        };
        let mut session = Session::new(config).unwrap();

        session.handle(HintEvent::Show, &mut doc, &mut surface);
        let labels: Vec<_> = session.markers().iter().map(|m| m.label()).collect();
        assert_eq!(labels, ["a", "b", "c", "d", "e"]);
        assert_eq!(surface.live_nodes(), 6);
    }

    #[test]
    fn single_letter_alphabet_labels_one_element() {
        let mut doc = TestDocument::with_rects(&boxes(4));
        let mut surface = TestSurface::default();
        let config = HintConfig {
            alphabet: "f".to_string(),
            ..HintConfig::default()
        };
        let mut session = Session::new(config).unwrap();

        session.handle(HintEvent::Show, &mut doc, &mut surface);
        assert_eq!(session.markers().len(), 1);
        let result = press(&mut session, Key::Character('F'), &mut doc, &mut surface);
        assert_eq!(result, EventResult::Activated(Activation::Click));
        assert_eq!(doc.clicked, [0]);
    }

    #[test]
    fn editable_targets_are_focused() {
        let mut doc = TestDocument::new();
        doc.add(Rect::new(0.0, 0.0, 10.0, 10.0));
        let field = doc.add_editable(Rect::new(0.0, 20.0, 10.0, 30.0));
        let mut surface = TestSurface::default();
        let mut session = Session::default();
        session.handle(HintEvent::Show, &mut doc, &mut surface);

        let result = press(&mut session, Key::Character('b'), &mut doc, &mut surface);
        assert_eq!(result, EventResult::Activated(Activation::Focus));
        assert_eq!(doc.focused, [field]);
        assert!(doc.clicked.is_empty());
    }

    #[test]
    fn detached_target_activation_is_harmless() {
        let mut doc = TestDocument::with_rects(&boxes(3));
        let mut surface = TestSurface::default();
        let mut session = Session::default();
        session.handle(HintEvent::Show, &mut doc, &mut surface);

        doc.detach(2);
        session.handle(HintEvent::ViewportChanged, &mut doc, &mut surface);
        let result = press(&mut session, Key::Character('c'), &mut doc, &mut surface);
        assert_eq!(result, EventResult::Activated(Activation::Click));
        assert!(doc.clicked.is_empty());
        assert_eq!(surface.live_nodes(), 0);
    }

    #[test]
    fn config_changes_apply_on_next_show() {
        let mut doc = TestDocument::with_rects(&boxes(3));
        let mut surface = TestSurface::default();
        let mut session = Session::default();
        session.handle(HintEvent::Show, &mut doc, &mut surface);

        let mut config = HintConfig::default();
        config.alphabet = "xyz".to_string();
        config.style.background = Color::rgb(0, 128, 255);
        session.set_config(config).unwrap();
        let labels: Vec<_> = session.markers().iter().map(|m| m.label()).collect();
        assert_eq!(labels, ["a", "b", "c"]);

        session.handle(HintEvent::Show, &mut doc, &mut surface);
        let labels: Vec<_> = session.markers().iter().map(|m| m.label()).collect();
        assert_eq!(labels, ["x", "y", "z"]);
        assert_eq!(surface.styles[0], MarkerStyle::default());
        assert_eq!(surface.styles[1].background, Color::rgb(0, 128, 255));
    }

    #[test]
    fn invalid_config_is_rejected_and_previous_kept() {
        let bad = HintConfig {
            alphabet: "aa".to_string(),
            ..HintConfig::default()
        };
        assert_eq!(
            Session::new(bad.clone()).unwrap_err(),
            ConfigError::DuplicateAlphabetChar('a')
        );

        let mut session = Session::default();
        assert!(session.set_config(bad).is_err());
        assert_eq!(session.config(), &HintConfig::default());
    }

    #[test]
    fn unload_tears_down_and_is_idempotent() {
        let mut doc = TestDocument::with_rects(&boxes(3));
        let mut surface = TestSurface::default();
        let mut session = Session::default();

        session.scroll_key_down('j', 0);
        assert_eq!(session.next_scroll_deadline(), Some(50));
        assert_eq!(session.unload(&mut surface), EventResult::Ignored);
        assert_eq!(session.next_scroll_deadline(), None);

        session.handle(HintEvent::Show, &mut doc, &mut surface);
        assert_eq!(
            session.unload(&mut surface),
            EventResult::Dismissed(DismissReason::Unload)
        );
        assert_eq!(surface.live_nodes(), 0);
        assert_eq!(session.unload(&mut surface), EventResult::Ignored);
    }

    #[test]
    fn held_scroll_keys_repeat_until_released() {
        let mut session = Session::default();

        assert_eq!(session.scroll_key_down('j', 1000), Some(40.0));
        assert_eq!(session.scroll_key_down('j', 1010), Some(0.0));
        assert_eq!(session.next_scroll_deadline(), Some(1050));
        assert_eq!(session.poll_scroll(1120), 80.0);

        assert_eq!(session.scroll_key_down('k', 1130), Some(-40.0));
        assert!(!session.scroll_key_up('j'));
        assert_eq!(session.poll_scroll(1180), -40.0);
        assert!(session.scroll_key_up('k'));
        assert!(!session.scroll_key_up('k'));
        assert_eq!(session.poll_scroll(5000), 0.0);

        assert_eq!(session.scroll_key_down('x', 0), None);

        // Shift does not split one held key into two.
        assert_eq!(session.scroll_key_down('J', 6000), Some(40.0));
        assert!(session.scroll_key_up('j'));
    }

    #[test]
    fn scrolling_is_off_while_hints_show() {
        let mut doc = TestDocument::with_rects(&boxes(3));
        let mut surface = TestSurface::default();
        let mut session = Session::default();

        session.scroll_key_down('j', 0);
        session.handle(HintEvent::Show, &mut doc, &mut surface);
        assert_eq!(session.next_scroll_deadline(), None);
        assert_eq!(session.scroll_key_down('j', 10), None);
        assert_eq!(session.poll_scroll(1000), 0.0);
    }
}
