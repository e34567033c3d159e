// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Marker records, their rendered view, and the marker factory.

use alloc::string::String;

use kurbo::{Point, Rect};
use smallvec::SmallVec;

use crate::host::{Document, OverlaySurface};
use crate::matching::is_visible;

bitflags::bitflags! {
    /// Parts of a [`MarkerView`] that changed since it was last rendered.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub struct Changes: u8 {
        /// The marker moved.
        const POSITION   = 0b0000_0001;
        /// The marker was shown or hidden.
        const VISIBILITY = 0b0000_0010;
        /// Per-glyph match highlighting changed.
        const HIGHLIGHT  = 0b0000_0100;
    }
}

/// One character of a label with its match state.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct Glyph {
    /// The label character.
    pub ch: char,
    /// Whether the typed input has this character at this position.
    pub matched: bool,
}

/// Everything a surface needs to draw one marker.
#[derive(Clone, Debug, PartialEq)]
pub struct MarkerView {
    /// Top-left corner of the labelled element, in viewport coordinates.
    pub position: Point,
    /// Whether the marker should be displayed for the current input.
    pub visible: bool,
    /// The label, one glyph per character.
    pub glyphs: SmallVec<[Glyph; 4]>,
}

impl MarkerView {
    /// Build the view of `label` at `position` for the typed `input`.
    ///
    /// Glyph `i` is matched iff `input` has the same letter (ignoring ASCII case)
    /// at position `i`. The marker is visible iff `label` starts with `input`.
    pub fn new(label: &str, input: &str, position: Point) -> Self {
        let mut typed = input.chars();
        let glyphs = label
            .chars()
            .map(|ch| Glyph {
                ch,
                matched: typed.next().is_some_and(|t| t.eq_ignore_ascii_case(&ch)),
            })
            .collect();
        Self {
            position,
            visible: is_visible(label, input),
            glyphs,
        }
    }

    /// Number of leading glyphs already typed.
    pub fn matched_len(&self) -> usize {
        self.glyphs.iter().take_while(|g| g.matched).count()
    }

    /// Which parts of `next` differ from `self`.
    pub fn changes_to(&self, next: &Self) -> Changes {
        let mut changes = Changes::empty();
        if self.position != next.position {
            changes |= Changes::POSITION;
        }
        if self.visible != next.visible {
            changes |= Changes::VISIBILITY;
        }
        if self.glyphs != next.glyphs {
            changes |= Changes::HIGHLIGHT;
        }
        changes
    }
}

/// A label attached to one target element, plus the visual node showing it.
///
/// `E` is the host's element reference and `H` the surface's node handle. The
/// marker owns `H`; it never owns the element.
pub struct Marker<E, H> {
    label: String,
    target: E,
    handle: H,
    view: MarkerView,
}

impl<E: core::fmt::Debug, H> core::fmt::Debug for Marker<E, H> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Marker")
            .field("label", &self.label)
            .field("target", &self.target)
            .field("view", &self.view)
            .finish_non_exhaustive()
    }
}

impl<E, H> Marker<E, H> {
    /// The label typed to activate this marker.
    pub fn label(&self) -> &str {
        &self.label
    }

    /// The labelled element.
    pub fn target(&self) -> &E {
        &self.target
    }

    /// The visual node.
    pub fn handle(&self) -> &H {
        &self.handle
    }

    /// The view last rendered into [`Marker::handle`].
    pub fn view(&self) -> &MarkerView {
        &self.view
    }

    /// Recompute position, visibility and highlighting, and re-render if anything changed.
    ///
    /// The position follows the target's current bounding box. A target that has
    /// left the document keeps its last position. Returns the applied changes.
    pub fn refresh<D, S>(&mut self, input: &str, document: &D, surface: &mut S) -> Changes
    where
        D: Document<Element = E>,
        S: OverlaySurface<Handle = H>,
    {
        let position = document
            .bounding_box(&self.target)
            .map_or(self.view.position, |rect| rect.origin());
        let next = MarkerView::new(&self.label, input, position);
        let changes = self.view.changes_to(&next);
        if !changes.is_empty() {
            surface.update_marker(&mut self.handle, &next, changes);
            self.view = next;
        }
        changes
    }

    pub(crate) fn into_handle(self) -> H {
        self.handle
    }
}

/// Build a marker for `target`, or `None` when it has no on-screen area.
///
/// Reads the target's bounding box; a detached target, or one whose width or
/// height is zero, gets no marker. Otherwise a marker node is created in
/// `container` at the box's top-left corner, highlighted against `input`, and
/// the returned marker owns it. Attaching and eventually destroying the node is
/// up to the caller.
pub fn create_marker<D, S>(
    label: String,
    target: D::Element,
    input: &str,
    document: &D,
    surface: &mut S,
    container: &S::Handle,
) -> Option<Marker<D::Element, S::Handle>>
where
    D: Document,
    S: OverlaySurface,
{
    let rect = document.bounding_box(&target)?;
    if !has_area(rect) {
        return None;
    }
    let view = MarkerView::new(&label, input, rect.origin());
    let handle = surface.create_marker(container, &view);
    Some(Marker {
        label,
        target,
        handle,
        view,
    })
}

fn has_area(rect: Rect) -> bool {
    rect.width() != 0.0 && rect.height() != 0.0
}
