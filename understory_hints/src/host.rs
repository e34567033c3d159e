// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Host seams: the document being navigated and the surface markers are drawn on.
//!
//! The session never touches a concrete UI toolkit. A host implements
//! [`Document`] over its element tree (a DOM, a widget tree, an accessibility
//! snapshot) and [`OverlaySurface`] over whatever it paints markers with.

use alloc::vec::Vec;
use core::fmt::Debug;

use kurbo::Rect;

use crate::config::MarkerStyle;
use crate::marker::{Changes, MarkerView};

/// The document whose clickable elements receive markers.
///
/// Elements are non-owning references: the document owns them, and a marker
/// only remembers which element it labels. An element may disappear between
/// show and activation; implementations should treat geometry queries and
/// activation of such an element as no-ops rather than failures.
pub trait Document {
    /// A cheap, cloneable reference to an element.
    type Element: Clone + PartialEq + Debug;

    /// Elements matching `selector`, in document order.
    ///
    /// Label assignment follows this order. The selector comes straight from
    /// [`HintConfig::selector`](crate::HintConfig::selector) and is not validated
    /// by the core; an unusable selector should simply produce no elements.
    fn clickable_elements(&self, selector: &str) -> Vec<Self::Element>;

    /// Current on-screen bounds of `element` in viewport coordinates.
    ///
    /// `None` means the element is no longer part of the document.
    fn bounding_box(&self, element: &Self::Element) -> Option<Rect>;

    /// Whether `element` takes text input, in which case activation focuses it.
    fn is_content_editable(&self, element: &Self::Element) -> bool;

    /// Click `element`.
    fn click(&mut self, element: &Self::Element);

    /// Move keyboard focus to `element`.
    fn focus(&mut self, element: &Self::Element);
}

/// Owner of the visual nodes that display markers.
///
/// Every handle returned from this trait is owned by the session and given
/// back through [`OverlaySurface::destroy`] exactly once. A surface should
/// detach the node from display when it is destroyed.
pub trait OverlaySurface {
    /// A visual node. Handles are moved, never cloned, by the session.
    type Handle;

    /// Create and mount the container that holds all markers of one session.
    fn create_container(&mut self, style: &MarkerStyle) -> Self::Handle;

    /// Create a marker node inside `container`, rendered from `view`.
    fn create_marker(&mut self, container: &Self::Handle, view: &MarkerView) -> Self::Handle;

    /// Re-render a marker node; `changes` names the parts of `view` that differ
    /// from what was last rendered into `handle`.
    fn update_marker(&mut self, handle: &mut Self::Handle, view: &MarkerView, changes: Changes);

    /// Detach and release a node.
    fn destroy(&mut self, handle: Self::Handle);
}
