// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! In-memory document and surface used by the unit tests.

use alloc::collections::BTreeMap;
use alloc::vec::Vec;

use kurbo::Rect;

use crate::config::MarkerStyle;
use crate::host::{Document, OverlaySurface};
use crate::marker::{Changes, MarkerView};

#[derive(Clone, Debug)]
struct Element {
    rect: Rect,
    attached: bool,
    editable: bool,
}

/// Elements are `u32` ids in insertion order; every selector matches all attached elements.
#[derive(Debug, Default)]
pub(crate) struct TestDocument {
    elements: Vec<Element>,
    pub(crate) clicked: Vec<u32>,
    pub(crate) focused: Vec<u32>,
}

impl TestDocument {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn with_rects(rects: &[Rect]) -> Self {
        let mut doc = Self::new();
        for rect in rects {
            doc.add(*rect);
        }
        doc
    }

    pub(crate) fn add(&mut self, rect: Rect) -> u32 {
        self.elements.push(Element {
            rect,
            attached: true,
            editable: false,
        });
        u32::try_from(self.elements.len() - 1).unwrap()
    }

    pub(crate) fn add_editable(&mut self, rect: Rect) -> u32 {
        let id = self.add(rect);
        self.elements[id as usize].editable = true;
        id
    }

    pub(crate) fn move_to(&mut self, id: u32, rect: Rect) {
        self.elements[id as usize].rect = rect;
    }

    pub(crate) fn detach(&mut self, id: u32) {
        self.elements[id as usize].attached = false;
    }

    fn get(&self, id: u32) -> Option<&Element> {
        self.elements.get(id as usize).filter(|e| e.attached)
    }
}

impl Document for TestDocument {
    type Element = u32;

    fn clickable_elements(&self, _selector: &str) -> Vec<u32> {
        (0..self.elements.len())
            .filter_map(|i| {
                let id = u32::try_from(i).ok()?;
                self.get(id).map(|_| id)
            })
            .collect()
    }

    fn bounding_box(&self, element: &u32) -> Option<Rect> {
        self.get(*element).map(|e| e.rect)
    }

    fn is_content_editable(&self, element: &u32) -> bool {
        self.get(*element).is_some_and(|e| e.editable)
    }

    fn click(&mut self, element: &u32) {
        // Clicking a detached element has no effect.
        if self.get(*element).is_some() {
            self.clicked.push(*element);
        }
    }

    fn focus(&mut self, element: &u32) {
        if self.get(*element).is_some() {
            self.focused.push(*element);
        }
    }
}

/// A node handle. Not `Clone`, like the handles real surfaces hand out.
#[derive(Debug, PartialEq, Eq)]
pub(crate) struct TestHandle(u32);

impl TestHandle {
    pub(crate) fn id(&self) -> u32 {
        self.0
    }
}

#[derive(Debug)]
struct Node {
    parent: Option<u32>,
    view: Option<MarkerView>,
}

#[derive(Debug, Default)]
pub(crate) struct TestSurface {
    next_id: u32,
    nodes: BTreeMap<u32, Node>,
    created: usize,
    updates: Vec<(u32, Changes)>,
    pub(crate) styles: Vec<MarkerStyle>,
}

impl TestSurface {
    /// Nodes created and not yet destroyed, containers included.
    pub(crate) fn live_nodes(&self) -> usize {
        self.nodes.len()
    }

    pub(crate) fn created(&self) -> usize {
        self.created
    }

    pub(crate) fn updates(&self) -> usize {
        self.updates.len()
    }

    pub(crate) fn last_update(&self) -> Option<(u32, Changes)> {
        self.updates.last().copied()
    }

    pub(crate) fn view(&self, handle: &TestHandle) -> Option<&MarkerView> {
        self.nodes.get(&handle.0)?.view.as_ref()
    }

    pub(crate) fn parent(&self, handle: &TestHandle) -> Option<u32> {
        self.nodes.get(&handle.0)?.parent
    }

    fn alloc(&mut self, parent: Option<u32>, view: Option<MarkerView>) -> TestHandle {
        let id = self.next_id;
        self.next_id += 1;
        self.created += 1;
        self.nodes.insert(id, Node { parent, view });
        TestHandle(id)
    }
}

impl OverlaySurface for TestSurface {
    type Handle = TestHandle;

    fn create_container(&mut self, style: &MarkerStyle) -> TestHandle {
        self.styles.push(style.clone());
        self.alloc(None, None)
    }

    fn create_marker(&mut self, container: &TestHandle, view: &MarkerView) -> TestHandle {
        assert!(
            self.nodes.contains_key(&container.0),
            "marker created in a destroyed container"
        );
        self.alloc(Some(container.0), Some(view.clone()))
    }

    fn update_marker(&mut self, handle: &mut TestHandle, view: &MarkerView, changes: Changes) {
        let node = self
            .nodes
            .get_mut(&handle.0)
            .expect("update of a destroyed marker");
        node.view = Some(view.clone());
        self.updates.push((handle.0, changes));
    }

    fn destroy(&mut self, handle: TestHandle) {
        assert!(
            self.nodes.remove(&handle.0).is_some(),
            "node destroyed twice"
        );
    }
}
