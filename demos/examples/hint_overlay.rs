// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Keyboard hints over an in-memory page.
//!
//! This example shows how to:
//! - implement `Document` and `OverlaySurface` for a host,
//! - load `HintConfig` from persisted JSON settings,
//! - drive a `HintSession` with key events and read back the results,
//! - run held-key scrolling from host timestamps.
//!
//! Run:
//! - `cargo run -p understory_demos --example hint_overlay`
//! - `RUST_LOG=understory_hints=trace cargo run -p understory_demos --example hint_overlay`

use std::collections::BTreeMap;
use std::error::Error;

use kurbo::{Rect, Vec2};
use tracing::info;
use tracing_subscriber::EnvFilter;
use understory_hints::{
    Changes, Document, EventResult, HintConfig, HintEvent, HintSession, Key, MarkerStyle,
    MarkerView, OverlaySurface,
};

const SETTINGS: &str = include_str!("hints.json");

#[derive(Debug)]
struct Link {
    name: &'static str,
    bounds: Rect,
    editable: bool,
}

/// A page of links, scrolled vertically.
#[derive(Debug, Default)]
struct Page {
    links: Vec<Link>,
    scroll_y: f64,
}

impl Page {
    fn add(&mut self, name: &'static str, bounds: Rect, editable: bool) {
        self.links.push(Link {
            name,
            bounds,
            editable,
        });
    }
}

impl Document for Page {
    type Element = usize;

    fn clickable_elements(&self, selector: &str) -> Vec<usize> {
        println!("query: {selector}");
        (0..self.links.len()).collect()
    }

    fn bounding_box(&self, element: &usize) -> Option<Rect> {
        let link = self.links.get(*element)?;
        Some(link.bounds - Vec2::new(0.0, self.scroll_y))
    }

    fn is_content_editable(&self, element: &usize) -> bool {
        self.links.get(*element).is_some_and(|link| link.editable)
    }

    fn click(&mut self, element: &usize) {
        if let Some(link) = self.links.get(*element) {
            println!("clicked {}", link.name);
        }
    }

    fn focus(&mut self, element: &usize) {
        if let Some(link) = self.links.get(*element) {
            println!("focused {}", link.name);
        }
    }
}

/// Keeps marker views by node id, the way a retained-mode renderer would.
#[derive(Debug, Default)]
struct Overlay {
    next: u32,
    views: BTreeMap<u32, Option<MarkerView>>,
}

impl Overlay {
    fn alloc(&mut self, view: Option<MarkerView>) -> u32 {
        let id = self.next;
        self.next += 1;
        self.views.insert(id, view);
        id
    }

    fn print(&self) {
        for view in self.views.values().flatten().filter(|v| v.visible) {
            let label: String = view
                .glyphs
                .iter()
                .map(|g| {
                    if g.matched {
                        g.ch.to_ascii_uppercase()
                    } else {
                        g.ch
                    }
                })
                .collect();
            println!("  [{label}] at {:?}", view.position);
        }
    }
}

impl OverlaySurface for Overlay {
    type Handle = u32;

    fn create_container(&mut self, style: &MarkerStyle) -> u32 {
        println!("mount container: {style}");
        self.alloc(None)
    }

    fn create_marker(&mut self, _container: &u32, view: &MarkerView) -> u32 {
        self.alloc(Some(view.clone()))
    }

    fn update_marker(&mut self, handle: &mut u32, view: &MarkerView, _changes: Changes) {
        self.views.insert(*handle, Some(view.clone()));
    }

    fn destroy(&mut self, handle: u32) {
        self.views.remove(&handle);
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug")),
        )
        .init();

    let config: HintConfig = serde_json::from_str(SETTINGS)?;
    let mut session = HintSession::new(config)?;

    let mut page = Page::default();
    page.add("home", Rect::new(10.0, 10.0, 60.0, 24.0), false);
    page.add("search", Rect::new(80.0, 10.0, 240.0, 24.0), true);
    page.add("hidden", Rect::new(0.0, 0.0, 0.0, 0.0), false);
    for i in 0..9 {
        let y = 40.0 + f64::from(i) * 20.0;
        page.add("item", Rect::new(10.0, y, 120.0, y + 14.0), false);
    }
    let mut overlay = Overlay::default();

    let shown = session.handle(HintEvent::Show, &mut page, &mut overlay);
    info!(?shown, "overlay up");
    overlay.print();

    for key in [
        Key::Character('S'),
        Key::Character('q'),
        Key::Backspace,
        Key::Backspace,
    ] {
        let result = session.handle(HintEvent::Key(key), &mut page, &mut overlay);
        println!(
            "{key:?} -> {result:?} (input {:?}, swallow: {})",
            session.input(),
            result.prevents_default()
        );
        overlay.print();
    }

    page.scroll_y = 15.0;
    session.handle(HintEvent::ViewportChanged, &mut page, &mut overlay);
    println!("after scrolling the page:");
    overlay.print();

    let target = session
        .markers()
        .iter()
        .find(|m| page.is_content_editable(m.target()))
        .map(|m| m.label().to_owned());
    if let Some(label) = target {
        for ch in label.chars() {
            let result = session.handle(HintEvent::Key(Key::Character(ch)), &mut page, &mut overlay);
            if result != EventResult::Updated {
                info!(%ch, ?result, "label complete");
            }
        }
    }
    println!("live nodes after activation: {}", overlay.views.len());

    // Hold "j" for a quarter second, polling every 30 ms.
    let mut scrolled = session.scroll_key_down('j', 0).unwrap_or(0.0);
    let mut now = 0;
    while now < 250 {
        now += 30;
        scrolled += session.poll_scroll(now);
    }
    session.scroll_key_up('j');
    println!(
        "held j for {now} ms: scrolled {scrolled} px (next deadline {:?})",
        session.next_scroll_deadline()
    );

    session.unload(&mut overlay);
    assert_eq!(overlay.views.len(), 0, "unload leaves no nodes behind");
    Ok(())
}
