//! Renders the page tree with zoon.
//!
//! Reveal regions get their marker class through a per-region signal, so a
//! reveal only touches that element's class list. Toggling the reference list
//! bumps `version`, which re-renders the tree.

use super::observer::BrowserIntersectionSource;
use crate::intersection::{IntersectionSource, RegionId};
use crate::notify::Subscription;
use crate::page::{Page, PageEvent};
use crate::reveal::{Attachment, REVEALED_CLASS};
use crate::style::STYLESHEET;
use langbias_scene::{Element as SceneElement, Node, RevealBinding};
use std::cell::{Cell, RefCell};
use std::collections::BTreeMap;
use std::rc::Rc;
use zoon::*;

#[derive(Clone)]
pub struct PageRenderer {
    page: Rc<Page>,
    source: Option<Rc<BrowserIntersectionSource>>,
    visibility: Rc<BTreeMap<RegionId, Mutable<bool>>>,
    /// Live attachments with the render generation that created them.
    attachments: Rc<RefCell<BTreeMap<RegionId, (u64, Attachment)>>>,
    generation: Rc<Cell<u64>>,
    pub version: Mutable<u64>,
    _page_events: Rc<Subscription>,
}

impl PageRenderer {
    pub fn new(page: Page) -> Self {
        let page = Rc::new(page);
        let source = BrowserIntersectionSource::new().map(Rc::new);

        let visibility: BTreeMap<RegionId, Mutable<bool>> = page
            .regions()
            .iter()
            .map(|region| {
                let visible = page
                    .reveal_state(region.as_str())
                    .is_some_and(|state| state.visible);
                (region.clone(), Mutable::new(visible))
            })
            .collect();
        let visibility = Rc::new(visibility);
        let version = Mutable::new(0);

        let page_events = {
            let visibility = visibility.clone();
            let version = version.clone();
            page.subscribe(move |event| match event {
                PageEvent::Revealed(region) => {
                    if let Some(visible) = visibility.get(region.as_str()) {
                        visible.set_neq(true);
                    }
                }
                PageEvent::ReferencesToggled { .. } => version.update(|v| v + 1),
            })
        };

        Self {
            page,
            source,
            visibility,
            attachments: Rc::new(RefCell::new(BTreeMap::new())),
            generation: Rc::new(Cell::new(0)),
            version,
            _page_events: Rc::new(page_events),
        }
    }

    /// Root element: the stylesheet plus the page, re-rendered on `version`.
    pub fn root(&self) -> impl Element + use<> {
        let this = self.clone();
        RawHtmlEl::new("div")
            .child(RawHtmlEl::new("style").child(STYLESHEET))
            .child_signal(self.version.signal().map(move |_| this.render_page()))
    }

    fn render_page(&self) -> RawElOrText {
        self.generation.set(self.generation.get() + 1);
        zoon::println!("rendering page (generation {})", self.generation.get());
        self.render_node(&self.page.render())
    }

    fn render_node(&self, node: &Node) -> RawElOrText {
        match node {
            Node::Text(text) => zoon::Text::new(text.to_string()).unify(),
            Node::Element(element) => self.render_element(element).unify(),
        }
    }

    fn render_element(&self, element: &SceneElement) -> RawHtmlEl<web_sys::HtmlElement> {
        let mut el = RawHtmlEl::new(&*element.tag);
        if let Some(id) = &element.id {
            el = el.attr("id", &**id);
        }
        for class in &element.classes {
            // The marker class is driven by the region signal instead.
            if element.reveal.is_some() && class == REVEALED_CLASS {
                continue;
            }
            el = el.class(&**class);
        }
        for (name, value) in &element.attrs {
            el = el.attr(&**name, &**value);
        }
        for (property, value) in &element.styles {
            el = el.style(&**property, &**value);
        }
        if let Some(binding) = &element.reveal {
            el = self.bind_reveal(el, binding);
        }
        if let Some(action) = &element.action {
            let page = self.page.clone();
            let action = action.to_string();
            el = el.event_handler(move |_: events::Click| {
                if let Err(error) = page.dispatch_named(&action) {
                    zoon::eprintln!("{error}");
                }
            });
        }
        let children: Vec<RawElOrText> = element
            .children
            .iter()
            .map(|child| self.render_node(child))
            .collect();
        el.children(children)
    }

    fn bind_reveal(
        &self,
        el: RawHtmlEl<web_sys::HtmlElement>,
        binding: &RevealBinding,
    ) -> RawHtmlEl<web_sys::HtmlElement> {
        let region = RegionId::new(binding.region.clone());
        let Some(visible) = self.visibility.get(region.as_str()).cloned() else {
            return el;
        };
        let generation = self.generation.get();
        let inserted = {
            let this = self.clone();
            let region = region.clone();
            move |dom: web_sys::HtmlElement| this.attach(region, dom.into(), generation)
        };
        let removed = {
            let this = self.clone();
            move |dom: web_sys::HtmlElement| this.detach(&region, &dom.into(), generation)
        };
        el.class_signal(REVEALED_CLASS, visible.signal())
            .after_insert(inserted)
            .after_remove(removed)
    }

    fn attach(&self, region: RegionId, element: web_sys::Element, generation: u64) {
        let source: Option<Rc<dyn IntersectionSource>> = match &self.source {
            Some(source) => {
                source.register_element(region.clone(), element);
                Some(source.clone())
            }
            None => None,
        };
        if let Some(attachment) = self.page.attach_region(region.as_str(), source) {
            self.attachments
                .borrow_mut()
                .insert(region, (generation, attachment));
        }
    }

    fn detach(&self, region: &RegionId, element: &web_sys::Element, generation: u64) {
        let attachment = {
            let mut attachments = self.attachments.borrow_mut();
            match attachments.get(region.as_str()) {
                Some((current, _)) if *current == generation => attachments.remove(region.as_str()),
                _ => None,
            }
        };
        drop(attachment);
        if let Some(source) = &self.source {
            source.forget_element(region.as_str(), element);
        }
    }
}

#[cfg(all(test, target_arch = "wasm32"))]
mod tests {
    use super::*;
    use crate::PageConfig;
    use crate::platform::browser::test_element;
    use wasm_bindgen_test::*;

    fn live_generation(renderer: &PageRenderer, region: &str) -> Option<u64> {
        renderer
            .attachments
            .borrow()
            .get(region)
            .map(|(generation, _)| *generation)
    }

    #[wasm_bindgen_test]
    fn stale_detach_keeps_the_newer_attachment() {
        let renderer = PageRenderer::new(Page::new(PageConfig::default()));
        let region = RegionId::from("glossary");
        let first = test_element("section");
        let second = test_element("section");

        renderer.attach(region.clone(), first.clone(), 1);
        renderer.attach(region.clone(), second.clone(), 2);
        renderer.detach(&region, &first, 1);

        assert_eq!(live_generation(&renderer, "glossary"), Some(2));
        assert!(renderer.page.controller("glossary").unwrap().is_observing());

        renderer.detach(&region, &second, 2);
        assert_eq!(live_generation(&renderer, "glossary"), None);
        assert!(!renderer.page.controller("glossary").unwrap().is_observing());
    }

    #[wasm_bindgen_test]
    fn reveal_flips_only_the_region_signal() {
        let renderer = PageRenderer::new(Page::new(PageConfig::default()));
        let _attachment = renderer.page.attach_region("angles", None);
        assert!(renderer.visibility["angles"].get());
        assert!(!renderer.visibility["examples"].get());
        assert_eq!(renderer.version.get(), 0);

        renderer.page.dispatch_named(crate::view::TOGGLE_REFERENCES).unwrap();
        assert_eq!(renderer.version.get(), 1);
    }
}
