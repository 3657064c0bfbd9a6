//! Page model: owns every reveal controller and the reference list toggle,
//! emits [`PageEvent`]s on state changes and renders through [`view`].

use crate::config::PageConfig;
use crate::intersection::{IntersectionSource, RegionId};
use crate::notify::{Listeners, Subscription};
use crate::reveal::{Attachment, RevealController, RevealState};
use crate::toggle::{ReferenceListToggle, ReferenceListVisibility};
use crate::view::{self, TOGGLE_REFERENCES, ViewState};
use langbias_scene::Node;
use std::collections::BTreeMap;
use std::fmt;
use std::rc::Rc;
use std::str::FromStr;

/// User actions the page understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    ToggleReferences,
}

impl Action {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ToggleReferences => TOGGLE_REFERENCES,
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Action {
    type Err = String;

    fn from_str(name: &str) -> Result<Self, Self::Err> {
        match name {
            TOGGLE_REFERENCES => Ok(Self::ToggleReferences),
            other => Err(format!("unknown action `{other}`")),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageEvent {
    Revealed(RegionId),
    ReferencesToggled { shown: bool },
}

pub struct Page {
    config: PageConfig,
    regions: BTreeMap<RegionId, RevealController>,
    /// Region names in document order.
    order: Vec<RegionId>,
    references: ReferenceListToggle,
    listeners: Listeners<PageEvent>,
    _forwarders: Vec<Subscription>,
}

impl Page {
    pub fn new(config: PageConfig) -> Self {
        let listeners = Listeners::new();
        let mut regions = BTreeMap::new();
        let mut order = Vec::new();
        let mut forwarders = Vec::new();

        for (region, reveal_config) in view::reveal_regions(&config) {
            let controller = RevealController::new(region.clone(), reveal_config);
            let listeners = listeners.clone();
            forwarders.push(controller.subscribe(move |region| {
                listeners.notify(&PageEvent::Revealed(region.clone()));
            }));
            order.push(region.clone());
            regions.insert(region, controller);
        }

        Self {
            config,
            regions,
            order,
            references: ReferenceListToggle::new(),
            listeners,
            _forwarders: forwarders,
        }
    }

    pub fn config(&self) -> &PageConfig {
        &self.config
    }

    /// Region names in document order.
    pub fn regions(&self) -> &[RegionId] {
        &self.order
    }

    pub fn controller(&self, region: &str) -> Option<&RevealController> {
        self.regions.get(region)
    }

    pub fn reveal_state(&self, region: &str) -> Option<RevealState> {
        self.controller(region).map(RevealController::state)
    }

    pub fn references(&self) -> ReferenceListVisibility {
        self.references.visibility()
    }

    /// Attach every region to `source`. Dropping the returned value detaches
    /// all of them.
    pub fn attach(&self, source: Option<Rc<dyn IntersectionSource>>) -> PageAttachment {
        let attachments = self
            .order
            .iter()
            .filter_map(|region| self.regions.get(region))
            .map(|controller| {
                let attachment = controller.attach(source.clone());
                (controller.region().clone(), attachment)
            })
            .collect();
        PageAttachment { attachments }
    }

    /// Attach a single region, e.g. when its element enters the DOM.
    pub fn attach_region(
        &self,
        region: &str,
        source: Option<Rc<dyn IntersectionSource>>,
    ) -> Option<Attachment> {
        self.regions.get(region).map(|controller| controller.attach(source))
    }

    pub fn dispatch(&self, action: Action) {
        match action {
            Action::ToggleReferences => {
                let shown = self.references.toggle();
                log::info!("references {}", if shown { "shown" } else { "hidden" });
                self.listeners.notify(&PageEvent::ReferencesToggled { shown });
            }
        }
    }

    /// Dispatch an action by the name a rendered element carries.
    pub fn dispatch_named(&self, name: &str) -> Result<(), String> {
        self.dispatch(name.parse()?);
        Ok(())
    }

    pub fn subscribe(&self, listener: impl FnMut(&PageEvent) + 'static) -> Subscription {
        self.listeners.subscribe(listener)
    }

    pub fn view_state(&self) -> ViewState {
        ViewState {
            revealed: self
                .regions
                .iter()
                .filter(|(_, controller)| controller.is_visible())
                .map(|(region, _)| region.clone())
                .collect(),
            references_shown: self.references.is_shown(),
        }
    }

    pub fn render(&self) -> Node {
        view::render(&self.config, &self.view_state())
    }
}

/// Attachments of every page region.
#[must_use = "dropping a PageAttachment detaches every region"]
pub struct PageAttachment {
    attachments: Vec<(RegionId, Attachment)>,
}

impl PageAttachment {
    /// Detach one region, leaving the others attached. Returns whether the
    /// region was attached.
    pub fn detach_region(&mut self, region: &str) -> bool {
        let before = self.attachments.len();
        self.attachments.retain(|(id, _)| id.as_str() != region);
        self.attachments.len() != before
    }

    pub fn len(&self) -> usize {
        self.attachments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.attachments.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platform::cli::viewport::ManualIntersectionSource;
    use std::cell::RefCell;

    fn page_with_source() -> (Page, Rc<ManualIntersectionSource>, PageAttachment) {
        let page = Page::new(PageConfig::default());
        let manual = Rc::new(ManualIntersectionSource::new());
        let source: Rc<dyn IntersectionSource> = manual.clone();
        let attachment = page.attach(Some(source));
        (page, manual, attachment)
    }

    #[test]
    fn action_names_round_trip() {
        assert_eq!("toggle-references".parse::<Action>(), Ok(Action::ToggleReferences));
        assert_eq!(Action::ToggleReferences.to_string(), "toggle-references");
        assert!("explode".parse::<Action>().is_err());
    }

    #[test]
    fn attach_observes_every_region() {
        let (page, manual, attachment) = page_with_source();
        assert_eq!(attachment.len(), page.regions().len());
        assert_eq!(manual.observed_count(), page.regions().len());
        assert!(page.regions().iter().all(|region| !page.reveal_state(region.as_str()).unwrap().visible));
    }

    #[test]
    fn emits_page_events() {
        let (page, manual, _attachment) = page_with_source();
        let events = Rc::new(RefCell::new(Vec::new()));
        let _subscription = {
            let events = events.clone();
            page.subscribe(move |event| events.borrow_mut().push(event.clone()))
        };

        manual.emit("video", 0.6);
        manual.emit("video", 0.9);
        page.dispatch(Action::ToggleReferences);
        page.dispatch_named("toggle-references").unwrap();
        assert!(page.dispatch_named("nope").is_err());

        assert_eq!(
            *events.borrow(),
            vec![
                PageEvent::Revealed(RegionId::from("video")),
                PageEvent::ReferencesToggled { shown: true },
                PageEvent::ReferencesToggled { shown: false },
            ]
        );
    }

    #[test]
    fn detaching_whole_page_releases_everything() {
        let (page, manual, attachment) = page_with_source();
        manual.emit("examples", 1.0);
        drop(attachment);
        assert_eq!(manual.observed_count(), 0);
        assert!(page.reveal_state("examples").unwrap().visible);
        assert!(!page.reveal_state("angles").unwrap().visible);
    }

    #[test]
    fn detach_single_region() {
        let (page, manual, mut attachment) = page_with_source();
        assert!(attachment.detach_region("glossary/2"));
        assert!(!attachment.detach_region("glossary/2"));
        assert!(!manual.is_observed("glossary/2"));
        assert!(!manual.emit("glossary/2", 1.0));
        assert!(!page.reveal_state("glossary/2").unwrap().visible);
    }

    #[test]
    fn no_source_reveals_everything() {
        let page = Page::new(PageConfig::default());
        let _attachment = page.attach(None);
        assert_eq!(page.view_state().revealed.len(), page.regions().len());
    }

    #[test]
    fn repeated_render_without_actions_is_stable() {
        let page = Page::new(PageConfig::default());
        let first = page.render();
        assert_eq!(first, page.render());
        assert!(!page.references().shown);
    }
}
