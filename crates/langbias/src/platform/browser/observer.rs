//! `IntersectionObserver`-backed [`IntersectionSource`].
//!
//! Regions are mapped to DOM elements by the renderer through
//! [`register_element`](BrowserIntersectionSource::register_element) before
//! they are observed. Each observed region gets its own observer so that
//! `unobserve` can simply disconnect it.

use crate::error::ObserveError;
use crate::intersection::{IntersectionCallback, IntersectionEntry, IntersectionSource, RegionId};
use std::cell::{Cell, RefCell};
use std::collections::BTreeMap;
use std::rc::Rc;
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{IntersectionObserver, IntersectionObserverEntry, IntersectionObserverInit};

struct Registration {
    observer: IntersectionObserver,
    _closure: Closure<dyn FnMut(js_sys::Array)>,
}

pub struct BrowserIntersectionSource {
    elements: RefCell<BTreeMap<RegionId, web_sys::Element>>,
    registrations: RefCell<BTreeMap<RegionId, Registration>>,
    /// Registrations disconnected while one of their callbacks was running.
    /// A closure must not be dropped while it executes, so they are released
    /// on the next call made from outside a callback.
    retired: RefCell<Vec<Registration>>,
    dispatching: Rc<Cell<bool>>,
}

impl BrowserIntersectionSource {
    /// `None` when the browser has no `IntersectionObserver`.
    pub fn new() -> Option<Self> {
        let window = web_sys::window()?;
        let supported = js_sys::Reflect::has(&window, &JsValue::from_str("IntersectionObserver"))
            .unwrap_or(false);
        if !supported {
            zoon::eprintln!("IntersectionObserver is not available, reveal animations are disabled");
            return None;
        }
        Some(Self {
            elements: RefCell::new(BTreeMap::new()),
            registrations: RefCell::new(BTreeMap::new()),
            retired: RefCell::new(Vec::new()),
            dispatching: Rc::new(Cell::new(false)),
        })
    }

    pub fn register_element(&self, region: RegionId, element: web_sys::Element) {
        self.release_retired();
        self.elements.borrow_mut().insert(region, element);
    }

    /// Forget `element` for `region`, unless the region has been re-bound to
    /// a newer element in the meantime.
    pub fn forget_element(&self, region: &str, element: &web_sys::Element) {
        self.release_retired();
        let mut elements = self.elements.borrow_mut();
        if elements.get(region).is_some_and(|current| current == element) {
            elements.remove(region);
        }
    }

    fn release_retired(&self) {
        if !self.dispatching.get() {
            self.retired.borrow_mut().clear();
        }
    }
}

impl IntersectionSource for BrowserIntersectionSource {
    fn observe(
        &self,
        region: &RegionId,
        threshold: f64,
        mut callback: IntersectionCallback,
    ) -> Result<(), ObserveError> {
        self.release_retired();
        let element = self
            .elements
            .borrow()
            .get(region.as_str())
            .cloned()
            .ok_or_else(|| ObserveError::UnknownRegion(region.to_string()))?;

        let dispatching = self.dispatching.clone();
        let closure = Closure::<dyn FnMut(js_sys::Array)>::new(move |entries: js_sys::Array| {
            dispatching.set(true);
            for entry in entries.iter() {
                let entry: IntersectionObserverEntry = entry.unchecked_into();
                callback(IntersectionEntry {
                    visible_fraction: entry.intersection_ratio(),
                    is_intersecting: entry.is_intersecting(),
                });
            }
            dispatching.set(false);
        });

        let options = IntersectionObserverInit::new();
        options.set_threshold(&JsValue::from_f64(threshold));
        let observer =
            IntersectionObserver::new_with_options(closure.as_ref().unchecked_ref(), &options)
                .map_err(|error| ObserveError::Rejected(format!("{error:?}")))?;
        observer.observe(&element);

        let previous = self.registrations.borrow_mut().insert(
            region.clone(),
            Registration {
                observer,
                _closure: closure,
            },
        );
        if let Some(previous) = previous {
            previous.observer.disconnect();
            self.retired.borrow_mut().push(previous);
        }
        Ok(())
    }

    fn unobserve(&self, region: &RegionId) {
        let registration = self.registrations.borrow_mut().remove(region.as_str());
        if let Some(registration) = registration {
            registration.observer.disconnect();
            self.retired.borrow_mut().push(registration);
        }
        self.release_retired();
    }
}
