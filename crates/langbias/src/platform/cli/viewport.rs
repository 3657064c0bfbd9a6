//! Manual viewport for deterministic runs.
//!
//! `ManualIntersectionSource` records registrations and only calls back when
//! told to via [`emit`](ManualIntersectionSource::emit), which makes reveal
//! behaviour fast and deterministic to drive from tests and the CLI.

use crate::error::ObserveError;
use crate::intersection::{IntersectionCallback, IntersectionEntry, IntersectionSource, RegionId};
use std::cell::RefCell;
use std::collections::BTreeMap;
use std::rc::Rc;

type SharedCallback = Rc<RefCell<IntersectionCallback>>;

struct Registration {
    threshold: f64,
    callback: SharedCallback,
}

/// Intersection source driven by explicit calls.
pub struct ManualIntersectionSource {
    registrations: RefCell<BTreeMap<RegionId, Registration>>,
    supported: bool,
}

impl ManualIntersectionSource {
    pub fn new() -> Self {
        Self {
            registrations: RefCell::new(BTreeMap::new()),
            supported: true,
        }
    }

    /// A source that refuses every registration, like a host without
    /// intersection detection.
    pub fn unsupported() -> Self {
        Self {
            supported: false,
            ..Self::new()
        }
    }

    pub fn is_observed(&self, region: &str) -> bool {
        self.registrations.borrow().contains_key(region)
    }

    pub fn observed_count(&self) -> usize {
        self.registrations.borrow().len()
    }

    pub fn threshold_for(&self, region: &str) -> Option<f64> {
        self.registrations
            .borrow()
            .get(region)
            .map(|registration| registration.threshold)
    }

    /// Report that `visible_fraction` of `region` is in the viewport.
    ///
    /// Returns whether a registered callback was invoked.
    pub fn emit(&self, region: &str, visible_fraction: f64) -> bool {
        let callback = self
            .registrations
            .borrow()
            .get(region)
            .map(|registration| registration.callback.clone());
        match callback {
            Some(callback) => {
                invoke(&callback, IntersectionEntry::with_fraction(visible_fraction));
                true
            }
            None => false,
        }
    }

    /// Report the same fraction for every observed region, as a full-page
    /// scroll would. Returns the number of callbacks invoked.
    pub fn emit_all(&self, visible_fraction: f64) -> usize {
        let callbacks: Vec<SharedCallback> = self
            .registrations
            .borrow()
            .values()
            .map(|registration| registration.callback.clone())
            .collect();
        let entry = IntersectionEntry::with_fraction(visible_fraction);
        for callback in &callbacks {
            invoke(callback, entry);
        }
        callbacks.len()
    }

    /// Grab the callback currently registered for `region`.
    ///
    /// Firing it after the region was unobserved simulates a callback the
    /// host had already queued.
    pub fn callback_for(&self, region: &str) -> Option<PendingCallback> {
        self.registrations
            .borrow()
            .get(region)
            .map(|registration| PendingCallback(registration.callback.clone()))
    }
}

impl Default for ManualIntersectionSource {
    fn default() -> Self {
        Self::new()
    }
}

impl IntersectionSource for ManualIntersectionSource {
    fn observe(
        &self,
        region: &RegionId,
        threshold: f64,
        callback: IntersectionCallback,
    ) -> Result<(), ObserveError> {
        if !self.supported {
            return Err(ObserveError::Unsupported);
        }
        self.registrations.borrow_mut().insert(
            region.clone(),
            Registration {
                threshold,
                callback: Rc::new(RefCell::new(callback)),
            },
        );
        Ok(())
    }

    fn unobserve(&self, region: &RegionId) {
        self.registrations.borrow_mut().remove(region.as_str());
    }
}

/// A callback captured by [`ManualIntersectionSource::callback_for`].
pub struct PendingCallback(SharedCallback);

impl PendingCallback {
    pub fn fire(&self, visible_fraction: f64) {
        invoke(&self.0, IntersectionEntry::with_fraction(visible_fraction));
    }
}

fn invoke(callback: &SharedCallback, entry: IntersectionEntry) {
    match callback.try_borrow_mut() {
        Ok(mut callback) => (&mut **callback)(entry),
        Err(_) => log::warn!("intersection callback re-entered, dropping entry"),
    }
}
