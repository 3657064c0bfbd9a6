//! Reveal controller: defers a region's entrance transition until the region
//! first becomes visible, then keeps it applied.
//!
//! State is monotonic. A controller starts hidden, flips to visible at most
//! once and never flips back. The observer registration made on attachment
//! is owned by an [`Attachment`] guard, so it is released on every exit path:
//! first qualifying callback, explicit detach, or the guard simply going out
//! of scope.

use crate::intersection::{IntersectionEntry, IntersectionSource, RegionId};
use crate::notify::{Listeners, Subscription};
use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};

/// Share of a region's area that must be in the viewport to reveal it.
pub const VISIBILITY_THRESHOLD: f64 = 0.2;

/// Class every reveal region carries.
pub const REVEAL_CLASS: &str = "reveal";

/// Marker class added once a region is revealed. The stylesheet keys the
/// entrance transition off it.
pub const REVEALED_CLASS: &str = "is-visible";

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RevealConfig {
    /// Entrance transition delay. Defaults to 0.
    pub delay_ms: u32,
    threshold: f64,
}

impl Default for RevealConfig {
    fn default() -> Self {
        Self {
            delay_ms: 0,
            threshold: VISIBILITY_THRESHOLD,
        }
    }
}

impl RevealConfig {
    pub fn with_delay(delay_ms: u32) -> Self {
        Self {
            delay_ms,
            ..Self::default()
        }
    }

    /// Always [`VISIBILITY_THRESHOLD`].
    pub fn threshold(&self) -> f64 {
        self.threshold
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RevealState {
    pub visible: bool,
}

/// The observer registration currently live for a region.
struct LiveRegistration {
    /// Token of the attachment that made it.
    token: u64,
    source: Weak<dyn IntersectionSource>,
}

struct RevealInner {
    region: RegionId,
    config: RevealConfig,
    visible: Cell<bool>,
    registration: RefCell<Option<LiveRegistration>>,
    next_token: Cell<u64>,
    on_reveal: Listeners<RegionId>,
}

impl RevealInner {
    fn live_token(&self) -> Option<u64> {
        self.registration
            .borrow()
            .as_ref()
            .map(|registration| registration.token)
    }

    /// Drop the live registration and unobserve the region on the source it
    /// was made with.
    fn release(&self) -> Option<u64> {
        let registration = self.registration.take()?;
        if let Some(source) = registration.source.upgrade() {
            source.unobserve(&self.region);
        }
        Some(registration.token)
    }

    fn reveal(&self) {
        if self.visible.replace(true) {
            return;
        }
        log::debug!("region `{}` revealed", self.region);
        self.on_reveal.notify(&self.region);
    }
}

/// Per-region reveal state plus the logic that drives it.
///
/// Cloning yields another handle to the same region state.
#[derive(Clone)]
pub struct RevealController {
    inner: Rc<RevealInner>,
}

impl RevealController {
    pub fn new(region: impl Into<RegionId>, config: RevealConfig) -> Self {
        Self {
            inner: Rc::new(RevealInner {
                region: region.into(),
                config,
                visible: Cell::new(false),
                registration: RefCell::new(None),
                next_token: Cell::new(0),
                on_reveal: Listeners::new(),
            }),
        }
    }

    pub fn region(&self) -> &RegionId {
        &self.inner.region
    }

    pub fn config(&self) -> RevealConfig {
        self.inner.config
    }

    pub fn state(&self) -> RevealState {
        RevealState {
            visible: self.inner.visible.get(),
        }
    }

    pub fn is_visible(&self) -> bool {
        self.inner.visible.get()
    }

    /// Whether an observer registration is currently live.
    pub fn is_observing(&self) -> bool {
        self.inner.live_token().is_some()
    }

    /// Called once, with the region id, when the region is revealed.
    pub fn subscribe(&self, listener: impl FnMut(&RegionId) + 'static) -> Subscription {
        self.inner.on_reveal.subscribe(listener)
    }

    /// Register the region for viewport observation.
    ///
    /// Without a source, or when the source refuses the registration, the
    /// region is revealed right away. An already visible region registers
    /// nothing.
    pub fn attach(&self, source: Option<Rc<dyn IntersectionSource>>) -> Attachment {
        let inner = &self.inner;
        if inner.visible.get() {
            return Attachment::inert(inner.clone());
        }
        let Some(source) = source else {
            log::warn!(
                "no intersection source for region `{}`, revealing immediately",
                inner.region
            );
            inner.reveal();
            return Attachment::inert(inner.clone());
        };

        // A region is attached to at most one place at a time.
        if let Some(token) = inner.release() {
            log::debug!("region `{}` re-attached, dropped registration {token}", inner.region);
        }

        let token = inner.next_token.get();
        inner.next_token.set(token + 1);
        *inner.registration.borrow_mut() = Some(LiveRegistration {
            token,
            source: Rc::downgrade(&source),
        });

        let callback = {
            let weak_inner: Weak<RevealInner> = Rc::downgrade(inner);
            Box::new(move |entry: IntersectionEntry| {
                let Some(inner) = weak_inner.upgrade() else {
                    return;
                };
                if inner.live_token() != Some(token) {
                    log::debug!("ignoring stale callback for region `{}`", inner.region);
                    return;
                }
                if !entry.reaches(inner.config.threshold) {
                    return;
                }
                inner.release();
                inner.reveal();
            })
        };

        match source.observe(&inner.region, inner.config.threshold, callback) {
            Ok(()) => {
                log::debug!("observing region `{}`", inner.region);
                Attachment {
                    inner: inner.clone(),
                    source: Some(source),
                    token,
                }
            }
            Err(error) => {
                log::warn!(
                    "cannot observe region `{}` ({error}), revealing immediately",
                    inner.region
                );
                *inner.registration.borrow_mut() = None;
                inner.reveal();
                Attachment::inert(inner.clone())
            }
        }
    }
}

/// Live attachment of a region to an intersection source.
///
/// Dropping it deregisters the observer if the registration is still live.
#[must_use = "dropping an Attachment detaches the region immediately"]
pub struct Attachment {
    inner: Rc<RevealInner>,
    source: Option<Rc<dyn IntersectionSource>>,
    token: u64,
}

impl Attachment {
    fn inert(inner: Rc<RevealInner>) -> Self {
        Self {
            inner,
            source: None,
            token: u64::MAX,
        }
    }

    pub fn region(&self) -> &RegionId {
        &self.inner.region
    }

    pub fn detach(self) {}
}

impl Drop for Attachment {
    fn drop(&mut self) {
        // Holding the source keeps the registration's weak handle upgradable.
        let Some(_source) = self.source.take() else {
            return;
        };
        if self.inner.live_token() == Some(self.token) {
            self.inner.release();
            log::debug!("region `{}` detached", self.inner.region);
        }
    }
}
