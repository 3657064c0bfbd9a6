//! Viewport intersection capability supplied by the host.
//!
//! The browser implements it with `IntersectionObserver`
//! (see `platform::browser::observer`), tests and the CLI with
//! [`ManualIntersectionSource`](crate::platform::cli::viewport::ManualIntersectionSource).

use crate::error::ObserveError;
use langbias_scene::Str;
use std::borrow::{Borrow, Cow};
use std::fmt;

/// Stable name of a reveal-wrapped region, e.g. `examples` or `examples/2`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RegionId(Str);

impl RegionId {
    pub fn new(name: impl Into<Str>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> Str {
        self.0
    }
}

impl fmt::Display for RegionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Borrow<str> for RegionId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl From<&'static str> for RegionId {
    fn from(name: &'static str) -> Self {
        Self(Cow::Borrowed(name))
    }
}

impl From<String> for RegionId {
    fn from(name: String) -> Self {
        Self(Cow::Owned(name))
    }
}

/// One visibility observation of a region.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IntersectionEntry {
    /// Share of the region's area inside the viewport, `0.0..=1.0`.
    pub visible_fraction: f64,
    pub is_intersecting: bool,
}

impl IntersectionEntry {
    /// Entry for `visible_fraction`, clamped to `0.0..=1.0`. NaN counts as
    /// not visible.
    pub fn with_fraction(visible_fraction: f64) -> Self {
        let visible_fraction = if visible_fraction.is_nan() {
            0.0
        } else {
            visible_fraction.clamp(0.0, 1.0)
        };
        Self {
            visible_fraction,
            is_intersecting: visible_fraction > 0.0,
        }
    }

    /// Whether at least `threshold` of the region is visible. False for NaN.
    pub fn reaches(&self, threshold: f64) -> bool {
        self.visible_fraction >= threshold
    }
}

pub type IntersectionCallback = Box<dyn FnMut(IntersectionEntry)>;

/// Host capability that reports how much of a region is in the viewport.
///
/// Implementations must tolerate `unobserve` being called from inside a
/// callback they are currently running, and `unobserve` of a region that is
/// not observed must be a no-op.
pub trait IntersectionSource {
    fn observe(
        &self,
        region: &RegionId,
        threshold: f64,
        callback: IntersectionCallback,
    ) -> Result<(), ObserveError>;

    fn unobserve(&self, region: &RegionId);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fractions_are_clamped() {
        assert_eq!(IntersectionEntry::with_fraction(1.7).visible_fraction, 1.0);
        let below = IntersectionEntry::with_fraction(-0.3);
        assert_eq!(below.visible_fraction, 0.0);
        assert!(!below.is_intersecting);
    }

    #[test]
    fn nan_is_never_visible() {
        let entry = IntersectionEntry::with_fraction(f64::NAN);
        assert_eq!(entry.visible_fraction, 0.0);
        assert!(!entry.reaches(0.2));

        let raw = IntersectionEntry {
            visible_fraction: f64::NAN,
            is_intersecting: true,
        };
        assert!(!raw.reaches(0.2));
        assert!(!raw.reaches(0.0));
    }

    #[test]
    fn threshold_is_inclusive() {
        assert!(IntersectionEntry::with_fraction(0.2).reaches(0.2));
        assert!(!IntersectionEntry::with_fraction(0.19).reaches(0.2));
    }
}
