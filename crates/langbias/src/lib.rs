//! Single-page site about how AI systems amplify language bias.
//!
//! The page is plain data ([`content`]) turned into a render tree by a pure
//! [`view`]. The only interactive state is one [`reveal::RevealController`]
//! per reveal-wrapped region and the reference list [`toggle`]; both live in
//! [`page::Page`], which notifies subscribers whenever either changes.

pub mod config;
pub mod content;
pub mod error;
pub mod intersection;
pub mod notify;
pub mod page;
pub mod platform;
pub mod reveal;
pub mod style;
pub mod toggle;
pub mod view;

pub use langbias_scene as scene;

#[cfg(feature = "browser")]
pub use zoon;

pub use config::PageConfig;
pub use error::{ConfigError, ContentError, ContentIssue, ObserveError};
pub use intersection::{IntersectionEntry, IntersectionSource, RegionId};
pub use page::{Action, Page, PageAttachment, PageEvent};
pub use reveal::{Attachment, RevealConfig, RevealController, RevealState, VISIBILITY_THRESHOLD};
