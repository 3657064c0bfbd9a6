//! Page configuration loaded from TOML.
//!
//! Every key is optional. The visibility threshold is not a key:
//! it is fixed at [`VISIBILITY_THRESHOLD`](crate::reveal::VISIBILITY_THRESHOLD).

use crate::content::check_absolute_url;
use crate::error::ConfigError;
use serde::Deserialize;
use std::path::Path;

/// Upper bound for any configured delay.
pub const MAX_DELAY_MS: u32 = 10_000;

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PageConfig {
    pub reveal: RevealSettings,
    pub media: MediaConfig,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RevealSettings {
    /// Base entrance delay for every reveal region.
    pub delay_ms: u32,
    /// Extra delay per card index inside a grid.
    pub card_stagger_ms: u32,
}

impl Default for RevealSettings {
    fn default() -> Self {
        Self {
            delay_ms: 0,
            card_stagger_ms: 80,
        }
    }
}

impl RevealSettings {
    pub fn card_delay(&self, index: usize) -> u32 {
        let index = u32::try_from(index).unwrap_or(u32::MAX);
        self.delay_ms
            .saturating_add(self.card_stagger_ms.saturating_mul(index))
    }
}

/// Locations of the media the page embeds. None of them is ever fetched by
/// this crate.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct MediaConfig {
    pub hero_image: String,
    pub hero_image_alt: String,
    pub inline_video: String,
    pub embed_url: String,
    pub embed_title: String,
}

impl Default for MediaConfig {
    fn default() -> Self {
        Self {
            hero_image: "/_api/public/images/voices.svg".to_string(),
            hero_image_alt: "Speech bubbles in many dialects flowing into a model".to_string(),
            inline_video: "/_api/public/media/dialects.mp4".to_string(),
            embed_url: "https://www.youtube.com/embed/UG_X_7g63rY".to_string(),
            embed_title: "Joy Buolamwini: How I'm fighting bias in algorithms".to_string(),
        }
    }
}

impl PageConfig {
    /// Read and validate a config file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let config: Self = toml::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        config.validate()?;
        log::debug!("loaded page config from {}", path.display());
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.reveal.delay_ms > MAX_DELAY_MS {
            return Err(ConfigError::Invalid {
                key: "reveal.delay_ms",
                reason: format!("must be at most {MAX_DELAY_MS}"),
            });
        }
        if self.reveal.card_stagger_ms > MAX_DELAY_MS {
            return Err(ConfigError::Invalid {
                key: "reveal.card_stagger_ms",
                reason: format!("must be at most {MAX_DELAY_MS}"),
            });
        }
        for (key, value) in [
            ("media.hero_image", &self.media.hero_image),
            ("media.inline_video", &self.media.inline_video),
        ] {
            if value.trim().is_empty() {
                return Err(ConfigError::Invalid {
                    key,
                    reason: "must not be empty".to_string(),
                });
            }
        }
        check_absolute_url(&self.media.embed_url).map_err(|reason| ConfigError::Invalid {
            key: "media.embed_url",
            reason,
        })?;
        Ok(())
    }
}
