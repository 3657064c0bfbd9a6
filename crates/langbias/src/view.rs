//! Pure page view: configuration plus a [`ViewState`] snapshot in, render
//! tree out.

use crate::config::{MediaConfig, PageConfig};
use crate::content::{ACTIONS, BIAS_EXAMPLES, Card, GLOSSARY, LANGUAGE_ANGLES, SOURCES};
use crate::intersection::RegionId;
use crate::reveal::{REVEAL_CLASS, REVEALED_CLASS, RevealConfig};
use langbias_scene::{Element, Node};
use std::collections::BTreeSet;

pub const PAGE_TITLE: &str = "How AI can amplify language bias";

/// Action name carried by the reference list button.
pub const TOGGLE_REFERENCES: &str = "toggle-references";

pub const REFERENCE_LIST_ID: &str = "reference-list";

/// Everything the view reads besides configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ViewState {
    pub revealed: BTreeSet<RegionId>,
    pub references_shown: bool,
}

impl ViewState {
    pub fn is_revealed(&self, region: &str) -> bool {
        self.revealed.contains(region)
    }
}

struct GridSection {
    region: &'static str,
    eyebrow: &'static str,
    intro: &'static str,
    cards: &'static [Card],
    grid_class: &'static str,
    card_class: &'static str,
}

static EXAMPLES_GRID: GridSection = GridSection {
    region: "examples",
    eyebrow: "Concrete examples",
    intro: "Real products show how bias shows up in speech, writing, and moderation systems.",
    cards: &BIAS_EXAMPLES,
    grid_class: "grid",
    card_class: "card",
};

static ANGLES_GRID: GridSection = GridSection {
    region: "angles",
    eyebrow: "Why linguistics matters",
    intro: "Sociolinguistics explains why AI picks up social meanings from language data.",
    cards: &LANGUAGE_ANGLES,
    grid_class: "grid",
    card_class: "card",
};

static ACTIONS_GRID: GridSection = GridSection {
    region: "actions",
    eyebrow: "Design for inclusion",
    intro: "Preventing bias means changing data, metrics, and everyday UX decisions.",
    cards: &ACTIONS,
    grid_class: "grid",
    card_class: "card actionable",
};

static GLOSSARY_GRID: GridSection = GridSection {
    region: "glossary",
    eyebrow: "Glossary",
    intro: "Jargon-free definitions to keep the conversation clear.",
    cards: &GLOSSARY,
    grid_class: "grid glossary",
    card_class: "card",
};

pub const VIDEO_REGION: &str = "video";
pub const SOURCES_REGION: &str = "sources";

fn card_region(section: &str, index: usize) -> RegionId {
    RegionId::from(format!("{section}/{index}"))
}

/// Every reveal region on the page, in document order, with its config.
pub fn reveal_regions(config: &PageConfig) -> Vec<(RegionId, RevealConfig)> {
    let section = RevealConfig::with_delay(config.reveal.delay_ms);
    let mut regions = Vec::new();
    let push_grid = |regions: &mut Vec<_>, grid: &GridSection| {
        regions.push((RegionId::from(grid.region), section));
        for index in 0..grid.cards.len() {
            regions.push((
                card_region(grid.region, index),
                RevealConfig::with_delay(config.reveal.card_delay(index)),
            ));
        }
    };
    push_grid(&mut regions, &EXAMPLES_GRID);
    push_grid(&mut regions, &ANGLES_GRID);
    regions.push((RegionId::from(VIDEO_REGION), section));
    push_grid(&mut regions, &ACTIONS_GRID);
    push_grid(&mut regions, &GLOSSARY_GRID);
    regions.push((RegionId::from(SOURCES_REGION), section));
    regions
}

/// Render the whole page.
pub fn render(config: &PageConfig, state: &ViewState) -> Node {
    Element::new("div")
        .id("top")
        .class("page")
        .child(hero(&config.media))
        .child(cards_grid(&EXAMPLES_GRID, config, state))
        .child(cards_grid(&ANGLES_GRID, config, state))
        .child(media_section(&config.media, config.reveal.delay_ms, state))
        .child(cards_grid(&ACTIONS_GRID, config, state))
        .child(cards_grid(&GLOSSARY_GRID, config, state))
        .child(sources_section(config.reveal.delay_ms, state))
        .child(footer())
        .into()
}

fn reveal(element: Element, region: RegionId, delay_ms: u32, state: &ViewState) -> Element {
    let visible = state.is_revealed(region.as_str());
    let mut element = element.class(REVEAL_CLASS).reveal(region.into_inner(), delay_ms);
    if delay_ms > 0 {
        element = element.style("transition-delay", format!("{delay_ms}ms"));
    }
    if visible {
        element.push_class(REVEALED_CLASS);
    }
    element
}

fn eyebrow(text: &'static str) -> Element {
    Element::new("p").class("eyebrow").child(text)
}

fn section_header(title: &'static str, intro: &'static str) -> Element {
    Element::new("div")
        .class("section-header")
        .child(eyebrow(title))
        .child(Element::new("p").class("section-intro").child(intro))
}

fn hero(media: &MediaConfig) -> Element {
    let text = Element::new("div")
        .class("hero-text")
        .child(eyebrow("Language in society × AI"))
        .child(Element::new("h1").child(PAGE_TITLE))
        .child(Element::new("p").class("lede").child(
            "Speech and text systems learn from human data—and our data is social. That means AI can reproduce discrimination against dialects, accents, and identities unless we design against it.",
        ))
        .child(
            Element::new("div")
                .class("hero-actions")
                .child(
                    Element::new("a")
                        .class("button primary")
                        .attr("href", "#examples")
                        .child("See the examples"),
                )
                .child(
                    Element::new("a")
                        .class("button ghost")
                        .attr("href", "#actions")
                        .child("What we can do"),
                ),
        );

    let card = Element::new("div")
        .class("hero-card")
        .child(eyebrow("Quick takeaway"))
        .child(Element::new("p").child(
            "Linguistic discrimination is not just in classrooms or job interviews—it now lives in code. Understanding dialect diversity is a safety feature, not an add-on.",
        ))
        .child(audience_callout())
        .child(
            Element::new("img")
                .class("hero-image")
                .attr("src", media.hero_image.clone())
                .attr("alt", media.hero_image_alt.clone()),
        );

    Element::new("header").class("hero").child(text).child(card)
}

fn audience_callout() -> Element {
    Element::new("div")
        .class("callout")
        .child(eyebrow("Who is this for?"))
        .child(Element::new("h2").child("Anyone who uses AI—or builds it"))
        .child(Element::new("p").child(
            "This site assumes no linguistics background. It links everyday AI experiences to sociolinguistic concepts so people can spot bias and push for fairer tools.",
        ))
}

fn cards_grid(grid: &GridSection, config: &PageConfig, state: &ViewState) -> Element {
    let cards = grid.cards.iter().enumerate().map(|(index, card)| {
        let article = Element::new("article")
            .class(grid.card_class)
            .child(Element::new("h3").child(card.title))
            .child(Element::new("p").child(card.body));
        reveal(
            article,
            card_region(grid.region, index),
            config.reveal.card_delay(index),
            state,
        )
    });
    let section = Element::new("section")
        .id(grid.region)
        .class("section")
        .child(section_header(grid.eyebrow, grid.intro))
        .child(Element::new("div").class(grid.grid_class).children(cards));
    reveal(section, RegionId::from(grid.region), config.reveal.delay_ms, state)
}

fn media_section(media: &MediaConfig, delay_ms: u32, state: &ViewState) -> Element {
    let video = Element::new("figure")
        .class("media-item")
        .child(
            Element::new("video")
                .attr("src", media.inline_video.clone())
                .attr("controls", "")
                .attr("playsinline", "")
                .attr("preload", "metadata")
                .child("Your browser cannot play this video."),
        )
        .child(Element::new("figcaption").child(
            "The same sentence read in four English dialects, with live captions from a speech recognizer.",
        ));
    let frame = Element::new("figure")
        .class("media-item")
        .child(
            Element::new("iframe")
                .attr("src", media.embed_url.clone())
                .attr("title", media.embed_title.clone())
                .attr("loading", "lazy")
                .attr(
                    "allow",
                    "accelerometer; encrypted-media; gyroscope; picture-in-picture",
                )
                .attr("allowfullscreen", ""),
        )
        .child(Element::new("figcaption").child(media.embed_title.clone()));

    let section = Element::new("section")
        .id(VIDEO_REGION)
        .class("section")
        .child(section_header(
            "See it in action",
            "Listen to how recognition systems treat different voices, then hear researchers explain where the gaps come from.",
        ))
        .child(Element::new("div").class("media").child(video).child(frame));
    reveal(section, RegionId::from(VIDEO_REGION), delay_ms, state)
}

fn sources_section(delay_ms: u32, state: &ViewState) -> Element {
    let shown = state.references_shown;
    let button = Element::new("button")
        .class("button ghost references-toggle")
        .attr("type", "button")
        .attr("aria-expanded", if shown { "true" } else { "false" })
        .attr("aria-controls", REFERENCE_LIST_ID)
        .action(TOGGLE_REFERENCES)
        .child(if shown { "Hide references" } else { "Show references" });

    let section = Element::new("section")
        .id(SOURCES_REGION)
        .class("section")
        .child(section_header(
            "Want to dig deeper?",
            "These readings and talks ground the examples above in research on language, technology, and society.",
        ))
        .child(button)
        .child_if(shown, || reference_list().into());
    reveal(section, RegionId::from(SOURCES_REGION), delay_ms, state)
}

fn reference_list() -> Element {
    Element::new("ul")
        .id(REFERENCE_LIST_ID)
        .class("sources")
        .children(SOURCES.iter().map(|source| {
            Element::new("li").child(
                Element::new("a")
                    .attr("href", source.url)
                    .attr("target", "_blank")
                    .attr("rel", "noreferrer")
                    .child(source.label),
            )
        }))
}

fn footer() -> Element {
    Element::new("footer")
        .class("footer")
        .child(
            Element::new("div")
                .child(eyebrow("Take action"))
                .child(Element::new("p").child(
                    "Ask your AI tools: how do they handle dialect diversity, what audits exist, and how can users report harm?",
                )),
        )
        .child(
            Element::new("a")
                .class("button ghost")
                .attr("href", "#top")
                .child("Back to top"),
        )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn render_default(state: &ViewState) -> Node {
        render(&PageConfig::default(), state)
    }

    #[test]
    fn every_reveal_binding_has_a_region() {
        let config = PageConfig::default();
        let regions = reveal_regions(&config);
        let tree = render(&config, &ViewState::default());
        let bound: Vec<&str> = tree
            .find_all(|element| element.reveal.is_some())
            .into_iter()
            .filter_map(|element| element.reveal.as_ref().map(|binding| binding.region.as_ref()))
            .collect();
        let planned: Vec<&str> = regions.iter().map(|(region, _)| region.as_str()).collect();
        assert_eq!(bound, planned);
    }

    #[test]
    fn region_plan_counts() {
        let regions = reveal_regions(&PageConfig::default());
        // 4 grids + video + sources, plus 3 + 3 + 4 + 4 cards.
        assert_eq!(regions.len(), 6 + 14);
        assert_eq!(regions[0].0.as_str(), "examples");
        assert_eq!(regions[1].0.as_str(), "examples/0");
        assert_eq!(regions.last().map(|(region, _)| region.as_str()), Some("sources"));
    }

    #[test]
    fn card_delays_are_staggered() {
        let mut config = PageConfig::default();
        config.reveal.delay_ms = 50;
        config.reveal.card_stagger_ms = 100;
        let tree = render(&config, &ViewState::default());
        let card = tree.find_by_region("glossary/3").unwrap();
        assert_eq!(card.reveal.as_ref().map(|binding| binding.delay_ms), Some(350));
        assert_eq!(
            card.styles.first().map(|(p, v)| (p.as_ref(), v.as_ref())),
            Some(("transition-delay", "350ms"))
        );
        let first = tree.find_by_region("glossary/0").unwrap();
        assert_eq!(first.styles.first().map(|(_, v)| v.as_ref()), Some("50ms"));
    }

    #[test]
    fn no_delay_style_when_zero() {
        let tree = render_default(&ViewState::default());
        let section = tree.find_by_region("examples").unwrap();
        assert!(section.styles.is_empty());
    }

    #[test]
    fn marker_class_follows_state() {
        let hidden = render_default(&ViewState::default());
        let section = hidden.find_by_region("angles").unwrap();
        assert!(section.has_class(REVEAL_CLASS));
        assert!(!section.has_class(REVEALED_CLASS));

        let mut state = ViewState::default();
        state.revealed.insert(RegionId::from("angles"));
        let shown = render_default(&state);
        assert!(shown.find_by_region("angles").unwrap().has_class(REVEALED_CLASS));
        assert!(!shown.find_by_region("angles/0").unwrap().has_class(REVEALED_CLASS));
    }

    #[test]
    fn reference_list_follows_toggle() {
        let hidden = render_default(&ViewState::default());
        assert!(hidden.find_by_id(REFERENCE_LIST_ID).is_none());
        let button = hidden.find_by_action(TOGGLE_REFERENCES).unwrap();
        assert_eq!(button.get_attr("aria-expanded"), Some("false"));
        assert_eq!(Node::from(button.clone()).text_content(), "Show references");

        let state = ViewState {
            references_shown: true,
            ..ViewState::default()
        };
        let shown = render_default(&state);
        let list = shown.find_by_id(REFERENCE_LIST_ID).unwrap();
        assert_eq!(list.children_with_tag("li").count(), SOURCES.len());
        let button = shown.find_by_action(TOGGLE_REFERENCES).unwrap();
        assert_eq!(button.get_attr("aria-expanded"), Some("true"));
    }

    #[test]
    fn links_open_in_new_context() {
        let state = ViewState {
            references_shown: true,
            ..ViewState::default()
        };
        let tree = render_default(&state);
        let links = tree.find_all(|element| element.tag == "a" && element.get_attr("target").is_some());
        assert_eq!(links.len(), 4);
        for link in links {
            assert_eq!(link.get_attr("target"), Some("_blank"));
            assert_eq!(link.get_attr("rel"), Some("noreferrer"));
        }
    }

    #[test]
    fn embeds_configured_media() {
        let mut config = PageConfig::default();
        config.media.embed_url = "https://player.example.org/embed/42".to_string();
        let tree = render(&config, &ViewState::default());
        let frame = tree.find(|element| element.tag == "iframe").unwrap();
        assert_eq!(frame.get_attr("src"), Some("https://player.example.org/embed/42"));
        assert_eq!(tree.find_all(|element| element.tag == "video").len(), 1);
        assert_eq!(tree.find_all(|element| element.tag == "img").len(), 1);
    }

    #[test]
    fn render_is_deterministic() {
        let state = ViewState::default();
        assert_eq!(render_default(&state), render_default(&state));
    }
}
