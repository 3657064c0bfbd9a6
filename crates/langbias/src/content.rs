//! Static page content.
//!
//! Everything here lives for the whole program; nothing is ever mutated.

use crate::error::{ContentError, ContentIssue};
use std::collections::HashSet;
use url::Url;

/// A title/body record rendered as a grid card.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Card {
    pub title: &'static str,
    pub body: &'static str,
}

/// A citation rendered as an external link.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Source {
    pub label: &'static str,
    pub url: &'static str,
}

pub static BIAS_EXAMPLES: [Card; 3] = [
    Card {
        title: "Voice assistants",
        body: "Early systems like Siri or Alexa struggled with accents outside General American English and certain varieties of English, often mishearing Black or Chicano English. That reflects the data and tuning choices that prioritized some speakers over others.",
    },
    Card {
        title: "Content moderation",
        body: "Toxicity detectors sometimes flag African American English or reclaimed slurs as harmful while letting subtle hate speech slide. Language models learn both community norms and societal biases from the data they see.",
    },
    Card {
        title: "Hiring filters",
        body: "Resume screeners and chatbots can rank candidates lower if their wording, names, or education markers differ from the majority profile in the training data, reinforcing existing discrimination.",
    },
];

pub static LANGUAGE_ANGLES: [Card; 3] = [
    Card {
        title: "Language is social",
        body: "Ways of speaking index region, race, gender, and community. When AI learns language, it also picks up social meanings and stereotypes embedded in the data.",
    },
    Card {
        title: "Prescriptivism sneaks in",
        body: "Systems often treat one variety (e.g., “standard” English) as correct. That can label other varieties as errors, echoing old prescriptive attitudes rather than linguistic reality.",
    },
    Card {
        title: "Who is the audience?",
        body: "Design choices assume certain users. If training and testing do not include diverse audiences, AI ends up optimized for some people and frustrating or harmful for others.",
    },
];

pub static ACTIONS: [Card; 4] = [
    Card {
        title: "Diversify data and reviewers",
        body: "Include dialect-rich, multilingual data and pay community reviewers to flag harms. Representation needs to be built, not assumed.",
    },
    Card {
        title: "Measure bias directly",
        body: "Audit models for misrecognition rates, false positives, and stereotype completions across dialects and identities. Publish the numbers.",
    },
    Card {
        title: "Offer user control",
        body: "Let people switch language settings, pick pronouns, or correct the model easily. Small UX choices signal that multiple voices belong.",
    },
    Card {
        title: "Slow down high-stakes use",
        body: "Avoid deploying generative AI where errors amplify discrimination (e.g., policing, immigration, welfare) without safeguards, human oversight, and appeal routes.",
    },
];

pub static GLOSSARY: [Card; 4] = [
    Card {
        title: "Bias (in AI)",
        body: "Systematic patterns where a model treats groups differently. Comes from data, modeling choices, or deployment context.",
    },
    Card {
        title: "Dialect",
        body: "A rule-governed variety of a language. All dialects are valid; “standard” is just the socially powerful one.",
    },
    Card {
        title: "Linguistic discrimination",
        body: "Unfair treatment based on how someone speaks or writes. When AI encodes it, the harm scales quickly.",
    },
    Card {
        title: "Prescriptivism",
        body: "Belief that only one way to speak/write is correct. AI systems can encode this when trained on narrow norms.",
    },
];

pub static SOURCES: [Source; 4] = [
    Source {
        label: "Joy Buolamwini & Timnit Gebru (2018) on biased face tech",
        url: "https://proceedings.mlr.press/v81/buolamwini18a.html",
    },
    Source {
        label: "Blodgett et al. (2020) survey of bias in NLP",
        url: "https://aclanthology.org/2020.acl-main.485/",
    },
    Source {
        label: "Hovy & Spruit (2016) on social impact of NLP",
        url: "https://aclanthology.org/P16-2096/",
    },
    Source {
        label: "Noble (2018) Algorithms of Oppression (book)",
        url: "https://safiyaunoble.com/algorithms-of-oppression/",
    },
];

/// Every card list on the page, keyed by the list name used in reports.
pub fn card_lists() -> [(&'static str, &'static [Card]); 4] {
    [
        ("bias_examples", &BIAS_EXAMPLES[..]),
        ("language_angles", &LANGUAGE_ANGLES[..]),
        ("actions", &ACTIONS[..]),
        ("glossary", &GLOSSARY[..]),
    ]
}

/// Check the built-in content.
pub fn validate() -> Result<(), ContentError> {
    validate_content(&card_lists(), &SOURCES)
}

/// Check arbitrary content for integrity issues.
///
/// Cards need a non-empty title and body, and titles must be unique within a
/// list because they key the rendered cards. Sources need a non-empty label
/// and an absolute URL.
pub fn validate_content(
    lists: &[(&'static str, &'static [Card])],
    sources: &[Source],
) -> Result<(), ContentError> {
    let mut issues = Vec::new();

    for &(list, cards) in lists {
        let mut titles = HashSet::new();
        for (index, card) in cards.iter().enumerate() {
            if card.title.trim().is_empty() {
                issues.push(ContentIssue::EmptyField { list, index, field: "title" });
            }
            if card.body.trim().is_empty() {
                issues.push(ContentIssue::EmptyField { list, index, field: "body" });
            }
            if !titles.insert(card.title) {
                issues.push(ContentIssue::DuplicateTitle { list, title: card.title.to_string() });
            }
        }
    }

    for (index, source) in sources.iter().enumerate() {
        if source.label.trim().is_empty() {
            issues.push(ContentIssue::EmptyField { list: "sources", index, field: "label" });
        }
        if source.url.trim().is_empty() {
            issues.push(ContentIssue::EmptyField { list: "sources", index, field: "url" });
        } else if let Err(reason) = check_absolute_url(source.url) {
            issues.push(ContentIssue::InvalidUrl {
                index,
                url: source.url.to_string(),
                reason,
            });
        }
    }

    if issues.is_empty() {
        Ok(())
    } else {
        Err(ContentError { issues })
    }
}

/// An absolute URL has a scheme and, for web links, a host.
pub fn check_absolute_url(raw: &str) -> Result<Url, String> {
    let url = Url::parse(raw).map_err(|error| error.to_string())?;
    if url.cannot_be_a_base() {
        return Err("not a hierarchical URL".to_string());
    }
    if matches!(url.scheme(), "http" | "https") && url.host_str().is_none_or(str::is_empty) {
        return Err("missing host".to_string());
    }
    Ok(url)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_content_is_valid() {
        validate().unwrap();
    }

    #[test]
    fn every_source_is_an_absolute_url() {
        for source in &SOURCES {
            let url = check_absolute_url(source.url).unwrap();
            assert_eq!(url.scheme(), "https", "{}", source.label);
        }
    }

    #[test]
    fn list_sizes() {
        assert_eq!(BIAS_EXAMPLES.len(), 3);
        assert_eq!(LANGUAGE_ANGLES.len(), 3);
        assert_eq!(ACTIONS.len(), 4);
        assert_eq!(GLOSSARY.len(), 4);
        assert_eq!(SOURCES.len(), 4);
    }

    static BROKEN_CARDS: [Card; 3] = [
        Card { title: "Dialect", body: " " },
        Card { title: "", body: "Orphan body" },
        Card { title: "Dialect", body: "Second definition" },
    ];

    static BROKEN_SOURCES: [Source; 3] = [
        Source { label: "Relative", url: "/papers/local.pdf" },
        Source { label: "", url: "https://example.org/" },
        Source { label: "Mail", url: "mailto:someone@example.org" },
    ];

    #[test]
    fn reports_every_issue() {
        let error = validate_content(&[("broken", &BROKEN_CARDS[..])], &BROKEN_SOURCES).unwrap_err();
        assert_eq!(
            error.issues,
            vec![
                ContentIssue::EmptyField { list: "broken", index: 0, field: "body" },
                ContentIssue::EmptyField { list: "broken", index: 1, field: "title" },
                ContentIssue::DuplicateTitle { list: "broken", title: "Dialect".to_string() },
                ContentIssue::InvalidUrl {
                    index: 0,
                    url: "/papers/local.pdf".to_string(),
                    reason: "relative URL without a base".to_string(),
                },
                ContentIssue::EmptyField { list: "sources", index: 1, field: "label" },
                ContentIssue::InvalidUrl {
                    index: 2,
                    url: "mailto:someone@example.org".to_string(),
                    reason: "not a hierarchical URL".to_string(),
                },
            ]
        );
    }

    #[test]
    fn parses_absolute_and_rejects_garbage() {
        assert!(check_absolute_url("https://aclanthology.org/P16-2096/").is_ok());
        assert!(check_absolute_url("not a url").is_err());
    }
}
