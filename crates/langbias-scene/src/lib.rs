//! Platform-neutral render tree.
//!
//! A [`Node`] tree is what the page view produces. Renderers turn it into a
//! live DOM (browser platform) or into a standalone HTML document (CLI).
//! The tree is plain data: cloning, comparing and serializing it is cheap
//! enough to do on every render.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use std::borrow::Cow;

pub mod html;

pub type Str = Cow<'static, str>;

/// A node in the render tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Node {
    Element(Element),
    Text(Str),
}

impl Node {
    pub fn text(text: impl Into<Str>) -> Self {
        Node::Text(text.into())
    }

    pub fn as_element(&self) -> Option<&Element> {
        match self {
            Node::Element(element) => Some(element),
            Node::Text(_) => None,
        }
    }

    /// Depth-first, pre-order walk over every element in the tree.
    pub fn walk<'a>(&'a self, visit: &mut impl FnMut(&'a Element)) {
        if let Node::Element(element) = self {
            visit(element);
            for child in &element.children {
                child.walk(visit);
            }
        }
    }

    /// First element (pre-order) matching `predicate`.
    pub fn find(&self, predicate: impl Fn(&Element) -> bool) -> Option<&Element> {
        let mut found = None;
        self.walk(&mut |element| {
            if found.is_none() && predicate(element) {
                found = Some(element);
            }
        });
        found
    }

    /// All elements (pre-order) matching `predicate`.
    pub fn find_all(&self, predicate: impl Fn(&Element) -> bool) -> Vec<&Element> {
        let mut found = Vec::new();
        self.walk(&mut |element| {
            if predicate(element) {
                found.push(element);
            }
        });
        found
    }

    pub fn find_by_id(&self, id: &str) -> Option<&Element> {
        self.find(|element| element.id.as_deref() == Some(id))
    }

    pub fn find_by_region(&self, region: &str) -> Option<&Element> {
        self.find(|element| {
            element
                .reveal
                .as_ref()
                .is_some_and(|binding| binding.region == region)
        })
    }

    pub fn find_by_action(&self, action: &str) -> Option<&Element> {
        self.find(|element| element.action.as_deref() == Some(action))
    }

    /// Concatenated text of this node and all its descendants.
    pub fn text_content(&self) -> String {
        let mut out = String::new();
        self.collect_text(&mut out);
        out
    }

    fn collect_text(&self, out: &mut String) {
        match self {
            Node::Text(text) => out.push_str(text),
            Node::Element(element) => {
                for child in &element.children {
                    child.collect_text(out);
                }
            }
        }
    }
}

impl From<Element> for Node {
    fn from(element: Element) -> Self {
        Node::Element(element)
    }
}

impl From<&'static str> for Node {
    fn from(text: &'static str) -> Self {
        Node::Text(Cow::Borrowed(text))
    }
}

impl From<String> for Node {
    fn from(text: String) -> Self {
        Node::Text(Cow::Owned(text))
    }
}

/// Marks an element as a reveal region.
///
/// Renderers use the binding to register the element for viewport
/// observation. The current reveal state itself is carried by the element's
/// classes, so a static renderer needs nothing else.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RevealBinding {
    pub region: Str,
    pub delay_ms: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Element {
    pub tag: Str,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<Str>,
    #[serde(default, skip_serializing_if = "SmallVec::is_empty")]
    pub classes: SmallVec<[Str; 2]>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub attrs: Vec<(Str, Str)>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub styles: Vec<(Str, Str)>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reveal: Option<RevealBinding>,
    /// Name of the action dispatched when the element is pressed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub action: Option<Str>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<Node>,
}

impl Element {
    pub fn new(tag: impl Into<Str>) -> Self {
        Self {
            tag: tag.into(),
            id: None,
            classes: SmallVec::new(),
            attrs: Vec::new(),
            styles: Vec::new(),
            reveal: None,
            action: None,
            children: Vec::new(),
        }
    }

    pub fn id(mut self, id: impl Into<Str>) -> Self {
        self.id = Some(id.into());
        self
    }

    /// Adds one or more space-separated classes.
    pub fn class(mut self, classes: &'static str) -> Self {
        for class in classes.split_whitespace() {
            self.push_class(class);
        }
        self
    }

    pub fn push_class(&mut self, class: impl Into<Str>) {
        let class = class.into();
        if !self.classes.contains(&class) {
            self.classes.push(class);
        }
    }

    pub fn attr(mut self, name: impl Into<Str>, value: impl Into<Str>) -> Self {
        self.attrs.push((name.into(), value.into()));
        self
    }

    pub fn style(mut self, property: impl Into<Str>, value: impl Into<Str>) -> Self {
        self.styles.push((property.into(), value.into()));
        self
    }

    pub fn reveal(mut self, region: impl Into<Str>, delay_ms: u32) -> Self {
        self.reveal = Some(RevealBinding {
            region: region.into(),
            delay_ms,
        });
        self
    }

    pub fn action(mut self, action: impl Into<Str>) -> Self {
        self.action = Some(action.into());
        self
    }

    pub fn child(mut self, child: impl Into<Node>) -> Self {
        self.children.push(child.into());
        self
    }

    pub fn child_if(self, condition: bool, child: impl FnOnce() -> Node) -> Self {
        if condition { self.child(child()) } else { self }
    }

    pub fn children(mut self, children: impl IntoIterator<Item = impl Into<Node>>) -> Self {
        self.children.extend(children.into_iter().map(Into::into));
        self
    }

    pub fn has_class(&self, class: &str) -> bool {
        self.classes.iter().any(|c| c == class)
    }

    pub fn get_attr(&self, name: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, value)| value.as_ref())
    }

    /// Direct element children with the given tag.
    pub fn children_with_tag<'a>(&'a self, tag: &'a str) -> impl Iterator<Item = &'a Element> {
        self.children
            .iter()
            .filter_map(Node::as_element)
            .filter(move |element| element.tag == tag)
    }
}
