//! Static HTML serialization of a render tree.
//!
//! Text and attribute values go through askama's HTML escaper. The document
//! shell is the `document.html` template.

use crate::{Element, Node};
use askama::filters::escape;
use askama::{Html, Template};
use std::fmt::Write;

/// Elements that never have children or a closing tag.
const VOID_ELEMENTS: [&str; 6] = ["br", "hr", "img", "input", "meta", "source"];

#[derive(Template)]
#[template(path = "document.html")]
struct DocumentTemplate<'a> {
    title: &'a str,
    stylesheet: &'a str,
    body: String,
}

/// Serialize a tree fragment.
pub fn to_html(node: &Node) -> askama::Result<String> {
    let mut out = String::new();
    write_node(&mut out, node)?;
    Ok(out)
}

/// Wrap a rendered body into a complete standalone document.
pub fn document(title: &str, stylesheet: &str, body: &Node) -> askama::Result<String> {
    DocumentTemplate {
        title,
        stylesheet,
        body: to_html(body)?,
    }
    .render()
}

fn write_node(out: &mut String, node: &Node) -> askama::Result<()> {
    match node {
        Node::Text(text) => write!(out, "{}", escape(Html, text)?)?,
        Node::Element(element) => write_element(out, element)?,
    }
    Ok(())
}

fn write_element(out: &mut String, element: &Element) -> askama::Result<()> {
    write!(out, "<{}", element.tag)?;
    if let Some(id) = &element.id {
        write_attr(out, "id", id)?;
    }
    if !element.classes.is_empty() {
        write_attr(out, "class", &element.classes.join(" "))?;
    }
    for (name, value) in &element.attrs {
        write_attr(out, name, value)?;
    }
    if !element.styles.is_empty() {
        let style = element
            .styles
            .iter()
            .map(|(property, value)| format!("{property}: {value}"))
            .collect::<Vec<_>>()
            .join("; ");
        write_attr(out, "style", &style)?;
    }
    if let Some(binding) = &element.reveal {
        write_attr(out, "data-region", &binding.region)?;
    }
    if let Some(action) = &element.action {
        write_attr(out, "data-action", action)?;
    }
    out.push('>');

    if VOID_ELEMENTS.contains(&element.tag.as_ref()) {
        return Ok(());
    }
    for child in &element.children {
        write_node(out, child)?;
    }
    write!(out, "</{}>", element.tag)?;
    Ok(())
}

fn write_attr(out: &mut String, name: &str, value: &str) -> askama::Result<()> {
    write!(out, " {}=\"{}\"", name, escape(Html, value)?)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn writes_attributes_in_order() {
        let node: Node = Element::new("a")
            .id("link")
            .class("button ghost")
            .attr("href", "#top")
            .child("Back to top")
            .into();
        assert_eq!(
            to_html(&node).unwrap(),
            r##"<a id="link" class="button ghost" href="#top">Back to top</a>"##
        );
    }

    #[test]
    fn escapes_text_and_attributes() {
        let node: Node = Element::new("p")
            .attr("title", "say \"hi\" & <bye>")
            .child("1 < 2 & 3 > 2")
            .into();
        assert_eq!(
            to_html(&node).unwrap(),
            "<p title=\"say &quot;hi&quot; &amp; &lt;bye&gt;\">1 &lt; 2 &amp; 3 &gt; 2</p>"
        );
    }

    #[test]
    fn void_elements_have_no_closing_tag() {
        let node: Node = Element::new("img").attr("src", "/a.svg").attr("alt", "").into();
        assert_eq!(to_html(&node).unwrap(), r#"<img src="/a.svg" alt="">"#);
    }

    #[test]
    fn reveal_and_action_become_data_attributes() {
        let node: Node = Element::new("section")
            .reveal("examples", 80)
            .style("transition-delay", "80ms")
            .child(Element::new("button").action("toggle-references").child("Show"))
            .into();
        assert_eq!(
            to_html(&node).unwrap(),
            concat!(
                r#"<section style="transition-delay: 80ms" data-region="examples">"#,
                r#"<button data-action="toggle-references">Show</button></section>"#
            )
        );
    }

    #[test]
    fn document_embeds_stylesheet_and_title() {
        let html = document("A & B", ".x { color: red; }", &Node::text("body")).unwrap();
        assert!(html.starts_with("<!DOCTYPE html>"));
        assert!(html.contains("<title>A &amp; B</title>"));
        assert!(html.contains(".x { color: red; }"));
        assert!(html.contains("<body>\nbody\n</body>"));
    }

    #[test]
    fn stylesheet_and_body_are_not_escaped_twice() {
        let body: Node = Element::new("p").child("Tom & Jerry's").into();
        let html = document("t", "a > b { color: red; }", &body).unwrap();
        assert!(html.contains("a > b { color: red; }"));
        assert!(html.contains("<p>Tom &amp; Jerry&#x27;s</p>"));
    }
}
