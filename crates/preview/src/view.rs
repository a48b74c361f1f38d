//! Minimal element tree for the preview fragments.

use std::fmt::Write as _;

/// Identifier of a clickable element, unique within one render pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ElementId(pub u32);

/// A node of a rendered fragment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
	Element(Element),
	Text(String),
}

/// An element with classes, an optional tooltip and children.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
	pub tag: &'static str,
	pub classes: Vec<&'static str>,
	pub title: Option<String>,
	/// Set on elements that react to clicks.
	pub id: Option<ElementId>,
	pub children: Vec<Node>,
}

impl Element {
	pub fn new(tag: &'static str) -> Self {
		Self {
			tag,
			classes: Vec::new(),
			title: None,
			id: None,
			children: Vec::new(),
		}
	}

	pub fn class(mut self, class: &'static str) -> Self {
		self.classes.push(class);
		self
	}

	pub fn title(mut self, title: impl Into<String>) -> Self {
		self.title = Some(title.into());
		self
	}

	pub fn id(mut self, id: ElementId) -> Self {
		self.id = Some(id);
		self
	}

	pub fn child(mut self, child: impl Into<Node>) -> Self {
		self.children.push(child.into());
		self
	}

	pub fn children(mut self, children: impl IntoIterator<Item = Node>) -> Self {
		self.children.extend(children);
		self
	}

	/// Returns true if the element carries `class`.
	pub fn has_class(&self, class: &str) -> bool {
		self.classes.contains(&class)
	}

	/// Returns the direct element children.
	pub fn element_children(&self) -> impl Iterator<Item = &Element> {
		self.children.iter().filter_map(Node::as_element)
	}
}

impl From<Element> for Node {
	fn from(element: Element) -> Self {
		Node::Element(element)
	}
}

impl From<String> for Node {
	fn from(text: String) -> Self {
		Node::Text(text)
	}
}

impl From<&str> for Node {
	fn from(text: &str) -> Self {
		Node::Text(text.to_owned())
	}
}

impl Node {
	/// Returns the element, if this node is one.
	pub fn as_element(&self) -> Option<&Element> {
		match self {
			Node::Element(e) => Some(e),
			Node::Text(_) => None,
		}
	}

	/// Concatenated text of this node and all descendants.
	pub fn text_content(&self) -> String {
		let mut out = String::new();
		self.collect_text(&mut out);
		out
	}

	fn collect_text(&self, out: &mut String) {
		match self {
			Node::Text(t) => out.push_str(t),
			Node::Element(e) => e.children.iter().for_each(|c| c.collect_text(out)),
		}
	}

	/// Depth-first search for elements carrying `class`.
	pub fn find_by_class<'a>(&'a self, class: &str, found: &mut Vec<&'a Element>) {
		if let Node::Element(e) = self {
			if e.has_class(class) {
				found.push(e);
			}
			e.children.iter().for_each(|c| c.find_by_class(class, found));
		}
	}

	/// Serializes the node as HTML.
	pub fn write_html(&self, out: &mut String) {
		match self {
			Node::Text(t) => out.push_str(&html_escape(t)),
			Node::Element(e) => {
				out.push('<');
				out.push_str(e.tag);
				if !e.classes.is_empty() {
					let _ = write!(out, " class=\"{}\"", e.classes.join(" "));
				}
				if let Some(title) = &e.title {
					let _ = write!(out, " title=\"{}\"", html_escape(title));
				}
				if let Some(ElementId(id)) = e.id {
					let _ = write!(out, " data-element-id=\"{id}\"");
				}
				out.push('>');
				e.children.iter().for_each(|c| c.write_html(out));
				let _ = write!(out, "</{}>", e.tag);
			}
		}
	}

	/// Returns the node serialized as HTML.
	pub fn to_html(&self) -> String {
		let mut out = String::new();
		self.write_html(&mut out);
		out
	}
}

pub(crate) fn html_escape(s: &str) -> String {
	let mut out = String::with_capacity(s.len());
	for c in s.chars() {
		match c {
			'&' => out.push_str("&amp;"),
			'<' => out.push_str("&lt;"),
			'>' => out.push_str("&gt;"),
			'"' => out.push_str("&quot;"),
			'\'' => out.push_str("&#39;"),
			_ => out.push(c),
		}
	}
	out
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_html_escapes_text_and_attributes() {
		let node: Node = Element::new("div")
			.class("moment-cell")
			.title("a \"b\"")
			.id(ElementId(3))
			.child("<x> & y")
			.into();

		assert_eq!(
			node.to_html(),
			r#"<div class="moment-cell" title="a &quot;b&quot;" data-element-id="3">&lt;x&gt; &amp; y</div>"#
		);
	}

	#[test]
	fn test_text_content_and_class_search() {
		let node: Node = Element::new("div")
			.child(Element::new("h3").child("work"))
			.child(Element::new("div").class("moment-cell").child("A"))
			.into();

		assert_eq!(node.text_content(), "workA");
		let mut found = Vec::new();
		node.find_by_class("moment-cell", &mut found);
		assert_eq!(found.len(), 1);
	}
}
