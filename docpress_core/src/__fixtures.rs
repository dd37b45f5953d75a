use std::sync::Arc;
use std::sync::LazyLock;

use crate::*;

static HIGHLIGHTER: LazyLock<Arc<Highlighter>> =
	LazyLock::new(|| Arc::new(Highlighter::new(default_theme())));

pub fn highlighter() -> Arc<Highlighter> {
	Arc::clone(&HIGHLIGHTER)
}

pub fn pipeline() -> Pipeline {
	Pipeline::standard(highlighter(), &DocpressConfig::default())
		.unwrap_or_else(|e| panic!("standard pipeline: {e}"))
}

pub fn front_matter() -> FrontMatter {
	FrontMatter::new("Installation", "How to install the package.")
}

pub fn document(identity_path: &str, raw_text: &str) -> Document {
	Document::new(identity_path, raw_text, front_matter())
}

/// `pre > code` the way the parser lowers a fence.
pub fn fence(language: Option<&str>, meta: Option<&str>, source: &str) -> Element {
	let mut code = Element::new("code");
	if let Some(language) = language {
		code = code.with_class(format!("language-{language}"));
	}
	if let Some(meta) = meta {
		code = code.with_property(META, meta);
	}
	if !source.is_empty() {
		code = code.with_child(Node::text(source));
	}

	Element::new("pre").with_child(code)
}

/// A highlighted fragment whose first child is the caption header.
pub fn fragment_with_caption() -> Element {
	Element::new("div")
		.with_property(FRAGMENT, true)
		.with_child(
			Element::new("div")
				.with_property(TITLE, true)
				.with_child(Node::text("button.tsx")),
		)
		.with_child(Element::new("pre").with_child(Element::new("code")))
}

/// A highlighted fragment holding only the `pre`.
pub fn fragment_without_caption() -> Element {
	Element::new("div")
		.with_property(FRAGMENT, true)
		.with_child(Element::new("pre").with_child(Element::new("code")))
}

/// Every element with the given tag, in document order.
pub fn find_all<'a>(node: &'a Node, tag_name: &str) -> Vec<&'a Element> {
	let mut found = vec![];
	collect_elements(node, tag_name, &mut found);
	found
}

fn collect_elements<'a>(node: &'a Node, tag_name: &str, found: &mut Vec<&'a Element>) {
	if let Some(element) = node.as_element().filter(|element| element.is(tag_name)) {
		found.push(element);
	}

	for child in node.children().into_iter().flatten() {
		collect_elements(child, tag_name, found);
	}
}

/// The first element with the given tag.
pub fn find_first<'a>(node: &'a Node, tag_name: &str) -> &'a Element {
	find_all(node, tag_name)
		.into_iter()
		.next()
		.unwrap_or_else(|| panic!("no `{tag_name}` element in tree"))
}

pub fn write_file(path: &std::path::Path, content: &str) {
	if let Some(parent) = path.parent() {
		std::fs::create_dir_all(parent).unwrap_or_else(|e| panic!("create dir: {e}"));
	}
	std::fs::write(path, content).unwrap_or_else(|e| panic!("write: {e}"));
}
