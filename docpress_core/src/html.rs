//! Serialization of a content tree to HTML.

use std::borrow::Cow;

use crate::Element;
use crate::Node;
use crate::PropertyValue;

const VOID_ELEMENTS: [&str; 4] = ["br", "hr", "img", "input"];

/// Serialize a tree to HTML.
///
/// Properties are written in name order. `true` renders as a bare attribute,
/// `false` is omitted and lists are joined with spaces.
pub fn to_html(node: &Node) -> String {
	let mut out = String::with_capacity(4096);
	write_node(node, &mut out);
	out
}

fn write_node(node: &Node, out: &mut String) {
	match node {
		Node::Root(root) => {
			for child in &root.children {
				write_node(child, out);
			}
		}
		Node::Element(element) => write_element(element, out),
		Node::Text(text) => out.push_str(&escape_html(&text.value)),
	}
}

fn write_element(element: &Element, out: &mut String) {
	out.push('<');
	out.push_str(&element.tag_name);

	for (name, value) in element.properties.iter() {
		match value {
			PropertyValue::Bool(false) => {}
			PropertyValue::Bool(true) => {
				out.push(' ');
				out.push_str(name);
			}
			PropertyValue::String(value) => write_attribute(name, value, out),
			PropertyValue::List(values) => write_attribute(name, &values.join(" "), out),
		}
	}

	out.push('>');

	if VOID_ELEMENTS.contains(&element.tag_name.as_str()) {
		return;
	}

	for child in &element.children {
		write_node(child, out);
	}

	out.push_str("</");
	out.push_str(&element.tag_name);
	out.push('>');
}

fn write_attribute(name: &str, value: &str, out: &mut String) {
	out.push(' ');
	out.push_str(name);
	out.push_str("=\"");
	out.push_str(&escape_html(value));
	out.push('"');
}

/// Escape `&`, `<`, `>` and `"`.
pub fn escape_html(value: &str) -> Cow<'_, str> {
	if !value.contains(['&', '<', '>', '"']) {
		return Cow::Borrowed(value);
	}

	let mut escaped = String::with_capacity(value.len() + 8);
	for ch in value.chars() {
		match ch {
			'&' => escaped.push_str("&amp;"),
			'<' => escaped.push_str("&lt;"),
			'>' => escaped.push_str("&gt;"),
			'"' => escaped.push_str("&quot;"),
			other => escaped.push(other),
		}
	}
	Cow::Owned(escaped)
}
