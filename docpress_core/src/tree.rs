//! The content tree every pass operates on.
//!
//! A tree is made of three node kinds: the [`Root`] of a document, [`Element`]
//! nodes (a tag name, properties and ordered children) and [`Text`] leaves.
//! Only elements carry properties and only text nodes carry a value.

use std::collections::BTreeMap;
use std::sync::atomic::AtomicU64;
use std::sync::atomic::Ordering;

use derive_more::Deref;
use derive_more::DerefMut;
use serde::Serialize;

/// The property holding an element's class list.
pub const CLASS: &str = "class";

/// Process-unique identity of an element.
///
/// Identities are never serialized. They let a pass record data about a node
/// in a side table that a later pass looks up, even after an intermediate pass
/// has rebuilt the node (see [`crate::Annotations`]).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(u64);

impl NodeId {
	/// Allocate a fresh identity.
	pub fn next() -> Self {
		static NEXT: AtomicU64 = AtomicU64::new(1);
		Self(NEXT.fetch_add(1, Ordering::Relaxed))
	}
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Node {
	Root(Root),
	Element(Element),
	Text(Text),
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Root {
	pub children: Vec<Node>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Text {
	pub value: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Element {
	#[serde(skip)]
	pub id: NodeId,
	pub tag_name: String,
	pub properties: Properties,
	pub children: Vec<Node>,
}

/// Equality is structural: two elements with different identities but the same
/// shape compare equal.
impl PartialEq for Element {
	fn eq(&self, other: &Self) -> bool {
		self.tag_name == other.tag_name
			&& self.properties == other.properties
			&& self.children == other.children
	}
}

impl Element {
	pub fn new(tag_name: impl Into<String>) -> Self {
		Self {
			id: NodeId::next(),
			tag_name: tag_name.into(),
			properties: Properties::default(),
			children: Vec::new(),
		}
	}

	#[must_use]
	pub fn with_property(mut self, name: impl Into<String>, value: impl Into<PropertyValue>) -> Self {
		self.properties.insert(name.into(), value.into());
		self
	}

	#[must_use]
	pub fn with_class(mut self, class: impl Into<String>) -> Self {
		self.properties.class_list_mut().push(class.into());
		self
	}

	#[must_use]
	pub fn with_child(mut self, child: impl Into<Node>) -> Self {
		self.children.push(child.into());
		self
	}

	#[must_use]
	pub fn with_children(mut self, children: impl IntoIterator<Item = Node>) -> Self {
		self.children.extend(children);
		self
	}

	pub fn is(&self, tag_name: &str) -> bool {
		self.tag_name == tag_name
	}

	/// The first child, when it is an element with the given tag.
	pub fn first_child_element(&self, tag_name: &str) -> Option<&Element> {
		match self.children.first() {
			Some(Node::Element(child)) if child.is(tag_name) => Some(child),
			_ => None,
		}
	}

	pub fn first_child_element_mut(&mut self, tag_name: &str) -> Option<&mut Element> {
		match self.children.first_mut() {
			Some(Node::Element(child)) if child.is(tag_name) => Some(child),
			_ => None,
		}
	}

	/// Concatenated value of every text descendant, in reading order.
	pub fn text_content(&self) -> String {
		let mut text = String::new();
		for child in &self.children {
			child.collect_text(&mut text);
		}
		text
	}
}

impl Node {
	pub fn text(value: impl Into<String>) -> Self {
		Self::Text(Text {
			value: value.into(),
		})
	}

	pub fn root(children: Vec<Node>) -> Self {
		Self::Root(Root { children })
	}

	pub fn children(&self) -> Option<&Vec<Node>> {
		match self {
			Self::Root(root) => Some(&root.children),
			Self::Element(element) => Some(&element.children),
			Self::Text(_) => None,
		}
	}

	pub fn children_mut(&mut self) -> Option<&mut Vec<Node>> {
		match self {
			Self::Root(root) => Some(&mut root.children),
			Self::Element(element) => Some(&mut element.children),
			Self::Text(_) => None,
		}
	}

	pub fn as_element(&self) -> Option<&Element> {
		match self {
			Self::Element(element) => Some(element),
			Self::Root(_) | Self::Text(_) => None,
		}
	}

	pub fn as_element_mut(&mut self) -> Option<&mut Element> {
		match self {
			Self::Element(element) => Some(element),
			Self::Root(_) | Self::Text(_) => None,
		}
	}

	pub fn as_text(&self) -> Option<&str> {
		match self {
			Self::Text(text) => Some(&text.value),
			Self::Root(_) | Self::Element(_) => None,
		}
	}

	/// Whether this node is an element with the given tag.
	pub fn is_element(&self, tag_name: &str) -> bool {
		self.as_element().is_some_and(|element| element.is(tag_name))
	}

	pub fn text_content(&self) -> String {
		let mut text = String::new();
		self.collect_text(&mut text);
		text
	}

	fn collect_text(&self, text: &mut String) {
		match self {
			Self::Text(node) => text.push_str(&node.value),
			Self::Root(Root { children }) | Self::Element(Element { children, .. }) => {
				for child in children {
					child.collect_text(text);
				}
			}
		}
	}
}

impl From<Element> for Node {
	fn from(element: Element) -> Self {
		Self::Element(element)
	}
}

impl From<Text> for Node {
	fn from(text: Text) -> Self {
		Self::Text(text)
	}
}

/// A property value. Lists serialize space separated (e.g. the class list).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum PropertyValue {
	Bool(bool),
	String(String),
	List(Vec<String>),
}

impl PropertyValue {
	pub fn as_str(&self) -> Option<&str> {
		match self {
			Self::String(value) => Some(value),
			Self::Bool(_) | Self::List(_) => None,
		}
	}

	pub fn as_bool(&self) -> Option<bool> {
		match self {
			Self::Bool(value) => Some(*value),
			Self::String(_) | Self::List(_) => None,
		}
	}
}

impl From<bool> for PropertyValue {
	fn from(value: bool) -> Self {
		Self::Bool(value)
	}
}

impl From<&str> for PropertyValue {
	fn from(value: &str) -> Self {
		Self::String(value.to_string())
	}
}

impl From<String> for PropertyValue {
	fn from(value: String) -> Self {
		Self::String(value)
	}
}

impl From<Vec<String>> for PropertyValue {
	fn from(value: Vec<String>) -> Self {
		Self::List(value)
	}
}

/// Element properties keyed by attribute name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deref, DerefMut)]
pub struct Properties(BTreeMap<String, PropertyValue>);

impl Properties {
	pub fn get_str(&self, name: &str) -> Option<&str> {
		self.0.get(name).and_then(PropertyValue::as_str)
	}

	/// Remove a string property and return its value.
	pub fn take_str(&mut self, name: &str) -> Option<String> {
		match self.0.remove(name) {
			Some(PropertyValue::String(value)) => Some(value),
			Some(other) => {
				self.0.insert(name.to_string(), other);
				None
			}
			None => None,
		}
	}

	/// The class list, empty when absent.
	pub fn classes(&self) -> &[String] {
		match self.0.get(CLASS) {
			Some(PropertyValue::List(classes)) => classes,
			_ => &[],
		}
	}

	/// The class list, initialized when absent. A plain string value is split
	/// on whitespace.
	pub fn class_list_mut(&mut self) -> &mut Vec<String> {
		let entry = self
			.0
			.entry(CLASS.to_string())
			.or_insert_with(|| PropertyValue::List(Vec::new()));

		if !matches!(entry, PropertyValue::List(_)) {
			let classes = match entry {
				PropertyValue::String(value) => value.split_whitespace().map(str::to_string).collect(),
				PropertyValue::Bool(_) | PropertyValue::List(_) => Vec::new(),
			};
			*entry = PropertyValue::List(classes);
		}

		match entry {
			PropertyValue::List(classes) => classes,
			PropertyValue::Bool(_) | PropertyValue::String(_) => unreachable!("class list normalized above"),
		}
	}

	/// Replace the class list.
	pub fn set_classes(&mut self, classes: Vec<String>) {
		self.0.insert(CLASS.to_string(), PropertyValue::List(classes));
	}
}
