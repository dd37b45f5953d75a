use std::collections::HashSet;

use serde::Deserialize;
use serde::Serialize;

use crate::Artifact;
use crate::DocpressResult;
use crate::Element;
use crate::Node;
use crate::Pass;
use crate::PassContext;
use crate::Visit;
use crate::visit_elements;

pub const DEFAULT_ANCHOR_CLASS: &str = "subheading-anchor";
pub const DEFAULT_ANCHOR_LABEL: &str = "Link to section";

const HEADINGS: [&str; 6] = ["h1", "h2", "h3", "h4", "h5", "h6"];

pub fn is_heading(element: &Element) -> bool {
	HEADINGS.contains(&element.tag_name.as_str())
}

/// Lowercase `text` and collapse every run of other characters than letters
/// and digits into a single `-`, trimmed from both ends.
pub fn slugify(text: &str) -> String {
	let mut slug = String::with_capacity(text.len());
	let mut pending_separator = false;

	for ch in text.chars() {
		if ch.is_alphanumeric() {
			if pending_separator && !slug.is_empty() {
				slug.push('-');
			}
			pending_separator = false;
			slug.extend(ch.to_lowercase());
		} else {
			pending_separator = true;
		}
	}

	slug
}

/// Hands out slugs that are unique within one document.
#[derive(Debug, Default)]
pub struct Slugger {
	taken: HashSet<String>,
}

impl Slugger {
	/// Mark an existing identifier as used.
	pub fn reserve(&mut self, id: impl Into<String>) {
		self.taken.insert(id.into());
	}

	/// The slug for `text`, suffixed with `-1`, `-2`, ... when it is already
	/// taken. `None` when `text` has no letters or digits.
	pub fn slug(&mut self, text: &str) -> Option<String> {
		let base = slugify(text);
		if base.is_empty() {
			return None;
		}

		let mut candidate = base.clone();
		let mut counter = 0;
		while self.taken.contains(&candidate) {
			counter += 1;
			candidate = format!("{base}-{counter}");
		}

		self.taken.insert(candidate.clone());
		Some(candidate)
	}
}

/// Assigns an `id` to every heading from its text.
#[derive(Debug, Clone, Copy, Default)]
pub struct HeadingSlugPass;

impl Pass for HeadingSlugPass {
	fn name(&self) -> &'static str {
		"heading-slugs"
	}

	fn writes(&self) -> &'static [Artifact] {
		&[Artifact::HeadingIds]
	}

	fn run(&self, tree: &mut Node, _cx: &mut PassContext) -> DocpressResult<()> {
		let mut slugger = Slugger::default();

		visit_elements(tree, is_heading, |heading| {
			if let Some(id) = heading.properties.get_str("id") {
				slugger.reserve(id);
			}
			Visit::SkipChildren
		});

		visit_elements(tree, is_heading, |heading| {
			if heading.properties.contains_key("id") {
				return Visit::SkipChildren;
			}
			if let Some(id) = slugger.slug(&heading.text_content()) {
				heading.properties.insert("id".to_string(), id.into());
			} else {
				tracing::debug!("heading without text left without an id");
			}
			Visit::SkipChildren
		});

		Ok(())
	}
}

/// Where the anchor goes inside its heading.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AnchorBehavior {
	#[default]
	Prepend,
	Append,
}

/// Adds a self link to every heading with an `id`.
#[derive(Debug, Clone)]
pub struct AutolinkHeadingsPass {
	class: String,
	label: String,
	behavior: AnchorBehavior,
}

impl Default for AutolinkHeadingsPass {
	fn default() -> Self {
		Self {
			class: DEFAULT_ANCHOR_CLASS.to_string(),
			label: DEFAULT_ANCHOR_LABEL.to_string(),
			behavior: AnchorBehavior::default(),
		}
	}
}

impl AutolinkHeadingsPass {
	pub fn new(class: impl Into<String>, label: impl Into<String>, behavior: AnchorBehavior) -> Self {
		Self {
			class: class.into(),
			label: label.into(),
			behavior,
		}
	}

	fn anchor(&self, id: &str) -> Element {
		Element::new("a")
			.with_property("href", format!("#{id}"))
			.with_class(self.class.as_str())
			.with_property("aria-label", self.label.as_str())
			.with_child(
				Element::new("span")
					.with_class("icon")
					.with_class("icon-link"),
			)
	}
}

impl Pass for AutolinkHeadingsPass {
	fn name(&self) -> &'static str {
		"autolink-headings"
	}

	fn reads(&self) -> &'static [Artifact] {
		&[Artifact::HeadingIds]
	}

	fn run(&self, tree: &mut Node, _cx: &mut PassContext) -> DocpressResult<()> {
		visit_elements(tree, is_heading, |heading| {
			let Some(id) = heading.properties.get_str("id") else {
				return Visit::SkipChildren;
			};

			let anchor: Node = self.anchor(id).into();
			match self.behavior {
				AnchorBehavior::Prepend => heading.children.insert(0, anchor),
				AnchorBehavior::Append => heading.children.push(anchor),
			}

			Visit::SkipChildren
		});

		Ok(())
	}
}
