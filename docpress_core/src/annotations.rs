//! Data carried from one pass to a later one.
//!
//! The code extractor records what it learns about a fence in [`Annotations`],
//! keyed by the fence's [`NodeId`]. The highlighter rebuilds the fence but
//! hands its identity to the wrapper it produces, and the propagation pass
//! takes the record back out by that identity. Nothing in the table is ever
//! serialized.

use std::collections::HashMap;
use std::fmt;

use crate::NodeId;

/// Raw source text of a fence, as it appeared in the document.
pub const RAW_STRING: &str = "__rawString__";
/// Whether the highlighted fence has a caption header.
pub const WITH_META: &str = "__withMeta__";
/// The file a fence's source was read from.
pub const SRC: &str = "__src__";
/// The `event="..."` directive of a fence.
pub const EVENT: &str = "__event__";
/// The component style a fence's source belongs to.
pub const STYLE: &str = "__style__";

/// What the extractor learned about one fence.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FenceAnnotation {
	/// Literal text of the fence. `None` when the code element had no text.
	pub raw: Option<String>,
	pub event: Option<String>,
	pub src: Option<String>,
	pub style: Option<String>,
}

/// Per-document side table of fence annotations.
#[derive(Debug, Default)]
pub struct Annotations {
	fences: HashMap<NodeId, FenceAnnotation>,
}

impl Annotations {
	pub fn insert(&mut self, id: NodeId, annotation: FenceAnnotation) {
		self.fences.insert(id, annotation);
	}

	pub fn get(&self, id: NodeId) -> Option<&FenceAnnotation> {
		self.fences.get(&id)
	}

	/// Remove and return the annotation recorded for `id`.
	pub fn take(&mut self, id: NodeId) -> Option<FenceAnnotation> {
		self.fences.remove(&id)
	}

	pub fn len(&self) -> usize {
		self.fences.len()
	}

	pub fn is_empty(&self) -> bool {
		self.fences.is_empty()
	}

	pub fn clear(&mut self) {
		self.fences.clear();
	}
}

/// Something a pass produces for a later pass to consume. Passes declare the
/// artifacts they read and write so a pipeline can reject an ordering in which
/// a pass would run before its inputs exist.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum Artifact {
	/// [`FenceAnnotation`]s keyed by fence identity.
	FenceAnnotations,
	/// Highlighted fragment wrappers that carry their fence's identity.
	HighlightedFragments,
	/// Durable `__rawString__` (and friends) properties on rendered fences.
	FenceProperties,
	/// `id` properties on heading elements.
	HeadingIds,
}

impl fmt::Display for Artifact {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		let name = match self {
			Self::FenceAnnotations => "fence annotations",
			Self::HighlightedFragments => "highlighted fragments",
			Self::FenceProperties => "fence properties",
			Self::HeadingIds => "heading ids",
		};
		f.write_str(name)
	}
}
