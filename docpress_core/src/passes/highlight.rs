use std::fmt;
use std::sync::Arc;

use crate::Artifact;
use crate::DefaultHooks;
use crate::DocpressResult;
use crate::Fence;
use crate::HighlightHooks;
use crate::Highlighter;
use crate::META;
use crate::Node;
use crate::Pass;
use crate::PassContext;
use crate::Visit;
use crate::try_visit;

/// Replaces every fence with its highlighted fragment.
pub struct HighlightPass {
	highlighter: Arc<Highlighter>,
	hooks: Box<dyn HighlightHooks>,
}

impl HighlightPass {
	pub fn new(highlighter: Arc<Highlighter>) -> Self {
		Self {
			highlighter,
			hooks: Box::new(DefaultHooks),
		}
	}

	/// Replace the line and word callbacks.
	#[must_use]
	pub fn with_hooks(mut self, hooks: impl HighlightHooks + 'static) -> Self {
		self.hooks = Box::new(hooks);
		self
	}
}

impl fmt::Debug for HighlightPass {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("HighlightPass")
			.field("theme", &self.highlighter.theme_name())
			.finish_non_exhaustive()
	}
}

impl Pass for HighlightPass {
	fn name(&self) -> &'static str {
		"highlight"
	}

	fn reads(&self) -> &'static [Artifact] {
		&[Artifact::FenceAnnotations]
	}

	fn writes(&self) -> &'static [Artifact] {
		&[Artifact::HighlightedFragments]
	}

	fn run(&self, tree: &mut Node, cx: &mut PassContext) -> DocpressResult<()> {
		let annotations = &cx.annotations;

		try_visit(
			tree,
			&|node: &Node| node.is_element("pre"),
			&mut |node: &mut Node| -> DocpressResult<Visit> {
				let Some(pre) = node.as_element() else {
					return Ok(Visit::Continue);
				};
				let Some(code) = pre.first_child_element("code") else {
					return Ok(Visit::Continue);
				};

				let id = pre.id;
				let source = match annotations.get(id) {
					Some(annotation) => annotation.raw.clone().unwrap_or_default(),
					None => code.text_content(),
				};
				let language = code
					.properties
					.classes()
					.iter()
					.find_map(|class| class.strip_prefix("language-"));
				let fence = Fence {
					language,
					meta: code.properties.get_str(META),
					source: &source,
				};

				let mut fragment = self.highlighter.highlight(fence, self.hooks.as_ref())?;
				fragment.id = id;
				*node = fragment.into();

				Ok(Visit::SkipChildren)
			},
		)
	}
}
