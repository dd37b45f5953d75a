use std::sync::LazyLock;

use regex::Regex;

use crate::Artifact;
use crate::DocpressResult;
use crate::Element;
use crate::FenceAnnotation;
use crate::META;
use crate::Node;
use crate::Pass;
use crate::PassContext;
use crate::PropertyValue;
use crate::SRC;
use crate::STYLE;
use crate::Visit;
use crate::visit_elements;

static EVENT_PATTERN: LazyLock<Regex> =
	LazyLock::new(|| Regex::new(r#"event="([^"]*)""#).expect("valid event pattern"));

/// Records each fence's raw source and directives before the highlighter
/// replaces it.
#[derive(Debug, Clone, Copy, Default)]
pub struct ExtractCodePass;

impl Pass for ExtractCodePass {
	fn name(&self) -> &'static str {
		"extract-code"
	}

	fn writes(&self) -> &'static [Artifact] {
		&[Artifact::FenceAnnotations]
	}

	fn run(&self, tree: &mut Node, cx: &mut PassContext) -> DocpressResult<()> {
		visit_elements(
			tree,
			|element| element.is("pre"),
			|pre| {
				if let Some(annotation) = extract_fence(pre) {
					cx.annotations.insert(pre.id, annotation);
				}
				Visit::Continue
			},
		);

		tracing::debug!(fences = cx.annotations.len(), "extracted fences");
		Ok(())
	}
}

/// Extract the annotation for one `pre` element.
///
/// Returns `None` when the first child is not a `code` element. The
/// `event="..."` directive is removed from the code's metadata and the
/// transient `__src__` and `__style__` properties are moved off the `pre`.
pub fn extract_fence(pre: &mut Element) -> Option<FenceAnnotation> {
	let code = pre.first_child_element_mut("code")?;

	let mut event = None;
	if let Some(PropertyValue::String(meta)) = code.properties.get_mut(META) {
		let found = EVENT_PATTERN.captures(meta).and_then(|captures| {
			let whole = captures.get(0)?;
			Some((whole.range(), captures[1].to_string()))
		});

		if let Some((range, value)) = found {
			meta.replace_range(range, "");
			event = Some(value);
		}
	}

	let raw = code
		.children
		.first()
		.and_then(Node::as_text)
		.map(str::to_string);

	Some(FenceAnnotation {
		raw,
		event,
		src: pre.properties.take_str(SRC),
		style: pre.properties.take_str(STYLE),
	})
}
