use crate::Artifact;
use crate::DocpressResult;
use crate::EVENT;
use crate::Element;
use crate::FRAGMENT;
use crate::FenceAnnotation;
use crate::Node;
use crate::Pass;
use crate::PassContext;
use crate::RAW_STRING;
use crate::SRC;
use crate::STYLE;
use crate::Visit;
use crate::WITH_META;
use crate::visit_elements;

/// Copies each fence's annotation onto the `pre` inside its highlighted
/// fragment, where it becomes a durable property.
#[derive(Debug, Clone, Copy, Default)]
pub struct PropagatePass;

impl Pass for PropagatePass {
	fn name(&self) -> &'static str {
		"propagate"
	}

	fn reads(&self) -> &'static [Artifact] {
		&[Artifact::FenceAnnotations, Artifact::HighlightedFragments]
	}

	fn writes(&self) -> &'static [Artifact] {
		&[Artifact::FenceProperties]
	}

	fn run(&self, tree: &mut Node, cx: &mut PassContext) -> DocpressResult<()> {
		visit_elements(tree, is_fragment, |wrapper| {
			let annotation = cx.annotations.take(wrapper.id);
			if !propagate_annotation(wrapper, annotation) {
				tracing::debug!("highlighted fragment without a trailing pre");
			}
			Visit::SkipChildren
		});

		Ok(())
	}
}

pub fn is_fragment(element: &Element) -> bool {
	element.is("div") && element.properties.contains_key(FRAGMENT)
}

/// Write `annotation` onto the wrapper's trailing `pre`. Returns `false`,
/// leaving the wrapper untouched, when the last child is not a `pre`.
///
/// `__withMeta__` is set from the wrapper's shape: it is `true` when the first
/// child is a `div`, the caption header.
pub fn propagate_annotation(wrapper: &mut Element, annotation: Option<FenceAnnotation>) -> bool {
	let with_meta = wrapper
		.children
		.first()
		.is_some_and(|child| child.is_element("div"));

	let Some(pre) = wrapper
		.children
		.last_mut()
		.and_then(Node::as_element_mut)
		.filter(|child| child.is("pre"))
	else {
		return false;
	};

	pre.properties.insert(WITH_META.to_string(), with_meta.into());

	let Some(annotation) = annotation else {
		return true;
	};

	if let Some(raw) = annotation.raw {
		pre.properties.insert(RAW_STRING.to_string(), raw.into());
	}

	let optional = [
		(SRC, annotation.src),
		(EVENT, annotation.event),
		(STYLE, annotation.style),
	];
	for (name, value) in optional {
		if let Some(value) = value.filter(|value| !value.is_empty()) {
			pre.properties.insert(name.to_string(), value.into());
		}
	}

	true
}
