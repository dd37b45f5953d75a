use std::collections::BTreeSet;
use std::path::Path;
use std::path::PathBuf;

use super::trim_final_newline;
use crate::DocpressResult;
use crate::DocumentWarning;
use crate::Element;
use crate::META;
use crate::Node;
use crate::Pass;
use crate::PassContext;
use crate::SRC;
use crate::STYLE;
use crate::Visit;
use crate::visit_elements;

pub const DEFAULT_COMPONENTS_DIR: &str = "components";

/// Component elements keep their JSX name, which starts with an uppercase
/// letter.
pub fn is_component(element: &Element) -> bool {
	element
		.tag_name
		.chars()
		.next()
		.is_some_and(|ch| ch.is_ascii_uppercase())
}

/// Resolves the components that show source code.
///
/// `ComponentSource` appends the fence for its `src` file and
/// `ComponentPreview` the fence for `<name>.tsx`, both looked up in the
/// components directory beside the document. Components listed as known are
/// left to the renderer; any other component produces a warning.
#[derive(Debug, Clone)]
pub struct ComponentPass {
	components_dir: PathBuf,
	known: BTreeSet<String>,
}

impl Default for ComponentPass {
	fn default() -> Self {
		Self::new(DEFAULT_COMPONENTS_DIR)
	}
}

impl ComponentPass {
	pub fn new(components_dir: impl Into<PathBuf>) -> Self {
		Self {
			components_dir: components_dir.into(),
			known: BTreeSet::new(),
		}
	}

	#[must_use]
	pub fn with_known<I, S>(mut self, names: I) -> Self
	where
		I: IntoIterator<Item = S>,
		S: Into<String>,
	{
		self.known.extend(names.into_iter().map(Into::into));
		self
	}

	fn resolve(&self, element: &mut Element, source_dir: Option<&Path>) -> Result<(), DocumentWarning> {
		let name = element.tag_name.clone();
		match name.as_str() {
			"ComponentSource" => {
				let src = required_prop(element, "src")?;
				self.append_source(element, &src, source_dir)
			}
			"ComponentPreview" => {
				let component = required_prop(element, "name")?;
				self.append_source(element, &format!("{component}.tsx"), source_dir)
			}
			known if self.known.contains(known) => Ok(()),
			_ => Err(DocumentWarning::UnknownComponent { name }),
		}
	}

	fn append_source(
		&self,
		element: &mut Element,
		src: &str,
		source_dir: Option<&Path>,
	) -> Result<(), DocumentWarning> {
		let unresolved = |reason: String| {
			DocumentWarning::UnresolvedComponent {
				name: element.tag_name.clone(),
				reason,
			}
		};

		let Some(dir) = source_dir else {
			return Err(unresolved("the document has no source directory".to_string()));
		};
		let path = dir.join(&self.components_dir).join(src);
		let content = std::fs::read_to_string(&path)
			.map_err(|e| unresolved(format!("{}: {e}", path.display())))?;

		let language = Path::new(src)
			.extension()
			.and_then(|extension| extension.to_str())
			.unwrap_or("tsx");
		let mut code = Element::new("code").with_class(format!("language-{language}"));
		if let Some(title) = element.properties.get_str("title") {
			code = code.with_property(META, format!("title=\"{title}\""));
		}
		let content = trim_final_newline(&content);
		if !content.is_empty() {
			code = code.with_child(Node::text(content));
		}

		let mut pre = Element::new("pre").with_property(SRC, src);
		if let Some(style) = element.properties.get_str("style") {
			pre = pre.with_property(STYLE, style);
		}

		element.children.push(pre.with_child(code).into());
		Ok(())
	}
}

fn required_prop(element: &Element, name: &str) -> Result<String, DocumentWarning> {
	element
		.properties
		.get_str(name)
		.map(str::to_string)
		.ok_or_else(|| {
			DocumentWarning::UnresolvedComponent {
				name: element.tag_name.clone(),
				reason: format!("missing `{name}` prop"),
			}
		})
}

impl Pass for ComponentPass {
	fn name(&self) -> &'static str {
		"components"
	}

	fn run(&self, tree: &mut Node, cx: &mut PassContext) -> DocpressResult<()> {
		let source_dir = cx.source_dir().map(Path::to_path_buf);
		let mut warnings = vec![];

		visit_elements(tree, is_component, |element| {
			if let Err(warning) = self.resolve(element, source_dir.as_deref()) {
				warnings.push(warning);
			}
			Visit::Continue
		});

		for warning in warnings {
			cx.warn(warning);
		}

		Ok(())
	}
}
