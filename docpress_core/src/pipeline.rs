use std::collections::HashSet;
use std::path::PathBuf;
use std::sync::Arc;

use serde::Serialize;

use crate::Artifact;
use crate::AutolinkHeadingsPass;
use crate::CodeImportPass;
use crate::CommandVariantPass;
use crate::ComponentPass;
use crate::DocpressConfig;
use crate::DocpressError;
use crate::DocpressResult;
use crate::DocumentWarning;
use crate::ExtractCodePass;
use crate::FrontMatter;
use crate::HeadingSlugPass;
use crate::HighlightPass;
use crate::Highlighter;
use crate::Node;
use crate::Pass;
use crate::PassContext;
use crate::PropagatePass;
use crate::parse_document;
use crate::to_html;

/// One authored document, as handed over by the collection loader.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
	/// Slash separated location of the document within its collection, without
	/// extension (`guides/install`).
	pub identity_path: String,
	/// Document body, without the front matter.
	pub raw_text: String,
	pub front_matter: FrontMatter,
	/// Directory of the source file. Relative file references (`file=` fences
	/// and component sources) resolve against it.
	pub source_dir: Option<PathBuf>,
}

impl Document {
	pub fn new(
		identity_path: impl Into<String>,
		raw_text: impl Into<String>,
		front_matter: FrontMatter,
	) -> Self {
		Self {
			identity_path: identity_path.into(),
			raw_text: raw_text.into(),
			front_matter,
			source_dir: None,
		}
	}

	#[must_use]
	pub fn with_source_dir(mut self, source_dir: Option<PathBuf>) -> Self {
		self.source_dir = source_dir;
		self
	}
}

/// The render-ready record produced for a document.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TransformedDocument {
	pub slug: String,
	pub slug_as_params: String,
	#[serde(flatten)]
	pub front_matter: FrontMatter,
	pub body: Body,
	pub warnings: Vec<DocumentWarning>,
	/// The final tree `body.code` was serialized from.
	#[serde(skip)]
	pub tree: Node,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Body {
	/// The document text as authored.
	pub raw: String,
	/// The compiled HTML.
	pub code: String,
}

/// `/` followed by the identity path.
pub fn document_slug(identity_path: &str) -> String {
	format!("/{identity_path}")
}

/// The identity path without its leading segment.
pub fn slug_as_params(identity_path: &str) -> String {
	identity_path
		.split('/')
		.skip(1)
		.collect::<Vec<_>>()
		.join("/")
}

/// An ordered list of passes run over every document.
pub struct Pipeline {
	passes: Vec<Box<dyn Pass>>,
}

impl std::fmt::Debug for Pipeline {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_list()
			.entries(self.passes.iter().map(|pass| pass.name()))
			.finish()
	}
}

impl Pipeline {
	/// Build a pipeline, rejecting an order in which a pass reads an artifact
	/// that no earlier pass writes.
	pub fn new(passes: Vec<Box<dyn Pass>>) -> DocpressResult<Self> {
		let mut written: HashSet<Artifact> = HashSet::new();

		for pass in &passes {
			if let Some(missing) = pass.reads().iter().find(|artifact| !written.contains(*artifact)) {
				return Err(DocpressError::PassOrder {
					pass: pass.name().to_string(),
					artifact: missing.to_string(),
				});
			}
			written.extend(pass.writes().iter().copied());
		}

		Ok(Self { passes })
	}

	/// The full pipeline: code import, heading slugs, components, fence
	/// extraction, highlighting, annotation propagation, command variants and
	/// heading anchors.
	pub fn standard(highlighter: Arc<Highlighter>, config: &DocpressConfig) -> DocpressResult<Self> {
		let headings = &config.headings;

		Self::new(vec![
			Box::new(CodeImportPass),
			Box::new(HeadingSlugPass),
			Box::new(
				ComponentPass::new(&config.components_dir)
					.with_known(config.components.known.iter().cloned()),
			),
			Box::new(ExtractCodePass),
			Box::new(HighlightPass::new(highlighter)),
			Box::new(PropagatePass),
			Box::new(CommandVariantPass),
			Box::new(AutolinkHeadingsPass::new(
				headings.anchor_class.as_str(),
				headings.anchor_label.as_str(),
				headings.behavior,
			)),
		])
	}

	/// Names of the passes, in run order.
	pub fn pass_names(&self) -> Vec<&'static str> {
		self.passes.iter().map(|pass| pass.name()).collect()
	}

	/// Run every pass over `tree`.
	pub fn run(&self, tree: &mut Node, cx: &mut PassContext) -> DocpressResult<()> {
		for pass in &self.passes {
			tracing::debug!(pass = pass.name(), "running pass");
			pass.run(tree, cx)?;
		}

		if !cx.annotations.is_empty() {
			tracing::debug!(
				count = cx.annotations.len(),
				"dropping fence annotations no pass consumed"
			);
			cx.annotations.clear();
		}

		Ok(())
	}

	/// Transform one document. Any failure is attributed to the document's
	/// identity path.
	#[tracing::instrument(skip_all, fields(path = %document.identity_path))]
	pub fn transform(&self, document: &Document) -> DocpressResult<TransformedDocument> {
		self.transform_document(document)
			.map_err(|e| e.in_document(document.identity_path.as_str()))
	}

	fn transform_document(&self, document: &Document) -> DocpressResult<TransformedDocument> {
		let mut tree = parse_document(&document.raw_text)?;
		let mut cx = PassContext::new(document.source_dir.clone());
		self.run(&mut tree, &mut cx)?;

		Ok(TransformedDocument {
			slug: document_slug(&document.identity_path),
			slug_as_params: slug_as_params(&document.identity_path),
			front_matter: document.front_matter.clone(),
			body: Body {
				raw: document.raw_text.clone(),
				code: to_html(&tree),
			},
			warnings: cx.warnings,
			tree,
		})
	}
}
