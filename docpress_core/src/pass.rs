use std::path::Path;
use std::path::PathBuf;

use serde::Serialize;

use crate::Annotations;
use crate::Artifact;
use crate::DocpressResult;
use crate::Node;

/// One transformation over a document's tree.
pub trait Pass: Send + Sync {
	/// Stable name used in logs and ordering errors.
	fn name(&self) -> &'static str;

	/// Artifacts that must have been written by an earlier pass.
	fn reads(&self) -> &'static [Artifact] {
		&[]
	}

	/// Artifacts this pass produces.
	fn writes(&self) -> &'static [Artifact] {
		&[]
	}

	fn run(&self, tree: &mut Node, cx: &mut PassContext) -> DocpressResult<()>;
}

/// Per-document state shared by the passes of one transform.
#[derive(Debug, Default)]
pub struct PassContext {
	pub annotations: Annotations,
	pub warnings: Vec<DocumentWarning>,
	source_dir: Option<PathBuf>,
}

impl PassContext {
	pub fn new(source_dir: Option<PathBuf>) -> Self {
		Self {
			annotations: Annotations::default(),
			warnings: Vec::new(),
			source_dir,
		}
	}

	/// Directory of the document's source file, used to resolve relative file
	/// references. `None` for documents that never lived on disk.
	pub fn source_dir(&self) -> Option<&Path> {
		self.source_dir.as_deref()
	}

	/// Record a recovered problem with the document.
	pub fn warn(&mut self, warning: DocumentWarning) {
		tracing::warn!("{}", warning.message());
		self.warnings.push(warning);
	}
}

/// A problem that left part of a document inert without failing it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
#[non_exhaustive]
pub enum DocumentWarning {
	/// A component name with no resolver and not listed as known.
	UnknownComponent { name: String },
	/// A component whose props or source file could not be resolved.
	UnresolvedComponent { name: String, reason: String },
	/// A `file=` fence reference in a document with no source directory.
	UnresolvedCodeImport { path: String },
}

impl DocumentWarning {
	pub fn message(&self) -> String {
		match self {
			Self::UnknownComponent { name } => format!("unknown component `{name}`"),
			Self::UnresolvedComponent { name, reason } => {
				format!("could not resolve component `{name}`: {reason}")
			}
			Self::UnresolvedCodeImport { path } => {
				format!("cannot import `{path}` without a document source directory")
			}
		}
	}
}
