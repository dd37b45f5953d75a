use std::path::PathBuf;

use miette::Diagnostic;
use thiserror::Error;

#[derive(Debug, Diagnostic, Error)]
#[non_exhaustive]
pub enum DocpressError {
	#[error(transparent)]
	#[diagnostic(code(docpress::io_error))]
	Io(#[from] std::io::Error),

	#[error("failed to parse config file: {0}")]
	#[diagnostic(
		code(docpress::config_parse),
		help("check that docpress.toml is valid TOML")
	)]
	ConfigParse(String),

	#[error("failure to parse markdown: {0}")]
	#[diagnostic(code(docpress::markdown))]
	Markdown(String),

	#[error("failed to load theme `{path}`: {reason}")]
	#[diagnostic(
		code(docpress::theme_load),
		help("the `theme` entry in docpress.toml must point to a JSON color theme")
	)]
	ThemeLoad { path: PathBuf, reason: String },

	#[error("invalid theme scope selector `{selector}`: {reason}")]
	#[diagnostic(code(docpress::theme_scope))]
	ThemeScope { selector: String, reason: String },

	#[error("unknown language: `{0}`")]
	#[diagnostic(
		code(docpress::unknown_language),
		help("add an alias for this language under [highlight.aliases] in docpress.toml")
	)]
	UnknownLanguage(String),

	#[error("failed to highlight `{language}` code: {reason}")]
	#[diagnostic(code(docpress::highlight))]
	Highlight { language: String, reason: String },

	#[error("failed to import code from `{path}`: {reason}")]
	#[diagnostic(code(docpress::code_import))]
	CodeImport { path: PathBuf, reason: String },

	#[error("invalid front matter in `{path}`: {reason}")]
	#[diagnostic(
		code(docpress::front_matter),
		help("documents must start with a `---` block containing at least `title` and `description`")
	)]
	FrontMatter { path: PathBuf, reason: String },

	#[error("pass `{pass}` reads `{artifact}` but no earlier pass writes it")]
	#[diagnostic(code(docpress::pass_order))]
	PassOrder { pass: String, artifact: String },

	#[error("document task failed: {0}")]
	#[diagnostic(code(docpress::task))]
	Task(String),

	#[error("document `{path}` failed")]
	#[diagnostic(code(docpress::document))]
	Document {
		path: String,
		#[source]
		source: Box<DocpressError>,
	},
}

impl DocpressError {
	/// Attribute this error to the document at `path`.
	pub fn in_document(self, path: impl Into<String>) -> Self {
		match self {
			Self::Document { .. } => self,
			other => {
				Self::Document {
					path: path.into(),
					source: Box::new(other),
				}
			}
		}
	}
}

pub type DocpressResult<T> = Result<T, DocpressError>;
pub type AnyError = Box<dyn std::error::Error>;
pub type AnyEmptyResult = Result<(), AnyError>;
pub type AnyResult<T> = Result<T, AnyError>;
