use std::path::Path;
use std::path::PathBuf;

use globset::Glob;
use globset::GlobSet;
use globset::GlobSetBuilder;
use ignore::WalkBuilder;
use serde::Deserialize;
use serde::Serialize;

use crate::DocpressConfig;
use crate::DocpressError;
use crate::DocpressResult;
use crate::Document;

/// Validated front matter of a document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FrontMatter {
	pub title: String,
	pub description: String,
	#[serde(default = "default_true")]
	pub published: bool,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub links: Option<DocLinks>,
	#[serde(default)]
	pub featured: bool,
	#[serde(default)]
	pub component: bool,
	#[serde(default = "default_true")]
	pub toc: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocLinks {
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub doc: Option<String>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub api: Option<String>,
}

fn default_true() -> bool {
	true
}

impl FrontMatter {
	/// Front matter with the required fields and every default.
	pub fn new(title: impl Into<String>, description: impl Into<String>) -> Self {
		Self {
			title: title.into(),
			description: description.into(),
			published: true,
			links: None,
			featured: false,
			component: false,
			toc: true,
		}
	}
}

/// Split a document into its YAML front matter and body. `None` when the
/// document does not open with a `---` fence that is closed later.
pub fn split_front_matter(content: &str) -> Option<(&str, &str)> {
	let rest = content
		.strip_prefix("---\r\n")
		.or_else(|| content.strip_prefix("---\n"))?;

	let mut offset = 0;
	for line in rest.split_inclusive('\n') {
		if line.trim_end_matches(['\r', '\n']) == "---" {
			let yaml = &rest[..offset];
			let body = &rest[offset + line.len()..];
			return Some((yaml, body));
		}
		offset += line.len();
	}

	None
}

/// Parse the front matter and body of the document at `path`.
pub fn parse_document_source(path: &Path, content: &str) -> DocpressResult<(FrontMatter, String)> {
	let (yaml, body) = split_front_matter(content).ok_or_else(|| {
		DocpressError::FrontMatter {
			path: path.to_path_buf(),
			reason: "missing front matter block".to_string(),
		}
	})?;

	let front_matter = serde_yaml_ng::from_str(yaml).map_err(|e| {
		DocpressError::FrontMatter {
			path: path.to_path_buf(),
			reason: e.to_string(),
		}
	})?;

	Ok((front_matter, body.to_string()))
}

/// The documents of a content directory.
#[derive(Debug, Default)]
pub struct Collection {
	/// Loaded documents, sorted by identity path.
	pub documents: Vec<Document>,
	/// Documents that could not be loaded.
	pub errors: Vec<DocpressError>,
}

/// The identity path of `path` within `content_dir`: the relative path without
/// its extension, `/` separated.
pub fn identity_path(content_dir: &Path, path: &Path) -> Option<String> {
	let relative = path.strip_prefix(content_dir).ok()?.with_extension("");
	let segments: Vec<_> = relative
		.components()
		.map(|component| component.as_os_str().to_string_lossy())
		.collect();

	(!segments.is_empty()).then(|| segments.join("/"))
}

fn build_glob_set(patterns: &[String]) -> DocpressResult<GlobSet> {
	let mut builder = GlobSetBuilder::new();
	for pattern in patterns {
		let glob = Glob::new(pattern).map_err(|e| DocpressError::ConfigParse(e.to_string()))?;
		builder.add(glob);
	}

	builder
		.build()
		.map_err(|e| DocpressError::ConfigParse(e.to_string()))
}

/// Find every document under the configured content directory.
///
/// Hidden directories, `node_modules` and gitignored paths are skipped.
pub fn discover_documents(root: &Path, config: &DocpressConfig) -> DocpressResult<Vec<PathBuf>> {
	let content_dir = root.join(&config.content_dir);
	if !content_dir.is_dir() {
		return Ok(vec![]);
	}

	let include = build_glob_set(&config.include)?;
	let mut paths = vec![];
	let walker = WalkBuilder::new(&content_dir)
		.hidden(true)
		.require_git(false)
		.filter_entry(|entry| entry.file_name() != "node_modules")
		.build();

	for entry in walker {
		let entry = entry.map_err(|e| std::io::Error::other(e.to_string()))?;
		if !entry.file_type().is_some_and(|file_type| file_type.is_file()) {
			continue;
		}

		let path = entry.into_path();
		let Ok(relative) = path.strip_prefix(&content_dir) else {
			continue;
		};
		if include.is_match(relative) {
			paths.push(path);
		}
	}

	paths.sort();
	Ok(paths)
}

/// Load every document of the collection. A document that cannot be read or
/// whose front matter is invalid is recorded in [`Collection::errors`] and the
/// rest still load.
pub fn load_collection(root: &Path, config: &DocpressConfig) -> DocpressResult<Collection> {
	let content_dir = root.join(&config.content_dir);
	let mut collection = Collection::default();

	for path in discover_documents(root, config)? {
		let Some(identity) = identity_path(&content_dir, &path) else {
			continue;
		};

		let loaded = std::fs::read_to_string(&path)
			.map_err(DocpressError::from)
			.and_then(|content| parse_document_source(&path, &content));

		match loaded {
			Ok((front_matter, body)) => {
				let document = Document::new(identity, body, front_matter)
					.with_source_dir(path.parent().map(Path::to_path_buf));
				collection.documents.push(document);
			}
			Err(error) => {
				tracing::warn!(path = %path.display(), "failed to load document");
				collection.errors.push(error.in_document(identity));
			}
		}
	}

	tracing::debug!(
		documents = collection.documents.len(),
		errors = collection.errors.len(),
		"loaded collection"
	);

	Ok(collection)
}
