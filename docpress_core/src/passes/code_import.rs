use std::path::Path;
use std::sync::LazyLock;

use regex::Regex;

use super::trim_final_newline;
use crate::DocpressError;
use crate::DocpressResult;
use crate::DocumentWarning;
use crate::META;
use crate::Node;
use crate::Pass;
use crate::PassContext;
use crate::Visit;
use crate::try_visit_elements;

static FILE_PATTERN: LazyLock<Regex> =
	LazyLock::new(|| Regex::new(r"(?:^|\s)file=(\S+)").expect("valid file pattern"));

/// A `file=` reference found in a fence's metadata.
///
/// ```text
/// file=./snippets/button.tsx#L3-L10
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileReference {
	pub path: String,
	pub lines: Option<LineRange>,
}

/// 1-based, inclusive line range. `end` is `None` for an open range
/// (`#L3-`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LineRange {
	pub start: usize,
	pub end: Option<usize>,
}

impl FileReference {
	/// Find the file reference in a fence's metadata.
	pub fn from_meta(meta: &str) -> DocpressResult<Option<Self>> {
		let Some(captures) = FILE_PATTERN.captures(meta) else {
			return Ok(None);
		};

		let value = &captures[1];
		let reference = match value.split_once('#') {
			Some((path, fragment)) => {
				let lines = parse_line_range(fragment).ok_or_else(|| {
					DocpressError::CodeImport {
						path: path.into(),
						reason: format!("invalid line range `#{fragment}`"),
					}
				})?;
				Self {
					path: path.to_string(),
					lines: Some(lines),
				}
			}
			None => {
				Self {
					path: value.to_string(),
					lines: None,
				}
			}
		};

		Ok(Some(reference))
	}
}

fn parse_line_range(fragment: &str) -> Option<LineRange> {
	let fragment = fragment.strip_prefix('L')?;
	let line = |value: &str| value.parse::<usize>().ok().map(|line| line.max(1));

	match fragment.split_once('-') {
		None => {
			let start = line(fragment)?;
			Some(LineRange {
				start,
				end: Some(start),
			})
		}
		Some((start, "")) => {
			Some(LineRange {
				start: line(start)?,
				end: None,
			})
		}
		Some((start, end)) => {
			Some(LineRange {
				start: line(start)?,
				end: Some(line(end.strip_prefix('L').unwrap_or(end))?),
			})
		}
	}
}

/// Read the code a reference points at, relative to `dir`.
pub fn import_code(dir: &Path, reference: &FileReference) -> DocpressResult<String> {
	let path = dir.join(&reference.path);
	let content = std::fs::read_to_string(&path).map_err(|e| {
		DocpressError::CodeImport {
			path: path.clone(),
			reason: e.to_string(),
		}
	})?;

	let Some(range) = reference.lines else {
		return Ok(trim_final_newline(&content).to_string());
	};

	let lines = content.lines().skip(range.start - 1);
	let selected: Vec<&str> = match range.end {
		Some(end) if end < range.start => Vec::new(),
		Some(end) => lines.take(end - range.start + 1).collect(),
		None => lines.collect(),
	};

	Ok(selected.join("\n"))
}

/// Fills empty fences carrying a `file=` reference with the referenced
/// file's contents.
#[derive(Debug, Clone, Copy, Default)]
pub struct CodeImportPass;

impl Pass for CodeImportPass {
	fn name(&self) -> &'static str {
		"code-import"
	}

	fn run(&self, tree: &mut Node, cx: &mut PassContext) -> DocpressResult<()> {
		let source_dir = cx.source_dir().map(Path::to_path_buf);
		let mut warnings = vec![];

		try_visit_elements(
			tree,
			|element| element.is("pre"),
			|pre| -> DocpressResult<Visit> {
				let Some(code) = pre.first_child_element_mut("code") else {
					return Ok(Visit::Continue);
				};
				if !code.text_content().trim().is_empty() {
					return Ok(Visit::SkipChildren);
				}
				let Some(meta) = code.properties.get_str(META) else {
					return Ok(Visit::Continue);
				};
				let Some(reference) = FileReference::from_meta(meta)? else {
					return Ok(Visit::Continue);
				};

				let Some(dir) = source_dir.as_deref() else {
					warnings.push(DocumentWarning::UnresolvedCodeImport {
						path: reference.path,
					});
					return Ok(Visit::SkipChildren);
				};

				let content = import_code(dir, &reference)?;
				tracing::debug!(path = %reference.path, "imported fence code");
				code.children = if content.is_empty() {
					vec![]
				} else {
					vec![Node::text(content)]
				};

				Ok(Visit::SkipChildren)
			},
		)?;

		for warning in warnings {
			cx.warn(warning);
		}

		Ok(())
	}
}
