use std::ops::RangeInclusive;
use std::sync::LazyLock;

use regex::Regex;

static TITLE_PATTERN: LazyLock<Regex> =
	LazyLock::new(|| Regex::new(r#"title="([^"]*)""#).expect("valid title pattern"));
static LINES_PATTERN: LazyLock<Regex> =
	LazyLock::new(|| Regex::new(r"\{([\d,\s-]+)\}").expect("valid line range pattern"));
static WORD_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
	Regex::new(r"(?:^|\s)/((?:\\/|[^/\s])(?:\\/|[^/])*)/").expect("valid word pattern")
});

/// Highlighting directives read from a fence's metadata string.
///
/// ```text
/// title="button.tsx" {1,3-5} /variant/
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FenceMeta {
	/// Caption shown above the code.
	pub title: Option<String>,
	/// 1-based, inclusive line ranges to highlight.
	pub lines: Vec<RangeInclusive<usize>>,
	/// Words highlighted wherever they occur.
	pub words: Vec<String>,
}

impl FenceMeta {
	pub fn parse(meta: &str) -> Self {
		let title = TITLE_PATTERN
			.captures(meta)
			.map(|captures| captures[1].to_string());
		// Line ranges and words are searched outside the title so a caption like
		// `title="{1}"` does not highlight anything.
		let rest = TITLE_PATTERN.replace_all(meta, "");

		let lines = LINES_PATTERN
			.captures_iter(&rest)
			.flat_map(|captures| parse_line_ranges(&captures[1]))
			.collect();
		let words = WORD_PATTERN
			.captures_iter(&rest)
			.map(|captures| captures[1].replace("\\/", "/"))
			.filter(|word| !word.is_empty())
			.collect();

		Self {
			title,
			lines,
			words,
		}
	}

	pub fn highlights_line(&self, number: usize) -> bool {
		self.lines.iter().any(|range| range.contains(&number))
	}
}

fn parse_line_ranges(value: &str) -> Vec<RangeInclusive<usize>> {
	value
		.split(',')
		.filter_map(|part| {
			let part = part.trim();
			match part.split_once('-') {
				Some((start, end)) => {
					let start = start.trim().parse::<usize>().ok()?;
					let end = end.trim().parse::<usize>().ok()?;
					(start <= end).then_some(start..=end)
				}
				None => {
					let line = part.parse::<usize>().ok()?;
					Some(line..=line)
				}
			}
		})
		.collect()
}
