//! Themed syntax highlighting of code fences.
//!
//! A [`Highlighter`] is built once per process from a loaded theme and shared
//! read-only by every document transform. It turns a fence into the fragment
//! shape the rest of the pipeline (and the site's renderer) expects:
//!
//! ```text
//! div[data-rehype-pretty-code-fragment]
//!   div[data-rehype-pretty-code-title]   only when the fence has a title
//!   pre
//!     code
//!       span[data-line]                  one per source line
//!         span[style]                    one per token
//!         span[data-highlighted-chars]   tokens of a highlighted word
//! ```

use std::collections::HashMap;
use std::ops::Range;

use syntect::easy::HighlightLines;
use syntect::highlighting::Color;
use syntect::highlighting::FontStyle;
use syntect::highlighting::Style;
use syntect::highlighting::Theme;
use syntect::parsing::SyntaxReference;
use syntect::parsing::SyntaxSet;
use syntect::util::LinesWithEndings;

pub use self::meta::FenceMeta;
pub use self::theme::DEFAULT_THEME;
pub use self::theme::default_theme;
pub use self::theme::load_theme;
pub use self::theme::parse_color;
pub use self::theme::parse_theme;
use crate::DocpressError;
use crate::DocpressResult;
use crate::Element;
use crate::Node;

mod meta;
mod theme;

/// Marks the wrapper element produced for every highlighted fence.
pub const FRAGMENT: &str = "data-rehype-pretty-code-fragment";
/// Marks the caption header of a fence with a title.
pub const TITLE: &str = "data-rehype-pretty-code-title";
/// Marks a line the fence metadata asked to highlight.
pub const HIGHLIGHTED_LINE: &str = "data-highlighted-line";
/// Marks the group of tokens making up a highlighted word.
pub const HIGHLIGHTED_CHARS: &str = "data-highlighted-chars";

/// Language aliases applied before syntax lookup.
const DEFAULT_ALIASES: [(&str, &str); 14] = [
	("cjs", "js"),
	("console", "bash"),
	("jsx", "js"),
	("mjs", "js"),
	("mdx", "md"),
	("plaintext", "txt"),
	("sh", "bash"),
	("shell", "bash"),
	("shellscript", "bash"),
	("text", "txt"),
	("ts", "js"),
	("tsx", "js"),
	("typescript", "js"),
	("zsh", "bash"),
];

/// Callbacks applied to the elements of a highlighted fence.
pub trait HighlightHooks: Send + Sync {
	/// Called for every line.
	fn on_visit_line(&self, line: &mut Element);
	/// Called for every line the fence metadata highlights, after
	/// [`on_visit_line`](Self::on_visit_line).
	fn on_visit_highlighted_line(&self, line: &mut Element);
	/// Called for every group of tokens making up a highlighted word.
	fn on_visit_highlighted_word(&self, word: &mut Element);
}

/// The stock hooks.
///
/// Empty lines get a single space so they keep their height in grid layouts
/// and survive copy and paste. Highlighted lines have `line--highlighted`
/// appended to their classes; highlighted words have their classes replaced
/// with exactly `word--highlighted`.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultHooks;

impl HighlightHooks for DefaultHooks {
	fn on_visit_line(&self, line: &mut Element) {
		if line.children.is_empty() {
			line.children = vec![Node::text(" ")];
		}
	}

	fn on_visit_highlighted_line(&self, line: &mut Element) {
		line.properties
			.class_list_mut()
			.push("line--highlighted".to_string());
	}

	fn on_visit_highlighted_word(&self, word: &mut Element) {
		word.properties
			.set_classes(vec!["word--highlighted".to_string()]);
	}
}

/// A code fence ready to be highlighted.
#[derive(Debug, Clone, Copy)]
pub struct Fence<'a> {
	pub language: Option<&'a str>,
	pub meta: Option<&'a str>,
	pub source: &'a str,
}

/// One highlighted token of a line.
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
	pub text: String,
	pub style: Style,
}

/// Syntax highlighter bound to one theme.
#[derive(Debug)]
pub struct Highlighter {
	syntaxes: SyntaxSet,
	theme: Theme,
	theme_name: String,
	aliases: HashMap<String, String>,
}

impl Highlighter {
	/// A highlighter using the bundled syntax definitions.
	pub fn new(theme: Theme) -> Self {
		let theme_name = theme
			.name
			.clone()
			.unwrap_or_else(|| DEFAULT_THEME.to_string());
		let aliases = DEFAULT_ALIASES
			.iter()
			.map(|(alias, token)| ((*alias).to_string(), (*token).to_string()))
			.collect();

		Self {
			syntaxes: SyntaxSet::load_defaults_newlines(),
			theme,
			theme_name,
			aliases,
		}
	}

	/// Add language aliases. Later entries win over the built-in ones.
	#[must_use]
	pub fn with_aliases<I, K, V>(mut self, aliases: I) -> Self
	where
		I: IntoIterator<Item = (K, V)>,
		K: Into<String>,
		V: Into<String>,
	{
		for (alias, token) in aliases {
			self.aliases
				.insert(alias.into().to_ascii_lowercase(), token.into());
		}
		self
	}

	pub fn theme(&self) -> &Theme {
		&self.theme
	}

	pub fn theme_name(&self) -> &str {
		&self.theme_name
	}

	/// Find the syntax for a fence language. No language means plain text.
	pub fn resolve_syntax(&self, language: Option<&str>) -> DocpressResult<&SyntaxReference> {
		let Some(language) = language.map(str::trim).filter(|language| !language.is_empty())
		else {
			return Ok(self.syntaxes.find_syntax_plain_text());
		};

		let lowercase = language.to_ascii_lowercase();
		let token = self
			.aliases
			.get(&lowercase)
			.map_or(lowercase.as_str(), String::as_str);

		self.syntaxes
			.find_syntax_by_token(token)
			.or_else(|| self.syntaxes.find_syntax_by_name(language))
			.ok_or_else(|| DocpressError::UnknownLanguage(language.to_string()))
	}

	/// Highlight `source` into tokens, one list per line. Line endings are not
	/// part of any token. Empty source yields one empty line.
	pub fn highlight_lines(
		&self,
		language: Option<&str>,
		source: &str,
	) -> DocpressResult<Vec<Vec<Token>>> {
		let syntax = self.resolve_syntax(language)?;
		let mut highlighter = HighlightLines::new(syntax, &self.theme);
		let mut lines = Vec::new();

		for line in LinesWithEndings::from(source) {
			let ranges = highlighter
				.highlight_line(line, &self.syntaxes)
				.map_err(|e| {
					DocpressError::Highlight {
						language: language.unwrap_or("plaintext").to_string(),
						reason: e.to_string(),
					}
				})?;

			let tokens = ranges
				.into_iter()
				.filter_map(|(style, text)| {
					let text = text.trim_end_matches(['\n', '\r']);
					(!text.is_empty()).then(|| {
						Token {
							text: text.to_string(),
							style,
						}
					})
				})
				.collect();
			lines.push(tokens);
		}

		if lines.is_empty() {
			lines.push(Vec::new());
		}

		Ok(lines)
	}

	/// Render a fence as a highlighted fragment.
	///
	/// The returned wrapper has a fresh identity; callers replacing an existing
	/// fence should carry the fence's identity over.
	pub fn highlight(&self, fence: Fence<'_>, hooks: &dyn HighlightHooks) -> DocpressResult<Element> {
		let meta = FenceMeta::parse(fence.meta.unwrap_or_default());
		let lines = self.highlight_lines(fence.language, fence.source)?;
		let language = fence
			.language
			.filter(|language| !language.is_empty())
			.unwrap_or("plaintext");
		let theme = self.theme_name.as_str();

		let mut code = Element::new("code")
			.with_property("data-language", language)
			.with_property("data-theme", theme)
			.with_property("style", "display: grid;");
		if let Some(raw_meta) = fence.meta.filter(|meta| !meta.trim().is_empty()) {
			code = code.with_property(crate::META, raw_meta);
		}

		for (index, tokens) in lines.into_iter().enumerate() {
			let ranges = word_ranges(&tokens, &meta.words);
			let mut line = Element::new("span")
				.with_property("data-line", true)
				.with_children(render_tokens(tokens, &ranges, hooks));

			hooks.on_visit_line(&mut line);
			if meta.highlights_line(index + 1) {
				line.properties
					.insert(HIGHLIGHTED_LINE.to_string(), true.into());
				hooks.on_visit_highlighted_line(&mut line);
			}

			code.children.push(line.into());
		}

		let mut pre = Element::new("pre")
			.with_property("data-language", language)
			.with_property("data-theme", theme);
		if let Some(background) = self.theme.settings.background {
			pre = pre.with_property("style", format!("background-color: {};", css_color(background)));
		}
		let pre = pre.with_child(code);

		let mut fragment = Element::new("div").with_property(FRAGMENT, true);
		if let Some(title) = meta.title {
			fragment = fragment.with_child(
				Element::new("div")
					.with_property(TITLE, true)
					.with_property("data-language", language)
					.with_property("data-theme", theme)
					.with_child(Node::text(title)),
			);
		}

		Ok(fragment.with_child(pre))
	}
}

/// Byte ranges of every highlighted word occurrence in the line, in order and
/// without overlaps.
fn word_ranges(tokens: &[Token], words: &[String]) -> Vec<Range<usize>> {
	if words.is_empty() {
		return Vec::new();
	}

	let text: String = tokens.iter().map(|token| token.text.as_str()).collect();
	let mut ranges: Vec<Range<usize>> = words
		.iter()
		.flat_map(|word| {
			text.match_indices(word.as_str())
				.map(|(start, matched)| start..start + matched.len())
		})
		.collect();
	ranges.sort_by_key(|range| (range.start, range.end));

	let mut disjoint: Vec<Range<usize>> = Vec::with_capacity(ranges.len());
	for range in ranges {
		if disjoint.last().is_none_or(|last| range.start >= last.end) {
			disjoint.push(range);
		}
	}
	disjoint
}

/// Render a line's tokens, splitting tokens at word boundaries and grouping
/// the pieces inside each word under a `data-highlighted-chars` span.
fn render_tokens(tokens: Vec<Token>, ranges: &[Range<usize>], hooks: &dyn HighlightHooks) -> Vec<Node> {
	let mut nodes = Vec::new();
	let mut word: Option<(usize, Element)> = None;
	let mut offset = 0;

	for token in tokens {
		let end = offset + token.text.len();
		let mut cursor = offset;

		while cursor < end {
			let active = ranges
				.iter()
				.position(|range| range.start <= cursor && cursor < range.end);
			let stop = match active {
				Some(index) => ranges[index].end.min(end),
				None => {
					ranges
						.iter()
						.map(|range| range.start)
						.filter(|start| *start > cursor)
						.min()
						.map_or(end, |start| start.min(end))
				}
			};
			let piece = token_span(&token.text[cursor - offset..stop - offset], token.style);

			match active {
				Some(index) => {
					let continues = matches!(&word, Some((current, _)) if *current == index);
					if continues {
						if let Some((_, element)) = word.as_mut() {
							element.children.push(piece.into());
						}
					} else {
						flush_word(&mut word, &mut nodes, hooks);
						word = Some((
							index,
							Element::new("span")
								.with_property(HIGHLIGHTED_CHARS, true)
								.with_child(piece),
						));
					}
				}
				None => {
					flush_word(&mut word, &mut nodes, hooks);
					nodes.push(piece.into());
				}
			}

			cursor = stop;
		}

		offset = end;
	}

	flush_word(&mut word, &mut nodes, hooks);
	nodes
}

fn flush_word(word: &mut Option<(usize, Element)>, nodes: &mut Vec<Node>, hooks: &dyn HighlightHooks) {
	if let Some((_, mut element)) = word.take() {
		hooks.on_visit_highlighted_word(&mut element);
		nodes.push(element.into());
	}
}

fn token_span(text: &str, style: Style) -> Element {
	let mut css = format!("color: {};", css_color(style.foreground));
	if style.font_style.contains(FontStyle::ITALIC) {
		css.push_str(" font-style: italic;");
	}
	if style.font_style.contains(FontStyle::BOLD) {
		css.push_str(" font-weight: bold;");
	}
	if style.font_style.contains(FontStyle::UNDERLINE) {
		css.push_str(" text-decoration: underline;");
	}

	Element::new("span")
		.with_property("style", css)
		.with_child(Node::text(text))
}

/// `#rrggbb`, or `#rrggbbaa` for translucent colors.
pub fn css_color(color: Color) -> String {
	if color.a == 0xff {
		format!("#{:02x}{:02x}{:02x}", color.r, color.g, color.b)
	} else {
		format!("#{:02x}{:02x}{:02x}{:02x}", color.r, color.g, color.b, color.a)
	}
}
