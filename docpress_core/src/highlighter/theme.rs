//! Conversion of JSON color themes (the VS Code / shiki format) into
//! highlighter themes.

use std::collections::HashMap;
use std::path::Path;
use std::str::FromStr;

use serde::Deserialize;
use syntect::highlighting::Color;
use syntect::highlighting::FontStyle;
use syntect::highlighting::ScopeSelectors;
use syntect::highlighting::StyleModifier;
use syntect::highlighting::Theme;
use syntect::highlighting::ThemeItem;
use syntect::highlighting::ThemeSet;
use syntect::highlighting::ThemeSettings;

use crate::DocpressError;
use crate::DocpressResult;

/// The theme used when none is configured.
pub const DEFAULT_THEME: &str = "base16-ocean.dark";

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ThemeFile {
	#[serde(default)]
	name: Option<String>,
	#[serde(default)]
	colors: HashMap<String, String>,
	#[serde(default)]
	token_colors: Vec<TokenColor>,
}

#[derive(Debug, Deserialize)]
struct TokenColor {
	#[serde(default)]
	scope: Option<ScopeList>,
	#[serde(default)]
	settings: TokenSettings,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ScopeList {
	One(String),
	Many(Vec<String>),
}

impl ScopeList {
	fn selector(&self) -> String {
		match self {
			Self::One(scope) => scope.clone(),
			Self::Many(scopes) => scopes.join(", "),
		}
	}
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TokenSettings {
	#[serde(default)]
	foreground: Option<String>,
	#[serde(default)]
	background: Option<String>,
	#[serde(default)]
	font_style: Option<String>,
}

/// Read and convert the JSON theme at `path`.
pub fn load_theme(path: &Path) -> DocpressResult<Theme> {
	let content = std::fs::read_to_string(path).map_err(|e| {
		DocpressError::ThemeLoad {
			path: path.to_path_buf(),
			reason: e.to_string(),
		}
	})?;

	parse_theme(&content).map_err(|e| {
		match e {
			DocpressError::ThemeLoad { reason, .. } => {
				DocpressError::ThemeLoad {
					path: path.to_path_buf(),
					reason,
				}
			}
			other => other,
		}
	})
}

/// Convert a JSON theme document.
pub fn parse_theme(content: &str) -> DocpressResult<Theme> {
	let file: ThemeFile = serde_json::from_str(content).map_err(|e| {
		DocpressError::ThemeLoad {
			path: "<inline>".into(),
			reason: e.to_string(),
		}
	})?;

	let settings = ThemeSettings {
		foreground: color_setting(&file.colors, "editor.foreground"),
		background: color_setting(&file.colors, "editor.background"),
		selection: color_setting(&file.colors, "editor.selectionBackground"),
		line_highlight: color_setting(&file.colors, "editor.lineHighlightBackground"),
		..ThemeSettings::default()
	};
	let mut theme = Theme {
		name: file.name,
		settings,
		..Theme::default()
	};

	for token_color in file.token_colors {
		let settings = token_color.settings;
		let Some(scope) = token_color.scope else {
			// An entry without a scope sets the defaults.
			if let Some(foreground) = settings.foreground.as_deref().and_then(parse_color) {
				theme.settings.foreground = Some(foreground);
			}
			if let Some(background) = settings.background.as_deref().and_then(parse_color) {
				theme.settings.background = Some(background);
			}
			continue;
		};

		let selector = scope.selector();
		let scope = ScopeSelectors::from_str(&selector).map_err(|e| {
			DocpressError::ThemeScope {
				selector: selector.clone(),
				reason: e.to_string(),
			}
		})?;

		theme.scopes.push(ThemeItem {
			scope,
			style: StyleModifier {
				foreground: settings.foreground.as_deref().and_then(parse_color),
				background: settings.background.as_deref().and_then(parse_color),
				font_style: settings.font_style.as_deref().map(parse_font_style),
			},
		});
	}

	Ok(theme)
}

/// The built-in [`DEFAULT_THEME`].
pub fn default_theme() -> Theme {
	let mut themes = ThemeSet::load_defaults();
	themes.themes.remove(DEFAULT_THEME).unwrap_or_default()
}

fn color_setting(colors: &HashMap<String, String>, key: &str) -> Option<Color> {
	colors.get(key).and_then(|value| parse_color(value))
}

/// Parse `#rgb`, `#rgba`, `#rrggbb` or `#rrggbbaa`.
pub fn parse_color(value: &str) -> Option<Color> {
	let hex = value.trim().strip_prefix('#')?;
	if !hex.is_ascii() {
		return None;
	}

	let channel = |digits: &str| u8::from_str_radix(digits, 16).ok();
	let short = |index: usize| channel(&hex[index..=index].repeat(2));

	match hex.len() {
		3 | 4 => {
			Some(Color {
				r: short(0)?,
				g: short(1)?,
				b: short(2)?,
				a: if hex.len() == 4 { short(3)? } else { 0xff },
			})
		}
		6 | 8 => {
			Some(Color {
				r: channel(&hex[0..2])?,
				g: channel(&hex[2..4])?,
				b: channel(&hex[4..6])?,
				a: if hex.len() == 8 {
					channel(&hex[6..8])?
				} else {
					0xff
				},
			})
		}
		_ => None,
	}
}

fn parse_font_style(value: &str) -> FontStyle {
	let mut style = FontStyle::empty();
	for part in value.split_whitespace() {
		match part {
			"bold" => style.insert(FontStyle::BOLD),
			"italic" => style.insert(FontStyle::ITALIC),
			"underline" => style.insert(FontStyle::UNDERLINE),
			_ => {}
		}
	}
	style
}
