use std::collections::BTreeMap;
use std::path::Path;
use std::path::PathBuf;

use serde::Deserialize;
use serde::Serialize;

use crate::AnchorBehavior;
use crate::DEFAULT_ANCHOR_CLASS;
use crate::DEFAULT_ANCHOR_LABEL;
use crate::DEFAULT_COMPONENTS_DIR;
use crate::DocpressError;
use crate::DocpressResult;
use crate::Highlighter;
use crate::default_theme;
use crate::load_theme;

/// Supported config file locations in discovery order (highest precedence
/// first).
pub const CONFIG_FILE_CANDIDATES: [&str; 3] = [
	"docpress.toml",
	".docpress.toml",
	".config/docpress.toml",
];

pub const DEFAULT_CONTENT_DIR: &str = "content";
pub const DEFAULT_INCLUDE: &str = "**/*.mdx";

/// Configuration loaded from a `docpress.toml` file.
///
/// ```toml
/// content_dir = "content"
/// include = ["**/*.mdx"]
/// theme = "lib/themes/dark.json"
/// components_dir = "components"
///
/// [highlight]
/// aliases = { vue = "html" }
///
/// [headings]
/// anchor_class = "subheading-anchor"
/// anchor_label = "Link to section"
/// behavior = "prepend"
///
/// [components]
/// known = ["Callout", "Tabs"]
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocpressConfig {
	/// Directory holding the documents, relative to the project root.
	#[serde(default = "default_content_dir")]
	pub content_dir: PathBuf,
	/// Glob patterns, relative to `content_dir`, selecting the documents.
	#[serde(default = "default_include")]
	pub include: Vec<String>,
	/// JSON color theme, relative to the project root. The built-in theme is
	/// used when absent.
	#[serde(default)]
	pub theme: Option<PathBuf>,
	/// Directory, relative to each document, holding the files component
	/// fences are read from.
	#[serde(default = "default_components_dir")]
	pub components_dir: PathBuf,
	#[serde(default)]
	pub highlight: HighlightConfig,
	#[serde(default)]
	pub headings: HeadingsConfig,
	#[serde(default)]
	pub components: ComponentsConfig,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HighlightConfig {
	/// Extra fence language aliases, mapping an alias to a known language.
	#[serde(default)]
	pub aliases: BTreeMap<String, String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeadingsConfig {
	#[serde(default = "default_anchor_class")]
	pub anchor_class: String,
	#[serde(default = "default_anchor_label")]
	pub anchor_label: String,
	#[serde(default)]
	pub behavior: AnchorBehavior,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComponentsConfig {
	/// Components rendered by the site that need no resolution.
	#[serde(default)]
	pub known: Vec<String>,
}

fn default_content_dir() -> PathBuf {
	PathBuf::from(DEFAULT_CONTENT_DIR)
}

fn default_include() -> Vec<String> {
	vec![DEFAULT_INCLUDE.to_string()]
}

fn default_components_dir() -> PathBuf {
	PathBuf::from(DEFAULT_COMPONENTS_DIR)
}

fn default_anchor_class() -> String {
	DEFAULT_ANCHOR_CLASS.to_string()
}

fn default_anchor_label() -> String {
	DEFAULT_ANCHOR_LABEL.to_string()
}

impl Default for DocpressConfig {
	fn default() -> Self {
		Self {
			content_dir: default_content_dir(),
			include: default_include(),
			theme: None,
			components_dir: default_components_dir(),
			highlight: HighlightConfig::default(),
			headings: HeadingsConfig::default(),
			components: ComponentsConfig::default(),
		}
	}
}

impl Default for HeadingsConfig {
	fn default() -> Self {
		Self {
			anchor_class: default_anchor_class(),
			anchor_label: default_anchor_label(),
			behavior: AnchorBehavior::default(),
		}
	}
}

impl DocpressConfig {
	/// Return the first discovered config file path at `root`.
	pub fn resolve_path(root: &Path) -> Option<PathBuf> {
		CONFIG_FILE_CANDIDATES
			.iter()
			.map(|candidate| root.join(candidate))
			.find(|path| path.is_file())
	}

	/// Load the config from the first discovered config file at `root`.
	/// Returns `None` if the file does not exist.
	pub fn load(root: &Path) -> DocpressResult<Option<DocpressConfig>> {
		let Some(config_path) = Self::resolve_path(root) else {
			return Ok(None);
		};

		let content = std::fs::read_to_string(&config_path)?;
		let config: DocpressConfig =
			toml::from_str(&content).map_err(|e| DocpressError::ConfigParse(e.to_string()))?;

		Ok(Some(config))
	}

	/// Like [`load`](Self::load), falling back to the defaults.
	pub fn load_or_default(root: &Path) -> DocpressResult<DocpressConfig> {
		Ok(Self::load(root)?.unwrap_or_default())
	}

	/// Load the configured theme (or the built-in one) and build the shared
	/// highlighter.
	pub fn build_highlighter(&self, root: &Path) -> DocpressResult<Highlighter> {
		let theme = match &self.theme {
			Some(path) => load_theme(&root.join(path))?,
			None => default_theme(),
		};

		Ok(Highlighter::new(theme).with_aliases(self.highlight.aliases.clone()))
	}
}
