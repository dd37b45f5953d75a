use std::path::PathBuf;

use clap::Parser;
use clap::Subcommand;
use clap::ValueEnum;

#[derive(Parser)]
#[command(
	author,
	version,
	about = "Compile an MDX content collection into render-ready documents.",
	long_about = "docpress reads the MDX documents of a documentation site, highlights their code \
	              fences, anchors their headings, expands package manager commands and emits one \
	              JSON record per document for the site's renderer.\n\nQuick start:\n  docpress \
	              build   Compile every document to JSON\n  docpress info    Show the resolved \
	              configuration"
)]
pub struct DocpressCli {
	#[command(subcommand)]
	pub command: Option<Commands>,

	/// Path to the project root directory.
	#[arg(long, short, global = true)]
	pub path: Option<PathBuf>,

	/// Enable verbose output.
	#[arg(long, short, global = true, default_value_t = false)]
	pub verbose: bool,

	/// Disable colored output.
	#[arg(long, global = true, default_value_t = false)]
	pub no_color: bool,
}

#[derive(Subcommand)]
pub enum Commands {
	/// Compile every document of the collection.
	///
	/// Loads `docpress.toml` and the highlighting theme once, then transforms
	/// each document independently. Successful documents are written as a
	/// JSON array; failed documents are reported with their path and make the
	/// command exit with status 1.
	Build {
		/// Write the JSON output to this file instead of stdout.
		#[arg(long, short)]
		out: Option<PathBuf>,

		/// Pretty print the JSON output.
		#[arg(long, default_value_t = false)]
		pretty: bool,
	},
	/// Print the resolved configuration and the number of documents found.
	Info {
		/// Output format for info results. Use `text` for human-readable
		/// output or `json` for programmatic consumption.
		#[arg(long, value_enum, default_value_t = InfoOutputFormat::Text)]
		format: InfoOutputFormat,
	},
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum InfoOutputFormat {
	/// Human-readable text output with colors and formatting.
	Text,
	/// JSON output for programmatic consumption.
	Json,
}
