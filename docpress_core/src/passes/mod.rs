//! The passes of the standard pipeline, in the order they run.

pub use self::code_import::*;
pub use self::commands::*;
pub use self::components::*;
pub use self::extract::*;
pub use self::headings::*;
pub use self::highlight::*;
pub use self::propagate::*;

mod code_import;
mod commands;
mod components;
mod extract;
mod headings;
mod highlight;
mod propagate;

/// Drop a single trailing line ending, matching how fenced code values are
/// stored.
pub(crate) fn trim_final_newline(content: &str) -> &str {
	content
		.strip_suffix("\r\n")
		.or_else(|| content.strip_suffix('\n'))
		.unwrap_or(content)
}
