#![allow(dead_code)]

use std::path::Path;

use assert_cmd::Command;
use insta_cmd::get_cargo_bin;

pub fn docpress_cmd() -> Command {
	let mut cmd = Command::new(get_cargo_bin("docpress"));
	cmd.env("NO_COLOR", "1");
	cmd.env_remove("DOCPRESS_LOG");
	cmd
}

pub fn write_file(path: &Path, content: &str) -> std::io::Result<()> {
	if let Some(parent) = path.parent() {
		std::fs::create_dir_all(parent)?;
	}
	std::fs::write(path, content)
}

/// A document with valid front matter.
pub fn mdx(title: &str, body: &str) -> String {
	format!("---\ntitle: {title}\ndescription: About {title}.\n---\n{body}")
}
