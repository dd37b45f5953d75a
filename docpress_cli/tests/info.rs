mod common;

use docpress_core::AnyEmptyResult;
use serde_json::Value;

#[test]
fn info_prints_resolved_configuration() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	common::write_file(
		&tmp.path().join(".docpress.toml"),
		"content_dir = \"docs\"\n\n[components]\nknown = [\"Callout\", \"Tabs\"]\n",
	)?;
	common::write_file(&tmp.path().join("docs/a.mdx"), &common::mdx("A", "a\n"))?;
	common::write_file(&tmp.path().join("docs/b/c.mdx"), &common::mdx("C", "c\n"))?;

	common::docpress_cmd()
		.arg("info")
		.arg("--path")
		.arg(tmp.path())
		.assert()
		.success()
		.stdout(predicates::str::contains(".docpress.toml"))
		.stdout(predicates::str::contains("Callout, Tabs"))
		.stdout(predicates::str::is_match(r"Discovered\s+2")?);

	Ok(())
}

#[test]
fn info_uses_defaults_without_config() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;

	let output = common::docpress_cmd()
		.arg("info")
		.arg("--format")
		.arg("json")
		.arg("--path")
		.arg(tmp.path())
		.assert()
		.success()
		.get_output()
		.stdout
		.clone();

	let info: Value = serde_json::from_slice(&output)?;
	assert_eq!(info["configPath"], Value::Null);
	assert_eq!(info["config"]["content_dir"], "content");
	assert_eq!(info["documents"], 0);

	Ok(())
}

#[test]
fn missing_subcommand_fails() {
	common::docpress_cmd()
		.assert()
		.code(1)
		.stderr(predicates::str::contains("No subcommand specified"));
}
