mod common;

use docpress_core::AnyEmptyResult;
use predicates::prelude::PredicateBooleanExt;
use rstest::rstest;

#[rstest]
#[case::root("docpress.toml")]
#[case::dotfile(".docpress.toml")]
#[case::config_dir(".config/docpress.toml")]
fn info_resolves_config_candidates(#[case] candidate: &str) -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	common::write_file(&tmp.path().join(candidate), "")?;

	let expected_path = tmp.path().join(candidate).display().to_string();

	common::docpress_cmd()
		.arg("info")
		.arg("--path")
		.arg(tmp.path())
		.assert()
		.success()
		.stdout(predicates::str::contains(expected_path));

	Ok(())
}

#[test]
fn info_prefers_docpress_toml_over_other_candidates() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	common::write_file(&tmp.path().join("docpress.toml"), "content_dir = \"first\"\n")?;
	common::write_file(&tmp.path().join(".docpress.toml"), "content_dir = \"second\"\n")?;
	common::write_file(
		&tmp.path().join(".config/docpress.toml"),
		"content_dir = \"third\"\n",
	)?;

	common::docpress_cmd()
		.arg("info")
		.arg("--path")
		.arg(tmp.path())
		.assert()
		.success()
		.stdout(predicates::str::contains("first"))
		.stdout(predicates::str::contains("second").not());

	Ok(())
}
