mod common;

use clap::Parser;
use docpress_cli::Commands;
use docpress_cli::DocpressCli;
use docpress_core::AnyEmptyResult;
use predicates::prelude::PredicateBooleanExt;
use serde_json::Value;

#[test]
fn parses_build_arguments() -> AnyEmptyResult {
	let cli = DocpressCli::try_parse_from(["docpress", "build", "--pretty", "--out", "docs.json"])?;

	match cli.command {
		Some(Commands::Build { out, pretty }) => {
			assert_eq!(out.as_deref(), Some(std::path::Path::new("docs.json")));
			assert!(pretty);
		}
		_ => panic!("expected the build command"),
	}

	Ok(())
}

#[test]
fn build_emits_documents() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	common::write_file(
		&tmp.path().join("content/guides/install.mdx"),
		&common::mdx(
			"Install",
			"# Install\n\n```bash\nnpm install docpress\n```\n",
		),
	)?;

	let output = common::docpress_cmd()
		.arg("build")
		.arg("--path")
		.arg(tmp.path())
		.assert()
		.success()
		.get_output()
		.stdout
		.clone();

	let documents: Value = serde_json::from_slice(&output)?;
	let document = &documents[0];
	assert_eq!(document["slug"], "/guides/install");
	assert_eq!(document["slugAsParams"], "install");
	assert_eq!(document["title"], "Install");
	assert_eq!(document["published"], true);
	let code = document["body"]["code"].as_str().unwrap_or_default();
	assert!(code.contains(r#"__yarnCommand__="yarn add docpress""#));
	assert!(code.contains(r#"class="subheading-anchor""#));

	Ok(())
}

#[test]
fn build_writes_to_file() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	common::write_file(
		&tmp.path().join("content/index.mdx"),
		&common::mdx("Home", "Welcome.\n"),
	)?;
	let out = tmp.path().join("dist/docs.json");
	std::fs::create_dir_all(tmp.path().join("dist"))?;

	common::docpress_cmd()
		.arg("build")
		.arg("--path")
		.arg(tmp.path())
		.arg("--out")
		.arg(&out)
		.arg("--pretty")
		.assert()
		.success()
		.stderr(predicates::str::contains("Wrote 1 document(s)"));

	let documents: Value = serde_json::from_str(&std::fs::read_to_string(&out)?)?;
	assert_eq!(documents[0]["slug"], "/index");
	assert_eq!(documents[0]["slugAsParams"], "");

	Ok(())
}

#[test]
fn build_reports_failed_documents_and_keeps_the_rest() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	common::write_file(
		&tmp.path().join("content/docs/good.mdx"),
		&common::mdx("Good", "Fine.\n"),
	)?;
	common::write_file(
		&tmp.path().join("content/docs/code.mdx"),
		&common::mdx("Code", "```brainfudge\n+++\n```\n"),
	)?;
	common::write_file(
		&tmp.path().join("content/docs/untitled.mdx"),
		"# No front matter\n",
	)?;

	let assert = common::docpress_cmd()
		.arg("build")
		.arg("--path")
		.arg(tmp.path())
		.assert()
		.code(1)
		.stderr(
			predicates::str::contains("docs/code")
				.and(predicates::str::contains("unknown language"))
				.and(predicates::str::contains("docs/untitled")),
		);

	let documents: Value = serde_json::from_slice(&assert.get_output().stdout)?;
	let slugs: Vec<&str> = documents
		.as_array()
		.map(|documents| {
			documents
				.iter()
				.filter_map(|document| document["slug"].as_str())
				.collect()
		})
		.unwrap_or_default();
	assert_eq!(slugs, vec!["/docs/good"]);

	Ok(())
}

#[test]
fn build_reports_component_warnings() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	common::write_file(
		&tmp.path().join("content/docs/card.mdx"),
		&common::mdx("Card", "<Mystery />\n"),
	)?;

	common::docpress_cmd()
		.arg("build")
		.arg("--path")
		.arg(tmp.path())
		.assert()
		.success()
		.stderr(predicates::str::contains("unknown component `Mystery`"))
		.stdout(predicates::str::contains(r#""kind":"unknownComponent""#));

	Ok(())
}

#[test]
fn build_uses_configured_theme() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	common::write_file(
		&tmp.path().join("docpress.toml"),
		"theme = \"themes/dark.json\"\n",
	)?;
	common::write_file(
		&tmp.path().join("themes/dark.json"),
		r##"{ "name": "site-dark", "colors": { "editor.background": "#101010" }, "tokenColors": [] }"##,
	)?;
	common::write_file(
		&tmp.path().join("content/index.mdx"),
		&common::mdx("Home", "```js\nlet a = 1\n```\n"),
	)?;

	common::docpress_cmd()
		.arg("build")
		.arg("--path")
		.arg(tmp.path())
		.assert()
		.success()
		.stdout(
			predicates::str::contains(r#"data-theme=\"site-dark\""#)
				.and(predicates::str::contains("background-color: #101010;")),
		);

	Ok(())
}

#[test]
fn build_fails_before_documents_when_theme_is_missing() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	common::write_file(
		&tmp.path().join("docpress.toml"),
		"theme = \"themes/missing.json\"\n",
	)?;
	common::write_file(
		&tmp.path().join("content/index.mdx"),
		&common::mdx("Home", "Welcome.\n"),
	)?;

	common::docpress_cmd()
		.arg("build")
		.arg("--path")
		.arg(tmp.path())
		.assert()
		.code(2)
		.stdout(predicates::str::is_empty())
		.stderr(predicates::str::contains("failed to load theme"));

	Ok(())
}

#[test]
fn build_rejects_invalid_config() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	common::write_file(&tmp.path().join("docpress.toml"), "content_dir = [")?;

	common::docpress_cmd()
		.arg("build")
		.arg("--path")
		.arg(tmp.path())
		.assert()
		.code(2)
		.stderr(predicates::str::contains("failed to parse config file"));

	Ok(())
}
