use std::path::Path;
use std::path::PathBuf;
use std::process;
use std::sync::Arc;
use std::sync::atomic::AtomicBool;
use std::sync::atomic::Ordering;

use clap::Parser;
use docpress_cli::Commands;
use docpress_cli::DocpressCli;
use docpress_cli::InfoOutputFormat;
use docpress_core::AnyResult;
use docpress_core::DEFAULT_THEME;
use docpress_core::DocpressConfig;
use docpress_core::DocpressError;
use docpress_core::DocpressResult;
use docpress_core::Document;
use docpress_core::Pipeline;
use docpress_core::TransformedDocument;
use docpress_core::discover_documents;
use docpress_core::load_collection;
use owo_colors::OwoColorize;
use tracing_subscriber::EnvFilter;

static USE_COLOR: AtomicBool = AtomicBool::new(true);

fn color_enabled() -> bool {
	USE_COLOR.load(Ordering::Relaxed)
}

/// Apply ANSI color codes only when color is enabled.
macro_rules! colored {
	($text:expr,red) => {
		if color_enabled() {
			format!("{}", $text.red())
		} else {
			format!("{}", $text)
		}
	};
	($text:expr,green) => {
		if color_enabled() {
			format!("{}", $text.green())
		} else {
			format!("{}", $text)
		}
	};
	($text:expr,yellow) => {
		if color_enabled() {
			format!("{}", $text.yellow())
		} else {
			format!("{}", $text)
		}
	};
	($text:expr,bold) => {
		if color_enabled() {
			format!("{}", $text.bold())
		} else {
			format!("{}", $text)
		}
	};
}

fn main() {
	let args = DocpressCli::parse();

	// Respect NO_COLOR, --no-color and terminals without color support.
	let use_color = !args.no_color
		&& std::env::var_os("NO_COLOR").is_none()
		&& supports_color::on(supports_color::Stream::Stderr).is_some();
	if !use_color {
		USE_COLOR.store(false, Ordering::Relaxed);
	}

	init_tracing(args.verbose);

	// Install miette's fancy handler for rich error diagnostics.
	miette::set_hook(Box::new(move |_| {
		Box::new(
			miette::MietteHandlerOpts::new()
				.color(use_color)
				.unicode(use_color)
				.build(),
		)
	}))
	.ok();

	let result = match &args.command {
		Some(Commands::Build { out, pretty }) => run_build(&args, out.as_deref(), *pretty),
		Some(Commands::Info { format }) => run_info(&args, *format),
		None => {
			eprintln!("No subcommand specified. Run `docpress --help` for usage.");
			process::exit(1);
		}
	};

	match result {
		Ok(0) => {}
		Ok(_) => process::exit(1),
		Err(e) => {
			match e.downcast::<DocpressError>() {
				Ok(docpress_err) => {
					let report: miette::Report = (*docpress_err).into();
					eprintln!("{report:?}");
				}
				Err(e) => {
					eprintln!("{} {e}", colored!("error:", red));
				}
			}
			process::exit(2);
		}
	}
}

/// Logs go to stderr so stdout stays machine readable. `--verbose` shows
/// debug logs, otherwise `DOCPRESS_LOG` is read as an env filter.
fn init_tracing(verbose: bool) {
	let filter = if verbose {
		EnvFilter::new("debug")
	} else {
		EnvFilter::try_from_env("DOCPRESS_LOG").unwrap_or_else(|_| EnvFilter::new("error"))
	};

	tracing_subscriber::fmt()
		.with_env_filter(filter)
		.with_writer(std::io::stderr)
		.with_ansi(color_enabled())
		.init();
}

fn resolve_root(args: &DocpressCli) -> PathBuf {
	args.path
		.clone()
		.unwrap_or_else(|| std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")))
}

fn print_section(title: &str) {
	println!();
	println!("{}", colored!(title, bold));
}

fn print_field(label: &str, value: impl std::fmt::Display) {
	println!("{label:<24} {value}");
}

/// Returns the number of documents that failed.
fn run_build(args: &DocpressCli, out: Option<&Path>, pretty: bool) -> AnyResult<usize> {
	let root = resolve_root(args);
	let config = DocpressConfig::load_or_default(&root)?;

	// A theme that fails to load stops the build before any document runs.
	let highlighter = Arc::new(config.build_highlighter(&root)?);
	let highlighter_name = highlighter.theme_name().to_string();
	let pipeline = Arc::new(Pipeline::standard(highlighter, &config)?);
	let collection = load_collection(&root, &config)?;

	tracing::debug!(
		documents = collection.documents.len(),
		theme = %highlighter_name,
		"transforming collection"
	);

	let runtime = tokio::runtime::Runtime::new()?;
	let results = runtime.block_on(transform_all(pipeline, collection.documents));

	let mut outputs = Vec::with_capacity(results.len());
	let mut failures = collection.errors;
	for result in results {
		match result {
			Ok(output) => outputs.push(output),
			Err(error) => failures.push(error),
		}
	}

	for output in &outputs {
		for warning in &output.warnings {
			eprintln!(
				"{} {}: {}",
				colored!("warning:", yellow),
				output.slug,
				warning.message()
			);
		}
	}

	let failed = failures.len();
	for failure in failures {
		eprintln!("{:?}", miette::Report::new(failure));
	}

	let json = if pretty {
		serde_json::to_string_pretty(&outputs)?
	} else {
		serde_json::to_string(&outputs)?
	};

	match out {
		Some(path) => {
			std::fs::write(path, json)?;
			eprintln!(
				"{} Wrote {} document(s) to {}",
				colored!("✓", green),
				outputs.len(),
				path.display()
			);
		}
		None => println!("{json}"),
	}

	if failed > 0 {
		eprintln!(
			"{} {} document(s) built, {} failed",
			colored!("✗", red),
			outputs.len(),
			failed
		);
	}

	Ok(failed)
}

/// Transform every document on the blocking pool. Results keep the order of
/// `documents`.
async fn transform_all(
	pipeline: Arc<Pipeline>,
	documents: Vec<Document>,
) -> Vec<DocpressResult<TransformedDocument>> {
	let handles: Vec<_> = documents
		.into_iter()
		.map(|document| {
			let pipeline = Arc::clone(&pipeline);
			let path = document.identity_path.clone();
			let handle = tokio::task::spawn_blocking(move || pipeline.transform(&document));
			(path, handle)
		})
		.collect();

	let mut results = Vec::with_capacity(handles.len());
	for (path, handle) in handles {
		let result = match handle.await {
			Ok(result) => result,
			Err(e) => Err(DocpressError::Task(e.to_string()).in_document(path)),
		};
		results.push(result);
	}

	results
}

fn run_info(args: &DocpressCli, format: InfoOutputFormat) -> AnyResult<usize> {
	let root = resolve_root(args);
	let config_path = DocpressConfig::resolve_path(&root);
	let config = DocpressConfig::load_or_default(&root)?;
	let documents = discover_documents(&root, &config)?;

	if matches!(format, InfoOutputFormat::Json) {
		let value = serde_json::json!({
			"root": root.display().to_string(),
			"configPath": config_path.map(|path| path.display().to_string()),
			"config": config,
			"documents": documents.len(),
		});
		println!("{}", serde_json::to_string_pretty(&value)?);
		return Ok(0);
	}

	println!("{}", colored!("docpress info", bold));

	print_section("Project");
	print_field("Root", root.display());
	print_field(
		"Config",
		config_path.map_or_else(|| "(defaults)".to_string(), |path| path.display().to_string()),
	);

	print_section("Configuration");
	print_field("Content directory", config.content_dir.display());
	print_field("Include", config.include.join(", "));
	print_field(
		"Theme",
		config.theme.as_ref().map_or_else(
			|| format!("{DEFAULT_THEME} (built-in)"),
			|path| path.display().to_string(),
		),
	);
	print_field("Components directory", config.components_dir.display());
	print_field(
		"Known components",
		if config.components.known.is_empty() {
			"(none)".to_string()
		} else {
			config.components.known.join(", ")
		},
	);
	print_field("Anchor class", &config.headings.anchor_class);

	print_section("Documents");
	print_field("Discovered", documents.len());

	Ok(0)
}
