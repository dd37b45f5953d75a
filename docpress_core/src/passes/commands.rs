use crate::Artifact;
use crate::DocpressResult;
use crate::Node;
use crate::Pass;
use crate::PassContext;
use crate::RAW_STRING;
use crate::Visit;
use crate::visit_elements;

/// A package manager a command variant is produced for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum PackageManager {
	Npm,
	Yarn,
	Pnpm,
	Bun,
}

impl PackageManager {
	/// Every supported manager, in the order variants are presented.
	pub const ALL: [Self; 4] = [Self::Npm, Self::Yarn, Self::Pnpm, Self::Bun];

	pub fn name(self) -> &'static str {
		match self {
			Self::Npm => "npm",
			Self::Yarn => "yarn",
			Self::Pnpm => "pnpm",
			Self::Bun => "bun",
		}
	}

	/// The `pre` property holding this manager's variant.
	pub fn property(self) -> &'static str {
		match self {
			Self::Npm => "__npmCommand__",
			Self::Yarn => "__yarnCommand__",
			Self::Pnpm => "__pnpmCommand__",
			Self::Bun => "__bunCommand__",
		}
	}
}

/// Prefix rules, checked in order. The first occurrence of the prefix is
/// replaced by the yarn, pnpm and bun equivalents.
const RULES: [(&str, [&str; 3]); 5] = [
	("npm install", ["yarn add", "pnpm add", "bun add"]),
	("npx create-", ["yarn create ", "pnpm create ", "bunx --bun create-"]),
	("npm create", ["yarn create", "pnpm create", "bun create"]),
	("npx", ["yarn dlx", "pnpm dlx", "bunx --bun"]),
	("npm run", ["yarn", "pnpm", "bun"]),
];

/// The equivalent of an npm command for every [`PackageManager`], in
/// [`PackageManager::ALL`] order. `None` when `raw` is not an npm command.
pub fn command_variants(raw: &str) -> Option<Vec<(PackageManager, String)>> {
	let (prefix, replacements) = RULES
		.iter()
		.find(|(prefix, _)| raw.starts_with(prefix))?;

	let mut variants = vec![(PackageManager::Npm, raw.to_string())];
	for (manager, replacement) in PackageManager::ALL[1..].iter().zip(replacements) {
		variants.push((*manager, raw.replacen(prefix, replacement, 1)));
	}

	Some(variants)
}

/// Adds a variant property per package manager to fences holding an npm
/// command.
#[derive(Debug, Clone, Copy, Default)]
pub struct CommandVariantPass;

impl Pass for CommandVariantPass {
	fn name(&self) -> &'static str {
		"command-variants"
	}

	fn reads(&self) -> &'static [Artifact] {
		&[Artifact::FenceProperties]
	}

	fn run(&self, tree: &mut Node, _cx: &mut PassContext) -> DocpressResult<()> {
		visit_elements(
			tree,
			|element| element.is("pre") && element.properties.get_str(RAW_STRING).is_some(),
			|pre| {
				let variants = pre
					.properties
					.get_str(RAW_STRING)
					.and_then(command_variants);

				for (manager, command) in variants.into_iter().flatten() {
					pre.properties
						.insert(manager.property().to_string(), command.into());
				}

				Visit::SkipChildren
			},
		);

		Ok(())
	}
}
