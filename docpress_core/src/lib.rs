//! `docpress_core` turns MDX documents into render-ready records for a
//! documentation site.
//!
//! ## Processing Pipeline
//!
//! ```text
//! MDX document
//!   → Parser (mdast with MDX and GFM, lowered to a content tree)
//!   → Code import (fills `file=` fences from disk)
//!   → Heading slugs (unique `id` per heading)
//!   → Components (appends source fences for `ComponentSource` / `ComponentPreview`)
//!   → Extractor (raw source and `event="..."` of each fence, into a side table)
//!   → Highlighter (themed line and token spans, wrapped in a fragment)
//!   → Propagation (side table entries become `__rawString__` and friends)
//!   → Command variants (npm, yarn, pnpm and bun forms of install commands)
//!   → Heading anchors
//!   → HTML
//! ```
//!
//! ## Key Types
//!
//! - [`Node`] and [`Element`]: the content tree every pass works on.
//! - [`Pass`]: one transformation, declaring the [`Artifact`]s it reads and
//!   writes.
//! - [`Pipeline`]: an ordered, validated list of passes.
//! - [`Highlighter`]: syntax highlighting bound to one theme, shared by every
//!   document.
//! - [`DocpressConfig`]: configuration loaded from `docpress.toml`.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use std::path::Path;
//! use std::sync::Arc;
//!
//! use docpress_core::DocpressConfig;
//! use docpress_core::Pipeline;
//! use docpress_core::load_collection;
//!
//! let root = Path::new(".");
//! let config = DocpressConfig::load_or_default(root).unwrap();
//! let highlighter = Arc::new(config.build_highlighter(root).unwrap());
//! let pipeline = Pipeline::standard(highlighter, &config).unwrap();
//!
//! for document in load_collection(root, &config).unwrap().documents {
//!     let output = pipeline.transform(&document).unwrap();
//!     println!("{} -> {} bytes", output.slug, output.body.code.len());
//! }
//! ```

pub use annotations::*;
pub use collection::*;
pub use config::*;
pub use error::*;
pub use highlighter::*;
pub use html::*;
pub use parse::*;
pub use pass::*;
pub use passes::*;
pub use pipeline::*;
pub use tree::*;
pub use visit::*;

mod annotations;
mod collection;
pub mod config;
mod error;
pub mod highlighter;
mod html;
mod parse;
mod pass;
pub mod passes;
mod pipeline;
mod tree;
mod visit;

#[cfg(test)]
mod __fixtures;
