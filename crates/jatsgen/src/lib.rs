//! jatsgen - generate JATS XML from article records.
//!
//! ```rust
//! use jatsgen::{Article, Config, build_xml};
//!
//! let article = Article::new("10.7554/eLife.00666", "The <italic>title</italic>")
//!     .with_type("research-article")
//!     .with_manuscript(666);
//! let config = Config::new().with("journal_title", "eLife");
//!
//! let xml = build_xml(&article, &config, false).unwrap().unwrap();
//! let bytes = xml.output_xml(false).unwrap();
//! let text = String::from_utf8(bytes).unwrap();
//! assert!(text.contains("<article-title>The <italic>title</italic></article-title>"));
//! ```
//!
//! The work is split across crates:
//! - `jatsgen-core`: the article record and the configuration table
//! - `jatsgen-xml`: the element tree, markup reinjection and serialization
//! - `jatsgen-build`: element builders and document assembly
//!
//! This crate adds configuration files, JSON article records and disk
//! output on top.

pub mod config;
mod generate;
mod record;

pub use generate::*;
pub use record::*;

pub use jatsgen_build::{ArticleXml, BuildError, BuildOptions, DatasetStyle, Provenance};
pub use jatsgen_core::*;
pub use jatsgen_xml::{Element, EmitError, MarkupError, XmlNode};
