//! jatsgen-core: the article record consumed by a JATS build.
//!
//! Everything in this crate is a read-only input to one build: the article
//! record with its contributors, affiliations, awards, datasets and content
//! blocks, plus the resolved configuration lookup table.

mod affiliation;
mod article;
mod config;
mod content;
mod contributor;
mod dataset;
mod funding;

pub use affiliation::*;
pub use article::*;
pub use config::*;
pub use content::*;
pub use contributor::*;
pub use dataset::*;
pub use funding::*;
