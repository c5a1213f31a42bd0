//! Element builders and document assembly for JATS articles.
//!
//! Each builder maps one typed input (a contributor, an affiliation, a
//! funding award, ...) to one element subtree. [`ArticleXml::build`] owns
//! the per-document [`BuildContext`] and drives the builders in schema
//! order to produce a complete `article` tree:
//!
//! ```text
//! article
//! ├── front (journal-meta, article-meta)
//! ├── body            (content blocks, when present)
//! ├── back            (additional information, data availability)
//! └── sub-article*    (peer review material)
//! ```

mod affiliation;
mod article;
mod content;
mod context;
mod contrib;
mod dataset;
mod dates;
mod error;
mod funding;
mod meta;
mod notes;
mod options;
mod permissions;
mod sub_article;

pub use affiliation::*;
pub use article::*;
pub use content::*;
pub use context::*;
pub use contrib::*;
pub use dataset::*;
pub use dates::*;
pub use error::*;
pub use funding::*;
pub use meta::*;
pub use notes::*;
pub use options::*;
pub use permissions::*;
pub use sub_article::*;
