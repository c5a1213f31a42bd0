//! Building documents and writing them to disk.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::Local;
use jatsgen_build::{ArticleXml, BuildError, BuildOptions, Provenance};
use jatsgen_core::{Article, Config, key};
use jatsgen_xml::EmitError;
use tracing::{error, info, warn};

/// Placeholder in `xml_filename_pattern` replaced by the padded
/// manuscript number.
pub const MANUSCRIPT_PLACEHOLDER: &str = "{manuscript}";

/// Error writing a document to disk.
#[derive(Debug, thiserror::Error)]
pub enum WriteError {
    #[error("could not serialize document: {0}")]
    Emit(#[from] EmitError),
    #[error("could not write {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("`{}` is not configured", key::XML_FILENAME_PATTERN)]
    NoFilenamePattern,
    #[error("article has no manuscript number to name the file after")]
    NoManuscript,
}

/// Build the document for `article`.
///
/// Returns `Ok(None)` when the record is insufficient to build anything;
/// the reasons are logged. Malformed markup and over-deep content are
/// errors.
pub fn build_xml(
    article: &Article,
    config: &Config,
    add_comment: bool,
) -> Result<Option<ArticleXml>, BuildError> {
    let mut options = BuildOptions::from_config(config)?;
    if add_comment {
        options = options.with_provenance(provenance(config));
    }

    let label = article_label(article);
    match ArticleXml::build(article, config, &options) {
        Ok(xml) => {
            info!(article = %label, "generated xml");
            Ok(Some(xml))
        }
        Err(BuildError::InsufficientInput(reasons)) => {
            warn!(
                article = %label,
                reasons = %reasons.join(", "),
                "article did not have enough components, xml was not generated"
            );
            Ok(None)
        }
        Err(e) => Err(e),
    }
}

/// Provenance stamped on documents built with `config`, timestamped now.
pub fn provenance(config: &Config) -> Provenance {
    Provenance {
        generator: config
            .get_str(key::GENERATOR)
            .unwrap_or(env!("CARGO_PKG_NAME"))
            .to_string(),
        timestamp: Local::now().format("%Y-%m-%d %H:%M:%S").to_string(),
        revision: config
            .get_str(key::SOURCE_REVISION)
            .unwrap_or(env!("CARGO_PKG_VERSION"))
            .to_string(),
    }
}

/// The output file name for `article` under `pattern`.
///
/// `None` when the pattern needs a manuscript number the article lacks.
pub fn xml_filename(pattern: &str, article: &Article) -> Option<String> {
    if !pattern.contains(MANUSCRIPT_PLACEHOLDER) {
        return Some(pattern.to_string());
    }
    let manuscript = article.padded_manuscript()?;
    Some(pattern.replace(MANUSCRIPT_PLACEHOLDER, &manuscript))
}

/// Serialize `xml` and write it to `filename`, inside `output_dir` if
/// given.
///
/// Serialization completes before the file is created, so a failed build
/// never leaves a partial file behind.
pub fn write_xml_to_disk(
    xml: &ArticleXml,
    filename: &str,
    output_dir: Option<&Path>,
    pretty: bool,
) -> Result<PathBuf, WriteError> {
    let bytes = xml.output_xml(pretty)?;
    let path = match output_dir {
        Some(dir) => dir.join(filename),
        None => PathBuf::from(filename),
    };
    fs::write(&path, bytes).map_err(|source| WriteError::Io {
        path: path.clone(),
        source,
    })?;
    Ok(path)
}

/// Build the document for `article` and write it where `config` says.
///
/// Every failure is logged and reported as `false`.
pub fn build_xml_to_disk(article: &Article, config: &Config, add_comment: bool) -> bool {
    let label = article_label(article);
    let xml = match build_xml(article, config, add_comment) {
        Ok(Some(xml)) => xml,
        Ok(None) => {
            error!(article = %label, "could not generate xml to disk");
            return false;
        }
        Err(e) => {
            error!(article = %label, error = %e, "could not generate xml to disk");
            return false;
        }
    };

    match write_configured(&xml, article, config) {
        Ok(path) => {
            info!(article = %label, path = %path.display(), "xml written");
            true
        }
        Err(e) => {
            error!(article = %label, error = %e, "could not write xml");
            false
        }
    }
}

fn write_configured(
    xml: &ArticleXml,
    article: &Article,
    config: &Config,
) -> Result<PathBuf, WriteError> {
    let pattern = config
        .get_str(key::XML_FILENAME_PATTERN)
        .ok_or(WriteError::NoFilenamePattern)?;
    let filename = xml_filename(pattern, article).ok_or(WriteError::NoManuscript)?;
    let output_dir = config.get_str(key::TARGET_OUTPUT_DIR).map(Path::new);
    write_xml_to_disk(xml, &filename, output_dir, false)
}

fn article_label(article: &Article) -> String {
    article
        .padded_manuscript()
        .or_else(|| article.doi.clone())
        .or_else(|| article.id.clone())
        .unwrap_or_else(|| "<unidentified>".to_string())
}
