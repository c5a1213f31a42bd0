//! Reading article records from JSON.

use std::fs;
use std::path::{Path, PathBuf};

use jatsgen_core::Article;
use serde::Deserialize;

/// Error reading article records.
#[derive(Debug, thiserror::Error)]
pub enum ReadError {
    #[error("could not read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid article record: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Deserialize)]
#[serde(untagged)]
enum Records {
    Many(Vec<Article>),
    One(Box<Article>),
}

/// Parse one article object or an array of them.
pub fn parse_articles(json: &str) -> Result<Vec<Article>, ReadError> {
    Ok(match serde_json::from_str(json)? {
        Records::Many(articles) => articles,
        Records::One(article) => vec![*article],
    })
}

/// Read article records from a JSON file.
pub fn read_articles(path: impl AsRef<Path>) -> Result<Vec<Article>, ReadError> {
    let path = path.as_ref();
    let json = fs::read_to_string(path).map_err(|source| ReadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    parse_articles(&json)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_record() {
        let articles = parse_articles(
            r#"{"article_type": "research-article", "manuscript": 666, "title": "T",
                "abstract": "A", "dates": {"pub": "2012-11-13"}}"#,
        )
        .unwrap();
        assert_eq!(articles.len(), 1);
        assert_eq!(articles[0].manuscript, Some(666));
        assert_eq!(articles[0].abstract_text, "A");
        assert!(articles[0].get_date("pub").is_some());
    }

    #[test]
    fn test_many_records() {
        let articles = parse_articles(r#"[{"manuscript": 1}, {"manuscript": 2}]"#).unwrap();
        assert_eq!(articles.len(), 2);
    }

    #[test]
    fn test_invalid_record() {
        assert!(matches!(
            parse_articles(r#"{"manuscript": "x"}"#),
            Err(ReadError::Json(_))
        ));
    }
}
