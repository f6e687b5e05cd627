//! Vocabulary source loading: a JSON array of entries from a local file or an http(s) URL.

use parola_algo::VocabEntry;
use thiserror::Error;
use tracing::info;

#[derive(Debug, Error)]
pub enum SourceError {
    #[error("failed to read vocabulary file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to fetch vocabulary: {0}")]
    Fetch(#[from] reqwest::Error),
    #[error("vocabulary is not a valid entry list: {0}")]
    Parse(#[from] serde_json::Error),
}

pub fn is_remote(location: &str) -> bool {
    location.starts_with("http://") || location.starts_with("https://")
}

pub fn parse_entries(raw: &str) -> Result<Vec<VocabEntry>, SourceError> {
    Ok(serde_json::from_str(raw)?)
}

pub async fn load_entries(
    location: &str,
    client: &reqwest::Client,
) -> Result<Vec<VocabEntry>, SourceError> {
    let entries = if is_remote(location) {
        client
            .get(location)
            .send()
            .await?
            .error_for_status()?
            .json::<Vec<VocabEntry>>()
            .await?
    } else {
        let raw = tokio::fs::read_to_string(location)
            .await
            .map_err(|source| SourceError::Io {
                path: location.to_string(),
                source,
            })?;
        parse_entries(&raw)?
    };

    info!(location, count = entries.len(), "vocabulary loaded");
    Ok(entries)
}
