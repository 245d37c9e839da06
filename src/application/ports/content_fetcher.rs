use async_trait::async_trait;

use crate::domain::SourceReference;

/// Resolves a source reference into plain text the script prompt can use.
#[async_trait]
pub trait ContentFetcher: Send + Sync {
    async fn fetch(&self, source: &SourceReference) -> Result<String, ContentFetchError>;
}

#[derive(Debug, thiserror::Error)]
pub enum ContentFetchError {
    #[error("request failed: {0}")]
    RequestFailed(String),
    #[error("unsupported source: {0}")]
    UnsupportedSource(String),
    #[error("no usable content at {0}")]
    EmptyContent(String),
}
