use crate::application::ports::{ContentFetchError, ContentFetcher};
use crate::domain::SourceReference;

/// Serves fixed content for any source; for tests and local wiring.
pub struct MockContentFetcher {
    content: String,
}

impl MockContentFetcher {
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
        }
    }
}

#[async_trait::async_trait]
impl ContentFetcher for MockContentFetcher {
    async fn fetch(&self, _source: &SourceReference) -> Result<String, ContentFetchError> {
        Ok(self.content.clone())
    }
}
