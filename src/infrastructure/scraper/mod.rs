mod http_content_fetcher;
mod mock_content_fetcher;

pub use http_content_fetcher::{HttpContentFetcher, html_to_text};
pub use mock_content_fetcher::MockContentFetcher;
