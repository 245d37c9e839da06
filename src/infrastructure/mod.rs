pub mod audio;
pub mod llm;
pub mod observability;
pub mod persistence;
pub mod scraper;
pub mod speech;
pub mod voices;
