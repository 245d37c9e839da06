mod audio_toolkit;
mod content_fetcher;
mod llm_client;
mod podcast_repository;
mod repository_error;
mod speech_synthesizer;

pub use audio_toolkit::{AudioToolkit, AudioToolkitError};
pub use content_fetcher::{ContentFetchError, ContentFetcher};
pub use llm_client::{ChatCompletion, LlmClient, LlmClientError, ModelOptions, TokenUsage};
pub use podcast_repository::{PodcastRepository, PodcastUpdate};
pub use repository_error::RepositoryError;
pub use speech_synthesizer::{AudioFormat, SpeechSynthesizer, SynthesisError, SynthesisRequest};
