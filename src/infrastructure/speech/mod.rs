mod mock_speech_engine;
mod openai_speech_engine;

pub use mock_speech_engine::MockSpeechEngine;
pub use openai_speech_engine::{OPENAI_PROVIDER, OpenAiSpeechEngine};
