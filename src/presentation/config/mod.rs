mod environment;
mod settings;

pub use environment::Environment;
pub use settings::{
    DatabaseSettings, GenerationSettings, LlmSettings, LoggingSettings, ServerSettings, Settings,
    SpeechSettings,
};
