mod audio_assembler;
mod dialogue_synthesizer;
mod generation_orchestrator;
mod prompt_engine;

pub use audio_assembler::{AssemblyError, AudioAssembler};
pub use dialogue_synthesizer::{DEFAULT_SYNTHESIS_CONCURRENCY, DialogueSynthesizer};
pub use generation_orchestrator::{
    EditOutcome, GenerationDependencies, GenerationError, GenerationOrchestrator, PodcastEdit,
};
pub use prompt_engine::{PromptEngine, PromptEngineError, strip_code_fence};
