use std::sync::Arc;

use crate::application::ports::PodcastRepository;
use crate::application::services::GenerationOrchestrator;
use crate::application::voices::VoiceCatalog;
use crate::presentation::config::Settings;

#[derive(Clone)]
pub struct AppState {
    pub orchestrator: Arc<GenerationOrchestrator>,
    pub repository: Arc<dyn PodcastRepository>,
    pub voices: Arc<VoiceCatalog>,
    pub settings: Settings,
}
