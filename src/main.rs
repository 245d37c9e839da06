use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use tokio::net::TcpListener;

use podsmith::application::ports::{
    AudioToolkit, ContentFetcher, LlmClient, PodcastRepository, SpeechSynthesizer,
};
use podsmith::application::services::{
    AudioAssembler, DialogueSynthesizer, GenerationDependencies, GenerationOrchestrator,
    PromptEngine,
};
use podsmith::infrastructure::audio::FfmpegToolkit;
use podsmith::infrastructure::llm::OpenAiClient;
use podsmith::infrastructure::observability::{TracingConfig, init_tracing};
use podsmith::infrastructure::persistence::{PgPodcastRepository, create_pool};
use podsmith::infrastructure::scraper::HttpContentFetcher;
use podsmith::infrastructure::speech::OpenAiSpeechEngine;
use podsmith::infrastructure::voices::builtin_catalog;
use podsmith::presentation::config::Environment;
use podsmith::presentation::{AppState, Settings, create_router};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let environment = Environment::try_from(
        std::env::var("APP_ENVIRONMENT").unwrap_or_else(|_| "local".to_string()),
    )
    .map_err(anyhow::Error::msg)?;

    let settings = Settings::load(&environment)?;

    init_tracing(TracingConfig {
        environment: environment.to_string(),
        json_format: settings.logging.enable_json,
    });

    let pool = create_pool(&settings.database.url, settings.database.max_connections).await?;
    sqlx::migrate!("./migrations").run(&pool).await?;

    let repository: Arc<dyn PodcastRepository> = Arc::new(PgPodcastRepository::new(pool));
    let llm: Arc<dyn LlmClient> = Arc::new(OpenAiClient::new(
        &settings.llm.base_url,
        settings.llm.api_key.clone(),
        settings.llm.model.clone(),
    ));
    let speech: Arc<dyn SpeechSynthesizer> = Arc::new(OpenAiSpeechEngine::new(
        &settings.speech.base_url,
        settings.speech.api_key.clone(),
        settings.speech.model.clone(),
    ));
    let content_fetcher: Arc<dyn ContentFetcher> =
        Arc::new(HttpContentFetcher::new(settings.generation.fetch_max_chars));
    let toolkit: Arc<dyn AudioToolkit> = Arc::new(FfmpegToolkit::default());
    let voices = Arc::new(builtin_catalog());

    let prompt_engine = Arc::new(PromptEngine::new(llm));
    let synthesizer = Arc::new(DialogueSynthesizer::new(
        Arc::clone(&speech),
        settings.generation.synthesis_concurrency,
    ));
    let assembler = Arc::new(AudioAssembler::new(
        toolkit,
        PathBuf::from(&settings.generation.scratch_dir),
    ));

    let orchestrator = Arc::new(GenerationOrchestrator::new(GenerationDependencies {
        repository: Arc::clone(&repository),
        content_fetcher,
        speech,
        prompt_engine,
        synthesizer,
        assembler,
        voices: Arc::clone(&voices),
    }));

    let state = AppState {
        orchestrator,
        repository,
        voices,
        settings: settings.clone(),
    };

    let router = create_router(state);

    let addr = SocketAddr::new(settings.server.host.parse()?, settings.server.port);
    tracing::info!("Listening on {}", addr);

    let listener = TcpListener::bind(addr).await?;
    axum::serve(listener, router).await?;

    Ok(())
}
