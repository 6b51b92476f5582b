use async_openai::{config::OpenAIConfig, Client as OpenAiClient};
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use translation_gateway::controllers::translate::TranslateController;
use translation_gateway::domain::conversion::{ConversionService, ScratchSpace};
use translation_gateway::infrastructure::config::{
    Config, LogFormat, TranslationProvider, TtsProvider,
};
use translation_gateway::infrastructure::http::start_http_server;
use translation_gateway::infrastructure::repositories::{
    GoogleTranslationRepository, OpenAiSpeechRecognitionRepository, OpenAiTranslationRepository,
    OpenAiTtsRepository, PollyTtsRepository, SpeechRecognitionRepository, TranslationRepository,
    TtsRepository,
};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load configuration
    let config = Config::from_env()?;

    // Initialize logging
    init_logging(&config);

    tracing::info!(
        "Starting Translation Gateway on {}:{}",
        config.host,
        config.port
    );

    let openai_api_key = config
        .openai_api_key
        .clone()
        .ok_or("OPENAI_API_KEY is required")?;
    let openai_client = Arc::new(OpenAiClient::with_config(
        OpenAIConfig::new().with_api_key(openai_api_key),
    ));
    tracing::info!("OpenAI client initialized");

    // === DEPENDENCY INJECTION SETUP ===
    // 1. Instantiate repositories for the selected providers
    tracing::info!(
        translation_provider = ?config.translation_provider,
        tts_provider = ?config.tts_provider,
        "Instantiating repositories..."
    );

    let translation_repo: Arc<dyn TranslationRepository> = match config.translation_provider {
        TranslationProvider::Google => {
            let api_key = config
                .google_translate_api_key
                .clone()
                .ok_or("GOOGLE_TRANSLATE_API_KEY is required")?;
            Arc::new(GoogleTranslationRepository::new(
                reqwest::Client::new(),
                config.google_translate_base_url.clone(),
                api_key,
            ))
        }
        TranslationProvider::OpenAi => Arc::new(OpenAiTranslationRepository::new(
            openai_client.clone(),
            config.openai_translation_model.clone(),
        )),
    };

    let tts_repo: Arc<dyn TtsRepository> = match config.tts_provider {
        TtsProvider::Polly => {
            tracing::info!("Initializing AWS Polly client with region: {}", config.aws_region);

            let aws_config = aws_config::defaults(aws_config::BehaviorVersion::latest())
                .region(aws_config::Region::new(config.aws_region.clone()))
                .load()
                .await;

            tracing::info!(region = ?aws_config.region(), "AWS configuration loaded");

            Arc::new(PollyTtsRepository::new(Arc::new(
                aws_sdk_polly::Client::new(&aws_config),
            )))
        }
        TtsProvider::OpenAi => Arc::new(OpenAiTtsRepository::new(
            openai_client.clone(),
            config.openai_tts_model.clone(),
            config.openai_tts_voice.clone(),
        )),
    };

    let recognition_repo: Arc<dyn SpeechRecognitionRepository> = Arc::new(
        OpenAiSpeechRecognitionRepository::new(openai_client, config.openai_stt_model.clone()),
    );

    // 2. Instantiate services
    tracing::info!(scratch_dir = %config.scratch_dir.display(), "Instantiating services...");
    let conversion_service = Arc::new(ConversionService::new(
        translation_repo,
        tts_repo,
        recognition_repo,
        ScratchSpace::new(config.scratch_dir.clone()),
    ));

    // 3. Instantiate controllers
    tracing::info!("Instantiating controllers...");
    let translate_controller = Arc::new(TranslateController::new(conversion_service.clone()));

    // Start HTTP server with all routes
    start_http_server(Arc::new(config), conversion_service, translate_controller).await?;

    Ok(())
}

fn init_logging(config: &Config) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "translation_gateway=debug,tower_http=debug".into());

    if config.log_format == LogFormat::Json {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().pretty())
            .init();
    }
}
