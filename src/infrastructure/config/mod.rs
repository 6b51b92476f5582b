use serde::Deserialize;
use std::env;
use std::path::PathBuf;

pub const DEFAULT_GOOGLE_TRANSLATE_URL: &str =
    "https://translation.googleapis.com/language/translate/v2";

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub environment: Environment,
    pub log_format: LogFormat,
    // Providers
    pub translation_provider: TranslationProvider,
    pub tts_provider: TtsProvider,
    // Google Cloud Translation
    pub google_translate_api_key: Option<String>,
    pub google_translate_base_url: String,
    // OpenAI
    pub openai_api_key: Option<String>,
    pub openai_translation_model: String,
    pub openai_tts_model: String,
    pub openai_tts_voice: String,
    pub openai_stt_model: String,
    // AWS Polly
    pub aws_region: String,
    // Uploads and transient audio
    pub scratch_dir: PathBuf,
    pub max_upload_bytes: usize,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    Development,
    Production,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    Pretty,
    Json,
}

#[derive(Debug, Clone, Copy, Deserialize, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum TranslationProvider {
    Google,
    OpenAi,
}

#[derive(Debug, Clone, Copy, Deserialize, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum TtsProvider {
    Polly,
    OpenAi,
}

impl std::str::FromStr for TranslationProvider {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "google" => Ok(Self::Google),
            "openai" => Ok(Self::OpenAi),
            other => Err(format!("Unknown TRANSLATION_PROVIDER: {}", other)),
        }
    }
}

impl std::str::FromStr for TtsProvider {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "polly" => Ok(Self::Polly),
            "openai" => Ok(Self::OpenAi),
            other => Err(format!("Unknown TTS_PROVIDER: {}", other)),
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self, Box<dyn std::error::Error>> {
        dotenvy::dotenv().ok();

        let config = Config {
            host: env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            port: env::var("PORT")
                .unwrap_or_else(|_| "5000".to_string())
                .parse()?,
            environment: env::var("ENVIRONMENT")
                .unwrap_or_else(|_| "development".to_string())
                .parse::<String>()
                .map(|s| match s.as_str() {
                    "production" => Environment::Production,
                    _ => Environment::Development,
                })?,
            log_format: env::var("LOG_FORMAT")
                .unwrap_or_else(|_| "pretty".to_string())
                .parse::<String>()
                .map(|s| match s.as_str() {
                    "json" => LogFormat::Json,
                    _ => LogFormat::Pretty,
                })?,
            translation_provider: env::var("TRANSLATION_PROVIDER")
                .unwrap_or_else(|_| "google".to_string())
                .parse()?,
            tts_provider: env::var("TTS_PROVIDER")
                .unwrap_or_else(|_| "polly".to_string())
                .parse()?,
            google_translate_api_key: non_empty_var("GOOGLE_TRANSLATE_API_KEY"),
            google_translate_base_url: env::var("GOOGLE_TRANSLATE_BASE_URL")
                .unwrap_or_else(|_| DEFAULT_GOOGLE_TRANSLATE_URL.to_string()),
            openai_api_key: non_empty_var("OPENAI_API_KEY"),
            openai_translation_model: env::var("OPENAI_TRANSLATION_MODEL")
                .unwrap_or_else(|_| "gpt-4o-mini".to_string()),
            openai_tts_model: env::var("OPENAI_TTS_MODEL").unwrap_or_else(|_| "tts-1".to_string()),
            openai_tts_voice: env::var("OPENAI_TTS_VOICE").unwrap_or_default(),
            openai_stt_model: env::var("OPENAI_STT_MODEL")
                .unwrap_or_else(|_| "whisper-1".to_string()),
            aws_region: env::var("AWS_REGION").unwrap_or_else(|_| "eu-west-1".to_string()),
            scratch_dir: env::var("SCRATCH_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|_| env::temp_dir()),
            max_upload_bytes: env::var("MAX_UPLOAD_BYTES")
                .unwrap_or_else(|_| (25 * 1024 * 1024).to_string())
                .parse()?,
        };

        config.validate()?;

        Ok(config)
    }

    /// Check that every selected provider has the credentials it needs
    pub fn validate(&self) -> Result<(), String> {
        if self.translation_provider == TranslationProvider::Google
            && self.google_translate_api_key.is_none()
        {
            return Err(
                "GOOGLE_TRANSLATE_API_KEY is required when TRANSLATION_PROVIDER=google".to_string(),
            );
        }

        // Speech recognition always goes through OpenAI
        if self.openai_api_key.is_none() {
            return Err("OPENAI_API_KEY is required for speech recognition".to_string());
        }

        if self.max_upload_bytes == 0 {
            return Err("MAX_UPLOAD_BYTES must be greater than zero".to_string());
        }

        Ok(())
    }

    pub fn is_development(&self) -> bool {
        self.environment == Environment::Development
    }
}

fn non_empty_var(key: &str) -> Option<String> {
    env::var(key).ok().filter(|v| !v.trim().is_empty())
}
