pub mod google_translation_repository;
pub mod openai_speech_recognition_repository;
pub mod openai_translation_repository;
pub mod openai_tts_repository;
pub mod polly_tts_repository;
pub mod speech_recognition_repository;
pub mod text_batching;
pub mod translation_repository;
pub mod tts_repository;

pub use google_translation_repository::GoogleTranslationRepository;
pub use openai_speech_recognition_repository::OpenAiSpeechRecognitionRepository;
pub use openai_translation_repository::OpenAiTranslationRepository;
pub use openai_tts_repository::OpenAiTtsRepository;
pub use polly_tts_repository::PollyTtsRepository;
pub use speech_recognition_repository::{RecognitionError, SpeechRecognitionRepository};
pub use translation_repository::TranslationRepository;
pub use tts_repository::TtsRepository;
