use whatlang::Lang;

/// Code returned when no language can be determined.
pub const UNDETERMINED_LANGUAGE: &str = "und";

/// Code for English, the only language scored by the English path.
pub const ENGLISH: &str = "en";

pub trait LanguageDetector: Send + Sync {
    /// Returns `en` for English, an ISO 639-3 code for other languages,
    /// or [`UNDETERMINED_LANGUAGE`].
    fn detect(&self, text: &str) -> String;
}

/// Offline trigram-based detection.
#[derive(Debug, Default, Clone, Copy)]
pub struct WhatlangDetector;

impl LanguageDetector for WhatlangDetector {
    fn detect(&self, text: &str) -> String {
        match whatlang::detect_lang(text) {
            Some(Lang::Eng) => ENGLISH.to_string(),
            Some(lang) => lang.code().to_string(),
            None => UNDETERMINED_LANGUAGE.to_string(),
        }
    }
}
