//! Greeting line shown under the title.
//!
//! The text can come from a generative text service, but nothing in the
//! animation waits on it or depends on it. Missing credentials, a missing
//! source, a failed call or an empty answer all resolve to a fixed string.

use thiserror::Error;

/// Shown when no credentials or no source are available.
pub const FALLBACK_GREETING: &str = "Happy Holidays from Arix!";
/// Shown when the source fails or returns nothing usable.
pub const ERROR_GREETING: &str = "Season's Greetings.";
/// Environment variable holding the service credentials.
pub const API_KEY_ENV: &str = "API_KEY";
/// Prompt sent to the text service.
pub const GREETING_PROMPT: &str =
    "Write a very short, elegant, luxury-brand style Christmas greeting (max 10 words).";

/// Errors a greeting source may report.
#[derive(Debug, Error)]
pub enum GreetingError {
    /// The service could not be reached or rejected the request.
    #[error("greeting service unavailable: {0}")]
    Unavailable(String),
    /// The service answered with something that is not a greeting.
    #[error("greeting service returned an unusable response: {0}")]
    InvalidResponse(String),
}

/// Something that can produce a greeting for a prompt.
pub trait GreetingSource {
    fn generate(&self, api_key: &str, prompt: &str) -> Result<String, GreetingError>;
}

/// Resolve the greeting text. Never fails.
pub fn resolve_greeting(api_key: Option<&str>, source: Option<&dyn GreetingSource>) -> String {
    let Some(key) = api_key.map(str::trim).filter(|k| !k.is_empty()) else {
        log::warn!("{} is missing; using the default greeting", API_KEY_ENV);
        return FALLBACK_GREETING.to_string();
    };
    let Some(source) = source else {
        log::info!("No greeting source configured; using the default greeting");
        return FALLBACK_GREETING.to_string();
    };

    match source.generate(key, GREETING_PROMPT) {
        Ok(text) if !text.trim().is_empty() => text.trim().to_string(),
        Ok(_) => {
            log::error!("Greeting service returned an empty response");
            ERROR_GREETING.to_string()
        }
        Err(e) => {
            log::error!("Greeting service failed: {}", e);
            ERROR_GREETING.to_string()
        }
    }
}

/// Resolve using the `API_KEY` environment variable.
pub fn greeting_from_env(source: Option<&dyn GreetingSource>) -> String {
    let key = std::env::var(API_KEY_ENV).ok();
    resolve_greeting(key.as_deref(), source)
}
