use std::{fmt, time::Duration};

use kqa_genai::{
    GeminiConfig,
    gemini::{DEFAULT_BASE_URL, DEFAULT_IMAGE_MODEL, DEFAULT_QUESTION_MODEL},
};
use serde::Deserialize;

/// Deployment environment, read from `ENV`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    #[default]
    Development,
    Production,
}

impl Environment {
    pub const fn is_development(&self) -> bool {
        matches!(self, Self::Development)
    }

    pub const fn is_production(&self) -> bool {
        matches!(self, Self::Production)
    }
}

/// Server configuration, loaded from environment variables.
///
/// Field names map to upper-case variables (`gemini_api_key` is read from
/// `GEMINI_API_KEY`).
#[derive(Clone, Deserialize)]
pub struct ApiConfig {
    pub gemini_api_key: String,
    #[serde(default = "default_base_url")]
    pub gemini_base_url: String,
    #[serde(default = "default_question_model")]
    pub question_model: String,
    #[serde(default = "default_image_model")]
    pub image_model: String,
    #[serde(default = "default_provider_timeout_secs")]
    pub provider_timeout_secs: u64,
    #[serde(default)]
    pub env: Environment,
    #[serde(default = "default_bind_addr")]
    pub bind_addr: String,
    /// Comma separated list of origins allowed by CORS
    #[serde(default)]
    pub allowed_origins: Option<String>,
    #[serde(default = "default_session_idle_minutes")]
    pub session_idle_minutes: i64,
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_question_model() -> String {
    DEFAULT_QUESTION_MODEL.to_string()
}

fn default_image_model() -> String {
    DEFAULT_IMAGE_MODEL.to_string()
}

const fn default_provider_timeout_secs() -> u64 {
    60
}

fn default_bind_addr() -> String {
    "0.0.0.0:3000".to_string()
}

const fn default_session_idle_minutes() -> i64 {
    60
}

impl ApiConfig {
    pub fn from_env() -> Result<Self, envy::Error> {
        envy::from_env::<Self>()?.validated()
    }

    /// Load from an explicit list of variables instead of the process environment.
    pub fn from_vars<I>(vars: I) -> Result<Self, envy::Error>
    where
        I: IntoIterator<Item = (String, String)>,
    {
        envy::from_iter::<_, Self>(vars)?.validated()
    }

    fn validated(self) -> Result<Self, envy::Error> {
        if self.session_idle_minutes <= 0
            || chrono::Duration::try_minutes(self.session_idle_minutes).is_none()
        {
            return Err(envy::Error::Custom(format!(
                "SESSION_IDLE_MINUTES must be a positive number of minutes, got {}",
                self.session_idle_minutes
            )));
        }
        Ok(self)
    }

    pub fn parsed_allowed_origins(&self) -> Vec<String> {
        self.allowed_origins
            .as_deref()
            .unwrap_or("http://localhost:5173")
            .split(',')
            .map(str::trim)
            .filter(|origin| !origin.is_empty())
            .map(String::from)
            .collect()
    }

    pub fn gemini_config(&self) -> GeminiConfig {
        GeminiConfig {
            api_key: self.gemini_api_key.clone(),
            base_url: self.gemini_base_url.clone(),
            question_model: self.question_model.clone(),
            image_model: self.image_model.clone(),
            timeout: Duration::from_secs(self.provider_timeout_secs),
        }
    }

    pub fn session_idle(&self) -> chrono::Duration {
        chrono::Duration::try_minutes(self.session_idle_minutes)
            .filter(|idle| *idle > chrono::Duration::zero())
            .unwrap_or_else(|| chrono::Duration::minutes(default_session_idle_minutes()))
    }
}

impl fmt::Debug for ApiConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ApiConfig")
            .field("gemini_api_key", &"<redacted>")
            .field("gemini_base_url", &self.gemini_base_url)
            .field("question_model", &self.question_model)
            .field("image_model", &self.image_model)
            .field("provider_timeout_secs", &self.provider_timeout_secs)
            .field("env", &self.env)
            .field("bind_addr", &self.bind_addr)
            .field("allowed_origins", &self.allowed_origins)
            .field("session_idle_minutes", &self.session_idle_minutes)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vars(pairs: &[(&str, &str)]) -> Vec<(String, String)> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_defaults() {
        let config = ApiConfig::from_vars(vars(&[("GEMINI_API_KEY", "secret")])).unwrap();

        assert_eq!(config.gemini_api_key, "secret");
        assert_eq!(config.gemini_base_url, DEFAULT_BASE_URL);
        assert_eq!(config.question_model, DEFAULT_QUESTION_MODEL);
        assert_eq!(config.provider_timeout_secs, 60);
        assert_eq!(config.env, Environment::Development);
        assert_eq!(config.bind_addr, "0.0.0.0:3000");
        assert_eq!(config.session_idle(), chrono::Duration::minutes(60));
    }

    #[test]
    fn test_overrides() {
        let config = ApiConfig::from_vars(vars(&[
            ("GEMINI_API_KEY", "secret"),
            ("ENV", "production"),
            ("PROVIDER_TIMEOUT_SECS", "15"),
            ("IMAGE_MODEL", "custom-image"),
            ("ALLOWED_ORIGINS", "https://kids.example, https://quiz.example ,"),
        ]))
        .unwrap();

        assert!(config.env.is_production());
        assert_eq!(config.gemini_config().timeout, Duration::from_secs(15));
        assert_eq!(config.gemini_config().image_model, "custom-image");
        assert_eq!(
            config.parsed_allowed_origins(),
            vec!["https://kids.example", "https://quiz.example"]
        );
    }

    #[test]
    fn test_session_idle_must_be_positive() {
        for minutes in ["0", "-5", "9223372036854775807"] {
            let result = ApiConfig::from_vars(vars(&[
                ("GEMINI_API_KEY", "secret"),
                ("SESSION_IDLE_MINUTES", minutes),
            ]));
            let err = result.expect_err(minutes).to_string();
            assert!(err.contains("SESSION_IDLE_MINUTES"), "{err}");
        }

        let config = ApiConfig::from_vars(vars(&[
            ("GEMINI_API_KEY", "secret"),
            ("SESSION_IDLE_MINUTES", "15"),
        ]))
        .unwrap();
        assert_eq!(config.session_idle(), chrono::Duration::minutes(15));
    }

    #[test]
    fn test_missing_api_key() {
        assert!(ApiConfig::from_vars(vars(&[("ENV", "development")])).is_err());
    }

    #[test]
    fn test_debug_redacts_key() {
        let config = ApiConfig::from_vars(vars(&[("GEMINI_API_KEY", "secret")])).unwrap();
        let debug = format!("{config:?}");
        assert!(!debug.contains("secret"));
        assert!(debug.contains("<redacted>"));
    }
}
