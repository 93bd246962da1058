use crate::services::providers::gemini::GEMINI_API_BASE;
use service_core::config as core_config;
use service_core::error::AppError;
use std::env;
use std::fmt;
use std::str::FromStr;

/// Default model, matching what the web client was built against.
const DEFAULT_MODEL: &str = "gemini-2.5-pro";

const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 120;

/// Data URLs for phone photos easily exceed axum's 2MB default.
const DEFAULT_MAX_BODY_BYTES: usize = 20 * 1024 * 1024;

#[derive(Debug, Clone)]
pub struct AskAiConfig {
    pub common: core_config::Config,
    pub google: GoogleConfig,
    pub models: ModelConfig,
    pub http: HttpConfig,
}

#[derive(Clone)]
pub struct GoogleConfig {
    /// `None` when `GOOGLE_API_KEY` is unset or empty outside production.
    pub api_key: Option<String>,
}

impl fmt::Debug for GoogleConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GoogleConfig")
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

#[derive(Debug, Clone)]
pub struct ModelConfig {
    pub provider: ProviderKind,
    /// Model name, e.g. gemini-2.5-pro
    pub model: String,
    pub api_base_url: String,
    pub request_timeout_secs: u64,
}

#[derive(Debug, Clone)]
pub struct HttpConfig {
    pub max_body_bytes: usize,
}

/// Which [`TextProvider`](crate::services::providers::TextProvider) backs the service.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProviderKind {
    Gemini,
    Mock,
}

impl FromStr for ProviderKind {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "gemini" => Ok(ProviderKind::Gemini),
            "mock" => Ok(ProviderKind::Mock),
            other => Err(AppError::ConfigError(anyhow::anyhow!(
                "unknown GENAI_PROVIDER '{}' (expected 'gemini' or 'mock')",
                other
            ))),
        }
    }
}

impl AskAiConfig {
    pub fn load() -> Result<Self, AppError> {
        let common_config = core_config::Config::load()?;
        let is_prod = env::var("ENVIRONMENT").unwrap_or_else(|_| "dev".to_string()) == "prod";

        Ok(AskAiConfig {
            common: common_config,
            google: GoogleConfig {
                api_key: get_optional_env("GOOGLE_API_KEY", is_prod)?,
            },
            models: ModelConfig {
                provider: get_env("GENAI_PROVIDER", Some("gemini"), false)?.parse()?,
                model: get_env("GENAI_MODEL", Some(DEFAULT_MODEL), false)?,
                api_base_url: get_env("GENAI_API_BASE_URL", Some(GEMINI_API_BASE), false)?,
                request_timeout_secs: parse_env(
                    "GENAI_REQUEST_TIMEOUT_SECS",
                    DEFAULT_REQUEST_TIMEOUT_SECS,
                )?,
            },
            http: HttpConfig {
                max_body_bytes: parse_env("ASK_AI_MAX_BODY_BYTES", DEFAULT_MAX_BODY_BYTES)?,
            },
        })
    }
}

fn get_env(key: &str, default: Option<&str>, is_prod: bool) -> Result<String, AppError> {
    match env::var(key) {
        Ok(val) => Ok(val),
        Err(_) => {
            if is_prod {
                Err(AppError::ConfigError(anyhow::anyhow!(
                    "{} is required in production but not set",
                    key
                )))
            } else if let Some(def) = default {
                Ok(def.to_string())
            } else {
                Err(AppError::ConfigError(anyhow::anyhow!(
                    "{} is required but not set",
                    key
                )))
            }
        }
    }
}

/// Like [`get_env`] without a default, but outside production a missing or
/// empty value is `None` instead of an error.
fn get_optional_env(key: &str, is_prod: bool) -> Result<Option<String>, AppError> {
    match env::var(key) {
        Ok(val) if !val.trim().is_empty() => Ok(Some(val)),
        _ if is_prod => Err(AppError::ConfigError(anyhow::anyhow!(
            "{} is required in production but not set",
            key
        ))),
        _ => Ok(None),
    }
}

fn parse_env<T>(key: &str, default: T) -> Result<T, AppError>
where
    T: FromStr,
    T::Err: fmt::Display,
{
    match env::var(key) {
        Ok(raw) => raw.trim().parse().map_err(|e| {
            AppError::ConfigError(anyhow::anyhow!("{} has invalid value '{}': {}", key, raw, e))
        }),
        Err(_) => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    const VARS: &[&str] = &[
        "ENVIRONMENT",
        "GOOGLE_API_KEY",
        "GENAI_PROVIDER",
        "GENAI_MODEL",
        "GENAI_API_BASE_URL",
        "GENAI_REQUEST_TIMEOUT_SECS",
        "ASK_AI_MAX_BODY_BYTES",
    ];

    fn clear_env() {
        for var in VARS {
            env::remove_var(var);
        }
    }

    #[test]
    #[serial]
    fn defaults_without_api_key_outside_prod() {
        clear_env();

        let config = AskAiConfig::load().unwrap();
        assert!(config.google.api_key.is_none());
        assert_eq!(config.models.provider, ProviderKind::Gemini);
        assert_eq!(config.models.model, "gemini-2.5-pro");
        assert_eq!(config.models.api_base_url, GEMINI_API_BASE);
        assert_eq!(config.models.request_timeout_secs, 120);
        assert_eq!(config.http.max_body_bytes, 20 * 1024 * 1024);
    }

    #[test]
    #[serial]
    fn missing_api_key_fails_in_prod() {
        clear_env();
        env::set_var("ENVIRONMENT", "prod");

        let result = AskAiConfig::load();
        clear_env();

        assert!(matches!(result, Err(AppError::ConfigError(_))));
    }

    #[test]
    #[serial]
    fn empty_api_key_is_unset() {
        clear_env();
        env::set_var("GOOGLE_API_KEY", "  ");

        let config = AskAiConfig::load().unwrap();
        clear_env();

        assert!(config.google.api_key.is_none());
    }

    #[test]
    #[serial]
    fn reads_overrides() {
        clear_env();
        env::set_var("GOOGLE_API_KEY", "secret-key");
        env::set_var("GENAI_PROVIDER", "Mock");
        env::set_var("GENAI_MODEL", "gemini-2.0-flash");
        env::set_var("GENAI_REQUEST_TIMEOUT_SECS", "30");
        env::set_var("ASK_AI_MAX_BODY_BYTES", "1024");

        let config = AskAiConfig::load().unwrap();
        clear_env();

        assert_eq!(config.google.api_key.as_deref(), Some("secret-key"));
        assert_eq!(config.models.provider, ProviderKind::Mock);
        assert_eq!(config.models.model, "gemini-2.0-flash");
        assert_eq!(config.models.request_timeout_secs, 30);
        assert_eq!(config.http.max_body_bytes, 1024);
        assert!(!format!("{:?}", config).contains("secret-key"));
    }

    #[test]
    #[serial]
    fn invalid_numbers_and_providers_are_rejected() {
        clear_env();
        env::set_var("GENAI_REQUEST_TIMEOUT_SECS", "soon");
        assert!(matches!(AskAiConfig::load(), Err(AppError::ConfigError(_))));

        clear_env();
        env::set_var("GENAI_PROVIDER", "openai");
        assert!(matches!(AskAiConfig::load(), Err(AppError::ConfigError(_))));

        clear_env();
    }
}
