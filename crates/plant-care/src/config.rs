use std::net::SocketAddr;
use std::time::Duration;

use llm_common::AnthropicClientConfig;

use crate::error::AppError;

pub const DEFAULT_PDF_URL: &str =
    "https://www.kellogggarden.com/wp-content/uploads/2020/05/Monthly-Flower-Gardening-Guide.pdf";
pub const DEFAULT_MODEL: &str = "claude-3-5-sonnet-20240620";
pub const DEFAULT_BIND_ADDR: &str = "127.0.0.1:8501";
pub const USER_AGENT: &str = concat!("plant-care/", env!("CARGO_PKG_VERSION"));

/// Application configuration loaded once from environment variables.
///
/// Only the API key is required; everything else falls back to the defaults the
/// tool ships with. Unparseable numeric values are a startup error rather than
/// being silently replaced.
#[derive(Debug, Clone)]
pub struct Config {
    pub bind_addr: SocketAddr,
    pub document: DocumentConfig,
    pub advisor: AdvisorConfig,
    pub llm: AnthropicClientConfig,
}

#[derive(Debug, Clone)]
pub struct DocumentConfig {
    /// Source of the gardening guide. Never taken from user input.
    pub url: String,
    pub fetch_timeout: Duration,
    pub max_bytes: usize,
    /// `None` disables caching of extracted text.
    pub cache_ttl: Option<Duration>,
}

#[derive(Debug, Clone)]
pub struct AdvisorConfig {
    pub model: String,
    pub max_tokens: u32,
    pub temperature: f32,
}

impl Default for DocumentConfig {
    fn default() -> Self {
        Self {
            url: DEFAULT_PDF_URL.to_string(),
            fetch_timeout: Duration::from_secs(30),
            max_bytes: 32 * 1024 * 1024,
            cache_ttl: Some(Duration::from_secs(3600)),
        }
    }
}

impl Default for AdvisorConfig {
    fn default() -> Self {
        Self {
            model: DEFAULT_MODEL.to_string(),
            max_tokens: 250,
            temperature: 0.7,
        }
    }
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// Required:
    /// - `ANTHROPIC_API_KEY`
    ///
    /// Optional:
    /// - `ANTHROPIC_BASE_URL`, `ANTHROPIC_TIMEOUT_SECS`
    /// - `ANTHROPIC_MODEL`, `ANTHROPIC_MAX_TOKENS`, `ANTHROPIC_TEMPERATURE`
    /// - `PLANT_CARE_PDF_URL`, `PDF_FETCH_TIMEOUT_SECS`, `PDF_MAX_BYTES`
    /// - `PDF_CACHE_TTL_SECS` (0 disables the cache)
    /// - `BIND_ADDR`
    pub fn from_env() -> Result<Self, AppError> {
        let llm = AnthropicClientConfig::from_env()?.with_user_agent(USER_AGENT);

        let bind_addr = env_or("BIND_ADDR", DEFAULT_BIND_ADDR.to_string())
            .parse::<SocketAddr>()
            .map_err(|e| AppError::Config(format!("BIND_ADDR is not a socket address: {e}")))?;

        let defaults = DocumentConfig::default();
        let cache_ttl_secs = parse_env::<u64>("PDF_CACHE_TTL_SECS")?;
        let document = DocumentConfig {
            url: env_or("PLANT_CARE_PDF_URL", defaults.url),
            fetch_timeout: parse_env::<u64>("PDF_FETCH_TIMEOUT_SECS")?
                .map(Duration::from_secs)
                .unwrap_or(defaults.fetch_timeout),
            max_bytes: parse_env::<usize>("PDF_MAX_BYTES")?.unwrap_or(defaults.max_bytes),
            cache_ttl: match cache_ttl_secs {
                Some(secs) => ttl_secs(secs),
                None => defaults.cache_ttl,
            },
        };

        let defaults = AdvisorConfig::default();
        let advisor = AdvisorConfig {
            model: env_or("ANTHROPIC_MODEL", defaults.model),
            max_tokens: parse_env::<u32>("ANTHROPIC_MAX_TOKENS")?.unwrap_or(defaults.max_tokens),
            temperature: parse_env::<f32>("ANTHROPIC_TEMPERATURE")?
                .unwrap_or(defaults.temperature),
        };
        if advisor.max_tokens == 0 {
            return Err(AppError::Config(
                "ANTHROPIC_MAX_TOKENS must be greater than zero".to_string(),
            ));
        }

        Ok(Self {
            bind_addr,
            document,
            advisor,
            llm,
        })
    }
}

/// Zero means "do not cache".
pub fn ttl_secs(secs: u64) -> Option<Duration> {
    (secs > 0).then(|| Duration::from_secs(secs))
}

fn env_or(name: &str, default: String) -> String {
    std::env::var(name)
        .ok()
        .filter(|v| !v.trim().is_empty())
        .unwrap_or(default)
}

fn parse_env<T>(name: &str) -> Result<Option<T>, AppError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match std::env::var(name) {
        Ok(raw) if !raw.trim().is_empty() => raw
            .trim()
            .parse::<T>()
            .map(Some)
            .map_err(|e| AppError::Config(format!("{name}={raw:?} is invalid: {e}"))),
        _ => Ok(None),
    }
}
