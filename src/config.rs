use std::path::Path;

use serde::Deserialize;
use serde::Serialize;

/// Environment prefix for layered overrides, e.g. `PINCODEPRO__LLM__LLM_KEY`
pub const ENV_PREFIX: &str = "PINCODEPRO";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DirectoryConfig {
    /// Base URL of the postal lookup authority
    #[serde(default = "default_directory_endpoint")]
    pub endpoint: String,
    #[serde(default = "default_http_timeout")]
    pub timeout_secs: u64,
}

fn default_directory_endpoint() -> String {
    "https://api.postalpincode.in".to_string()
}

fn default_http_timeout() -> u64 {
    10
}

impl Default for DirectoryConfig {
    fn default() -> Self {
        Self {
            endpoint: default_directory_endpoint(),
            timeout_secs: default_http_timeout(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeocoderConfig {
    #[serde(default = "default_geocoder_endpoint")]
    pub endpoint: String,
    /// Nominatim rejects requests without an identifying agent
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
    #[serde(default = "default_http_timeout")]
    pub timeout_secs: u64,
}

fn default_geocoder_endpoint() -> String {
    "https://nominatim.openstreetmap.org".to_string()
}

fn default_user_agent() -> String {
    format!("pincodepro/{}", env!("CARGO_PKG_VERSION"))
}

impl Default for GeocoderConfig {
    fn default() -> Self {
        Self {
            endpoint: default_geocoder_endpoint(),
            user_agent: default_user_agent(),
            timeout_secs: default_http_timeout(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmConfig {
    #[serde(default = "default_llm_endpoint")]
    pub llm_endpoint: String,
    /// Empty means "look in GEMINI_API_KEY / API_KEY"
    #[serde(default)]
    pub llm_key: String,
    #[serde(default = "default_fast_model")]
    pub normalizer_model: String,
    #[serde(default = "default_insight_model")]
    pub insight_model: String,
    #[serde(default = "default_fast_model")]
    pub support_model: String,
    #[serde(default = "default_llm_timeout")]
    pub timeout_secs: u64,
}

fn default_llm_endpoint() -> String {
    "https://generativelanguage.googleapis.com".to_string()
}

fn default_fast_model() -> String {
    "gemini-3-flash-preview".to_string()
}

fn default_insight_model() -> String {
    "gemini-3-pro-preview".to_string()
}

fn default_llm_timeout() -> u64 {
    30
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            llm_endpoint: default_llm_endpoint(),
            llm_key: String::new(),
            normalizer_model: default_fast_model(),
            insight_model: default_insight_model(),
            support_model: default_fast_model(),
            timeout_secs: default_llm_timeout(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// Send multi-word place names through the normalizer without an explicit AI trigger
    #[serde(default = "default_true")]
    pub multi_word_heuristic: bool,
    /// Token count at which the heuristic kicks in
    #[serde(default = "default_min_tokens")]
    pub min_tokens: usize,
    /// Upper bound for one whole resolve invocation
    #[serde(default = "default_resolve_timeout")]
    pub resolve_timeout_secs: u64,
}

fn default_true() -> bool {
    true
}

fn default_min_tokens() -> usize {
    2
}

fn default_resolve_timeout() -> u64 {
    20
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            multi_word_heuristic: true,
            min_tokens: default_min_tokens(),
            resolve_timeout_secs: default_resolve_timeout(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetryConfig {
    /// Total attempts including the first one
    #[serde(default = "default_max_attempts")]
    pub max_attempts: usize,
    #[serde(default = "default_base_delay_ms")]
    pub base_delay_ms: u64,
}

fn default_max_attempts() -> usize {
    2
}

fn default_base_delay_ms() -> u64 {
    250
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: default_max_attempts(),
            base_delay_ms: default_base_delay_ms(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default)]
    pub backtrace: bool,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            backtrace: false,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default)]
    pub enable_cors: bool,
    #[serde(default = "default_session_timeout")]
    pub session_timeout_secs: u64,
    #[serde(default = "default_max_concurrency")]
    pub max_concurrency: usize,
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    3000
}

fn default_session_timeout() -> u64 {
    3600
}

fn default_max_concurrency() -> usize {
    256
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            enable_cors: false,
            session_timeout_secs: default_session_timeout(),
            max_concurrency: default_max_concurrency(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub directory: DirectoryConfig,
    #[serde(default)]
    pub geocoder: GeocoderConfig,
    #[serde(default)]
    pub llm: LlmConfig,
    #[serde(default)]
    pub pipeline: PipelineConfig,
    #[serde(default)]
    pub retry: RetryConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub server: ServerConfig,
}

impl AppConfig {
    /// Load configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> crate::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Self = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from defaults, an optional `config.toml` in the
    /// working directory, and `PINCODEPRO__*` environment variables.
    pub fn load() -> crate::Result<Self> {
        Self::load_layered(None)
    }

    /// Like [`AppConfig::load`] but reads an explicit file instead of `config.toml`
    pub fn load_layered(path: Option<&Path>) -> crate::Result<Self> {
        let file_source = match path {
            Some(path) => config::File::from(path).required(true),
            None => config::File::with_name("config").required(false),
        };

        let settings = config::Config::builder()
            .add_source(config::Config::try_from(&Self::default())?)
            .add_source(file_source)
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        let config: Self = settings.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// Reject values that would make every request fail
    pub fn validate(&self) -> crate::Result<()> {
        if self.directory.endpoint.trim().is_empty() {
            return Err(crate::PincodeError::ConfigError(
                "directory.endpoint must not be empty".to_string(),
            ));
        }
        if self.geocoder.endpoint.trim().is_empty() {
            return Err(crate::PincodeError::ConfigError(
                "geocoder.endpoint must not be empty".to_string(),
            ));
        }
        if self.llm.llm_endpoint.trim().is_empty() {
            return Err(crate::PincodeError::ConfigError(
                "llm.llm_endpoint must not be empty".to_string(),
            ));
        }
        if self.retry.max_attempts == 0 {
            return Err(crate::PincodeError::ConfigError(
                "retry.max_attempts must be at least 1".to_string(),
            ));
        }
        if self.pipeline.min_tokens == 0 {
            return Err(crate::PincodeError::ConfigError(
                "pipeline.min_tokens must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    /// Get the LLM key, falling back to the conventional environment variables
    pub fn llm_key(&self) -> Option<String> {
        let configured = self.llm.llm_key.trim();
        if !configured.is_empty() {
            return Some(configured.to_string());
        }
        ["GEMINI_API_KEY", "API_KEY"]
            .iter()
            .filter_map(|name| std::env::var(name).ok())
            .map(|value| value.trim().to_string())
            .find(|value| !value.is_empty())
    }

    /// Get the directory endpoint
    pub fn directory_endpoint(&self) -> &str {
        &self.directory.endpoint
    }

    /// Get the reverse geocoder endpoint
    pub fn geocoder_endpoint(&self) -> &str {
        &self.geocoder.endpoint
    }

    /// Get the LLM endpoint
    pub fn llm_endpoint(&self) -> &str {
        &self.llm.llm_endpoint
    }

    /// Get resolve deadline
    pub fn resolve_timeout(&self) -> std::time::Duration {
        std::time::Duration::from_secs(self.pipeline.resolve_timeout_secs)
    }

    /// Render the configuration as TOML with the LLM key masked
    pub fn to_masked_toml(&self) -> crate::Result<String> {
        let mut masked = self.clone();
        if !masked.llm.llm_key.is_empty() {
            masked.llm.llm_key = mask_secret(&masked.llm.llm_key);
        }
        toml::to_string_pretty(&masked)
            .map_err(|e| crate::PincodeError::ConfigError(format!("Failed to render config: {e}")))
    }
}

/// Keep the first four characters of a secret and hide the rest
pub fn mask_secret(secret: &str) -> String {
    let visible: String = secret.chars().take(4).collect();
    format!("{visible}****")
}
