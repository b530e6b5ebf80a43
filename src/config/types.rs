use serde::Deserialize;

/// Main configuration structure for Driftnet
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub crawler: CrawlerConfig,
    pub fetch: FetchConfig,
    #[serde(default)]
    pub summarizer: SummarizerConfig,
    pub sink: SinkConfig,
}

/// Crawl orchestration configuration
#[derive(Debug, Clone, Deserialize)]
pub struct CrawlerConfig {
    /// Maximum number of seed crawls running at once
    #[serde(rename = "max-concurrent-tasks")]
    pub max_concurrent_tasks: u32,

    /// Per-seed result bound used when a request does not supply one
    #[serde(rename = "default-max-results")]
    pub default_max_results: u32,
}

/// HTTP fetch configuration shared by all handlers
#[derive(Debug, Clone, Deserialize)]
pub struct FetchConfig {
    /// User-Agent header sent with every request
    #[serde(rename = "user-agent")]
    pub user_agent: String,

    /// Overall per-request timeout (seconds)
    #[serde(rename = "request-timeout-secs")]
    pub request_timeout_secs: u64,

    /// Timeout for the content-type probe (seconds)
    #[serde(rename = "probe-timeout-secs")]
    pub probe_timeout_secs: u64,
}

/// Summarization service configuration
///
/// The API key lives here, not in the environment: the config object is
/// constructed once at startup and handed to every component that needs it.
#[derive(Debug, Clone, Deserialize)]
pub struct SummarizerConfig {
    /// API key; summarization is disabled when absent
    #[serde(rename = "api-key")]
    pub api_key: Option<String>,

    /// Completion endpoint to POST to
    #[serde(default = "default_summarizer_endpoint")]
    pub endpoint: String,

    /// Model identifier sent with each request
    #[serde(default = "default_summarizer_model")]
    pub model: String,

    /// Completion length cap
    #[serde(rename = "max-tokens", default = "default_summarizer_max_tokens")]
    pub max_tokens: u32,
}

impl Default for SummarizerConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            endpoint: default_summarizer_endpoint(),
            model: default_summarizer_model(),
            max_tokens: default_summarizer_max_tokens(),
        }
    }
}

fn default_summarizer_endpoint() -> String {
    "https://api.openai.com/v1/completions".to_string()
}

fn default_summarizer_model() -> String {
    "text-davinci-003".to_string()
}

fn default_summarizer_max_tokens() -> u32 {
    1000
}

/// Result sink configuration
#[derive(Debug, Clone, Deserialize)]
pub struct SinkConfig {
    /// Filesystem root under which containers are created
    #[serde(rename = "root-path")]
    pub root_path: String,

    /// Container name for persisted crawl artifacts
    pub container: String,
}
