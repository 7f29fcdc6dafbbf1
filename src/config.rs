//! Runtime configuration for stream-assist.
//!
//! Listen options come from the command line (each flag also has an
//! environment fallback). Everything else is read from the process
//! environment once at startup into an immutable [`Config`] that is shared
//! by `Arc` with the router and the upstream client.

use std::collections::BTreeSet;

use clap::Parser;

/// Default upstream model identifier.
pub const DEFAULT_MODEL: &str = "gpt-4o-mini";

/// Default upstream API root. `/chat/completions` is appended per request.
pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";

/// Command-line arguments.
#[derive(Parser, Debug, Clone)]
#[command(name = "stream-assist", about = "Creator tools API backed by a chat-completion provider")]
pub struct Cli {
    /// Bind address.
    #[arg(long, env = "HOST", default_value = "0.0.0.0")]
    pub host: String,

    /// HTTP listen port.
    #[arg(long, env = "PORT", default_value_t = 8080)]
    pub port: u16,

    /// Enable verbose logging.
    #[arg(short, long)]
    pub verbose: bool,

    /// Emit logs as JSON lines.
    #[arg(long, env = "LOG_JSON")]
    pub json_logs: bool,
}

impl Cli {
    /// `host:port` string suitable for `TcpListener::bind`.
    pub fn listen_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Which browser origins may call the API.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum OriginPolicy {
    /// Any origin is accepted.
    #[default]
    Any,
    /// Only the listed origins are accepted.
    List(BTreeSet<String>),
}

impl OriginPolicy {
    /// Parse a comma-separated origin list. Blank input (or a `*` entry)
    /// means unrestricted.
    pub fn parse(raw: Option<&str>) -> Self {
        let Some(raw) = raw.filter(|s| !s.trim().is_empty()) else {
            return Self::Any;
        };

        let origins: BTreeSet<String> = raw
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect();

        if origins.contains("*") {
            Self::Any
        } else {
            Self::List(origins)
        }
    }

    /// Whether a request carrying `origin` may proceed.
    pub fn allows(&self, origin: &str) -> bool {
        match self {
            Self::Any => true,
            Self::List(origins) => origins.contains(origin),
        }
    }
}

/// Upstream chat-completion provider settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpstreamConfig {
    /// Bearer credential. Generation fails without it.
    pub api_key: Option<String>,

    /// Model identifier sent with every request.
    pub model: String,

    /// API root, without a trailing slash.
    pub base_url: String,
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            model: DEFAULT_MODEL.to_string(),
            base_url: DEFAULT_BASE_URL.to_string(),
        }
    }
}

impl UpstreamConfig {
    /// Full URL of the chat-completion endpoint.
    pub fn completions_url(&self) -> String {
        format!("{}/chat/completions", self.base_url)
    }
}

/// Top-level configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Config {
    /// Browser origin policy.
    pub origins: OriginPolicy,

    /// Shared secret expected in `x-api-key`. `None` disables the check.
    pub client_api_key: Option<String>,

    /// Upstream provider settings.
    pub upstream: UpstreamConfig,
}

impl Config {
    /// Load configuration from the process environment, after applying a
    /// `.env` file from the working directory if one exists.
    pub fn from_env() -> Self {
        match dotenvy::dotenv() {
            Ok(path) => tracing::debug!(path = %path.display(), "Loaded .env file"),
            Err(e) if e.not_found() => {}
            Err(e) => tracing::warn!(error = %e, "Failed to read .env file"),
        }

        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary key lookup. Blank values are
    /// treated as absent.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let base_url = get("OPENAI_BASE_URL")
            .map(|url| url.trim_end_matches('/').to_string())
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());

        Self {
            origins: OriginPolicy::parse(get("ALLOWED_ORIGINS").as_deref()),
            client_api_key: get("CLIENT_API_KEY"),
            upstream: UpstreamConfig {
                api_key: get("OPENAI_API_KEY"),
                model: get("OPENAI_MODEL").unwrap_or_else(|| DEFAULT_MODEL.to_string()),
                base_url,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(pairs: &[(&str, &str)]) -> Config {
        let env: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| env.get(key).cloned())
    }

    #[test]
    fn test_default_config() {
        let cfg = config_from(&[]);
        assert_eq!(cfg.origins, OriginPolicy::Any);
        assert_eq!(cfg.client_api_key, None);
        assert_eq!(cfg.upstream.api_key, None);
        assert_eq!(cfg.upstream.model, DEFAULT_MODEL);
        assert_eq!(
            cfg.upstream.completions_url(),
            "https://api.openai.com/v1/chat/completions"
        );
    }

    #[test]
    fn test_blank_values_are_absent() {
        let cfg = config_from(&[
            ("ALLOWED_ORIGINS", "  "),
            ("CLIENT_API_KEY", ""),
            ("OPENAI_API_KEY", " "),
        ]);
        assert_eq!(cfg.origins, OriginPolicy::Any);
        assert_eq!(cfg.client_api_key, None);
        assert_eq!(cfg.upstream.api_key, None);
    }

    #[test]
    fn test_full_config() {
        let cfg = config_from(&[
            ("ALLOWED_ORIGINS", "https://a.example, https://b.example,,"),
            ("CLIENT_API_KEY", "s3cret"),
            ("OPENAI_API_KEY", "sk-test"),
            ("OPENAI_MODEL", "gpt-4o"),
            ("OPENAI_BASE_URL", "http://127.0.0.1:9999/v1/"),
        ]);

        let expected: BTreeSet<String> = ["https://a.example", "https://b.example"]
            .into_iter()
            .map(String::from)
            .collect();
        assert_eq!(cfg.origins, OriginPolicy::List(expected));
        assert_eq!(cfg.client_api_key.as_deref(), Some("s3cret"));
        assert_eq!(cfg.upstream.api_key.as_deref(), Some("sk-test"));
        assert_eq!(cfg.upstream.model, "gpt-4o");
        assert_eq!(
            cfg.upstream.completions_url(),
            "http://127.0.0.1:9999/v1/chat/completions"
        );
    }

    #[test]
    fn test_origin_policy() {
        let policy = OriginPolicy::parse(Some("https://a.example"));
        assert!(policy.allows("https://a.example"));
        assert!(!policy.allows("https://evil.example"));

        assert!(OriginPolicy::parse(None).allows("https://anything.example"));
        assert_eq!(OriginPolicy::parse(Some("https://a.example,*")), OriginPolicy::Any);
    }

    #[test]
    fn test_listen_addr() {
        let cli = Cli::parse_from(["stream-assist", "--host", "127.0.0.1", "--port", "3000"]);
        assert_eq!(cli.listen_addr(), "127.0.0.1:3000");
    }
}
