//! Application configuration loaded from environment variables.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;

use crate::expansion::ExpansionPolicy;
use crate::host_router::HostRoutes;

/// Application configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// Server bind address (e.g., "0.0.0.0:8082").
    pub bind_addr: String,

    /// Base URL for this site (used in canonical URLs and OG tags).
    /// e.g., "https://topics.example.com"
    pub base_url: String,

    /// Site name shown in page titles and headings.
    pub site_name: String,

    /// oEmbed-compatible metadata endpoint queried as `{endpoint}?url=...`.
    pub oembed_endpoint: String,

    /// Transport timeout for a single metadata lookup.
    pub preview_timeout: Duration,

    /// Subdomain-to-page mappings applied before routing.
    pub host_routes: Arc<HostRoutes>,

    /// Initial disclosure state for a fresh page load.
    pub default_expansion: ExpansionPolicy,

    /// Optional taxonomy document to serve instead of the bundled one.
    pub taxonomy_path: Option<PathBuf>,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// Required:
    /// - None (all have defaults for local development)
    ///
    /// Optional:
    /// - `SITE_BIND_ADDR`: Server bind address (default: "0.0.0.0:8082")
    /// - `SITE_BASE_URL`: Base URL for canonical links (default: "http://localhost:8082")
    /// - `SITE_NAME`: Site name (default: "Taxonomy")
    /// - `SITE_OEMBED_ENDPOINT`: Metadata endpoint (default: "https://noembed.com/embed")
    /// - `SITE_PREVIEW_TIMEOUT_SECS`: Lookup timeout in seconds (default: 5)
    /// - `SITE_HOST_ROUTES`: Comma-separated `subdomain=/path` pairs (default: "topics=/taxonomy")
    /// - `SITE_DEFAULT_EXPANSION`: `collapsed`, `expanded` or `first-topic` (default: "first-topic")
    /// - `SITE_TAXONOMY_PATH`: JSON document to load instead of the bundled taxonomy
    pub fn from_env() -> anyhow::Result<Self> {
        let bind_addr =
            std::env::var("SITE_BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:8082".to_string());

        let base_url = std::env::var("SITE_BASE_URL")
            .unwrap_or_else(|_| "http://localhost:8082".to_string())
            .trim_end_matches('/')
            .to_string();

        let site_name = std::env::var("SITE_NAME").unwrap_or_else(|_| "Taxonomy".to_string());

        let oembed_endpoint = std::env::var("SITE_OEMBED_ENDPOINT")
            .unwrap_or_else(|_| "https://noembed.com/embed".to_string());

        let preview_timeout = match std::env::var("SITE_PREVIEW_TIMEOUT_SECS") {
            Ok(raw) => Duration::from_secs(
                raw.trim()
                    .parse()
                    .with_context(|| format!("SITE_PREVIEW_TIMEOUT_SECS is not a number: {raw}"))?,
            ),
            Err(_) => Duration::from_secs(5),
        };

        let host_routes = HostRoutes::parse(
            &std::env::var("SITE_HOST_ROUTES").unwrap_or_else(|_| "topics=/taxonomy".to_string()),
        )
        .context("invalid SITE_HOST_ROUTES")?;

        let default_expansion = match std::env::var("SITE_DEFAULT_EXPANSION") {
            Ok(raw) => raw.parse().context("invalid SITE_DEFAULT_EXPANSION")?,
            Err(_) => ExpansionPolicy::default(),
        };

        let taxonomy_path = std::env::var("SITE_TAXONOMY_PATH")
            .ok()
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .map(PathBuf::from);

        tracing::info!(
            bind_addr = %bind_addr,
            base_url = %base_url,
            site_name = %site_name,
            oembed_endpoint = %oembed_endpoint,
            preview_timeout_secs = preview_timeout.as_secs(),
            host_routes = host_routes.routes().len(),
            default_expansion = %default_expansion,
            taxonomy_path = ?taxonomy_path,
            "site configuration loaded"
        );

        Ok(Self {
            bind_addr,
            base_url,
            site_name,
            oembed_endpoint,
            preview_timeout,
            host_routes: Arc::new(host_routes),
            default_expansion,
            taxonomy_path,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    /// Mutex to serialize config tests that manipulate env vars.
    static ENV_MUTEX: Mutex<()> = Mutex::new(());

    const ENV_KEYS: &[&str] = &[
        "SITE_BIND_ADDR",
        "SITE_BASE_URL",
        "SITE_NAME",
        "SITE_OEMBED_ENDPOINT",
        "SITE_PREVIEW_TIMEOUT_SECS",
        "SITE_HOST_ROUTES",
        "SITE_DEFAULT_EXPANSION",
        "SITE_TAXONOMY_PATH",
    ];

    /// Helper to run config tests with isolated env vars.
    /// Uses a mutex to prevent concurrent env var races.
    fn with_env_vars<F: FnOnce()>(vars: &[(&str, &str)], f: F) {
        let _guard = ENV_MUTEX.lock().unwrap_or_else(|e| e.into_inner());

        let saved: Vec<_> = ENV_KEYS
            .iter()
            .map(|k| (*k, std::env::var(k).ok()))
            .collect();

        // SAFETY: Serialized by mutex; only test code touches these vars.
        unsafe {
            for k in ENV_KEYS {
                std::env::remove_var(k);
            }
            for (k, v) in vars {
                std::env::set_var(k, v);
            }
        }

        f();

        // SAFETY: Restoring original env state.
        unsafe {
            for (k, v) in &saved {
                match v {
                    Some(val) => std::env::set_var(k, val),
                    None => std::env::remove_var(k),
                }
            }
        }
    }

    #[test]
    fn config_defaults() {
        with_env_vars(&[], || {
            let config = Config::from_env().unwrap();
            assert_eq!(config.bind_addr, "0.0.0.0:8082");
            assert_eq!(config.base_url, "http://localhost:8082");
            assert_eq!(config.site_name, "Taxonomy");
            assert_eq!(config.oembed_endpoint, "https://noembed.com/embed");
            assert_eq!(config.preview_timeout, Duration::from_secs(5));
            assert_eq!(config.host_routes.target_for("topics"), Some("/taxonomy"));
            assert_eq!(config.default_expansion, ExpansionPolicy::FirstTopic);
            assert!(config.taxonomy_path.is_none());
        });
    }

    #[test]
    fn config_custom_values() {
        with_env_vars(
            &[
                ("SITE_BIND_ADDR", "127.0.0.1:9090"),
                ("SITE_BASE_URL", "https://topics.example.com"),
                ("SITE_NAME", "Formats"),
                ("SITE_OEMBED_ENDPOINT", "http://oembed.local/embed"),
                ("SITE_PREVIEW_TIMEOUT_SECS", "12"),
                ("SITE_HOST_ROUTES", "topics=/taxonomy,formats=/taxonomy"),
                ("SITE_DEFAULT_EXPANSION", "expanded"),
                ("SITE_TAXONOMY_PATH", "/srv/taxonomy.json"),
            ],
            || {
                let config = Config::from_env().unwrap();
                assert_eq!(config.bind_addr, "127.0.0.1:9090");
                assert_eq!(config.base_url, "https://topics.example.com");
                assert_eq!(config.site_name, "Formats");
                assert_eq!(config.oembed_endpoint, "http://oembed.local/embed");
                assert_eq!(config.preview_timeout, Duration::from_secs(12));
                assert_eq!(config.host_routes.routes().len(), 2);
                assert_eq!(config.default_expansion, ExpansionPolicy::Expanded);
                assert_eq!(
                    config.taxonomy_path,
                    Some(PathBuf::from("/srv/taxonomy.json"))
                );
            },
        );
    }

    #[test]
    fn config_base_url_trailing_slash_stripped() {
        with_env_vars(&[("SITE_BASE_URL", "https://topics.example.com/")], || {
            let config = Config::from_env().unwrap();
            assert_eq!(config.base_url, "https://topics.example.com");
        });
    }

    #[test]
    fn config_empty_host_routes_disables_rewriting() {
        with_env_vars(&[("SITE_HOST_ROUTES", "")], || {
            let config = Config::from_env().unwrap();
            assert!(config.host_routes.is_empty());
        });
    }

    #[test]
    fn config_invalid_timeout_is_error() {
        with_env_vars(&[("SITE_PREVIEW_TIMEOUT_SECS", "soon")], || {
            assert!(Config::from_env().is_err());
        });
    }

    #[test]
    fn config_invalid_policy_is_error() {
        with_env_vars(&[("SITE_DEFAULT_EXPANSION", "sideways")], || {
            assert!(Config::from_env().is_err());
        });
    }

    #[test]
    fn config_invalid_host_routes_is_error() {
        with_env_vars(&[("SITE_HOST_ROUTES", "topics")], || {
            assert!(Config::from_env().is_err());
        });
    }

    #[test]
    fn config_blank_taxonomy_path_ignored() {
        with_env_vars(&[("SITE_TAXONOMY_PATH", "  ")], || {
            let config = Config::from_env().unwrap();
            assert!(config.taxonomy_path.is_none());
        });
    }
}
