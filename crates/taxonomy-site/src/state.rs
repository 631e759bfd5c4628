//! Application state shared across all request handlers.

use std::sync::Arc;

use crate::config::Config;
use crate::preview::OembedResolver;
use crate::taxonomy::Taxonomy;

/// Shared application state available to all request handlers.
///
/// Holds nothing per visitor: expansion state travels in the query string
/// and preview results live only as long as the request that fetched them.
#[derive(Clone)]
pub struct AppState {
    /// Application configuration.
    pub config: Arc<Config>,

    /// The taxonomy being served. Read-only after startup.
    pub taxonomy: Arc<Taxonomy>,

    /// Metadata resolver used for example previews.
    pub resolver: OembedResolver,
}

impl AppState {
    /// Create a new application state from configuration.
    pub fn new(config: Config, taxonomy: Arc<Taxonomy>) -> anyhow::Result<Self> {
        let resolver = OembedResolver::new(&config.oembed_endpoint, config.preview_timeout)?;

        tracing::info!(
            topics = taxonomy.len(),
            oembed_endpoint = %resolver.endpoint(),
            "application state initialized"
        );

        Ok(Self {
            config: Arc::new(config),
            taxonomy,
            resolver,
        })
    }
}
