//! Subdomain routing.
//!
//! Requests whose `Host` starts with a configured subdomain label are served
//! by a fixed target page, whatever path they asked for:
//!
//! ```text
//! topics.example.com/            -> /taxonomy
//! topics.example.com/a/b?open=1  -> /taxonomy?open=1
//! example.com/a/b                -> /a/b   (no mapping)
//! topics.example.com/_next/x.js  -> /_next/x.js   (asset passthrough)
//! ```
//!
//! Sub-paths under a matched subdomain are collapsed onto the bare target
//! page; the query string is kept.

use std::sync::Arc;

use axum::extract::{Request, State};
use axum::http::{Uri, header};
use axum::middleware::Next;
use axum::response::Response;

/// Paths that are never rewritten (framework internals and static files).
const PASSTHROUGH_PREFIXES: &[&str] = &[
    "/_next/",
    "/static/",
    "/public/",
    "/favicon.ico",
    "/favicon.svg",
    "/robots.txt",
    "/health",
];

/// One subdomain-to-page mapping.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HostRoute {
    /// Leading host label, lower-case (e.g. `topics`).
    pub subdomain: String,
    /// Absolute path of the target page (e.g. `/taxonomy`).
    pub target: String,
}

/// Ordered subdomain mappings. The first match wins.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HostRoutes {
    routes: Vec<HostRoute>,
}

impl HostRoutes {
    /// Routes in match order.
    pub fn new(routes: Vec<HostRoute>) -> Self {
        Self { routes }
    }

    /// Parse `subdomain=/path` pairs separated by commas.
    ///
    /// Blank entries are skipped; an entry without `=`, with an empty
    /// subdomain, or with a target that is not an absolute path is an error.
    pub fn parse(spec: &str) -> anyhow::Result<Self> {
        let mut routes = Vec::new();

        for entry in spec.split(',').map(str::trim).filter(|e| !e.is_empty()) {
            let Some((subdomain, target)) = entry.split_once('=') else {
                anyhow::bail!("host route '{entry}' must look like subdomain=/path");
            };

            let subdomain = subdomain.trim().to_ascii_lowercase();
            let target = target.trim();

            if subdomain.is_empty() || subdomain.contains('.') {
                anyhow::bail!("host route '{entry}' needs a single subdomain label");
            }
            if !target.starts_with('/') {
                anyhow::bail!("host route '{entry}' target must start with '/'");
            }

            routes.push(HostRoute {
                subdomain,
                target: target.to_string(),
            });
        }

        Ok(Self { routes })
    }

    pub fn routes(&self) -> &[HostRoute] {
        &self.routes
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }

    /// Target page for a subdomain label.
    pub fn target_for(&self, subdomain: &str) -> Option<&str> {
        self.routes
            .iter()
            .find(|r| r.subdomain.eq_ignore_ascii_case(subdomain))
            .map(|r| r.target.as_str())
    }

    /// Decide whether a request for `path` on `host` is rewritten.
    ///
    /// Returns the new path, or `None` when the request passes through.
    pub fn rewrite(&self, host: Option<&str>, path: &str) -> Option<String> {
        let label = subdomain(host?)?;
        let target = self.target_for(label)?;

        if is_passthrough(path) || path == target {
            return None;
        }

        Some(target.to_string())
    }
}

/// Leading label of a host header value, with any port removed.
pub fn subdomain(host: &str) -> Option<&str> {
    let host = host.trim();
    let without_port = host.rsplit_once(':').map_or(host, |(name, port)| {
        if port.chars().all(|c| c.is_ascii_digit()) {
            name
        } else {
            host
        }
    });

    let label = without_port.split('.').next()?;
    (!label.is_empty()).then_some(label)
}

/// Whether `path` is an asset or internal path that must never be rewritten.
pub fn is_passthrough(path: &str) -> bool {
    PASSTHROUGH_PREFIXES.iter().any(|prefix| match prefix.strip_suffix('/') {
        Some(dir) => path == dir || path.starts_with(prefix),
        None => path
            .strip_prefix(prefix)
            .is_some_and(|rest| rest.is_empty() || rest.starts_with('/')),
    })
}

/// Replace the path of `uri`, keeping its query string.
fn with_path(uri: &Uri, path: &str) -> Result<Uri, axum::http::Error> {
    let path_and_query = match uri.query() {
        Some(query) => format!("{path}?{query}"),
        None => path.to_string(),
    };

    let mut parts = uri.clone().into_parts();
    parts.path_and_query = Some(path_and_query.parse()?);
    Ok(Uri::from_parts(parts)?)
}

/// Middleware that applies [`HostRoutes::rewrite`] before routing.
///
/// Must wrap the routed service (see [`crate::routes::app`]); as a plain
/// route layer it would run after the route was already chosen.
pub async fn rewrite_host(
    State(routes): State<Arc<HostRoutes>>,
    mut request: Request,
    next: Next,
) -> Response {
    let host = request
        .headers()
        .get(header::HOST)
        .and_then(|value| value.to_str().ok())
        .or_else(|| request.uri().host())
        .map(str::to_string);

    if let Some(target) = routes.rewrite(host.as_deref(), request.uri().path()) {
        match with_path(request.uri(), &target) {
            Ok(uri) => {
                tracing::debug!(
                    host = host.as_deref().unwrap_or_default(),
                    from = %request.uri().path(),
                    to = %target,
                    "host route rewrite"
                );
                *request.uri_mut() = uri;
            }
            Err(e) => tracing::warn!(error = %e, target = %target, "invalid rewrite target"),
        }
    }

    next.run(request).await
}
