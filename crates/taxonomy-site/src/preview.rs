//! Link previews via an oEmbed-compatible metadata service.
//!
//! Each visible example URL gets its own lookup:
//!
//! ```text
//! GET {endpoint}?url={encoded example url}
//! ```
//!
//! A well-formed JSON body yields a title (falling back to the URL) and an
//! optional thumbnail. Every failure collapses into [`PreviewResult::Failed`],
//! which renders as a plain link; nothing here returns an error to the caller.
//!
//! [`PreviewBoard`] holds the preview slots of one view. Lookups run as tasks
//! on the board's `JoinSet`; discarding a slot aborts its task, and a result
//! that arrives for a slot that is gone (or was re-issued) is dropped.

use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use serde::Deserialize;
use tokio::task::{AbortHandle, JoinSet};

use crate::expansion::SubtypeKey;
use crate::render::components::is_safe_url;

/// Outcome of a metadata lookup for one example URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PreviewResult {
    /// Lookup still in flight.
    Pending,
    /// Metadata found.
    Resolved {
        title: String,
        thumbnail_url: Option<String>,
    },
    /// Lookup failed; render a plain link.
    Failed,
}

impl PreviewResult {
    pub fn is_pending(&self) -> bool {
        matches!(self, Self::Pending)
    }
}

/// Something that can turn a URL into a [`PreviewResult`].
///
/// Implementations must be infallible: failures are reported as
/// [`PreviewResult::Failed`].
pub trait PreviewResolver: Clone + Send + Sync + 'static {
    fn resolve(&self, url: &str) -> impl Future<Output = PreviewResult> + Send;
}

/// oEmbed response body. Only the fields we display are read.
#[derive(Debug, Deserialize)]
struct OembedBody {
    title: Option<String>,
    thumbnail_url: Option<String>,
    /// noembed-style proxies answer 200 with an `error` field for unsupported URLs.
    error: Option<serde_json::Value>,
}

/// Interpret an oEmbed response body for `url`.
fn interpret_body(url: &str, body: &[u8]) -> PreviewResult {
    let parsed: OembedBody = match serde_json::from_slice(body) {
        Ok(parsed) => parsed,
        Err(e) => {
            tracing::debug!(url = %url, error = %e, "malformed oembed body");
            return PreviewResult::Failed;
        }
    };

    if let Some(error) = parsed.error {
        tracing::debug!(url = %url, error = %error, "oembed provider reported an error");
        return PreviewResult::Failed;
    }

    let title = parsed
        .title
        .map(|t| t.trim().to_string())
        .filter(|t| !t.is_empty())
        .unwrap_or_else(|| url.to_string());

    let thumbnail_url = parsed
        .thumbnail_url
        .filter(|u| is_safe_url(u));

    PreviewResult::Resolved {
        title,
        thumbnail_url,
    }
}

/// HTTP resolver against an oEmbed endpoint.
#[derive(Debug, Clone)]
pub struct OembedResolver {
    client: reqwest::Client,
    endpoint: Arc<str>,
}

impl OembedResolver {
    /// Build a resolver for `endpoint` with the given transport timeout.
    pub fn new(endpoint: &str, timeout: Duration) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(concat!("taxonomy-site/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            client,
            endpoint: Arc::from(endpoint),
        })
    }

    /// The metadata endpoint this resolver queries.
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    async fn lookup(&self, url: &str) -> PreviewResult {
        let response = match self
            .client
            .get(&*self.endpoint)
            .query(&[("url", url)])
            .send()
            .await
        {
            Ok(response) => response,
            Err(e) => {
                tracing::debug!(url = %url, error = %e, "oembed request failed");
                return PreviewResult::Failed;
            }
        };

        let status = response.status();
        if !status.is_success() {
            tracing::debug!(url = %url, status = %status, "oembed lookup returned non-success");
            return PreviewResult::Failed;
        }

        match response.bytes().await {
            Ok(body) => interpret_body(url, &body),
            Err(e) => {
                tracing::debug!(url = %url, error = %e, "failed to read oembed body");
                PreviewResult::Failed
            }
        }
    }
}

impl PreviewResolver for OembedResolver {
    fn resolve(&self, url: &str) -> impl Future<Output = PreviewResult> + Send {
        self.lookup(url)
    }
}

/// Position of one example link in the display-ordered taxonomy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ExampleKey {
    pub topic: usize,
    pub subtype: usize,
    pub example: usize,
}

impl ExampleKey {
    pub fn new(topic: usize, subtype: usize, example: usize) -> Self {
        Self {
            topic,
            subtype,
            example,
        }
    }

    /// The subtype this example belongs to.
    pub fn subtype_key(&self) -> SubtypeKey {
        SubtypeKey::new(self.topic, self.subtype)
    }
}

/// A finished lookup, tagged with the ticket of the slot that issued it.
#[derive(Debug)]
pub struct Completion {
    key: ExampleKey,
    ticket: u64,
    result: PreviewResult,
}

#[derive(Debug)]
struct Slot {
    ticket: u64,
    result: PreviewResult,
    task: Option<AbortHandle>,
}

/// Preview slots for one view.
///
/// Dropping the board aborts every lookup still in flight.
#[derive(Debug, Default)]
pub struct PreviewBoard {
    slots: HashMap<ExampleKey, Slot>,
    tasks: JoinSet<Completion>,
    next_ticket: u64,
}

impl PreviewBoard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a lookup for `url` in slot `key`.
    ///
    /// Any lookup already issued for `key` is discarded first, so only the
    /// newest one can land.
    pub fn watch<R: PreviewResolver>(&mut self, key: ExampleKey, url: &str, resolver: &R) {
        self.discard(key);

        let ticket = self.next_ticket;
        self.next_ticket += 1;

        let resolver = resolver.clone();
        let url = url.to_string();
        let task = self.tasks.spawn(async move {
            let result = resolver.resolve(&url).await;
            Completion {
                key,
                ticket,
                result,
            }
        });

        self.slots.insert(
            key,
            Slot {
                ticket,
                result: PreviewResult::Pending,
                task: Some(task),
            },
        );
    }

    /// Drop the slot for `key`, aborting its lookup.
    pub fn discard(&mut self, key: ExampleKey) {
        if let Some(slot) = self.slots.remove(&key)
            && let Some(task) = slot.task
        {
            task.abort();
        }
    }

    /// Drop every slot under one subtype.
    pub fn discard_subtype(&mut self, subtype: SubtypeKey) {
        self.discard_where(|key| key.subtype_key() == subtype);
    }

    /// Drop every slot under one topic.
    pub fn discard_topic(&mut self, topic: usize) {
        self.discard_where(|key| key.topic == topic);
    }

    fn discard_where(&mut self, predicate: impl Fn(&ExampleKey) -> bool) {
        let doomed: Vec<ExampleKey> = self.slots.keys().copied().filter(predicate).collect();
        for key in doomed {
            self.discard(key);
        }
    }

    /// Apply a finished lookup.
    ///
    /// Returns `false` when the slot is gone, was re-issued, or already holds
    /// an outcome; the board is left untouched in that case.
    pub fn apply(&mut self, completion: Completion) -> bool {
        match self.slots.get_mut(&completion.key) {
            Some(slot) if slot.ticket == completion.ticket && slot.result.is_pending() => {
                slot.result = completion.result;
                slot.task = None;
                true
            }
            _ => {
                tracing::debug!(
                    key = ?completion.key,
                    ticket = completion.ticket,
                    "dropping stale preview result"
                );
                false
            }
        }
    }

    /// Wait for every outstanding lookup and apply the live ones.
    pub async fn settle(&mut self) {
        while let Some(joined) = self.tasks.join_next().await {
            match joined {
                Ok(completion) => {
                    self.apply(completion);
                }
                Err(e) if e.is_cancelled() => {}
                Err(e) => tracing::warn!(error = %e, "preview lookup task failed"),
            }
        }
    }

    /// Current result for `key`, if the slot exists.
    pub fn get(&self, key: ExampleKey) -> Option<&PreviewResult> {
        self.slots.get(&key).map(|slot| &slot.result)
    }

    pub fn contains(&self, key: ExampleKey) -> bool {
        self.slots.contains_key(&key)
    }

    /// Number of live slots.
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap as Map;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use axum::Router;
    use axum::extract::Query;
    use axum::http::StatusCode;
    use axum::routing::get;

    // -- interpret_body() tests --

    #[test]
    fn body_with_title_and_thumbnail() {
        let body = br#"{"title":"A talk","thumbnail_url":"https://i.ytimg.com/vi/x/hq.jpg"}"#;
        assert_eq!(
            interpret_body("https://youtu.be/x", body),
            PreviewResult::Resolved {
                title: "A talk".to_string(),
                thumbnail_url: Some("https://i.ytimg.com/vi/x/hq.jpg".to_string()),
            }
        );
    }

    #[test]
    fn body_without_title_falls_back_to_url() {
        let body = br#"{"type":"video"}"#;
        assert_eq!(
            interpret_body("https://vimeo.com/1", body),
            PreviewResult::Resolved {
                title: "https://vimeo.com/1".to_string(),
                thumbnail_url: None,
            }
        );
    }

    #[test]
    fn blank_title_falls_back_to_url() {
        let body = br#"{"title":"   "}"#;
        assert!(matches!(
            interpret_body("https://a.example", body),
            PreviewResult::Resolved { title, .. } if title == "https://a.example"
        ));
    }

    #[test]
    fn unsafe_thumbnail_dropped() {
        let body = br#"{"title":"t","thumbnail_url":"javascript:alert(1)"}"#;
        assert!(matches!(
            interpret_body("https://a.example", body),
            PreviewResult::Resolved { thumbnail_url: None, .. }
        ));
    }

    #[test]
    fn provider_error_is_failure() {
        let body = br#"{"error":"no matching providers found","url":"https://a.example"}"#;
        assert_eq!(interpret_body("https://a.example", body), PreviewResult::Failed);
    }

    #[test]
    fn malformed_body_is_failure() {
        assert_eq!(interpret_body("https://a.example", b"<html>"), PreviewResult::Failed);
        assert_eq!(interpret_body("https://a.example", b""), PreviewResult::Failed);
        assert_eq!(interpret_body("https://a.example", b"[1,2]"), PreviewResult::Failed);
    }

    // -- OembedResolver against a local endpoint --

    async fn spawn_endpoint(router: Router) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });
        format!("http://{addr}/oembed")
    }

    fn resolver(endpoint: &str) -> OembedResolver {
        OembedResolver::new(endpoint, Duration::from_secs(5)).unwrap()
    }

    #[tokio::test]
    async fn resolver_passes_url_as_query_parameter() {
        let router = Router::new().route(
            "/oembed",
            get(|Query(params): Query<Map<String, String>>| async move {
                let url = params.get("url").cloned().unwrap_or_default();
                axum::Json(serde_json::json!({
                    "title": format!("echo {url}"),
                    "thumbnail_url": "https://img.example/thumb.jpg",
                }))
            }),
        );
        let endpoint = spawn_endpoint(router).await;

        let target = "https://www.youtube.com/watch?v=abc&t=10s";
        let result = resolver(&endpoint).resolve(target).await;
        assert_eq!(
            result,
            PreviewResult::Resolved {
                title: format!("echo {target}"),
                thumbnail_url: Some("https://img.example/thumb.jpg".to_string()),
            }
        );
    }

    #[tokio::test]
    async fn resolver_non_success_status_is_failure() {
        let router = Router::new().route(
            "/oembed",
            get(|| async { (StatusCode::NOT_FOUND, r#"{"title":"nope"}"#) }),
        );
        let endpoint = spawn_endpoint(router).await;

        let result = resolver(&endpoint).resolve("https://a.example").await;
        assert_eq!(result, PreviewResult::Failed);
    }

    #[tokio::test]
    async fn resolver_malformed_body_is_failure() {
        let router = Router::new().route("/oembed", get(|| async { "not json" }));
        let endpoint = spawn_endpoint(router).await;

        let result = resolver(&endpoint).resolve("https://a.example").await;
        assert_eq!(result, PreviewResult::Failed);
    }

    #[tokio::test]
    async fn resolver_connection_refused_is_failure() {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let result = resolver(&format!("http://{addr}/oembed"))
            .resolve("https://a.example")
            .await;
        assert_eq!(result, PreviewResult::Failed);
    }

    #[tokio::test]
    async fn resolver_performs_one_request_per_call() {
        let hits = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&hits);
        let router = Router::new().route(
            "/oembed",
            get(move || {
                let counter = Arc::clone(&counter);
                async move {
                    counter.fetch_add(1, Ordering::SeqCst);
                    r#"{"title":"t"}"#
                }
            }),
        );
        let endpoint = spawn_endpoint(router).await;
        let resolver = resolver(&endpoint);

        resolver.resolve("https://a.example").await;
        resolver.resolve("https://a.example").await;
        assert_eq!(hits.load(Ordering::SeqCst), 2);
    }

    // -- PreviewBoard tests --

    /// Resolves every URL to a title equal to the URL.
    #[derive(Clone)]
    struct Echo;

    impl PreviewResolver for Echo {
        fn resolve(&self, url: &str) -> impl Future<Output = PreviewResult> + Send {
            let title = url.to_string();
            async move {
                PreviewResult::Resolved {
                    title,
                    thumbnail_url: None,
                }
            }
        }
    }

    /// Never completes.
    #[derive(Clone)]
    struct Stalled;

    impl PreviewResolver for Stalled {
        fn resolve(&self, _url: &str) -> impl Future<Output = PreviewResult> + Send {
            std::future::pending()
        }
    }

    #[tokio::test]
    async fn settle_applies_results() {
        let mut board = PreviewBoard::new();
        let a = ExampleKey::new(0, 0, 0);
        let b = ExampleKey::new(0, 0, 1);
        board.watch(a, "https://a.example", &Echo);
        board.watch(b, "https://b.example", &Echo);
        assert_eq!(board.get(a), Some(&PreviewResult::Pending));

        board.settle().await;

        assert!(matches!(
            board.get(a),
            Some(PreviewResult::Resolved { title, .. }) if title == "https://a.example"
        ));
        assert!(matches!(
            board.get(b),
            Some(PreviewResult::Resolved { title, .. }) if title == "https://b.example"
        ));
    }

    #[tokio::test]
    async fn discarded_lookup_never_lands() {
        let mut board = PreviewBoard::new();
        let key = ExampleKey::new(1, 2, 0);
        board.watch(key, "https://a.example", &Stalled);

        board.discard_subtype(SubtypeKey::new(1, 2));
        board.settle().await;

        assert!(board.get(key).is_none());
        assert!(board.is_empty());
    }

    #[tokio::test]
    async fn late_completion_for_discarded_slot_is_ignored() {
        let mut board = PreviewBoard::new();
        let key = ExampleKey::new(0, 0, 0);
        board.watch(key, "https://a.example", &Stalled);
        board.discard(key);

        let late = Completion {
            key,
            ticket: 0,
            result: PreviewResult::Failed,
        };
        assert!(!board.apply(late));
        assert!(board.get(key).is_none());
    }

    #[tokio::test]
    async fn completion_from_reissued_slot_is_ignored() {
        let mut board = PreviewBoard::new();
        let key = ExampleKey::new(0, 0, 0);
        board.watch(key, "https://a.example", &Stalled);
        board.watch(key, "https://a.example", &Stalled);

        let stale = Completion {
            key,
            ticket: 0,
            result: PreviewResult::Failed,
        };
        assert!(!board.apply(stale));
        assert_eq!(board.get(key), Some(&PreviewResult::Pending));

        let fresh = Completion {
            key,
            ticket: 1,
            result: PreviewResult::Failed,
        };
        assert!(board.apply(fresh));
        assert_eq!(board.get(key), Some(&PreviewResult::Failed));
    }

    #[tokio::test]
    async fn outcome_applied_at_most_once() {
        let mut board = PreviewBoard::new();
        let key = ExampleKey::new(0, 0, 0);
        board.watch(key, "https://a.example", &Stalled);

        let first = Completion {
            key,
            ticket: 0,
            result: PreviewResult::Failed,
        };
        let second = Completion {
            key,
            ticket: 0,
            result: PreviewResult::Resolved {
                title: "late".to_string(),
                thumbnail_url: None,
            },
        };
        assert!(board.apply(first));
        assert!(!board.apply(second));
        assert_eq!(board.get(key), Some(&PreviewResult::Failed));
    }

    #[tokio::test]
    async fn discard_topic_only_touches_that_topic() {
        let mut board = PreviewBoard::new();
        board.watch(ExampleKey::new(0, 0, 0), "https://a.example", &Stalled);
        board.watch(ExampleKey::new(0, 1, 0), "https://b.example", &Stalled);
        board.watch(ExampleKey::new(1, 0, 0), "https://c.example", &Stalled);

        board.discard_topic(0);

        assert_eq!(board.len(), 1);
        assert!(board.contains(ExampleKey::new(1, 0, 0)));
    }
}
