//! Example link renderer.
//!
//! A resolved preview becomes a card with thumbnail and title; anything else
//! (pending, failed, or an unsafe URL) falls back to a plain link.

use maud::{Markup, PreEscaped, html};

use super::components::{ICON_EXTERNAL, display_url, is_safe_url, truncate, url_host};
use crate::preview::PreviewResult;

/// Hosts whose links are videos.
const VIDEO_HOSTS: &[&str] = &[
    "youtube.com",
    "m.youtube.com",
    "youtu.be",
    "vimeo.com",
    "player.vimeo.com",
    "dailymotion.com",
    "dai.ly",
    "twitch.tv",
    "tiktok.com",
    "loom.com",
];

/// Video file extensions.
const VIDEO_EXTENSIONS: &[&str] = &[".mp4", ".webm", ".mov", ".m4v"];

/// Check if a URL points to a video (known host or video file).
pub fn is_video_url(url: &str) -> bool {
    if url_host(url).is_some_and(|host| {
        let host = host.to_ascii_lowercase();
        VIDEO_HOSTS.contains(&host.as_str())
    }) {
        return true;
    }

    let lower = url.to_lowercase();
    let path = lower.split(['?', '#']).next().unwrap_or(&lower);
    VIDEO_EXTENSIONS.iter().any(|ext| path.ends_with(ext))
}

/// Render one example entry.
pub fn render(url: &str, preview: &PreviewResult) -> Markup {
    if !is_safe_url(url) {
        return html! {
            span class="example-link" { (url) }
        };
    }

    match preview {
        PreviewResult::Resolved {
            title,
            thumbnail_url,
        } => card(url, title, thumbnail_url.as_deref()),
        PreviewResult::Pending | PreviewResult::Failed => plain_link(url),
    }
}

fn plain_link(url: &str) -> Markup {
    html! {
        a class="example-link" href=(url) target="_blank" rel="noopener noreferrer" {
            (display_url(url))
            (PreEscaped(ICON_EXTERNAL))
        }
    }
}

fn card(url: &str, title: &str, thumbnail: Option<&str>) -> Markup {
    let title = truncate(title, 140);
    let host = url_host(url).unwrap_or(url);

    html! {
        a class="example-card" href=(url) target="_blank" rel="noopener noreferrer" {
            @if let Some(thumb) = thumbnail.filter(|u| is_safe_url(u)) {
                @if is_video_url(url) {
                    div class="video-thumb" {
                        img src=(thumb) alt=(title) loading="lazy";
                        div class="video-play" {}
                    }
                } @else {
                    img class="example-thumb" src=(thumb) alt=(title) loading="lazy";
                }
            }
            div class="example-meta" {
                span class="example-title" { (title) }
                span class="example-host" { (host) }
            }
        }
    }
}
