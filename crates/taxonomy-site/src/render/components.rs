//! Shared HTML components used across all pages.
//!
//! These are maud functions that return `Markup` fragments for composition
//! into full pages.

use maud::{Markup, PreEscaped, html};

/// Inline CSS for all pages.
///
/// Flat design, spacing and subtle borders for hierarchy. Icons are inline
/// SVG (Phosphor).
pub const PAGE_CSS: &str = r#"
*{margin:0;padding:0;box-sizing:border-box}
:root{--bg:#fafafa;--fg:#111;--fg2:#555;--fg3:#999;--accent:#9900CC;--accent-hover:#7a00a3;--surface:#fff;--border:rgba(153,0,204,.15);--mono:"SF Mono",SFMono-Regular,ui-monospace,Menlo,monospace}
body{font-family:Inter,-apple-system,BlinkMacSystemFont,"Segoe UI",Roboto,sans-serif;line-height:1.6;color:var(--fg);background:var(--bg);min-height:100vh;display:flex;flex-direction:column;align-items:center;padding:1.5rem 1rem}
main{max-width:760px;width:100%;flex:1}
a{color:var(--accent);text-decoration:none}
a:hover{text-decoration:underline}
img{max-width:100%;height:auto}
svg.icon{width:20px;height:20px;fill:currentColor;stroke:none;vertical-align:-3px;flex-shrink:0}

.page-title{font-size:1.75rem;font-weight:700;letter-spacing:-.02em;margin-bottom:.25rem}
.page-lede{color:var(--fg2);margin-bottom:1.25rem}

.topics{list-style:none;display:flex;flex-direction:column;gap:.75rem}
.topic{border:1px solid var(--border);border-radius:10px;padding:.85rem 1.1rem}
.subtypes{list-style:none;margin:.5rem 0 0 1.5rem;display:flex;flex-direction:column;gap:.35rem}
.examples{list-style:none;margin:.5rem 0 .25rem 1.5rem;display:flex;flex-direction:column;gap:.5rem}
.disclosure{display:flex;align-items:center;gap:.45rem;color:var(--fg);font-weight:600}
.disclosure:hover{text-decoration:none;color:var(--accent)}
.disclosure svg.icon{width:14px;height:14px;color:var(--fg3);transition:transform .15s}
.disclosure[aria-expanded="true"] svg.icon{transform:rotate(90deg)}
.topic>.disclosure{font-size:1.15rem}
.subtype>.disclosure{font-size:1rem;font-weight:500}
.count{font-size:.75rem;color:var(--fg3);font-weight:400}
.empty{font-size:.9rem;color:var(--fg3);font-style:italic;margin:.35rem 0 0 1.5rem}

.example-link{font-size:.9rem;word-break:break-all}
.example-card{display:flex;gap:.85rem;align-items:center;padding:.5rem;border:1px solid var(--border);border-radius:8px;color:var(--fg);transition:border-color .15s}
.example-card:hover{border-color:var(--accent);text-decoration:none}
.example-card .video-thumb{width:160px;flex-shrink:0;margin:0}
.example-thumb{width:160px;flex-shrink:0;aspect-ratio:16/9;object-fit:cover;border-radius:6px}
.example-meta{min-width:0;display:flex;flex-direction:column}
.example-title{font-weight:600;font-size:.95rem;line-height:1.35}
.example-host{font-family:var(--mono);font-size:.75rem;color:var(--fg3);overflow:hidden;text-overflow:ellipsis;white-space:nowrap}

.video-thumb{position:relative;width:100%;aspect-ratio:16/9;overflow:hidden;background:#000;border-radius:6px}
.video-thumb img{width:100%;height:100%;object-fit:cover}
.video-play{position:absolute;inset:0;display:flex;align-items:center;justify-content:center;background:rgba(0,0,0,.25)}
.video-play::after{content:"";width:0;height:0;border-style:solid;border-width:12px 0 12px 20px;border-color:transparent transparent transparent #fff;filter:drop-shadow(0 1px 3px rgba(0,0,0,.3))}

.footer{text-align:center;margin-top:1rem;padding-top:.75rem;font-size:.8rem;color:var(--fg3);letter-spacing:.01em;width:100%;max-width:760px;display:flex;align-items:center;justify-content:center;gap:.25rem}
.footer a{color:var(--accent);text-decoration:none}
.footer a:hover{text-decoration:underline}

@media(prefers-color-scheme:dark){
:root{--bg:#0a0a0f;--fg:#e5e5e5;--fg2:#a0a0a0;--fg3:#666;--accent:#d946ef;--accent-hover:#e879f9;--surface:#111118;--border:rgba(191,0,255,.2)}
}
"#;

/// Inline CSS for error pages.
pub const ERROR_CSS: &str = r#"
*{margin:0;padding:0;box-sizing:border-box}
body{font-family:-apple-system,BlinkMacSystemFont,"Segoe UI",Roboto,sans-serif;display:flex;justify-content:center;align-items:center;min-height:100vh;background:#fafafa;color:#1a1a2e;padding:1rem}
.error-page{text-align:center;max-width:400px}
.error-page h1{font-size:1.5rem;margin-bottom:.75rem}
.error-page p{color:#666;margin-bottom:1rem;line-height:1.5}
.error-page a{color:#6c5ce7}
@media(prefers-color-scheme:dark){
body{background:#0f0f17;color:#e0e0e8}
.error-page p{color:#aaa}
.error-page a{color:#a29bfe}
}
"#;

/// Content-Security-Policy header value.
///
/// No scripts at all; disclosure controls are plain links. Thumbnails are
/// loaded from the metadata provider's HTTPS image hosts.
pub const CSP_HEADER: &str = "default-src 'none'; style-src 'unsafe-inline'; img-src https: data:; form-action 'none'; frame-ancestors 'none'";

/// Caret icon (Phosphor caret-right, fill), rotated when expanded.
pub const ICON_CARET: &str = r#"<svg class="icon" viewBox="0 0 256 256"><path d="M181.66,133.66l-80,80A8,8,0,0,1,88,208V48a8,8,0,0,1,13.66-5.66l80,80A8,8,0,0,1,181.66,133.66Z"/></svg>"#;

/// Arrow square out icon (Phosphor arrow-square-out, fill)
pub const ICON_EXTERNAL: &str = r#"<svg class="icon" viewBox="0 0 256 256"><path d="M228,104a12,12,0,0,1-24,0V69l-59.51,59.51a12,12,0,0,1-17-17L187,52H152a12,12,0,0,1,0-24h64a12,12,0,0,1,12,12Zm-44,44a12,12,0,0,0-12,12v52H52V92h52a12,12,0,0,0,0-24H48A20,20,0,0,0,28,88V216a20,20,0,0,0,20,20H176a20,20,0,0,0,20-20V160A12,12,0,0,0,184,148Z"/></svg>"#;

/// Open Graph metadata for a page.
pub struct OpenGraphData<'a> {
    /// OG title.
    pub title: &'a str,
    /// OG description.
    pub description: &'a str,
    /// OG type (e.g., "website").
    pub og_type: &'a str,
}

/// Render the full HTML page shell with `<head>`, OG tags, and body content.
pub fn page_shell(
    title: &str,
    description: &str,
    canonical_url: &str,
    og: OpenGraphData<'_>,
    body_content: Markup,
    site_name: &str,
) -> Markup {
    html! {
        (maud::DOCTYPE)
        html lang="en" {
            head {
                meta charset="utf-8";
                meta name="viewport" content="width=device-width, initial-scale=1";
                title { (title) }
                meta name="description" content=(description);
                link rel="canonical" href=(canonical_url);

                meta property="og:title" content=(og.title);
                meta property="og:description" content=(og.description);
                meta property="og:url" content=(canonical_url);
                meta property="og:site_name" content=(site_name);
                meta property="og:type" content=(og.og_type);

                style { (PreEscaped(PAGE_CSS)) }
            }
            body {
                main { (body_content) }
                footer class="footer" {
                    (site_name)
                    " · "
                    a href="/taxonomy.json" { "JSON" }
                }
            }
        }
    }
}

/// Check if a URL is safe to use in `src` or `href` attributes.
pub fn is_safe_url(url: &str) -> bool {
    url.starts_with("https://") || url.starts_with("http://")
}

/// Truncate a string to a maximum length, appending "..." if truncated.
pub fn truncate(s: &str, max_len: usize) -> String {
    if s.len() <= max_len {
        s.to_string()
    } else {
        let mut end = max_len;
        while !s.is_char_boundary(end) && end > 0 {
            end -= 1;
        }
        format!("{}...", &s[..end])
    }
}

/// Strip the scheme from a URL and cap it for display.
pub fn display_url(url: &str) -> String {
    let display = url
        .strip_prefix("https://")
        .or_else(|| url.strip_prefix("http://"))
        .unwrap_or(url);

    truncate(display, 60)
}

/// Host part of an http(s) URL, without any `www.` prefix.
pub fn url_host(url: &str) -> Option<&str> {
    let rest = url
        .strip_prefix("https://")
        .or_else(|| url.strip_prefix("http://"))?;
    let host = rest.split(['/', '?', '#']).next()?;
    let host = host.rsplit_once('@').map_or(host, |(_, h)| h);
    let host = host.split(':').next()?;
    let host = host.strip_prefix("www.").unwrap_or(host);

    (!host.is_empty()).then_some(host)
}
