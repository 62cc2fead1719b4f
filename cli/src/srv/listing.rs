//! # devsrv Directory Listing
//!
//! File: cli/src/srv/listing.rs
//!
//! ## Overview
//!
//! `ServeDir` answers requests for files and for directories that contain an
//! `index.html`. Everything it cannot find lands here. For a directory URL
//! (one ending in `/`) without an index this handler renders a plain HTML
//! index of the directory's entries, one link per line, directories suffixed
//! with `/`. Any other request gets a 404.
//!
//! The URL path is decoded and re-checked against the root on its own: `..`
//! segments are refused and the canonical directory must still live below the
//! root, so a symlink pointing outside the served tree is not listed.
//!
use super::handler::ServerContext;
use axum::{
    extract::State,
    http::{header, StatusCode, Uri},
    response::{IntoResponse, Response},
};
use percent_encoding::{percent_decode_str, utf8_percent_encode, AsciiSet, CONTROLS};
use std::path::{Component, Path, PathBuf};
use std::sync::Arc;
use tracing::debug;

/// Characters escaped in the `href` of a listing entry.
const HREF_ESCAPE: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'%')
    .add(b':')
    .add(b'<')
    .add(b'>')
    .add(b'?')
    .add(b'`')
    .add(b'{')
    .add(b'}');

/// One row of a listing.
#[derive(Debug)]
struct Entry {
    name: String,
    is_dir: bool,
}

/// # List Directory (`list_directory`)
///
/// Fallback for `ServeDir`. Renders the listing of the requested directory,
/// or 404 when the path is not a directory inside the root.
pub async fn list_directory(State(ctx): State<Arc<ServerContext>>, uri: Uri) -> Response {
    let Some(dir) = resolve_listing_dir(&ctx.root, uri.path()).await else {
        return StatusCode::NOT_FOUND.into_response();
    };

    match read_entries(&dir).await {
        Ok(entries) => {
            debug!("Listing {} ({} entries)", dir.display(), entries.len());
            (
                [(header::CONTENT_TYPE, "text/html; charset=utf-8")],
                render_listing(&entries),
            )
                .into_response()
        }
        Err(e) => {
            debug!("Could not list {}: {}", dir.display(), e);
            StatusCode::NOT_FOUND.into_response()
        }
    }
}

/// Maps a request path onto a directory below `root`, if it names one.
async fn resolve_listing_dir(root: &Path, url_path: &str) -> Option<PathBuf> {
    if !url_path.ends_with('/') {
        return None;
    }
    let relative = decode_url_path(url_path)?;

    let canonical = tokio::fs::canonicalize(root.join(relative)).await.ok()?;
    let canonical_root = tokio::fs::canonicalize(root).await.ok()?;
    if !canonical.starts_with(&canonical_root) {
        return None;
    }

    let metadata = tokio::fs::metadata(&canonical).await.ok()?;
    metadata.is_dir().then_some(canonical)
}

/// Percent-decodes `url_path` into a relative path. `None` for anything that
/// could step outside the root.
fn decode_url_path(url_path: &str) -> Option<PathBuf> {
    let decoded = percent_decode_str(url_path).decode_utf8().ok()?;

    let mut relative = PathBuf::new();
    for segment in decoded.split('/') {
        match segment {
            "" | "." => {}
            ".." => return None,
            s if s.contains('\\') || s.contains('\0') => return None,
            s => relative.push(s),
        }
    }

    // A segment like `C:` would still be a prefix on Windows.
    relative
        .components()
        .all(|c| matches!(c, Component::Normal(_)))
        .then_some(relative)
}

/// Reads `dir`, sorted by name.
async fn read_entries(dir: &Path) -> std::io::Result<Vec<Entry>> {
    let mut read_dir = tokio::fs::read_dir(dir).await?;
    let mut entries = Vec::new();

    while let Some(entry) = read_dir.next_entry().await? {
        let is_dir = tokio::fs::metadata(entry.path())
            .await
            .map(|m| m.is_dir())
            .unwrap_or(false);
        entries.push(Entry {
            name: entry.file_name().to_string_lossy().into_owned(),
            is_dir,
        });
    }

    entries.sort_by(|a, b| a.name.cmp(&b.name));
    Ok(entries)
}

fn render_listing(entries: &[Entry]) -> String {
    let mut html = String::new();
    html.push_str("<!doctype html>\n");
    html.push_str("<meta name=\"viewport\" content=\"width=device-width\">\n");
    html.push_str("<pre>\n");

    for entry in entries {
        let suffix = if entry.is_dir { "/" } else { "" };
        html.push_str(&format!(
            "<a href=\"{}{}\">{}{}</a>\n",
            html_escape(&utf8_percent_encode(&entry.name, HREF_ESCAPE).to_string()),
            suffix,
            html_escape(&entry.name),
            suffix
        ));
    }

    html.push_str("</pre>\n");
    html
}

/// Escape HTML special characters
fn html_escape(input: &str) -> String {
    input
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

// --- Unit Tests ---
