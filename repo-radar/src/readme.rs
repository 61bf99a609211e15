//! README excerpt fetching and derivation.
//!
//! Enrichment never fails the run: every outcome is a [`Snippet`], and the
//! two unavailable reasons stay distinguishable in logs and counters even
//! though persisted records collapse both to a missing snippet.

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use octocrab::Octocrab;
use serde::Deserialize;
use tracing::debug;

/// Lines kept from the top of a README body.
const SNIPPET_MAX_LINES: usize = 5;

/// Upper bound on snippet length, in characters.
const SNIPPET_MAX_CHARS: usize = 400;

/// Appended when a snippet is cut short.
const TRUNCATION_MARKER: &str = "...";

/// Outcome of fetching a README excerpt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Snippet {
    /// A bounded excerpt derived from the README body.
    Available(String),

    /// No excerpt could be produced.
    Unavailable(UnavailableReason),
}

/// Why a README excerpt could not be produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnavailableReason {
    /// The README resource could not be fetched, most commonly because none
    /// exists.
    MissingReadme,

    /// The content field was absent or did not decode as base64.
    DecodeFailed,
}

impl Snippet {
    /// The excerpt text, if one was produced.
    #[must_use]
    pub fn into_text(self) -> Option<String> {
        match self {
            Snippet::Available(text) => Some(text),
            Snippet::Unavailable(_) => None,
        }
    }

    /// Returns whether an excerpt was produced.
    #[must_use]
    pub fn is_available(&self) -> bool {
        matches!(self, Snippet::Available(_))
    }
}

/// README metadata response, reduced to the one field used here.
#[derive(Debug, Deserialize)]
struct ReadmePayload {
    content: Option<String>,
}

/// Fetches the README for `owner/repo` and derives a bounded excerpt.
///
/// A non-success response downgrades to
/// [`UnavailableReason::MissingReadme`]; a content field that is absent or
/// undecodable downgrades to [`UnavailableReason::DecodeFailed`]. Never
/// returns an error to the caller.
pub async fn fetch_readme_snippet(octocrab: &Octocrab, owner: &str, repo: &str) -> Snippet {
    let route = format!("/repos/{owner}/{repo}/readme");

    let payload: ReadmePayload = match octocrab.get(&route, None::<&()>).await {
        Ok(payload) => payload,
        Err(e) => {
            debug!(owner = %owner, repo = %repo, error = %e, "No README available");
            return Snippet::Unavailable(UnavailableReason::MissingReadme);
        }
    };

    match payload.content.as_deref().and_then(decode_content) {
        Some(body) => Snippet::Available(excerpt(&body)),
        None => {
            debug!(owner = %owner, repo = %repo, "README content did not decode");
            Snippet::Unavailable(UnavailableReason::DecodeFailed)
        }
    }
}

/// Decodes the base64 content field.
///
/// The API wraps the payload in newlines, so whitespace is stripped before
/// decoding. Invalid UTF-8 sequences are replaced rather than failing the
/// whole operation.
fn decode_content(content: &str) -> Option<String> {
    let compact: String = content.split_whitespace().collect();
    let bytes = BASE64.decode(compact).ok()?;
    Some(String::from_utf8_lossy(&bytes).into_owned())
}

/// Derives the bounded excerpt from a decoded README body.
///
/// Keeps the first [`SNIPPET_MAX_LINES`] lines, trimmed. If the result
/// exceeds [`SNIPPET_MAX_CHARS`] characters it is cut there, backed off to
/// the last newline within the cut (so the excerpt never ends mid-line), and
/// marked as truncated.
fn excerpt(body: &str) -> String {
    let joined = body
        .lines()
        .take(SNIPPET_MAX_LINES)
        .collect::<Vec<_>>()
        .join("\n");
    let snippet = joined.trim();

    if snippet.chars().count() <= SNIPPET_MAX_CHARS {
        return snippet.to_string();
    }

    let head: String = snippet.chars().take(SNIPPET_MAX_CHARS).collect();
    let kept = match head.rfind('\n') {
        Some(position) => &head[..position],
        None => head.as_str(),
    };
    format!("{kept}{TRUNCATION_MARKER}")
}
