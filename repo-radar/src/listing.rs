//! Public repository listing.
//!
//! Pages through `/users/{account}/repos` until an empty page is returned.
//! Response items are deserialized once at the boundary into [`RepoPayload`]
//! and converted to [`RepositoryRecord`]s; nothing downstream re-inspects raw
//! payloads.

use crate::snapshot::RepositoryRecord;
use octocrab::Octocrab;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// Results per page for the listing endpoint.
const REPOS_PER_PAGE: u8 = 100;

/// Owner object as it appears in a listing response item.
#[derive(Debug, Deserialize)]
pub struct OwnerPayload {
    pub login: Option<String>,
}

/// A single listing response item, with every field optional at the wire.
#[derive(Debug, Deserialize)]
pub struct RepoPayload {
    pub name: Option<String>,
    pub full_name: Option<String>,
    pub owner: Option<OwnerPayload>,
    pub html_url: Option<String>,
    pub description: Option<String>,
    pub created_at: Option<String>,
    pub updated_at: Option<String>,
}

impl RepoPayload {
    /// Validates the payload into a record, dropping items that lack
    /// identity fields.
    #[must_use]
    pub fn into_record(self) -> Option<RepositoryRecord> {
        Some(RepositoryRecord {
            name: self.name?,
            full_name: self.full_name?,
            owner: self.owner?.login?,
            html_url: self.html_url?,
            description: self.description,
            created_at: self.created_at?,
            updated_at: self.updated_at,
        })
    }
}

#[derive(Serialize)]
struct ListParams<'a> {
    per_page: u8,
    page: u32,
    r#type: &'a str,
    sort: &'a str,
}

/// Lists every public repository owned by `account`, sorted by creation time
/// as reported upstream.
///
/// A failed page request ends the listing for this account with a warning;
/// pages fetched so far are kept. An empty page is the normal end of input.
/// No retry is attempted.
pub async fn list_public_repos(octocrab: &Octocrab, account: &str) -> Vec<RepositoryRecord> {
    let route = format!("/users/{account}/repos");
    let mut records = Vec::new();
    let mut page: u32 = 1;

    loop {
        let params = ListParams {
            per_page: REPOS_PER_PAGE,
            page,
            r#type: "public",
            sort: "created",
        };

        let payloads: Vec<RepoPayload> = match octocrab.get(&route, Some(&params)).await {
            Ok(payloads) => payloads,
            Err(e) => {
                warn!(
                    account = %account,
                    error = %e,
                    "Failed to fetch repository page, keeping partial results"
                );
                break;
            }
        };

        if payloads.is_empty() {
            break;
        }

        debug!(account = %account, page, count = payloads.len(), "Fetched repository page");
        records.extend(payloads.into_iter().filter_map(RepoPayload::into_record));
        page += 1;
    }

    records
}
