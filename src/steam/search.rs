use std::collections::HashSet;

use serde::Deserialize;

use super::{Requester, SEARCH_PATH};
use crate::{Error, Result};

pub const DEFAULT_PAGE_SIZE: u32 = 100;

/// Upper bound on requested pages, reached only if `total_count` keeps growing.
const MAX_PAGES: usize = 10_000;

#[derive(Debug, Deserialize)]
struct SearchPage {
    total_count: u64,
    #[serde(default)]
    results: Vec<SearchResult>,
}

#[derive(Debug, Deserialize)]
struct SearchResult {
    hash_name: String,
}

/// Enumerates every market item matching a query.
#[derive(Debug, Clone)]
pub struct SearchClient {
    requester: Requester,
    page_size: u32,
}

impl SearchClient {
    pub fn new(requester: Requester) -> Self {
        Self::with_page_size(requester, DEFAULT_PAGE_SIZE)
    }

    pub fn with_page_size(requester: Requester, page_size: u32) -> Self {
        Self {
            requester,
            page_size: page_size.max(1),
        }
    }

    /// Collects the `hash_name` of every item matching `query` in `app_id`.
    ///
    /// Names come back in the order the server lists them, without duplicates.
    /// A page reporting `success: false` aborts the whole search.
    #[tracing::instrument(skip(self))]
    pub async fn search(&self, app_id: u32, query: &str) -> Result<Vec<String>> {
        let page_size = u64::from(self.page_size);

        let mut names = Vec::new();
        let mut seen = HashSet::new();
        let mut total_count = 0;

        for page in 0..MAX_PAGES {
            let start = page as u64 * page_size;

            let params = [
                ("appid", app_id.to_string()),
                ("query", query.to_string()),
                ("count", page_size.to_string()),
                ("norender", "1".to_string()),
                ("start", start.to_string()),
            ];

            let raw = self.requester.fetch(SEARCH_PATH, &params).await?;
            let content = parse_page(raw)?;

            tracing::debug!(
                page = page + 1,
                start,
                results = content.results.len(),
                total_count = content.total_count,
                "Loaded search page"
            );

            if content.results.is_empty() && content.total_count > start {
                tracing::warn!(start, "Empty search page before reaching total_count");
            }

            for result in content.results {
                if seen.insert(result.hash_name.clone()) {
                    names.push(result.hash_name);
                } else {
                    tracing::warn!(name = %result.hash_name, "Duplicate search result");
                }
            }

            total_count = content.total_count;
            if total_count <= start + page_size {
                if names.len() as u64 != total_count {
                    tracing::warn!(
                        collected = names.len(),
                        total_count,
                        "Collected names do not match total_count"
                    );
                }

                tracing::info!("Found {} items", names.len());
                return Ok(names);
            }
        }

        tracing::error!(total_count, "Search did not converge");
        Err(Error::PaginationLimit { pages: MAX_PAGES })
    }
}

fn parse_page(mut raw: serde_json::Value) -> Result<SearchPage> {
    let success = raw
        .get("success")
        .and_then(serde_json::Value::as_bool)
        .unwrap_or(false);

    if !success {
        if let Some(fields) = raw.as_object_mut() {
            fields.remove("results");
        }

        return Err(Error::SearchRequestFailed { payload: raw });
    }

    serde_json::from_value(raw).map_err(|source| Error::MalformedResponse {
        url: SEARCH_PATH.to_string(),
        source,
    })
}
