use std::sync::Arc;

use crate::{Error, Result};

mod history;
mod search;
mod session;
mod throttle;

pub use history::{parse_timestamp, HistoryClient, PriceRecord};
pub use search::{SearchClient, DEFAULT_PAGE_SIZE};
pub use session::{SessionContext, DEFAULT_BASE_URL};
pub use throttle::{Throttle, DEFAULT_INTERVAL};

pub const PRICE_HISTORY_PATH: &str = "/market/pricehistory/";
pub const SEARCH_PATH: &str = "/market/search/render/";

/// Total number of tries for one request, the first one included.
pub const MAX_ATTEMPTS: u32 = 4;

/// Issues GET requests against the market, paced by a shared [`Throttle`] and
/// retried on failure.
///
/// Cloning is cheap, clones share the session and the throttle.
#[derive(Debug, Clone)]
pub struct Requester {
    req_client: reqwest::Client,
    session: Arc<SessionContext>,
    throttle: Arc<Throttle>,
}

impl Requester {
    pub fn new(session: Arc<SessionContext>, throttle: Arc<Throttle>) -> Self {
        Self {
            req_client: reqwest::Client::new(),
            session,
            throttle,
        }
    }

    /// Fetches `path` with the given query parameters and parses the body as
    /// JSON. The schema is left to the caller.
    ///
    /// Every attempt waits on the throttle first. After [`MAX_ATTEMPTS`]
    /// failures the last failure is returned.
    #[tracing::instrument(skip(self, params))]
    pub async fn fetch(&self, path: &str, params: &[(&str, String)]) -> Result<serde_json::Value> {
        let url = format!("{}{}", self.session.base_url(), path);

        let mut attempt = 0;
        loop {
            attempt += 1;

            self.throttle.wait().await;

            let resp = self
                .req_client
                .get(&url)
                .headers(self.session.headers().clone())
                .query(params)
                .send()
                .await;

            let failure = match resp {
                Ok(resp) if resp.status().is_success() => {
                    let body = resp.bytes().await.map_err(|source| Error::Transport {
                        url: url.clone(),
                        source,
                    })?;

                    tracing::debug!(attempt, bytes = body.len(), "Received response");

                    return serde_json::from_slice(&body)
                        .map_err(|source| Error::MalformedResponse { url, source });
                }
                Ok(resp) => {
                    let status = resp.status();
                    tracing::warn!(attempt, %status, "Non Success Response");

                    Error::UnreachableEndpoint {
                        status,
                        url: url.clone(),
                    }
                }
                Err(source) => {
                    tracing::warn!(attempt, "Sending Request: {:?}", source);

                    Error::Transport {
                        url: url.clone(),
                        source,
                    }
                }
            };

            if attempt >= MAX_ATTEMPTS {
                tracing::error!("Giving up after {} attempts", attempt);
                return Err(failure);
            }
        }
    }
}
