use std::sync::Arc;

use tracing::Instrument;

use crate::config::Config;
use crate::steam::{HistoryClient, Requester, SearchClient, SessionContext, Throttle};
use crate::storage::ResultStore;
use crate::Result;

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct RunSummary {
    pub items_found: usize,
    pub files_written: usize,
    /// Items the market refused to report a history for.
    pub unavailable: Vec<String>,
}

/// Search once, then fetch and store the price history of every result.
///
/// Any error other than a single item being unavailable ends the run.
#[tracing::instrument(skip(config), fields(app_id = config.app_id, query = %config.query))]
pub async fn collect(config: &Config) -> Result<RunSummary> {
    let start_time = std::time::Instant::now();

    let session = SessionContext::new(config.login_secure.clone())?
        .with_base_url(config.base_url.as_str())?
        .with_headers(config.headers.iter().map(|(k, v)| (k.as_str(), v.as_str())))?;
    let throttle = Arc::new(Throttle::new(config.request_delay()));
    let requester = Requester::new(Arc::new(session), throttle);

    let search = SearchClient::with_page_size(requester.clone(), config.page_size);
    let history = HistoryClient::new(requester);

    let mut items = search.search(config.app_id, &config.query).await?;
    items.sort_by_key(|name| name.to_lowercase());

    tracing::info!("Collecting price history for {} items", items.len());
    for item in &items {
        tracing::info!("{}", item);
    }

    let store = ResultStore::create(&config.output_dir)?;

    let mut summary = RunSummary {
        items_found: items.len(),
        ..Default::default()
    };

    for (i, item) in items.iter().enumerate() {
        async {
            let records = match history.price_history(item, config.app_id).await? {
                Some(records) => records,
                None => {
                    summary.unavailable.push(item.clone());
                    Vec::new()
                }
            };

            let path = store.save(item, &records)?;
            summary.files_written += 1;

            tracing::info!(path = %path.display(), points = records.len(), "Stored");

            Ok::<_, crate::Error>(())
        }
        .instrument(tracing::info_span!(
            "Collecting Item",
            item = item.as_str(),
            current = i + 1,
            total_items = items.len()
        ))
        .await?;
    }

    tracing::info!(
        files = summary.files_written,
        unavailable = summary.unavailable.len(),
        "Collecting took {:?}",
        start_time.elapsed()
    );

    Ok(summary)
}
