use tracing::{debug, warn};

use feed_domain::{Event, QueryFilter};

use crate::{AppError, AppState};

/// Runs a whitelisted parameter search and decodes the hits in index order.
/// Hits that fail to decode, or that the index could not read, are logged
/// and left out; each one counts as a decode error.
pub async fn search_events(
    state: &AppState,
    params: Vec<(String, String)>,
) -> Result<Vec<Event>, AppError> {
    let filter = QueryFilter::from_params(
        params
            .iter()
            .map(|(name, value)| (name.as_str(), value.as_str())),
    );
    let query = state.compiler.compile(&filter);
    debug!(query = %query, offset = filter.page.offset, limit = filter.page.limit, "searching events");

    state.metrics.record_search();
    let result = state.event_index.search(&query, filter.page).await?;
    if result.skipped > 0 {
        warn!(skipped = result.skipped, "index returned unreadable hits");
        for _ in 0..result.skipped {
            state.metrics.record_decode_error();
        }
    }

    let mut events = Vec::with_capacity(result.hits.len());
    for hit in result.hits {
        match state.decoder.decode(hit) {
            Ok(event) => events.push(event),
            Err(err) => {
                warn!("failed to decode search hit: {}", err);
                state.metrics.record_decode_error();
            }
        }
    }
    Ok(events)
}
