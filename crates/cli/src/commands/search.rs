//! Catalog search commands.
//!
//! Interactive mode treats every stdin line as a change of the search text.
//! Lookups run concurrently; results are printed only when a lookup is still
//! current on arrival, so a slow answer for an old query never replaces the
//! answer for a newer one.

use bloom_storefront::search::Resolution;
use bloom_storefront::SearchEngine;
use futures::stream::{FuturesUnordered, StreamExt};
use tokio::io::{AsyncBufReadExt, BufReader};

use super::output::search_results;
use super::{CommandError, Context};

/// Run one search and print the results.
pub async fn once(ctx: &Context, query: &str) {
    let engine = SearchEngine::new(ctx.api.clone());
    report(&engine, engine.query_changed(query).await);
}

/// Read queries from stdin until EOF.
///
/// # Errors
///
/// Returns `CommandError::Io` if stdin cannot be read.
pub async fn interactive(ctx: &Context) -> Result<(), CommandError> {
    let engine = SearchEngine::new(ctx.api.clone());
    let engine = &engine;
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut in_flight = FuturesUnordered::new();

    loop {
        tokio::select! {
            line = lines.next_line() => match line? {
                Some(text) => in_flight.push(async move { engine.query_changed(&text).await }),
                None => break,
            },
            Some(resolution) = in_flight.next(), if !in_flight.is_empty() => {
                report(engine, resolution);
            }
        }
    }

    while let Some(resolution) = in_flight.next().await {
        report(engine, resolution);
    }
    Ok(())
}

fn report<B>(engine: &SearchEngine<B>, resolution: Resolution)
where
    B: bloom_storefront::api::CatalogBackend,
{
    match resolution {
        Resolution::Committed => search_results(&engine.snapshot()),
        Resolution::Failed => tracing::warn!("search failed; type another query to retry"),
        Resolution::Cleared | Resolution::Stale => {}
    }
}
