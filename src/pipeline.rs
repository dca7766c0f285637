use crate::catalog::Catalog;
use crate::client::HttpGet;
use crate::config::SearchConfig;
use crate::output::save_image;
use crate::selector::select_and_fetch;
use anyhow::Result;
use chrono::NaiveDate;
use std::path::PathBuf;
use tracing::info;

/// Search, pick and save one image. Returns the written file, if any.
///
/// Configuration problems and malformed catalog responses are errors; every
/// other failure is logged and ends the run with `Ok(None)`.
pub async fn run(
    config: &SearchConfig,
    client: &impl HttpGet,
    today: NaiveDate,
) -> Result<Option<PathBuf>> {
    let query = config.catalog_query(today)?;
    let headers = config.auth_headers()?;

    if config.verbose {
        info!(
            "Will be searching from {} to {} for location ({}, {}) with maximum {}% cloud cover (favoring {}).",
            query.start_date,
            query.end_date,
            query.latitude,
            query.longitude,
            query.max_cloud_cover,
            config.policy
        );
    }

    let catalog = Catalog::new(client, &config.service.api_url);
    let candidates = catalog.query(&query, &headers).await?;
    if candidates.is_empty() {
        info!("No matching image found.");
        return Ok(None);
    }

    let image = select_and_fetch(client, candidates, config.policy, &headers, config.verbose).await;
    let filename = image.and_then(|bytes| save_image(&config.output, &bytes, config.verbose));

    if config.verbose {
        info!("Done.");
    }
    Ok(filename)
}
