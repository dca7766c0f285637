use crate::client::{AuthHeaders, HttpGet};
use crate::error::SoftFailure;
use crate::policy::RankingPolicy;
use crate::record::{CandidateSet, ImageRecord};
use reqwest::StatusCode;
use tracing::{debug, info, warn};
use url::Url;

/// Rank `candidates` with `policy` and download the winner.
///
/// Returns `None` when there is nothing to rank or the download does not
/// succeed. Nothing is retried.
pub async fn select_and_fetch(
    client: &impl HttpGet,
    mut candidates: CandidateSet,
    policy: RankingPolicy,
    headers: &AuthHeaders,
    verbose: bool,
) -> Option<Vec<u8>> {
    if candidates.is_empty() {
        return None;
    }

    policy.rank(&mut candidates);
    for (i, c) in candidates.iter().enumerate() {
        debug!(
            rank = i,
            start = %c.time_range.start,
            resolution = c.resolution,
            cloud_cover = c.cloud_cover,
            "Ranked candidate by {policy}"
        );
    }
    let chosen = candidates.swap_remove(0);

    if verbose {
        info!(
            "Loading {} byte image ({} meter resolution)...",
            chosen.size_bytes, chosen.resolution
        );
    }

    match fetch_image(client, &chosen, headers).await {
        Ok(bytes) => Some(bytes),
        Err(failure) => {
            warn!("{failure}");
            None
        }
    }
}

async fn fetch_image(
    client: &impl HttpGet,
    record: &ImageRecord,
    headers: &AuthHeaders,
) -> Result<Vec<u8>, SoftFailure> {
    let url = Url::parse(&record.download_locator).map_err(|source| {
        SoftFailure::InvalidLocator {
            locator: record.download_locator.clone(),
            source,
        }
    })?;

    let reply = client
        .get(&url, headers)
        .await
        .map_err(|e| SoftFailure::Transport {
            url: url.to_string(),
            message: e.to_string(),
        })?;

    if reply.status != StatusCode::OK {
        return Err(SoftFailure::BinaryFetchFailed {
            status: reply.status.as_u16(),
            reason: reply.reason(),
        });
    }
    Ok(reply.body)
}
