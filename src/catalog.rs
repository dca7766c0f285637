use crate::client::{AuthHeaders, HttpGet};
use crate::error::{CatalogError, SoftFailure};
use crate::record::{decode_candidates, CandidateSet};
use anyhow::{ensure, Result};
use chrono::NaiveDate;
use reqwest::StatusCode;
use tracing::{debug, info, warn};
use url::Url;

pub const DEFAULT_API_URL: &str = "https://api.skywatch.co";
const BAND: &str = "true-colour-image";

/// A validated search window around one point.
#[derive(Debug, Clone, PartialEq)]
pub struct CatalogQuery {
    pub latitude: f64,
    pub longitude: f64,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub max_cloud_cover: u8,
}

impl CatalogQuery {
    pub fn new(
        latitude: f64,
        longitude: f64,
        start_date: NaiveDate,
        end_date: NaiveDate,
        max_cloud_cover: u8,
    ) -> Result<Self> {
        ensure!(
            (-90.0..=90.0).contains(&latitude),
            "Latitude {} is outside [-90, 90]",
            latitude
        );
        ensure!(
            (-180.0..=180.0).contains(&longitude),
            "Longitude {} is outside [-180, 180]",
            longitude
        );
        ensure!(
            start_date <= end_date,
            "Start date {} is after end date {}",
            start_date,
            end_date
        );
        ensure!(
            max_cloud_cover <= 100,
            "Cloud cover {}% is outside 0-100",
            max_cloud_cover
        );
        Ok(Self {
            latitude,
            longitude,
            start_date,
            end_date,
            max_cloud_cover,
        })
    }

    pub fn url(&self, api_url: &str) -> Result<Url, url::ParseError> {
        let url = format!(
            "{}/data/time/{},{}/location/{},{}/cloudcover/{}/band/{}",
            api_url.trim_end_matches('/'),
            self.start_date,
            self.end_date,
            self.longitude,
            self.latitude,
            self.max_cloud_cover,
            BAND
        );
        Url::parse(&url)
    }
}

pub struct Catalog<'a, C: HttpGet> {
    client: &'a C,
    api_url: String,
}

impl<'a, C: HttpGet> Catalog<'a, C> {
    pub fn new(client: &'a C, api_url: &str) -> Self {
        Self {
            client,
            api_url: api_url.to_string(),
        }
    }

    /// Fetch candidate records for `query`.
    ///
    /// A request that fails or answers with anything but 200 yields an empty
    /// set. Only a response we cannot interpret is an error.
    pub async fn query(
        self: &Self,
        query: &CatalogQuery,
        headers: &AuthHeaders,
    ) -> Result<CandidateSet, CatalogError> {
        let url = query.url(&self.api_url)?;
        debug!(%url, "Querying catalog");

        let reply = match self.client.get(&url, headers).await {
            Ok(reply) => reply,
            Err(e) => {
                let failure = SoftFailure::Transport {
                    url: url.to_string(),
                    message: e.to_string(),
                };
                warn!("{failure}");
                return Ok(CandidateSet::new());
            }
        };

        if reply.status != StatusCode::OK {
            let failure = SoftFailure::CatalogRequestFailed {
                status: reply.status.as_u16(),
                reason: reply.reason(),
            };
            warn!("{failure}");
            return Ok(CandidateSet::new());
        }

        let candidates = decode_candidates(&reply.body)?;
        info!("Catalog returned {} candidate(s)", candidates.len());
        Ok(candidates)
    }
}
