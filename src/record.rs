//! Catalog records and the packed time-range layout they carry
use crate::error::CatalogError;
use chrono::{DateTime, NaiveDateTime, Utc};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::OnceLock;

const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.6f+00:00";
const TIMESTAMP_PATTERN: &str = r"\d{4}-\d{2}-\d{2}T\d{2}:\d{2}:\d{2}\.\d{6}\+00:00";
const TIMESTAMP_WIDTH: usize = 32;

/// One catalog entry exactly as the service serializes it.
#[derive(Deserialize, Serialize, Clone, Debug, PartialEq)]
pub struct RawRecord {
    pub time: String,
    pub resolution: f64,
    pub cloud_cover: f64,
    pub size: f64,
    pub download_path: String,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TimeRange {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct ImageRecord {
    pub time_range: TimeRange,
    pub resolution: f64,
    pub cloud_cover: f64,
    pub size_bytes: u64,
    pub download_locator: String,
}

pub type CandidateSet = Vec<ImageRecord>;

impl TryFrom<RawRecord> for ImageRecord {
    type Error = CatalogError;

    fn try_from(raw: RawRecord) -> Result<Self, Self::Error> {
        let time_range = parse_time_range(&raw.time)?;
        Ok(Self {
            time_range,
            resolution: raw.resolution,
            cloud_cover: raw.cloud_cover,
            size_bytes: raw.size.max(0.0) as u64,
            download_locator: raw.download_path,
        })
    }
}

fn timestamp_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(TIMESTAMP_PATTERN).expect("Regex pattern should always compile"))
}

fn malformed(time: &str, reason: impl Into<String>) -> CatalogError {
    CatalogError::MalformedRecord {
        time: time.to_string(),
        reason: reason.into(),
    }
}

fn parse_timestamp(raw: &str, text: &str) -> Result<DateTime<Utc>, CatalogError> {
    let naive = NaiveDateTime::parse_from_str(text, TIMESTAMP_FORMAT)
        .map_err(|e| malformed(raw, format!("{text:?} is not a valid timestamp: {e}")))?;
    Ok(naive.and_utc())
}

/// Parse the packed `time` field of a catalog record.
///
/// The start timestamp must occupy the 32 characters following the first
/// one. The end timestamp is the next timestamp of the same layout after it;
/// a range without one is treated as a single instant.
pub fn parse_time_range(time: &str) -> Result<TimeRange, CatalogError> {
    let start_offset = time
        .char_indices()
        .nth(1)
        .map(|(i, _)| i)
        .unwrap_or(time.len());
    let start_end = start_offset + TIMESTAMP_WIDTH;
    let start_text = time
        .get(start_offset..start_end)
        .ok_or_else(|| malformed(time, "too short to hold a start timestamp"))?;

    let re = timestamp_regex();
    match re.find(start_text) {
        Some(m) if m.start() == 0 && m.end() == TIMESTAMP_WIDTH => {}
        _ => {
            return Err(malformed(
                time,
                "start timestamp does not match YYYY-MM-DDTHH:MM:SS.ffffff+00:00",
            ))
        }
    }
    let start = parse_timestamp(time, start_text)?;

    let end = match re.find(&time[start_end..]) {
        Some(m) => parse_timestamp(time, m.as_str())?,
        None => start,
    };
    if end < start {
        return Err(malformed(time, "end of range precedes its start"));
    }

    Ok(TimeRange { start, end })
}

/// Decode a catalog response body into candidates. Any malformed record fails the whole set.
pub fn decode_candidates(body: &[u8]) -> Result<CandidateSet, CatalogError> {
    let raw: Vec<RawRecord> = serde_json::from_slice(body)?;
    raw.into_iter().map(ImageRecord::try_from).collect()
}
