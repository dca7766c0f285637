use crate::error::PolicyParseError;
use crate::record::ImageRecord;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

/// Which property of a candidate decides the pick.
#[derive(Deserialize, Serialize, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum RankingPolicy {
    /// Latest start of capture window wins.
    #[default]
    #[serde(rename = "date")]
    ByDate,
    /// Larger resolution number wins. This is the larger ground-sample distance,
    /// i.e. the coarser image.
    #[serde(rename = "resolution")]
    ByResolution,
    /// Least cloud cover wins.
    #[serde(rename = "cloudcover")]
    ByCloudCover,
}

impl RankingPolicy {
    pub const ALL: [RankingPolicy; 3] = [Self::ByDate, Self::ByResolution, Self::ByCloudCover];

    pub fn name(&self) -> &'static str {
        match self {
            Self::ByDate => "date",
            Self::ByResolution => "resolution",
            Self::ByCloudCover => "cloudcover",
        }
    }

    /// `Ordering::Less` means `a` is preferable to `b`.
    pub fn compare(&self, a: &ImageRecord, b: &ImageRecord) -> Ordering {
        match self {
            Self::ByDate => b.time_range.start.cmp(&a.time_range.start),
            Self::ByResolution => b.resolution.total_cmp(&a.resolution),
            Self::ByCloudCover => a.cloud_cover.total_cmp(&b.cloud_cover),
        }
    }

    /// Order candidates from most to least preferred. The sort is stable, so
    /// equally ranked candidates keep the order the catalog returned them in.
    pub fn rank(&self, candidates: &mut [ImageRecord]) {
        candidates.sort_by(|a, b| self.compare(a, b));
    }
}

impl fmt::Display for RankingPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for RankingPolicy {
    type Err = PolicyParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|p| p.name() == s)
            .ok_or_else(|| PolicyParseError(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::parse_time_range;

    fn record(cloud_cover: f64, resolution: f64, hour: u32, locator: &str) -> ImageRecord {
        let time = format!("[2019-03-04T{hour:02}:00:00.000000+00:00,2019-03-04T{hour:02}:00:00.000000+00:00]");
        ImageRecord {
            time_range: parse_time_range(&time).unwrap(),
            resolution,
            cloud_cover,
            size_bytes: 100,
            download_locator: locator.to_string(),
        }
    }

    fn best(policy: RankingPolicy, mut candidates: Vec<ImageRecord>) -> ImageRecord {
        policy.rank(&mut candidates);
        candidates.into_iter().next().unwrap()
    }

    fn example_pair() -> Vec<ImageRecord> {
        vec![record(20.0, 5.0, 1, "first"), record(5.0, 10.0, 2, "second")]
    }

    #[test]
    fn test_cloudcover_prefers_less_cloud() {
        assert_eq!(best(RankingPolicy::ByCloudCover, example_pair()).download_locator, "second");
    }

    #[test]
    fn test_date_prefers_later_start() {
        assert_eq!(best(RankingPolicy::ByDate, example_pair()).download_locator, "second");
    }

    #[test]
    fn test_resolution_prefers_larger_number() {
        assert_eq!(best(RankingPolicy::ByResolution, example_pair()).download_locator, "second");
    }

    #[test]
    fn test_resolution_direction_is_literal() {
        let candidates = vec![record(0.0, 0.5, 1, "fine"), record(0.0, 30.0, 1, "coarse")];
        assert_eq!(best(RankingPolicy::ByResolution, candidates).download_locator, "coarse");
    }

    #[test]
    fn test_selected_bounds_every_other_candidate() {
        let candidates = vec![
            record(40.0, 3.0, 7, "a"),
            record(12.5, 60.0, 3, "b"),
            record(90.0, 1.5, 22, "c"),
            record(0.0, 10.0, 11, "d"),
            record(12.5, 60.0, 0, "e"),
        ];

        let by_date = best(RankingPolicy::ByDate, candidates.clone());
        assert!(candidates
            .iter()
            .all(|c| by_date.time_range.start >= c.time_range.start));

        let by_cloud = best(RankingPolicy::ByCloudCover, candidates.clone());
        assert!(candidates.iter().all(|c| by_cloud.cloud_cover <= c.cloud_cover));

        let by_resolution = best(RankingPolicy::ByResolution, candidates.clone());
        assert!(candidates.iter().all(|c| by_resolution.resolution >= c.resolution));
    }

    #[test]
    fn test_ties_keep_first_seen() {
        let candidates = vec![
            record(10.0, 10.0, 5, "first"),
            record(10.0, 10.0, 5, "second"),
            record(10.0, 10.0, 5, "third"),
        ];
        for policy in RankingPolicy::ALL {
            assert_eq!(best(policy, candidates.clone()).download_locator, "first");
        }
    }

    #[test]
    fn test_parse_names() {
        assert_eq!("date".parse::<RankingPolicy>(), Ok(RankingPolicy::ByDate));
        assert_eq!("resolution".parse::<RankingPolicy>(), Ok(RankingPolicy::ByResolution));
        assert_eq!("cloudcover".parse::<RankingPolicy>(), Ok(RankingPolicy::ByCloudCover));
        assert_eq!(
            "sharpness".parse::<RankingPolicy>(),
            Err(PolicyParseError("sharpness".to_string()))
        );
    }

    #[test]
    fn test_display_round_trips_through_parse() {
        for policy in RankingPolicy::ALL {
            assert_eq!(policy.to_string().parse::<RankingPolicy>(), Ok(policy));
        }
    }
}
