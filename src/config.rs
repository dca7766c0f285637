use crate::catalog::{CatalogQuery, DEFAULT_API_URL};
use crate::client::{api_key_headers, AuthHeaders};
use crate::policy::RankingPolicy;
use anyhow::{anyhow, Result};
use chrono::{Days, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use toml;

/// Default search window length, counted back from today.
const DEFAULT_WINDOW_DAYS: u64 = 52 * 7;

#[derive(Deserialize, Serialize, Clone, Debug, PartialEq)]
#[serde(default)]
pub struct SearchConfig {
    pub latitude: f64,
    pub longitude: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_date: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_date: Option<NaiveDate>,
    pub max_cloud_cover: u8,
    pub policy: RankingPolicy,
    pub output: PathBuf,
    pub verbose: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    pub service: ServiceConfig,
}

#[derive(Deserialize, Serialize, Clone, Debug, PartialEq)]
#[serde(default)]
pub struct ServiceConfig {
    pub api_url: String,
    pub timeout_secs: u64,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            timeout_secs: 60,
        }
    }
}

impl ServiceConfig {
    /// `timeout_secs = 0` disables the timeout.
    pub fn timeout(&self) -> Option<Duration> {
        (self.timeout_secs > 0).then(|| Duration::from_secs(self.timeout_secs))
    }
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            latitude: 42.421546,
            longitude: -70.881337,
            start_date: None,
            end_date: None,
            max_cloud_cover: 15,
            policy: RankingPolicy::ByDate,
            output: PathBuf::from("out"),
            verbose: true,
            api_key: None,
            service: ServiceConfig::default(),
        }
    }
}

impl SearchConfig {
    pub fn read<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        let config: Self = toml::from_str(&content)?;
        Ok(config)
    }

    pub fn write<P: AsRef<Path>>(self: &Self, path: P) -> Result<()> {
        let content = toml::to_string_pretty(self)?;
        fs::write(path, content)?;
        Ok(())
    }

    pub fn from_template(table: &toml::Table) -> Result<Self> {
        let config: Self = toml::from_str(&table.to_string())?;
        Ok(config)
    }

    /// The dates actually searched: explicit values, otherwise the 52 weeks up to `today`.
    pub fn window(self: &Self, today: NaiveDate) -> (NaiveDate, NaiveDate) {
        let end = self.end_date.unwrap_or(today);
        let start = self.start_date.unwrap_or_else(|| {
            today
                .checked_sub_days(Days::new(DEFAULT_WINDOW_DAYS))
                .unwrap_or(NaiveDate::MIN)
        });
        (start, end)
    }

    pub fn catalog_query(self: &Self, today: NaiveDate) -> Result<CatalogQuery> {
        let (start, end) = self.window(today);
        CatalogQuery::new(
            self.latitude,
            self.longitude,
            start,
            end,
            self.max_cloud_cover,
        )
    }

    pub fn auth_headers(self: &Self) -> Result<AuthHeaders> {
        let key = self
            .api_key
            .as_deref()
            .filter(|k| !k.trim().is_empty())
            .ok_or(anyhow!("No SkyWatch API key configured"))?;
        Ok(api_key_headers(key))
    }
}

#[cfg(test)]
pub fn search_config_toml() -> toml::Table {
    toml::toml! {
        latitude = 64.8378
        longitude = -147.7164
        start_date = "2019-04-01"
        end_date = "2019-09-30"
        max_cloud_cover = 30
        policy = "cloudcover"
        output = "outputs/fairbanks"
        verbose = false
        api_key = "test-key"

        [service]
        api_url = "https://catalog.test"
        timeout_secs = 5
    }
}
