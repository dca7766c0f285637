use anyhow::Result;
use chrono::{Local, NaiveDate};
use clap::Parser;
use skywatch_picker::client::SkyWatchClient;
use skywatch_picker::config::SearchConfig;
use skywatch_picker::pipeline;
use skywatch_picker::policy::RankingPolicy;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Fetch SkyWatch data for a particular target.
#[derive(Parser, Debug)]
#[command(version, about)]
struct Cli {
    /// TOML file with search settings; flags given here take precedence
    #[arg(long)]
    config: Option<PathBuf>,

    /// The maximum allowed percentage of cloud cover [default: 15]
    #[arg(short = 'c', long = "cloudcover")]
    cloud_cover: Option<u8>,

    /// The target longitude [default: -70.881337]
    #[arg(short = 'x', long, allow_hyphen_values = true)]
    longitude: Option<f64>,

    /// The target latitude [default: 42.421546]
    #[arg(short = 'y', long, allow_hyphen_values = true)]
    latitude: Option<f64>,

    /// The search date range start [default: 52 weeks before today]
    #[arg(short = 's', long = "startdate")]
    start_date: Option<NaiveDate>,

    /// The search date range end [default: today]
    #[arg(short = 'e', long = "enddate")]
    end_date: Option<NaiveDate>,

    /// The SkyWatch API key
    #[arg(short = 'a', long = "apikey", env = "SKYWATCH_API_KEY", hide_env_values = true)]
    api_key: Option<String>,

    /// The priority field for picking data: date, resolution or cloudcover [default: date]
    #[arg(short = 'p', long = "picker")]
    policy: Option<RankingPolicy>,

    /// The output file name; the extension ".jp2" is appended [default: out]
    #[arg(short = 'o', long = "outfile")]
    output: Option<PathBuf>,

    /// Make output more verbose
    #[arg(short = 'v', long)]
    verbose: bool,
}

impl Cli {
    fn into_config(self) -> Result<SearchConfig> {
        let mut config = match &self.config {
            Some(path) => SearchConfig::read(path)?,
            None => SearchConfig::default(),
        };
        if let Some(v) = self.cloud_cover {
            config.max_cloud_cover = v;
        }
        if let Some(v) = self.longitude {
            config.longitude = v;
        }
        if let Some(v) = self.latitude {
            config.latitude = v;
        }
        if self.start_date.is_some() {
            config.start_date = self.start_date;
        }
        if self.end_date.is_some() {
            config.end_date = self.end_date;
        }
        if self.api_key.is_some() {
            config.api_key = self.api_key;
        }
        if let Some(v) = self.policy {
            config.policy = v;
        }
        if let Some(v) = self.output {
            config.output = v;
        }
        config.verbose |= self.verbose;
        Ok(config)
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = Cli::parse().into_config()?;
    let client = SkyWatchClient::with_timeout(config.service.timeout())?;
    let today = Local::now().date_naive();

    if let Some(path) = pipeline::run(&config, &client, today).await? {
        println!("{}", path.display());
    }

    Ok(())
}
