//! Dashboard binary entry point
//!
//! Reads configuration from the command line, the environment and an
//! optional `.env` file, then serves the dashboard until Ctrl+C.

use clap::Parser;
use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;
use std::time::Duration;

use dashboard::{
    config::{self, DashboardConfig, RefreshConfig},
    DashboardResult, DashboardServer, RealAirQualityApi, SqliteMeasurementStore,
};
use shared::{component_info, logging::{self, LogFormat}, Component};

/// Command line arguments, each with an environment fallback
#[derive(Parser, Debug)]
#[command(name = "dashboard")]
#[command(about = "OpenAQ air quality dashboard")]
struct Args {
    /// Address to bind the HTTP server to
    #[arg(long, env = "AQ_HOST", default_value = "127.0.0.1")]
    host: IpAddr,

    /// Port for the HTTP server
    #[arg(long, env = "AQ_PORT", default_value = "5000")]
    port: u16,

    /// SQLite database file
    #[arg(long, env = "AQ_DATABASE", default_value = "db.sqlite3")]
    database: PathBuf,

    /// OpenAQ API base URL
    #[arg(long, env = "OPENAQ_API_URL", default_value = config::DEFAULT_API_URL)]
    api_url: String,

    /// Timeout for each OpenAQ request, in seconds
    #[arg(long, env = "OPENAQ_TIMEOUT_SECS", default_value = "30")]
    request_timeout_secs: u64,

    /// Cities requested from OpenAQ on refresh
    #[arg(long, env = "AQ_CITY_LIMIT", default_value_t = config::DEFAULT_CITY_LIMIT)]
    city_limit: usize,

    /// Cities sampled on refresh
    #[arg(long, env = "AQ_SAMPLE_SIZE", default_value_t = config::DEFAULT_SAMPLE_SIZE)]
    sample_size: usize,

    /// City loaded by name on every refresh
    #[arg(long, env = "AQ_EXCLUDED_CITY", default_value = config::DEFAULT_EXCLUDED_CITY)]
    excluded_city: String,

    /// Place shown when the request names none (country/city)
    #[arg(long, env = "AQ_DEFAULT_PLACE", default_value = config::DEFAULT_PLACE)]
    default_place: String,

    /// Threshold used when the request names none
    #[arg(long, env = "AQ_DEFAULT_THRESHOLD", default_value_t = config::DEFAULT_THRESHOLD)]
    default_threshold: f64,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, env = "AQ_LOG_LEVEL", default_value = "info")]
    log_level: String,

    /// Emit logs as JSON lines
    #[arg(long, env = "AQ_LOG_JSON")]
    log_json: bool,
}

impl Args {
    fn into_config(self) -> DashboardConfig {
        DashboardConfig {
            bind_address: SocketAddr::new(self.host, self.port),
            database: self.database,
            api_url: self.api_url,
            request_timeout: Duration::from_secs(self.request_timeout_secs),
            default_place: self.default_place,
            default_threshold: self.default_threshold,
            refresh: RefreshConfig {
                city_limit: self.city_limit,
                sample_size: self.sample_size,
                excluded_city: self.excluded_city,
                ..RefreshConfig::default()
            },
        }
    }
}

#[tokio::main]
async fn main() -> DashboardResult<()> {
    // A missing .env file is fine
    let _ = dotenv::dotenv();

    let args = Args::parse();

    let format = if args.log_json { LogFormat::Json } else { LogFormat::Compact };
    logging::init_tracing(Some(&args.log_level), format);

    let config = args.into_config();
    let defaults = config.validate()?;

    component_info!(
        Component::Dashboard,
        "Using database {} and API {}",
        config.database.display(),
        config.api_url
    );

    let api = RealAirQualityApi::new(&config.api_url, config.request_timeout)?;
    let store = SqliteMeasurementStore::open(&config.database)?;

    let server = DashboardServer::new(config.bind_address, api, store, config.refresh, defaults);
    server.run().await?;

    logging::log_success(Component::Dashboard, "Dashboard stopped gracefully");
    Ok(())
}
