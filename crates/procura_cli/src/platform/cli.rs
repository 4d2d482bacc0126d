use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;
use log::LevelFilter;
use procura_core::{ProcurementRequest, USE_CASES};
use procura_engine::ApiSettings;

use super::config::ProcuraConfig;

#[derive(Debug, Parser, Clone)]
#[command(
    name = "procura",
    version,
    about = "Submit a bulk laptop procurement request and follow the agents live"
)]
pub struct Cli {
    /// RON config file; missing file means defaults
    #[arg(long, default_value = "procura.ron")]
    pub config: PathBuf,

    /// Write the effective config to --config and exit
    #[arg(long)]
    pub init_config: bool,

    /// Base URL of the procurement service (overrides config)
    #[arg(long)]
    pub base_url: Option<String>,

    /// What the laptops are for
    #[arg(long, default_value = "video-editing", value_parser = parse_use_case)]
    pub use_case: String,

    /// Number of laptops to buy
    #[arg(long, default_value_t = 5, value_parser = clap::value_parser!(u32).range(1..))]
    pub quantity: u32,

    /// Maximum budget per unit in USD
    #[arg(long, default_value_t = 1500.0, value_parser = parse_budget)]
    pub budget: f64,

    /// Minimum RAM in GB
    #[arg(long)]
    pub min_ram: Option<u32>,

    /// Minimum storage in GB
    #[arg(long)]
    pub min_storage: Option<u32>,

    /// Preferred brand
    #[arg(long)]
    pub brand: Option<String>,

    /// Favour value over raw performance when ranking
    #[arg(long)]
    pub no_prefer_performance: bool,

    /// Where purchase orders are written (overrides config)
    #[arg(long)]
    pub output_dir: Option<PathBuf>,

    /// Do not export a purchase order when the deal completes
    #[arg(long)]
    pub no_export: bool,

    /// Log file path
    #[arg(long, default_value = engine_logging::DEFAULT_LOG_FILE)]
    pub log_file: PathBuf,

    /// Also log to the terminal, at debug level
    #[arg(short, long)]
    pub verbose: bool,
}

impl Cli {
    pub fn procurement_request(&self) -> ProcurementRequest {
        ProcurementRequest {
            use_case: self.use_case.clone(),
            quantity: self.quantity,
            max_budget_per_unit: self.budget,
            min_ram_gb: self.min_ram,
            min_storage_gb: self.min_storage,
            preferred_brand: self
                .brand
                .as_deref()
                .map(str::trim)
                .filter(|brand| !brand.is_empty())
                .map(ToOwned::to_owned),
            prefer_performance: !self.no_prefer_performance,
        }
    }

    /// Fold CLI overrides into the loaded config.
    pub fn apply_overrides(&self, mut config: ProcuraConfig) -> ProcuraConfig {
        if let Some(base_url) = &self.base_url {
            config.base_url = base_url.clone();
        }
        if let Some(output_dir) = &self.output_dir {
            config.output_dir = output_dir.clone();
        }
        config
    }

    pub fn log_level(&self) -> LevelFilter {
        if self.verbose {
            LevelFilter::Debug
        } else {
            LevelFilter::Info
        }
    }
}

pub fn api_settings(config: &ProcuraConfig) -> ApiSettings {
    ApiSettings {
        base_url: config.base_url.clone(),
        connect_timeout: Duration::from_secs(config.connect_timeout_secs),
        request_timeout: Duration::from_secs(config.request_timeout_secs),
        stream_idle_timeout: config.stream_idle_timeout_secs.map(Duration::from_secs),
    }
}

fn parse_use_case(raw: &str) -> Result<String, String> {
    let normalized = raw.trim().to_lowercase().replace([' ', '_'], "-");
    if USE_CASES.contains(&normalized.as_str()) {
        Ok(normalized)
    } else {
        Err(format!("unknown use case; expected one of: {}", USE_CASES.join(", ")))
    }
}

fn parse_budget(raw: &str) -> Result<f64, String> {
    let value: f64 = raw
        .trim()
        .trim_start_matches('$')
        .replace(',', "")
        .parse()
        .map_err(|_| format!("invalid budget: {raw}"))?;
    if value.is_finite() && value > 0.0 {
        Ok(value)
    } else {
        Err("budget must be a positive amount".to_string())
    }
}
