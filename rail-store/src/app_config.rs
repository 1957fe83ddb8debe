use rail_core::RefundPolicy;
use rail_core::{ApiEndpoints, FareDetails};
use serde::Deserialize;
use std::env;
use std::path::PathBuf;

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub fares: FareConfig,
    pub refunds: RefundPolicy,
    pub tickets: TicketConfig,
    pub endpoints: EndpointsConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub port: u16,
}

/// Surcharges applied to every fare summary
#[derive(Debug, Deserialize, Clone)]
pub struct FareConfig {
    pub gst_percent: f64,
    pub convenience_percent: f64,
}

impl FareConfig {
    pub fn details(&self, base_fare: f64) -> FareDetails {
        FareDetails::new(base_fare, self.gst_percent, self.convenience_percent)
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct TicketConfig {
    pub output_dir: PathBuf,
    #[serde(default = "default_watermark")]
    pub watermark: String,
}

fn default_watermark() -> String { "E-TICKET".to_string() }

#[derive(Debug, Deserialize, Clone)]
pub struct EndpointsConfig {
    pub base_url: String,
}

impl EndpointsConfig {
    pub fn registry(&self) -> ApiEndpoints {
        ApiEndpoints::new(self.base_url.clone())
    }
}

impl Config {
    pub fn load() -> Result<Self, config::ConfigError> {
        let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".into());

        let s = config::Config::builder()
            .add_source(config::File::with_name("config/default"))
            // Optional per-environment overrides, `development` unless RUN_MODE says otherwise
            .add_source(config::File::with_name(&format!("config/{}", run_mode)).required(false))
            // Never checked in
            .add_source(config::File::with_name("config/local").required(false))
            // e.g. `RAIL__SERVER__PORT=9090`
            .add_source(config::Environment::with_prefix("RAIL").separator("__"))
            .build()?;

        s.try_deserialize()
    }
}
