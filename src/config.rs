use serde::{Deserialize, Serialize};
use std::env;

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    pub backend: BackendConfig,
    pub session: SessionConfig,
    pub run: RunConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct BackendConfig {
    pub base_url: String,
    pub api_token: String,
    pub request_timeout_secs: u64,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SessionConfig {
    pub language: String,
    pub max_image_bytes: usize,
}

/// One-shot run settings for the CLI entrypoint. The parameter fields stay
/// raw strings; `ParameterForm` validates them the same way it validates
/// interactive input.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RunConfig {
    pub simulation_mode: bool,
    pub variant: String,
    pub chart_image: Option<String>,
    pub account_size: String,
    pub risk_percent: String,
    pub leverage: String,
    pub order_type: String,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let backend = BackendConfig {
            // Token is optional for simulation runs
            api_token: env::var("CHARTFLOW_API_TOKEN").unwrap_or_default(),
            base_url: env::var("CHARTFLOW_API_URL")
                .unwrap_or_else(|_| "http://127.0.0.1:8000".to_string()),
            request_timeout_secs: env::var("REQUEST_TIMEOUT_SECS")
                .unwrap_or_else(|_| "30".to_string())
                .parse()
                .unwrap_or(30),
        };

        let session = SessionConfig {
            language: env::var("ANALYSIS_LANGUAGE").unwrap_or_else(|_| "en".to_string()),
            max_image_bytes: env::var("MAX_IMAGE_BYTES")
                .unwrap_or_else(|_| "10485760".to_string())
                .parse()
                .unwrap_or(10_485_760),
        };

        let run = RunConfig {
            simulation_mode: env::var("SIMULATION_MODE")
                .unwrap_or_else(|_| "false".to_string())
                .parse()
                .unwrap_or(false),
            variant: env::var("ANALYSIS_VARIANT").unwrap_or_else(|_| "swing".to_string()),
            chart_image: env::var("CHART_IMAGE").ok(),
            account_size: env::var("ACCOUNT_SIZE").unwrap_or_default(),
            risk_percent: env::var("RISK_PERCENT").unwrap_or_else(|_| "1".to_string()),
            leverage: env::var("LEVERAGE").unwrap_or_else(|_| "10".to_string()),
            order_type: env::var("ORDER_TYPE").unwrap_or_else(|_| "market".to_string()),
        };

        Ok(Config {
            backend,
            session,
            run,
        })
    }
}
