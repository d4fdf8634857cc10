use std::env;

use crate::error::AppError;

pub const DEFAULT_BASE_URL: &str = "http://localhost:8000/api";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

#[derive(Clone, Debug)]
pub struct ApiConfig {
    pub base_url: String,
    pub timeout_secs: u64,
    pub user_agent: String,
}

impl ApiConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Self::default()
        }
    }

    pub fn new_from_env() -> Result<Self, AppError> {
        let base_url = env::var("API_BASE_URL").unwrap_or_else(|_| DEFAULT_BASE_URL.to_string());
        let timeout_secs = match env::var("API_TIMEOUT_SECS") {
            Ok(raw) => raw
                .parse::<u64>()
                .map_err(|_| AppError::Config(format!("API_TIMEOUT_SECS is not a number: {}", raw)))?,
            Err(_) => DEFAULT_TIMEOUT_SECS,
        };
        let user_agent = env::var("API_USER_AGENT").unwrap_or_else(|_| default_user_agent());

        Ok(Self {
            base_url,
            timeout_secs,
            user_agent,
        })
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            user_agent: default_user_agent(),
        }
    }
}

fn default_user_agent() -> String {
    concat!("schedule-client/", env!("CARGO_PKG_VERSION")).to_string()
}
