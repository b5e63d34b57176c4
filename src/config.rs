use dotenvy::dotenv;
use std::env;

#[derive(Clone)]
pub struct Config {
    pub api_base_url: String,
    pub api_token: String,
    pub http_timeout_secs: u64,

    // Member lookup cache (one scanning session)
    pub member_cache_capacity: u64,
    pub member_warmup_batch: usize,
}

impl Config {
    pub fn from_env() -> Self {
        dotenv().ok();

        Self {
            api_base_url: env::var("API_BASE_URL")
                .unwrap_or_else(|_| "http://localhost:3500/api".to_string()),
            api_token: env::var("API_TOKEN").expect("API_TOKEN must be set"),
            http_timeout_secs: env::var("HTTP_TIMEOUT_SECS")
                .unwrap_or_else(|_| "30".to_string())
                .parse()
                .unwrap(),
            member_cache_capacity: env::var("MEMBER_CACHE_CAPACITY")
                .unwrap_or_else(|_| "10000".to_string())
                .parse()
                .unwrap(),
            member_warmup_batch: env::var("MEMBER_WARMUP_BATCH")
                .unwrap_or_else(|_| "250".to_string())
                .parse()
                .unwrap(),
        }
    }
}
