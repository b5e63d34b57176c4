use async_trait::async_trait;
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::debug;

use super::{ApiError, AttendanceApi};
use crate::config::Config;
use crate::model::attendance::AttendanceRecord;
use crate::model::member::Member;

const USER_AGENT: &str = concat!("gms-station/", env!("CARGO_PKG_VERSION"));

/// HTTP client for the gym backend
pub struct GymApiClient {
    http_client: reqwest::Client,
    base_url: String,
    api_token: String,
}

impl GymApiClient {
    pub fn new(base_url: &str, api_token: &str, timeout_secs: u64) -> Result<Self, ApiError> {
        let http_client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .map_err(|e| ApiError::Network(e.to_string()))?;

        Ok(Self {
            http_client,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_token: api_token.to_string(),
        })
    }

    pub fn from_config(config: &Config) -> Result<Self, ApiError> {
        Self::new(
            &config.api_base_url,
            &config.api_token,
            config.http_timeout_secs,
        )
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        debug!(path, "GET");

        let response = self
            .http_client
            .get(self.url(path))
            .bearer_auth(&self.api_token)
            .send()
            .await
            .map_err(|e| ApiError::Network(e.to_string()))?;

        Self::decode(response, path).await
    }

    async fn post_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        debug!(path, "POST");

        let response = self
            .http_client
            .post(self.url(path))
            .bearer_auth(&self.api_token)
            .send()
            .await
            .map_err(|e| ApiError::Network(e.to_string()))?;

        Self::decode(response, path).await
    }

    async fn decode<T: DeserializeOwned>(
        response: reqwest::Response,
        path: &str,
    ) -> Result<T, ApiError> {
        let status = response.status();

        if status == StatusCode::UNAUTHORIZED {
            return Err(ApiError::Unauthorized);
        }

        if status == StatusCode::NOT_FOUND {
            return Err(ApiError::NotFound(path.to_string()));
        }

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ApiError::Api(status.as_u16(), body));
        }

        response
            .json::<T>()
            .await
            .map_err(|e| ApiError::Decode(e.to_string()))
    }
}

#[async_trait]
impl AttendanceApi for GymApiClient {
    async fn resolve_member(&self, member_id: &str) -> Result<Member, ApiError> {
        self.get_json(&format!("/v1/member/{}", member_id)).await
    }

    async fn list_members(&self) -> Result<Vec<Member>, ApiError> {
        self.get_json("/v1/member").await
    }

    async fn attendance_for_member(
        &self,
        member_id: &str,
    ) -> Result<Vec<AttendanceRecord>, ApiError> {
        self.get_json(&format!("/v1/attendance/member/{}", member_id))
            .await
    }

    async fn record_attendance_event(
        &self,
        member_id: &str,
    ) -> Result<AttendanceRecord, ApiError> {
        self.post_json(&format!("/v1/attendance/scan/{}", member_id))
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn client_creation_succeeds() {
        let client = GymApiClient::new("http://localhost:3500/api", "token", 30);
        assert!(client.is_ok());
    }

    #[test]
    fn base_url_trailing_slash_is_normalized() {
        let client = GymApiClient::new("http://localhost:3500/api/", "token", 30).unwrap();
        assert_eq!(
            client.url("/v1/member/4821"),
            "http://localhost:3500/api/v1/member/4821"
        );
    }
}
