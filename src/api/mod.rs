use async_trait::async_trait;
use thiserror::Error;

use crate::model::attendance::AttendanceRecord;
use crate::model::member::Member;

pub mod client;

/// Errors surfaced by the gym backend client
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Network error: {0}")]
    Network(String),

    /// The backend rejected the station token; an operator has to
    /// re-provision it before scanning can continue.
    #[error("Unauthorized: station token rejected")]
    Unauthorized,

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("API error {0}: {1}")]
    Api(u16, String),

    #[error("Decode error: {0}")]
    Decode(String),
}

/// Operations the check-in workflow consumes from the gym backend.
///
/// The backend stays the system of record: the scan write carries no
/// timestamps, and the server decides whether it fills time-in or time-out
/// from the state it already holds for today.
#[async_trait]
pub trait AttendanceApi: Send + Sync {
    async fn resolve_member(&self, member_id: &str) -> Result<Member, ApiError>;

    async fn list_members(&self) -> Result<Vec<Member>, ApiError>;

    async fn attendance_for_member(
        &self,
        member_id: &str,
    ) -> Result<Vec<AttendanceRecord>, ApiError>;

    /// Record one scan event; the returned record reflects the post-write
    /// state for today.
    async fn record_attendance_event(&self, member_id: &str)
        -> Result<AttendanceRecord, ApiError>;
}
