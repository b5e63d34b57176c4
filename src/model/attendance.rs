use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

/// One calendar day of attendance for one member. `(member_id, date)` is the
/// natural key; the backend keeps at most one record per pair and never sets
/// `time_out` before `time_in`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttendanceRecord {
    #[serde(default)]
    pub attendance_id: Option<u64>,
    pub member_id: String,
    pub date: NaiveDate,
    #[serde(default)]
    pub time_in: Option<NaiveDateTime>,
    #[serde(default)]
    pub time_out: Option<NaiveDateTime>,
    /// Derived label ("Present"), not used for any decision here
    #[serde(default)]
    pub status: Option<String>,
}

impl AttendanceRecord {
    /// Time-in recorded, no time-out yet.
    pub fn is_open(&self) -> bool {
        self.time_in.is_some() && self.time_out.is_none()
    }

    /// Both events recorded for the day.
    pub fn is_complete(&self) -> bool {
        self.time_in.is_some() && self.time_out.is_some()
    }
}
