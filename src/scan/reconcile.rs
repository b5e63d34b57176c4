use chrono::{NaiveDate, Utc};
use std::sync::Arc;
use thiserror::Error;
use tracing::{error, info};

use crate::api::{ApiError, AttendanceApi};
use crate::model::member::Member;
use crate::scan::payload::{ParseError, parse_member_id};
use crate::utils::flight_guard::FlightGuard;
use crate::utils::member_cache::MemberCache;

/// Failure while reconciling a parsed member id
#[derive(Debug, Error)]
pub enum ReconcileError {
    /// The id parsed but the backend knows no such member
    #[error("memberId {0} not found")]
    MemberNotFound(String),

    /// Resolve, read or write failed in transit; not retried here, the
    /// operator may rescan
    #[error(transparent)]
    Transport(#[from] ApiError),
}

/// Decision reached for one accepted scan
#[derive(Debug, Clone)]
pub enum ScanOutcome {
    /// First scan of the day
    TimeIn(Member),
    /// Closing scan of an open day
    TimeOut(Member),
    /// Both events already on record; nothing was written
    AlreadyComplete(Member),
}

impl ScanOutcome {
    /// Operator-facing line for this outcome
    pub fn message(&self) -> String {
        match self {
            ScanOutcome::TimeIn(m) => format!("Time in recorded for {}", m.name),
            ScanOutcome::TimeOut(m) => format!("Time out recorded for {}", m.name),
            ScanOutcome::AlreadyComplete(m) => {
                format!("Already time in and time out set for {}", m.name)
            }
        }
    }
}

/// Turns a parsed member id into exactly one attendance outcome: time-in,
/// time-out, or already-complete.
pub struct Reconciler {
    api: Arc<dyn AttendanceApi>,
    cache: MemberCache,
    flights: FlightGuard,
}

impl Reconciler {
    /// The member cache is created by the owning scan session and dropped
    /// with it; it is handed in rather than kept as a process-wide static.
    pub fn new(api: Arc<dyn AttendanceApi>, cache: MemberCache) -> Self {
        Self {
            api,
            cache,
            flights: FlightGuard::new(),
        }
    }

    fn today() -> NaiveDate {
        // calendar day partition matches the backend's UTC-derived date
        Utc::now().date_naive()
    }

    async fn lookup_member(&self, member_id: &str) -> Result<Member, ReconcileError> {
        if let Some(member) = self.cache.get(member_id).await {
            return Ok(member);
        }

        match self.api.resolve_member(member_id).await {
            Ok(member) => {
                self.cache.insert(member.clone()).await;
                Ok(member)
            }
            Err(ApiError::NotFound(_)) => {
                Err(ReconcileError::MemberNotFound(member_id.to_string()))
            }
            Err(e) => {
                error!(error = %e, member_id, "Failed to fetch member");
                Err(ReconcileError::Transport(e))
            }
        }
    }

    /// Decide time-in vs time-out for one scanned member id and record it.
    pub async fn reconcile(&self, member_id: &str) -> Result<ScanOutcome, ReconcileError> {
        let today = Self::today();

        // one reconciliation in flight per member per day
        let _slot = self.flights.acquire(member_id, today).await;

        let member = self.lookup_member(member_id).await?;

        let records = self.api.attendance_for_member(member_id).await?;
        let todays = records.into_iter().find(|record| record.date == today);

        if let Some(record) = &todays {
            if record.is_complete() {
                info!(member_id, "Scan ignored, day already complete");
                return Ok(ScanOutcome::AlreadyComplete(member));
            }
        }

        // the server decides which field this write fills; the outcome is
        // phrased from the record it hands back
        let written = self.api.record_attendance_event(member_id).await?;

        if written.time_out.is_some() {
            info!(member_id, "Time out recorded");
            Ok(ScanOutcome::TimeOut(member))
        } else {
            info!(member_id, "Time in recorded");
            Ok(ScanOutcome::TimeIn(member))
        }
    }
}

/// Outcome surfaced to the operator: one line plus a success flag
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanFeedback {
    pub message: String,
    pub ok: bool,
}

impl ScanFeedback {
    fn success(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            ok: true,
        }
    }

    fn failure(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            ok: false,
        }
    }
}

/// Recovery boundary for one raw scanned payload: every parse, lookup and
/// transport failure ends here as operator feedback, nothing propagates as a
/// raw error. Empty payloads yield `None` and the session keeps scanning.
pub async fn process_scan(reconciler: &Reconciler, raw: &str) -> Option<ScanFeedback> {
    let member_id = match parse_member_id(raw) {
        Ok(id) => id,
        Err(ParseError::Empty) => return None,
        Err(err @ ParseError::MalformedPayload) => {
            return Some(ScanFeedback::failure(err.to_string()));
        }
    };

    match reconciler.reconcile(&member_id).await {
        Ok(outcome) => Some(ScanFeedback::success(outcome.message())),
        Err(err @ ReconcileError::MemberNotFound(_)) => {
            Some(ScanFeedback::failure(err.to_string()))
        }
        Err(ReconcileError::Transport(e)) => {
            error!(error = %e, member_id, "Failed to process scan");
            Some(ScanFeedback::failure(
                "Failed to process QR code. Please ensure the QR code is valid.",
            ))
        }
    }
}
