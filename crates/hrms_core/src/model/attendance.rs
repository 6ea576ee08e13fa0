//! Attendance domain model.
//!
//! # Invariants
//! - At most one record per `(employee, date)` pair.
//! - `check_out` is not earlier than `check_in` when both are set.
//! - Records are hard-deleted.

use super::employee::EmployeeId;
use super::ValidationError;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub type AttendanceId = Uuid;

/// Day status for one attendance record.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AttendanceStatus {
    #[default]
    Present,
    Absent,
    HalfDay,
    Leave,
}

impl AttendanceStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Present => "present",
            Self::Absent => "absent",
            Self::HalfDay => "half-day",
            Self::Leave => "leave",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "present" => Some(Self::Present),
            "absent" => Some(Self::Absent),
            "half-day" => Some(Self::HalfDay),
            "leave" => Some(Self::Leave),
            _ => None,
        }
    }
}

/// Persisted attendance row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Attendance {
    pub id: AttendanceId,
    pub employee: EmployeeId,
    pub date: NaiveDate,
    /// Unix epoch milliseconds.
    pub check_in: Option<i64>,
    /// Unix epoch milliseconds.
    pub check_out: Option<i64>,
    pub status: AttendanceStatus,
    pub notes: Option<String>,
    pub created_at: i64,
    pub updated_at: i64,
}

impl Attendance {
    pub fn validate(&self) -> Result<(), ValidationError> {
        validate_check_times(self.check_in, self.check_out)
    }
}

/// Input for marking attendance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewAttendance {
    pub employee: EmployeeId,
    pub date: NaiveDate,
    pub check_in: Option<i64>,
    pub check_out: Option<i64>,
    pub status: AttendanceStatus,
    pub notes: Option<String>,
}

impl NewAttendance {
    pub fn new(employee: EmployeeId, date: NaiveDate) -> Self {
        Self {
            employee,
            date,
            check_in: None,
            check_out: None,
            status: AttendanceStatus::default(),
            notes: None,
        }
    }

    pub fn normalized(&self) -> Result<Self, ValidationError> {
        validate_check_times(self.check_in, self.check_out)?;
        Ok(Self {
            notes: self.notes.as_deref().map(|notes| notes.trim().to_string()),
            ..self.clone()
        })
    }
}

/// Partial update for an attendance record.
///
/// `notes` is applied whenever present, so `Some("")` clears it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AttendancePatch {
    pub check_in: Option<i64>,
    pub check_out: Option<i64>,
    pub status: Option<AttendanceStatus>,
    pub notes: Option<String>,
}

impl AttendancePatch {
    pub fn apply(&self, attendance: &mut Attendance) {
        if let Some(check_in) = self.check_in {
            attendance.check_in = Some(check_in);
        }
        if let Some(check_out) = self.check_out {
            attendance.check_out = Some(check_out);
        }
        if let Some(status) = self.status {
            attendance.status = status;
        }
        if let Some(notes) = &self.notes {
            attendance.notes = Some(notes.trim().to_string());
        }
    }
}

fn validate_check_times(check_in: Option<i64>, check_out: Option<i64>) -> Result<(), ValidationError> {
    if let (Some(check_in), Some(check_out)) = (check_in, check_out) {
        if check_out < check_in {
            return Err(ValidationError::OutOfOrder {
                earlier: "checkIn",
                later: "checkOut",
            });
        }
    }
    Ok(())
}
