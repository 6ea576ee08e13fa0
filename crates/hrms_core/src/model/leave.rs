//! Leave request domain model.
//!
//! # Invariants
//! - New requests start as `pending` with no `approved_at`.
//! - Moving into `approved` or `rejected` stamps `approved_at`; moving into
//!   `pending` leaves it untouched. Every status is reachable from every status.
//! - `end_date` is not earlier than `start_date`.

use super::employee::EmployeeId;
use super::{optional_text, ValidationError};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub type LeaveId = Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LeaveType {
    Sick,
    Casual,
    Annual,
    Unpaid,
}

impl LeaveType {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Sick => "sick",
            Self::Casual => "casual",
            Self::Annual => "annual",
            Self::Unpaid => "unpaid",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "sick" => Some(Self::Sick),
            "casual" => Some(Self::Casual),
            "annual" => Some(Self::Annual),
            "unpaid" => Some(Self::Unpaid),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LeaveStatus {
    #[default]
    Pending,
    Approved,
    Rejected,
}

impl LeaveStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Approved => "approved",
            Self::Rejected => "rejected",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "pending" => Some(Self::Pending),
            "approved" => Some(Self::Approved),
            "rejected" => Some(Self::Rejected),
            _ => None,
        }
    }

    /// Whether entering this status records a decision timestamp.
    pub fn is_decision(self) -> bool {
        matches!(self, Self::Approved | Self::Rejected)
    }
}

/// Persisted leave request row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Leave {
    pub id: LeaveId,
    pub employee: EmployeeId,
    pub leave_type: LeaveType,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub reason: Option<String>,
    pub status: LeaveStatus,
    /// Unix epoch milliseconds of the latest approve/reject decision.
    pub approved_at: Option<i64>,
    pub created_at: i64,
    pub updated_at: i64,
}

impl Leave {
    /// Number of calendar days covered, both ends inclusive.
    pub fn day_count(&self) -> i64 {
        (self.end_date - self.start_date).num_days() + 1
    }
}

/// Input for filing a leave request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewLeave {
    pub employee: EmployeeId,
    pub leave_type: LeaveType,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub reason: Option<String>,
}

impl NewLeave {
    pub fn normalized(&self) -> Result<Self, ValidationError> {
        if self.end_date < self.start_date {
            return Err(ValidationError::OutOfOrder {
                earlier: "startDate",
                later: "endDate",
            });
        }
        Ok(Self {
            reason: optional_text(self.reason.as_deref()),
            ..self.clone()
        })
    }
}

#[cfg(test)]
mod tests {
    use super::{Leave, LeaveStatus, LeaveType, NewLeave};
    use chrono::NaiveDate;
    use uuid::Uuid;

    fn date(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 2, day).unwrap()
    }

    #[test]
    fn only_approve_and_reject_are_decisions() {
        assert!(LeaveStatus::Approved.is_decision());
        assert!(LeaveStatus::Rejected.is_decision());
        assert!(!LeaveStatus::Pending.is_decision());
    }

    #[test]
    fn reversed_range_is_rejected() {
        let input = NewLeave {
            employee: Uuid::new_v4(),
            leave_type: LeaveType::Sick,
            start_date: date(3),
            end_date: date(1),
            reason: None,
        };
        assert_eq!(input.normalized().unwrap_err().field(), "endDate");
    }

    #[test]
    fn day_count_is_inclusive() {
        let leave = Leave {
            id: Uuid::new_v4(),
            employee: Uuid::new_v4(),
            leave_type: LeaveType::Annual,
            start_date: date(1),
            end_date: date(3),
            reason: None,
            status: LeaveStatus::Pending,
            approved_at: None,
            created_at: 0,
            updated_at: 0,
        };
        assert_eq!(leave.day_count(), 3);
    }

    #[test]
    fn leave_type_text_is_stable() {
        for kind in [
            LeaveType::Sick,
            LeaveType::Casual,
            LeaveType::Annual,
            LeaveType::Unpaid,
        ] {
            assert_eq!(LeaveType::parse(kind.as_str()), Some(kind));
        }
    }
}
