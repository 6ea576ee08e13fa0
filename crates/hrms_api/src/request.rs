//! Inbound field-set decoding.
//!
//! Bodies arrive as camelCase JSON objects. Every field is optional at this
//! layer; required-ness is decided by the core model so that missing and
//! blank values fail the same way.

use chrono::{DateTime, NaiveDate, Utc};
use hrms_core::{AttendanceStatus, LeaveStatus, LeaveType, ValidationError};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;
use uuid::Uuid;

/// Request rejected before reaching a service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct BadRequest(pub String);

impl From<ValidationError> for BadRequest {
    fn from(value: ValidationError) -> Self {
        Self(value.to_string())
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub(crate) struct DepartmentBody {
    pub name: Option<String>,
    pub description: Option<String>,
    pub is_active: Option<bool>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub(crate) struct EmployeeBody {
    pub email: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub employee_id: Option<String>,
    pub department: Option<String>,
    pub manager: Option<String>,
    pub position: Option<String>,
    pub phone: Option<String>,
    pub joining_date: Option<Value>,
    pub is_active: Option<bool>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub(crate) struct AttendanceBody {
    pub employee: Option<String>,
    pub date: Option<String>,
    pub check_in: Option<Value>,
    pub check_out: Option<Value>,
    pub status: Option<AttendanceStatus>,
    pub notes: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub(crate) struct LeaveBody {
    pub employee: Option<String>,
    pub employee_id: Option<String>,
    pub leave_type: Option<LeaveType>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub reason: Option<String>,
}

impl LeaveBody {
    /// The employee reference; `employee` wins over `employeeId` when both
    /// are sent.
    pub fn employee_ref(&self) -> Option<&str> {
        self.employee
            .as_deref()
            .filter(|value| !value.trim().is_empty())
            .or(self.employee_id.as_deref())
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub(crate) struct LeaveStatusBody {
    pub status: Option<LeaveStatus>,
}

/// Query parameters shared by the attendance and leave listings.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub(crate) struct ListParams {
    pub employee_id: Option<String>,
    pub department: Option<String>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
}

/// Decodes `body` into `T`. `null` is treated as an empty field set.
pub(crate) fn decode<T: DeserializeOwned + Default>(body: &Value) -> Result<T, BadRequest> {
    if body.is_null() {
        return Ok(T::default());
    }
    T::deserialize(body).map_err(|err| BadRequest(format!("malformed request body: {err}")))
}

/// Parses a path id.
pub(crate) fn parse_id(raw: &str) -> Result<Uuid, BadRequest> {
    Uuid::parse_str(raw.trim()).map_err(|_| BadRequest(format!("invalid id `{}`", raw.trim())))
}

/// Parses an optional reference; blank means absent.
pub(crate) fn optional_ref(value: Option<&str>, field: &'static str) -> Result<Option<Uuid>, BadRequest> {
    match value.map(str::trim).filter(|trimmed| !trimmed.is_empty()) {
        Some(text) => Uuid::parse_str(text)
            .map(Some)
            .map_err(|_| ValidationError::invalid(field, format!("`{text}` is not a valid id")).into()),
        None => Ok(None),
    }
}

pub(crate) fn required_ref(value: Option<&str>, field: &'static str) -> Result<Uuid, BadRequest> {
    optional_ref(value, field)?.ok_or_else(|| ValidationError::Required(field).into())
}

/// Parses a calendar day given as `YYYY-MM-DD` or as an RFC 3339 datetime,
/// keeping the UTC date.
pub(crate) fn parse_day(raw: &str, field: &'static str) -> Result<NaiveDate, BadRequest> {
    let trimmed = raw.trim();
    if let Ok(day) = NaiveDate::parse_from_str(trimmed, "%Y-%m-%d") {
        return Ok(day);
    }
    DateTime::parse_from_rfc3339(trimmed)
        .map(|instant| instant.with_timezone(&Utc).date_naive())
        .map_err(|_| ValidationError::invalid(field, format!("`{trimmed}` is not a date")).into())
}

pub(crate) fn optional_day(value: Option<&str>, field: &'static str) -> Result<Option<NaiveDate>, BadRequest> {
    match value.map(str::trim).filter(|trimmed| !trimmed.is_empty()) {
        Some(text) => parse_day(text, field).map(Some),
        None => Ok(None),
    }
}

pub(crate) fn required_day(value: Option<&str>, field: &'static str) -> Result<NaiveDate, BadRequest> {
    optional_day(value, field)?.ok_or_else(|| ValidationError::Required(field).into())
}

/// Parses an instant given as epoch milliseconds or an RFC 3339 string.
pub(crate) fn optional_instant(value: Option<&Value>, field: &'static str) -> Result<Option<i64>, BadRequest> {
    let invalid = |shown: &str| -> BadRequest {
        ValidationError::invalid(field, format!("`{shown}` is not a timestamp")).into()
    };
    match value {
        None | Some(Value::Null) => Ok(None),
        Some(Value::Number(number)) => number
            .as_i64()
            .map(Some)
            .ok_or_else(|| invalid(&number.to_string())),
        Some(Value::String(text)) => {
            let trimmed = text.trim();
            if trimmed.is_empty() {
                return Ok(None);
            }
            if let Ok(millis) = trimmed.parse::<i64>() {
                return Ok(Some(millis));
            }
            DateTime::parse_from_rfc3339(trimmed)
                .map(|instant| Some(instant.timestamp_millis()))
                .map_err(|_| invalid(trimmed))
        }
        Some(other) => Err(invalid(&other.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::{decode, optional_instant, optional_ref, parse_day, LeaveBody};
    use chrono::NaiveDate;
    use serde_json::json;

    #[test]
    fn days_accept_plain_dates_and_rfc3339() {
        let expected = NaiveDate::from_ymd_opt(2024, 1, 15).unwrap();
        assert_eq!(parse_day("2024-01-15", "date").unwrap(), expected);
        assert_eq!(
            parse_day("2024-01-15T23:30:00-02:00", "date").unwrap(),
            NaiveDate::from_ymd_opt(2024, 1, 16).unwrap()
        );
        assert!(parse_day("15/01/2024", "date").is_err());
    }

    #[test]
    fn instants_accept_millis_and_rfc3339() {
        assert_eq!(
            optional_instant(Some(&json!(1_700_000_000_000_i64)), "checkIn").unwrap(),
            Some(1_700_000_000_000)
        );
        assert_eq!(
            optional_instant(Some(&json!("1970-01-01T00:00:01Z")), "checkIn").unwrap(),
            Some(1_000)
        );
        assert_eq!(optional_instant(Some(&json!(null)), "checkIn").unwrap(), None);
        assert!(optional_instant(Some(&json!(true)), "checkIn").is_err());
    }

    #[test]
    fn blank_reference_is_absent() {
        assert_eq!(optional_ref(Some("  "), "department").unwrap(), None);
        assert!(optional_ref(Some("nope"), "department").is_err());
    }

    #[test]
    fn leave_body_accepts_employee_id_key() {
        let body: LeaveBody = decode(&json!({
            "employeeId": "4f0c3c4e-3d5e-4a53-9a57-1d2b6f0d7e11",
            "leaveType": "sick",
        }))
        .unwrap();
        assert_eq!(
            body.employee_ref(),
            Some("4f0c3c4e-3d5e-4a53-9a57-1d2b6f0d7e11")
        );
        assert!(decode::<LeaveBody>(&json!({"leaveType": "vacation"})).is_err());
    }

    #[test]
    fn leave_body_prefers_employee_over_employee_id() {
        let body: LeaveBody = decode(&json!({
            "employee": "11111111-1111-4111-8111-111111111111",
            "employeeId": "22222222-2222-4222-8222-222222222222",
        }))
        .unwrap();
        assert_eq!(
            body.employee_ref(),
            Some("11111111-1111-4111-8111-111111111111")
        );

        let blank: LeaveBody = decode(&json!({
            "employee": " ",
            "employeeId": "22222222-2222-4222-8222-222222222222",
        }))
        .unwrap();
        assert_eq!(
            blank.employee_ref(),
            Some("22222222-2222-4222-8222-222222222222")
        );
    }
}
