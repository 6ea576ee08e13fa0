//! Employee domain model.
//!
//! # Responsibility
//! - Define the persisted employee row and its create/patch inputs.
//! - Normalize contact fields before uniqueness checks.
//!
//! # Invariants
//! - `email` is trimmed and lowercased; unique across active and inactive rows.
//! - `employee_code` (exposed as `employeeId`) is trimmed and unique.
//! - `manager` is a lookup id, never an owning reference.
//! - Deleting an employee only clears `is_active`.

use super::department::DepartmentId;
use super::{optional_text, require_text, ValidationError};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub type EmployeeId = Uuid;

static EMAIL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("valid email regex"));

/// Persisted employee row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Employee {
    pub id: EmployeeId,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    /// Organisation-assigned code, unique per employee.
    #[serde(rename = "employeeId")]
    pub employee_code: String,
    pub department: Option<DepartmentId>,
    pub manager: Option<EmployeeId>,
    pub position: Option<String>,
    pub phone: Option<String>,
    /// Unix epoch milliseconds. Defaults to creation time.
    pub joining_date: i64,
    pub is_active: bool,
    pub created_at: i64,
    pub updated_at: i64,
}

impl Employee {
    /// Re-checks persisted invariants before an update is written.
    pub fn validate(&self) -> Result<(), ValidationError> {
        validate_email(&self.email)?;
        require_text("firstName", &self.first_name)?;
        require_text("lastName", &self.last_name)?;
        require_text("employeeId", &self.employee_code)?;
        if self.manager == Some(self.id) {
            return Err(ValidationError::invalid(
                "manager",
                "an employee cannot manage themselves",
            ));
        }
        Ok(())
    }
}

/// Input for creating an employee.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NewEmployee {
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub employee_code: String,
    pub department: Option<DepartmentId>,
    pub manager: Option<EmployeeId>,
    pub position: Option<String>,
    pub phone: Option<String>,
    /// Unix epoch milliseconds; `None` means "now" at insert time.
    pub joining_date: Option<i64>,
}

impl NewEmployee {
    /// Trims all text, lowercases email and checks required presence.
    pub fn normalized(&self) -> Result<Self, ValidationError> {
        Ok(Self {
            email: normalize_email(&self.email)?,
            first_name: require_text("firstName", &self.first_name)?,
            last_name: require_text("lastName", &self.last_name)?,
            employee_code: require_text("employeeId", &self.employee_code)?,
            department: self.department,
            manager: self.manager,
            position: optional_text(self.position.as_deref()),
            phone: optional_text(self.phone.as_deref()),
            joining_date: self.joining_date,
        })
    }
}

/// Partial update for an employee.
///
/// Absent or blank fields keep the stored value. `is_active` applies whenever
/// present. `employee_code` is immutable after creation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EmployeePatch {
    pub email: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub department: Option<DepartmentId>,
    pub manager: Option<EmployeeId>,
    pub position: Option<String>,
    pub phone: Option<String>,
    pub is_active: Option<bool>,
}

impl EmployeePatch {
    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }

    /// Merges present values into `employee`.
    pub fn apply(&self, employee: &mut Employee) -> Result<(), ValidationError> {
        if let Some(email) = optional_text(self.email.as_deref()) {
            employee.email = normalize_email(&email)?;
        }
        if let Some(first_name) = optional_text(self.first_name.as_deref()) {
            employee.first_name = first_name;
        }
        if let Some(last_name) = optional_text(self.last_name.as_deref()) {
            employee.last_name = last_name;
        }
        if let Some(department) = self.department {
            employee.department = Some(department);
        }
        if let Some(manager) = self.manager {
            employee.manager = Some(manager);
        }
        if let Some(position) = optional_text(self.position.as_deref()) {
            employee.position = Some(position);
        }
        if let Some(phone) = optional_text(self.phone.as_deref()) {
            employee.phone = Some(phone);
        }
        if let Some(is_active) = self.is_active {
            employee.is_active = is_active;
        }
        Ok(())
    }
}

/// Trims, lowercases and shape-checks an email address.
pub fn normalize_email(value: &str) -> Result<String, ValidationError> {
    let normalized = require_text("email", value)?.to_lowercase();
    validate_email(&normalized)?;
    Ok(normalized)
}

fn validate_email(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::Required("email"));
    }
    if !EMAIL_RE.is_match(value) {
        return Err(ValidationError::invalid(
            "email",
            format!("`{value}` is not an email address"),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::{normalize_email, Employee, EmployeePatch, NewEmployee};
    use crate::model::ValidationError;
    use uuid::Uuid;

    fn sample() -> Employee {
        Employee {
            id: Uuid::new_v4(),
            email: "a@x.com".to_string(),
            first_name: "Ada".to_string(),
            last_name: "Byron".to_string(),
            employee_code: "E1".to_string(),
            department: None,
            manager: None,
            position: Some("Engineer".to_string()),
            phone: None,
            joining_date: 10,
            is_active: true,
            created_at: 10,
            updated_at: 10,
        }
    }

    #[test]
    fn email_is_trimmed_and_lowercased() {
        assert_eq!(normalize_email("  A@X.Com ").unwrap(), "a@x.com");
    }

    #[test]
    fn malformed_email_is_rejected() {
        let err = normalize_email("not-an-email").unwrap_err();
        assert_eq!(err.field(), "email");
    }

    #[test]
    fn new_employee_requires_names_and_code() {
        let input = NewEmployee {
            email: "a@x.com".to_string(),
            first_name: "A".to_string(),
            last_name: " ".to_string(),
            employee_code: "E1".to_string(),
            ..NewEmployee::default()
        };
        assert_eq!(
            input.normalized().unwrap_err(),
            ValidationError::Required("lastName")
        );
    }

    #[test]
    fn empty_patch_changes_nothing() {
        let mut employee = sample();
        let before = employee.clone();
        let patch = EmployeePatch::default();
        assert!(patch.is_empty());
        patch.apply(&mut employee).unwrap();
        assert_eq!(employee, before);
    }

    #[test]
    fn blank_text_is_ignored_but_false_flag_applies() {
        let mut employee = sample();
        let patch = EmployeePatch {
            first_name: Some(String::new()),
            position: Some("  ".to_string()),
            is_active: Some(false),
            ..EmployeePatch::default()
        };
        patch.apply(&mut employee).unwrap();
        assert_eq!(employee.first_name, "Ada");
        assert_eq!(employee.position.as_deref(), Some("Engineer"));
        assert!(!employee.is_active);
    }

    #[test]
    fn self_management_fails_validation() {
        let mut employee = sample();
        employee.manager = Some(employee.id);
        assert_eq!(employee.validate().unwrap_err().field(), "manager");
    }
}
