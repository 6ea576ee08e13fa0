//! HR domain model: departments, employees, attendance and leave.
//!
//! # Responsibility
//! - Define canonical records persisted by the entity store.
//! - Own field normalization, validation and partial-update merge rules.
//!
//! # Invariants
//! - Every record is identified by a stable UUID that is never reused.
//! - Department and Employee are soft-deleted (`is_active=false`), never removed.
//! - Attendance and Leave are hard-deleted.
//! - Instants are Unix epoch milliseconds; calendar days are `NaiveDate`.

use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod attendance;
pub mod department;
pub mod employee;
pub mod leave;
pub mod projection;

/// Entity kinds known by the store. Used to label not-found and
/// duplicate-key failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityKind {
    Department,
    Employee,
    Attendance,
    Leave,
}

impl EntityKind {
    /// Human-readable label used in error messages.
    pub fn label(self) -> &'static str {
        match self {
            Self::Department => "Department",
            Self::Employee => "Employee",
            Self::Attendance => "Attendance record",
            Self::Leave => "Leave request",
        }
    }
}

impl Display for EntityKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Field-level validation failure raised before any write.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Required field is missing or blank after trim.
    Required(&'static str),
    /// Field value is present but malformed.
    Invalid {
        field: &'static str,
        message: String,
    },
    /// Two related fields are in the wrong order (e.g. end before start).
    OutOfOrder {
        earlier: &'static str,
        later: &'static str,
    },
}

impl ValidationError {
    pub fn invalid(field: &'static str, message: impl Into<String>) -> Self {
        Self::Invalid {
            field,
            message: message.into(),
        }
    }

    /// Name of the offending field.
    pub fn field(&self) -> &'static str {
        match self {
            Self::Required(field) => field,
            Self::Invalid { field, .. } => field,
            Self::OutOfOrder { later, .. } => later,
        }
    }
}

impl Display for ValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Required(field) => write!(f, "{field} is required"),
            Self::Invalid { field, message } => write!(f, "invalid {field}: {message}"),
            Self::OutOfOrder { earlier, later } => {
                write!(f, "{later} must not be earlier than {earlier}")
            }
        }
    }
}

impl Error for ValidationError {}

/// Trims a required text field and rejects blank values.
pub(crate) fn require_text(field: &'static str, value: &str) -> Result<String, ValidationError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::Required(field));
    }
    Ok(trimmed.to_string())
}

/// Trims an optional text field; blank collapses to `None`.
pub(crate) fn optional_text(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|trimmed| !trimmed.is_empty())
        .map(ToString::to_string)
}

#[cfg(test)]
mod tests {
    use super::{optional_text, require_text, ValidationError};

    #[test]
    fn require_text_trims_and_rejects_blank() {
        assert_eq!(require_text("name", "  Ops ").unwrap(), "Ops");
        assert_eq!(
            require_text("name", "   ").unwrap_err(),
            ValidationError::Required("name")
        );
    }

    #[test]
    fn optional_text_collapses_blank_to_none() {
        assert_eq!(optional_text(Some("  ")), None);
        assert_eq!(optional_text(Some(" x ")).as_deref(), Some("x"));
        assert_eq!(optional_text(None), None);
    }
}
