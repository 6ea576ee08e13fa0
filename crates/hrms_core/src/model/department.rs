//! Department domain model.
//!
//! # Invariants
//! - `name` is trimmed, non-blank and unique across all departments.
//! - Deleting a department only clears `is_active`.

use super::{optional_text, require_text, ValidationError};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub type DepartmentId = Uuid;

/// Persisted department row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Department {
    pub id: DepartmentId,
    pub name: String,
    pub description: Option<String>,
    pub is_active: bool,
    /// Unix epoch milliseconds.
    pub created_at: i64,
    /// Unix epoch milliseconds.
    pub updated_at: i64,
}

impl Department {
    /// Re-checks persisted invariants before an update is written.
    pub fn validate(&self) -> Result<(), ValidationError> {
        require_text("name", &self.name)?;
        Ok(())
    }
}

/// Input for creating a department.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NewDepartment {
    pub name: String,
    pub description: Option<String>,
}

impl NewDepartment {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: None,
        }
    }

    /// Trims fields and checks required presence.
    pub fn normalized(&self) -> Result<Self, ValidationError> {
        Ok(Self {
            name: require_text("name", &self.name)?,
            description: optional_text(self.description.as_deref()),
        })
    }
}

/// Partial update for a department.
///
/// Blank `name`/`description` keep the stored value; `is_active` applies
/// whenever present, including `false`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DepartmentPatch {
    pub name: Option<String>,
    pub description: Option<String>,
    pub is_active: Option<bool>,
}

impl DepartmentPatch {
    pub fn apply(&self, department: &mut Department) {
        if let Some(name) = optional_text(self.name.as_deref()) {
            department.name = name;
        }
        if let Some(description) = optional_text(self.description.as_deref()) {
            department.description = Some(description);
        }
        if let Some(is_active) = self.is_active {
            department.is_active = is_active;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{Department, DepartmentPatch, NewDepartment};
    use crate::model::ValidationError;
    use uuid::Uuid;

    fn sample() -> Department {
        Department {
            id: Uuid::new_v4(),
            name: "Engineering".to_string(),
            description: Some("builds things".to_string()),
            is_active: true,
            created_at: 1,
            updated_at: 1,
        }
    }

    #[test]
    fn new_department_requires_name() {
        let err = NewDepartment::new("  ").normalized().unwrap_err();
        assert_eq!(err, ValidationError::Required("name"));
    }

    #[test]
    fn patch_keeps_values_for_blank_fields_and_applies_false_flag() {
        let mut department = sample();
        let patch = DepartmentPatch {
            name: Some(" ".to_string()),
            description: None,
            is_active: Some(false),
        };
        patch.apply(&mut department);

        assert_eq!(department.name, "Engineering");
        assert_eq!(department.description.as_deref(), Some("builds things"));
        assert!(!department.is_active);
    }
}
