//! Compact read-time projections embedded in responses.
//!
//! These are views only. Nothing here is written back to storage.

use super::department::{Department, DepartmentId};
use super::employee::{Employee, EmployeeId};
use serde::Serialize;

/// Employee as embedded in attendance and leave responses.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EmployeeRef {
    pub id: EmployeeId,
    pub first_name: String,
    pub last_name: String,
    #[serde(rename = "employeeId")]
    pub employee_code: String,
}

impl From<&Employee> for EmployeeRef {
    fn from(value: &Employee) -> Self {
        Self {
            id: value.id,
            first_name: value.first_name.clone(),
            last_name: value.last_name.clone(),
            employee_code: value.employee_code.clone(),
        }
    }
}

/// Department as embedded in employee responses.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DepartmentRef {
    pub id: DepartmentId,
    pub name: String,
}

impl From<&Department> for DepartmentRef {
    fn from(value: &Department) -> Self {
        Self {
            id: value.id,
            name: value.name.clone(),
        }
    }
}

/// Manager as embedded in employee responses.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ManagerRef {
    pub id: EmployeeId,
    pub first_name: String,
    pub last_name: String,
}

impl From<&Employee> for ManagerRef {
    fn from(value: &Employee) -> Self {
        Self {
            id: value.id,
            first_name: value.first_name.clone(),
            last_name: value.last_name.clone(),
        }
    }
}
