//! Read-time population of foreign keys into compact projections.
//!
//! # Responsibility
//! - Build response views where referenced ids are swapped for projections.
//! - Resolve each referenced record at most once per call.
//!
//! # Invariants
//! - Population is read-only; stored rows keep plain ids.
//! - A dangling reference populates as `None` instead of failing the read.
//! - Inactive referenced records still populate.

use crate::model::attendance::{Attendance, AttendanceId, AttendanceStatus};
use crate::model::department::DepartmentId;
use crate::model::employee::{Employee, EmployeeId};
use crate::model::leave::{Leave, LeaveId, LeaveStatus, LeaveType};
use crate::model::projection::{DepartmentRef, EmployeeRef, ManagerRef};
use crate::repo::department_repo::DepartmentRepository;
use crate::repo::employee_repo::EmployeeRepository;
use crate::repo::RepoResult;
use chrono::NaiveDate;
use serde::Serialize;
use std::collections::HashMap;

/// Employee with department and manager populated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EmployeeView {
    pub id: EmployeeId,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    #[serde(rename = "employeeId")]
    pub employee_code: String,
    pub department: Option<DepartmentRef>,
    pub manager: Option<ManagerRef>,
    pub position: Option<String>,
    pub phone: Option<String>,
    pub joining_date: i64,
    pub is_active: bool,
    pub created_at: i64,
    pub updated_at: i64,
}

/// Attendance with employee populated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AttendanceView {
    pub id: AttendanceId,
    pub employee: Option<EmployeeRef>,
    pub date: NaiveDate,
    pub check_in: Option<i64>,
    pub check_out: Option<i64>,
    pub status: AttendanceStatus,
    pub notes: Option<String>,
    pub created_at: i64,
    pub updated_at: i64,
}

/// Leave request with employee populated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LeaveView {
    pub id: LeaveId,
    pub employee: Option<EmployeeRef>,
    pub leave_type: LeaveType,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub reason: Option<String>,
    pub status: LeaveStatus,
    pub approved_at: Option<i64>,
    pub created_at: i64,
    pub updated_at: i64,
}

/// Memoizing employee lookup scoped to one populate call.
pub struct EmployeeLookup<'repo, E: EmployeeRepository> {
    repo: &'repo E,
    cache: HashMap<EmployeeId, Option<Employee>>,
}

impl<'repo, E: EmployeeRepository> EmployeeLookup<'repo, E> {
    pub fn new(repo: &'repo E) -> Self {
        Self {
            repo,
            cache: HashMap::new(),
        }
    }

    pub fn get(&mut self, id: EmployeeId) -> RepoResult<Option<&Employee>> {
        if !self.cache.contains_key(&id) {
            let loaded = self.repo.get_employee(id)?;
            self.cache.insert(id, loaded);
        }
        Ok(self.cache.get(&id).and_then(Option::as_ref))
    }

    pub fn employee_ref(&mut self, id: EmployeeId) -> RepoResult<Option<EmployeeRef>> {
        Ok(self.get(id)?.map(EmployeeRef::from))
    }

    pub fn manager_ref(&mut self, id: EmployeeId) -> RepoResult<Option<ManagerRef>> {
        Ok(self.get(id)?.map(ManagerRef::from))
    }
}

/// Populates department and manager projections for a batch of employees.
pub fn populate_employees<E, D>(
    employees: &E,
    departments: &D,
    rows: Vec<Employee>,
) -> RepoResult<Vec<EmployeeView>>
where
    E: EmployeeRepository,
    D: DepartmentRepository,
{
    let mut lookup = EmployeeLookup::new(employees);
    let mut department_cache: HashMap<DepartmentId, Option<DepartmentRef>> = HashMap::new();
    let mut views = Vec::with_capacity(rows.len());

    for employee in rows {
        let department = match employee.department {
            Some(id) => {
                if !department_cache.contains_key(&id) {
                    let loaded = departments.get_department(id)?;
                    department_cache.insert(id, loaded.as_ref().map(DepartmentRef::from));
                }
                department_cache.get(&id).cloned().flatten()
            }
            None => None,
        };
        let manager = match employee.manager {
            Some(id) => lookup.manager_ref(id)?,
            None => None,
        };

        views.push(EmployeeView {
            id: employee.id,
            email: employee.email,
            first_name: employee.first_name,
            last_name: employee.last_name,
            employee_code: employee.employee_code,
            department,
            manager,
            position: employee.position,
            phone: employee.phone,
            joining_date: employee.joining_date,
            is_active: employee.is_active,
            created_at: employee.created_at,
            updated_at: employee.updated_at,
        });
    }

    Ok(views)
}

/// Populates the employee projection for a batch of attendance records.
pub fn populate_attendance<E: EmployeeRepository>(
    employees: &E,
    rows: Vec<Attendance>,
) -> RepoResult<Vec<AttendanceView>> {
    let mut lookup = EmployeeLookup::new(employees);
    let mut views = Vec::with_capacity(rows.len());
    for record in rows {
        views.push(AttendanceView {
            id: record.id,
            employee: lookup.employee_ref(record.employee)?,
            date: record.date,
            check_in: record.check_in,
            check_out: record.check_out,
            status: record.status,
            notes: record.notes,
            created_at: record.created_at,
            updated_at: record.updated_at,
        });
    }
    Ok(views)
}

/// Populates the employee projection for a batch of leave requests.
pub fn populate_leaves<E: EmployeeRepository>(
    employees: &E,
    rows: Vec<Leave>,
) -> RepoResult<Vec<LeaveView>> {
    let mut lookup = EmployeeLookup::new(employees);
    let mut views = Vec::with_capacity(rows.len());
    for leave in rows {
        views.push(LeaveView {
            id: leave.id,
            employee: lookup.employee_ref(leave.employee)?,
            leave_type: leave.leave_type,
            start_date: leave.start_date,
            end_date: leave.end_date,
            reason: leave.reason,
            status: leave.status,
            approved_at: leave.approved_at,
            created_at: leave.created_at,
            updated_at: leave.updated_at,
        });
    }
    Ok(views)
}
