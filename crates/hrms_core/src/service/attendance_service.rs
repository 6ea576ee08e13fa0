//! Attendance use-case service.
//!
//! # Invariants
//! - Marking requires an existing employee (active or not).
//! - A second record for the same employee and day fails with `DuplicateKey`.
//! - Delete is permanent.

use crate::model::attendance::{Attendance, AttendanceId, AttendancePatch, NewAttendance};
use crate::model::employee::EmployeeId;
use crate::model::EntityKind;
use crate::repo::attendance_repo::{AttendanceListQuery, AttendanceRepository};
use crate::repo::employee_repo::EmployeeRepository;
use crate::repo::RepoError;
use crate::service::populate::{populate_attendance, AttendanceView};
use crate::service::{ServiceError, ServiceResult};
use log::{info, warn};

pub struct AttendanceService<A: AttendanceRepository, E: EmployeeRepository> {
    records: A,
    employees: E,
}

impl<A: AttendanceRepository, E: EmployeeRepository> AttendanceService<A, E> {
    pub fn new(records: A, employees: E) -> Self {
        Self { records, employees }
    }

    /// Marks attendance for one employee and day.
    pub fn mark_attendance(&self, input: &NewAttendance) -> ServiceResult<AttendanceView> {
        self.ensure_employee_exists(input.employee)?;

        let record = match self.records.create_attendance(input) {
            Ok(record) => record,
            // Employee removed between the check and the insert.
            Err(RepoError::UnresolvedReference { .. }) => {
                return Err(ServiceError::NotFound {
                    entity: EntityKind::Employee,
                    id: input.employee,
                })
            }
            Err(RepoError::DuplicateKey { entity, key }) => {
                warn!(
                    "event=attendance_mark module=service status=error error_code=duplicate_day"
                );
                return Err(ServiceError::DuplicateKey { entity, key });
            }
            Err(err) => return Err(err.into()),
        };
        info!(
            "event=attendance_mark module=service status=ok id={}",
            record.id
        );
        self.view(record)
    }

    pub fn get_attendance(&self, id: AttendanceId) -> ServiceResult<AttendanceView> {
        let record = self.load(id)?;
        self.view(record)
    }

    /// Lists records matching `query`, newest day first.
    pub fn list_attendance(
        &self,
        query: &AttendanceListQuery,
    ) -> ServiceResult<Vec<AttendanceView>> {
        let rows = self.records.list_attendance(query)?;
        Ok(populate_attendance(&self.employees, rows)?)
    }

    pub fn update_attendance(
        &self,
        id: AttendanceId,
        patch: &AttendancePatch,
    ) -> ServiceResult<AttendanceView> {
        let mut record = self.load(id)?;
        patch.apply(&mut record);
        let updated = self.records.update_attendance(&record)?;
        info!("event=attendance_update module=service status=ok id={id}");
        self.view(updated)
    }

    pub fn delete_attendance(&self, id: AttendanceId) -> ServiceResult<()> {
        self.records.delete_attendance(id)?;
        info!("event=attendance_delete module=service status=ok id={id}");
        Ok(())
    }

    fn load(&self, id: AttendanceId) -> ServiceResult<Attendance> {
        self.records
            .get_attendance(id)?
            .ok_or(ServiceError::NotFound {
                entity: EntityKind::Attendance,
                id,
            })
    }

    fn view(&self, record: Attendance) -> ServiceResult<AttendanceView> {
        populate_attendance(&self.employees, vec![record])?
            .pop()
            .ok_or(ServiceError::InconsistentState(
                "populated attendance missing from read-back",
            ))
    }

    fn ensure_employee_exists(&self, id: EmployeeId) -> ServiceResult<()> {
        match self.employees.get_employee(id)? {
            Some(_) => Ok(()),
            None => Err(ServiceError::NotFound {
                entity: EntityKind::Employee,
                id,
            }),
        }
    }
}
