//! Leave request use-case service.
//!
//! # Invariants
//! - Filing requires an existing employee and always starts as `pending`.
//! - Status changes accept any target; decisions re-stamp `approved_at`.

use crate::model::employee::EmployeeId;
use crate::model::leave::{Leave, LeaveId, LeaveStatus, NewLeave};
use crate::model::EntityKind;
use crate::repo::employee_repo::EmployeeRepository;
use crate::repo::leave_repo::{LeaveListQuery, LeaveRepository};
use crate::repo::RepoError;
use crate::service::populate::{populate_leaves, LeaveView};
use crate::service::{ServiceError, ServiceResult};
use log::info;

pub struct LeaveService<L: LeaveRepository, E: EmployeeRepository> {
    leaves: L,
    employees: E,
}

impl<L: LeaveRepository, E: EmployeeRepository> LeaveService<L, E> {
    pub fn new(leaves: L, employees: E) -> Self {
        Self { leaves, employees }
    }

    pub fn request_leave(&self, input: &NewLeave) -> ServiceResult<LeaveView> {
        self.ensure_employee_exists(input.employee)?;

        let leave = self.leaves.create_leave(input).map_err(|err| match err {
            RepoError::UnresolvedReference { .. } => ServiceError::NotFound {
                entity: EntityKind::Employee,
                id: input.employee,
            },
            other => other.into(),
        })?;
        info!(
            "event=leave_request module=service status=ok id={} days={}",
            leave.id,
            leave.day_count()
        );
        self.view(leave)
    }

    pub fn get_leave(&self, id: LeaveId) -> ServiceResult<LeaveView> {
        let leave = self
            .leaves
            .get_leave(id)?
            .ok_or(ServiceError::NotFound {
                entity: EntityKind::Leave,
                id,
            })?;
        self.view(leave)
    }

    /// Lists requests matching `query`, newest filing first.
    pub fn list_leaves(&self, query: &LeaveListQuery) -> ServiceResult<Vec<LeaveView>> {
        let rows = self.leaves.list_leaves(query)?;
        Ok(populate_leaves(&self.employees, rows)?)
    }

    /// Moves a request to `status`.
    pub fn set_leave_status(&self, id: LeaveId, status: LeaveStatus) -> ServiceResult<LeaveView> {
        let leave = self.leaves.set_leave_status(id, status)?;
        info!(
            "event=leave_decide module=service status=ok id={id} leave_status={}",
            status.as_str()
        );
        self.view(leave)
    }

    pub fn delete_leave(&self, id: LeaveId) -> ServiceResult<()> {
        self.leaves.delete_leave(id)?;
        info!("event=leave_delete module=service status=ok id={id}");
        Ok(())
    }

    fn view(&self, leave: Leave) -> ServiceResult<LeaveView> {
        populate_leaves(&self.employees, vec![leave])?
            .pop()
            .ok_or(ServiceError::InconsistentState(
                "populated leave missing from read-back",
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
