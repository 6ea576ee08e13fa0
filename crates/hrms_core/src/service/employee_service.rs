//! Employee use-case service.
//!
//! # Responsibility
//! - Validate department and manager references before writes.
//! - Keep the reporting line acyclic.
//! - Return employees with department and manager populated.
//!
//! # Invariants
//! - Referenced department/manager must exist (inactive rows qualify).
//! - An employee never appears in its own manager chain.
//! - Updates are partial merges; an empty patch is a no-op on stored values.

use crate::model::department::DepartmentId;
use crate::model::employee::{Employee, EmployeeId, EmployeePatch, NewEmployee};
use crate::model::EntityKind;
use crate::repo::department_repo::DepartmentRepository;
use crate::repo::employee_repo::{EmployeeListQuery, EmployeeRepository};
use crate::service::populate::{populate_employees, EmployeeView};
use crate::service::{ServiceError, ServiceResult};
use log::{info, warn};
use std::collections::HashSet;

/// Employee service facade over employee and department repositories.
pub struct EmployeeService<E: EmployeeRepository, D: DepartmentRepository> {
    employees: E,
    departments: D,
}

impl<E: EmployeeRepository, D: DepartmentRepository> EmployeeService<E, D> {
    pub fn new(employees: E, departments: D) -> Self {
        Self {
            employees,
            departments,
        }
    }

    pub fn create_employee(&self, input: &NewEmployee) -> ServiceResult<EmployeeView> {
        if let Some(department) = input.department {
            self.ensure_department_exists(department)?;
        }
        if let Some(manager) = input.manager {
            self.ensure_employee_exists(manager)?;
        }

        let employee = self.employees.create_employee(input)?;
        info!(
            "event=employee_create module=service status=ok id={}",
            employee.id
        );
        self.view(employee)
    }

    /// Gets one employee by id, active or not.
    pub fn get_employee(&self, id: EmployeeId) -> ServiceResult<EmployeeView> {
        let employee = self.load(id)?;
        self.view(employee)
    }

    /// Lists active employees.
    pub fn list_employees(&self, query: &EmployeeListQuery) -> ServiceResult<Vec<EmployeeView>> {
        let rows = self.employees.list_employees(query)?;
        Ok(populate_employees(&self.employees, &self.departments, rows)?)
    }

    /// Merges `patch` into the stored employee.
    pub fn update_employee(
        &self,
        id: EmployeeId,
        patch: &EmployeePatch,
    ) -> ServiceResult<EmployeeView> {
        let mut employee = self.load(id)?;

        if let Some(department) = patch.department {
            self.ensure_department_exists(department)?;
        }
        if let Some(manager) = patch.manager {
            self.ensure_employee_exists(manager)?;
            if self.would_create_cycle(id, manager)? {
                warn!(
                    "event=employee_update module=service status=error id={id} error_code=manager_cycle"
                );
                return Err(ServiceError::ManagerCycle {
                    employee: id,
                    manager,
                });
            }
        }

        patch.apply(&mut employee)?;
        let updated = self.employees.update_employee(&employee)?;
        info!(
            "event=employee_update module=service status=ok id={id} empty_patch={}",
            patch.is_empty()
        );
        self.view(updated)
    }

    /// Soft-deletes an employee. Attendance and leave rows are kept.
    pub fn delete_employee(&self, id: EmployeeId) -> ServiceResult<()> {
        self.employees.soft_delete_employee(id)?;
        info!("event=employee_deactivate module=service status=ok id={id}");
        Ok(())
    }

    fn load(&self, id: EmployeeId) -> ServiceResult<Employee> {
        self.employees
            .get_employee(id)?
            .ok_or(ServiceError::NotFound {
                entity: EntityKind::Employee,
                id,
            })
    }

    fn view(&self, employee: Employee) -> ServiceResult<EmployeeView> {
        populate_employees(&self.employees, &self.departments, vec![employee])?
            .pop()
            .ok_or(ServiceError::InconsistentState(
                "populated employee missing from read-back",
            ))
    }

    fn ensure_department_exists(&self, id: DepartmentId) -> ServiceResult<()> {
        match self.departments.get_department(id)? {
            Some(_) => Ok(()),
            None => Err(ServiceError::NotFound {
                entity: EntityKind::Department,
                id,
            }),
        }
    }

    fn ensure_employee_exists(&self, id: EmployeeId) -> ServiceResult<()> {
        self.load(id).map(|_| ())
    }

    /// Walks the manager chain upward from `candidate_manager`.
    fn would_create_cycle(
        &self,
        employee: EmployeeId,
        candidate_manager: EmployeeId,
    ) -> ServiceResult<bool> {
        let mut visited = HashSet::new();
        let mut cursor = Some(candidate_manager);
        while let Some(current) = cursor {
            if current == employee {
                return Ok(true);
            }
            if !visited.insert(current) {
                return Ok(true);
            }
            cursor = self.employees.manager_of(current)?;
        }
        Ok(false)
    }
}
