//! Department use-case service.
//!
//! # Invariants
//! - Duplicate names fail with `DuplicateKey` from the unique index.
//! - Delete deactivates; the row and every employee reference survive.

use crate::model::department::{Department, DepartmentId, DepartmentPatch, NewDepartment};
use crate::model::EntityKind;
use crate::repo::department_repo::{DepartmentListQuery, DepartmentRepository};
use crate::service::{ServiceError, ServiceResult};
use log::info;

/// Department service facade over repository implementations.
pub struct DepartmentService<D: DepartmentRepository> {
    repo: D,
}

impl<D: DepartmentRepository> DepartmentService<D> {
    pub fn new(repo: D) -> Self {
        Self { repo }
    }

    pub fn create_department(&self, input: &NewDepartment) -> ServiceResult<Department> {
        let department = self.repo.create_department(input)?;
        info!(
            "event=department_create module=service status=ok id={}",
            department.id
        );
        Ok(department)
    }

    /// Gets one department by id, active or not.
    pub fn get_department(&self, id: DepartmentId) -> ServiceResult<Department> {
        self.repo
            .get_department(id)?
            .ok_or(ServiceError::NotFound {
                entity: EntityKind::Department,
                id,
            })
    }

    /// Lists active departments.
    pub fn list_departments(&self) -> ServiceResult<Vec<Department>> {
        Ok(self.repo.list_departments(&DepartmentListQuery::default())?)
    }

    /// Merges `patch` into the stored department.
    pub fn update_department(
        &self,
        id: DepartmentId,
        patch: &DepartmentPatch,
    ) -> ServiceResult<Department> {
        let mut department = self.get_department(id)?;
        patch.apply(&mut department);
        let updated = self.repo.update_department(&department)?;
        info!("event=department_update module=service status=ok id={id}");
        Ok(updated)
    }

    /// Soft-deletes a department.
    pub fn delete_department(&self, id: DepartmentId) -> ServiceResult<()> {
        self.repo.soft_delete_department(id)?;
        info!("event=department_deactivate module=service status=ok id={id}");
        Ok(())
    }
}
