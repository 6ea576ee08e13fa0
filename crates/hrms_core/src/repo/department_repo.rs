//! Department repository contracts and SQLite implementation.
//!
//! # Invariants
//! - `name` uniqueness is enforced by `idx_departments_name`.
//! - Delete is a soft delete; rows are never removed.
//! - Default listing returns active departments ordered by name.

use super::{
    bool_to_int, map_write_error, parse_bool_column, parse_uuid_column, RepoError, RepoResult,
};
use crate::db::NOW_EPOCH_MS_SQL;
use crate::model::department::{Department, DepartmentId, NewDepartment};
use crate::model::EntityKind;
use rusqlite::{params, Connection, Row};
use uuid::Uuid;

const DEPARTMENT_SELECT_SQL: &str = "SELECT
    uuid,
    name,
    description,
    is_active,
    created_at,
    updated_at
FROM departments";

/// Query options for listing departments.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DepartmentListQuery {
    pub include_inactive: bool,
}

/// Repository interface for department persistence.
pub trait DepartmentRepository {
    fn create_department(&self, input: &NewDepartment) -> RepoResult<Department>;
    fn update_department(&self, department: &Department) -> RepoResult<Department>;
    fn get_department(&self, id: DepartmentId) -> RepoResult<Option<Department>>;
    fn list_departments(&self, query: &DepartmentListQuery) -> RepoResult<Vec<Department>>;
    fn soft_delete_department(&self, id: DepartmentId) -> RepoResult<()>;
}

/// SQLite-backed department repository.
pub struct SqliteDepartmentRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteDepartmentRepository<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }

    fn load_required(&self, id: DepartmentId) -> RepoResult<Department> {
        self.get_department(id)?.ok_or(RepoError::NotFound {
            entity: EntityKind::Department,
            id,
        })
    }
}

impl DepartmentRepository for SqliteDepartmentRepository<'_> {
    fn create_department(&self, input: &NewDepartment) -> RepoResult<Department> {
        let input = input.normalized()?;
        let id = Uuid::new_v4();

        self.conn
            .execute(
                &format!(
                    "INSERT INTO departments (uuid, name, description, is_active, created_at, updated_at)
                     VALUES (?1, ?2, ?3, 1, {NOW_EPOCH_MS_SQL}, {NOW_EPOCH_MS_SQL});"
                ),
                params![id.to_string(), input.name, input.description],
            )
            .map_err(|err| map_write_error(EntityKind::Department, err, department_key))?;

        self.load_required(id)
    }

    fn update_department(&self, department: &Department) -> RepoResult<Department> {
        department.validate()?;

        let changed = self
            .conn
            .execute(
                &format!(
                    "UPDATE departments
                     SET
                        name = ?2,
                        description = ?3,
                        is_active = ?4,
                        updated_at = {NOW_EPOCH_MS_SQL}
                     WHERE uuid = ?1;"
                ),
                params![
                    department.id.to_string(),
                    department.name.trim(),
                    department.description.as_deref(),
                    bool_to_int(department.is_active),
                ],
            )
            .map_err(|err| map_write_error(EntityKind::Department, err, department_key))?;

        if changed == 0 {
            return Err(RepoError::NotFound {
                entity: EntityKind::Department,
                id: department.id,
            });
        }

        self.load_required(department.id)
    }

    fn get_department(&self, id: DepartmentId) -> RepoResult<Option<Department>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{DEPARTMENT_SELECT_SQL} WHERE uuid = ?1;"))?;
        let mut rows = stmt.query([id.to_string()])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_department_row(row)?));
        }
        Ok(None)
    }

    fn list_departments(&self, query: &DepartmentListQuery) -> RepoResult<Vec<Department>> {
        let sql = if query.include_inactive {
            format!("{DEPARTMENT_SELECT_SQL} ORDER BY name ASC, uuid ASC;")
        } else {
            format!("{DEPARTMENT_SELECT_SQL} WHERE is_active = 1 ORDER BY name ASC, uuid ASC;")
        };

        let mut stmt = self.conn.prepare(&sql)?;
        let mut rows = stmt.query([])?;
        let mut departments = Vec::new();
        while let Some(row) = rows.next()? {
            departments.push(parse_department_row(row)?);
        }
        Ok(departments)
    }

    fn soft_delete_department(&self, id: DepartmentId) -> RepoResult<()> {
        let changed = self.conn.execute(
            &format!(
                "UPDATE departments
                 SET
                    is_active = 0,
                    updated_at = {NOW_EPOCH_MS_SQL}
                 WHERE uuid = ?1;"
            ),
            [id.to_string()],
        )?;

        if changed == 0 {
            return Err(RepoError::NotFound {
                entity: EntityKind::Department,
                id,
            });
        }
        Ok(())
    }
}

fn department_key(column: &str) -> Option<&'static str> {
    match column {
        "departments.name" => Some("name"),
        _ => None,
    }
}

fn parse_department_row(row: &Row<'_>) -> RepoResult<Department> {
    Ok(Department {
        id: parse_uuid_column(row, "uuid")?,
        name: row.get("name")?,
        description: row.get("description")?,
        is_active: parse_bool_column(row, "is_active")?,
        created_at: row.get("created_at")?,
        updated_at: row.get("updated_at")?,
    })
}
