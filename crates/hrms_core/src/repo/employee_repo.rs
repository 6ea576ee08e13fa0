//! Employee repository contracts and SQLite implementation.
//!
//! # Responsibility
//! - Persist employees with unique `email` and `employee_code`.
//! - Expose lookups used for reference checks and response projections.
//!
//! # Invariants
//! - Uniqueness covers inactive rows as well as active ones.
//! - Delete is a soft delete; attendance and leave rows keep resolving.

use super::{
    bool_to_int, map_write_error, parse_bool_column, parse_optional_uuid_column,
    parse_uuid_column, RepoError, RepoResult,
};
use crate::db::NOW_EPOCH_MS_SQL;
use crate::model::department::DepartmentId;
use crate::model::employee::{Employee, EmployeeId, NewEmployee};
use crate::model::EntityKind;
use rusqlite::types::Value;
use rusqlite::{params, params_from_iter, Connection, OptionalExtension, Row};
use uuid::Uuid;

const EMPLOYEE_SELECT_SQL: &str = "SELECT
    uuid,
    email,
    first_name,
    last_name,
    employee_code,
    department_uuid,
    manager_uuid,
    position,
    phone,
    joining_date,
    is_active,
    created_at,
    updated_at
FROM employees";

/// Query options for listing employees.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EmployeeListQuery {
    pub include_inactive: bool,
    pub department: Option<DepartmentId>,
}

/// Repository interface for employee persistence.
pub trait EmployeeRepository {
    fn create_employee(&self, input: &NewEmployee) -> RepoResult<Employee>;
    fn update_employee(&self, employee: &Employee) -> RepoResult<Employee>;
    fn get_employee(&self, id: EmployeeId) -> RepoResult<Option<Employee>>;
    fn list_employees(&self, query: &EmployeeListQuery) -> RepoResult<Vec<Employee>>;
    fn soft_delete_employee(&self, id: EmployeeId) -> RepoResult<()>;
    /// Returns the direct manager id of `id`, or `None` when the employee has
    /// no manager or does not exist.
    fn manager_of(&self, id: EmployeeId) -> RepoResult<Option<EmployeeId>>;
}

/// SQLite-backed employee repository.
pub struct SqliteEmployeeRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteEmployeeRepository<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }

    fn load_required(&self, id: EmployeeId) -> RepoResult<Employee> {
        self.get_employee(id)?.ok_or(RepoError::NotFound {
            entity: EntityKind::Employee,
            id,
        })
    }
}

impl EmployeeRepository for SqliteEmployeeRepository<'_> {
    fn create_employee(&self, input: &NewEmployee) -> RepoResult<Employee> {
        let input = input.normalized()?;
        let id = Uuid::new_v4();

        self.conn
            .execute(
                &format!(
                    "INSERT INTO employees (
                        uuid,
                        email,
                        first_name,
                        last_name,
                        employee_code,
                        department_uuid,
                        manager_uuid,
                        position,
                        phone,
                        joining_date,
                        is_active,
                        created_at,
                        updated_at
                    ) VALUES (
                        ?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9,
                        COALESCE(?10, {NOW_EPOCH_MS_SQL}),
                        1,
                        {NOW_EPOCH_MS_SQL},
                        {NOW_EPOCH_MS_SQL}
                    );"
                ),
                params![
                    id.to_string(),
                    input.email,
                    input.first_name,
                    input.last_name,
                    input.employee_code,
                    input.department.map(|value| value.to_string()),
                    input.manager.map(|value| value.to_string()),
                    input.position,
                    input.phone,
                    input.joining_date,
                ],
            )
            .map_err(|err| map_write_error(EntityKind::Employee, err, employee_key))?;

        self.load_required(id)
    }

    fn update_employee(&self, employee: &Employee) -> RepoResult<Employee> {
        employee.validate()?;

        let changed = self
            .conn
            .execute(
                &format!(
                    "UPDATE employees
                     SET
                        email = ?2,
                        first_name = ?3,
                        last_name = ?4,
                        department_uuid = ?5,
                        manager_uuid = ?6,
                        position = ?7,
                        phone = ?8,
                        is_active = ?9,
                        updated_at = {NOW_EPOCH_MS_SQL}
                     WHERE uuid = ?1;"
                ),
                params![
                    employee.id.to_string(),
                    employee.email,
                    employee.first_name,
                    employee.last_name,
                    employee.department.map(|value| value.to_string()),
                    employee.manager.map(|value| value.to_string()),
                    employee.position,
                    employee.phone,
                    bool_to_int(employee.is_active),
                ],
            )
            .map_err(|err| map_write_error(EntityKind::Employee, err, employee_key))?;

        if changed == 0 {
            return Err(RepoError::NotFound {
                entity: EntityKind::Employee,
                id: employee.id,
            });
        }

        self.load_required(employee.id)
    }

    fn get_employee(&self, id: EmployeeId) -> RepoResult<Option<Employee>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{EMPLOYEE_SELECT_SQL} WHERE uuid = ?1;"))?;
        let mut rows = stmt.query([id.to_string()])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_employee_row(row)?));
        }
        Ok(None)
    }

    fn list_employees(&self, query: &EmployeeListQuery) -> RepoResult<Vec<Employee>> {
        let mut sql = format!("{EMPLOYEE_SELECT_SQL} WHERE 1 = 1");
        let mut bind_values: Vec<Value> = Vec::new();

        if !query.include_inactive {
            sql.push_str(" AND is_active = 1");
        }
        if let Some(department) = query.department {
            sql.push_str(" AND department_uuid = ?");
            bind_values.push(Value::Text(department.to_string()));
        }
        sql.push_str(" ORDER BY last_name ASC, first_name ASC, uuid ASC");

        let mut stmt = self.conn.prepare(&sql)?;
        let mut rows = stmt.query(params_from_iter(bind_values))?;
        let mut employees = Vec::new();
        while let Some(row) = rows.next()? {
            employees.push(parse_employee_row(row)?);
        }
        Ok(employees)
    }

    fn soft_delete_employee(&self, id: EmployeeId) -> RepoResult<()> {
        let changed = self.conn.execute(
            &format!(
                "UPDATE employees
                 SET
                    is_active = 0,
                    updated_at = {NOW_EPOCH_MS_SQL}
                 WHERE uuid = ?1;"
            ),
            [id.to_string()],
        )?;

        if changed == 0 {
            return Err(RepoError::NotFound {
                entity: EntityKind::Employee,
                id,
            });
        }
        Ok(())
    }

    fn manager_of(&self, id: EmployeeId) -> RepoResult<Option<EmployeeId>> {
        let manager: Option<Option<String>> = self
            .conn
            .query_row(
                "SELECT manager_uuid FROM employees WHERE uuid = ?1;",
                [id.to_string()],
                |row| row.get(0),
            )
            .optional()?;

        match manager.flatten() {
            Some(text) => Uuid::parse_str(&text).map(Some).map_err(|_| {
                RepoError::InvalidData(format!(
                    "invalid uuid value `{text}` in employees.manager_uuid"
                ))
            }),
            None => Ok(None),
        }
    }
}

fn employee_key(column: &str) -> Option<&'static str> {
    match column {
        "employees.email" => Some("email"),
        "employees.employee_code" => Some("employeeId"),
        _ => None,
    }
}

fn parse_employee_row(row: &Row<'_>) -> RepoResult<Employee> {
    Ok(Employee {
        id: parse_uuid_column(row, "uuid")?,
        email: row.get("email")?,
        first_name: row.get("first_name")?,
        last_name: row.get("last_name")?,
        employee_code: row.get("employee_code")?,
        department: parse_optional_uuid_column(row, "department_uuid")?,
        manager: parse_optional_uuid_column(row, "manager_uuid")?,
        position: row.get("position")?,
        phone: row.get("phone")?,
        joining_date: row.get("joining_date")?,
        is_active: parse_bool_column(row, "is_active")?,
        created_at: row.get("created_at")?,
        updated_at: row.get("updated_at")?,
    })
}
