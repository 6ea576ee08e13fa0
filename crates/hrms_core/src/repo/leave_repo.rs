//! Leave repository contracts and SQLite implementation.
//!
//! # Invariants
//! - New rows are inserted as `pending` with `approved_at = NULL`.
//! - Status writes stamp `approved_at` only for decision statuses.
//! - Listing is sorted by `created_at DESC`.
//! - Delete removes the row regardless of status.

use super::{
    date_to_db, map_write_error, parse_date_column, parse_uuid_column, RepoError, RepoResult,
};
use crate::db::NOW_EPOCH_MS_SQL;
use crate::model::employee::EmployeeId;
use crate::model::leave::{Leave, LeaveId, LeaveStatus, LeaveType, NewLeave};
use crate::model::EntityKind;
use chrono::NaiveDate;
use rusqlite::types::Value;
use rusqlite::{params, params_from_iter, Connection, Row};
use uuid::Uuid;

const LEAVE_SELECT_SQL: &str = "SELECT
    uuid,
    employee_uuid,
    leave_type,
    start_date,
    end_date,
    reason,
    status,
    approved_at,
    created_at,
    updated_at
FROM leaves";

/// Filters for listing leave requests. Date bounds apply to `start_date`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LeaveListQuery {
    pub employee: Option<EmployeeId>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
}

/// Repository interface for leave persistence.
pub trait LeaveRepository {
    fn create_leave(&self, input: &NewLeave) -> RepoResult<Leave>;
    /// Writes `status`; decision statuses also stamp `approved_at` with the
    /// current time.
    fn set_leave_status(&self, id: LeaveId, status: LeaveStatus) -> RepoResult<Leave>;
    fn get_leave(&self, id: LeaveId) -> RepoResult<Option<Leave>>;
    fn list_leaves(&self, query: &LeaveListQuery) -> RepoResult<Vec<Leave>>;
    fn delete_leave(&self, id: LeaveId) -> RepoResult<()>;
}

/// SQLite-backed leave repository.
pub struct SqliteLeaveRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteLeaveRepository<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }

    fn load_required(&self, id: LeaveId) -> RepoResult<Leave> {
        self.get_leave(id)?.ok_or(RepoError::NotFound {
            entity: EntityKind::Leave,
            id,
        })
    }
}

impl LeaveRepository for SqliteLeaveRepository<'_> {
    fn create_leave(&self, input: &NewLeave) -> RepoResult<Leave> {
        let input = input.normalized()?;
        let id = Uuid::new_v4();

        self.conn
            .execute(
                &format!(
                    "INSERT INTO leaves (
                        uuid,
                        employee_uuid,
                        leave_type,
                        start_date,
                        end_date,
                        reason,
                        status,
                        approved_at,
                        created_at,
                        updated_at
                    ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, 'pending', NULL, {NOW_EPOCH_MS_SQL}, {NOW_EPOCH_MS_SQL});"
                ),
                params![
                    id.to_string(),
                    input.employee.to_string(),
                    input.leave_type.as_str(),
                    date_to_db(input.start_date),
                    date_to_db(input.end_date),
                    input.reason,
                ],
            )
            .map_err(|err| map_write_error(EntityKind::Leave, err, leave_key))?;

        self.load_required(id)
    }

    fn set_leave_status(&self, id: LeaveId, status: LeaveStatus) -> RepoResult<Leave> {
        let changed = self.conn.execute(
            &format!(
                "UPDATE leaves
                 SET
                    status = ?2,
                    approved_at = CASE WHEN ?3 = 1 THEN {NOW_EPOCH_MS_SQL} ELSE approved_at END,
                    updated_at = {NOW_EPOCH_MS_SQL}
                 WHERE uuid = ?1;"
            ),
            params![
                id.to_string(),
                status.as_str(),
                i64::from(status.is_decision()),
            ],
        )?;

        if changed == 0 {
            return Err(RepoError::NotFound {
                entity: EntityKind::Leave,
                id,
            });
        }

        self.load_required(id)
    }

    fn get_leave(&self, id: LeaveId) -> RepoResult<Option<Leave>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{LEAVE_SELECT_SQL} WHERE uuid = ?1;"))?;
        let mut rows = stmt.query([id.to_string()])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_leave_row(row)?));
        }
        Ok(None)
    }

    fn list_leaves(&self, query: &LeaveListQuery) -> RepoResult<Vec<Leave>> {
        let mut sql = format!("{LEAVE_SELECT_SQL} WHERE 1 = 1");
        let mut bind_values: Vec<Value> = Vec::new();

        if let Some(employee) = query.employee {
            sql.push_str(" AND employee_uuid = ?");
            bind_values.push(Value::Text(employee.to_string()));
        }
        if let Some(start_date) = query.start_date {
            sql.push_str(" AND start_date >= ?");
            bind_values.push(Value::Text(date_to_db(start_date)));
        }
        if let Some(end_date) = query.end_date {
            sql.push_str(" AND start_date <= ?");
            bind_values.push(Value::Text(date_to_db(end_date)));
        }
        sql.push_str(" ORDER BY created_at DESC, rowid DESC");

        let mut stmt = self.conn.prepare(&sql)?;
        let mut rows = stmt.query(params_from_iter(bind_values))?;
        let mut leaves = Vec::new();
        while let Some(row) = rows.next()? {
            leaves.push(parse_leave_row(row)?);
        }
        Ok(leaves)
    }

    fn delete_leave(&self, id: LeaveId) -> RepoResult<()> {
        let changed = self
            .conn
            .execute("DELETE FROM leaves WHERE uuid = ?1;", [id.to_string()])?;
        if changed == 0 {
            return Err(RepoError::NotFound {
                entity: EntityKind::Leave,
                id,
            });
        }
        Ok(())
    }
}

// Leaves carry no unique key besides the primary key.
fn leave_key(_column: &str) -> Option<&'static str> {
    None
}

fn parse_leave_row(row: &Row<'_>) -> RepoResult<Leave> {
    let type_text: String = row.get("leave_type")?;
    let leave_type = LeaveType::parse(&type_text).ok_or_else(|| {
        RepoError::InvalidData(format!("invalid leave type `{type_text}` in leaves.leave_type"))
    })?;

    let status_text: String = row.get("status")?;
    let status = LeaveStatus::parse(&status_text).ok_or_else(|| {
        RepoError::InvalidData(format!("invalid leave status `{status_text}` in leaves.status"))
    })?;

    Ok(Leave {
        id: parse_uuid_column(row, "uuid")?,
        employee: parse_uuid_column(row, "employee_uuid")?,
        leave_type,
        start_date: parse_date_column(row, "start_date")?,
        end_date: parse_date_column(row, "end_date")?,
        reason: row.get("reason")?,
        status,
        approved_at: row.get("approved_at")?,
        created_at: row.get("created_at")?,
        updated_at: row.get("updated_at")?,
    })
}
