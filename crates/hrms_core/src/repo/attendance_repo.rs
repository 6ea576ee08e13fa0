//! Attendance repository contracts and SQLite implementation.
//!
//! # Invariants
//! - `(employee_uuid, date)` uniqueness is enforced by
//!   `idx_attendance_employee_date`, so concurrent marks for the same day
//!   yield exactly one row.
//! - Listing is sorted by `date DESC`; range bounds are inclusive.
//! - Delete removes the row.

use super::{
    date_to_db, map_write_error, parse_date_column, parse_uuid_column, RepoError, RepoResult,
};
use crate::db::NOW_EPOCH_MS_SQL;
use crate::model::attendance::{Attendance, AttendanceId, AttendanceStatus, NewAttendance};
use crate::model::employee::EmployeeId;
use crate::model::EntityKind;
use chrono::NaiveDate;
use rusqlite::types::Value;
use rusqlite::{params, params_from_iter, Connection, Row};
use uuid::Uuid;

const ATTENDANCE_SELECT_SQL: &str = "SELECT
    uuid,
    employee_uuid,
    date,
    check_in,
    check_out,
    status,
    notes,
    created_at,
    updated_at
FROM attendance";

/// Filters for listing attendance. All present filters are combined with AND.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AttendanceListQuery {
    pub employee: Option<EmployeeId>,
    /// Inclusive lower bound on `date`.
    pub start_date: Option<NaiveDate>,
    /// Inclusive upper bound on `date`.
    pub end_date: Option<NaiveDate>,
}

/// Repository interface for attendance persistence.
pub trait AttendanceRepository {
    fn create_attendance(&self, input: &NewAttendance) -> RepoResult<Attendance>;
    fn update_attendance(&self, attendance: &Attendance) -> RepoResult<Attendance>;
    fn get_attendance(&self, id: AttendanceId) -> RepoResult<Option<Attendance>>;
    fn list_attendance(&self, query: &AttendanceListQuery) -> RepoResult<Vec<Attendance>>;
    fn delete_attendance(&self, id: AttendanceId) -> RepoResult<()>;
}

/// SQLite-backed attendance repository.
pub struct SqliteAttendanceRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteAttendanceRepository<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }

    fn load_required(&self, id: AttendanceId) -> RepoResult<Attendance> {
        self.get_attendance(id)?.ok_or(RepoError::NotFound {
            entity: EntityKind::Attendance,
            id,
        })
    }
}

impl AttendanceRepository for SqliteAttendanceRepository<'_> {
    fn create_attendance(&self, input: &NewAttendance) -> RepoResult<Attendance> {
        let input = input.normalized()?;
        let id = Uuid::new_v4();

        self.conn
            .execute(
                &format!(
                    "INSERT INTO attendance (
                        uuid,
                        employee_uuid,
                        date,
                        check_in,
                        check_out,
                        status,
                        notes,
                        created_at,
                        updated_at
                    ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, {NOW_EPOCH_MS_SQL}, {NOW_EPOCH_MS_SQL});"
                ),
                params![
                    id.to_string(),
                    input.employee.to_string(),
                    date_to_db(input.date),
                    input.check_in,
                    input.check_out,
                    input.status.as_str(),
                    input.notes,
                ],
            )
            .map_err(|err| map_write_error(EntityKind::Attendance, err, attendance_key))?;

        self.load_required(id)
    }

    fn update_attendance(&self, attendance: &Attendance) -> RepoResult<Attendance> {
        attendance.validate()?;

        let changed = self
            .conn
            .execute(
                &format!(
                    "UPDATE attendance
                     SET
                        check_in = ?2,
                        check_out = ?3,
                        status = ?4,
                        notes = ?5,
                        updated_at = {NOW_EPOCH_MS_SQL}
                     WHERE uuid = ?1;"
                ),
                params![
                    attendance.id.to_string(),
                    attendance.check_in,
                    attendance.check_out,
                    attendance.status.as_str(),
                    attendance.notes,
                ],
            )
            .map_err(|err| map_write_error(EntityKind::Attendance, err, attendance_key))?;

        if changed == 0 {
            return Err(RepoError::NotFound {
                entity: EntityKind::Attendance,
                id: attendance.id,
            });
        }

        self.load_required(attendance.id)
    }

    fn get_attendance(&self, id: AttendanceId) -> RepoResult<Option<Attendance>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{ATTENDANCE_SELECT_SQL} WHERE uuid = ?1;"))?;
        let mut rows = stmt.query([id.to_string()])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_attendance_row(row)?));
        }
        Ok(None)
    }

    fn list_attendance(&self, query: &AttendanceListQuery) -> RepoResult<Vec<Attendance>> {
        let mut sql = format!("{ATTENDANCE_SELECT_SQL} WHERE 1 = 1");
        let mut bind_values: Vec<Value> = Vec::new();

        if let Some(employee) = query.employee {
            sql.push_str(" AND employee_uuid = ?");
            bind_values.push(Value::Text(employee.to_string()));
        }
        if let Some(start_date) = query.start_date {
            sql.push_str(" AND date >= ?");
            bind_values.push(Value::Text(date_to_db(start_date)));
        }
        if let Some(end_date) = query.end_date {
            sql.push_str(" AND date <= ?");
            bind_values.push(Value::Text(date_to_db(end_date)));
        }
        sql.push_str(" ORDER BY date DESC, created_at DESC, uuid ASC");

        let mut stmt = self.conn.prepare(&sql)?;
        let mut rows = stmt.query(params_from_iter(bind_values))?;
        let mut records = Vec::new();
        while let Some(row) = rows.next()? {
            records.push(parse_attendance_row(row)?);
        }
        Ok(records)
    }

    fn delete_attendance(&self, id: AttendanceId) -> RepoResult<()> {
        let changed = self
            .conn
            .execute("DELETE FROM attendance WHERE uuid = ?1;", [id.to_string()])?;
        if changed == 0 {
            return Err(RepoError::NotFound {
                entity: EntityKind::Attendance,
                id,
            });
        }
        Ok(())
    }
}

fn attendance_key(column: &str) -> Option<&'static str> {
    match column {
        "attendance.date" | "attendance.employee_uuid" => Some("date"),
        _ => None,
    }
}

fn parse_attendance_row(row: &Row<'_>) -> RepoResult<Attendance> {
    let status_text: String = row.get("status")?;
    let status = AttendanceStatus::parse(&status_text).ok_or_else(|| {
        RepoError::InvalidData(format!(
            "invalid attendance status `{status_text}` in attendance.status"
        ))
    })?;

    Ok(Attendance {
        id: parse_uuid_column(row, "uuid")?,
        employee: parse_uuid_column(row, "employee_uuid")?,
        date: parse_date_column(row, "date")?,
        check_in: row.get("check_in")?,
        check_out: row.get("check_out")?,
        status,
        notes: row.get("notes")?,
        created_at: row.get("created_at")?,
        updated_at: row.get("updated_at")?,
    })
}
