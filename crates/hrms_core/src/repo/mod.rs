//! Repository layer abstractions and persistence implementations.
//!
//! # Responsibility
//! - Define per-entity data access contracts.
//! - Isolate SQLite query details from service orchestration.
//! - Translate storage constraint failures into semantic errors.
//!
//! # Invariants
//! - Repository writes validate records before SQL mutations.
//! - Unique-index collisions surface as `RepoError::DuplicateKey` and leave
//!   storage untouched.
//! - Read paths reject invalid persisted state instead of masking it.

use crate::db::{constraint_violation, ConstraintViolation, DbError};
use crate::model::{EntityKind, ValidationError};
use chrono::NaiveDate;
use rusqlite::Row;
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

pub mod attendance_repo;
pub mod department_repo;
pub mod employee_repo;
pub mod leave_repo;

const DATE_FORMAT: &str = "%Y-%m-%d";

pub type RepoResult<T> = Result<T, RepoError>;

/// Repository error shared by all entity stores.
#[derive(Debug)]
pub enum RepoError {
    Validation(ValidationError),
    Db(DbError),
    NotFound {
        entity: EntityKind,
        id: Uuid,
    },
    /// A unique key (single or compound) already belongs to another row.
    DuplicateKey {
        entity: EntityKind,
        key: &'static str,
    },
    /// A foreign key written from `from` does not resolve.
    UnresolvedReference {
        from: EntityKind,
    },
    InvalidData(String),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::Db(err) => write!(f, "{err}"),
            Self::NotFound { entity, id } => write!(f, "{entity} not found: {id}"),
            Self::DuplicateKey { entity, key } => {
                f.write_str(&duplicate_key_message(*entity, key))
            }
            Self::UnresolvedReference { from } => {
                write!(f, "{from} references a record that does not exist")
            }
            Self::InvalidData(message) => write!(f, "invalid persisted data: {message}"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Db(err) => Some(err),
            Self::NotFound { .. } => None,
            Self::DuplicateKey { .. } => None,
            Self::UnresolvedReference { .. } => None,
            Self::InvalidData(_) => None,
        }
    }
}

impl From<ValidationError> for RepoError {
    fn from(value: ValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Caller-facing message for a unique-key collision.
pub fn duplicate_key_message(entity: EntityKind, key: &str) -> String {
    match (entity, key) {
        (EntityKind::Department, "name") => "Department already exists".to_string(),
        (EntityKind::Employee, "email") => "Email already exists".to_string(),
        (EntityKind::Employee, "employeeId") => "Employee ID already exists".to_string(),
        (EntityKind::Attendance, _) => "Attendance already marked for this date".to_string(),
        (entity, key) => format!("{entity} with this {key} already exists"),
    }
}

/// Maps a failed insert/update into a semantic repository error.
///
/// `key_for_column` turns a reported `table.column` into the public field
/// name of the violated key.
pub(crate) fn map_write_error(
    entity: EntityKind,
    err: rusqlite::Error,
    key_for_column: fn(&str) -> Option<&'static str>,
) -> RepoError {
    match constraint_violation(&err) {
        Some(ConstraintViolation::Unique(columns)) => {
            let key = columns
                .iter()
                .find_map(|column| key_for_column(column))
                .unwrap_or("id");
            RepoError::DuplicateKey { entity, key }
        }
        Some(ConstraintViolation::ForeignKey) => RepoError::UnresolvedReference { from: entity },
        Some(ConstraintViolation::Check) | None => err.into(),
    }
}

pub(crate) fn parse_uuid_column(row: &Row<'_>, column: &str) -> RepoResult<Uuid> {
    let text: String = row.get(column)?;
    Uuid::parse_str(&text)
        .map_err(|_| RepoError::InvalidData(format!("invalid uuid value `{text}` in {column}")))
}

pub(crate) fn parse_optional_uuid_column(row: &Row<'_>, column: &str) -> RepoResult<Option<Uuid>> {
    match row.get::<_, Option<String>>(column)? {
        Some(text) => Uuid::parse_str(&text).map(Some).map_err(|_| {
            RepoError::InvalidData(format!("invalid uuid value `{text}` in {column}"))
        }),
        None => Ok(None),
    }
}

pub(crate) fn parse_date_column(row: &Row<'_>, column: &str) -> RepoResult<NaiveDate> {
    let text: String = row.get(column)?;
    NaiveDate::parse_from_str(&text, DATE_FORMAT)
        .map_err(|_| RepoError::InvalidData(format!("invalid date value `{text}` in {column}")))
}

pub(crate) fn parse_bool_column(row: &Row<'_>, column: &str) -> RepoResult<bool> {
    match row.get::<_, i64>(column)? {
        0 => Ok(false),
        1 => Ok(true),
        other => Err(RepoError::InvalidData(format!(
            "invalid boolean value `{other}` in {column}"
        ))),
    }
}

pub(crate) fn date_to_db(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

pub(crate) fn bool_to_int(value: bool) -> i64 {
    if value {
        1
    } else {
        0
    }
}

#[cfg(test)]
mod tests {
    use super::{date_to_db, duplicate_key_message};
    use crate::model::EntityKind;
    use chrono::NaiveDate;

    #[test]
    fn dates_are_stored_as_iso_days() {
        let date = NaiveDate::from_ymd_opt(2024, 3, 9).unwrap();
        assert_eq!(date_to_db(date), "2024-03-09");
    }

    #[test]
    fn duplicate_messages_name_the_conflicting_field() {
        assert_eq!(
            duplicate_key_message(EntityKind::Employee, "employeeId"),
            "Employee ID already exists"
        );
        assert_eq!(
            duplicate_key_message(EntityKind::Attendance, "date"),
            "Attendance already marked for this date"
        );
    }
}
