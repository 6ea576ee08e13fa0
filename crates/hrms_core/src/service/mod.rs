//! Core use-case services.
//!
//! # Responsibility
//! - Resolve and validate cross-entity references before repository writes.
//! - Apply lifecycle rules (soft vs hard delete, partial-update merges,
//!   leave decision stamping).
//! - Return populated read views for callers.
//!
//! # Invariants
//! - Services never bypass repository validation/persistence contracts.
//! - Services stay storage-agnostic; repositories are injected.

use crate::model::{EntityKind, ValidationError};
use crate::repo::{duplicate_key_message, RepoError};
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

pub mod attendance_service;
pub mod department_service;
pub mod employee_service;
pub mod leave_service;
pub mod populate;

pub type ServiceResult<T> = Result<T, ServiceError>;

/// Caller-facing failure class. Each class maps to one boundary status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Missing or malformed input; caller must correct and resend.
    Validation,
    /// Unique key collision; caller must change the conflicting field.
    DuplicateKey,
    /// Referenced id does not resolve.
    NotFound,
    /// Storage failure unrelated to the request content.
    Storage,
}

/// Service error for HR use-cases.
#[derive(Debug)]
pub enum ServiceError {
    Validation(ValidationError),
    NotFound {
        entity: EntityKind,
        id: Uuid,
    },
    DuplicateKey {
        entity: EntityKind,
        key: &'static str,
    },
    /// Assigning `manager` to `employee` would close a reporting loop.
    ManagerCycle {
        employee: Uuid,
        manager: Uuid,
    },
    /// Internal consistency mismatch between write and read-back.
    InconsistentState(&'static str),
    Repo(RepoError),
}

impl ServiceError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Validation(_) | Self::ManagerCycle { .. } => ErrorKind::Validation,
            Self::NotFound { .. } => ErrorKind::NotFound,
            Self::DuplicateKey { .. } => ErrorKind::DuplicateKey,
            Self::Repo(RepoError::UnresolvedReference { .. }) => ErrorKind::NotFound,
            Self::InconsistentState(_) | Self::Repo(_) => ErrorKind::Storage,
        }
    }
}

impl Display for ServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::NotFound { entity, id } => write!(f, "{entity} not found: {id}"),
            Self::DuplicateKey { entity, key } => {
                f.write_str(&duplicate_key_message(*entity, key))
            }
            Self::ManagerCycle { employee, manager } => write!(
                f,
                "assigning manager {manager} to employee {employee} would create a reporting cycle"
            ),
            Self::InconsistentState(details) => write!(f, "inconsistent store state: {details}"),
            Self::Repo(err) => write!(f, "{err}"),
        }
    }
}

impl Error for ServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Repo(err) => Some(err),
            _ => None,
        }
    }
}

impl From<ValidationError> for ServiceError {
    fn from(value: ValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<RepoError> for ServiceError {
    fn from(value: RepoError) -> Self {
        match value {
            RepoError::Validation(err) => Self::Validation(err),
            RepoError::NotFound { entity, id } => Self::NotFound { entity, id },
            RepoError::DuplicateKey { entity, key } => Self::DuplicateKey { entity, key },
            other => Self::Repo(other),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{ErrorKind, ServiceError};
    use crate::model::{EntityKind, ValidationError};
    use crate::repo::RepoError;
    use uuid::Uuid;

    #[test]
    fn repo_errors_keep_their_semantic_class() {
        let id = Uuid::new_v4();
        let not_found: ServiceError = RepoError::NotFound {
            entity: EntityKind::Leave,
            id,
        }
        .into();
        assert_eq!(not_found.kind(), ErrorKind::NotFound);

        let duplicate: ServiceError = RepoError::DuplicateKey {
            entity: EntityKind::Department,
            key: "name",
        }
        .into();
        assert_eq!(duplicate.kind(), ErrorKind::DuplicateKey);
        assert_eq!(duplicate.to_string(), "Department already exists");

        let invalid: ServiceError = RepoError::Validation(ValidationError::Required("name")).into();
        assert_eq!(invalid.kind(), ErrorKind::Validation);
    }

    #[test]
    fn unresolved_reference_is_not_found() {
        let err: ServiceError = RepoError::UnresolvedReference {
            from: EntityKind::Attendance,
        }
        .into();
        assert_eq!(err.kind(), ErrorKind::NotFound);
    }
}
