//! Core domain logic for the HR management store.
//! Business invariants for departments, employees, attendance and leave
//! requests live here; outer crates only translate requests and responses.

pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;

pub use db::{open_db, open_db_in_memory, DbError, DbResult};
pub use logging::{default_log_level, init_logging, logging_status, LoggingError};
pub use model::attendance::{
    Attendance, AttendanceId, AttendancePatch, AttendanceStatus, NewAttendance,
};
pub use model::department::{Department, DepartmentId, DepartmentPatch, NewDepartment};
pub use model::employee::{Employee, EmployeeId, EmployeePatch, NewEmployee};
pub use model::leave::{Leave, LeaveId, LeaveStatus, LeaveType, NewLeave};
pub use model::projection::{DepartmentRef, EmployeeRef, ManagerRef};
pub use model::{EntityKind, ValidationError};
pub use repo::attendance_repo::{
    AttendanceListQuery, AttendanceRepository, SqliteAttendanceRepository,
};
pub use repo::department_repo::{
    DepartmentListQuery, DepartmentRepository, SqliteDepartmentRepository,
};
pub use repo::employee_repo::{EmployeeListQuery, EmployeeRepository, SqliteEmployeeRepository};
pub use repo::leave_repo::{LeaveListQuery, LeaveRepository, SqliteLeaveRepository};
pub use repo::{RepoError, RepoResult};
pub use service::attendance_service::AttendanceService;
pub use service::department_service::DepartmentService;
pub use service::employee_service::EmployeeService;
pub use service::leave_service::LeaveService;
pub use service::populate::{AttendanceView, EmployeeView, LeaveView};
pub use service::{ErrorKind, ServiceError, ServiceResult};

/// Liveness probe for outer layers.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
