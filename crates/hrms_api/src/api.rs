//! Request handlers for the HR store.
//!
//! # Responsibility
//! - Translate inbound field sets into core service calls.
//! - Shape populated records into JSON bodies.
//! - Map failures onto status codes with a `{message}` body.
//!
//! # Invariants
//! - Handlers never panic; every failure becomes an `ApiResponse`.
//! - Create returns 201, every other success returns 200.
//! - Not-found is 404; every other failure is 400.

use crate::config::ApiConfig;
use crate::request::{
    decode, optional_day, optional_instant, optional_ref, parse_id, required_day, required_ref,
    AttendanceBody, BadRequest, DepartmentBody, EmployeeBody, LeaveBody, LeaveStatusBody,
    ListParams,
};
use hrms_core::db::{open_db, open_db_in_memory};
use hrms_core::{
    AttendanceListQuery, AttendancePatch, AttendanceService, DbError, DepartmentPatch,
    DepartmentService, EmployeeListQuery, EmployeePatch, EmployeeService, ErrorKind,
    LeaveListQuery, LeaveService, LoggingError, NewAttendance, NewDepartment, NewEmployee,
    NewLeave, ServiceError, SqliteAttendanceRepository, SqliteDepartmentRepository,
    SqliteEmployeeRepository, SqliteLeaveRepository, ValidationError,
};
use log::{info, warn};
use rusqlite::Connection;
use serde::Serialize;
use serde_json::{json, Value};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Status code plus JSON body.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiResponse {
    pub status: u16,
    pub body: Value,
}

impl ApiResponse {
    fn ok(body: Value) -> Self {
        Self { status: 200, body }
    }

    fn created(body: Value) -> Self {
        Self { status: 201, body }
    }

    fn message(status: u16, message: impl Into<String>) -> Self {
        Self {
            status,
            body: json!({ "message": message.into() }),
        }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// `body.message`, when present.
    pub fn message_text(&self) -> Option<&str> {
        self.body.get("message").and_then(Value::as_str)
    }
}

/// Startup failure while building a handler context.
#[derive(Debug)]
pub enum StartupError {
    Logging(LoggingError),
    Db(DbError),
}

impl Display for StartupError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Logging(err) => write!(f, "logging setup failed: {err}"),
            Self::Db(err) => write!(f, "database open failed: {err}"),
        }
    }
}

impl Error for StartupError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Logging(err) => Some(err),
            Self::Db(err) => Some(err),
        }
    }
}

impl From<LoggingError> for StartupError {
    fn from(value: LoggingError) -> Self {
        Self::Logging(value)
    }
}

impl From<DbError> for StartupError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

enum Failure {
    BadRequest(BadRequest),
    Service(ServiceError),
}

impl From<BadRequest> for Failure {
    fn from(value: BadRequest) -> Self {
        Self::BadRequest(value)
    }
}

impl From<ValidationError> for Failure {
    fn from(value: ValidationError) -> Self {
        Self::BadRequest(value.into())
    }
}

impl From<ServiceError> for Failure {
    fn from(value: ServiceError) -> Self {
        Self::Service(value)
    }
}

type Handled = Result<ApiResponse, Failure>;

/// Handler context owning one SQLite connection.
pub struct Hrms {
    conn: Connection,
}

impl Hrms {
    /// Starts logging when `log_dir` is configured, then opens the database.
    pub fn open(config: &ApiConfig) -> Result<Self, StartupError> {
        if let Some(log_dir) = &config.log_dir {
            hrms_core::init_logging(&config.log_level, &log_dir.to_string_lossy())?;
        }
        let conn = open_db(&config.db_path)?;
        Ok(Self::from_connection(conn))
    }

    pub fn in_memory() -> Result<Self, StartupError> {
        Ok(Self::from_connection(open_db_in_memory()?))
    }

    /// Wraps an already migrated connection.
    pub fn from_connection(conn: Connection) -> Self {
        Self { conn }
    }

    pub fn connection(&self) -> &Connection {
        &self.conn
    }

    pub fn health(&self) -> ApiResponse {
        ApiResponse::ok(json!({ "status": "ok", "message": "HRMS API is running" }))
    }

    // Departments

    pub fn list_departments(&self) -> ApiResponse {
        self.respond("list_departments", || {
            let departments = self.departments().list_departments()?;
            Ok(ApiResponse::ok(to_body(&departments)?))
        })
    }

    pub fn get_department(&self, id: &str) -> ApiResponse {
        self.respond("get_department", || {
            let department = self.departments().get_department(parse_id(id)?)?;
            Ok(ApiResponse::ok(to_body(&department)?))
        })
    }

    pub fn create_department(&self, body: &Value) -> ApiResponse {
        self.respond("create_department", || {
            let body: DepartmentBody = decode(body)?;
            let input = NewDepartment {
                name: body.name.unwrap_or_default(),
                description: body.description,
            };
            let department = self.departments().create_department(&input)?;
            Ok(ApiResponse::created(to_body(&department)?))
        })
    }

    pub fn update_department(&self, id: &str, body: &Value) -> ApiResponse {
        self.respond("update_department", || {
            let id = parse_id(id)?;
            let body: DepartmentBody = decode(body)?;
            let patch = DepartmentPatch {
                name: body.name,
                description: body.description,
                is_active: body.is_active,
            };
            let department = self.departments().update_department(id, &patch)?;
            Ok(ApiResponse::ok(to_body(&department)?))
        })
    }

    pub fn delete_department(&self, id: &str) -> ApiResponse {
        self.respond("delete_department", || {
            self.departments().delete_department(parse_id(id)?)?;
            Ok(ApiResponse::message(200, "Department deleted successfully"))
        })
    }

    // Employees

    /// Lists active employees; `department` narrows to one department.
    pub fn list_employees(&self, params: &Value) -> ApiResponse {
        self.respond("list_employees", || {
            let params: ListParams = decode(params)?;
            let query = EmployeeListQuery {
                include_inactive: false,
                department: optional_ref(params.department.as_deref(), "department")?,
            };
            let employees = self.employees().list_employees(&query)?;
            Ok(ApiResponse::ok(to_body(&employees)?))
        })
    }

    pub fn get_employee(&self, id: &str) -> ApiResponse {
        self.respond("get_employee", || {
            let employee = self.employees().get_employee(parse_id(id)?)?;
            Ok(ApiResponse::ok(to_body(&employee)?))
        })
    }

    pub fn create_employee(&self, body: &Value) -> ApiResponse {
        self.respond("create_employee", || {
            let body: EmployeeBody = decode(body)?;
            let input = NewEmployee {
                email: body.email.unwrap_or_default(),
                first_name: body.first_name.unwrap_or_default(),
                last_name: body.last_name.unwrap_or_default(),
                employee_code: body.employee_id.unwrap_or_default(),
                department: optional_ref(body.department.as_deref(), "department")?,
                manager: optional_ref(body.manager.as_deref(), "manager")?,
                position: body.position,
                phone: body.phone,
                joining_date: optional_instant(body.joining_date.as_ref(), "joiningDate")?,
            };
            let employee = self.employees().create_employee(&input)?;
            Ok(ApiResponse::created(to_body(&employee)?))
        })
    }

    /// Merges the supplied fields. `employeeId` is fixed after creation and
    /// ignored here.
    pub fn update_employee(&self, id: &str, body: &Value) -> ApiResponse {
        self.respond("update_employee", || {
            let id = parse_id(id)?;
            let body: EmployeeBody = decode(body)?;
            let patch = EmployeePatch {
                email: body.email,
                first_name: body.first_name,
                last_name: body.last_name,
                department: optional_ref(body.department.as_deref(), "department")?,
                manager: optional_ref(body.manager.as_deref(), "manager")?,
                position: body.position,
                phone: body.phone,
                is_active: body.is_active,
            };
            let employee = self.employees().update_employee(id, &patch)?;
            Ok(ApiResponse::ok(to_body(&employee)?))
        })
    }

    pub fn delete_employee(&self, id: &str) -> ApiResponse {
        self.respond("delete_employee", || {
            self.employees().delete_employee(parse_id(id)?)?;
            Ok(ApiResponse::message(200, "Employee deleted successfully"))
        })
    }

    // Attendance

    /// Lists attendance filtered by `employeeId`, `startDate` and `endDate`.
    pub fn list_attendance(&self, params: &Value) -> ApiResponse {
        self.respond("list_attendance", || {
            let params: ListParams = decode(params)?;
            let query = AttendanceListQuery {
                employee: optional_ref(params.employee_id.as_deref(), "employeeId")?,
                start_date: optional_day(params.start_date.as_deref(), "startDate")?,
                end_date: optional_day(params.end_date.as_deref(), "endDate")?,
            };
            let records = self.attendance().list_attendance(&query)?;
            Ok(ApiResponse::ok(to_body(&records)?))
        })
    }

    pub fn create_attendance(&self, body: &Value) -> ApiResponse {
        self.respond("create_attendance", || {
            let body: AttendanceBody = decode(body)?;
            let input = NewAttendance {
                employee: required_ref(body.employee.as_deref(), "employee")?,
                date: required_day(body.date.as_deref(), "date")?,
                check_in: optional_instant(body.check_in.as_ref(), "checkIn")?,
                check_out: optional_instant(body.check_out.as_ref(), "checkOut")?,
                status: body.status.unwrap_or_default(),
                notes: body.notes,
            };
            let record = self.attendance().mark_attendance(&input)?;
            Ok(ApiResponse::created(to_body(&record)?))
        })
    }

    /// Merges check times, status and notes. An empty `notes` clears it.
    pub fn update_attendance(&self, id: &str, body: &Value) -> ApiResponse {
        self.respond("update_attendance", || {
            let id = parse_id(id)?;
            let body: AttendanceBody = decode(body)?;
            let patch = AttendancePatch {
                check_in: optional_instant(body.check_in.as_ref(), "checkIn")?,
                check_out: optional_instant(body.check_out.as_ref(), "checkOut")?,
                status: body.status,
                notes: body.notes,
            };
            let record = self.attendance().update_attendance(id, &patch)?;
            Ok(ApiResponse::ok(to_body(&record)?))
        })
    }

    pub fn delete_attendance(&self, id: &str) -> ApiResponse {
        self.respond("delete_attendance", || {
            self.attendance().delete_attendance(parse_id(id)?)?;
            Ok(ApiResponse::message(
                200,
                "Attendance record deleted successfully",
            ))
        })
    }

    // Leave requests

    /// Lists leave requests; the date range applies to `startDate`.
    pub fn list_leaves(&self, params: &Value) -> ApiResponse {
        self.respond("list_leaves", || {
            let params: ListParams = decode(params)?;
            let query = LeaveListQuery {
                employee: optional_ref(params.employee_id.as_deref(), "employeeId")?,
                start_date: optional_day(params.start_date.as_deref(), "startDate")?,
                end_date: optional_day(params.end_date.as_deref(), "endDate")?,
            };
            let leaves = self.leaves().list_leaves(&query)?;
            Ok(ApiResponse::ok(to_body(&leaves)?))
        })
    }

    pub fn create_leave(&self, body: &Value) -> ApiResponse {
        self.respond("create_leave", || {
            let body: LeaveBody = decode(body)?;
            let input = NewLeave {
                employee: required_ref(body.employee_ref(), "employee")?,
                leave_type: body
                    .leave_type
                    .ok_or(ValidationError::Required("leaveType"))?,
                start_date: required_day(body.start_date.as_deref(), "startDate")?,
                end_date: required_day(body.end_date.as_deref(), "endDate")?,
                reason: body.reason,
            };
            let leave = self.leaves().request_leave(&input)?;
            Ok(ApiResponse::created(to_body(&leave)?))
        })
    }

    pub fn update_leave_status(&self, id: &str, body: &Value) -> ApiResponse {
        self.respond("update_leave_status", || {
            let id = parse_id(id)?;
            let body: LeaveStatusBody = decode(body)?;
            let status = body.status.ok_or(ValidationError::Required("status"))?;
            let leave = self.leaves().set_leave_status(id, status)?;
            Ok(ApiResponse::ok(to_body(&leave)?))
        })
    }

    pub fn delete_leave(&self, id: &str) -> ApiResponse {
        self.respond("delete_leave", || {
            self.leaves().delete_leave(parse_id(id)?)?;
            Ok(ApiResponse::message(200, "Leave request deleted successfully"))
        })
    }

    fn departments(&self) -> DepartmentService<SqliteDepartmentRepository<'_>> {
        DepartmentService::new(SqliteDepartmentRepository::new(&self.conn))
    }

    fn employees(
        &self,
    ) -> EmployeeService<SqliteEmployeeRepository<'_>, SqliteDepartmentRepository<'_>> {
        EmployeeService::new(
            SqliteEmployeeRepository::new(&self.conn),
            SqliteDepartmentRepository::new(&self.conn),
        )
    }

    fn attendance(
        &self,
    ) -> AttendanceService<SqliteAttendanceRepository<'_>, SqliteEmployeeRepository<'_>> {
        AttendanceService::new(
            SqliteAttendanceRepository::new(&self.conn),
            SqliteEmployeeRepository::new(&self.conn),
        )
    }

    fn leaves(&self) -> LeaveService<SqliteLeaveRepository<'_>, SqliteEmployeeRepository<'_>> {
        LeaveService::new(
            SqliteLeaveRepository::new(&self.conn),
            SqliteEmployeeRepository::new(&self.conn),
        )
    }

    fn respond(&self, op: &'static str, handler: impl FnOnce() -> Handled) -> ApiResponse {
        match handler() {
            Ok(response) => {
                info!(
                    "event=request module=api op={op} status=ok http_status={}",
                    response.status
                );
                response
            }
            Err(failure) => {
                let (response, error_code) = failure_response(failure);
                warn!(
                    "event=request module=api op={op} status=error http_status={} error_code={error_code}",
                    response.status
                );
                response
            }
        }
    }
}

fn failure_response(failure: Failure) -> (ApiResponse, &'static str) {
    match failure {
        Failure::BadRequest(BadRequest(message)) => {
            (ApiResponse::message(400, message), "bad_request")
        }
        Failure::Service(err) => match (&err, err.kind()) {
            (ServiceError::NotFound { entity, .. }, _) => (
                ApiResponse::message(404, format!("{entity} not found")),
                "not_found",
            ),
            (_, ErrorKind::NotFound) => (ApiResponse::message(404, err.to_string()), "not_found"),
            (_, ErrorKind::Validation) => {
                (ApiResponse::message(400, err.to_string()), "validation")
            }
            (_, ErrorKind::DuplicateKey) => {
                (ApiResponse::message(400, err.to_string()), "duplicate_key")
            }
            (_, ErrorKind::Storage) => (ApiResponse::message(400, err.to_string()), "storage"),
        },
    }
}

fn to_body<T: Serialize>(value: &T) -> Result<Value, Failure> {
    serde_json::to_value(value)
        .map_err(|err| Failure::BadRequest(BadRequest(format!("response encoding failed: {err}"))))
}
