use hrms_core::db::open_db_in_memory;
use hrms_core::{
    DepartmentService, EmployeeListQuery, EmployeePatch, EmployeeService, EntityKind, ErrorKind,
    NewDepartment, NewEmployee, ServiceError, SqliteDepartmentRepository,
    SqliteEmployeeRepository,
};
use rusqlite::Connection;
use uuid::Uuid;

fn employee_service(
    conn: &Connection,
) -> EmployeeService<SqliteEmployeeRepository<'_>, SqliteDepartmentRepository<'_>> {
    EmployeeService::new(
        SqliteEmployeeRepository::new(conn),
        SqliteDepartmentRepository::new(conn),
    )
}

fn new_employee(email: &str, code: &str, first: &str, last: &str) -> NewEmployee {
    NewEmployee {
        email: email.to_string(),
        first_name: first.to_string(),
        last_name: last.to_string(),
        employee_code: code.to_string(),
        ..NewEmployee::default()
    }
}

#[test]
fn create_normalizes_and_populates_references() {
    let conn = open_db_in_memory().unwrap();
    let departments = DepartmentService::new(SqliteDepartmentRepository::new(&conn));
    let service = employee_service(&conn);

    let engineering = departments
        .create_department(&NewDepartment::new("Engineering"))
        .unwrap();
    let boss = service
        .create_employee(&new_employee("boss@corp.io", "E-1", "Grace", "Hopper"))
        .unwrap();

    let created = service
        .create_employee(&NewEmployee {
            department: Some(engineering.id),
            manager: Some(boss.id),
            position: Some("  Engineer ".to_string()),
            ..new_employee("  Ada@Corp.IO ", " E-2 ", " Ada ", "Lovelace")
        })
        .unwrap();

    assert_eq!(created.email, "ada@corp.io");
    assert_eq!(created.employee_code, "E-2");
    assert_eq!(created.first_name, "Ada");
    assert_eq!(created.position.as_deref(), Some("Engineer"));
    assert!(created.is_active);
    assert!(created.joining_date > 0);

    let department = created.department.unwrap();
    assert_eq!(department.id, engineering.id);
    assert_eq!(department.name, "Engineering");
    let manager = created.manager.unwrap();
    assert_eq!(manager.id, boss.id);
    assert_eq!(manager.first_name, "Grace");
    assert_eq!(manager.last_name, "Hopper");
}

#[test]
fn explicit_joining_date_is_kept() {
    let conn = open_db_in_memory().unwrap();
    let service = employee_service(&conn);

    let created = service
        .create_employee(&NewEmployee {
            joining_date: Some(1_700_000_000_000),
            ..new_employee("a@corp.io", "E-1", "A", "B")
        })
        .unwrap();
    assert_eq!(created.joining_date, 1_700_000_000_000);
}

#[test]
fn missing_required_fields_and_bad_email_are_validation_errors() {
    let conn = open_db_in_memory().unwrap();
    let service = employee_service(&conn);

    for input in [
        new_employee("", "E-1", "A", "B"),
        new_employee("a@corp.io", " ", "A", "B"),
        new_employee("a@corp.io", "E-1", "", "B"),
        new_employee("a@corp.io", "E-1", "A", "  "),
        new_employee("not-an-email", "E-1", "A", "B"),
    ] {
        let err = service.create_employee(&input).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Validation, "input: {input:?}");
    }
}

#[test]
fn email_uniqueness_ignores_case_and_includes_inactive_rows() {
    let conn = open_db_in_memory().unwrap();
    let service = employee_service(&conn);

    let first = service
        .create_employee(&new_employee("a@x.com", "E-1", "A", "One"))
        .unwrap();
    service.delete_employee(first.id).unwrap();

    let err = service
        .create_employee(&new_employee("A@X.com", "E-2", "A", "Two"))
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::DuplicateKey);
    assert_eq!(err.to_string(), "Email already exists");
}

#[test]
fn employee_code_must_be_unique() {
    let conn = open_db_in_memory().unwrap();
    let service = employee_service(&conn);

    service
        .create_employee(&new_employee("a@x.com", "E-1", "A", "One"))
        .unwrap();
    let err = service
        .create_employee(&new_employee("b@x.com", "E-1", "B", "Two"))
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::DuplicateKey);
    assert_eq!(err.to_string(), "Employee ID already exists");
}

#[test]
fn unknown_department_or_manager_is_not_found() {
    let conn = open_db_in_memory().unwrap();
    let service = employee_service(&conn);
    let missing = Uuid::new_v4();

    let err = service
        .create_employee(&NewEmployee {
            department: Some(missing),
            ..new_employee("a@x.com", "E-1", "A", "One")
        })
        .unwrap_err();
    assert!(matches!(
        err,
        ServiceError::NotFound {
            entity: EntityKind::Department,
            ..
        }
    ));

    let err = service
        .create_employee(&NewEmployee {
            manager: Some(missing),
            ..new_employee("a@x.com", "E-1", "A", "One")
        })
        .unwrap_err();
    assert!(matches!(
        err,
        ServiceError::NotFound {
            entity: EntityKind::Employee,
            ..
        }
    ));
}

#[test]
fn list_returns_active_sorted_by_last_then_first_name() {
    let conn = open_db_in_memory().unwrap();
    let service = employee_service(&conn);

    service
        .create_employee(&new_employee("c@x.com", "E-3", "Zed", "Adams"))
        .unwrap();
    service
        .create_employee(&new_employee("a@x.com", "E-1", "Amy", "Baker"))
        .unwrap();
    service
        .create_employee(&new_employee("b@x.com", "E-2", "Bob", "Adams"))
        .unwrap();
    let gone = service
        .create_employee(&new_employee("d@x.com", "E-4", "Dan", "Aaron"))
        .unwrap();
    service.delete_employee(gone.id).unwrap();

    let names: Vec<String> = service
        .list_employees(&EmployeeListQuery::default())
        .unwrap()
        .into_iter()
        .map(|employee| format!("{} {}", employee.first_name, employee.last_name))
        .collect();
    assert_eq!(names, vec!["Bob Adams", "Zed Adams", "Amy Baker"]);
}

#[test]
fn list_can_filter_by_department() {
    let conn = open_db_in_memory().unwrap();
    let departments = DepartmentService::new(SqliteDepartmentRepository::new(&conn));
    let service = employee_service(&conn);

    let sales = departments
        .create_department(&NewDepartment::new("Sales"))
        .unwrap();
    service
        .create_employee(&NewEmployee {
            department: Some(sales.id),
            ..new_employee("a@x.com", "E-1", "A", "One")
        })
        .unwrap();
    service
        .create_employee(&new_employee("b@x.com", "E-2", "B", "Two"))
        .unwrap();

    let in_sales = service
        .list_employees(&EmployeeListQuery {
            department: Some(sales.id),
            ..EmployeeListQuery::default()
        })
        .unwrap();
    assert_eq!(in_sales.len(), 1);
    assert_eq!(in_sales[0].employee_code, "E-1");
}

#[test]
fn empty_patch_is_a_no_op_on_stored_fields() {
    let conn = open_db_in_memory().unwrap();
    let service = employee_service(&conn);

    let created = service
        .create_employee(&NewEmployee {
            phone: Some("555-0100".to_string()),
            ..new_employee("a@x.com", "E-1", "A", "One")
        })
        .unwrap();
    let patch = EmployeePatch::default();
    assert!(patch.is_empty());

    let updated = service.update_employee(created.id, &patch).unwrap();
    assert_eq!(updated.email, created.email);
    assert_eq!(updated.phone, created.phone);
    assert_eq!(updated.employee_code, created.employee_code);
    assert_eq!(updated.joining_date, created.joining_date);
    assert!(updated.updated_at >= created.updated_at);
}

#[test]
fn patch_merges_present_fields_only() {
    let conn = open_db_in_memory().unwrap();
    let service = employee_service(&conn);

    let created = service
        .create_employee(&NewEmployee {
            position: Some("Analyst".to_string()),
            ..new_employee("a@x.com", "E-1", "A", "One")
        })
        .unwrap();
    let updated = service
        .update_employee(
            created.id,
            &EmployeePatch {
                first_name: Some("Alice".to_string()),
                position: Some("  ".to_string()),
                is_active: Some(false),
                ..EmployeePatch::default()
            },
        )
        .unwrap();

    assert_eq!(updated.first_name, "Alice");
    assert_eq!(updated.last_name, "One");
    assert_eq!(updated.position.as_deref(), Some("Analyst"));
    assert!(!updated.is_active);
}

#[test]
fn changing_email_onto_taken_address_is_duplicate() {
    let conn = open_db_in_memory().unwrap();
    let service = employee_service(&conn);

    service
        .create_employee(&new_employee("a@x.com", "E-1", "A", "One"))
        .unwrap();
    let second = service
        .create_employee(&new_employee("b@x.com", "E-2", "B", "Two"))
        .unwrap();

    let err = service
        .update_employee(
            second.id,
            &EmployeePatch {
                email: Some("A@x.COM".to_string()),
                ..EmployeePatch::default()
            },
        )
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::DuplicateKey);
}

#[test]
fn manager_cycles_and_self_management_are_rejected() {
    let conn = open_db_in_memory().unwrap();
    let service = employee_service(&conn);

    let top = service
        .create_employee(&new_employee("top@x.com", "E-1", "Top", "Boss"))
        .unwrap();
    let middle = service
        .create_employee(&NewEmployee {
            manager: Some(top.id),
            ..new_employee("mid@x.com", "E-2", "Mid", "Lead")
        })
        .unwrap();
    let bottom = service
        .create_employee(&NewEmployee {
            manager: Some(middle.id),
            ..new_employee("low@x.com", "E-3", "Low", "Dev")
        })
        .unwrap();

    let cycle = service
        .update_employee(
            top.id,
            &EmployeePatch {
                manager: Some(bottom.id),
                ..EmployeePatch::default()
            },
        )
        .unwrap_err();
    assert!(matches!(cycle, ServiceError::ManagerCycle { .. }));
    assert_eq!(cycle.kind(), ErrorKind::Validation);

    let own = service
        .update_employee(
            top.id,
            &EmployeePatch {
                manager: Some(top.id),
                ..EmployeePatch::default()
            },
        )
        .unwrap_err();
    assert_eq!(own.kind(), ErrorKind::Validation);

    let reassigned = service
        .update_employee(
            bottom.id,
            &EmployeePatch {
                manager: Some(top.id),
                ..EmployeePatch::default()
            },
        )
        .unwrap();
    assert_eq!(reassigned.manager.unwrap().id, top.id);
}

#[test]
fn deactivated_employee_still_populates_as_manager() {
    let conn = open_db_in_memory().unwrap();
    let service = employee_service(&conn);

    let boss = service
        .create_employee(&new_employee("boss@x.com", "E-1", "Big", "Boss"))
        .unwrap();
    let report = service
        .create_employee(&NewEmployee {
            manager: Some(boss.id),
            ..new_employee("r@x.com", "E-2", "Re", "Port")
        })
        .unwrap();
    service.delete_employee(boss.id).unwrap();

    let loaded = service.get_employee(report.id).unwrap();
    assert_eq!(loaded.manager.unwrap().id, boss.id);
    assert!(!service.get_employee(boss.id).unwrap().is_active);
}

#[test]
fn view_serializes_with_boundary_field_names() {
    let conn = open_db_in_memory().unwrap();
    let service = employee_service(&conn);

    let created = service
        .create_employee(&new_employee("a@x.com", "E-9", "A", "One"))
        .unwrap();
    let json = serde_json::to_value(&created).unwrap();

    assert_eq!(json["employeeId"], "E-9");
    assert_eq!(json["firstName"], "A");
    assert_eq!(json["isActive"], true);
    assert!(json["department"].is_null());
    assert!(json["joiningDate"].is_i64());
}
