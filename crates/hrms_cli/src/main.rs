//! CLI smoke probe.
//!
//! Opens the configured database (see `HRMS_DB_PATH`), applies migrations and
//! prints the core version plus a row count per table.

use hrms_api::{ApiConfig, Hrms};
use std::process::ExitCode;

const TABLES: [&str; 4] = ["departments", "employees", "attendance", "leaves"];

fn main() -> ExitCode {
    println!("hrms_core ping={}", hrms_core::ping());
    println!("hrms_core version={}", hrms_core::core_version());

    let config = ApiConfig::from_env();
    println!("db_path={}", config.db_path.display());

    let hrms = match Hrms::open(&config) {
        Ok(hrms) => hrms,
        Err(err) => {
            eprintln!("error: {err}");
            return ExitCode::FAILURE;
        }
    };

    for table in TABLES {
        let counted = hrms
            .connection()
            .query_row(&format!("SELECT COUNT(*) FROM {table};"), [], |row| {
                row.get::<_, i64>(0)
            });
        match counted {
            Ok(count) => println!("{table}={count}"),
            Err(err) => {
                eprintln!("error: counting {table} failed: {err}");
                return ExitCode::FAILURE;
            }
        }
    }

    ExitCode::SUCCESS
}
